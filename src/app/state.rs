//! Central application state.
//!
//! All mutable state lives here so that the rest of the app can be pure
//! functions over `&AppState` (rendering) or `&mut AppState` (event
//! handling).  The tree, expansion map, selection set, and grabbed set are
//! the immutable snapshots each frame's row building reads.

use std::collections::HashSet;
use std::path::PathBuf;

use ratatui::layout::Rect;

use crate::config::AppConfig;
use crate::core::{
    render::ExpandedState,
    tree::{BlockId, BlockTree},
};
use crate::ui::list_widget::OutlineState;

/// Which view / overlay is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveView {
    #[default]
    Outline,
    SettingsMenu,
    ControlsSubmenu,
}

/// Top-level application state.
pub struct AppState {
    /// The block tree data.
    pub tree: BlockTree,
    /// Per-block expansion flags (absent = expanded).
    pub expanded: ExpandedState,
    /// Currently selected block ids.
    pub selected: HashSet<BlockId>,
    /// Blocks being moved — excluded from row counting, drawn dimmed.
    pub grabbed: HashSet<BlockId>,
    /// Widget-level state (cursor, scroll).
    pub outline_state: OutlineState,
    /// Path of the loaded document, `None` for the built-in sample.
    pub source: Option<PathBuf>,
    /// Controls the main event loop.
    pub should_quit: bool,
    /// An optional status message shown in the bottom bar.
    pub status_message: Option<String>,
    /// Which view / overlay is currently shown.
    pub active_view: ActiveView,
    /// User-configurable keybindings and view settings.
    pub config: AppConfig,
    /// Currently highlighted item in the settings menu.
    pub settings_selected: usize,
    /// Currently highlighted item in the controls submenu.
    pub controls_selected: usize,
    /// When `true`, the controls submenu is waiting for the user to press
    /// a key to rebind the action at `controls_selected`.
    pub awaiting_rebind: bool,
    /// Last terminal area, kept for mouse hit-testing.
    pub terminal_area: Rect,
    /// Last left-clicked block and click time, for double-click.
    pub last_left_click: Option<(BlockId, std::time::Instant)>,
}

impl AppState {
    pub fn new(tree: BlockTree, config: AppConfig, source: Option<PathBuf>) -> Self {
        Self {
            tree,
            expanded: ExpandedState::new(),
            selected: HashSet::new(),
            grabbed: HashSet::new(),
            outline_state: OutlineState::default(),
            source,
            should_quit: false,
            status_message: None,
            active_view: ActiveView::default(),
            config,
            settings_selected: 0,
            controls_selected: 0,
            awaiting_rebind: false,
            terminal_area: Rect::default(),
            last_left_click: None,
        }
    }

    /// `true` while a block move is in progress.
    pub fn is_moving(&self) -> bool {
        !self.grabbed.is_empty()
    }
}
