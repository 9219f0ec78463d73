//! Settings menu model (data only).
//!
//! Keeping these definitions outside the input handler lets both the handler
//! and UI renderers consume the same source of truth without cross-importing.

use super::state::{ActiveView, AppState};
use crate::config::OVERSCAN_STEPS;

/// A single item in the settings menu.
pub enum SettingsItem {
    /// Opens a submenu.
    Submenu {
        label: &'static str,
        view: ActiveView,
    },
    /// Boolean toggle — reads/writes via accessors on `AppState`.
    Toggle {
        label: &'static str,
        get: fn(&AppState) -> bool,
        set: fn(&mut AppState, bool),
    },
    /// Cycles through a finite set of values.
    Cycle {
        label: &'static str,
        value: fn(&AppState) -> String,
        cycle: fn(&mut AppState),
    },
}

impl SettingsItem {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Submenu { label, .. }
            | Self::Toggle { label, .. }
            | Self::Cycle { label, .. } => label,
        }
    }
}

/// All items shown in the settings popup, in display order.
pub static SETTINGS_ITEMS: &[SettingsItem] = &[
    SettingsItem::Submenu {
        label: "Controls",
        view: ActiveView::ControlsSubmenu,
    },
    SettingsItem::Toggle {
        label: "Windowed Rendering",
        get: |s| s.config.windowed,
        set: |s, v| {
            s.config.windowed = v;
            let _ = s.config.save();
            s.status_message = Some(if v {
                "Windowed rendering on".into()
            } else {
                "Windowed rendering off — full list every frame".into()
            });
        },
    },
    SettingsItem::Toggle {
        label: "Appender Row",
        get: |s| s.config.show_appender,
        set: |s, v| {
            s.config.show_appender = v;
            let _ = s.config.save();
        },
    },
    SettingsItem::Cycle {
        label: "Overscan",
        value: |s| format!("{} rows", s.config.overscan),
        cycle: |s| {
            let idx = OVERSCAN_STEPS
                .iter()
                .position(|&v| v == s.config.overscan)
                .unwrap_or(0);
            s.config.overscan = OVERSCAN_STEPS[(idx + 1) % OVERSCAN_STEPS.len()];
            let _ = s.config.save();
            s.status_message = Some(format!("Overscan: {} rows", s.config.overscan));
        },
    },
    SettingsItem::Cycle {
        label: "Double-click Window",
        value: |s| format!("{}ms", s.config.double_click_ms),
        cycle: |s| {
            const WINDOWS: &[u64] = &[150, 200, 250, 300, 400, 500];
            let current = s.config.double_click_ms;
            let idx = WINDOWS.iter().position(|&w| w == current).unwrap_or(2);
            let next = WINDOWS[(idx + 1) % WINDOWS.len()];
            s.config.double_click_ms = next;
            let _ = s.config.save();
            s.status_message = Some(format!("Double-click window: {}ms", next));
        },
    },
];
