//! Input handling — maps key/mouse events to state mutations.

use std::time::{Duration, Instant};

use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Rect;

use crate::config::{Action, KeyBind};
use crate::core::render::{ListRow, RowBuilder};
use crate::core::tree::BlockId;
use crate::ui::layout::AppLayout;

use super::settings::{SettingsItem, SETTINGS_ITEMS};
use super::state::{ActiveView, AppState};

/// Total selectable rows in the controls submenu (actions + "Reset").
pub fn controls_item_count() -> usize {
    Action::ALL.len() + 1
}

/// Process a key event, dispatching based on the active view.
pub fn handle_key(state: &mut AppState, key: KeyEvent) {
    // Ctrl+c always quits, regardless of view.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        state.should_quit = true;
        return;
    }

    match state.active_view {
        ActiveView::Outline => {
            if state.is_moving() {
                handle_move_key(state, key);
            } else {
                handle_outline_key(state, key);
            }
        }
        ActiveView::SettingsMenu => handle_settings_key(state, key),
        ActiveView::ControlsSubmenu => {
            if state.awaiting_rebind {
                handle_rebind_key(state, key);
            } else {
                handle_controls_key(state, key);
            }
        }
    }
}

// ── Outline view (configurable bindings) ────────────────────────

fn handle_outline_key(state: &mut AppState, key: KeyEvent) {
    // Navigation keys that should always work in the outline view.
    match key.code {
        KeyCode::Home => {
            state.outline_state.select_first();
            return;
        }
        KeyCode::End => {
            let total = total_rows(state);
            state.outline_state.select_last(total);
            return;
        }
        _ => {}
    }

    let Some(action) = state.config.match_key(key) else {
        return;
    };

    match action {
        Action::Quit => {
            state.should_quit = true;
        }
        Action::OpenSettings => {
            state.active_view = ActiveView::SettingsMenu;
            state.settings_selected = 0;
        }
        Action::MoveUp => {
            state.outline_state.select_prev();
        }
        Action::MoveDown => {
            let total = total_rows(state);
            state.outline_state.select_next(total);
        }
        Action::Expand => {
            expand_or_descend(state);
        }
        Action::Collapse => {
            handle_collapse(state);
        }
        Action::JumpSiblingUp => {
            jump_to_sibling(state, Direction::Up);
        }
        Action::JumpSiblingDown => {
            jump_to_sibling(state, Direction::Down);
        }
        Action::ToggleSelect => {
            if let Some(id) = cursor_block(state) {
                toggle_select(state, id);
            }
        }
        Action::Grab => {
            start_move(state);
        }
        Action::ExpandAll => {
            state.expanded.expand_all();
            state.status_message = Some("All branches expanded".into());
        }
        Action::CollapseAll => {
            let root = state.tree.root();
            let containers: Vec<BlockId> = (0..state.tree.len())
                .filter(|&id| id != root && !state.tree.get(id).children.is_empty())
                .collect();
            state.expanded.collapse_all(containers);
            state.status_message = Some("All branches collapsed".into());
        }
    }
}

/// Expand a collapsed branch, or step into the first child when the branch
/// is already open.
fn expand_or_descend(state: &mut AppState) {
    let Some(id) = cursor_block(state) else {
        return;
    };
    if state.tree.get(id).children.is_empty() {
        return;
    }
    if state.expanded.is_expanded(id) {
        let total = total_rows(state);
        state.outline_state.select_next(total);
    } else {
        state.expanded.set(id, true);
        tracing::debug!(block = id, "expand");
    }
}

/// Handle collapse: collapse an open branch, or collapse the parent and
/// jump to it for leaves and already-collapsed blocks.
fn handle_collapse(state: &mut AppState) {
    let Some(id) = cursor_block(state) else {
        return;
    };

    let node = state.tree.get(id);
    let has_children = !node.children.is_empty();
    let parent = node.parent;

    if has_children && state.expanded.is_expanded(id) {
        state.expanded.set(id, false);
        tracing::debug!(block = id, "collapse");
    } else if let Some(parent_id) = parent {
        state.expanded.set(parent_id, false);
        if let Some(pos) = position_of(state, parent_id) {
            state.outline_state.cursor = pos;
        }
    }
}

enum Direction {
    Up,
    Down,
}

/// Jump to the next/previous row at the same nesting level or shallower.
fn jump_to_sibling(state: &mut AppState, direction: Direction) {
    let rows = full_rows(state);
    let blocks: Vec<(usize, usize)> = rows
        .iter()
        .filter_map(|row| match row {
            ListRow::Block {
                position,
                level,
                is_grabbed: false,
                ..
            } => Some((*position, *level)),
            _ => None,
        })
        .collect();

    let cursor = state.outline_state.cursor;
    let Some(current) = blocks.iter().position(|&(p, _)| p == cursor) else {
        return;
    };
    let target_level = blocks[current].1;

    match direction {
        Direction::Down => {
            for &(position, level) in &blocks[current + 1..] {
                if level <= target_level {
                    state.outline_state.cursor = position;
                    return;
                }
            }
        }
        Direction::Up => {
            for &(position, level) in blocks[..current].iter().rev() {
                if level <= target_level {
                    state.outline_state.cursor = position;
                    return;
                }
            }
        }
    }
}

fn toggle_select(state: &mut AppState, id: BlockId) {
    if !state.selected.remove(&id) {
        state.selected.insert(id);
    }
    let label = state.tree.get(id).meta.label.clone();
    let count = state.selected.len();
    state.status_message = if state.selected.contains(&id) {
        Some(format!("Selected '{label}' ({count} selected)"))
    } else {
        Some(format!("Deselected '{label}' ({count} selected)"))
    };
}

// ── Move mode ───────────────────────────────────────────────────

/// Grab the cursor block, entering move mode.
fn start_move(state: &mut AppState) {
    let Some(id) = cursor_block(state) else {
        return;
    };
    if id == state.tree.root() {
        state.status_message = Some("The document root cannot be moved".into());
        return;
    }
    state.grabbed.insert(id);
    let label = state.tree.get(id).meta.label.clone();
    state.status_message = Some(format!(
        "Moving '{label}' — Enter: drop after target · Esc: cancel"
    ));
    tracing::debug!(block = id, "grab");
}

/// While a move is in progress, keys pick the drop target.
fn handle_move_key(state: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            state.grabbed.clear();
            state.status_message = Some("Move cancelled".into());
            return;
        }
        KeyCode::Enter => {
            drop_grabbed(state);
            return;
        }
        KeyCode::Home => {
            state.outline_state.select_first();
            return;
        }
        KeyCode::End => {
            let total = total_rows(state);
            state.outline_state.select_last(total);
            return;
        }
        _ => {}
    }

    if let Some(action) = state.config.match_key(key) {
        match action {
            Action::MoveUp => state.outline_state.select_prev(),
            Action::MoveDown => {
                let total = total_rows(state);
                state.outline_state.select_next(total);
            }
            Action::Quit => state.should_quit = true,
            _ => {}
        }
    }
}

/// Drop the grabbed block after the cursor block (or as first child when
/// the cursor sits on the displayed root).
fn drop_grabbed(state: &mut AppState) {
    let Some(&id) = state.grabbed.iter().next() else {
        return;
    };
    let Some(target) = cursor_block(state) else {
        return;
    };

    if state.tree.move_after(id, target) {
        state.grabbed.clear();
        if let Some(pos) = position_of(state, id) {
            state.outline_state.cursor = pos;
        }
        let label = state.tree.get(id).meta.label.clone();
        state.status_message = Some(format!("Moved '{label}'"));
        tracing::debug!(block = id, after = target, "drop");
    } else {
        state.status_message = Some("A block cannot move inside its own subtree".into());
    }
}

// ── Settings menu (hardcoded keys) ──────────────────────────────

fn handle_settings_key(state: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => {
            state.active_view = ActiveView::Outline;
        }
        KeyCode::Up | KeyCode::Char('k') => {
            state.settings_selected = state.settings_selected.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if state.settings_selected < SETTINGS_ITEMS.len() - 1 {
                state.settings_selected += 1;
            }
        }
        KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') | KeyCode::Char(' ') => {
            if let Some(item) = SETTINGS_ITEMS.get(state.settings_selected) {
                match item {
                    SettingsItem::Submenu { view, .. } => {
                        state.active_view = *view;
                        state.controls_selected = 0;
                    }
                    SettingsItem::Toggle { get, set, .. } => {
                        let current = get(state);
                        set(state, !current);
                    }
                    SettingsItem::Cycle { cycle, .. } => {
                        cycle(state);
                    }
                }
            }
        }
        _ => {}
    }
}

// ── Controls submenu (hardcoded navigation, interactive rebinding) ──

fn handle_controls_key(state: &mut AppState, key: KeyEvent) {
    let item_count = controls_item_count();

    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => {
            state.active_view = ActiveView::Outline;
        }
        KeyCode::Left | KeyCode::Char('h') => {
            state.active_view = ActiveView::SettingsMenu;
        }
        KeyCode::Up | KeyCode::Char('k') => {
            state.controls_selected = state.controls_selected.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if state.controls_selected < item_count - 1 {
                state.controls_selected += 1;
            }
        }
        KeyCode::Enter => {
            if state.controls_selected < Action::ALL.len() {
                // Start rebinding the selected action.
                state.awaiting_rebind = true;
            } else {
                // "Reset to defaults" item.
                state.config.reset_defaults();
                let _ = state.config.save();
            }
        }
        KeyCode::Delete | KeyCode::Backspace => {
            // Clear all bindings for the selected action.
            if state.controls_selected < Action::ALL.len() {
                let action = Action::ALL[state.controls_selected];
                state.config.bindings.insert(action, Vec::new());
                let _ = state.config.save();
            }
        }
        _ => {}
    }
}

/// Capture the next key press as a new binding.
fn handle_rebind_key(state: &mut AppState, key: KeyEvent) {
    // Only process Press events (ignore Release/Repeat on supported terminals).
    if key.kind != KeyEventKind::Press {
        return;
    }

    // Esc cancels rebinding.
    if key.code == KeyCode::Esc {
        state.awaiting_rebind = false;
        return;
    }

    // Don't allow rebinding Ctrl+C (reserved for emergency quit).
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return;
    }

    let action = Action::ALL[state.controls_selected];
    let bind = KeyBind::from_key_event(key);
    state.config.add_binding(action, bind);
    let _ = state.config.save();
    state.awaiting_rebind = false;
}

// ── Mouse ───────────────────────────────────────────────────────

/// Process a mouse event.
pub fn handle_mouse(state: &mut AppState, mouse: MouseEvent) {
    if state.active_view != ActiveView::Outline {
        return;
    }

    let layout = AppLayout::from_area(state.terminal_area);

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if !point_in_rect(layout.outline_area, mouse.column, mouse.row) {
                return;
            }
            // Skip the border rows of the outline block.
            let content_top = layout.outline_area.y.saturating_add(1);
            let content_bottom = layout
                .outline_area
                .y
                .saturating_add(layout.outline_area.height.saturating_sub(1));
            if mouse.row < content_top || mouse.row >= content_bottom {
                return;
            }

            let y_index = (mouse.row - content_top) as usize;
            let Some(row) = row_at_y(state, y_index) else {
                state.last_left_click = None;
                return;
            };

            match row {
                ListRow::Block {
                    id,
                    position,
                    is_expanded,
                    is_grabbed,
                    ..
                } => {
                    if !is_grabbed {
                        state.outline_state.cursor = position;
                    }

                    let now = Instant::now();
                    let is_repeat_click = state
                        .last_left_click
                        .map(|(last_id, at)| {
                            last_id == id
                                && now.duration_since(at)
                                    <= Duration::from_millis(state.config.double_click_ms)
                        })
                        .unwrap_or(false);

                    if is_repeat_click {
                        // Double-click: toggle branches, select leaves.
                        if is_expanded.is_some() {
                            state.expanded.toggle(id);
                        } else {
                            toggle_select(state, id);
                        }
                        state.last_left_click = None;
                    } else {
                        state.last_left_click = Some((id, now));
                    }
                }
                ListRow::Appender { .. } => {
                    state.last_left_click = None;
                }
            }
        }
        MouseEventKind::ScrollUp => {
            state.outline_state.select_prev();
        }
        MouseEventKind::ScrollDown => {
            let total = total_rows(state);
            state.outline_state.select_next(total);
        }
        _ => {}
    }
}

// ── Shared helpers ──────────────────────────────────────────────

/// Build the full (unwindowed) row list for hit-testing and navigation.
pub fn full_rows(state: &AppState) -> Vec<ListRow> {
    RowBuilder::new(&state.tree, &state.expanded, &state.grabbed, &state.selected)
        .show_appender(state.config.show_appender)
        .build_rows()
}

/// Rows in the whole list under the current expansion/grab state.
pub fn total_rows(state: &AppState) -> usize {
    RowBuilder::new(&state.tree, &state.expanded, &state.grabbed, &state.selected).total_rows()
}

/// The block occupying `position` in the numbered list (grabbed rows share
/// a position with their successor and are skipped).
fn block_at(state: &AppState, position: usize) -> Option<BlockId> {
    full_rows(state).iter().find_map(|row| match row {
        ListRow::Block {
            id,
            position: p,
            is_grabbed: false,
            ..
        } if *p == position => Some(*id),
        _ => None,
    })
}

fn cursor_block(state: &AppState) -> Option<BlockId> {
    block_at(state, state.outline_state.cursor)
}

/// Absolute position of `id`, if it currently owns a numbered row.
fn position_of(state: &AppState, id: BlockId) -> Option<usize> {
    full_rows(state).iter().find_map(|row| match row {
        ListRow::Block {
            id: rid,
            position,
            is_grabbed: false,
            ..
        } if *rid == id => Some(*position),
        _ => None,
    })
}

/// The row drawn at viewport line `y_index` — mirrors the widget's draw
/// order (numbered rows above the scroll offset are skipped, grabbed rows
/// and appenders consume a line where they appear).
fn row_at_y(state: &AppState, y_index: usize) -> Option<ListRow> {
    let offset = state.outline_state.offset;
    let mut y = 0usize;
    let mut drawing = false;
    for row in full_rows(state) {
        let visible = match &row {
            ListRow::Block { position, .. } => *position > offset,
            ListRow::Appender { .. } => drawing,
        };
        if !visible {
            continue;
        }
        drawing = true;
        if y == y_index {
            return Some(row);
        }
        y += 1;
    }
    None
}

fn point_in_rect(rect: Rect, x: u16, y: u16) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}
