//! Popup overlay widgets for the settings menu and controls submenu.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget},
};

use crate::app::settings::{SettingsItem, SETTINGS_ITEMS};
use crate::app::state::AppState;
use crate::config::{Action, AppConfig};

use super::theme::Theme;

/// Label column width in the controls popup.
const LABEL_WIDTH: usize = 22;

// ───────────────────────────────────────── settings popup ────

/// Settings menu popup overlay.
pub struct SettingsPopup<'a> {
    pub selected: usize,
    pub state: &'a AppState,
}

impl<'a> Widget for SettingsPopup<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let popup = centered(44, SETTINGS_ITEMS.len() as u16 + 6, area);
        let inner = popup_frame(" Settings ", popup, buf);

        let mut lines = vec![Line::raw("")];
        for (i, item) in SETTINGS_ITEMS.iter().enumerate() {
            let selected = i == self.selected;
            let marker = if selected { " ▸ " } else { "   " };
            let label_style = if selected {
                Theme::menu_selected_style()
            } else {
                Theme::menu_item_style()
            };

            let value = match item {
                SettingsItem::Submenu { .. } => Span::styled("  …", Theme::hint_style()),
                SettingsItem::Toggle { get, .. } => {
                    if get(self.state) {
                        Span::styled("  [ON]", Theme::toggle_on_style())
                    } else {
                        Span::styled("  [OFF]", Theme::hint_style())
                    }
                }
                SettingsItem::Cycle { value, .. } => {
                    Span::styled(format!("  {}", value(self.state)), Theme::menu_value_style())
                }
            };

            lines.push(Line::from(vec![
                Span::styled(format!("{marker}{}", item.label()), label_style),
                value,
            ]));
        }
        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled(
            "  Enter/Space: toggle  Esc: close",
            Theme::hint_style(),
        )));

        Paragraph::new(lines).render(inner, buf);
    }
}

// ───────────────────────────────────────── controls popup ────

/// Interactive controls / keybinding popup overlay.
pub struct ControlsPopup<'a> {
    pub config: &'a AppConfig,
    pub selected: usize,
    pub awaiting_rebind: bool,
}

impl<'a> ControlsPopup<'a> {
    /// One action row: label left-aligned, bindings right-aligned.
    fn binding_row(&self, index: usize, action: Action, width: usize) -> Line<'_> {
        let selected = index == self.selected;
        let marker = if selected { " ▸ " } else { "   " };

        let keys = if selected && self.awaiting_rebind {
            "Press a key…".to_string()
        } else {
            self.config.display_bindings(action)
        };

        let label_style = if selected {
            Theme::menu_selected_style()
        } else {
            Theme::menu_item_style()
        };
        let keys_style = if selected {
            Theme::menu_selected_value_style()
        } else {
            Theme::menu_value_style()
        };

        let label_col = format!("{marker}{:<LABEL_WIDTH$}", action.label());
        let keys_width = width.saturating_sub(label_col.len()).max(1);

        Line::from(vec![
            Span::styled(label_col, label_style),
            Span::styled(format!("{keys:>keys_width$}"), keys_style),
        ])
    }
}

impl<'a> Widget for ControlsPopup<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let popup = centered(56, Action::ALL.len() as u16 + 7, area);
        let inner = popup_frame(" Controls ", popup, buf);
        let width = inner.width as usize;

        let mut lines = vec![Line::raw("")];
        for (i, &action) in Action::ALL.iter().enumerate() {
            lines.push(self.binding_row(i, action, width));
        }

        // Trailing "reset" entry sits below the action list.
        let reset_selected = self.selected == Action::ALL.len();
        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled(
            format!(
                "{}⟳ Reset to defaults",
                if reset_selected { " ▸ " } else { "   " }
            ),
            if reset_selected {
                Theme::menu_selected_style()
            } else {
                Theme::menu_item_style()
            },
        )));

        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled(
            "  Enter: add key  Del: clear  Esc: back",
            Theme::hint_style(),
        )));

        Paragraph::new(lines).render(inner, buf);
    }
}

// ───────────────────────────────────────── helpers ───────────

/// Clear a popup rectangle and draw the common rounded frame; returns the
/// inner content area.
fn popup_frame(title: &str, popup: Rect, buf: &mut Buffer) -> Rect {
    Clear.render(popup, buf);
    let block = Block::default()
        .title(title.to_string())
        .title_style(Theme::popup_title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Theme::popup_border_style());
    let inner = block.inner(popup);
    block.render(popup, buf);
    inner
}

/// Create a centered rectangle with fixed dimensions, clamped to the available area.
fn centered(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    Rect::new(
        area.x + area.width.saturating_sub(w) / 2,
        area.y + area.height.saturating_sub(h) / 2,
        w,
        h,
    )
}
