//! Colour palette and text styles used across the UI.

use ratatui::style::{Color, Modifier, Style};

/// Central theme — change colours here and they propagate everywhere.
pub struct Theme;

impl Theme {
    // ── outline rows ───────────────────────────────────────────
    pub fn container_style() -> Style {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    }

    pub fn block_style() -> Style {
        Style::default().fg(Color::White)
    }

    pub fn kind_style() -> Style {
        Style::default().fg(Color::DarkGray)
    }

    pub fn cursor_style() -> Style {
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD)
    }

    pub fn selected_style() -> Style {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    }

    /// Rows inside a selected branch get a quiet tint.
    pub fn branch_selected_style() -> Style {
        Style::default().fg(Color::Yellow)
    }

    pub fn grabbed_style() -> Style {
        Style::default()
            .fg(Color::Magenta)
            .add_modifier(Modifier::DIM | Modifier::ITALIC)
    }

    pub fn appender_style() -> Style {
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::ITALIC)
    }

    // ── chrome ─────────────────────────────────────────────────
    pub fn border_style() -> Style {
        Style::default().fg(Color::Gray)
    }

    pub fn title_style() -> Style {
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD)
    }

    pub fn status_bar_style() -> Style {
        Style::default().bg(Color::DarkGray).fg(Color::White)
    }

    pub fn move_hint_style() -> Style {
        Style::default().bg(Color::DarkGray).fg(Color::Magenta)
    }

    // ── popups ─────────────────────────────────────────────────
    pub fn popup_title_style() -> Style {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    }

    pub fn popup_border_style() -> Style {
        Style::default().fg(Color::DarkGray)
    }

    pub fn menu_item_style() -> Style {
        Style::default().fg(Color::White)
    }

    pub fn menu_selected_style() -> Style {
        Style::default()
            .fg(Color::White)
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD)
    }

    pub fn menu_value_style() -> Style {
        Style::default().fg(Color::Yellow)
    }

    pub fn menu_selected_value_style() -> Style {
        Style::default().fg(Color::Yellow).bg(Color::DarkGray)
    }

    pub fn toggle_on_style() -> Style {
        Style::default().fg(Color::Green)
    }

    pub fn hint_style() -> Style {
        Style::default().fg(Color::DarkGray)
    }
}
