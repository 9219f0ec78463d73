//! A tree-based TUI to inspect and reorganise nested document outlines.
//!
//! Run the binary with a block-document JSON file to browse it, or with no
//! arguments to explore the built-in sample.

mod app;
mod config;
mod core;
mod ui;

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    widgets::{Block, Borders, Paragraph},
    Terminal,
};

use crate::app::{
    event::{spawn_event_reader, AppEvent},
    handler,
    state::{ActiveView, AppState},
};
use crate::config::AppConfig;
use crate::core::document::Document;
use crate::ui::{
    layout::AppLayout, list_widget::OutlineWidget, popup, theme::Theme,
};

// ───────────────────────────────────────── CLI ───────────────

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), about = "Windowed list view over nested block documents")]
struct Cli {
    /// Block document to open (JSON).  Uses the built-in sample when omitted.
    path: Option<PathBuf>,

    /// Render the whole list every frame instead of windowing it.
    #[arg(long = "no-window")]
    no_window: bool,

    /// Rows materialised beyond the viewport edges.
    #[arg(long)]
    overscan: Option<usize>,
}

// ───────────────────────────────────────── main ─────────────

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing (only in debug builds / when RUST_LOG is set).
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr) // never pollute the TUI screen
        .init();

    let cli = Cli::parse();

    // ── load the document ─────────────────────────────────────
    let document = match &cli.path {
        Some(path) => Document::load(path)
            .with_context(|| format!("failed to open {}", path.display()))?,
        None => Document::sample(),
    };
    let tree = document.into_tree();
    tracing::info!(blocks = tree.len(), "document loaded");

    let mut user_config = AppConfig::load();
    if cli.no_window {
        user_config.windowed = false;
    }
    if let Some(overscan) = cli.overscan {
        user_config.overscan = overscan;
    }

    let mut state = AppState::new(tree, user_config, cli.path);

    // ── terminal setup ────────────────────────────────────────
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    let mut events = spawn_event_reader();

    // ── event loop ────────────────────────────────────────────
    loop {
        terminal.draw(|frame| {
            state.terminal_area = frame.area();
            let layout = AppLayout::from_area(frame.area());

            let title = match &state.source {
                Some(path) => format!(" {} ", path.display()),
                None => format!(" {} (sample) ", state.tree.get(state.tree.root()).meta.label),
            };
            let outline_block = Block::default()
                .title(title)
                .title_style(Theme::title_style())
                .borders(Borders::ALL)
                .border_style(Theme::border_style());

            let outline = OutlineWidget::new(
                &state.tree,
                &state.expanded,
                &state.grabbed,
                &state.selected,
            )
            .windowed(state.config.windowed)
            .overscan(state.config.overscan)
            .show_appender(state.config.show_appender)
            .block(outline_block);

            frame.render_stateful_widget(outline, layout.outline_area, &mut state.outline_state);

            let status_text = match state.active_view {
                ActiveView::Outline => {
                    let hint = state.config.status_bar_hint();
                    let base = state.status_message.as_deref().unwrap_or(&hint);
                    format!(
                        "{base} · row {}/{}",
                        state.outline_state.cursor,
                        handler::total_rows(&state)
                    )
                }
                ActiveView::SettingsMenu | ActiveView::ControlsSubmenu => String::new(),
            };
            let status_style = if state.is_moving() {
                Theme::move_hint_style()
            } else {
                Theme::status_bar_style()
            };
            let status = Paragraph::new(status_text).style(status_style);
            frame.render_widget(status, layout.status_area);

            match state.active_view {
                ActiveView::SettingsMenu => {
                    frame.render_widget(
                        popup::SettingsPopup {
                            selected: state.settings_selected,
                            state: &state,
                        },
                        frame.area(),
                    );
                }
                ActiveView::ControlsSubmenu => {
                    frame.render_widget(
                        popup::ControlsPopup {
                            config: &state.config,
                            selected: state.controls_selected,
                            awaiting_rebind: state.awaiting_rebind,
                        },
                        frame.area(),
                    );
                }
                ActiveView::Outline => {}
            }
        })?;

        let Some(event) = events.recv().await else {
            break;
        };
        match event {
            AppEvent::Key(k) => handler::handle_key(&mut state, k),
            AppEvent::Mouse(m) => handler::handle_mouse(&mut state, m),
            AppEvent::Resize(_, _) => {}
        }

        if state.should_quit {
            break;
        }
    }

    // ── teardown ──────────────────────────────────────────────
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    Ok(())
}
