//! Custom Ratatui widget that renders the block outline as an indented,
//! collapsible, windowed list.
//!
//! The widget itself stays thin: each frame it asks the viewport provider
//! for a window, hands the immutable view snapshots to
//! [`RowBuilder`], and draws whatever rows come back.

use std::collections::HashSet;

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Scrollbar, ScrollbarOrientation, ScrollbarState, StatefulWidget, Widget},
};

use crate::core::{
    render::{ExpandedState, ListRow, RowBuilder},
    tree::{BlockId, BlockTree},
};

use super::{theme::Theme, viewport};

// ───────────────────────────────────────── state ─────────────

/// Persistent state for the outline widget (cursor position, scroll offset).
#[derive(Debug)]
pub struct OutlineState {
    /// Absolute row position (1-based) the cursor is on.
    pub cursor: usize,
    /// Rows scrolled past above the viewport.
    pub offset: usize,
}

impl Default for OutlineState {
    fn default() -> Self {
        Self { cursor: 1, offset: 0 }
    }
}

impl OutlineState {
    pub fn select_next(&mut self, total: usize) {
        if self.cursor < total {
            self.cursor += 1;
        }
    }

    pub fn select_prev(&mut self) {
        if self.cursor > 1 {
            self.cursor -= 1;
        }
    }

    pub fn select_first(&mut self) {
        self.cursor = 1;
        self.offset = 0;
    }

    pub fn select_last(&mut self, total: usize) {
        self.cursor = total.max(1);
    }

    /// Keep the cursor inside the viewport of `height` rows and the list of
    /// `total` rows.
    pub fn clamp_scroll(&mut self, height: usize, total: usize) {
        if height == 0 || total == 0 {
            return;
        }
        self.cursor = self.cursor.clamp(1, total);
        if self.cursor <= self.offset {
            self.offset = self.cursor - 1;
        } else if self.cursor > self.offset + height {
            self.offset = self.cursor - height;
        }
        // Don't leave a blank tail after rows disappeared (collapse, grab).
        if self.offset + height > total {
            self.offset = total.saturating_sub(height);
        }
    }
}

// ───────────────────────────────────────── widget ────────────

/// The outline widget itself — created fresh each frame.
pub struct OutlineWidget<'a> {
    tree: &'a BlockTree,
    expanded: &'a ExpandedState,
    grabbed: &'a HashSet<BlockId>,
    selected: &'a HashSet<BlockId>,
    block: Option<Block<'a>>,
    /// `false` renders the whole list every frame (no window, no padding).
    windowed: bool,
    overscan: usize,
    show_appender: bool,
}

impl<'a> OutlineWidget<'a> {
    pub fn new(
        tree: &'a BlockTree,
        expanded: &'a ExpandedState,
        grabbed: &'a HashSet<BlockId>,
        selected: &'a HashSet<BlockId>,
    ) -> Self {
        Self {
            tree,
            expanded,
            grabbed,
            selected,
            block: None,
            windowed: true,
            overscan: 0,
            show_appender: false,
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    pub fn windowed(mut self, windowed: bool) -> Self {
        self.windowed = windowed;
        self
    }

    pub fn overscan(mut self, overscan: usize) -> Self {
        self.overscan = overscan;
        self
    }

    pub fn show_appender(mut self, show: bool) -> Self {
        self.show_appender = show;
        self
    }

    fn builder(&self) -> RowBuilder<'a> {
        RowBuilder::new(self.tree, self.expanded, self.grabbed, self.selected)
            .show_appender(self.show_appender)
    }

    fn row_line(&self, row: &ListRow, cursor: usize) -> Line<'_> {
        match row {
            ListRow::Block {
                id,
                position,
                level,
                is_expanded,
                is_selected,
                is_branch_selected,
                is_last_of_selected_branch,
                is_grabbed,
                ..
            } => {
                let node = self.tree.get(*id);
                let indent = "  ".repeat(level - 1);
                let glyph = match is_expanded {
                    Some(true) => "▼ ",
                    Some(false) => "▶ ",
                    None => "  ",
                };

                let is_cursor = !is_grabbed && *position == cursor;
                let mut style = if is_cursor {
                    Theme::cursor_style()
                } else if *is_grabbed {
                    Theme::grabbed_style()
                } else if *is_selected {
                    Theme::selected_style()
                } else if *is_branch_selected {
                    Theme::branch_selected_style()
                } else if is_expanded.is_some() {
                    Theme::container_style()
                } else {
                    Theme::block_style()
                };
                if *is_last_of_selected_branch {
                    style = style.add_modifier(ratatui::style::Modifier::UNDERLINED);
                }

                let mut spans = vec![
                    Span::raw(indent),
                    Span::styled(format!("{glyph}{}", node.meta.label), style),
                ];
                if node.meta.label != node.meta.kind {
                    let kind_style = if is_cursor {
                        Theme::cursor_style()
                    } else {
                        Theme::kind_style()
                    };
                    spans.push(Span::styled(format!("  {}", node.meta.kind), kind_style));
                }
                if *is_grabbed {
                    spans.push(Span::styled("  (moving)", Theme::grabbed_style()));
                }
                Line::from(spans)
            }
            ListRow::Appender { level, .. } => {
                let indent = "  ".repeat(*level - 1);
                Line::from(vec![
                    Span::raw(indent),
                    Span::styled("+ Add block", Theme::appender_style()),
                ])
            }
        }
    }
}

impl<'a> StatefulWidget for OutlineWidget<'a> {
    type State = OutlineState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        // Resolve the inner area (inside the optional block border).
        let inner = if let Some(ref block) = self.block {
            let inner = block.inner(area);
            block.clone().render(area, buf);
            inner
        } else {
            area
        };
        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let builder = self.builder();
        let total = builder.total_rows();
        let height = inner.height as usize;
        state.clamp_scroll(height, total);

        let window = self
            .windowed
            .then(|| viewport::visible_window(state.offset, height, self.overscan, total));
        let rows = self.builder().window(window).build_rows();

        // Draw in emission order.  Numbered rows land at their position;
        // grabbed rows and appenders consume the next line where they
        // appear, which keeps the move visual continuous.
        let mut y: u16 = 0;
        let mut drawing = false;
        for row in &rows {
            if y >= inner.height {
                break;
            }
            let visible = match row {
                ListRow::Block { position, .. } => *position > state.offset,
                // An appender directly follows its branch; draw it only once
                // its branch rows are on screen.
                ListRow::Appender { .. } => drawing,
            };
            if !visible {
                continue;
            }
            drawing = true;
            let line = self.row_line(row, state.cursor);
            buf.set_line(inner.x, inner.y + y, &line, inner.width);
            y += 1;
        }

        // Scroll geometry: the boundary rows' paddings are the rows hidden
        // above and below the materialised span.
        let hidden_above = rows
            .iter()
            .find_map(|row| match row {
                ListRow::Block {
                    padding: Some(p), ..
                } if p.top > 0 => Some(p.top),
                _ => None,
            })
            .unwrap_or(0);
        let hidden_below = rows
            .iter()
            .rev()
            .find_map(|row| match row {
                ListRow::Block {
                    padding: Some(p), ..
                } if p.bottom > 0 => Some(p.bottom),
                _ => None,
            })
            .unwrap_or(0);
        let materialised = rows
            .iter()
            .filter(|row| matches!(row, ListRow::Block { is_grabbed: false, .. }))
            .count();
        let content_length = hidden_above + materialised + hidden_below;

        if content_length > height {
            let mut scrollbar_state = ScrollbarState::new(content_length).position(state.offset);
            StatefulWidget::render(
                Scrollbar::new(ScrollbarOrientation::VerticalRight),
                area,
                buf,
                &mut scrollbar_state,
            );
        }
    }
}

// ───────────────────────────────────────── tests ─────────────
