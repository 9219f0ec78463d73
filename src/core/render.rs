//! Windowed row building — flatten the block tree into the list rows a
//! viewport actually needs.
//!
//! Every block that is reachable through expanded ancestors owns one
//! *absolute row position* (1-based, document order).  Positions depend only
//! on tree shape, expansion state, and the grabbed set — never on the
//! window.  The window merely decides which already-numbered rows are
//! materialised, and carries the padding that stands in for the rows it
//! skipped so scroll geometry stays intact.
//!
//! The whole module is pure: [`RowBuilder`] reads immutable snapshots and
//! produces output with no shared state, so the UI can re-run it on every
//! frame with fresh inputs.

use std::collections::{HashMap, HashSet};

use super::tree::{BlockId, BlockTree};

// ───────────────────────────────────────── expansion state ───

/// Per-block expansion flags, kept outside the tree so a traversal can run
/// against any snapshot.  Blocks without an entry are treated as expanded.
#[derive(Debug, Clone, Default)]
pub struct ExpandedState {
    flags: HashMap<BlockId, bool>,
}

impl ExpandedState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expansion flag for `id`; defaults to `true` when never touched.
    pub fn is_expanded(&self, id: BlockId) -> bool {
        self.flags.get(&id).copied().unwrap_or(true)
    }

    pub fn set(&mut self, id: BlockId, expanded: bool) {
        self.flags.insert(id, expanded);
    }

    pub fn toggle(&mut self, id: BlockId) {
        let current = self.is_expanded(id);
        self.flags.insert(id, !current);
    }

    /// Forget all explicit flags — everything reverts to expanded.
    pub fn expand_all(&mut self) {
        self.flags.clear();
    }

    /// Explicitly collapse every given block.
    pub fn collapse_all<I: IntoIterator<Item = BlockId>>(&mut self, ids: I) {
        for id in ids {
            self.flags.insert(id, false);
        }
    }
}

// ───────────────────────────────────────── window ────────────

/// The contiguous range of absolute row positions the viewport wants
/// materialised, plus the space reserved for the rows skipped on either
/// side.
///
/// `start` and `end` are **inclusive** positions: a row is in view when
/// `start <= position <= end`.  Top padding attaches to the row at exactly
/// `start`, bottom padding to the row at exactly `end`.  Immutable for the
/// duration of one traversal; the viewport provider recomputes it per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListWindow {
    pub start: usize,
    pub end: usize,
    /// Rows hidden above `start`, in row-height units.
    pub start_padding: usize,
    /// Rows hidden below `end`, in row-height units.
    pub end_padding: usize,
}

impl ListWindow {
    pub fn contains(&self, position: usize) -> bool {
        self.start <= position && position <= self.end
    }
}

/// Edge padding carried by a row that touches a window boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RowPadding {
    pub top: usize,
    pub bottom: usize,
}

// ───────────────────────────────────────── row model ─────────

/// One row of the flattened list.
#[derive(Debug, Clone, PartialEq)]
pub enum ListRow {
    Block {
        id: BlockId,
        /// Absolute 1-based position within the fully expanded,
        /// grab-filtered tree.
        position: usize,
        /// Nesting level, displayed root = 1.
        level: usize,
        /// 1-based slot among the siblings of this branch.
        sibling_index: usize,
        /// Rows in this branch, appender included.
        sibling_count: usize,
        /// `Some` only for blocks with a nested branch.
        is_expanded: Option<bool>,
        is_selected: bool,
        /// Set on every row inside a selected branch.
        is_branch_selected: bool,
        /// Terminal row of a selected branch — styling hook only.
        is_last_of_selected_branch: bool,
        /// Grabbed rows render regardless of the window so the move visual
        /// stays continuous.
        is_grabbed: bool,
        /// Present only on the rows at the window boundary.
        padding: Option<RowPadding>,
    },
    /// Synthetic trailing "add a block here" row under a selected parent.
    Appender {
        parent: BlockId,
        level: usize,
        sibling_index: usize,
        sibling_count: usize,
    },
}

impl ListRow {
    /// Absolute position of a block row; appenders are presentational and
    /// carry none.
    pub fn position(&self) -> Option<usize> {
        match self {
            ListRow::Block { position, .. } => Some(*position),
            ListRow::Appender { .. } => None,
        }
    }

    pub fn block_id(&self) -> Option<BlockId> {
        match self {
            ListRow::Block { id, .. } => Some(*id),
            ListRow::Appender { .. } => None,
        }
    }
}

// ───────────────────────────────────────── counting ──────────

/// Rows the subtree rooted at `id` would occupy if fully rendered.
///
/// Grabbed blocks contribute 0 for themselves and their whole subtree.
/// Collapsed blocks contribute exactly 1 — children are not counted.
/// This is the building block for running row offsets: the position of
/// sibling `i` is the position of sibling `i-1` plus this count.
pub fn count_subtree_rows(
    tree: &BlockTree,
    id: BlockId,
    expanded: &ExpandedState,
    grabbed: &HashSet<BlockId>,
) -> usize {
    if grabbed.contains(&id) {
        return 0;
    }
    if !expanded.is_expanded(id) {
        return 1;
    }
    1 + tree
        .get(id)
        .children
        .iter()
        .map(|&child| count_subtree_rows(tree, child, expanded, grabbed))
        .sum::<usize>()
}

// ───────────────────────────────────────── row builder ───────

/// Builds the flat row list for one frame.
///
/// Holds immutable snapshots of everything a traversal reads; create one
/// per frame (cheap — all references) and call [`RowBuilder::build_rows`].
pub struct RowBuilder<'a> {
    tree: &'a BlockTree,
    expanded: &'a ExpandedState,
    /// Blocks currently being moved — excluded from counting, still drawn.
    grabbed: &'a HashSet<BlockId>,
    selected: &'a HashSet<BlockId>,
    /// `None` disables windowing: every row is in view, no padding.
    window: Option<ListWindow>,
    show_appender: bool,
}

impl<'a> RowBuilder<'a> {
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
            window: None,
            show_appender: false,
        }
    }

    /// Restrict materialisation to `window`.
    pub fn window(mut self, window: Option<ListWindow>) -> Self {
        self.window = window;
        self
    }

    /// Enable appender rows under selected parents.
    pub fn show_appender(mut self, show: bool) -> Self {
        self.show_appender = show;
        self
    }

    /// Total rows of the whole list (the displayed root's subtree).
    pub fn total_rows(&self) -> usize {
        count_subtree_rows(self.tree, self.tree.root(), self.expanded, self.grabbed)
    }

    /// Build the row list, root first at position 1.
    pub fn build_rows(&self) -> Vec<ListRow> {
        let mut rows = Vec::new();
        let roots = [self.tree.root()];
        self.branch(&roots, None, 1, 1, false, false, &mut rows);
        rows
    }

    /// Whether the child slot under `parent` ends in an appender row.
    /// The top-level sibling list (`parent == None`) never gets one.
    fn slot_has_appender(&self, parent: Option<BlockId>) -> bool {
        self.show_appender && parent.is_some_and(|id| self.selected.contains(&id))
    }

    /// Walk one sibling list, emitting rows in document order.
    ///
    /// `start_position` is the absolute position of the first sibling;
    /// later siblings derive theirs by adding the previous sibling's
    /// subtree count, so no branch needs to materialise another branch's
    /// rows to know where it starts.
    #[allow(clippy::too_many_arguments)]
    fn branch(
        &self,
        siblings: &[BlockId],
        parent: Option<BlockId>,
        level: usize,
        start_position: usize,
        branch_selected: bool,
        last_of_branch: bool,
        out: &mut Vec<ListRow>,
    ) {
        let has_appender = self.slot_has_appender(parent);
        let block_count = siblings.len();
        let row_count = if has_appender {
            block_count + 1
        } else {
            block_count
        };
        let moving = !self.grabbed.is_empty();
        let mut position = start_position;

        for (index, &id) in siblings.iter().enumerate() {
            if index > 0 {
                position +=
                    count_subtree_rows(self.tree, siblings[index - 1], self.expanded, self.grabbed);
            }

            let in_view = match self.window {
                None => true,
                Some(window) => window.contains(position),
            };
            if let Some(window) = self.window {
                // Positions grow monotonically in document order, so once a
                // row lands past the window's trailing edge no later sibling
                // can be in view.  Grab mode keeps walking: grabbed rows are
                // emitted wherever they sit.
                if !moving && !in_view && position > window.start {
                    break;
                }
            }

            let padding = self.window.and_then(|window| {
                if position != window.start && position != window.end {
                    return None;
                }
                Some(RowPadding {
                    top: if position == window.start {
                        window.start_padding
                    } else {
                        0
                    },
                    bottom: if position == window.end {
                        window.end_padding
                    } else {
                        0
                    },
                })
            });

            let node = self.tree.get(id);
            let is_grabbed = self.grabbed.contains(&id);
            let has_children = !node.children.is_empty();
            let has_nested_branch = has_children || self.slot_has_appender(Some(id));
            let is_selected = self.selected.contains(&id);
            let selected_branch = branch_selected || (is_selected && has_nested_branch);
            let is_last_block = index + 1 == block_count;
            let is_last = is_selected || (last_of_branch && is_last_block);
            let is_last_of_selected_branch = last_of_branch && !has_nested_branch && is_last_block;
            let is_expanded = has_nested_branch.then(|| self.expanded.is_expanded(id));

            if is_grabbed || in_view {
                out.push(ListRow::Block {
                    id,
                    position,
                    level,
                    sibling_index: index + 1,
                    sibling_count: row_count,
                    is_expanded,
                    is_selected,
                    is_branch_selected: selected_branch,
                    is_last_of_selected_branch,
                    is_grabbed,
                    padding,
                });
            }

            if has_nested_branch && is_expanded == Some(true) && !is_grabbed {
                self.branch(
                    &node.children,
                    Some(id),
                    level + 1,
                    position + 1,
                    selected_branch,
                    is_last,
                    out,
                );
            }
        }

        if has_appender {
            out.push(ListRow::Appender {
                parent: parent.expect("top-level slot never has an appender"),
                level,
                sibling_index: row_count,
                sibling_count: row_count,
            });
        }
    }
}

// ───────────────────────────────────────── tests ─────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::tree::BlockMeta;

    fn meta(kind: &str, label: &str) -> BlockMeta {
        BlockMeta::new(kind, label)
    }

    /// root ── c1
    ///      ├─ c2 ── g1
    ///      │     └─ g2
    ///      └─ c3
    fn nested_tree() -> (BlockTree, [BlockId; 5]) {
        let mut tree = BlockTree::new(meta("document", "doc"));
        let c1 = tree.add_child(tree.root(), meta("paragraph", "one"));
        let c2 = tree.add_child(tree.root(), meta("group", "two"));
        let g1 = tree.add_child(c2, meta("paragraph", "two.a"));
        let g2 = tree.add_child(c2, meta("paragraph", "two.b"));
        let c3 = tree.add_child(tree.root(), meta("paragraph", "three"));
        (tree, [c1, c2, g1, g2, c3])
    }

    /// Scenario tree: root with three flat children.
    fn flat_tree() -> (BlockTree, [BlockId; 3]) {
        let mut tree = BlockTree::new(meta("document", "doc"));
        let a = tree.add_child(tree.root(), meta("paragraph", "a"));
        let b = tree.add_child(tree.root(), meta("paragraph", "b"));
        let c = tree.add_child(tree.root(), meta("paragraph", "c"));
        (tree, [a, b, c])
    }

    fn no_ids() -> HashSet<BlockId> {
        HashSet::new()
    }

    fn positions(rows: &[ListRow]) -> Vec<usize> {
        rows.iter().filter_map(ListRow::position).collect()
    }

    fn levels(rows: &[ListRow]) -> Vec<usize> {
        rows.iter()
            .filter_map(|row| match row {
                ListRow::Block { level, .. } => Some(*level),
                ListRow::Appender { .. } => None,
            })
            .collect()
    }

    // ── counting ────────────────────────────────────────────────

    #[test]
    fn fully_expanded_count_equals_node_count() {
        let (tree, _) = nested_tree();
        let expanded = ExpandedState::new();
        let count = count_subtree_rows(&tree, tree.root(), &expanded, &no_ids());
        assert_eq!(count, tree.len());
    }

    #[test]
    fn collapsing_removes_exactly_the_descendants() {
        let (tree, [_, c2, ..]) = nested_tree();
        let mut expanded = ExpandedState::new();
        let full = count_subtree_rows(&tree, tree.root(), &expanded, &no_ids());

        expanded.set(c2, false);
        let collapsed = count_subtree_rows(&tree, tree.root(), &expanded, &no_ids());
        // c2 has two descendants.
        assert_eq!(full - collapsed, 2);
    }

    #[test]
    fn leaf_counts_one_expanded_or_collapsed() {
        let (tree, [c1, ..]) = nested_tree();
        let mut expanded = ExpandedState::new();
        assert_eq!(count_subtree_rows(&tree, c1, &expanded, &no_ids()), 1);
        expanded.set(c1, false);
        assert_eq!(count_subtree_rows(&tree, c1, &expanded, &no_ids()), 1);
    }

    #[test]
    fn grabbing_removes_the_whole_subtree_count() {
        let (tree, [_, c2, ..]) = nested_tree();
        let expanded = ExpandedState::new();
        let full = count_subtree_rows(&tree, tree.root(), &expanded, &no_ids());
        let subtree = count_subtree_rows(&tree, c2, &expanded, &no_ids());

        let grabbed: HashSet<_> = [c2].into();
        let without = count_subtree_rows(&tree, tree.root(), &expanded, &grabbed);
        assert_eq!(full - without, subtree);
    }

    // ── positions ───────────────────────────────────────────────

    #[test]
    fn unwindowed_positions_are_gap_free() {
        let (tree, _) = nested_tree();
        let expanded = ExpandedState::new();
        let grabbed = no_ids();
        let selected = no_ids();
        let builder = RowBuilder::new(&tree, &expanded, &grabbed, &selected);

        let rows = builder.build_rows();
        let total = builder.total_rows();
        assert_eq!(positions(&rows), (1..=total).collect::<Vec<_>>());
    }

    #[test]
    fn positions_do_not_depend_on_the_window() {
        let (tree, _) = nested_tree();
        let expanded = ExpandedState::new();
        let grabbed = no_ids();
        let selected = no_ids();
        let builder = RowBuilder::new(&tree, &expanded, &grabbed, &selected);
        let all: Vec<_> = builder.build_rows();

        for start in 1..=all.len() {
            for end in start..=all.len() {
                let window = ListWindow {
                    start,
                    end,
                    start_padding: 0,
                    end_padding: 0,
                };
                let windowed = RowBuilder::new(&tree, &expanded, &grabbed, &selected)
                    .window(Some(window))
                    .build_rows();
                for row in &windowed {
                    let position = row.position().unwrap();
                    assert!(window.contains(position));
                    // Same block at the same position as the full render.
                    let full = all
                        .iter()
                        .find(|r| r.position() == Some(position))
                        .unwrap();
                    assert_eq!(full.block_id(), row.block_id());
                }
            }
        }
    }

    #[test]
    fn full_width_window_matches_unwindowed_output() {
        let (tree, _) = nested_tree();
        let expanded = ExpandedState::new();
        let grabbed = no_ids();
        let selected = no_ids();
        let builder = RowBuilder::new(&tree, &expanded, &grabbed, &selected);
        let total = builder.total_rows();

        let unwindowed = positions(&builder.build_rows());
        let windowed = RowBuilder::new(&tree, &expanded, &grabbed, &selected)
            .window(Some(ListWindow {
                start: 1,
                end: total,
                start_padding: 0,
                end_padding: 0,
            }))
            .build_rows();
        assert_eq!(positions(&windowed), unwindowed);
    }

    // ── padding ─────────────────────────────────────────────────

    #[test]
    fn padding_attaches_only_at_window_boundaries() {
        let (tree, _) = nested_tree();
        let expanded = ExpandedState::new();
        let grabbed = no_ids();
        let selected = no_ids();
        let window = ListWindow {
            start: 2,
            end: 4,
            start_padding: 7,
            end_padding: 9,
        };
        let rows = RowBuilder::new(&tree, &expanded, &grabbed, &selected)
            .window(Some(window))
            .build_rows();

        let mut tops = 0;
        let mut bottoms = 0;
        for row in &rows {
            if let ListRow::Block {
                position, padding, ..
            } = row
            {
                match padding {
                    Some(p) if p.top > 0 => {
                        assert_eq!(*position, window.start);
                        assert_eq!(p.top, 7);
                        tops += 1;
                    }
                    Some(p) if p.bottom > 0 => {
                        assert_eq!(*position, window.end);
                        assert_eq!(p.bottom, 9);
                        bottoms += 1;
                    }
                    Some(_) => panic!("zero padding emitted away from a boundary"),
                    None => {}
                }
            }
        }
        assert_eq!(tops, 1);
        assert_eq!(bottoms, 1);
    }

    #[test]
    fn no_padding_when_windowing_is_disabled() {
        let (tree, _) = nested_tree();
        let expanded = ExpandedState::new();
        let grabbed = no_ids();
        let selected = no_ids();
        let rows = RowBuilder::new(&tree, &expanded, &grabbed, &selected).build_rows();
        for row in &rows {
            if let ListRow::Block { padding, .. } = row {
                assert_eq!(*padding, None);
            }
        }
    }

    // ── scenarios ───────────────────────────────────────────────

    #[test]
    fn flat_tree_renders_four_rows() {
        let (tree, _) = flat_tree();
        let expanded = ExpandedState::new();
        let grabbed = no_ids();
        let selected = no_ids();
        let rows = RowBuilder::new(&tree, &expanded, &grabbed, &selected).build_rows();

        assert_eq!(positions(&rows), vec![1, 2, 3, 4]);
        assert_eq!(levels(&rows), vec![1, 2, 2, 2]);
    }

    #[test]
    fn collapsed_branch_skips_grandchildren() {
        let (tree, [_, c2, ..]) = nested_tree();
        let mut expanded = ExpandedState::new();
        expanded.set(c2, false);
        let grabbed = no_ids();
        let selected = no_ids();
        let builder = RowBuilder::new(&tree, &expanded, &grabbed, &selected);
        let rows = builder.build_rows();

        // root, one, two (collapsed), three — the grandchildren are gone.
        assert_eq!(builder.total_rows(), 4);
        assert_eq!(positions(&rows), vec![1, 2, 3, 4]);
        assert!(rows.iter().all(|r| {
            r.block_id() != Some(tree.get(c2).children[0])
                && r.block_id() != Some(tree.get(c2).children[1])
        }));
    }

    #[test]
    fn grabbed_block_is_drawn_but_unnumbered() {
        let (tree, [c1, c2, _, _, c3]) = nested_tree();
        let expanded = ExpandedState::new();
        let grabbed: HashSet<_> = [c2].into();
        let selected = no_ids();
        let builder = RowBuilder::new(&tree, &expanded, &grabbed, &selected);

        // root + c1 + c3: the grabbed subtree occupies no numbered slot.
        assert_eq!(builder.total_rows(), 3);

        let rows = builder.build_rows();
        let grabbed_row = rows
            .iter()
            .find(|r| r.block_id() == Some(c2))
            .expect("grabbed block still renders");
        assert!(matches!(grabbed_row, ListRow::Block { is_grabbed: true, .. }));
        // Its children never render while grabbed.
        assert!(!rows.iter().any(|r| r.block_id() == Some(tree.get(c2).children[0])));

        // c3 slides into the slot c2 vacated.
        let c1_pos = rows.iter().find(|r| r.block_id() == Some(c1)).unwrap();
        let c3_pos = rows.iter().find(|r| r.block_id() == Some(c3)).unwrap();
        assert_eq!(c1_pos.position(), Some(2));
        assert_eq!(c3_pos.position(), Some(3));
    }

    #[test]
    fn grabbed_block_renders_even_outside_the_window() {
        let (tree, [_, c2, ..]) = nested_tree();
        let expanded = ExpandedState::new();
        let grabbed: HashSet<_> = [c2].into();
        let selected = no_ids();
        let rows = RowBuilder::new(&tree, &expanded, &grabbed, &selected)
            .window(Some(ListWindow {
                start: 1,
                end: 1,
                start_padding: 0,
                end_padding: 2,
            }))
            .build_rows();
        assert!(rows.iter().any(|r| r.block_id() == Some(c2)));
    }

    #[test]
    fn single_row_window_carries_both_paddings() {
        let (tree, _) = flat_tree();
        let expanded = ExpandedState::new();
        let grabbed = no_ids();
        let selected = no_ids();
        let rows = RowBuilder::new(&tree, &expanded, &grabbed, &selected)
            .window(Some(ListWindow {
                start: 2,
                end: 2,
                start_padding: 10,
                end_padding: 20,
            }))
            .build_rows();

        assert_eq!(rows.len(), 1);
        let ListRow::Block {
            position, padding, ..
        } = &rows[0]
        else {
            panic!("expected a block row");
        };
        assert_eq!(*position, 2);
        assert_eq!(*padding, Some(RowPadding { top: 10, bottom: 20 }));
    }

    #[test]
    fn two_row_window_splits_the_paddings() {
        let (tree, _) = flat_tree();
        let expanded = ExpandedState::new();
        let grabbed = no_ids();
        let selected = no_ids();
        let rows = RowBuilder::new(&tree, &expanded, &grabbed, &selected)
            .window(Some(ListWindow {
                start: 2,
                end: 3,
                start_padding: 10,
                end_padding: 20,
            }))
            .build_rows();

        assert_eq!(positions(&rows), vec![2, 3]);
        assert_eq!(
            rows[0],
            ListRow::Block {
                id: rows[0].block_id().unwrap(),
                position: 2,
                level: 2,
                sibling_index: 1,
                sibling_count: 3,
                is_expanded: None,
                is_selected: false,
                is_branch_selected: false,
                is_last_of_selected_branch: false,
                is_grabbed: false,
                padding: Some(RowPadding { top: 10, bottom: 0 }),
            }
        );
        let ListRow::Block { padding, .. } = &rows[1] else {
            panic!("expected a block row");
        };
        assert_eq!(*padding, Some(RowPadding { top: 0, bottom: 20 }));
    }

    // ── selection & appender ────────────────────────────────────

    #[test]
    fn branch_selection_flows_to_descendants() {
        let (tree, [_, c2, g1, g2, c3]) = nested_tree();
        let expanded = ExpandedState::new();
        let grabbed = no_ids();
        let selected: HashSet<_> = [c2].into();
        let rows = RowBuilder::new(&tree, &expanded, &grabbed, &selected).build_rows();

        let flag = |id: BlockId| {
            rows.iter()
                .find_map(|row| match row {
                    ListRow::Block {
                        id: rid,
                        is_branch_selected,
                        ..
                    } if *rid == id => Some(*is_branch_selected),
                    _ => None,
                })
                .unwrap()
        };
        assert!(flag(c2));
        assert!(flag(g1));
        assert!(flag(g2));
        assert!(!flag(c3));
    }

    #[test]
    fn last_row_of_selected_branch_is_flagged() {
        let (tree, [_, c2, _, g2, _]) = nested_tree();
        let expanded = ExpandedState::new();
        let grabbed = no_ids();
        let selected: HashSet<_> = [c2].into();
        let rows = RowBuilder::new(&tree, &expanded, &grabbed, &selected).build_rows();

        let flagged: Vec<_> = rows
            .iter()
            .filter_map(|row| match row {
                ListRow::Block {
                    id,
                    is_last_of_selected_branch: true,
                    ..
                } => Some(*id),
                _ => None,
            })
            .collect();
        assert_eq!(flagged, vec![g2]);
    }

    #[test]
    fn appender_trails_the_selected_parents_children() {
        let (tree, [_, c2, ..]) = nested_tree();
        let expanded = ExpandedState::new();
        let grabbed = no_ids();
        let selected: HashSet<_> = [c2].into();
        let rows = RowBuilder::new(&tree, &expanded, &grabbed, &selected)
            .show_appender(true)
            .build_rows();

        let appender_at = rows
            .iter()
            .position(|row| matches!(row, ListRow::Appender { .. }))
            .expect("appender emitted");
        let ListRow::Appender {
            parent,
            level,
            sibling_index,
            sibling_count,
        } = rows[appender_at].clone()
        else {
            unreachable!();
        };
        assert_eq!(parent, c2);
        assert_eq!(level, 3);
        // Two real children plus the appender slot.
        assert_eq!(sibling_index, 3);
        assert_eq!(sibling_count, 3);
        // Directly after the branch's last real row.
        assert_eq!(rows[appender_at - 1].block_id(), Some(tree.get(c2).children[1]));
    }

    #[test]
    fn appender_never_shows_without_a_selected_parent() {
        let (tree, _) = nested_tree();
        let expanded = ExpandedState::new();
        let grabbed = no_ids();
        let selected = no_ids();
        let rows = RowBuilder::new(&tree, &expanded, &grabbed, &selected)
            .show_appender(true)
            .build_rows();
        assert!(!rows.iter().any(|row| matches!(row, ListRow::Appender { .. })));
    }

    #[test]
    fn selected_childless_block_grows_an_appender_branch() {
        let (tree, [c1, ..]) = nested_tree();
        let expanded = ExpandedState::new();
        let grabbed = no_ids();
        let selected: HashSet<_> = [c1].into();
        let rows = RowBuilder::new(&tree, &expanded, &grabbed, &selected)
            .show_appender(true)
            .build_rows();

        // The leaf now has a nested branch consisting of just the appender.
        let appender = rows
            .iter()
            .find_map(|row| match row {
                ListRow::Appender { parent, level, .. } => Some((*parent, *level)),
                _ => None,
            })
            .expect("appender under the selected leaf");
        assert_eq!(appender, (c1, 3));

        // And the leaf itself reports an expandable branch.
        let leaf = rows.iter().find(|r| r.block_id() == Some(c1)).unwrap();
        assert!(matches!(
            leaf,
            ListRow::Block {
                is_expanded: Some(true),
                ..
            }
        ));
    }
}
