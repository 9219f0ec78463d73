//! In-memory tree data-structure holding the nested block outline.
//!
//! The [`BlockNode`] is the fundamental unit – it holds the display payload
//! of a single block and links to its children via indices into an arena
//! (the [`BlockTree`] struct).  Using an arena avoids recursive `Box`
//! allocations, is cache-friendly, and makes borrowing trivial.
//!
//! The tree stores *structure only*.  Expansion, selection, and grab state
//! live in the view layer and are keyed by [`BlockId`], so the same tree can
//! be traversed under different view snapshots without mutation.

// ───────────────────────────────────────── block payload ─────

/// Display payload carried by each block.  Opaque to the row-building
/// algorithm — only the UI interprets it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockMeta {
    /// Block kind, e.g. `"heading"`, `"paragraph"`, `"group"`.
    pub kind: String,
    /// Short human-readable label (usually a content snippet).
    pub label: String,
}

impl BlockMeta {
    pub fn new(kind: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            label: label.into(),
        }
    }
}

// ───────────────────────────────────────── tree node ─────────

/// Index into [`BlockTree::nodes`].  Stable for the lifetime of the tree —
/// structural moves reorder child lists but never reassign ids.
pub type BlockId = usize;

/// A single block in the arena-allocated tree.
#[derive(Debug, Clone)]
pub struct BlockNode {
    pub meta: BlockMeta,
    pub parent: Option<BlockId>,
    /// Ordered child ids — document order is meaningful.
    pub children: Vec<BlockId>,
}

// ───────────────────────────────────────── arena tree ────────

/// Arena-backed block tree.
///
/// Nodes are stored in a flat `Vec` and reference each other by index, which
/// avoids recursive ownership and makes traversal cheap.  The structure is
/// acyclic by construction: children are only ever attached below an
/// existing node, and [`BlockTree::move_after`] refuses moves into a node's
/// own subtree.
#[derive(Debug, Clone)]
pub struct BlockTree {
    nodes: Vec<BlockNode>,
    root: BlockId,
}

impl BlockTree {
    /// Create a new tree with a single root block.
    pub fn new(root_meta: BlockMeta) -> Self {
        let root = BlockNode {
            meta: root_meta,
            parent: None,
            children: Vec::new(),
        };
        Self {
            nodes: vec![root],
            root: 0,
        }
    }

    /// The root block id.
    pub fn root(&self) -> BlockId {
        self.root
    }

    /// Total number of blocks, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Add a child under `parent_id` and return its [`BlockId`].
    pub fn add_child(&mut self, parent_id: BlockId, meta: BlockMeta) -> BlockId {
        let id = self.nodes.len();
        self.nodes.push(BlockNode {
            meta,
            parent: Some(parent_id),
            children: Vec::new(),
        });
        self.nodes[parent_id].children.push(id);
        id
    }

    /// Return a reference to a block.
    pub fn get(&self, id: BlockId) -> &BlockNode {
        &self.nodes[id]
    }

    /// Return a mutable reference to a block.
    pub fn get_mut(&mut self, id: BlockId) -> &mut BlockNode {
        &mut self.nodes[id]
    }

    /// `true` when `ancestor` lies on the parent chain of `id` (a block is
    /// not its own ancestor).
    pub fn is_ancestor(&self, ancestor: BlockId, id: BlockId) -> bool {
        let mut current = self.nodes[id].parent;
        while let Some(p) = current {
            if p == ancestor {
                return true;
            }
            current = self.nodes[p].parent;
        }
        false
    }

    // ── structural moves ────────────────────────────────────────

    /// Unlink `id` from its parent's child list.  The node and its subtree
    /// stay in the arena, ready to be re-inserted.  The root cannot be
    /// detached.
    fn detach(&mut self, id: BlockId) {
        let Some(parent) = self.nodes[id].parent else {
            return;
        };
        self.nodes[parent].children.retain(|&c| c != id);
        self.nodes[id].parent = None;
    }

    /// Re-insert a detached `id` directly after `sibling` in the sibling's
    /// parent child list.
    fn insert_after(&mut self, id: BlockId, sibling: BlockId) {
        let Some(parent) = self.nodes[sibling].parent else {
            return;
        };
        let at = self.nodes[parent]
            .children
            .iter()
            .position(|&c| c == sibling)
            .map(|i| i + 1)
            .unwrap_or(self.nodes[parent].children.len());
        self.nodes[parent].children.insert(at, id);
        self.nodes[id].parent = Some(parent);
    }

    /// Re-insert a detached `id` as the first child of `parent`.
    fn insert_first_child(&mut self, id: BlockId, parent: BlockId) {
        self.nodes[parent].children.insert(0, id);
        self.nodes[id].parent = Some(parent);
    }

    /// Move `id` (with its whole subtree) so it follows `target` as a
    /// sibling — or becomes the first child when `target` is the root.
    ///
    /// Returns `false` without mutating when the move would create a cycle
    /// (target inside `id`'s subtree), target the node itself, or move the
    /// root.
    pub fn move_after(&mut self, id: BlockId, target: BlockId) -> bool {
        if id == self.root || id == target || self.is_ancestor(id, target) {
            return false;
        }
        self.detach(id);
        if target == self.root {
            self.insert_first_child(id, self.root);
        } else {
            self.insert_after(id, target);
        }
        true
    }
}

// ───────────────────────────────────────── tests ─────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(label: &str) -> BlockMeta {
        BlockMeta::new("paragraph", label)
    }

    fn sample() -> (BlockTree, BlockId, BlockId, BlockId) {
        // root ── a ── a1
        //      └─ b
        let mut tree = BlockTree::new(BlockMeta::new("document", "doc"));
        let a = tree.add_child(tree.root(), meta("a"));
        let a1 = tree.add_child(a, meta("a1"));
        let b = tree.add_child(tree.root(), meta("b"));
        (tree, a, a1, b)
    }

    #[test]
    fn add_child_links_both_directions() {
        let (tree, a, a1, b) = sample();
        assert_eq!(tree.get(tree.root()).children, vec![a, b]);
        assert_eq!(tree.get(a1).parent, Some(a));
        assert_eq!(tree.len(), 4);
    }

    #[test]
    fn is_ancestor_walks_parent_chain() {
        let (tree, a, a1, b) = sample();
        assert!(tree.is_ancestor(tree.root(), a1));
        assert!(tree.is_ancestor(a, a1));
        assert!(!tree.is_ancestor(b, a1));
        assert!(!tree.is_ancestor(a1, a1));
    }

    #[test]
    fn move_after_reorders_siblings() {
        let (mut tree, a, _, b) = sample();
        assert!(tree.move_after(a, b));
        assert_eq!(tree.get(tree.root()).children, vec![b, a]);
        assert_eq!(tree.get(a).parent, Some(tree.root()));
    }

    #[test]
    fn move_after_root_target_prepends() {
        let (mut tree, a, a1, b) = sample();
        assert!(tree.move_after(b, tree.root()));
        assert_eq!(tree.get(tree.root()).children, vec![b, a]);
        // Subtree of `a` untouched.
        assert_eq!(tree.get(a).children, vec![a1]);
    }

    #[test]
    fn move_into_own_subtree_is_refused() {
        let (mut tree, a, a1, _) = sample();
        assert!(!tree.move_after(a, a1));
        // Structure unchanged.
        assert_eq!(tree.get(a).children, vec![a1]);
        assert_eq!(tree.get(a).parent, Some(tree.root()));
    }

    #[test]
    fn root_cannot_move() {
        let (mut tree, a, _, _) = sample();
        let root = tree.root();
        assert!(!tree.move_after(root, a));
    }
}
