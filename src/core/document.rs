//! Block document loading — turn a nested JSON outline into a [`BlockTree`].
//!
//! The loader is the tree source: it guarantees the dense, acyclic child
//! sequences the row builder relies on.  JSON has no way to express a cycle
//! and `null` array entries are rejected during deserialisation, so a
//! successfully loaded document always satisfies the traversal
//! preconditions.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use super::tree::{BlockMeta, BlockTree};

/// How much of a block's text survives into its row label.
const LABEL_MAX: usize = 60;

// ───────────────────────────────────────── errors ────────────

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("failed to read document: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed document: {0}")]
    Parse(#[from] serde_json::Error),
}

// ───────────────────────────────────────── model ─────────────

/// One block as it appears in the document file.
#[derive(Debug, Clone, Deserialize)]
pub struct BlockSpec {
    /// Block kind, e.g. `"heading"`, `"paragraph"`, `"group"`.
    pub kind: String,
    /// Optional content snippet used for the row label.
    #[serde(default)]
    pub text: Option<String>,
    /// Nested blocks, document order.
    #[serde(default)]
    pub children: Vec<BlockSpec>,
}

/// A whole outline document.
#[derive(Debug, Clone, Deserialize)]
pub struct Document {
    /// Shown as the root row's label.
    #[serde(default = "Document::default_title")]
    pub title: String,
    pub blocks: Vec<BlockSpec>,
}

impl Document {
    fn default_title() -> String {
        "Untitled".into()
    }

    /// Load a document from a JSON file.
    pub fn load(path: &Path) -> Result<Self, DocumentError> {
        let contents = std::fs::read_to_string(path)?;
        let doc: Document = serde_json::from_str(&contents)?;
        Ok(doc)
    }

    /// Build the arena tree, with the document itself as the root block.
    pub fn into_tree(self) -> BlockTree {
        let mut tree = BlockTree::new(BlockMeta::new("document", self.title.clone()));
        let root = tree.root();
        for block in &self.blocks {
            attach(&mut tree, root, block);
        }
        tree
    }

    /// Built-in demo outline used when no file is given on the command
    /// line.  Deep enough to exercise collapsing, selection branches, and
    /// windowed scrolling.
    pub fn sample() -> Self {
        let json = include_str!("sample.json");
        serde_json::from_str(json).expect("embedded sample document is valid")
    }
}

fn attach(tree: &mut BlockTree, parent: super::tree::BlockId, spec: &BlockSpec) {
    let id = tree.add_child(parent, BlockMeta::new(spec.kind.clone(), label_for(spec)));
    for child in &spec.children {
        attach(tree, id, child);
    }
}

/// Derive the row label: the text snippet when present, else the kind.
fn label_for(spec: &BlockSpec) -> String {
    match spec.text.as_deref().map(str::trim) {
        Some(text) if !text.is_empty() => {
            if text.chars().count() > LABEL_MAX {
                let cut: String = text.chars().take(LABEL_MAX).collect();
                format!("{cut}…")
            } else {
                text.to_string()
            }
        }
        _ => spec.kind.clone(),
    }
}

// ───────────────────────────────────────── tests ─────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_document_builds_matching_tree() {
        let doc: Document = serde_json::from_str(
            r#"{
                "title": "Draft",
                "blocks": [
                    { "kind": "heading", "text": "Intro" },
                    { "kind": "group", "children": [
                        { "kind": "paragraph", "text": "inner" }
                    ]}
                ]
            }"#,
        )
        .unwrap();

        let tree = doc.into_tree();
        assert_eq!(tree.len(), 4);

        let root = tree.get(tree.root());
        assert_eq!(root.meta.label, "Draft");
        assert_eq!(root.children.len(), 2);

        let group = tree.get(root.children[1]);
        assert_eq!(group.meta.kind, "group");
        assert_eq!(group.meta.label, "group");
        assert_eq!(group.children.len(), 1);
        assert_eq!(tree.get(group.children[0]).meta.label, "inner");
    }

    #[test]
    fn long_text_is_truncated_for_the_label() {
        let spec = BlockSpec {
            kind: "paragraph".into(),
            text: Some("x".repeat(100)),
            children: Vec::new(),
        };
        let label = label_for(&spec);
        assert_eq!(label.chars().count(), LABEL_MAX + 1);
        assert!(label.ends_with('…'));
    }

    #[test]
    fn missing_title_falls_back() {
        let doc: Document = serde_json::from_str(r#"{ "blocks": [] }"#).unwrap();
        assert_eq!(doc.title, "Untitled");
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = serde_json::from_str::<Document>("{ not json").unwrap_err();
        assert!(err.is_syntax());
    }

    #[test]
    fn sample_document_is_well_formed() {
        let tree = Document::sample().into_tree();
        assert!(tree.len() > 20);
    }

    #[test]
    fn sample_document_rows_are_dense() {
        use std::collections::HashSet;

        use crate::core::render::{ExpandedState, ListRow, RowBuilder};

        let tree = Document::sample().into_tree();
        let expanded = ExpandedState::new();
        let none = HashSet::new();
        let rows = RowBuilder::new(&tree, &expanded, &none, &none).build_rows();

        // Fully expanded, nothing grabbed: one gap-free row per block.
        let positions: Vec<_> = rows.iter().filter_map(ListRow::position).collect();
        assert_eq!(positions, (1..=tree.len()).collect::<Vec<_>>());
    }
}
