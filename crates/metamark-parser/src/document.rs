use crate::ast::{Node, NodeKind};
use crate::metadata::Metadata;
use serde::Serialize;
use tracing::trace;

/// The result of a successful parse: an ordered metadata table plus the node tree. The table is
/// kept apart from the tree; the raw frontmatter additionally lives on the tree's `Metadata` node.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct Document {
    pub meta: Metadata,
    pub root: Node,
}

impl Document {
    pub(crate) fn new(meta: Metadata, root: Node) -> Self {
        debug_assert_eq!(root.kind, NodeKind::Document);
        Document { meta, root }
    }

    /// Exact-match metadata lookup.
    pub fn get_metadata(&self, key: &str) -> Option<&str> {
        self.meta.get(key)
    }

    /// Top-level nodes in source order, including the frontmatter node if there is one.
    pub fn blocks(&self) -> &[Node] {
        &self.root.children
    }

    /// Top-level nodes after the frontmatter node.
    pub fn content(&self) -> &[Node] {
        match self.root.children.first() {
            Some(first) if first.kind == NodeKind::Metadata => &self.root.children[1..],
            _ => &self.root.children,
        }
    }

    /// Raw frontmatter text, if the document has any.
    pub fn raw_metadata(&self) -> Option<&str> {
        self.root
            .children
            .first()
            .filter(|n| n.kind == NodeKind::Metadata)
            .and_then(Node::text)
    }

    /// Releases the tree and the metadata table. Taking `self` by value makes a second call
    /// impossible.
    pub fn destroy(self) {
        trace!(
            nodes = self.root.descendants().count(),
            "destroying document"
        );
        drop(self);
    }
}
