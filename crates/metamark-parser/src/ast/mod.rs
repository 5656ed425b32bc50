pub mod render;
pub mod visitor;

use crate::common::Span;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Capacity reserved by the first [Node::add_child] call. The child list grows geometrically from
/// there.
pub const INITIAL_CHILD_CAPACITY: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    Document,
    Metadata,
    Heading,
    Paragraph,
    Component,
    Annotation,
    Comment,
    /// Region meant for encrypted content. Never produced by the parser.
    Secure,
    /// Never produced by the parser.
    Collapsible,
    /// Fenced block in a diagram language such as `mermaid`. The language is the node text.
    Diagram,
    Math,
    /// Fenced block in any other language, or none.
    CodeBlock,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Document => "Document",
            NodeKind::Metadata => "Metadata",
            NodeKind::Heading => "Heading",
            NodeKind::Paragraph => "Paragraph",
            NodeKind::Component => "Component",
            NodeKind::Annotation => "Annotation",
            NodeKind::Comment => "Comment",
            NodeKind::Secure => "Secure",
            NodeKind::Collapsible => "Collapsible",
            NodeKind::Diagram => "Diagram",
            NodeKind::Math => "Math",
            NodeKind::CodeBlock => "CodeBlock",
        }
    }
}

impl Display for NodeKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One syntactic unit of a document. A node exclusively owns its children, so dropping a node
/// releases its whole subtree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Heading depth, `0` for every other kind.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub level: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
    #[serde(default)]
    pub span: Span,
}

fn is_zero(level: &usize) -> bool {
    *level == 0
}

impl Node {
    pub fn new<S: Into<String>>(kind: NodeKind, text: Option<S>) -> Self {
        Self {
            kind,
            text: text.map(Into::into),
            level: 0,
            children: Vec::new(),
            span: Span::default(),
        }
    }

    pub fn new_empty(kind: NodeKind) -> Self {
        Self::new(kind, None::<String>)
    }

    pub fn new_with_text<S: Into<String>>(kind: NodeKind, text: S) -> Self {
        Self::new(kind, Some(text))
    }

    pub fn document() -> Self {
        Self::new_empty(NodeKind::Document)
    }

    pub fn heading<S: Into<String>>(level: usize, text: S) -> Self {
        debug_assert!(level > 0, "heading level starts at 1");
        Self {
            level,
            ..Self::new_with_text(NodeKind::Heading, text)
        }
    }

    pub fn paragraph<S: Into<String>>(text: S) -> Self {
        Self::new_with_text(NodeKind::Paragraph, text)
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Appends `child`, reserving [INITIAL_CHILD_CAPACITY] slots on first use.
    pub fn add_child(&mut self, child: Node) {
        if self.children.capacity() == 0 {
            self.children.reserve_exact(INITIAL_CHILD_CAPACITY);
        }
        self.children.push(child);
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    pub fn is(&self, kind: NodeKind) -> bool {
        self.kind == kind
    }

    /// Depth-first, pre-order traversal of this node and all its descendants.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }
}

pub struct Descendants<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}
