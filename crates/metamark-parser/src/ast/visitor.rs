use crate::ast::{Node, NodeKind};
use anyhow::Result;

/// Visitor over a document tree. Default implementations walk the whole tree, so implementors
/// only override the methods they care about. Every hook gets mutable access, which makes the
/// same trait usable for inspection and for in-place rewrites.
pub trait NodeVisitor {
    fn walk_nodes(&mut self, nodes: &mut [Node]) -> Result<()> {
        nodes.iter_mut().try_for_each(|n| self.visit_node(n))
    }

    fn walk_node(&mut self, node: &mut Node) -> Result<()> {
        match node.kind {
            NodeKind::Heading => self.visit_heading(node),
            NodeKind::Paragraph => self.visit_paragraph(node),
            NodeKind::Comment => self.visit_comment(node),
            NodeKind::Component | NodeKind::Annotation => self.visit_block(node),
            _ => self.visit_children(node),
        }
    }

    fn visit_node(&mut self, node: &mut Node) -> Result<()> {
        self.walk_node(node)
    }

    fn visit_children(&mut self, node: &mut Node) -> Result<()> {
        self.walk_nodes(&mut node.children)
    }

    fn visit_heading(&mut self, _node: &mut Node) -> Result<()> {
        Ok(())
    }

    fn visit_paragraph(&mut self, _node: &mut Node) -> Result<()> {
        Ok(())
    }

    fn visit_comment(&mut self, _node: &mut Node) -> Result<()> {
        Ok(())
    }

    /// Components and annotations.
    fn visit_block(&mut self, node: &mut Node) -> Result<()> {
        self.visit_children(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Upper;

    impl NodeVisitor for Upper {
        fn visit_paragraph(&mut self, node: &mut Node) -> Result<()> {
            node.text = node.text.as_ref().map(|t| t.to_uppercase());
            Ok(())
        }
    }

    #[derive(Default)]
    struct BlockNames(Vec<String>);

    impl NodeVisitor for BlockNames {
        fn visit_block(&mut self, node: &mut Node) -> Result<()> {
            self.0.extend(node.text.clone());
            self.visit_children(node)
        }
    }

    fn sample() -> Node {
        let mut note = Node::new_with_text(NodeKind::Annotation, "note");
        note.add_child(Node::paragraph("inside"));

        let mut root = Node::document();
        root.add_child(Node::paragraph("top"));
        root.add_child(note);
        root.add_child(Node::new_with_text(NodeKind::Component, "table"));
        root
    }

    #[test]
    fn rewrites_nested_paragraphs() {
        let mut root = sample();
        Upper.visit_node(&mut root).unwrap();

        assert_eq!(root.children[0].text(), Some("TOP"));
        assert_eq!(root.children[1].children[0].text(), Some("INSIDE"));
        assert_eq!(root.children[1].text(), Some("note"));
    }

    #[test]
    fn collects_block_names_in_order() {
        let mut root = sample();
        let mut names = BlockNames::default();
        names.visit_node(&mut root).unwrap();

        assert_eq!(names.0, vec!["note", "table"]);
    }
}
