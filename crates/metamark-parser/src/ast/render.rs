//! Human-readable tree listing for diagnostics. The format is not stable and should not be parsed.

use crate::ast::Node;
use std::fmt::Write;

const INDENT: &str = "  ";
const MAX_TEXT_WIDTH: usize = 60;

pub fn render_tree(node: &Node, indent: usize) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_tree(node, indent, &mut out);
    out
}

pub fn write_tree<W: Write>(node: &Node, indent: usize, writer: &mut W) -> std::fmt::Result {
    write!(writer, "{}{}(", INDENT.repeat(indent), node.kind)?;
    if let Some(text) = node.text() {
        write!(writer, "text={:?}, ", preview(text))?;
    }
    if node.level > 0 {
        write!(writer, "level={}, ", node.level)?;
    }
    writeln!(writer, "children={})", node.child_count())?;

    for child in &node.children {
        write_tree(child, indent + 1, writer)?;
    }
    Ok(())
}

fn preview(text: &str) -> String {
    if text.chars().count() <= MAX_TEXT_WIDTH {
        text.to_string()
    } else {
        let mut short: String = text.chars().take(MAX_TEXT_WIDTH).collect();
        short.push('…');
        short
    }
}
