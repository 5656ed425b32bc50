//! Text produced by the `mmk` subcommands.

use crate::config::OutputFormat;
use crate::loader::LoaderError;
use anyhow::{Context, Result};
use console::style;
use linked_hash_map::LinkedHashMap;
use metamark_parser::{render_tree, tokenize, Document, Metadata, Node, NodeKind, NodeVisitor};
use std::fmt::Write;

/// Counts nodes per kind, in order of first appearance.
#[derive(Debug, Default)]
pub struct KindCounter {
    pub counts: LinkedHashMap<NodeKind, usize>,
}

impl NodeVisitor for KindCounter {
    fn visit_node(&mut self, node: &mut Node) -> anyhow::Result<()> {
        *self.counts.entry(node.kind).or_insert(0) += 1;
        self.walk_node(node)
    }
}

/// Removes comment nodes at every depth.
pub struct CommentStripper;

impl NodeVisitor for CommentStripper {
    fn visit_children(&mut self, node: &mut Node) -> anyhow::Result<()> {
        node.children.retain(|c| !c.is(NodeKind::Comment));
        self.walk_nodes(&mut node.children)
    }
}

pub fn render_document(
    doc: &mut Document,
    format: OutputFormat,
    indent: usize,
    show_comments: bool,
) -> Result<String> {
    if !show_comments {
        CommentStripper.visit_node(&mut doc.root)?;
    }

    match format {
        OutputFormat::Tree => Ok(render_tree(&doc.root, indent)),
        OutputFormat::Json => {
            serde_json::to_string_pretty(doc).context("Could not serialize document:")
        }
    }
}

pub fn render_metadata(meta: &Metadata) -> String {
    let mut out = String::new();
    for (key, value) in meta.iter() {
        let _ = writeln!(out, "{}: {}", style(key).bold(), value);
    }
    out
}

/// One line per coarse token: byte range, kind and the matched text.
pub fn render_tokens(source: &str) -> String {
    let mut out = String::new();
    for token in tokenize(source) {
        let range = token.span.range.clone();
        let _ = writeln!(
            out,
            "{:>5}..{:<5} {:<22} {:?}",
            range.start,
            range.end,
            style(token.kind).cyan(),
            &source[range.clone()]
        );
    }
    out
}

/// Metadata table followed by node counts per kind.
pub fn render_info(doc: &mut Document) -> Result<String> {
    let mut counter = KindCounter::default();
    counter.visit_node(&mut doc.root)?;

    let mut out = String::new();
    let _ = writeln!(out, "{}", style("Metadata").bold().underlined());
    if doc.meta.is_empty() {
        let _ = writeln!(out, "  {}", style("none").dim());
    }
    for (key, value) in doc.meta.iter() {
        let _ = writeln!(out, "  {}: {}", key, value);
    }

    let _ = writeln!(out, "{}", style("Nodes").bold().underlined());
    for (kind, count) in counter.counts.iter() {
        let _ = writeln!(out, "  {:<12} {}", kind.as_str(), count);
    }
    Ok(out)
}

/// Error message with its cause chain, plus the surrounding source for syntax errors.
pub fn render_error(e: &anyhow::Error, margin: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} {}", style("Error:").red().bold(), e);
    for cause in e.chain().skip(1) {
        let _ = writeln!(out, " {} {}", style("caused by:").bold(), cause);
    }

    if let Some(excerpt) = e
        .downcast_ref::<LoaderError>()
        .and_then(|err| err.excerpt(margin))
    {
        let rule = style("-".repeat(60)).blue();
        let _ = writeln!(out, "{}\n{}\n{}", rule, excerpt, rule);
    }
    out
}

/// Process exit status for the outcome of a command.
pub fn exit_status(result: &anyhow::Result<()>) -> u8 {
    match result {
        Ok(()) => 0,
        Err(_) => 1,
    }
}
