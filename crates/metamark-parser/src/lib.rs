//! Scanner, parser and document model for MetaMark, a Markdown-like format with frontmatter
//! metadata, typed components, annotations and comments.
//!
//! ```
//! let doc = metamark_parser::parse("---\ntitle: Notes\n---\n# Intro\n").unwrap();
//! assert_eq!(doc.get_metadata("title"), Some("Notes"));
//! ```

pub mod ast;
mod common;
pub mod document;
pub mod error;
pub mod metadata;
pub mod parser;
pub mod scanner;

pub use common::*;

pub use ast::render::render_tree;
pub use ast::visitor::NodeVisitor;
pub use ast::{Node, NodeKind};
pub use document::Document;
pub use error::{ParseError, SyntaxErrorKind};
pub use metadata::{extract_metadata, Metadata, MetadataPair};
pub use parser::{parse, parse_bytes};
pub use scanner::tokenize;
