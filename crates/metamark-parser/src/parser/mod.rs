//! Recursive-descent parser turning MetaMark source into a [Document].
//!
//! The parser drives a [Scanner] one character at a time. At every top-level position it looks at
//! the coarse token under the cursor and hands over to a routine for that construct, which either
//! returns a completed node or fails the whole parse. Nodes are only attached to the root once
//! they are complete, so a failing construct never leaves a partial tree behind.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, trace, warn};

use crate::ast::{Node, NodeKind};
use crate::common::{Position, Span};
use crate::document::Document;
use crate::error::{ParseError, Result, SyntaxErrorKind};
use crate::metadata::{extract_metadata, Metadata, MetadataError, MetadataPair};
use crate::scanner::{
    Scanner, TokenKind, ANNOTATION_MARKER, CODE_FENCE, COMMENT_DELIMITER, COMPONENT_CLOSE_OPEN,
    COMPONENT_OPEN, COMPONENT_TAG_END, FRONTMATTER_DELIMITER, HEADING_MARKER, MATH_DELIMITER,
};

/// Fence languages that produce [NodeKind::Diagram] nodes. Compared case-insensitively.
pub const DIAGRAM_LANGUAGES: [&str; 4] = ["mermaid", "plantuml", "graphviz", "dot"];

lazy_static! {
    static ref IDENTIFIER: Regex =
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("invalid regex expression");
}

/// Annotation types must start with a letter or underscore, followed by letters, digits or
/// underscores.
pub fn is_valid_identifier(value: &str) -> bool {
    IDENTIFIER.is_match(value)
}

/// Parses a complete document.
pub fn parse(input: &str) -> Result<Document> {
    Parser::new(input).parse()
}

/// Parses a document from raw bytes, as handed over by a file reader.
pub fn parse_bytes(input: &[u8]) -> Result<Document> {
    let text = std::str::from_utf8(input).map_err(|_| ParseError::InvalidInput)?;
    parse(text)
}

pub struct Parser<'a> {
    scanner: Scanner<'a>,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Self {
        Parser {
            scanner: Scanner::new(input),
        }
    }

    pub fn parse(mut self) -> Result<Document> {
        self.scanner.skip_blank_lines();
        if self.scanner.is_at_end() {
            return Err(self.error(SyntaxErrorKind::EmptyDocument));
        }

        let mut root = Node::document();
        let mut meta = Metadata::new();

        if self.scanner.starts_with(FRONTMATTER_DELIMITER) {
            let (node, pairs) = self.parse_frontmatter()?;
            meta = pairs.into_iter().collect();
            root.add_child(node);
        }

        loop {
            self.scanner.skip_blank_lines();
            if self.scanner.is_at_end() {
                break;
            }

            let before = self.scanner.offset();
            match self.parse_block()? {
                Some(node) => root.add_child(node),
                None if self.scanner.offset() == before => {
                    self.scanner.advance();
                }
                None => {}
            }
        }

        if root.children.is_empty() {
            return Err(self.error(SyntaxErrorKind::EmptyDocument));
        }

        root.span = Span::new(0, self.scanner.offset());
        debug!(
            nodes = root.child_count(),
            metadata = meta.len(),
            "parsed document"
        );
        Ok(Document::new(meta, root))
    }

    fn error(&self, kind: SyntaxErrorKind) -> ParseError {
        ParseError::syntax(kind, self.scanner.position())
    }

    fn parse_block(&mut self) -> Result<Option<Node>> {
        let token = self.scanner.peek_token();
        trace!(%token, position = %self.scanner.position(), "dispatch");

        match token {
            TokenKind::HeadingMarker => self.parse_heading(),
            TokenKind::ComponentClose => Err(self.error(SyntaxErrorKind::UnexpectedClosingTag)),
            TokenKind::ComponentOpen => self.parse_component().map(Some),
            TokenKind::AnnotationMarker => self.parse_annotation().map(Some),
            TokenKind::CommentDelimiter => self.parse_comment().map(Some),
            TokenKind::MathDelimiter => self.parse_math().map(Some),
            TokenKind::CodeFence => self.parse_fence().map(Some),
            // Frontmatter is only recognised at the start of a document, anywhere else the
            // dashes are ordinary text.
            TokenKind::FrontmatterDelimiter | TokenKind::Text => self.parse_paragraph(),
            TokenKind::Newline => {
                self.scanner.eat_newline();
                Ok(None)
            }
            TokenKind::Eof => Ok(None),
        }
    }

    fn parse_frontmatter(&mut self) -> Result<(Node, Vec<MetadataPair>)> {
        let start = self.scanner.position();
        self.scanner.advance_by(FRONTMATTER_DELIMITER.len());

        let raw_start = self.scanner.offset();
        while !(self.scanner.is_at_line_start() && self.scanner.starts_with(FRONTMATTER_DELIMITER))
        {
            if self.scanner.is_at_end() {
                return Err(ParseError::syntax(
                    SyntaxErrorKind::UnterminatedMetadata,
                    start,
                ));
            }
            self.scanner.advance();
        }
        let raw = self.scanner.slice_from(raw_start);

        self.scanner.advance_by(FRONTMATTER_DELIMITER.len());
        let trailing = self.scanner.take_line().trim();
        if !trailing.is_empty() {
            warn!(%trailing, "ignoring text after closing frontmatter delimiter");
        }
        let end = self.scanner.offset();
        self.scanner.eat_newline();

        let pairs = extract_metadata(raw).map_err(|e| metadata_error(e, start, raw_start, raw))?;
        debug!(pairs = pairs.len(), "parsed frontmatter");

        let node = Node::new_with_text(NodeKind::Metadata, raw).with_span(Span::new(start.offset, end));
        Ok((node, pairs))
    }

    fn parse_heading(&mut self) -> Result<Option<Node>> {
        let start = self.scanner.offset();

        let mut level = 0;
        while self.scanner.eat(HEADING_MARKER) {
            level += 1;
        }
        self.scanner.skip_inline_whitespace();

        let text = self.scanner.take_line().trim_end();
        let end = self.scanner.offset();
        self.scanner.eat_newline();

        if text.is_empty() {
            debug!(level, "skipping empty heading");
            return Ok(None);
        }

        debug!(level, text, "parsed heading");
        Ok(Some(
            Node::heading(level, text).with_span(Span::new(start, end)),
        ))
    }

    /// A run of text ending at a blank line, the end of input, or a line that opens another
    /// construct. Markers in the middle of a line are plain text.
    fn parse_paragraph(&mut self) -> Result<Option<Node>> {
        self.scanner.skip_inline_whitespace();
        let start = self.scanner.offset();

        loop {
            self.scanner.take_line();
            if !self.scanner.eat_newline() {
                break;
            }
            if self.scanner.is_at_blank_line() || self.scanner.peek_token().starts_block() {
                break;
            }
        }

        let text = self.scanner.slice_from(start).trim_end();
        if text.is_empty() {
            return Ok(None);
        }

        trace!(len = text.len(), "parsed paragraph");
        Ok(Some(
            Node::paragraph(text).with_span(Span::new(start, start + text.len())),
        ))
    }

    /// `[[type]] body [[/type]]`. The body is kept as flat text in a single paragraph child.
    fn parse_component(&mut self) -> Result<Node> {
        let start = self.scanner.position();
        self.scanner.advance_by(COMPONENT_OPEN.len());

        let name = self.component_tag_name(start)?;
        if name.is_empty() {
            return Err(ParseError::syntax(
                SyntaxErrorKind::EmptyComponentName,
                start,
            ));
        }
        self.scanner.eat_newline();

        let body_start = self.scanner.offset();
        while !self.scanner.starts_with(COMPONENT_CLOSE_OPEN) {
            if self.scanner.is_at_end() {
                return Err(ParseError::syntax(
                    SyntaxErrorKind::UnterminatedComponent(name.to_string()),
                    start,
                ));
            }
            self.scanner.advance();
        }
        let body = self.scanner.slice_from(body_start);

        let close = self.scanner.position();
        self.scanner.advance_by(COMPONENT_CLOSE_OPEN.len());
        let closing_name = self.component_tag_name(close)?;
        if closing_name != name {
            warn!(
                opening = name,
                closing = closing_name,
                position = %close,
                "component closed with a different name"
            );
        }
        let end = self.scanner.offset();
        self.scanner.skip_inline_whitespace();
        self.scanner.eat_newline();

        let mut node =
            Node::new_with_text(NodeKind::Component, name).with_span(Span::new(start.offset, end));

        let trimmed = body.trim();
        if !trimmed.is_empty() {
            let offset = body_start + (body.len() - body.trim_start().len());
            node.add_child(
                Node::paragraph(trimmed).with_span(Span::new(offset, offset + trimmed.len())),
            );
        }

        debug!(name, children = node.child_count(), "parsed component");
        Ok(node)
    }

    /// Reads a tag name up to `]]` on the current line and consumes the `]]`.
    fn component_tag_name(&mut self, tag_start: Position) -> Result<&'a str> {
        let name_start = self.scanner.offset();
        while !self.scanner.starts_with(COMPONENT_TAG_END) {
            if self.scanner.is_at_end() || self.scanner.peek(0) == '\n' {
                return Err(ParseError::syntax(
                    SyntaxErrorKind::UnclosedComponentTag,
                    tag_start,
                ));
            }
            self.scanner.advance();
        }
        let name = self.scanner.slice_from(name_start).trim();
        self.scanner.advance_by(COMPONENT_TAG_END.len());
        Ok(name)
    }

    /// `> type: content`, optionally continued on following `>` lines.
    fn parse_annotation(&mut self) -> Result<Node> {
        let start = self.scanner.position();
        self.scanner.advance();
        self.scanner.skip_inline_whitespace();

        let name_start = self.scanner.offset();
        while !self.scanner.is_at_end() && !matches!(self.scanner.peek(0), ':' | '\n') {
            self.scanner.advance();
        }
        let name = self.scanner.slice_from(name_start).trim();
        if !is_valid_identifier(name) {
            return Err(ParseError::syntax(
                SyntaxErrorKind::InvalidIdentifier(name.to_string()),
                start,
            ));
        }

        let mut node = Node::new_with_text(NodeKind::Annotation, name);

        if self.scanner.eat(':') {
            self.scanner.skip_inline_whitespace();
            let content_start = self.scanner.offset();

            let mut lines = vec![self.scanner.take_line().trim_end()];
            let mut content_end = self.scanner.offset();
            self.scanner.eat_newline();

            while let Some(line) = self.annotation_continuation() {
                lines.push(line);
                content_end = self.scanner.offset();
                self.scanner.eat_newline();
            }

            let content = lines.join("\n");
            let content = content.trim();
            if !content.is_empty() {
                node.add_child(
                    Node::paragraph(content).with_span(Span::new(content_start, content_end)),
                );
            }
        } else {
            self.scanner.eat_newline();
        }

        node.span = Span::new(start.offset, self.scanner.offset());
        debug!(name, children = node.child_count(), "parsed annotation");
        Ok(node)
    }

    /// Consumes the next line, up to its line break, if it continues the current annotation: it
    /// starts with `>` but does not open an annotation of its own.
    fn annotation_continuation(&mut self) -> Option<&'a str> {
        if self.scanner.peek(0) != ANNOTATION_MARKER {
            return None;
        }

        let checkpoint = self.scanner.checkpoint();
        self.scanner.advance();
        self.scanner.skip_inline_whitespace();
        let line = self.scanner.take_line();

        if opens_annotation(line) {
            self.scanner.restore(checkpoint);
            None
        } else {
            Some(line.trim_end())
        }
    }

    /// `%% text %%`. Empty comments are valid.
    fn parse_comment(&mut self) -> Result<Node> {
        let (text, span) = self.delimited(COMMENT_DELIMITER, SyntaxErrorKind::UnterminatedComment)?;
        debug!(len = text.len(), "parsed comment");
        Ok(Node::new_with_text(NodeKind::Comment, text).with_span(span))
    }

    /// `$$ tex $$` display math.
    fn parse_math(&mut self) -> Result<Node> {
        let (text, span) = self.delimited(MATH_DELIMITER, SyntaxErrorKind::UnterminatedMath)?;
        debug!(len = text.len(), "parsed math block");
        Ok(Node::new_with_text(NodeKind::Math, text).with_span(span))
    }

    /// ```` ```lang ```` up to a line holding only ```` ``` ````. The body is kept verbatim as a
    /// single paragraph child; diagram languages produce a [NodeKind::Diagram] node.
    fn parse_fence(&mut self) -> Result<Node> {
        let start = self.scanner.position();
        self.scanner.advance_by(CODE_FENCE.len());
        let language = self
            .scanner
            .take_line()
            .split_whitespace()
            .next()
            .unwrap_or_default();
        self.scanner.eat_newline();

        let body_start = self.scanner.offset();
        let body_end = loop {
            if self.scanner.is_at_end() {
                return Err(ParseError::syntax(
                    SyntaxErrorKind::UnterminatedCodeBlock,
                    start,
                ));
            }
            let line_start = self.scanner.offset();
            if self.scanner.take_line().trim_end() == CODE_FENCE {
                break line_start;
            }
            self.scanner.eat_newline();
        };
        let end = self.scanner.offset();
        self.scanner.eat_newline();

        let raw = &self.scanner.source()[body_start..body_end];
        let body = raw
            .strip_suffix('\n')
            .map(|b| b.strip_suffix('\r').unwrap_or(b))
            .unwrap_or(raw);

        let is_diagram = DIAGRAM_LANGUAGES
            .iter()
            .any(|l| l.eq_ignore_ascii_case(language));
        let mut node = match (is_diagram, language.is_empty()) {
            (true, _) => Node::new_with_text(NodeKind::Diagram, language),
            (false, true) => Node::new_empty(NodeKind::CodeBlock),
            (false, false) => Node::new_with_text(NodeKind::CodeBlock, language),
        }
        .with_span(Span::new(start.offset, end));

        if !body.trim().is_empty() {
            node.add_child(
                Node::paragraph(body).with_span(Span::new(body_start, body_start + body.len())),
            );
        }

        debug!(language, kind = %node.kind, "parsed fenced block");
        Ok(node)
    }

    /// Captures the trimmed text between two occurrences of `delimiter`, then skips the rest of
    /// the closing line's whitespace and its line break.
    fn delimited(&mut self, delimiter: &str, unterminated: SyntaxErrorKind) -> Result<(&'a str, Span)> {
        let start = self.scanner.position();
        self.scanner.advance_by(delimiter.len());

        let text_start = self.scanner.offset();
        while !self.scanner.starts_with(delimiter) {
            if self.scanner.is_at_end() {
                return Err(ParseError::syntax(unterminated, start));
            }
            self.scanner.advance();
        }
        let text = self.scanner.slice_from(text_start).trim();

        self.scanner.advance_by(delimiter.len());
        let end = self.scanner.offset();
        self.scanner.skip_inline_whitespace();
        self.scanner.eat_newline();

        Ok((text, Span::new(start.offset, end)))
    }
}

fn opens_annotation(line: &str) -> bool {
    line.split_once(':')
        .map_or(false, |(name, _)| is_valid_identifier(name.trim()))
}

/// Maps an extractor error, which is relative to the frontmatter block, to a source position.
fn metadata_error(error: MetadataError, start: Position, raw_start: usize, raw: &str) -> ParseError {
    let preceding = error.line - 1;
    let offset = raw_start
        + raw
            .split('\n')
            .take(preceding)
            .map(|l| l.len() + 1)
            .sum::<usize>();
    let column = if preceding == 0 {
        start.column + FRONTMATTER_DELIMITER.len()
    } else {
        1
    };

    ParseError::syntax(
        error.kind,
        Position {
            offset,
            line: start.line + preceding,
            column,
        },
    )
}
