//! Character-level cursor over MetaMark source text.
//!
//! The scanner never mutates its input. It hands out slices of the source text and keeps
//! track of the byte offset plus line/column of the cursor. Lookahead past the end of the input
//! yields [EOF_CHAR] so parsing routines do not need explicit bounds checks.

use crate::common::{Position, Span};
use serde::Serialize;
use std::fmt::{Display, Formatter};

/// Returned by [Scanner::peek] and [Scanner::advance] once the input is exhausted.
pub const EOF_CHAR: char = '\0';

pub const HEADING_MARKER: char = '#';
pub const COMPONENT_OPEN: &str = "[[";
pub const COMPONENT_CLOSE_OPEN: &str = "[[/";
pub const COMPONENT_TAG_END: &str = "]]";
pub const ANNOTATION_MARKER: char = '>';
pub const COMMENT_DELIMITER: &str = "%%";
pub const FRONTMATTER_DELIMITER: &str = "---";
pub const MATH_DELIMITER: &str = "$$";
pub const CODE_FENCE: &str = "```";

/// Coarse classification of the input at a cursor position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TokenKind {
    HeadingMarker,
    ComponentOpen,
    ComponentClose,
    AnnotationMarker,
    CommentDelimiter,
    FrontmatterDelimiter,
    MathDelimiter,
    CodeFence,
    Newline,
    Text,
    Eof,
}

impl TokenKind {
    /// True for tokens that begin a block and therefore end a running paragraph.
    pub fn starts_block(&self) -> bool {
        !matches!(self, TokenKind::Newline | TokenKind::Text | TokenKind::Eof)
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TokenKind::HeadingMarker => "heading-marker",
            TokenKind::ComponentOpen => "component-open",
            TokenKind::ComponentClose => "component-close",
            TokenKind::AnnotationMarker => "annotation-marker",
            TokenKind::CommentDelimiter => "comment-delimiter",
            TokenKind::FrontmatterDelimiter => "frontmatter-delimiter",
            TokenKind::MathDelimiter => "math-delimiter",
            TokenKind::CodeFence => "code-fence",
            TokenKind::Newline => "newline",
            TokenKind::Text => "text",
            TokenKind::Eof => "eof",
        };
        f.pad(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    source: &'a str,
    position: Position,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Scanner {
            source,
            position: Position::new(),
        }
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn offset(&self) -> usize {
        self.position.offset
    }

    fn rest(&self) -> &'a str {
        &self.source[self.position.offset..]
    }

    pub fn is_at_end(&self) -> bool {
        self.position.offset >= self.source.len()
    }

    /// Looks `n` characters ahead without consuming anything.
    pub fn peek(&self, n: usize) -> char {
        self.rest().chars().nth(n).unwrap_or(EOF_CHAR)
    }

    /// Consumes and returns the current character.
    pub fn advance(&mut self) -> char {
        let Some(c) = self.rest().chars().next() else {
            return EOF_CHAR;
        };

        self.position.offset += c.len_utf8();
        if c == '\n' {
            self.position.line += 1;
            self.position.column = 1;
        } else {
            self.position.column += 1;
        }
        c
    }

    pub fn advance_by(&mut self, n: usize) {
        for _ in 0..n {
            self.advance();
        }
    }

    pub fn starts_with(&self, pattern: &str) -> bool {
        self.rest().starts_with(pattern)
    }

    /// Consumes `c` if it is the current character.
    pub fn eat(&mut self, c: char) -> bool {
        if !self.is_at_end() && self.peek(0) == c {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consumes a single `\n` or `\r\n`.
    pub fn eat_newline(&mut self) -> bool {
        if self.starts_with("\r\n") {
            self.advance_by(2);
            true
        } else {
            self.eat('\n')
        }
    }

    pub fn skip_whitespace(&mut self) {
        while !self.is_at_end() && self.peek(0).is_whitespace() {
            self.advance();
        }
    }

    /// Skips whitespace without crossing a line break.
    pub fn skip_inline_whitespace(&mut self) {
        while !self.is_at_end() && is_inline_whitespace(self.peek(0)) {
            self.advance();
        }
    }

    /// Consumes the rest of the current line, leaving the line break in place.
    pub fn take_line(&mut self) -> &'a str {
        let start = self.offset();
        while !self.is_at_end() && self.peek(0) != '\n' {
            self.advance();
        }
        self.slice_from(start)
    }

    pub fn slice_from(&self, start: usize) -> &'a str {
        &self.source[start..self.position.offset]
    }

    pub fn is_at_line_start(&self) -> bool {
        self.position.column == 1
    }

    /// True when the rest of the current line holds nothing but whitespace.
    pub fn is_at_blank_line(&self) -> bool {
        self.rest()
            .chars()
            .take_while(|c| *c != '\n')
            .all(is_inline_whitespace)
    }

    /// Skips whole lines holding nothing but whitespace. The indentation of the next non-blank
    /// line stays in place.
    pub fn skip_blank_lines(&mut self) {
        while !self.is_at_end() && self.is_at_blank_line() {
            self.take_line();
            if !self.eat_newline() {
                break;
            }
        }
    }

    pub fn checkpoint(&self) -> Position {
        self.position
    }

    pub fn restore(&mut self, checkpoint: Position) {
        self.position = checkpoint;
    }

    /// Classifies the input at the cursor without consuming it.
    pub fn peek_token(&self) -> TokenKind {
        if self.is_at_end() {
            return TokenKind::Eof;
        }

        match self.peek(0) {
            '\n' => TokenKind::Newline,
            '\r' if self.peek(1) == '\n' => TokenKind::Newline,
            HEADING_MARKER => TokenKind::HeadingMarker,
            ANNOTATION_MARKER => TokenKind::AnnotationMarker,
            _ if self.starts_with(COMPONENT_CLOSE_OPEN) => TokenKind::ComponentClose,
            _ if self.starts_with(COMPONENT_OPEN) => TokenKind::ComponentOpen,
            _ if self.starts_with(COMMENT_DELIMITER) => TokenKind::CommentDelimiter,
            _ if self.starts_with(FRONTMATTER_DELIMITER) => TokenKind::FrontmatterDelimiter,
            _ if self.starts_with(MATH_DELIMITER) => TokenKind::MathDelimiter,
            _ if self.starts_with(CODE_FENCE) => TokenKind::CodeFence,
            _ => TokenKind::Text,
        }
    }

    /// Consumes one coarse token and returns it. Text runs stop at line breaks and at anything
    /// that classifies as a different token.
    pub fn next_token(&mut self) -> Token {
        let start = self.offset();
        let kind = self.peek_token();

        match kind {
            TokenKind::Eof => {}
            TokenKind::Newline => {
                self.eat_newline();
            }
            TokenKind::HeadingMarker => {
                while self.peek(0) == HEADING_MARKER {
                    self.advance();
                }
            }
            TokenKind::AnnotationMarker => {
                self.advance();
            }
            TokenKind::ComponentOpen | TokenKind::CommentDelimiter | TokenKind::MathDelimiter => {
                self.advance_by(2)
            }
            TokenKind::ComponentClose | TokenKind::FrontmatterDelimiter | TokenKind::CodeFence => {
                self.advance_by(3)
            }
            TokenKind::Text => {
                self.advance();
                while self.peek_token() == TokenKind::Text {
                    self.advance();
                }
            }
        }

        Token {
            kind,
            span: Span::new(start, self.offset()),
        }
    }
}

pub fn is_inline_whitespace(c: char) -> bool {
    c.is_whitespace() && c != '\n'
}

/// Splits `source` into coarse tokens. The final token is always [TokenKind::Eof].
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut scanner = Scanner::new(source);
    let mut tokens = Vec::new();

    loop {
        let token = scanner.next_token();
        let done = token.kind == TokenKind::Eof;
        tokens.push(token);
        if done {
            break;
        }
    }

    tokens
}
