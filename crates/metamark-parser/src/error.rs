use crate::common::Position;
use thiserror::Error;

/// Failure of a single [crate::parse] call. No partial document is ever returned alongside it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The source could not be read as text.
    #[error("invalid input: source is not valid UTF-8 text")]
    InvalidInput,
    #[error("syntax error at {position}: {kind}")]
    Syntax {
        kind: SyntaxErrorKind,
        position: Position,
    },
}

impl ParseError {
    pub(crate) fn syntax(kind: SyntaxErrorKind, position: Position) -> Self {
        ParseError::Syntax { kind, position }
    }

    pub fn kind(&self) -> Option<&SyntaxErrorKind> {
        match self {
            ParseError::InvalidInput => None,
            ParseError::Syntax { kind, .. } => Some(kind),
        }
    }

    pub fn position(&self) -> Option<Position> {
        match self {
            ParseError::InvalidInput => None,
            ParseError::Syntax { position, .. } => Some(*position),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyntaxErrorKind {
    #[error("document has no content")]
    EmptyDocument,
    #[error("component tag is missing its closing `]]`")]
    UnclosedComponentTag,
    #[error("component tag has no type name")]
    EmptyComponentName,
    #[error("component `{0}` is never closed with `[[/{0}]]`")]
    UnterminatedComponent(String),
    #[error("closing component tag without an opening tag")]
    UnexpectedClosingTag,
    #[error("`{0}` is not a valid annotation type")]
    InvalidIdentifier(String),
    #[error("comment is never closed with `%%`")]
    UnterminatedComment,
    #[error("frontmatter is never closed with `---`")]
    UnterminatedMetadata,
    #[error("math block is never closed with `$$`")]
    UnterminatedMath,
    #[error("code block is never closed with a ``` line")]
    UnterminatedCodeBlock,
    #[error("metadata line `{0}` has no `:` separator")]
    MissingColon(String),
    #[error("metadata line `{0}` has an empty key")]
    EmptyKey(String),
}

pub type Result<T, E = ParseError> = std::result::Result<T, E>;
