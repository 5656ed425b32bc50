//! Reads MetaMark files from disk and hands them to the parser.

use metamark_parser::{parse_bytes, Document, ParseError, Span};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("could not read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not parse {}", path.display())]
    Parse {
        path: PathBuf,
        /// The file contents, kept for error excerpts.
        text: String,
        #[source]
        source: ParseError,
    },
}

impl LoaderError {
    /// Source text around a syntax error, `margin` bytes on each side.
    pub fn excerpt(&self, margin: usize) -> Option<&str> {
        match self {
            LoaderError::Parse { text, source, .. } => {
                let position = source.position()?;
                Some(Span::at(position.offset).get_with_margin(text, margin))
            }
            LoaderError::Io { .. } => None,
        }
    }
}

pub fn read_source(path: &Path) -> Result<Vec<u8>, LoaderError> {
    fs::read(path).map_err(|source| LoaderError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads the whole file at `path` and parses it.
pub fn read_document<P: AsRef<Path>>(path: P) -> Result<Document, LoaderError> {
    let path = path.as_ref();
    let bytes = read_source(path)?;
    debug!(path = %path.display(), bytes = bytes.len(), "read source");

    parse_bytes(&bytes).map_err(|source| LoaderError::Parse {
        path: path.to_path_buf(),
        text: String::from_utf8_lossy(&bytes).into_owned(),
        source,
    })
}
