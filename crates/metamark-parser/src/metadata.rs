//! Frontmatter key/value extraction and the document metadata table.

use linked_hash_map::LinkedHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::error::SyntaxErrorKind;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataPair {
    pub key: String,
    pub value: String,
}

impl MetadataPair {
    pub fn new<K: Into<String>, V: Into<String>>(key: K, value: V) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// A malformed frontmatter line. `line` is 1-based and relative to the raw block text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("frontmatter line {line}: {kind}")]
pub struct MetadataError {
    pub line: usize,
    pub kind: SyntaxErrorKind,
}

/// Splits raw frontmatter into `key: value` pairs in source order.
///
/// Blank lines and lines starting with `#` are skipped. Every other line must contain a `:`;
/// key and value are the trimmed text before and after the first one. Duplicate keys are all
/// returned, deciding between them is up to [Metadata].
pub fn extract_metadata(raw: &str) -> Result<Vec<MetadataPair>, MetadataError> {
    let mut pairs = Vec::new();

    for (idx, line) in raw.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let (key, value) = line.split_once(':').ok_or_else(|| MetadataError {
            line: idx + 1,
            kind: SyntaxErrorKind::MissingColon(line.to_string()),
        })?;

        let key = key.trim();
        if key.is_empty() {
            return Err(MetadataError {
                line: idx + 1,
                kind: SyntaxErrorKind::EmptyKey(line.to_string()),
            });
        }

        pairs.push(MetadataPair::new(key, value.trim()));
    }

    Ok(pairs)
}

/// Ordered metadata table of a document. The first occurrence of a key wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata {
    entries: LinkedHashMap<String, String>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts the pair unless the key is already present. Returns whether it was inserted.
    pub fn insert(&mut self, pair: MetadataPair) -> bool {
        if self.entries.contains_key(&pair.key) {
            debug!(key = %pair.key, "ignoring duplicate metadata key");
            false
        } else {
            self.entries.insert(pair.key, pair.value);
            true
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl FromIterator<MetadataPair> for Metadata {
    fn from_iter<T: IntoIterator<Item = MetadataPair>>(iter: T) -> Self {
        let mut meta = Metadata::new();
        iter.into_iter().for_each(|pair| {
            meta.insert(pair);
        });
        meta
    }
}
