use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Looked up in the working directory when no `--config` path is given.
pub const DEFAULT_CONFIG_FILE: &str = "mmk.yml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Indented node listing.
    #[default]
    Tree,
    /// The whole document, metadata included, as JSON.
    Json,
}

/// Settings for the `mmk` tool, read from `mmk.yml`. Command line flags take precedence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub format: OutputFormat,
    /// Starting indent level of tree output.
    pub indent: usize,
    pub show_comments: bool,
    pub color: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            format: OutputFormat::Tree,
            indent: 0,
            show_comments: true,
            color: true,
        }
    }
}

impl Config {
    pub fn from_yaml(input: &str) -> Result<Self> {
        if input.trim().is_empty() {
            return Ok(Config::default());
        }
        serde_yaml::from_str(input).context("Error loading configuration:")
    }

    /// Reads `explicit` if given, which must then exist. Otherwise falls back to
    /// [DEFAULT_CONFIG_FILE] in `dir`, or the defaults when that is missing too.
    pub fn load(explicit: Option<&Path>, dir: &Path) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let path = dir.join(DEFAULT_CONFIG_FILE);
                if !path.is_file() {
                    debug!("no configuration file, using defaults");
                    return Ok(Config::default());
                }
                path
            }
        };

        let input = fs::read_to_string(&path)
            .with_context(|| format!("Could not read configuration {}", path.display()))?;
        debug!(path = %path.display(), "loaded configuration");
        Config::from_yaml(&input)
    }
}
