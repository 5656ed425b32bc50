//! File loading, configuration and output formatting for the `mmk` command line tool. The
//! format itself lives in the `metamark-parser` crate.

pub mod config;
pub mod loader;
pub mod output;

pub use metamark_parser as parser;
