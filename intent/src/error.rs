//! Errors raised while building a rule set.

use std::path::PathBuf;

use thiserror::Error;

/// Error type for rule loading and compilation.
#[derive(Error, Debug)]
pub enum RuleError {
    /// A rule was declared without a label.
    #[error("rule has an empty label")]
    EmptyLabel,

    /// A rule was declared without any pattern.
    #[error("rule {label} has no patterns")]
    NoPatterns { label: String },

    /// The sentinel label can only be produced by a miss.
    #[error("rule label {0} is reserved")]
    ReservedLabel(String),

    /// A pattern failed to compile.
    #[error("rule {label}: invalid pattern {pattern:?}: {source}")]
    InvalidPattern {
        label: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// The rule file could not be read.
    #[error("read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The rule file could not be parsed.
    #[error("parse {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    /// The rule file has an extension other than json/yaml/yml.
    #[error("unsupported rule file extension: {0:?}")]
    UnsupportedExtension(String),
}
