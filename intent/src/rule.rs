//! Rule definitions loaded from JSON/YAML.

use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::RuleError;

/// A declarative rule: a label and the patterns that select it.
///
/// JSON/YAML supports either a single pattern or a list:
/// - `patterns: '\bcancel.*\bsubscription'`
/// - `patterns: ['\bcancel.*\bplan', '\bunsubscribe']`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    /// Task label returned when the rule matches.
    pub label: String,

    /// Regular expressions, matched case-insensitively. Any match selects the rule.
    #[serde(
        default,
        deserialize_with = "one_or_many",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub patterns: Vec<String>,
}

impl Rule {
    /// Create a rule with the given label and patterns.
    pub fn new<I, S>(label: impl Into<String>, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            label: label.into(),
            patterns: patterns.into_iter().map(Into::into).collect(),
        }
    }
}

/// A rule file: an ordered list of rules appended after the built-ins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleFile {
    #[serde(default)]
    pub rules: Vec<Rule>,
}

impl RuleFile {
    /// Parse a rule file from JSON bytes.
    pub fn from_json(data: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(data)
    }

    /// Parse a rule file from YAML bytes.
    pub fn from_yaml(data: &[u8]) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_slice(data)
    }

    /// Load a rule file, picking the format from the file extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RuleError> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        let parse: fn(&[u8]) -> Result<Self, String> = match ext.as_str() {
            "json" => |data: &[u8]| Self::from_json(data).map_err(|e| e.to_string()),
            "yaml" | "yml" => |data: &[u8]| Self::from_yaml(data).map_err(|e| e.to_string()),
            _ => return Err(RuleError::UnsupportedExtension(ext)),
        };

        let data = std::fs::read(path).map_err(|source| RuleError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        parse(&data).map_err(|message| RuleError::Parse {
            path: path.to_path_buf(),
            message,
        })
    }
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(p) => vec![p],
        OneOrMany::Many(ps) => ps,
    })
}
