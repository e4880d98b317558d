//! Service configuration file types and loading.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use suggest_resilience::{FailureProbability, RetryPolicy, SimulatedDependency};

use crate::error::{Error, Result};

/// Top-level configuration. Every key is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Listen address; `:8080` binds every interface.
    pub listen: String,
    /// JSON/YAML rules appended after the built-ins.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rules_file: Option<PathBuf>,
    /// Seed for reproducible dependency failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub retry: RetryConfig,
    pub dependency: DependencyConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen: ":8080".to_string(),
            rules_file: None,
            seed: None,
            retry: RetryConfig::default(),
            dependency: DependencyConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        let policy = RetryPolicy::default();
        Self {
            max_attempts: policy.max_attempts(),
            delay_ms: policy.delay().as_millis() as u64,
        }
    }
}

impl RetryConfig {
    pub fn policy(&self) -> Result<RetryPolicy> {
        Ok(RetryPolicy::new(
            self.max_attempts,
            Duration::from_millis(self.delay_ms),
        )?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DependencyConfig {
    pub failure_probability: f64,
    pub latency_ms: u64,
}

impl Default for DependencyConfig {
    fn default() -> Self {
        let dependency = SimulatedDependency::default();
        Self {
            failure_probability: dependency.failure_probability().value(),
            latency_ms: dependency.latency().as_millis() as u64,
        }
    }
}

impl DependencyConfig {
    pub fn dependency(&self) -> Result<SimulatedDependency> {
        Ok(SimulatedDependency::new(
            FailureProbability::new(self.failure_probability)?,
            Duration::from_millis(self.latency_ms),
        ))
    }
}

impl ServiceConfig {
    /// Parse from YAML text.
    pub fn from_yaml(data: &str) -> Result<Self> {
        let config: Self =
            serde_yaml::from_str(data).map_err(|e| Error::Config(e.to_string()))?;
        Ok(config.expanded())
    }

    /// Parse from JSON text.
    pub fn from_json(data: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(data).map_err(|e| Error::Config(e.to_string()))?;
        Ok(config.expanded())
    }

    /// Load a config file (YAML or JSON, by extension).
    pub fn load(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        let data = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("read {}: {}", path.display(), e)))?;

        let parsed = match ext.as_str() {
            "json" => Self::from_json(&data),
            "yaml" | "yml" => Self::from_yaml(&data),
            _ => {
                return Err(Error::Config(format!(
                    "unsupported config extension: {ext:?}"
                )));
            }
        };
        parsed.map_err(|e| Error::Config(format!("parse {}: {}", path.display(), e)))
    }

    /// Check every value without building anything.
    pub fn validate(&self) -> Result<()> {
        self.retry.policy()?;
        self.dependency.dependency()?;
        Ok(())
    }

    fn expanded(mut self) -> Self {
        self.listen = expand_env(&self.listen);
        self.rules_file = self
            .rules_file
            .map(|p| PathBuf::from(expand_env(&p.to_string_lossy())));
        self
    }
}

/// Expand `$VAR` and `${VAR}` references; `$$` is a literal `$`.
/// Unset variables expand to the empty string.
fn expand_env(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            out.push(c);
            continue;
        }
        match chars.peek() {
            Some('$') => {
                chars.next();
                out.push('$');
            }
            Some('{') => {
                chars.next();
                let name: String = chars.by_ref().take_while(|&c| c != '}').collect();
                out.push_str(&std::env::var(name).unwrap_or_default());
            }
            Some(&c) if c.is_ascii_alphabetic() || c == '_' => {
                let mut name = String::new();
                while let Some(&c) = chars.peek() {
                    if !(c.is_ascii_alphanumeric() || c == '_') {
                        break;
                    }
                    name.push(c);
                    chars.next();
                }
                out.push_str(&std::env::var(name).unwrap_or_default());
            }
            _ => out.push('$'),
        }
    }

    out
}
