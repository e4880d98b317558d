//! Task labels produced by classification.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The classified intent of an utterance.
///
/// Serializes to its wire name, e.g. `"ResetPasswordTask"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TaskLabel {
    /// The user wants to reset or recover a password.
    ResetPassword,
    /// The user asks about the status of an order.
    CheckOrderStatus,
    /// A label contributed by an appended rule.
    Custom(String),
    /// No rule matched.
    NoTaskFound,
}

impl TaskLabel {
    /// Wire name of the label.
    pub fn as_str(&self) -> &str {
        match self {
            TaskLabel::ResetPassword => "ResetPasswordTask",
            TaskLabel::CheckOrderStatus => "CheckOrderStatusTask",
            TaskLabel::Custom(name) => name,
            TaskLabel::NoTaskFound => "NoTaskFound",
        }
    }

    /// Reports whether a rule matched.
    pub fn is_found(&self) -> bool {
        !matches!(self, TaskLabel::NoTaskFound)
    }
}

impl fmt::Display for TaskLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskLabel {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "ResetPasswordTask" => TaskLabel::ResetPassword,
            "CheckOrderStatusTask" => TaskLabel::CheckOrderStatus,
            "NoTaskFound" => TaskLabel::NoTaskFound,
            other => TaskLabel::Custom(other.to_string()),
        })
    }
}

impl Serialize for TaskLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TaskLabel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        let Ok(label) = s.parse::<TaskLabel>();
        Ok(label)
    }
}
