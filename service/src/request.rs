//! Request/response bodies and field validation.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use suggest_intent::TaskLabel;

const TIMESTAMP_FORMAT_MESSAGE: &str = "timestamp must be ISO-8601 (e.g., 2025-08-21T12:00:00Z)";

/// Incoming JSON body. Every field is optional on the wire so that missing
/// fields are reported by validation rather than by the JSON decoder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestTaskRequest {
    #[serde(default)]
    pub utterance: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// A request that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidRequest {
    pub utterance: String,
    pub user_id: String,
    pub session_id: String,
    pub timestamp: DateTime<FixedOffset>,
}

/// Validation messages keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<&'static str, Vec<String>>);

impl ValidationErrors {
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Messages recorded for `field`.
    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }
}

impl SuggestTaskRequest {
    /// Check every field, collecting all failures.
    pub fn validate(self) -> Result<ValidRequest, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let utterance = required(&mut errors, "utterance", self.utterance);
        let user_id = required(&mut errors, "userId", self.user_id);
        let session_id = required(&mut errors, "sessionId", self.session_id);
        // Both timestamp checks run: a missing value also fails the format check.
        let timestamp =
            required(&mut errors, "timestamp", self.timestamp).and_then(|ts| parse_timestamp(&ts));
        if timestamp.is_none() {
            errors.add("timestamp", TIMESTAMP_FORMAT_MESSAGE);
        }

        match (utterance, user_id, session_id, timestamp) {
            (Some(utterance), Some(user_id), Some(session_id), Some(timestamp))
                if errors.is_empty() =>
            {
                Ok(ValidRequest {
                    utterance,
                    user_id,
                    session_id,
                    timestamp,
                })
            }
            _ => Err(errors),
        }
    }
}

fn required(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: Option<String>,
) -> Option<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Some(v),
        _ => {
            errors.add(field, format!("{field} is required"));
            None
        }
    }
}

/// Parse an ISO-8601 timestamp.
///
/// Accepts RFC 3339 with an offset, a local date-time (seconds and fraction
/// optional, `T` or space separator), or a bare date. Local values are taken
/// as UTC.
pub fn parse_timestamp(s: &str) -> Option<DateTime<FixedOffset>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt);
    }

    const LOCAL_FORMATS: &[&str] = &[
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
    ];
    let naive = LOCAL_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })?;
    Some(naive.and_utc().fixed_offset())
}

/// Successful response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestTaskResponse {
    pub task: TaskLabel,
    /// Generation time, RFC 3339 UTC.
    pub timestamp: String,
}

impl SuggestTaskResponse {
    pub fn new(task: TaskLabel, generated_at: DateTime<Utc>) -> Self {
        Self {
            task,
            timestamp: generated_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }
}
