use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::format::format_duration;

/// Outcome of one domain lookup. Built up stage by stage inside the retry
/// coordinator, frozen once returned; callers own it exclusively.
///
/// Invariants: `blocked` is only meaningful (and only true) when `status` is
/// true; decision metadata is only populated when `blocked` is true.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QueryResult {
    pub domain: String,
    pub timestamp: String,
    pub status: bool,
    #[serde(skip_serializing_if = "is_zero")]
    pub query_duration_ms: u64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub query_duration_formatted: String,
    pub blocked: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub decision_date: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub case_number: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub file_number: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub file_type: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub court: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description_local: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description_foreign: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub error: String,
}

fn is_zero(n: &u64) -> bool {
    *n == 0
}

impl QueryResult {
    /// Failed lookup carrying only the terminating error.
    pub fn failure(domain: impl Into<String>, error: impl ToString) -> Self {
        Self {
            domain: domain.into(),
            timestamp: now_rfc3339(),
            status: false,
            error: error.to_string(),
            ..Default::default()
        }
    }

    pub fn set_duration(&mut self, ms: u64) {
        self.query_duration_ms = ms;
        self.query_duration_formatted = format_duration(ms);
    }
}

pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Aggregate counts produced by the batch runner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub blocked: usize,
    pub accessible: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl BatchSummary {
    pub fn record(&mut self, result: &QueryResult) {
        if !result.status {
            self.failed += 1;
        } else if result.blocked {
            self.blocked += 1;
        } else {
            self.accessible += 1;
        }
    }
}
