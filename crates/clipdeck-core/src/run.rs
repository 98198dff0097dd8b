use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::Video;

/// Outcome of one pipeline execution.
///
/// Built once at the end of a run and never modified afterwards; the history
/// store wraps it in a [`HistoryRecord`] for persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunResult {
    /// Calendar day the pipeline executed (UTC), serialized as `YYYY-MM-DD`.
    pub date: NaiveDate,
    /// Candidates that survived normalization, before selection.
    pub fetched_count: usize,
    pub selected_count: usize,
    pub posted_count: usize,
    /// Selected videos in publish order.
    pub videos: Vec<Video>,
    /// Human-readable failure notes, in the order they occurred.
    #[serde(default)]
    pub failures: Vec<String>,
}

/// A persisted [`RunResult`] with its generated id and creation time.
///
/// Serializes flat: the run fields sit next to `id` and `createdAt`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord {
    #[serde(flatten)]
    pub result: RunResult,
    /// `{date}-{epoch_ms}`, unique even for same-day reruns.
    pub id: String,
    pub created_at: DateTime<Utc>,
}

impl HistoryRecord {
    #[must_use]
    pub fn new(result: RunResult, created_at: DateTime<Utc>) -> Self {
        let id = format!("{}-{}", result.date, created_at.timestamp_millis());
        Self {
            result,
            id,
            created_at,
        }
    }
}
