//! The bounded run-history log.
//!
//! Records live most-recent-first in a Redis list capped at
//! [`HISTORY_CAPACITY`] entries, with a copy of the newest record under a
//! separate "latest" key. Without a configured [`KvClient`] the store is a
//! no-op: appends are returned but not kept, reads are empty.

use chrono::{DateTime, Utc};
use clipdeck_core::{AppConfig, HistoryRecord, RunResult, HISTORY_CAPACITY};

use crate::error::HistoryError;
use crate::kv::KvClient;

pub const HISTORY_KEY: &str = "agentic:tiktok:history";
pub const LATEST_KEY: &str = "agentic:tiktok:history:latest";

pub struct HistoryStore {
    kv: Option<KvClient>,
}

impl HistoryStore {
    #[must_use]
    pub fn new(kv: Option<KvClient>) -> Self {
        Self { kv }
    }

    /// A store that never persists anything.
    #[must_use]
    pub fn in_memory() -> Self {
        Self { kv: None }
    }

    /// # Errors
    ///
    /// Returns [`HistoryError::Http`] if the Upstash client cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self, HistoryError> {
        KvClient::from_config(config).map(Self::new)
    }

    #[must_use]
    pub fn is_persistent(&self) -> bool {
        self.kv.is_some()
    }

    /// Records a run stamped with the current time.
    ///
    /// # Errors
    ///
    /// See [`HistoryStore::append_at`].
    pub async fn append(&self, result: RunResult) -> Result<HistoryRecord, HistoryError> {
        self.append_at(result, Utc::now()).await
    }

    /// Records a run: pushes it to the front of the log, trims the log to
    /// capacity and overwrites the latest pointer, all in one transaction.
    ///
    /// # Errors
    ///
    /// - [`HistoryError::Serialize`] if the record cannot be encoded.
    /// - Any transport or API error from the backing store.
    pub async fn append_at(
        &self,
        result: RunResult,
        created_at: DateTime<Utc>,
    ) -> Result<HistoryRecord, HistoryError> {
        let record = HistoryRecord::new(result, created_at);
        let Some(kv) = &self.kv else {
            tracing::debug!(id = %record.id, "history: persistence disabled, record not stored");
            return Ok(record);
        };

        let encoded = serde_json::to_string(&record).map_err(|source| HistoryError::Serialize {
            context: format!("history record {}", record.id),
            source,
        })?;

        let keep_until = (HISTORY_CAPACITY - 1).to_string();
        let commands = vec![
            vec!["LPUSH".to_string(), HISTORY_KEY.to_string(), encoded.clone()],
            vec![
                "LTRIM".to_string(),
                HISTORY_KEY.to_string(),
                "0".to_string(),
                keep_until,
            ],
            vec!["SET".to_string(), LATEST_KEY.to_string(), encoded],
        ];
        kv.transaction(&commands).await?;

        tracing::info!(id = %record.id, "history: record appended");
        Ok(record)
    }

    /// Up to `limit` records, most recent first. Entries that no longer
    /// decode as a [`HistoryRecord`] are skipped.
    ///
    /// # Errors
    ///
    /// Returns any transport or API error from the backing store.
    pub async fn recent(&self, limit: usize) -> Result<Vec<HistoryRecord>, HistoryError> {
        let Some(kv) = &self.kv else {
            return Ok(Vec::new());
        };
        if limit == 0 {
            return Ok(Vec::new());
        }

        let stop = i64::try_from(limit - 1).unwrap_or(i64::MAX);
        let raw = kv.lrange(HISTORY_KEY, 0, stop).await?;
        let total = raw.len();
        let records: Vec<HistoryRecord> =
            raw.iter().map(String::as_str).filter_map(decode).collect();
        if records.len() < total {
            tracing::warn!(
                skipped = total - records.len(),
                "history: skipped malformed entries"
            );
        }
        Ok(records)
    }

    /// The most recent record, or `None` if nothing has been recorded.
    ///
    /// # Errors
    ///
    /// Returns any transport or API error from the backing store.
    pub async fn latest(&self) -> Result<Option<HistoryRecord>, HistoryError> {
        let Some(kv) = &self.kv else {
            return Ok(None);
        };
        let Some(raw) = kv.get(LATEST_KEY).await? else {
            return Ok(None);
        };
        let record = decode(&raw);
        if record.is_none() {
            tracing::warn!(key = LATEST_KEY, "history: latest entry is malformed, ignoring");
        }
        Ok(record)
    }
}

fn decode(entry: &str) -> Option<HistoryRecord> {
    serde_json::from_str(entry).ok()
}
