//! Apify API request/response types and the raw TikTok record shape.
//!
//! ## Observed shape of TikTok scraper dataset items
//!
//! Two actor families are in use and their items differ:
//!
//! - `apify/tiktok-search-scraper` nests everything the way TikTok's web API
//!   does: `author.{nickname,uniqueId}`, `stats.{playCount,diggCount,...}`,
//!   `video.{downloadAddr,playAddr,cover,duration}`, `hashtags[].name`,
//!   `challenges[].title`, `createTime` as epoch seconds.
//! - `clockworks/tiktok-scraper` flattens it: `authorMeta.{name,nickName}`,
//!   top-level `playCount`/`diggCount`, `videoMeta.{downloadAddr,coverUrl,duration}`,
//!   `text` instead of `desc`, and `createTimeISO` next to `createTime`.
//!
//! Ids show up as strings or bare numbers, `createTime` as a number or a
//! date-time string, and counters occasionally as floats (`1.2e6`). Every
//! field is optional here and the counter fields decode leniently (anything
//! that is not a non-negative integer becomes `None`), so one odd item never
//! fails the whole dataset. [`crate::normalize`] decides what is usable.

use serde::{Deserialize, Deserializer, Serialize};

/// Search terms used when the caller does not supply any.
pub const DEFAULT_SEARCH_TERMS: [&str; 5] = [
    "football edit",
    "football edits",
    "soccer edit",
    "football highlights",
    "soccer highlights",
];

/// Default number of candidates the caller wants back.
pub const DEFAULT_MAX_RESULTS: u32 = 24;

/// Parameters for one candidate search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOptions {
    /// Desired number of usable candidates. The actor is asked for four times
    /// as many items since many fail normalization or the view threshold.
    pub max_results: u32,
    /// Records whose reported play count is below this are dropped.
    pub min_view_count: u64,
    pub search_terms: Vec<String>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            max_results: DEFAULT_MAX_RESULTS,
            min_view_count: clipdeck_core::DEFAULT_MIN_VIEW_COUNT,
            search_terms: DEFAULT_SEARCH_TERMS.iter().map(ToString::to_string).collect(),
        }
    }
}

impl SearchOptions {
    /// Items requested from the actor run: `max(max_results * 4, 40)`.
    #[must_use]
    pub fn actor_max_items(&self) -> u32 {
        self.max_results.saturating_mul(4).max(40)
    }

    /// Items read back from the run's dataset: `max(max_results * 4, 80)`.
    #[must_use]
    pub fn dataset_limit(&self) -> u32 {
        self.max_results.saturating_mul(4).max(80)
    }
}

/// Input body for the TikTok search actor.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchActorInput {
    pub search_terms: Vec<String>,
    pub search_type: &'static str,
    pub max_items: u32,
    pub language: &'static str,
    pub save_input: bool,
}

/// Envelope Apify wraps around single-object responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

/// Actor run metadata from `POST /acts/{id}/runs` and `GET /actor-runs/{id}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunData {
    pub id: String,
    pub status: String,
    #[serde(default)]
    pub default_dataset_id: Option<String>,
}

impl RunData {
    /// `true` once the run can no longer change status.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.status.as_str(),
            "SUCCEEDED" | "FAILED" | "ABORTED" | "TIMED-OUT"
        )
    }
}

/// A single TikTok item as returned in an actor dataset.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawVideo {
    #[serde(default)]
    pub id: Option<RawId>,
    #[serde(default, rename = "id_str")]
    pub id_str: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub desc: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub create_time: Option<RawTimestamp>,
    #[serde(default, rename = "createTimeISO")]
    pub create_time_iso: Option<String>,
    #[serde(default)]
    pub author: Option<RawAuthor>,
    #[serde(default)]
    pub author_meta: Option<RawAuthorMeta>,
    #[serde(default)]
    pub stats: Option<RawStats>,
    #[serde(default, deserialize_with = "lenient::count")]
    pub play_count: Option<u64>,
    #[serde(default, deserialize_with = "lenient::count")]
    pub digg_count: Option<u64>,
    #[serde(default, deserialize_with = "lenient::count")]
    pub comment_count: Option<u64>,
    #[serde(default, deserialize_with = "lenient::count")]
    pub share_count: Option<u64>,
    #[serde(default)]
    pub video: Option<RawMedia>,
    #[serde(default)]
    pub video_meta: Option<RawVideoMeta>,
    #[serde(default)]
    pub covers: Option<RawCovers>,
    #[serde(default)]
    pub hashtags: Option<Vec<Option<RawHashtag>>>,
    #[serde(default)]
    pub challenges: Option<Vec<Option<RawChallenge>>>,
}

impl RawVideo {
    /// Play count as reported by the actor, nested `stats` first.
    #[must_use]
    pub fn reported_play_count(&self) -> Option<u64> {
        self.stats
            .as_ref()
            .and_then(|s| s.play_count)
            .or(self.play_count)
    }
}

/// Ids arrive as strings or as bare JSON numbers.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Text(String),
    Number(u64),
}

impl RawId {
    #[must_use]
    pub fn into_string(self) -> String {
        match self {
            Self::Text(s) => s,
            Self::Number(n) => n.to_string(),
        }
    }
}

/// `createTime` is epoch seconds on most actors, a date-time string on some.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawTimestamp {
    Seconds(i64),
    FractionalSeconds(f64),
    Text(String),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAuthor {
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub unique_id: Option<String>,
    #[serde(default)]
    pub id: Option<RawId>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAuthorMeta {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub nick_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawStats {
    #[serde(default, deserialize_with = "lenient::count")]
    pub play_count: Option<u64>,
    #[serde(default, deserialize_with = "lenient::count")]
    pub digg_count: Option<u64>,
    #[serde(default, deserialize_with = "lenient::count")]
    pub share_count: Option<u64>,
    #[serde(default, deserialize_with = "lenient::count")]
    pub comment_count: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMedia {
    #[serde(default)]
    pub download_addr: Option<String>,
    #[serde(default)]
    pub play_addr: Option<String>,
    #[serde(default, deserialize_with = "lenient::count")]
    pub duration: Option<u64>,
    #[serde(default)]
    pub dynamic_cover: Option<String>,
    #[serde(default)]
    pub origin_cover: Option<String>,
    #[serde(default)]
    pub cover: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawVideoMeta {
    #[serde(default)]
    pub download_addr: Option<String>,
    #[serde(default)]
    pub cover_url: Option<String>,
    #[serde(default, deserialize_with = "lenient::count")]
    pub duration: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCovers {
    #[serde(default)]
    pub dynamic: Option<String>,
    #[serde(default)]
    pub origin: Option<String>,
    #[serde(default)]
    pub default: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawHashtag {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawChallenge {
    #[serde(default)]
    pub title: Option<String>,
}

mod lenient {
    use super::{Deserialize, Deserializer};

    /// Decodes a non-negative integer counter; any other value becomes `None`.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub(super) fn count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<serde_json::Value>::deserialize(deserializer)?;
        Ok(value.and_then(|v| {
            v.as_u64().or_else(|| {
                v.as_f64()
                    .filter(|f| f.is_finite() && *f >= 0.0 && f.fract() == 0.0)
                    .map(|f| f as u64)
            })
        }))
    }
}
