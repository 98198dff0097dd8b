//! Which integrations are enabled for this process.
//!
//! Every integration is optional. Instead of checking env vars at each call
//! site, components receive a [`Capabilities`] value derived once from
//! [`AppConfig`] and branch on it. A `false` flag is the degraded mode for
//! that integration:
//!
//! - `ingestion = false`: the pipeline fails with a credential error.
//! - `publishing = false`: selection still runs, posting is skipped with a
//!   single batch-level note.
//! - `persistence = false`: history appends are not stored, reads are empty.
//! - `trigger_protected = false`: trigger endpoints accept every caller.

use serde::Serialize;

use crate::AppConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Capabilities {
    pub ingestion: bool,
    pub publishing: bool,
    pub persistence: bool,
    pub trigger_protected: bool,
}

impl Capabilities {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            ingestion: config.apify_token.is_some(),
            publishing: config.tiktok_access_token.is_some()
                && config.tiktok_publisher_id.is_some(),
            persistence: config.upstash_redis_rest_url.is_some()
                && config.upstash_redis_rest_token.is_some(),
            trigger_protected: config.daily_trigger_secret.is_some(),
        }
    }
}
