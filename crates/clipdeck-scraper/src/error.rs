use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    /// The provider integration is not configured (no API token).
    #[error("Apify credentials missing. Set APIFY_TOKEN to enable TikTok ingestion.")]
    Credential,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Apify API error (status {status}) from {url}: {message}")]
    Provider {
        status: u16,
        url: String,
        message: String,
    },

    #[error("Apify run {run_id} finished with status {status}")]
    RunFailed { run_id: String, status: String },

    #[error("Apify run {run_id} still {status} after {polls} polls")]
    PollLimit {
        run_id: String,
        status: String,
        polls: u32,
    },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid Apify base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}

impl ScraperError {
    /// `true` when the error means ingestion is not configured at all, as
    /// opposed to a failed call against a configured provider.
    #[must_use]
    pub fn is_credential(&self) -> bool {
        matches!(self, Self::Credential)
    }
}
