use thiserror::Error;

/// Errors returned by the Upstash REST client and the history store.
#[derive(Debug, Error)]
pub enum HistoryError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Upstash rejected the request or answered with an `"error"` field.
    #[error("Upstash API error: {0}")]
    Api(String),

    /// A record or response body did not (de)serialize.
    #[error("JSON serialization error for {context}: {source}")]
    Serialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}
