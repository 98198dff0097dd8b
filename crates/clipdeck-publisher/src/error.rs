use thiserror::Error;

/// A failure while moving one video from its source to the target account.
///
/// The batch publisher downgrades every variant to a failure note, so none of
/// these abort a run.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("media download failed: {status} from {url}")]
    Download { status: u16, url: String },

    #[error("TikTok upload failed: {status} - {message}")]
    Upload { status: u16, message: String },

    #[error("TikTok upload did not return upload_id")]
    MissingUploadId,

    #[error("TikTok publish failed: {status} - {message}")]
    Publish { status: u16, message: String },
}
