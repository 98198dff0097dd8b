//! Sequential batch publishing with per-video failure isolation.

use clipdeck_core::Video;

use crate::client::TikTokPublisher;

/// Batch-level note recorded when publishing credentials are not configured.
pub const CREDENTIALS_MISSING_NOTE: &str =
    "TikTok credentials missing. Skipped publishing, but selection completed.";

/// Where one video is in its publish attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishState {
    Pending,
    Uploaded { upload_id: String },
    Published,
    /// Formatted as `Failed to publish {id}: {error}`.
    Failed(String),
}

impl PublishState {
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Published | Self::Failed(_))
    }
}

/// Result of publishing a batch: ids that reached `Published`, in selection
/// order, and one note per failed video.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishOutcome {
    pub published: Vec<String>,
    pub failures: Vec<String>,
}

impl PublishOutcome {
    /// Folds one video's terminal state into the outcome.
    #[must_use]
    pub fn record(mut self, video: &Video, state: PublishState) -> Self {
        match state {
            PublishState::Published => self.published.push(video.id.clone()),
            PublishState::Failed(note) => self.failures.push(note),
            other => {
                tracing::warn!(
                    video_id = %video.id,
                    state = ?other,
                    "publisher: non-terminal state recorded"
                );
            }
        }
        self
    }

    /// Outcome for a batch that was never attempted.
    #[must_use]
    pub fn credentials_missing() -> Self {
        Self {
            published: Vec::new(),
            failures: vec![CREDENTIALS_MISSING_NOTE.to_string()],
        }
    }
}

impl TikTokPublisher {
    /// Publishes each video in order, one at a time.
    ///
    /// A failure at any step of one video is recorded and the next video is
    /// attempted; the batch itself never fails.
    pub async fn publish_all(&self, videos: &[Video]) -> PublishOutcome {
        let mut outcome = PublishOutcome::default();
        for video in videos {
            let state = self.publish_video(video).await;
            outcome = outcome.record(video, state);
        }
        tracing::info!(
            attempted = videos.len(),
            published = outcome.published.len(),
            failed = outcome.failures.len(),
            "publisher: batch complete"
        );
        outcome
    }

    /// Drives one video from `Pending` to `Published` or `Failed`.
    pub async fn publish_video(&self, video: &Video) -> PublishState {
        let mut state = PublishState::Pending;
        while !state.is_terminal() {
            state = match state {
                PublishState::Pending => match self.upload(video).await {
                    Ok(upload_id) => PublishState::Uploaded { upload_id },
                    Err(e) => failed(video, &e),
                },
                PublishState::Uploaded { upload_id } => {
                    match self.publish(video, &upload_id).await {
                        Ok(()) => PublishState::Published,
                        Err(e) => failed(video, &e),
                    }
                }
                terminal => terminal,
            };
        }

        match &state {
            PublishState::Published => {
                tracing::info!(video_id = %video.id, "publisher: published");
            }
            PublishState::Failed(note) => {
                tracing::warn!(video_id = %video.id, note = %note, "publisher: failed");
            }
            _ => {}
        }
        state
    }
}

fn failed(video: &Video, error: &crate::PublishError) -> PublishState {
    PublishState::Failed(format!("Failed to publish {}: {error}", video.id))
}
