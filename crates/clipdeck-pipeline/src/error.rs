use clipdeck_history::HistoryError;
use clipdeck_publisher::PublishError;
use clipdeck_scraper::ScraperError;
use thiserror::Error;

/// Errors that abort a pipeline run. Per-video publish failures are not
/// among them; those end up as notes in the run result.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Scraper(#[from] ScraperError),

    #[error(transparent)]
    History(#[from] HistoryError),

    /// Only raised while building the publisher client, never mid-batch.
    #[error(transparent)]
    Publisher(#[from] PublishError),
}

impl PipelineError {
    /// `true` when the run failed because ingestion is not configured.
    #[must_use]
    pub fn is_credential(&self) -> bool {
        matches!(self, Self::Scraper(e) if e.is_credential())
    }
}
