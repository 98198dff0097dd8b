use clipdeck_core::{AppConfig, Capabilities};
use clipdeck_history::HistoryStore;
use clipdeck_publisher::TikTokPublisher;
use clipdeck_scraper::ApifyClient;

use crate::error::PipelineError;

/// Everything a pipeline run needs, built once per process.
///
/// An integration that is not configured is `None` here and `false` in
/// [`Capabilities`]; the pipeline degrades accordingly instead of failing at
/// startup.
pub struct PipelineContext {
    pub config: AppConfig,
    pub capabilities: Capabilities,
    pub source: Option<ApifyClient>,
    pub publisher: Option<TikTokPublisher>,
    pub history: HistoryStore,
}

impl PipelineContext {
    /// Builds every configured client from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError`] if a configured client cannot be constructed
    /// (for example an unparseable Apify base URL).
    pub fn from_config(config: AppConfig) -> Result<Self, PipelineError> {
        let capabilities = Capabilities::from_config(&config);

        let source = match ApifyClient::from_config(&config) {
            Ok(client) => Some(client),
            Err(e) if e.is_credential() => None,
            Err(e) => return Err(e.into()),
        };
        let publisher = TikTokPublisher::from_config(&config)?;
        let history = HistoryStore::from_config(&config)?;

        tracing::info!(
            ingestion = capabilities.ingestion,
            publishing = capabilities.publishing,
            persistence = capabilities.persistence,
            trigger_protected = capabilities.trigger_protected,
            "pipeline: context ready"
        );

        Ok(Self {
            config,
            capabilities,
            source,
            publisher,
            history,
        })
    }
}
