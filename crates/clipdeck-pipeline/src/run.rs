use chrono::Utc;
use clipdeck_core::{RunResult, Video, DAILY_VIDEO_TARGET, DEFAULT_MIN_VIEW_COUNT};
use clipdeck_publisher::PublishOutcome;
use clipdeck_scraper::{normalize_all, ScraperError, SearchOptions};

use crate::context::PipelineContext;
use crate::error::PipelineError;
use crate::select::select_videos;

/// Candidates requested from the source when the caller does not say.
pub const DEFAULT_MAX_CANDIDATES: u32 = 32;

/// Caller-tunable knobs for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    pub min_view_count: u64,
    pub max_candidates: u32,
    /// Select only; never contact the publishing API.
    pub skip_posting: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            min_view_count: DEFAULT_MIN_VIEW_COUNT,
            max_candidates: DEFAULT_MAX_CANDIDATES,
            skip_posting: false,
        }
    }
}

/// Runs the pipeline once and records the result in history.
///
/// Stages run strictly one after another. Per-video publish failures and a
/// missing publisher become notes in [`RunResult::failures`]; everything
/// else aborts the run without a partial result.
///
/// # Errors
///
/// - [`PipelineError::Scraper`] if ingestion is not configured or the source
///   call fails.
/// - [`PipelineError::History`] if the result cannot be persisted.
pub async fn run_daily(
    ctx: &PipelineContext,
    options: RunOptions,
) -> Result<RunResult, PipelineError> {
    let date = Utc::now().date_naive();
    let source = ctx.source.as_ref().ok_or(ScraperError::Credential)?;

    tracing::info!(
        %date,
        min_view_count = options.min_view_count,
        max_candidates = options.max_candidates,
        skip_posting = options.skip_posting,
        "pipeline: run starting"
    );

    let search = SearchOptions {
        max_results: options.max_candidates,
        min_view_count: options.min_view_count,
        ..SearchOptions::default()
    };
    let raw = source.fetch_candidates(&search).await?;
    let candidates = rank_candidates(normalize_all(raw), options);
    let fetched_count = candidates.len();

    let selected: Vec<Video> = candidates.into_iter().take(DAILY_VIDEO_TARGET).collect();
    tracing::info!(
        fetched = fetched_count,
        selected = selected.len(),
        "pipeline: selection complete"
    );

    let outcome = if options.skip_posting {
        PublishOutcome::default()
    } else if let Some(publisher) = &ctx.publisher {
        publisher.publish_all(&selected).await
    } else {
        tracing::warn!("pipeline: publishing not configured, skipping");
        PublishOutcome::credentials_missing()
    };

    let result = RunResult {
        date,
        fetched_count,
        selected_count: selected.len(),
        posted_count: outcome.published.len(),
        videos: selected,
        failures: outcome.failures,
    };

    let record = ctx.history.append(result.clone()).await?;
    tracing::info!(
        id = %record.id,
        posted = result.posted_count,
        failures = result.failures.len(),
        "pipeline: run complete"
    );

    Ok(result)
}

/// Eligible candidates, best first, capped at `options.max_candidates`.
///
/// This list is what `fetchedCount` reports; the daily quota is taken from
/// its head.
fn rank_candidates(candidates: Vec<Video>, options: RunOptions) -> Vec<Video> {
    let cap = usize::try_from(options.max_candidates).unwrap_or(usize::MAX);
    select_videos(candidates, options.min_view_count, cap)
}
