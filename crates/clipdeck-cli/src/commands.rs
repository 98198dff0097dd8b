//! Subcommand handlers. Each one prints pretty JSON to stdout; logs go to
//! stderr so the output stays pipeable.

use clipdeck_core::HISTORY_CAPACITY;
use clipdeck_pipeline::{run_daily, PipelineContext, RunOptions};
use serde::Serialize;

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Clamps a requested history length to what the store keeps.
pub(crate) fn clamp_limit(limit: usize) -> usize {
    limit.clamp(1, HISTORY_CAPACITY)
}

/// Runs the pipeline once.
///
/// # Errors
///
/// Returns an error if the run aborts (missing Apify token, provider failure,
/// or a history write failure). Per-video publish failures are part of the
/// printed result, not errors.
pub(crate) async fn run_once(ctx: &PipelineContext, options: RunOptions) -> anyhow::Result<()> {
    let result = run_daily(ctx, options).await?;
    tracing::info!(
        selected = result.selected_count,
        posted = result.posted_count,
        "cli: run complete"
    );
    print_json(&result)
}

pub(crate) async fn print_latest(ctx: &PipelineContext) -> anyhow::Result<()> {
    let latest = ctx.history.latest().await?;
    if latest.is_none() && !ctx.history.is_persistent() {
        tracing::warn!("cli: Upstash not configured; history is empty in this process");
    }
    print_json(&latest)
}

pub(crate) async fn print_history(ctx: &PipelineContext, limit: usize) -> anyhow::Result<()> {
    let history = ctx.history.recent(clamp_limit(limit)).await?;
    print_json(&history)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusReport<'a> {
    daily_target: usize,
    min_view_count: u64,
    apify_actor: &'a str,
    daily_cron: &'a str,
    scheduler_enabled: bool,
    capabilities: clipdeck_core::Capabilities,
    latest: Option<clipdeck_core::HistoryRecord>,
}

pub(crate) async fn print_status(ctx: &PipelineContext) -> anyhow::Result<()> {
    let latest = ctx.history.latest().await?;
    print_json(&StatusReport {
        daily_target: clipdeck_core::DAILY_VIDEO_TARGET,
        min_view_count: clipdeck_core::DEFAULT_MIN_VIEW_COUNT,
        apify_actor: &ctx.config.apify_actor,
        daily_cron: &ctx.config.daily_cron,
        scheduler_enabled: ctx.config.scheduler_enabled,
        capabilities: ctx.capabilities,
        latest,
    })
}
