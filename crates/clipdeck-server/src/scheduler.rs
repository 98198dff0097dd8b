//! In-process daily trigger.
//!
//! Runs the pipeline on the configured cron expression so a deployment
//! without an external cron still publishes once a day.

use std::sync::Arc;

use clipdeck_pipeline::{run_daily, PipelineContext, RunOptions};
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

/// Builds and starts the scheduler with the daily pipeline job.
///
/// The returned handle must be kept alive for the lifetime of the process;
/// dropping it stops the job.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] if `cron` does not parse, or the scheduler
/// cannot be initialised or started.
pub async fn build_scheduler(
    ctx: Arc<PipelineContext>,
    cron: &str,
) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;

    let job = Job::new_async(cron, move |_uuid, _lock| {
        let ctx = Arc::clone(&ctx);
        Box::pin(async move {
            tracing::info!("scheduler: starting daily run");
            run_scheduled(&ctx).await;
        })
    })?;
    scheduler.add(job).await?;

    scheduler.start().await?;
    tracing::info!(cron, "scheduler: daily run registered");
    Ok(scheduler)
}

async fn run_scheduled(ctx: &PipelineContext) {
    match run_daily(ctx, RunOptions::default()).await {
        Ok(result) => tracing::info!(
            date = %result.date,
            selected = result.selected_count,
            posted = result.posted_count,
            failures = result.failures.len(),
            "scheduler: daily run complete"
        ),
        Err(e) => tracing::error!(error = %e, "scheduler: daily run failed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> Arc<PipelineContext> {
        let config = clipdeck_core::build_app_config(|_| Err(std::env::VarError::NotPresent))
            .expect("default config should build");
        Arc::new(PipelineContext::from_config(config).expect("context should build"))
    }

    #[tokio::test]
    async fn rejects_invalid_cron() {
        let result = build_scheduler(context(), "not a cron").await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn accepts_default_cron() {
        let mut scheduler = build_scheduler(context(), "0 0 9 * * *")
            .await
            .expect("scheduler should start");
        scheduler.shutdown().await.expect("scheduler should stop");
    }
}
