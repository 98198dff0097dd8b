mod api;
mod middleware;
mod scheduler;

use std::sync::Arc;

use clipdeck_pipeline::PipelineContext;
use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, AppState},
    middleware::TriggerAuth,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = clipdeck_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let auth = TriggerAuth::from_config(&config);
    let bind_addr = config.bind_addr;
    let cron = config.daily_cron.clone();
    let scheduler_enabled = config.scheduler_enabled;
    let ctx = Arc::new(PipelineContext::from_config(config)?);

    let _scheduler = if scheduler_enabled {
        Some(scheduler::build_scheduler(Arc::clone(&ctx), &cron).await?)
    } else {
        tracing::info!("scheduler disabled; runs start only from trigger endpoints");
        None
    };

    let app = build_app(AppState { ctx }, auth);

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    tracing::info!(%bind_addr, "server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
