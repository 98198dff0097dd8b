mod commands;

use clap::{Parser, Subcommand};
use clipdeck_core::{DEFAULT_MIN_VIEW_COUNT, HISTORY_CAPACITY};
use clipdeck_pipeline::DEFAULT_MAX_CANDIDATES;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "clipdeck-cli")]
#[command(about = "Daily football-edit curation pipeline")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the pipeline once and print the result
    Run {
        /// Minimum view count a candidate needs to be selected
        #[arg(long, default_value_t = DEFAULT_MIN_VIEW_COUNT)]
        min_views: u64,

        /// Upper bound on candidates requested from the source
        #[arg(long, default_value_t = DEFAULT_MAX_CANDIDATES)]
        max_candidates: u32,

        /// Select only; do not publish anything
        #[arg(long)]
        skip_posting: bool,
    },
    /// Print the most recent recorded run
    Latest,
    /// Print recent runs, most recent first
    History {
        /// Number of runs to print (clamped to 1..=30)
        #[arg(long, default_value_t = HISTORY_CAPACITY)]
        limit: usize,
    },
    /// Print which integrations are configured
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();
    let config = clipdeck_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let Some(command) = cli.command else {
        println!("clipdeck-cli: pass a subcommand (run, latest, history, status)");
        return Ok(());
    };

    let ctx = clipdeck_pipeline::PipelineContext::from_config(config)?;
    match command {
        Commands::Run {
            min_views,
            max_candidates,
            skip_posting,
        } => {
            let options = clipdeck_pipeline::RunOptions {
                min_view_count: min_views,
                max_candidates,
                skip_posting,
            };
            commands::run_once(&ctx, options).await?;
        }
        Commands::Latest => commands::print_latest(&ctx).await?,
        Commands::History { limit } => commands::print_history(&ctx, limit).await?,
        Commands::Status => commands::print_status(&ctx).await?,
    }

    Ok(())
}
