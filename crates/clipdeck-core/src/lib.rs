//! Shared domain types and configuration for clipdeck.

pub mod app_config;
pub mod capabilities;
pub mod config;
pub mod run;
pub mod video;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use capabilities::Capabilities;
pub use config::{build_app_config, load_app_config, load_app_config_from_env};
pub use run::{HistoryRecord, RunResult};
pub use video::Video;

/// Number of videos selected and attempted for publish on each run.
pub const DAILY_VIDEO_TARGET: usize = 6;

/// Default popularity floor for a candidate to be considered.
pub const DEFAULT_MIN_VIEW_COUNT: u64 = 500_000;

/// Maximum number of history records kept in the bounded log.
pub const HISTORY_CAPACITY: usize = 30;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
