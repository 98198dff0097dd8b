//! The daily curation pipeline: fetch, normalize, select, publish, record.

pub mod context;
pub mod error;
pub mod run;
pub mod select;

pub use context::PipelineContext;
pub use error::PipelineError;
pub use run::{run_daily, RunOptions, DEFAULT_MAX_CANDIDATES};
pub use select::select_videos;
