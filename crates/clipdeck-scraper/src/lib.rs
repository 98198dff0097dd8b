pub mod client;
pub mod error;
pub mod normalize;
pub mod types;

pub use client::ApifyClient;
pub use error::ScraperError;
pub use normalize::{normalize_all, normalize_video};
pub use types::{RawVideo, SearchOptions, DEFAULT_SEARCH_TERMS};
