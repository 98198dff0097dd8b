//! TikTok content-posting client and the sequential batch publisher.

pub mod batch;
pub mod caption;
pub mod client;
pub mod error;

pub use batch::{PublishOutcome, PublishState, CREDENTIALS_MISSING_NOTE};
pub use caption::build_caption;
pub use client::TikTokPublisher;
pub use error::PublishError;
