//! Bounded run history backed by Upstash Redis over its REST API.

pub mod error;
pub mod kv;
pub mod store;

pub use error::HistoryError;
pub use kv::KvClient;
pub use store::{HistoryStore, HISTORY_KEY, LATEST_KEY};
