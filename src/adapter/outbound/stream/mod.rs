//! Real-time status push channel.

mod backoff;
mod feed;
pub mod message;
mod settings;

pub use feed::{FeedHandle, StatusFeed};
pub use message::{handle_message, StatusMessage};
pub use settings::{ReconnectionConfig, StatusStreamConfig};
