//! REST implementation of the [`FleetSource`](crate::port::FleetSource) port.

mod client;
pub mod dto;
mod settings;

pub use client::HttpFleetSource;
pub use settings::SourceConfig;
