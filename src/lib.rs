//! modelfleet - fleet view and control for model-serving hosts.
//!
//! Pulls hosts and their model instances from a fleet API, overlays live
//! status pushed over a WebSocket, and presents both in a user-controlled
//! order that persists across sessions.
//!
//! # Architecture
//!
//! - [`domain`] - Hosts, instances, status patches and order application
//! - [`port`] - Traits the application depends on ([`port::FleetSource`],
//!   [`port::KeyValueStore`])
//! - [`application`] - Reconciler, status overlay, order store and refresh
//!   scheduler
//! - [`adapter`] - HTTP source, WebSocket status feed, key-value stores and
//!   the CLI
//! - [`infrastructure`] - Configuration, logging, health checks and wiring
//! - [`error`] - Error types for the crate
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use modelfleet::adapter::outbound::http::HttpFleetSource;
//! use modelfleet::adapter::outbound::storage::MemoryStore;
//! use modelfleet::application::{OrderStore, Reconciler, StatusOverlay};
//!
//! # async fn run() -> modelfleet::error::Result<()> {
//! let source = HttpFleetSource::new("http://127.0.0.1:8080")?;
//! let reconciler = Reconciler::new(
//!     Arc::new(source),
//!     OrderStore::new(Arc::new(MemoryStore::new())),
//!     Arc::new(StatusOverlay::new()),
//! );
//! reconciler.refresh().await;
//! for host in &reconciler.effective_view().hosts {
//!     println!("{} {}", host.id, host.status);
//! }
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
