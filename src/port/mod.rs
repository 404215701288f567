//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Ports are the seams between the reconciliation core and the outside
//! world. The core never talks HTTP, WebSocket or disk directly; adapters
//! implement these traits and are injected at bootstrap.
//!
//! # Architecture
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │      Application        │
//!                    │  (reconciler, ordering) │
//!                    └─────────────────────────┘
//!                         │               │
//!                         ▼               ▼
//!                  ┌─────────────┐  ┌─────────────┐
//!                  │ FleetSource │  │ KeyValue    │
//!                  │  (HTTP)     │  │ Store (file)│
//!                  └─────────────┘  └─────────────┘
//! ```
//!
//! # Available Ports
//!
//! - [`FleetSource`] - Authoritative host/instance snapshot and instance actions
//! - [`KeyValueStore`] - Synchronous string storage backing saved orders

pub mod outbound;

pub use outbound::source::FleetSource;
pub use outbound::storage::KeyValueStore;
