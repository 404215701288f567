//! Application services (use cases).
//!
//! These services own fleet state and coordinate the outbound ports to
//! serve presentation: refreshing, acting on instances and reordering.

pub mod order_store;
pub mod overlay;
pub mod reconciler;
pub mod scheduler;

pub use order_store::OrderStore;
pub use overlay::{OverlaySnapshot, StatusOverlay};
pub use reconciler::{derive_view, FleetView, Reconciler, RefreshOutcome};
pub use scheduler::{RefreshPolicy, RefreshScheduler, SchedulerHandle};
