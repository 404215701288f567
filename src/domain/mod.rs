//! Transport-agnostic fleet domain: hosts, instances, push patches and
//! user-defined ordering.

pub mod action;
pub mod host;
pub mod id;
pub mod instance;
pub mod order;
pub mod status;

pub use action::InstanceAction;
pub use host::{Host, HostMemory, HostStatus};
pub use id::{HostId, InstanceId};
pub use instance::{Instance, InstanceConfig, InstanceStatus};
pub use order::{apply_order, move_within, Direction, OrderKey};
pub use status::StatusPatch;
