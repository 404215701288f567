//! Builders for domain primitives used across tests.

use crate::domain::{Host, HostId, HostStatus, Instance, InstanceId, InstanceStatus};

/// Online host whose name equals its id.
pub fn host(id: &str) -> Host {
    Host::new(id, id).with_status(HostStatus::Online)
}

/// Stopped instance with an empty config.
pub fn instance(id: &str) -> Instance {
    Instance::new(id)
}

/// Running instance.
pub fn running(id: &str) -> Instance {
    Instance::new(id).with_status(InstanceStatus::Running)
}

/// Instances named `{prefix}0`, `{prefix}1`, ..., `{prefix}{n-1}`.
pub fn instances(prefix: &str, n: usize) -> Vec<Instance> {
    (0..n).map(|i| instance(&format!("{prefix}{i}"))).collect()
}

pub fn host_id(id: &str) -> HostId {
    HostId::new(id)
}

pub fn instance_id(id: &str) -> InstanceId {
    InstanceId::new(id)
}

/// Owned id list, for comparing against saved orders.
pub fn ids(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_string()).collect()
}
