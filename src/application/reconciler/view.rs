//! Effective view derivation.
//!
//! The effective view is the canonical snapshot with overlay fields merged
//! in and both levels ordered by the saved orders. It is a pure function of
//! those inputs; the reconciler memoizes it on input revisions.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;

use crate::domain::{apply_order, Host, HostId, StatusPatch};

/// Merged, ordered fleet handed to presentation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FleetView {
    pub hosts: Vec<Host>,
}

impl FleetView {
    #[must_use]
    pub fn host(&self, id: &str) -> Option<&Host> {
        self.hosts.iter().find(|h| h.id.as_str() == id)
    }

    /// Host ids in display order.
    #[must_use]
    pub fn host_ids(&self) -> Vec<&str> {
        self.hosts.iter().map(|h| h.id.as_str()).collect()
    }

    /// Instance ids of one host in display order.
    #[must_use]
    pub fn instance_ids(&self, host_id: &str) -> Vec<&str> {
        self.host(host_id)
            .map(|h| h.instances.iter().map(|i| i.id.as_str()).collect())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }
}

/// Build the effective view from its inputs.
///
/// Hosts missing from `instance_orders` keep their instances in snapshot
/// order.
#[must_use]
pub fn derive_view(
    hosts: &[Host],
    overlay: &HashMap<HostId, StatusPatch>,
    host_order: &[String],
    instance_orders: &HashMap<HostId, Vec<String>>,
) -> FleetView {
    let merged: Vec<Host> = hosts
        .iter()
        .map(|host| {
            let mut host = host.clone();
            if let Some(patch) = overlay.get(&host.id) {
                host.apply_patch(patch);
            }
            if let Some(order) = instance_orders.get(&host.id) {
                host.instances = apply_order(std::mem::take(&mut host.instances), order);
            }
            host
        })
        .collect();

    FleetView {
        hosts: apply_order(merged, host_order),
    }
}

/// Revisions a memoized view was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct ViewKey {
    pub inputs: u64,
    pub overlay: u64,
}

#[derive(Debug)]
pub(super) struct MemoizedView {
    pub key: ViewKey,
    pub view: Arc<FleetView>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{HostMemory, HostStatus, Instance};

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    fn fleet() -> Vec<Host> {
        vec![
            Host::new("h1", "one")
                .with_status(HostStatus::Offline)
                .with_memory(HostMemory::new(10, 100))
                .with_instances(vec![Instance::new("i1"), Instance::new("i2")]),
            Host::new("h2", "two").with_status(HostStatus::Online),
        ]
    }

    #[test]
    fn no_inputs_reproduces_snapshot() {
        let hosts = fleet();
        let view = derive_view(&hosts, &HashMap::new(), &[], &HashMap::new());
        assert_eq!(view.hosts, hosts);
    }

    #[test]
    fn overlay_replaces_only_covered_fields() {
        let mut overlay = HashMap::new();
        overlay.insert(HostId::new("h1"), StatusPatch::status(HostStatus::Online));

        let view = derive_view(&fleet(), &overlay, &[], &HashMap::new());
        let h1 = view.host("h1").unwrap();
        assert_eq!(h1.status, HostStatus::Online);
        assert_eq!(h1.memory, Some(HostMemory::new(10, 100)));
        assert_eq!(h1.name, "one");
        assert_eq!(h1.instances.len(), 2);
    }

    #[test]
    fn both_levels_are_ordered() {
        let mut instance_orders = HashMap::new();
        instance_orders.insert(HostId::new("h1"), ids(&["i2", "i1"]));

        let view = derive_view(&fleet(), &HashMap::new(), &ids(&["h2"]), &instance_orders);
        assert_eq!(view.host_ids(), vec!["h2", "h1"]);
        assert_eq!(view.instance_ids("h1"), vec!["i2", "i1"]);
    }

    #[test]
    fn overlay_for_unknown_host_is_ignored() {
        let mut overlay = HashMap::new();
        overlay.insert(HostId::new("ghost"), StatusPatch::status(HostStatus::Online));

        let view = derive_view(&fleet(), &overlay, &[], &HashMap::new());
        assert_eq!(view.len(), 2);
        assert!(view.host("ghost").is_none());
    }
}
