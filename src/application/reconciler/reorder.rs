//! Reorder controller.
//!
//! Moves are computed against the full effective order of the sibling set,
//! so entities the saved order has never seen are already placed at the
//! tail before the swap. A move that changes nothing writes nothing.

use tracing::{debug, info};

use super::Reconciler;
use crate::domain::{move_within, Direction, HostId, InstanceId};

impl Reconciler {
    /// Move a host one step up or down in the display order.
    ///
    /// Returns `false` when the host is unknown or already at the boundary.
    pub fn move_host(&self, host_id: &HostId, direction: Direction) -> bool {
        let siblings: Vec<String> = self
            .snapshot
            .read()
            .iter()
            .map(|host| host.id.as_str().to_string())
            .collect();
        let saved = self.host_order.read().clone();

        let Some(order) = move_within(siblings, &saved, host_id.as_str(), direction) else {
            debug!(host_id = %host_id, %direction, "Host move is a no-op");
            return false;
        };

        self.orders.write_host_order(&order);
        *self.host_order.write() = order;
        self.inputs_changed();

        info!(host_id = %host_id, %direction, "Moved host");
        true
    }

    /// Move an instance one step up or down within its host.
    ///
    /// Returns `false` when the host or instance is unknown or the instance
    /// is already at the boundary.
    pub fn move_instance(
        &self,
        host_id: &HostId,
        instance_id: &InstanceId,
        direction: Direction,
    ) -> bool {
        let siblings: Option<Vec<String>> = self
            .snapshot
            .read()
            .iter()
            .find(|host| &host.id == host_id)
            .map(|host| {
                host.instances
                    .iter()
                    .map(|instance| instance.id.as_str().to_string())
                    .collect()
            });
        let Some(siblings) = siblings else {
            debug!(host_id = %host_id, "Instance move on unknown host is a no-op");
            return false;
        };
        let saved = self.instance_order(host_id);

        let Some(order) = move_within(siblings, &saved, instance_id.as_str(), direction) else {
            debug!(
                host_id = %host_id,
                instance_id = %instance_id,
                %direction,
                "Instance move is a no-op"
            );
            return false;
        };

        self.orders.write_instance_order(host_id, &order);
        self.instance_orders.write().insert(host_id.clone(), order);
        self.inputs_changed();

        info!(host_id = %host_id, instance_id = %instance_id, %direction, "Moved instance");
        true
    }
}
