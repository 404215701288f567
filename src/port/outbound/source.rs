//! Data source port for the fleet snapshot and instance actions.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{Host, HostId, Instance, InstanceAction, InstanceId};
use crate::error::Result;

/// Authoritative source of hosts and their instances.
///
/// Implementations own transport concerns such as timeouts and retries.
/// Every failure must carry a human-readable message.
#[async_trait]
pub trait FleetSource: Send + Sync {
    /// Fetch every host. Instances on the returned hosts are ignored.
    async fn get_hosts(&self) -> Result<Vec<Host>>;

    /// Fetch the instances of one host.
    async fn get_host_instances(&self, host_id: &HostId) -> Result<Vec<Instance>>;

    async fn start_instance(&self, host_id: &HostId, instance_id: &InstanceId) -> Result<()>;

    async fn stop_instance(&self, host_id: &HostId, instance_id: &InstanceId) -> Result<()>;

    async fn restart_instance(&self, host_id: &HostId, instance_id: &InstanceId) -> Result<()>;

    /// Source name for logging/debugging.
    fn source_name(&self) -> &'static str;

    /// Dispatch an [`InstanceAction`] to the matching method.
    async fn perform(
        &self,
        action: InstanceAction,
        host_id: &HostId,
        instance_id: &InstanceId,
    ) -> Result<()> {
        match action {
            InstanceAction::Start => self.start_instance(host_id, instance_id).await,
            InstanceAction::Stop => self.stop_instance(host_id, instance_id).await,
            InstanceAction::Restart => self.restart_instance(host_id, instance_id).await,
        }
    }
}

#[async_trait]
impl<T: FleetSource + ?Sized> FleetSource for Arc<T> {
    async fn get_hosts(&self) -> Result<Vec<Host>> {
        (**self).get_hosts().await
    }

    async fn get_host_instances(&self, host_id: &HostId) -> Result<Vec<Instance>> {
        (**self).get_host_instances(host_id).await
    }

    async fn start_instance(&self, host_id: &HostId, instance_id: &InstanceId) -> Result<()> {
        (**self).start_instance(host_id, instance_id).await
    }

    async fn stop_instance(&self, host_id: &HostId, instance_id: &InstanceId) -> Result<()> {
        (**self).stop_instance(host_id, instance_id).await
    }

    async fn restart_instance(&self, host_id: &HostId, instance_id: &InstanceId) -> Result<()> {
        (**self).restart_instance(host_id, instance_id).await
    }

    fn source_name(&self) -> &'static str {
        (**self).source_name()
    }
}
