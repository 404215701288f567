//! Programmable [`FleetSource`] for testing.
//!
//! [`ScriptedSource`] serves a mutable in-memory fleet. Failures, delays
//! and per-call host lists can be injected through `&self`, so a test can
//! keep an `Arc` to the source it handed to the reconciler and steer it
//! mid-test.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::time::sleep;

use crate::domain::{Host, HostId, Instance, InstanceAction, InstanceId, InstanceStatus};
use crate::error::{Error, Result};
use crate::port::FleetSource;

/// One scripted `get_hosts` answer.
struct ScriptedCall {
    delay: Duration,
    hosts: Vec<Host>,
}

/// In-memory fleet with failure injection and call counters.
#[derive(Default)]
pub struct ScriptedSource {
    fleet: Mutex<Vec<(Host, Vec<Instance>)>>,
    scripted_calls: Mutex<VecDeque<ScriptedCall>>,
    host_failure: Mutex<Option<String>>,
    instance_failures: Mutex<HashMap<HostId, String>>,
    action_failure: Mutex<Option<String>>,
    hosts_delay: Mutex<Duration>,
    instance_delays: Mutex<HashMap<HostId, Duration>>,
    host_calls: AtomicUsize,
    instance_calls: AtomicUsize,
    actions: Mutex<Vec<(InstanceAction, HostId, InstanceId)>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a host with its instances.
    pub fn with_host(self, host: Host, instances: Vec<Instance>) -> Self {
        self.add_host(host, instances);
        self
    }

    pub fn add_host(&self, host: Host, instances: Vec<Instance>) {
        self.fleet.lock().push((host, instances));
    }

    /// Drop a host from the fleet. Returns whether it existed.
    pub fn remove_host(&self, host_id: &str) -> bool {
        let mut fleet = self.fleet.lock();
        let before = fleet.len();
        fleet.retain(|(host, _)| host.id.as_str() != host_id);
        fleet.len() != before
    }

    /// Replace a host's instance list.
    pub fn set_instances(&self, host_id: &str, instances: Vec<Instance>) {
        if let Some((_, current)) = self
            .fleet
            .lock()
            .iter_mut()
            .find(|(host, _)| host.id.as_str() == host_id)
        {
            *current = instances;
        }
    }

    /// Make every `get_hosts` call fail with `message`.
    pub fn fail_hosts(&self, message: &str) {
        *self.host_failure.lock() = Some(message.to_string());
    }

    /// Make instance fetches for one host fail with `message`.
    pub fn fail_instances(&self, host_id: &str, message: &str) {
        self.instance_failures
            .lock()
            .insert(HostId::new(host_id), message.to_string());
    }

    /// Make every instance action fail with `message`.
    pub fn fail_actions(&self, message: &str) {
        *self.action_failure.lock() = Some(message.to_string());
    }

    pub fn clear_failures(&self) {
        *self.host_failure.lock() = None;
        self.instance_failures.lock().clear();
        *self.action_failure.lock() = None;
    }

    /// Delay every unscripted `get_hosts` call.
    pub fn set_hosts_delay(&self, delay: Duration) {
        *self.hosts_delay.lock() = delay;
    }

    /// Delay instance fetches for one host. A scripted failure for the
    /// host is reported after the delay.
    pub fn set_instances_delay(&self, host_id: &str, delay: Duration) {
        self.instance_delays
            .lock()
            .insert(HostId::new(host_id), delay);
    }

    /// Answer the next `get_hosts` call with `hosts` after `delay`.
    ///
    /// Scripted answers are consumed in order before the fleet is served.
    pub fn script_hosts(&self, delay: Duration, hosts: Vec<Host>) {
        self.scripted_calls
            .lock()
            .push_back(ScriptedCall { delay, hosts });
    }

    pub fn host_calls(&self) -> usize {
        self.host_calls.load(Ordering::SeqCst)
    }

    pub fn instance_calls(&self) -> usize {
        self.instance_calls.load(Ordering::SeqCst)
    }

    /// Actions received, successful or not, in call order.
    pub fn actions(&self) -> Vec<(InstanceAction, HostId, InstanceId)> {
        self.actions.lock().clone()
    }

    fn act(
        &self,
        action: InstanceAction,
        host_id: &HostId,
        instance_id: &InstanceId,
    ) -> Result<()> {
        self.actions
            .lock()
            .push((action, host_id.clone(), instance_id.clone()));

        if let Some(message) = self.action_failure.lock().clone() {
            return Err(Error::Remote(message));
        }

        let mut fleet = self.fleet.lock();
        let instance = fleet
            .iter_mut()
            .find(|(host, _)| &host.id == host_id)
            .and_then(|(_, instances)| instances.iter_mut().find(|i| &i.id == instance_id))
            .ok_or_else(|| Error::Remote(format!("instance {instance_id} not found")))?;
        instance.status = match action {
            InstanceAction::Start | InstanceAction::Restart => InstanceStatus::Running,
            InstanceAction::Stop => InstanceStatus::Stopped,
        };
        Ok(())
    }
}

#[async_trait]
impl FleetSource for ScriptedSource {
    async fn get_hosts(&self) -> Result<Vec<Host>> {
        self.host_calls.fetch_add(1, Ordering::SeqCst);

        let scripted = self.scripted_calls.lock().pop_front();
        if let Some(call) = scripted {
            sleep(call.delay).await;
            return Ok(call.hosts);
        }

        let delay = *self.hosts_delay.lock();
        if !delay.is_zero() {
            sleep(delay).await;
        }
        if let Some(message) = self.host_failure.lock().clone() {
            return Err(Error::Remote(message));
        }
        Ok(self
            .fleet
            .lock()
            .iter()
            .map(|(host, _)| host.clone().with_instances(Vec::new()))
            .collect())
    }

    async fn get_host_instances(&self, host_id: &HostId) -> Result<Vec<Instance>> {
        self.instance_calls.fetch_add(1, Ordering::SeqCst);

        let delay = self.instance_delays.lock().get(host_id).copied();
        if let Some(delay) = delay {
            sleep(delay).await;
        }
        if let Some(message) = self.instance_failures.lock().get(host_id).cloned() {
            return Err(Error::Remote(message));
        }
        Ok(self
            .fleet
            .lock()
            .iter()
            .find(|(host, _)| &host.id == host_id)
            .map(|(_, instances)| instances.clone())
            .unwrap_or_default())
    }

    async fn start_instance(&self, host_id: &HostId, instance_id: &InstanceId) -> Result<()> {
        self.act(InstanceAction::Start, host_id, instance_id)
    }

    async fn stop_instance(&self, host_id: &HostId, instance_id: &InstanceId) -> Result<()> {
        self.act(InstanceAction::Stop, host_id, instance_id)
    }

    async fn restart_instance(&self, host_id: &HostId, instance_id: &InstanceId) -> Result<()> {
        self.act(InstanceAction::Restart, host_id, instance_id)
    }

    fn source_name(&self) -> &'static str {
        "scripted"
    }
}
