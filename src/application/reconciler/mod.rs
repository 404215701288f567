//! Reconciliation engine.
//!
//! Owns the canonical snapshot pulled from the [`FleetSource`], layers the
//! [`StatusOverlay`] and saved orders over it on read, and exposes the
//! mutating operations presentation can trigger.
//!
//! # Consistency
//!
//! - The canonical snapshot is replaced in a single pointer swap, so readers
//!   see either the previous or the next host list, never a mix.
//! - Concurrent refreshes are not de-duplicated; whichever resolves last is
//!   published.
//! - Reorders write the store and the in-memory caches synchronously, so a
//!   read right after a reorder already reflects it.
//! - Writers bump the input revision after changing state; readers load it
//!   before reading state. A memoized view can therefore only be keyed with
//!   a revision older than its data, never newer.

mod reorder;
mod view;

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use futures_util::future::join_all;
use parking_lot::{Mutex, RwLock};
use tokio::sync::watch;
use tracing::{debug, info, warn};

pub use view::{derive_view, FleetView};
use view::{MemoizedView, ViewKey};

use super::order_store::OrderStore;
use super::overlay::StatusOverlay;
use crate::domain::{Host, HostId, InstanceAction, InstanceId};
use crate::error::{ActionError, Result};
use crate::port::FleetSource;

/// What a single refresh did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// A new canonical snapshot was published.
    Published {
        hosts: usize,
        /// Hosts whose instance fetch failed and are shown without instances.
        degraded: Vec<HostId>,
    },
    /// The host list could not be fetched; the previous snapshot stays.
    Stale { error: String },
}

impl RefreshOutcome {
    #[must_use]
    pub const fn is_published(&self) -> bool {
        matches!(self, Self::Published { .. })
    }
}

/// Central fleet state machine.
pub struct Reconciler {
    source: Arc<dyn FleetSource>,
    orders: OrderStore,
    overlay: Arc<StatusOverlay>,
    snapshot: RwLock<Arc<Vec<Host>>>,
    /// Number of refreshes currently running.
    in_flight: AtomicUsize,
    last_error: RwLock<Option<String>>,
    host_order: RwLock<Vec<String>>,
    /// Lazily filled from the order store on first lookup per host.
    instance_orders: RwLock<HashMap<HostId, Vec<String>>>,
    /// Revision of snapshot + orders, the reconciler-owned view inputs.
    inputs: AtomicU64,
    view: Mutex<Option<MemoizedView>>,
    /// Notified on every change presentation may want to re-render for.
    changes: watch::Sender<u64>,
}

impl Reconciler {
    /// Create a reconciler with an empty snapshot.
    ///
    /// The saved host order is read once here; instance orders are read on
    /// first need.
    #[must_use]
    pub fn new(
        source: Arc<dyn FleetSource>,
        orders: OrderStore,
        overlay: Arc<StatusOverlay>,
    ) -> Self {
        let host_order = orders.read_host_order();
        let (changes, _) = watch::channel(0);
        Self {
            source,
            orders,
            overlay,
            snapshot: RwLock::new(Arc::new(Vec::new())),
            in_flight: AtomicUsize::new(0),
            last_error: RwLock::new(None),
            host_order: RwLock::new(host_order),
            instance_orders: RwLock::new(HashMap::new()),
            inputs: AtomicU64::new(0),
            view: Mutex::new(None),
            changes,
        }
    }

    /// Pull a fresh snapshot from the source.
    ///
    /// Instance lists are fetched for every host concurrently. A host whose
    /// instance fetch fails is published with no instances. Only a failure
    /// of the host list itself is recorded as the last error, and it leaves
    /// the previous snapshot in place.
    pub async fn refresh(&self) -> RefreshOutcome {
        let _loading = LoadingGuard::enter(self);

        let hosts = match self.source.get_hosts().await {
            Ok(hosts) => hosts,
            Err(err) => {
                let error = err.to_string();
                warn!(
                    source = self.source.source_name(),
                    error = %error,
                    "Failed to fetch hosts, keeping previous snapshot"
                );
                *self.last_error.write() = Some(error.clone());
                self.notify();
                return RefreshOutcome::Stale { error };
            }
        };

        let fetches = hosts.into_iter().map(|host| async move {
            let result = self.source.get_host_instances(&host.id).await;
            (host, result)
        });
        let settled = join_all(fetches).await;

        let mut degraded = Vec::new();
        let snapshot: Vec<Host> = settled
            .into_iter()
            .map(|(mut host, result)| {
                match result {
                    Ok(instances) => host.instances = instances,
                    Err(err) => {
                        warn!(
                            host_id = %host.id,
                            error = %err,
                            "Failed to fetch instances, showing host without instances"
                        );
                        host.instances = Vec::new();
                        degraded.push(host.id.clone());
                    }
                }
                host
            })
            .collect();

        let hosts = snapshot.len();
        *self.snapshot.write() = Arc::new(snapshot);
        *self.last_error.write() = None;
        self.inputs_changed();

        debug!(hosts, degraded = degraded.len(), "Published fleet snapshot");
        RefreshOutcome::Published { hosts, degraded }
    }

    pub async fn start_instance(&self, host_id: &HostId, instance_id: &InstanceId) -> Result<()> {
        self.perform(InstanceAction::Start, host_id, instance_id)
            .await
    }

    pub async fn stop_instance(&self, host_id: &HostId, instance_id: &InstanceId) -> Result<()> {
        self.perform(InstanceAction::Stop, host_id, instance_id).await
    }

    pub async fn restart_instance(
        &self,
        host_id: &HostId,
        instance_id: &InstanceId,
    ) -> Result<()> {
        self.perform(InstanceAction::Restart, host_id, instance_id)
            .await
    }

    /// Run an instance action, then refresh before returning.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError`] when the source rejects the action; no
    /// refresh happens in that case.
    pub async fn perform(
        &self,
        action: InstanceAction,
        host_id: &HostId,
        instance_id: &InstanceId,
    ) -> Result<()> {
        info!(
            %action,
            host_id = %host_id,
            instance_id = %instance_id,
            "Requesting instance action"
        );

        if let Err(err) = self.source.perform(action, host_id, instance_id).await {
            let err = ActionError::from_failure(action, host_id, instance_id, &err);
            warn!(
                %action,
                host_id = %host_id,
                instance_id = %instance_id,
                error = %err,
                "Instance action failed"
            );
            return Err(err.into());
        }

        self.refresh().await;
        Ok(())
    }

    /// Merged, ordered view of the fleet.
    ///
    /// Recomputed only when the snapshot, an order or the overlay changed
    /// since the last call.
    #[must_use]
    pub fn effective_view(&self) -> Arc<FleetView> {
        let inputs = self.inputs.load(Ordering::Acquire);
        let overlay = self.overlay.snapshot();
        let key = ViewKey {
            inputs,
            overlay: overlay.revision,
        };

        let mut memo = self.view.lock();
        if let Some(cached) = memo.as_ref() {
            if cached.key == key {
                return Arc::clone(&cached.view);
            }
        }

        let hosts = Arc::clone(&self.snapshot.read());
        let host_order = self.host_order.read().clone();
        let instance_orders: HashMap<HostId, Vec<String>> = hosts
            .iter()
            .map(|host| (host.id.clone(), self.instance_order(&host.id)))
            .collect();

        let view = Arc::new(derive_view(
            &hosts,
            &overlay.entries,
            &host_order,
            &instance_orders,
        ));
        *memo = Some(MemoizedView {
            key,
            view: Arc::clone(&view),
        });
        view
    }

    /// Canonical snapshot as last pulled, before overlay and ordering.
    #[must_use]
    pub fn snapshot(&self) -> Arc<Vec<Host>> {
        Arc::clone(&self.snapshot.read())
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::Acquire) > 0
    }

    #[must_use]
    pub fn last_error(&self) -> Option<String> {
        self.last_error.read().clone()
    }

    /// In-memory host order, mirroring the store.
    #[must_use]
    pub fn host_order(&self) -> Vec<String> {
        self.host_order.read().clone()
    }

    #[must_use]
    pub fn overlay(&self) -> &Arc<StatusOverlay> {
        &self.overlay
    }

    /// Receiver notified on snapshot, order, loading and error changes.
    ///
    /// Overlay pushes are signalled separately through
    /// [`StatusOverlay::subscribe_changes`].
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.changes.subscribe()
    }

    /// Saved instance order of a host.
    ///
    /// Served from the session cache; on a miss it is read from the store
    /// and cached. View derivation and reordering both go through here.
    fn instance_order(&self, host_id: &HostId) -> Vec<String> {
        if let Some(order) = self.instance_orders.read().get(host_id) {
            return order.clone();
        }
        let loaded = self.orders.read_instance_order(host_id);
        self.instance_orders
            .write()
            .entry(host_id.clone())
            .or_insert(loaded)
            .clone()
    }

    fn inputs_changed(&self) {
        self.inputs.fetch_add(1, Ordering::AcqRel);
        self.notify();
    }

    fn notify(&self) {
        self.changes.send_modify(|generation| *generation += 1);
    }
}

impl std::fmt::Debug for Reconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reconciler")
            .field("source", &self.source.source_name())
            .field("hosts", &self.snapshot.read().len())
            .field("loading", &self.is_loading())
            .field("last_error", &*self.last_error.read())
            .finish_non_exhaustive()
    }
}

/// Marks a refresh as in flight for as long as it lives.
struct LoadingGuard<'a> {
    reconciler: &'a Reconciler,
}

impl<'a> LoadingGuard<'a> {
    fn enter(reconciler: &'a Reconciler) -> Self {
        reconciler.in_flight.fetch_add(1, Ordering::AcqRel);
        reconciler.notify();
        Self { reconciler }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.reconciler.in_flight.fetch_sub(1, Ordering::AcqRel);
        self.reconciler.notify();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::outbound::storage::MemoryStore;
    use crate::domain::{HostStatus, StatusPatch};
    use crate::testkit::domain::{host, instance};
    use crate::testkit::source::ScriptedSource;

    fn reconciler(source: ScriptedSource) -> Reconciler {
        Reconciler::new(
            Arc::new(source),
            OrderStore::new(Arc::new(MemoryStore::new())),
            Arc::new(StatusOverlay::new()),
        )
    }

    #[tokio::test]
    async fn view_is_memoized_until_inputs_change() {
        let source = ScriptedSource::new().with_host(host("h1"), vec![instance("i1")]);
        let reconciler = reconciler(source);
        reconciler.refresh().await;

        let first = reconciler.effective_view();
        let second = reconciler.effective_view();
        assert!(Arc::ptr_eq(&first, &second));

        reconciler
            .overlay()
            .apply(HostId::new("h1"), StatusPatch::status(HostStatus::Degraded));
        let third = reconciler.effective_view();
        assert!(!Arc::ptr_eq(&second, &third));
        assert_eq!(third.host("h1").unwrap().status, HostStatus::Degraded);
    }

    #[tokio::test]
    async fn loading_flag_clears_after_refresh() {
        let reconciler = reconciler(ScriptedSource::new().with_host(host("h1"), vec![]));
        assert!(!reconciler.is_loading());
        reconciler.refresh().await;
        assert!(!reconciler.is_loading());
    }

    #[tokio::test]
    async fn loading_flag_clears_after_failed_refresh() {
        let source = ScriptedSource::new();
        source.fail_hosts("timeout");
        let reconciler = reconciler(source);

        let outcome = reconciler.refresh().await;
        assert!(!outcome.is_published());
        assert!(!reconciler.is_loading());
    }

    #[tokio::test]
    async fn refresh_notifies_subscribers() {
        let reconciler = reconciler(ScriptedSource::new().with_host(host("h1"), vec![]));
        let mut changes = reconciler.subscribe();
        reconciler.refresh().await;
        assert!(changes.has_changed().unwrap());
    }
}
