//! Periodic refresh scheduling.
//!
//! The first refresh runs as soon as the scheduler starts. After that a
//! timer refreshes at the disconnected interval while the push channel is
//! down and at the (slower) connected interval while it is up. The timer is
//! re-armed whenever channel health or the connected interval changes.
//!
//! Each tick spawns its refresh, so a slow fetch never delays the next tick
//! or teardown. Refreshes already in flight at teardown run to completion.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use super::reconciler::{Reconciler, RefreshOutcome};

/// Smallest period the timer accepts.
const MIN_PERIOD: Duration = Duration::from_millis(100);

/// Refresh cadence by push-channel health.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshPolicy {
    /// Period while the push channel is down (fast polling).
    pub disconnected_interval: Duration,
    /// Period while the push channel is up.
    pub connected_interval: Duration,
}

impl RefreshPolicy {
    #[must_use]
    pub const fn new(disconnected_interval: Duration, connected_interval: Duration) -> Self {
        Self {
            disconnected_interval,
            connected_interval,
        }
    }
}

impl Default for RefreshPolicy {
    fn default() -> Self {
        Self::new(Duration::from_secs(5), Duration::from_secs(30))
    }
}

/// Handle to a running scheduler.
///
/// Dropping the handle cancels the timer; [`shutdown`](Self::shutdown) does
/// the same and waits for the scheduler task to exit.
pub struct SchedulerHandle {
    shutdown: watch::Sender<bool>,
    connected_interval: watch::Sender<Duration>,
    task: Option<JoinHandle<()>>,
}

impl SchedulerHandle {
    /// Change the connected-state period; re-arms the timer when it differs.
    pub fn set_connected_interval(&self, interval: Duration) {
        self.connected_interval.send_if_modified(|current| {
            if *current == interval {
                return false;
            }
            *current = interval;
            true
        });
    }

    #[must_use]
    pub fn connected_interval(&self) -> Duration {
        *self.connected_interval.borrow()
    }

    /// Stop the timer and wait for the scheduler task to exit.
    pub async fn shutdown(mut self) {
        self.shutdown.send_replace(true);
        if let Some(task) = self.task.take() {
            if let Err(err) = task.await {
                warn!(error = %err, "Refresh scheduler task ended abnormally");
            }
        }
    }
}

impl Drop for SchedulerHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Drives [`Reconciler::refresh`] on a health-dependent timer.
pub struct RefreshScheduler;

impl RefreshScheduler {
    /// Start scheduling refreshes on the current Tokio runtime.
    #[must_use]
    pub fn spawn(reconciler: Arc<Reconciler>, policy: RefreshPolicy) -> SchedulerHandle {
        let (shutdown, shutdown_rx) = watch::channel(false);
        let (connected_interval, interval_rx) = watch::channel(policy.connected_interval);
        let connection = reconciler.overlay().subscribe_connection();

        let task = tokio::spawn(run(
            reconciler,
            policy.disconnected_interval,
            connection,
            interval_rx,
            shutdown_rx,
        ));

        SchedulerHandle {
            shutdown,
            connected_interval,
            task: Some(task),
        }
    }
}

async fn run(
    reconciler: Arc<Reconciler>,
    disconnected_interval: Duration,
    mut connection: watch::Receiver<bool>,
    mut connected_interval: watch::Receiver<Duration>,
    mut shutdown: watch::Receiver<bool>,
) {
    spawn_refresh(&reconciler, "startup");

    let mut watch_connection = true;
    let mut watch_interval = true;

    loop {
        let connected = *connection.borrow_and_update();
        let period = if connected {
            *connected_interval.borrow_and_update()
        } else {
            disconnected_interval
        }
        .max(MIN_PERIOD);

        debug!(
            connected,
            period_ms = u64::try_from(period.as_millis()).unwrap_or(u64::MAX),
            "Refresh timer armed"
        );
        let mut ticker = time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = shutdown.changed() => {
                    info!("Refresh scheduler stopped");
                    return;
                }
                changed = connection.changed(), if watch_connection => {
                    if changed.is_err() {
                        watch_connection = false;
                    }
                    break;
                }
                changed = connected_interval.changed(), if watch_interval => {
                    if changed.is_err() {
                        watch_interval = false;
                        continue;
                    }
                    break;
                }
                _ = ticker.tick() => spawn_refresh(&reconciler, "timer"),
            }
        }
    }
}

fn spawn_refresh(reconciler: &Arc<Reconciler>, trigger: &'static str) {
    let reconciler = Arc::clone(reconciler);
    tokio::spawn(async move {
        match reconciler.refresh().await {
            RefreshOutcome::Published { hosts, degraded } => {
                debug!(trigger, hosts, degraded = degraded.len(), "Scheduled refresh done");
            }
            RefreshOutcome::Stale { error } => {
                debug!(trigger, error = %error, "Scheduled refresh kept stale snapshot");
            }
        }
    });
}
