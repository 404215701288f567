//! Composition root for runtime wiring.

use std::sync::Arc;

use tracing::info;

use super::config::Config;
use crate::adapter::outbound::http::HttpFleetSource;
use crate::adapter::outbound::storage::FileStore;
use crate::adapter::outbound::stream::{FeedHandle, StatusFeed};
use crate::application::{OrderStore, Reconciler, RefreshScheduler, SchedulerHandle, StatusOverlay};
use crate::error::Result;
use crate::port::{FleetSource, KeyValueStore};

/// Fleet API client from `[source]`.
#[allow(clippy::result_large_err)]
pub fn build_source(config: &Config) -> Result<Arc<dyn FleetSource>> {
    let source = HttpFleetSource::from_config(&config.source)?;
    info!(url = %source.base_url(), "Using fleet API");
    Ok(Arc::new(source))
}

/// Order substrate from `[storage]`.
#[allow(clippy::result_large_err)]
pub fn build_store(config: &Config) -> Result<Arc<dyn KeyValueStore>> {
    let store = FileStore::open(&config.storage.order_path)?;
    info!(path = %store.path().display(), "Using order file");
    Ok(Arc::new(store))
}

/// Reconciler over the configured source and order file.
#[allow(clippy::result_large_err)]
pub fn build_reconciler(config: &Config) -> Result<Arc<Reconciler>> {
    let source = build_source(config)?;
    let orders = OrderStore::new(build_store(config)?);
    Ok(Arc::new(Reconciler::new(
        source,
        orders,
        Arc::new(StatusOverlay::new()),
    )))
}

/// Background tasks keeping a reconciler fresh.
pub struct Runtime {
    reconciler: Arc<Reconciler>,
    scheduler: SchedulerHandle,
    feed: Option<FeedHandle>,
}

impl Runtime {
    /// Start the refresh scheduler and, when enabled, the status feed.
    ///
    /// Must be called from within a Tokio runtime.
    #[must_use]
    pub fn start(config: &Config, reconciler: Arc<Reconciler>) -> Self {
        let feed = config.status_stream.enabled.then(|| {
            StatusFeed::new(
                config.status_stream.ws_url.clone(),
                Arc::clone(reconciler.overlay()),
                config.status_stream.reconnection,
            )
            .spawn()
        });
        if feed.is_none() {
            info!("Status stream disabled, polling only");
        }

        let scheduler = RefreshScheduler::spawn(Arc::clone(&reconciler), config.refresh.policy());
        Self {
            reconciler,
            scheduler,
            feed,
        }
    }

    #[must_use]
    pub fn reconciler(&self) -> &Arc<Reconciler> {
        &self.reconciler
    }

    /// Stop the timer and the status feed.
    pub async fn shutdown(self) {
        self.scheduler.shutdown().await;
        if let Some(feed) = self.feed {
            feed.shutdown().await;
        }
        info!("Runtime stopped");
    }
}
