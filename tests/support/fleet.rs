use std::sync::Arc;

use modelfleet::adapter::outbound::storage::MemoryStore;
use modelfleet::application::{OrderStore, Reconciler, StatusOverlay};
use modelfleet::port::KeyValueStore;
use modelfleet::testkit::source::ScriptedSource;

/// Reconciler wired to `source` with an in-memory order store, plus the
/// handles a test needs to steer and inspect it.
pub struct Fleet {
    pub source: Arc<ScriptedSource>,
    pub store: Arc<MemoryStore>,
    pub overlay: Arc<StatusOverlay>,
    pub reconciler: Arc<Reconciler>,
}

impl Fleet {
    pub fn new(source: ScriptedSource) -> Self {
        Self::with_store(source, Arc::new(MemoryStore::new()))
    }

    pub fn with_store(source: ScriptedSource, store: Arc<MemoryStore>) -> Self {
        let source = Arc::new(source);
        let overlay = Arc::new(StatusOverlay::new());
        let reconciler = Arc::new(Reconciler::new(
            source.clone(),
            OrderStore::new(store.clone()),
            overlay.clone(),
        ));
        Self {
            source,
            store,
            overlay,
            reconciler,
        }
    }

    pub fn orders(&self) -> OrderStore {
        OrderStore::new(self.store.clone())
    }
}

/// Reconciler over any key-value store, for persistence tests.
pub fn reconciler_over(source: ScriptedSource, store: Arc<dyn KeyValueStore>) -> Reconciler {
    Reconciler::new(
        Arc::new(source),
        OrderStore::new(store),
        Arc::new(StatusOverlay::new()),
    )
}
