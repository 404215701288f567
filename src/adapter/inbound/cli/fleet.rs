//! `hosts` and `watch` handlers.

use std::sync::Arc;

use tokio::signal;
use tracing::info;

use super::{output, render};
use crate::application::{FleetView, Reconciler, RefreshOutcome};
use crate::error::{Error, Result};
use crate::infrastructure::bootstrap::{build_reconciler, Runtime};
use crate::infrastructure::config::Config;

/// Refresh once and print the view.
///
/// Fails when the fleet could not be fetched at all; hosts whose instances
/// failed to load are listed with a warning.
pub async fn hosts(config: &Config) -> Result<()> {
    let reconciler = build_reconciler(config)?;
    match reconciler.refresh().await {
        RefreshOutcome::Stale { error } => Err(Error::Connection(error)),
        RefreshOutcome::Published { degraded, .. } => {
            output::header(env!("CARGO_PKG_VERSION"));
            render::print_view(&reconciler.effective_view(), None);
            for host_id in degraded {
                output::warning(&format!("Instances of {host_id} could not be loaded"));
            }
            Ok(())
        }
    }
}

/// Run the engine with its scheduler and status feed, re-rendering on
/// every change until Ctrl-C.
pub async fn watch(config: &Config) -> Result<()> {
    let reconciler = build_reconciler(config)?;
    let runtime = Runtime::start(config, Arc::clone(&reconciler));

    output::header(env!("CARGO_PKG_VERSION"));
    output::note("Watching fleet, press Ctrl-C to stop");

    let mut changes = reconciler.subscribe();
    let mut pushes = reconciler.overlay().subscribe_changes();
    let mut renderer = Renderer::default();

    loop {
        tokio::select! {
            _ = signal::ctrl_c() => {
                info!("Shutdown signal received");
                break;
            }
            changed = changes.changed() => {
                if changed.is_err() {
                    break;
                }
                renderer.render(&reconciler);
            }
            changed = pushes.changed() => {
                if changed.is_err() {
                    break;
                }
                renderer.render(&reconciler);
            }
        }
    }

    runtime.shutdown().await;
    Ok(())
}

/// Prints only when the view or the error actually changed.
#[derive(Default)]
struct Renderer {
    last_view: Option<Arc<FleetView>>,
    last_error: Option<String>,
}

impl Renderer {
    fn render(&mut self, reconciler: &Reconciler) {
        let view = reconciler.effective_view();
        let error = reconciler.last_error();

        let same_view = self
            .last_view
            .as_ref()
            .is_some_and(|last| Arc::ptr_eq(last, &view));
        if same_view && error == self.last_error {
            return;
        }

        if !output::is_json() {
            output::section(&format!(
                "Fleet at {}",
                chrono::Local::now().format("%H:%M:%S")
            ));
        }
        render::print_view(&view, error.as_deref());
        self.last_view = Some(view);
        self.last_error = error;
    }
}
