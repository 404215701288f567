//! `move host` and `move instance` handlers.

use serde_json::json;

use super::command::MoveCommand;
use super::output;
use crate::application::RefreshOutcome;
use crate::domain::{HostId, InstanceId};
use crate::error::{Error, Result};
use crate::infrastructure::bootstrap::build_reconciler;
use crate::infrastructure::config::Config;

/// Refresh, apply one move and report the resulting order.
///
/// A move that changes nothing is reported, not treated as a failure.
pub async fn execute(config: &Config, command: &MoveCommand) -> Result<()> {
    let reconciler = build_reconciler(config)?;
    if let RefreshOutcome::Stale { error } = reconciler.refresh().await {
        return Err(Error::Connection(error));
    }

    let (moved, target, order) = match command {
        MoveCommand::Host { host, direction } => {
            let moved = reconciler.move_host(&HostId::new(host.as_str()), *direction);
            let view = reconciler.effective_view();
            (moved, host.clone(), owned(view.host_ids()))
        }
        MoveCommand::Instance {
            host,
            instance,
            direction,
        } => {
            let moved = reconciler.move_instance(
                &HostId::new(host.as_str()),
                &InstanceId::new(instance.as_str()),
                *direction,
            );
            let view = reconciler.effective_view();
            (moved, format!("{host}/{instance}"), owned(view.instance_ids(host)))
        }
    };

    if output::is_json() {
        output::json_output(json!({
            "command": "move",
            "target": target,
            "moved": moved,
            "order": order,
        }));
        return Ok(());
    }

    if moved {
        output::success(&format!("Moved {}", output::highlight(&target)));
    } else {
        output::note(&format!(
            "{target} is already at the edge or unknown, nothing changed"
        ));
    }
    output::field("Order", order.join(", "));
    Ok(())
}

fn owned(ids: Vec<&str>) -> Vec<String> {
    ids.into_iter().map(str::to_string).collect()
}
