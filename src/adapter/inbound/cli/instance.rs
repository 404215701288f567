//! `start`, `stop` and `restart` handlers.

use serde_json::json;

use super::command::InstanceArgs;
use super::{output, render};
use crate::domain::InstanceAction;
use crate::error::Result;
use crate::infrastructure::bootstrap::build_reconciler;
use crate::infrastructure::config::Config;

/// Send the action; the reconciler refreshes before this returns.
pub async fn execute(
    config: &Config,
    action: InstanceAction,
    args: &InstanceArgs,
) -> Result<()> {
    let reconciler = build_reconciler(config)?;
    let (host_id, instance_id) = (args.host_id(), args.instance_id());

    reconciler.perform(action, &host_id, &instance_id).await?;

    if output::is_json() {
        output::json_output(json!({
            "command": format!("instance.{action}"),
            "host_id": host_id,
            "instance_id": instance_id,
            "ok": true,
        }));
        return Ok(());
    }

    output::success(&format!(
        "Requested {action} of {} on {}",
        output::highlight(&instance_id),
        output::highlight(&host_id)
    ));
    let view = reconciler.effective_view();
    let instance = view
        .host(host_id.as_str())
        .and_then(|host| host.instance(instance_id.as_str()));
    match instance {
        Some(instance) => output::field("State", instance.status),
        None => render::print_view(&view, None),
    }
    if let Some(error) = reconciler.last_error() {
        output::warning(&format!("Follow-up refresh failed: {error}"));
    }
    Ok(())
}
