//! Fleet view rendering.

use chrono::Utc;
use serde_json::json;
use tabled::{Table, Tabled};

use super::output;
use crate::application::FleetView;
use crate::domain::{Host, HostMemory, Instance};

const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

#[derive(Tabled, Debug, PartialEq, Eq)]
pub(crate) struct FleetRow {
    #[tabled(rename = "Host")]
    host: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Memory")]
    memory: String,
    #[tabled(rename = "Instance")]
    instance: String,
    #[tabled(rename = "Model")]
    model: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Error")]
    error: String,
}

fn format_memory(memory: Option<HostMemory>) -> String {
    let Some(memory) = memory else {
        return "-".into();
    };
    let used = memory.used_bytes as f64 / GIB;
    let total = memory.total_bytes as f64 / GIB;
    match memory.usage_fraction() {
        Some(fraction) => format!("{used:.1}/{total:.1} GiB ({:.0}%)", fraction * 100.0),
        None => format!("{used:.1}/{total:.1} GiB"),
    }
}

fn model_of(instance: &Instance) -> String {
    instance
        .config
        .str_field("model")
        .or_else(|| instance.config.str_field("name"))
        .unwrap_or("-")
        .to_string()
}

/// One row per instance; hosts without instances get a single row.
pub(crate) fn rows(view: &FleetView) -> Vec<FleetRow> {
    let mut rows = Vec::new();
    for host in &view.hosts {
        let host_cells = |first: bool| {
            if first {
                (
                    format!("{} ({})", host.name, host.id),
                    host.status.to_string(),
                    format_memory(host.memory),
                )
            } else {
                (String::new(), String::new(), String::new())
            }
        };

        if host.instances.is_empty() {
            let (name, status, memory) = host_cells(true);
            rows.push(FleetRow {
                host: name,
                status,
                memory,
                instance: "-".into(),
                model: "-".into(),
                state: "-".into(),
                error: String::new(),
            });
            continue;
        }

        for (index, instance) in host.instances.iter().enumerate() {
            let (name, status, memory) = host_cells(index == 0);
            rows.push(FleetRow {
                host: name,
                status,
                memory,
                instance: instance.id.to_string(),
                model: model_of(instance),
                state: instance.status.as_str().to_string(),
                error: instance.error.clone().unwrap_or_default(),
            });
        }
    }
    rows
}

/// Print the view as a table, or as one `view` JSON line.
pub fn print_view(view: &FleetView, last_error: Option<&str>) {
    if output::is_json() {
        output::json_output(json!({
            "type": "view",
            "payload": {
                "at": Utc::now().to_rfc3339(),
                "hosts": view.hosts,
                "error": last_error,
            },
        }));
        return;
    }
    if output::is_quiet() {
        return;
    }

    if view.is_empty() {
        output::note("No hosts reported");
    } else {
        output::lines(&Table::new(rows(view)).to_string());
        output::note(&summary(&view.hosts));
    }
    if let Some(error) = last_error {
        output::warning(&format!("Showing last known fleet: {error}"));
    }
}

fn summary(hosts: &[Host]) -> String {
    let instances: usize = hosts.iter().map(|h| h.instances.len()).sum();
    let running = hosts
        .iter()
        .flat_map(|h| &h.instances)
        .filter(|i| i.status == crate::domain::InstanceStatus::Running)
        .count();
    format!(
        "{} hosts, {instances} instances, {running} running",
        hosts.len()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{HostStatus, InstanceConfig, InstanceStatus};

    #[test]
    fn host_without_instances_gets_one_row() {
        let view = FleetView {
            hosts: vec![Host::new("h1", "one").with_status(HostStatus::Offline)],
        };
        let rows = rows(&view);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].host, "one (h1)");
        assert_eq!(rows[0].status, "offline");
        assert_eq!(rows[0].instance, "-");
    }

    #[test]
    fn host_cells_only_on_first_instance_row() {
        let view = FleetView {
            hosts: vec![Host::new("h1", "one").with_instances(vec![
                Instance::new("a")
                    .with_status(InstanceStatus::Running)
                    .with_config(InstanceConfig::new(json!({"model": "llama"}))),
                Instance::new("b").with_error("oom"),
            ])],
        };
        let rows = rows(&view);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].model, "llama");
        assert_eq!(rows[0].state, "running");
        assert!(rows[1].host.is_empty());
        assert_eq!(rows[1].error, "oom");
    }

    #[test]
    fn memory_is_shown_in_gib() {
        let memory = HostMemory::new(16 * 1024 * 1024 * 1024, 64 * 1024 * 1024 * 1024);
        assert_eq!(format_memory(Some(memory)), "16.0/64.0 GiB (25%)");
        assert_eq!(format_memory(None), "-");
    }
}
