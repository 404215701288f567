//! `check` handler.

use serde_json::json;

use super::output;
use crate::error::{Error, Result};
use crate::infrastructure::config::Config;
use crate::infrastructure::health::{health_check, HealthStatus};

pub fn execute(config: &Config) -> Result<()> {
    let report = health_check(config);

    if output::is_json() {
        let checks: Vec<_> = report
            .checks()
            .iter()
            .map(|check| {
                let detail = match check.status() {
                    HealthStatus::Healthy => None,
                    HealthStatus::Unhealthy(reason) => Some(reason.as_str()),
                };
                json!({
                    "name": check.name(),
                    "critical": check.critical(),
                    "healthy": check.is_healthy(),
                    "detail": detail,
                })
            })
            .collect();
        output::json_output(json!({
            "command": "check",
            "healthy": report.is_healthy(),
            "checks": checks,
        }));
    } else {
        output::section("Health Check");
        for check in report.checks() {
            match check.status() {
                HealthStatus::Healthy => output::success(check.name()),
                HealthStatus::Unhealthy(reason) if check.critical() => {
                    output::error(&format!("{}: {reason}", check.name()));
                }
                HealthStatus::Unhealthy(reason) => {
                    output::warning(&format!("{}: {reason}", check.name()));
                }
            }
        }
    }

    if report.is_healthy() {
        Ok(())
    } else {
        Err(Error::Connection("critical health checks failed".into()))
    }
}
