//! Configuration health reporting.

use super::config::Config;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    Healthy,
    Unhealthy(String),
}

#[derive(Debug, Clone)]
pub struct HealthCheck {
    name: &'static str,
    critical: bool,
    status: HealthStatus,
}

impl HealthCheck {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn critical(&self) -> bool {
        self.critical
    }

    pub fn status(&self) -> &HealthStatus {
        &self.status
    }

    pub fn is_healthy(&self) -> bool {
        matches!(self.status, HealthStatus::Healthy)
    }
}

#[derive(Debug, Clone)]
pub struct HealthReport {
    checks: Vec<HealthCheck>,
}

impl HealthReport {
    pub fn checks(&self) -> &[HealthCheck] {
        &self.checks
    }

    pub fn is_healthy(&self) -> bool {
        self.checks
            .iter()
            .filter(|check| check.critical())
            .all(HealthCheck::is_healthy)
    }
}

fn non_empty(value: &str, what: &str) -> HealthStatus {
    if value.trim().is_empty() {
        HealthStatus::Unhealthy(format!("{what} is empty"))
    } else {
        HealthStatus::Healthy
    }
}

pub fn health_check(config: &Config) -> HealthReport {
    let mut checks = Vec::new();

    checks.push(HealthCheck {
        name: "fleet_api",
        critical: true,
        status: non_empty(&config.source.api_url, "api_url"),
    });

    checks.push(HealthCheck {
        name: "status_stream",
        critical: false,
        status: if !config.status_stream.enabled {
            HealthStatus::Unhealthy("disabled, polling only".to_string())
        } else {
            non_empty(&config.status_stream.ws_url, "ws_url")
        },
    });

    let order_path = &config.storage.order_path;
    checks.push(HealthCheck {
        name: "order_store",
        critical: false,
        status: match order_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() && parent.exists() => {
                HealthStatus::Healthy
            }
            Some(parent) if !parent.as_os_str().is_empty() => HealthStatus::Unhealthy(format!(
                "{} does not exist yet",
                parent.display()
            )),
            _ => non_empty(&order_path.to_string_lossy(), "order_path"),
        },
    });

    checks.push(HealthCheck {
        name: "refresh",
        critical: true,
        status: if config.refresh.disconnected_interval_secs == 0
            || config.refresh.connected_interval_secs == 0
        {
            HealthStatus::Unhealthy("refresh intervals must be greater than 0".to_string())
        } else {
            HealthStatus::Healthy
        },
    });

    HealthReport { checks }
}

#[cfg(test)]
mod tests {
    use super::{health_check, HealthCheck, HealthReport, HealthStatus};
    use crate::infrastructure::config::Config;

    #[test]
    fn health_report_is_healthy_when_all_critical_pass() {
        let report = HealthReport {
            checks: vec![
                HealthCheck {
                    name: "critical_pass",
                    critical: true,
                    status: HealthStatus::Healthy,
                },
                HealthCheck {
                    name: "non_critical_fail",
                    critical: false,
                    status: HealthStatus::Unhealthy("warning".to_string()),
                },
            ],
        };

        assert!(report.is_healthy());
    }

    #[test]
    fn default_config_is_healthy() {
        let report = health_check(&Config::default());
        let names: Vec<_> = report.checks().iter().map(HealthCheck::name).collect();
        assert_eq!(names, vec!["fleet_api", "status_stream", "order_store", "refresh"]);
        assert!(report.is_healthy());
    }

    #[test]
    fn empty_api_url_is_critical() {
        let mut config = Config::default();
        config.source.api_url = " ".into();
        let report = health_check(&config);
        assert!(!report.is_healthy());
    }

    #[test]
    fn disabled_stream_is_not_critical() {
        let mut config = Config::default();
        config.status_stream.enabled = false;
        let report = health_check(&config);
        assert!(report.is_healthy());
        assert!(!report.checks()[1].is_healthy());
    }
}
