//! Fleet REST API client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client as HttpClient, Response};
use tokio::time::sleep;
use tracing::{debug, info, warn};
use url::Url;

use super::dto::{ErrorBody, HostDto, InstanceDto};
use super::settings::SourceConfig;
use crate::domain::{Host, HostId, Instance, InstanceAction, InstanceId};
use crate::error::{Error, Result};
use crate::port::FleetSource;

/// HTTP client for the fleet API.
///
/// GETs are retried on connect and timeout errors. Actions are sent once.
pub struct HttpFleetSource {
    http: HttpClient,
    base_url: Url,
    retry_max_attempts: u32,
    retry_backoff_ms: u64,
}

impl HttpFleetSource {
    /// Client with default timeouts and no retries.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not an absolute URL.
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            http: HttpClient::new(),
            base_url: parse_base(base_url)?,
            retry_max_attempts: 1,
            retry_backoff_ms: 0,
        })
    }

    /// # Errors
    ///
    /// Returns an error if the configured URL is not an absolute URL.
    pub fn from_config(config: &SourceConfig) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .build()
            .unwrap_or_else(|err| {
                warn!(error = %err, "Failed to build HTTP client, using defaults");
                HttpClient::new()
            });

        Ok(Self {
            http,
            base_url: parse_base(&config.api_url)?,
            retry_max_attempts: config.retry_max_attempts,
            retry_backoff_ms: config.retry_backoff_ms,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build `<base>/api/<segments...>`, percent-encoding each segment.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::Connection(format!("{} cannot be a base URL", self.base_url)))?
            .pop_if_empty()
            .push("api")
            .extend(segments);
        Ok(url)
    }

    async fn get_with_retry<T>(&self, url: Url) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let mut attempt = 0;
        let max_attempts = self.retry_max_attempts.max(1);

        loop {
            attempt += 1;
            let response = match self.http.get(url.clone()).send().await {
                Ok(response) => response,
                Err(err) => {
                    if attempt >= max_attempts || !Self::should_retry(&err) {
                        return Err(err.into());
                    }
                    self.backoff(attempt, max_attempts, &err).await;
                    continue;
                }
            };

            let response = Self::check_status(response).await?;
            match response.json::<T>().await {
                Ok(parsed) => return Ok(parsed),
                Err(err) => {
                    if attempt >= max_attempts || !Self::should_retry(&err) {
                        return Err(err.into());
                    }
                    self.backoff(attempt, max_attempts, &err).await;
                }
            }
        }
    }

    async fn post_action(
        &self,
        action: InstanceAction,
        host_id: &HostId,
        instance_id: &InstanceId,
    ) -> Result<()> {
        let url = self.endpoint(&[
            "hosts",
            host_id.as_str(),
            "instances",
            instance_id.as_str(),
            action.as_str(),
        ])?;
        info!(url = %url, %action, "Sending instance action");

        let response = self.http.post(url).send().await?;
        Self::check_status(response).await?;
        Ok(())
    }

    /// Turn a non-2xx response into [`Error::Remote`] carrying the API's
    /// own message when it sent one.
    async fn check_status(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(ErrorBody::into_message)
            .unwrap_or_else(|| format!("request failed with status {status}"));
        debug!(%status, message = %message, "Fleet API returned an error");
        Err(Error::Remote(message))
    }

    fn should_retry(err: &reqwest::Error) -> bool {
        err.is_timeout() || err.is_connect()
    }

    async fn backoff(&self, attempt: u32, max_attempts: u32, err: &reqwest::Error) {
        warn!(
            attempt,
            max_attempts,
            error = %err,
            "HTTP request failed, retrying"
        );
        if self.retry_backoff_ms > 0 {
            let factor = 1u64 << (attempt - 1).min(6);
            sleep(Duration::from_millis(self.retry_backoff_ms.saturating_mul(factor))).await;
        }
    }
}

fn parse_base(raw: &str) -> Result<Url> {
    let url = Url::parse(raw)?;
    if url.cannot_be_a_base() {
        return Err(Error::Connection(format!("{raw} cannot be a base URL")));
    }
    Ok(url)
}

#[async_trait]
impl FleetSource for HttpFleetSource {
    async fn get_hosts(&self) -> Result<Vec<Host>> {
        let url = self.endpoint(&["hosts"])?;
        let hosts: Vec<HostDto> = self.get_with_retry(url).await?;
        debug!(count = hosts.len(), "Fetched hosts");
        Ok(hosts.into_iter().map(Host::from).collect())
    }

    async fn get_host_instances(&self, host_id: &HostId) -> Result<Vec<Instance>> {
        let url = self.endpoint(&["hosts", host_id.as_str(), "instances"])?;
        let instances: Vec<InstanceDto> = self.get_with_retry(url).await?;
        debug!(host_id = %host_id, count = instances.len(), "Fetched instances");
        Ok(instances.into_iter().map(Instance::from).collect())
    }

    async fn start_instance(&self, host_id: &HostId, instance_id: &InstanceId) -> Result<()> {
        self.post_action(InstanceAction::Start, host_id, instance_id)
            .await
    }

    async fn stop_instance(&self, host_id: &HostId, instance_id: &InstanceId) -> Result<()> {
        self.post_action(InstanceAction::Stop, host_id, instance_id)
            .await
    }

    async fn restart_instance(&self, host_id: &HostId, instance_id: &InstanceId) -> Result<()> {
        self.post_action(InstanceAction::Restart, host_id, instance_id)
            .await
    }

    fn source_name(&self) -> &'static str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve one canned HTTP response and return the request line.
    async fn serve_once(status: &str, body: &str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let response = format!(
            "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        let task = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 4096];
            let n = socket.read(&mut buf).await.unwrap();
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&buf[..n])
                .lines()
                .next()
                .unwrap_or_default()
                .to_string()
        });
        (format!("http://{addr}"), task)
    }

    #[test]
    fn endpoint_encodes_segments() {
        let source = HttpFleetSource::new("http://fleet.local:9000/").unwrap();
        let url = source
            .endpoint(&["hosts", "gpu 1", "instances", "a/b", "start"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://fleet.local:9000/api/hosts/gpu%201/instances/a%2Fb/start"
        );
    }

    #[test]
    fn rejects_relative_base() {
        assert!(HttpFleetSource::new("fleet.local").is_err());
    }

    #[tokio::test]
    async fn get_hosts_maps_dtos() {
        let (base, request) =
            serve_once("200 OK", r#"[{"id": "h1", "name": "one", "status": "online"}]"#).await;
        let source = HttpFleetSource::new(&base).unwrap();

        let hosts = source.get_hosts().await.unwrap();
        assert_eq!(hosts.len(), 1);
        assert_eq!(hosts[0].name, "one");
        assert!(request.await.unwrap().starts_with("GET /api/hosts "));
    }

    #[tokio::test]
    async fn action_error_carries_api_message() {
        let (base, request) = serve_once("409 Conflict", r#"{"error": "instance busy"}"#).await;
        let source = HttpFleetSource::new(&base).unwrap();

        let err = source
            .start_instance(&HostId::new("h1"), &InstanceId::new("i1"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "instance busy");
        assert!(request
            .await
            .unwrap()
            .starts_with("POST /api/hosts/h1/instances/i1/start "));
    }

    #[tokio::test]
    async fn error_without_body_reports_status() {
        let (base, _request) = serve_once("503 Service Unavailable", "").await;
        let source = HttpFleetSource::new(&base).unwrap();

        let err = source.get_hosts().await.unwrap_err();
        assert!(err.to_string().contains("503"));
    }
}
