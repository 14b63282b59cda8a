//! Liveness probe against the downstream service.

use reqwest::{Client, StatusCode};
use std::time::Duration;
use url::Url;

use crate::bridge::error::BuildError;
use crate::bridge::invoker::join_path;
use crate::bridge::types::HealthStatus;
use crate::config::HealthCheckConfig;
use crate::resilience::with_deadline;

#[derive(Debug, Clone)]
pub struct HealthProbe {
    client: Client,
    url: Url,
    timeout: Duration,
}

impl HealthProbe {
    /// Build a probe for `<base_url><config.path>`.
    pub fn new(client: Client, base_url: &Url, config: &HealthCheckConfig) -> Result<Self, BuildError> {
        let joined = join_path(base_url, &config.path);
        let url = Url::parse(&joined).map_err(|source| BuildError::InvalidUrl {
            url: joined,
            source,
        })?;

        Ok(Self {
            client,
            url,
            timeout: config.timeout(),
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Probe once. Never waits longer than the configured timeout.
    pub async fn check(&self) -> HealthStatus {
        let response_future = self
            .client
            .get(self.url.clone())
            .header("user-agent", "rpc-bridge-health-check")
            .send();

        let healthy = match with_deadline(self.timeout, response_future).await {
            Ok(Ok(response)) => {
                let healthy = response.status() == StatusCode::OK;
                if !healthy {
                    tracing::warn!(url = %self.url, status = %response.status(), "Health check failed: non-200 status");
                }
                healthy
            }
            Ok(Err(e)) => {
                tracing::warn!(url = %self.url, error = %e, "Health check failed: connection error");
                false
            }
            Err(_) => {
                tracing::warn!(url = %self.url, timeout = ?self.timeout, "Health check failed: timeout");
                false
            }
        };

        HealthStatus::from_probe(healthy)
    }
}
