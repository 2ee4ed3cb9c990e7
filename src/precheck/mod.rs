// ABOUTME: Verifies every foundation in an environment answers before a deploy starts.
// ABOUTME: Probes {foundation}/v2/info in order and stops at the first failure.

mod error;

pub use error::{PrecheckError, PrecheckErrorKind};

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::config::{Environment, default_precheck_timeout};
use crate::events::{Event, EventManager};

/// Path probed on every foundation.
pub const INFO_PATH: &str = "/v2/info";

/// Fleet health check run before any push.
#[async_trait]
pub trait AvailabilityCheck: Send + Sync {
    async fn assert_all_foundations_up(&self, environment: &Environment) -> Result<(), PrecheckError>;
}

/// HTTP prechecker that emits `validate.foundationsUnavailable` on failure.
pub struct Prechecker {
    events: Arc<dyn EventManager>,
    timeout: Duration,
}

impl Prechecker {
    pub fn new(events: Arc<dyn EventManager>) -> Self {
        Self {
            events,
            timeout: default_precheck_timeout(),
        }
    }

    /// How long to wait for response headers from each foundation.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn client(&self, skip_ssl: bool) -> Result<reqwest::Client, PrecheckError> {
        reqwest::Client::builder()
            .danger_accept_invalid_certs(skip_ssl)
            .connect_timeout(self.timeout)
            .build()
            .map_err(PrecheckError::Client)
    }

    async fn probe(&self, client: &reqwest::Client, foundation_url: &str) -> Result<(), PrecheckError> {
        let url = format!("{}{}", foundation_url.trim_end_matches('/'), INFO_PATH);
        tracing::debug!("checking {}", url);

        // `send` resolves once the response headers arrive.
        let response = tokio::time::timeout(self.timeout, client.get(&url).send())
            .await
            .map_err(|_| PrecheckError::InvalidRequest {
                url: foundation_url.to_string(),
                reason: format!("no response within {}s", self.timeout.as_secs()),
            })?
            .map_err(|e| PrecheckError::InvalidRequest {
                url: foundation_url.to_string(),
                reason: e.to_string(),
            })?;

        if response.status() != reqwest::StatusCode::OK {
            return Err(PrecheckError::FoundationUnavailable {
                url: foundation_url.to_string(),
                status: response.status().to_string(),
            });
        }

        Ok(())
    }

    fn report(&self, environment: &Environment, err: &PrecheckError) {
        tracing::error!(environment = %environment.name, "precheck failed: {}", err);
        let event = Event::foundations_unavailable(environment, err.to_string());
        if let Err(e) = self.events.emit(&event) {
            tracing::warn!("failed to emit {}: {}", event.event_type, e);
        }
    }
}

impl std::fmt::Debug for Prechecker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Prechecker")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl AvailabilityCheck for Prechecker {
    async fn assert_all_foundations_up(&self, environment: &Environment) -> Result<(), PrecheckError> {
        if environment.foundations.is_empty() {
            let err = PrecheckError::NoFoundationsConfigured;
            self.report(environment, &err);
            return Err(err);
        }

        let client = match self.client(environment.skip_ssl) {
            Ok(client) => client,
            Err(err) => {
                self.report(environment, &err);
                return Err(err);
            }
        };

        for foundation_url in &environment.foundations {
            if let Err(err) = self.probe(&client, foundation_url).await {
                self.report(environment, &err);
                return Err(err);
            }
        }

        tracing::info!(
            environment = %environment.name,
            "all {} foundations up",
            environment.foundations.len()
        );
        Ok(())
    }
}
