// ABOUTME: Courier trait: platform commands issued against one foundation.
// ABOUTME: Outputs are opaque bytes forwarded verbatim to the deployment response.

mod cf;

pub use cf::CfCourier;

use async_trait::async_trait;
use std::path::Path;

/// Output of a courier command, or the failure with whatever it printed.
pub type CourierResult = Result<Vec<u8>, CourierError>;

/// Issues platform commands against a single foundation.
///
/// One instance is bound to one foundation for the duration of a deployment.
#[async_trait]
pub trait Courier: Send + Sync {
    /// Authenticate and target an org and space.
    async fn login(
        &self,
        foundation_url: &str,
        username: &str,
        password: &str,
        org: &str,
        space: &str,
        skip_ssl: bool,
    ) -> CourierResult;

    /// Push application bits from `app_path`.
    async fn push(&self, app_name: &str, app_path: &Path, instances: u16) -> CourierResult;

    async fn rename(&self, app_name: &str, new_name: &str) -> CourierResult;

    async fn delete(&self, app_name: &str) -> CourierResult;

    async fn map_route(&self, app_name: &str, domain: &str) -> CourierResult;

    /// Recent platform logs for an app.
    async fn logs(&self, app_name: &str) -> CourierResult;

    async fn exists(&self, app_name: &str) -> bool;

    /// Release anything the courier allocated, such as scratch directories.
    async fn clean_up(&self) -> Result<(), CourierError>;
}

/// A failed courier command. Keeps the command output for diagnosis.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct CourierError {
    message: String,
    output: Vec<u8>,
}

impl CourierError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            output: Vec::new(),
        }
    }

    pub fn with_output(mut self, output: impl Into<Vec<u8>>) -> Self {
        self.output = output.into();
        self
    }

    /// What the command printed before failing.
    pub fn output(&self) -> &[u8] {
        &self.output
    }
}

impl From<std::io::Error> for CourierError {
    fn from(err: std::io::Error) -> Self {
        CourierError::new(err.to_string())
    }
}
