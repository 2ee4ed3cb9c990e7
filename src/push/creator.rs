// ABOUTME: Pusher factory backed by the cf CLI courier.
// ABOUTME: Every pusher gets its own courier and therefore its own CF_HOME.

use std::path::PathBuf;
use std::sync::Arc;

use super::error::PushError;
use super::pusher::{CourierPusher, Pusher, PusherCreator};
use crate::courier::CfCourier;
use crate::types::DeploymentInfo;

/// Creates `cf`-driven pushers.
#[derive(Debug, Clone)]
pub struct CfPusherCreator {
    binary: PathBuf,
}

impl CfPusherCreator {
    pub fn new() -> Self {
        Self::with_binary("cf")
    }

    /// Use a specific CLI binary instead of `cf` from `PATH`.
    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl Default for CfPusherCreator {
    fn default() -> Self {
        Self::new()
    }
}

impl PusherCreator for CfPusherCreator {
    fn create_pusher(&self, deployment_info: &DeploymentInfo) -> Result<Arc<dyn Pusher>, PushError> {
        let courier = CfCourier::with_binary(self.binary.clone())
            .map_err(|source| PushError::Setup { source })?;
        tracing::debug!(
            app = %deployment_info.app_name,
            home = %courier.home().display(),
            "created cf courier"
        );
        Ok(Arc::new(CourierPusher::new(courier)))
    }
}
