// ABOUTME: Event type tags and typed payloads emitted during a deployment.
// ABOUTME: Payloads form a closed set so handlers match instead of downcasting.

use crate::config::Environment;
use crate::types::DeploymentInfo;

/// Emitted when a precheck finds a foundation that cannot be deployed to.
pub const FOUNDATIONS_UNAVAILABLE: &str = "validate.foundationsUnavailable";
pub const DEPLOY_START: &str = "deploy.start";
pub const DEPLOY_SUCCESS: &str = "deploy.success";
pub const DEPLOY_FAILURE: &str = "deploy.failure";
pub const DEPLOY_FINISH: &str = "deploy.finish";

#[derive(Debug, Clone)]
pub struct Event {
    pub event_type: String,
    pub data: EventData,
}

#[derive(Debug, Clone)]
pub enum EventData {
    Precheck(PrecheckerEventData),
    Deploy(DeployEventData),
}

#[derive(Debug, Clone)]
pub struct PrecheckerEventData {
    pub environment: Environment,
    pub description: String,
}

#[derive(Debug, Clone)]
pub struct DeployEventData {
    pub environment: Environment,
    pub deployment_info: DeploymentInfo,
    pub description: String,
}

impl Event {
    pub fn foundations_unavailable(environment: &Environment, description: impl Into<String>) -> Self {
        Self {
            event_type: FOUNDATIONS_UNAVAILABLE.to_string(),
            data: EventData::Precheck(PrecheckerEventData {
                environment: environment.clone(),
                description: description.into(),
            }),
        }
    }

    pub fn deploy(
        event_type: &str,
        environment: &Environment,
        deployment_info: &DeploymentInfo,
        description: impl Into<String>,
    ) -> Self {
        Self {
            event_type: event_type.to_string(),
            data: EventData::Deploy(DeployEventData {
                environment: environment.clone(),
                deployment_info: deployment_info.clone(),
                description: description.into(),
            }),
        }
    }

    /// Human-readable description carried by every payload.
    pub fn description(&self) -> &str {
        match &self.data {
            EventData::Precheck(data) => &data.description,
            EventData::Deploy(data) => &data.description,
        }
    }
}
