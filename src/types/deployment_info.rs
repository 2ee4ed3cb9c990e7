// ABOUTME: Immutable per-deployment record shared by every foundation task.
// ABOUTME: Carries credentials, target org/space, instance count and caller metadata.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use super::AppName;
use crate::config::Environment;

/// Everything a pusher needs to deploy one app to one foundation.
#[derive(Clone, Serialize, Deserialize)]
pub struct DeploymentInfo {
    #[serde(default)]
    pub artifact_url: String,
    #[serde(default)]
    pub manifest: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub environment: String,
    #[serde(default)]
    pub org: String,
    #[serde(default)]
    pub space: String,
    pub app_name: AppName,
    #[serde(default)]
    pub uuid: String,
    #[serde(default)]
    pub skip_ssl: bool,
    #[serde(default = "default_instances")]
    pub instances: u16,
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub app_path: PathBuf,
    #[serde(default)]
    pub environment_variables: HashMap<String, String>,
    #[serde(default)]
    pub health_check_endpoint: String,
    /// Caller-supplied metadata. Never inspected by the deployment engine.
    #[serde(default)]
    pub data: HashMap<String, serde_json::Value>,
}

fn default_instances() -> u16 {
    1
}

impl DeploymentInfo {
    /// Build a deployment record that inherits domain, TLS policy and
    /// instance count from the target environment.
    pub fn for_environment(
        environment: &Environment,
        app_name: AppName,
        org: impl Into<String>,
        space: impl Into<String>,
    ) -> Self {
        Self {
            artifact_url: String::new(),
            manifest: String::new(),
            username: String::new(),
            password: String::new(),
            environment: environment.name.clone(),
            org: org.into(),
            space: space.into(),
            app_name,
            uuid: uuid::Uuid::new_v4().to_string(),
            skip_ssl: environment.skip_ssl,
            instances: environment.instances,
            domain: environment.domain.clone(),
            app_path: PathBuf::new(),
            environment_variables: HashMap::new(),
            health_check_endpoint: String::new(),
            data: HashMap::new(),
        }
    }

    /// Set login credentials.
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = username.into();
        self.password = password.into();
        self
    }
}

impl fmt::Debug for DeploymentInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeploymentInfo")
            .field("app_name", &self.app_name)
            .field("environment", &self.environment)
            .field("org", &self.org)
            .field("space", &self.space)
            .field("uuid", &self.uuid)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("instances", &self.instances)
            .field("domain", &self.domain)
            .field("skip_ssl", &self.skip_ssl)
            .field("app_path", &self.app_path)
            .finish_non_exhaustive()
    }
}
