// ABOUTME: Environment descriptor: a named group of foundations sharing a domain.
// ABOUTME: Normalizes the default instance count at load time.

use serde::{Deserialize, Serialize};

/// A named group of foundations sharing a domain and deployment policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    pub name: String,
    /// Foundation API base URLs, probed and deployed in this order.
    pub foundations: Vec<String>,
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub skip_ssl: bool,
    #[serde(default = "default_instances")]
    pub instances: u16,
}

fn default_instances() -> u16 {
    1
}

/// Zero instances means "use the platform minimum" which is one.
pub fn normalize_instances(instances: u16) -> u16 {
    instances.max(1)
}

impl Environment {
    /// Return the environment with its instance count normalized.
    pub fn normalized(mut self) -> Self {
        self.instances = normalize_instances(self.instances);
        self
    }
}
