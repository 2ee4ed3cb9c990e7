// ABOUTME: Configuration types and parsing for the environments file.
// ABOUTME: Handles YAML parsing, credential env vars and environment lookup.

mod environment;

pub use environment::{Environment, normalize_instances};

use crate::error::{Error, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

pub const USERNAME_ENV: &str = "CF_USERNAME";
pub const PASSWORD_ENV: &str = "CF_PASSWORD";

#[derive(Debug, Clone)]
pub struct Config {
    pub username: String,
    pub password: String,
    /// Environments keyed by lowercased name.
    pub environments: HashMap<String, Environment>,
    pub precheck_timeout: Duration,
    pub max_concurrency: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    environments: Option<Vec<EnvironmentEntry>>,

    #[serde(default = "default_precheck_timeout", with = "humantime_serde")]
    precheck_timeout: Duration,

    #[serde(default)]
    max_concurrency: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct EnvironmentEntry {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    domain: String,
    #[serde(default)]
    foundations: Option<Vec<String>>,
    #[serde(default)]
    skip_ssl: bool,
    #[serde(default)]
    instances: u16,
}

impl EnvironmentEntry {
    fn into_environment(self) -> Result<Environment> {
        let name = self
            .name
            .filter(|n| !n.trim().is_empty())
            .ok_or(Error::MissingParameter("name"))?;
        let foundations = self
            .foundations
            .ok_or(Error::MissingParameter("foundations"))?;

        Ok(Environment {
            name,
            foundations,
            domain: self.domain,
            skip_ssl: self.skip_ssl,
            instances: self.instances,
        }
        .normalized())
    }
}

pub fn default_precheck_timeout() -> Duration {
    Duration::from_secs(15)
}

impl Config {
    /// Parse a config file, resolving credentials through `lookup`.
    pub fn from_yaml_with_env<F>(yaml: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file: Option<ConfigFile> = serde_yaml::from_str(yaml)?;
        let file = file.ok_or(Error::EnvironmentsNotSpecified)?;

        let entries = file
            .environments
            .filter(|e| !e.is_empty())
            .ok_or(Error::EnvironmentsNotSpecified)?;

        let mut environments = HashMap::new();
        for entry in entries {
            let environment = entry.into_environment()?;
            environments.insert(environment.name.to_lowercase(), environment);
        }

        let env_var = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let username = env_var(USERNAME_ENV);
        let password = env_var(PASSWORD_ENV);
        let missing: Vec<String> = [(USERNAME_ENV, &username), (PASSWORD_ENV, &password)]
            .into_iter()
            .filter(|(_, value)| value.is_none())
            .map(|(key, _)| key.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(Error::MissingEnvVars(missing));
        }

        Ok(Config {
            username: username.unwrap_or_default(),
            password: password.unwrap_or_default(),
            environments,
            precheck_timeout: file.precheck_timeout,
            max_concurrency: file.max_concurrency.filter(|n| *n > 0),
        })
    }

    /// Load a config file, resolving credentials from the process environment.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_with_env(&content, |key| std::env::var(key).ok())
    }

    /// Look up an environment by name, ignoring case.
    pub fn environment(&self, name: &str) -> Result<&Environment> {
        self.environments
            .get(&name.to_lowercase())
            .ok_or_else(|| Error::UnknownEnvironment(name.to_string()))
    }
}
