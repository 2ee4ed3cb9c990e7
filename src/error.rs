// ABOUTME: Application-wide error types for greenfleet.
// ABOUTME: Uses thiserror for ergonomic error handling.

use thiserror::Error;

use crate::deploy::DeployError;
use crate::events::EventError;
use crate::types::AppNameError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("environments key not specified in the configuration")]
    EnvironmentsNotSpecified,

    #[error("missing required parameter in the environments key: {0}")]
    MissingParameter(&'static str),

    #[error("missing environment variables: {}", .0.join(", "))]
    MissingEnvVars(Vec<String>),

    #[error("unknown environment: {0}")]
    UnknownEnvironment(String),

    #[error("invalid app name: {0}")]
    InvalidAppName(#[from] AppNameError),

    #[error(transparent)]
    Deploy(#[from] DeployError),

    #[error("event registration failed: {0}")]
    Event(#[from] EventError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
