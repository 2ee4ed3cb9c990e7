// ABOUTME: Validated application name with derived venerable name.
// ABOUTME: The venerable name is always computed, never stored separately.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Suffix appended to the live app while the new version is rolled out.
pub const VENERABLE_SUFFIX: &str = "-venerable";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AppNameError {
    #[error("app name cannot be empty")]
    Empty,

    #[error("app name cannot contain whitespace")]
    ContainsWhitespace,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AppName(String);

impl AppName {
    pub fn new(value: &str) -> Result<Self, AppNameError> {
        if value.is_empty() {
            return Err(AppNameError::Empty);
        }

        if value.chars().any(char::is_whitespace) {
            return Err(AppNameError::ContainsWhitespace);
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name the live app is moved to while the new version takes over.
    pub fn venerable(&self) -> AppName {
        AppName(format!("{}{}", self.0, VENERABLE_SUFFIX))
    }
}

impl fmt::Display for AppName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for AppName {
    type Error = AppNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        AppName::new(&value)
    }
}

impl From<AppName> for String {
    fn from(name: AppName) -> Self {
        name.0
    }
}
