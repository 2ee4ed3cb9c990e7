// ABOUTME: Error types for fleet-wide blue-green deployments.
// ABOUTME: Aggregates per-foundation failures so every failing foundation is named.

use std::fmt;

use crate::precheck::PrecheckError;
use crate::push::PushError;

/// One foundation's failure within a fleet operation.
#[derive(Debug)]
pub struct FoundationFailure {
    pub foundation_url: String,
    pub error: PushError,
}

impl fmt::Display for FoundationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.foundation_url, self.error)
    }
}

fn join(failures: &[FoundationFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

fn rollback_suffix(failures: &[FoundationFailure]) -> String {
    if failures.is_empty() {
        String::new()
    } else {
        format!(" (rollback also failed: {})", join(failures))
    }
}

/// Errors from a fleet-wide deployment.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    /// Fleet health check failed; no foundation was touched.
    #[error("precheck failed: {0}")]
    Precheck(#[from] PrecheckError),

    #[error("cannot prepare {foundation_url}: {source}")]
    CreatePusher {
        foundation_url: String,
        source: PushError,
    },

    /// At least one foundation failed to push; the fleet was rolled back.
    #[error(
        "push failed on {} foundation(s): {}{}",
        .failures.len(),
        join(.failures),
        rollback_suffix(.rollback_failures)
    )]
    Push {
        failures: Vec<FoundationFailure>,
        rollback_failures: Vec<FoundationFailure>,
    },

    /// The new version is live everywhere but venerable copies remain.
    #[error("deployed, but cannot delete venerable app: {}", join(.failures))]
    Commit { failures: Vec<FoundationFailure> },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployErrorKind {
    Precheck,
    Setup,
    Push,
    Commit,
}

impl DeployError {
    pub fn kind(&self) -> DeployErrorKind {
        match self {
            DeployError::Precheck(_) => DeployErrorKind::Precheck,
            DeployError::CreatePusher { .. } => DeployErrorKind::Setup,
            DeployError::Push { .. } => DeployErrorKind::Push,
            DeployError::Commit { .. } => DeployErrorKind::Commit,
        }
    }

    /// URLs of the foundations whose push or commit failed, in fleet order.
    pub fn failed_foundations(&self) -> Vec<&str> {
        match self {
            DeployError::Push { failures, .. } | DeployError::Commit { failures } => failures
                .iter()
                .map(|f| f.foundation_url.as_str())
                .collect(),
            DeployError::CreatePusher { foundation_url, .. } => vec![foundation_url.as_str()],
            DeployError::Precheck(err) => err.foundation_url().into_iter().collect(),
        }
    }
}
