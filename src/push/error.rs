// ABOUTME: Error types for per-foundation push operations.
// ABOUTME: Log retrieval failures are chained after the primary error, never substituted.

use std::fmt;

use super::state::PusherState;
use crate::courier::CourierError;

/// Platform step that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Rename,
    Push,
    MapRoute,
    Delete,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Step::Rename => "rename",
            Step::Push => "push",
            Step::MapRoute => "map route",
            Step::Delete => "delete",
        })
    }
}

/// Errors from a single foundation's push, rollback or commit.
#[derive(Debug, thiserror::Error)]
pub enum PushError {
    #[error("cannot login to {foundation_url}: {source}")]
    Authentication {
        foundation_url: String,
        source: CourierError,
    },

    #[error("{}", describe_step(.step, .source))]
    StateTransition {
        step: Step,
        app_name: String,
        source: CourierError,
    },

    #[error("cannot {action} while {state}")]
    InvalidTransition {
        action: &'static str,
        state: PusherState,
    },

    /// Logs could not be fetched after `primary` failed.
    #[error("{primary}: cannot get logs: {source}")]
    LogRetrieval {
        primary: Box<PushError>,
        source: CourierError,
    },

    #[error("rollback of {app_name} incomplete: {}", join_failures(.failures))]
    Rollback {
        app_name: String,
        failures: Vec<PushError>,
    },

    #[error("cannot create pusher: {source}")]
    Setup { source: CourierError },

    #[error("cannot clean up: {source}")]
    CleanUp { source: CourierError },

    /// The foundation task panicked or was cancelled.
    #[error("foundation task aborted: {0}")]
    Aborted(String),
}

/// Push and map-route failures read as the platform's own message; the
/// renames and deletes around them are named.
fn describe_step(step: &Step, source: &CourierError) -> String {
    match step {
        Step::Push | Step::MapRoute => source.to_string(),
        Step::Rename | Step::Delete => format!("{step} failed: {source}"),
    }
}

fn join_failures(failures: &[PushError]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushErrorKind {
    /// Login to the foundation failed.
    Authentication,
    /// A rename, push, map-route or delete failed, or was attempted out of order.
    StateTransition,
    /// Diagnostic logs could not be fetched after another failure.
    LogRetrieval,
    /// The courier could not be created or released, or its task died.
    Resource,
}

impl PushError {
    pub fn kind(&self) -> PushErrorKind {
        match self {
            PushError::Authentication { .. } => PushErrorKind::Authentication,
            PushError::StateTransition { .. }
            | PushError::InvalidTransition { .. }
            | PushError::Rollback { .. } => PushErrorKind::StateTransition,
            PushError::LogRetrieval { .. } => PushErrorKind::LogRetrieval,
            PushError::Setup { .. } | PushError::CleanUp { .. } | PushError::Aborted(_) => {
                PushErrorKind::Resource
            }
        }
    }

    /// The failure that caused this error, looking through log retrieval chaining.
    pub fn primary(&self) -> &PushError {
        match self {
            PushError::LogRetrieval { primary, .. } => primary.primary(),
            other => other,
        }
    }
}
