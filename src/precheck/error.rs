// ABOUTME: Error types for foundation availability checks.
// ABOUTME: Distinguishes missing configuration, transport failures and unhealthy foundations.

/// Errors that stop a deployment before any foundation is touched.
#[derive(Debug, thiserror::Error)]
pub enum PrecheckError {
    /// The environment lists no foundations.
    #[error("no foundations configured")]
    NoFoundationsConfigured,

    /// The info endpoint could not be reached at all.
    #[error("cannot reach {url}: {reason}")]
    InvalidRequest { url: String, reason: String },

    /// The info endpoint answered with something other than 200 OK.
    #[error("deploy aborted: foundation {url} unavailable: {status}")]
    FoundationUnavailable { url: String, status: String },

    #[error("cannot build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrecheckErrorKind {
    /// Nothing to deploy to.
    Configuration,
    /// A foundation is unreachable or unhealthy.
    Availability,
}

impl PrecheckError {
    pub fn kind(&self) -> PrecheckErrorKind {
        match self {
            PrecheckError::NoFoundationsConfigured | PrecheckError::Client(_) => {
                PrecheckErrorKind::Configuration
            }
            PrecheckError::InvalidRequest { .. } | PrecheckError::FoundationUnavailable { .. } => {
                PrecheckErrorKind::Availability
            }
        }
    }

    /// Foundation URL the error concerns, if any.
    pub fn foundation_url(&self) -> Option<&str> {
        match self {
            PrecheckError::InvalidRequest { url, .. }
            | PrecheckError::FoundationUnavailable { url, .. } => Some(url),
            _ => None,
        }
    }
}
