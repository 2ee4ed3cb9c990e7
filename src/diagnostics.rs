// ABOUTME: Diagnostics accumulator for non-fatal warnings during deployment.
// ABOUTME: Collects clean-up and event failures that must not change the deploy outcome.

/// Collects non-fatal warnings during a deployment.
#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Record a warning, auto-logging it via tracing.
    pub fn warn(&mut self, warning: Warning) {
        tracing::warn!("{}", warning.message);
        self.warnings.push(warning);
    }

    /// Get all collected warnings.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Check if any warnings were collected.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// A non-fatal warning collected during deployment.
#[derive(Debug, Clone)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

impl Warning {
    /// A foundation's courier could not release its resources.
    pub fn clean_up(foundation_url: &str, message: impl std::fmt::Display) -> Self {
        Self {
            kind: WarningKind::CleanUp,
            message: format!("{}: {}", foundation_url, message),
        }
    }

    /// An event handler failed.
    pub fn event(event_type: &str, message: impl std::fmt::Display) -> Self {
        Self {
            kind: WarningKind::Event,
            message: format!("{}: {}", event_type, message),
        }
    }
}

/// Categories of warnings that can occur during deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// Scratch resources for a foundation were not released.
    CleanUp,
    /// An event handler returned an error.
    Event,
}
