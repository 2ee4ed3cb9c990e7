// ABOUTME: Pusher session states for one foundation.
// ABOUTME: Tracks where a foundation is in the rename/push/route/commit sequence.

use std::fmt;

/// Where a single foundation's deployment currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PusherState {
    /// Nothing has happened yet.
    /// Available actions: `login()`
    #[default]
    Unauthenticated,

    /// Logged in and targeting the org and space.
    /// Available actions: `push()`
    Authenticated,

    /// Live app moved aside under its venerable name.
    /// Available actions: `rollback()`
    Renamed,

    /// No previous version on this foundation.
    NewApp,

    /// New bits are running under the app name.
    /// Available actions: `rollback()`
    Pushed,

    /// Route mapped to the new version.
    /// Available actions: `delete_venerable()`, `rollback()`
    RouteMapped,

    /// Venerable copy deleted, deployment final.
    Committed,

    /// New version removed and venerable copy restored.
    RolledBack,
}

impl PusherState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PusherState::Unauthenticated => "unauthenticated",
            PusherState::Authenticated => "authenticated",
            PusherState::Renamed => "renamed",
            PusherState::NewApp => "new-app",
            PusherState::Pushed => "pushed",
            PusherState::RouteMapped => "route-mapped",
            PusherState::Committed => "committed",
            PusherState::RolledBack => "rolled-back",
        }
    }
}

impl fmt::Display for PusherState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
