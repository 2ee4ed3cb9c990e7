// ABOUTME: Per-foundation push/rollback/commit state machine.
// ABOUTME: Drives a Courier and forwards its output to the shared response stream.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::path::Path;
use std::sync::Arc;

use super::error::{PushError, Step};
use super::state::PusherState;
use crate::courier::{Courier, CourierError};
use crate::response::ResponseStream;
use crate::types::DeploymentInfo;

/// Deploys one app to one foundation.
#[async_trait]
pub trait Pusher: Send + Sync {
    async fn login(
        &self,
        foundation_url: &str,
        deployment_info: &DeploymentInfo,
        response: &ResponseStream,
    ) -> Result<(), PushError>;

    async fn exists(&self, app_name: &str) -> bool;

    /// Move any live app aside, push the new bits and map the route.
    async fn push(
        &self,
        app_path: &Path,
        app_exists: bool,
        deployment_info: &DeploymentInfo,
        response: &ResponseStream,
    ) -> Result<(), PushError>;

    /// Delete the new app and restore the venerable copy.
    async fn rollback(
        &self,
        app_existed: bool,
        deployment_info: &DeploymentInfo,
    ) -> Result<(), PushError>;

    /// Commit: delete the venerable copy once the new version is live.
    async fn delete_venerable(
        &self,
        deployment_info: &DeploymentInfo,
        foundation_url: &str,
    ) -> Result<(), PushError>;

    async fn clean_up(&self) -> Result<(), PushError>;

    fn state(&self) -> PusherState;

    /// Whether the previous version currently sits under its venerable name.
    fn has_venerable(&self) -> bool;
}

/// Produces a fresh pusher for each foundation of a deployment.
pub trait PusherCreator: Send + Sync {
    fn create_pusher(&self, deployment_info: &DeploymentInfo) -> Result<Arc<dyn Pusher>, PushError>;
}

#[derive(Debug, Default)]
struct Session {
    state: PusherState,
    has_venerable: bool,
}

/// Pusher backed by a courier bound to a single foundation.
#[derive(Debug)]
pub struct CourierPusher<C> {
    courier: C,
    session: Mutex<Session>,
}

impl<C: Courier> CourierPusher<C> {
    pub fn new(courier: C) -> Self {
        Self {
            courier,
            session: Mutex::new(Session::default()),
        }
    }

    fn set_state(&self, state: PusherState) {
        let mut session = self.session.lock();
        tracing::debug!("pusher state {} -> {}", session.state, state);
        session.state = state;
    }

    fn require(&self, action: &'static str, allowed: &[PusherState]) -> Result<(), PushError> {
        let state = self.session.lock().state;
        if allowed.contains(&state) {
            Ok(())
        } else {
            Err(PushError::InvalidTransition { action, state })
        }
    }

    /// Fetch platform logs after `primary` failed. The logs go to the
    /// response; a log failure is chained onto the primary error.
    async fn with_logs(
        &self,
        primary: PushError,
        app_name: &str,
        response: &ResponseStream,
    ) -> PushError {
        match self.courier.logs(app_name).await {
            Ok(logs) => {
                response.forward(&logs);
                primary
            }
            Err(source) => {
                response.forward(source.output());
                tracing::error!("cannot get logs for {}: {}", app_name, source);
                PushError::LogRetrieval {
                    primary: Box::new(primary),
                    source,
                }
            }
        }
    }
}

fn transition_error(step: Step, app_name: &str, source: CourierError) -> PushError {
    PushError::StateTransition {
        step,
        app_name: app_name.to_string(),
        source,
    }
}

#[async_trait]
impl<C: Courier> Pusher for CourierPusher<C> {
    async fn login(
        &self,
        foundation_url: &str,
        deployment_info: &DeploymentInfo,
        response: &ResponseStream,
    ) -> Result<(), PushError> {
        self.require(
            "login",
            &[PusherState::Unauthenticated, PusherState::Authenticated],
        )?;
        tracing::info!("logging in to {}", foundation_url);

        let result = self
            .courier
            .login(
                foundation_url,
                &deployment_info.username,
                &deployment_info.password,
                &deployment_info.org,
                &deployment_info.space,
                deployment_info.skip_ssl,
            )
            .await;

        match result {
            Ok(output) => {
                response.forward(&output);
                self.set_state(PusherState::Authenticated);
                tracing::info!("logged in to {}", foundation_url);
                Ok(())
            }
            Err(source) => {
                response.forward(source.output());
                tracing::error!("cannot login to {}: {}", foundation_url, source);
                Err(PushError::Authentication {
                    foundation_url: foundation_url.to_string(),
                    source,
                })
            }
        }
    }

    async fn exists(&self, app_name: &str) -> bool {
        self.courier.exists(app_name).await
    }

    async fn push(
        &self,
        app_path: &Path,
        app_exists: bool,
        deployment_info: &DeploymentInfo,
        response: &ResponseStream,
    ) -> Result<(), PushError> {
        self.require("push", &[PusherState::Authenticated])?;

        let app_name = deployment_info.app_name.as_str();

        if app_exists {
            let venerable = deployment_info.app_name.venerable();
            match self.courier.rename(app_name, venerable.as_str()).await {
                Ok(output) => {
                    response.forward(&output);
                    {
                        let mut session = self.session.lock();
                        session.has_venerable = true;
                    }
                    self.set_state(PusherState::Renamed);
                    tracing::info!("renamed app from {} to {}", app_name, venerable);
                }
                Err(source) => {
                    response.forward(source.output());
                    tracing::error!("cannot rename {}: {}", app_name, source);
                    return Err(transition_error(Step::Rename, app_name, source));
                }
            }
        } else {
            self.set_state(PusherState::NewApp);
            tracing::info!("new app detected");
        }

        tracing::info!("pushing app {} to {}", app_name, deployment_info.domain);
        tracing::debug!("tempdir for app {}: {}", app_name, app_path.display());

        match self
            .courier
            .push(app_name, app_path, deployment_info.instances)
            .await
        {
            Ok(output) => {
                response.forward(&output);
                self.set_state(PusherState::Pushed);
                tracing::info!("push succeeded");
            }
            Err(source) => {
                response.forward(source.output());
                tracing::error!("push of {} failed: {}", app_name, source);
                let primary = transition_error(Step::Push, app_name, source);
                return Err(self.with_logs(primary, app_name, response).await);
            }
        }

        tracing::info!(
            "mapping route for {} to {}",
            app_name,
            deployment_info.domain
        );

        match self
            .courier
            .map_route(app_name, &deployment_info.domain)
            .await
        {
            Ok(output) => {
                response.forward(&output);
                self.set_state(PusherState::RouteMapped);
                Ok(())
            }
            Err(source) => {
                response.forward(source.output());
                tracing::error!("cannot map route for {}: {}", app_name, source);
                let primary = transition_error(Step::MapRoute, app_name, source);
                Err(self.with_logs(primary, app_name, response).await)
            }
        }
    }

    async fn rollback(
        &self,
        app_existed: bool,
        deployment_info: &DeploymentInfo,
    ) -> Result<(), PushError> {
        let app_name = deployment_info.app_name.as_str();

        if !app_existed {
            tracing::info!("no previous version of {} to roll back to", app_name);
            return Ok(());
        }

        let venerable = deployment_info.app_name.venerable();
        tracing::info!("rolling back deploy of {}", app_name);

        let mut failures = Vec::new();

        match self.courier.delete(app_name).await {
            Ok(_) => tracing::info!("deleted {}", app_name),
            Err(source) => {
                tracing::error!("cannot delete {}: {}", app_name, source);
                failures.push(transition_error(Step::Delete, app_name, source));
            }
        }

        // Attempted even when the delete failed so the old version gets
        // its name back whenever the platform allows it.
        match self.courier.rename(venerable.as_str(), app_name).await {
            Ok(_) => {
                self.session.lock().has_venerable = false;
                tracing::info!("renamed app from {} to {}", venerable, app_name);
            }
            Err(source) => {
                tracing::error!("cannot rename {} back: {}", venerable, source);
                failures.push(transition_error(Step::Rename, venerable.as_str(), source));
            }
        }

        self.set_state(PusherState::RolledBack);

        if failures.is_empty() {
            Ok(())
        } else {
            Err(PushError::Rollback {
                app_name: app_name.to_string(),
                failures,
            })
        }
    }

    async fn delete_venerable(
        &self,
        deployment_info: &DeploymentInfo,
        foundation_url: &str,
    ) -> Result<(), PushError> {
        self.require("delete venerable", &[PusherState::RouteMapped])?;

        let venerable = deployment_info.app_name.venerable();
        match self.courier.delete(venerable.as_str()).await {
            Ok(_) => {
                self.session.lock().has_venerable = false;
                self.set_state(PusherState::Committed);
                tracing::info!("deleted {}", venerable);
                Ok(())
            }
            Err(source) => {
                tracing::error!(
                    "cannot delete {} on {}: {}",
                    venerable,
                    foundation_url,
                    source
                );
                Err(transition_error(Step::Delete, venerable.as_str(), source))
            }
        }
    }

    async fn clean_up(&self) -> Result<(), PushError> {
        self.courier
            .clean_up()
            .await
            .map_err(|source| PushError::CleanUp { source })
    }

    fn state(&self) -> PusherState {
        self.session.lock().state
    }

    fn has_venerable(&self) -> bool {
        self.session.lock().has_venerable
    }
}
