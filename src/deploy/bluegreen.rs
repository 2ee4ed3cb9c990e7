// ABOUTME: Fleet-wide blue-green orchestration across every foundation of an environment.
// ABOUTME: Pushes concurrently, then commits everywhere or compensates everywhere.

use futures::future::join_all;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::Instrument;

use super::error::{DeployError, FoundationFailure};
use crate::config::Environment;
use crate::diagnostics::{Diagnostics, Warning};
use crate::events::{
    DEPLOY_FAILURE, DEPLOY_FINISH, DEPLOY_START, DEPLOY_SUCCESS, Event, EventManager,
};
use crate::precheck::AvailabilityCheck;
use crate::push::{PushError, Pusher, PusherCreator};
use crate::response::ResponseStream;
use crate::types::DeploymentInfo;

/// A foundation paired with the pusher bound to it for this deployment.
struct Foundation {
    url: String,
    pusher: Arc<dyn Pusher>,
}

/// Drives a deployment across all foundations of an environment.
///
/// Every foundation is pushed in its own task. Once all tasks have finished,
/// either every foundation commits (the venerable copy is deleted) or every
/// foundation that renamed its live app is rolled back. Clean-up runs on
/// every foundation exactly once in both cases.
pub struct BlueGreener {
    prechecker: Arc<dyn AvailabilityCheck>,
    pusher_creator: Arc<dyn PusherCreator>,
    events: Arc<dyn EventManager>,
    max_concurrency: Option<usize>,
}

impl std::fmt::Debug for BlueGreener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlueGreener")
            .field("max_concurrency", &self.max_concurrency)
            .finish_non_exhaustive()
    }
}

impl BlueGreener {
    pub fn new(
        prechecker: Arc<dyn AvailabilityCheck>,
        pusher_creator: Arc<dyn PusherCreator>,
        events: Arc<dyn EventManager>,
    ) -> Self {
        Self {
            prechecker,
            pusher_creator,
            events,
            max_concurrency: None,
        }
    }

    /// Limit how many foundations are worked on at once. `None` or zero
    /// means one task per foundation with no limit.
    pub fn with_max_concurrency(mut self, limit: Option<usize>) -> Self {
        self.max_concurrency = limit.filter(|n| *n > 0);
        self
    }

    /// Deploy `app_path` to every foundation of `environment`.
    ///
    /// Returns the non-fatal warnings collected along the way.
    ///
    /// # Errors
    ///
    /// - `DeployError::Precheck` if any foundation is unavailable (nothing is touched)
    /// - `DeployError::CreatePusher` if a pusher cannot be prepared
    /// - `DeployError::Push` if any foundation failed; the fleet has been rolled back
    /// - `DeployError::Commit` if the new version is live but venerable copies remain
    pub async fn push(
        &self,
        environment: &Environment,
        app_path: &Path,
        deployment_info: &DeploymentInfo,
        response: &ResponseStream,
    ) -> Result<Diagnostics, DeployError> {
        let span = tracing::info_span!(
            "deployment",
            uuid = %deployment_info.uuid,
            app = %deployment_info.app_name,
            environment = %environment.name
        );

        async {
            let mut diagnostics = Diagnostics::default();

            self.emit(
                Event::deploy(
                    DEPLOY_START,
                    environment,
                    deployment_info,
                    format!(
                        "deploying {} to {}",
                        deployment_info.app_name, environment.name
                    ),
                ),
                &mut diagnostics,
            );

            let result = self
                .deploy(
                    environment,
                    app_path,
                    deployment_info,
                    response,
                    &mut diagnostics,
                )
                .await;

            let outcome = match &result {
                Ok(()) => {
                    tracing::info!(
                        "deployed {} to {} foundation(s)",
                        deployment_info.app_name,
                        environment.foundations.len()
                    );
                    Event::deploy(
                        DEPLOY_SUCCESS,
                        environment,
                        deployment_info,
                        format!("deployed {}", deployment_info.app_name),
                    )
                }
                Err(err) => {
                    tracing::error!("deployment failed: {}", err);
                    Event::deploy(DEPLOY_FAILURE, environment, deployment_info, err.to_string())
                }
            };
            self.emit(outcome, &mut diagnostics);
            self.emit(
                Event::deploy(DEPLOY_FINISH, environment, deployment_info, "finished"),
                &mut diagnostics,
            );

            result.map(|()| diagnostics)
        }
        .instrument(span)
        .await
    }

    async fn deploy(
        &self,
        environment: &Environment,
        app_path: &Path,
        deployment_info: &DeploymentInfo,
        response: &ResponseStream,
        diagnostics: &mut Diagnostics,
    ) -> Result<(), DeployError> {
        self.prechecker
            .assert_all_foundations_up(environment)
            .await?;

        let foundations = self
            .create_pushers(environment, deployment_info, diagnostics)
            .await?;

        let info = Arc::new(deployment_info.clone());
        let app_path: Arc<PathBuf> = Arc::new(app_path.to_path_buf());

        let pushed = self
            .fan_out(&foundations, "push", |pusher, url| {
                let info = Arc::clone(&info);
                let app_path = Arc::clone(&app_path);
                let response = response.clone();
                async move { push_foundation(pusher.as_ref(), &url, &app_path, &info, &response).await }
            })
            .await;

        let failures = collect_failures(&foundations, pushed);

        let result = if failures.is_empty() {
            tracing::info!("all foundations pushed, deleting venerable apps");
            let committed = self
                .fan_out(&foundations, "commit", |pusher, url| {
                    let info = Arc::clone(&info);
                    async move { pusher.delete_venerable(&info, &url).await }
                })
                .await;

            let commit_failures = collect_failures(&foundations, committed);
            if commit_failures.is_empty() {
                Ok(())
            } else {
                Err(DeployError::Commit {
                    failures: commit_failures,
                })
            }
        } else {
            tracing::warn!(
                "{} of {} foundation(s) failed, rolling back",
                failures.len(),
                foundations.len()
            );
            let rolled_back = self
                .fan_out(&foundations, "rollback", |pusher, _url| {
                    let info = Arc::clone(&info);
                    async move {
                        let app_existed = pusher.has_venerable();
                        pusher.rollback(app_existed, &info).await
                    }
                })
                .await;

            Err(DeployError::Push {
                failures,
                rollback_failures: collect_failures(&foundations, rolled_back),
            })
        };

        self.clean_up(&foundations, diagnostics).await;

        result
    }

    async fn create_pushers(
        &self,
        environment: &Environment,
        deployment_info: &DeploymentInfo,
        diagnostics: &mut Diagnostics,
    ) -> Result<Vec<Foundation>, DeployError> {
        let mut foundations = Vec::with_capacity(environment.foundations.len());

        for url in &environment.foundations {
            match self.pusher_creator.create_pusher(deployment_info) {
                Ok(pusher) => foundations.push(Foundation {
                    url: url.clone(),
                    pusher,
                }),
                Err(source) => {
                    self.clean_up(&foundations, diagnostics).await;
                    return Err(DeployError::CreatePusher {
                        foundation_url: url.clone(),
                        source,
                    });
                }
            }
        }

        Ok(foundations)
    }

    async fn clean_up(&self, foundations: &[Foundation], diagnostics: &mut Diagnostics) {
        let cleaned = self
            .fan_out(foundations, "clean-up", |pusher, _url| async move {
                pusher.clean_up().await
            })
            .await;

        for (foundation, result) in foundations.iter().zip(cleaned) {
            if let Err(e) = result {
                diagnostics.warn(Warning::clean_up(&foundation.url, e));
            }
        }
    }

    /// Run `op` once per foundation, each in its own task, and wait for all
    /// of them. Results come back in fleet order.
    async fn fan_out<F, Fut>(
        &self,
        foundations: &[Foundation],
        phase: &'static str,
        op: F,
    ) -> Vec<Result<(), PushError>>
    where
        F: Fn(Arc<dyn Pusher>, String) -> Fut,
        Fut: Future<Output = Result<(), PushError>> + Send + 'static,
    {
        let limit = self.max_concurrency.map(|n| Arc::new(Semaphore::new(n)));

        let tasks: Vec<_> = foundations
            .iter()
            .map(|foundation| {
                let task = op(Arc::clone(&foundation.pusher), foundation.url.clone());
                let limit = limit.clone();
                let span = tracing::info_span!("foundation", url = %foundation.url, phase);
                tokio::spawn(
                    async move {
                        let _permit = match limit {
                            Some(semaphore) => semaphore.acquire_owned().await.ok(),
                            None => None,
                        };
                        task.await
                    }
                    .instrument(span),
                )
            })
            .collect();

        join_all(tasks)
            .await
            .into_iter()
            .map(|joined| joined.unwrap_or_else(|e| Err(PushError::Aborted(e.to_string()))))
            .collect()
    }

    fn emit(&self, event: Event, diagnostics: &mut Diagnostics) {
        if let Err(e) = self.events.emit(&event) {
            diagnostics.warn(Warning::event(&event.event_type, e));
        }
    }
}

/// Login, existence check and push for one foundation, strictly in order.
async fn push_foundation(
    pusher: &dyn Pusher,
    foundation_url: &str,
    app_path: &Path,
    deployment_info: &DeploymentInfo,
    response: &ResponseStream,
) -> Result<(), PushError> {
    pusher.login(foundation_url, deployment_info, response).await?;

    let app_exists = pusher.exists(deployment_info.app_name.as_str()).await;
    tracing::debug!("{} exists: {}", deployment_info.app_name, app_exists);

    pusher
        .push(app_path, app_exists, deployment_info, response)
        .await
}

fn collect_failures(
    foundations: &[Foundation],
    results: Vec<Result<(), PushError>>,
) -> Vec<FoundationFailure> {
    foundations
        .iter()
        .zip(results)
        .filter_map(|(foundation, result)| {
            result.err().map(|error| FoundationFailure {
                foundation_url: foundation.url.clone(),
                error,
            })
        })
        .collect()
}
