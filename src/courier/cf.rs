// ABOUTME: Courier implementation that drives the cf CLI.
// ABOUTME: Each courier gets a private CF_HOME so concurrent foundations never share a session.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tempfile::TempDir;
use tokio::process::Command;

use super::{Courier, CourierError, CourierResult};

/// Runs `cf` commands against one foundation.
pub struct CfCourier {
    binary: PathBuf,
    home_path: PathBuf,
    home: Mutex<Option<TempDir>>,
}

impl std::fmt::Debug for CfCourier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CfCourier")
            .field("binary", &self.binary)
            .field("home", &self.home_path)
            .finish()
    }
}

impl CfCourier {
    /// Create a courier using `cf` from `PATH`.
    pub fn new() -> Result<Self, CourierError> {
        Self::with_binary("cf")
    }

    /// Create a courier using a specific CLI binary.
    pub fn with_binary(binary: impl Into<PathBuf>) -> Result<Self, CourierError> {
        let home = tempfile::Builder::new()
            .prefix("greenfleet-cf-")
            .tempdir()
            .map_err(|e| CourierError::new(format!("cannot create CF_HOME: {}", e)))?;

        Ok(Self {
            binary: binary.into(),
            home_path: home.path().to_path_buf(),
            home: Mutex::new(Some(home)),
        })
    }

    /// Scratch directory used as `CF_HOME`.
    pub fn home(&self) -> &Path {
        &self.home_path
    }

    async fn run(&self, args: Vec<String>) -> CourierResult {
        let command = args.first().cloned().unwrap_or_default();
        // Arguments may contain the password; only the subcommand is logged.
        tracing::debug!(binary = %self.binary.display(), "running cf {}", command);

        let output = Command::new(&self.binary)
            .args(&args)
            .env("CF_HOME", &self.home_path)
            .env("CF_COLOR", "false")
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| {
                CourierError::new(format!("failed to run {}: {}", self.binary.display(), e))
            })?;

        let mut combined = output.stdout;
        combined.extend_from_slice(&output.stderr);

        if output.status.success() {
            Ok(combined)
        } else {
            Err(
                CourierError::new(format!("cf {} exited with {}", command, output.status))
                    .with_output(combined),
            )
        }
    }
}

pub(crate) fn login_args(
    foundation_url: &str,
    username: &str,
    password: &str,
    org: &str,
    space: &str,
    skip_ssl: bool,
) -> Vec<String> {
    let mut args: Vec<String> = [
        "login", "-a", foundation_url, "-u", username, "-p", password, "-o", org, "-s", space,
    ]
    .into_iter()
    .map(String::from)
    .collect();
    if skip_ssl {
        args.push("--skip-ssl-validation".to_string());
    }
    args
}

pub(crate) fn push_args(app_name: &str, app_path: &Path, instances: u16) -> Vec<String> {
    vec![
        "push".to_string(),
        app_name.to_string(),
        "-p".to_string(),
        app_path.display().to_string(),
        "-i".to_string(),
        instances.to_string(),
    ]
}

pub(crate) fn map_route_args(app_name: &str, domain: &str) -> Vec<String> {
    vec![
        "map-route".to_string(),
        app_name.to_string(),
        domain.to_string(),
        "-n".to_string(),
        app_name.to_string(),
    ]
}

fn args(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| (*s).to_string()).collect()
}

#[async_trait]
impl Courier for CfCourier {
    async fn login(
        &self,
        foundation_url: &str,
        username: &str,
        password: &str,
        org: &str,
        space: &str,
        skip_ssl: bool,
    ) -> CourierResult {
        self.run(login_args(
            foundation_url,
            username,
            password,
            org,
            space,
            skip_ssl,
        ))
        .await
    }

    async fn push(&self, app_name: &str, app_path: &Path, instances: u16) -> CourierResult {
        self.run(push_args(app_name, app_path, instances)).await
    }

    async fn rename(&self, app_name: &str, new_name: &str) -> CourierResult {
        self.run(args(&["rename", app_name, new_name])).await
    }

    async fn delete(&self, app_name: &str) -> CourierResult {
        self.run(args(&["delete", app_name, "-f"])).await
    }

    async fn map_route(&self, app_name: &str, domain: &str) -> CourierResult {
        self.run(map_route_args(app_name, domain)).await
    }

    async fn logs(&self, app_name: &str) -> CourierResult {
        self.run(args(&["logs", app_name, "--recent"])).await
    }

    async fn exists(&self, app_name: &str) -> bool {
        self.run(args(&["app", app_name])).await.is_ok()
    }

    async fn clean_up(&self) -> Result<(), CourierError> {
        let home = self.home.lock().take();
        match home {
            Some(dir) => dir.close().map_err(|e| {
                CourierError::new(format!(
                    "cannot remove {}: {}",
                    self.home_path.display(),
                    e
                ))
            }),
            None => Ok(()),
        }
    }
}
