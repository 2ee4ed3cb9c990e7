// ABOUTME: Test support utilities.
// ABOUTME: Scripted courier, queued pusher creator, event recorder and log capture.

// Each test binary only uses some of these helpers, so allow dead_code.
#![allow(dead_code)]

use async_trait::async_trait;
use greenfleet::config::Environment;
use greenfleet::courier::{Courier, CourierError, CourierResult};
use greenfleet::events::{Event, EventHandler, HandlerResult};
use greenfleet::precheck::{AvailabilityCheck, PrecheckError};
use greenfleet::push::{CourierPusher, PushError, Pusher, PusherCreator};
use greenfleet::response::SharedBuffer;
use greenfleet::types::{AppName, DeploymentInfo};
use parking_lot::Mutex;
use std::collections::{HashSet, VecDeque};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

pub fn environment(foundations: &[&str]) -> Environment {
    Environment {
        name: "prod".to_string(),
        foundations: foundations.iter().map(|f| f.to_string()).collect(),
        domain: "apps.example.com".to_string(),
        skip_ssl: false,
        instances: 2,
    }
}

pub fn deployment_info(environment: &Environment) -> DeploymentInfo {
    DeploymentInfo::for_environment(
        environment,
        AppName::new("myapp").unwrap(),
        "my-org",
        "my-space",
    )
    .with_credentials("deployer", "s3cret")
}

/// Courier that records every command and fails the ones it is told to.
///
/// Clones share the same call log so a test can keep a handle after
/// moving the courier into a pusher.
#[derive(Clone, Default)]
pub struct MockCourier {
    calls: Arc<Mutex<Vec<String>>>,
    failing: Arc<Mutex<HashSet<&'static str>>>,
    app_exists: bool,
    delay: Option<Duration>,
    in_flight: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
}

impl MockCourier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report the app as already deployed.
    pub fn existing_app(mut self) -> Self {
        self.app_exists = true;
        self
    }

    /// Make `command` ("login", "push", "rename", ...) fail.
    pub fn failing(self, command: &'static str) -> Self {
        self.failing.lock().insert(command);
        self
    }

    /// Hold every push for `delay`, tracking how many overlap.
    pub fn with_push_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Share concurrency counters with other couriers.
    pub fn with_counters(mut self, in_flight: Arc<AtomicUsize>, peak: Arc<AtomicUsize>) -> Self {
        self.in_flight = in_flight;
        self.peak = peak;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    fn run(&self, command: &'static str, call: String) -> CourierResult {
        self.calls.lock().push(call.clone());
        if self.failing.lock().contains(command) {
            Err(CourierError::new(format!("{command} error"))
                .with_output(format!("FAILED {call}\n").into_bytes()))
        } else {
            Ok(format!("OK {call}\n").into_bytes())
        }
    }
}

#[async_trait]
impl Courier for MockCourier {
    async fn login(
        &self,
        foundation_url: &str,
        username: &str,
        _password: &str,
        org: &str,
        space: &str,
        _skip_ssl: bool,
    ) -> CourierResult {
        self.run(
            "login",
            format!("login {foundation_url} {username} {org} {space}"),
        )
    }

    async fn push(&self, app_name: &str, _app_path: &Path, instances: u16) -> CourierResult {
        if let Some(delay) = self.delay {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(delay).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
        }
        self.run("push", format!("push {app_name} {instances}"))
    }

    async fn rename(&self, app_name: &str, new_name: &str) -> CourierResult {
        self.run("rename", format!("rename {app_name} {new_name}"))
    }

    async fn delete(&self, app_name: &str) -> CourierResult {
        self.run("delete", format!("delete {app_name}"))
    }

    async fn map_route(&self, app_name: &str, domain: &str) -> CourierResult {
        self.run("map-route", format!("map-route {app_name} {domain}"))
    }

    async fn logs(&self, app_name: &str) -> CourierResult {
        self.run("logs", format!("logs {app_name}"))
    }

    async fn exists(&self, app_name: &str) -> bool {
        self.calls.lock().push(format!("exists {app_name}"));
        self.app_exists
    }

    async fn clean_up(&self) -> Result<(), CourierError> {
        self.calls.lock().push("clean-up".to_string());
        if self.failing.lock().contains("clean-up") {
            Err(CourierError::new("clean-up failed"))
        } else {
            Ok(())
        }
    }
}

/// Hands out pre-built pushers in order, one per foundation.
pub struct QueuedCreator {
    pushers: Mutex<VecDeque<Arc<dyn Pusher>>>,
    created: AtomicUsize,
}

impl QueuedCreator {
    pub fn new(couriers: &[MockCourier]) -> Self {
        let pushers = couriers
            .iter()
            .map(|c| Arc::new(CourierPusher::new(c.clone())) as Arc<dyn Pusher>)
            .collect();
        Self {
            pushers: Mutex::new(pushers),
            created: AtomicUsize::new(0),
        }
    }

    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }
}

impl PusherCreator for QueuedCreator {
    fn create_pusher(&self, _info: &DeploymentInfo) -> Result<Arc<dyn Pusher>, PushError> {
        match self.pushers.lock().pop_front() {
            Some(pusher) => {
                self.created.fetch_add(1, Ordering::SeqCst);
                Ok(pusher)
            }
            None => Err(PushError::Setup {
                source: CourierError::new("no scratch space"),
            }),
        }
    }
}

/// Precheck stub that passes or fails without touching the network.
pub struct StubPrechecker {
    pub fail: bool,
}

#[async_trait]
impl AvailabilityCheck for StubPrechecker {
    async fn assert_all_foundations_up(&self, environment: &Environment) -> Result<(), PrecheckError> {
        if self.fail {
            Err(PrecheckError::FoundationUnavailable {
                url: environment.foundations.first().cloned().unwrap_or_default(),
                status: "503 Service Unavailable".to_string(),
            })
        } else {
            Ok(())
        }
    }
}

/// Event handler that keeps every event it receives.
#[derive(Default)]
pub struct RecordingHandler {
    events: Mutex<Vec<Event>>,
    fail: bool,
}

impl RecordingHandler {
    pub fn failing() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().clone()
    }

    pub fn types(&self) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .map(|e| e.event_type.clone())
            .collect()
    }
}

impl EventHandler for RecordingHandler {
    fn on_event(&self, event: &Event) -> HandlerResult {
        self.events.lock().push(event.clone());
        if self.fail {
            Err("handler refused event".into())
        } else {
            Ok(())
        }
    }
}

/// Route tracing output into a buffer for the current thread.
///
/// Works with the default single-threaded `#[tokio::test]` runtime; spawned
/// tasks run on the same thread and inherit the subscriber.
pub fn capture_logs() -> (SharedBuffer, tracing::subscriber::DefaultGuard) {
    let buffer = SharedBuffer::new();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .finish();
    let guard = tracing::subscriber::set_default(subscriber);
    (buffer, guard)
}
