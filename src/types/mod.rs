// ABOUTME: Validated domain types shared across the deployment engine.
// ABOUTME: App names, venerable naming, and the per-deployment record.

mod app_name;
mod deployment_info;

pub use app_name::{AppName, AppNameError, VENERABLE_SUFFIX};
pub use deployment_info::DeploymentInfo;
