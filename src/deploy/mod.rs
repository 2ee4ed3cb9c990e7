// ABOUTME: Fleet-wide blue-green deployment orchestration.
// ABOUTME: Exports the BlueGreener coordinator and its aggregated error types.

mod bluegreen;
mod error;

pub use bluegreen::BlueGreener;
pub use error::{DeployError, DeployErrorKind, FoundationFailure};
