// ABOUTME: Library root for greenfleet - blue-green deployment across foundations.
// ABOUTME: The main binary is in main.rs.

pub mod config;
pub mod courier;
pub mod deploy;
pub mod diagnostics;
pub mod error;
pub mod events;
pub mod precheck;
pub mod push;
pub mod response;
pub mod types;
