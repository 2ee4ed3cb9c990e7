// ABOUTME: Built-in event handlers.
// ABOUTME: LogHandler forwards lifecycle events to the tracing log.

use super::event::{Event, EventData, FOUNDATIONS_UNAVAILABLE};
use super::manager::{EventHandler, HandlerResult};

/// Writes every event it receives to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogHandler;

impl EventHandler for LogHandler {
    fn on_event(&self, event: &Event) -> HandlerResult {
        match &event.data {
            EventData::Precheck(data) => {
                if event.event_type == FOUNDATIONS_UNAVAILABLE {
                    tracing::warn!(
                        environment = %data.environment.name,
                        "foundations unavailable: {}",
                        data.description
                    );
                } else {
                    tracing::info!(environment = %data.environment.name, "{}", data.description);
                }
            }
            EventData::Deploy(data) => {
                tracing::info!(
                    event = %event.event_type,
                    environment = %data.environment.name,
                    app = %data.deployment_info.app_name,
                    uuid = %data.deployment_info.uuid,
                    "{}",
                    data.description
                );
            }
        }
        Ok(())
    }
}
