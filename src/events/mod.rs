// ABOUTME: Event notification for deployment lifecycle milestones.
// ABOUTME: Exports the registry, handler trait, typed payloads and event type tags.

mod event;
mod handlers;
mod manager;

pub use event::{
    DEPLOY_FAILURE, DEPLOY_FINISH, DEPLOY_START, DEPLOY_SUCCESS, DeployEventData, Event,
    EventData, FOUNDATIONS_UNAVAILABLE, PrecheckerEventData,
};
pub use handlers::LogHandler;
pub use manager::{EventError, EventHandler, EventManager, HandlerRegistry, HandlerResult};
