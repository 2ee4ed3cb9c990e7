// ABOUTME: Pub/sub registry mapping event types to ordered handler lists.
// ABOUTME: Emit runs every handler synchronously and reports the last failure.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use super::event::Event;

/// Result returned by an event handler.
pub type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Receives events of the types it was registered for.
pub trait EventHandler: Send + Sync {
    fn on_event(&self, event: &Event) -> HandlerResult;
}

/// Registers handlers and dispatches events to them.
pub trait EventManager: Send + Sync {
    /// Register `handler` for `event_type`. Handlers for the same type run in
    /// registration order.
    fn add_handler(&self, handler: Arc<dyn EventHandler>, event_type: &str)
    -> Result<(), EventError>;

    /// Dispatch `event` to every handler registered for its type.
    fn emit(&self, event: &Event) -> Result<(), EventError>;
}

#[derive(Debug, thiserror::Error)]
pub enum EventError {
    #[error("event type cannot be empty")]
    EmptyEventType,

    #[error("{event_type} handler failed: {source}")]
    Handler {
        event_type: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Process-wide handler registry.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: RwLock<HashMap<String, Vec<Arc<dyn EventHandler>>>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of handlers registered for `event_type`.
    pub fn handler_count(&self, event_type: &str) -> usize {
        self.handlers.read().get(event_type).map_or(0, Vec::len)
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let handlers = self.handlers.read();
        let mut types: Vec<_> = handlers.keys().collect();
        types.sort();
        f.debug_struct("HandlerRegistry")
            .field("event_types", &types)
            .finish()
    }
}

impl EventManager for HandlerRegistry {
    fn add_handler(
        &self,
        handler: Arc<dyn EventHandler>,
        event_type: &str,
    ) -> Result<(), EventError> {
        if event_type.is_empty() {
            return Err(EventError::EmptyEventType);
        }

        self.handlers
            .write()
            .entry(event_type.to_string())
            .or_default()
            .push(handler);
        Ok(())
    }

    fn emit(&self, event: &Event) -> Result<(), EventError> {
        // Snapshot so handlers may register further handlers without deadlocking.
        let handlers = match self.handlers.read().get(&event.event_type) {
            Some(handlers) => handlers.clone(),
            None => return Ok(()),
        };

        let mut last_error = None;
        for handler in handlers {
            if let Err(source) = handler.on_event(event) {
                tracing::debug!(event_type = %event.event_type, "event handler failed: {}", source);
                last_error = Some(EventError::Handler {
                    event_type: event.event_type.clone(),
                    source,
                });
            }
        }

        match last_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
