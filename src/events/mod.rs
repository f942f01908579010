// src/events/mod.rs
//
// Internal event system. Services emit facts after a commit; handlers
// registered at startup react to them (notification fan-out).

pub mod bus;
pub mod handlers;
pub mod types;

pub use types::DomainEvent;

pub use types::{
    RequestConfirmed, RequestCreated, RequestMatched, RequestProgressUpdated, ResourceCreated,
};

pub use bus::{EventBus, EventLogEntry, DEFAULT_EVENT_LOG_CAPACITY};

pub use handlers::register_notification_handlers;
