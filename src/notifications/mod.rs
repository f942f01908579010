// src/notifications/mod.rs
//
// Outbound notification plumbing.
//
// - `NotificationSink`: the delivery boundary (email provider, log, test double)
// - `NotificationQueue`: asynchronous hand-off so callers never wait on delivery
// - `templates`: message composition

pub mod queue;
pub mod sink;
pub mod templates;

pub use queue::{DeliveryReport, FailedDelivery, NotificationQueue, MAX_RECORDED_FAILURES};
pub use sink::{LoggingSink, Notification, NotificationSink};
