// src/notifications/sink.rs

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;

/// A single outbound message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

impl Notification {
    pub fn new(recipient: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            recipient: recipient.into(),
            subject: subject.into(),
            body: body.into(),
        }
    }
}

/// Delivery boundary
///
/// Best effort: each call succeeds or fails on its own and implementations
/// must not retry internally.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn send(&self, recipient: &str, subject: &str, body: &str) -> AppResult<()>;
}

/// Sink used when no email provider is configured: writes messages to the log
#[derive(Debug, Default, Clone)]
pub struct LoggingSink;

#[async_trait]
impl NotificationSink for LoggingSink {
    async fn send(&self, recipient: &str, subject: &str, body: &str) -> AppResult<()> {
        log::info!(
            "[MAIL] to={} subject={:?} ({} bytes)",
            recipient,
            subject,
            body.len()
        );
        Ok(())
    }
}
