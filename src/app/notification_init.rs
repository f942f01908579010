// src/app/notification_init.rs
//
// Wires outbound notifications: picks the sink, starts the queue worker,
// and subscribes the fan-out handlers to the event bus.

use std::sync::Arc;

use tokio::runtime::Handle;

use crate::app::config::AppConfig;
use crate::error::AppResult;
use crate::events::{register_notification_handlers, EventBus};
use crate::integrations::{MailjetClient, MailjetSender};
use crate::notifications::{LoggingSink, NotificationQueue, NotificationSink};
use crate::repositories::{RequestRepository, UserRepository};
use crate::services::NotificationService;

/// Handles kept by the caller so the queue can be drained at shutdown
pub struct NotificationSubsystem {
    pub service: Arc<NotificationService>,
    pub queue: Arc<NotificationQueue>,
}

/// Mailjet when both credentials are configured, the log otherwise
pub fn build_sink(config: &AppConfig) -> AppResult<Arc<dyn NotificationSink>> {
    match config.mailjet_credentials() {
        Some((key, secret)) => {
            let client = MailjetClient::new(
                key.to_string(),
                secret.to_string(),
                MailjetSender {
                    email: config.mail_from.clone(),
                    name: config.mail_from_name.clone(),
                },
            )?;
            log::info!("Email delivery via Mailjet as {}", config.mail_from);
            Ok(Arc::new(client))
        }
        None => {
            log::warn!("Mailjet credentials not configured; notifications will only be logged");
            Ok(Arc::new(LoggingSink))
        }
    }
}

/// Start the queue on `runtime` and register the event handlers
pub fn init_notification_subsystem(
    config: &AppConfig,
    sink: Arc<dyn NotificationSink>,
    request_repo: Arc<dyn RequestRepository>,
    user_repo: Arc<dyn UserRepository>,
    event_bus: &EventBus,
    runtime: &Handle,
) -> NotificationSubsystem {
    let queue = Arc::new(NotificationQueue::start(sink, runtime));

    let service = Arc::new(NotificationService::new(
        request_repo,
        user_repo,
        queue.clone(),
        config.public_base_url.clone(),
    ));

    register_notification_handlers(event_bus, service.clone());
    log::debug!("Notification subsystem initialized");

    NotificationSubsystem { service, queue }
}
