// src/events/handlers/notification_handler.rs
//
// Bridges committed facts to outbound messages.
//
// - RequestCreated: invite every volunteer
// - RequestConfirmed: tell the requester and the assigned volunteer
//
// Failures are logged here and never reach the emitter; the state change
// that produced the event is already durable.

use std::sync::Arc;

use crate::events::types::{RequestConfirmed, RequestCreated};
use crate::events::EventBus;
use crate::services::NotificationService;

pub fn register_notification_handlers(bus: &EventBus, service: Arc<NotificationService>) {
    let created_service = Arc::clone(&service);
    bus.subscribe::<RequestCreated, _>(move |event| {
        handle_request_created(&created_service, event);
    });

    let confirmed_service = Arc::clone(&service);
    bus.subscribe::<RequestConfirmed, _>(move |event| {
        handle_request_confirmed(&confirmed_service, event);
    });

    log::debug!("Notification handlers registered");
}

fn handle_request_created(service: &NotificationService, event: &RequestCreated) {
    if let Err(e) = service.notify_volunteers_of_new_request(event.request_id) {
        log::error!(
            "Volunteer fan-out failed for request {}: {}",
            event.request_id,
            e
        );
    }
}

fn handle_request_confirmed(service: &NotificationService, event: &RequestConfirmed) {
    if let Err(e) = service.notify_confirmation(event.request_id, event.volunteer_id) {
        log::error!(
            "Confirmation notices failed for request {}: {}",
            event.request_id,
            e
        );
    }
}
