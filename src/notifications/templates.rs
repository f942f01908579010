// src/notifications/templates.rs
//
// Plain-text bodies for the two outbound messages.

use uuid::Uuid;

use crate::domain::{Request, User};
use crate::notifications::sink::Notification;

pub const VOLUNTEER_REQUEST_SUBJECT: &str = "New Volunteer Request - Confirm Participation";
pub const VICTIM_CONFIRMATION_SUBJECT: &str = "Help is on the way!";

/// `{base}/confirm_request/{request_id}/{volunteer_id}`
pub fn confirmation_link(base_url: &str, request_id: Uuid, volunteer_id: Uuid) -> String {
    format!(
        "{}/confirm_request/{}/{}",
        base_url.trim_end_matches('/'),
        request_id,
        volunteer_id
    )
}

/// Invitation sent to a volunteer, carrying the request details and a link
/// that confirms the request under that volunteer's id
pub fn volunteer_request(base_url: &str, request: &Request, volunteer: &User) -> Notification {
    let link = confirmation_link(base_url, request.id, volunteer.id);

    let body = format!(
        "Hello {name},\n\
         \n\
         A request titled \"{title}\" needs a volunteer.\n\
         \n\
         Request details:\n\
         \x20 - Title: {title}\n\
         \x20 - Type: {kind}\n\
         \x20 - Description: {description}\n\
         \x20 - Location: {location}\n\
         \n\
         Confirm your participation: {link}\n\
         \n\
         If you are unable to help, you may ignore this email.\n\
         \n\
         Best,\n\
         CrisisCare Team\n",
        name = volunteer.firstname,
        title = request.title,
        kind = request.request_type,
        description = request.description.as_deref().unwrap_or("(none)"),
        location = request.location,
        link = link,
    );

    Notification::new(volunteer.email.clone(), VOLUNTEER_REQUEST_SUBJECT, body)
}

/// Message telling the requester who is coming
pub fn victim_confirmation(request: &Request, victim: &User, volunteer: &User) -> Notification {
    let body = format!(
        "Hello {victim},\n\
         \n\
         A volunteer has confirmed your request: \"{title}\".\n\
         \n\
         Volunteer details:\n\
         \x20 - Name: {volunteer}\n\
         \x20 - Contact: {email}\n\
         \n\
         Stay safe!\n\
         CrisisCare Team\n",
        victim = victim.firstname,
        title = request.title,
        volunteer = volunteer.full_name(),
        email = volunteer.email,
    );

    Notification::new(victim.email.clone(), VICTIM_CONFIRMATION_SUBJECT, body)
}
