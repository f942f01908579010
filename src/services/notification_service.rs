// src/services/notification_service.rs
//
// Decides who hears about what. Messages go onto the queue; nothing here
// waits for delivery and no request or resource state is touched.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{Request, User, UserRole};
use crate::error::{AppError, AppResult};
use crate::notifications::{templates, Notification, NotificationQueue};
use crate::repositories::{RequestRepository, UserRepository};

pub struct NotificationService {
    request_repo: Arc<dyn RequestRepository>,
    user_repo: Arc<dyn UserRepository>,
    queue: Arc<NotificationQueue>,
    public_base_url: String,
}

impl NotificationService {
    pub fn new(
        request_repo: Arc<dyn RequestRepository>,
        user_repo: Arc<dyn UserRepository>,
        queue: Arc<NotificationQueue>,
        public_base_url: String,
    ) -> Self {
        Self {
            request_repo,
            user_repo,
            queue,
            public_base_url,
        }
    }

    /// Invite every active volunteer to confirm `request_id`
    ///
    /// Returns how many messages were queued. No volunteers is not an error.
    pub fn notify_volunteers_of_new_request(&self, request_id: Uuid) -> AppResult<usize> {
        let request = self.load_request(request_id)?;
        let volunteers = self.user_repo.list_by_role(UserRole::Volunteer)?;

        if volunteers.is_empty() {
            log::info!("No volunteers to notify for request {}", request.id);
            return Ok(0);
        }

        let queued = volunteers
            .iter()
            .map(|v| templates::volunteer_request(&self.public_base_url, &request, v))
            .filter(|message| self.try_enqueue(message))
            .count();

        log::info!(
            "Queued {}/{} volunteer notification(s) for request {}",
            queued,
            volunteers.len(),
            request.id
        );
        Ok(queued)
    }

    /// Tell the requester who is coming and acknowledge the assignment to
    /// the volunteer
    pub fn notify_confirmation(&self, request_id: Uuid, volunteer_id: Uuid) -> AppResult<usize> {
        let request = self.load_request(request_id)?;
        let victim = self.load_user(request.user_id, "Requester")?;
        let volunteer = self.load_user(volunteer_id, "Volunteer")?;

        let messages = [
            templates::victim_confirmation(&request, &victim, &volunteer),
            templates::volunteer_request(&self.public_base_url, &request, &volunteer),
        ];

        Ok(messages
            .into_iter()
            .filter(|message| self.try_enqueue(message))
            .count())
    }

    fn try_enqueue(&self, message: &Notification) -> bool {
        match self.queue.enqueue(message.clone()) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Could not queue notification to {}: {}", message.recipient, e);
                false
            }
        }
    }

    fn load_request(&self, request_id: Uuid) -> AppResult<Request> {
        self.request_repo
            .get_by_id(request_id)?
            .ok_or_else(|| AppError::not_found(format!("Request {}", request_id)))
    }

    fn load_user(&self, user_id: Uuid, what: &str) -> AppResult<User> {
        self.user_repo
            .get_by_id(user_id)?
            .ok_or_else(|| AppError::not_found(format!("{} {}", what, user_id)))
    }
}
