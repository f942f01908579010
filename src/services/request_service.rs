// src/services/request_service.rs
use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::auth::Principal;
use crate::domain::{validate_request, Coordinate, Request, RequestProgress, RequestType};
use crate::error::{AppError, AppResult};
use crate::events::{EventBus, RequestCreated, RequestProgressUpdated};
use crate::repositories::{RequestRepository, UserRepository};

#[derive(Debug, Clone)]
pub struct CreateRequestInput {
    pub title: String,
    pub description: Option<String>,
    pub request_type: RequestType,
    pub location: Coordinate,
}

pub struct RequestService {
    request_repo: Arc<dyn RequestRepository>,
    user_repo: Arc<dyn UserRepository>,
    event_bus: Arc<EventBus>,
}

impl RequestService {
    pub fn new(
        request_repo: Arc<dyn RequestRepository>,
        user_repo: Arc<dyn UserRepository>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            request_repo,
            user_repo,
            event_bus,
        }
    }

    /// Persist a new open request owned by `principal`
    ///
    /// Volunteers are notified through `RequestCreated`; delivery happens
    /// after this returns.
    pub fn create_request(
        &self,
        principal: &Principal,
        input: CreateRequestInput,
    ) -> AppResult<Request> {
        self.require_known_user(principal)?;

        let request = Request::new(
            input.title.trim().to_string(),
            input.description,
            input.request_type,
            input.location,
            principal.user_id,
        );
        validate_request(&request)?;
        self.request_repo.save(&request)?;

        log::info!(
            "Request {} ({}) created by {}",
            request.id,
            request.request_type,
            principal.user_id
        );
        self.event_bus
            .emit(RequestCreated::new(request.id, request.user_id));

        Ok(request)
    }

    pub fn get_request(&self, request_id: Uuid) -> AppResult<Request> {
        self.request_repo
            .get_by_id(request_id)?
            .ok_or_else(|| AppError::not_found(format!("Request {}", request_id)))
    }

    /// Unconfirmed requests, oldest first
    pub fn list_open_requests(&self, request_type: Option<RequestType>) -> AppResult<Vec<Request>> {
        self.request_repo.list_open(request_type)
    }

    /// Record field progress (`pending`, `in-progress`, `resolved`)
    pub fn update_request_progress(
        &self,
        principal: &Principal,
        request_id: Uuid,
        progress: &str,
    ) -> AppResult<Request> {
        self.require_known_user(principal)?;
        let progress: RequestProgress = progress.parse()?;

        if !self
            .request_repo
            .update_progress(request_id, progress, Utc::now())?
        {
            return Err(AppError::not_found(format!("Request {}", request_id)));
        }

        log::info!(
            "Request {} progress set to {} by {}",
            request_id,
            progress,
            principal.user_id
        );
        self.event_bus.emit(RequestProgressUpdated::new(
            request_id,
            progress.as_str().to_string(),
        ));

        self.get_request(request_id)
    }

    /// The principal must still map to an enabled account
    fn require_known_user(&self, principal: &Principal) -> AppResult<()> {
        match self.user_repo.get_by_id(principal.user_id)? {
            Some(user) if !user.disabled => Ok(()),
            _ => Err(AppError::Unauthenticated),
        }
    }
}
