// src/application/state.rs
//
// Composition root. Builds every repository and service from one
// `AppConfig` and exposes the operations an outer transport calls.
// All fields are Arc-wrapped so the state can be shared across tasks.

use std::sync::Arc;

use tokio::runtime::Handle;
use uuid::Uuid;

use crate::app::config::AppConfig;
use crate::app::notification_init::{build_sink, init_notification_subsystem};
use crate::auth::{AuthenticationProvider, CredentialAuthenticator, Principal};
use crate::db::{
    create_connection_pool, get_database_path, get_database_stats, initialize_database,
    verify_database_integrity, ConnectionPool,
};
use crate::domain::{Request, RequestType, Resource, ResourceType, User};
use crate::error::AppResult;
use crate::events::EventBus;
use crate::notifications::{DeliveryReport, NotificationQueue, NotificationSink};
use crate::repositories::{
    RequestRepository, ResourceRepository, SqliteRequestRepository, SqliteReservationRepository,
    SqliteResourceRepository, SqliteUserRepository, UserRepository,
};
use crate::services::{
    ConfirmationOutcome, ConfirmationService, CreateRequestInput, CreateResourceInput,
    MatchResult, Matcher, NotificationService, RankedResource, RegisterUserInput,
    RequestService, ResourceFilter, ResourcePool, ResourceService, UserService,
};

pub struct AppState {
    pub config: AppConfig,
    pub event_bus: Arc<EventBus>,
    pub authenticator: Arc<dyn AuthenticationProvider>,
    pub user_service: Arc<UserService>,
    pub request_service: Arc<RequestService>,
    pub resource_service: Arc<ResourceService>,
    pub confirmation_service: Arc<ConfirmationService>,
    pub notification_service: Arc<NotificationService>,
    notification_queue: Arc<NotificationQueue>,
}

impl AppState {
    /// Open (or create) the database named by `config` and wire everything
    ///
    /// The notification worker is spawned on `runtime`.
    pub fn bootstrap(config: AppConfig, runtime: &Handle) -> AppResult<Self> {
        config.validate()?;

        let db_path = match &config.database_path {
            Some(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent)?;
                }
                path.clone()
            }
            None => get_database_path()?,
        };

        let pool = create_connection_pool(&db_path, config.pool_max_size)?;
        {
            let conn = pool.get()?;
            initialize_database(&conn)?;
            verify_database_integrity(&conn)?;
            let stats = get_database_stats(&conn)?;
            log::info!(
                "Database ready at {} ({} users, {} open requests, {} available resources)",
                db_path.display(),
                stats.user_count,
                stats.open_request_count,
                stats.available_resource_count
            );
        }

        let sink = build_sink(&config)?;
        Ok(Self::assemble(config, Arc::new(pool), sink, runtime))
    }

    /// Wire services over an existing pool and sink
    pub fn assemble(
        config: AppConfig,
        pool: Arc<ConnectionPool>,
        sink: Arc<dyn NotificationSink>,
        runtime: &Handle,
    ) -> Self {
        let event_bus = Arc::new(EventBus::with_log_capacity(config.event_log_capacity));

        let user_repo: Arc<dyn UserRepository> = Arc::new(SqliteUserRepository::new(pool.clone()));
        let request_repo: Arc<dyn RequestRepository> =
            Arc::new(SqliteRequestRepository::new(pool.clone()));
        let resource_repo: Arc<dyn ResourceRepository> =
            Arc::new(SqliteResourceRepository::new(pool.clone()));
        let reservations = Arc::new(SqliteReservationRepository::new(pool));

        let resource_pool = Arc::new(ResourcePool::new(resource_repo.clone()));
        let matcher = Matcher::new(resource_pool.clone(), config.match_policy);

        let notifications = init_notification_subsystem(
            &config,
            sink,
            request_repo.clone(),
            user_repo.clone(),
            &event_bus,
            runtime,
        );

        Self {
            authenticator: Arc::new(CredentialAuthenticator::new(user_repo.clone())),
            user_service: Arc::new(UserService::new(user_repo.clone())),
            request_service: Arc::new(RequestService::new(
                request_repo.clone(),
                user_repo.clone(),
                event_bus.clone(),
            )),
            resource_service: Arc::new(ResourceService::new(
                resource_repo,
                user_repo.clone(),
                event_bus.clone(),
            )),
            confirmation_service: Arc::new(ConfirmationService::new(
                request_repo,
                user_repo,
                reservations,
                resource_pool,
                matcher,
                event_bus.clone(),
                config.max_reservation_attempts,
                config.default_search_radius_km,
            )),
            notification_service: notifications.service,
            notification_queue: notifications.queue,
            event_bus,
            config,
        }
    }

    // ========================================================================
    // API SURFACE
    // ========================================================================

    pub fn register_user(&self, input: RegisterUserInput) -> AppResult<User> {
        self.user_service.register(input)
    }

    pub fn authenticate(&self, email: &str, password: &str) -> AppResult<Principal> {
        self.authenticator.authenticate(email, password)
    }

    pub fn create_request(
        &self,
        principal: &Principal,
        input: CreateRequestInput,
    ) -> AppResult<Request> {
        self.request_service.create_request(principal, input)
    }

    pub fn list_open_requests(&self, request_type: Option<RequestType>) -> AppResult<Vec<Request>> {
        self.request_service.list_open_requests(request_type)
    }

    pub fn update_request_progress(
        &self,
        principal: &Principal,
        request_id: Uuid,
        progress: &str,
    ) -> AppResult<Request> {
        self.request_service
            .update_request_progress(principal, request_id, progress)
    }

    pub fn create_resource(
        &self,
        principal: &Principal,
        input: CreateResourceInput,
    ) -> AppResult<Resource> {
        self.resource_service.create_resource(principal, input)
    }

    pub fn list_resources(&self, filter: ResourceFilter) -> AppResult<Vec<Resource>> {
        self.resource_service.list_resources(filter)
    }

    pub fn match_request(&self, request_id: Uuid) -> AppResult<MatchResult> {
        self.confirmation_service.request_match(request_id)
    }

    pub fn confirm_request(
        &self,
        request_id: Uuid,
        volunteer_id: Uuid,
    ) -> AppResult<ConfirmationOutcome> {
        self.confirmation_service
            .confirm_by_volunteer(request_id, volunteer_id)
    }

    pub fn nearest_resources(
        &self,
        request_id: Uuid,
        radius_km: Option<f64>,
        resource_type: Option<ResourceType>,
    ) -> AppResult<Vec<RankedResource>> {
        self.confirmation_service
            .nearest_resources(request_id, radius_km, resource_type)
    }

    /// Stop accepting notifications and wait for queued ones to finish
    pub async fn shutdown(&self) -> DeliveryReport {
        self.notification_queue.shutdown().await
    }
}
