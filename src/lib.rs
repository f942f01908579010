// src/lib.rs
// CrisisCare - disaster-relief coordination
//
// Architecture:
// - Domain-centric: entities, closed enums, and invariants live in `domain`
// - Repositories are dumb SQLite mappers; the reservation store owns the
//   only multi-row transaction
// - Services own validation, state transitions, and event emission
// - Event-driven notifications: handlers enqueue email off the caller's path
// - Explicit configuration: one `AppConfig`, built at startup

// ============================================================================
// FOUNDATION
// ============================================================================

pub mod auth;
pub mod db;
pub mod domain;
pub mod error;
pub mod events;
pub mod notifications;
pub mod repositories;
pub mod services;

// ============================================================================
// STARTUP + APPLICATION LAYER
// ============================================================================

pub mod app;
pub mod application;
pub mod integrations;

// ============================================================================
// PUBLIC API - Domain
// ============================================================================

pub use domain::{
    distance,
    validate_request,
    validate_resource,
    validate_user,
    Coordinate,
    DomainError,
    Request,
    RequestProgress,
    RequestStatus,
    RequestType,
    Resource,
    ResourceType,
    User,
    UserRole,
};

// ============================================================================
// PUBLIC API - Errors
// ============================================================================

pub use error::{AppError, AppResult};

// ============================================================================
// PUBLIC API - Events
// ============================================================================

pub use events::{
    DomainEvent, EventBus, EventLogEntry, RequestConfirmed, RequestCreated, RequestMatched,
    RequestProgressUpdated, ResourceCreated,
};

// ============================================================================
// PUBLIC API - Database
// ============================================================================

pub use db::{create_connection_pool, initialize_database, ConnectionPool};

// ============================================================================
// PUBLIC API - Repositories
// ============================================================================

pub use repositories::{
    RequestRepository, ReservationOutcome, ReservationStore, ResourceRepository,
    SqliteRequestRepository, SqliteReservationRepository, SqliteResourceRepository,
    SqliteUserRepository, UserRepository,
};

// ============================================================================
// PUBLIC API - Services
// ============================================================================

pub use services::{
    ConfirmationOutcome, ConfirmationService, CreateRequestInput, CreateResourceInput,
    MatchResult, Matcher, NotificationService, RankedResource, RegisterUserInput, RequestService,
    ResourceFilter, ResourcePool, ResourceService, UserService,
};

// ============================================================================
// PUBLIC API - Notifications, auth, startup
// ============================================================================

pub use notifications::{DeliveryReport, LoggingSink, Notification, NotificationQueue, NotificationSink};

pub use auth::{AuthenticationProvider, CredentialAuthenticator, Principal};

pub use app::{AppConfig, MatchPolicy};

pub use application::{AppState, ErrorResponse, ErrorType};
