// src/services/mod.rs
//
// Services Module - Orchestration Layer
//
// Services own validation, state transitions, and event emission.
// Repositories stay dumb; notification delivery happens off the caller's path.

pub mod confirmation_service;
pub mod matcher;
pub mod notification_service;
pub mod request_service;
pub mod resource_pool;
pub mod resource_service;
pub mod user_service;

pub use confirmation_service::{ConfirmationOutcome, ConfirmationService, MatchResult};

pub use matcher::{rank_by_distance, Matcher, RankedResource};

pub use notification_service::NotificationService;

pub use request_service::{CreateRequestInput, RequestService};

pub use resource_pool::ResourcePool;

pub use resource_service::{CreateResourceInput, ResourceFilter, ResourceService};

pub use user_service::{RegisterUserInput, UserService};
