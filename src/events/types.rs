// src/events/types.rs
//
// All domain events in the system.
// Each event represents an immutable fact that has already occurred.
//
// CRITICAL RULES:
// - Events are facts, not commands
// - Events are immutable
// - Events carry only the data needed to react
// - No business logic in event types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::Coordinate;

/// Trait that all domain events must implement
pub trait DomainEvent: std::fmt::Debug + Clone {
    /// Unique identifier for this event instance
    fn event_id(&self) -> Uuid;

    /// When this event occurred
    fn occurred_at(&self) -> DateTime<Utc>;

    /// Human-readable event type name
    fn event_type(&self) -> &'static str;
}

macro_rules! impl_domain_event {
    ($name:ident) => {
        impl DomainEvent for $name {
            fn event_id(&self) -> Uuid {
                self.event_id
            }
            fn occurred_at(&self) -> DateTime<Utc> {
                self.occurred_at
            }
            fn event_type(&self) -> &'static str {
                stringify!($name)
            }
        }
    };
}

// ============================================================================
// REQUEST EVENTS
// ============================================================================

/// Emitted after a new request is persisted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestCreated {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub request_id: Uuid,
    pub user_id: Uuid,
}

impl RequestCreated {
    pub fn new(request_id: Uuid, user_id: Uuid) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            request_id,
            user_id,
        }
    }
}

impl_domain_event!(RequestCreated);

/// Emitted after automatic matching reserved a resource for a request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestMatched {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub request_id: Uuid,
    pub resource_id: Uuid,
    pub donor_id: Uuid,
    pub distance_km: f64,
}

impl RequestMatched {
    pub fn new(request_id: Uuid, resource_id: Uuid, donor_id: Uuid, distance_km: f64) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            request_id,
            resource_id,
            donor_id,
            distance_km,
        }
    }
}

impl_domain_event!(RequestMatched);

/// Emitted after a volunteer confirmation is committed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestConfirmed {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub request_id: Uuid,
    pub volunteer_id: Uuid,
}

impl RequestConfirmed {
    pub fn new(request_id: Uuid, volunteer_id: Uuid) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            request_id,
            volunteer_id,
        }
    }
}

impl_domain_event!(RequestConfirmed);

/// Emitted when field progress of a request changes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestProgressUpdated {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub request_id: Uuid,
    pub progress: String,
}

impl RequestProgressUpdated {
    pub fn new(request_id: Uuid, progress: String) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            request_id,
            progress,
        }
    }
}

impl_domain_event!(RequestProgressUpdated);

// ============================================================================
// RESOURCE EVENTS
// ============================================================================

/// Emitted after a donor registers a resource
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceCreated {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub resource_id: Uuid,
    pub resource_type: String,
    pub location: Coordinate,
}

impl ResourceCreated {
    pub fn new(resource_id: Uuid, resource_type: String, location: Coordinate) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            resource_id,
            resource_type,
            location,
        }
    }
}

impl_domain_event!(ResourceCreated);
