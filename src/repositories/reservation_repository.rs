// src/repositories/reservation_repository.rs
//
// Atomic match commit: reserve a resource and confirm a request together.
//
// Both rows are updated conditionally inside one IMMEDIATE transaction.
// The availability flag is only cleared if it is still set, so two
// concurrent matches can never reserve the same resource.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rusqlite::{params, TransactionBehavior};
use uuid::Uuid;

use crate::db::ConnectionPool;
use crate::error::AppResult;

/// Result of a reservation attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservationOutcome {
    /// Both rows updated
    Committed,
    /// Another operation reserved the resource first; nothing changed
    ResourceTaken,
    /// The request is no longer open; nothing changed
    RequestNotOpen,
}

pub trait ReservationStore: Send + Sync {
    fn reserve(
        &self,
        request_id: Uuid,
        resource_id: Uuid,
        at: DateTime<Utc>,
    ) -> AppResult<ReservationOutcome>;
}

pub struct SqliteReservationRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteReservationRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }
}

impl ReservationStore for SqliteReservationRepository {
    fn reserve(
        &self,
        request_id: Uuid,
        resource_id: Uuid,
        at: DateTime<Utc>,
    ) -> AppResult<ReservationOutcome> {
        let mut conn = self.pool.get()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let resource_rows = tx.execute(
            "UPDATE resources SET is_available = 0 WHERE id = ?1 AND is_available = 1",
            params![resource_id.to_string()],
        )?;
        if resource_rows != 1 {
            tx.rollback()?;
            return Ok(ReservationOutcome::ResourceTaken);
        }

        let request_rows = tx.execute(
            "UPDATE requests
             SET is_confirmed = 1, matched_resource_id = ?1, updated_at = ?2
             WHERE id = ?3 AND is_confirmed = 0",
            params![resource_id.to_string(), at.to_rfc3339(), request_id.to_string()],
        )?;
        if request_rows != 1 {
            tx.rollback()?;
            return Ok(ReservationOutcome::RequestNotOpen);
        }

        tx.commit()?;
        Ok(ReservationOutcome::Committed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::TestDatabase;
    use crate::domain::{Coordinate, Request, RequestType, Resource, ResourceType, UserRole};
    use crate::repositories::{
        RequestRepository, ResourceRepository, SqliteRequestRepository, SqliteResourceRepository,
    };

    struct Fixture {
        requests: SqliteRequestRepository,
        resources: SqliteResourceRepository,
        store: SqliteReservationRepository,
        owner: Uuid,
        _db: TestDatabase,
    }

    fn fixture() -> Fixture {
        let db = TestDatabase::new();
        let owner = db.seed_user("Owner", "owner@example.org", UserRole::User).id;
        Fixture {
            requests: SqliteRequestRepository::new(db.pool.clone()),
            resources: SqliteResourceRepository::new(db.pool.clone()),
            store: SqliteReservationRepository::new(db.pool.clone()),
            owner,
            _db: db,
        }
    }

    impl Fixture {
        fn open_request(&self) -> Request {
            let r = Request::new(
                "Food".to_string(),
                None,
                RequestType::Food,
                Coordinate::new(1.0, 1.0),
                self.owner,
            );
            self.requests.save(&r).unwrap();
            r
        }

        fn resource(&self) -> Resource {
            let r = Resource::new(ResourceType::Food, None, Coordinate::new(1.0, 1.0), self.owner);
            self.resources.save(&r).unwrap();
            r
        }
    }

    #[test]
    fn test_reserve_updates_both_rows() {
        let f = fixture();
        let request = f.open_request();
        let resource = f.resource();

        let outcome = f.store.reserve(request.id, resource.id, Utc::now()).unwrap();
        assert_eq!(outcome, ReservationOutcome::Committed);

        let request = f.requests.get_by_id(request.id).unwrap().unwrap();
        assert!(request.is_confirmed);
        assert_eq!(request.matched_resource_id, Some(resource.id));
        assert!(!f.resources.get_by_id(resource.id).unwrap().unwrap().is_available);
    }

    #[test]
    fn test_taken_resource_leaves_request_open() {
        let f = fixture();
        let first = f.open_request();
        let second = f.open_request();
        let resource = f.resource();

        f.store.reserve(first.id, resource.id, Utc::now()).unwrap();
        let outcome = f.store.reserve(second.id, resource.id, Utc::now()).unwrap();

        assert_eq!(outcome, ReservationOutcome::ResourceTaken);
        assert!(!f.requests.get_by_id(second.id).unwrap().unwrap().is_confirmed);
    }

    #[test]
    fn test_confirmed_request_rolls_back_resource() {
        let f = fixture();
        let request = f.open_request();
        let first = f.resource();
        let second = f.resource();

        f.store.reserve(request.id, first.id, Utc::now()).unwrap();
        let outcome = f.store.reserve(request.id, second.id, Utc::now()).unwrap();

        assert_eq!(outcome, ReservationOutcome::RequestNotOpen);
        // Rolled back: the second resource is still available
        assert!(f.resources.get_by_id(second.id).unwrap().unwrap().is_available);
    }
}
