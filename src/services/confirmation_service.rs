// src/services/confirmation_service.rs
//
// Confirmation workflow.
//
// Two independent transitions set a request's confirmation flag:
//
//   Open --request_match--> Matched --confirm_by_volunteer--> Confirmed
//   Open --confirm_by_volunteer----------------------------> Confirmed
//
// Selection reads current availability, but only the conditional update in
// the reservation store decides who gets a resource. A lost race means
// selecting again, up to `max_attempts` times.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::{Coordinate, Request, RequestStatus, ResourceType};
use crate::error::{AppError, AppResult};
use crate::events::{EventBus, RequestConfirmed, RequestMatched};
use crate::repositories::{
    RequestRepository, ReservationOutcome, ReservationStore, UserRepository,
};
use crate::services::matcher::{rank_by_distance, Matcher, RankedResource};
use crate::services::resource_pool::ResourcePool;

/// A committed automatic match
#[derive(Debug, Clone, Serialize)]
pub struct MatchResult {
    pub request_id: Uuid,
    pub resource_id: Uuid,
    pub donor_id: Uuid,
    pub resource_location: Coordinate,
    pub distance_km: f64,
}

/// Result of a volunteer confirmation; a repeat is informational, not an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfirmationOutcome {
    Confirmed,
    AlreadyConfirmed,
}

pub struct ConfirmationService {
    request_repo: Arc<dyn RequestRepository>,
    user_repo: Arc<dyn UserRepository>,
    reservations: Arc<dyn ReservationStore>,
    pool: Arc<ResourcePool>,
    matcher: Matcher,
    event_bus: Arc<EventBus>,
    max_attempts: u32,
    default_radius_km: f64,
}

impl ConfirmationService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        request_repo: Arc<dyn RequestRepository>,
        user_repo: Arc<dyn UserRepository>,
        reservations: Arc<dyn ReservationStore>,
        pool: Arc<ResourcePool>,
        matcher: Matcher,
        event_bus: Arc<EventBus>,
        max_attempts: u32,
        default_radius_km: f64,
    ) -> Self {
        Self {
            request_repo,
            user_repo,
            reservations,
            pool,
            matcher,
            event_bus,
            max_attempts: max_attempts.max(1),
            default_radius_km,
        }
    }

    /// Reserve the nearest available resource for an open request
    ///
    /// Both rows change together or not at all. `NoResourceAvailable` when
    /// nothing is left to reserve, including after losing every race.
    pub fn request_match(&self, request_id: Uuid) -> AppResult<MatchResult> {
        for attempt in 1..=self.max_attempts {
            let request = self.load_open_request(request_id)?;

            let Some(candidate) = self.matcher.find_best_match(&request)? else {
                log::info!("No available resource for request {}", request_id);
                return Err(AppError::NoResourceAvailable);
            };
            let resource = &candidate.resource;

            match self.reservations.reserve(request_id, resource.id, Utc::now())? {
                ReservationOutcome::Committed => {
                    log::info!(
                        "Request {} matched to resource {} ({:.3} km)",
                        request_id,
                        resource.id,
                        candidate.distance_km
                    );
                    self.event_bus.emit(RequestMatched::new(
                        request_id,
                        resource.id,
                        resource.user_id,
                        candidate.distance_km,
                    ));
                    return Ok(MatchResult {
                        request_id,
                        resource_id: resource.id,
                        donor_id: resource.user_id,
                        resource_location: resource.location,
                        distance_km: candidate.distance_km,
                    });
                }
                ReservationOutcome::ResourceTaken => {
                    log::warn!(
                        "Resource {} was reserved concurrently (attempt {}/{} for request {})",
                        resource.id,
                        attempt,
                        self.max_attempts,
                        request_id
                    );
                }
                ReservationOutcome::RequestNotOpen => {
                    return Err(not_open(request_id));
                }
            }
        }

        log::warn!(
            "Giving up on request {} after {} contested attempt(s)",
            request_id,
            self.max_attempts
        );
        Err(AppError::NoResourceAvailable)
    }

    /// Assign `volunteer_id` to the request
    ///
    /// Valid from `Open` and `Matched`. Once a volunteer is assigned every
    /// further call returns `AlreadyConfirmed` and changes nothing.
    pub fn confirm_by_volunteer(
        &self,
        request_id: Uuid,
        volunteer_id: Uuid,
    ) -> AppResult<ConfirmationOutcome> {
        let request = self.load_request(request_id)?;

        let volunteer = self
            .user_repo
            .get_by_id(volunteer_id)?
            .ok_or_else(|| AppError::not_found(format!("Volunteer {}", volunteer_id)))?;
        if !volunteer.is_volunteer() {
            return Err(AppError::Unauthorized(format!(
                "User {} is not a volunteer",
                volunteer_id
            )));
        }

        if request.status() == RequestStatus::Confirmed {
            log::info!("Request {} already confirmed; nothing to do", request_id);
            return Ok(ConfirmationOutcome::AlreadyConfirmed);
        }

        if !self
            .request_repo
            .assign_volunteer_if_unassigned(request_id, volunteer_id, Utc::now())?
        {
            log::info!(
                "Request {} was confirmed concurrently; {} not assigned",
                request_id,
                volunteer_id
            );
            return Ok(ConfirmationOutcome::AlreadyConfirmed);
        }

        log::info!("Request {} confirmed by volunteer {}", request_id, volunteer_id);
        self.event_bus
            .emit(RequestConfirmed::new(request_id, volunteer_id));

        Ok(ConfirmationOutcome::Confirmed)
    }

    /// Available resources around the request, nearest first
    ///
    /// `radius_km` defaults to the configured search radius.
    pub fn nearest_resources(
        &self,
        request_id: Uuid,
        radius_km: Option<f64>,
        resource_type: Option<ResourceType>,
    ) -> AppResult<Vec<RankedResource>> {
        let request = self.load_request(request_id)?;
        let radius = radius_km.unwrap_or(self.default_radius_km);

        let available = self
            .pool
            .find_available(resource_type, Some(radius), request.location)?;

        Ok(rank_by_distance(request.location, available))
    }

    fn load_request(&self, request_id: Uuid) -> AppResult<Request> {
        self.request_repo
            .get_by_id(request_id)?
            .ok_or_else(|| AppError::not_found(format!("Request {}", request_id)))
    }

    fn load_open_request(&self, request_id: Uuid) -> AppResult<Request> {
        let request = self.load_request(request_id)?;
        if request.status() != RequestStatus::Open {
            return Err(not_open(request_id));
        }
        Ok(request)
    }
}

fn not_open(request_id: Uuid) -> AppError {
    AppError::not_found(format!("Open request {}", request_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::config::MatchPolicy;
    use crate::db::test_support::{withdraw_resource, TestDatabase};
    use crate::db::ConnectionPool;
    use crate::domain::{RequestType, Resource, User, UserRole};
    use crate::repositories::{
        ResourceRepository, SqliteRequestRepository, SqliteReservationRepository,
        SqliteResourceRepository, SqliteUserRepository,
    };
    use std::sync::Mutex;

    struct Fixture {
        service: Arc<ConfirmationService>,
        requests: Arc<SqliteRequestRepository>,
        resources: Arc<SqliteResourceRepository>,
        bus: Arc<EventBus>,
        owner: User,
        db: TestDatabase,
    }

    fn fixture() -> Fixture {
        let db = TestDatabase::new();
        let owner = db.seed_user("Vic", "vic@example.org", UserRole::User);
        let requests = Arc::new(SqliteRequestRepository::new(db.pool.clone()));
        let resources = Arc::new(SqliteResourceRepository::new(db.pool.clone()));
        let pool = Arc::new(ResourcePool::new(resources.clone()));
        let bus = Arc::new(EventBus::new());

        let service = Arc::new(ConfirmationService::new(
            requests.clone(),
            Arc::new(SqliteUserRepository::new(db.pool.clone())),
            Arc::new(SqliteReservationRepository::new(db.pool.clone())),
            pool.clone(),
            Matcher::new(pool, MatchPolicy::AnyType),
            bus.clone(),
            3,
            50.0,
        ));

        Fixture {
            service,
            requests,
            resources,
            bus,
            owner,
            db,
        }
    }

    impl Fixture {
        fn request_at(&self, lat: f64, lon: f64) -> Request {
            let r = Request::new(
                "Food".to_string(),
                None,
                RequestType::Food,
                Coordinate::new(lat, lon),
                self.owner.id,
            );
            self.requests.save(&r).unwrap();
            r
        }

        fn resource_at(&self, resource_type: ResourceType, lat: f64, lon: f64) -> Resource {
            let r = Resource::new(resource_type, None, Coordinate::new(lat, lon), self.owner.id);
            self.resources.save(&r).unwrap();
            r
        }

        fn reload_request(&self, id: Uuid) -> Request {
            self.requests.get_by_id(id).unwrap().unwrap()
        }

        fn is_available(&self, id: Uuid) -> bool {
            self.resources.get_by_id(id).unwrap().unwrap().is_available
        }
    }

    // ------------------------------------------------------------------
    // request_match
    // ------------------------------------------------------------------

    #[test]
    fn test_match_reserves_nearest_and_nothing_else() {
        let f = fixture();
        let request = f.request_at(40.0, -75.0);
        let near = f.resource_at(ResourceType::Food, 40.0, -75.01);
        let far = f.resource_at(ResourceType::Food, 41.0, -75.0);

        let result = f.service.request_match(request.id).unwrap();

        assert_eq!(result.resource_id, near.id);
        assert_eq!(result.donor_id, f.owner.id);
        assert_eq!(result.resource_location, near.location);
        assert!((result.distance_km - 0.852).abs() < 0.01);

        let request = f.reload_request(request.id);
        assert!(request.is_confirmed);
        assert_eq!(request.status(), RequestStatus::Matched);
        assert_eq!(request.matched_resource_id, Some(near.id));
        assert!(!f.is_available(near.id));
        assert!(f.is_available(far.id));

        let log = f.bus.get_event_log();
        assert_eq!(log.last().unwrap().event_type, "RequestMatched");
    }

    #[test]
    fn test_match_without_resources_changes_nothing() {
        let f = fixture();
        let request = f.request_at(40.0, -75.0);

        assert!(matches!(
            f.service.request_match(request.id),
            Err(AppError::NoResourceAvailable)
        ));
        assert_eq!(f.reload_request(request.id).status(), RequestStatus::Open);
    }

    #[test]
    fn test_match_requires_open_request() {
        let f = fixture();
        let request = f.request_at(40.0, -75.0);
        f.resource_at(ResourceType::Food, 40.0, -75.0);
        f.resource_at(ResourceType::Food, 40.0, -75.0);

        f.service.request_match(request.id).unwrap();
        assert!(matches!(
            f.service.request_match(request.id),
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            f.service.request_match(Uuid::new_v4()),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_concurrent_matches_never_double_book() {
        const CALLERS: usize = 6;
        let f = fixture();
        let resource = f.resource_at(ResourceType::Food, 40.0, -75.0);
        let requests: Vec<Request> = (0..CALLERS).map(|_| f.request_at(40.0, -75.0)).collect();

        let results: Vec<AppResult<MatchResult>> = std::thread::scope(|scope| {
            let handles: Vec<_> = requests
                .iter()
                .map(|r| {
                    let service = Arc::clone(&f.service);
                    let id = r.id;
                    scope.spawn(move || service.request_match(id))
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        let winners: Vec<&MatchResult> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
        assert_eq!(winners.len(), 1);
        assert_eq!(winners[0].resource_id, resource.id);
        assert!(results
            .iter()
            .filter(|r| r.is_err())
            .all(|r| matches!(r, Err(AppError::NoResourceAvailable))));

        let confirmed = requests
            .iter()
            .filter(|r| f.reload_request(r.id).is_confirmed)
            .count();
        assert_eq!(confirmed, 1);
        assert!(!f.is_available(resource.id));
    }

    /// Loses the first reservation race, then behaves like the real store
    struct ContestedStore {
        inner: SqliteReservationRepository,
        db_pool: Arc<ConnectionPool>,
        calls: Mutex<u32>,
    }

    impl ReservationStore for ContestedStore {
        fn reserve(
            &self,
            request_id: Uuid,
            resource_id: Uuid,
            at: chrono::DateTime<Utc>,
        ) -> AppResult<ReservationOutcome> {
            let mut calls = self.calls.lock().unwrap();
            *calls += 1;
            if *calls == 1 {
                // Someone else takes the selected resource first
                withdraw_resource(&self.db_pool, resource_id);
                return Ok(ReservationOutcome::ResourceTaken);
            }
            self.inner.reserve(request_id, resource_id, at)
        }
    }

    impl Fixture {
        /// Same database, but the first reservation attempt always loses
        fn contested_service(&self, max_attempts: u32) -> (ConfirmationService, Arc<ContestedStore>) {
            let contested = Arc::new(ContestedStore {
                inner: SqliteReservationRepository::new(self.db.pool.clone()),
                db_pool: self.db.pool.clone(),
                calls: Mutex::new(0),
            });
            let pool = Arc::new(ResourcePool::new(self.resources.clone()));
            let service = ConfirmationService::new(
                self.requests.clone(),
                Arc::new(SqliteUserRepository::new(self.db.pool.clone())),
                contested.clone(),
                pool.clone(),
                Matcher::new(pool, MatchPolicy::AnyType),
                self.bus.clone(),
                max_attempts,
                50.0,
            );
            (service, contested)
        }
    }

    #[test]
    fn test_lost_race_selects_next_nearest() {
        let f = fixture();
        let request = f.request_at(40.0, -75.0);
        let nearest = f.resource_at(ResourceType::Food, 40.0, -75.001);
        let second = f.resource_at(ResourceType::Food, 40.0, -75.1);

        let (service, contested) = f.contested_service(3);

        let result = service.request_match(request.id).unwrap();
        assert_eq!(result.resource_id, second.id);
        assert_eq!(*contested.calls.lock().unwrap(), 2);
        assert!(!f.is_available(nearest.id));
    }

    #[test]
    fn test_exhausted_attempts_report_no_resource() {
        let f = fixture();
        let request = f.request_at(40.0, -75.0);
        f.resource_at(ResourceType::Food, 40.0, -75.0);

        let (service, _) = f.contested_service(1);

        assert!(matches!(
            service.request_match(request.id),
            Err(AppError::NoResourceAvailable)
        ));
        assert_eq!(f.reload_request(request.id).status(), RequestStatus::Open);
    }

    // ------------------------------------------------------------------
    // confirm_by_volunteer
    // ------------------------------------------------------------------

    #[test]
    fn test_confirm_open_request() {
        let f = fixture();
        let volunteer = f.db.seed_user("Val", "val@example.org", UserRole::Volunteer);
        let request = f.request_at(40.0, -75.0);

        let outcome = f.service.confirm_by_volunteer(request.id, volunteer.id).unwrap();
        assert_eq!(outcome, ConfirmationOutcome::Confirmed);

        let request = f.reload_request(request.id);
        assert_eq!(request.status(), RequestStatus::Confirmed);
        assert_eq!(request.volunteer_id, Some(volunteer.id));
        assert_eq!(f.bus.get_event_log().last().unwrap().event_type, "RequestConfirmed");
    }

    #[test]
    fn test_confirm_matched_request_keeps_reservation() {
        let f = fixture();
        let volunteer = f.db.seed_user("Val", "val@example.org", UserRole::Volunteer);
        let request = f.request_at(40.0, -75.0);
        let resource = f.resource_at(ResourceType::Food, 40.0, -75.0);

        f.service.request_match(request.id).unwrap();
        let outcome = f.service.confirm_by_volunteer(request.id, volunteer.id).unwrap();
        assert_eq!(outcome, ConfirmationOutcome::Confirmed);

        let request = f.reload_request(request.id);
        assert_eq!(request.status(), RequestStatus::Confirmed);
        assert_eq!(request.matched_resource_id, Some(resource.id));
    }

    #[test]
    fn test_confirm_is_idempotent() {
        let f = fixture();
        let first = f.db.seed_user("Val", "val@example.org", UserRole::Volunteer);
        let second = f.db.seed_user("Max", "max@example.org", UserRole::Volunteer);
        let request = f.request_at(40.0, -75.0);

        f.service.confirm_by_volunteer(request.id, first.id).unwrap();
        let events_after_first = f.bus.get_event_log().len();

        for volunteer in [&first, &second] {
            assert_eq!(
                f.service.confirm_by_volunteer(request.id, volunteer.id).unwrap(),
                ConfirmationOutcome::AlreadyConfirmed
            );
        }

        assert_eq!(f.reload_request(request.id).volunteer_id, Some(first.id));
        assert_eq!(f.bus.get_event_log().len(), events_after_first);
    }

    #[test]
    fn test_confirm_requires_volunteer_role() {
        let f = fixture();
        let request = f.request_at(40.0, -75.0);

        assert!(matches!(
            f.service.confirm_by_volunteer(request.id, f.owner.id),
            Err(AppError::Unauthorized(_))
        ));
        assert!(matches!(
            f.service.confirm_by_volunteer(request.id, Uuid::new_v4()),
            Err(AppError::NotFound(_))
        ));
        assert_eq!(f.reload_request(request.id).status(), RequestStatus::Open);
    }

    #[test]
    fn test_confirm_unknown_request() {
        let f = fixture();
        let volunteer = f.db.seed_user("Val", "val@example.org", UserRole::Volunteer);
        assert!(matches!(
            f.service.confirm_by_volunteer(Uuid::new_v4(), volunteer.id),
            Err(AppError::NotFound(_))
        ));
    }

    // ------------------------------------------------------------------
    // nearest_resources
    // ------------------------------------------------------------------

    #[test]
    fn test_nearest_within_radius() {
        let f = fixture();
        let request = f.request_at(40.0, -75.0);
        let r1 = f.resource_at(ResourceType::Food, 40.0, -75.01);
        f.resource_at(ResourceType::Food, 41.0, -75.0);

        let nearest = f.service.nearest_resources(request.id, Some(50.0), None).unwrap();
        assert_eq!(nearest.len(), 1);
        assert_eq!(nearest[0].resource.id, r1.id);
        assert!((nearest[0].distance_km - 0.85).abs() < 0.01);
    }

    #[test]
    fn test_nearest_sorted_and_type_filtered() {
        let f = fixture();
        let request = f.request_at(40.0, -75.0);
        let far = f.resource_at(ResourceType::Water, 40.2, -75.0);
        let near = f.resource_at(ResourceType::Water, 40.1, -75.0);
        f.resource_at(ResourceType::Medical, 40.0, -75.0);

        let nearest = f
            .service
            .nearest_resources(request.id, None, Some(ResourceType::Water))
            .unwrap();
        let ids: Vec<Uuid> = nearest.iter().map(|r| r.resource.id).collect();
        assert_eq!(ids, vec![near.id, far.id]);
    }

    #[test]
    fn test_nearest_errors() {
        let f = fixture();
        let request = f.request_at(40.0, -75.0);
        assert!(matches!(
            f.service.nearest_resources(Uuid::new_v4(), None, None),
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            f.service.nearest_resources(request.id, Some(-5.0), None),
            Err(AppError::InvalidInput(_))
        ));
    }
}
