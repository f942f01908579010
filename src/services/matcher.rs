// src/services/matcher.rs
//
// Nearest-resource selection.
//
// Candidates are ranked by great-circle distance, ties broken by resource id
// so the outcome is deterministic. Selection has no side effects; the
// confirmation workflow reserves the winner.

use std::sync::Arc;

use serde::Serialize;

use crate::app::config::MatchPolicy;
use crate::domain::{Coordinate, Request, Resource};
use crate::error::AppResult;
use crate::services::resource_pool::ResourcePool;

/// A resource together with its distance from the point of interest
#[derive(Debug, Clone, Serialize)]
pub struct RankedResource {
    pub resource: Resource,
    pub distance_km: f64,
}

/// Order `resources` by distance from `around`, then by id
pub fn rank_by_distance(around: Coordinate, resources: Vec<Resource>) -> Vec<RankedResource> {
    let mut ranked: Vec<RankedResource> = resources
        .into_iter()
        .map(|resource| RankedResource {
            distance_km: around.distance_to(&resource.location),
            resource,
        })
        .collect();

    ranked.sort_by(|a, b| {
        a.distance_km
            .total_cmp(&b.distance_km)
            .then_with(|| a.resource.id.cmp(&b.resource.id))
    });

    ranked
}

pub struct Matcher {
    pool: Arc<ResourcePool>,
    policy: MatchPolicy,
}

impl Matcher {
    pub fn new(pool: Arc<ResourcePool>, policy: MatchPolicy) -> Self {
        Self { pool, policy }
    }

    /// Closest available resource for `request`, or `None` when the pool is
    /// empty after the policy's type filter
    pub fn find_best_match(&self, request: &Request) -> AppResult<Option<RankedResource>> {
        let type_filter = self.policy.resource_filter(request.request_type);
        let candidates = self.pool.find_available(type_filter, None, request.location)?;

        log::debug!(
            "Matching request {}: {} candidate(s) under {:?}",
            request.id,
            candidates.len(),
            self.policy
        );

        Ok(rank_by_distance(request.location, candidates).into_iter().next())
    }
}
