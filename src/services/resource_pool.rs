// src/services/resource_pool.rs
//
// Read side of resource availability. Every call goes to the store so a
// caller never works from a stale availability flag.

use std::sync::Arc;

use crate::domain::{Coordinate, Resource, ResourceType};
use crate::error::{AppError, AppResult};
use crate::repositories::ResourceRepository;

pub struct ResourcePool {
    resources: Arc<dyn ResourceRepository>,
}

impl ResourcePool {
    pub fn new(resources: Arc<dyn ResourceRepository>) -> Self {
        Self { resources }
    }

    /// Available resources, optionally of one type and within
    /// `within_radius_km` of `around` (inclusive)
    ///
    /// Order is unspecified; callers rank the result themselves.
    pub fn find_available(
        &self,
        resource_type: Option<ResourceType>,
        within_radius_km: Option<f64>,
        around: Coordinate,
    ) -> AppResult<Vec<Resource>> {
        if let Some(radius) = within_radius_km {
            check_radius(radius)?;
        }

        let mut available = self.resources.list_available(resource_type)?;
        if let Some(radius) = within_radius_km {
            available.retain(|r| around.distance_to(&r.location) <= radius);
        }

        Ok(available)
    }
}

pub(crate) fn check_radius(radius_km: f64) -> AppResult<()> {
    if radius_km.is_finite() && radius_km >= 0.0 {
        Ok(())
    } else {
        Err(AppError::InvalidInput(format!(
            "Search radius must be a non-negative number of kilometers, got {}",
            radius_km
        )))
    }
}
