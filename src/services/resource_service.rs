// src/services/resource_service.rs
use std::sync::Arc;

use uuid::Uuid;

use crate::auth::Principal;
use crate::domain::{validate_resource, Coordinate, Resource, ResourceType};
use crate::error::{AppError, AppResult};
use crate::events::{EventBus, ResourceCreated};
use crate::repositories::{ResourceRepository, UserRepository};
use crate::services::resource_pool::check_radius;

#[derive(Debug, Clone)]
pub struct CreateResourceInput {
    pub resource_type: ResourceType,
    pub description: Option<String>,
    pub location: Coordinate,
}

/// Optional narrowing for `list_resources`
#[derive(Debug, Clone, Copy, Default)]
pub struct ResourceFilter {
    pub resource_type: Option<ResourceType>,
    /// Center and radius in kilometers
    pub near: Option<(Coordinate, f64)>,
}

pub struct ResourceService {
    resource_repo: Arc<dyn ResourceRepository>,
    user_repo: Arc<dyn UserRepository>,
    event_bus: Arc<EventBus>,
}

impl ResourceService {
    pub fn new(
        resource_repo: Arc<dyn ResourceRepository>,
        user_repo: Arc<dyn UserRepository>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            resource_repo,
            user_repo,
            event_bus,
        }
    }

    /// Register an available resource donated by `principal`
    pub fn create_resource(
        &self,
        principal: &Principal,
        input: CreateResourceInput,
    ) -> AppResult<Resource> {
        if self.user_repo.get_by_id(principal.user_id)?.is_none() {
            return Err(AppError::Unauthenticated);
        }

        let resource = Resource::new(
            input.resource_type,
            input.description,
            input.location,
            principal.user_id,
        );
        validate_resource(&resource)?;
        self.resource_repo.save(&resource)?;

        log::info!(
            "Resource {} ({}) offered by {} at {}",
            resource.id,
            resource.resource_type,
            principal.user_id,
            resource.location
        );
        self.event_bus.emit(ResourceCreated::new(
            resource.id,
            resource.resource_type.as_str().to_string(),
            resource.location,
        ));

        Ok(resource)
    }

    pub fn get_resource(&self, resource_id: Uuid) -> AppResult<Resource> {
        self.resource_repo
            .get_by_id(resource_id)?
            .ok_or_else(|| AppError::not_found(format!("Resource {}", resource_id)))
    }

    /// All resources, reserved ones included
    pub fn list_resources(&self, filter: ResourceFilter) -> AppResult<Vec<Resource>> {
        let mut resources = self.resource_repo.list(filter.resource_type)?;

        if let Some((center, radius)) = filter.near {
            check_radius(radius)?;
            resources.retain(|r| center.distance_to(&r.location) <= radius);
        }

        Ok(resources)
    }
}
