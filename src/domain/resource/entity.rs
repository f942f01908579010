use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::domain::location::Coordinate;
use crate::domain::request::RequestType;
use crate::domain::DomainError;

/// Aid offered by a donor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    /// Internal immutable identifier
    pub id: Uuid,

    pub resource_type: ResourceType,

    pub description: Option<String>,

    pub location: Coordinate,

    /// False exactly when the resource is reserved by some request
    pub is_available: bool,

    /// Donor (REQUIRED)
    pub user_id: Uuid,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    Water,
    Clothes,
    Food,
    Medical,
    Shelter,
}

impl Resource {
    pub fn new(
        resource_type: ResourceType,
        description: Option<String>,
        location: Coordinate,
        user_id: Uuid,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            resource_type,
            description,
            location,
            is_available: true,
            user_id,
            created_at: Utc::now(),
        }
    }
}

impl ResourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Water => "water",
            ResourceType::Clothes => "clothes",
            ResourceType::Food => "food",
            ResourceType::Medical => "medical",
            ResourceType::Shelter => "shelter",
        }
    }

    /// Resource type sharing the request type's name
    pub fn same_as(request_type: RequestType) -> Self {
        match request_type {
            RequestType::Food => ResourceType::Food,
            RequestType::Medical => ResourceType::Medical,
            RequestType::Shelter => ResourceType::Shelter,
        }
    }
}

impl std::fmt::Display for ResourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "water" => Ok(ResourceType::Water),
            "clothes" => Ok(ResourceType::Clothes),
            "food" => Ok(ResourceType::Food),
            "medical" => Ok(ResourceType::Medical),
            "shelter" => Ok(ResourceType::Shelter),
            other => Err(DomainError::InvalidValue(format!(
                "Unsupported resource type: {}",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_resource_is_available() {
        let resource = Resource::new(
            ResourceType::Water,
            None,
            Coordinate::new(1.0, 2.0),
            Uuid::new_v4(),
        );
        assert!(resource.is_available);
    }

    #[test]
    fn test_type_round_trips_through_display() {
        for t in [
            ResourceType::Water,
            ResourceType::Clothes,
            ResourceType::Food,
            ResourceType::Medical,
            ResourceType::Shelter,
        ] {
            assert_eq!(t.to_string().parse::<ResourceType>().unwrap(), t);
        }
    }

    #[test]
    fn test_unknown_type_is_invalid_value() {
        assert!(matches!(
            "blankets".parse::<ResourceType>(),
            Err(DomainError::InvalidValue(_))
        ));
    }

    #[test]
    fn test_same_as_request_type() {
        assert_eq!(ResourceType::same_as(RequestType::Shelter), ResourceType::Shelter);
    }
}
