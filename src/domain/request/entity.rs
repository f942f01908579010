use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::domain::location::Coordinate;
use crate::domain::DomainError;

/// A victim's ask for aid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    /// Internal immutable identifier
    pub id: Uuid,

    pub title: String,

    pub description: Option<String>,

    /// Kind of aid needed
    pub request_type: RequestType,

    /// Where the aid is needed
    pub location: Coordinate,

    /// Set by automatic matching or by a volunteer confirmation
    pub is_confirmed: bool,

    /// Requesting user (REQUIRED)
    pub user_id: Uuid,

    /// Volunteer who confirmed the request
    pub volunteer_id: Option<Uuid>,

    /// Resource reserved by automatic matching
    pub matched_resource_id: Option<Uuid>,

    /// Fulfilment progress reported by field staff
    pub progress: RequestProgress,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestType {
    Food,
    Medical,
    Shelter,
}

/// Position of a request in the confirmation workflow
///
/// Derived from the stored flags, never persisted on its own:
/// - `Open`: unconfirmed, nothing assigned
/// - `Matched`: a resource was reserved automatically, no volunteer yet
/// - `Confirmed`: a volunteer took the request (terminal)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Open,
    Matched,
    Confirmed,
}

/// Field progress, independent of the confirmation workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RequestProgress {
    Pending,
    InProgress,
    Resolved,
}

impl Request {
    /// Create a new, open Request owned by `user_id`
    pub fn new(
        title: String,
        description: Option<String>,
        request_type: RequestType,
        location: Coordinate,
        user_id: Uuid,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title,
            description,
            request_type,
            location,
            is_confirmed: false,
            user_id,
            volunteer_id: None,
            matched_resource_id: None,
            progress: RequestProgress::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn status(&self) -> RequestStatus {
        if self.volunteer_id.is_some() {
            RequestStatus::Confirmed
        } else if self.is_confirmed {
            RequestStatus::Matched
        } else {
            RequestStatus::Open
        }
    }

    /// Record an automatic match against `resource_id`
    ///
    /// Only valid from `Open`.
    pub fn mark_matched(&mut self, resource_id: Uuid) -> Result<(), DomainError> {
        if self.status() != RequestStatus::Open {
            return Err(DomainError::InvalidStateTransition(format!(
                "Request {} cannot be matched from {:?}",
                self.id,
                self.status()
            )));
        }
        self.is_confirmed = true;
        self.matched_resource_id = Some(resource_id);
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Assign a volunteer, moving the request to `Confirmed`
    ///
    /// Valid from `Open` and `Matched`.
    pub fn assign_volunteer(&mut self, volunteer_id: Uuid) -> Result<(), DomainError> {
        if self.status() == RequestStatus::Confirmed {
            return Err(DomainError::InvalidStateTransition(format!(
                "Request {} already has a volunteer",
                self.id
            )));
        }
        self.is_confirmed = true;
        self.volunteer_id = Some(volunteer_id);
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn set_progress(&mut self, progress: RequestProgress) {
        self.progress = progress;
        self.updated_at = Utc::now();
    }
}

impl RequestType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestType::Food => "food",
            RequestType::Medical => "medical",
            RequestType::Shelter => "shelter",
        }
    }
}

impl std::fmt::Display for RequestType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "food" => Ok(RequestType::Food),
            "medical" => Ok(RequestType::Medical),
            "shelter" => Ok(RequestType::Shelter),
            other => Err(DomainError::InvalidValue(format!(
                "Unsupported request type: {}",
                other
            ))),
        }
    }
}

impl RequestProgress {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestProgress::Pending => "pending",
            RequestProgress::InProgress => "in-progress",
            RequestProgress::Resolved => "resolved",
        }
    }
}

impl std::fmt::Display for RequestProgress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestProgress {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "pending" => Ok(RequestProgress::Pending),
            "in-progress" => Ok(RequestProgress::InProgress),
            "resolved" => Ok(RequestProgress::Resolved),
            other => Err(DomainError::InvalidValue(format!(
                "Unsupported request status: {}",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_request() -> Request {
        Request::new(
            "Water needed".to_string(),
            None,
            RequestType::Food,
            Coordinate::new(40.0, -75.0),
            Uuid::new_v4(),
        )
    }

    #[test]
    fn test_new_request_is_open() {
        let request = open_request();
        assert_eq!(request.status(), RequestStatus::Open);
        assert!(!request.is_confirmed);
        assert_eq!(request.progress, RequestProgress::Pending);
    }

    #[test]
    fn test_match_then_volunteer_reaches_confirmed() {
        let mut request = open_request();
        let resource_id = Uuid::new_v4();

        request.mark_matched(resource_id).unwrap();
        assert_eq!(request.status(), RequestStatus::Matched);
        assert_eq!(request.matched_resource_id, Some(resource_id));

        request.assign_volunteer(Uuid::new_v4()).unwrap();
        assert_eq!(request.status(), RequestStatus::Confirmed);
    }

    #[test]
    fn test_matched_request_cannot_be_matched_again() {
        let mut request = open_request();
        request.mark_matched(Uuid::new_v4()).unwrap();
        assert!(matches!(
            request.mark_matched(Uuid::new_v4()),
            Err(DomainError::InvalidStateTransition(_))
        ));
    }

    #[test]
    fn test_confirmed_request_rejects_second_volunteer() {
        let mut request = open_request();
        request.assign_volunteer(Uuid::new_v4()).unwrap();
        assert!(request.assign_volunteer(Uuid::new_v4()).is_err());
    }

    #[test]
    fn test_type_parsing() {
        assert_eq!("Medical".parse::<RequestType>().unwrap(), RequestType::Medical);
        assert!(matches!(
            "water".parse::<RequestType>(),
            Err(DomainError::InvalidValue(_))
        ));
    }

    #[test]
    fn test_progress_parsing() {
        assert_eq!(
            "in-progress".parse::<RequestProgress>().unwrap(),
            RequestProgress::InProgress
        );
        assert!("done".parse::<RequestProgress>().is_err());
    }
}
