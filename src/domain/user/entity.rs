use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::domain::DomainError;

/// A registered person: requester, donor, or volunteer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub mobile_number: String,
    pub role: UserRole,

    /// Argon2id PHC string, never serialized
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    pub disabled: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    User,
    Volunteer,
    Admin,
}

impl User {
    pub fn new(
        firstname: String,
        lastname: String,
        email: String,
        mobile_number: String,
        role: UserRole,
        password_hash: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            firstname,
            lastname,
            email,
            mobile_number,
            role,
            password_hash,
            disabled: false,
            created_at: Utc::now(),
        }
    }

    pub fn is_volunteer(&self) -> bool {
        self.role == UserRole::Volunteer
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.firstname, self.lastname).trim().to_string()
    }
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => "user",
            UserRole::Volunteer => "volunteer",
            UserRole::Admin => "admin",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" => Ok(UserRole::User),
            "volunteer" => Ok(UserRole::Volunteer),
            "admin" => Ok(UserRole::Admin),
            other => Err(DomainError::InvalidValue(format!("Unsupported role: {}", other))),
        }
    }
}
