// src/auth/authenticator.rs

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::password::verify_password;
use crate::domain::UserRole;
use crate::error::{AppError, AppResult};
use crate::repositories::UserRepository;

/// Authenticated identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub user_id: Uuid,
    pub email: String,
    pub role: UserRole,
}

pub trait AuthenticationProvider: Send + Sync {
    /// `Unauthenticated` for unknown, disabled, or mismatching credentials
    fn authenticate(&self, email: &str, password: &str) -> AppResult<Principal>;
}

/// Email + password check against the users table
pub struct CredentialAuthenticator {
    users: Arc<dyn UserRepository>,
}

impl CredentialAuthenticator {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }
}

impl AuthenticationProvider for CredentialAuthenticator {
    fn authenticate(&self, email: &str, password: &str) -> AppResult<Principal> {
        let user = match self.users.get_by_email(email.trim())? {
            Some(user) if !user.disabled => user,
            _ => {
                log::warn!("Authentication failed for {}", email);
                return Err(AppError::Unauthenticated);
            }
        };

        if !verify_password(password, &user.password_hash) {
            log::warn!("Authentication failed for {}", email);
            return Err(AppError::Unauthenticated);
        }

        Ok(Principal {
            user_id: user.id,
            email: user.email,
            role: user.role,
        })
    }
}
