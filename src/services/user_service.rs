// src/services/user_service.rs
use std::sync::Arc;

use uuid::Uuid;

use crate::auth::hash_password;
use crate::domain::{validate_user, User, UserRole};
use crate::error::{AppError, AppResult};
use crate::repositories::UserRepository;

#[derive(Debug, Clone)]
pub struct RegisterUserInput {
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub mobile_number: String,
    /// `user` or `volunteer`; administrators are never self-registered
    pub role: String,
    pub password: String,
}

pub struct UserService {
    user_repo: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(user_repo: Arc<dyn UserRepository>) -> Self {
        Self { user_repo }
    }

    pub fn register(&self, input: RegisterUserInput) -> AppResult<User> {
        let role: UserRole = input.role.parse()?;
        if role == UserRole::Admin {
            return Err(AppError::InvalidInput(
                "Role admin cannot be chosen at registration".to_string(),
            ));
        }
        if input.password.is_empty() {
            return Err(AppError::InvalidInput("Password cannot be empty".to_string()));
        }

        let email = input.email.trim().to_string();
        if self.user_repo.get_by_email(&email)?.is_some() {
            return Err(AppError::InvalidInput(format!(
                "Email already registered: {}",
                email
            )));
        }

        let user = User::new(
            input.firstname.trim().to_string(),
            input.lastname.trim().to_string(),
            email,
            input.mobile_number.trim().to_string(),
            role,
            hash_password(&input.password)?,
        );
        validate_user(&user)?;
        self.user_repo.save(&user)?;

        log::info!("Registered {} {} as {}", user.id, user.email, user.role);
        Ok(user)
    }

    pub fn get_user(&self, user_id: Uuid) -> AppResult<User> {
        self.user_repo
            .get_by_id(user_id)?
            .ok_or_else(|| AppError::not_found(format!("User {}", user_id)))
    }
}
