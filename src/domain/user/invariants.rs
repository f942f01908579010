use std::sync::OnceLock;

use regex::Regex;

use super::entity::User;
use crate::domain::{DomainError, DomainResult};

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern compiles")
    })
}

/// Validates all User invariants
pub fn validate_user(user: &User) -> DomainResult<()> {
    if user.firstname.trim().is_empty() {
        return Err(DomainError::InvalidValue(
            "First name cannot be empty".to_string(),
        ));
    }
    validate_email(&user.email)?;
    Ok(())
}

pub fn validate_email(email: &str) -> DomainResult<()> {
    if !email_pattern().is_match(email) {
        return Err(DomainError::InvalidValue(format!(
            "Invalid email address: {}",
            email
        )));
    }
    Ok(())
}
