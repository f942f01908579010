use super::entity::Request;
use crate::domain::{DomainError, DomainResult};

/// Validates all Request invariants
pub fn validate_request(request: &Request) -> DomainResult<()> {
    validate_title(&request.title)?;
    validate_location(request)?;
    validate_assignment(request)?;
    Ok(())
}

fn validate_title(title: &str) -> DomainResult<()> {
    if title.trim().is_empty() {
        return Err(DomainError::InvariantViolation(
            "Request title cannot be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_location(request: &Request) -> DomainResult<()> {
    if !request.location.is_valid() {
        return Err(DomainError::InvalidValue(format!(
            "Request location out of range: {}",
            request.location
        )));
    }
    Ok(())
}

/// Confirmation implies assignment, and assignment implies confirmation
fn validate_assignment(request: &Request) -> DomainResult<()> {
    let assigned = request.volunteer_id.is_some() || request.matched_resource_id.is_some();

    if request.is_confirmed && !assigned {
        return Err(DomainError::InvariantViolation(format!(
            "Request {} is confirmed without a volunteer or resource",
            request.id
        )));
    }
    if !request.is_confirmed && assigned {
        return Err(DomainError::InvariantViolation(format!(
            "Request {} has an assignment but is not confirmed",
            request.id
        )));
    }
    Ok(())
}

/// Invariants that must hold true for Request domain:
///
/// 1. Title cannot be empty
/// 2. Location is a valid coordinate
/// 3. volunteer_id set => is_confirmed
/// 4. is_confirmed => volunteer_id or matched_resource_id set
/// 5. Requests are never physically deleted
