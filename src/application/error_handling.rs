// src/application/error_handling.rs
//
// Maps internal errors to stable categories for whatever transport sits
// on top. Internal details (SQL, pool, IO) are logged, never returned.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error_type: ErrorType,
    pub message: String,
    pub details: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// Unknown request, resource, or user (404)
    NotFound,

    /// Missing or bad credentials (401)
    Unauthenticated,

    /// Authenticated but wrong role (403)
    Unauthorized,

    /// Unsupported value or malformed input (400)
    Validation,

    /// Matching found nothing to reserve (409)
    NoResourceAvailable,

    /// Domain invariant violation (422)
    DomainError,

    /// Database/persistence error (500)
    Database,

    /// Email provider failure (502)
    ExternalService,

    /// Other/unknown error (500)
    Internal,
}

impl ErrorType {
    /// Conventional HTTP status for the category
    pub fn status_code(&self) -> u16 {
        match self {
            ErrorType::NotFound => 404,
            ErrorType::Unauthenticated => 401,
            ErrorType::Unauthorized => 403,
            ErrorType::Validation => 400,
            ErrorType::NoResourceAvailable => 409,
            ErrorType::DomainError => 422,
            ErrorType::Database | ErrorType::Internal => 500,
            ErrorType::ExternalService => 502,
        }
    }
}

impl ErrorResponse {
    fn new(error_type: ErrorType, message: impl Into<String>, details: Option<String>) -> Self {
        Self {
            success: false,
            error_type,
            message: message.into(),
            details,
        }
    }

    pub fn from_app_error(error: AppError) -> Self {
        match error {
            AppError::NotFound(what) => Self::new(ErrorType::NotFound, format!("{} not found", what), None),

            AppError::Unauthenticated => {
                Self::new(ErrorType::Unauthenticated, "Invalid credentials", None)
            }

            AppError::Unauthorized(reason) => {
                Self::new(ErrorType::Unauthorized, "Not authorized", Some(reason))
            }

            AppError::InvalidInput(reason) => Self::new(ErrorType::Validation, reason, None),

            AppError::NoResourceAvailable => Self::new(
                ErrorType::NoResourceAvailable,
                "No matching resources available",
                None,
            ),

            AppError::Domain(domain_error) => Self::new(
                ErrorType::DomainError,
                "Domain validation failed",
                Some(domain_error.to_string()),
            ),

            AppError::Database(db_error) => {
                log::error!("Database error: {:?}", db_error);
                Self::new(
                    ErrorType::Database,
                    "Database operation failed",
                    Some("Check logs for details".to_string()),
                )
            }

            AppError::Pool(pool_error) => {
                log::error!("Connection pool error: {}", pool_error);
                Self::new(ErrorType::Database, "Database connection failed", None)
            }

            AppError::Notification(reason) => {
                log::warn!("Notification error: {}", reason);
                Self::new(ErrorType::ExternalService, "Notification delivery failed", Some(reason))
            }

            AppError::Serialization(serde_error) => {
                log::error!("Serialization error: {:?}", serde_error);
                Self::new(ErrorType::Internal, "Data serialization failed", None)
            }

            AppError::Io(io_error) => {
                log::error!("IO error: {:?}", io_error);
                Self::new(ErrorType::Internal, "File system operation failed", None)
            }

            AppError::Other(message) => {
                log::error!("Other error: {}", message);
                Self::new(ErrorType::Internal, "Internal error", None)
            }
        }
    }

    pub fn validation(message: String) -> Self {
        Self::new(ErrorType::Validation, message, None)
    }
}

/// Convert a result into a JSON-encoded `ErrorResponse` on failure
pub trait ToErrorResponse<T> {
    fn to_error_response(self) -> Result<T, String>;
}

impl<T> ToErrorResponse<T> for Result<T, AppError> {
    fn to_error_response(self) -> Result<T, String> {
        self.map_err(|e| {
            let error_response = ErrorResponse::from_app_error(e);
            serde_json::to_string(&error_response).unwrap_or_else(|_| "Internal error".to_string())
        })
    }
}
