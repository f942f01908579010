// src/app/config.rs
//
// Explicit configuration, built once at startup and passed to every
// component that needs it. Nothing reads the environment after this.

use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::{RequestType, ResourceType};
use crate::error::{AppError, AppResult};
use crate::events::DEFAULT_EVENT_LOG_CAPACITY;

const ENV_PREFIX: &str = "CRISISCARE_";

/// Whether matching requires the resource type to line up with the request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPolicy {
    /// Any available resource qualifies regardless of type
    #[default]
    AnyType,
    /// Only resources whose type shares the request type's name
    SameType,
}

impl MatchPolicy {
    /// Type filter to apply when searching for `request_type`
    pub fn resource_filter(&self, request_type: RequestType) -> Option<ResourceType> {
        match self {
            MatchPolicy::AnyType => None,
            MatchPolicy::SameType => Some(ResourceType::same_as(request_type)),
        }
    }
}

impl FromStr for MatchPolicy {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "any_type" | "any" => Ok(MatchPolicy::AnyType),
            "same_type" | "same" => Ok(MatchPolicy::SameType),
            other => Err(AppError::InvalidInput(format!(
                "Unknown match policy: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// `None` uses the platform data directory
    pub database_path: Option<PathBuf>,
    pub pool_max_size: u32,

    /// Prefix for confirmation links in volunteer emails
    pub public_base_url: String,
    pub mail_from: String,
    pub mail_from_name: String,

    /// Both must be set to deliver real email; otherwise messages are logged
    pub mailjet_api_key: Option<String>,
    pub mailjet_api_secret: Option<String>,

    pub match_policy: MatchPolicy,
    pub default_search_radius_km: f64,

    /// Re-selections allowed when a chosen resource is reserved concurrently
    pub max_reservation_attempts: u32,

    /// Recent events kept in memory by the bus; 0 turns the log off
    pub event_log_capacity: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            pool_max_size: 15,
            public_base_url: "http://localhost:8000".to_string(),
            mail_from: "noreply@crisiscare.org".to_string(),
            mail_from_name: "CrisisCare Team".to_string(),
            mailjet_api_key: None,
            mailjet_api_secret: None,
            match_policy: MatchPolicy::AnyType,
            default_search_radius_km: 50.0,
            max_reservation_attempts: 3,
            event_log_capacity: DEFAULT_EVENT_LOG_CAPACITY,
        }
    }
}

impl AppConfig {
    /// Defaults overridden by `CRISISCARE_*` environment variables
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each
    /// `CRISISCARE_*` key
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(&format!("{}{}", ENV_PREFIX, key)).filter(|v| !v.trim().is_empty())
        };

        let mut config = Self::default();

        if let Some(path) = get("DATABASE_PATH") {
            config.database_path = Some(PathBuf::from(path));
        }
        if let Some(size) = get("POOL_MAX_SIZE") {
            config.pool_max_size = parse_number("POOL_MAX_SIZE", &size)?;
        }
        if let Some(url) = get("PUBLIC_BASE_URL") {
            config.public_base_url = url;
        }
        if let Some(from) = get("MAIL_FROM") {
            config.mail_from = from;
        }
        if let Some(name) = get("MAIL_FROM_NAME") {
            config.mail_from_name = name;
        }
        config.mailjet_api_key = get("MAILJET_API_KEY");
        config.mailjet_api_secret = get("MAILJET_API_SECRET");
        if let Some(policy) = get("MATCH_POLICY") {
            config.match_policy = policy.parse()?;
        }
        if let Some(radius) = get("SEARCH_RADIUS_KM") {
            config.default_search_radius_km = parse_number("SEARCH_RADIUS_KM", &radius)?;
        }
        if let Some(attempts) = get("MAX_RESERVATION_ATTEMPTS") {
            config.max_reservation_attempts = parse_number("MAX_RESERVATION_ATTEMPTS", &attempts)?;
        }
        if let Some(capacity) = get("EVENT_LOG_CAPACITY") {
            config.event_log_capacity = parse_number("EVENT_LOG_CAPACITY", &capacity)?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.pool_max_size == 0 {
            return Err(AppError::InvalidInput(
                "pool_max_size must be at least 1".to_string(),
            ));
        }
        if !(self.default_search_radius_km.is_finite() && self.default_search_radius_km >= 0.0) {
            return Err(AppError::InvalidInput(format!(
                "default_search_radius_km must be a non-negative number, got {}",
                self.default_search_radius_km
            )));
        }
        if self.max_reservation_attempts == 0 {
            return Err(AppError::InvalidInput(
                "max_reservation_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Key pair for the email provider, when both halves are present
    pub fn mailjet_credentials(&self) -> Option<(&str, &str)> {
        match (&self.mailjet_api_key, &self.mailjet_api_secret) {
            (Some(key), Some(secret)) => Some((key.as_str(), secret.as_str())),
            _ => None,
        }
    }
}

fn parse_number<T: FromStr>(key: &str, value: &str) -> AppResult<T> {
    value.trim().parse().map_err(|_| {
        AppError::InvalidInput(format!("{}{} is not a valid number: {}", ENV_PREFIX, key, value))
    })
}
