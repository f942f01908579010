// src/repositories/row_support.rs
//
// Column decoding shared by the SQLite repositories.
// Every failure surfaces as a rusqlite conversion error so it can be
// returned from `query_map` closures.

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use std::str::FromStr;
use uuid::Uuid;

pub(crate) fn conversion_error<E>(idx: usize, err: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
}

pub(crate) fn parse_uuid(idx: usize, raw: &str) -> Result<Uuid, rusqlite::Error> {
    Uuid::parse_str(raw).map_err(|e| conversion_error(idx, e))
}

pub(crate) fn parse_optional_uuid(
    idx: usize,
    raw: Option<String>,
) -> Result<Option<Uuid>, rusqlite::Error> {
    raw.map(|s| parse_uuid(idx, &s)).transpose()
}

pub(crate) fn parse_timestamp(idx: usize, raw: &str) -> Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| conversion_error(idx, e))
}

/// Parse a closed-set column (role, type, progress) through its FromStr
pub(crate) fn parse_enum<T>(idx: usize, raw: &str) -> Result<T, rusqlite::Error>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.parse::<T>().map_err(|e| conversion_error(idx, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserRole;

    #[test]
    fn test_invalid_uuid_causes_error() {
        assert!(parse_uuid(0, "not-a-valid-uuid").is_err());
    }

    #[test]
    fn test_invalid_timestamp_causes_error() {
        assert!(parse_timestamp(0, "not-a-timestamp").is_err());
    }

    #[test]
    fn test_unknown_enum_value_causes_error() {
        assert!(parse_enum::<UserRole>(3, "superuser").is_err());
        assert_eq!(parse_enum::<UserRole>(3, "admin").unwrap(), UserRole::Admin);
    }
}
