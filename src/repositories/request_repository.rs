// src/repositories/request_repository.rs
//
// Request persistence. Conditional updates return whether a row changed so
// the caller can tell a lost race from a success.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rusqlite::{params, Row, ToSql};
use uuid::Uuid;

use crate::db::ConnectionPool;
use crate::domain::{Coordinate, Request, RequestProgress, RequestType};
use crate::error::{AppError, AppResult};
use crate::repositories::row_support::{
    parse_enum, parse_optional_uuid, parse_timestamp, parse_uuid,
};

pub trait RequestRepository: Send + Sync {
    /// Insert, or update the descriptive fields of an existing row.
    /// Confirmation, assignment and progress are only written on insert.
    fn save(&self, request: &Request) -> AppResult<()>;
    fn get_by_id(&self, id: Uuid) -> AppResult<Option<Request>>;

    /// Unconfirmed requests, oldest first, optionally of one type
    fn list_open(&self, request_type: Option<RequestType>) -> AppResult<Vec<Request>>;

    /// Set the volunteer only if none is assigned yet
    ///
    /// Returns false when another volunteer got there first.
    fn assign_volunteer_if_unassigned(
        &self,
        id: Uuid,
        volunteer_id: Uuid,
        at: DateTime<Utc>,
    ) -> AppResult<bool>;

    fn update_progress(&self, id: Uuid, progress: RequestProgress, at: DateTime<Utc>)
        -> AppResult<bool>;
}

pub struct SqliteRequestRepository {
    pool: Arc<ConnectionPool>,
}

const REQUEST_COLUMNS: &str = "id, title, description, request_type, location_lat, location_lon,
                               is_confirmed, user_id, volunteer_id, matched_resource_id,
                               progress, created_at, updated_at";

impl SqliteRequestRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    pub(crate) fn row_to_request(row: &Row) -> Result<Request, rusqlite::Error> {
        Ok(Request {
            id: parse_uuid(0, &row.get::<_, String>(0)?)?,
            title: row.get(1)?,
            description: row.get(2)?,
            request_type: parse_enum(3, &row.get::<_, String>(3)?)?,
            location: Coordinate::new(row.get(4)?, row.get(5)?),
            is_confirmed: row.get(6)?,
            user_id: parse_uuid(7, &row.get::<_, String>(7)?)?,
            volunteer_id: parse_optional_uuid(8, row.get(8)?)?,
            matched_resource_id: parse_optional_uuid(9, row.get(9)?)?,
            progress: parse_enum(10, &row.get::<_, String>(10)?)?,
            created_at: parse_timestamp(11, &row.get::<_, String>(11)?)?,
            updated_at: parse_timestamp(12, &row.get::<_, String>(12)?)?,
        })
    }
}

impl RequestRepository for SqliteRequestRepository {
    fn save(&self, request: &Request) -> AppResult<()> {
        let conn = self.pool.get()?;

        conn.execute(
            "INSERT INTO requests (
                id, title, description, request_type, location_lat, location_lon,
                is_confirmed, user_id, volunteer_id, matched_resource_id,
                progress, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
            ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                description = excluded.description,
                request_type = excluded.request_type,
                location_lat = excluded.location_lat,
                location_lon = excluded.location_lon,
                updated_at = excluded.updated_at",
            params![
                request.id.to_string(),
                request.title,
                request.description,
                request.request_type.as_str(),
                request.location.lat,
                request.location.lon,
                request.is_confirmed,
                request.user_id.to_string(),
                request.volunteer_id.map(|id| id.to_string()),
                request.matched_resource_id.map(|id| id.to_string()),
                request.progress.as_str(),
                request.created_at.to_rfc3339(),
                request.updated_at.to_rfc3339(),
            ],
        )?;

        Ok(())
    }

    fn get_by_id(&self, id: Uuid) -> AppResult<Option<Request>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM requests WHERE id = ?1",
            REQUEST_COLUMNS
        ))?;

        match stmt.query_row(params![id.to_string()], Self::row_to_request) {
            Ok(request) => Ok(Some(request)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::Database(e)),
        }
    }

    fn list_open(&self, request_type: Option<RequestType>) -> AppResult<Vec<Request>> {
        let conn = self.pool.get()?;

        let type_value = request_type.map(|t| t.as_str());
        let mut sql = format!("SELECT {} FROM requests WHERE is_confirmed = 0", REQUEST_COLUMNS);
        let mut args: Vec<&dyn ToSql> = Vec::new();
        if let Some(t) = &type_value {
            sql.push_str(" AND request_type = ?1");
            args.push(t);
        }
        sql.push_str(" ORDER BY created_at, id");

        let mut stmt = conn.prepare(&sql)?;
        let requests: Vec<Request> = stmt
            .query_map(args.as_slice(), Self::row_to_request)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(requests)
    }

    fn assign_volunteer_if_unassigned(
        &self,
        id: Uuid,
        volunteer_id: Uuid,
        at: DateTime<Utc>,
    ) -> AppResult<bool> {
        let conn = self.pool.get()?;

        let changed = conn.execute(
            "UPDATE requests
             SET is_confirmed = 1, volunteer_id = ?1, updated_at = ?2
             WHERE id = ?3 AND volunteer_id IS NULL",
            params![volunteer_id.to_string(), at.to_rfc3339(), id.to_string()],
        )?;

        Ok(changed == 1)
    }

    fn update_progress(
        &self,
        id: Uuid,
        progress: RequestProgress,
        at: DateTime<Utc>,
    ) -> AppResult<bool> {
        let conn = self.pool.get()?;

        let changed = conn.execute(
            "UPDATE requests SET progress = ?1, updated_at = ?2 WHERE id = ?3",
            params![progress.as_str(), at.to_rfc3339(), id.to_string()],
        )?;

        Ok(changed == 1)
    }
}
