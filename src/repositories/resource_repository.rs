// src/repositories/resource_repository.rs

use std::sync::Arc;

use rusqlite::{params, Row, ToSql};
use uuid::Uuid;

use crate::db::ConnectionPool;
use crate::domain::{Coordinate, Resource, ResourceType};
use crate::error::{AppError, AppResult};
use crate::repositories::row_support::{parse_enum, parse_timestamp, parse_uuid};

pub trait ResourceRepository: Send + Sync {
    /// Insert, or update the descriptive fields of an existing row.
    /// Availability is only ever written on insert; reservations change it.
    fn save(&self, resource: &Resource) -> AppResult<()>;
    fn get_by_id(&self, id: Uuid) -> AppResult<Option<Resource>>;

    /// Every resource regardless of availability
    fn list(&self, resource_type: Option<ResourceType>) -> AppResult<Vec<Resource>>;

    /// Resources whose availability flag is set
    fn list_available(&self, resource_type: Option<ResourceType>) -> AppResult<Vec<Resource>>;
}

pub struct SqliteResourceRepository {
    pool: Arc<ConnectionPool>,
}

const RESOURCE_COLUMNS: &str = "id, resource_type, description, location_lat, location_lon,
                                is_available, user_id, created_at";

impl SqliteResourceRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    fn row_to_resource(row: &Row) -> Result<Resource, rusqlite::Error> {
        Ok(Resource {
            id: parse_uuid(0, &row.get::<_, String>(0)?)?,
            resource_type: parse_enum(1, &row.get::<_, String>(1)?)?,
            description: row.get(2)?,
            location: Coordinate::new(row.get(3)?, row.get(4)?),
            is_available: row.get(5)?,
            user_id: parse_uuid(6, &row.get::<_, String>(6)?)?,
            created_at: parse_timestamp(7, &row.get::<_, String>(7)?)?,
        })
    }

    fn query_list(
        &self,
        only_available: bool,
        resource_type: Option<ResourceType>,
    ) -> AppResult<Vec<Resource>> {
        let conn = self.pool.get()?;

        let type_value = resource_type.map(|t| t.as_str());
        let mut clauses: Vec<&str> = Vec::new();
        let mut args: Vec<&dyn ToSql> = Vec::new();

        if only_available {
            clauses.push("is_available = 1");
        }
        if let Some(t) = &type_value {
            clauses.push("resource_type = ?1");
            args.push(t);
        }

        let mut sql = format!("SELECT {} FROM resources", RESOURCE_COLUMNS);
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY created_at, id");

        let mut stmt = conn.prepare(&sql)?;
        let resources: Vec<Resource> = stmt
            .query_map(args.as_slice(), Self::row_to_resource)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(resources)
    }
}

impl ResourceRepository for SqliteResourceRepository {
    fn save(&self, resource: &Resource) -> AppResult<()> {
        let conn = self.pool.get()?;

        conn.execute(
            "INSERT INTO resources (
                id, resource_type, description, location_lat, location_lon,
                is_available, user_id, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            ON CONFLICT(id) DO UPDATE SET
                resource_type = excluded.resource_type,
                description = excluded.description,
                location_lat = excluded.location_lat,
                location_lon = excluded.location_lon",
            params![
                resource.id.to_string(),
                resource.resource_type.as_str(),
                resource.description,
                resource.location.lat,
                resource.location.lon,
                resource.is_available,
                resource.user_id.to_string(),
                resource.created_at.to_rfc3339(),
            ],
        )?;

        Ok(())
    }

    fn get_by_id(&self, id: Uuid) -> AppResult<Option<Resource>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM resources WHERE id = ?1",
            RESOURCE_COLUMNS
        ))?;

        match stmt.query_row(params![id.to_string()], Self::row_to_resource) {
            Ok(resource) => Ok(Some(resource)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::Database(e)),
        }
    }

    fn list(&self, resource_type: Option<ResourceType>) -> AppResult<Vec<Resource>> {
        self.query_list(false, resource_type)
    }

    fn list_available(&self, resource_type: Option<ResourceType>) -> AppResult<Vec<Resource>> {
        self.query_list(true, resource_type)
    }
}
