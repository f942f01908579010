// src/repositories/user_repository.rs

use std::sync::Arc;

use rusqlite::{params, Row};
use uuid::Uuid;

use crate::db::ConnectionPool;
use crate::domain::{User, UserRole};
use crate::error::{AppError, AppResult};
use crate::repositories::row_support::{parse_enum, parse_timestamp, parse_uuid};

pub trait UserRepository: Send + Sync {
    fn save(&self, user: &User) -> AppResult<()>;
    fn get_by_id(&self, id: Uuid) -> AppResult<Option<User>>;
    fn get_by_email(&self, email: &str) -> AppResult<Option<User>>;
    fn list_by_role(&self, role: UserRole) -> AppResult<Vec<User>>;
}

pub struct SqliteUserRepository {
    pool: Arc<ConnectionPool>,
}

const USER_COLUMNS: &str = "id, firstname, lastname, email, mobile_number, role,
                            password_hash, disabled, created_at";

impl SqliteUserRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    fn row_to_user(row: &Row) -> Result<User, rusqlite::Error> {
        Ok(User {
            id: parse_uuid(0, &row.get::<_, String>(0)?)?,
            firstname: row.get(1)?,
            lastname: row.get(2)?,
            email: row.get(3)?,
            mobile_number: row.get(4)?,
            role: parse_enum(5, &row.get::<_, String>(5)?)?,
            password_hash: row.get(6)?,
            disabled: row.get(7)?,
            created_at: parse_timestamp(8, &row.get::<_, String>(8)?)?,
        })
    }

    fn query_one(&self, sql: &str, key: String) -> AppResult<Option<User>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(sql)?;

        match stmt.query_row(params![key], Self::row_to_user) {
            Ok(user) => Ok(Some(user)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::Database(e)),
        }
    }
}

impl UserRepository for SqliteUserRepository {
    fn save(&self, user: &User) -> AppResult<()> {
        let conn = self.pool.get()?;

        conn.execute(
            "INSERT INTO users (
                id, firstname, lastname, email, mobile_number, role,
                password_hash, disabled, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            ON CONFLICT(id) DO UPDATE SET
                firstname = excluded.firstname,
                lastname = excluded.lastname,
                email = excluded.email,
                mobile_number = excluded.mobile_number,
                role = excluded.role,
                password_hash = excluded.password_hash,
                disabled = excluded.disabled",
            params![
                user.id.to_string(),
                user.firstname,
                user.lastname,
                user.email,
                user.mobile_number,
                user.role.as_str(),
                user.password_hash,
                user.disabled,
                user.created_at.to_rfc3339(),
            ],
        )?;

        Ok(())
    }

    fn get_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        self.query_one(
            &format!("SELECT {} FROM users WHERE id = ?1", USER_COLUMNS),
            id.to_string(),
        )
    }

    fn get_by_email(&self, email: &str) -> AppResult<Option<User>> {
        self.query_one(
            &format!("SELECT {} FROM users WHERE email = ?1", USER_COLUMNS),
            email.to_string(),
        )
    }

    fn list_by_role(&self, role: UserRole) -> AppResult<Vec<User>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM users WHERE role = ?1 AND disabled = 0 ORDER BY created_at, id",
            USER_COLUMNS
        ))?;

        let users: Vec<User> = stmt
            .query_map(params![role.as_str()], Self::row_to_user)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(users)
    }
}
