//! Implements a SQLite backed user store.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, OptionalExtension, Row};
use time::OffsetDateTime;

use crate::{
    Error,
    stores::{
        UserStore,
        sqlite::{from_sql_date_time, to_sql_date_time},
    },
    user::{NewUser, User, UserChanges, UserID},
};

/// Create the user table if it does not exist yet.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn create_user_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS user (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT UNIQUE NOT NULL,
                phone TEXT,
                role TEXT NOT NULL CHECK (role IN ('USER', 'ADMIN')),
                password TEXT NOT NULL,
                created_at TEXT NOT NULL
            )",
        (),
    )?;

    Ok(())
}

const SELECT_USER: &str = "SELECT id, name, email, phone, role, password, created_at FROM user";

fn map_user_row(row: &Row) -> Result<User, rusqlite::Error> {
    let created_at: String = row.get(6)?;

    Ok(User {
        id: UserID::new(row.get(0)?),
        name: row.get(1)?,
        email: row.get(2)?,
        phone: row.get(3)?,
        role: row.get(4)?,
        password_hash: row.get(5)?,
        created_at: from_sql_date_time(&created_at, 6)?,
    })
}

fn get_user(connection: &Connection, id: UserID) -> Result<User, Error> {
    connection
        .prepare(&format!("{SELECT_USER} WHERE id = :id"))?
        .query_row(&[(":id", &id.as_i64())], map_user_row)
        .optional()?
        .ok_or(Error::UserNotFound)
}

/// Stores users in a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteUserStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteUserStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl UserStore for SQLiteUserStore {
    fn create(&self, user: NewUser) -> Result<User, Error> {
        let connection = self
            .connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?;
        let created_at = OffsetDateTime::now_utc();

        connection.execute(
            "INSERT INTO user (name, email, phone, role, password, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            (
                &user.name,
                &user.email,
                &user.phone,
                user.role,
                &user.password_hash,
                to_sql_date_time(created_at)?,
            ),
        )?;

        get_user(&connection, UserID::new(connection.last_insert_rowid()))
    }

    fn get(&self, id: UserID) -> Result<User, Error> {
        let connection = self
            .connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?;

        get_user(&connection, id)
    }

    fn get_by_email(&self, email: &str) -> Result<User, Error> {
        self.connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?
            .prepare(&format!("{SELECT_USER} WHERE email = :email"))?
            .query_row(&[(":email", email)], map_user_row)
            .optional()?
            .ok_or(Error::UserNotFound)
    }

    fn get_all(&self) -> Result<Vec<User>, Error> {
        self.connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?
            .prepare(&format!("{SELECT_USER} ORDER BY created_at DESC, id DESC"))?
            .query_map([], map_user_row)?
            .map(|maybe_user| maybe_user.map_err(Error::from))
            .collect()
    }

    fn update(&self, id: UserID, changes: UserChanges) -> Result<User, Error> {
        let connection = self
            .connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?;

        let set_phone = changes.phone.is_some();
        let rows_affected = connection.execute(
            "UPDATE user SET
                name = COALESCE(?1, name),
                role = COALESCE(?2, role),
                phone = CASE WHEN ?3 THEN ?4 ELSE phone END
             WHERE id = ?5",
            (
                changes.name,
                changes.role,
                set_phone,
                changes.phone.flatten(),
                id.as_i64(),
            ),
        )?;

        if rows_affected == 0 {
            return Err(Error::UserNotFound);
        }

        get_user(&connection, id)
    }
}
