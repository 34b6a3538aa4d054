//! Defines the user model and the roles that gate access to the API.

use std::{fmt::Display, str::FromStr};

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use utoipa::ToSchema;

use crate::{Error, auth::PasswordHash};

/// A newtype wrapper for integer user IDs.
///
/// This helps disambiguate user IDs from other types of IDs, leading to better compile time
/// errors, and more flexible generics that can have distinct implementations for multiple ID types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Hash, ToSchema)]
#[serde(transparent)]
pub struct UserID(i64);

impl UserID {
    /// Create a new user ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Cast the user ID to a 64 bit integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// What a user is allowed to do.
///
/// Every signed-in user can read the ledger, only admins can change it or
/// see reports and other users.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    /// A regular user with read-only access to the ledger.
    User,
    /// An administrator with full access.
    Admin,
}

impl Role {
    /// The role given to newly created users.
    pub const DEFAULT: Role = Role::Admin;

    /// The string used for the role in the database and over the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Admin => "ADMIN",
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USER" => Ok(Role::User),
            "ADMIN" => Ok(Role::Admin),
            _ => Err(Error::InvalidInput("Role must be USER or ADMIN".to_owned())),
        }
    }
}

impl ToSql for Role {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Role {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error| FromSqlError::Other(Box::new(error)))
    }
}

/// A user of the application.
///
/// The password hash never leaves the server.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// The user's ID in the application database.
    pub id: UserID,
    /// The user's display name.
    pub name: String,
    /// The user's email address, unique across users.
    pub email: String,
    /// An optional contact phone number.
    pub phone: Option<String>,
    /// What the user is allowed to do.
    pub role: Role,
    /// When the user was created.
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String, format = DateTime)]
    pub created_at: OffsetDateTime,
    /// The user's password hash.
    #[serde(skip)]
    pub password_hash: PasswordHash,
}

/// The data needed to create a user.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    /// The user's display name.
    pub name: String,
    /// The user's email address.
    pub email: String,
    /// An optional contact phone number.
    pub phone: Option<String>,
    /// What the user is allowed to do, use [Role::DEFAULT] unless told otherwise.
    pub role: Role,
    /// The user's password hash.
    pub password_hash: PasswordHash,
}

/// A partial update to a user.
///
/// `None` leaves the field as is. For `phone`, `Some(None)` clears the
/// number.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserChanges {
    /// The new display name.
    pub name: Option<String>,
    /// The new role.
    pub role: Option<Role>,
    /// The new phone number, or `Some(None)` to remove it.
    pub phone: Option<Option<String>>,
}
