//! Defines the core data models for transactions.

use std::{fmt::Display, str::FromStr};

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use utoipa::ToSchema;

use crate::{Error, user::UserID};

/// A newtype wrapper for integer transaction IDs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct TransactionId(i64);

impl TransactionId {
    /// Create a new transaction ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Cast the transaction ID to a 64 bit integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Whether money came in or went out.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    /// Money earned.
    Income,
    /// Money spent.
    Expense,
}

impl TransactionType {
    /// The string used for the type in the database and over the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "INCOME",
            TransactionType::Expense => "EXPENSE",
        }
    }
}

impl FromStr for TransactionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "INCOME" => Ok(TransactionType::Income),
            "EXPENSE" => Ok(TransactionType::Expense),
            _ => Err(Error::InvalidInput(
                "Type must be INCOME or EXPENSE".to_owned(),
            )),
        }
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error| FromSqlError::Other(Box::new(error)))
    }
}

/// The name and email of the user who recorded a transaction.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Owner {
    /// The user's display name.
    pub name: String,
    /// The user's email address.
    pub email: String,
}

/// An income or expense entry in the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// What the money was for.
    pub concept: String,
    /// How much money, always positive.
    pub amount: f64,
    /// When the transaction happened, in UTC.
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String, format = DateTime)]
    pub date: OffsetDateTime,
    /// Whether the money came in or went out.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// The ID of the user who recorded the transaction.
    pub user_id: UserID,
    /// The user who recorded the transaction.
    pub user: Owner,
}

/// The data needed to record a transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// What the money was for, must not be blank.
    pub concept: String,
    /// How much money, must be greater than zero.
    pub amount: f64,
    /// When the transaction happened.
    pub date: OffsetDateTime,
    /// Whether the money came in or went out.
    pub transaction_type: TransactionType,
    /// The user recording the transaction.
    pub user_id: UserID,
}

/// A partial update to a transaction. `None` leaves the field as is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionChanges {
    pub concept: Option<String>,
    pub amount: Option<f64>,
    pub date: Option<OffsetDateTime>,
    pub transaction_type: Option<TransactionType>,
}
