//! Implements a SQLite backed transaction store.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, OptionalExtension, Row};

use crate::{
    Error,
    stores::{
        TransactionStore,
        sqlite::{from_sql_date_time, to_sql_date_time},
    },
    transaction::{NewTransaction, Owner, Transaction, TransactionChanges, TransactionId},
    user::UserID,
};

/// Create the transaction table if it does not exist yet.
///
/// The user table must exist first.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                concept TEXT NOT NULL,
                amount REAL NOT NULL CHECK (amount > 0),
                date TEXT NOT NULL,
                type TEXT NOT NULL CHECK (type IN ('INCOME', 'EXPENSE')),
                user_id INTEGER NOT NULL,
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE
            )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_date ON \"transaction\"(date)",
        (),
    )?;

    Ok(())
}

const SELECT_TRANSACTION: &str = "SELECT t.id, t.concept, t.amount, t.date, t.type, t.user_id, \
     u.name, u.email \
     FROM \"transaction\" t INNER JOIN user u ON u.id = t.user_id";

fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let date: String = row.get(3)?;

    Ok(Transaction {
        id: TransactionId::new(row.get(0)?),
        concept: row.get(1)?,
        amount: row.get(2)?,
        date: from_sql_date_time(&date, 3)?,
        transaction_type: row.get(4)?,
        user_id: UserID::new(row.get(5)?),
        user: Owner {
            name: row.get(6)?,
            email: row.get(7)?,
        },
    })
}

fn get_transaction(connection: &Connection, id: TransactionId) -> Result<Transaction, Error> {
    connection
        .prepare(&format!("{SELECT_TRANSACTION} WHERE t.id = :id"))?
        .query_row(&[(":id", &id.as_i64())], map_transaction_row)
        .optional()?
        .ok_or(Error::TransactionNotFound)
}

/// Stores transactions in a SQLite database.
///
/// Transactions reference their owner in the user table, so
/// [create_user_table](super::create_user_table) must have been run as well.
#[derive(Debug, Clone)]
pub struct SQLiteTransactionStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteTransactionStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl TransactionStore for SQLiteTransactionStore {
    /// Record a new transaction.
    ///
    /// # Errors
    /// Returns [Error::UserNotFound] if the owner does not exist, or an
    /// [Error::SqlError] if there is some other SQL error.
    fn create(&self, transaction: NewTransaction) -> Result<Transaction, Error> {
        let connection = self
            .connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?;

        connection
            .execute(
                "INSERT INTO \"transaction\" (concept, amount, date, type, user_id)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                (
                    &transaction.concept,
                    transaction.amount,
                    to_sql_date_time(transaction.date)?,
                    transaction.transaction_type,
                    transaction.user_id.as_i64(),
                ),
            )
            .map_err(|error| match error {
                // A FOREIGN KEY constraint failed, the owner does not exist.
                rusqlite::Error::SqliteFailure(error, Some(_))
                    if error.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY =>
                {
                    Error::UserNotFound
                }
                error => error.into(),
            })?;

        get_transaction(
            &connection,
            TransactionId::new(connection.last_insert_rowid()),
        )
    }

    fn get_all(&self) -> Result<Vec<Transaction>, Error> {
        self.connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?
            .prepare(&format!("{SELECT_TRANSACTION} ORDER BY t.date DESC, t.id DESC"))?
            .query_map([], map_transaction_row)?
            .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
            .collect()
    }

    fn update(&self, id: TransactionId, changes: TransactionChanges) -> Result<Transaction, Error> {
        let connection = self
            .connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?;

        let date = changes.date.map(to_sql_date_time).transpose()?;
        let rows_affected = connection.execute(
            "UPDATE \"transaction\" SET
                concept = COALESCE(?1, concept),
                amount = COALESCE(?2, amount),
                date = COALESCE(?3, date),
                type = COALESCE(?4, type)
             WHERE id = ?5",
            (
                changes.concept,
                changes.amount,
                date,
                changes.transaction_type,
                id.as_i64(),
            ),
        )?;

        if rows_affected == 0 {
            return Err(Error::TransactionNotFound);
        }

        get_transaction(&connection, id)
    }

    fn delete(&self, id: TransactionId) -> Result<(), Error> {
        let rows_affected = self
            .connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?
            .execute(
                "DELETE FROM \"transaction\" WHERE id = :id",
                &[(":id", &id.as_i64())],
            )?;

        if rows_affected == 0 {
            return Err(Error::TransactionNotFound);
        }

        Ok(())
    }
}
