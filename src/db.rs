//! Sets up the application's SQLite database.

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};

use crate::{
    Error,
    stores::sqlite::{create_transaction_table, create_user_table},
};

/// Create the tables for the domain models if they do not exist yet.
///
/// Also turns on foreign key enforcement for `connection`, which SQLite
/// leaves off by default.
///
/// # Errors
/// Returns an error if the schema could not be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    // Has no effect inside a transaction.
    connection.pragma_update(None, "foreign_keys", "ON")?;

    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_user_table(&transaction)?;
    create_transaction_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
