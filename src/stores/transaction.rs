//! Defines the transaction store trait.

use crate::{
    Error,
    transaction::{NewTransaction, Transaction, TransactionChanges, TransactionId},
};

/// Handles the creation, retrieval and modification of transactions.
///
/// Every [Transaction] returned by a store carries its owner's name and email.
pub trait TransactionStore: Send + Sync {
    /// Create a new transaction in the store.
    fn create(&self, transaction: NewTransaction) -> Result<Transaction, Error>;

    /// Retrieve every transaction, newest first, with ties broken by the
    /// most recently created.
    fn get_all(&self) -> Result<Vec<Transaction>, Error>;

    /// Apply `changes` to the transaction with the ID `id` and return the
    /// updated transaction.
    ///
    /// Returns [Error::TransactionNotFound] if no transaction has the ID `id`.
    fn update(&self, id: TransactionId, changes: TransactionChanges) -> Result<Transaction, Error>;

    /// Remove the transaction with the ID `id`.
    ///
    /// Returns [Error::TransactionNotFound] if no transaction has the ID `id`.
    fn delete(&self, id: TransactionId) -> Result<(), Error>;
}
