//! Transactions: the entries of the shared ledger.

mod core;
pub(crate) mod endpoints;
mod validation;

pub use core::{NewTransaction, Owner, Transaction, TransactionChanges, TransactionId, TransactionType};
pub use endpoints::{
    create_transaction_endpoint, delete_transaction_endpoint, list_transactions_endpoint,
    update_transaction_endpoint,
};
pub use validation::{CreateTransactionRequest, UpdateTransactionRequest};
