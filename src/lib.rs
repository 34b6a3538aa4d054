//! Cashbook is a web app for keeping a shared ledger of income and expenses.
//!
//! Any signed-in user may read the ledger. Administrators record, edit and
//! delete transactions, manage users, and pull aggregate reports (JSON or
//! CSV).
//!
//! This library provides a JSON REST API. The binaries in `src/bin` run the
//! server and manage the SQLite database it reads from.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde::Serialize;
use tokio::signal;
use utoipa::ToSchema;

mod app_state;
mod auth;
mod db;
mod docs;
mod endpoints;
mod logging;
mod report;
mod request;
mod routing;
mod stores;
mod transaction;
mod user;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use auth::{PasswordHash, ValidatedPassword};
pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;
pub use stores::{
    TransactionStore, UserStore,
    sqlite::{SQLiteTransactionStore, SQLiteUserStore},
};
pub use transaction::{NewTransaction, TransactionType};
pub use user::{NewUser, Role, User, UserID};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The request did not carry a valid session.
    ///
    /// Any failure while resolving the session also ends up here so that
    /// a broken identity lookup never lets a request through.
    #[error("Unauthorized")]
    Unauthorized,

    /// The caller is signed in but their role does not allow the operation.
    #[error("Access denied. Administrator role required.")]
    Forbidden,

    /// The request body or path failed validation.
    ///
    /// The string names the rule that was broken and is shown to the client.
    #[error("{0}")]
    InvalidInput(String),

    /// No transaction exists with the requested ID.
    #[error("Transaction not found")]
    TransactionNotFound,

    /// No user exists with the requested ID.
    #[error("User not found")]
    UserNotFound,

    /// The email and password given at log-in do not match a user.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// The email address is already registered to another user.
    #[error("the email address is already in use")]
    DuplicateEmail,

    /// The user provided a password that is too easy to guess.
    #[error("password is too weak: {0}")]
    TooWeak(String),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    /// When communicating with the application client this error should be
    /// replaced with a general error type indicating an internal server error.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// The auth token could not be serialized or deserialized.
    #[error("invalid auth token: {0}")]
    InvalidToken(String),

    /// The CSV export could not be written.
    #[error("could not write CSV: {0}")]
    CsvError(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
                },
                Some(ref desc),
            ) if desc.ends_with("user.email") => Error::DuplicateEmail,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

/// The JSON body sent with every error response.
#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct ErrorResponse {
    /// A message describing what went wrong.
    pub error: String,
}

impl ErrorResponse {
    pub(crate) fn new(message: impl ToString) -> Self {
        Self {
            error: message.to_string(),
        }
    }
}

/// Respond with `status` and a JSON error body containing `message`.
pub(crate) fn error_response(status: StatusCode, message: impl ToString) -> Response {
    (status, Json(ErrorResponse::new(message))).into_response()
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::Unauthorized | Error::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Error::Forbidden => StatusCode::FORBIDDEN,
            Error::InvalidInput(_) | Error::DuplicateEmail | Error::TooWeak(_) => {
                StatusCode::BAD_REQUEST
            }
            Error::TransactionNotFound | Error::UserNotFound => StatusCode::NOT_FOUND,
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
            }
        };

        error_response(status, self)
    }
}
