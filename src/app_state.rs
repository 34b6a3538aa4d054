//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use rusqlite::Connection;
use sha2::{Digest, Sha512};
use time::Duration;

use crate::{
    Error,
    auth::{CookieSessionResolver, DEFAULT_COOKIE_DURATION, SessionResolver},
    db::initialize,
    stores::{
        TransactionStore, UserStore,
        sqlite::{SQLiteTransactionStore, SQLiteUserStore},
    },
};

/// The state of the REST server.
#[derive(Clone)]
pub struct AppState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,

    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,

    /// Resolves the session attached to an incoming request.
    pub session_resolver: Arc<dyn SessionResolver>,

    /// The store for the shared ledger of transactions.
    pub transaction_store: Arc<dyn TransactionStore>,

    /// The store for user accounts.
    pub user_store: Arc<dyn UserStore>,
}

impl AppState {
    /// Create a new [AppState] backed by a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the domain models.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(db_connection: Connection, cookie_secret: &str) -> Result<Self, Error> {
        initialize(&db_connection)?;

        let connection = Arc::new(Mutex::new(db_connection));

        Ok(Self::with_stores(
            cookie_secret,
            Arc::new(SQLiteTransactionStore::new(connection.clone())),
            Arc::new(SQLiteUserStore::new(connection)),
        ))
    }

    /// Create a new [AppState] from existing stores.
    ///
    /// Sessions are resolved from the private auth cookie, looking users up
    /// in `user_store`.
    pub fn with_stores(
        cookie_secret: &str,
        transaction_store: Arc<dyn TransactionStore>,
        user_store: Arc<dyn UserStore>,
    ) -> Self {
        let cookie_key = create_cookie_key(cookie_secret);
        let session_resolver =
            Arc::new(CookieSessionResolver::new(cookie_key.clone(), user_store.clone()));

        Self {
            cookie_key,
            cookie_duration: DEFAULT_COOKIE_DURATION,
            session_resolver,
            transaction_store,
            user_store,
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

/// Create a signing key for cookies from a `secret`s string.
pub fn create_cookie_key(secret: &str) -> Key {
    let hash = Sha512::digest(secret);

    Key::from(&hash)
}
