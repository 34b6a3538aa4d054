#![allow(missing_docs)]

pub(crate) mod http;
pub(crate) mod store;

use std::sync::Arc;

use axum_test::TestServer;
use rusqlite::Connection;

use crate::{AppState, NewUser, PasswordHash, Role, User, build_router};

pub(crate) use http::{log_in_admin, log_in_user, seed_transaction};
use store::{CountingTransactionStore, CountingUserStore};

pub(crate) const TEST_COOKIE_SECRET: &str = "averysecretsecretthatislongenough";
pub(crate) const ADMIN_PASSWORD: &str = "correcthorsebatterystaple";
pub(crate) const USER_PASSWORD: &str = "tr0ub4dor&3-but-longer";

/// The accounts every test server starts with.
pub(crate) struct TestUsers {
    pub admin: User,
    pub user: User,
}

pub(crate) fn get_test_state() -> AppState {
    let connection = Connection::open_in_memory().expect("Could not open database in memory.");

    AppState::new(connection, TEST_COOKIE_SECRET).expect("Could not create app state.")
}

/// Create the admin first, then the regular user.
pub(crate) fn seed_users(state: &AppState) -> TestUsers {
    let admin = state
        .user_store
        .create(NewUser {
            name: "Ada Admin".to_owned(),
            email: "admin@example.com".to_owned(),
            phone: None,
            role: Role::Admin,
            password_hash: PasswordHash::from_raw_password(ADMIN_PASSWORD, 4)
                .expect("Could not hash password."),
        })
        .expect("Could not create admin.");

    let user = state
        .user_store
        .create(NewUser {
            name: "Uri User".to_owned(),
            email: "user@example.com".to_owned(),
            phone: Some("+34 600 111 222".to_owned()),
            role: Role::User,
            password_hash: PasswordHash::from_raw_password(USER_PASSWORD, 4)
                .expect("Could not hash password."),
        })
        .expect("Could not create user.");

    TestUsers { admin, user }
}

pub(crate) fn get_test_server(state: AppState) -> TestServer {
    TestServer::try_new(build_router(state)).expect("Could not create test server.")
}

pub(crate) fn get_test_server_with_users() -> (TestServer, TestUsers) {
    let state = get_test_state();
    let users = seed_users(&state);

    (get_test_server(state), users)
}

/// A server whose stores count every call, for checking that rejected
/// requests never touch the data.
pub(crate) fn get_counting_test_server() -> (
    TestServer,
    TestUsers,
    Arc<CountingTransactionStore>,
    Arc<CountingUserStore>,
) {
    let state = get_test_state();
    let users = seed_users(&state);

    let transaction_store = Arc::new(CountingTransactionStore::new(state.transaction_store));
    let user_store = Arc::new(CountingUserStore::new(state.user_store));
    let state = AppState::with_stores(
        TEST_COOKIE_SECRET,
        transaction_store.clone(),
        user_store.clone(),
    );

    (get_test_server(state), users, transaction_store, user_store)
}
