use axum_extra::extract::cookie::Cookie;
use axum_test::TestServer;
use serde_json::json;

use crate::{
    auth::COOKIE_TOKEN,
    endpoints,
    test_utils::{ADMIN_PASSWORD, TestUsers, USER_PASSWORD},
};

pub(crate) async fn log_in(server: &TestServer, email: &str, password: &str) -> Cookie<'static> {
    let response = server
        .post(endpoints::LOG_IN)
        .json(&json!({ "email": email, "password": password }))
        .await;

    response.assert_status_ok();
    response.cookie(COOKIE_TOKEN)
}

pub(crate) async fn log_in_admin(server: &TestServer, users: &TestUsers) -> Cookie<'static> {
    log_in(server, &users.admin.email, ADMIN_PASSWORD).await
}

pub(crate) async fn log_in_user(server: &TestServer, users: &TestUsers) -> Cookie<'static> {
    log_in(server, &users.user.email, USER_PASSWORD).await
}

/// Record a transaction as the admin and return its ID.
pub(crate) async fn seed_transaction(
    server: &TestServer,
    users: &TestUsers,
    concept: &str,
    amount: f64,
    date: &str,
    transaction_type: &str,
) -> i64 {
    let cookie = log_in_admin(server, users).await;

    let response = server
        .post(endpoints::TRANSACTIONS)
        .add_cookie(cookie)
        .json(&json!({
            "concept": concept,
            "amount": amount,
            "date": date,
            "type": transaction_type,
        }))
        .await;

    response.assert_status(axum::http::StatusCode::CREATED);
    response.json::<serde_json::Value>()["id"]
        .as_i64()
        .expect("Created transaction has no ID")
}
