//! Log-out route handler that invalidates the auth cookie.

use axum::{Json, response::IntoResponse};
use axum_extra::extract::PrivateCookieJar;
use serde::Serialize;
use utoipa::ToSchema;

use crate::auth::cookie::invalidate_auth_cookie;

/// A short confirmation message.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    /// What happened.
    pub message: String,
}

impl MessageResponse {
    pub(crate) fn new(message: impl ToString) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

/// Invalidate the auth cookie.
///
/// Always succeeds, even if the client was not logged in.
#[utoipa::path(
    post,
    path = "/log_out",
    tag = "auth",
    responses((status = 200, description = "The auth cookie is cleared", body = MessageResponse))
)]
pub async fn post_log_out(jar: PrivateCookieJar) -> impl IntoResponse {
    (
        invalidate_auth_cookie(jar),
        Json(MessageResponse::new("Logged out")),
    )
}

#[cfg(test)]
mod log_out_tests {
    use serde_json::json;
    use time::{Duration, OffsetDateTime};

    use crate::{
        auth::cookie::COOKIE_TOKEN,
        endpoints,
        test_utils::{get_test_server_with_users, log_in_admin},
    };

    #[tokio::test]
    async fn log_out_expires_cookie() {
        let (server, users) = get_test_server_with_users();
        let cookie = log_in_admin(&server, &users).await;

        let response = server.post(endpoints::LOG_OUT).add_cookie(cookie).await;

        response.assert_status_ok();
        response.assert_json(&json!({ "message": "Logged out" }));
        let cookie = response.cookie(COOKIE_TOKEN);
        assert_eq!(cookie.expires_datetime(), Some(OffsetDateTime::UNIX_EPOCH));
        assert_eq!(cookie.max_age(), Some(Duration::ZERO));
    }

    #[tokio::test]
    async fn log_out_without_cookie_succeeds() {
        let (server, _) = get_test_server_with_users();

        server.post(endpoints::LOG_OUT).await.assert_status_ok();
    }
}
