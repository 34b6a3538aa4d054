//! Handles log-in requests and issues the auth cookie.

use std::sync::Arc;

use axum::{
    Json,
    extract::{FromRef, State, rejection::JsonRejection},
    response::{IntoResponse, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use serde::Deserialize;
use time::Duration;
use utoipa::ToSchema;

use crate::{
    AppState, Error,
    auth::{Session, cookie::set_auth_cookie},
    request::json_body,
    stores::UserStore,
};

/// The state needed to perform a login.
#[derive(Clone)]
pub struct LoginState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,
    /// Where users and their password hashes are looked up.
    pub user_store: Arc<dyn UserStore>,
}

impl FromRef<AppState> for LoginState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            user_store: state.user_store.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<LoginState> for Key {
    fn from_ref(state: &LoginState) -> Self {
        state.cookie_key.clone()
    }
}

/// The credentials sent to log in.
///
/// The password is kept as a plain string, it is only compared against the
/// stored hash.
#[derive(Deserialize, ToSchema)]
pub struct LogInData {
    /// The email address of the account.
    pub email: String,
    /// The account password.
    pub password: String,
}

/// Check the credentials and, on success, set the auth cookie and respond
/// with the signed-in user's session.
///
/// An unknown email and a wrong password get the same response so the
/// endpoint does not reveal which emails are registered.
#[utoipa::path(
    post,
    path = "/log_in",
    tag = "auth",
    request_body = LogInData,
    responses(
        (status = 200, description = "Signed in, the auth cookie is set", body = Session),
        (status = 400, description = "The body is not valid", body = crate::ErrorResponse),
        (status = 401, description = "The email or password is wrong", body = crate::ErrorResponse),
    )
)]
pub async fn post_log_in(
    State(state): State<LoginState>,
    jar: PrivateCookieJar,
    body: Result<Json<LogInData>, JsonRejection>,
) -> Response {
    let credentials = match json_body(body) {
        Ok(credentials) => credentials,
        Err(error) => return error.into_response(),
    };

    let user = match state.user_store.get_by_email(credentials.email.trim()) {
        Ok(user) => user,
        Err(Error::UserNotFound) => return Error::InvalidCredentials.into_response(),
        Err(error) => return error.into_response(),
    };

    match user.password_hash.verify(&credentials.password) {
        Ok(true) => {}
        Ok(false) => return Error::InvalidCredentials.into_response(),
        Err(error) => return error.into_response(),
    }

    match set_auth_cookie(jar, user.id, state.cookie_duration) {
        Ok(jar) => {
            tracing::info!("User {} logged in", user.id);
            (jar, Json(Session::from(user))).into_response()
        }
        Err(error) => {
            tracing::error!("Error setting auth cookie: {error}");
            error.into_response()
        }
    }
}
