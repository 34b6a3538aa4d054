//! Route handlers for administering users.

use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{
        FromRef, Path, State,
        rejection::{JsonRejection, PathRejection},
    },
};

use crate::{
    AppState, Error,
    auth::Session,
    request::{json_body, path_id},
    stores::UserStore,
    user::{User, UserID, update::UpdateUserRequest},
};

/// The state needed to administer users.
#[derive(Clone)]
pub struct UserState {
    /// The store for user accounts.
    pub user_store: Arc<dyn UserStore>,
}

impl FromRef<AppState> for UserState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            user_store: state.user_store.clone(),
        }
    }
}

/// List every user, most recently created first.
#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    responses(
        (status = 200, description = "All users", body = [User]),
        (status = 401, description = "Not signed in", body = crate::ErrorResponse),
        (status = 403, description = "Not an admin", body = crate::ErrorResponse),
    )
)]
pub async fn list_users_endpoint(State(state): State<UserState>) -> Result<Json<Vec<User>>, Error> {
    state.user_store.get_all().map(Json)
}

/// Change a user's name, role or phone number.
#[utoipa::path(
    put,
    path = "/users/{user_id}",
    tag = "users",
    params(("user_id" = i64, Path, description = "The user to edit")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "The updated user", body = User),
        (status = 400, description = "A field is invalid", body = crate::ErrorResponse),
        (status = 401, description = "Not signed in", body = crate::ErrorResponse),
        (status = 403, description = "Not an admin", body = crate::ErrorResponse),
        (status = 404, description = "No such user", body = crate::ErrorResponse),
    )
)]
pub async fn update_user_endpoint(
    State(state): State<UserState>,
    Extension(session): Extension<Session>,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<Json<User>, Error> {
    let id = UserID::new(path_id(path)?);
    let changes = json_body(body)?.validate()?;

    let user = state.user_store.update(id, changes)?;
    tracing::info!("User {} updated user {id}", session.id);

    Ok(Json(user))
}

#[cfg(test)]
mod list_users_tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::{
        endpoints,
        test_utils::{get_test_server_with_users, log_in_admin, log_in_user},
    };

    #[tokio::test]
    async fn admin_lists_users_newest_first_without_passwords() {
        let (server, users) = get_test_server_with_users();
        let cookie = log_in_admin(&server, &users).await;

        let response = server.get(endpoints::USERS).add_cookie(cookie).await;

        response.assert_status_ok();
        let body = response.json::<serde_json::Value>();
        let listed = body.as_array().unwrap();
        assert_eq!(listed.len(), 2);
        // The regular user is seeded after the admin.
        assert_eq!(listed[0]["email"], json!(users.user.email));
        assert_eq!(listed[1]["email"], json!(users.admin.email));
        for user in listed {
            let keys: Vec<&String> = user.as_object().unwrap().keys().collect();
            assert_eq!(
                keys.len(),
                6,
                "unexpected fields in {user}, the password hash must never be sent"
            );
            assert!(user.get("createdAt").is_some());
            assert!(user.get("phone").is_some());
        }
    }

    #[tokio::test]
    async fn user_cannot_list_users() {
        let (server, users) = get_test_server_with_users();
        let cookie = log_in_user(&server, &users).await;

        server
            .get(endpoints::USERS)
            .add_cookie(cookie)
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }
}
