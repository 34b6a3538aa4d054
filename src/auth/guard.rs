//! Middleware that checks who is calling and whether their role allows the
//! route, before the handler runs.

use std::sync::Arc;

use axum::{
    extract::{FromRef, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{
    AppState, Error,
    auth::session::{Session, SessionResolver},
    user::Role,
};

/// Who may call a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessPolicy {
    /// Any signed-in user.
    AnyUser,
    /// Only users with the [Role::Admin] role.
    AdminOnly,
}

impl AccessPolicy {
    /// Check whether `session` satisfies the policy.
    ///
    /// # Errors
    ///
    /// Returns [Error::Forbidden] if the route needs an admin and the user is not one.
    pub fn check(&self, session: &Session) -> Result<(), Error> {
        match (self, session.role) {
            (AccessPolicy::AnyUser, _) | (AccessPolicy::AdminOnly, Role::Admin) => Ok(()),
            (AccessPolicy::AdminOnly, Role::User) => Err(Error::Forbidden),
        }
    }
}

/// The state needed for the auth middleware
#[derive(Clone)]
pub struct AuthState {
    /// Resolves the session attached to an incoming request.
    pub session_resolver: Arc<dyn SessionResolver>,
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            session_resolver: state.session_resolver.clone(),
        }
    }
}

/// Resolve the session once, apply `policy`, and either reject the request or
/// pass it on with the [Session] in its extensions.
#[inline]
async fn guard_internal(
    state: AuthState,
    policy: AccessPolicy,
    mut request: Request,
    next: Next,
) -> Response {
    let session = match state.session_resolver.resolve_session(request.headers()) {
        Ok(Some(session)) => session,
        Ok(None) => return Error::Unauthorized.into_response(),
        Err(error) => {
            tracing::error!("Could not resolve session: {error}. Rejecting request.");
            return Error::Unauthorized.into_response();
        }
    };

    if let Err(error) = policy.check(&session) {
        tracing::info!(
            "User {} with role {} denied access to {} {}",
            session.id,
            session.role,
            request.method(),
            request.uri().path()
        );
        return error.into_response();
    }

    request.extensions_mut().insert(session);
    next.run(request).await
}

/// Middleware that lets through any signed-in user.
///
/// **Note**: Route handlers can use the function argument
/// `Extension(session): Extension<Session>` to receive the caller's session.
pub async fn require_auth(State(state): State<AuthState>, request: Request, next: Next) -> Response {
    guard_internal(state, AccessPolicy::AnyUser, request, next).await
}

/// Middleware that lets through signed-in admins only.
///
/// **Note**: Route handlers can use the function argument
/// `Extension(session): Extension<Session>` to receive the caller's session.
pub async fn require_admin(
    State(state): State<AuthState>,
    request: Request,
    next: Next,
) -> Response {
    guard_internal(state, AccessPolicy::AdminOnly, request, next).await
}
