//! Resolves who is making a request.

use std::sync::Arc;

use axum::http::HeaderMap;
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use serde::Serialize;
use time::OffsetDateTime;
use utoipa::ToSchema;

use crate::{
    Error,
    auth::cookie::get_token_from_cookies,
    stores::UserStore,
    user::{Role, User, UserID},
};

/// The identity attached to an authenticated request.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Session {
    /// The ID of the signed-in user.
    pub id: UserID,
    /// The user's display name.
    pub name: String,
    /// The user's email address.
    pub email: String,
    /// The user's role at the time of the request.
    pub role: Role,
}

impl From<User> for Session {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
        }
    }
}

/// Finds the [Session] for a request from its headers.
pub trait SessionResolver: Send + Sync {
    /// Resolve the session for a request.
    ///
    /// Returns `Ok(None)` when the request carries no valid identity.
    ///
    /// # Errors
    ///
    /// Returns an error if the identity could not be checked, e.g. the
    /// database could not be reached.
    fn resolve_session(&self, headers: &HeaderMap) -> Result<Option<Session>, Error>;
}

/// Resolves sessions from the private auth cookie.
///
/// The user is loaded on every request, so a role change applies straight
/// away.
pub struct CookieSessionResolver {
    cookie_key: Key,
    user_store: Arc<dyn UserStore>,
}

impl CookieSessionResolver {
    /// Create a resolver that decrypts cookies with `cookie_key` and looks
    /// users up in `user_store`.
    pub fn new(cookie_key: Key, user_store: Arc<dyn UserStore>) -> Self {
        Self {
            cookie_key,
            user_store,
        }
    }
}

impl SessionResolver for CookieSessionResolver {
    fn resolve_session(&self, headers: &HeaderMap) -> Result<Option<Session>, Error> {
        let jar = PrivateCookieJar::from_headers(headers, self.cookie_key.clone());

        let token = match get_token_from_cookies(&jar)? {
            Some(token) => token,
            None => return Ok(None),
        };

        if token.is_expired_at(OffsetDateTime::now_utc()) {
            tracing::debug!("Rejecting expired token for user {}", token.user_id);
            return Ok(None);
        }

        match self.user_store.get(token.user_id) {
            Ok(user) => Ok(Some(user.into())),
            Err(Error::UserNotFound) => {
                tracing::warn!("Token refers to user {} who no longer exists", token.user_id);
                Ok(None)
            }
            Err(error) => Err(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        http::{
            HeaderMap, HeaderValue,
            header::{COOKIE, SET_COOKIE},
        },
        response::IntoResponse,
    };
    use axum_extra::extract::{
        PrivateCookieJar,
        cookie::{Cookie, Key},
    };
    use rusqlite::Connection;
    use time::{Duration, OffsetDateTime};

    use crate::{
        Error,
        app_state::create_cookie_key,
        auth::{
            PasswordHash,
            cookie::COOKIE_TOKEN,
            session::{CookieSessionResolver, Session, SessionResolver},
            token::Token,
        },
        db::initialize,
        stores::{UserStore, sqlite::SQLiteUserStore},
        user::{NewUser, Role, UserID},
    };

    fn get_resolver() -> (CookieSessionResolver, Key, UserID) {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        let store = Arc::new(SQLiteUserStore::new(Arc::new(Mutex::new(connection))));
        let user = store
            .create(NewUser {
                name: "Ana".to_owned(),
                email: "ana@example.com".to_owned(),
                phone: None,
                role: Role::User,
                password_hash: PasswordHash::new_unchecked("hunter2"),
            })
            .unwrap();
        let key = create_cookie_key("session resolver test");

        (CookieSessionResolver::new(key.clone(), store), key, user.id)
    }

    /// Encrypt `value` as the token cookie and put it in a `Cookie` header.
    fn headers_with_token(key: &Key, value: String) -> HeaderMap {
        let response = PrivateCookieJar::new(key.clone())
            .add(Cookie::new(COOKIE_TOKEN, value))
            .into_response();
        let set_cookie = response.headers().get(SET_COOKIE).unwrap().to_str().unwrap();
        let cookie = Cookie::parse(set_cookie.to_owned()).unwrap();

        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_str(&cookie.stripped().to_string()).unwrap(),
        );
        headers
    }

    #[test]
    fn no_cookie_means_no_session() {
        let (resolver, _, _) = get_resolver();

        assert_eq!(resolver.resolve_session(&HeaderMap::new()), Ok(None));
    }

    #[test]
    fn undecryptable_cookie_means_no_session() {
        let (resolver, _, _) = get_resolver();
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("token=FOOBAR"));

        assert_eq!(resolver.resolve_session(&headers), Ok(None));
    }

    #[test]
    fn valid_token_resolves_user() {
        let (resolver, key, user_id) = get_resolver();
        let token = Token {
            user_id,
            expires_at: OffsetDateTime::now_utc() + Duration::hours(1),
        };
        let headers = headers_with_token(&key, serde_json::to_string(&token).unwrap());

        let session = resolver.resolve_session(&headers).unwrap();

        assert_eq!(
            session,
            Some(Session {
                id: user_id,
                name: "Ana".to_owned(),
                email: "ana@example.com".to_owned(),
                role: Role::User,
            })
        );
    }

    #[test]
    fn expired_token_means_no_session() {
        let (resolver, key, user_id) = get_resolver();
        let token = Token {
            user_id,
            expires_at: OffsetDateTime::now_utc() - Duration::seconds(1),
        };
        let headers = headers_with_token(&key, serde_json::to_string(&token).unwrap());

        assert_eq!(resolver.resolve_session(&headers), Ok(None));
    }

    #[test]
    fn token_for_missing_user_means_no_session() {
        let (resolver, key, _) = get_resolver();
        let token = Token {
            user_id: UserID::new(999),
            expires_at: OffsetDateTime::now_utc() + Duration::hours(1),
        };
        let headers = headers_with_token(&key, serde_json::to_string(&token).unwrap());

        assert_eq!(resolver.resolve_session(&headers), Ok(None));
    }

    #[test]
    fn malformed_token_is_an_error() {
        let (resolver, key, _) = get_resolver();
        let headers = headers_with_token(&key, "not a token".to_owned());

        let result = resolver.resolve_session(&headers);

        assert!(matches!(result, Err(Error::InvalidToken(_))));
    }
}
