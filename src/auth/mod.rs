//! Authentication and access control.
//!
//! Users sign in with [post_log_in], which sets an encrypted auth cookie. The
//! [require_auth] and [require_admin] middleware resolve that cookie into a
//! [Session] and apply an [AccessPolicy] before any handler runs.

mod cookie;
mod guard;
pub(crate) mod log_in;
pub(crate) mod log_out;
mod password;
mod session;
mod token;

pub use cookie::DEFAULT_COOKIE_DURATION;
pub use guard::{require_admin, require_auth};
pub use log_in::{LogInData, post_log_in};
pub use log_out::{MessageResponse, post_log_out};
pub use password::{PasswordHash, ValidatedPassword};
pub use session::{CookieSessionResolver, Session, SessionResolver};

#[cfg(test)]
pub(crate) use cookie::COOKIE_TOKEN;
