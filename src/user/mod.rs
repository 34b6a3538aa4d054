//! Users of the application and the endpoints for administering them.

mod core;
pub(crate) mod endpoints;
mod update;

pub use core::{NewUser, Role, User, UserChanges, UserID};
pub use endpoints::{list_users_endpoint, update_user_endpoint};
pub use update::UpdateUserRequest;
