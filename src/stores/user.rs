//! Defines the user store trait.

use crate::{
    Error,
    user::{NewUser, User, UserChanges, UserID},
};

/// Handles the creation, retrieval and modification of users.
pub trait UserStore: Send + Sync {
    /// Create a new user.
    ///
    /// Returns [Error::DuplicateEmail] if the email is already registered.
    fn create(&self, user: NewUser) -> Result<User, Error>;

    /// Get a user by their ID.
    ///
    /// Returns [Error::UserNotFound] if no user has the ID `id`.
    fn get(&self, id: UserID) -> Result<User, Error>;

    /// Get a user by their email.
    ///
    /// Returns [Error::UserNotFound] if no user has the email `email`.
    fn get_by_email(&self, email: &str) -> Result<User, Error>;

    /// Get every user, most recently created first.
    fn get_all(&self) -> Result<Vec<User>, Error>;

    /// Apply `changes` to the user with the ID `id` and return the updated user.
    ///
    /// Returns [Error::UserNotFound] if no user has the ID `id`.
    fn update(&self, id: UserID, changes: UserChanges) -> Result<User, Error>;
}
