//! Validation for partial user updates.

use serde::{Deserialize, Deserializer};
use utoipa::ToSchema;

use crate::{
    Error,
    user::{Role, UserChanges},
};

/// The JSON body for updating a user.
///
/// Every field is optional. `phone` tells apart a missing key (keep the
/// current number) from `null` or `""` (remove it).
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateUserRequest {
    /// The new display name.
    #[serde(default)]
    pub name: Option<String>,
    /// The new role, either `USER` or `ADMIN`.
    #[serde(default)]
    pub role: Option<String>,
    /// The new phone number.
    #[serde(default, deserialize_with = "deserialize_present")]
    #[schema(value_type = Option<String>)]
    pub phone: Option<Option<String>>,
}

/// Wrap any present value, including `null`, in `Some` so that an absent key
/// (which falls back to the `Default` of `None`) can be told apart from it.
fn deserialize_present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl UpdateUserRequest {
    /// Check the supplied fields and convert them into [UserChanges].
    ///
    /// # Errors
    /// Returns [Error::InvalidInput] if the role is not `USER` or `ADMIN`, or
    /// if the name is blank. The name and phone are trimmed.
    pub fn validate(self) -> Result<UserChanges, Error> {
        let role = self.role.as_deref().map(str::parse::<Role>).transpose()?;

        let name = match self.name {
            Some(name) if name.trim().is_empty() => {
                return Err(Error::InvalidInput("Name cannot be empty".to_owned()));
            }
            name => name.map(|name| name.trim().to_owned()),
        };

        let phone = self.phone.map(|phone| {
            phone
                .map(|number| number.trim().to_owned())
                .filter(|number| !number.is_empty())
        });

        Ok(UserChanges { name, role, phone })
    }
}
