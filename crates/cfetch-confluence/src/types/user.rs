//! Confluence user types.

use serde::Deserialize;

/// User as returned by v1 endpoints and embedded in content.
///
/// Cloud identifies users by `accountId`; Server/Data Center by
/// `userKey` and `username`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UserRaw {
    #[serde(default)]
    pub account_id: Option<String>,
    #[serde(default)]
    pub user_key: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub public_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub profile_picture: Option<ProfilePicture>,
    #[serde(default)]
    pub account_status: Option<String>,
}

/// Profile picture reference.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ProfilePicture {
    #[serde(default)]
    pub path: Option<String>,
}

impl UserRaw {
    /// Best available stable identifier.
    pub(crate) fn identifier(&self) -> Option<&str> {
        self.account_id
            .as_deref()
            .or(self.user_key.as_deref())
            .or(self.username.as_deref())
    }

    /// Best available human-readable name.
    pub(crate) fn name(&self) -> Option<&str> {
        self.display_name
            .as_deref()
            .or(self.public_name.as_deref())
            .or(self.username.as_deref())
    }
}
