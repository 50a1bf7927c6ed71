//! User model.

use serde::Serialize;

use crate::error::ConfluenceError;
use crate::types::UserRaw;

/// A Confluence user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfluenceUser {
    /// Account ID (Cloud) or user key (Server).
    pub account_id: String,
    /// Display name.
    pub display_name: Option<String>,
    /// Email, when visible to the session.
    pub email: Option<String>,
    /// Profile picture path.
    pub profile_picture: Option<String>,
    /// Whether the account is active.
    pub active: bool,
}

impl ConfluenceUser {
    pub(crate) fn from_raw(raw: UserRaw) -> Result<Self, ConfluenceError> {
        let account_id = raw
            .identifier()
            .ok_or_else(|| ConfluenceError::malformed("accountId"))?
            .to_owned();
        Ok(Self {
            account_id,
            display_name: raw.name().map(str::to_owned),
            email: raw.email,
            profile_picture: raw.profile_picture.and_then(|p| p.path),
            active: raw.account_status.as_deref().is_none_or(|s| s == "active"),
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_cloud_user() {
        let raw: UserRaw = serde_json::from_value(json!({
            "type": "known",
            "accountId": "acc-1",
            "displayName": "Ada Lovelace",
            "email": "ada@example.com",
            "accountStatus": "active",
            "profilePicture": {"path": "/wiki/aa-avatar/acc-1", "isDefault": false}
        }))
        .unwrap();

        let user = ConfluenceUser::from_raw(raw).unwrap();

        assert_eq!(
            user,
            ConfluenceUser {
                account_id: "acc-1".to_owned(),
                display_name: Some("Ada Lovelace".to_owned()),
                email: Some("ada@example.com".to_owned()),
                profile_picture: Some("/wiki/aa-avatar/acc-1".to_owned()),
                active: true,
            }
        );
    }

    #[test]
    fn test_inactive_user() {
        let raw: UserRaw =
            serde_json::from_value(json!({"accountId": "x", "accountStatus": "inactive"})).unwrap();
        assert!(!ConfluenceUser::from_raw(raw).unwrap().active);
    }

    #[test]
    fn test_server_user_falls_back_to_user_key() {
        let raw: UserRaw =
            serde_json::from_value(json!({"userKey": "8a7f", "username": "jdoe"})).unwrap();
        let user = ConfluenceUser::from_raw(raw).unwrap();
        assert_eq!(user.account_id, "8a7f");
        assert_eq!(user.display_name.as_deref(), Some("jdoe"));
    }

    #[test]
    fn test_user_without_identifier_is_malformed() {
        let raw: UserRaw = serde_json::from_value(json!({"displayName": "ghost"})).unwrap();
        assert!(ConfluenceUser::from_raw(raw).is_err());
    }
}
