//! User operations.

use tracing::info;

use crate::client::ConfluenceClient;
use crate::error::ConfluenceError;
use crate::models::ConfluenceUser;
use crate::types::UserRaw;

/// User lookups.
pub struct Users<'a> {
    client: &'a ConfluenceClient,
}

impl<'a> Users<'a> {
    pub(crate) fn new(client: &'a ConfluenceClient) -> Self {
        Self { client }
    }

    /// The user the session is authenticated as.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response lacks an identifier.
    pub fn current_user(&self) -> Result<ConfluenceUser, ConfluenceError> {
        info!("Getting current user");
        let url = format!("{}/user/current", self.client.rest_api_url());
        ConfluenceUser::from_raw(self.client.get_as::<UserRaw>(&url, &[])?)
    }

    /// Look up a user by account ID (Cloud) or user key (Server).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the user does not exist.
    pub fn user_by_account_id(&self, account_id: &str) -> Result<ConfluenceUser, ConfluenceError> {
        info!("Getting user {}", account_id);
        let url = format!("{}/user", self.client.rest_api_url());
        let param = if self.client.is_cloud() { "accountId" } else { "key" };
        ConfluenceUser::from_raw(
            self.client
                .get_as::<UserRaw>(&url, &[(param, account_id.to_owned())])?,
        )
    }
}
