use crate::auth::Store;
use crate::core::models::AuthCodeData;
use crate::core::types::{AuthCode, ClientId, RedirectUri, Scope};
use crate::provider::error::Error;
use crate::util::random::FromRandom;

use tracing::{event, Level};

use super::OAuth2Provider;

impl OAuth2Provider {
    /// Mints a single-use code bound to the client, its redirect and scope.
    /// Only the digest is persisted; the plaintext goes back to the caller.
    #[tracing::instrument(skip_all, fields(client_id = %client_id))]
    pub async fn issue_code(
        &self,
        client_id: &ClientId,
        redirect_uri: &RedirectUri,
        scope: &Scope,
    ) -> Result<AuthCode, Error> {
        let code = AuthCode::from_random();
        let data = AuthCodeData::new(
            self.hasher.hash_without_salt(&code),
            client_id.clone(),
            redirect_uri.clone(),
            scope.clone(),
        );

        self.store.store_code(data)?;

        event!(Level::DEBUG, scope = %scope, "Issued authorization code");
        Ok(code)
    }
}
