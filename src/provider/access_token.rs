use crate::auth::{
    AccessTokenError, AccessTokenErrorKind, AccessTokenResponse, ClientCredentials, Store,
    TokenRequest, TokenType,
};
use crate::core::models::{Client, TokenData};
use crate::core::types::{AccessToken, AuthCode, GrantType};
use crate::provider::error::ResultExt;
use crate::util::random::FromRandom;

use super::OAuth2Provider;

use tracing::{event, Level};

impl OAuth2Provider {
    /// Exchanges an authorization code for an opaque bearer token.
    ///
    /// The client is authenticated before the code is touched, so bad
    /// credentials never burn a code.
    #[tracing::instrument(skip_all, fields(grant_type = %req.grant_type))]
    pub async fn access_token_request(
        &self,
        credentials: Option<ClientCredentials>,
        req: TokenRequest,
    ) -> Result<AccessTokenResponse, AccessTokenError> {
        event!(Level::TRACE, "Handling access token request");
        let credentials = credentials.ok_or_else(|| {
            event!(Level::DEBUG, "No client credentials supplied");
            AccessTokenErrorKind::InvalidRequest
        })?;

        let client = self.check_client_authentication(&credentials)?;

        match req.grant_type.parse::<GrantType>() {
            Ok(GrantType::AuthorizationCode) => self.authorization_code_grant(&client, req),
            Err(()) => {
                event!(Level::DEBUG, "Unsupported grant type");
                Err(AccessTokenErrorKind::UnsupportedGrantType.into())
            }
        }
    }

    fn authorization_code_grant(
        &self,
        client: &Client,
        req: TokenRequest,
    ) -> Result<AccessTokenResponse, AccessTokenError> {
        event!(Level::TRACE, client_id = %client.id, "Handling authorization_code grant");
        if req.code.is_empty() {
            return Err(AccessTokenErrorKind::InvalidGrant.into());
        }

        let hashed_code = self.hasher.hash_without_salt(&AuthCode(req.code));

        let data = self
            .store
            .consume_code(&client.id, &hashed_code)
            .or_server_error("Failed to consume authorization code")?
            .ok_or_else(|| {
                event!(
                    Level::WARN,
                    client_id = %client.id,
                    "Authorization code is unknown, already used, or bound to another client"
                );
                AccessTokenErrorKind::InvalidGrant
            })?;

        if let Some(uri) = req.redirect_uri.filter(|u| !u.0.is_empty()) {
            if uri != data.redirect_uri {
                event!(Level::WARN, client_id = %client.id, "redirect_uri does not match");
                return Err(AccessTokenErrorKind::InvalidGrant.into());
            }
        }

        let scope = if req.scope.is_empty() {
            data.scope
        } else if data.scope.contains_all(&req.scope) {
            req.scope
        } else {
            event!(
                Level::WARN,
                client_id = %client.id,
                scope = %req.scope,
                "Requested scope exceeds the granted scope"
            );
            return Err(AccessTokenErrorKind::InvalidGrant.into());
        };

        let access_token = AccessToken::from_random();
        let record = TokenData::new(
            self.hasher.hash_without_salt(&access_token),
            client.id.clone(),
            scope.clone(),
        );
        self.store
            .store_token(record)
            .or_server_error("Failed to store access token")?;

        event!(Level::INFO, client_id = %client.id, scope = %scope, "Issued access token");
        Ok(AccessTokenResponse {
            access_token,
            token_type: TokenType::Bearer,
            scope,
        })
    }
}
