use std::sync::Arc;

use tracing::{event, Level};
use url::Url;

use crate::config::ClientConfig;
use crate::core::types::AccessToken;
use crate::util::random::{random_string, CREDENTIAL_LENGTH};

pub mod error;

pub use error::FlowError;

/// Where to send the user, and the nonce to remember until they return.
#[derive(Debug, Clone)]
pub struct FlowStart {
    pub authorize_url: Url,
    pub state: String,
}

/// Query of the redirect back from the authorization server.
#[derive(Debug, Clone, Default)]
#[derive(serde::Deserialize)]
pub struct Callback {
    #[serde(default)]
    pub code: String,
    pub state: Option<String>,
    pub error: Option<String>,
}

#[derive(serde::Deserialize)]
struct TokenEndpointResponse {
    access_token: String,
}

/// Relying-party side of the authorization code grant.
#[derive(Debug, Clone)]
pub struct RelyingParty {
    config: Arc<ClientConfig>,
    http: reqwest::Client,
}

impl RelyingParty {
    pub fn new(config: Arc<ClientConfig>) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(config.exchange_timeout)
            .build()?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn begin_flow(&self) -> FlowStart {
        let state = random_string(CREDENTIAL_LENGTH);

        let mut authorize_url = self.config.authorize_endpoint.clone();
        authorize_url
            .query_pairs_mut()
            .append_pair("response_type", "code")
            .append_pair("client_id", &self.config.client_id)
            .append_pair("redirect_uri", &self.config.redirect_uri);
        if let Some(scope) = self.config.scope.as_deref().filter(|s| !s.is_empty()) {
            authorize_url.query_pairs_mut().append_pair("scope", scope);
        }
        authorize_url.query_pairs_mut().append_pair("state", &state);

        event!(Level::DEBUG, client_id = %self.config.client_id, "Starting authorization");
        FlowStart {
            authorize_url,
            state,
        }
    }

    /// Checks the callback against the nonce stored by `begin_flow`, then
    /// trades the code for a token.
    #[tracing::instrument(skip_all, fields(client_id = %self.config.client_id))]
    pub async fn complete_flow(
        &self,
        callback: Callback,
        stored_state: Option<&str>,
    ) -> Result<AccessToken, FlowError> {
        match (callback.state.as_deref(), stored_state) {
            (Some(received), Some(expected)) if !expected.is_empty() && received == expected => {}
            _ => {
                event!(Level::WARN, "Callback state does not match the stored nonce");
                return Err(FlowError::CsrfMismatch);
            }
        }

        if let Some(error) = callback.error {
            event!(Level::INFO, error = %error, "Authorization server returned an error");
            return Err(FlowError::Validation);
        }

        if callback.code.is_empty() {
            event!(Level::DEBUG, "Callback carries no code");
            return Err(FlowError::Validation);
        }

        self.exchange_code(&callback.code).await
    }

    async fn exchange_code(&self, code: &str) -> Result<AccessToken, FlowError> {
        let response = self
            .http
            .post(self.config.token_endpoint.clone())
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.config.redirect_uri.as_str()),
            ])
            .send()
            .await
            .map_err(|e| {
                event!(Level::ERROR, error = %e, timeout = e.is_timeout(), "Token request failed");
                FlowError::UpstreamExchange
            })?;

        let status = response.status();
        if !status.is_success() {
            event!(Level::ERROR, status = %status, "Token endpoint rejected the exchange");
            return Err(FlowError::UpstreamExchange);
        }

        let body: TokenEndpointResponse = response.json().await.map_err(|e| {
            event!(Level::ERROR, error = %e, "Undecodable token response");
            FlowError::UpstreamExchange
        })?;

        if body.access_token.is_empty() {
            event!(Level::ERROR, "Token response carries an empty access_token");
            return Err(FlowError::UpstreamExchange);
        }

        event!(Level::INFO, "Obtained access token");
        Ok(AccessToken(body.access_token))
    }
}
