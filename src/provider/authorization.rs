use crate::auth::{
    AuthorizationError, AuthorizationErrorKind, AuthorizationRequest, ConsentPrompt, Store,
};
use crate::core::models::AuthRequestData;
use crate::core::types::{ClientId, RedirectUri, ResponseType, Scope};
use crate::provider::error::ResultExt;

use tracing::{event, Level};

use super::OAuth2Provider;

impl OAuth2Provider {
    /// Validates an authorize call and parks it until the user decides.
    #[tracing::instrument(skip_all, fields(client_id = %req.client_id))]
    pub async fn authorization_request(
        &self,
        req: AuthorizationRequest,
    ) -> Result<ConsentPrompt, AuthorizationError> {
        if req.client_id.is_empty() || req.redirect_uri.is_empty() || req.response_type.is_empty()
        {
            event!(Level::DEBUG, "Missing authorization parameters");
            return Err(AuthorizationErrorKind::InvalidRequest.into());
        }

        let client_id = ClientId(req.client_id);
        let redirect_uri = RedirectUri(req.redirect_uri);

        let client = self
            .store
            .get_client(&client_id)
            .or_server_error("Failed to look up client")?
            .ok_or_else(|| {
                event!(Level::WARN, "Unknown client");
                AuthorizationErrorKind::UnknownClient
            })?;

        if !client.allows_redirect(&redirect_uri) {
            event!(
                Level::WARN,
                redirect_uri = %redirect_uri,
                "Redirect uri is not registered for client"
            );
            return Err(AuthorizationErrorKind::BadRedirect.into());
        }

        let data = AuthRequestData::new(
            client.id.clone(),
            redirect_uri,
            ResponseType(req.response_type),
            Scope::from_delimited_parts(&req.scope),
            req.state,
        );

        let request = self
            .store
            .store_request(data)
            .or_server_error("Failed to store authorization request")?;

        event!(Level::DEBUG, request_id = %request.id, "Awaiting consent");
        Ok(ConsentPrompt {
            client_name: client.name,
            request,
        })
    }
}
