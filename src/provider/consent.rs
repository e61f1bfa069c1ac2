use crate::auth::{
    AuthorizationCodeResponse, AuthorizationError, AuthorizationErrorKind,
    AuthorizationRedirectErrorKind, AuthorizationResponse, ConsentDecision, ConsentRequest,
    Redirect, Store,
};
use crate::core::types::RequestId;
use crate::provider::error::ResultExt;

use tracing::{event, Level};

use super::OAuth2Provider;

impl OAuth2Provider {
    /// Resolves the user's decision on a pending request. The request is
    /// removed from the store whatever the outcome, so it can be decided
    /// only once.
    ///
    /// `state` is echoed back untouched on every redirect.
    #[tracing::instrument(skip_all, fields(decision = ?req.decision()))]
    pub async fn consent_request(
        &self,
        req: ConsentRequest,
    ) -> Result<Redirect<AuthorizationResponse>, AuthorizationError> {
        if req.reqid.is_empty() {
            event!(Level::DEBUG, "Missing request id");
            return Err(AuthorizationErrorKind::InvalidRequest.into());
        }

        let decision = req.decision();
        let request = self
            .store
            .take_request(&RequestId(req.reqid))
            .or_server_error("Failed to load authorization request")?
            .ok_or_else(|| {
                event!(Level::WARN, "No pending authorization request with that id");
                AuthorizationErrorKind::NotFound
            })?;

        let response = match decision {
            ConsentDecision::Deny => {
                event!(Level::INFO, client_id = %request.client_id, "Access denied by user");
                AuthorizationRedirectErrorKind::AccessDenied.with_state(request.state)
            }
            ConsentDecision::Approve if !request.response_type.is_code() => {
                event!(
                    Level::INFO,
                    client_id = %request.client_id,
                    response_type = %request.response_type.0,
                    "Unsupported response type"
                );
                AuthorizationRedirectErrorKind::UnsupportedResponseType.with_state(request.state)
            }
            ConsentDecision::Approve => {
                let code = self
                    .issue_code(&request.client_id, &request.redirect_uri, &request.scope)
                    .await
                    .or_server_error("Failed to issue authorization code")?;

                AuthorizationResponse::Code(AuthorizationCodeResponse::new(code, request.state))
            }
        };

        Ok(Redirect::new(request.redirect_uri, response))
    }
}

#[cfg(test)]
mod tests {
    use crate::auth::{
        AuthorizationErrorKind, AuthorizationRedirectErrorKind, AuthorizationRequest,
        AuthorizationResponse, ConsentDecision, ConsentRequest, ConsentPrompt,
    };
    use crate::core::types::RequestId;
    use crate::provider::tests::{provider, CLIENT_ID, REDIRECT_URI};
    use crate::provider::OAuth2Provider;

    async fn pending(
        provider: &OAuth2Provider,
        response_type: &str,
        state: Option<&str>,
    ) -> ConsentPrompt {
        provider
            .authorization_request(AuthorizationRequest {
                client_id: CLIENT_ID.to_string(),
                redirect_uri: REDIRECT_URI.to_string(),
                response_type: response_type.to_string(),
                scope: "read".to_string(),
                state: state.map(ToString::to_string),
            })
            .await
            .unwrap()
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn approval_redirects_with_code_and_verbatim_state() {
        let provider = provider();
        let state = "a b&c=d/é%20";
        let prompt = pending(&provider, "code", Some(state)).await;

        let redirect = provider
            .consent_request(ConsentRequest::new(&prompt.request.id, ConsentDecision::Approve))
            .await
            .unwrap();

        assert_eq!(redirect.uri.0, REDIRECT_URI);
        match redirect.params {
            AuthorizationResponse::Code(resp) => {
                assert!(!resp.code.0.is_empty());
                assert_eq!(resp.state.as_deref(), Some(state));
            }
            other => panic!("unexpected response: {:?}", other),
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn denial_redirects_with_access_denied() {
        let provider = provider();
        let prompt = pending(&provider, "code", Some("s1")).await;

        let redirect = provider
            .consent_request(ConsentRequest::new(&prompt.request.id, ConsentDecision::Deny))
            .await
            .unwrap();

        match redirect.params {
            AuthorizationResponse::Error(e) => {
                assert_eq!(e.kind, AuthorizationRedirectErrorKind::AccessDenied);
                assert_eq!(e.state.as_deref(), Some("s1"));
            }
            other => panic!("unexpected response: {:?}", other),
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn non_code_response_type_is_unsupported() {
        let provider = provider();
        let prompt = pending(&provider, "token", None).await;

        let redirect = provider
            .consent_request(ConsentRequest::new(&prompt.request.id, ConsentDecision::Approve))
            .await
            .unwrap();

        match redirect.params {
            AuthorizationResponse::Error(e) => {
                assert_eq!(e.kind, AuthorizationRedirectErrorKind::UnsupportedResponseType)
            }
            other => panic!("unexpected response: {:?}", other),
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn request_cannot_be_decided_twice() {
        let provider = provider();
        let prompt = pending(&provider, "code", None).await;

        provider
            .consent_request(ConsentRequest::new(&prompt.request.id, ConsentDecision::Deny))
            .await
            .unwrap();
        let err = provider
            .consent_request(ConsentRequest::new(&prompt.request.id, ConsentDecision::Approve))
            .await
            .unwrap_err();
        assert_eq!(err.kind, AuthorizationErrorKind::NotFound);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn empty_or_unknown_request_id() {
        let provider = provider();

        let err = provider
            .consent_request(ConsentRequest::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind, AuthorizationErrorKind::InvalidRequest);

        let err = provider
            .consent_request(ConsentRequest::new(
                &RequestId("missing".to_string()),
                ConsentDecision::Approve,
            ))
            .await
            .unwrap_err();
        assert_eq!(err.kind, AuthorizationErrorKind::NotFound);
    }
}
