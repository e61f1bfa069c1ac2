use crate::core::types::{AccessToken, RedirectUri, Scope};

use super::error::{ErrorResponse, ServerErrorKind};

pub type AccessTokenError = ErrorResponse<AccessTokenErrorKind>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub enum TokenType {
    Bearer,
}

/// Body of `POST /token`, minus the client credentials.
///
/// Fields default to empty so each missing piece maps onto its own
/// protocol error.
#[derive(Debug, Default)]
#[derive(serde::Deserialize)]
pub struct TokenRequest {
    #[serde(default)]
    pub grant_type: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub redirect_uri: Option<RedirectUri>,
    #[serde(default)]
    pub scope: Scope,
}

#[derive(Debug)]
#[derive(serde::Serialize)]
pub struct AccessTokenResponse {
    pub access_token: AccessToken,
    pub token_type: TokenType,
    pub scope: Scope,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[derive(serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessTokenErrorKind {
    InvalidRequest,
    InvalidClient,
    InvalidGrant,
    UnsupportedGrantType,
    ServerError,
}

impl AccessTokenErrorKind {
    pub fn description(&self) -> &'static str {
        use AccessTokenErrorKind::*;

        match self {
            InvalidRequest => "client id/secret required",
            InvalidClient => "invalid client ID or credential",
            InvalidGrant => "invalid code",
            UnsupportedGrantType => "unknown grant type",
            ServerError => "internal server error",
        }
    }
}

impl ServerErrorKind for AccessTokenErrorKind {
    fn server_error() -> Self {
        Self::ServerError
    }
}

impl From<AccessTokenErrorKind> for AccessTokenError {
    fn from(kind: AccessTokenErrorKind) -> Self {
        ErrorResponse::new(kind, kind.description())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_request_tolerates_missing_fields() {
        let req: TokenRequest = serde_urlencoded::from_str("grant_type=authorization_code")
            .unwrap();
        assert_eq!(req.grant_type, "authorization_code");
        assert_eq!(req.code, "");
        assert!(req.redirect_uri.is_none());
        assert!(req.scope.is_empty());
    }

    #[test]
    fn response_carries_bearer_type_and_scope() {
        let resp = AccessTokenResponse {
            access_token: AccessToken("t".to_string()),
            token_type: TokenType::Bearer,
            scope: Scope::from_delimited_parts("read"),
        };
        assert_eq!(
            serde_json::to_value(&resp).unwrap(),
            serde_json::json!({"access_token": "t", "token_type": "Bearer", "scope": "read"})
        );
    }
}
