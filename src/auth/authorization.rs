use crate::core::models::AuthRequestData;
use crate::core::types::{AuthCode, RequestId};

use super::error::{ErrorResponse, ServerErrorKind};

pub type AuthorizationError = ErrorResponse<AuthorizationErrorKind>;

/// Query of `GET /authorize`.
///
/// Missing fields deserialize as empty so that they are reported as
/// `invalid parameters` instead of failing the route.
#[derive(Debug, Clone, Default)]
#[derive(serde::Deserialize)]
pub struct AuthorizationRequest {
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub redirect_uri: String,
    #[serde(default)]
    pub response_type: String,
    #[serde(default)]
    pub scope: String,
    pub state: Option<String>,
}

/// A validated, persisted request waiting for the user.
#[derive(Debug, Clone)]
pub struct ConsentPrompt {
    pub client_name: String,
    pub request: AuthRequestData,
}

/// Body of `POST /approve`.
#[derive(Debug, Clone, Default)]
#[derive(serde::Deserialize)]
pub struct ConsentRequest {
    #[serde(default)]
    pub reqid: String,
    #[serde(default)]
    pub approve: String,
}

impl ConsentRequest {
    pub fn new(reqid: &RequestId, decision: ConsentDecision) -> Self {
        Self {
            reqid: reqid.0.clone(),
            approve: decision.as_str().to_string(),
        }
    }

    pub fn decision(&self) -> ConsentDecision {
        ConsentDecision::from_form_value(&self.approve)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsentDecision {
    Approve,
    Deny,
}

impl ConsentDecision {
    /// Only the exact `Approve` button value grants access.
    pub fn from_form_value(value: &str) -> Self {
        match value {
            "Approve" => Self::Approve,
            _ => Self::Deny,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approve => "Approve",
            Self::Deny => "Deny",
        }
    }
}

/// Parameters appended to the relying party's redirect URI once a
/// pending request has been decided.
#[derive(Debug, Clone)]
#[derive(serde::Serialize)]
#[serde(untagged)]
pub enum AuthorizationResponse {
    Code(AuthorizationCodeResponse),
    Error(AuthorizationRedirectError),
}

#[derive(Debug, Clone)]
#[derive(serde::Serialize)]
pub struct AuthorizationCodeResponse {
    pub code: AuthCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

impl AuthorizationCodeResponse {
    pub fn new(code: AuthCode, state: Option<String>) -> Self {
        Self { code, state }
    }
}

#[derive(Debug, Clone)]
#[derive(serde::Serialize)]
pub struct AuthorizationRedirectError {
    #[serde(rename = "error")]
    pub kind: AuthorizationRedirectErrorKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[derive(serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorizationRedirectErrorKind {
    AccessDenied,
    UnsupportedResponseType,
}

impl AuthorizationRedirectErrorKind {
    pub fn with_state(self, state: Option<String>) -> AuthorizationResponse {
        AuthorizationResponse::Error(AuthorizationRedirectError { kind: self, state })
    }
}

/// Failures that cannot be redirected back to the relying party and are
/// shown to the user directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[derive(serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorizationErrorKind {
    InvalidRequest,
    UnknownClient,
    BadRedirect,
    NotFound,
    ServerError,
}

impl AuthorizationErrorKind {
    pub fn description(&self) -> &'static str {
        use AuthorizationErrorKind::*;

        match self {
            InvalidRequest => "invalid parameters",
            UnknownClient => "invalid client",
            BadRedirect => "invalid redirect uri",
            NotFound => "invalid request id",
            ServerError => "internal server error",
        }
    }
}

impl ServerErrorKind for AuthorizationErrorKind {
    fn server_error() -> Self {
        Self::ServerError
    }
}

impl From<AuthorizationErrorKind> for AuthorizationError {
    fn from(kind: AuthorizationErrorKind) -> Self {
        ErrorResponse::new(kind, kind.description())
    }
}
