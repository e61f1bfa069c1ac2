use crate::auth::{AccessTokenError, AccessTokenErrorKind, AuthorizationError};
use crate::http::pages::ErrorPage;
use crate::relying_party::FlowError;

use warp::http::StatusCode;
use warp::reply::Response;
use warp::{Rejection, Reply};

#[derive(Debug, Clone)]
pub enum AuthRejection {
    Authorization(AuthorizationError),
    AccessToken(AccessTokenError),
}

impl warp::reject::Reject for AuthRejection {}

impl From<AuthorizationError> for AuthRejection {
    fn from(error: AuthorizationError) -> Self {
        Self::Authorization(error)
    }
}

impl From<AccessTokenError> for AuthRejection {
    fn from(error: AccessTokenError) -> Self {
        Self::AccessToken(error)
    }
}

pub fn access_token_status(kind: AccessTokenErrorKind) -> StatusCode {
    match kind {
        AccessTokenErrorKind::InvalidClient => StatusCode::FORBIDDEN,
        AccessTokenErrorKind::ServerError => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::BAD_REQUEST,
    }
}

pub fn flow_error_status(error: FlowError) -> StatusCode {
    match error {
        FlowError::CsrfMismatch | FlowError::Validation => StatusCode::BAD_REQUEST,
        FlowError::UpstreamExchange => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Plain-text body with the matching status.
pub fn flow_error_response(error: FlowError) -> Response {
    warp::reply::with_status(error.to_string(), flow_error_status(error)).into_response()
}

pub async fn handle_reject(err: Rejection) -> Result<Response, Rejection> {
    match err.find::<AuthRejection>() {
        Some(AuthRejection::Authorization(e)) => Ok(ErrorPage::from(e).into_response()),
        Some(AuthRejection::AccessToken(e)) => {
            let resp = warp::reply::json(e);
            Ok(warp::reply::with_status(resp, access_token_status(e.kind)).into_response())
        }
        None => Err(err),
    }
}
