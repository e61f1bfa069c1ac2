use askama::Template;
use tracing::{event, Level};
use warp::http::StatusCode;
use warp::reply::{Reply, Response};

use crate::auth::{AuthorizationError, AuthorizationErrorKind, ConsentPrompt};

#[derive(Template)]
#[template(path = "consent.html")]
pub struct ConsentPage {
    pub client_name: String,
    pub scopes: Vec<String>,
    pub reqid: String,
}

impl From<ConsentPrompt> for ConsentPage {
    fn from(prompt: ConsentPrompt) -> Self {
        Self {
            client_name: prompt.client_name,
            scopes: prompt.request.scope.as_parts(),
            reqid: prompt.request.id.0,
        }
    }
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorPage {
    pub message: String,
    status: StatusCode,
}

impl ErrorPage {
    pub fn new(message: impl Into<String>, status: StatusCode) -> Self {
        Self {
            message: message.into(),
            status,
        }
    }
}

impl From<&AuthorizationError> for ErrorPage {
    fn from(error: &AuthorizationError) -> Self {
        let status = match error.kind {
            AuthorizationErrorKind::ServerError => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        };
        let message = error
            .description
            .clone()
            .unwrap_or_else(|| error.kind.description().to_string());
        Self::new(message, status)
    }
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexPage {
    pub client_id: String,
    pub has_token: bool,
}

pub fn render(page: &impl Template, status: StatusCode) -> Response {
    match page.render() {
        Ok(html) => warp::reply::with_status(warp::reply::html(html), status).into_response(),
        Err(e) => {
            event!(Level::ERROR, error = %e, "Failed to render template");
            warp::reply::with_status("internal server error", StatusCode::INTERNAL_SERVER_ERROR)
                .into_response()
        }
    }
}

impl Reply for ConsentPage {
    fn into_response(self) -> Response {
        render(&self, StatusCode::OK)
    }
}

impl Reply for ErrorPage {
    fn into_response(self) -> Response {
        render(&self, self.status)
    }
}

impl Reply for IndexPage {
    fn into_response(self) -> Response {
        render(&self, StatusCode::OK)
    }
}
