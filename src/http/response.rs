use crate::auth::Redirect;
use crate::core::types::RedirectUri;

use tracing::{event, Level};
use url::Url;
use warp::http::header::{HeaderValue, LOCATION, SET_COOKIE};
use warp::http::StatusCode;
use warp::hyper::Body;
use warp::reply::{Reply, Response};

/// Appends `params` to `uri`, keeping any query it already has.
pub fn append_params(uri: &RedirectUri, params: impl serde::Serialize) -> Option<Url> {
    let mut url = Url::parse(&uri.0).ok()?;
    let new_qs = serde_urlencoded::to_string(params).ok()?;
    let pairs = form_urlencoded::parse(new_qs.as_bytes());
    url.query_pairs_mut().extend_pairs(pairs);
    Some(url)
}

pub fn see_other(location: &str) -> Response {
    match HeaderValue::from_str(location) {
        Ok(value) => {
            let mut response = Response::new(Body::empty());
            *response.status_mut() = StatusCode::SEE_OTHER;
            response.headers_mut().insert(LOCATION, value);
            response
        }
        Err(_) => {
            event!(Level::ERROR, "Redirect location is not a valid header value");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Adds a `Set-Cookie` header without replacing ones already present.
pub fn with_cookie(mut response: Response, cookie: &str) -> Response {
    match HeaderValue::from_str(cookie) {
        Ok(value) => {
            response.headers_mut().append(SET_COOKIE, value);
            response
        }
        Err(_) => {
            event!(Level::ERROR, "Cookie is not a valid header value");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

impl<T: serde::Serialize + Send> Reply for Redirect<T> {
    fn into_response(self) -> Response {
        match append_params(&self.uri, &self.params) {
            Some(url) => see_other(url.as_str()),
            None => {
                event!(Level::ERROR, uri = %self.uri, "Failed to build redirect");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}
