pub mod error;
pub mod reply;

use crate::auth::ClientCredentials;
use http_basic_auth::Credential as BasicCredentials;
use warp::{Filter, Rejection};

/// Form body with optional `client_id`/`client_secret` fields alongside
/// the request proper.
#[derive(serde::Deserialize)]
pub struct WithCredentials<T> {
    #[serde(default)]
    client_id: Option<String>,
    #[serde(default)]
    client_secret: Option<String>,
    #[serde(flatten)]
    body: T,
}

impl<T> WithCredentials<T> {
    /// Resolves credentials from a Basic `Authorization` header first,
    /// then from the form fields.
    pub fn split(self, authorization: Option<String>) -> (Option<ClientCredentials>, T) {
        let basic = authorization
            .and_then(|header| header.parse::<BasicCredentials>().ok())
            .map(|c| (c.user_id, c.password));

        let credentials = ClientCredentials::resolve(basic, self.client_id, self.client_secret);
        (credentials, self.body)
    }
}

/// Extracts client credentials and a form body. Missing credentials are
/// not a rejection; the handler decides how to report them.
pub fn body_with_credentials<T: serde::de::DeserializeOwned + Send + 'static>(
) -> impl Filter<Extract = ((Option<ClientCredentials>, T),), Error = Rejection> + Clone {
    warp::header::optional::<String>("authorization")
        .and(warp::body::content_length_limit(16 * 1024))
        .and(warp::body::form::<WithCredentials<T>>())
        .map(|authorization: Option<String>, body: WithCredentials<T>| body.split(authorization))
}
