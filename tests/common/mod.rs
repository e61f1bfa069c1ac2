#![allow(dead_code)]

use std::sync::Arc;

use kanmon::auth::Store;
use kanmon::core::models::Client;
use kanmon::core::types::{ClientId, ClientSecret, RedirectUri};
use kanmon::db::DbStore;
use kanmon::provider::OAuth2Provider;
use kanmon::util::hash::HashingService;

pub const CLIENT_ID: &str = "oauth-client-1";
pub const CLIENT_SECRET: &str = "oauth-client-secret-1";
pub const REDIRECT_URI: &str = "http://localhost:9090/callback";

/// An in-memory provider with the reference client registered.
pub fn provider() -> Arc<OAuth2Provider> {
    let store = DbStore::in_memory().unwrap();
    let hasher = HashingService::with_secret_key("test-secret".to_string());

    let secret = hasher.hash(&ClientSecret(CLIENT_SECRET.to_string())).unwrap();
    store
        .put_client(Client {
            id: ClientId(CLIENT_ID.to_string()),
            name: "Example client".to_string(),
            secret,
            redirect_uris: vec![RedirectUri(REDIRECT_URI.to_string())],
        })
        .unwrap();

    Arc::new(OAuth2Provider::new(store, hasher))
}

pub fn basic_auth(id: &str, secret: &str) -> String {
    format!("Basic {}", base64::encode(format!("{}:{}", id, secret)))
}

/// Pulls the hidden `reqid` out of a rendered consent page.
pub fn reqid_from_page(html: &str) -> String {
    let marker = r#"name="reqid" value=""#;
    let start = html.find(marker).unwrap() + marker.len();
    let end = start + html[start..].find('"').unwrap();
    html[start..end].to_string()
}

pub fn authorize_path(state: &str) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("response_type", "code")
        .append_pair("client_id", CLIENT_ID)
        .append_pair("redirect_uri", REDIRECT_URI)
        .append_pair("scope", "read write")
        .append_pair("state", state)
        .finish();
    format!("/authorize?{}", query)
}

pub fn location(response: &warp::http::Response<warp::hyper::body::Bytes>) -> url::Url {
    let location = response.headers()[warp::http::header::LOCATION].to_str().unwrap();
    url::Url::parse(location).unwrap()
}

pub fn query_param(url: &url::Url, name: &str) -> Option<String> {
    url.query_pairs()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.into_owned())
}

pub fn body(response: &warp::http::Response<warp::hyper::body::Bytes>) -> String {
    String::from_utf8(response.body().to_vec()).unwrap()
}
