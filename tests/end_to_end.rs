mod common;

use std::net::SocketAddr;
use std::sync::Arc;

use common::*;
use warp::http::header::SET_COOKIE;
use warp::http::StatusCode;

use kanmon::auth::Store;
use kanmon::config::ClientConfig;
use kanmon::core::types::{AccessToken, ClientId, HashedAccessToken};
use kanmon::http::relying_party;
use kanmon::http::server::Server;
use kanmon::provider::OAuth2Provider;
use kanmon::relying_party::RelyingParty;

fn set_cookies(response: &warp::http::Response<warp::hyper::body::Bytes>) -> Vec<String> {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect()
}

fn cookie_value(cookies: &[String], name: &str) -> Option<String> {
    let prefix = format!("{}=", name);
    cookies
        .iter()
        .filter_map(|c| c.strip_prefix(&prefix))
        .map(|rest| rest.split(';').next().unwrap_or("").to_string())
        .find(|v| !v.is_empty())
}

/// Serves the authorization server on a free port and returns a relying
/// party pointed at it.
fn start(provider: Arc<OAuth2Provider>) -> Arc<RelyingParty> {
    let (addr, server) =
        Server::new(provider).bind_ephemeral(SocketAddr::from(([127, 0, 0, 1], 0)));
    tokio::spawn(server);

    let base = url::Url::parse(&format!("http://{}/", addr)).unwrap();
    let config = ClientConfig::for_server(&base).unwrap();
    Arc::new(RelyingParty::new(Arc::new(config)).unwrap())
}

/// Drives the browser side up to the redirect back to the client.
async fn authorize(
    provider: &Arc<OAuth2Provider>,
    rp: &Arc<RelyingParty>,
) -> (String, url::Url) {
    let client = relying_party::routes(rp.clone());
    let server = Server::new(provider.clone()).routes();

    let start = warp::test::request().path("/authorize").reply(&client).await;
    assert_eq!(start.status(), StatusCode::SEE_OTHER);
    let state = cookie_value(&set_cookies(&start), "state").unwrap();

    let authorize_url = location(&start);
    let path = format!("{}?{}", authorize_url.path(), authorize_url.query().unwrap());
    let page = warp::test::request().path(&path).reply(&server).await;
    assert_eq!(page.status(), StatusCode::OK);

    let decided = warp::test::request()
        .method("POST")
        .path("/approve")
        .header("content-type", "application/x-www-form-urlencoded")
        .body(format!("reqid={}&approve=Approve", reqid_from_page(&body(&page))))
        .reply(&server)
        .await;
    assert_eq!(decided.status(), StatusCode::SEE_OTHER);

    (state, location(&decided))
}

#[tokio::test(flavor = "multi_thread")]
async fn relying_party_obtains_a_usable_token() {
    let provider = provider();
    let rp = start(provider.clone());
    let (state, callback) = authorize(&provider, &rp).await;

    assert_eq!(query_param(&callback, "state").as_deref(), Some(state.as_str()));

    let client = relying_party::routes(rp.clone());
    let response = warp::test::request()
        .path(&format!("/callback?{}", callback.query().unwrap()))
        .header("cookie", format!("state={}", state))
        .reply(&client)
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let cookies = set_cookies(&response);
    assert!(cookies.iter().any(|c| c.starts_with("state=;") && c.ends_with("Max-Age=0")));
    let token = cookie_value(&cookies, "access_token").unwrap();

    let hashed: HashedAccessToken = provider
        .hasher()
        .hash_without_salt(&AccessToken(token.clone()));
    let stored = provider.store().find_token(&hashed).unwrap().unwrap();
    assert_eq!(stored.client_id, ClientId(CLIENT_ID.to_string()));

    let index = warp::test::request()
        .path("/")
        .header("cookie", format!("access_token={}", token))
        .reply(&client)
        .await;
    assert!(body(&index).contains("holds an access token"));
}

#[tokio::test(flavor = "multi_thread")]
async fn forged_state_is_rejected_and_code_left_alone() {
    let provider = provider();
    let rp = start(provider.clone());
    let (_, callback) = authorize(&provider, &rp).await;

    let client = relying_party::routes(rp.clone());
    let response = warp::test::request()
        .path(&format!("/callback?{}", callback.query().unwrap()))
        .header("cookie", "state=not-the-nonce")
        .reply(&client)
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body(&response), "state not match");
    assert!(cookie_value(&set_cookies(&response), "access_token").is_none());

    // The code was never sent, so the server can still redeem it
    let code = query_param(&callback, "code").unwrap();
    let server = Server::new(provider.clone()).routes();
    let exchange = warp::test::request()
        .method("POST")
        .path("/token")
        .header("authorization", basic_auth(CLIENT_ID, CLIENT_SECRET))
        .header("content-type", "application/x-www-form-urlencoded")
        .body(format!("grant_type=authorization_code&code={}", code))
        .reply(&server)
        .await;
    assert_eq!(exchange.status(), StatusCode::OK);
}

#[tokio::test(flavor = "multi_thread")]
async fn callback_without_state_cookie_is_rejected() {
    let provider = provider();
    let rp = start(provider.clone());
    let (_, callback) = authorize(&provider, &rp).await;

    let client = relying_party::routes(rp);
    let response = warp::test::request()
        .path(&format!("/callback?{}", callback.query().unwrap()))
        .reply(&client)
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
