use std::sync::Arc;
use std::time::Duration;

use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use kanmon::config::ClientConfig;
use kanmon::relying_party::{Callback, FlowError, RelyingParty};

fn relying_party(server: &MockServer, timeout: Duration) -> RelyingParty {
    let base = url::Url::parse(&server.uri()).unwrap();
    let mut config = ClientConfig::for_server(&base).unwrap();
    config.exchange_timeout = timeout;
    RelyingParty::new(Arc::new(config)).unwrap()
}

fn callback(code: &str) -> Callback {
    Callback {
        code: code.to_string(),
        state: Some("nonce".to_string()),
        error: None,
    }
}

#[tokio::test]
async fn successful_exchange_returns_the_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .and(header(
            "authorization",
            format!(
                "Basic {}",
                base64::encode("oauth-client-1:oauth-client-secret-1")
            )
            .as_str(),
        ))
        .and(body_string_contains("grant_type=authorization_code"))
        .and(body_string_contains("code=the-code"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "tok-1",
            "token_type": "Bearer",
            "scope": ""
        })))
        .expect(1)
        .mount(&server)
        .await;

    let rp = relying_party(&server, Duration::from_secs(5));
    let token = rp.complete_flow(callback("the-code"), Some("nonce")).await.unwrap();
    assert_eq!(token.as_ref(), "tok-1");
}

#[tokio::test]
async fn rejected_exchange_is_an_upstream_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": "invalid_grant",
            "error_description": "invalid code"
        })))
        .mount(&server)
        .await;

    let rp = relying_party(&server, Duration::from_secs(5));
    let result = rp.complete_flow(callback("stale"), Some("nonce")).await;
    assert_eq!(result.unwrap_err(), FlowError::UpstreamExchange);
}

#[tokio::test]
async fn malformed_response_is_an_upstream_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let rp = relying_party(&server, Duration::from_secs(5));
    let result = rp.complete_flow(callback("c"), Some("nonce")).await;
    assert_eq!(result.unwrap_err(), FlowError::UpstreamExchange);
}

#[tokio::test]
async fn slow_server_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"access_token": "late"}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let rp = relying_party(&server, Duration::from_millis(200));
    let result = rp.complete_flow(callback("c"), Some("nonce")).await;
    assert_eq!(result.unwrap_err(), FlowError::UpstreamExchange);
}

#[tokio::test]
async fn state_mismatch_never_contacts_the_server() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let rp = relying_party(&server, Duration::from_secs(5));
    let result = rp.complete_flow(callback("c"), Some("other")).await;
    assert_eq!(result.unwrap_err(), FlowError::CsrfMismatch);
}
