use std::sync::Arc;

use warp::Filter;

use crate::auth::{AuthorizationRequest, ConsentRequest, TokenRequest};
use crate::http::encoding::{self, reply};
use crate::http::pages::ConsentPage;
use crate::provider::OAuth2Provider;

pub fn oauth_endpoint(
    provider: Arc<OAuth2Provider>,
) -> impl warp::Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let with_provider = warp::any().map(move || provider.clone());

    let index = warp::path::end()
        .and(warp::get())
        .map(|| warp::reply::json(&"ok"));

    let authorize = warp::path!("authorize")
        .and(warp::get())
        .and(with_provider.clone())
        .and(warp::query::<AuthorizationRequest>())
        .and_then(
            |provider: Arc<OAuth2Provider>, req: AuthorizationRequest| async move {
                let result = provider.authorization_request(req).await;
                reply::reply(result.map(ConsentPage::from))
            },
        );

    // Decided requests always end in a redirect back to the client
    let approve = warp::path!("approve")
        .and(warp::post())
        .and(with_provider.clone())
        .and(warp::body::content_length_limit(4 * 1024))
        .and(warp::body::form::<ConsentRequest>())
        .and_then(
            |provider: Arc<OAuth2Provider>, req: ConsentRequest| async move {
                reply::reply(provider.consent_request(req).await)
            },
        );

    // Either a direct success or a direct error
    let token = warp::path!("token")
        .and(warp::post())
        .and(with_provider)
        .and(encoding::body_with_credentials::<TokenRequest>())
        .and_then(
            |provider: Arc<OAuth2Provider>, (credentials, req)| async move {
                let result = provider.access_token_request(credentials, req).await;
                reply::json_encode(result)
            },
        );

    index.or(authorize).or(approve).or(token)
}
