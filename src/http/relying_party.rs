use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{event, Level};
use warp::reply::{Reply, Response};
use warp::Filter;

use super::encoding::error::flow_error_response;
use super::pages::IndexPage;
use super::response::{see_other, with_cookie};
use crate::relying_party::{Callback, RelyingParty};

pub const STATE_COOKIE: &str = "state";
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// Lifetime of the state nonce, in seconds.
const STATE_MAX_AGE: u64 = 300;

fn state_cookie(state: &str) -> String {
    format!(
        "{}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
        STATE_COOKIE, state, STATE_MAX_AGE
    )
}

fn clear_state_cookie() -> String {
    format!("{}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0", STATE_COOKIE)
}

fn access_token_cookie(token: &str) -> String {
    format!("{}={}; HttpOnly; SameSite=Lax; Path=/", ACCESS_TOKEN_COOKIE, token)
}

pub fn routes(
    rp: Arc<RelyingParty>,
) -> impl Filter<Extract = (impl Reply,), Error = warp::Rejection> + Clone {
    let with_rp = warp::any().map(move || rp.clone());

    let index = warp::path::end()
        .and(warp::get())
        .and(with_rp.clone())
        .and(warp::cookie::optional::<String>(ACCESS_TOKEN_COOKIE))
        .map(|rp: Arc<RelyingParty>, token: Option<String>| IndexPage {
            client_id: rp.config().client_id.clone(),
            has_token: token.map_or(false, |t| !t.is_empty()),
        });

    let authorize = warp::path!("authorize")
        .and(warp::get())
        .and(with_rp.clone())
        .map(|rp: Arc<RelyingParty>| {
            let start = rp.begin_flow();
            with_cookie(see_other(start.authorize_url.as_str()), &state_cookie(&start.state))
        });

    let callback = warp::path!("callback")
        .and(warp::get())
        .and(with_rp)
        .and(warp::query::<Callback>())
        .and(warp::cookie::optional::<String>(STATE_COOKIE))
        .then(
            |rp: Arc<RelyingParty>, callback: Callback, stored: Option<String>| async move {
                let response: Response = match rp.complete_flow(callback, stored.as_deref()).await
                {
                    Ok(token) => with_cookie(
                        warp::reply::json(&"ok").into_response(),
                        &access_token_cookie(token.as_ref()),
                    ),
                    Err(e) => {
                        event!(Level::INFO, error = %e, "Authorization flow failed");
                        flow_error_response(e)
                    }
                };
                // The nonce is single-use whatever the outcome
                with_cookie(response, &clear_state_cookie())
            },
        );

    index
        .or(authorize)
        .or(callback)
        .with(warp::log("kanmon::relying_party"))
}

pub async fn serve(rp: Arc<RelyingParty>, addr: SocketAddr) {
    event!(Level::INFO, %addr, "Client listening");
    warp::serve(routes(rp)).run(addr).await;
}

pub fn bind_ephemeral(
    rp: Arc<RelyingParty>,
    addr: SocketAddr,
) -> (SocketAddr, impl Future<Output = ()>) {
    warp::serve(routes(rp)).bind_ephemeral(addr)
}
