use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{event, Level};
use warp::Filter;

use crate::provider::OAuth2Provider;

mod endpoints;

use endpoints::oauth::oauth_endpoint;

use super::encoding::error::handle_reject;

/// Authorization server: consent UI plus the token endpoint.
#[derive(Debug)]
pub struct Server {
    provider: Arc<OAuth2Provider>,
}

impl Server {
    pub fn new(provider: Arc<OAuth2Provider>) -> Self {
        Self {
            provider: Arc::clone(&provider),
        }
    }

    pub fn routes(
        &self,
    ) -> impl warp::Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
        oauth_endpoint(self.provider.clone())
            .recover(handle_reject)
            .with(warp::log("kanmon::http"))
    }

    pub async fn serve(self, addr: SocketAddr) {
        event!(Level::INFO, %addr, "Authorization server listening");
        warp::serve(self.routes()).run(addr).await;
    }

    /// Binds to `addr` (port 0 picks a free one) and returns the bound
    /// address with the server future.
    pub fn bind_ephemeral(self, addr: SocketAddr) -> (SocketAddr, impl Future<Output = ()>) {
        warp::serve(self.routes()).bind_ephemeral(addr)
    }
}
