use crate::auth::{AccessTokenError, AccessTokenErrorKind, ClientCredentials, Store};
use crate::core::models::Client;
use crate::db::DbStore;
use crate::util::hash::HashingService;

pub mod access_token;
pub mod authorization;
pub mod code;
pub mod consent;
pub mod error;

use error::ResultExt;
use tracing::{event, Level};

/// The authorization server. Holds no per-flow state; every operation
/// re-reads what it needs from the store.
#[derive(Debug)]
pub struct OAuth2Provider {
    store: DbStore,
    hasher: HashingService,
}

impl OAuth2Provider {
    pub fn new(store: DbStore, hasher: HashingService) -> Self {
        Self { store, hasher }
    }

    pub fn store(&self) -> &DbStore {
        &self.store
    }

    pub fn hasher(&self) -> &HashingService {
        &self.hasher
    }

    /// Unknown client and wrong secret are indistinguishable to the caller.
    fn check_client_authentication(
        &self,
        cred: &ClientCredentials,
    ) -> Result<Client, AccessTokenError> {
        let client = self
            .store
            .get_client(&cred.client_id)
            .or_server_error("Failed to look up client")?;

        if let Some(c) = client {
            let verified = self
                .hasher
                .verify(&cred.client_secret, &c.secret)
                .or_server_error("Failed to verify client secret")?;
            if verified {
                return Ok(c);
            }
        }

        event!(
            Level::WARN,
            client_id = %cred.client_id,
            "Client authentication failed"
        );
        Err(AccessTokenErrorKind::InvalidClient.into())
    }
}
