use crate::util::random::FromRandom;

use super::types::*;

/// A registered relying party.
#[derive(Debug, Clone)]
pub struct Client {
    pub id: ClientId,
    pub name: String,
    pub secret: HashedClientSecret,
    pub redirect_uris: Vec<RedirectUri>,
}

impl Client {
    /// Exact string equality against the registered set; no prefix or
    /// wildcard matching.
    pub fn allows_redirect(&self, uri: &RedirectUri) -> bool {
        self.redirect_uris.iter().any(|registered| registered == uri)
    }
}

/// One pending `/authorize` call awaiting the user's decision.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthRequestData {
    pub id: RequestId,
    pub client_id: ClientId,
    pub response_type: ResponseType,
    pub redirect_uri: RedirectUri,
    pub state: Option<String>,
    pub scope: Scope,
}

impl AuthRequestData {
    pub fn new(
        client_id: ClientId,
        redirect_uri: RedirectUri,
        response_type: ResponseType,
        scope: Scope,
        state: Option<String>,
    ) -> Self {
        Self {
            id: RequestId::from_random(),
            client_id,
            response_type,
            redirect_uri,
            state,
            scope,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AuthCodeData {
    pub id: RecordId,
    pub code: HashedAuthCode,
    pub client_id: ClientId,
    pub redirect_uri: RedirectUri,
    pub scope: Scope,
    pub consumed: bool,
}

impl AuthCodeData {
    pub fn new(
        code: HashedAuthCode,
        client_id: ClientId,
        redirect_uri: RedirectUri,
        scope: Scope,
    ) -> Self {
        Self {
            id: RecordId::from_random(),
            code,
            client_id,
            redirect_uri,
            scope,
            consumed: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TokenData {
    pub id: RecordId,
    pub token: HashedAccessToken,
    pub client_id: ClientId,
    pub scope: Scope,
}

impl TokenData {
    pub fn new(token: HashedAccessToken, client_id: ClientId, scope: Scope) -> Self {
        Self {
            id: RecordId::from_random(),
            token,
            client_id,
            scope,
        }
    }
}
