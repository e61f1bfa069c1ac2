use crate::core::models::{AuthCodeData, AuthRequestData, Client, TokenData};
use crate::core::types::{
    ClientId, ClientSecret, HashedAccessToken, HashedAuthCode, RedirectUri, RequestId,
};
use crate::provider::error::Error;

pub mod access_token;
pub mod authorization;
pub mod error;

pub use access_token::*;
pub use authorization::*;

#[derive(Debug)]
pub struct ClientCredentials {
    pub client_id: ClientId,
    pub client_secret: ClientSecret,
}

impl ClientCredentials {
    /// Resolves each half separately: a non-empty value from the HTTP
    /// Basic pair wins, otherwise the form field is used. Both halves must
    /// end up non-empty.
    pub fn resolve(
        basic: Option<(String, String)>,
        form_id: Option<String>,
        form_secret: Option<String>,
    ) -> Option<Self> {
        fn pick(basic: Option<String>, form: Option<String>) -> Option<String> {
            basic
                .filter(|v| !v.is_empty())
                .or_else(|| form.filter(|v| !v.is_empty()))
        }

        let (basic_id, basic_secret) = match basic {
            Some((id, secret)) => (Some(id), Some(secret)),
            None => (None, None),
        };

        Some(Self {
            client_id: ClientId(pick(basic_id, form_id)?),
            client_secret: ClientSecret(pick(basic_secret, form_secret)?),
        })
    }
}

#[derive(Debug, Clone)]
pub struct Redirect<T> {
    pub uri: RedirectUri,
    pub params: T,
}

impl<T> Redirect<T> {
    pub fn new(uri: RedirectUri, params: T) -> Self {
        Redirect { uri, params }
    }
}

/// Client registry plus the request, code and token stores.
///
/// Implementations must make `take_request` and `consume_code` atomic:
/// of any number of concurrent callers, at most one gets `Some`.
pub trait Store {
    fn get_client(&self, client_id: &ClientId) -> Result<Option<Client>, Error>;
    fn put_client(&self, client: Client) -> Result<Client, Error>;
    fn delete_client(&self, client_id: &ClientId) -> Result<bool, Error>;
    fn list_clients(&self) -> Result<Vec<Client>, Error>;
    fn add_client_uri(&self, client_id: &ClientId, uri: &RedirectUri) -> Result<(), Error>;
    fn delete_client_uri(&self, client_id: &ClientId, uri: &RedirectUri) -> Result<bool, Error>;

    fn store_request(&self, data: AuthRequestData) -> Result<AuthRequestData, Error>;
    fn take_request(&self, id: &RequestId) -> Result<Option<AuthRequestData>, Error>;

    fn store_code(&self, data: AuthCodeData) -> Result<AuthCodeData, Error>;
    fn consume_code(
        &self,
        client_id: &ClientId,
        code: &HashedAuthCode,
    ) -> Result<Option<AuthCodeData>, Error>;

    fn store_token(&self, data: TokenData) -> Result<TokenData, Error>;
    fn find_token(&self, token: &HashedAccessToken) -> Result<Option<TokenData>, Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn some(s: &str) -> Option<String> {
        Some(s.to_string())
    }

    #[test]
    fn basic_credentials_win_over_form() {
        let creds = ClientCredentials::resolve(
            Some(("basic-id".to_string(), "basic-secret".to_string())),
            some("form-id"),
            some("form-secret"),
        )
        .unwrap();
        assert_eq!(creds.client_id.0, "basic-id");
        assert_eq!(creds.client_secret.0, "basic-secret");
    }

    #[test]
    fn form_credentials_need_both_halves() {
        assert!(ClientCredentials::resolve(None, some("id"), some("secret")).is_some());
        assert!(ClientCredentials::resolve(None, some("id"), None).is_none());
        assert!(ClientCredentials::resolve(None, some("id"), some("")).is_none());
        assert!(ClientCredentials::resolve(None, some(""), some("secret")).is_none());
        assert!(ClientCredentials::resolve(None, None, None).is_none());
    }

    #[test]
    fn empty_basic_halves_fall_back_to_the_form() {
        let empty = || Some((String::new(), String::new()));
        assert!(ClientCredentials::resolve(empty(), None, None).is_none());

        let creds = ClientCredentials::resolve(
            Some(("basic-id".to_string(), String::new())),
            None,
            some("form-secret"),
        )
        .unwrap();
        assert_eq!(creds.client_id.0, "basic-id");
        assert_eq!(creds.client_secret.0, "form-secret");

        let creds = ClientCredentials::resolve(empty(), some("form-id"), some("form-secret")).unwrap();
        assert_eq!(creds.client_id.0, "form-id");

        assert!(ClientCredentials::resolve(
            Some(("basic-id".to_string(), String::new())),
            None,
            None
        )
        .is_none());
    }
}
