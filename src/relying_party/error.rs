/// Why a callback could not be turned into an access token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[derive(thiserror::Error)]
pub enum FlowError {
    /// The callback's `state` is missing or differs from the stored nonce.
    #[error("state not match")]
    CsrfMismatch,
    /// No usable code, or the authorization server reported an error.
    #[error("invalid code")]
    Validation,
    /// Transport failure, timeout, non-2xx status or undecodable body from
    /// the token endpoint.
    #[error("authorization request failed")]
    UpstreamExchange,
}
