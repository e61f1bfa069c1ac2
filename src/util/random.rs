use crate::core::types::{AccessToken, AuthCode, RecordId, RequestId};

use super::hash::Salt;

/// Length of every generated credential, in alphanumeric characters
/// (~190 bits from the thread-local CSPRNG).
pub const CREDENTIAL_LENGTH: usize = 32;

pub trait FromRandom {
    fn from_random() -> Self;
}

impl FromRandom for AuthCode {
    fn from_random() -> Self {
        AuthCode(random_string(CREDENTIAL_LENGTH))
    }
}

impl FromRandom for AccessToken {
    fn from_random() -> Self {
        AccessToken(random_string(CREDENTIAL_LENGTH))
    }
}

impl FromRandom for RequestId {
    fn from_random() -> Self {
        RequestId(random_string(CREDENTIAL_LENGTH))
    }
}

impl FromRandom for RecordId {
    fn from_random() -> Self {
        RecordId(random_string(24))
    }
}

impl FromRandom for Salt {
    fn from_random() -> Self {
        Salt(random_string(16))
    }
}

pub fn random_string(size: usize) -> String {
    use rand::Rng;

    rand::thread_rng()
        .sample_iter(rand::distributions::Alphanumeric)
        .take(size)
        .map(char::from)
        .collect()
}
