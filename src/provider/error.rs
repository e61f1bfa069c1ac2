use std::fmt::Display;

use crate::auth::error::{ErrorResponse, ServerErrorKind};

use tracing::{event, Level};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("database error: {0}")]
    Db(#[from] diesel::result::Error),
    #[error("connection pool error: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),
    #[error("migration failed: {0}")]
    Migration(String),
    #[error("hashing failed: {0}")]
    Hash(#[from] argon2::Error),
    #[error("bad request: {0}")]
    BadRequest(&'static str),
}

/// An internal failure that has already been logged.
#[derive(Debug, Clone, Copy)]
pub struct ServerFailure;

impl<K> From<ServerFailure> for ErrorResponse<K>
where
    K: ServerErrorKind,
    ErrorResponse<K>: From<K>,
{
    fn from(_: ServerFailure) -> Self {
        K::server_error().into()
    }
}

pub trait ResultExt<T> {
    fn or_server_error(self, context: &'static str) -> Result<T, ServerFailure>;
}

impl<T, E: Display> ResultExt<T> for Result<T, E> {
    fn or_server_error(self, context: &'static str) -> Result<T, ServerFailure> {
        self.map_err(|e| {
            event!(Level::ERROR, error = %e, "{}", context);
            ServerFailure
        })
    }
}
