//! Application error type.

use crate::db::DbError;
use crate::provider::ProviderError;
use lingoflip_core::DeckError;
use thiserror::Error;

/// Anything a controller operation can fail with.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Deck(#[from] DeckError),

    #[error(transparent)]
    Db(#[from] DbError),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;
