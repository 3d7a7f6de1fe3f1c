use crate::config::ConfigError;
use crate::merge::MergeError;
use crate::storage::StorageError;
use crate::tokens::TokenError;
use thiserror::Error;

pub type AppResult<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Tokens(#[from] TokenError),
    #[error(transparent)]
    Merge(#[from] MergeError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
