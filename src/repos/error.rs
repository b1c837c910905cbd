/*
 * Responsibility
 * - Storage-layer error shared by every store implementation
 * - Callers map it to AppError::Internal (never leaked to clients)
 */
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("db error: {0}")]
    Db(#[from] sqlx::Error),
}

pub type RepoResult<T> = Result<T, RepoError>;
