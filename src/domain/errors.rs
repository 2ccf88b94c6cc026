use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("User with ID {0} not found.")]
    UserNotFound(i32),
    #[error("{0}")]
    InvalidInput(String),
    #[error("Internal error: {0}")]
    Internal(String),
}
