use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("destination {0:?} not found")]
    NotFound(String),

    #[error("invalid destination {id:?}: {reason}")]
    InvalidDestination { id: String, reason: &'static str },
}

pub type RegistryResult<T> = Result<T, RegistryError>;
