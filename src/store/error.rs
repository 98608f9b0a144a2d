use thiserror::Error;

/// Failure taxonomy for store operations. `Transient` always means the
/// operation changed nothing and may be retried as-is.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    Validation(String),
    #[error("{subject} limit of {limit} reached")]
    Capacity { subject: &'static str, limit: usize },
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("storage failure: {0}")]
    Transient(String),
}

impl StoreError {
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::Validation(_) => "validation",
            StoreError::Capacity { .. } => "capacity_exceeded",
            StoreError::NotFound(_) => "not_found",
            StoreError::Transient(_) => "transient",
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::Transient(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Transient(err.to_string())
    }
}
