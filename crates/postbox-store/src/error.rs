use thiserror::Error;

/// Failure of a store operation, normalized at the client boundary.
///
/// `Display` is the client-visible summary. Transport and server detail lives
/// in `details` and is only ever logged, never returned to a caller of the
/// HTTP API.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Message not found")]
    NotFound,

    #[error("{summary}")]
    Remote {
        summary: &'static str,
        details: String,
    },
}

impl StoreError {
    pub fn remote(summary: &'static str, details: impl Into<String>) -> Self {
        StoreError::Remote {
            summary,
            details: details.into(),
        }
    }

    pub fn details(&self) -> Option<&str> {
        match self {
            StoreError::NotFound => None,
            StoreError::Remote { details, .. } => Some(details),
        }
    }
}
