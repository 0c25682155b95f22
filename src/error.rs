use thiserror::Error;

/// Infrastructure-level failures.
///
/// Business-rule outcomes (unknown account, wrong amount, duplicates) are not
/// errors; they are variants of [`crate::domain::outcome::Outcome`]. `Err` is
/// reserved for faults in the stores and codecs themselves.
#[derive(Error, Debug)]
pub enum PaymentError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("validation error: {0}")]
    Validation(String),
    #[cfg(feature = "storage-rocksdb")]
    #[error("storage error: {0}")]
    Rocks(#[from] rocksdb::Error),
    #[error("internal error: {0}")]
    Internal(Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T> = std::result::Result<T, PaymentError>;
