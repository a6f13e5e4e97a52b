use thiserror::Error;

/// Errors surfaced by the cart store and its provider
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("use_cart must be used within a CartProvider")]
    OutsideProvider,

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Repository error: {source}")]
    Repository {
        #[from]
        source: RepositoryError,
    },

    #[error("Initialization error: {message}")]
    Initialization { message: String },
}

/// Errors raised while encoding or decoding the persisted cart
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Storage error: {source}")]
    Storage {
        #[from]
        source: StorageError,
    },

    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
}

/// Errors from the underlying key-value storage
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error for key {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid storage key: {key:?}")]
    InvalidKey { key: String },

    #[error("Storage unavailable: {message}")]
    Unavailable { message: String },
}

/// Validation errors for cart items
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required field missing: {field}")]
    RequiredField { field: String },

    #[error("Invalid field value: {field}={value}, reason={reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Value out of range: {field}, min={min}, max={max}, value={value}")]
    OutOfRange {
        field: String,
        min: String,
        max: String,
        value: String,
    },
}

impl From<ValidationError> for StoreError {
    fn from(err: ValidationError) -> Self {
        StoreError::Validation {
            message: err.to_string(),
        }
    }
}

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Result type alias for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Result type alias for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Result type alias for validation operations
pub type ValidationResult<T> = Result<T, ValidationError>;
