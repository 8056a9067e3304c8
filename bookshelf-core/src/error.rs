//! Error types for Bookshelf Core

use thiserror::Error;

/// Result type alias using ShelfError
pub type Result<T> = std::result::Result<T, ShelfError>;

/// Top-level error type for all Bookshelf operations
#[derive(Debug, Error)]
pub enum ShelfError {
    #[error("Lookup error: {0}")]
    Lookup(#[from] LookupError),

    #[error("Cover error: {0}")]
    Cover(#[from] CoverError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Library error: {0}")]
    Library(#[from] LibraryError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from metadata lookups against the remote library API
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LookupError {
    /// The remote has no record for the identifier (HTTP 404)
    #[error("No record found for {0}")]
    NotFound(String),

    #[error("Network error: {0}")]
    Network(String),

    /// The response body did not match the expected schema
    #[error("Malformed response: {0}")]
    Decode(String),
}

/// Errors from fetching cover image bytes
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CoverFetchError {
    #[error("Request to {url} failed: {message}")]
    Request { url: String, message: String },

    #[error("Cover host returned {status} for {url}")]
    Status { url: String, status: u16 },
}

/// Errors from cover handling beyond the fetch itself
#[derive(Debug, Error)]
pub enum CoverError {
    #[error("Data is not a supported image")]
    Undecodable,

    #[error(transparent)]
    Fetch(#[from] CoverFetchError),
}

/// Errors that occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Backend error: {0}")]
    BackendError(String),
}

/// Errors from persisting the collection
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to serialize collection: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write collection: {0}")]
    Write(#[from] StorageError),
}

/// Errors from collection operations
#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("No book with id or ISBN {0}")]
    BookNotFound(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error(transparent)]
    Cover(#[from] CoverError),
}
