use thiserror::Error;

/// Result type for operations on core value types.
pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("status code {0} is not allowed, expected one of 301, 302, 303 or 307")]
    InvalidStatusCode(u16),
}

#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("redirect not found: {0}")]
    NotFound(String),
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage operation timed out: {0}")]
    Timeout(String),
    #[error("storage query failed: {0}")]
    Query(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("target \"{0}\" cannot be resolved to a page")]
    UnresolvableTarget(String),
    #[error("invalid site configuration: {0}")]
    InvalidSiteConfig(String),
}
