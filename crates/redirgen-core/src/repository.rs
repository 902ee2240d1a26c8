use crate::error::StorageError;
use crate::redirect::{NewRedirect, Redirect, RedirectId, RedirectUpdate};
use async_trait::async_trait;

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// A read-only view of the redirect table.
#[async_trait]
pub trait ReadRepository: Send + Sync + 'static {
    /// Finds the redirect for an exact `path` whose host is either the
    /// wildcard marker or `host`.
    ///
    /// The table does not enforce uniqueness, so several rows may match.
    /// A row for `host` itself wins over a wildcard row, and the lowest id
    /// wins among rows of the same kind.
    async fn find_by_source(&self, host: &str, path: &str) -> Result<Option<Redirect>>;

    /// Returns every stored redirect in ascending id order.
    async fn list_all(&self) -> Result<Vec<Redirect>>;
}

#[async_trait]
pub trait Repository: ReadRepository {
    /// Inserts a new row and returns it with its generated id.
    async fn insert(&self, redirect: NewRedirect) -> Result<Redirect>;

    /// Applies `update` to the row with the given id and returns the row as
    /// stored afterwards. Returns `Err(NotFound)` if the row does not exist.
    async fn update(&self, id: RedirectId, update: RedirectUpdate) -> Result<Redirect>;
}
