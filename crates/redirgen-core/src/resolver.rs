use crate::error::ResolveError;
use async_trait::async_trait;

/// A site language as known to the host platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Language {
    pub id: u32,
    /// Short language code, e.g. `en` or `de`.
    pub code: String,
    /// Human readable name.
    pub title: String,
}

/// A redirect target resolved to a page of the host platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLink {
    /// The fully qualified link that is stored as the redirect target.
    pub canonical_link: String,
    pub page_id: u64,
    pub language: Language,
}

/// Resolves human supplied target references (page ids, page links or URLs)
/// into canonical links.
#[async_trait]
pub trait LinkResolver: Send + Sync + 'static {
    /// Fails with [`ResolveError::UnresolvableTarget`] if `raw_target` does
    /// not point at a known page.
    async fn resolve(&self, raw_target: &str) -> Result<ResolvedLink, ResolveError>;
}
