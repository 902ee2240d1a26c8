use crate::error::CommandError;
use crate::store::RedirectStore;
use redirgen_core::{Clock, Configuration, LinkResolver, Outcome, Repository, ResolvedLink, SystemClock};
use tracing::debug;

/// A request to add a single redirect.
#[derive(Debug, Clone)]
pub struct AddRedirect {
    /// Source URL, absolute or relative.
    pub source: String,
    /// Target reference as given by the operator.
    pub target: String,
    pub configuration: Configuration,
    pub dry_run: bool,
}

/// Everything known after adding a redirect.
#[derive(Debug, Clone)]
pub struct AddRedirectReport {
    pub request: AddRedirect,
    pub resolved: ResolvedLink,
    pub outcome: Outcome,
}

/// Resolves redirect targets and hands them to a [`RedirectStore`].
#[derive(Debug)]
pub struct RedirectGenerator<L, R, C = SystemClock> {
    resolver: L,
    store: RedirectStore<R, C>,
}

impl<L: LinkResolver, R: Repository, C: Clock> RedirectGenerator<L, R, C> {
    pub fn new(resolver: L, store: RedirectStore<R, C>) -> Self {
        Self { resolver, store }
    }

    /// Resolves the target of `request` and adds a redirect to its canonical
    /// link.
    ///
    /// Resolution and storage failures are errors. Duplicates, including
    /// conflicting ones, are reported through the outcome of the report.
    pub async fn add(&self, request: AddRedirect) -> Result<AddRedirectReport, CommandError> {
        let resolved = self.resolver.resolve(&request.target).await?;
        debug!(
            source = %request.source,
            link = %resolved.canonical_link,
            dry_run = request.dry_run,
            "adding redirect"
        );

        let outcome = self
            .store
            .add(
                &request.source,
                &resolved.canonical_link,
                &request.configuration,
                request.dry_run,
            )
            .await?;

        Ok(AddRedirectReport {
            request,
            resolved,
            outcome,
        })
    }
}
