use redirgen_core::{CoreError, ResolveError, StorageError};
use thiserror::Error;

/// Errors of the redirect store.
///
/// Duplicates are not errors; they are reported through
/// [`Outcome`](redirgen_core::Outcome).
#[derive(Debug, Clone, Error)]
pub enum RedirectError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("storage operation failed: {0}")]
    Storage(
        #[from]
        #[source]
        StorageError,
    ),
}

/// Errors of a whole command invocation.
#[derive(Debug, Clone, Error)]
pub enum CommandError {
    #[error(transparent)]
    Redirect(#[from] RedirectError),
    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

impl CommandError {
    /// A stable identifier of the error kind for display.
    pub fn code(&self) -> &'static str {
        match self {
            CommandError::Redirect(RedirectError::Core(CoreError::InvalidUrl(_))) => "invalid-url",
            CommandError::Redirect(RedirectError::Core(CoreError::InvalidStatusCode(_))) => {
                "invalid-status-code"
            }
            CommandError::Redirect(RedirectError::Storage(_)) => "storage",
            CommandError::Resolve(ResolveError::UnresolvableTarget(_)) => "unresolvable-target",
            CommandError::Resolve(ResolveError::InvalidSiteConfig(_)) => "invalid-site-config",
        }
    }

    /// Whether the error stems from how the command was invoked rather than
    /// from the data it worked on.
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            CommandError::Redirect(RedirectError::Core(CoreError::InvalidStatusCode(_)))
                | CommandError::Resolve(ResolveError::InvalidSiteConfig(_))
        )
    }
}

impl From<CoreError> for CommandError {
    fn from(error: CoreError) -> Self {
        CommandError::Redirect(RedirectError::Core(error))
    }
}
