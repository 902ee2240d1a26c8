use crate::error::RedirectError;
use redirgen_core::{
    Clock, Configuration, CoreError, NewRedirect, Outcome, Redirect, RedirectUpdate, Repository,
    SystemClock, UrlInfo, CREATION_TYPE, WILDCARD_HOST,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

type Result<T> = std::result::Result<T, RedirectError>;

/// Adds redirects to a [`Repository`] while keeping sources unique.
///
/// The repository does not enforce uniqueness of `(host, path)`, so every
/// write goes through [`RedirectStore::add`], which looks the source up
/// first and decides between creating, overwriting and leaving the table
/// alone.
///
/// Note: lookup and write are separate repository calls. Two concurrent
/// invocations for the same source can both see no match and both insert.
#[derive(Debug)]
pub struct RedirectStore<R, C = SystemClock> {
    repository: Arc<R>,
    clock: C,
}

impl<R: Repository> RedirectStore<R, SystemClock> {
    /// Creates a store that stamps rows with the system time.
    pub fn with_system_clock(repository: R) -> Self {
        Self::new(repository, SystemClock)
    }
}

impl<R: Repository, C: Clock> RedirectStore<R, C> {
    pub fn new(repository: R, clock: C) -> Self {
        Self::from_shared(Arc::new(repository), clock)
    }

    /// Creates a store on a repository that is also used elsewhere.
    pub fn from_shared(repository: Arc<R>, clock: C) -> Self {
        Self { repository, clock }
    }

    /// Finds the redirect matching `source_url`.
    ///
    /// A row matches when its path equals the path and query of the URL
    /// and its host is the URL's host or the wildcard. Rows for the exact
    /// host win over wildcard rows, then the lowest id wins.
    pub async fn find(&self, source_url: &str) -> Result<Option<Redirect>> {
        let key = SourceKey::from(UrlInfo::parse(source_url)?);
        self.find_by_key(&key).await
    }

    /// Adds a redirect from `source_url` to `target`.
    ///
    /// | existing row | `overwrite_existing` | outcome |
    /// |---|---|---|
    /// | none | any | [`Outcome::Created`] |
    /// | any target | `true` | [`Outcome::Overwritten`] |
    /// | other target | `false` | [`Outcome::Conflict`] |
    /// | same target | `false` | [`Outcome::AlreadyPresent`] |
    ///
    /// With `dry_run` the repository is only read: creating and overwriting
    /// turn into [`Outcome::WouldCreate`] and [`Outcome::WouldOverwrite`].
    ///
    /// When `configuration.is_regexp` is set the source is a pattern, not a
    /// URL. It is stored verbatim (trimmed) under the wildcard host.
    pub async fn add(
        &self,
        source_url: &str,
        target: &str,
        configuration: &Configuration,
        dry_run: bool,
    ) -> Result<Outcome> {
        let key = SourceKey::new(source_url, configuration)?;

        let Some(existing) = self.find_by_key(&key).await? else {
            if dry_run {
                debug!(source_url, new_target = target, "dry run, redirect would be created");
                return Ok(Outcome::WouldCreate);
            }
            let created = self.insert(key, target, configuration).await?;
            return Ok(Outcome::Created(created));
        };

        if configuration.overwrite_existing {
            if dry_run {
                debug!(source_url, id = existing.id, "dry run, redirect would be overwritten");
                return Ok(Outcome::WouldOverwrite { existing });
            }
            let current = self
                .repository
                .update(
                    existing.id,
                    RedirectUpdate {
                        target: target.to_string(),
                        status_code: configuration.target_status_code,
                        flags: configuration.flags(),
                        updated_at: self.clock.now(),
                    },
                )
                .await?;
            info!(
                source_url,
                id = existing.id,
                previous_target = %existing.target,
                new_target = target,
                "overwrote redirect"
            );
            return Ok(Outcome::Overwritten {
                previous: existing,
                current,
            });
        }

        if existing.target != target {
            warn!(
                source_url,
                id = existing.id,
                existing_target = %existing.target,
                new_target = target,
                "redirect exists with a different target"
            );
            return Ok(Outcome::Conflict { existing });
        }

        debug!(source_url, id = existing.id, "redirect exists with the same target");
        Ok(Outcome::AlreadyPresent { existing })
    }

    /// Returns every stored redirect.
    pub async fn list_all(&self) -> Result<Vec<Redirect>> {
        Ok(self.repository.list_all().await?)
    }

    async fn find_by_key(&self, key: &SourceKey) -> Result<Option<Redirect>> {
        Ok(self.repository.find_by_source(&key.host, &key.path).await?)
    }

    async fn insert(
        &self,
        key: SourceKey,
        target: &str,
        configuration: &Configuration,
    ) -> Result<Redirect> {
        let now = self.clock.now();
        let created = self
            .repository
            .insert(NewRedirect {
                source_host: key.host,
                source_path: key.path,
                target: target.to_string(),
                status_code: configuration.target_status_code,
                flags: configuration.flags(),
                created_at: now,
                updated_at: now,
                creation_type: CREATION_TYPE,
            })
            .await?;

        info!(
            id = created.id,
            source_host = %created.source_host,
            source_path = %created.source_path,
            redirect_target = %created.target,
            "created redirect"
        );
        Ok(created)
    }
}

/// The `(source_host, source_path)` pair a redirect is stored under.
#[derive(Debug)]
struct SourceKey {
    host: String,
    path: String,
}

impl SourceKey {
    fn new(source: &str, configuration: &Configuration) -> Result<Self> {
        if !configuration.is_regexp {
            return Ok(UrlInfo::parse(source)?.into());
        }

        let pattern = source.trim();
        if pattern.is_empty() {
            return Err(
                CoreError::InvalidUrl("regular expression cannot be empty".to_string()).into(),
            );
        }
        Ok(Self {
            host: WILDCARD_HOST.to_string(),
            path: pattern.to_string(),
        })
    }
}

impl From<UrlInfo> for SourceKey {
    fn from(info: UrlInfo) -> Self {
        let host = match info.host() {
            "" => WILDCARD_HOST.to_string(),
            host => host.to_string(),
        };
        Self {
            host,
            path: info.path_with_query().to_string(),
        }
    }
}
