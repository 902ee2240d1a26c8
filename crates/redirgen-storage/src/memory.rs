use async_trait::async_trait;
use dashmap::DashMap;
use redirgen_core::repository::{ReadRepository, Repository, Result};
use redirgen_core::{NewRedirect, Redirect, RedirectId, RedirectUpdate, StorageError, WILDCARD_HOST};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// In-memory implementation of the Repository trait using DashMap.
///
/// Ids are handed out from an atomic sequence starting at 1, mirroring an
/// auto-increment primary key. Nothing is persisted across processes.
#[derive(Debug)]
pub struct InMemoryRepository {
    storage: DashMap<RedirectId, Redirect>,
    next_id: AtomicU64,
}

impl InMemoryRepository {
    /// Creates a new in-memory repository.
    pub fn new() -> Self {
        Self {
            storage: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Number of stored rows.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReadRepository for InMemoryRepository {
    async fn find_by_source(&self, host: &str, path: &str) -> Result<Option<Redirect>> {
        let found = self
            .storage
            .iter()
            .filter(|entry| {
                let row = entry.value();
                row.source_path == path
                    && (row.source_host == WILDCARD_HOST || row.source_host == host)
            })
            // exact host before wildcard, then lowest id
            .min_by_key(|entry| (entry.value().is_wildcard_host(), *entry.key()))
            .map(|entry| entry.value().clone());

        debug!(host, path, found = ?found.as_ref().map(|row| row.id), "looked up redirect");
        Ok(found)
    }

    async fn list_all(&self) -> Result<Vec<Redirect>> {
        let mut rows: Vec<Redirect> = self
            .storage
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        rows.sort_by_key(|row| row.id);
        Ok(rows)
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn insert(&self, redirect: NewRedirect) -> Result<Redirect> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let row = redirect.into_redirect(id);
        self.storage.insert(id, row.clone());
        Ok(row)
    }

    async fn update(&self, id: RedirectId, update: RedirectUpdate) -> Result<Redirect> {
        let mut entry = self
            .storage
            .get_mut(&id)
            .ok_or_else(|| StorageError::NotFound(format!("uid {id}")))?;
        update.apply_to(entry.value_mut());
        Ok(entry.value().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::Timestamp;
    use redirgen_core::{RedirectFlags, StatusCode, CREATION_TYPE};

    fn new_redirect(host: &str, path: &str, target: &str) -> NewRedirect {
        let now = Timestamp::from_second(1_700_000_000).unwrap();
        NewRedirect {
            source_host: host.to_string(),
            source_path: path.to_string(),
            target: target.to_string(),
            status_code: StatusCode::TemporaryRedirect,
            flags: RedirectFlags::default(),
            created_at: now,
            updated_at: now,
            creation_type: CREATION_TYPE,
        }
    }

    #[tokio::test]
    async fn insert_and_find() {
        let repo = InMemoryRepository::new();

        let row = repo
            .insert(new_redirect("*", "/old", "https://example.com/new"))
            .await
            .unwrap();
        assert_eq!(row.id, 1);

        let found = repo
            .find_by_source("example.com", "/old")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found, row);
    }

    #[tokio::test]
    async fn ids_are_sequential() {
        let repo = InMemoryRepository::new();

        let first = repo.insert(new_redirect("*", "/a", "t")).await.unwrap();
        let second = repo.insert(new_redirect("*", "/b", "t")).await.unwrap();
        assert_eq!((first.id, second.id), (1, 2));
    }

    #[tokio::test]
    async fn find_requires_exact_path() {
        let repo = InMemoryRepository::new();
        repo.insert(new_redirect("*", "/old", "t")).await.unwrap();

        assert!(repo.find_by_source("", "/old/").await.unwrap().is_none());
        assert!(repo.find_by_source("", "/old?x=1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn find_ignores_other_hosts() {
        let repo = InMemoryRepository::new();
        repo.insert(new_redirect("other.com", "/old", "t"))
            .await
            .unwrap();

        assert!(repo
            .find_by_source("example.com", "/old")
            .await
            .unwrap()
            .is_none());
        assert!(repo
            .find_by_source("other.com", "/old")
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn find_prefers_exact_host_over_wildcard() {
        let repo = InMemoryRepository::new();
        repo.insert(new_redirect("*", "/old", "wildcard"))
            .await
            .unwrap();
        repo.insert(new_redirect("example.com", "/old", "exact"))
            .await
            .unwrap();

        let found = repo
            .find_by_source("example.com", "/old")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.target, "exact");

        let found = repo.find_by_source("", "/old").await.unwrap().unwrap();
        assert_eq!(found.target, "wildcard");
    }

    #[tokio::test]
    async fn find_prefers_lowest_id_among_duplicates() {
        let repo = InMemoryRepository::new();
        repo.insert(new_redirect("*", "/old", "first")).await.unwrap();
        repo.insert(new_redirect("*", "/old", "second"))
            .await
            .unwrap();

        let found = repo.find_by_source("", "/old").await.unwrap().unwrap();
        assert_eq!(found.id, 1);
        assert_eq!(found.target, "first");
    }

    #[tokio::test]
    async fn update_existing() {
        let repo = InMemoryRepository::new();
        let row = repo.insert(new_redirect("*", "/old", "t")).await.unwrap();
        let later = Timestamp::from_second(1_800_000_000).unwrap();

        let updated = repo
            .update(
                row.id,
                RedirectUpdate {
                    target: "https://example.com/other".to_string(),
                    status_code: StatusCode::MovedPermanently,
                    flags: RedirectFlags {
                        disable_hitcount: true,
                        ..RedirectFlags::default()
                    },
                    updated_at: later,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.id, row.id);
        assert_eq!(updated.created_at, row.created_at);
        assert_eq!(updated.updated_at, later);
        assert_eq!(updated.target, "https://example.com/other");
        assert_eq!(repo.list_all().await.unwrap(), vec![updated]);
    }

    #[tokio::test]
    async fn update_nonexistent() {
        let repo = InMemoryRepository::new();

        let err = repo
            .update(
                42,
                RedirectUpdate {
                    target: "t".to_string(),
                    status_code: StatusCode::Found,
                    flags: RedirectFlags::default(),
                    updated_at: Timestamp::UNIX_EPOCH,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));
    }

    #[tokio::test]
    async fn list_all_in_id_order() {
        let repo = InMemoryRepository::new();
        assert!(repo.list_all().await.unwrap().is_empty());

        for path in ["/c", "/a", "/b"] {
            repo.insert(new_redirect("*", path, "t")).await.unwrap();
        }

        let ids: Vec<_> = repo
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|row| row.id)
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(repo.len(), 3);
    }

    #[tokio::test]
    async fn concurrent_inserts_get_unique_ids() {
        use std::sync::Arc;

        let repo = Arc::new(InMemoryRepository::new());
        let mut handles = vec![];

        for i in 0..10u64 {
            let repo = Arc::clone(&repo);
            handles.push(tokio::spawn(async move {
                repo.insert(new_redirect("*", &format!("/path-{i}"), "t"))
                    .await
                    .unwrap()
                    .id
            }));
        }

        let mut ids = vec![];
        for handle in handles {
            ids.push(handle.await.unwrap());
        }
        ids.sort_unstable();
        assert_eq!(ids, (1..=10).collect::<Vec<_>>());
    }
}
