//! Two-partition disk cache for cover images
//!
//! Entries are stored under the SHA-256 hex digest of their key. A partition's
//! backend is created on first use and kept for the lifetime of the cache.
//! Every failure is absorbed here: reads degrade to a miss, writes are logged
//! and dropped.

use crate::storage::{LocalStorage, StorageProvider};
use crate::error::StorageError;
use crate::types::{CoverSize, CoverSource};
use sha2::{Digest, Sha256};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

/// Cache partition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Partition {
    /// Remote covers; may be evicted at any time
    Temporary,
    /// User-added local covers; never evicted
    Permanent,
}

/// Key of a remote cover in the temporary partition
pub fn remote_cover_key(source: &CoverSource, size: CoverSize) -> String {
    match source {
        CoverSource::Id(id) => format!("cover-{}-{}", id, size),
        CoverSource::Isbn(isbn) => format!("cover-isbn-{}-{}", isbn, size),
    }
}

/// Key of a local cover in the permanent partition
pub fn local_cover_key(id: &str) -> String {
    format!("local_cover-{}", id)
}

/// File name an entry is stored under
fn entry_name(key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());
    hex::encode(hasher.finalize())
}

struct PartitionSlot {
    root: PathBuf,
    backend: OnceCell<Arc<dyn StorageProvider>>,
}

impl PartitionSlot {
    fn lazy(root: PathBuf) -> Self {
        Self {
            root,
            backend: OnceCell::new(),
        }
    }

    fn ready(backend: Arc<dyn StorageProvider>) -> Self {
        Self {
            root: PathBuf::new(),
            backend: OnceCell::new_with(Some(backend)),
        }
    }

    async fn backend(&self) -> Option<&Arc<dyn StorageProvider>> {
        let result = self
            .backend
            .get_or_try_init(|| async {
                tokio::fs::create_dir_all(&self.root).await?;
                debug!("Opened cover cache at {}", self.root.display());
                Ok::<_, std::io::Error>(Arc::new(LocalStorage::new(&self.root)) as Arc<dyn StorageProvider>)
            })
            .await;

        match result {
            Ok(backend) => Some(backend),
            Err(e) => {
                warn!("Cover cache at {} unavailable: {}", self.root.display(), e);
                None
            }
        }
    }
}

/// Disk cache for cover images
pub struct CoverCache {
    temporary: PartitionSlot,
    permanent: PartitionSlot,
}

impl CoverCache {
    /// Cache rooted in the given directories; nothing touches disk until first use
    pub fn new(temporary_dir: impl Into<PathBuf>, permanent_dir: impl Into<PathBuf>) -> Self {
        Self {
            temporary: PartitionSlot::lazy(temporary_dir.into()),
            permanent: PartitionSlot::lazy(permanent_dir.into()),
        }
    }

    /// Cache over existing storage backends
    pub fn with_backends(
        temporary: Arc<dyn StorageProvider>,
        permanent: Arc<dyn StorageProvider>,
    ) -> Self {
        Self {
            temporary: PartitionSlot::ready(temporary),
            permanent: PartitionSlot::ready(permanent),
        }
    }

    fn slot(&self, partition: Partition) -> &PartitionSlot {
        match partition {
            Partition::Temporary => &self.temporary,
            Partition::Permanent => &self.permanent,
        }
    }

    /// Cached bytes for `key`; any failure reads as a miss
    pub async fn get(&self, partition: Partition, key: &str) -> Option<Vec<u8>> {
        let backend = self.slot(partition).backend().await?;
        match backend.read(&entry_name(key)).await {
            Ok(data) => {
                debug!("Cover cache hit: {} ({:?})", key, partition);
                Some(data)
            }
            Err(StorageError::NotFound(_)) => {
                debug!("Cover cache miss: {} ({:?})", key, partition);
                None
            }
            Err(e) => {
                warn!("Cover cache read of {} failed: {}", key, e);
                None
            }
        }
    }

    /// Store bytes under `key`, best effort
    pub async fn put(&self, partition: Partition, key: &str, data: Vec<u8>) {
        let Some(backend) = self.slot(partition).backend().await else {
            return;
        };
        if let Err(e) = backend.write(&entry_name(key), data).await {
            warn!("Cover cache write of {} failed: {}", key, e);
        }
    }

    /// Drop the entry for `key`, best effort
    pub async fn remove(&self, partition: Partition, key: &str) {
        let Some(backend) = self.slot(partition).backend().await else {
            return;
        };
        match backend.delete(&entry_name(key)).await {
            Ok(()) | Err(StorageError::NotFound(_)) => {}
            Err(e) => warn!("Cover cache delete of {} failed: {}", key, e),
        }
    }

    /// Evict least recently written temporary entries until the partition
    /// holds at most `max_bytes`. Returns the number of bytes freed.
    pub async fn prune_temporary(&self, max_bytes: u64) -> u64 {
        let Some(backend) = self.temporary.backend().await else {
            return 0;
        };
        let mut entries = match backend.list("").await {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Listing the cover cache failed: {}", e);
                return 0;
            }
        };

        let mut total: u64 = entries.iter().map(|e| e.size).sum();
        if total <= max_bytes {
            return 0;
        }

        entries.sort_by_key(|e| e.modified);
        let mut freed = 0;
        for entry in entries {
            if total <= max_bytes {
                break;
            }
            match backend.delete(&entry.name).await {
                Ok(()) => {
                    total -= entry.size;
                    freed += entry.size;
                }
                Err(e) => warn!("Evicting {} failed: {}", entry.name, e),
            }
        }
        debug!("Pruned {} bytes from the cover cache", freed);
        freed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn memory_cache() -> (CoverCache, Arc<MemoryStorage>, Arc<MemoryStorage>) {
        let temporary = Arc::new(MemoryStorage::new());
        let permanent = Arc::new(MemoryStorage::new());
        let cache = CoverCache::with_backends(temporary.clone(), permanent.clone());
        (cache, temporary, permanent)
    }

    #[test]
    fn test_keys() {
        assert_eq!(
            remote_cover_key(&CoverSource::Id(42), CoverSize::Medium),
            "cover-42-M"
        );
        assert_eq!(
            remote_cover_key(&CoverSource::Isbn("0140328726".into()), CoverSize::Small),
            "cover-isbn-0140328726-S"
        );
        assert_eq!(local_cover_key("abc"), "local_cover-abc");
        assert_eq!(entry_name("cover-42-M").len(), 64);
    }

    #[tokio::test]
    async fn test_put_twice_then_get() {
        let (cache, temporary, _) = memory_cache();
        cache.put(Partition::Temporary, "cover-1-M", vec![1, 2, 3]).await;
        cache.put(Partition::Temporary, "cover-1-M", vec![1, 2, 3]).await;

        assert_eq!(
            cache.get(Partition::Temporary, "cover-1-M").await,
            Some(vec![1, 2, 3])
        );
        assert_eq!(temporary.list("").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_partitions_are_separate() {
        let (cache, _, _) = memory_cache();
        cache.put(Partition::Permanent, "local_cover-a", vec![9]).await;

        assert!(cache.get(Partition::Temporary, "local_cover-a").await.is_none());
        assert_eq!(
            cache.get(Partition::Permanent, "local_cover-a").await,
            Some(vec![9])
        );
    }

    #[tokio::test]
    async fn test_write_failure_is_swallowed() {
        let (cache, temporary, _) = memory_cache();
        temporary.set_fail_writes(true);
        cache.put(Partition::Temporary, "cover-1-M", vec![1]).await;
        assert!(cache.get(Partition::Temporary, "cover-1-M").await.is_none());
    }

    #[tokio::test]
    async fn test_lazy_partition_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let temporary = dir.path().join("cache/covers");
        let permanent = dir.path().join("data/covers");
        let cache = CoverCache::new(&temporary, &permanent);

        assert!(!temporary.exists());
        cache.put(Partition::Temporary, "cover-7-L", b"jpeg".to_vec()).await;
        assert!(temporary.exists());
        assert!(!permanent.exists());
        assert_eq!(
            cache.get(Partition::Temporary, "cover-7-L").await,
            Some(b"jpeg".to_vec())
        );
    }

    #[tokio::test]
    async fn test_remove_missing_is_quiet() {
        let (cache, _, permanent) = memory_cache();
        cache.remove(Partition::Permanent, "local_cover-none").await;
        cache.put(Partition::Permanent, "local_cover-x", vec![1]).await;
        cache.remove(Partition::Permanent, "local_cover-x").await;
        assert!(permanent.list("").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_prune_temporary_evicts_oldest_first() {
        let dir = tempfile::tempdir().unwrap();
        let cache = CoverCache::new(dir.path().join("tmp"), dir.path().join("perm"));

        cache.put(Partition::Temporary, "old", vec![0; 100]).await;
        // Keep modification times distinguishable
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        cache.put(Partition::Temporary, "new", vec![0; 100]).await;
        cache.put(Partition::Permanent, "kept", vec![0; 500]).await;

        let freed = cache.prune_temporary(150).await;
        assert_eq!(freed, 100);
        assert!(cache.get(Partition::Temporary, "old").await.is_none());
        assert!(cache.get(Partition::Temporary, "new").await.is_some());
        assert!(cache.get(Partition::Permanent, "kept").await.is_some());

        assert_eq!(cache.prune_temporary(1_000).await, 0);
    }
}
