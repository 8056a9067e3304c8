//! Durable persistence of the whole collection as one JSON record

use crate::config::StoreConfig;
use crate::error::{StorageError, StoreError};
use crate::storage::{LocalStorage, StorageProvider};
use crate::types::Book;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};

/// The collection record plus its in-memory copy.
///
/// The first [`load`](Self::load) reads storage; afterwards the memoized copy
/// is served until [`save`](Self::save) replaces it. This store is the single
/// in-process writer of the record.
pub struct CollectionStore {
    storage: Arc<dyn StorageProvider>,
    key: String,
    books: Mutex<Option<Vec<Book>>>,
}

impl CollectionStore {
    /// Store over the given backend under the default record key
    pub fn new(storage: Arc<dyn StorageProvider>) -> Self {
        Self::with_key(storage, StoreConfig::COLLECTION_KEY)
    }

    pub fn with_key(storage: Arc<dyn StorageProvider>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
            books: Mutex::new(None),
        }
    }

    /// Store in a data directory on the local filesystem
    pub fn open(data_dir: impl Into<PathBuf>) -> Self {
        Self::new(Arc::new(LocalStorage::new(data_dir)))
    }

    /// The collection; a missing or unreadable record yields an empty one
    pub async fn load(&self) -> Vec<Book> {
        let mut memo = self.books.lock().await;
        if let Some(books) = memo.as_ref() {
            return books.clone();
        }

        let books = match self.storage.read(&self.key).await {
            Ok(data) => match serde_json::from_slice::<Vec<Book>>(&data) {
                Ok(books) => {
                    info!("{} book(s) loaded", books.len());
                    books
                }
                Err(e) => {
                    error!("Collection record is corrupt, starting fresh: {}", e);
                    Vec::new()
                }
            },
            Err(StorageError::NotFound(_)) => Vec::new(),
            Err(e) => {
                error!("Failed to read collection record, starting fresh: {}", e);
                Vec::new()
            }
        };

        *memo = Some(books.clone());
        books
    }

    /// Replace the persisted collection and the in-memory copy
    pub async fn save(&self, books: Vec<Book>) -> Result<(), StoreError> {
        let data = serde_json::to_vec_pretty(&books).map_err(|e| {
            error!("Failed to serialize collection: {}", e);
            StoreError::Serialize(e)
        })?;

        let mut memo = self.books.lock().await;
        self.storage.write(&self.key, data).await.map_err(|e| {
            error!("Failed to write collection record: {}", e);
            StoreError::Write(e)
        })?;

        info!("{} book(s) saved", books.len());
        *memo = Some(books);
        Ok(())
    }

    /// Delete the record and forget the in-memory copy
    pub async fn clear(&self) -> Result<(), StoreError> {
        let mut memo = self.books.lock().await;
        match self.storage.delete(&self.key).await {
            Ok(()) | Err(StorageError::NotFound(_)) => {}
            Err(e) => return Err(StoreError::Write(e)),
        }
        *memo = Some(Vec::new());
        Ok(())
    }
}
