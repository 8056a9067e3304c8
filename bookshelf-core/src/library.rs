//! Collection operations on top of the collection store
//!
//! Every mutation reads the current collection, applies one change and
//! flushes the whole collection with a single save.

use crate::error::LibraryError;
use crate::finder::MetadataSource;
use crate::store::CollectionStore;
use crate::types::{Book, Collection};
use std::path::PathBuf;
use tokio::sync::Mutex;
use tracing::info;

/// Result of adding a book
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    /// An owned book with the same id or ISBN; nothing was saved
    AlreadyOwned(Book),
}

/// The user's collection and the operations on it
pub struct Library {
    store: CollectionStore,
    /// Serializes read-modify-write cycles
    write_lock: Mutex<()>,
}

impl Library {
    pub fn new(store: CollectionStore) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// Library persisted in a data directory
    pub fn open(data_dir: impl Into<PathBuf>) -> Self {
        Self::new(CollectionStore::open(data_dir))
    }

    pub fn store(&self) -> &CollectionStore {
        &self.store
    }

    pub async fn collection(&self) -> Collection {
        Collection::from_books(self.store.load().await)
    }

    pub async fn books(&self) -> Vec<Book> {
        self.store.load().await
    }

    /// Books in descending title order
    pub async fn sorted(&self) -> Vec<Book> {
        let collection = self.collection().await;
        collection.sorted_by_title().into_iter().cloned().collect()
    }

    pub async fn search(&self, query: &str) -> Vec<Book> {
        let collection = self.collection().await;
        collection.search(query).into_iter().cloned().collect()
    }

    /// A book by id, or by ISBN when no id matches
    pub async fn get(&self, id_or_isbn: &str) -> Option<Book> {
        self.collection().await.find(id_or_isbn).cloned()
    }

    pub async fn find_by_isbn(&self, isbn: &str) -> Option<Book> {
        self.collection().await.find_by_isbn(isbn).cloned()
    }

    /// An owned copy of the same edition
    pub async fn find_duplicate(&self, book: &Book) -> Option<Book> {
        self.collection().await.find_duplicate(book).cloned()
    }

    /// Append a book unless it is already owned
    pub async fn add(&self, book: Book) -> Result<AddOutcome, LibraryError> {
        let _guard = self.write_lock.lock().await;
        let mut collection = self.collection().await;

        if let Some(owned) = collection.find_duplicate(&book) {
            return Ok(AddOutcome::AlreadyOwned(owned.clone()));
        }

        info!("Adding \"{}\" ({})", book.title, book.id());
        if let Err(book) = collection.insert(book) {
            return Ok(AddOutcome::AlreadyOwned(book));
        }
        self.store.save(collection.into_books()).await?;
        Ok(AddOutcome::Added)
    }

    pub async fn remove(&self, id_or_isbn: &str) -> Result<Book, LibraryError> {
        let _guard = self.write_lock.lock().await;
        let mut collection = self.collection().await;

        let key = Self::resolve_key(&collection, id_or_isbn)?;
        let removed = collection
            .remove(&key)
            .ok_or_else(|| LibraryError::BookNotFound(id_or_isbn.to_string()))?;
        self.store.save(collection.into_books()).await?;
        info!("Removed \"{}\" ({})", removed.title, removed.id());
        Ok(removed)
    }

    /// Apply `change` to one book and save. Returns the updated book.
    pub async fn update<F>(&self, id_or_isbn: &str, change: F) -> Result<Book, LibraryError>
    where
        F: FnOnce(&mut Book) + Send,
    {
        let _guard = self.write_lock.lock().await;
        let mut collection = self.collection().await;

        let key = Self::resolve_key(&collection, id_or_isbn)?;
        let Some(book) = collection.get_mut(&key) else {
            return Err(LibraryError::BookNotFound(id_or_isbn.to_string()));
        };
        change(book);
        let updated = book.clone();

        self.store.save(collection.into_books()).await?;
        Ok(updated)
    }

    /// Flip the favorite mark; returns the new value
    pub async fn toggle_marked(&self, id_or_isbn: &str) -> Result<bool, LibraryError> {
        let book = self.update(id_or_isbn, |book| book.marked = !book.marked).await?;
        Ok(book.marked)
    }

    pub async fn set_notes(
        &self,
        id_or_isbn: &str,
        notes: impl Into<String>,
    ) -> Result<Book, LibraryError> {
        let notes = notes.into();
        self.update(id_or_isbn, move |book| book.notes = notes).await
    }

    /// Record who the book is lent to; `None` marks it returned
    pub async fn lend(
        &self,
        id_or_isbn: &str,
        borrower: Option<String>,
    ) -> Result<Book, LibraryError> {
        let borrower = borrower.filter(|name| !name.trim().is_empty());
        self.update(id_or_isbn, move |book| book.lent_to = borrower)
            .await
    }

    /// Resolve the book's author references through `source` and persist them.
    /// Saves only when something new was resolved.
    pub async fn resolve_authors(
        &self,
        id_or_isbn: &str,
        source: &dyn MetadataSource,
    ) -> Result<Book, LibraryError> {
        let mut book = self
            .get(id_or_isbn)
            .await
            .ok_or_else(|| LibraryError::BookNotFound(id_or_isbn.to_string()))?;
        if !book.authors.is_empty() || book.author_links.is_empty() {
            return Ok(book);
        }

        // Network work happens outside the write lock
        source.load_authors(&mut book).await;
        if book.authors.is_empty() {
            return Ok(book);
        }

        let authors = book.authors;
        self.update(book.key.as_str(), move |owned| owned.authors = authors)
            .await
    }

    fn resolve_key(collection: &Collection, id_or_isbn: &str) -> Result<String, LibraryError> {
        collection
            .find(id_or_isbn)
            .map(|book| book.id().to_string())
            .ok_or_else(|| LibraryError::BookNotFound(id_or_isbn.to_string()))
    }
}
