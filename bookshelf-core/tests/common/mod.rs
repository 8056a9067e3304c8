//! Shared fixtures for bookshelf-core integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use bookshelf_core::error::{CoverFetchError, LookupError};
use bookshelf_core::storage::MemoryStorage;
use bookshelf_core::{Author, Book, CollectionStore, CoverSize, CoverSource, Library, MetadataSource};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Smallest byte string recognized as a JPEG
pub const JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'];

/// A JPEG whose trailing byte tells covers apart
pub fn jpeg(tag: u8) -> Vec<u8> {
    let mut data = JPEG.to_vec();
    data.push(tag);
    data
}

/// In-memory metadata source with call counters
#[derive(Default)]
pub struct MockSource {
    books: HashMap<String, Result<Book, LookupError>>,
    authors: HashMap<String, Author>,
    covers: HashMap<String, Result<Vec<u8>, CoverFetchError>>,
    delays: HashMap<String, Duration>,
    lookups: AtomicUsize,
    author_lookups: AtomicUsize,
    cover_fetches: AtomicUsize,
}

impl MockSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_book(mut self, isbn: &str, book: Book) -> Self {
        self.books.insert(isbn.to_string(), Ok(book));
        self
    }

    pub fn with_lookup_error(mut self, isbn: &str, error: LookupError) -> Self {
        self.books.insert(isbn.to_string(), Err(error));
        self
    }

    /// Delay the lookup of `isbn`
    pub fn with_delay(mut self, isbn: &str, delay: Duration) -> Self {
        self.delays.insert(isbn.to_string(), delay);
        self
    }

    pub fn with_author(mut self, author: Author) -> Self {
        self.authors.insert(author.key.clone(), author);
        self
    }

    pub fn with_cover(mut self, source: CoverSource, data: Vec<u8>) -> Self {
        self.covers.insert(source.identifier(), Ok(data));
        self
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    pub fn author_lookups(&self) -> usize {
        self.author_lookups.load(Ordering::SeqCst)
    }

    pub fn cover_fetches(&self) -> usize {
        self.cover_fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MetadataSource for MockSource {
    async fn lookup_by_isbn(&self, isbn: &str) -> Result<Book, LookupError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delays.get(isbn) {
            tokio::time::sleep(*delay).await;
        }
        self.books
            .get(isbn)
            .cloned()
            .unwrap_or_else(|| Err(LookupError::NotFound(isbn.to_string())))
    }

    async fn lookup_author(&self, reference: &str) -> Result<Author, LookupError> {
        self.author_lookups.fetch_add(1, Ordering::SeqCst);
        self.authors
            .get(reference)
            .cloned()
            .ok_or_else(|| LookupError::NotFound(reference.to_string()))
    }

    async fn fetch_cover(
        &self,
        source: &CoverSource,
        _size: CoverSize,
    ) -> Result<Vec<u8>, CoverFetchError> {
        self.cover_fetches.fetch_add(1, Ordering::SeqCst);
        self.covers
            .get(&source.identifier())
            .cloned()
            .unwrap_or_else(|| {
                Err(CoverFetchError::Status {
                    url: format!("mock://{}", source.identifier()),
                    status: 404,
                })
            })
    }
}

/// A library over in-memory storage
pub fn memory_library() -> (Arc<Library>, Arc<MemoryStorage>) {
    let storage = Arc::new(MemoryStorage::new());
    let library = Arc::new(Library::new(CollectionStore::new(storage.clone())));
    (library, storage)
}

pub fn hunger_games() -> Book {
    let mut book = Book::new("/books/OL9220708M", "The Hunger Games").with_isbn13("9780439023481");
    book.isbn10 = Some("0439023483".to_string());
    book.author_links = vec!["/authors/OL1394359A".to_string()];
    book.covers = vec![12646537];
    book
}

pub fn deathly_hallows() -> Book {
    Book::new("/books/OL10236414M", "Harry Potter and the Deathly Hallows")
        .with_isbn13("9780545029360")
}
