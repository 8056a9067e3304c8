//! Metadata lookups against the remote library API
//!
//! [`MetadataSource`] is the seam the cover resolver, the library and the
//! scan pipeline depend on; [`OpenLibraryClient`] is the HTTP implementation.
//! Nothing here caches: repeated lookups hit the network again.

mod open_library;

pub use open_library::OpenLibraryClient;

use crate::error::{CoverFetchError, LookupError};
use crate::types::{Author, Book, CoverSize, CoverSource};
use async_trait::async_trait;

/// Remote source of book metadata and cover images
#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// Resolve an ISBN to a book record
    async fn lookup_by_isbn(&self, isbn: &str) -> Result<Book, LookupError>;

    /// Resolve an author reference such as `/authors/OL23919A`
    async fn lookup_author(&self, reference: &str) -> Result<Author, LookupError>;

    /// Fetch raw cover image bytes
    async fn fetch_cover(
        &self,
        source: &CoverSource,
        size: CoverSize,
    ) -> Result<Vec<u8>, CoverFetchError>;

    /// Resolve the book's author references, skipping those that fail.
    /// Does nothing when authors are already resolved.
    async fn load_authors(&self, book: &mut Book) {
        if !book.authors.is_empty() {
            return;
        }
        for link in &book.author_links {
            match self.lookup_author(link).await {
                Ok(author) => book.authors.push(author),
                Err(e) => tracing::warn!("Skipping author {} of {}: {}", link, book.id(), e),
            }
        }
    }
}
