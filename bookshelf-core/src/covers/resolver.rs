//! Per-book cover resolution across the cache, the cover host and local covers

use super::cache::{local_cover_key, remote_cover_key, CoverCache, Partition};
use crate::error::{CoverError, CoverFetchError};
use crate::finder::MetadataSource;
use crate::types::{Book, CoverImage, CoverSize, CoverSource};
use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, warn};

/// Resolves cover images for books
pub struct CoverResolver {
    source: Arc<dyn MetadataSource>,
    cache: Arc<CoverCache>,
}

impl CoverResolver {
    pub fn new(source: Arc<dyn MetadataSource>, cache: Arc<CoverCache>) -> Self {
        Self { source, cache }
    }

    pub fn cache(&self) -> &CoverCache {
        &self.cache
    }

    /// The book's first cover.
    ///
    /// Local books read their first local cover and never touch the network.
    /// Other books use the first remote cover id, or their ISBN when they list
    /// no cover ids. Only a failed remote fetch is an error.
    pub async fn first_cover(
        &self,
        book: &Book,
        size: CoverSize,
    ) -> Result<Option<CoverImage>, CoverFetchError> {
        if book.local_book {
            let Some(id) = book.local_covers.first() else {
                return Ok(None);
            };
            return Ok(self.local_cover(id).await);
        }

        let source = match (book.covers.first(), book.isbn()) {
            (Some(id), _) => CoverSource::Id(*id),
            (None, Some(isbn)) => CoverSource::Isbn(isbn.to_string()),
            (None, None) => return Ok(None),
        };
        self.remote_cover(&source, size).await
    }

    /// Every cover of the book that resolves, in source order.
    /// A remote book without cover ids falls back to its ISBN cover.
    pub async fn all_covers(&self, book: &Book, size: CoverSize) -> Vec<CoverImage> {
        if book.local_book {
            let covers = join_all(book.local_covers.iter().map(|id| self.local_cover(id))).await;
            return covers.into_iter().flatten().collect();
        }

        let mut sources: Vec<CoverSource> =
            book.covers.iter().copied().map(CoverSource::Id).collect();
        if sources.is_empty() {
            sources.extend(book.isbn().map(|isbn| CoverSource::Isbn(isbn.to_string())));
        }

        let covers = join_all(sources.iter().map(|source| async move {
            match self.remote_cover(source, size).await {
                Ok(cover) => cover,
                Err(e) => {
                    warn!("Skipping cover {:?} of {}: {}", source, book.id(), e);
                    None
                }
            }
        }))
        .await;
        covers.into_iter().flatten().collect()
    }

    /// Validate and store a user-supplied cover for a local book.
    /// Returns the new local cover id, which is also appended to the book.
    pub async fn store_local_cover(
        &self,
        book: &mut Book,
        data: Vec<u8>,
    ) -> Result<String, CoverError> {
        let image = CoverImage::decode(data).ok_or(CoverError::Undecodable)?;
        let id = uuid::Uuid::new_v4().to_string();
        self.cache
            .put(Partition::Permanent, &local_cover_key(&id), image.data)
            .await;
        book.local_covers.push(id.clone());
        Ok(id)
    }

    /// Drop the book's local covers from the permanent partition
    pub async fn forget_local_covers(&self, book: &Book) {
        for id in &book.local_covers {
            self.cache
                .remove(Partition::Permanent, &local_cover_key(id))
                .await;
        }
    }

    async fn local_cover(&self, id: &str) -> Option<CoverImage> {
        let data = self
            .cache
            .get(Partition::Permanent, &local_cover_key(id))
            .await?;
        let image = CoverImage::decode(data);
        if image.is_none() {
            warn!("Local cover {} is not a readable image", id);
        }
        image
    }

    async fn remote_cover(
        &self,
        source: &CoverSource,
        size: CoverSize,
    ) -> Result<Option<CoverImage>, CoverFetchError> {
        let key = remote_cover_key(source, size);

        if let Some(data) = self.cache.get(Partition::Temporary, &key).await {
            match CoverImage::decode(data) {
                Some(image) => return Ok(Some(image)),
                None => debug!("Cached cover {} is unreadable, fetching again", key),
            }
        }

        let data = self.source.fetch_cover(source, size).await?;
        let Some(image) = CoverImage::decode(data) else {
            warn!("Cover host returned a non-image for {}", key);
            return Ok(None);
        };

        // Only complete, decoded images reach the cache
        self.cache
            .put(Partition::Temporary, &key, image.data.clone())
            .await;
        Ok(Some(image))
    }
}
