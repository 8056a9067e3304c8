//! CLI command implementations

mod add_local;
mod cover;
mod edit;
mod list;
mod prune;
mod scan;
mod show;

pub use add_local::add_local;
pub use cover::cover;
pub use edit::{lend, mark, note, remove};
pub use list::list;
pub use prune::prune_cache;
pub use scan::scan;
pub use show::show;

use anyhow::{anyhow, Context, Result};
use bookshelf_core::{
    Book, CoverCache, CoverResolver, Library, MetadataSource, OpenLibraryClient, ShelfConfig,
};
use std::sync::Arc;

/// Everything a command needs, opened from the environment
pub struct Shelf {
    pub config: ShelfConfig,
    pub library: Arc<Library>,
    pub covers: Arc<CoverCache>,
}

impl Shelf {
    pub fn open() -> Self {
        let config = ShelfConfig::from_env();
        tracing::debug!(
            "Data in {}, cache in {}",
            config.data_dir.display(),
            config.cache_dir.display()
        );
        Self {
            library: Arc::new(Library::open(&config.data_dir)),
            covers: Arc::new(CoverCache::new(
                config.temporary_covers_dir(),
                config.permanent_covers_dir(),
            )),
            config,
        }
    }

    /// HTTP metadata source; only commands that go online create one
    pub fn source(&self) -> Result<Arc<dyn MetadataSource>> {
        let client = OpenLibraryClient::from_config(&self.config)
            .context("Failed to create the HTTP client")?;
        Ok(Arc::new(client))
    }

    pub fn resolver(&self) -> Result<CoverResolver> {
        Ok(CoverResolver::new(self.source()?, self.covers.clone()))
    }

    /// A book by id or ISBN, or an error naming it
    pub async fn book(&self, id_or_isbn: &str) -> Result<Book> {
        self.library
            .get(id_or_isbn)
            .await
            .ok_or_else(|| anyhow!("No book with id or ISBN {}", id_or_isbn))
    }
}

/// One-line description used in listings and messages
pub(crate) fn describe(book: &Book) -> String {
    let mut line = book.title.clone();
    let authors: Vec<&str> = book.author_names().collect();
    if !authors.is_empty() {
        line.push_str(" by ");
        line.push_str(&authors.join(", "));
    }
    if let Some(isbn) = book.isbn() {
        line.push_str(&format!(" ({})", isbn));
    }
    line
}
