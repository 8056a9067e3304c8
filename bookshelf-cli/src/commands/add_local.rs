//! Add-local command implementation

use super::Shelf;
use anyhow::{bail, Context, Result};
use bookshelf_core::{isbn, AddOutcome, Book};

/// Add a book that was entered by hand
pub async fn add_local(
    shelf: &Shelf,
    title: &str,
    raw_isbn: Option<&str>,
    cover: Option<&str>,
) -> Result<()> {
    let title = title.trim();
    if title.is_empty() {
        bail!("Title must not be empty");
    }

    let mut book = Book::new_local(title);
    if let Some(raw) = raw_isbn {
        let code = isbn::normalize(raw);
        if !isbn::is_valid(&code) {
            bail!("{} is not a valid ISBN", raw);
        }
        match code.len() {
            10 => book.isbn10 = Some(code),
            _ => book.isbn13 = Some(code),
        }
    }

    // Resolver that holds the freshly stored cover, if any
    let mut cover_owner = None;
    if let Some(path) = cover {
        let data =
            std::fs::read(path).with_context(|| format!("Failed to read cover: {}", path))?;
        let resolver = shelf.resolver()?;
        resolver
            .store_local_cover(&mut book, data)
            .await
            .with_context(|| format!("{} is not a supported image", path))?;
        cover_owner = Some(resolver);
    }

    match shelf.library.add(book.clone()).await? {
        AddOutcome::Added => {
            println!("Added \"{}\" as {}", book.title, book.id());
        }
        AddOutcome::AlreadyOwned(owned) => {
            if let Some(resolver) = cover_owner {
                resolver.forget_local_covers(&book).await;
            }
            bail!("Already in your collection as {}", owned.id());
        }
    }

    Ok(())
}
