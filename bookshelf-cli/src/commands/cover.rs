//! Cover command implementation

use super::Shelf;
use anyhow::{bail, Context, Result};
use bookshelf_core::CoverSize;
use std::fs;
use std::path::Path;

/// Save the first cover to `output`, or every cover into the `output` directory
pub async fn cover(
    shelf: &Shelf,
    id_or_isbn: &str,
    output: &str,
    size: CoverSize,
    all: bool,
) -> Result<()> {
    let book = shelf.book(id_or_isbn).await?;
    let resolver = shelf.resolver()?;

    if !all {
        let image = resolver
            .first_cover(&book, size)
            .await
            .with_context(|| format!("Failed to fetch the cover of {}", book.title))?;
        let Some(image) = image else {
            bail!("\"{}\" has no cover", book.title);
        };
        fs::write(output, &image.data)
            .with_context(|| format!("Failed to write cover: {}", output))?;
        println!("Saved {} cover to {}", image.format.mime_type(), output);
        return Ok(());
    }

    let images = resolver.all_covers(&book, size).await;
    if images.is_empty() {
        bail!("\"{}\" has no cover", book.title);
    }

    let dir = Path::new(output);
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory: {}", output))?;
    for (index, image) in images.iter().enumerate() {
        let path = dir.join(format!("cover-{}.{}", index + 1, image.format.extension()));
        fs::write(&path, &image.data)
            .with_context(|| format!("Failed to write cover: {}", path.display()))?;
    }
    println!("Saved {} cover(s) to {}", images.len(), output);

    Ok(())
}
