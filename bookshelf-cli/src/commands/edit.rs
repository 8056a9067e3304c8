//! Commands that change one book: mark, note, lend, remove

use super::Shelf;
use anyhow::{Context, Result};

/// Toggle the favorite mark
pub async fn mark(shelf: &Shelf, id_or_isbn: &str) -> Result<()> {
    let marked = shelf
        .library
        .toggle_marked(id_or_isbn)
        .await
        .with_context(|| format!("Failed to mark {}", id_or_isbn))?;
    println!("{}", if marked { "Marked" } else { "Unmarked" });
    Ok(())
}

pub async fn note(shelf: &Shelf, id_or_isbn: &str, text: &str) -> Result<()> {
    let book = shelf
        .library
        .set_notes(id_or_isbn, text.trim())
        .await
        .with_context(|| format!("Failed to update notes of {}", id_or_isbn))?;
    if book.notes.is_empty() {
        println!("Cleared notes of \"{}\"", book.title);
    } else {
        println!("Updated notes of \"{}\"", book.title);
    }
    Ok(())
}

pub async fn lend(shelf: &Shelf, id_or_isbn: &str, borrower: Option<String>) -> Result<()> {
    let book = shelf
        .library
        .lend(id_or_isbn, borrower)
        .await
        .with_context(|| format!("Failed to update loan of {}", id_or_isbn))?;
    match &book.lent_to {
        Some(name) => println!("\"{}\" lent to {}", book.title, name),
        None => println!("\"{}\" is back on the shelf", book.title),
    }
    Ok(())
}

/// Remove a book along with its local covers
pub async fn remove(shelf: &Shelf, id_or_isbn: &str) -> Result<()> {
    let book = shelf
        .library
        .remove(id_or_isbn)
        .await
        .with_context(|| format!("Failed to remove {}", id_or_isbn))?;
    if !book.local_covers.is_empty() {
        shelf.resolver()?.forget_local_covers(&book).await;
    }
    println!("Removed \"{}\"", book.title);
    Ok(())
}
