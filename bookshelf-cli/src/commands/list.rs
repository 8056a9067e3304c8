//! List command implementation

use super::{describe, Shelf};
use anyhow::Result;

/// List the collection, newest titles first as the collection sorts them
pub async fn list(shelf: &Shelf, search: Option<&str>, json: bool) -> Result<()> {
    let books = match search {
        Some(query) => {
            let mut found = shelf.library.search(query).await;
            found.sort_by(|a, b| b.title.cmp(&a.title));
            found
        }
        None => shelf.library.sorted().await,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&books)?);
        return Ok(());
    }

    if books.is_empty() {
        println!("No books");
        return Ok(());
    }

    for book in &books {
        let mut flags = String::new();
        if book.marked {
            flags.push('*');
        }
        if book.lent_to.is_some() {
            flags.push('L');
        }
        println!("{:<2} {:<44} {}", flags, book.id(), describe(book));
    }
    println!("{} book(s)", books.len());

    Ok(())
}
