//! Show command implementation

use super::Shelf;
use anyhow::Result;
use bookshelf_core::Book;

/// Display information about a book, resolving its authors first when needed
pub async fn show(shelf: &Shelf, id_or_isbn: &str, json: bool) -> Result<()> {
    let mut book = shelf.book(id_or_isbn).await?;

    if book.authors.is_empty() && !book.author_links.is_empty() {
        match shelf.source() {
            Ok(source) => match shelf.library.resolve_authors(book.id(), source.as_ref()).await {
                Ok(resolved) => book = resolved,
                Err(e) => tracing::warn!("Could not resolve authors: {}", e),
            },
            Err(e) => tracing::warn!("{:#}", e),
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&book)?);
    } else {
        print_book(&book);
    }

    Ok(())
}

fn print_book(book: &Book) {
    println!("Title:       {}", book.title);
    if let Some(subtitle) = &book.subtitle {
        println!("Subtitle:    {}", subtitle);
    }
    let authors: Vec<&str> = book.author_names().collect();
    if !authors.is_empty() {
        println!("Authors:     {}", authors.join(", "));
    } else if !book.author_links.is_empty() {
        println!("Authors:     {}", book.author_links.join(", "));
    }
    println!("Id:          {}", book.id());
    if let Some(isbn) = &book.isbn13 {
        println!("ISBN-13:     {}", isbn);
    }
    if let Some(isbn) = &book.isbn10 {
        println!("ISBN-10:     {}", isbn);
    }
    if !book.publishers.is_empty() {
        println!("Publisher:   {}", book.publishers.join(", "));
    }
    match (book.published_on(), &book.publish_date) {
        (Some(date), _) => println!("Published:   {}", date.format("%Y-%m-%d")),
        (None, Some(raw)) => println!("Published:   {}", raw),
        (None, None) => {}
    }
    if let Some(description) = &book.description {
        println!("Description: {}", description);
    }
    let covers = if book.local_book {
        book.local_covers.len()
    } else {
        book.covers.len()
    };
    println!("Covers:      {}", covers);
    if book.marked {
        println!("Favorite:    yes");
    }
    if let Some(borrower) = &book.lent_to {
        println!("Lent to:     {}", borrower);
    }
    if !book.notes.is_empty() {
        println!("Notes:       {}", book.notes);
    }
}
