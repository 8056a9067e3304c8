//! The owned collection: books unique by id

use super::Book;
use crate::isbn;
use serde::{Deserialize, Serialize};

/// The user's books, unique by [`Book::id`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Collection {
    books: Vec<Book>,
}

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a collection, keeping the first book for each repeated id
    pub fn from_books(books: Vec<Book>) -> Self {
        let mut collection = Self::new();
        for book in books {
            if let Err(dropped) = collection.insert(book) {
                tracing::warn!("Dropping repeated book id {}", dropped.id());
            }
        }
        collection
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn into_books(self) -> Vec<Book> {
        self.books
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Book> {
        self.books.iter()
    }

    pub fn get(&self, id: &str) -> Option<&Book> {
        self.books.iter().find(|b| b.id() == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Book> {
        self.books.iter_mut().find(|b| b.id() == id)
    }

    /// Append a book; hands it back when its id is already present
    pub fn insert(&mut self, book: Book) -> Result<(), Book> {
        if self.get(book.id()).is_some() {
            return Err(book);
        }
        self.books.push(book);
        Ok(())
    }

    pub fn remove(&mut self, id: &str) -> Option<Book> {
        let index = self.books.iter().position(|b| b.id() == id)?;
        Some(self.books.remove(index))
    }

    /// First book owning the given ISBN (input is normalized first)
    pub fn find_by_isbn(&self, raw_isbn: &str) -> Option<&Book> {
        let isbn = isbn::normalize(raw_isbn);
        if isbn.is_empty() {
            return None;
        }
        self.books.iter().find(|b| b.compare_isbn(&isbn))
    }

    pub fn contains_isbn(&self, raw_isbn: &str) -> bool {
        self.find_by_isbn(raw_isbn).is_some()
    }

    /// An owned book that is the same edition as `book`
    pub fn find_duplicate(&self, book: &Book) -> Option<&Book> {
        self.books
            .iter()
            .find(|owned| owned.id() == book.id() || owned.compare_isbn_with(book))
    }

    /// Look a book up by id, falling back to ISBN
    pub fn find(&self, id_or_isbn: &str) -> Option<&Book> {
        self.get(id_or_isbn)
            .or_else(|| self.find_by_isbn(id_or_isbn))
    }

    /// Case-insensitive search over title, subtitle, author names and ISBNs
    pub fn search(&self, query: &str) -> Vec<&Book> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return self.books.iter().collect();
        }
        let isbn_query = isbn::normalize(&query).to_uppercase();

        self.books
            .iter()
            .filter(|book| {
                book.title.to_lowercase().contains(&query)
                    || book
                        .subtitle
                        .as_deref()
                        .is_some_and(|s| s.to_lowercase().contains(&query))
                    || book
                        .author_names()
                        .any(|name| name.to_lowercase().contains(&query))
                    || (!isbn_query.is_empty()
                        && [book.isbn10.as_deref(), book.isbn13.as_deref()]
                            .into_iter()
                            .flatten()
                            .any(|isbn| isbn.contains(&isbn_query)))
            })
            .collect()
    }

    /// Books in descending title order
    pub fn sorted_by_title(&self) -> Vec<&Book> {
        let mut books: Vec<&Book> = self.books.iter().collect();
        books.sort_by(|a, b| b.title.cmp(&a.title));
        books
    }
}

impl From<Vec<Book>> for Collection {
    fn from(books: Vec<Book>) -> Self {
        Self::from_books(books)
    }
}

impl IntoIterator for Collection {
    type Item = Book;
    type IntoIter = std::vec::IntoIter<Book>;

    fn into_iter(self) -> Self::IntoIter {
        self.books.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Author;

    fn sample() -> Collection {
        let mut hunger = Book::new("/books/OL1M", "The Hunger Games").with_isbn13("9780439023481");
        hunger.authors = vec![Author::new("/authors/OL1A", "Suzanne Collins")];
        let fox = Book::new("/books/OL2M", "Fantastic Mr. Fox").with_isbn10("0140328726");
        let local = Book::new_local("Zine");
        Collection::from_books(vec![hunger, fox, local])
    }

    #[test]
    fn test_insert_rejects_repeated_id() {
        let mut collection = sample();
        let again = Book::new("/books/OL1M", "Other title");
        assert!(collection.insert(again).is_err());
        assert_eq!(collection.len(), 3);
    }

    #[test]
    fn test_from_books_keeps_first() {
        let collection = Collection::from_books(vec![
            Book::new("k", "first"),
            Book::new("k", "second"),
        ]);
        assert_eq!(collection.len(), 1);
        assert_eq!(collection.get("k").unwrap().title, "first");
    }

    #[test]
    fn test_find_by_isbn_normalizes() {
        let collection = sample();
        assert_eq!(
            collection.find_by_isbn("978-0-439-02348-1").unwrap().id(),
            "/books/OL1M"
        );
        assert!(collection.contains_isbn("0140328726"));
        assert!(!collection.contains_isbn(""));
        assert!(!collection.contains_isbn("9999999999"));
    }

    #[test]
    fn test_search() {
        let collection = sample();
        let titles = |q: &str| -> Vec<String> {
            collection.search(q).iter().map(|b| b.title.clone()).collect()
        };
        assert_eq!(titles("hunger"), vec!["The Hunger Games"]);
        assert_eq!(titles("collins"), vec!["The Hunger Games"]);
        assert_eq!(titles("0140328726"), vec!["Fantastic Mr. Fox"]);
        assert_eq!(titles("").len(), 3);
        assert!(titles("nothing like this").is_empty());
    }

    #[test]
    fn test_sorted_by_title_descending() {
        let collection = sample();
        let titles: Vec<&str> = collection
            .sorted_by_title()
            .iter()
            .map(|b| b.title.as_str())
            .collect();
        assert_eq!(titles, vec!["Zine", "The Hunger Games", "Fantastic Mr. Fox"]);
    }

    #[test]
    fn test_remove() {
        let mut collection = sample();
        let removed = collection.remove("/books/OL2M").unwrap();
        assert_eq!(removed.title, "Fantastic Mr. Fox");
        assert!(collection.remove("/books/OL2M").is_none());
    }
}
