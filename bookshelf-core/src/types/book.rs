//! The Book type - one entry of the owned collection

use super::{parse_loose_date, Author, LooseText};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A book as fetched from the library API or created locally
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    /// Library edition key (e.g. `/books/OL7353617M`), or `local-<uuid>` for local books
    pub key: String,

    pub isbn10: Option<String>,
    pub isbn13: Option<String>,

    pub title: String,
    pub subtitle: Option<String>,
    pub description: Option<String>,

    /// Remote cover ids
    pub covers: Vec<u64>,

    /// Ids of covers stored in the permanent cover cache
    pub local_covers: Vec<String>,

    /// Created locally: only `local_covers` can be trusted
    pub local_book: bool,

    /// Author references not resolved yet (e.g. `/authors/OL23919A`)
    pub author_links: Vec<String>,

    /// Resolved authors
    pub authors: Vec<Author>,

    pub publishers: Vec<String>,

    /// Publication date as published (`Oct 1, 2008`, `2008`, ...)
    pub publish_date: Option<String>,

    /// Marked as favorite
    pub marked: bool,
    pub notes: String,
    pub lent_to: Option<String>,
}

impl Book {
    /// Create a book with the given library key and title
    pub fn new(key: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            isbn10: None,
            isbn13: None,
            title: title.into(),
            subtitle: None,
            description: None,
            covers: Vec::new(),
            local_covers: Vec::new(),
            local_book: false,
            author_links: Vec::new(),
            authors: Vec::new(),
            publishers: Vec::new(),
            publish_date: None,
            marked: false,
            notes: String::new(),
            lent_to: None,
        }
    }

    /// Create a locally entered book with a generated key
    pub fn new_local(title: impl Into<String>) -> Self {
        let mut book = Self::new(format!("local-{}", uuid::Uuid::new_v4()), title);
        book.local_book = true;
        book
    }

    /// Set ISBN-13
    pub fn with_isbn13(mut self, isbn13: impl Into<String>) -> Self {
        self.isbn13 = Some(isbn13.into());
        self
    }

    /// Set ISBN-10
    pub fn with_isbn10(mut self, isbn10: impl Into<String>) -> Self {
        self.isbn10 = Some(isbn10.into());
        self
    }

    /// Stable identifier within the collection
    pub fn id(&self) -> &str {
        &self.key
    }

    /// Preferred ISBN (13 before 10)
    pub fn isbn(&self) -> Option<&str> {
        self.isbn13.as_deref().or(self.isbn10.as_deref())
    }

    pub fn has_cover(&self) -> bool {
        !self.covers.is_empty() || !self.local_covers.is_empty()
    }

    /// Parsed publication date, when the published string is in a recognized format
    pub fn published_on(&self) -> Option<NaiveDate> {
        self.publish_date.as_deref().and_then(parse_loose_date)
    }

    /// Names of resolved authors
    pub fn author_names(&self) -> impl Iterator<Item = &str> {
        self.authors.iter().map(|a| a.name.as_str())
    }

    /// Whether either of this book's ISBNs equals `isbn`
    pub fn compare_isbn(&self, isbn: &str) -> bool {
        self.isbn10.as_deref() == Some(isbn) || self.isbn13.as_deref() == Some(isbn)
    }

    /// Duplicate check: a present ISBN-10 or ISBN-13 matching the other book's.
    /// Books without any ISBN are never duplicates.
    pub fn compare_isbn_with(&self, other: &Book) -> bool {
        let same10 = self.isbn10.is_some() && self.isbn10 == other.isbn10;
        let same13 = self.isbn13.is_some() && self.isbn13 == other.isbn13;
        same10 || same13
    }
}

/// ISBNs arrive as a single string or as a list
#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    fn first(self) -> Option<String> {
        match self {
            OneOrMany::One(s) => Some(s),
            OneOrMany::Many(list) => list.into_iter().next(),
        }
    }
}

/// Author entries are tried in a fixed order: a fully inlined record,
/// a `{"key": ...}` wrapper, then a bare reference string
#[derive(Deserialize)]
#[serde(untagged)]
enum AuthorEntry {
    Inline(Author),
    Wrapped { key: String },
    Link(String),
}

#[derive(Deserialize)]
struct RawBook {
    key: String,
    #[serde(default)]
    isbn_10: Option<OneOrMany>,
    #[serde(default)]
    isbn_13: Option<OneOrMany>,
    title: String,
    #[serde(default)]
    subtitle: Option<String>,
    #[serde(default)]
    description: Option<LooseText>,
    #[serde(default)]
    authors: Option<Vec<AuthorEntry>>,
    #[serde(default)]
    author_links: Option<Vec<String>>,
    #[serde(default)]
    publish_date: Option<String>,
    #[serde(default)]
    publishers: Option<Vec<String>>,
    #[serde(default)]
    covers: Option<Vec<i64>>,
    #[serde(default)]
    local_cover_names: Option<Vec<String>>,
    #[serde(default)]
    local_book: Option<bool>,
    #[serde(default)]
    marked: Option<bool>,
    #[serde(default)]
    notes: Option<String>,
    #[serde(default, rename = "lentTo")]
    lent_to: Option<String>,
}

impl From<RawBook> for Book {
    fn from(raw: RawBook) -> Self {
        let mut authors = Vec::new();
        let mut author_links = Vec::new();
        for entry in raw.authors.unwrap_or_default() {
            match entry {
                AuthorEntry::Inline(author) => authors.push(author),
                AuthorEntry::Wrapped { key } | AuthorEntry::Link(key) => author_links.push(key),
            }
        }
        author_links.extend(raw.author_links.unwrap_or_default());

        Self {
            key: raw.key,
            isbn10: raw.isbn_10.and_then(OneOrMany::first),
            isbn13: raw.isbn_13.and_then(OneOrMany::first),
            title: raw.title,
            subtitle: raw.subtitle,
            description: raw.description.map(LooseText::into_string),
            // The API uses -1 as a "no cover" placeholder
            covers: raw
                .covers
                .unwrap_or_default()
                .into_iter()
                .filter_map(|id| u64::try_from(id).ok())
                .collect(),
            local_covers: raw.local_cover_names.unwrap_or_default(),
            local_book: raw.local_book.unwrap_or(false),
            author_links,
            authors,
            publishers: raw.publishers.unwrap_or_default(),
            publish_date: raw.publish_date,
            marked: raw.marked.unwrap_or(false),
            notes: raw.notes.unwrap_or_default(),
            lent_to: raw.lent_to,
        }
    }
}

impl<'de> Deserialize<'de> for Book {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        RawBook::deserialize(deserializer).map(Book::from)
    }
}

#[derive(Serialize)]
#[serde(untagged)]
enum AuthorsOut<'a> {
    Resolved(&'a [Author]),
    Links(&'a [String]),
}

#[derive(Serialize)]
struct BookOut<'a> {
    key: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    isbn_10: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    isbn_13: Option<&'a str>,
    title: &'a str,
    subtitle: Option<&'a str>,
    description: Option<&'a str>,
    authors: AuthorsOut<'a>,
    /// Only written when resolved authors occupy `authors`
    #[serde(skip_serializing_if = "Option::is_none")]
    author_links: Option<&'a [String]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    publish_date: Option<&'a str>,
    publishers: &'a [String],
    covers: &'a [u64],
    local_cover_names: &'a [String],
    local_book: bool,
    marked: bool,
    notes: Option<&'a str>,
    #[serde(rename = "lentTo", skip_serializing_if = "Option::is_none")]
    lent_to: Option<&'a str>,
}

impl<'a> From<&'a Book> for BookOut<'a> {
    fn from(book: &'a Book) -> Self {
        let resolved = !book.authors.is_empty();
        Self {
            key: &book.key,
            isbn_10: book.isbn10.as_deref(),
            isbn_13: book.isbn13.as_deref(),
            title: &book.title,
            subtitle: book.subtitle.as_deref(),
            description: book.description.as_deref(),
            authors: if resolved {
                AuthorsOut::Resolved(&book.authors)
            } else {
                AuthorsOut::Links(&book.author_links)
            },
            author_links: (resolved && !book.author_links.is_empty())
                .then_some(book.author_links.as_slice()),
            publish_date: book.publish_date.as_deref(),
            publishers: &book.publishers,
            covers: &book.covers,
            local_cover_names: &book.local_covers,
            local_book: book.local_book,
            marked: book.marked,
            notes: (!book.notes.is_empty()).then_some(book.notes.as_str()),
            lent_to: book.lent_to.as_deref(),
        }
    }
}

impl Serialize for Book {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        BookOut::from(self).serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EDITION_JSON: &str = r#"{
        "key": "/books/OL7353617M",
        "title": "Fantastic Mr. Fox",
        "isbn_10": ["0140328726"],
        "isbn_13": ["9780140328721"],
        "authors": [{"key": "/authors/OL34184A"}],
        "publishers": ["Puffin"],
        "publish_date": "October 1, 1988",
        "covers": [8739161, -1],
        "number_of_pages": 96
    }"#;

    #[test]
    fn test_decode_edition() {
        let book: Book = serde_json::from_str(EDITION_JSON).unwrap();
        assert_eq!(book.id(), "/books/OL7353617M");
        assert_eq!(book.isbn10.as_deref(), Some("0140328726"));
        assert_eq!(book.isbn13.as_deref(), Some("9780140328721"));
        assert_eq!(book.author_links, vec!["/authors/OL34184A"]);
        assert!(book.authors.is_empty());
        assert_eq!(book.covers, vec![8739161]);
        assert!(!book.local_book);
        assert!(!book.marked);
        assert_eq!(book.notes, "");
        assert_eq!(book.published_on(), NaiveDate::from_ymd_opt(1988, 10, 1));
    }

    #[test]
    fn test_decode_isbn_as_plain_string() {
        let book: Book = serde_json::from_str(
            r#"{"key": "k", "title": "t", "isbn_10": "0140328726", "isbn_13": null}"#,
        )
        .unwrap();
        assert_eq!(book.isbn10.as_deref(), Some("0140328726"));
        assert!(book.isbn13.is_none());
    }

    #[test]
    fn test_decode_author_shapes() {
        let book: Book = serde_json::from_str(
            r#"{"key": "k", "title": "t", "authors": [
                "/authors/OL1A",
                {"key": "/authors/OL2A"},
                {"key": "/authors/OL3A", "name": "Inline Author", "bio": "b"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(book.author_links, vec!["/authors/OL1A", "/authors/OL2A"]);
        assert_eq!(book.authors.len(), 1);
        assert_eq!(book.authors[0].name, "Inline Author");
    }

    #[test]
    fn test_decode_requires_title() {
        assert!(serde_json::from_str::<Book>(r#"{"key": "k"}"#).is_err());
    }

    #[test]
    fn test_round_trip_with_resolved_authors() {
        let mut book: Book = serde_json::from_str(EDITION_JSON).unwrap();
        book.authors = vec![Author::new("/authors/OL34184A", "Roald Dahl")];
        book.marked = true;
        book.notes = "Read twice".to_string();
        book.lent_to = Some("Sam".to_string());

        let json = serde_json::to_string(&book).unwrap();
        let decoded: Book = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, book);
    }

    #[test]
    fn test_compare_isbn() {
        let book = Book::new("k", "t").with_isbn13("9780545029360");
        assert!(book.compare_isbn("9780545029360"));
        assert!(!book.compare_isbn("0545029368"));

        let bare = Book::new("k2", "t2");
        assert!(!bare.compare_isbn(""));
        assert!(!bare.compare_isbn_with(&bare.clone()));
    }

    #[test]
    fn test_compare_isbn_with_either_matching() {
        let a = Book::new("a", "A").with_isbn10("0545029368");
        let b = Book::new("b", "B")
            .with_isbn10("0545029368")
            .with_isbn13("9780545029360");
        let c = Book::new("c", "C").with_isbn13("9780545029360");
        assert!(a.compare_isbn_with(&b));
        assert!(c.compare_isbn_with(&b));
        assert!(!a.compare_isbn_with(&c));
    }

    #[test]
    fn test_new_local_book() {
        let book = Book::new_local("Handwritten Notes");
        assert!(book.local_book);
        assert!(book.key.starts_with("local-"));
        assert!(!book.has_cover());
    }
}
