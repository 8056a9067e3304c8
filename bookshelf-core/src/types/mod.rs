//! Core types for books, authors, covers and the owned collection

mod author;
mod book;
mod collection;
mod cover;

pub use author::Author;
pub use book::Book;
pub use collection::Collection;
pub use cover::{CoverImage, CoverSize, CoverSource, ImageFormat};

use chrono::NaiveDate;
use serde::Deserialize;

/// Text the library API delivers either as a plain string or as a typed
/// `{"type": "/type/text", "value": "..."}` object
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum LooseText {
    Plain(String),
    Typed { value: String },
}

impl LooseText {
    pub(crate) fn into_string(self) -> String {
        match self {
            LooseText::Plain(s) | LooseText::Typed { value: s } => s,
        }
    }
}

/// Parse the free-form dates the library API publishes
/// ("Oct 1, 2008", "October 1, 2008", "31 July 1965", "2008-10-01", "2008")
pub(crate) fn parse_loose_date(raw: &str) -> Option<NaiveDate> {
    const FORMATS: &[&str] = &["%b %d, %Y", "%B %d, %Y", "%d %B %Y", "%d %b %Y", "%Y-%m-%d"];

    let raw = raw.trim();
    for format in FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return Some(date);
        }
    }

    if raw.len() == 4 {
        if let Ok(year) = raw.parse::<i32>() {
            return NaiveDate::from_ymd_opt(year, 1, 1);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_loose_date() {
        let oct_first = NaiveDate::from_ymd_opt(2008, 10, 1);
        assert_eq!(parse_loose_date("Oct 1, 2008"), oct_first);
        assert_eq!(parse_loose_date("October 1, 2008"), oct_first);
        assert_eq!(parse_loose_date("1 October 2008"), oct_first);
        assert_eq!(parse_loose_date("2008-10-01"), oct_first);
        assert_eq!(parse_loose_date("2008"), NaiveDate::from_ymd_opt(2008, 1, 1));
        assert_eq!(parse_loose_date("sometime"), None);
    }
}
