//! Author records as returned by the library API

use super::{parse_loose_date, LooseText};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// A resolved author record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Author {
    /// Library identifier, e.g. `/authors/OL23919A`
    pub key: String,

    /// Display name
    pub name: String,

    #[serde(default)]
    pub personal_name: Option<String>,

    /// Birth date as published, e.g. `31 July 1965`
    #[serde(default)]
    pub birth_date: Option<String>,

    /// Biography text (empty when the library has none)
    #[serde(default, deserialize_with = "deserialize_bio")]
    pub bio: String,
}

impl Author {
    pub fn new(key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            personal_name: None,
            birth_date: None,
            bio: String::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.key
    }

    /// Parsed birth date, when the published string is in a recognized format
    pub fn born_on(&self) -> Option<NaiveDate> {
        self.birth_date.as_deref().and_then(parse_loose_date)
    }
}

fn deserialize_bio<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let bio = Option::<LooseText>::deserialize(deserializer)?;
    Ok(bio.map(LooseText::into_string).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_plain_bio() {
        let author: Author = serde_json::from_str(
            r#"{"key": "/authors/OL23919A", "name": "J. K. Rowling",
                "personal_name": "Joanne Rowling", "birth_date": "31 July 1965",
                "bio": "British author."}"#,
        )
        .unwrap();
        assert_eq!(author.name, "J. K. Rowling");
        assert_eq!(author.personal_name.as_deref(), Some("Joanne Rowling"));
        assert_eq!(author.bio, "British author.");
        assert_eq!(author.born_on(), NaiveDate::from_ymd_opt(1965, 7, 31));
    }

    #[test]
    fn test_decode_typed_bio() {
        let author: Author = serde_json::from_str(
            r#"{"key": "/authors/OL1A", "name": "Someone",
                "bio": {"type": "/type/text", "value": "Wrote things."}}"#,
        )
        .unwrap();
        assert_eq!(author.bio, "Wrote things.");
    }

    #[test]
    fn test_decode_missing_optional_fields() {
        let author: Author =
            serde_json::from_str(r#"{"key": "/authors/OL1A", "name": "Someone", "bio": null}"#)
                .unwrap();
        assert_eq!(author.bio, "");
        assert!(author.birth_date.is_none());
        assert!(author.born_on().is_none());
    }

    #[test]
    fn test_name_is_required() {
        assert!(serde_json::from_str::<Author>(r#"{"key": "/authors/OL1A"}"#).is_err());
    }
}
