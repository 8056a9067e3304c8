//! Cover images, sizes and remote cover sources

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Image formats recognized by their magic bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Jpeg,
    Png,
    Gif,
    Webp,
    Bmp,
}

impl ImageFormat {
    /// Detect the format from the leading bytes
    pub fn sniff(data: &[u8]) -> Option<Self> {
        match data {
            // JPEG: FF D8 FF
            [0xFF, 0xD8, 0xFF, ..] => Some(Self::Jpeg),
            // PNG: 89 50 4E 47 0D 0A 1A 0A
            [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, ..] => Some(Self::Png),
            // GIF: GIF87a or GIF89a
            [b'G', b'I', b'F', b'8', ..] => Some(Self::Gif),
            // WEBP: RIFF____WEBP
            [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => Some(Self::Webp),
            [b'B', b'M', ..] => Some(Self::Bmp),
            _ => None,
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Gif => "image/gif",
            Self::Webp => "image/webp",
            Self::Bmp => "image/bmp",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::Gif => "gif",
            Self::Webp => "webp",
            Self::Bmp => "bmp",
        }
    }
}

/// A decoded cover image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverImage {
    pub format: ImageFormat,
    pub data: Vec<u8>,
}

impl CoverImage {
    /// Decode raw bytes; `None` when they are not a recognized image
    pub fn decode(data: Vec<u8>) -> Option<Self> {
        let format = ImageFormat::sniff(&data)?;
        Some(Self { format, data })
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Cover sizes offered by the cover host
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CoverSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl CoverSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            CoverSize::Small => "S",
            CoverSize::Medium => "M",
            CoverSize::Large => "L",
        }
    }
}

impl fmt::Display for CoverSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CoverSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "S" | "SMALL" => Ok(CoverSize::Small),
            "M" | "MEDIUM" => Ok(CoverSize::Medium),
            "L" | "LARGE" => Ok(CoverSize::Large),
            _ => Err(format!("'{}' is not a cover size (S, M or L)", s)),
        }
    }
}

/// What a remote cover is addressed by
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CoverSource {
    /// Numeric cover id
    Id(u64),
    Isbn(String),
}

impl CoverSource {
    /// URL path segment naming the identifier kind
    pub fn kind(&self) -> &'static str {
        match self {
            CoverSource::Id(_) => "id",
            CoverSource::Isbn(_) => "isbn",
        }
    }

    pub fn identifier(&self) -> String {
        match self {
            CoverSource::Id(id) => id.to_string(),
            CoverSource::Isbn(isbn) => isbn.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sniff_formats() {
        assert_eq!(
            ImageFormat::sniff(&[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10]),
            Some(ImageFormat::Jpeg)
        );
        assert_eq!(
            ImageFormat::sniff(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00]),
            Some(ImageFormat::Png)
        );
        assert_eq!(ImageFormat::sniff(b"GIF89a..."), Some(ImageFormat::Gif));
        assert_eq!(ImageFormat::sniff(b"RIFF\0\0\0\0WEBPVP8 "), Some(ImageFormat::Webp));
        assert_eq!(ImageFormat::sniff(b"<html>"), None);
        assert_eq!(ImageFormat::sniff(&[]), None);
    }

    #[test]
    fn test_decode_rejects_truncated_png() {
        assert!(CoverImage::decode(vec![0x89, 0x50, 0x4E]).is_none());
    }

    #[test]
    fn test_cover_size_parse() {
        assert_eq!("s".parse::<CoverSize>().unwrap(), CoverSize::Small);
        assert_eq!("Large".parse::<CoverSize>().unwrap(), CoverSize::Large);
        assert!("XL".parse::<CoverSize>().is_err());
        assert_eq!(CoverSize::default().to_string(), "M");
    }
}
