//! Bookshelf Core Library
//!
//! This crate provides the collection model, metadata lookups, cover caching
//! and scan intake for the Bookshelf personal library. Books are looked up by
//! ISBN against Open Library, kept in a single persisted collection record,
//! and their covers are cached on disk.

pub mod config;
pub mod covers;
pub mod error;
pub mod finder;
pub mod isbn;
pub mod library;
pub mod scanner;
pub mod storage;
pub mod store;
pub mod types;

pub use config::ShelfConfig;
pub use covers::{CoverCache, CoverResolver, Partition};
pub use error::{
    CoverError, CoverFetchError, LibraryError, LookupError, Result, ShelfError, StorageError,
    StoreError,
};
pub use finder::{MetadataSource, OpenLibraryClient};
pub use library::{AddOutcome, Library};
pub use scanner::{ScanPipeline, ScanState};
pub use store::CollectionStore;
pub use types::{Author, Book, Collection, CoverImage, CoverSize, CoverSource, ImageFormat};
