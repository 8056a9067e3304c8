//! Configuration for Bookshelf Core.
//!
//! Constants for network access, scanning and persistence, plus the
//! runtime [`ShelfConfig`] resolved from the environment.

use directories::ProjectDirs;
use std::path::PathBuf;
use std::time::Duration;

/// Network-related configuration.
pub struct NetworkConfig;

impl NetworkConfig {
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
    pub const USER_AGENT: &'static str = concat!("Bookshelf/", env!("CARGO_PKG_VERSION"));
    pub const API_HOST: &'static str = "openlibrary.org";
    pub const COVER_HOST: &'static str = "covers.openlibrary.org";
}

/// Scan pipeline timing.
pub struct ScanConfig;

impl ScanConfig {
    /// How long `NotFound` and `Failed` stay up before returning to idle
    pub const DISMISS_DELAY: Duration = Duration::from_secs(2);
}

/// Persistence layout.
pub struct StoreConfig;

impl StoreConfig {
    /// Record holding the serialized collection
    pub const COLLECTION_KEY: &'static str = "de.bookshelf.books.json";
    pub const COVERS_DIR_NAME: &'static str = "covers";
    /// Default size limit of the temporary cover partition
    pub const TEMPORARY_COVERS_MAX_BYTES: u64 = 200 * 1024 * 1024;
}

/// Runtime configuration
#[derive(Debug, Clone)]
pub struct ShelfConfig {
    /// Durable data (collection record, local covers)
    pub data_dir: PathBuf,

    /// Evictable data (remote cover cache)
    pub cache_dir: PathBuf,

    pub api_host: String,
    pub cover_host: String,
    pub request_timeout: Duration,
}

impl Default for ShelfConfig {
    fn default() -> Self {
        let (data_dir, cache_dir) = match ProjectDirs::from("de", "bookshelf", "bookshelf") {
            Some(dirs) => (dirs.data_dir().to_path_buf(), dirs.cache_dir().to_path_buf()),
            None => {
                let fallback = PathBuf::from("./bookshelf_data");
                (fallback.clone(), fallback.join("cache"))
            }
        };

        Self {
            data_dir,
            cache_dir,
            api_host: NetworkConfig::API_HOST.to_string(),
            cover_host: NetworkConfig::COVER_HOST.to_string(),
            request_timeout: NetworkConfig::REQUEST_TIMEOUT,
        }
    }
}

impl ShelfConfig {
    /// Defaults overridden by `BOOKSHELF_DATA_DIR`, `BOOKSHELF_CACHE_DIR`,
    /// `BOOKSHELF_API_HOST` and `BOOKSHELF_COVER_HOST`
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(dir) = std::env::var("BOOKSHELF_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
            // Keep the cache next to an explicitly chosen data dir unless told otherwise
            config.cache_dir = config.data_dir.join("cache");
        }
        if let Ok(dir) = std::env::var("BOOKSHELF_CACHE_DIR") {
            config.cache_dir = PathBuf::from(dir);
        }
        if let Ok(host) = std::env::var("BOOKSHELF_API_HOST") {
            config.api_host = host;
        }
        if let Ok(host) = std::env::var("BOOKSHELF_COVER_HOST") {
            config.cover_host = host;
        }

        config
    }

    /// Root of the permanent cover partition
    pub fn permanent_covers_dir(&self) -> PathBuf {
        self.data_dir.join(StoreConfig::COVERS_DIR_NAME)
    }

    /// Root of the temporary cover partition
    pub fn temporary_covers_dir(&self) -> PathBuf {
        self.cache_dir.join(StoreConfig::COVERS_DIR_NAME)
    }
}
