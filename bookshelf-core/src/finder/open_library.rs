//! Open Library HTTP client

use super::MetadataSource;
use crate::config::{NetworkConfig, ShelfConfig};
use crate::error::{CoverFetchError, LookupError};
use crate::types::{Author, Book, CoverSize, CoverSource};
use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

/// Client for the Open Library JSON and cover endpoints
pub struct OpenLibraryClient {
    client: Client,
    api_base: String,
    cover_base: String,
}

impl OpenLibraryClient {
    /// Create a client for the public Open Library hosts
    pub fn new() -> Result<Self, LookupError> {
        Self::from_config(&ShelfConfig::default())
    }

    /// Create a client for the hosts and timeout in `config`
    pub fn from_config(config: &ShelfConfig) -> Result<Self, LookupError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(NetworkConfig::USER_AGENT)
            .build()
            .map_err(|e| LookupError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_base: base_url(&config.api_host),
            cover_base: base_url(&config.cover_host),
        })
    }

    pub fn isbn_url(&self, isbn: &str) -> String {
        format!("{}/isbn/{}.json", self.api_base, isbn)
    }

    pub fn author_url(&self, reference: &str) -> String {
        format!("{}{}.json", self.api_base, author_path(reference))
    }

    pub fn cover_url(&self, source: &CoverSource, size: CoverSize) -> String {
        // default=false turns a missing cover into a 404 instead of a blank pixel
        format!(
            "{}/b/{}/{}-{}.jpg?default=false",
            self.cover_base,
            source.kind(),
            source.identifier(),
            size
        )
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        identifier: &str,
    ) -> Result<T, LookupError> {
        debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| LookupError::Network(format!("GET {} failed: {}", url, e)))?;

        check_lookup_status(response.status(), url, identifier)?;

        let body = response
            .bytes()
            .await
            .map_err(|e| LookupError::Network(format!("Reading {} failed: {}", url, e)))?;

        decode_body(&body, url)
    }
}

/// Parse a response body; a body missing required fields is a `Decode` error
fn decode_body<T: DeserializeOwned>(body: &[u8], url: &str) -> Result<T, LookupError> {
    serde_json::from_slice(body)
        .map_err(|e| LookupError::Decode(format!("Unexpected payload from {}: {}", url, e)))
}

/// Accept hosts with or without a scheme; bare hosts get https
fn base_url(host: &str) -> String {
    let host = host.trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{}", host)
    }
}

/// `/authors/OL1A`, `OL1A` and `/authors/OL1A.json` all name the same record
fn author_path(reference: &str) -> String {
    let reference = reference.trim().trim_end_matches(".json");
    if reference.starts_with('/') {
        reference.to_string()
    } else {
        format!("/authors/{}", reference)
    }
}

fn check_lookup_status(status: StatusCode, url: &str, identifier: &str) -> Result<(), LookupError> {
    if status == StatusCode::NOT_FOUND {
        return Err(LookupError::NotFound(identifier.to_string()));
    }
    if !status.is_success() {
        return Err(LookupError::Network(format!("{} returned {}", url, status)));
    }
    Ok(())
}

#[async_trait]
impl MetadataSource for OpenLibraryClient {
    async fn lookup_by_isbn(&self, isbn: &str) -> Result<Book, LookupError> {
        let url = self.isbn_url(isbn);
        self.get_json(&url, isbn).await
    }

    async fn lookup_author(&self, reference: &str) -> Result<Author, LookupError> {
        let url = self.author_url(reference);
        self.get_json(&url, reference).await
    }

    async fn fetch_cover(
        &self,
        source: &CoverSource,
        size: CoverSize,
    ) -> Result<Vec<u8>, CoverFetchError> {
        let url = self.cover_url(source, size);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| CoverFetchError::Request {
                url: url.clone(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CoverFetchError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| CoverFetchError::Request {
                url: url.clone(),
                message: e.to_string(),
            })?;
        Ok(bytes.to_vec())
    }
}
