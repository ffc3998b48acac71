//! Blocking HTTP fetcher

use std::io::Read;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::StatusCode;

use super::{is_remote, Fetch, FetchError};

/// Maximum size of a fetched module source (10 MB)
pub const MAX_CONTENT_SIZE: u64 = 10 * 1024 * 1024;

/// Blocking HTTP/HTTPS fetcher
///
/// Requests stall the caller until they complete. There is no timeout
/// unless one is configured with [`HttpFetcher::with_timeout`].
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    max_size: u64,
}

impl HttpFetcher {
    /// Create a new HTTP fetcher
    pub fn new() -> Result<Self, FetchError> {
        Self::build(None)
    }

    /// Create a fetcher whose requests give up after `timeout`
    pub fn with_timeout(timeout: Duration) -> Result<Self, FetchError> {
        Self::build(Some(timeout))
    }

    fn build(timeout: Option<Duration>) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("nsload/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            max_size: MAX_CONTENT_SIZE,
        })
    }

    /// Limit the accepted body size
    pub fn max_size(mut self, max_size: u64) -> Self {
        self.max_size = max_size;
        self
    }
}

impl Fetch for HttpFetcher {
    fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        if !is_remote(url) {
            return Err(FetchError::InvalidUrl(url.to_string()));
        }

        let response = self.client.get(url).send()?;

        // Not Modified still carries a usable cached body.
        let status = response.status();
        if !status.is_success() && status != StatusCode::NOT_MODIFIED {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        if let Some(len) = response.content_length() {
            if len > self.max_size {
                return Err(FetchError::ContentTooLarge {
                    size: len,
                    max: self.max_size,
                });
            }
        }

        let mut content = String::new();
        let mut reader = response.take(self.max_size + 1);
        reader.read_to_string(&mut content)?;

        if content.len() as u64 > self.max_size {
            return Err(FetchError::ContentTooLarge {
                size: content.len() as u64,
                max: self.max_size,
            });
        }

        Ok(content)
    }
}
