//! Local filesystem fetcher

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use url::Url;

use super::{Fetch, FetchError};

/// Reads sources from disk
///
/// `file://` URLs are converted to paths; anything else is treated as a
/// path, relative ones resolved against the base directory.
#[derive(Debug, Clone)]
pub struct FsFetcher {
    base_dir: PathBuf,
}

impl FsFetcher {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Map a location to the file it names
    pub fn locate(&self, url: &str) -> Result<PathBuf, FetchError> {
        if url.starts_with("file:") {
            let parsed = Url::parse(url).map_err(|_| FetchError::InvalidUrl(url.to_string()))?;
            return parsed
                .to_file_path()
                .map_err(|_| FetchError::InvalidUrl(url.to_string()));
        }
        Ok(self.base_dir.join(url))
    }
}

impl Fetch for FsFetcher {
    fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        let path = self.locate(url)?;
        match std::fs::read_to_string(&path) {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(FetchError::NotFound(url.to_string())),
            Err(e) => Err(FetchError::IoError(e)),
        }
    }
}
