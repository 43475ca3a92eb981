//! Fetching image bytes from a site or the local filesystem.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::MediaError;

/// Where an item's image bytes come from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ImageSource {
    /// An absolute URL.
    Remote(String),
    /// A file on disk.
    Local(PathBuf),
}

impl std::fmt::Display for ImageSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Remote(url) => f.write_str(url),
            Self::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Resolve a page-declared image path against the site's base URL.
///
/// Absolute URLs pass through unchanged; relative and root-relative paths
/// are joined the way a browser would.
pub fn resolve_url(base_url: &str, path: &str) -> Result<String, MediaError> {
    let base = reqwest::Url::parse(base_url).map_err(|e| MediaError::invalid_url(base_url, e))?;
    let joined = base.join(path.trim()).map_err(|e| MediaError::invalid_url(path, e))?;
    Ok(joined.to_string())
}

/// Retrieves image bytes.
pub trait ImageFetcher: Send + Sync {
    fn fetch(&self, source: &ImageSource) -> Result<Vec<u8>, MediaError>;
}

/// Fetches remote images over HTTP and local images from disk.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, MediaError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("horadric/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

impl ImageFetcher for HttpFetcher {
    fn fetch(&self, source: &ImageSource) -> Result<Vec<u8>, MediaError> {
        match source {
            ImageSource::Local(path) => Ok(std::fs::read(path)?),
            ImageSource::Remote(url) => {
                let response = self.client.get(url).send()?;
                if !response.status().is_success() {
                    return Err(MediaError::Status {
                        url: url.clone(),
                        status: response.status().as_u16(),
                    });
                }
                Ok(response.bytes()?.to_vec())
            }
        }
    }
}

/// Reads local files only; remote sources are refused. For offline runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFetcher;

impl ImageFetcher for LocalFetcher {
    fn fetch(&self, source: &ImageSource) -> Result<Vec<u8>, MediaError> {
        match source {
            ImageSource::Local(path) => Ok(std::fs::read(path)?),
            ImageSource::Remote(url) => Err(MediaError::invalid_url(url, "remote fetch disabled")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_relative_and_root_relative() {
        assert_eq!(
            resolve_url("https://example.com/catalog/", "images/el.png").unwrap(),
            "https://example.com/catalog/images/el.png"
        );
        assert_eq!(
            resolve_url("https://example.com/catalog/", "/images/el.png").unwrap(),
            "https://example.com/images/el.png"
        );
        assert_eq!(
            resolve_url("https://example.com/", "https://cdn.example.com/a.png").unwrap(),
            "https://cdn.example.com/a.png"
        );
    }

    #[test]
    fn bad_base_url() {
        assert!(resolve_url("not a url", "a.png").is_err());
    }

    #[test]
    fn local_fetcher_reads_files() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("el.png");
        std::fs::write(&path, b"icon").unwrap();
        assert_eq!(LocalFetcher.fetch(&ImageSource::Local(path)).unwrap(), b"icon");
        assert!(
            LocalFetcher
                .fetch(&ImageSource::Remote("https://example.com/a.png".into()))
                .is_err()
        );
    }
}
