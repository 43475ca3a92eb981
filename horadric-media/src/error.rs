/// Errors from blob storage, image fetching, and composite rendering.
#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} fetching {url}")]
    Status { url: String, status: u16 },

    #[error("Invalid URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    #[error("Invalid blob key '{0}'")]
    InvalidKey(String),

    #[error("Blob store is read-only; refused write of '{0}'")]
    ReadOnly(String),

    #[error("Blob store unavailable at {path}: {message}")]
    StoreUnavailable { path: String, message: String },

    #[error("Runeword composites need 1 to 6 runes, got {0}")]
    UnsupportedRuneCount(usize),
}

impl MediaError {
    pub fn invalid_url(url: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            message: message.to_string(),
        }
    }
}
