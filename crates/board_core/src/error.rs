use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("ticket request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("ticket endpoint {url} answered with status {status}")]
    Status { status: u16, url: String },
    #[error("malformed ticket payload: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("failed to read ticket payload from {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}
