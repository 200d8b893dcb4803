use std::{path::PathBuf, time::Duration};

use async_trait::async_trait;
use reqwest::Client;
use shared::protocol::BoardPayload;
use tracing::debug;

use crate::error::LoadError;

pub const DEFAULT_ENDPOINT: &str = "https://api.quicksell.co/v1/internal/frontend-assignment";

/// Source of the ticket/user document. Fetched once per board lifetime.
#[async_trait]
pub trait TicketSource: Send + Sync {
    async fn fetch(&self) -> Result<BoardPayload, LoadError>;
}

#[async_trait]
impl<T> TicketSource for Box<T>
where
    T: TicketSource + ?Sized,
{
    async fn fetch(&self) -> Result<BoardPayload, LoadError> {
        (**self).fetch().await
    }
}

pub struct HttpTicketSource {
    http: Client,
    endpoint: String,
}

impl HttpTicketSource {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn with_timeout(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, LoadError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl TicketSource for HttpTicketSource {
    async fn fetch(&self) -> Result<BoardPayload, LoadError> {
        debug!(endpoint = %self.endpoint, "requesting tickets");
        let response = self.http.get(&self.endpoint).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::Status {
                status: status.as_u16(),
                url: self.endpoint.clone(),
            });
        }
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

/// Reads the document from a JSON file on disk.
pub struct FileTicketSource {
    path: PathBuf,
}

impl FileTicketSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl TicketSource for FileTicketSource {
    async fn fetch(&self) -> Result<BoardPayload, LoadError> {
        debug!(path = %self.path.display(), "reading tickets from file");
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| LoadError::Io {
                path: self.path.clone(),
                source,
            })?;
        Ok(BoardPayload::from_json(&raw)?)
    }
}

/// Serves a fixed payload.
pub struct StaticTicketSource {
    payload: BoardPayload,
}

impl StaticTicketSource {
    pub fn new(payload: BoardPayload) -> Self {
        Self { payload }
    }
}

#[async_trait]
impl TicketSource for StaticTicketSource {
    async fn fetch(&self) -> Result<BoardPayload, LoadError> {
        Ok(self.payload.clone())
    }
}

#[cfg(test)]
#[path = "tests/loader_tests.rs"]
mod tests;
