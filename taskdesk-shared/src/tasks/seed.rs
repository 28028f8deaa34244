//! Seed sources for the task repository
//!
//! A seed source supplies externally defined tasks (with their own IDs) that
//! [`TaskRepository::seed_merge`](super::TaskRepository::seed_merge) imports,
//! skipping IDs already present.
//!
//! # Document format
//!
//! ```json
//! { "tareas": [ { "id": 1, "titulo": "...", ... } ] }
//! ```
//!
//! # Sources
//!
//! - [`HttpSeedSource`]: `GET` a URL; non-2xx responses are errors
//! - [`FileSeedSource`]: read the document from disk
//! - [`StaticSeedSource`]: a fixed list, for tests and demos
//!
//! # Example
//!
//! ```no_run
//! use taskdesk_shared::tasks::seed::{HttpSeedSource, SeedSource};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let source = HttpSeedSource::new("https://example.com/tareas-iniciales.json");
//! let tasks = source.fetch().await?;
//! println!("{} seed tasks from {}", tasks.len(), source.describe());
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

use crate::models::task::Task;

/// Seed fetch error types
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    /// Transport-level failure (DNS, connect, timeout, body read)
    #[error("Seed request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Source answered with a non-success status
    #[error("Seed source returned HTTP {status}")]
    Status { status: u16 },

    /// Seed file could not be read
    #[error("Failed to read seed file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Body is not a valid seed document
    #[error("Malformed seed document: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Seed document envelope
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedDocument {
    pub tareas: Vec<Task>,
}

impl SeedDocument {
    pub fn parse(raw: &str) -> Result<Self, SeedError> {
        Ok(serde_json::from_str(raw)?)
    }
}

/// Provider of seed tasks
#[async_trait]
pub trait SeedSource: Send + Sync {
    /// Human-readable location, for logs
    fn describe(&self) -> String;

    /// Fetches the full list of seed tasks
    async fn fetch(&self) -> Result<Vec<Task>, SeedError>;
}

/// Seed document served over HTTP
pub struct HttpSeedSource {
    client: reqwest::Client,
    url: String,
}

impl HttpSeedSource {
    /// Source without a request timeout
    pub fn new(url: impl Into<String>) -> Self {
        HttpSeedSource {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }

    /// Source whose requests fail after `timeout`
    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Result<Self, SeedError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(HttpSeedSource {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl SeedSource for HttpSeedSource {
    fn describe(&self) -> String {
        self.url.clone()
    }

    async fn fetch(&self) -> Result<Vec<Task>, SeedError> {
        debug!(url = %self.url, "Fetching seed tasks");
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SeedError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        Ok(SeedDocument::parse(&body)?.tareas)
    }
}

/// Seed document stored on disk
pub struct FileSeedSource {
    path: PathBuf,
}

impl FileSeedSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileSeedSource { path: path.into() }
    }
}

#[async_trait]
impl SeedSource for FileSeedSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch(&self) -> Result<Vec<Task>, SeedError> {
        debug!(path = %self.path.display(), "Reading seed tasks");
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| SeedError::Io {
                path: self.path.clone(),
                source,
            })?;
        Ok(SeedDocument::parse(&raw)?.tareas)
    }
}

/// Fixed in-memory seed list
#[derive(Debug, Clone, Default)]
pub struct StaticSeedSource {
    tasks: Vec<Task>,
}

impl StaticSeedSource {
    pub fn new(tasks: Vec<Task>) -> Self {
        StaticSeedSource { tasks }
    }
}

#[async_trait]
impl SeedSource for StaticSeedSource {
    fn describe(&self) -> String {
        format!("static ({} tasks)", self.tasks.len())
    }

    async fn fetch(&self) -> Result<Vec<Task>, SeedError> {
        Ok(self.tasks.clone())
    }
}

/// Picks an HTTP source for `http(s)://` locations and a file source otherwise
pub fn source_for(location: &str, timeout: Option<Duration>) -> Result<Box<dyn SeedSource>, SeedError> {
    if location.starts_with("http://") || location.starts_with("https://") {
        let source = match timeout {
            Some(timeout) => HttpSeedSource::with_timeout(location, timeout)?,
            None => HttpSeedSource::new(location),
        };
        Ok(Box::new(source))
    } else {
        Ok(Box::new(FileSeedSource::new(location)))
    }
}
