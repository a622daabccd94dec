//! Network-retrieval capability.
//!
//! The rendering core never talks to a transport directly. Every component
//! that needs a document declares a [`Fetcher`] and receives one by
//! construction, so tests and the CLI can substitute their own (a fake map,
//! a local directory) without touching the pipeline.
//!
//! Paths handed to a fetcher are site-relative URLs without a leading slash
//! (`content/blog/en/index.json`); the deployment base path is a concern of
//! the locale layer, resolved before anything is fetched.
//!
//! [`FetchError`] is `Clone`: the manifest loader caches failed outcomes and
//! delivers the same error to every coalesced requester.

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum FetchError {
    /// The resource does not exist (HTTP 404, missing file).
    #[error("not found: {0}")]
    NotFound(String),
    /// Any other transport failure: non-OK status, connection error,
    /// permission problem.
    #[error("fetch failed for {url}: {reason}")]
    Unavailable { url: String, reason: String },
}

/// Retrieve one document by site-relative path.
///
/// There is exactly one suspension point per call — between issuing the
/// request and observing its outcome. Implementations do not retry; retry
/// policy (there is none) belongs to the caller.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, path: &str) -> Result<Vec<u8>, FetchError>;
}

/// A [`Fetcher`] serving documents from a local site directory.
///
/// This is the deployment-on-disk view of the site: the same tree a static
/// file server would expose. The CLI and the integration tests run the whole
/// pipeline against it.
pub struct DirFetcher {
    root: PathBuf,
}

impl DirFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DirFetcher { root: root.into() }
    }
}

#[async_trait]
impl Fetcher for DirFetcher {
    async fn fetch(&self, path: &str) -> Result<Vec<u8>, FetchError> {
        let rel = path.trim_start_matches('/');
        // A URL path, not a filesystem path: no parent traversal.
        if rel.split('/').any(|seg| seg == "..") {
            return Err(FetchError::NotFound(path.to_string()));
        }
        let full = self.root.join(rel);
        match tokio::fs::read(&full).await {
            Ok(bytes) => Ok(bytes),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Err(FetchError::NotFound(path.to_string()))
            }
            Err(err) => Err(FetchError::Unavailable {
                url: path.to_string(),
                reason: err.to_string(),
            }),
        }
    }
}
