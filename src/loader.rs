//! Manifest loading, memoization, and ordering.
//!
//! One [`ManifestLoader`] lives for one page view. It owns the only piece of
//! shared mutable state in the system: a map from `(collection, language)` to
//! the shared outcome of that manifest's single fetch.
//!
//! ## Cache semantics
//!
//! - **At most one fetch per key, ever.** The first `load` for a key inserts
//!   a shared future; concurrent and later callers get clones of the same
//!   handle. N simultaneous requesters produce one network request and N
//!   deliveries of the same result.
//! - **Failures are cached too.** A failed fetch or parse resolves the shared
//!   future to a [`LoadError`], and that error is what every later caller
//!   receives. There are no automatic retries within a page lifetime.
//! - **Append-only.** Keys are inserted and read, never invalidated, so there
//!   is no read/write race to reason about. The mutex around the map is held
//!   only to clone or insert a handle, never across an await.
//!
//! ## Ordering
//!
//! Consumer-facing views see only published items in the requested language
//! ([`filter_published`]), newest first ([`sort_by_date_desc`]). Items with
//! an unparseable date sort after all dated items and keep their relative
//! manifest order — the external producer already writes newest-first, so
//! undated items stay where it put them.

use crate::content::{self, Collection, ContentItem};
use crate::fetch::{FetchError, Fetcher};
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, warn};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum LoadError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("malformed manifest at {url}: {reason}")]
    Parse { url: String, reason: String },
}

type Outcome = Result<Arc<Vec<ContentItem>>, LoadError>;
type SharedLoad = Shared<BoxFuture<'static, Outcome>>;

/// Page-view-scoped manifest cache over an injected [`Fetcher`].
pub struct ManifestLoader {
    fetcher: Arc<dyn Fetcher>,
    cache: Mutex<HashMap<(Collection, String), SharedLoad>>,
}

impl ManifestLoader {
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        ManifestLoader {
            fetcher,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Fetch, parse, and normalize one manifest, memoized per
    /// `(collection, language)`.
    ///
    /// Returns every record in the manifest, drafts included — views go
    /// through [`get_collection`](Self::get_collection), which filters.
    pub async fn load(&self, collection: Collection, lang: &str) -> Outcome {
        let handle = {
            let mut cache = self.cache.lock().await;
            match cache.get(&(collection, lang.to_string())) {
                Some(handle) => handle.clone(),
                None => {
                    let handle = spawn_load(Arc::clone(&self.fetcher), collection, lang);
                    cache.insert((collection, lang.to_string()), handle.clone());
                    handle
                }
            }
        };
        handle.await
    }

    /// Published items of one collection in one language, newest first.
    ///
    /// A fetch or parse failure propagates to the calling view, which renders
    /// a localized "unable to load" message; this method never masks it.
    pub async fn get_collection(
        &self,
        collection: Collection,
        lang: &str,
    ) -> Result<Vec<ContentItem>, LoadError> {
        let items = self.load(collection, lang).await?;
        let mut visible = filter_published(&items, lang);
        sort_by_date_desc(&mut visible);
        Ok(visible)
    }

    /// Shorthand for the gallery collection.
    pub async fn get_gallery(&self, lang: &str) -> Result<Vec<ContentItem>, LoadError> {
        self.get_collection(Collection::Gallery, lang).await
    }
}

fn spawn_load(fetcher: Arc<dyn Fetcher>, collection: Collection, lang: &str) -> SharedLoad {
    let url = collection.manifest_path(lang);
    let kind = collection.kind();
    async move {
        debug!(%url, "fetching manifest");
        let bytes = fetcher.fetch(&url).await.inspect_err(|err| {
            warn!(%url, %err, "manifest fetch failed");
        })?;
        let doc: serde_json::Value =
            serde_json::from_slice(&bytes).map_err(|err| LoadError::Parse {
                url: url.clone(),
                reason: err.to_string(),
            })?;
        Ok(Arc::new(content::normalize_manifest(kind, &doc)))
    }
    .boxed()
    .shared()
}

/// Keep only published items in the requested language, preserving order.
pub fn filter_published(items: &[ContentItem], lang: &str) -> Vec<ContentItem> {
    items
        .iter()
        .filter(|item| item.status().is_published() && item.lang() == lang)
        .cloned()
        .collect()
}

/// Stable sort, parsed date descending; unparseable dates after all valid
/// ones, keeping their relative input order.
pub fn sort_by_date_desc(items: &mut [ContentItem]) {
    items.sort_by_key(|item| Reverse(content::parse_date(item.date())));
}
