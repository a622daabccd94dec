//! Per-language settings document.
//!
//! Settings are presentation extras (currently the offering links shown on
//! the offering page), fetched from `settings/{lang}.json`:
//!
//! ```json
//! { "offering_links": [ { "url": "https://...", "label": "Book a visit" } ] }
//! ```
//!
//! Unlike content manifests, settings failures are silent: an absent,
//! unfetchable, or malformed document degrades to an empty list and the page
//! renders without the extras.

use crate::fetch::Fetcher;
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OfferingLink {
    pub url: String,
    pub label: String,
}

/// Load the offering links for one language. Never fails; every degraded
/// outcome is an empty list.
pub async fn load_settings(fetcher: &dyn Fetcher, lang: &str) -> Vec<OfferingLink> {
    let path = format!("settings/{lang}.json");
    let bytes = match fetcher.fetch(&path).await {
        Ok(bytes) => bytes,
        Err(err) => {
            warn!(%path, %err, "settings unavailable, using defaults");
            return Vec::new();
        }
    };
    let doc: Value = match serde_json::from_slice(&bytes) {
        Ok(doc) => doc,
        Err(err) => {
            warn!(%path, %err, "settings malformed, using defaults");
            return Vec::new();
        }
    };
    doc.get("offering_links")
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(|entry| serde_json::from_value(entry.clone()).ok())
                .collect()
        })
        .unwrap_or_default()
}
