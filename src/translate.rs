//! Translation dictionary and cross-language link resolution.
//!
//! Two concerns live here:
//!
//! 1. [`Translations`] — the UI-string dictionary, one nested map per
//!    language, looked up by dot-separated key. A missing path yields an
//!    empty string and [`Translations::t`] falls back to the raw key, so an
//!    incomplete dictionary shows key names instead of blank chrome.
//! 2. [`resolve_translation_links`] — given the item a detail view is
//!    showing, compute for every other supported language either a link to
//!    that item's equivalent (matched by cross-language `id`, or exact slug
//!    when the item carries no id) or a fallback link to that language's
//!    collection landing page.
//!
//! Per-language lookups run concurrently and independently: one language's
//! manifest failing degrades that language to its landing fallback and never
//! blocks or aborts the others.

use crate::content::Collection;
use crate::fetch::Fetcher;
use crate::loader::ManifestLoader;
use serde_json::Value;
use std::collections::HashMap;
use tracing::warn;

/// UI-string dictionary for all languages.
#[derive(Debug, Clone, Default)]
pub struct Translations {
    by_lang: HashMap<String, Value>,
}

impl Translations {
    /// A dictionary with no entries: every lookup misses, every `t` call
    /// falls back to the key.
    pub fn empty() -> Self {
        Translations::default()
    }

    /// Build from a parsed dictionary document (`lang` → nested map).
    pub fn from_value(doc: Value) -> Self {
        let by_lang = match doc {
            Value::Object(map) => map.into_iter().collect(),
            _ => HashMap::new(),
        };
        Translations { by_lang }
    }

    /// Fetch and parse the dictionary. Failures are silent: the empty
    /// dictionary is a fully functional degraded state.
    pub async fn load(fetcher: &dyn Fetcher, path: &str) -> Self {
        let bytes = match fetcher.fetch(path).await {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!(%path, %err, "translation dictionary unavailable");
                return Translations::empty();
            }
        };
        match serde_json::from_slice(&bytes) {
            Ok(doc) => Translations::from_value(doc),
            Err(err) => {
                warn!(%path, %err, "translation dictionary malformed");
                Translations::empty()
            }
        }
    }

    /// Walk a dot-separated key through one language's nested map. Any
    /// missing step — unknown language, absent key, non-string leaf —
    /// yields the empty string.
    pub fn lookup(&self, lang: &str, key: &str) -> &str {
        let mut node = match self.by_lang.get(lang) {
            Some(node) => node,
            None => return "",
        };
        for part in key.split('.') {
            node = match node.get(part) {
                Some(next) => next,
                None => return "",
            };
        }
        node.as_str().unwrap_or("")
    }

    /// Translated string, or the raw key when the dictionary has no entry.
    pub fn t(&self, lang: &str, key: &str) -> String {
        match self.lookup(lang, key) {
            "" => key.to_string(),
            found => found.to_string(),
        }
    }
}

/// One language-switch entry for a detail view.
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationLink {
    pub lang: String,
    /// Base-path-relative href: either the equivalent item's detail page or
    /// the collection landing page.
    pub href: String,
}

/// Compute language-switch links for the item at `current_slug`.
///
/// The carried query (the current page's parameters) is reproduced on every
/// resolved link with `slug` overwritten; landing fallbacks carry no query.
pub async fn resolve_translation_links(
    loader: &ManifestLoader,
    collection: Collection,
    supported: &[String],
    current_lang: &str,
    current_slug: &str,
    carried_query: &[(String, String)],
) -> Vec<TranslationLink> {
    // The current item's cross-language id. A failed load here degrades to
    // slug matching in the other languages.
    let current_id = match loader.get_collection(collection, current_lang).await {
        Ok(items) => items
            .iter()
            .find(|item| item.slug() == current_slug)
            .map(|item| item.id().to_string())
            .filter(|id| !id.is_empty()),
        Err(err) => {
            warn!(lang = current_lang, %err, "current-language manifest unavailable");
            None
        }
    };

    let lookups = supported
        .iter()
        .filter(|lang| lang.as_str() != current_lang)
        .map(|lang| {
            let current_id = current_id.clone();
            async move {
                let href = match loader.get_collection(collection, lang).await {
                    Ok(items) => {
                        let equivalent = match &current_id {
                            Some(id) => items.iter().find(|item| item.id() == id.as_str()),
                            None => items.iter().find(|item| item.slug() == current_slug),
                        };
                        match equivalent {
                            Some(item) => detail_href(collection, lang, item.slug(), carried_query),
                            None => collection.landing_path(lang),
                        }
                    }
                    Err(err) => {
                        warn!(%lang, %err, "translation lookup degraded to landing page");
                        collection.landing_path(lang)
                    }
                };
                TranslationLink {
                    lang: lang.clone(),
                    href,
                }
            }
        });

    futures::future::join_all(lookups).await
}

/// Detail-page href with the carried query reproduced and `slug` overwritten.
fn detail_href(
    collection: Collection,
    lang: &str,
    slug: &str,
    carried_query: &[(String, String)],
) -> String {
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    let mut slug_written = false;
    for (key, value) in carried_query {
        if key == "slug" {
            serializer.append_pair("slug", slug);
            slug_written = true;
        } else {
            serializer.append_pair(key, value);
        }
    }
    if !slug_written {
        serializer.append_pair("slug", slug);
    }
    format!("{}?{}", collection.detail_path(lang), serializer.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{CountingFetcher, manifest_json};
    use std::sync::Arc;

    fn dict() -> Translations {
        Translations::from_value(serde_json::json!({
            "en": { "news": { "empty": "No news yet." }, "actions": { "read": "Read" } },
            "es": { "news": { "empty": "Sin noticias." } }
        }))
    }

    #[test]
    fn lookup_walks_dot_paths() {
        let translations = dict();
        assert_eq!(translations.lookup("en", "news.empty"), "No news yet.");
        assert_eq!(translations.lookup("es", "news.empty"), "Sin noticias.");
    }

    #[test]
    fn missing_paths_yield_empty_and_t_falls_back_to_key() {
        let translations = dict();
        assert_eq!(translations.lookup("en", "news.missing"), "");
        assert_eq!(translations.lookup("ko", "news.empty"), "");
        assert_eq!(translations.lookup("en", "news"), "");
        assert_eq!(translations.t("ko", "news.empty"), "news.empty");
        assert_eq!(translations.t("en", "actions.read"), "Read");
    }

    #[test]
    fn non_object_document_is_empty() {
        let translations = Translations::from_value(serde_json::json!([1, 2]));
        assert_eq!(translations.t("en", "x"), "x");
    }

    #[tokio::test]
    async fn dictionary_load_failure_degrades_to_empty() {
        let fetcher = CountingFetcher::new(vec![]);
        let translations = Translations::load(&fetcher, "assets/i18n.json").await;
        assert_eq!(translations.t("en", "pagination.prev"), "pagination.prev");
    }

    fn langs() -> Vec<String> {
        ["en", "es", "ko"].map(String::from).to_vec()
    }

    #[tokio::test]
    async fn resolves_by_id_and_falls_back_per_language() {
        let en = manifest_json("posts", &[("hello", "en", "published", "2024-01-01")]);
        // Same id ("id-hello"), different slug in Spanish.
        let es = r#"{ "posts": [ { "id": "id-hello", "slug": "hola", "lang": "es",
            "status": "published", "title": "Hola", "date": "2024-01-01" } ] }"#
            .to_string();
        // Korean manifest exists but has no equivalent item.
        let ko = manifest_json("posts", &[("other", "ko", "published", "2024-01-01")]);
        let fetcher = Arc::new(CountingFetcher::new(vec![
            ("content/blog/en/index.json", en),
            ("content/blog/es/index.json", es),
            ("content/blog/ko/index.json", ko),
        ]));
        let loader = ManifestLoader::new(fetcher);

        let carried = vec![("slug".to_string(), "hello".to_string())];
        let links = resolve_translation_links(
            &loader,
            Collection::Blog,
            &langs(),
            "en",
            "hello",
            &carried,
        )
        .await;

        assert_eq!(links.len(), 2);
        assert_eq!(links[0].lang, "es");
        assert_eq!(links[0].href, "es/blog/post/?slug=hola");
        assert_eq!(links[1].lang, "ko");
        assert_eq!(links[1].href, "ko/blog/");
    }

    #[tokio::test]
    async fn failed_language_degrades_without_blocking_others() {
        let en = manifest_json("posts", &[("hello", "en", "published", "2024-01-01")]);
        let es = r#"{ "posts": [ { "id": "id-hello", "slug": "hola", "lang": "es",
            "status": "published", "title": "Hola", "date": "2024-01-01" } ] }"#
            .to_string();
        // No Korean manifest at all: that fetch fails.
        let fetcher = Arc::new(CountingFetcher::new(vec![
            ("content/blog/en/index.json", en),
            ("content/blog/es/index.json", es),
        ]));
        let loader = ManifestLoader::new(fetcher);

        let links =
            resolve_translation_links(&loader, Collection::Blog, &langs(), "en", "hello", &[])
                .await;

        assert_eq!(links[0].href, "es/blog/post/?slug=hola");
        assert_eq!(links[1].href, "ko/blog/");
    }

    #[tokio::test]
    async fn gallery_links_use_the_album_detail_path() {
        let en = manifest_json("albums", &[("tokyo", "en", "published", "2024-01-01")]);
        let es = manifest_json("albums", &[("tokyo", "es", "published", "2024-01-01")]);
        let fetcher = Arc::new(CountingFetcher::new(vec![
            ("content/gallery/en/index.json", en),
            ("content/gallery/es/index.json", es),
        ]));
        let loader = ManifestLoader::new(fetcher);

        let links = resolve_translation_links(
            &loader,
            Collection::Gallery,
            &["en".to_string(), "es".to_string()],
            "en",
            "tokyo",
            &[("slug".to_string(), "tokyo".to_string()), ("page".to_string(), "2".to_string())],
        )
        .await;

        assert_eq!(links[0].href, "es/gallery/album/?slug=tokyo&page=2");
    }
}
