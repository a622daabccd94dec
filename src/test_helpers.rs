//! Shared test utilities for the polyfolio test suite.
//!
//! Provides content-item builders with filled-in incidental fields, a
//! manifest JSON writer matching the external producer's output shape, and
//! a counting in-memory [`Fetcher`] for cache/coalescing assertions.
//!
//! Builders derive the cross-language id from the slug (`id-{slug}`) so
//! translation tests can line items up across languages by writing the same
//! id with different slugs.

use crate::content::{Album, ContentItem, Post, Status};
use crate::fetch::{FetchError, Fetcher};
use async_trait::async_trait;
use serde_json::{Map, Value, json};
use std::collections::HashMap;
use std::sync::Mutex;

fn parse_status(status: &str) -> Status {
    match status {
        "published" => Status::Published,
        "draft" => Status::Draft,
        _ => Status::Unknown,
    }
}

/// A post item with the given identity fields and plausible content fields.
pub fn post(id: &str, slug: &str, lang: &str, status: &str, date: &str) -> ContentItem {
    ContentItem::Post(Post {
        id: id.to_string(),
        slug: slug.to_string(),
        lang: lang.to_string(),
        status: parse_status(status),
        title: format!("Title {slug}"),
        date: date.to_string(),
        cover_image: format!("assets/covers/{slug}.jpg"),
        excerpt: format!("Excerpt {slug}"),
        body_html: None,
        body_markdown: Some(format!("# {slug}")),
    })
}

/// Shorthand for the common case.
pub fn published_post(id: &str, slug: &str, lang: &str, date: &str) -> ContentItem {
    post(id, slug, lang, "published", date)
}

/// An album item with two placeholder images.
pub fn album(id: &str, slug: &str, lang: &str, status: &str, date: &str) -> ContentItem {
    ContentItem::Album(Album {
        id: id.to_string(),
        slug: slug.to_string(),
        lang: lang.to_string(),
        status: parse_status(status),
        title: format!("Title {slug}"),
        date: date.to_string(),
        cover_image: format!("assets/covers/{slug}.jpg"),
        description: format!("Description {slug}"),
        images: vec![
            format!("assets/albums/{slug}-1.jpg"),
            format!("assets/albums/{slug}-2.jpg"),
        ],
    })
}

/// Serialize a manifest document the way the external producer writes it.
///
/// `kind` is `"posts"` or `"albums"`; each entry is `(slug, lang, status,
/// date)` and gets `id-{slug}` as its cross-language id plus complete
/// collection-specific fields.
pub fn manifest_json(kind: &str, items: &[(&str, &str, &str, &str)]) -> String {
    let entries: Vec<Value> = items
        .iter()
        .map(|(slug, lang, status, date)| {
            let mut entry = json!({
                "id": format!("id-{slug}"),
                "slug": slug,
                "lang": lang,
                "status": status,
                "title": format!("Title {slug}"),
                "date": date,
                "cover_image": format!("assets/covers/{slug}.jpg"),
            });
            let fields = entry.as_object_mut().expect("entry is an object");
            if kind == "albums" {
                fields.insert("description".into(), json!(format!("Description {slug}")));
                fields.insert(
                    "images".into(),
                    json!([
                        format!("assets/albums/{slug}-1.jpg"),
                        format!("assets/albums/{slug}-2.jpg"),
                    ]),
                );
            } else {
                fields.insert("excerpt".into(), json!(format!("Excerpt {slug}")));
                fields.insert("body_markdown".into(), json!(format!("# {slug}")));
            }
            entry
        })
        .collect();
    let mut doc = Map::new();
    doc.insert(kind.to_string(), Value::Array(entries));
    Value::Object(doc).to_string()
}

/// In-memory [`Fetcher`] that counts how often each path was requested.
///
/// Unknown paths return [`FetchError::NotFound`], so an "absent manifest"
/// scenario is just a file you never inserted.
pub struct CountingFetcher {
    files: HashMap<String, Vec<u8>>,
    hits: Mutex<HashMap<String, usize>>,
}

impl CountingFetcher {
    pub fn new(files: Vec<(&str, String)>) -> Self {
        CountingFetcher {
            files: files
                .into_iter()
                .map(|(path, body)| (path.to_string(), body.into_bytes()))
                .collect(),
            hits: Mutex::new(HashMap::new()),
        }
    }

    /// How many times `path` was fetched.
    pub fn count(&self, path: &str) -> usize {
        *self.hits.lock().unwrap().get(path).unwrap_or(&0)
    }
}

#[async_trait]
impl Fetcher for CountingFetcher {
    async fn fetch(&self, path: &str) -> Result<Vec<u8>, FetchError> {
        *self.hits.lock().unwrap().entry(path.to_string()).or_insert(0) += 1;
        match self.files.get(path) {
            Some(bytes) => Ok(bytes.clone()),
            None => Err(FetchError::NotFound(path.to_string())),
        }
    }
}
