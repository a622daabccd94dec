//! Content manifest data model.
//!
//! Manifests are JSON documents produced by an external build step, one per
//! `(collection, language)` pair:
//!
//! ```text
//! content/blog/en/index.json     { "posts":  [ ... ] }
//! content/news/es/index.json    { "posts":  [ ... ] }
//! content/gallery/ko/index.json { "albums": [ ... ] }
//! ```
//!
//! This module owns the record types ([`Post`], [`Album`], [`ContentItem`]),
//! the collection enumeration ([`Collection`]) with its URL geometry, tolerant
//! normalization from raw JSON, date parsing, and the publish contract the
//! external producer honors (checked consumer-side by `polyfolio check`).
//!
//! ## Tolerant normalization
//!
//! The loader never fails because a manifest is shaped oddly:
//! - a missing or non-array `posts`/`albums` key normalizes to an empty list;
//! - an entry that is not a JSON object (or otherwise fails to deserialize)
//!   is skipped, never fatal;
//! - missing string fields default to empty.
//!
//! Whether an item is *complete* is a separate question, answered by
//! [`ContentItem::validate_published`] — and only for published records.
//! Drafts may be arbitrarily incomplete.

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;

/// The three content kinds the site serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Blog,
    News,
    Gallery,
}

/// Which top-level key a manifest document carries its records under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestKind {
    Posts,
    Albums,
}

impl ManifestKind {
    pub fn key(&self) -> &'static str {
        match self {
            ManifestKind::Posts => "posts",
            ManifestKind::Albums => "albums",
        }
    }
}

impl Collection {
    pub const ALL: [Collection; 3] = [Collection::Blog, Collection::News, Collection::Gallery];

    pub fn name(&self) -> &'static str {
        match self {
            Collection::Blog => "blog",
            Collection::News => "news",
            Collection::Gallery => "gallery",
        }
    }

    pub fn from_name(name: &str) -> Option<Collection> {
        Collection::ALL.into_iter().find(|c| c.name() == name)
    }

    pub fn kind(&self) -> ManifestKind {
        match self {
            Collection::Gallery => ManifestKind::Albums,
            _ => ManifestKind::Posts,
        }
    }

    /// Site-relative URL of this collection's manifest for one language.
    pub fn manifest_path(&self, lang: &str) -> String {
        format!("content/{}/{}/index.json", self.name(), lang)
    }

    /// Landing page of the collection index in one language, relative to the
    /// base path. Used as the fallback target for unresolved translations.
    pub fn landing_path(&self, lang: &str) -> String {
        format!("{}/{}/", lang, self.name())
    }

    /// Detail page for one item of this collection (selected by a `slug`
    /// query parameter), relative to the base path.
    pub fn detail_path(&self, lang: &str) -> String {
        match self {
            Collection::Gallery => format!("{}/gallery/album/", lang),
            _ => format!("{}/{}/post/", lang, self.name()),
        }
    }
}

/// Publication state of a content record.
///
/// The filter is an allow-list on `published`: unknown values are treated as
/// draft and excluded from every consumer-facing view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Draft,
    Published,
    #[serde(other)]
    Unknown,
}

impl Status {
    pub fn is_published(&self) -> bool {
        matches!(self, Status::Published)
    }
}

/// A blog or news record.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Post {
    /// Cross-language stable identifier; links translations of one item.
    #[serde(default)]
    pub id: String,
    /// URL-safe identifier, unique within one `(collection, language)` pair.
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub lang: String,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub title: String,
    /// ISO `YYYY-MM-DD`, or an arbitrary string shown verbatim if unparseable.
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub cover_image: String,
    #[serde(default)]
    pub excerpt: String,
    /// Pre-rendered markup. Trusted in shape only — still sanitized before
    /// it reaches a page.
    #[serde(default)]
    pub body_html: Option<String>,
    /// Raw Markdown (restricted dialect), untrusted.
    #[serde(default, alias = "body")]
    pub body_markdown: Option<String>,
}

/// A photo-album record.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Album {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub lang: String,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub cover_image: String,
    #[serde(default)]
    pub description: String,
    /// Ordered image references (paths or URLs).
    #[serde(default)]
    pub images: Vec<String>,
}

/// One record of either kind, with shared accessors so the loader, paginator
/// and translation resolver can treat collections uniformly.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentItem {
    Post(Post),
    Album(Album),
}

impl ContentItem {
    pub fn id(&self) -> &str {
        match self {
            ContentItem::Post(p) => &p.id,
            ContentItem::Album(a) => &a.id,
        }
    }

    pub fn slug(&self) -> &str {
        match self {
            ContentItem::Post(p) => &p.slug,
            ContentItem::Album(a) => &a.slug,
        }
    }

    pub fn lang(&self) -> &str {
        match self {
            ContentItem::Post(p) => &p.lang,
            ContentItem::Album(a) => &a.lang,
        }
    }

    pub fn status(&self) -> Status {
        match self {
            ContentItem::Post(p) => p.status,
            ContentItem::Album(a) => a.status,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            ContentItem::Post(p) => &p.title,
            ContentItem::Album(a) => &a.title,
        }
    }

    pub fn date(&self) -> &str {
        match self {
            ContentItem::Post(p) => &p.date,
            ContentItem::Album(a) => &a.date,
        }
    }

    pub fn as_post(&self) -> Option<&Post> {
        match self {
            ContentItem::Post(p) => Some(p),
            ContentItem::Album(_) => None,
        }
    }

    pub fn as_album(&self) -> Option<&Album> {
        match self {
            ContentItem::Album(a) => Some(a),
            ContentItem::Post(_) => None,
        }
    }

    /// Check a record against the publish contract the external build step
    /// honors. Returns the list of missing fields — empty means complete.
    ///
    /// Only meaningful for published records; drafts are exempt and callers
    /// must not validate them.
    pub fn validate_published(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.title().is_empty() {
            missing.push("title");
        }
        if self.date().is_empty() {
            missing.push("date");
        }
        if self.slug().is_empty() {
            missing.push("slug");
        }
        match self {
            ContentItem::Post(p) => {
                if p.cover_image.is_empty() {
                    missing.push("cover_image");
                }
                if p.excerpt.is_empty() {
                    missing.push("excerpt");
                }
                let has_body = p.body_html.as_deref().is_some_and(|b| !b.is_empty())
                    || p.body_markdown.as_deref().is_some_and(|b| !b.is_empty());
                if !has_body {
                    missing.push("body");
                }
            }
            ContentItem::Album(a) => {
                if a.cover_image.is_empty() {
                    missing.push("cover_image");
                }
                if a.description.is_empty() {
                    missing.push("description");
                }
                if a.images.is_empty() {
                    missing.push("images");
                }
            }
        }
        missing
    }
}

/// Extract the record list from a parsed manifest document.
///
/// Missing key, non-array payload, and entries that fail to deserialize all
/// degrade silently (skipped entries, or an empty list) — a manifest is never
/// rejected wholesale for one bad record.
pub fn normalize_manifest(kind: ManifestKind, doc: &Value) -> Vec<ContentItem> {
    let Some(entries) = doc.get(kind.key()).and_then(Value::as_array) else {
        return Vec::new();
    };
    entries
        .iter()
        .filter_map(|entry| match kind {
            ManifestKind::Posts => serde_json::from_value::<Post>(entry.clone())
                .ok()
                .map(ContentItem::Post),
            ManifestKind::Albums => serde_json::from_value::<Album>(entry.clone())
                .ok()
                .map(ContentItem::Album),
        })
        .collect()
}

/// Parse a manifest date. Strict ISO calendar format; anything else is
/// treated as unparseable (sorted last, displayed verbatim).
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

/// Human-readable date for display.
///
/// English gets the long form ("January 5, 2024"). Other languages keep the
/// ISO form — month-name localization belongs to the translation dictionary,
/// not to this crate. Unparseable input is returned verbatim.
pub fn format_date(value: &str, lang: &str) -> String {
    match parse_date(value) {
        Some(date) if lang == "en" => date.format("%B %-d, %Y").to_string(),
        Some(date) => date.format("%Y-%m-%d").to_string(),
        None => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn collection_geometry() {
        assert_eq!(
            Collection::Blog.manifest_path("en"),
            "content/blog/en/index.json"
        );
        assert_eq!(Collection::News.landing_path("es"), "es/news/");
        assert_eq!(Collection::Blog.detail_path("en"), "en/blog/post/");
        assert_eq!(Collection::Gallery.detail_path("ko"), "ko/gallery/album/");
        assert_eq!(Collection::from_name("gallery"), Some(Collection::Gallery));
        assert_eq!(Collection::from_name("wiki"), None);
    }

    #[test]
    fn status_unknown_values_are_not_published() {
        let post: Post = serde_json::from_value(json!({ "status": "archived" })).unwrap();
        assert_eq!(post.status, Status::Unknown);
        assert!(!post.status.is_published());
    }

    #[test]
    fn missing_kind_key_normalizes_to_empty() {
        let doc = json!({ "albums": [{ "slug": "a" }] });
        assert!(normalize_manifest(ManifestKind::Posts, &doc).is_empty());
    }

    #[test]
    fn non_array_payload_normalizes_to_empty() {
        let doc = json!({ "posts": "oops" });
        assert!(normalize_manifest(ManifestKind::Posts, &doc).is_empty());
    }

    #[test]
    fn malformed_entries_are_skipped_not_fatal() {
        let doc = json!({
            "posts": [
                { "slug": "keep", "status": "published" },
                "not-an-object",
                42,
                { "slug": "keep-too" }
            ]
        });
        let items = normalize_manifest(ManifestKind::Posts, &doc);
        let slugs: Vec<&str> = items.iter().map(|i| i.slug()).collect();
        assert_eq!(slugs, ["keep", "keep-too"]);
    }

    #[test]
    fn body_field_alias() {
        let post: Post = serde_json::from_value(json!({ "body": "# Hi" })).unwrap();
        assert_eq!(post.body_markdown.as_deref(), Some("# Hi"));
    }

    #[test]
    fn date_parsing_is_strict_iso() {
        assert_eq!(
            parse_date("2024-03-01"),
            NaiveDate::from_ymd_opt(2024, 3, 1)
        );
        assert_eq!(parse_date(" 2024-03-01 "), NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(parse_date("soon"), None);
        assert_eq!(parse_date("2024-13-01"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn date_display_falls_back_verbatim() {
        assert_eq!(format_date("2024-01-05", "en"), "January 5, 2024");
        assert_eq!(format_date("2024-01-05", "ko"), "2024-01-05");
        assert_eq!(format_date("sometime soon", "en"), "sometime soon");
    }

    #[test]
    fn publish_contract_posts() {
        let complete: Post = serde_json::from_value(json!({
            "id": "1", "slug": "s", "lang": "en", "status": "published",
            "title": "T", "date": "2024-01-01", "cover_image": "c.jpg",
            "excerpt": "E", "body_markdown": "B"
        }))
        .unwrap();
        assert!(ContentItem::Post(complete).validate_published().is_empty());

        let bare = ContentItem::Post(Post::default());
        assert_eq!(
            bare.validate_published(),
            ["title", "date", "slug", "cover_image", "excerpt", "body"]
        );
    }

    #[test]
    fn publish_contract_albums() {
        let album: Album = serde_json::from_value(json!({
            "id": "1", "slug": "s", "title": "T", "date": "2024-01-01",
            "cover_image": "c.jpg", "description": "D", "images": []
        }))
        .unwrap();
        assert_eq!(ContentItem::Album(album).validate_published(), ["images"]);
    }

    #[test]
    fn body_html_alone_satisfies_the_body_requirement() {
        let post: Post = serde_json::from_value(json!({
            "id": "1", "slug": "s", "title": "T", "date": "2024-01-01",
            "cover_image": "c.jpg", "excerpt": "E", "body_html": "<p>hi</p>"
        }))
        .unwrap();
        assert!(ContentItem::Post(post).validate_published().is_empty());
    }
}
