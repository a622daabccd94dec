//! # polyfolio
//!
//! The rendering core of a multilingual editorial site: blog posts, news
//! posts, and photo-album galleries, rendered into web markup from static
//! JSON manifests with no server-side rendering step.
//!
//! # Architecture: Five Collaborating Pieces
//!
//! ```text
//! locale      URL → (language, base path, redirect decision)
//!   └─ loader     (collection, language) → published items, newest first
//!        └─ paginate   items → one clamped page + navigation links
//!        └─ markdown   restricted dialect → untrusted markup
//!        └─ sanitize   untrusted markup → allow-listed markup
//!        └─ translate  item → cross-language equivalents
//! ```
//!
//! The locale resolver runs first — it may rewrite the effective URL — and
//! everything downstream is derived data, recomputed per render. The only
//! shared mutable state is the manifest cache inside [`loader::ManifestLoader`],
//! and it is append-only for the lifetime of a page view.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | `config.toml` loading and validation: languages, page sizes, routing |
//! | [`content`] | Manifest record types, tolerant JSON normalization, publish contract, dates |
//! | [`fetch`] | The `Fetcher` capability trait and the local-directory implementation |
//! | [`loader`] | Per-`(collection, language)` coalescing cache; filter and order |
//! | [`locale`] | Language detection, base-path recovery, language-prefix redirects |
//! | [`paginate`] | Clamped page slicing and deterministic pagination links |
//! | [`markdown`] | Restricted Markdown dialect → markup |
//! | [`sanitize`] | Allow-list sanitization — the single trust boundary |
//! | [`settings`] | Per-language settings document (silent degrade) |
//! | [`translate`] | UI-string dictionary and cross-language link resolution |
//! | [`views`] | Thin maud glue: cards, detail views, localized states |
//!
//! # Design Decisions
//!
//! ## Injected Capabilities Over Ambient State
//!
//! Every component that performs I/O declares what it needs — a
//! [`fetch::Fetcher`], a [`translate::Translations`] — and receives it by
//! construction. The manifest cache is owned by an explicitly created
//! [`loader::ManifestLoader`], not a process-global. Tests substitute fakes
//! without patching anything.
//!
//! ## One Fetch Per Manifest, Ever
//!
//! The loader coalesces concurrent requesters onto a single shared future
//! per `(collection, language)` key and caches the resolved outcome —
//! including failures. N simultaneous callers produce one network request
//! and N deliveries of the same result. Nothing retries; a page view either
//! has a manifest or renders its degraded state.
//!
//! ## Sanitization Is Not Optional
//!
//! All author-controlled body content passes through [`sanitize::sanitize_html`]
//! before it may reach a page — including pre-rendered `body_html` from the
//! manifest. The sanitizer unwraps unknown elements rather than deleting
//! them, so hostile wrappers disappear while their text survives.
//!
//! ## Degradation Over Failure
//!
//! A failed settings or dictionary fetch silently yields defaults; a failed
//! manifest fetch surfaces exactly one localized error state in the calling
//! view; an unknown slug is a defined not-found state; a malformed date
//! sorts last and displays verbatim. No error takes down navigation,
//! language switching, or unrelated page sections.

pub mod config;
pub mod content;
pub mod fetch;
pub mod loader;
pub mod locale;
pub mod markdown;
pub mod paginate;
pub mod sanitize;
pub mod settings;
pub mod translate;
pub mod views;

#[cfg(test)]
pub(crate) mod test_helpers;
