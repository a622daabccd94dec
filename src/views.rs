//! Page-view glue: card, detail, and state markup.
//!
//! Everything here is assembly — the components call into the core (markdown,
//! sanitize, paginate, translate) and arrange the results. No logic of its
//! own beyond "which pieces, in which order".
//!
//! Body content policy: a post body is `body_html` when the manifest carries
//! one, otherwise the rendered `body_markdown`. Both paths go through
//! [`sanitize_html`] unconditionally — pre-rendered markup gets no bypass.

use crate::content::{Album, Collection, ContentItem, Post, format_date};
use crate::markdown::render_markdown;
use crate::paginate::{self, PageLabels, PageSlice};
use crate::sanitize::sanitize_html;
use crate::settings::OfferingLink;
use crate::translate::{TranslationLink, Translations};
use maud::{Markup, PreEscaped, html};

/// Everything a view needs to render for one page load.
pub struct ViewContext<'a> {
    pub base_path: &'a str,
    pub lang: &'a str,
    pub translations: &'a Translations,
}

impl ViewContext<'_> {
    fn t(&self, key: &str) -> String {
        self.translations.t(self.lang, key)
    }

    /// Join a site-relative path onto the deployment base path.
    pub fn with_base(&self, rel: &str) -> String {
        format!("{}{}", self.base_path, rel.trim_start_matches('/'))
    }

    /// Asset references may be absolute already; only site-relative ones get
    /// the base path.
    pub fn with_base_asset(&self, value: &str) -> String {
        let lower = value.to_ascii_lowercase();
        if lower.starts_with("http://")
            || lower.starts_with("https://")
            || lower.starts_with("//")
            || lower.starts_with("data:")
            || lower.starts_with("mailto:")
        {
            value.to_string()
        } else {
            self.with_base(value)
        }
    }

    fn detail_href(&self, collection: Collection, slug: &str) -> String {
        let query = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("slug", slug)
            .finish();
        format!("{}?{}", self.with_base(&collection.detail_path(self.lang)), query)
    }

    fn landing_href(&self, collection: Collection) -> String {
        self.with_base(&collection.landing_path(self.lang))
    }

    fn page_labels(&self) -> (String, String) {
        (self.t("pagination.prev"), self.t("pagination.next"))
    }
}

/// One list card for a post (blog and news share the layout).
pub fn post_card(ctx: &ViewContext<'_>, collection: Collection, post: &Post) -> Markup {
    html! {
        article class="news-card" {
            img class="news-card__image" src=(ctx.with_base_asset(&post.cover_image))
                alt=(post.title) loading="lazy" decoding="async";
            div class="news-card__body" {
                h3 class="news-card__title" { (post.title) }
                div class="news-card__date" { (format_date(&post.date, ctx.lang)) }
                p class="news-card__excerpt" { (post.excerpt) }
                div class="news-card__action" {
                    a href=(ctx.detail_href(collection, &post.slug)) { (ctx.t("actions.read")) }
                }
            }
        }
    }
}

/// One list card for a gallery album.
pub fn album_card(ctx: &ViewContext<'_>, album: &Album) -> Markup {
    html! {
        article class="news-card" {
            img class="news-card__image" src=(ctx.with_base_asset(&album.cover_image))
                alt=(album.title) loading="lazy" decoding="async";
            div class="news-card__body" {
                h3 class="news-card__title" { (album.title) }
                div class="news-card__date" { (format_date(&album.date, ctx.lang)) }
                p class="news-card__excerpt" { (album.description) }
                div class="news-card__action" {
                    a href=(ctx.detail_href(Collection::Gallery, &album.slug)) {
                        (ctx.t("actions.view_album"))
                    }
                }
            }
        }
    }
}

/// A list page: cards for one page of items plus the pagination bar.
/// Empty collections render the localized empty state instead.
pub fn list_page(
    ctx: &ViewContext<'_>,
    collection: Collection,
    slice: &PageSlice<'_, ContentItem>,
) -> Markup {
    let (prev, next) = ctx.page_labels();
    let links = paginate::render_links(
        slice.current_page,
        slice.total_pages,
        &ctx.landing_href(collection),
        None,
        &PageLabels {
            prev: &prev,
            next: &next,
        },
    );
    html! {
        @if slice.items.is_empty() {
            p { (ctx.t(&format!("{}.empty", collection.name()))) }
        } @else {
            @for item in slice.items {
                @match item {
                    ContentItem::Post(post) => { (post_card(ctx, collection, post)) }
                    ContentItem::Album(album) => { (album_card(ctx, album)) }
                }
            }
        }
        (links)
    }
}

/// A post detail view: hero, metadata, sanitized body.
pub fn post_detail(ctx: &ViewContext<'_>, post: &Post) -> Markup {
    let raw_body = match &post.body_html {
        Some(body) if !body.is_empty() => body.clone(),
        _ => render_markdown(post.body_markdown.as_deref().unwrap_or("")),
    };
    let safe_body = sanitize_html(&raw_body);
    html! {
        div class="news-post__hero" {
            div class="news-post__image" {
                img src=(ctx.with_base_asset(&post.cover_image)) alt=(post.title)
                    loading="lazy" decoding="async";
            }
            div class="news-post__meta" {
                h1 { (post.title) }
                div class="news-post__date" { (format_date(&post.date, ctx.lang)) }
            }
        }
        div class="news-post__content" { (PreEscaped(safe_body)) }
    }
}

/// An album detail view: metadata plus one page of the image grid.
pub fn album_detail(ctx: &ViewContext<'_>, album: &Album, page: usize, per_page: usize) -> Markup {
    let slice = paginate::paginate(&album.images, per_page, page);
    let (prev, next) = ctx.page_labels();
    let slug_query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("slug", &album.slug)
        .finish();
    let links = paginate::render_links(
        slice.current_page,
        slice.total_pages,
        &ctx.with_base(&Collection::Gallery.detail_path(ctx.lang)),
        Some(&slug_query),
        &PageLabels {
            prev: &prev,
            next: &next,
        },
    );
    html! {
        h1 { (album.title) }
        div class="news-post__date" { (format_date(&album.date, ctx.lang)) }
        p { (album.description) }
        div class="gallery-grid" {
            @for image in slice.items {
                button type="button" {
                    img src=(ctx.with_base_asset(image)) alt=(album.title)
                        loading="lazy" decoding="async";
                }
            }
        }
        (links)
    }
}

/// Not-found state with a way back to the collection index.
pub fn not_found(ctx: &ViewContext<'_>, collection: Collection) -> Markup {
    let name = collection.name();
    html! {
        p {
            (ctx.t(&format!("{name}.not_found"))) " "
            a href=(ctx.landing_href(collection)) { (ctx.t(&format!("{name}.back"))) }
        }
    }
}

/// Error state for a failed manifest load.
pub fn load_error(ctx: &ViewContext<'_>, collection: Collection) -> Markup {
    html! {
        p { (ctx.t(&format!("{}.error", collection.name()))) }
    }
}

/// The language-switch menu built from resolved translation links.
pub fn language_menu(ctx: &ViewContext<'_>, links: &[TranslationLink]) -> Markup {
    html! {
        ul class="lang-menu" {
            @for link in links {
                li { a href=(ctx.with_base(&link.href)) { (link.lang) } }
            }
        }
    }
}

/// Offering links block; empty input renders the localized placeholder.
pub fn offering_links(ctx: &ViewContext<'_>, links: &[OfferingLink]) -> Markup {
    html! {
        @if links.is_empty() {
            p { (ctx.t("offering.empty")) }
        } @else {
            @for link in links {
                a class="button" href=(link.url) target="_blank" rel="noopener" {
                    (link.label)
                }
            }
        }
    }
}
