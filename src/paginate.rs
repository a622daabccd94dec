//! Pagination: pure slicing plus link rendering.
//!
//! [`paginate`] never errors — out-of-range page requests clamp into
//! `[1, total_pages]`, so a stale bookmark lands on the nearest valid page
//! instead of a failure state.
//!
//! The navigation window ([`page_window`]) is fully deterministic for any
//! `(current, total)` pair: seven or fewer pages are shown in full; beyond
//! that the first and last page are always present, with a three-page run
//! around the current page and ellipses exactly when the run excludes page 2
//! (`current > 3`) or page `total - 1` (`current < total - 2`).

use maud::{Markup, html};
use url::Url;

/// One page of a larger sequence. Derived, stateless, recomputed per render.
#[derive(Debug, PartialEq)]
pub struct PageSlice<'a, T> {
    pub items: &'a [T],
    /// Always at least 1, even for an empty sequence.
    pub total_pages: usize,
    /// Clamped to `[1, total_pages]`.
    pub current_page: usize,
}

/// Slice `items` for the requested page. Page 0 and out-of-range requests
/// clamp rather than erroring.
pub fn paginate<T>(items: &[T], per_page: usize, requested: usize) -> PageSlice<'_, T> {
    let per_page = per_page.max(1);
    let total_pages = items.len().div_ceil(per_page).max(1);
    let current_page = requested.clamp(1, total_pages);
    let start = (current_page - 1) * per_page;
    let end = (start + per_page).min(items.len());
    PageSlice {
        items: &items[start..end],
        total_pages,
        current_page,
    }
}

/// The `page` query parameter as a positive integer; missing, non-numeric,
/// and non-positive values all default to 1.
pub fn page_param(location: &Url) -> usize {
    location
        .query_pairs()
        .find(|(key, _)| key == "page")
        .and_then(|(_, value)| value.parse::<i64>().ok())
        .filter(|page| *page >= 1)
        .map(|page| page as usize)
        .unwrap_or(1)
}

/// One entry of the page-number window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageToken {
    Page(usize),
    Ellipsis,
}

/// Deterministic page-number window for a pagination bar.
pub fn page_window(current: usize, total: usize) -> Vec<PageToken> {
    if total <= 7 {
        return (1..=total).map(PageToken::Page).collect();
    }
    let mut tokens = vec![PageToken::Page(1)];
    if current > 3 {
        tokens.push(PageToken::Ellipsis);
    }
    // Three-page run centered on the current page, clamped inside the
    // interior (page 1 and `total` are already pinned).
    let center = current.clamp(2, total - 1);
    let lo = (center - 1).max(2);
    let hi = (center + 1).min(total - 1);
    for page in lo..=hi {
        tokens.push(PageToken::Page(page));
    }
    if current < total - 2 {
        tokens.push(PageToken::Ellipsis);
    }
    tokens.push(PageToken::Page(total));
    tokens
}

/// Localized labels for the previous/next links.
#[derive(Debug, Clone, Copy)]
pub struct PageLabels<'a> {
    pub prev: &'a str,
    pub next: &'a str,
}

/// Render the pagination bar. Nothing at all is rendered for a single page.
///
/// `extra_query` is carried into every link ahead of the `page` parameter
/// (the gallery detail view threads its `slug` through here).
pub fn render_links(
    current: usize,
    total: usize,
    base_path: &str,
    extra_query: Option<&str>,
    labels: &PageLabels<'_>,
) -> Markup {
    if total <= 1 {
        return html! {};
    }
    let query_prefix = match extra_query {
        Some(extra) if !extra.is_empty() => format!("?{extra}&page="),
        _ => "?page=".to_string(),
    };
    let href = |page: usize| format!("{base_path}{query_prefix}{page}");
    html! {
        nav class="pagination" {
            @if current <= 1 {
                span class="is-disabled" { (labels.prev) }
            } @else {
                a href=(href(current - 1)) { (labels.prev) }
            }
            @for token in page_window(current, total) {
                @match token {
                    PageToken::Ellipsis => {
                        span { "…" }
                    }
                    PageToken::Page(page) => {
                        @if page == current {
                            span class="is-current" { (page) }
                        } @else {
                            a href=(href(page)) { (page) }
                        }
                    }
                }
            }
            @if current >= total {
                span class="is-disabled" { (labels.next) }
            } @else {
                a href=(href(current + 1)) { (labels.next) }
            }
        }
    }
}
