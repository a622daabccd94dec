//! Locale and routing resolution.
//!
//! Runs before anything else reads the URL: it derives the active language
//! and the deployment base path, and decides whether the current location
//! needs a language-prefix redirect. All three operations are pure — the
//! caller owns the actual navigation side effect, so tests (and any embedding
//! shell) drive them with plain values.
//!
//! ## Base path
//!
//! The site may be served under a subpath (`https://host/mysite/...`). Rather
//! than configuring that per deployment, the base path is recovered from the
//! URL of the entry script itself: everything up to the well-known
//! entry-script path is the base. Resolution failure degrades to `/`, which
//! is correct for root deployments.

use url::Url;

/// Derive the deployment base path from the executing entry script's URL.
///
/// `entry_script` is the well-known site-relative path of the script
/// (`assets/js/main.js` by default, see `SiteConfig`). Returns `/` when the
/// URL does not parse or does not end with the entry-script path.
///
/// ```
/// use polyfolio::locale::detect_base_path;
///
/// let base = detect_base_path("https://host/mysite/assets/js/main.js", "assets/js/main.js");
/// assert_eq!(base, "/mysite/");
/// ```
pub fn detect_base_path(script_url: &str, entry_script: &str) -> String {
    let Ok(url) = Url::parse(script_url) else {
        return "/".to_string();
    };
    let path = url.path();
    let needle = format!("/{}", entry_script.trim_start_matches('/'));
    if path.ends_with(&needle) {
        // Keep the trailing slash: base paths always end in '/'.
        path[..path.len() - needle.len() + 1].to_string()
    } else {
        "/".to_string()
    }
}

/// Active language from a URL path: the first segment if it is a supported
/// language, otherwise the default.
pub fn detect_language<'a>(path: &str, supported: &'a [String], default: &'a str) -> &'a str {
    let first = first_segment(path);
    supported
        .iter()
        .map(String::as_str)
        .find(|lang| *lang == first)
        .unwrap_or(default)
}

/// Decide whether `location` needs a language-prefix redirect.
///
/// Returns `Some(target)` — the same path prefixed with the default language,
/// query and fragment preserved — when the first path segment is neither a
/// supported language nor a reserved bypass segment. Returns `None` when the
/// URL is already well-formed or deliberately non-localized.
///
/// Must run before any other component reads the path, since it can change
/// the effective URL.
pub fn redirect_if_missing_prefix(
    location: &Url,
    supported: &[String],
    bypass: &[String],
    default_lang: &str,
) -> Option<Url> {
    let first = first_segment(location.path());
    if supported.iter().any(|lang| lang == first) || bypass.iter().any(|seg| seg == first) {
        return None;
    }
    let mut target = location.clone();
    target.set_path(&format!("/{}{}", default_lang, location.path()));
    Some(target)
}

fn first_segment(path: &str) -> &str {
    path.trim_start_matches('/').split('/').next().unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn langs() -> Vec<String> {
        ["en", "es", "ko", "ja"].map(String::from).to_vec()
    }

    fn bypass() -> Vec<String> {
        ["admin", "content", "assets", "settings", "i18n"]
            .map(String::from)
            .to_vec()
    }

    #[test]
    fn base_path_under_subpath_deployment() {
        assert_eq!(
            detect_base_path("https://host/mysite/assets/js/main.js", "assets/js/main.js"),
            "/mysite/"
        );
        assert_eq!(
            detect_base_path("https://host/a/b/assets/js/main.js", "assets/js/main.js"),
            "/a/b/"
        );
    }

    #[test]
    fn base_path_at_root() {
        assert_eq!(
            detect_base_path("https://host/assets/js/main.js", "assets/js/main.js"),
            "/"
        );
    }

    #[test]
    fn base_path_falls_back_to_root_on_failure() {
        assert_eq!(detect_base_path("not a url", "assets/js/main.js"), "/");
        assert_eq!(
            detect_base_path("https://host/other/script.js", "assets/js/main.js"),
            "/"
        );
    }

    #[test]
    fn language_from_first_segment() {
        assert_eq!(detect_language("/es/blog/", &langs(), "en"), "es");
        assert_eq!(detect_language("/ja", &langs(), "en"), "ja");
    }

    #[test]
    fn language_defaults_when_segment_unsupported() {
        assert_eq!(detect_language("/fr/blog/", &langs(), "en"), "en");
        assert_eq!(detect_language("/about", &langs(), "en"), "en");
        assert_eq!(detect_language("/", &langs(), "en"), "en");
    }

    #[test]
    fn unprefixed_path_redirects_with_query_and_fragment() {
        let location = Url::parse("https://host/about?tab=2#team").unwrap();
        let target = redirect_if_missing_prefix(&location, &langs(), &bypass(), "en").unwrap();
        assert_eq!(target.as_str(), "https://host/en/about?tab=2#team");
    }

    #[test]
    fn prefixed_path_is_left_alone() {
        let location = Url::parse("https://host/es/blog/?page=2").unwrap();
        assert_eq!(
            redirect_if_missing_prefix(&location, &langs(), &bypass(), "en"),
            None
        );
    }

    #[test]
    fn bypass_segments_are_never_redirected() {
        for path in ["/assets/x.png", "/admin", "/content/blog/en/index.json"] {
            let location = Url::parse(&format!("https://host{path}")).unwrap();
            assert_eq!(
                redirect_if_missing_prefix(&location, &langs(), &bypass(), "en"),
                None,
                "{path} should bypass"
            );
        }
    }

    #[test]
    fn site_root_redirects_to_default_language() {
        let location = Url::parse("https://host/").unwrap();
        let target = redirect_if_missing_prefix(&location, &langs(), &bypass(), "en").unwrap();
        assert_eq!(target.as_str(), "https://host/en/");
    }
}
