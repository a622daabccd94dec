//! Site configuration.
//!
//! A single `config.toml` at the site root, with stock defaults for every
//! value — a config file is optional, and a present one is sparse (override
//! just the values you want). Unknown keys are rejected to catch typos early.
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [languages]
//! supported = ["en", "es", "ko", "ja"]
//! default = "en"
//!
//! [pagination]
//! posts_per_page = 4              # Cards per list page (blog and news)
//! album_images_per_page = 4       # Images per gallery-album page
//!
//! [routing]
//! # First path segments that are never language-prefixed
//! bypass_segments = ["admin", "content", "assets", "settings", "i18n"]
//! # Well-known entry-script path used to recover the deployment base path
//! entry_script = "assets/js/main.js"
//! # Site-relative path of the translation dictionary
//! i18n_path = "assets/i18n.json"
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    pub languages: LanguagesConfig,
    pub pagination: PaginationConfig,
    pub routing: RoutingConfig,
}

/// Supported-language set and the default used for unprefixed URLs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LanguagesConfig {
    pub supported: Vec<String>,
    pub default: String,
}

impl Default for LanguagesConfig {
    fn default() -> Self {
        Self {
            supported: ["en", "es", "ko", "ja"].map(String::from).to_vec(),
            default: "en".to_string(),
        }
    }
}

/// Page sizes for list views.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PaginationConfig {
    pub posts_per_page: usize,
    pub album_images_per_page: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            posts_per_page: 4,
            album_images_per_page: 4,
        }
    }
}

/// URL-surface settings consumed by the locale resolver.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RoutingConfig {
    /// First path segments exempt from the language-prefix redirect.
    pub bypass_segments: Vec<String>,
    /// Well-known entry-script path; see `locale::detect_base_path`.
    pub entry_script: String,
    /// Site-relative path of the translation dictionary document.
    pub i18n_path: String,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            bypass_segments: ["admin", "content", "assets", "settings", "i18n"]
                .map(String::from)
                .to_vec(),
            entry_script: "assets/js/main.js".to_string(),
            i18n_path: "assets/i18n.json".to_string(),
        }
    }
}

impl SiteConfig {
    /// Validate config values are internally consistent.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.languages.supported.is_empty() {
            return Err(ConfigError::Validation(
                "languages.supported must not be empty".into(),
            ));
        }
        if self.languages.supported.iter().any(|lang| lang.is_empty()) {
            return Err(ConfigError::Validation(
                "languages.supported entries must be non-empty".into(),
            ));
        }
        if !self.languages.supported.contains(&self.languages.default) {
            return Err(ConfigError::Validation(format!(
                "languages.default '{}' is not in languages.supported",
                self.languages.default
            )));
        }
        if self.pagination.posts_per_page == 0 || self.pagination.album_images_per_page == 0 {
            return Err(ConfigError::Validation(
                "pagination sizes must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Load `config.toml` from the site root. A missing file means stock
/// defaults; a present file is parsed, merged over defaults field-by-field
/// (serde defaults), and validated.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let path = root.join("config.toml");
    let config = if path.exists() {
        let raw = fs::read_to_string(&path)?;
        toml::from_str(&raw)?
    } else {
        SiteConfig::default()
    };
    config.validate()?;
    Ok(config)
}
