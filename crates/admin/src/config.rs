//! Configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Admin site configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Mount point of the admin URL space (default: /admin).
    pub admin_base_url: String,

    /// Base URL for static assets (default: /static).
    pub static_url: String,

    /// Path prefix that every icon file name is resolved under (default: portico/icons).
    pub icon_prefix: String,

    /// Language used when a request does not specify one (default: en).
    pub default_language: String,

    /// Languages the admin interface is offered in (comma-separated, default: en).
    pub admin_languages: Vec<String>,

    /// Time zones users may pick from (comma-separated, default: none).
    pub admin_time_zones: Vec<String>,

    /// Whether users may change their own email address (default: true).
    pub email_management_enabled: bool,

    /// Whether users may change their own password (default: true).
    pub password_management_enabled: bool,

    /// ID of the page tree root, used as the explorer start for superusers (default: 1).
    pub root_page_id: i64,

    /// Directory of `<language>.json` translation catalogs.
    pub locale_dir: Option<PathBuf>,

    /// Rich text features enabled when a field does not name its own (comma-separated).
    pub rich_text_features: Option<Vec<String>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            admin_base_url: "/admin".to_string(),
            static_url: "/static".to_string(),
            icon_prefix: "portico/icons".to_string(),
            default_language: "en".to_string(),
            admin_languages: vec!["en".to_string()],
            admin_time_zones: Vec::new(),
            email_management_enabled: true,
            password_management_enabled: true,
            root_page_id: 1,
            locale_dir: None,
            rich_text_features: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Unset variables fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let admin_base_url = lookup("ADMIN_BASE_URL")
            .map(|v| normalize_base(&v))
            .unwrap_or(defaults.admin_base_url);

        let static_url = lookup("STATIC_URL")
            .map(|v| v.trim_end_matches('/').to_string())
            .unwrap_or(defaults.static_url);

        let icon_prefix = lookup("ICON_PREFIX")
            .map(|v| v.trim_matches('/').to_string())
            .unwrap_or(defaults.icon_prefix);

        let default_language = lookup("DEFAULT_LANGUAGE").unwrap_or(defaults.default_language);

        let admin_languages = lookup("ADMIN_LANGUAGES")
            .map(|v| split_list(&v))
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| vec![default_language.clone()]);

        let admin_time_zones = lookup("ADMIN_TIME_ZONES")
            .map(|v| split_list(&v))
            .unwrap_or_default();

        let email_management_enabled = match lookup("EMAIL_MANAGEMENT_ENABLED") {
            Some(v) => parse_bool(&v).context("EMAIL_MANAGEMENT_ENABLED must be true or false")?,
            None => defaults.email_management_enabled,
        };

        let password_management_enabled = match lookup("PASSWORD_MANAGEMENT_ENABLED") {
            Some(v) => {
                parse_bool(&v).context("PASSWORD_MANAGEMENT_ENABLED must be true or false")?
            }
            None => defaults.password_management_enabled,
        };

        let root_page_id = lookup("ROOT_PAGE_ID")
            .unwrap_or_else(|| "1".to_string())
            .parse()
            .context("ROOT_PAGE_ID must be a valid i64")?;

        let locale_dir = lookup("LOCALE_DIR").map(PathBuf::from);

        let rich_text_features = lookup("RICH_TEXT_FEATURES")
            .map(|v| split_list(&v))
            .filter(|v| !v.is_empty());

        Ok(Self {
            admin_base_url,
            static_url,
            icon_prefix,
            default_language,
            admin_languages,
            admin_time_zones,
            email_management_enabled,
            password_management_enabled,
            root_page_id,
            locale_dir,
            rich_text_features,
        })
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("'{other}' is not a boolean"),
    }
}

/// Ensure a leading slash and no trailing slash ("admin/" -> "/admin").
fn normalize_base(value: &str) -> String {
    let trimmed = value.trim().trim_end_matches('/');
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_set() {
        let config = Config::from_lookup(|_| None).unwrap();
        assert_eq!(config.admin_base_url, "/admin");
        assert_eq!(config.admin_languages, vec!["en"]);
        assert!(config.admin_time_zones.is_empty());
        assert!(config.email_management_enabled);
        assert_eq!(config.root_page_id, 1);
        assert!(config.rich_text_features.is_none());
    }

    #[test]
    fn lists_are_split_and_trimmed() {
        let config = Config::from_lookup(lookup_from(&[
            ("ADMIN_LANGUAGES", "en, fr ,de"),
            ("ADMIN_TIME_ZONES", "UTC,Europe/Rome,"),
            ("RICH_TEXT_FEATURES", "bold,italic"),
        ]))
        .unwrap();
        assert_eq!(config.admin_languages, vec!["en", "fr", "de"]);
        assert_eq!(config.admin_time_zones, vec!["UTC", "Europe/Rome"]);
        assert_eq!(
            config.rich_text_features,
            Some(vec!["bold".to_string(), "italic".to_string()])
        );
    }

    #[test]
    fn base_url_is_normalized() {
        let config = Config::from_lookup(lookup_from(&[("ADMIN_BASE_URL", "cms/")])).unwrap();
        assert_eq!(config.admin_base_url, "/cms");
    }

    #[test]
    fn booleans_are_parsed() {
        let config = Config::from_lookup(lookup_from(&[
            ("EMAIL_MANAGEMENT_ENABLED", "false"),
            ("PASSWORD_MANAGEMENT_ENABLED", "0"),
        ]))
        .unwrap();
        assert!(!config.email_management_enabled);
        assert!(!config.password_management_enabled);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(Config::from_lookup(lookup_from(&[("EMAIL_MANAGEMENT_ENABLED", "maybe")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("ROOT_PAGE_ID", "root")])).is_err());
    }
}
