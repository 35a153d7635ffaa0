//! Interface string translation.
//!
//! Labels are registered as untranslated message IDs and translated when a
//! request renders them, so one registry serves every admin language.

use std::collections::HashMap;
use std::path::Path;

use dashmap::DashMap;
use tracing::{debug, info};

use crate::error::{AdminError, AdminResult};

/// In-memory translation catalog.
pub struct Translator {
    /// key = "language\0msgid" -> translation.
    cache: DashMap<String, String>,
}

impl Translator {
    /// Create a translator with an empty catalog (every lookup falls back to
    /// the message ID).
    pub fn new() -> Self {
        Self {
            cache: DashMap::new(),
        }
    }

    /// Add translations for one language.
    pub fn load_catalog(&self, language: &str, entries: HashMap<String, String>) -> usize {
        let count = entries.len();
        for (msgid, translation) in entries {
            self.cache.insert(cache_key(language, &msgid), translation);
        }
        debug!(language = %language, count = count, "loaded translation catalog");
        count
    }

    /// Load every `<language>.json` file in a directory.
    ///
    /// Each file holds a flat JSON object of msgid -> translation.
    pub fn load_dir(&self, dir: &Path) -> AdminResult<usize> {
        let catalog_err = |details: String| AdminError::Catalog {
            path: dir.display().to_string(),
            details,
        };

        let entries = std::fs::read_dir(dir).map_err(|e| catalog_err(e.to_string()))?;

        let mut total = 0usize;
        for entry in entries {
            let path = entry.map_err(|e| catalog_err(e.to_string()))?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(language) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            let content = std::fs::read_to_string(&path).map_err(|e| AdminError::Catalog {
                path: path.display().to_string(),
                details: e.to_string(),
            })?;
            let catalog: HashMap<String, String> =
                serde_json::from_str(&content).map_err(|e| AdminError::Catalog {
                    path: path.display().to_string(),
                    details: e.to_string(),
                })?;
            total += self.load_catalog(language, catalog);
        }

        info!(dir = %dir.display(), count = total, "loaded translation catalogs");
        Ok(total)
    }

    /// Translate a message ID, falling back to the ID itself.
    pub fn gettext(&self, msgid: &str, language: &str) -> String {
        match self.cache.get(&cache_key(language, msgid)) {
            Some(translation) => translation.clone(),
            None => msgid.to_string(),
        }
    }

    /// Number of cached translations across all languages.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

impl Default for Translator {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Translator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Translator")
            .field("cache_size", &self.cache.len())
            .finish()
    }
}

/// Null byte separator keeps "fr" + "a\0b" from colliding with other keys.
fn cache_key(language: &str, msgid: &str) -> String {
    format!("{language}\0{msgid}")
}

/// Substitute `{name}` placeholders in a template.
///
/// Placeholders without a matching argument are left untouched.
pub fn interpolate(template: &str, args: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let Some(end) = after.find('}') else {
            out.push_str(&rest[start..]);
            return out;
        };
        let name = &after[..end];
        match args.iter().find(|(key, _)| *key == name) {
            Some((_, value)) => out.push_str(value),
            None => {
                out.push('{');
                out.push_str(name);
                out.push('}');
            }
        }
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    out
}
