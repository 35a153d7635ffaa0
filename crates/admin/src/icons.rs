//! The admin SVG icon set.

use serde::Serialize;
use tracing::debug;

/// Icon file names resolved under a single path prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IconSet {
    prefix: String,
    entries: Vec<String>,
}

impl IconSet {
    /// Create an empty set resolving under `prefix` (e.g. "portico/icons").
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into().trim_end_matches('/').to_string(),
            entries: Vec::new(),
        }
    }

    /// Add an icon file name. Returns false if it was already present.
    pub fn append(&mut self, file_name: impl Into<String>) -> bool {
        let file_name = file_name.into();
        if self.entries.contains(&file_name) {
            debug!(icon = %file_name, "icon already registered");
            return false;
        }
        self.entries.push(file_name);
        true
    }

    /// Add several icon file names, skipping duplicates.
    pub fn extend<I, S>(&mut self, file_names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in file_names {
            self.append(name);
        }
    }

    /// Full path of every icon, in registration order.
    pub fn paths(&self) -> Vec<String> {
        self.entries.iter().map(|name| self.path_for(name)).collect()
    }

    /// Resolve an icon by name, with or without the ".svg" extension.
    pub fn resolve(&self, name: &str) -> Option<String> {
        let file_name = if name.ends_with(".svg") {
            name.to_string()
        } else {
            format!("{name}.svg")
        };
        self.entries
            .contains(&file_name)
            .then(|| self.path_for(&file_name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.resolve(name).is_some()
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn file_names(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn path_for(&self, file_name: &str) -> String {
        format!("{}/{}", self.prefix, file_name)
    }
}
