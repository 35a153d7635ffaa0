//! View sets - groups of admin views mounted under a shared URL prefix.

use tracing::{debug, warn};

use super::resolver::RouteDefinition;

/// A group of named views under one URL prefix.
///
/// Routes are named `"{name}:{view}"` and mounted at `"/{url_prefix}{suffix}"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewSet {
    pub name: String,
    pub url_prefix: String,
    /// (view name, path suffix) pairs.
    pub views: Vec<(String, String)>,
}

impl ViewSet {
    /// Create a view set with no views.
    pub fn new(name: impl Into<String>, url_prefix: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url_prefix: url_prefix.into().trim_matches('/').to_string(),
            views: Vec::new(),
        }
    }

    /// Create the index/add/edit/delete view set used for admin-managed models.
    pub fn model(name: impl Into<String>, url_prefix: impl Into<String>) -> Self {
        Self::new(name, url_prefix)
            .with_view("index", "/")
            .with_view("add", "/add/")
            .with_view("edit", "/:id/")
            .with_view("delete", "/:id/delete/")
    }

    /// Add a view.
    pub fn with_view(mut self, view: impl Into<String>, suffix: impl Into<String>) -> Self {
        self.views.push((view.into(), suffix.into()));
        self
    }

    /// Route definitions for every view in the set.
    pub fn url_patterns(&self) -> Vec<RouteDefinition> {
        self.views
            .iter()
            .map(|(view, suffix)| {
                RouteDefinition::new(
                    format!("{}:{}", self.name, view),
                    format!("/{}{}", self.url_prefix, suffix),
                )
            })
            .collect()
    }
}

/// Collects view sets before the URL resolver is finalized.
#[derive(Debug, Default)]
pub struct ViewSetRegistry {
    viewsets: Vec<ViewSet>,
    populated: bool,
}

impl ViewSetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a view set. Once the registry is populated its routes are
    /// already mounted, so later view sets are ignored.
    pub fn register(&mut self, viewset: ViewSet) {
        if self.populated {
            warn!(name = %viewset.name, "view set registered after URLs were mounted; ignoring");
            return;
        }
        self.viewsets.push(viewset);
    }

    /// Mark the registry complete. Idempotent.
    pub fn populate(&mut self) {
        if self.populated {
            return;
        }
        self.populated = true;
        debug!(viewsets = self.viewsets.len(), "populated view sets");
    }

    /// URL patterns of every registered view set, in registration order.
    pub fn url_patterns(&self) -> Vec<RouteDefinition> {
        self.viewsets
            .iter()
            .flat_map(ViewSet::url_patterns)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.viewsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.viewsets.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn model_viewset_routes() {
        let patterns = ViewSet::model("collections", "/collections/").url_patterns();
        let names: Vec<_> = patterns.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "collections:index",
                "collections:add",
                "collections:edit",
                "collections:delete"
            ]
        );
        assert_eq!(patterns[0].path, "/collections/");
        assert_eq!(patterns[2].path, "/collections/:id/");
    }

    #[test]
    fn registry_concatenates_patterns() {
        let mut registry = ViewSetRegistry::new();
        registry.register(ViewSet::model("collections", "collections"));
        registry.register(ViewSet::new("workflows", "workflows").with_view("index", "/"));
        registry.populate();
        registry.populate();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.url_patterns().len(), 5);
    }

    #[test]
    fn late_registrations_ignored() {
        let mut registry = ViewSetRegistry::new();
        registry.register(ViewSet::model("collections", "collections"));
        registry.populate();
        registry.register(ViewSet::model("snippets", "snippets"));
        assert_eq!(registry.len(), 1);
        assert!(
            registry
                .url_patterns()
                .iter()
                .all(|route| !route.name.starts_with("snippets:"))
        );
    }
}
