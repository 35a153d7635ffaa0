//! URL resolver - maps route names to path patterns and back.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AdminError, AdminResult};

/// A named route pattern, relative to the admin base URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteDefinition {
    /// Route name (e.g., "pages:edit")
    pub name: String,
    /// Path pattern (e.g., "/pages/:id/edit/")
    pub path: String,
}

impl RouteDefinition {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

/// Result of matching a path against registered routes.
#[derive(Debug, Clone)]
pub struct RouteMatch {
    /// Name of the matched route.
    pub name: String,
    /// Path parameters extracted (e.g., {"id": "42"})
    pub params: HashMap<String, String>,
}

/// Core admin routes that do not come from a view set.
const ADMIN_ROUTES: &[(&str, &str)] = &[
    ("explore_root", "/pages/"),
    ("pages:search", "/pages/search/"),
    ("pages:edit", "/pages/:id/edit/"),
    ("pages:view_draft", "/pages/:id/edit/preview/"),
    ("pages:add_subpage", "/pages/:id/add_subpage/"),
    ("pages:move", "/pages/:id/move/"),
    ("pages:copy", "/pages/:id/copy/"),
    ("pages:delete", "/pages/:id/delete/"),
    ("pages:unpublish", "/pages/:id/unpublish/"),
    ("pages:revisions_index", "/pages/:id/revisions/"),
    ("pages:history", "/pages/:id/history/"),
    ("account:change_avatar", "/account/change_avatar/"),
    ("account:change_email", "/account/change_email/"),
    ("account:change_password", "/account/change_password/"),
    (
        "account:notification_preferences",
        "/account/notification_preferences/",
    ),
    ("account:language_preferences", "/account/language_preferences/"),
    ("account:current_time_zone", "/account/current_time_zone/"),
    ("account:change_name", "/account/change_name/"),
    ("reports:locked_pages", "/reports/locked/"),
    ("reports:workflow", "/reports/workflow/"),
    ("reports:workflow_tasks", "/reports/workflow_tasks/"),
    ("reports:site_history", "/reports/site-history/"),
];

/// Registry of named routes under one admin base URL.
#[derive(Debug, Clone)]
pub struct UrlResolver {
    /// Admin mount point, e.g. "/admin".
    base: String,
    /// Route name -> path pattern.
    routes: HashMap<String, String>,
    /// (pattern, name), most specific first.
    match_order: Vec<(String, String)>,
}

impl UrlResolver {
    /// Create an empty resolver mounted at `base`.
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into().trim_end_matches('/').to_string(),
            routes: HashMap::new(),
            match_order: Vec::new(),
        }
    }

    /// Create a resolver holding the core admin routes.
    pub fn with_admin_routes(base: impl Into<String>) -> AdminResult<Self> {
        let mut resolver = Self::new(base);
        for (name, path) in ADMIN_ROUTES {
            resolver.register(RouteDefinition::new(*name, *path))?;
        }
        Ok(resolver)
    }

    /// Register a route. Names must be unique.
    pub fn register(&mut self, route: RouteDefinition) -> AdminResult<()> {
        if self.routes.contains_key(&route.name) {
            return Err(AdminError::DuplicateRoute { name: route.name });
        }
        self.match_order
            .push((route.path.clone(), route.name.clone()));
        self.routes.insert(route.name, route.path);

        // Fewer params = more specific = first; deeper paths before shallower.
        self.match_order.sort_by_key(|(path, _)| {
            let param_count = path.matches(':').count();
            let segment_count = path.matches('/').count();
            (param_count, -(segment_count as i32))
        });
        Ok(())
    }

    /// Register every route in `routes`.
    pub fn extend(&mut self, routes: impl IntoIterator<Item = RouteDefinition>) -> AdminResult<()> {
        for route in routes {
            self.register(route)?;
        }
        debug!(routes = self.routes.len(), "extended route table");
        Ok(())
    }

    /// Build the full URL for a named route, filling `:param` segments in order.
    pub fn reverse(&self, name: &str, args: &[&str]) -> AdminResult<String> {
        let pattern = self
            .routes
            .get(name)
            .ok_or_else(|| AdminError::UnknownRoute {
                name: name.to_string(),
            })?;

        let expected = pattern.matches(':').count();
        if expected != args.len() {
            return Err(AdminError::RouteArguments {
                name: name.to_string(),
                expected,
                given: args.len(),
            });
        }

        let mut args = args.iter();
        let path: Vec<String> = pattern
            .split('/')
            .map(|segment| {
                if segment.starts_with(':') {
                    args.next()
                        .map(|arg| urlencoding::encode(arg).into_owned())
                        .unwrap_or_default()
                } else {
                    segment.to_string()
                }
            })
            .collect();

        Ok(format!("{}{}", self.base, path.join("/")))
    }

    /// Match a full request path against registered routes.
    pub fn match_path(&self, path: &str) -> Option<RouteMatch> {
        let relative = path.strip_prefix(&self.base)?;
        for (pattern, name) in &self.match_order {
            if let Some(params) = match_pattern(pattern, relative) {
                return Some(RouteMatch {
                    name: name.clone(),
                    params,
                });
            }
        }
        None
    }

    /// Check whether a route name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.routes.contains_key(name)
    }

    /// The admin mount point.
    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// Append a query string to a path when one is given.
pub fn append_querystring(path: &str, querystring: Option<&str>) -> String {
    match querystring {
        Some(qs) if !qs.is_empty() => format!("{path}?{qs}"),
        _ => path.to_string(),
    }
}

/// Match a route pattern against a path, extracting parameters.
///
/// Pattern: "/pages/:id/edit/"
/// Path: "/pages/42/edit/"
/// Result: Some({"id": "42"})
fn match_pattern(pattern: &str, path: &str) -> Option<HashMap<String, String>> {
    let pattern_parts: Vec<&str> = pattern.split('/').collect();
    let path_parts: Vec<&str> = path.split('/').collect();

    if pattern_parts.len() != path_parts.len() {
        return None;
    }

    let mut params = HashMap::new();

    for (pat, actual) in pattern_parts.iter().zip(path_parts.iter()) {
        if let Some(param_name) = pat.strip_prefix(':') {
            if actual.is_empty() {
                return None;
            }
            params.insert(param_name.to_string(), actual.to_string());
        } else if pat != actual {
            return None;
        }
    }

    Some(params)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn reverse_static_route() {
        let urls = UrlResolver::with_admin_routes("/admin").unwrap();
        assert_eq!(urls.reverse("explore_root", &[]).unwrap(), "/admin/pages/");
    }

    #[test]
    fn reverse_with_argument() {
        let urls = UrlResolver::with_admin_routes("/admin/").unwrap();
        assert_eq!(
            urls.reverse("pages:edit", &["42"]).unwrap(),
            "/admin/pages/42/edit/"
        );
    }

    #[test]
    fn reverse_encodes_arguments() {
        let mut urls = UrlResolver::new("/admin");
        urls.register(RouteDefinition::new("tags:view", "/tags/:tag/"))
            .unwrap();
        assert_eq!(
            urls.reverse("tags:view", &["a b/c"]).unwrap(),
            "/admin/tags/a%20b%2Fc/"
        );
    }

    #[test]
    fn reverse_unknown_route() {
        let urls = UrlResolver::new("/admin");
        assert!(matches!(
            urls.reverse("nope", &[]),
            Err(AdminError::UnknownRoute { .. })
        ));
    }

    #[test]
    fn reverse_wrong_arity() {
        let urls = UrlResolver::with_admin_routes("/admin").unwrap();
        assert!(matches!(
            urls.reverse("pages:edit", &[]),
            Err(AdminError::RouteArguments {
                expected: 1,
                given: 0,
                ..
            })
        ));
    }

    #[test]
    fn duplicate_route_rejected() {
        let mut urls = UrlResolver::with_admin_routes("/admin").unwrap();
        let err = urls
            .register(RouteDefinition::new("pages:edit", "/elsewhere/"))
            .unwrap_err();
        assert!(matches!(err, AdminError::DuplicateRoute { .. }));
    }

    #[test]
    fn match_prefers_literal_routes() {
        let urls = UrlResolver::with_admin_routes("/admin").unwrap();
        let m = urls.match_path("/admin/pages/search/").unwrap();
        assert_eq!(m.name, "pages:search");

        let m = urls.match_path("/admin/pages/7/history/").unwrap();
        assert_eq!(m.name, "pages:history");
        assert_eq!(m.params.get("id"), Some(&"7".to_string()));
    }

    #[test]
    fn match_outside_base() {
        let urls = UrlResolver::with_admin_routes("/admin").unwrap();
        assert!(urls.match_path("/pages/").is_none());
    }

    #[test]
    fn match_pattern_rejects_empty_param() {
        assert!(match_pattern("/pages/:id/edit/", "/pages//edit/").is_none());
        assert!(match_pattern("/pages/:id/", "/pages/1/2/").is_none());
    }

    #[test]
    fn querystring_appended_only_when_present() {
        assert_eq!(append_querystring("/a/", None), "/a/");
        assert_eq!(append_querystring("/a/", Some("")), "/a/");
        assert_eq!(append_querystring("/a/", Some("next=%2F")), "/a/?next=%2F");
    }
}
