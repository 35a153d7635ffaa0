//! Search areas offered by the admin search bar.

use serde::Serialize;

use crate::context::AdminRequest;
use crate::menu::{Visibility, slugify};
use crate::urls::append_querystring;

/// A place the admin search can be directed to.
#[derive(Debug, Clone)]
pub struct SearchArea {
    pub name: String,
    /// Untranslated message ID.
    pub label: String,
    pub url: String,
    pub icon_name: Option<String>,
    pub classnames: String,
    pub order: i32,
    visibility: Visibility,
}

impl SearchArea {
    pub fn new(label: impl Into<String>, url: impl Into<String>) -> Self {
        let label = label.into();
        Self {
            name: slugify(&label),
            label,
            url: url.into(),
            icon_name: None,
            classnames: String::new(),
            order: 1000,
            visibility: Visibility::always(),
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn icon(mut self, icon_name: impl Into<String>) -> Self {
        self.icon_name = Some(icon_name.into());
        self
    }

    pub fn classnames(mut self, classnames: impl Into<String>) -> Self {
        self.classnames = classnames.into();
        self
    }

    pub fn order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    pub fn shown_when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&AdminRequest<'_>) -> bool + Send + Sync + 'static,
    {
        self.visibility = Visibility::when(predicate);
        self
    }

    pub fn is_shown(&self, request: &AdminRequest<'_>) -> bool {
        self.visibility.is_shown(request)
    }
}

/// A search area resolved for one request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedSearchArea {
    pub name: String,
    pub label: String,
    pub url: String,
    pub icon_name: Option<String>,
    pub classnames: String,
    pub order: i32,
}

/// Visible search areas for the request, sorted by order. When a query is
/// given it is carried over to each area's URL as `q`.
pub fn render_search_areas(
    request: &AdminRequest<'_>,
    query: Option<&str>,
) -> Vec<RenderedSearchArea> {
    let querystring = query
        .filter(|q| !q.is_empty())
        .map(|q| format!("q={}", urlencoding::encode(q)));

    let mut areas: Vec<RenderedSearchArea> = request
        .site
        .registry()
        .search_areas()
        .iter()
        .filter(|area| area.is_shown(request))
        .map(|area| RenderedSearchArea {
            name: area.name.clone(),
            label: request.gettext(&area.label),
            url: append_querystring(&area.url, querystring.as_deref()),
            icon_name: area.icon_name.clone(),
            classnames: area.classnames.clone(),
            order: area.order,
        })
        .collect();

    areas.sort_by_key(|area| area.order);
    areas
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn builder() {
        let area = SearchArea::new("Pages", "/admin/pages/search/")
            .name("pages")
            .icon("folder-open-inverse")
            .order(100);
        assert_eq!(area.name, "pages");
        assert_eq!(area.order, 100);
        assert_eq!(area.icon_name.as_deref(), Some("folder-open-inverse"));
    }

    #[test]
    fn default_name_is_slug() {
        assert_eq!(SearchArea::new("Snippet Types", "/s/").name, "snippet-types");
    }
}
