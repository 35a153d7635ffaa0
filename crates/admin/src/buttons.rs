//! Action buttons shown on page listing rows.
//!
//! Buttons are produced per row by contributors registered under
//! `register_page_listing_buttons` and `register_page_listing_more_buttons`.
//! A contributor receives a [`ButtonContext`] and returns the buttons the
//! row's permissions allow; nothing is produced for rows the user cannot act on.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use serde::Serialize;
use tracing::warn;

use crate::context::{AdminRequest, PageRecord};
use crate::html::html_escape;
use crate::permissions::PagePermissions;

/// Classes every page listing button carries.
const PAGE_LISTING_CLASSES: &[&str] = &["button", "button-small", "button-secondary"];

/// How a button is presented.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ButtonStyle {
    Plain,
    PageListing,
    Dropdown { buttons: Vec<Button> },
}

/// A single action button.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Button {
    pub label: String,
    pub url: Option<String>,
    pub attrs: BTreeMap<String, String>,
    pub classes: BTreeSet<String>,
    pub priority: i32,
    pub style: ButtonStyle,
}

impl Button {
    /// A plain link button.
    pub fn new(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            url: Some(url.into()),
            attrs: BTreeMap::new(),
            classes: BTreeSet::new(),
            priority: 1000,
            style: ButtonStyle::Plain,
        }
    }

    /// A button styled for the page listing row.
    pub fn page_listing(label: impl Into<String>, url: impl Into<String>) -> Self {
        let mut button = Self::new(label, url);
        button.style = ButtonStyle::PageListing;
        button
            .classes
            .extend(PAGE_LISTING_CLASSES.iter().map(|c| (*c).to_string()));
        button
    }

    /// A dropdown holding other buttons.
    pub fn dropdown(label: impl Into<String>, buttons: Vec<Button>) -> Self {
        Self {
            label: label.into(),
            url: None,
            attrs: BTreeMap::new(),
            classes: BTreeSet::new(),
            priority: 1000,
            style: ButtonStyle::Dropdown { buttons },
        }
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    /// Replace the class set.
    pub fn classes<I, S>(mut self, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.classes = classes.into_iter().map(Into::into).collect();
        self
    }

    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Open the link in a new tab without leaking the opener.
    pub fn new_tab(self) -> Self {
        self.attr("target", "_blank")
            .attr("rel", "noopener noreferrer")
    }

    /// Child buttons of a dropdown; empty for other styles.
    pub fn dropdown_buttons(&self) -> &[Button] {
        match &self.style {
            ButtonStyle::Dropdown { buttons } => buttons,
            _ => &[],
        }
    }

    /// Render the button as HTML.
    pub fn to_html(&self) -> String {
        let mut attrs = self.attrs.clone();
        if !self.classes.is_empty() {
            let classes: Vec<&str> = self.classes.iter().map(String::as_str).collect();
            attrs.insert("class".to_string(), classes.join(" "));
        }

        match &self.style {
            ButtonStyle::Dropdown { buttons } => {
                let items: String = buttons
                    .iter()
                    .map(|b| format!("<li>{}</li>", b.to_html()))
                    .collect();
                format!(
                    r#"<div class="dropdown"><button type="button"{}>{}</button><ul role="menu">{items}</ul></div>"#,
                    attr_string(&attrs),
                    html_escape(&self.label)
                )
            }
            _ => {
                if let Some(url) = &self.url {
                    attrs.insert("href".to_string(), url.clone());
                }
                format!("<a{}>{}</a>", attr_string(&attrs), html_escape(&self.label))
            }
        }
    }
}

/// Render attributes as ` name="value"` pairs in name order.
pub fn attr_string(attrs: &BTreeMap<String, String>) -> String {
    attrs
        .iter()
        .map(|(name, value)| format!(r#" {}="{}""#, html_escape(name), html_escape(value)))
        .collect()
}

/// Everything a contributor needs to build the buttons for one row.
pub struct ButtonContext<'a> {
    pub request: &'a AdminRequest<'a>,
    pub page: &'a PageRecord,
    pub perms: &'a dyn PagePermissions,
    /// True when the row is the parent page shown above the listing.
    pub is_parent: bool,
    /// Where to return after a destructive action.
    pub next_url: Option<&'a str>,
}

impl<'a> ButtonContext<'a> {
    pub fn new(
        request: &'a AdminRequest<'a>,
        page: &'a PageRecord,
        perms: &'a dyn PagePermissions,
    ) -> Self {
        Self {
            request,
            page,
            perms,
            is_parent: false,
            next_url: None,
        }
    }

    pub fn parent(mut self, is_parent: bool) -> Self {
        self.is_parent = is_parent;
        self
    }

    pub fn next_url(mut self, next_url: Option<&'a str>) -> Self {
        self.next_url = next_url;
        self
    }

    /// `next=<encoded url>` when a return URL is known.
    pub fn next_url_query(&self) -> Option<String> {
        self.next_url
            .filter(|url| !url.is_empty())
            .map(|url| format!("next={}", urlencoding::encode(url)))
    }

    /// Reverse a page route for this row's page.
    ///
    /// Reversal failures are logged and yield `None`, so the button is
    /// skipped instead of breaking the listing.
    pub fn page_url(&self, route: &str) -> Option<String> {
        let id = self.page.id.to_string();
        match self.request.site.urls().reverse(route, &[&id]) {
            Ok(url) => Some(url),
            Err(e) => {
                warn!(route, page_id = self.page.id, error = %e, "skipping button");
                None
            }
        }
    }

    /// Translate `msgid` and substitute the page's admin title for `{title}`.
    pub fn titled(&self, msgid: &str) -> String {
        self.request
            .format(msgid, &[("title", self.page.admin_display_title())])
    }
}

impl std::fmt::Debug for ButtonContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ButtonContext")
            .field("page", &self.page.id)
            .field("is_parent", &self.is_parent)
            .field("next_url", &self.next_url)
            .finish()
    }
}

/// A per-row button contributor.
pub type ButtonHook = Arc<dyn Fn(&ButtonContext<'_>) -> Vec<Button> + Send + Sync>;

/// Run every contributor and sort the result by priority.
///
/// The sort is stable, so equal priorities keep contributor order.
pub fn collect_buttons(hooks: &[ButtonHook], ctx: &ButtonContext<'_>) -> Vec<Button> {
    let mut buttons: Vec<Button> = hooks.iter().flat_map(|hook| hook(ctx)).collect();
    buttons.sort_by_key(|b| b.priority);
    buttons
}

/// Collect the listing buttons for one page row.
pub fn page_listing_buttons(ctx: &ButtonContext<'_>) -> Vec<Button> {
    collect_buttons(ctx.request.site.registry().listing_buttons(), ctx)
}

/// Collect the buttons for a row's "More" dropdown.
pub fn page_listing_more_buttons(ctx: &ButtonContext<'_>) -> Vec<Button> {
    collect_buttons(ctx.request.site.registry().listing_more_buttons(), ctx)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn page_listing_classes() {
        let button = Button::page_listing("Edit", "/admin/pages/2/edit/");
        let classes: Vec<_> = button.classes.iter().map(String::as_str).collect();
        assert_eq!(classes, vec!["button", "button-secondary", "button-small"]);
        assert_eq!(button.style, ButtonStyle::PageListing);
    }

    #[test]
    fn html_escapes_attributes() {
        let button = Button::new("Move", "/admin/pages/2/move/")
            .attr("title", "Move page '<x>'")
            .priority(10);
        assert_eq!(
            button.to_html(),
            r#"<a href="/admin/pages/2/move/" title="Move page &#x27;&lt;x&gt;&#x27;">Move</a>"#
        );
    }

    #[test]
    fn new_tab_attrs() {
        let button = Button::page_listing("View live", "https://example.com/").new_tab();
        assert_eq!(button.attrs.get("target").unwrap(), "_blank");
        assert_eq!(button.attrs.get("rel").unwrap(), "noopener noreferrer");
    }

    #[test]
    fn dropdown_renders_children() {
        let dropdown = Button::dropdown(
            "More",
            vec![Button::new("Copy", "/c/"), Button::new("Delete", "/d/")],
        );
        assert_eq!(dropdown.dropdown_buttons().len(), 2);
        let html = dropdown.to_html();
        assert!(html.starts_with(r#"<div class="dropdown">"#));
        assert!(html.contains(r#"<li><a href="/c/">Copy</a></li>"#));
    }

    #[test]
    fn attr_string_sorted_by_name() {
        let mut attrs = BTreeMap::new();
        attrs.insert("title".to_string(), "T".to_string());
        attrs.insert("aria-label".to_string(), "A".to_string());
        assert_eq!(attr_string(&attrs), r#" aria-label="A" title="T""#);
    }
}
