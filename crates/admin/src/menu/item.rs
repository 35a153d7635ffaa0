//! Menu item definitions and their visibility predicates.

use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::context::AdminRequest;
use crate::hooks::HookName;

/// Default template for a link item.
pub const MENU_ITEM_TEMPLATE: &str = "portico/menu_item.html";
/// Template for the page explorer entry.
pub const EXPLORER_MENU_ITEM_TEMPLATE: &str = "portico/explorer_menu_item.html";
/// Default template for a submenu entry.
pub const SUBMENU_ITEM_TEMPLATE: &str = "portico/menu_submenu_item.html";
/// Template for the settings submenu entry.
pub const SETTINGS_MENU_ITEM_TEMPLATE: &str = "portico/menu_settings_menu_item.html";

/// Predicate over the current request.
pub type Predicate = Arc<dyn Fn(&AdminRequest<'_>) -> bool + Send + Sync>;

/// Extra template context computed per request.
pub type ContextProvider = Arc<dyn Fn(&AdminRequest<'_>) -> Map<String, Value> + Send + Sync>;

/// Whether a contribution is shown for a request.
#[derive(Clone, Default)]
pub struct Visibility(Option<Predicate>);

impl Visibility {
    /// Always shown.
    pub fn always() -> Self {
        Self(None)
    }

    /// Shown when `predicate` returns true.
    pub fn when<F>(predicate: F) -> Self
    where
        F: Fn(&AdminRequest<'_>) -> bool + Send + Sync + 'static,
    {
        Self(Some(Arc::new(predicate)))
    }

    pub fn is_shown(&self, request: &AdminRequest<'_>) -> bool {
        self.0.as_ref().is_none_or(|predicate| predicate(request))
    }
}

impl std::fmt::Debug for Visibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(if self.0.is_some() { "Predicate" } else { "Always" })
    }
}

/// The menus items can be registered into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuKind {
    Admin,
    Settings,
    Reports,
}

impl MenuKind {
    /// The extension point that feeds this menu.
    pub fn hook(self) -> HookName {
        match self {
            MenuKind::Admin => HookName::RegisterAdminMenuItem,
            MenuKind::Settings => HookName::RegisterSettingsMenuItem,
            MenuKind::Reports => HookName::RegisterReportsMenuItem,
        }
    }
}

/// Where a menu item leads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuTarget {
    Url(String),
    Submenu(MenuKind),
}

/// A menu entry contributed to one of the admin menus.
///
/// `label` is an untranslated message ID; it is translated when rendered.
#[derive(Debug, Clone)]
pub struct MenuItem {
    pub name: String,
    pub label: String,
    pub target: MenuTarget,
    pub icon_name: Option<String>,
    pub classnames: String,
    pub order: i32,
    pub template: &'static str,
    visibility: Visibility,
    context: Option<ContextProviderSlot>,
}

#[derive(Clone)]
struct ContextProviderSlot(ContextProvider);

impl std::fmt::Debug for ContextProviderSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ContextProvider")
    }
}

impl MenuItem {
    /// A plain link. The name defaults to the slug of the label.
    pub fn link(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self::with_target(label.into(), MenuTarget::Url(url.into()), MENU_ITEM_TEMPLATE)
    }

    /// An entry that expands into another menu.
    pub fn submenu(label: impl Into<String>, menu: MenuKind) -> Self {
        Self::with_target(label.into(), MenuTarget::Submenu(menu), SUBMENU_ITEM_TEMPLATE)
    }

    fn with_target(label: String, target: MenuTarget, template: &'static str) -> Self {
        Self {
            name: slugify(&label),
            label,
            target,
            icon_name: None,
            classnames: String::new(),
            order: 1000,
            template,
            visibility: Visibility::always(),
            context: None,
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

    pub fn template(mut self, template: &'static str) -> Self {
        self.template = template;
        self
    }

    /// Only show the item when `predicate` holds.
    pub fn shown_when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&AdminRequest<'_>) -> bool + Send + Sync + 'static,
    {
        self.visibility = Visibility::when(predicate);
        self
    }

    /// Add per-request template context.
    pub fn with_context<F>(mut self, provider: F) -> Self
    where
        F: Fn(&AdminRequest<'_>) -> Map<String, Value> + Send + Sync + 'static,
    {
        self.context = Some(ContextProviderSlot(Arc::new(provider)));
        self
    }

    /// Evaluate the item's own predicate. Submenus are further hidden when
    /// they would be empty; see [`super::render_menu`].
    pub fn is_shown(&self, request: &AdminRequest<'_>) -> bool {
        self.visibility.is_shown(request)
    }

    /// Template context for this request.
    pub fn context(&self, request: &AdminRequest<'_>) -> Map<String, Value> {
        self.context
            .as_ref()
            .map(|slot| (slot.0)(request))
            .unwrap_or_default()
    }
}

/// A menu item resolved for one request: translated, filtered, sorted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedMenuItem {
    pub name: String,
    pub label: String,
    pub url: Option<String>,
    pub icon_name: Option<String>,
    pub classnames: String,
    pub order: i32,
    pub template: String,
    pub children: Vec<RenderedMenuItem>,
    pub context: Map<String, Value>,
}

/// Lowercase, alphanumerics kept, everything else collapsed to single dashes.
pub fn slugify(label: &str) -> String {
    let mut slug = String::with_capacity(label.len());
    for c in label.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn slugify_labels() {
        assert_eq!(slugify("Pages"), "pages");
        assert_eq!(slugify("Locked Pages"), "locked-pages");
        assert_eq!(slugify("  Workflow tasks!  "), "workflow-tasks");
    }

    #[test]
    fn builder_defaults() {
        let item = MenuItem::link("Site history", "/admin/reports/site-history/");
        assert_eq!(item.name, "site-history");
        assert_eq!(item.order, 1000);
        assert_eq!(item.template, MENU_ITEM_TEMPLATE);
        assert!(item.icon_name.is_none());

        let sub = MenuItem::submenu("Settings", MenuKind::Settings).order(10000);
        assert_eq!(sub.target, MenuTarget::Submenu(MenuKind::Settings));
        assert_eq!(sub.template, SUBMENU_ITEM_TEMPLATE);
        assert_eq!(sub.order, 10000);
    }

    #[test]
    fn menu_kind_hooks() {
        assert_eq!(MenuKind::Admin.hook(), HookName::RegisterAdminMenuItem);
        assert_eq!(MenuKind::Reports.hook(), HookName::RegisterReportsMenuItem);
    }
}
