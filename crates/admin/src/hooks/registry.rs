//! Admin registry - every contribution, indexed by extension point.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use super::HookName;
use crate::account::{AccountMenuHook, AccountMenuItem};
use crate::buttons::{Button, ButtonContext, ButtonHook};
use crate::context::AdminRequest;
use crate::icons::IconSet;
use crate::log_actions::LogActionRegistry;
use crate::menu::{MenuItem, MenuKind};
use crate::permissions::PermissionDefinition;
use crate::rich_text::FeatureRegistry;
use crate::search::SearchArea;
use crate::urls::{ViewSet, ViewSetRegistry};

/// Contributions to every extension point.
///
/// Registration order is kept within each extension point; it breaks ties
/// between items with equal order or priority.
pub struct AdminRegistry {
    menus: HashMap<MenuKind, Vec<MenuItem>>,
    search_areas: Vec<SearchArea>,
    listing_buttons: Vec<ButtonHook>,
    listing_more_buttons: Vec<ButtonHook>,
    account_items: Vec<AccountMenuHook>,
    permissions: Vec<PermissionDefinition>,
    viewsets: ViewSetRegistry,
    icons: IconSet,
    features: FeatureRegistry,
    log_actions: LogActionRegistry,
}

impl AdminRegistry {
    /// Create an empty registry whose icons resolve under `icon_prefix`.
    pub fn new(icon_prefix: impl Into<String>) -> Self {
        Self {
            menus: HashMap::new(),
            search_areas: Vec::new(),
            listing_buttons: Vec::new(),
            listing_more_buttons: Vec::new(),
            account_items: Vec::new(),
            permissions: Vec::new(),
            viewsets: ViewSetRegistry::new(),
            icons: IconSet::new(icon_prefix),
            features: FeatureRegistry::new(),
            log_actions: LogActionRegistry::new(),
        }
    }

    pub fn register_menu_item(&mut self, menu: MenuKind, item: MenuItem) {
        debug!(hook = %menu.hook(), item = %item.name, order = item.order, "registered menu item");
        self.menus.entry(menu).or_default().push(item);
    }

    pub fn register_search_area(&mut self, area: SearchArea) {
        debug!(hook = %HookName::RegisterAdminSearchArea, area = %area.name, "registered search area");
        self.search_areas.push(area);
    }

    /// Register a contributor of page listing buttons.
    pub fn register_page_listing_buttons<F>(&mut self, contributor: F)
    where
        F: Fn(&ButtonContext<'_>) -> Vec<Button> + Send + Sync + 'static,
    {
        debug!(hook = %HookName::RegisterPageListingButtons, "registered button contributor");
        self.listing_buttons.push(Arc::new(contributor));
    }

    /// Register a contributor of buttons for the "More" dropdown.
    pub fn register_page_listing_more_buttons<F>(&mut self, contributor: F)
    where
        F: Fn(&ButtonContext<'_>) -> Vec<Button> + Send + Sync + 'static,
    {
        debug!(hook = %HookName::RegisterPageListingMoreButtons, "registered button contributor");
        self.listing_more_buttons.push(Arc::new(contributor));
    }

    pub fn register_account_menu_item<F>(&mut self, contributor: F)
    where
        F: Fn(&AdminRequest<'_>) -> Option<AccountMenuItem> + Send + Sync + 'static,
    {
        debug!(hook = %HookName::RegisterAccountMenuItem, "registered account menu item");
        self.account_items.push(Arc::new(contributor));
    }

    pub fn register_permissions(&mut self, permissions: impl IntoIterator<Item = PermissionDefinition>) {
        for permission in permissions {
            debug!(hook = %HookName::RegisterPermissions, permission = %permission.qualified(), "registered permission");
            self.permissions.push(permission);
        }
    }

    pub fn register_admin_urls(&mut self, viewset: ViewSet) {
        debug!(hook = %HookName::RegisterAdminUrls, viewset = %viewset.name, "registered view set");
        self.viewsets.register(viewset);
    }

    /// Append icon file names, skipping duplicates.
    pub fn register_icons<I, S>(&mut self, icons: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let before = self.icons.len();
        self.icons.extend(icons);
        debug!(hook = %HookName::RegisterIcons, added = self.icons.len() - before, "registered icons");
    }

    /// Feature registry for `register_rich_text_features`.
    pub fn features_mut(&mut self) -> &mut FeatureRegistry {
        &mut self.features
    }

    /// Action registry for `register_log_actions`.
    pub fn log_actions_mut(&mut self) -> &mut LogActionRegistry {
        &mut self.log_actions
    }

    pub(crate) fn viewsets_mut(&mut self) -> &mut ViewSetRegistry {
        &mut self.viewsets
    }

    /// Items registered into a menu, in registration order.
    pub fn menu_items(&self, menu: MenuKind) -> &[MenuItem] {
        self.menus.get(&menu).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn search_areas(&self) -> &[SearchArea] {
        &self.search_areas
    }

    pub fn listing_buttons(&self) -> &[ButtonHook] {
        &self.listing_buttons
    }

    pub fn listing_more_buttons(&self) -> &[ButtonHook] {
        &self.listing_more_buttons
    }

    pub fn account_items(&self) -> &[AccountMenuHook] {
        &self.account_items
    }

    pub fn permissions(&self) -> &[PermissionDefinition] {
        &self.permissions
    }

    pub fn viewsets(&self) -> &ViewSetRegistry {
        &self.viewsets
    }

    pub fn icons(&self) -> &IconSet {
        &self.icons
    }

    pub fn features(&self) -> &FeatureRegistry {
        &self.features
    }

    pub fn log_actions(&self) -> &LogActionRegistry {
        &self.log_actions
    }

    /// Number of contributions made to an extension point.
    pub fn contribution_count(&self, hook: HookName) -> usize {
        match hook {
            HookName::RegisterAdminMenuItem => self.menu_items(MenuKind::Admin).len(),
            HookName::RegisterSettingsMenuItem => self.menu_items(MenuKind::Settings).len(),
            HookName::RegisterReportsMenuItem => self.menu_items(MenuKind::Reports).len(),
            HookName::RegisterAdminSearchArea => self.search_areas.len(),
            HookName::RegisterPageListingButtons => self.listing_buttons.len(),
            HookName::RegisterPageListingMoreButtons => self.listing_more_buttons.len(),
            HookName::RegisterAccountMenuItem => self.account_items.len(),
            HookName::RegisterPermissions => self.permissions.len(),
            HookName::RegisterAdminUrls => self.viewsets.len(),
            HookName::RegisterIcons => self.icons.len(),
            HookName::RegisterRichTextFeatures => self.features.len(),
            HookName::RegisterLogActions => self.log_actions.len(),
        }
    }

    /// (hook, contribution count) for every extension point.
    pub fn summary(&self) -> Vec<(HookName, usize)> {
        HookName::ALL
            .into_iter()
            .map(|hook| (hook, self.contribution_count(hook)))
            .collect()
    }
}

impl std::fmt::Debug for AdminRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut debug = f.debug_struct("AdminRegistry");
        for (hook, count) in self.summary() {
            debug.field(hook.as_str(), &count);
        }
        debug.finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn empty_registry() {
        let registry = AdminRegistry::new("portico/icons");
        assert!(registry.menu_items(MenuKind::Settings).is_empty());
        assert!(registry.summary().iter().all(|(_, count)| *count == 0));
        assert_eq!(registry.icons().prefix(), "portico/icons");
    }

    #[test]
    fn menu_items_kept_per_menu() {
        let mut registry = AdminRegistry::new("icons");
        registry.register_menu_item(MenuKind::Reports, MenuItem::link("Locked Pages", "/l/"));
        registry.register_menu_item(MenuKind::Reports, MenuItem::link("Site history", "/h/"));
        registry.register_menu_item(MenuKind::Admin, MenuItem::link("Pages", "/p/"));

        let names: Vec<_> = registry
            .menu_items(MenuKind::Reports)
            .iter()
            .map(|i| i.name.as_str())
            .collect();
        assert_eq!(names, vec!["locked-pages", "site-history"]);
        assert_eq!(registry.contribution_count(HookName::RegisterReportsMenuItem), 2);
        assert_eq!(registry.contribution_count(HookName::RegisterAdminMenuItem), 1);
    }

    #[test]
    fn icons_deduplicated() {
        let mut registry = AdminRegistry::new("icons");
        registry.register_icons(["a.svg", "b.svg"]);
        registry.register_icons(["b.svg", "c.svg"]);
        assert_eq!(registry.contribution_count(HookName::RegisterIcons), 3);
    }

    #[test]
    fn debug_lists_hooks() {
        let registry = AdminRegistry::new("icons");
        let debug = format!("{registry:?}");
        assert!(debug.contains("register_log_actions"));
    }
}
