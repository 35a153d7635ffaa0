//! Core admin contributions.
//!
//! [`register_core_hooks`] registers the admin's own menu items, search
//! area, page listing buttons, account entries, permissions, icons, rich
//! text features and audit log actions. View sets go first through
//! [`register_admin_urls`] since the other contributions reverse their
//! routes.

mod account;
mod buttons;
mod icons;
mod log_actions;
mod menus;
mod rich_text;

pub use icons::CORE_ICONS;

use tracing::info;

use crate::config::Config;
use crate::error::AdminResult;
use crate::hooks::AdminRegistry;
use crate::permissions::PermissionDefinition;
use crate::urls::{UrlResolver, ViewSet};

/// What core contributors may consult while registering.
#[derive(Debug, Clone, Copy)]
pub struct RegistrarContext<'a> {
    pub urls: &'a UrlResolver,
    pub config: &'a Config,
}

impl RegistrarContext<'_> {
    /// Reverse a route that takes no arguments.
    pub fn reverse(&self, name: &str) -> AdminResult<String> {
        self.urls.reverse(name, &[])
    }
}

/// Register the view sets the core admin mounts.
pub fn register_admin_urls(registry: &mut AdminRegistry) {
    registry.register_admin_urls(ViewSet::model("collections", "collections"));
    registry.register_admin_urls(ViewSet::model("workflows", "workflows"));
}

/// Register every core contribution except view sets.
pub fn register_core_hooks(registry: &mut AdminRegistry, ctx: &RegistrarContext<'_>) -> AdminResult<()> {
    menus::register(registry, ctx)?;
    buttons::register(registry);
    account::register(registry, ctx)?;
    registry.register_permissions([PermissionDefinition {
        app_label: "portico_admin".to_string(),
        codename: "access_admin".to_string(),
        name: "Can access admin".to_string(),
    }]);
    icons::register(registry);
    rich_text::register(registry);
    log_actions::register(registry)?;

    info!(
        icons = registry.icons().len(),
        log_actions = registry.log_actions().len(),
        features = registry.features().len(),
        "registered core admin hooks"
    );
    Ok(())
}
