//! Core menu items and the page search area.

use serde_json::{Map, Value};

use super::RegistrarContext;
use crate::context::AdminRequest;
use crate::error::AdminResult;
use crate::hooks::AdminRegistry;
use crate::menu::{EXPLORER_MENU_ITEM_TEMPLATE, MenuItem, MenuKind, SETTINGS_MENU_ITEM_TEMPLATE};
use crate::permissions::{ModelPermissionPolicy, PermissionPolicy};
use crate::search::SearchArea;

const MANAGE_ACTIONS: &[&str] = &["add", "change", "delete"];

fn has_any_page_permission(request: &AdminRequest<'_>) -> bool {
    request.page_permissions().has_any_page_permission()
}

/// Template context for the explorer entry: where browsing starts.
fn explorer_context(request: &AdminRequest<'_>) -> Map<String, Value> {
    let mut context = Map::new();
    let root = request
        .page_permissions()
        .explorable_root(request.site.config().root_page_id);
    if let Some(start_page_id) = root {
        context.insert("start_page_id".to_string(), Value::from(start_page_id));
    }
    context
}

pub(super) fn register(registry: &mut AdminRegistry, ctx: &RegistrarContext<'_>) -> AdminResult<()> {
    registry.register_menu_item(
        MenuKind::Admin,
        MenuItem::link("Pages", ctx.reverse("explore_root")?)
            .name("explorer")
            .icon("folder-open-inverse")
            .order(100)
            .template(EXPLORER_MENU_ITEM_TEMPLATE)
            .shown_when(has_any_page_permission)
            .with_context(explorer_context),
    );
    registry.register_menu_item(
        MenuKind::Admin,
        MenuItem::submenu("Settings", MenuKind::Settings)
            .icon("cogs")
            .order(10000)
            .template(SETTINGS_MENU_ITEM_TEMPLATE),
    );
    registry.register_menu_item(
        MenuKind::Admin,
        MenuItem::submenu("Reports", MenuKind::Reports)
            .classnames("icon icon-site")
            .order(9000),
    );

    registry.register_search_area(
        SearchArea::new("Pages", ctx.reverse("pages:search")?)
            .name("pages")
            .classnames("icon icon-folder-open-inverse")
            .order(100)
            .shown_when(has_any_page_permission),
    );

    let collections = ModelPermissionPolicy::new("portico_core", "collection");
    registry.register_menu_item(
        MenuKind::Settings,
        MenuItem::link("Collections", ctx.reverse("collections:index")?)
            .icon("folder-open-1")
            .order(700)
            .shown_when(move |request| {
                collections.user_has_any_permission(request.user, MANAGE_ACTIONS)
            }),
    );
    let workflows = ModelPermissionPolicy::new("portico_core", "workflow");
    registry.register_menu_item(
        MenuKind::Settings,
        MenuItem::link("Workflows", ctx.reverse("workflows:index")?)
            .icon("clipboard-list")
            .order(100)
            .shown_when(move |request| {
                workflows.user_has_any_permission(request.user, MANAGE_ACTIONS)
            }),
    );

    registry.register_menu_item(
        MenuKind::Reports,
        MenuItem::link("Locked Pages", ctx.reverse("reports:locked_pages")?)
            .classnames("icon icon-locked")
            .order(700)
            .shown_when(|request| request.page_permissions().can_remove_locks()),
    );
    registry.register_menu_item(
        MenuKind::Reports,
        MenuItem::link("Workflows", ctx.reverse("reports:workflow")?)
            .classnames("icon icon-clipboard-list")
            .order(800),
    );
    registry.register_menu_item(
        MenuKind::Reports,
        MenuItem::link("Workflow tasks", ctx.reverse("reports:workflow_tasks")?)
            .classnames("icon icon-clipboard-list")
            .order(900),
    );
    registry.register_menu_item(
        MenuKind::Reports,
        MenuItem::link("Site history", ctx.reverse("reports:site_history")?)
            .classnames("icon icon-cogs")
            .order(1000)
            .shown_when(|request| request.page_permissions().explorable_pages_exist()),
    );

    Ok(())
}
