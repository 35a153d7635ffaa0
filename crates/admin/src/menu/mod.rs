//! Admin menus.
//!
//! Items are registered once at startup into one of three menus and
//! resolved per request: hidden items are dropped, submenus with no visible
//! children disappear, and the rest are sorted by `order`.

mod item;
mod render;

pub use item::{
    ContextProvider, EXPLORER_MENU_ITEM_TEMPLATE, MENU_ITEM_TEMPLATE, MenuItem, MenuKind,
    MenuTarget, Predicate, RenderedMenuItem, SETTINGS_MENU_ITEM_TEMPLATE, SUBMENU_ITEM_TEMPLATE,
    Visibility, slugify,
};
pub use render::MenuRenderer;

use tracing::warn;

use crate::context::AdminRequest;

/// Submenus nested deeper than this are not expanded.
const MAX_MENU_DEPTH: usize = 4;

/// Resolve a menu for the current request.
pub fn render_menu(request: &AdminRequest<'_>, kind: MenuKind) -> Vec<RenderedMenuItem> {
    build_menu(request, kind, 0)
}

fn build_menu(request: &AdminRequest<'_>, kind: MenuKind, depth: usize) -> Vec<RenderedMenuItem> {
    if depth >= MAX_MENU_DEPTH {
        warn!(menu = ?kind, depth, "menu nesting too deep; submenu skipped");
        return Vec::new();
    }

    let mut rendered: Vec<RenderedMenuItem> = request
        .site
        .registry()
        .menu_items(kind)
        .iter()
        .filter(|item| item.is_shown(request))
        .filter_map(|item| {
            let (url, children) = match &item.target {
                MenuTarget::Url(url) => (Some(url.clone()), Vec::new()),
                MenuTarget::Submenu(submenu) => {
                    let children = build_menu(request, *submenu, depth + 1);
                    if children.is_empty() {
                        return None;
                    }
                    (None, children)
                }
            };

            Some(RenderedMenuItem {
                name: item.name.clone(),
                label: request.gettext(&item.label),
                url,
                icon_name: item.icon_name.clone(),
                classnames: item.classnames.clone(),
                order: item.order,
                template: item.template.to_string(),
                children,
                context: item.context(request),
            })
        })
        .collect();

    // Stable: registration order breaks ties.
    rendered.sort_by_key(|item| item.order);
    rendered
}
