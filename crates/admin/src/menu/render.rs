//! HTML rendering of resolved menus with Tera.

use tera::{Context, Tera};
use tracing::debug;

use super::item::{
    EXPLORER_MENU_ITEM_TEMPLATE, MENU_ITEM_TEMPLATE, RenderedMenuItem,
    SETTINGS_MENU_ITEM_TEMPLATE, SUBMENU_ITEM_TEMPLATE,
};
use crate::error::{AdminError, AdminResult};
use crate::html::html_escape;

const ICON: &str = r##"{% if icon_name %}<svg class="icon icon-{{ icon_name }}" aria-hidden="true"><use href="#icon-{{ icon_name }}"></use></svg>{% endif %}"##;

fn builtin_templates() -> Vec<(&'static str, String)> {
    vec![
        (
            MENU_ITEM_TEMPLATE,
            format!(
                r#"<li class="menu-item" data-name="{{{{ name }}}}"><a href="{{{{ href | safe }}}}" class="{{{{ classnames }}}}">{ICON}<span class="menu-text">{{{{ label }}}}</span></a></li>"#
            ),
        ),
        (
            EXPLORER_MENU_ITEM_TEMPLATE,
            format!(
                r#"<li class="menu-item" data-name="{{{{ name }}}}" data-explorer-menu-item{{% if context.start_page_id is defined %}} data-explorer-start-page="{{{{ context.start_page_id }}}}"{{% endif %}}><a href="{{{{ href | safe }}}}" class="{{{{ classnames }}}}">{ICON}<span class="menu-text">{{{{ label }}}}</span></a></li>"#
            ),
        ),
        (
            SUBMENU_ITEM_TEMPLATE,
            format!(
                r##"<li class="menu-item" data-name="{{{{ name }}}}" data-submenu><a href="#" class="submenu-trigger {{{{ classnames }}}}">{ICON}<span class="menu-text">{{{{ label }}}}</span></a><div class="nav-submenu"><h2 class="nav-submenu__title">{{{{ label }}}}</h2><ul class="nav-submenu__list">{{{{ children_html | safe }}}}</ul></div></li>"##
            ),
        ),
        (
            SETTINGS_MENU_ITEM_TEMPLATE,
            format!(
                r##"<li class="menu-item" data-name="{{{{ name }}}}" data-submenu><a href="#" class="submenu-trigger {{{{ classnames }}}}">{ICON}<span class="menu-text">{{{{ label }}}}</span></a><div class="nav-submenu nav-submenu--settings"><h2 class="nav-submenu__title">{{{{ label }}}}</h2><ul class="nav-submenu__list">{{{{ children_html | safe }}}}</ul></div></li>"##
            ),
        ),
    ]
}

/// Renders resolved menu items to HTML.
///
/// Each item names its own template; children are rendered first and passed
/// to the parent template as `children_html`.
pub struct MenuRenderer {
    tera: Tera,
}

impl MenuRenderer {
    /// Create a renderer holding the built-in menu templates.
    pub fn new() -> AdminResult<Self> {
        let mut tera = Tera::default();
        for (name, source) in builtin_templates() {
            tera.add_raw_template(name, &source)
                .map_err(|e| AdminError::Template {
                    template: name.to_string(),
                    details: e.to_string(),
                })?;
        }
        debug!(
            count = tera.get_template_names().count(),
            "loaded menu templates"
        );
        Ok(Self { tera })
    }

    /// Add or replace a template, for items registered with a custom one.
    pub fn add_template(&mut self, name: &str, source: &str) -> AdminResult<()> {
        self.tera
            .add_raw_template(name, source)
            .map_err(|e| AdminError::Template {
                template: name.to_string(),
                details: e.to_string(),
            })
    }

    /// Render a single item, including its children.
    pub fn render_item(&self, item: &RenderedMenuItem) -> AdminResult<String> {
        let children_html = self.render_items(&item.children)?;

        let mut context = Context::from_serialize(item).map_err(|e| AdminError::Template {
            template: item.template.clone(),
            details: e.to_string(),
        })?;
        context.insert("children_html", &children_html);
        context.insert("href", &html_escape(item.url.as_deref().unwrap_or("#")));

        self.tera
            .render(&item.template, &context)
            .map_err(|e| AdminError::Template {
                template: item.template.clone(),
                details: e.to_string(),
            })
    }

    /// Render a list of items, concatenated in order.
    pub fn render_items(&self, items: &[RenderedMenuItem]) -> AdminResult<String> {
        let mut html = String::new();
        for item in items {
            html.push_str(&self.render_item(item)?);
        }
        Ok(html)
    }

    /// Render a complete menu wrapped in its list element.
    pub fn render_menu(&self, items: &[RenderedMenuItem]) -> AdminResult<String> {
        Ok(format!(
            r#"<ul class="menu">{}</ul>"#,
            self.render_items(items)?
        ))
    }
}

impl std::fmt::Debug for MenuRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MenuRenderer")
            .field("templates", &self.tera.get_template_names().count())
            .finish()
    }
}
