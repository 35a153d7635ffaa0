//! The assembled admin site.
//!
//! [`AdminSite`] owns everything built at startup: configuration, the
//! translation catalog, the URL resolver, the populated [`AdminRegistry`]
//! and the menu renderer. It is immutable once built and cheap to clone.

use std::sync::Arc;

use tracing::info;

use crate::config::Config;
use crate::context::{AdminRequest, UserContext};
use crate::error::AdminResult;
use crate::hooks::AdminRegistry;
use crate::i18n::Translator;
use crate::menu::{MenuKind, MenuRenderer, render_menu};
use crate::registrar::{self, RegistrarContext};
use crate::urls::{UrlResolver, ViewSet};

/// An extra contribution made after the core hooks are registered.
type Contributor = Box<dyn FnOnce(&mut AdminRegistry, &RegistrarContext<'_>) -> AdminResult<()>>;

/// Shared admin site state.
///
/// Wrapped in Arc internally so Clone is cheap.
#[derive(Clone)]
pub struct AdminSite {
    inner: Arc<AdminSiteInner>,
}

struct AdminSiteInner {
    config: Config,
    translator: Translator,
    urls: UrlResolver,
    registry: AdminRegistry,
    renderer: MenuRenderer,
}

impl AdminSite {
    /// Build a site holding only the core contributions.
    pub fn build(config: Config) -> AdminResult<Self> {
        Self::builder(config).build()
    }

    /// Start a site with extra contributions.
    pub fn builder(config: Config) -> AdminSiteBuilder {
        AdminSiteBuilder {
            config,
            viewsets: Vec::new(),
            contributors: Vec::new(),
            templates: Vec::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    pub fn translator(&self) -> &Translator {
        &self.inner.translator
    }

    pub fn urls(&self) -> &UrlResolver {
        &self.inner.urls
    }

    pub fn registry(&self) -> &AdminRegistry {
        &self.inner.registry
    }

    pub fn renderer(&self) -> &MenuRenderer {
        &self.inner.renderer
    }

    /// A request made by `user` in the default language.
    pub fn request<'a>(&'a self, user: &'a UserContext) -> AdminRequest<'a> {
        AdminRequest::new(self, user)
    }

    /// Resolve and render a menu for the request.
    pub fn render_menu_html(&self, request: &AdminRequest<'_>, menu: MenuKind) -> AdminResult<String> {
        self.renderer().render_menu(&render_menu(request, menu))
    }
}

impl std::fmt::Debug for AdminSite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminSite")
            .field("base", &self.inner.urls.base())
            .field("registry", &self.inner.registry)
            .finish()
    }
}

/// Collects extra view sets, contributors and menu templates before the
/// site is assembled.
pub struct AdminSiteBuilder {
    config: Config,
    viewsets: Vec<ViewSet>,
    contributors: Vec<Contributor>,
    templates: Vec<(String, String)>,
}

impl AdminSiteBuilder {
    /// Mount an extra view set next to the core ones.
    pub fn viewset(mut self, viewset: ViewSet) -> Self {
        self.viewsets.push(viewset);
        self
    }

    /// Register extra contributions. Contributors run in the order they
    /// were added, after the core hooks.
    pub fn contribute<F>(mut self, contributor: F) -> Self
    where
        F: FnOnce(&mut AdminRegistry, &RegistrarContext<'_>) -> AdminResult<()> + 'static,
    {
        self.contributors.push(Box::new(contributor));
        self
    }

    /// Add a menu template for items registered with a custom template name.
    pub fn template(mut self, name: impl Into<String>, source: impl Into<String>) -> Self {
        self.templates.push((name.into(), source.into()));
        self
    }

    /// Assemble the site.
    ///
    /// View sets are mounted first so every later contribution can reverse
    /// their routes.
    pub fn build(self) -> AdminResult<AdminSite> {
        let AdminSiteBuilder {
            config,
            viewsets,
            contributors,
            templates,
        } = self;

        let translator = Translator::new();
        if let Some(dir) = &config.locale_dir {
            translator.load_dir(dir)?;
        }

        let mut registry = AdminRegistry::new(config.icon_prefix.as_str());
        registrar::register_admin_urls(&mut registry);
        for viewset in viewsets {
            registry.register_admin_urls(viewset);
        }
        registry.viewsets_mut().populate();

        let mut urls = UrlResolver::with_admin_routes(config.admin_base_url.as_str())?;
        urls.extend(registry.viewsets().url_patterns())?;

        let ctx = RegistrarContext {
            urls: &urls,
            config: &config,
        };
        registrar::register_core_hooks(&mut registry, &ctx)?;
        for contributor in contributors {
            contributor(&mut registry, &ctx)?;
        }

        if let Some(features) = &config.rich_text_features {
            registry.features_mut().set_default_features(features.clone())?;
        }

        let mut renderer = MenuRenderer::new()?;
        for (name, source) in &templates {
            renderer.add_template(name, source)?;
        }

        info!(
            base = %urls.base(),
            routes = urls.len(),
            "admin site assembled"
        );

        Ok(AdminSite {
            inner: Arc::new(AdminSiteInner {
                config,
                translator,
                urls,
                registry,
                renderer,
            }),
        })
    }
}

impl std::fmt::Debug for AdminSiteBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminSiteBuilder")
            .field("viewsets", &self.viewsets.len())
            .field("contributors", &self.contributors.len())
            .field("templates", &self.templates.len())
            .finish()
    }
}
