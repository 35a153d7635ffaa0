//! Rich text feature registry.
//!
//! A feature (e.g. "bold", "h2", "link") is made of a UI plugin per editor
//! backend and a converter rule per storage converter. Features are
//! registered by identifier; editors and converters are then built for a
//! list of enabled identifiers.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use regex::Regex;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value, json};
use tracing::{debug, warn};

use crate::error::{AdminError, AdminResult};

/// Features enabled when a field does not list its own.
pub const DEFAULT_FEATURES: &[&str] = &["h2", "h3", "h4", "bold", "italic", "ol", "ul", "hr", "link"];

/// Editor widgets that can host rich text features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EditorBackend {
    Hallo,
    Draftail,
}

impl EditorBackend {
    pub fn as_str(self) -> &'static str {
        match self {
            EditorBackend::Hallo => "hallo",
            EditorBackend::Draftail => "draftail",
        }
    }
}

impl fmt::Display for EditorBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EditorBackend {
    type Err = AdminError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hallo" => Ok(EditorBackend::Hallo),
            "draftail" => Ok(EditorBackend::Draftail),
            other => Err(AdminError::missing_feature(other, "editor backend")),
        }
    }
}

/// Storage converters that consume converter rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConverterKind {
    /// Whitelist-cleaned HTML edited directly.
    EditorHtml,
    /// Block/entity JSON edited by Draftail.
    ContentState,
}

impl ConverterKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ConverterKind::EditorHtml => "editorhtml",
            ConverterKind::ContentState => "contentstate",
        }
    }
}

impl fmt::Display for ConverterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Editor plugins
// ---------------------------------------------------------------------------

/// A Hallo.js plugin descriptor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HalloPlugin {
    pub name: String,
    pub options: Map<String, Value>,
    pub js: Vec<String>,
    pub css: Vec<String>,
    pub order: i32,
}

impl HalloPlugin {
    /// Order of plugins that do not set one.
    pub const DEFAULT_ORDER: i32 = 100;
    /// Order of heading plugins; each heading level adds its offset.
    pub const HEADING_ORDER: i32 = 20;

    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: Map::new(),
            js: Vec::new(),
            css: Vec::new(),
            order: Self::DEFAULT_ORDER,
        }
    }

    /// Inline formatting toggle (bold, italic).
    pub fn format(format_name: &str) -> Self {
        let mut plugin = Self::new("halloformat").order(10);
        plugin.options.insert(
            "formattings".to_string(),
            json!({ format_name: true }),
        );
        plugin
    }

    /// Block format for one heading element.
    pub fn heading(element: &str, order: i32) -> Self {
        let mut plugin = Self::new("halloheadings").order(order);
        plugin
            .options
            .insert("formatBlocks".to_string(), json!([element]));
        plugin
    }

    /// List toggle; `list_type` is "ordered" or "unordered".
    pub fn list(list_type: &str) -> Self {
        let mut plugin = Self::new("hallolists").order(40);
        plugin
            .options
            .insert("lists".to_string(), json!({ list_type: true }));
        plugin
    }

    pub fn order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    pub fn js<I, S>(mut self, js: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.js = js.into_iter().map(Into::into).collect();
        self
    }
}

/// The control shown in the Draftail toolbar.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DraftailControl {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Entity data attributes kept when pasting.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<String>,
    /// Attribute name -> pattern the pasted value must match.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub whitelist: BTreeMap<String, AttributePattern>,
}

/// A whitelist pattern, compiled when it is added to a control.
///
/// Serializes as its source so the editor can apply it client side.
#[derive(Debug, Clone)]
pub struct AttributePattern {
    source: String,
    regex: Option<Regex>,
}

impl AttributePattern {
    pub fn new(source: impl Into<String>) -> Self {
        let source = source.into();
        let regex = match Regex::new(&source) {
            Ok(regex) => Some(regex),
            Err(e) => {
                warn!(pattern = %source, error = %e, "invalid whitelist pattern; values will be rejected");
                None
            }
        };
        Self { source, regex }
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// An invalid pattern matches nothing.
    pub fn is_match(&self, value: &str) -> bool {
        self.regex.as_ref().is_some_and(|re| re.is_match(value))
    }
}

impl PartialEq for AttributePattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for AttributePattern {}

impl Serialize for AttributePattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.source)
    }
}

impl DraftailControl {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Self::default()
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Untranslated message ID.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn attributes<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attributes = attributes.into_iter().map(Into::into).collect();
        self
    }

    pub fn whitelist(mut self, attribute: impl Into<String>, pattern: impl Into<String>) -> Self {
        self.whitelist
            .insert(attribute.into(), AttributePattern::new(pattern));
        self
    }

    /// Whether a pasted attribute value passes this control's whitelist.
    ///
    /// Attributes without a pattern are allowed; an invalid pattern rejects.
    pub fn allows(&self, attribute: &str, value: &str) -> bool {
        match self.whitelist.get(attribute) {
            None => true,
            Some(pattern) => pattern.is_match(value),
        }
    }
}

/// A Draftail feature descriptor.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DraftailFeature {
    /// Turns on a boolean editor option.
    Boolean { option: String },
    Block { control: DraftailControl, js: Vec<String> },
    InlineStyle { control: DraftailControl, js: Vec<String> },
    Entity { control: DraftailControl, js: Vec<String> },
}

impl DraftailFeature {
    pub fn boolean(option: impl Into<String>) -> Self {
        DraftailFeature::Boolean {
            option: option.into(),
        }
    }

    pub fn block(control: DraftailControl) -> Self {
        DraftailFeature::Block {
            control,
            js: Vec::new(),
        }
    }

    pub fn inline_style(control: DraftailControl) -> Self {
        DraftailFeature::InlineStyle {
            control,
            js: Vec::new(),
        }
    }

    pub fn entity(control: DraftailControl, js: Vec<String>) -> Self {
        DraftailFeature::Entity { control, js }
    }

    pub fn control(&self) -> Option<&DraftailControl> {
        match self {
            DraftailFeature::Boolean { .. } => None,
            DraftailFeature::Block { control, .. }
            | DraftailFeature::InlineStyle { control, .. }
            | DraftailFeature::Entity { control, .. } => Some(control),
        }
    }

    pub fn js(&self) -> &[String] {
        match self {
            DraftailFeature::Boolean { .. } => &[],
            DraftailFeature::Block { js, .. }
            | DraftailFeature::InlineStyle { js, .. }
            | DraftailFeature::Entity { js, .. } => js,
        }
    }
}

/// A UI plugin for one editor backend.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EditorPlugin {
    Hallo(HalloPlugin),
    Draftail(DraftailFeature),
}

impl EditorPlugin {
    pub fn backend(&self) -> EditorBackend {
        match self {
            EditorPlugin::Hallo(_) => EditorBackend::Hallo,
            EditorPlugin::Draftail(_) => EditorBackend::Draftail,
        }
    }

    pub fn js(&self) -> &[String] {
        match self {
            EditorPlugin::Hallo(plugin) => &plugin.js,
            EditorPlugin::Draftail(feature) => feature.js(),
        }
    }
}

impl From<HalloPlugin> for EditorPlugin {
    fn from(plugin: HalloPlugin) -> Self {
        EditorPlugin::Hallo(plugin)
    }
}

impl From<DraftailFeature> for EditorPlugin {
    fn from(feature: DraftailFeature) -> Self {
        EditorPlugin::Draftail(feature)
    }
}

// ---------------------------------------------------------------------------
// Editor HTML rules
// ---------------------------------------------------------------------------

/// How a whitelisted attribute value is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeCheck {
    /// Keep as is.
    Allow,
    /// Keep only safe URLs; see [`crate::html::check_url`].
    CheckUrl,
}

/// Attributes an element keeps; everything else is stripped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AttributeRule {
    pub attributes: BTreeMap<String, AttributeCheck>,
}

impl AttributeRule {
    /// Keep the element but none of its attributes.
    pub fn without_attributes() -> Self {
        Self::default()
    }

    pub fn with(mut self, attribute: impl Into<String>, check: AttributeCheck) -> Self {
        self.attributes.insert(attribute.into(), check);
        self
    }
}

/// Handlers for `<a linktype="...">` references to internal objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkHandler {
    /// `<a linktype="page" id="...">`
    Page,
}

impl LinkHandler {
    /// Attributes the handler stores on the link element.
    pub fn attributes(self) -> &'static [&'static str] {
        match self {
            LinkHandler::Page => &["id"],
        }
    }
}

/// A rule for the editor-HTML converter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum EditorHtmlRule {
    Whitelist {
        element: String,
        attributes: AttributeRule,
    },
    LinkType {
        link_type: String,
        handler: LinkHandler,
    },
}

impl EditorHtmlRule {
    pub fn whitelist(element: impl Into<String>, attributes: AttributeRule) -> Self {
        EditorHtmlRule::Whitelist {
            element: element.into(),
            attributes,
        }
    }

    pub fn link_type(link_type: impl Into<String>, handler: LinkHandler) -> Self {
        EditorHtmlRule::LinkType {
            link_type: link_type.into(),
            handler,
        }
    }
}

// ---------------------------------------------------------------------------
// Contentstate rules
// ---------------------------------------------------------------------------

/// What an HTML element becomes when loading stored HTML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "handler", content = "type", rename_all = "snake_case")]
pub enum ElementHandler {
    /// Starts a block of the given type.
    Block(String),
    /// A list container; its `li` children become blocks of the given type.
    List(String),
    /// A list item inside the nearest list container.
    ListItem,
    /// Applies an inline style to the enclosed text.
    InlineStyle(String),
    /// `<a href>` becomes an entity of the given type with a `url`.
    ExternalLink(String),
    /// `<a linktype="page" id>` becomes an entity of the given type with an `id`.
    PageLink(String),
    /// `<hr>` becomes an atomic block holding a HORIZONTAL_RULE entity.
    HorizontalRule,
}

/// How a block type is written back to HTML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum BlockMapping {
    Element(String),
    /// An element nested in a shared wrapper, e.g. `li` in `ul`.
    Wrapped { element: String, wrapper: String },
}

impl BlockMapping {
    pub fn element(&self) -> &str {
        match self {
            BlockMapping::Element(element) | BlockMapping::Wrapped { element, .. } => element,
        }
    }

    pub fn wrapper(&self) -> Option<&str> {
        match self {
            BlockMapping::Element(_) => None,
            BlockMapping::Wrapped { wrapper, .. } => Some(wrapper),
        }
    }
}

/// How an entity is written back to HTML.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityDecorator {
    /// `<a linktype="page" id>` for page links, `<a href>` otherwise.
    Link,
    /// `<hr/>`
    HorizontalRule,
}

/// Both directions of the contentstate conversion for one feature.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContentStateRule {
    /// CSS-like selector (`tag`, `tag[attr]`, `tag[attr="value"]`) -> handler.
    pub from_storage: Vec<(String, ElementHandler)>,
    pub block_map: Vec<(String, BlockMapping)>,
    pub style_map: Vec<(String, String)>,
    pub entity_decorators: Vec<(String, EntityDecorator)>,
}

impl ContentStateRule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_storage(mut self, selector: impl Into<String>, handler: ElementHandler) -> Self {
        self.from_storage.push((selector.into(), handler));
        self
    }

    pub fn block(mut self, block_type: impl Into<String>, mapping: BlockMapping) -> Self {
        self.block_map.push((block_type.into(), mapping));
        self
    }

    pub fn style(mut self, style: impl Into<String>, element: impl Into<String>) -> Self {
        self.style_map.push((style.into(), element.into()));
        self
    }

    pub fn entity(mut self, entity_type: impl Into<String>, decorator: EntityDecorator) -> Self {
        self.entity_decorators.push((entity_type.into(), decorator));
        self
    }
}

/// A converter rule for one feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ConverterRule {
    EditorHtml(Vec<EditorHtmlRule>),
    ContentState(ContentStateRule),
}

impl ConverterRule {
    pub fn kind(&self) -> ConverterKind {
        match self {
            ConverterRule::EditorHtml(_) => ConverterKind::EditorHtml,
            ConverterRule::ContentState(_) => ConverterKind::ContentState,
        }
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Editor plugins and converter rules keyed by feature identifier.
#[derive(Debug, Clone)]
pub struct FeatureRegistry {
    default_features: Vec<String>,
    plugins: HashMap<(EditorBackend, String), EditorPlugin>,
    rules: HashMap<(ConverterKind, String), ConverterRule>,
}

impl Default for FeatureRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureRegistry {
    pub fn new() -> Self {
        Self {
            default_features: DEFAULT_FEATURES.iter().map(|f| (*f).to_string()).collect(),
            plugins: HashMap::new(),
            rules: HashMap::new(),
        }
    }

    /// Register (or replace) the UI plugin for a feature.
    pub fn register_editor_plugin(
        &mut self,
        backend: EditorBackend,
        feature: impl Into<String>,
        plugin: impl Into<EditorPlugin>,
    ) {
        let feature = feature.into();
        debug!(%backend, feature = %feature, "registered editor plugin");
        self.plugins.insert((backend, feature), plugin.into());
    }

    /// Register (or replace) the converter rule for a feature.
    pub fn register_converter_rule(&mut self, feature: impl Into<String>, rule: ConverterRule) {
        let feature = feature.into();
        let kind = rule.kind();
        debug!(converter = %kind, feature = %feature, "registered converter rule");
        self.rules.insert((kind, feature), rule);
    }

    pub fn get_editor_plugin(&self, backend: EditorBackend, feature: &str) -> Option<&EditorPlugin> {
        self.plugins.get(&(backend, feature.to_string()))
    }

    pub fn get_converter_rule(&self, kind: ConverterKind, feature: &str) -> Option<&ConverterRule> {
        self.rules.get(&(kind, feature.to_string()))
    }

    pub fn default_features(&self) -> &[String] {
        &self.default_features
    }

    /// Replace the default feature list. Every feature must have at least
    /// one plugin or converter rule registered.
    pub fn set_default_features(&mut self, features: Vec<String>) -> AdminResult<()> {
        if let Some(unknown) = features.iter().find(|f| !self.is_registered(f)) {
            return Err(AdminError::missing_feature(unknown.as_str(), "plugin or converter rule"));
        }
        self.default_features = features;
        Ok(())
    }

    /// Whether anything is registered for `feature`.
    pub fn is_registered(&self, feature: &str) -> bool {
        self.plugins.keys().any(|(_, f)| f == feature) || self.rules.keys().any(|(_, f)| f == feature)
    }

    /// All feature identifiers with a plugin for `backend`, sorted.
    pub fn feature_names(&self, backend: EditorBackend) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .plugins
            .keys()
            .filter(|(b, _)| *b == backend)
            .map(|(_, f)| f.as_str())
            .collect();
        names.sort_unstable();
        names
    }

    /// Plugins for the enabled features. Features without a plugin for the
    /// backend are skipped. Hallo plugins are ordered by their `order`.
    pub fn editor_plugins(&self, backend: EditorBackend, features: &[String]) -> Vec<&EditorPlugin> {
        let mut plugins: Vec<&EditorPlugin> = features
            .iter()
            .filter_map(|feature| {
                let plugin = self.get_editor_plugin(backend, feature);
                if plugin.is_none() {
                    debug!(%backend, feature = %feature, "feature has no editor plugin");
                }
                plugin
            })
            .collect();

        if backend == EditorBackend::Hallo {
            plugins.sort_by_key(|plugin| match plugin {
                EditorPlugin::Hallo(hallo) => hallo.order,
                EditorPlugin::Draftail(_) => HalloPlugin::DEFAULT_ORDER,
            });
        }
        plugins
    }

    /// Editor-HTML rules of the enabled features, in feature order.
    pub fn editor_html_rules(&self, features: &[String]) -> Vec<&EditorHtmlRule> {
        features
            .iter()
            .filter_map(|feature| match self.get_converter_rule(ConverterKind::EditorHtml, feature) {
                Some(ConverterRule::EditorHtml(rules)) => Some(rules.iter()),
                _ => None,
            })
            .flatten()
            .collect()
    }

    /// Contentstate rules of the enabled features, in feature order.
    pub fn contentstate_rules(&self, features: &[String]) -> Vec<&ContentStateRule> {
        features
            .iter()
            .filter_map(|feature| match self.get_converter_rule(ConverterKind::ContentState, feature) {
                Some(ConverterRule::ContentState(rule)) => Some(rule),
                _ => None,
            })
            .collect()
    }

    /// Options object for the Draftail widget.
    ///
    /// `translate` maps description message IDs to the request language.
    pub fn draftail_options<F>(&self, features: &[String], translate: F) -> Value
    where
        F: Fn(&str) -> String,
    {
        let mut options = Map::new();
        let mut block_types = Vec::new();
        let mut inline_styles = Vec::new();
        let mut entity_types = Vec::new();

        for plugin in self.editor_plugins(EditorBackend::Draftail, features) {
            let EditorPlugin::Draftail(feature) = plugin else {
                continue;
            };
            let target = match feature {
                DraftailFeature::Boolean { option } => {
                    options.insert(option.clone(), Value::Bool(true));
                    continue;
                }
                DraftailFeature::Block { .. } => &mut block_types,
                DraftailFeature::InlineStyle { .. } => &mut inline_styles,
                DraftailFeature::Entity { .. } => &mut entity_types,
            };
            if let Some(control) = feature.control() {
                let mut control = control.clone();
                control.description = control.description.as_deref().map(&translate);
                target.push(serde_json::to_value(control).unwrap_or(Value::Null));
            }
        }

        options.insert("blockTypes".to_string(), Value::Array(block_types));
        options.insert("inlineStyles".to_string(), Value::Array(inline_styles));
        options.insert("entityTypes".to_string(), Value::Array(entity_types));
        Value::Object(options)
    }

    /// Number of registered plugins plus converter rules.
    pub fn len(&self) -> usize {
        self.plugins.len() + self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty() && self.rules.is_empty()
    }
}
