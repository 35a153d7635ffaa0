//! Conversion between stored HTML and contentstate.
//!
//! Both directions are driven only by the enabled features' contentstate
//! rules. Paragraphs (`p` <-> `unstyled`) and line breaks are built in;
//! everything else must come from a rule.

mod from_html;
mod model;
mod to_html;

pub use model::{
    ATOMIC, Block, ContentState, Entity, EntityRange, HORIZONTAL_RULE, IMMUTABLE,
    InlineStyleRange, MUTABLE, UNSTYLED,
};

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use super::features::{BlockMapping, ContentStateRule, ElementHandler, EntityDecorator};

#[allow(clippy::expect_used)]
static SELECTOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^([a-z][a-z0-9]*)(?:\[([a-z][a-z0-9_-]*)(?:="([^"]*)")?\])?$"#)
        .expect("selector pattern is valid")
});

/// An element selector: `tag`, `tag[attr]` or `tag[attr="value"]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    pub tag: String,
    pub attribute: Option<String>,
    pub value: Option<String>,
}

impl Selector {
    pub fn parse(selector: &str) -> Option<Self> {
        let caps = SELECTOR_RE.captures(selector.trim())?;
        Some(Self {
            tag: caps.get(1)?.as_str().to_string(),
            attribute: caps.get(2).map(|m| m.as_str().to_string()),
            value: caps.get(3).map(|m| m.as_str().to_string()),
        })
    }

    /// Higher is more specific.
    pub fn specificity(&self) -> u8 {
        match (&self.attribute, &self.value) {
            (Some(_), Some(_)) => 2,
            (Some(_), None) => 1,
            _ => 0,
        }
    }

    pub fn matches(&self, tag: &str, attrs: &HashMap<String, String>) -> bool {
        if self.tag != tag {
            return false;
        }
        match (&self.attribute, &self.value) {
            (None, _) => true,
            (Some(attribute), None) => attrs.contains_key(attribute),
            (Some(attribute), Some(value)) => attrs.get(attribute) == Some(value),
        }
    }
}

/// Converter between stored HTML and contentstate for one feature set.
#[derive(Debug, Clone, Default)]
pub struct ContentStateConverter {
    element_handlers: Vec<(Selector, ElementHandler)>,
    block_map: HashMap<String, BlockMapping>,
    style_map: HashMap<String, String>,
    entity_decorators: HashMap<String, EntityDecorator>,
}

impl ContentStateConverter {
    /// Merge the rules of the enabled features. Later rules win.
    pub fn new<'r>(rules: impl IntoIterator<Item = &'r ContentStateRule>) -> Self {
        let mut converter = Self::default();
        converter
            .block_map
            .insert(UNSTYLED.to_string(), BlockMapping::Element("p".to_string()));

        for rule in rules {
            for (selector, handler) in &rule.from_storage {
                match Selector::parse(selector) {
                    Some(parsed) => {
                        converter.element_handlers.retain(|(s, _)| *s != parsed);
                        converter.element_handlers.push((parsed, handler.clone()));
                    }
                    None => warn!(selector = %selector, "ignoring unparseable selector"),
                }
            }
            for (block_type, mapping) in &rule.block_map {
                converter
                    .block_map
                    .insert(block_type.clone(), mapping.clone());
            }
            for (style, element) in &rule.style_map {
                converter.style_map.insert(style.clone(), element.clone());
            }
            for (entity_type, decorator) in &rule.entity_decorators {
                converter
                    .entity_decorators
                    .insert(entity_type.clone(), *decorator);
            }
        }

        // Most specific first; stable so registration order breaks ties.
        converter
            .element_handlers
            .sort_by_key(|(selector, _)| std::cmp::Reverse(selector.specificity()));

        debug!(
            element_handlers = converter.element_handlers.len(),
            block_types = converter.block_map.len(),
            styles = converter.style_map.len(),
            "built contentstate converter"
        );
        converter
    }

    /// Parse stored HTML into contentstate.
    pub fn from_storage(&self, html: &str) -> ContentState {
        from_html::parse(self, html)
    }

    /// Serialize contentstate to stored HTML.
    pub fn to_storage(&self, state: &ContentState) -> String {
        to_html::export(self, state)
    }

    /// The handler for an element, if any rule claims it.
    pub(crate) fn handler_for(
        &self,
        tag: &str,
        attrs: &HashMap<String, String>,
    ) -> Option<&ElementHandler> {
        self.element_handlers
            .iter()
            .find(|(selector, _)| selector.matches(tag, attrs))
            .map(|(_, handler)| handler)
    }

    pub(crate) fn block_mapping(&self, block_type: &str) -> Option<&BlockMapping> {
        self.block_map.get(block_type)
    }

    pub(crate) fn style_element(&self, style: &str) -> Option<&str> {
        self.style_map.get(style).map(String::as_str)
    }

    pub(crate) fn entity_decorator(&self, entity_type: &str) -> Option<EntityDecorator> {
        self.entity_decorators.get(entity_type).copied()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn attrs(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn parse_selectors() {
        let s = Selector::parse(r#"a[linktype="page"]"#).unwrap();
        assert_eq!(s.tag, "a");
        assert_eq!(s.attribute.as_deref(), Some("linktype"));
        assert_eq!(s.value.as_deref(), Some("page"));
        assert_eq!(s.specificity(), 2);
        assert_eq!(Selector::parse("a[href]").unwrap().specificity(), 1);
        assert_eq!(Selector::parse("h2").unwrap().specificity(), 0);
        assert!(Selector::parse("a > b").is_none());
    }

    #[test]
    fn most_specific_handler_wins() {
        let rule = ContentStateRule::new()
            .from_storage("a[href]", ElementHandler::ExternalLink("LINK".to_string()))
            .from_storage(r#"a[linktype="page"]"#, ElementHandler::PageLink("LINK".to_string()));
        let converter = ContentStateConverter::new([&rule]);

        let page = attrs(&[("linktype", "page"), ("id", "3"), ("href", "/x/")]);
        assert_eq!(
            converter.handler_for("a", &page),
            Some(&ElementHandler::PageLink("LINK".to_string()))
        );
        let external = attrs(&[("href", "https://example.com")]);
        assert_eq!(
            converter.handler_for("a", &external),
            Some(&ElementHandler::ExternalLink("LINK".to_string()))
        );
        assert_eq!(converter.handler_for("a", &attrs(&[])), None);
    }

    #[test]
    fn unstyled_is_built_in() {
        let converter = ContentStateConverter::new(std::iter::empty::<&ContentStateRule>());
        assert_eq!(converter.block_mapping(UNSTYLED).unwrap().element(), "p");
    }
}
