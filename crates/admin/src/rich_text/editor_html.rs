//! Whitelist cleaning for the editor-HTML storage converter.

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet, HashSet};

use tracing::debug;

use super::features::{AttributeCheck, EditorHtmlRule};
use crate::html::check_url;

/// Elements every editor-HTML document may contain.
const BASE_ELEMENTS: &[&str] = &["p", "div", "br"];

/// Elements removed together with their content.
const DROPPED_WITH_CONTENT: &[&str] = &["script", "style"];

const URL_SCHEMES: &[&str] = &["http", "https", "ftp", "mailto", "tel"];

/// Element/attribute whitelist built from the enabled features' rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorHtmlWhitelist {
    elements: BTreeSet<String>,
    attributes: BTreeMap<String, BTreeSet<String>>,
    url_attributes: BTreeSet<(String, String)>,
    link_types: BTreeSet<String>,
}

impl EditorHtmlWhitelist {
    /// Build a whitelist from editor-HTML rules.
    pub fn from_rules<'r>(rules: impl IntoIterator<Item = &'r EditorHtmlRule>) -> Self {
        let mut whitelist = Self::default();
        whitelist
            .elements
            .extend(BASE_ELEMENTS.iter().map(|e| (*e).to_string()));

        for rule in rules {
            match rule {
                EditorHtmlRule::Whitelist {
                    element,
                    attributes,
                } => {
                    whitelist.elements.insert(element.clone());
                    for (attribute, check) in &attributes.attributes {
                        whitelist
                            .attributes
                            .entry(element.clone())
                            .or_default()
                            .insert(attribute.clone());
                        if *check == AttributeCheck::CheckUrl {
                            whitelist
                                .url_attributes
                                .insert((element.clone(), attribute.clone()));
                        }
                    }
                }
                EditorHtmlRule::LinkType { link_type, handler } => {
                    whitelist.link_types.insert(link_type.clone());
                    let a = whitelist.attributes.entry("a".to_string()).or_default();
                    a.insert("linktype".to_string());
                    a.extend(handler.attributes().iter().map(|attr| (*attr).to_string()));
                }
            }
        }

        debug!(
            elements = whitelist.elements.len(),
            link_types = whitelist.link_types.len(),
            "built editor html whitelist"
        );
        whitelist
    }

    pub fn allows_element(&self, element: &str) -> bool {
        self.elements.contains(element)
    }

    pub fn allows_attribute(&self, element: &str, attribute: &str) -> bool {
        self.attributes
            .get(element)
            .is_some_and(|attrs| attrs.contains(attribute))
    }

    /// Clean `html`: unknown elements are unwrapped, unknown attributes
    /// dropped, unsafe URLs removed, and `script`/`style` removed entirely.
    pub fn clean(&self, html: &str) -> String {
        let mut builder = ammonia::Builder::empty();
        builder
            .add_tags(self.elements.iter())
            .url_schemes(URL_SCHEMES.iter().copied().collect::<HashSet<_>>())
            .url_relative(ammonia::UrlRelative::PassThrough)
            .link_rel(None)
            .clean_content_tags(DROPPED_WITH_CONTENT.iter().copied().collect::<HashSet<_>>());

        for (element, attributes) in &self.attributes {
            builder.add_tag_attributes(element, attributes.iter());
        }

        let url_attributes = self.url_attributes.clone();
        let link_types = self.link_types.clone();
        builder.attribute_filter(move |element, attribute, value| {
            if attribute == "linktype" && !link_types.contains(value) {
                return None;
            }
            if url_attributes.contains(&(element.to_string(), attribute.to_string())) {
                return check_url(value).map(Cow::Borrowed);
            }
            Some(Cow::Borrowed(value))
        });

        builder.clean(html).to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::rich_text::features::{AttributeRule, LinkHandler};

    fn whitelist() -> EditorHtmlWhitelist {
        let rules = vec![
            EditorHtmlRule::whitelist("b", AttributeRule::without_attributes()),
            EditorHtmlRule::whitelist(
                "a",
                AttributeRule::without_attributes().with("href", AttributeCheck::CheckUrl),
            ),
            EditorHtmlRule::link_type("page", LinkHandler::Page),
        ];
        EditorHtmlWhitelist::from_rules(&rules)
    }

    #[test]
    fn unknown_elements_unwrapped() {
        let cleaned = whitelist().clean("<p>Hello <b>bold</b> <i>italic</i></p>");
        assert_eq!(cleaned, "<p>Hello <b>bold</b> italic</p>");
    }

    #[test]
    fn attributes_stripped() {
        let cleaned = whitelist().clean(r#"<p class="x"><b style="color:red">b</b></p>"#);
        assert_eq!(cleaned, "<p><b>b</b></p>");
    }

    #[test]
    fn unsafe_urls_dropped() {
        let cleaned = whitelist().clean(r#"<a href="javascript:alert(1)">x</a>"#);
        assert_eq!(cleaned, "<a>x</a>");
        let cleaned = whitelist().clean(r#"<a href="https://example.com/">x</a>"#);
        assert_eq!(cleaned, r#"<a href="https://example.com/">x</a>"#);
    }

    #[test]
    fn page_links_kept() {
        let cleaned = whitelist().clean(r#"<a linktype="page" id="3">home</a>"#);
        assert_eq!(cleaned, r#"<a linktype="page" id="3">home</a>"#);
        let cleaned = whitelist().clean(r#"<a linktype="document" id="3">doc</a>"#);
        assert_eq!(cleaned, r#"<a id="3">doc</a>"#);
    }

    #[test]
    fn scripts_removed_with_content() {
        let cleaned = whitelist().clean("<p>a<script>alert(1)</script>b</p>");
        assert_eq!(cleaned, "<p>ab</p>");
    }

    #[test]
    fn base_elements_always_allowed() {
        let whitelist = EditorHtmlWhitelist::from_rules(std::iter::empty::<&EditorHtmlRule>());
        assert!(whitelist.allows_element("p"));
        assert!(whitelist.allows_element("br"));
        assert!(!whitelist.allows_element("b"));
        assert!(!whitelist.allows_attribute("a", "href"));
    }
}
