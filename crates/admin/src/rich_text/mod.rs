//! Rich text features: editor plugins and storage converters.

pub mod contentstate;
mod editor_html;
mod features;

pub use contentstate::{ContentState, ContentStateConverter};
pub use editor_html::EditorHtmlWhitelist;
pub use features::{
    AttributeCheck, AttributeRule, BlockMapping, ContentStateRule, ConverterKind, ConverterRule,
    DEFAULT_FEATURES, DraftailControl, DraftailFeature, EditorBackend, EditorHtmlRule,
    EditorPlugin, ElementHandler, EntityDecorator, FeatureRegistry, HalloPlugin, LinkHandler,
};

impl FeatureRegistry {
    /// Editor-HTML whitelist for the enabled features.
    pub fn editor_html_whitelist(&self, features: &[String]) -> EditorHtmlWhitelist {
        EditorHtmlWhitelist::from_rules(self.editor_html_rules(features))
    }

    /// Contentstate converter for the enabled features.
    pub fn contentstate_converter(&self, features: &[String]) -> ContentStateConverter {
        ContentStateConverter::new(self.contentstate_rules(features))
    }
}
