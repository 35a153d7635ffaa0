//! Core rich text features for both editor backends.

use crate::hooks::AdminRegistry;
use crate::rich_text::{
    AttributeCheck, AttributeRule, BlockMapping, ContentStateRule, ConverterRule,
    DraftailControl, DraftailFeature, EditorBackend, EditorHtmlRule, ElementHandler,
    EntityDecorator, FeatureRegistry, HalloPlugin, LinkHandler,
};

const HEADINGS: [&str; 6] = ["h1", "h2", "h3", "h4", "h5", "h6"];

const HEADING_BLOCK_TYPES: [&str; 6] = [
    "header-one",
    "header-two",
    "header-three",
    "header-four",
    "header-five",
    "header-six",
];

/// Pasted links keep only these URL forms; `undefined` marks a link made
/// with the chooser rather than pasted.
const LINK_HREF_PATTERN: &str = "^(http:|https:|undefined$)";

const PAGE_CHOOSER_JS: &str = "portico/js/page-chooser-modal.js";

pub(super) fn register(registry: &mut AdminRegistry) {
    let features = registry.features_mut();
    register_hallo(features);
    register_draftail(features);
}

fn editor_html(rules: Vec<EditorHtmlRule>) -> ConverterRule {
    ConverterRule::EditorHtml(rules)
}

fn bare(element: &str) -> EditorHtmlRule {
    EditorHtmlRule::whitelist(element, AttributeRule::without_attributes())
}

fn register_hallo(features: &mut FeatureRegistry) {
    let hallo = EditorBackend::Hallo;

    features.register_editor_plugin(
        hallo,
        "hr",
        HalloPlugin::new("hallohr")
            .js(["portico/js/hallo-plugins/hallo-hr.js"])
            .order(45),
    );
    features.register_converter_rule("hr", editor_html(vec![bare("hr")]));

    features.register_editor_plugin(
        hallo,
        "link",
        HalloPlugin::new("halloporticolink")
            .js([PAGE_CHOOSER_JS, "portico/js/hallo-plugins/hallo-porticolink.js"]),
    );
    features.register_converter_rule(
        "link",
        editor_html(vec![
            EditorHtmlRule::whitelist(
                "a",
                AttributeRule::without_attributes().with("href", AttributeCheck::CheckUrl),
            ),
            EditorHtmlRule::link_type("page", LinkHandler::Page),
        ]),
    );

    features.register_editor_plugin(hallo, "bold", HalloPlugin::format("bold"));
    features.register_converter_rule("bold", editor_html(vec![bare("b"), bare("strong")]));

    features.register_editor_plugin(hallo, "italic", HalloPlugin::format("italic"));
    features.register_converter_rule("italic", editor_html(vec![bare("i"), bare("em")]));

    for (order, element) in (HalloPlugin::HEADING_ORDER + 1..).zip(HEADINGS) {
        features.register_editor_plugin(hallo, element, HalloPlugin::heading(element, order));
        features.register_converter_rule(element, editor_html(vec![bare(element)]));
    }

    features.register_editor_plugin(hallo, "ol", HalloPlugin::list("ordered"));
    features.register_converter_rule("ol", editor_html(vec![bare("ol"), bare("li")]));

    features.register_editor_plugin(hallo, "ul", HalloPlugin::list("unordered"));
    features.register_converter_rule("ul", editor_html(vec![bare("ul"), bare("li")]));
}

fn register_draftail(features: &mut FeatureRegistry) {
    let draftail = EditorBackend::Draftail;

    features.register_editor_plugin(draftail, "hr", DraftailFeature::boolean("enableHorizontalRule"));
    features.register_converter_rule(
        "hr",
        ConverterRule::ContentState(
            ContentStateRule::new()
                .from_storage("hr", ElementHandler::HorizontalRule)
                .entity("HORIZONTAL_RULE", EntityDecorator::HorizontalRule),
        ),
    );

    for (level, (element, block_type)) in (1..).zip(HEADINGS.into_iter().zip(HEADING_BLOCK_TYPES)) {
        features.register_editor_plugin(
            draftail,
            element,
            DraftailFeature::block(
                DraftailControl::new(block_type)
                    .label(element.to_uppercase())
                    .description(format!("Heading {level}")),
            ),
        );
        features.register_converter_rule(
            element,
            ConverterRule::ContentState(
                ContentStateRule::new()
                    .from_storage(element, ElementHandler::Block(block_type.to_string()))
                    .block(block_type, BlockMapping::Element(element.to_string())),
            ),
        );
    }

    for (feature, block_type, icon, description) in [
        ("ul", "unordered-list-item", "list-ul", "Bulleted list"),
        ("ol", "ordered-list-item", "list-ol", "Numbered list"),
    ] {
        features.register_editor_plugin(
            draftail,
            feature,
            DraftailFeature::block(
                DraftailControl::new(block_type)
                    .icon(icon)
                    .description(description),
            ),
        );
        features.register_converter_rule(
            feature,
            ConverterRule::ContentState(
                ContentStateRule::new()
                    .from_storage(feature, ElementHandler::List(block_type.to_string()))
                    .from_storage("li", ElementHandler::ListItem)
                    .block(
                        block_type,
                        BlockMapping::Wrapped {
                            element: "li".to_string(),
                            wrapper: feature.to_string(),
                        },
                    ),
            ),
        );
    }

    features.register_editor_plugin(
        draftail,
        "blockquote",
        DraftailFeature::block(
            DraftailControl::new("blockquote")
                .icon("openquote")
                .description("Blockquote"),
        ),
    );
    features.register_converter_rule(
        "blockquote",
        ConverterRule::ContentState(
            ContentStateRule::new()
                .from_storage("blockquote", ElementHandler::Block("blockquote".to_string()))
                .block("blockquote", BlockMapping::Element("blockquote".to_string())),
        ),
    );

    // (feature, style, icon, description, stored elements; the first is written back)
    let inline_styles: [(&str, &str, &str, &str, &[&str]); 6] = [
        ("bold", "BOLD", "bold", "Bold", &["b", "strong"]),
        ("italic", "ITALIC", "italic", "Italic", &["i", "em"]),
        ("superscript", "SUPERSCRIPT", "superscript", "Superscript", &["sup"]),
        ("subscript", "SUBSCRIPT", "subscript", "Subscript", &["sub"]),
        ("strikethrough", "STRIKETHROUGH", "strikethrough", "Strikethrough", &["s"]),
        ("code", "CODE", "code", "Code", &["code"]),
    ];
    for (feature, style, icon, description, elements) in inline_styles {
        features.register_editor_plugin(
            draftail,
            feature,
            DraftailFeature::inline_style(
                DraftailControl::new(style)
                    .icon(icon)
                    .description(description),
            ),
        );
        let mut rule = ContentStateRule::new();
        for element in elements {
            rule = rule.from_storage(*element, ElementHandler::InlineStyle(style.to_string()));
        }
        if let Some(element) = elements.first() {
            rule = rule.style(style, *element);
        }
        features.register_converter_rule(feature, ConverterRule::ContentState(rule));
    }

    features.register_editor_plugin(
        draftail,
        "link",
        DraftailFeature::entity(
            DraftailControl::new("LINK")
                .icon("link")
                .description("Link")
                .attributes(["url", "id", "parentId"])
                .whitelist("href", LINK_HREF_PATTERN),
            vec![PAGE_CHOOSER_JS.to_string()],
        ),
    );
    features.register_converter_rule(
        "link",
        ConverterRule::ContentState(
            ContentStateRule::new()
                .from_storage("a[href]", ElementHandler::ExternalLink("LINK".to_string()))
                .from_storage(
                    r#"a[linktype="page"]"#,
                    ElementHandler::PageLink("LINK".to_string()),
                )
                .entity("LINK", EntityDecorator::Link),
        ),
    );
}
