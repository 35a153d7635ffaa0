#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Rich text feature and converter tests.

use portico_admin::rich_text::{ContentState, EditorBackend, EditorPlugin};
use portico_admin::{AdminSite, Config};
use portico_test_utils::{assert, site_with, test_config, test_site};
use serde_json::json;

fn default_features(site: &AdminSite) -> Vec<String> {
    site.registry().features().default_features().to_vec()
}

fn features(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| (*name).to_string()).collect()
}

#[test]
fn test_default_features() {
    let site = test_site();
    assert_eq!(
        default_features(&site),
        features(&["h2", "h3", "h4", "bold", "italic", "ol", "ul", "hr", "link"])
    );
}

#[test]
fn test_configured_default_features() {
    let config = Config {
        rich_text_features: Some(features(&["bold", "code", "blockquote"])),
        ..test_config()
    };
    let site = site_with(config);
    assert_eq!(default_features(&site), features(&["bold", "code", "blockquote"]));
}

#[test]
fn test_stored_html_round_trip() {
    let site = test_site();
    let converter = site
        .registry()
        .features()
        .contentstate_converter(&default_features(&site));

    let html = concat!(
        "<h2>Title</h2>",
        "<p>Some <b>bold</b> and <i>italic</i> text</p>",
        "<ul><li>one</li><li>two</li></ul>",
        "<ol><li>first</li></ol>",
        "<hr/>",
        r#"<p><a href="https://example.com">site</a> and <a linktype="page" id="3">home</a></p>"#,
    );
    let state = converter.from_storage(html);
    assert_eq!(state.blocks.len(), 7);
    assert_eq!(converter.to_storage(&state), html);
}

#[test]
fn test_alternate_elements_normalized() {
    let site = test_site();
    let converter = site
        .registry()
        .features()
        .contentstate_converter(&default_features(&site));

    let state = converter.from_storage("<p><strong>strong</strong> <em>em</em></p>");
    assert_eq!(converter.to_storage(&state), "<p><b>strong</b> <i>em</i></p>");
}

#[test]
fn test_disabled_features_dropped() {
    let site = test_site();
    let converter = site
        .registry()
        .features()
        .contentstate_converter(&features(&["bold"]));

    let state = converter.from_storage("<h2>Title</h2><p><b>x</b> <i>y</i></p>");
    assert_eq!(state.blocks[0].block_type, "unstyled");
    assert_eq!(converter.to_storage(&state), "<p>Title</p><p><b>x</b> y</p>");
}

#[test]
fn test_editor_document_round_trip() {
    let site = test_site();
    let converter = site
        .registry()
        .features()
        .contentstate_converter(&default_features(&site));

    let state: ContentState = serde_json::from_value(json!({
        "blocks": [
            {"key": "a1", "type": "header-three", "text": "Heading", "depth": 0},
            {
                "key": "a2",
                "type": "unstyled",
                "text": "Read the docs now",
                "inlineStyleRanges": [{"offset": 9, "length": 4, "style": "BOLD"}],
                "entityRanges": [{"offset": 5, "length": 8, "key": 0}]
            },
            {"key": "a3", "type": "unordered-list-item", "text": "outer", "depth": 0},
            {"key": "a4", "type": "unordered-list-item", "text": "inner", "depth": 1}
        ],
        "entityMap": {
            "0": {"type": "LINK", "mutability": "MUTABLE", "data": {"url": "https://docs.example.com"}}
        }
    }))
    .unwrap();

    let html = converter.to_storage(&state);
    assert_eq!(
        html,
        concat!(
            "<h3>Heading</h3>",
            r#"<p>Read <a href="https://docs.example.com">the <b>docs</b></a> now</p>"#,
            "<ul><li>outer<ul><li>inner</li></ul></li></ul>",
        )
    );
    assert!(converter.from_storage(&html).equivalent(&state));
}

#[test]
fn test_line_break_whitespace_round_trip() {
    let site = test_site();
    let converter = site
        .registry()
        .features()
        .contentstate_converter(&default_features(&site));

    let state: ContentState = serde_json::from_value(json!({
        "blocks": [{"key": "b1", "type": "unstyled", "text": "a\n b"}],
        "entityMap": {}
    }))
    .unwrap();

    let html = converter.to_storage(&state);
    assert_eq!(html, "<p>a<br/> b</p>");
    let decoded = converter.from_storage(&html);
    assert_eq!(decoded.blocks[0].text, "a\n b");
    assert!(decoded.equivalent(&state));
}

#[test]
fn test_unsafe_link_urls_dropped() {
    let site = test_site();
    let converter = site
        .registry()
        .features()
        .contentstate_converter(&features(&["link"]));

    let state = converter.from_storage(r#"<p><a href="javascript:alert(1)">click</a></p>"#);
    assert_eq!(converter.to_storage(&state), "<p><a>click</a></p>");
}

#[test]
fn test_editor_html_cleaning() {
    let site = test_site();
    let whitelist = site
        .registry()
        .features()
        .editor_html_whitelist(&features(&["bold", "link"]));

    let cleaned = whitelist.clean(concat!(
        r#"<p class="intro"><b>kept</b> <i>unwrapped</i> "#,
        r#"<a href="javascript:alert(1)">bad</a> "#,
        r#"<a linktype="page" id="3">page</a>"#,
        "<script>alert(1)</script></p>",
    ));
    assert::contains(&cleaned, "<b>kept</b>");
    assert::contains(&cleaned, "unwrapped");
    assert::not_contains(&cleaned, "<i>");
    assert::not_contains(&cleaned, "class=");
    assert::not_contains(&cleaned, "javascript");
    assert::not_contains(&cleaned, "alert");
    assert::contains(&cleaned, r#"linktype="page""#);
    assert::contains(&cleaned, r#"id="3""#);
}

#[test]
fn test_hallo_plugins_ordered() {
    let site = test_site();
    let plugins = site
        .registry()
        .features()
        .editor_plugins(EditorBackend::Hallo, &features(&["hr", "h2", "bold", "link"]));

    let names: Vec<&str> = plugins
        .iter()
        .filter_map(|plugin| match plugin {
            EditorPlugin::Hallo(hallo) => Some(hallo.name.as_str()),
            EditorPlugin::Draftail(_) => None,
        })
        .collect();
    assert_eq!(
        names,
        vec!["halloformat", "halloheadings", "hallohr", "halloporticolink"]
    );
}

#[test]
fn test_draftail_options() {
    let site = test_site();
    let options = site
        .registry()
        .features()
        .draftail_options(&default_features(&site), |msgid| match msgid {
            "Heading 2" => "Titre 2".to_string(),
            other => other.to_string(),
        });

    assert_eq!(options["enableHorizontalRule"], true);
    assert_eq!(options["blockTypes"].as_array().unwrap().len(), 5);
    assert_eq!(options["inlineStyles"].as_array().unwrap().len(), 2);
    assert_eq!(options["entityTypes"][0]["type"], "LINK");
    assert_eq!(options["blockTypes"][0]["type"], "header-two");
    assert_eq!(options["blockTypes"][0]["label"], "H2");
    assert_eq!(options["blockTypes"][0]["description"], "Titre 2");
}
