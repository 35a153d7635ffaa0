//! Contentstate -> stored HTML.

use std::collections::BTreeSet;

use serde_json::Value;
use tracing::debug;

use super::model::{ATOMIC, Block, ContentState};
use super::ContentStateConverter;
use crate::html::{check_url, html_escape};
use crate::rich_text::features::EntityDecorator;

/// An open list wrapper whose last item is still open.
struct OpenWrapper<'a> {
    wrapper: &'a str,
    element: &'a str,
    depth: usize,
}

pub(super) fn export(converter: &ContentStateConverter, state: &ContentState) -> String {
    let mut html = String::new();
    let mut wrappers: Vec<OpenWrapper<'_>> = Vec::new();

    for block in &state.blocks {
        if block.block_type == ATOMIC {
            close_wrappers(&mut html, &mut wrappers);
            html.push_str(&render_inline(converter, state, block));
            continue;
        }

        let Some(mapping) = converter.block_mapping(&block.block_type) else {
            debug!(block_type = %block.block_type, "no block mapping; rendering as paragraph");
            close_wrappers(&mut html, &mut wrappers);
            html.push_str(&format!("<p>{}</p>", render_inline(converter, state, block)));
            continue;
        };

        let element = mapping.element();
        let content = render_inline(converter, state, block);

        match mapping.wrapper() {
            None => {
                close_wrappers(&mut html, &mut wrappers);
                html.push_str(&format!("<{element}>{content}</{element}>"));
            }
            Some(wrapper) => {
                // Close deeper levels and same-level wrappers of another kind.
                while let Some(top) = wrappers.last() {
                    if top.depth > block.depth
                        || (top.depth == block.depth && top.wrapper != wrapper)
                    {
                        close_top(&mut html, &mut wrappers);
                    } else {
                        break;
                    }
                }

                if wrappers.last().is_some_and(|top| top.depth == block.depth) {
                    html.push_str(&format!("</{element}><{element}>{content}"));
                } else {
                    html.push_str(&format!("<{wrapper}><{element}>{content}"));
                    wrappers.push(OpenWrapper {
                        wrapper,
                        element,
                        depth: block.depth,
                    });
                }
            }
        }
    }

    close_wrappers(&mut html, &mut wrappers);
    html
}

fn close_top(html: &mut String, wrappers: &mut Vec<OpenWrapper<'_>>) {
    if let Some(top) = wrappers.pop() {
        html.push_str(&format!("</{}></{}>", top.element, top.wrapper));
    }
}

fn close_wrappers(html: &mut String, wrappers: &mut Vec<OpenWrapper<'_>>) {
    while !wrappers.is_empty() {
        close_top(html, wrappers);
    }
}

/// Render a block's text with its styles and entities.
fn render_inline(converter: &ContentStateConverter, state: &ContentState, block: &Block) -> String {
    let chars: Vec<char> = block.text.chars().collect();
    let len = block.len_chars();

    let mut boundaries: BTreeSet<usize> = BTreeSet::from([0, len]);
    for range in &block.inline_style_ranges {
        boundaries.insert(range.offset.min(len));
        boundaries.insert(range.end().min(len));
    }
    for range in &block.entity_ranges {
        boundaries.insert(range.offset.min(len));
        boundaries.insert(range.end().min(len));
    }
    let boundaries: Vec<usize> = boundaries.into_iter().collect();

    // (entity key, rendered segment) in text order.
    let mut segments: Vec<(Option<usize>, String)> = Vec::new();
    for window in boundaries.windows(2) {
        let (start, end) = (window[0], window[1]);
        if start >= end {
            continue;
        }
        let text: String = chars[start..end].iter().collect();

        let mut styles: Vec<&str> = block
            .inline_style_ranges
            .iter()
            .filter(|r| r.offset <= start && end <= r.end())
            .map(|r| r.style.as_str())
            .collect();
        styles.sort_unstable();
        styles.dedup();

        let entity = block
            .entity_ranges
            .iter()
            .find(|r| r.offset <= start && end <= r.end())
            .map(|r| r.key);

        segments.push((entity, render_styled(converter, &text, &styles)));
    }

    // Group consecutive segments of the same entity under one decorator.
    let mut html = String::new();
    let mut index = 0;
    while index < segments.len() {
        let key = segments[index].0;
        let mut inner = String::new();
        while index < segments.len() && segments[index].0 == key {
            inner.push_str(&segments[index].1);
            index += 1;
        }
        match key {
            Some(key) => html.push_str(&decorate(converter, state, key, &inner)),
            None => html.push_str(&inner),
        }
    }
    html
}

fn render_styled(converter: &ContentStateConverter, text: &str, styles: &[&str]) -> String {
    let mut html = html_escape(text).replace('\n', "<br/>");
    for style in styles.iter().rev() {
        match converter.style_element(style) {
            Some(element) => html = format!("<{element}>{html}</{element}>"),
            None => debug!(style = %style, "no element for inline style"),
        }
    }
    html
}

fn decorate(converter: &ContentStateConverter, state: &ContentState, key: usize, inner: &str) -> String {
    let Some(entity) = state.entity(key) else {
        return inner.to_string();
    };
    match converter.entity_decorator(&entity.entity_type) {
        Some(EntityDecorator::HorizontalRule) => "<hr/>".to_string(),
        Some(EntityDecorator::Link) => match entity.data.get("id").filter(|v| !v.is_null()) {
            Some(id) => format!(
                r#"<a linktype="page" id="{}">{inner}</a>"#,
                html_escape(&value_text(id))
            ),
            None => {
                let url = entity
                    .data
                    .get("url")
                    .and_then(Value::as_str)
                    .and_then(check_url);
                match url {
                    Some(url) => format!(r#"<a href="{}">{inner}</a>"#, html_escape(url)),
                    None => format!("<a>{inner}</a>"),
                }
            }
        },
        None => {
            debug!(entity_type = %entity.entity_type, "no decorator for entity");
            inner.to_string()
        }
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::rich_text::contentstate::{Entity, EntityRange, InlineStyleRange, MUTABLE, UNSTYLED};
    use crate::rich_text::features::{BlockMapping, ContentStateRule};
    use serde_json::{Map, json};

    fn converter() -> ContentStateConverter {
        let rules = vec![
            ContentStateRule::new().block("header-two", BlockMapping::Element("h2".to_string())),
            ContentStateRule::new().style("BOLD", "b").style("ITALIC", "i"),
            ContentStateRule::new().block(
                "unordered-list-item",
                BlockMapping::Wrapped {
                    element: "li".to_string(),
                    wrapper: "ul".to_string(),
                },
            ),
            ContentStateRule::new()
                .entity("LINK", EntityDecorator::Link)
                .entity("HORIZONTAL_RULE", EntityDecorator::HorizontalRule),
        ];
        ContentStateConverter::new(&rules)
    }

    fn block(block_type: &str, text: &str, depth: usize) -> Block {
        let mut block = Block::new("k", block_type);
        block.text = text.to_string();
        block.depth = depth;
        block
    }

    #[test]
    fn blocks_and_escaping() {
        let state = ContentState {
            blocks: vec![block("header-two", "A & B", 0), block(UNSTYLED, "x<y\nz", 0)],
            entity_map: Default::default(),
        };
        assert_eq!(
            converter().to_storage(&state),
            "<h2>A &amp; B</h2><p>x&lt;y<br/>z</p>"
        );
    }

    #[test]
    fn overlapping_styles_nest_in_name_order() {
        let mut b = block(UNSTYLED, "bold both", 0);
        b.inline_style_ranges = vec![
            InlineStyleRange {
                offset: 0,
                length: 9,
                style: "ITALIC".to_string(),
            },
            InlineStyleRange {
                offset: 0,
                length: 4,
                style: "BOLD".to_string(),
            },
        ];
        let state = ContentState {
            blocks: vec![b],
            entity_map: Default::default(),
        };
        assert_eq!(
            converter().to_storage(&state),
            "<p><b><i>bold</i></b><i> both</i></p>"
        );
    }

    #[test]
    fn nested_list_wrappers() {
        let state = ContentState {
            blocks: vec![
                block("unordered-list-item", "a", 0),
                block("unordered-list-item", "b", 1),
                block("unordered-list-item", "c", 0),
                block(UNSTYLED, "after", 0),
            ],
            entity_map: Default::default(),
        };
        assert_eq!(
            converter().to_storage(&state),
            "<ul><li>a<ul><li>b</li></ul></li><li>c</li></ul><p>after</p>"
        );
    }

    #[test]
    fn links_decorated() {
        let mut b = block(UNSTYLED, "home ext bad", 0);
        b.entity_ranges = vec![
            EntityRange { offset: 0, length: 4, key: 0 },
            EntityRange { offset: 5, length: 3, key: 1 },
            EntityRange { offset: 9, length: 3, key: 2 },
        ];
        let mut entity_map = std::collections::BTreeMap::new();
        let data = |v: serde_json::Value| -> Map<String, Value> { serde_json::from_value(v).unwrap() };
        entity_map.insert("0".to_string(), Entity::new("LINK", MUTABLE, data(json!({"id": 3}))));
        entity_map.insert(
            "1".to_string(),
            Entity::new("LINK", MUTABLE, data(json!({"url": "https://example.com"}))),
        );
        entity_map.insert(
            "2".to_string(),
            Entity::new("LINK", MUTABLE, data(json!({"url": "javascript:alert(1)"}))),
        );
        let state = ContentState {
            blocks: vec![b],
            entity_map,
        };
        assert_eq!(
            converter().to_storage(&state),
            r#"<p><a linktype="page" id="3">home</a> <a href="https://example.com">ext</a> <a>bad</a></p>"#
        );
    }

    #[test]
    fn atomic_horizontal_rule() {
        let mut hr = block(ATOMIC, " ", 0);
        hr.entity_ranges = vec![EntityRange { offset: 0, length: 1, key: 0 }];
        let mut entity_map = std::collections::BTreeMap::new();
        entity_map.insert(
            "0".to_string(),
            Entity::new("HORIZONTAL_RULE", "IMMUTABLE", Map::new()),
        );
        let state = ContentState {
            blocks: vec![block(UNSTYLED, "a", 0), hr],
            entity_map,
        };
        assert_eq!(converter().to_storage(&state), "<p>a</p><hr/>");
    }

    #[test]
    fn unknown_block_type_falls_back_to_paragraph() {
        let state = ContentState {
            blocks: vec![block("code-block", "x", 0)],
            entity_map: Default::default(),
        };
        assert_eq!(converter().to_storage(&state), "<p>x</p>");
    }

    #[test]
    fn oversized_range_lengths_clamp_to_text() {
        let b: Block = serde_json::from_value(json!({
            "key": "k",
            "type": "unstyled",
            "text": "abc",
            "inlineStyleRanges": [{"offset": 1, "length": u64::MAX, "style": "BOLD"}],
            "entityRanges": [{"offset": 2, "length": u64::MAX, "key": 0}]
        }))
        .unwrap();
        let data: Map<String, Value> =
            serde_json::from_value(json!({"url": "https://example.com"})).unwrap();
        let mut entity_map = std::collections::BTreeMap::new();
        entity_map.insert("0".to_string(), Entity::new("LINK", MUTABLE, data));
        let state = ContentState {
            blocks: vec![b],
            entity_map,
        };
        assert_eq!(
            converter().to_storage(&state),
            r#"<p>a<b>b</b><a href="https://example.com"><b>c</b></a></p>"#
        );
    }
}
