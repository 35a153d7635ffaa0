//! Stored HTML -> contentstate.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use super::model::{
    ATOMIC, Block, ContentState, Entity, EntityRange, HORIZONTAL_RULE, IMMUTABLE,
    InlineStyleRange, MUTABLE, UNSTYLED,
};
use super::ContentStateConverter;
use crate::html::decode_entities;
use crate::rich_text::features::ElementHandler;

#[allow(clippy::expect_used)]
static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?s)<!--.*?-->|<(/?)([a-zA-Z][a-zA-Z0-9]*)((?:\s+[^\s/>"'=]+(?:\s*=\s*(?:"[^"]*"|'[^']*'|[^\s"'>]+))?)*)\s*(/?)>"#,
    )
    .expect("token pattern is valid")
});

#[allow(clippy::expect_used)]
static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([^\s/>"'=]+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+)))?"#)
        .expect("attribute pattern is valid")
});

#[allow(clippy::expect_used)]
static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t\r\n\x0c]+").expect("whitespace pattern is valid"));

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// What closing an element undoes.
#[derive(Debug)]
enum Effect {
    None,
    Block,
    List,
    Style {
        style: String,
        start: usize,
    },
    Entity {
        entity_type: String,
        data: Map<String, Value>,
        start: usize,
    },
}

#[derive(Debug)]
struct OpenElement {
    tag: String,
    effect: Effect,
}

/// A block being filled. Implicit blocks wrap stray top-level text and are
/// dropped when they end up empty.
#[derive(Debug)]
struct CurrentBlock {
    block: Block,
    len: usize,
    implicit: bool,
    strip_leading: bool,
}

struct Parser<'c> {
    converter: &'c ContentStateConverter,
    state: ContentState,
    current: Option<CurrentBlock>,
    stack: Vec<OpenElement>,
    lists: Vec<String>,
}

pub(super) fn parse(converter: &ContentStateConverter, html: &str) -> ContentState {
    let mut parser = Parser {
        converter,
        state: ContentState::new(),
        current: None,
        stack: Vec::new(),
        lists: Vec::new(),
    };

    let mut last = 0;
    for caps in TOKEN_RE.captures_iter(html) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        parser.text(&html[last..whole.start()]);
        last = whole.end();

        let Some(tag) = caps.get(2) else {
            // Comment.
            continue;
        };
        let tag = tag.as_str().to_ascii_lowercase();
        let closing = caps.get(1).is_some_and(|m| !m.as_str().is_empty());
        let self_closing = caps.get(4).is_some_and(|m| !m.as_str().is_empty());

        if closing {
            parser.close(&tag);
        } else {
            let attrs = parse_attrs(caps.get(3).map_or("", |m| m.as_str()));
            parser.open(tag, &attrs, self_closing);
        }
    }
    parser.text(&html[last..]);

    while let Some(element) = parser.stack.pop() {
        parser.end_element(element);
    }
    parser.commit_block();
    parser.state
}

fn parse_attrs(source: &str) -> HashMap<String, String> {
    ATTR_RE
        .captures_iter(source)
        .filter_map(|caps| {
            let name = caps.get(1)?.as_str().to_ascii_lowercase();
            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map_or(String::new(), |m| decode_entities(m.as_str()));
            Some((name, value))
        })
        .collect()
}

impl Parser<'_> {
    fn open(&mut self, tag: String, attrs: &HashMap<String, String>, self_closing: bool) {
        let is_void = self_closing || VOID_ELEMENTS.contains(&tag.as_str());

        let effect = if tag == "p" {
            self.start_block(UNSTYLED, 0, false);
            Effect::Block
        } else if tag == "br" {
            self.line_break();
            Effect::None
        } else {
            match self.converter.handler_for(&tag, attrs).cloned() {
                Some(handler) => self.apply_handler(handler, attrs),
                None => Effect::None,
            }
        };

        if !is_void {
            self.stack.push(OpenElement { tag, effect });
        }
    }

    fn apply_handler(&mut self, handler: ElementHandler, attrs: &HashMap<String, String>) -> Effect {
        match handler {
            ElementHandler::Block(block_type) => {
                self.start_block(&block_type, 0, false);
                Effect::Block
            }
            ElementHandler::List(item_type) => {
                self.commit_block();
                self.lists.push(item_type);
                Effect::List
            }
            ElementHandler::ListItem => {
                let item_type = self
                    .lists
                    .last()
                    .cloned()
                    .unwrap_or_else(|| "unordered-list-item".to_string());
                let depth = self.lists.len().saturating_sub(1);
                self.start_block(&item_type, depth, false);
                Effect::Block
            }
            ElementHandler::InlineStyle(style) => {
                let start = self.ensure_block();
                Effect::Style { style, start }
            }
            ElementHandler::ExternalLink(entity_type) => {
                let mut data = Map::new();
                data.insert(
                    "url".to_string(),
                    Value::String(attrs.get("href").cloned().unwrap_or_default()),
                );
                let start = self.ensure_block();
                Effect::Entity {
                    entity_type,
                    data,
                    start,
                }
            }
            ElementHandler::PageLink(entity_type) => {
                let mut data = Map::new();
                let id = attrs.get("id").cloned().unwrap_or_default();
                let id = id
                    .parse::<i64>()
                    .map_or(Value::String(id), Value::from);
                data.insert("id".to_string(), id);
                let start = self.ensure_block();
                Effect::Entity {
                    entity_type,
                    data,
                    start,
                }
            }
            ElementHandler::HorizontalRule => {
                self.commit_block();
                let key = self.add_entity(Entity::new(HORIZONTAL_RULE, IMMUTABLE, Map::new()));
                let mut block = Block::new(self.next_block_key(), ATOMIC);
                block.text = " ".to_string();
                block.entity_ranges.push(EntityRange {
                    offset: 0,
                    length: 1,
                    key,
                });
                self.state.blocks.push(block);
                Effect::None
            }
        }
    }

    fn close(&mut self, tag: &str) {
        let Some(position) = self.stack.iter().rposition(|e| e.tag == tag) else {
            return;
        };
        while self.stack.len() > position {
            if let Some(element) = self.stack.pop() {
                self.end_element(element);
            }
        }
    }

    fn end_element(&mut self, element: OpenElement) {
        match element.effect {
            Effect::None => {}
            Effect::Block => self.commit_block(),
            Effect::List => {
                self.commit_block();
                self.lists.pop();
            }
            Effect::Style { style, start } => self.add_style_range(style, start),
            Effect::Entity {
                entity_type,
                data,
                start,
            } => self.add_entity_range(entity_type, data, start),
        }
    }

    fn text(&mut self, raw: &str) {
        if raw.is_empty() {
            return;
        }
        let decoded = decode_entities(raw);
        let collapsed = WHITESPACE_RE.replace_all(&decoded, " ");

        if self.current.is_none() {
            if collapsed.trim().is_empty() {
                return;
            }
            self.start_block(UNSTYLED, 0, true);
        }
        let Some(current) = self.current.as_mut() else {
            return;
        };

        let mut content: &str = &collapsed;
        if current.strip_leading || current.block.text.ends_with(' ') {
            content = content.trim_start_matches(' ');
        }
        if content.is_empty() {
            return;
        }
        current.strip_leading = false;
        current.len += content.chars().count();
        current.block.text.push_str(content);
    }

    fn line_break(&mut self) {
        self.ensure_block();
        if let Some(current) = self.current.as_mut() {
            current.block.text.push('\n');
            current.len += 1;
        }
    }

    /// Make sure a block is open and return the current text offset.
    fn ensure_block(&mut self) -> usize {
        if self.current.is_none() {
            self.start_block(UNSTYLED, 0, true);
        }
        self.current.as_ref().map_or(0, |c| c.len)
    }

    fn start_block(&mut self, block_type: &str, depth: usize, implicit: bool) {
        self.commit_block();
        let mut block = Block::new(self.next_block_key(), block_type);
        block.depth = depth;
        self.current = Some(CurrentBlock {
            block,
            len: 0,
            implicit,
            strip_leading: true,
        });
    }

    /// Finish the current block, flushing ranges still open in it.
    fn commit_block(&mut self) {
        if self.current.is_none() {
            return;
        }

        // Styles and entities left open continue into the next block.
        let mut open = Vec::new();
        for element in &mut self.stack {
            match &mut element.effect {
                Effect::Style { style, start } => {
                    open.push((style.clone(), None, *start));
                    *start = 0;
                }
                Effect::Entity {
                    entity_type,
                    data,
                    start,
                } => {
                    open.push((entity_type.clone(), Some(data.clone()), *start));
                    *start = 0;
                }
                _ => {}
            }
        }
        for (name, data, start) in open {
            match data {
                Some(data) => self.add_entity_range(name, data, start),
                None => self.add_style_range(name, start),
            }
        }

        let Some(mut current) = self.current.take() else {
            return;
        };

        let trimmed_len = current.block.text.trim_end_matches(' ').chars().count();
        if trimmed_len < current.len {
            let keep: String = current.block.text.chars().take(trimmed_len).collect();
            current.block.text = keep;
            clamp_ranges(&mut current.block, trimmed_len);
        }

        if current.implicit && current.block.text.is_empty() {
            return;
        }
        self.state.blocks.push(current.block);
    }

    fn add_style_range(&mut self, style: String, start: usize) {
        let Some(current) = self.current.as_mut() else {
            return;
        };
        if current.len <= start {
            return;
        }
        let ranges = &mut current.block.inline_style_ranges;
        if let Some(previous) = ranges
            .iter_mut()
            .find(|r| r.style == style && r.end() == start)
        {
            previous.length = current.len - previous.offset;
            return;
        }
        ranges.push(InlineStyleRange {
            offset: start,
            length: current.len - start,
            style,
        });
    }

    fn add_entity_range(&mut self, entity_type: String, data: Map<String, Value>, start: usize) {
        let length = match self.current.as_ref() {
            Some(current) if current.len > start => current.len - start,
            _ => return,
        };
        let key = self.add_entity(Entity::new(entity_type, MUTABLE, data));
        if let Some(current) = self.current.as_mut() {
            current.block.entity_ranges.push(EntityRange {
                offset: start,
                length,
                key,
            });
        }
    }

    fn add_entity(&mut self, entity: Entity) -> usize {
        let key = self.state.entity_map.len();
        self.state.entity_map.insert(key.to_string(), entity);
        key
    }

    fn next_block_key(&self) -> String {
        let index = self.state.blocks.len() + usize::from(self.current.is_some());
        format!("b{index:04x}")
    }
}

/// Shrink ranges that run past `len`; drop the ones left empty.
fn clamp_ranges(block: &mut Block, len: usize) {
    for range in &mut block.inline_style_ranges {
        range.length = range.length.min(len.saturating_sub(range.offset));
    }
    block.inline_style_ranges.retain(|r| r.length > 0);
    for range in &mut block.entity_ranges {
        range.length = range.length.min(len.saturating_sub(range.offset));
    }
    block.entity_ranges.retain(|r| r.length > 0);
}
