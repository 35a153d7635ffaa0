//! Contentstate document model: the JSON the Draftail editor works on.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const UNSTYLED: &str = "unstyled";
pub const ATOMIC: &str = "atomic";
pub const HORIZONTAL_RULE: &str = "HORIZONTAL_RULE";
pub const MUTABLE: &str = "MUTABLE";
pub const IMMUTABLE: &str = "IMMUTABLE";

/// A rich text document as blocks plus a shared entity map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentState {
    pub blocks: Vec<Block>,
    #[serde(default)]
    pub entity_map: BTreeMap<String, Entity>,
}

/// One paragraph-level block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub key: String,
    #[serde(rename = "type")]
    pub block_type: String,
    pub text: String,
    #[serde(default)]
    pub depth: usize,
    #[serde(default)]
    pub inline_style_ranges: Vec<InlineStyleRange>,
    #[serde(default)]
    pub entity_ranges: Vec<EntityRange>,
    #[serde(default)]
    pub data: Map<String, Value>,
}

/// Offsets and lengths count characters, not bytes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InlineStyleRange {
    pub offset: usize,
    pub length: usize,
    pub style: String,
}

impl InlineStyleRange {
    /// Exclusive end offset, saturating on oversized lengths.
    pub fn end(&self) -> usize {
        self.offset.saturating_add(self.length)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRange {
    pub offset: usize,
    pub length: usize,
    /// Key into the entity map.
    pub key: usize,
}

impl EntityRange {
    pub fn end(&self) -> usize {
        self.offset.saturating_add(self.length)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    #[serde(rename = "type")]
    pub entity_type: String,
    pub mutability: String,
    #[serde(default)]
    pub data: Map<String, Value>,
}

impl Entity {
    pub fn new(entity_type: impl Into<String>, mutability: &str, data: Map<String, Value>) -> Self {
        Self {
            entity_type: entity_type.into(),
            mutability: mutability.to_string(),
            data,
        }
    }
}

impl Block {
    pub fn new(key: impl Into<String>, block_type: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            block_type: block_type.into(),
            text: String::new(),
            depth: 0,
            inline_style_ranges: Vec::new(),
            entity_ranges: Vec::new(),
            data: Map::new(),
        }
    }

    /// Length of the text in characters.
    pub fn len_chars(&self) -> usize {
        self.text.chars().count()
    }
}

/// A block with its entities resolved, used for comparisons.
#[derive(Debug, PartialEq)]
struct Normalized<'a> {
    block_type: &'a str,
    text: &'a str,
    depth: usize,
    styles: Vec<&'a InlineStyleRange>,
    entities: Vec<(usize, usize, Option<&'a Entity>)>,
}

impl ContentState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the entity an entity range refers to.
    pub fn entity(&self, key: usize) -> Option<&Entity> {
        self.entity_map.get(&key.to_string())
    }

    /// Whether the document holds no blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Compare two documents ignoring block keys, entity keys, and range order.
    pub fn equivalent(&self, other: &ContentState) -> bool {
        self.normalized() == other.normalized()
    }

    fn normalized(&self) -> Vec<Normalized<'_>> {
        self.blocks
            .iter()
            .map(|block| {
                let mut styles: Vec<&InlineStyleRange> = block.inline_style_ranges.iter().collect();
                styles.sort();
                let mut entities: Vec<(usize, usize, Option<&Entity>)> = block
                    .entity_ranges
                    .iter()
                    .map(|range| (range.offset, range.length, self.entity(range.key)))
                    .collect();
                entities.sort_by_key(|(offset, length, _)| (*offset, *length));
                Normalized {
                    block_type: &block.block_type,
                    text: &block.text,
                    depth: block.depth,
                    styles,
                    entities,
                }
            })
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "blocks": [
            {"key": "a1b2c", "type": "unstyled", "text": "Hello world", "depth": 0,
             "inlineStyleRanges": [{"offset": 0, "length": 5, "style": "BOLD"}],
             "entityRanges": [{"offset": 6, "length": 5, "key": 0}], "data": {}}
        ],
        "entityMap": {"0": {"type": "LINK", "mutability": "MUTABLE", "data": {"url": "https://example.com"}}}
    }"#;

    #[test]
    fn deserializes_draft_json() {
        let state: ContentState = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(state.blocks.len(), 1);
        assert_eq!(state.blocks[0].block_type, UNSTYLED);
        assert_eq!(state.entity(0).unwrap().entity_type, "LINK");
    }

    #[test]
    fn serializes_camel_case() {
        let state: ContentState = serde_json::from_str(SAMPLE).unwrap();
        let json = serde_json::to_value(&state).unwrap();
        assert!(json.get("entityMap").is_some());
        assert!(json["blocks"][0].get("inlineStyleRanges").is_some());
    }

    #[test]
    fn equivalence_ignores_keys() {
        let a: ContentState = serde_json::from_str(SAMPLE).unwrap();
        let mut b = a.clone();
        b.blocks[0].key = "zzzzz".to_string();
        let entity = b.entity_map.remove("0").unwrap();
        b.entity_map.insert("7".to_string(), entity);
        b.blocks[0].entity_ranges[0].key = 7;
        assert!(a.equivalent(&b));

        b.blocks[0].text = "Hello there".to_string();
        assert!(!a.equivalent(&b));
    }

    #[test]
    fn len_counts_chars() {
        let mut block = Block::new("k", UNSTYLED);
        block.text = "héllo".to_string();
        assert_eq!(block.len_chars(), 5);
    }
}
