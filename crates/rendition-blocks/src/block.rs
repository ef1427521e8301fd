/*
 * block.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Block variants and per-node data.
 */

//! Block variants and per-node data.
//!
//! A [`Block`] is one node of the document tree. Its variant payload lives in
//! [`BlockKind`]; its tree links (parent, siblings, children) are owned by
//! the [`BlockArena`](crate::arena::BlockArena) and can only be changed
//! through the arena's structural operations.

use hashlink::LinkedHashMap;
use serde::{Deserialize, Serialize};

use crate::arena::BlockId;
use crate::syntax::Syntax;

/// Insertion-ordered string map with unique keys.
///
/// Used for block parameters and metadata. Updating an existing key keeps
/// its position. Equality ignores order: two maps are equal when they hold
/// the same entries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterMap(LinkedHashMap<String, String>);

/// Metadata attached to document roots and metadata blocks.
pub type MetaData = ParameterMap;

impl ParameterMap {
    pub fn new() -> Self {
        Self(LinkedHashMap::new())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Set a value, keeping the key's position if it already exists.
    ///
    /// Returns the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key = key.into();
        let value = value.into();
        match self.0.get_mut(&key) {
            Some(slot) => Some(std::mem::replace(slot, value)),
            None => {
                self.0.insert(key, value);
                None
            }
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl PartialEq for ParameterMap {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl Eq for ParameterMap {}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ParameterMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = ParameterMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

/// Header level, 1 through 6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct HeaderLevel(u8);

impl HeaderLevel {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 6;

    /// Returns `None` when `level` is outside 1..=6.
    pub fn new(level: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&level).then_some(Self(level))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for HeaderLevel {
    type Error = String;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        HeaderLevel::new(level).ok_or_else(|| format!("Invalid header level: {}", level))
    }
}

impl From<HeaderLevel> for u8 {
    fn from(level: HeaderLevel) -> Self {
        level.0
    }
}

impl std::fmt::Display for HeaderLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of list reported to listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListType {
    Bulleted,
    Numbered,
}

impl ListType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListType::Bulleted => "bulleted",
            ListType::Numbered => "numbered",
        }
    }
}

/// Variant payload of a block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum BlockKind {
    /// Root of a parsed document.
    #[serde(rename = "xdom")]
    XDom {
        #[serde(default, skip_serializing_if = "ParameterMap::is_empty")]
        metadata: MetaData,
    },
    Group,
    Section,
    Paragraph,
    Header {
        level: HeaderLevel,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
    },
    Word {
        text: String,
    },
    Space,
    SpecialSymbol {
        symbol: char,
    },
    NewLine,
    EmptyLines {
        count: usize,
    },
    /// Content kept verbatim in its source syntax.
    Raw {
        content: String,
        syntax: Syntax,
    },
    Verbatim {
        content: String,
        #[serde(default)]
        inline: bool,
    },
    HorizontalLine,
    /// Unexpanded macro call.
    Macro {
        id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        content: Option<String>,
        #[serde(default)]
        inline: bool,
    },
    /// Wraps the output of an expanded macro, remembering the call.
    MacroMarker {
        id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        content: Option<String>,
        #[serde(default)]
        inline: bool,
    },
    #[serde(rename = "metadata")]
    MetaData {
        #[serde(default)]
        metadata: MetaData,
    },
    BulletedList,
    NumberedList,
    ListItem,
    DefinitionList,
    DefinitionTerm,
    DefinitionDescription,
}

impl BlockKind {
    pub fn xdom() -> Self {
        BlockKind::XDom {
            metadata: MetaData::new(),
        }
    }

    pub fn word(text: impl Into<String>) -> Self {
        BlockKind::Word { text: text.into() }
    }

    /// Header with an explicit level.
    ///
    /// Levels outside 1..=6 are clamped.
    pub fn header(level: u8, id: Option<String>) -> Self {
        let level = level.clamp(HeaderLevel::MIN, HeaderLevel::MAX);
        BlockKind::Header {
            level: HeaderLevel(level),
            id,
        }
    }

    pub fn raw(content: impl Into<String>, syntax: Syntax) -> Self {
        BlockKind::Raw {
            content: content.into(),
            syntax,
        }
    }

    pub fn macro_marker(id: impl Into<String>, content: Option<String>, inline: bool) -> Self {
        BlockKind::MacroMarker {
            id: id.into(),
            content,
            inline,
        }
    }

    pub fn metadata_block(metadata: MetaData) -> Self {
        BlockKind::MetaData { metadata }
    }

    /// The fieldless tag of this variant.
    pub fn block_type(&self) -> BlockType {
        match self {
            BlockKind::XDom { .. } => BlockType::XDom,
            BlockKind::Group => BlockType::Group,
            BlockKind::Section => BlockType::Section,
            BlockKind::Paragraph => BlockType::Paragraph,
            BlockKind::Header { .. } => BlockType::Header,
            BlockKind::Word { .. } => BlockType::Word,
            BlockKind::Space => BlockType::Space,
            BlockKind::SpecialSymbol { .. } => BlockType::SpecialSymbol,
            BlockKind::NewLine => BlockType::NewLine,
            BlockKind::EmptyLines { .. } => BlockType::EmptyLines,
            BlockKind::Raw { .. } => BlockType::Raw,
            BlockKind::Verbatim { .. } => BlockType::Verbatim,
            BlockKind::HorizontalLine => BlockType::HorizontalLine,
            BlockKind::Macro { .. } => BlockType::Macro,
            BlockKind::MacroMarker { .. } => BlockType::MacroMarker,
            BlockKind::MetaData { .. } => BlockType::MetaData,
            BlockKind::BulletedList => BlockType::BulletedList,
            BlockKind::NumberedList => BlockType::NumberedList,
            BlockKind::ListItem => BlockType::ListItem,
            BlockKind::DefinitionList => BlockType::DefinitionList,
            BlockKind::DefinitionTerm => BlockType::DefinitionTerm,
            BlockKind::DefinitionDescription => BlockType::DefinitionDescription,
        }
    }

    /// Metadata carried by this block, for metadata-class variants.
    pub fn metadata(&self) -> Option<&MetaData> {
        match self {
            BlockKind::XDom { metadata } | BlockKind::MetaData { metadata } => Some(metadata),
            _ => None,
        }
    }

    pub fn metadata_mut(&mut self) -> Option<&mut MetaData> {
        match self {
            BlockKind::XDom { metadata } | BlockKind::MetaData { metadata } => Some(metadata),
            _ => None,
        }
    }
}

/// Fieldless tag identifying a [`BlockKind`] variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BlockType {
    XDom,
    Group,
    Section,
    Paragraph,
    Header,
    Word,
    Space,
    SpecialSymbol,
    NewLine,
    EmptyLines,
    Raw,
    Verbatim,
    HorizontalLine,
    Macro,
    MacroMarker,
    MetaData,
    BulletedList,
    NumberedList,
    ListItem,
    DefinitionList,
    DefinitionTerm,
    DefinitionDescription,
}

impl BlockType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockType::XDom => "xdom",
            BlockType::Group => "group",
            BlockType::Section => "section",
            BlockType::Paragraph => "paragraph",
            BlockType::Header => "header",
            BlockType::Word => "word",
            BlockType::Space => "space",
            BlockType::SpecialSymbol => "special-symbol",
            BlockType::NewLine => "new-line",
            BlockType::EmptyLines => "empty-lines",
            BlockType::Raw => "raw",
            BlockType::Verbatim => "verbatim",
            BlockType::HorizontalLine => "horizontal-line",
            BlockType::Macro => "macro",
            BlockType::MacroMarker => "macro-marker",
            BlockType::MetaData => "metadata",
            BlockType::BulletedList => "bulleted-list",
            BlockType::NumberedList => "numbered-list",
            BlockType::ListItem => "list-item",
            BlockType::DefinitionList => "definition-list",
            BlockType::DefinitionTerm => "definition-term",
            BlockType::DefinitionDescription => "definition-description",
        }
    }

    /// Leaf variants emit a single listener event and never expose children
    /// to traversal.
    pub fn is_leaf(&self) -> bool {
        matches!(
            self,
            BlockType::Word
                | BlockType::Space
                | BlockType::SpecialSymbol
                | BlockType::NewLine
                | BlockType::EmptyLines
                | BlockType::Raw
                | BlockType::Verbatim
                | BlockType::HorizontalLine
                | BlockType::Macro
        )
    }
}

impl std::fmt::Display for BlockType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A set of block types, used by class matching.
///
/// Besides single types there are two abstract classes: every list, and
/// every block that carries metadata (the document root included).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockClass {
    Type(BlockType),
    List,
    MetaData,
}

impl BlockClass {
    pub fn includes(&self, ty: BlockType) -> bool {
        match self {
            BlockClass::Type(t) => *t == ty,
            BlockClass::List => matches!(ty, BlockType::BulletedList | BlockType::NumberedList),
            BlockClass::MetaData => matches!(ty, BlockType::MetaData | BlockType::XDom),
        }
    }
}

impl From<BlockType> for BlockClass {
    fn from(ty: BlockType) -> Self {
        BlockClass::Type(ty)
    }
}

/// One node of the tree, as stored in the arena.
#[derive(Debug, Clone)]
pub struct Block {
    kind: BlockKind,
    parameters: ParameterMap,
    pub(crate) parent: Option<BlockId>,
    pub(crate) previous: Option<BlockId>,
    pub(crate) next: Option<BlockId>,
    pub(crate) children: Vec<BlockId>,
}

impl Block {
    pub(crate) fn new(kind: BlockKind, parameters: ParameterMap) -> Self {
        Self {
            kind,
            parameters,
            parent: None,
            previous: None,
            next: None,
            children: Vec::new(),
        }
    }

    pub fn kind(&self) -> &BlockKind {
        &self.kind
    }

    pub fn kind_mut(&mut self) -> &mut BlockKind {
        &mut self.kind
    }

    pub fn block_type(&self) -> BlockType {
        self.kind.block_type()
    }

    pub fn parameters(&self) -> &ParameterMap {
        &self.parameters
    }

    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters.get(name)
    }

    pub fn set_parameter(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.parameters.insert(name, value);
    }

    /// Replace every parameter.
    pub fn set_parameters(&mut self, parameters: ParameterMap) {
        self.parameters = parameters;
    }

    pub fn remove_parameter(&mut self, name: &str) -> Option<String> {
        self.parameters.remove(name)
    }

    pub fn parent(&self) -> Option<BlockId> {
        self.parent
    }

    pub fn previous_sibling(&self) -> Option<BlockId> {
        self.previous
    }

    pub fn next_sibling(&self) -> Option<BlockId> {
        self.next
    }

    pub fn children(&self) -> &[BlockId] {
        &self.children
    }

    pub(crate) fn clear_links(&mut self) {
        self.parent = None;
        self.previous = None;
        self.next = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameter_map_keeps_position_on_update() {
        let mut params = ParameterMap::new();
        params.insert("a", "1");
        params.insert("b", "2");
        let old = params.insert("a", "3");

        assert_eq!(old.as_deref(), Some("1"));
        let keys: Vec<&str> = params.keys().collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(params.get("a"), Some("3"));
    }

    #[test]
    fn test_parameter_map_equality_ignores_order() {
        let a: ParameterMap = [("x", "1"), ("y", "2")].into_iter().collect();
        let b: ParameterMap = [("y", "2"), ("x", "1")].into_iter().collect();
        let c: ParameterMap = [("x", "1")].into_iter().collect();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_header_level_bounds() {
        assert!(HeaderLevel::new(0).is_none());
        assert_eq!(HeaderLevel::new(3).map(HeaderLevel::get), Some(3));
        assert!(HeaderLevel::new(7).is_none());
        assert!(HeaderLevel::try_from(9).is_err());
    }

    #[test]
    fn test_header_constructor_clamps() {
        let BlockKind::Header { level, .. } = BlockKind::header(9, None) else {
            panic!("expected header");
        };
        assert_eq!(level.get(), 6);
    }

    #[test]
    fn test_block_class_includes() {
        assert!(BlockClass::List.includes(BlockType::BulletedList));
        assert!(BlockClass::List.includes(BlockType::NumberedList));
        assert!(!BlockClass::List.includes(BlockType::ListItem));
        assert!(BlockClass::MetaData.includes(BlockType::XDom));
        assert!(BlockClass::from(BlockType::Word).includes(BlockType::Word));
        assert!(!BlockClass::from(BlockType::Word).includes(BlockType::Space));
    }

    #[test]
    fn test_metadata_access() {
        let mut kind = BlockKind::xdom();
        kind.metadata_mut().unwrap().insert("syntax", "xwiki/2.1");
        assert_eq!(kind.metadata().unwrap().get("syntax"), Some("xwiki/2.1"));
        assert!(BlockKind::Paragraph.metadata().is_none());
    }

    #[test]
    fn test_kind_serde_tagging() {
        let json = serde_json::to_string(&BlockKind::word("Hello")).unwrap();
        assert_eq!(json, r#"{"type":"word","text":"Hello"}"#);

        let kind: BlockKind = serde_json::from_str(r#"{"type":"header","level":2}"#).unwrap();
        assert_eq!(kind, BlockKind::header(2, None));

        let kind: BlockKind = serde_json::from_str(r#"{"type":"xdom"}"#).unwrap();
        assert_eq!(kind.block_type(), BlockType::XDom);

        assert!(serde_json::from_str::<BlockKind>(r#"{"type":"header","level":8}"#).is_err());
    }

    #[test]
    fn test_leaf_types() {
        assert!(BlockType::Word.is_leaf());
        assert!(BlockType::Macro.is_leaf());
        assert!(!BlockType::MacroMarker.is_leaf());
        assert!(!BlockType::Paragraph.is_leaf());
    }
}
