/*
 * listener.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Traversal event sink and a text recorder.
 */

//! Traversal events.
//!
//! [`BlockArena::traverse`] walks a subtree in pre-order and reports it to a
//! [`Listener`]: container blocks produce a `begin_*` event, then their
//! children, then an `end_*` event. Leaf blocks produce a single `on_*`
//! event and their children, if any, are not visited.
//!
//! Every listener method has an empty default so sinks only implement the
//! events they care about.

use crate::arena::{BlockArena, BlockId};
use crate::block::{Block, BlockKind, HeaderLevel, ListType, MetaData, ParameterMap};
use crate::syntax::Syntax;

/// Receiver of traversal events.
pub trait Listener {
    fn begin_document(&mut self, _metadata: &MetaData) {}
    fn end_document(&mut self, _metadata: &MetaData) {}

    fn begin_group(&mut self, _parameters: &ParameterMap) {}
    fn end_group(&mut self, _parameters: &ParameterMap) {}

    fn begin_section(&mut self, _parameters: &ParameterMap) {}
    fn end_section(&mut self, _parameters: &ParameterMap) {}

    fn begin_paragraph(&mut self, _parameters: &ParameterMap) {}
    fn end_paragraph(&mut self, _parameters: &ParameterMap) {}

    fn begin_header(
        &mut self,
        _level: HeaderLevel,
        _id: Option<&str>,
        _parameters: &ParameterMap,
    ) {
    }
    fn end_header(
        &mut self,
        _level: HeaderLevel,
        _id: Option<&str>,
        _parameters: &ParameterMap,
    ) {
    }

    fn begin_list(&mut self, _list_type: ListType, _parameters: &ParameterMap) {}
    fn end_list(&mut self, _list_type: ListType, _parameters: &ParameterMap) {}

    fn begin_list_item(&mut self, _parameters: &ParameterMap) {}
    fn end_list_item(&mut self, _parameters: &ParameterMap) {}

    fn begin_definition_list(&mut self, _parameters: &ParameterMap) {}
    fn end_definition_list(&mut self, _parameters: &ParameterMap) {}

    fn begin_definition_term(&mut self) {}
    fn end_definition_term(&mut self) {}

    fn begin_definition_description(&mut self) {}
    fn end_definition_description(&mut self) {}

    fn begin_macro_marker(
        &mut self,
        _id: &str,
        _parameters: &ParameterMap,
        _content: Option<&str>,
        _inline: bool,
    ) {
    }
    fn end_macro_marker(
        &mut self,
        _id: &str,
        _parameters: &ParameterMap,
        _content: Option<&str>,
        _inline: bool,
    ) {
    }

    fn begin_metadata(&mut self, _metadata: &MetaData) {}
    fn end_metadata(&mut self, _metadata: &MetaData) {}

    fn on_word(&mut self, _text: &str) {}
    fn on_space(&mut self) {}
    fn on_special_symbol(&mut self, _symbol: char) {}
    fn on_new_line(&mut self) {}
    fn on_empty_lines(&mut self, _count: usize) {}
    fn on_raw_text(&mut self, _content: &str, _syntax: &Syntax) {}
    fn on_verbatim(&mut self, _content: &str, _inline: bool, _parameters: &ParameterMap) {}
    fn on_horizontal_line(&mut self, _parameters: &ParameterMap) {}
    fn on_macro(
        &mut self,
        _id: &str,
        _parameters: &ParameterMap,
        _content: Option<&str>,
        _inline: bool,
    ) {
    }
}

enum Step {
    Enter(BlockId),
    Exit(BlockId),
}

impl BlockArena {
    /// Report the subtree rooted at `id` to `listener`. A stale handle
    /// produces no events.
    pub fn traverse(&self, id: BlockId, listener: &mut dyn Listener) {
        let mut stack = vec![Step::Enter(id)];
        while let Some(step) = stack.pop() {
            match step {
                Step::Enter(id) => {
                    let Some(block) = self.get(id) else {
                        continue;
                    };
                    if block.block_type().is_leaf() {
                        emit_leaf(block, listener);
                        continue;
                    }
                    emit_begin(block, listener);
                    stack.push(Step::Exit(id));
                    stack.extend(block.children().iter().rev().map(|&c| Step::Enter(c)));
                }
                Step::Exit(id) => {
                    if let Some(block) = self.get(id) {
                        emit_end(block, listener);
                    }
                }
            }
        }
    }
}

fn emit_leaf(block: &Block, listener: &mut dyn Listener) {
    let params = block.parameters();
    match block.kind() {
        BlockKind::Word { text } => listener.on_word(text),
        BlockKind::Space => listener.on_space(),
        BlockKind::SpecialSymbol { symbol } => listener.on_special_symbol(*symbol),
        BlockKind::NewLine => listener.on_new_line(),
        BlockKind::EmptyLines { count } => listener.on_empty_lines(*count),
        BlockKind::Raw { content, syntax } => listener.on_raw_text(content, syntax),
        BlockKind::Verbatim { content, inline } => listener.on_verbatim(content, *inline, params),
        BlockKind::HorizontalLine => listener.on_horizontal_line(params),
        BlockKind::Macro {
            id,
            content,
            inline,
        } => listener.on_macro(id, params, content.as_deref(), *inline),
        _ => {}
    }
}

fn emit_begin(block: &Block, listener: &mut dyn Listener) {
    let params = block.parameters();
    match block.kind() {
        BlockKind::XDom { metadata } => listener.begin_document(metadata),
        BlockKind::Group => listener.begin_group(params),
        BlockKind::Section => listener.begin_section(params),
        BlockKind::Paragraph => listener.begin_paragraph(params),
        BlockKind::Header { level, id } => listener.begin_header(*level, id.as_deref(), params),
        BlockKind::BulletedList => listener.begin_list(ListType::Bulleted, params),
        BlockKind::NumberedList => listener.begin_list(ListType::Numbered, params),
        BlockKind::ListItem => listener.begin_list_item(params),
        BlockKind::DefinitionList => listener.begin_definition_list(params),
        BlockKind::DefinitionTerm => listener.begin_definition_term(),
        BlockKind::DefinitionDescription => listener.begin_definition_description(),
        BlockKind::MacroMarker {
            id,
            content,
            inline,
        } => listener.begin_macro_marker(id, params, content.as_deref(), *inline),
        BlockKind::MetaData { metadata } => listener.begin_metadata(metadata),
        _ => {}
    }
}

fn emit_end(block: &Block, listener: &mut dyn Listener) {
    let params = block.parameters();
    match block.kind() {
        BlockKind::XDom { metadata } => listener.end_document(metadata),
        BlockKind::Group => listener.end_group(params),
        BlockKind::Section => listener.end_section(params),
        BlockKind::Paragraph => listener.end_paragraph(params),
        BlockKind::Header { level, id } => listener.end_header(*level, id.as_deref(), params),
        BlockKind::BulletedList => listener.end_list(ListType::Bulleted, params),
        BlockKind::NumberedList => listener.end_list(ListType::Numbered, params),
        BlockKind::ListItem => listener.end_list_item(params),
        BlockKind::DefinitionList => listener.end_definition_list(params),
        BlockKind::DefinitionTerm => listener.end_definition_term(),
        BlockKind::DefinitionDescription => listener.end_definition_description(),
        BlockKind::MacroMarker {
            id,
            content,
            inline,
        } => listener.end_macro_marker(id, params, content.as_deref(), *inline),
        BlockKind::MetaData { metadata } => listener.end_metadata(metadata),
        _ => {}
    }
}

/// Listener that records one line per event.
///
/// Lines look like `beginHeader [1, HHello]` or `onWord [Hello]`, followed
/// by ` [name]=[value]` for each parameter.
#[derive(Debug, Clone, Default)]
pub struct EventRecorder {
    events: Vec<String>,
}

impl EventRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[String] {
        &self.events
    }

    pub fn into_events(self) -> Vec<String> {
        self.events
    }

    fn record(&mut self, event: &str, args: &[&str], parameters: Option<&ParameterMap>) {
        let mut line = event.to_string();
        if !args.is_empty() {
            line.push_str(" [");
            line.push_str(&args.join(", "));
            line.push(']');
        }
        for (name, value) in parameters.into_iter().flat_map(ParameterMap::iter) {
            line.push_str(&format!(" [{name}]=[{value}]"));
        }
        self.events.push(line);
    }
}

impl std::fmt::Display for EventRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for event in &self.events {
            writeln!(f, "{event}")?;
        }
        Ok(())
    }
}

impl Listener for EventRecorder {
    fn begin_document(&mut self, metadata: &MetaData) {
        self.record("beginDocument", &[], Some(metadata));
    }
    fn end_document(&mut self, metadata: &MetaData) {
        self.record("endDocument", &[], Some(metadata));
    }

    fn begin_group(&mut self, parameters: &ParameterMap) {
        self.record("beginGroup", &[], Some(parameters));
    }
    fn end_group(&mut self, parameters: &ParameterMap) {
        self.record("endGroup", &[], Some(parameters));
    }

    fn begin_section(&mut self, parameters: &ParameterMap) {
        self.record("beginSection", &[], Some(parameters));
    }
    fn end_section(&mut self, parameters: &ParameterMap) {
        self.record("endSection", &[], Some(parameters));
    }

    fn begin_paragraph(&mut self, parameters: &ParameterMap) {
        self.record("beginParagraph", &[], Some(parameters));
    }
    fn end_paragraph(&mut self, parameters: &ParameterMap) {
        self.record("endParagraph", &[], Some(parameters));
    }

    fn begin_header(&mut self, level: HeaderLevel, id: Option<&str>, parameters: &ParameterMap) {
        let level = level.to_string();
        self.record("beginHeader", &[&level, id.unwrap_or("")], Some(parameters));
    }
    fn end_header(&mut self, level: HeaderLevel, id: Option<&str>, parameters: &ParameterMap) {
        let level = level.to_string();
        self.record("endHeader", &[&level, id.unwrap_or("")], Some(parameters));
    }

    fn begin_list(&mut self, list_type: ListType, parameters: &ParameterMap) {
        self.record("beginList", &[list_type.as_str()], Some(parameters));
    }
    fn end_list(&mut self, list_type: ListType, parameters: &ParameterMap) {
        self.record("endList", &[list_type.as_str()], Some(parameters));
    }

    fn begin_list_item(&mut self, parameters: &ParameterMap) {
        self.record("beginListItem", &[], Some(parameters));
    }
    fn end_list_item(&mut self, parameters: &ParameterMap) {
        self.record("endListItem", &[], Some(parameters));
    }

    fn begin_definition_list(&mut self, parameters: &ParameterMap) {
        self.record("beginDefinitionList", &[], Some(parameters));
    }
    fn end_definition_list(&mut self, parameters: &ParameterMap) {
        self.record("endDefinitionList", &[], Some(parameters));
    }

    fn begin_definition_term(&mut self) {
        self.record("beginDefinitionTerm", &[], None);
    }
    fn end_definition_term(&mut self) {
        self.record("endDefinitionTerm", &[], None);
    }

    fn begin_definition_description(&mut self) {
        self.record("beginDefinitionDescription", &[], None);
    }
    fn end_definition_description(&mut self) {
        self.record("endDefinitionDescription", &[], None);
    }

    fn begin_macro_marker(
        &mut self,
        id: &str,
        parameters: &ParameterMap,
        content: Option<&str>,
        inline: bool,
    ) {
        let inline = inline.to_string();
        self.record(
            "beginMacroMarker",
            &[id, content.unwrap_or(""), &inline],
            Some(parameters),
        );
    }
    fn end_macro_marker(
        &mut self,
        id: &str,
        parameters: &ParameterMap,
        content: Option<&str>,
        inline: bool,
    ) {
        let inline = inline.to_string();
        self.record(
            "endMacroMarker",
            &[id, content.unwrap_or(""), &inline],
            Some(parameters),
        );
    }

    fn begin_metadata(&mut self, metadata: &MetaData) {
        self.record("beginMetaData", &[], Some(metadata));
    }
    fn end_metadata(&mut self, metadata: &MetaData) {
        self.record("endMetaData", &[], Some(metadata));
    }

    fn on_word(&mut self, text: &str) {
        self.record("onWord", &[text], None);
    }
    fn on_space(&mut self) {
        self.record("onSpace", &[], None);
    }
    fn on_special_symbol(&mut self, symbol: char) {
        let symbol = symbol.to_string();
        self.record("onSpecialSymbol", &[&symbol], None);
    }
    fn on_new_line(&mut self) {
        self.record("onNewLine", &[], None);
    }
    fn on_empty_lines(&mut self, count: usize) {
        let count = count.to_string();
        self.record("onEmptyLines", &[&count], None);
    }
    fn on_raw_text(&mut self, content: &str, syntax: &Syntax) {
        let syntax = syntax.to_string();
        self.record("onRawText", &[content, &syntax], None);
    }
    fn on_verbatim(&mut self, content: &str, inline: bool, parameters: &ParameterMap) {
        let inline = inline.to_string();
        self.record("onVerbatim", &[content, &inline], Some(parameters));
    }
    fn on_horizontal_line(&mut self, parameters: &ParameterMap) {
        self.record("onHorizontalLine", &[], Some(parameters));
    }
    fn on_macro(
        &mut self,
        id: &str,
        parameters: &ParameterMap,
        content: Option<&str>,
        inline: bool,
    ) {
        let inline = inline.to_string();
        self.record(
            "onMacro",
            &[id, content.unwrap_or(""), &inline],
            Some(parameters),
        );
    }
}
