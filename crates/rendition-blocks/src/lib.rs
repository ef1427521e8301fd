/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Block tree types for Rendition.
 *
 * This crate provides the document tree (an arena of Blocks linked by
 * handles), block matchers, axis navigation and traversal listeners. It has
 * minimal dependencies (serde, thiserror, hashlink) and no knowledge of the
 * transformation pipeline.
 */

pub mod arena;
pub mod block;
pub mod error;
pub mod fragment;
pub mod id_generator;
pub mod listener;
pub mod matcher;
pub mod navigator;
pub mod syntax;

// Re-export commonly used types at the crate root
pub use arena::{BlockArena, BlockId};
pub use block::{
    Block, BlockClass, BlockKind, BlockType, HeaderLevel, ListType, MetaData, ParameterMap,
};
pub use error::{BlockError, SyntaxError};
pub use fragment::Fragment;
pub use id_generator::IdGenerator;
pub use listener::{EventRecorder, Listener};
pub use matcher::{
    AnyBlockMatcher, BlockMatcher, ClassBlockMatcher, CompositeBlockMatcher, EqualsBlockMatcher,
    MacroMarkerBlockMatcher, MetadataBlockMatcher,
};
pub use navigator::{Axes, PreOrder, ReversePreOrder};
pub use syntax::Syntax;
