/*
 * matcher.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Predicates over blocks.
 */

//! Block matchers.
//!
//! A [`BlockMatcher`] decides whether a block is selected during navigation.
//! Every matcher here is pure: evaluating it never changes its state, so one
//! matcher can be shared between traversals. Pre-order positions are
//! computed by [`BlockArena::index_of`], not by a counting matcher.
//!
//! Closures `Fn(&BlockArena, BlockId) -> bool` are matchers too.

use std::collections::HashSet;

use crate::arena::{BlockArena, BlockId};
use crate::block::{BlockClass, BlockKind};
use crate::fragment::Fragment;

/// Predicate over a block.
pub trait BlockMatcher {
    fn matches(&self, arena: &BlockArena, block: BlockId) -> bool;
}

impl<F> BlockMatcher for F
where
    F: Fn(&BlockArena, BlockId) -> bool,
{
    fn matches(&self, arena: &BlockArena, block: BlockId) -> bool {
        self(arena, block)
    }
}

/// Matches every live block.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnyBlockMatcher;

impl BlockMatcher for AnyBlockMatcher {
    fn matches(&self, arena: &BlockArena, block: BlockId) -> bool {
        arena.contains(block)
    }
}

/// Matches blocks whose type belongs to a [`BlockClass`].
#[derive(Debug, Clone, Copy)]
pub struct ClassBlockMatcher {
    class: BlockClass,
}

impl ClassBlockMatcher {
    pub fn new(class: impl Into<BlockClass>) -> Self {
        Self {
            class: class.into(),
        }
    }
}

impl BlockMatcher for ClassBlockMatcher {
    fn matches(&self, arena: &BlockArena, block: BlockId) -> bool {
        arena
            .block_type(block)
            .is_some_and(|ty| self.class.includes(ty))
    }
}

/// Matches blocks structurally equal to a reference subtree.
#[derive(Debug, Clone)]
pub struct EqualsBlockMatcher {
    reference: Fragment,
}

impl EqualsBlockMatcher {
    pub fn new(reference: Fragment) -> Self {
        Self { reference }
    }

    /// Snapshot `block` as the reference. `None` for a stale handle.
    pub fn of(arena: &BlockArena, block: BlockId) -> Option<Self> {
        arena.to_fragment(block).map(Self::new)
    }
}

impl BlockMatcher for EqualsBlockMatcher {
    fn matches(&self, arena: &BlockArena, block: BlockId) -> bool {
        arena.matches_fragment(block, &self.reference)
    }
}

/// Logical AND of several matchers, evaluated in order.
///
/// Evaluation stops at the first matcher that rejects the block. An empty
/// composite accepts everything.
#[derive(Default)]
pub struct CompositeBlockMatcher {
    matchers: Vec<Box<dyn BlockMatcher>>,
}

impl CompositeBlockMatcher {
    pub fn new(matchers: Vec<Box<dyn BlockMatcher>>) -> Self {
        Self { matchers }
    }

    pub fn push(&mut self, matcher: Box<dyn BlockMatcher>) {
        self.matchers.push(matcher);
    }

    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }
}

impl BlockMatcher for CompositeBlockMatcher {
    fn matches(&self, arena: &BlockArena, block: BlockId) -> bool {
        self.matchers.iter().all(|m| m.matches(arena, block))
    }
}

/// Matches metadata-carrying blocks that hold `key`, optionally with a
/// given value.
#[derive(Debug, Clone)]
pub struct MetadataBlockMatcher {
    key: String,
    value: Option<String>,
}

impl MetadataBlockMatcher {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: None,
        }
    }

    pub fn with_value(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: Some(value.into()),
        }
    }
}

impl BlockMatcher for MetadataBlockMatcher {
    fn matches(&self, arena: &BlockArena, block: BlockId) -> bool {
        let Some(metadata) = arena.kind(block).and_then(BlockKind::metadata) else {
            return false;
        };
        match (&self.value, metadata.get(&self.key)) {
            (_, None) => false,
            (None, Some(_)) => true,
            (Some(expected), Some(actual)) => expected == actual,
        }
    }
}

/// Matches macro markers whose macro id is in a set.
#[derive(Debug, Clone, Default)]
pub struct MacroMarkerBlockMatcher {
    ids: HashSet<String>,
}

impl MacroMarkerBlockMatcher {
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }
}

impl BlockMatcher for MacroMarkerBlockMatcher {
    fn matches(&self, arena: &BlockArena, block: BlockId) -> bool {
        match arena.kind(block) {
            Some(BlockKind::MacroMarker { id, .. }) => self.ids.contains(id),
            _ => false,
        }
    }
}
