/*
 * arena.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Slab that owns every Block and maintains the tree links.
 */

//! Block arena.
//!
//! [`BlockArena`] owns every block. Blocks are addressed by [`BlockId`]
//! handles; parent, sibling and child relations are handles too, so a
//! detached block can never dangle. The arena keeps three invariants across
//! every structural edit:
//!
//! - a block has at most one parent, and is listed exactly once in that
//!   parent's children;
//! - `previous`/`next` sibling links always agree with the parent's child
//!   order;
//! - a block is never its own ancestor.
//!
//! Detaching a block (remove, replace, re-parenting, `set_children`) always
//! clears its parent and both sibling links. Detached blocks stay alive
//! until [`BlockArena::destroy`] frees them.
//!
//! All walks use explicit stacks so that very deep trees cannot exhaust the
//! call stack.

use crate::block::{Block, BlockKind, BlockType, ParameterMap};
use crate::error::BlockError;

/// Handle to a block stored in a [`BlockArena`].
///
/// Handles carry a generation, so a handle to a destroyed block stays
/// invalid even after its slot is reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId {
    index: u32,
    generation: u32,
}

impl BlockId {
    pub fn index(self) -> usize {
        self.index as usize
    }
}

impl std::fmt::Display for BlockId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.index)?;
        if self.generation > 0 {
            write!(f, "v{}", self.generation)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
struct Slot {
    generation: u32,
    block: Option<Block>,
}

/// Owner of every block of one or more trees.
#[derive(Debug, Clone, Default)]
pub struct BlockArena {
    slots: Vec<Slot>,
    free: Vec<u32>,
    live: usize,
}

type BlockResult<T> = Result<T, BlockError>;

impl BlockArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live blocks, attached or not.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    pub fn contains(&self, id: BlockId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: BlockId) -> Option<&Block> {
        self.slots
            .get(id.index())
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.block.as_ref())
    }

    /// Mutable access to a block's payload and parameters.
    ///
    /// Tree links are not reachable through this reference.
    pub fn get_mut(&mut self, id: BlockId) -> Option<&mut Block> {
        self.slots
            .get_mut(id.index())
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.block.as_mut())
    }

    fn node(&self, id: BlockId) -> BlockResult<&Block> {
        self.get(id).ok_or(BlockError::UnknownBlock(id))
    }

    fn node_mut(&mut self, id: BlockId) -> BlockResult<&mut Block> {
        self.get_mut(id).ok_or(BlockError::UnknownBlock(id))
    }

    /// Create a detached block.
    pub fn create(&mut self, kind: BlockKind) -> BlockId {
        self.alloc(Block::new(kind, ParameterMap::new()))
    }

    /// Create a detached block with parameters.
    pub fn create_with_parameters(
        &mut self,
        kind: BlockKind,
        parameters: ParameterMap,
    ) -> BlockId {
        self.alloc(Block::new(kind, parameters))
    }

    fn alloc(&mut self, block: Block) -> BlockId {
        self.live += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.block = Some(block);
            return BlockId {
                index,
                generation: slot.generation,
            };
        }
        let index = u32::try_from(self.slots.len()).expect("block arena exceeded u32::MAX slots");
        self.slots.push(Slot {
            generation: 0,
            block: Some(block),
        });
        BlockId {
            index,
            generation: 0,
        }
    }

    pub fn kind(&self, id: BlockId) -> Option<&BlockKind> {
        self.get(id).map(Block::kind)
    }

    pub fn block_type(&self, id: BlockId) -> Option<BlockType> {
        self.get(id).map(Block::block_type)
    }

    pub fn parent(&self, id: BlockId) -> Option<BlockId> {
        self.get(id).and_then(|b| b.parent)
    }

    pub fn previous_sibling(&self, id: BlockId) -> Option<BlockId> {
        self.get(id).and_then(|b| b.previous)
    }

    pub fn next_sibling(&self, id: BlockId) -> Option<BlockId> {
        self.get(id).and_then(|b| b.next)
    }

    /// Direct children in order; empty for a stale handle.
    pub fn children(&self, id: BlockId) -> &[BlockId] {
        self.get(id).map(Block::children).unwrap_or(&[])
    }

    pub fn parameter(&self, id: BlockId, name: &str) -> Option<&str> {
        self.get(id).and_then(|b| b.parameter(name))
    }

    pub fn set_parameter(
        &mut self,
        id: BlockId,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> BlockResult<()> {
        self.node_mut(id)?.set_parameter(name, value);
        Ok(())
    }

    /// Topmost ancestor of `id` (itself when detached).
    pub fn root_of(&self, id: BlockId) -> BlockId {
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            current = parent;
        }
        current
    }

    /// Whether `ancestor` is `id` or one of its ancestors.
    pub fn is_ancestor_or_self(&self, ancestor: BlockId, id: BlockId) -> bool {
        let mut current = Some(id);
        while let Some(b) = current {
            if b == ancestor {
                return true;
            }
            current = self.parent(b);
        }
        false
    }

    fn position_in_parent(&self, parent: BlockId, child: BlockId) -> BlockResult<usize> {
        self.node(parent)?
            .children
            .iter()
            .position(|&c| c == child)
            .ok_or(BlockError::NotAChild {
                parent,
                block: child,
            })
    }

    /// Validate a sequence about to be inserted under `parent`.
    fn check_insertable(&self, parent: BlockId, blocks: &[BlockId]) -> BlockResult<()> {
        self.node(parent)?;
        for (i, &block) in blocks.iter().enumerate() {
            let node = self.node(block)?;
            // A leaf can only be an ancestor of `parent` by being `parent`.
            let cycle = if node.children.is_empty() {
                block == parent
            } else {
                self.is_ancestor_or_self(block, parent)
            };
            if cycle {
                return Err(BlockError::WouldCreateCycle {
                    parent,
                    child: block,
                });
            }
            if blocks[..i].contains(&block) {
                return Err(BlockError::DuplicateBlock(block));
            }
        }
        Ok(())
    }

    /// Recompute sibling links for children `start..end` of `parent`.
    /// Callers widen the range by one on each side to cover neighbours.
    fn relink(&mut self, parent: BlockId, start: usize, end: usize) {
        let Some(node) = self.get(parent) else {
            return;
        };
        let len = node.children.len();
        let end = end.min(len);
        if start >= end {
            return;
        }
        let lo = start.saturating_sub(1);
        let hi = (end + 1).min(len);
        let window = node.children[lo..hi].to_vec();
        for i in start..end {
            let w = i - lo;
            let previous = if i > 0 { Some(window[w - 1]) } else { None };
            let next = window.get(w + 1).copied();
            if let Some(block) = self.get_mut(window[w]) {
                block.previous = previous;
                block.next = next;
            }
        }
    }

    /// Insert already-validated, detached blocks at `position`.
    fn splice_in(
        &mut self,
        parent: BlockId,
        position: usize,
        blocks: &[BlockId],
    ) -> BlockResult<()> {
        let node = self.node_mut(parent)?;
        let tail = node.children.split_off(position);
        node.children.extend_from_slice(blocks);
        node.children.extend(tail);
        for &block in blocks {
            self.node_mut(block)?.parent = Some(parent);
        }
        self.relink(parent, position.saturating_sub(1), position + blocks.len() + 1);
        Ok(())
    }

    /// Append a block just created by this arena as the last child of
    /// `parent`. Both handles must be live and `child` must be detached.
    pub(crate) fn append_fresh(&mut self, parent: BlockId, child: BlockId) {
        let Some(node) = self.get_mut(parent) else {
            return;
        };
        let previous = node.children.last().copied();
        node.children.push(child);
        if let Some(sibling) = previous.and_then(|p| self.get_mut(p)) {
            sibling.next = Some(child);
        }
        if let Some(block) = self.get_mut(child) {
            block.parent = Some(parent);
            block.previous = previous;
            block.next = None;
        }
    }

    /// Detach `id` from its parent, if any.
    ///
    /// Clears the parent and both sibling links and relinks the former
    /// neighbours to each other.
    pub fn detach(&mut self, id: BlockId) -> BlockResult<()> {
        let parent = self.node(id)?.parent;
        if let Some(parent) = parent {
            let position = self.position_in_parent(parent, id)?;
            self.node_mut(parent)?.children.remove(position);
            self.relink(parent, position.saturating_sub(1), position + 1);
        }
        self.node_mut(id)?.clear_links();
        Ok(())
    }

    fn detach_all(&mut self, blocks: &[BlockId]) -> BlockResult<()> {
        for &block in blocks {
            self.detach(block)?;
        }
        Ok(())
    }

    /// Append `child` as the last child of `parent`.
    ///
    /// A child that is attached elsewhere is moved. Inserting a block that
    /// has children walks the ancestors of `parent` to rule out a cycle, so
    /// it costs O(depth of `parent`).
    pub fn add_child(&mut self, parent: BlockId, child: BlockId) -> BlockResult<()> {
        self.add_children(parent, &[child])
    }

    /// Append `children` in order. No-op for an empty slice.
    pub fn add_children(&mut self, parent: BlockId, children: &[BlockId]) -> BlockResult<()> {
        if children.is_empty() {
            return Ok(());
        }
        self.check_insertable(parent, children)?;
        self.detach_all(children)?;
        let position = self.node(parent)?.children.len();
        self.splice_in(parent, position, children)
    }

    /// Replace all children of `parent`. An empty slice clears them.
    ///
    /// Previous children that are not part of `children` end up detached.
    pub fn set_children(&mut self, parent: BlockId, children: &[BlockId]) -> BlockResult<()> {
        self.check_insertable(parent, children)?;
        self.detach_all(children)?;
        let previous = std::mem::take(&mut self.node_mut(parent)?.children);
        for old in previous {
            if let Some(block) = self.get_mut(old) {
                block.clear_links();
            }
        }
        self.splice_in(parent, 0, children)
    }

    /// Insert `child` right before `anchor`, or append when `anchor` is
    /// `None`.
    pub fn insert_child_before(
        &mut self,
        parent: BlockId,
        child: BlockId,
        anchor: Option<BlockId>,
    ) -> BlockResult<()> {
        let Some(anchor) = anchor else {
            return self.add_child(parent, child);
        };
        self.check_insertable(parent, &[child])?;
        self.position_in_parent(parent, anchor)?;
        if anchor == child {
            return Ok(());
        }
        self.detach(child)?;
        let position = self.position_in_parent(parent, anchor)?;
        self.splice_in(parent, position, &[child])
    }

    /// Insert `child` right after `anchor`.
    pub fn insert_child_after(
        &mut self,
        parent: BlockId,
        child: BlockId,
        anchor: BlockId,
    ) -> BlockResult<()> {
        self.check_insertable(parent, &[child])?;
        self.position_in_parent(parent, anchor)?;
        if anchor == child {
            return Ok(());
        }
        self.detach(child)?;
        let position = self.position_in_parent(parent, anchor)?;
        self.splice_in(parent, position + 1, &[child])
    }

    /// Splice `new_blocks` in place of the direct child `old`.
    ///
    /// `old` is detached. Its former neighbours are linked to the first and
    /// last inserted block, or to each other when `new_blocks` is empty.
    pub fn replace_child(
        &mut self,
        parent: BlockId,
        new_blocks: &[BlockId],
        old: BlockId,
    ) -> BlockResult<()> {
        self.position_in_parent(parent, old)?;
        self.check_insertable(parent, new_blocks)?;
        for &block in new_blocks.iter().filter(|&&b| b != old) {
            self.detach(block)?;
        }
        let position = self.position_in_parent(parent, old)?;
        self.node_mut(parent)?.children.remove(position);
        self.node_mut(old)?.clear_links();
        self.splice_in(parent, position, new_blocks)
    }

    /// Remove the direct child `child` from `parent`.
    pub fn remove_child(&mut self, parent: BlockId, child: BlockId) -> BlockResult<()> {
        self.position_in_parent(parent, child)?;
        self.detach(child)
    }

    /// Detach `id` and free it together with its whole subtree.
    pub fn destroy(&mut self, id: BlockId) -> BlockResult<()> {
        self.detach(id)?;
        self.free_subtree(id);
        Ok(())
    }

    /// Free `id` and its descendants. Links from outside the subtree are
    /// left as they are.
    fn free_subtree(&mut self, id: BlockId) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(slot) = self.slots.get_mut(current.index()) else {
                continue;
            };
            if slot.generation != current.generation {
                continue;
            }
            if let Some(block) = slot.block.take() {
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(current.index);
                self.live -= 1;
                stack.extend(block.children);
            }
        }
    }

    /// Free the detached copies left behind by an aborted clone.
    fn discard_copies(&mut self, copies: &[BlockId]) {
        for &copy in copies {
            if self.get(copy).is_some_and(|b| b.parent.is_none()) {
                self.free_subtree(copy);
            }
        }
    }

    fn shallow_copy(&mut self, id: BlockId) -> BlockResult<BlockId> {
        let block = self.node(id)?;
        let copy = Block::new(block.kind().clone(), block.parameters().clone());
        Ok(self.alloc(copy))
    }

    /// Deep copy of the subtree rooted at `id`, returned detached.
    ///
    /// The copy is structurally equal to the original and shares nothing
    /// with it.
    pub fn clone_block(&mut self, id: BlockId) -> BlockResult<BlockId> {
        self.clone_subtree(id, None)
    }

    /// Deep copy with a filter applied to every cloned descendant.
    ///
    /// Children are cloned first (post-order); the filter then receives the
    /// detached clone of each child and returns the blocks to put in its
    /// place. Returning an empty vector collapses the child: its own
    /// (already filtered) children are spliced into the parent instead.
    /// The clone of the root itself is never filtered.
    ///
    /// On error every copy made so far is freed. Blocks the filter created
    /// and returned in place of a child are left to the caller.
    pub fn clone_filtered<F>(&mut self, id: BlockId, mut filter: F) -> BlockResult<BlockId>
    where
        F: FnMut(&mut BlockArena, BlockId) -> Vec<BlockId>,
    {
        self.clone_subtree(id, Some(&mut filter))
    }

    fn clone_subtree(
        &mut self,
        id: BlockId,
        mut filter: Option<&mut dyn FnMut(&mut BlockArena, BlockId) -> Vec<BlockId>>,
    ) -> BlockResult<BlockId> {
        struct Frame {
            copy: BlockId,
            pending: std::vec::IntoIter<BlockId>,
        }

        let root_copy = self.shallow_copy(id)?;
        let mut stack = vec![Frame {
            copy: root_copy,
            pending: self.children(id).to_vec().into_iter(),
        }];

        while let Some(frame) = stack.last_mut() {
            if let Some(child) = frame.pending.next() {
                let copy = match self.shallow_copy(child) {
                    Ok(copy) => copy,
                    Err(error) => {
                        let copies: Vec<BlockId> = stack.iter().map(|f| f.copy).collect();
                        self.discard_copies(&copies);
                        return Err(error);
                    }
                };
                let pending = self.children(child).to_vec().into_iter();
                stack.push(Frame { copy, pending });
                continue;
            }

            let Some(finished) = stack.pop() else {
                break;
            };
            let Some(parent_copy) = stack.last().map(|f| f.copy) else {
                return Ok(finished.copy);
            };

            let replacement = match filter.as_deref_mut() {
                Some(filter) => {
                    let filtered = filter(self, finished.copy);
                    if filtered.is_empty() {
                        self.children(finished.copy).to_vec()
                    } else {
                        filtered
                    }
                }
                None => vec![finished.copy],
            };
            if let Err(error) = self.add_children(parent_copy, &replacement) {
                let copies: Vec<BlockId> = stack
                    .iter()
                    .map(|f| f.copy)
                    .chain([finished.copy])
                    .collect();
                self.discard_copies(&copies);
                return Err(error);
            }

            let orphaned = self
                .get(finished.copy)
                .is_some_and(|b| b.parent.is_none());
            if orphaned && !replacement.contains(&finished.copy) {
                self.free_subtree(finished.copy);
            }
        }

        Ok(root_copy)
    }

    /// Recursive structural equality: payload, parameters and children in
    /// order. Stale handles are never equal.
    pub fn structurally_eq(&self, a: BlockId, b: BlockId) -> bool {
        let mut stack = vec![(a, b)];
        while let Some((x, y)) = stack.pop() {
            let (Some(bx), Some(by)) = (self.get(x), self.get(y)) else {
                return false;
            };
            if bx.kind() != by.kind()
                || bx.parameters() != by.parameters()
                || bx.children.len() != by.children.len()
            {
                return false;
            }
            stack.extend(bx.children.iter().copied().zip(by.children.iter().copied()));
        }
        true
    }

    /// Pre-order position of `target` in the subtree rooted at `root`
    /// (`root` itself is position 0). `None` when `target` is not in it.
    pub fn index_of(&self, root: BlockId, target: BlockId) -> Option<usize> {
        self.pre_order(root).position(|b| b == target)
    }

    /// Concatenated text of the words, spaces and symbols under `id`.
    pub fn plain_text(&self, id: BlockId) -> String {
        let mut text = String::new();
        for block in self.pre_order(id) {
            match self.kind(block) {
                Some(BlockKind::Word { text: word }) => text.push_str(word),
                Some(BlockKind::Space) => text.push(' '),
                Some(BlockKind::SpecialSymbol { symbol }) => text.push(*symbol),
                Some(BlockKind::NewLine) => text.push('\n'),
                _ => {}
            }
        }
        text
    }
}

impl std::ops::Index<BlockId> for BlockArena {
    type Output = Block;

    /// # Panics
    ///
    /// Panics if `id` is stale.
    fn index(&self, id: BlockId) -> &Block {
        match self.get(id) {
            Some(block) => block,
            None => panic!("stale block handle {}", id),
        }
    }
}

impl std::ops::IndexMut<BlockId> for BlockArena {
    fn index_mut(&mut self, id: BlockId) -> &mut Block {
        match self.get_mut(id) {
            Some(block) => block,
            None => panic!("stale block handle {}", id),
        }
    }
}
