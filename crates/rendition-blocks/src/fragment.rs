/*
 * fragment.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Owned, serializable form of a block subtree.
 */

//! Owned subtree values.
//!
//! A [`Fragment`] is a plain nested value describing a subtree: variant,
//! parameters and children. It has no identity and no links, which makes
//! it the exchange format at the edges of the arena: JSON documents, test
//! fixtures, and reference values for [`EqualsBlockMatcher`].
//!
//! ```json
//! {
//!   "kind": { "type": "paragraph" },
//!   "parameters": { "class": "lead" },
//!   "children": [ { "kind": { "type": "word", "text": "Hello" } } ]
//! }
//! ```
//!
//! [`EqualsBlockMatcher`]: crate::matcher::EqualsBlockMatcher

use serde::{Deserialize, Serialize};

use crate::arena::{BlockArena, BlockId};
use crate::block::{BlockKind, ParameterMap};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    pub kind: BlockKind,
    #[serde(default, skip_serializing_if = "ParameterMap::is_empty")]
    pub parameters: ParameterMap,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Fragment>,
}

impl Fragment {
    pub fn new(kind: BlockKind) -> Self {
        Self {
            kind,
            parameters: ParameterMap::new(),
            children: Vec::new(),
        }
    }

    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(name, value);
        self
    }

    pub fn with_child(mut self, child: Fragment) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = Fragment>) -> Self {
        self.children.extend(children);
        self
    }

    /// Number of blocks in this fragment, itself included.
    pub fn size(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(fragment) = stack.pop() {
            count += 1;
            stack.extend(fragment.children.iter());
        }
        count
    }
}

impl Drop for Fragment {
    fn drop(&mut self) {
        let mut stack = std::mem::take(&mut self.children);
        while let Some(mut fragment) = stack.pop() {
            stack.append(&mut fragment.children);
        }
    }
}

impl BlockArena {
    /// Materialize `fragment` as a new detached subtree and return its root.
    pub fn insert_fragment(&mut self, fragment: &Fragment) -> BlockId {
        let root = self.create_with_parameters(fragment.kind.clone(), fragment.parameters.clone());
        let mut stack: Vec<(&Fragment, BlockId)> = fragment
            .children
            .iter()
            .rev()
            .map(|child| (child, root))
            .collect();
        while let Some((current, parent)) = stack.pop() {
            let id = self.create_with_parameters(current.kind.clone(), current.parameters.clone());
            self.append_fresh(parent, id);
            stack.extend(current.children.iter().rev().map(|child| (child, id)));
        }
        root
    }

    /// Snapshot the subtree rooted at `id`. `None` for a stale handle.
    pub fn to_fragment(&self, id: BlockId) -> Option<Fragment> {
        let shallow = |block: &crate::block::Block| Fragment {
            kind: block.kind().clone(),
            parameters: block.parameters().clone(),
            children: Vec::new(),
        };

        let block = self.get(id)?;
        let mut stack = vec![(shallow(block), block.children().iter())];
        loop {
            let (_, pending) = stack.last_mut()?;
            if let Some(&child) = pending.next() {
                if let Some(child) = self.get(child) {
                    stack.push((shallow(child), child.children().iter()));
                }
                continue;
            }
            let (done, _) = stack.pop()?;
            match stack.last_mut() {
                Some((parent, _)) => parent.children.push(done),
                None => return Some(done),
            }
        }
    }

    /// Structural equality between the subtree at `id` and `fragment`.
    pub fn matches_fragment(&self, id: BlockId, fragment: &Fragment) -> bool {
        let mut stack = vec![(id, fragment)];
        while let Some((block, expected)) = stack.pop() {
            let Some(actual) = self.get(block) else {
                return false;
            };
            if actual.kind() != &expected.kind
                || actual.parameters() != &expected.parameters
                || actual.children().len() != expected.children.len()
            {
                return false;
            }
            stack.extend(
                actual
                    .children()
                    .iter()
                    .copied()
                    .zip(expected.children.iter()),
            );
        }
        true
    }
}
