/*
 * navigator.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Axis-based navigation over the block tree.
 */

//! Axis-based navigation.
//!
//! Axes follow the XPath model. Every axis is exposed as one lazy iterator
//! ([`BlockArena::axis_iter`]); [`BlockArena::get_blocks`] collects the
//! matching blocks and [`BlockArena::get_first_block`] stops at the first
//! one. Both read the same iterator, so the first block is always the head
//! of the full list.
//!
//! Orders:
//!
//! | axis | order |
//! |---|---|
//! | `ancestor`, `ancestor-or-self` | nearest first |
//! | `child` | child order |
//! | `descendant`, `descendant-or-self` | pre-order |
//! | `following-sibling`, `preceding-sibling` | the single adjacent sibling |
//! | `following` | document order after the block, its descendants excluded |
//! | `preceding` | reverse document order before the block, its ancestors excluded |

use std::iter;
use std::str::FromStr;

use crate::arena::{BlockArena, BlockId};
use crate::matcher::BlockMatcher;

/// Traversal direction relative to a starting block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axes {
    Self_,
    Parent,
    Ancestor,
    AncestorOrSelf,
    Child,
    Descendant,
    DescendantOrSelf,
    FollowingSibling,
    Following,
    PrecedingSibling,
    Preceding,
}

impl Axes {
    pub const ALL: [Axes; 11] = [
        Axes::Self_,
        Axes::Parent,
        Axes::Ancestor,
        Axes::AncestorOrSelf,
        Axes::Child,
        Axes::Descendant,
        Axes::DescendantOrSelf,
        Axes::FollowingSibling,
        Axes::Following,
        Axes::PrecedingSibling,
        Axes::Preceding,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Axes::Self_ => "self",
            Axes::Parent => "parent",
            Axes::Ancestor => "ancestor",
            Axes::AncestorOrSelf => "ancestor-or-self",
            Axes::Child => "child",
            Axes::Descendant => "descendant",
            Axes::DescendantOrSelf => "descendant-or-self",
            Axes::FollowingSibling => "following-sibling",
            Axes::Following => "following",
            Axes::PrecedingSibling => "preceding-sibling",
            Axes::Preceding => "preceding",
        }
    }
}

impl std::fmt::Display for Axes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Axes {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Axes::ALL
            .into_iter()
            .find(|axes| axes.as_str() == s)
            .ok_or_else(|| format!("Unknown axis: {}", s))
    }
}

/// Pre-order walk of a subtree (the root first).
pub struct PreOrder<'a> {
    arena: &'a BlockArena,
    stack: Vec<BlockId>,
}

impl Iterator for PreOrder<'_> {
    type Item = BlockId;

    fn next(&mut self) -> Option<BlockId> {
        let current = self.stack.pop()?;
        self.stack
            .extend(self.arena.children(current).iter().rev().copied());
        Some(current)
    }
}

/// Reverse document order of a subtree: last descendant first, the root
/// last.
pub struct ReversePreOrder<'a> {
    arena: &'a BlockArena,
    stack: Vec<(BlockId, bool)>,
}

impl Iterator for ReversePreOrder<'_> {
    type Item = BlockId;

    fn next(&mut self) -> Option<BlockId> {
        loop {
            let (current, expanded) = self.stack.pop()?;
            if expanded {
                return Some(current);
            }
            self.stack.push((current, true));
            self.stack.extend(
                self.arena
                    .children(current)
                    .iter()
                    .map(|&child| (child, false)),
            );
        }
    }
}

impl BlockArena {
    /// Pre-order walk of the subtree rooted at `root`, `root` included.
    pub fn pre_order(&self, root: BlockId) -> PreOrder<'_> {
        let stack = if self.contains(root) {
            vec![root]
        } else {
            Vec::new()
        };
        PreOrder { arena: self, stack }
    }

    /// Reverse document order of the subtree rooted at `root`.
    pub fn reverse_pre_order(&self, root: BlockId) -> ReversePreOrder<'_> {
        let stack = if self.contains(root) {
            vec![(root, false)]
        } else {
            Vec::new()
        };
        ReversePreOrder { arena: self, stack }
    }

    /// Every block on `axes` relative to `start`, in axis order.
    ///
    /// A stale `start` yields nothing.
    pub fn axis_iter(&self, start: BlockId, axes: Axes) -> Box<dyn Iterator<Item = BlockId> + '_> {
        if !self.contains(start) {
            return Box::new(iter::empty());
        }
        match axes {
            Axes::Self_ => Box::new(iter::once(start)),
            Axes::Parent => Box::new(self.parent(start).into_iter()),
            Axes::Ancestor => Box::new(iter::successors(self.parent(start), move |&b| {
                self.parent(b)
            })),
            Axes::AncestorOrSelf => {
                Box::new(iter::successors(Some(start), move |&b| self.parent(b)))
            }
            Axes::Child => Box::new(self.children(start).iter().copied()),
            Axes::Descendant => Box::new(self.pre_order(start).skip(1)),
            Axes::DescendantOrSelf => Box::new(self.pre_order(start)),
            Axes::FollowingSibling => Box::new(self.next_sibling(start).into_iter()),
            Axes::PrecedingSibling => Box::new(self.previous_sibling(start).into_iter()),
            Axes::Following => Box::new(
                iter::successors(Some(start), move |&b| self.parent(b))
                    .flat_map(move |b| {
                        iter::successors(self.next_sibling(b), move |&s| self.next_sibling(s))
                    })
                    .flat_map(move |s| self.pre_order(s)),
            ),
            Axes::Preceding => Box::new(
                iter::successors(Some(start), move |&b| self.parent(b))
                    .flat_map(move |b| {
                        iter::successors(self.previous_sibling(b), move |&s| {
                            self.previous_sibling(s)
                        })
                    })
                    .flat_map(move |s| self.reverse_pre_order(s)),
            ),
        }
    }

    /// All blocks on `axes` accepted by `matcher`, in axis order.
    pub fn get_blocks<M>(&self, start: BlockId, matcher: &M, axes: Axes) -> Vec<BlockId>
    where
        M: BlockMatcher + ?Sized,
    {
        self.axis_iter(start, axes)
            .filter(|&b| matcher.matches(self, b))
            .collect()
    }

    /// First block on `axes` accepted by `matcher`.
    pub fn get_first_block<M>(&self, start: BlockId, matcher: &M, axes: Axes) -> Option<BlockId>
    where
        M: BlockMatcher + ?Sized,
    {
        self.axis_iter(start, axes)
            .find(|&b| matcher.matches(self, b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{BlockKind, BlockType};
    use crate::matcher::{AnyBlockMatcher, ClassBlockMatcher};

    /// Builds
    ///
    /// ```text
    /// root
    /// ├── p1
    /// │   ├── a
    /// │   └── b
    /// ├── p2
    /// │   ├── c
    /// │   └── g
    /// │       └── d
    /// └── p3
    ///     └── e
    /// ```
    struct Fixture {
        arena: BlockArena,
        root: BlockId,
        p1: BlockId,
        p2: BlockId,
        p3: BlockId,
        a: BlockId,
        b: BlockId,
        c: BlockId,
        g: BlockId,
        d: BlockId,
        e: BlockId,
    }

    fn fixture() -> Fixture {
        let mut arena = BlockArena::new();
        let root = arena.create(BlockKind::xdom());
        let p1 = arena.create(BlockKind::Paragraph);
        let p2 = arena.create(BlockKind::Paragraph);
        let p3 = arena.create(BlockKind::Paragraph);
        let a = arena.create(BlockKind::word("a"));
        let b = arena.create(BlockKind::word("b"));
        let c = arena.create(BlockKind::word("c"));
        let g = arena.create(BlockKind::Group);
        let d = arena.create(BlockKind::word("d"));
        let e = arena.create(BlockKind::word("e"));
        arena.add_children(root, &[p1, p2, p3]).unwrap();
        arena.add_children(p1, &[a, b]).unwrap();
        arena.add_children(p2, &[c, g]).unwrap();
        arena.add_child(g, d).unwrap();
        arena.add_child(p3, e).unwrap();
        Fixture {
            arena,
            root,
            p1,
            p2,
            p3,
            a,
            b,
            c,
            g,
            d,
            e,
        }
    }

    #[test]
    fn test_self_and_parent() {
        let f = fixture();
        let any = AnyBlockMatcher;
        assert_eq!(f.arena.get_blocks(f.c, &any, Axes::Self_), vec![f.c]);
        assert_eq!(f.arena.get_blocks(f.c, &any, Axes::Parent), vec![f.p2]);
        assert!(f.arena.get_blocks(f.root, &any, Axes::Parent).is_empty());
    }

    #[test]
    fn test_ancestor_axes() {
        let f = fixture();
        let any = AnyBlockMatcher;
        assert_eq!(
            f.arena.get_blocks(f.d, &any, Axes::Ancestor),
            vec![f.g, f.p2, f.root]
        );
        assert_eq!(
            f.arena.get_blocks(f.d, &any, Axes::AncestorOrSelf),
            vec![f.d, f.g, f.p2, f.root]
        );
    }

    #[test]
    fn test_child_and_descendant_axes() {
        let f = fixture();
        let any = AnyBlockMatcher;
        assert_eq!(
            f.arena.get_blocks(f.root, &any, Axes::Child),
            vec![f.p1, f.p2, f.p3]
        );
        assert_eq!(
            f.arena.get_blocks(f.p2, &any, Axes::Descendant),
            vec![f.c, f.g, f.d]
        );

        let all = f.arena.get_blocks(f.root, &any, Axes::DescendantOrSelf);
        assert_eq!(
            all,
            vec![f.root, f.p1, f.a, f.b, f.p2, f.c, f.g, f.d, f.p3, f.e]
        );
        assert_eq!(all.len(), f.arena.len());
    }

    #[test]
    fn test_sibling_axes() {
        let f = fixture();
        let any = AnyBlockMatcher;
        assert_eq!(
            f.arena.get_blocks(f.p1, &any, Axes::FollowingSibling),
            vec![f.p2]
        );
        assert_eq!(
            f.arena.get_blocks(f.p3, &any, Axes::PrecedingSibling),
            vec![f.p2]
        );
        assert!(
            f.arena
                .get_blocks(f.p3, &any, Axes::FollowingSibling)
                .is_empty()
        );
    }

    #[test]
    fn test_following_axis() {
        let f = fixture();
        let any = AnyBlockMatcher;
        assert_eq!(
            f.arena.get_blocks(f.a, &any, Axes::Following),
            vec![f.b, f.p2, f.c, f.g, f.d, f.p3, f.e]
        );
        // Descendants of the start block are not "following".
        assert_eq!(
            f.arena.get_blocks(f.p2, &any, Axes::Following),
            vec![f.p3, f.e]
        );
    }

    #[test]
    fn test_preceding_axis() {
        let f = fixture();
        let any = AnyBlockMatcher;
        // Ancestors (g, p2, root) are not "preceding".
        assert_eq!(
            f.arena.get_blocks(f.d, &any, Axes::Preceding),
            vec![f.c, f.b, f.a, f.p1]
        );
        assert_eq!(
            f.arena.get_blocks(f.e, &any, Axes::Preceding),
            vec![f.d, f.g, f.c, f.p2, f.b, f.a, f.p1]
        );
    }

    #[test]
    fn test_first_block_matches_head_of_list_on_every_axis() {
        let f = fixture();
        let words = ClassBlockMatcher::new(BlockType::Word);
        let any = AnyBlockMatcher;
        for start in [f.root, f.p1, f.p2, f.p3, f.a, f.b, f.c, f.g, f.d, f.e] {
            for axes in Axes::ALL {
                let all = f.arena.get_blocks(start, &words, axes);
                assert_eq!(
                    f.arena.get_first_block(start, &words, axes),
                    all.first().copied(),
                    "axis {} from {}",
                    axes,
                    start
                );
                let all = f.arena.get_blocks(start, &any, axes);
                assert_eq!(
                    f.arena.get_first_block(start, &any, axes),
                    all.first().copied()
                );
            }
        }
    }

    #[test]
    fn test_no_match_is_empty_not_error() {
        let f = fixture();
        let headers = ClassBlockMatcher::new(BlockType::Header);
        assert!(
            f.arena
                .get_blocks(f.root, &headers, Axes::DescendantOrSelf)
                .is_empty()
        );
        assert_eq!(
            f.arena
                .get_first_block(f.root, &headers, Axes::DescendantOrSelf),
            None
        );
    }

    #[test]
    fn test_stale_start_yields_nothing() {
        let mut f = fixture();
        f.arena.destroy(f.p3).unwrap();
        assert!(
            f.arena
                .get_blocks(f.e, &AnyBlockMatcher, Axes::AncestorOrSelf)
                .is_empty()
        );
    }

    #[test]
    fn test_axes_names_round_trip() {
        for axes in Axes::ALL {
            assert_eq!(axes.as_str().parse::<Axes>(), Ok(axes));
        }
        assert!("sideways".parse::<Axes>().is_err());
    }
}
