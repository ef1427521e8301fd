/*
 * sibling_chain.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Property-based tests for tree link consistency.
 *
 * A fixed pool of blocks is edited by random sequences of structural
 * operations. After every step:
 * 1. parent, sibling and child links agree with each other
 * 2. no block is listed twice or is its own ancestor
 * 3. a failed operation left every link untouched
 */

use proptest::prelude::*;
use rendition_blocks::{BlockArena, BlockId, BlockKind};

const POOL: usize = 10;

#[derive(Debug, Clone)]
enum Op {
    Add(usize, usize),
    AddMany(usize, Vec<usize>),
    Set(usize, Vec<usize>),
    InsertBefore(usize, usize, Option<usize>),
    InsertAfter(usize, usize, usize),
    Replace(usize, Vec<usize>, usize),
    Remove(usize, usize),
    Detach(usize),
}

fn gen_index() -> impl Strategy<Value = usize> {
    0..POOL
}

fn gen_indices() -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(gen_index(), 0..4)
}

fn gen_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (gen_index(), gen_index()).prop_map(|(p, c)| Op::Add(p, c)),
        1 => (gen_index(), gen_indices()).prop_map(|(p, cs)| Op::AddMany(p, cs)),
        1 => (gen_index(), gen_indices()).prop_map(|(p, cs)| Op::Set(p, cs)),
        2 => (gen_index(), gen_index(), prop::option::of(gen_index()))
            .prop_map(|(p, c, a)| Op::InsertBefore(p, c, a)),
        2 => (gen_index(), gen_index(), gen_index()).prop_map(|(p, c, a)| Op::InsertAfter(p, c, a)),
        2 => (gen_index(), gen_indices(), gen_index()).prop_map(|(p, n, o)| Op::Replace(p, n, o)),
        2 => (gen_index(), gen_index()).prop_map(|(p, c)| Op::Remove(p, c)),
        1 => gen_index().prop_map(Op::Detach),
    ]
}

type Links = Vec<(Option<BlockId>, Option<BlockId>, Option<BlockId>, Vec<BlockId>)>;

fn snapshot(arena: &BlockArena, pool: &[BlockId]) -> Links {
    pool.iter()
        .map(|&b| {
            (
                arena.parent(b),
                arena.previous_sibling(b),
                arena.next_sibling(b),
                arena.children(b).to_vec(),
            )
        })
        .collect()
}

fn apply(arena: &mut BlockArena, pool: &[BlockId], op: &Op) -> bool {
    let ids = |xs: &[usize]| xs.iter().map(|&i| pool[i]).collect::<Vec<_>>();
    let result = match op {
        Op::Add(p, c) => arena.add_child(pool[*p], pool[*c]),
        Op::AddMany(p, cs) => arena.add_children(pool[*p], &ids(cs)),
        Op::Set(p, cs) => arena.set_children(pool[*p], &ids(cs)),
        Op::InsertBefore(p, c, a) => {
            arena.insert_child_before(pool[*p], pool[*c], a.map(|a| pool[a]))
        }
        Op::InsertAfter(p, c, a) => arena.insert_child_after(pool[*p], pool[*c], pool[*a]),
        Op::Replace(p, n, o) => arena.replace_child(pool[*p], &ids(n), pool[*o]),
        Op::Remove(p, c) => arena.remove_child(pool[*p], pool[*c]),
        Op::Detach(b) => arena.detach(pool[*b]),
    };
    result.is_ok()
}

fn check_links(arena: &BlockArena, pool: &[BlockId]) -> Result<(), TestCaseError> {
    let mut listed = std::collections::HashSet::new();
    for &parent in pool {
        let children = arena.children(parent);
        for (i, &child) in children.iter().enumerate() {
            prop_assert!(listed.insert(child), "{child} listed twice");
            prop_assert_eq!(arena.parent(child), Some(parent));
            let previous = i.checked_sub(1).map(|j| children[j]);
            prop_assert_eq!(arena.previous_sibling(child), previous);
            prop_assert_eq!(arena.next_sibling(child), children.get(i + 1).copied());
        }
    }
    for &block in pool {
        match arena.parent(block) {
            Some(parent) => prop_assert!(arena.children(parent).contains(&block)),
            None => {
                prop_assert_eq!(arena.previous_sibling(block), None);
                prop_assert_eq!(arena.next_sibling(block), None);
            }
        }
        let mut depth = 0;
        let mut current = block;
        while let Some(parent) = arena.parent(current) {
            prop_assert_ne!(parent, block, "{} is its own ancestor", block);
            depth += 1;
            prop_assert!(depth <= POOL);
            current = parent;
        }
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn test_links_stay_consistent(ops in prop::collection::vec(gen_op(), 1..40)) {
        let mut arena = BlockArena::new();
        let pool: Vec<BlockId> = (0..POOL).map(|_| arena.create(BlockKind::Group)).collect();

        for op in &ops {
            let before = snapshot(&arena, &pool);
            if !apply(&mut arena, &pool, op) {
                prop_assert_eq!(&snapshot(&arena, &pool), &before, "failed {:?} changed links", op);
            }
            check_links(&arena, &pool)?;
        }
        prop_assert_eq!(arena.len(), POOL);
    }

    #[test]
    fn test_clone_equals_original(
        ops in prop::collection::vec(gen_op(), 1..30),
        root in gen_index(),
    ) {
        let mut arena = BlockArena::new();
        let pool: Vec<BlockId> = (0..POOL).map(|_| arena.create(BlockKind::Group)).collect();
        for op in &ops {
            apply(&mut arena, &pool, op);
        }

        let copy = arena.clone_block(pool[root]).unwrap();
        prop_assert!(arena.structurally_eq(copy, pool[root]));
        prop_assert_eq!(arena.parent(copy), None);
        prop_assert_eq!(
            arena.pre_order(copy).count(),
            arena.pre_order(pool[root]).count()
        );
    }
}
