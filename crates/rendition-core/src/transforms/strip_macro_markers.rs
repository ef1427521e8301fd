/*
 * strip_macro_markers.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Transform that removes macro markers and keeps their content.
 */

use rendition_blocks::{BlockArena, BlockId, BlockMatcher, BlockType, MacroMarkerBlockMatcher};

use crate::context::TransformationContext;
use crate::error::TransformationError;
use crate::rendering::RenderingContext;
use crate::transformation::Transformation;

/// Transform that replaces macro markers with the blocks they wrap.
///
/// The subtree is rebuilt with a filtered clone: every marker collapses
/// into its children, in place. The rebuilt children then replace the
/// originals, which are destroyed.
#[derive(Debug, Clone, Default)]
pub struct StripMacroMarkersTransform {
    only: Option<MacroMarkerBlockMatcher>,
}

impl StripMacroMarkersTransform {
    /// Strip every macro marker.
    pub fn new() -> Self {
        Self { only: None }
    }

    /// Strip only the markers of the given macros.
    pub fn for_macros<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            only: Some(MacroMarkerBlockMatcher::new(ids)),
        }
    }

    fn strips(&self, arena: &BlockArena, block: BlockId) -> bool {
        match &self.only {
            Some(matcher) => matcher.matches(arena, block),
            None => arena.block_type(block) == Some(BlockType::MacroMarker),
        }
    }
}

impl Transformation for StripMacroMarkersTransform {
    fn name(&self) -> &str {
        "strip-macro-markers"
    }

    fn transform(
        &self,
        arena: &mut BlockArena,
        block: BlockId,
        _ctx: &TransformationContext,
        rendering: &mut RenderingContext,
    ) -> Result<(), TransformationError> {
        rendering.set_current_block(Some(block));

        let copy = arena.clone_filtered(block, |arena, clone| {
            if self.strips(arena, clone) {
                Vec::new()
            } else {
                vec![clone]
            }
        })?;

        let rebuilt = arena.children(copy).to_vec();
        let originals = arena.children(block).to_vec();
        arena.set_children(block, &rebuilt)?;
        for original in originals {
            arena.destroy(original)?;
        }
        arena.destroy(copy)?;
        Ok(())
    }
}
