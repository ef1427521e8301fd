/*
 * header_ids.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Transform that assigns anchor ids to headers.
 */

use rendition_blocks::{
    Axes, BlockArena, BlockId, BlockKind, BlockType, ClassBlockMatcher, IdGenerator,
};

use crate::context::TransformationContext;
use crate::error::TransformationError;
use crate::rendering::RenderingContext;
use crate::transformation::Transformation;

/// Prefix of generated header ids.
const HEADER_ID_PREFIX: &str = "H";

/// Transform that gives every header without an id a unique one.
///
/// Ids are derived from the header's text (`Hello World` becomes
/// `HHelloWorld`). Ids already present in the document are kept and never
/// generated again.
pub struct HeaderIdTransform;

impl HeaderIdTransform {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HeaderIdTransform {
    fn default() -> Self {
        Self::new()
    }
}

impl Transformation for HeaderIdTransform {
    fn name(&self) -> &str {
        "header-ids"
    }

    fn priority(&self) -> i32 {
        100
    }

    fn transform(
        &self,
        arena: &mut BlockArena,
        block: BlockId,
        _ctx: &TransformationContext,
        rendering: &mut RenderingContext,
    ) -> Result<(), TransformationError> {
        let headers = arena.get_blocks(
            block,
            &ClassBlockMatcher::new(BlockType::Header),
            Axes::DescendantOrSelf,
        );

        let mut ids = IdGenerator::new();
        for &header in &headers {
            if let Some(BlockKind::Header { id: Some(id), .. }) = arena.kind(header) {
                ids.reserve(id.clone());
            }
        }

        for header in headers {
            if !matches!(arena.kind(header), Some(BlockKind::Header { id: None, .. })) {
                continue;
            }
            rendering.set_current_block(Some(header));
            let text = arena.plain_text(header);
            let generated = ids.generate_unique_id(HEADER_ID_PREFIX, &text)?;
            tracing::trace!(id = %generated, "Assigned header id");
            if let BlockKind::Header { id, .. } = arena[header].kind_mut() {
                *id = Some(generated);
            }
        }
        Ok(())
    }
}
