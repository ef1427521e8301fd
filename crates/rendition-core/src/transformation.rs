/*
 * transformation.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Transformation trait.
 */

use rendition_blocks::{BlockArena, BlockId};

use crate::context::TransformationContext;
use crate::error::TransformationError;
use crate::rendering::RenderingContext;

/// Priority of a transformation that does not choose one.
pub const DEFAULT_PRIORITY: i32 = 1000;

/// Trait for tree transformations.
///
/// A transformation mutates the block tree in place. Passes run in priority
/// order (lowest first) and later passes see the changes of earlier ones.
///
/// # Thread Safety
///
/// Transformations must be `Send + Sync`: a registry is shared between
/// concurrent executions, each with its own tree and rendering context.
pub trait Transformation: Send + Sync {
    /// Name used in configuration and in error reports.
    fn name(&self) -> &str;

    /// Ordering key. Lower runs first.
    fn priority(&self) -> i32 {
        DEFAULT_PRIORITY
    }

    /// Apply the transformation to the subtree rooted at `block`.
    ///
    /// `rendering` has a frame for this pass on top while the method runs.
    ///
    /// # Errors
    ///
    /// Returns an error if the pass could not complete. Changes made before
    /// the error are kept.
    fn transform(
        &self,
        arena: &mut BlockArena,
        block: BlockId,
        ctx: &TransformationContext,
        rendering: &mut RenderingContext,
    ) -> Result<(), TransformationError>;
}
