/*
 * rendering.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Stack of frames describing the transformation in progress.
 */

//! Rendering context.
//!
//! A [`RenderingContext`] is a LIFO stack of [`RenderingFrame`]s owned by
//! one execution and passed explicitly to every transformation. The top
//! frame tells a pass which transformation is running, on which document,
//! and between which syntaxes.
//!
//! Reading an empty stack is not an error: every accessor then observes
//! the empty frame, where all fields are unset and `restricted` is false.
//!
//! ```ignore
//! let mut rendering = RenderingContext::new();
//! {
//!     let mut scope = rendering.scoped(frame);
//!     scope.set_current_block(Some(block));
//!     // ... the frame is popped when `scope` goes out of scope
//! }
//! assert!(rendering.is_empty());
//! ```

use std::sync::Arc;

use rendition_blocks::{BlockArena, BlockId, Syntax};

use crate::context::TransformationContext;
use crate::error::TransformationError;
use crate::transformation::Transformation;

static EMPTY: RenderingFrame = RenderingFrame::empty();

/// Snapshot of one in-progress transformation.
///
/// Only `current_block` and `target_syntax` change after the frame is
/// pushed.
#[derive(Clone, Default)]
pub struct RenderingFrame {
    pub xdom: Option<BlockId>,
    pub transformation: Option<Arc<dyn Transformation>>,
    pub current_block: Option<BlockId>,
    pub syntax: Option<Syntax>,
    pub target_syntax: Option<Syntax>,
    pub transformation_id: Option<String>,
    pub restricted: bool,
}

impl RenderingFrame {
    /// Frame with every field unset.
    pub const fn empty() -> Self {
        Self {
            xdom: None,
            transformation: None,
            current_block: None,
            syntax: None,
            target_syntax: None,
            transformation_id: None,
            restricted: false,
        }
    }

    /// Frame for running `transformation` under `ctx`.
    pub fn for_transformation(
        transformation: Arc<dyn Transformation>,
        ctx: &TransformationContext,
    ) -> Self {
        Self {
            xdom: ctx.xdom,
            transformation: Some(transformation),
            current_block: None,
            syntax: ctx.syntax.clone(),
            target_syntax: ctx.target_syntax.clone(),
            transformation_id: ctx.id.clone(),
            restricted: ctx.restricted,
        }
    }
}

impl std::fmt::Debug for RenderingFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderingFrame")
            .field("xdom", &self.xdom)
            .field(
                "transformation",
                &self.transformation.as_ref().map(|t| t.name()),
            )
            .field("current_block", &self.current_block)
            .field("syntax", &self.syntax)
            .field("target_syntax", &self.target_syntax)
            .field("transformation_id", &self.transformation_id)
            .field("restricted", &self.restricted)
            .finish()
    }
}

/// Execution-scoped stack of rendering frames.
#[derive(Debug, Default)]
pub struct RenderingContext {
    frames: Vec<RenderingFrame>,
}

impl RenderingContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `frame` the current frame.
    pub fn push(&mut self, frame: RenderingFrame) {
        self.frames.push(frame);
    }

    /// Remove the current frame. Does nothing on an empty stack.
    pub fn pop(&mut self) -> Option<RenderingFrame> {
        self.frames.pop()
    }

    /// The current frame, or the empty frame when nothing is pushed.
    pub fn peek(&self) -> &RenderingFrame {
        self.frames.last().unwrap_or(&EMPTY)
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn xdom(&self) -> Option<BlockId> {
        self.peek().xdom
    }

    pub fn transformation(&self) -> Option<&Arc<dyn Transformation>> {
        self.peek().transformation.as_ref()
    }

    pub fn current_block(&self) -> Option<BlockId> {
        self.peek().current_block
    }

    pub fn syntax(&self) -> Option<&Syntax> {
        self.peek().syntax.as_ref()
    }

    pub fn target_syntax(&self) -> Option<&Syntax> {
        self.peek().target_syntax.as_ref()
    }

    pub fn transformation_id(&self) -> Option<&str> {
        self.peek().transformation_id.as_deref()
    }

    pub fn is_restricted(&self) -> bool {
        self.peek().restricted
    }

    /// Update the block the current pass is working on. Does nothing on an
    /// empty stack.
    pub fn set_current_block(&mut self, block: Option<BlockId>) {
        if let Some(frame) = self.frames.last_mut() {
            frame.current_block = block;
        }
    }

    /// Update the target syntax of the current frame. Does nothing on an
    /// empty stack.
    pub fn set_target_syntax(&mut self, syntax: Option<Syntax>) {
        if let Some(frame) = self.frames.last_mut() {
            frame.target_syntax = syntax;
        }
    }

    /// Push `frame` and return a guard that pops it when dropped.
    ///
    /// The guard restores the stack to its depth before the push, so frames
    /// left behind by code running inside the scope are discarded too. This
    /// also happens while unwinding from a panic.
    pub fn scoped(&mut self, frame: RenderingFrame) -> FrameGuard<'_> {
        let depth = self.frames.len();
        self.push(frame);
        FrameGuard {
            context: self,
            depth,
        }
    }

    /// Run `transformation` on `block` inside its own frame.
    ///
    /// This is the entry point for passes that trigger nested
    /// transformations: the nested pass sees its own frame, and the caller's
    /// frame is current again once it returns.
    pub fn transform_in_context(
        &mut self,
        transformation: &Arc<dyn Transformation>,
        arena: &mut BlockArena,
        block: BlockId,
        ctx: &TransformationContext,
    ) -> Result<(), TransformationError> {
        let frame = RenderingFrame::for_transformation(Arc::clone(transformation), ctx);
        let mut scope = self.scoped(frame);
        scope.set_current_block(Some(block));
        transformation.transform(arena, block, ctx, &mut scope)
    }
}

/// Pops a scoped frame on drop. Dereferences to the context.
pub struct FrameGuard<'a> {
    context: &'a mut RenderingContext,
    depth: usize,
}

impl std::ops::Deref for FrameGuard<'_> {
    type Target = RenderingContext;

    fn deref(&self) -> &RenderingContext {
        self.context
    }
}

impl std::ops::DerefMut for FrameGuard<'_> {
    fn deref_mut(&mut self) -> &mut RenderingContext {
        self.context
    }
}

impl Drop for FrameGuard<'_> {
    fn drop(&mut self) {
        self.context.frames.truncate(self.depth);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rendition_blocks::BlockKind;
    use std::panic::{AssertUnwindSafe, catch_unwind};

    fn frame(id: &str) -> RenderingFrame {
        RenderingFrame {
            transformation_id: Some(id.to_string()),
            ..RenderingFrame::empty()
        }
    }

    struct Recording {
        seen: std::sync::Mutex<Vec<Option<String>>>,
    }

    impl Transformation for Recording {
        fn name(&self) -> &str {
            "recording"
        }

        fn transform(
            &self,
            _arena: &mut BlockArena,
            block: BlockId,
            _ctx: &TransformationContext,
            rendering: &mut RenderingContext,
        ) -> Result<(), TransformationError> {
            assert_eq!(rendering.current_block(), Some(block));
            assert_eq!(
                rendering.transformation().map(|t| t.name()),
                Some("recording")
            );
            self.seen
                .lock()
                .unwrap()
                .push(rendering.transformation_id().map(str::to_string));
            Ok(())
        }
    }

    #[test]
    fn test_push_peek_pop() {
        let mut rendering = RenderingContext::new();
        rendering.push(frame("F1"));
        rendering.push(frame("F2"));
        assert_eq!(rendering.transformation_id(), Some("F2"));

        rendering.pop();
        assert_eq!(rendering.transformation_id(), Some("F1"));

        rendering.pop();
        assert!(rendering.pop().is_none());
        assert!(rendering.is_empty());
    }

    #[test]
    fn test_empty_stack_reads_defaults() {
        let mut rendering = RenderingContext::new();
        assert_eq!(rendering.xdom(), None);
        assert!(rendering.transformation().is_none());
        assert_eq!(rendering.current_block(), None);
        assert_eq!(rendering.syntax(), None);
        assert_eq!(rendering.target_syntax(), None);
        assert_eq!(rendering.transformation_id(), None);
        assert!(!rendering.is_restricted());

        let mut arena = BlockArena::new();
        let block = arena.create(BlockKind::Paragraph);
        rendering.set_current_block(Some(block));
        rendering.set_target_syntax(Some(Syntax::new("html", "5.0")));
        assert_eq!(rendering.current_block(), None);
        assert_eq!(rendering.target_syntax(), None);
    }

    #[test]
    fn test_mutable_fields_update_top_frame_only() {
        let mut arena = BlockArena::new();
        let block = arena.create(BlockKind::Paragraph);

        let mut rendering = RenderingContext::new();
        rendering.push(frame("outer"));
        rendering.push(frame("inner"));
        rendering.set_current_block(Some(block));
        rendering.set_target_syntax(Some(Syntax::new("html", "5.0")));
        assert_eq!(rendering.current_block(), Some(block));
        assert_eq!(rendering.target_syntax().map(Syntax::name), Some("html"));

        rendering.pop();
        assert_eq!(rendering.current_block(), None);
        assert_eq!(rendering.target_syntax(), None);
    }

    #[test]
    fn test_scoped_frame_is_popped() {
        let mut rendering = RenderingContext::new();
        rendering.push(frame("outer"));
        {
            let mut scope = rendering.scoped(frame("inner"));
            assert_eq!(scope.transformation_id(), Some("inner"));
            scope.push(frame("leaked"));
            assert_eq!(scope.depth(), 3);
        }
        assert_eq!(rendering.depth(), 1);
        assert_eq!(rendering.transformation_id(), Some("outer"));
    }

    #[test]
    fn test_scoped_frame_is_popped_on_panic() {
        let mut rendering = RenderingContext::new();
        let result = catch_unwind(AssertUnwindSafe(|| {
            let _scope = rendering.scoped(frame("doomed"));
            panic!("pass blew up");
        }));
        assert!(result.is_err());
        assert!(rendering.is_empty());
    }

    #[test]
    fn test_transform_in_context_nests() {
        let mut arena = BlockArena::new();
        let root = arena.create(BlockKind::xdom());
        let ctx = TransformationContext::new(root).with_id("job-1");
        let recording = Arc::new(Recording {
            seen: std::sync::Mutex::new(Vec::new()),
        });
        let transformation: Arc<dyn Transformation> = recording.clone();

        let mut rendering = RenderingContext::new();
        rendering.push(frame("caller"));
        rendering
            .transform_in_context(&transformation, &mut arena, root, &ctx)
            .unwrap();

        assert_eq!(*recording.seen.lock().unwrap(), vec![Some("job-1".to_string())]);
        assert_eq!(rendering.depth(), 1);
        assert_eq!(rendering.transformation_id(), Some("caller"));
    }
}
