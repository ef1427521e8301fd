/*
 * manager.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Runs configured transformations over a block tree.
 */

//! Transformation pipeline.
//!
//! [`TransformationManager`] resolves transformation names against a
//! [`TransformationRegistry`], orders them by priority and runs them one
//! after another on the same tree.
//!
//! # Failure handling
//!
//! A failing pass does not stop the pipeline. Its error is recorded and the
//! remaining passes still run. Once every pass has run, the recorded errors
//! are returned together as a single [`TransformationFailure`]. Nothing is
//! rolled back: changes made by any pass, failed or not, stay in the tree.
//!
//! Unknown names are skipped with a warning.

use std::sync::Arc;

use rendition_blocks::{BlockArena, BlockId};

use crate::config::RenditionConfig;
use crate::context::TransformationContext;
use crate::error::{PassFailure, TransformationError, TransformationFailure};
use crate::observer::{NoopObserver, TransformationObserver};
use crate::registry::TransformationRegistry;
use crate::rendering::RenderingContext;
use crate::transformation::Transformation;

pub struct TransformationManager {
    registry: TransformationRegistry,
    config: RenditionConfig,
    observer: Arc<dyn TransformationObserver>,
}

impl TransformationManager {
    pub fn new(registry: TransformationRegistry, config: RenditionConfig) -> Self {
        Self {
            registry,
            config,
            observer: Arc::new(NoopObserver),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn TransformationObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn registry(&self) -> &TransformationRegistry {
        &self.registry
    }

    pub fn config(&self) -> &RenditionConfig {
        &self.config
    }

    /// Priority of `transformation` after configured overrides.
    pub fn effective_priority(&self, transformation: &dyn Transformation) -> i32 {
        self.config
            .priority(transformation.name())
            .unwrap_or_else(|| transformation.priority())
    }

    /// Look up `names` and sort the result by effective priority.
    ///
    /// The sort is stable, so equal priorities keep the order of `names`.
    /// Names without a registered transformation are skipped.
    pub fn resolve<S: AsRef<str>>(&self, names: &[S]) -> Vec<Arc<dyn Transformation>> {
        let mut resolved: Vec<Arc<dyn Transformation>> = Vec::with_capacity(names.len());
        for name in names {
            let name = name.as_ref();
            match self.registry.get(name) {
                Some(transformation) => resolved.push(Arc::clone(transformation)),
                None => {
                    tracing::warn!(transformation = name, "Unknown transformation, skipping");
                    self.observer.on_transformation_skipped(name);
                }
            }
        }
        resolved.sort_by_key(|t| self.effective_priority(t.as_ref()));
        resolved
    }

    /// Run every requested transformation on the subtree at `block`.
    ///
    /// Names come from `ctx.transformation_names`, or from the configured
    /// list when the context does not give any. Syntaxes missing from `ctx`
    /// fall back to the configured defaults.
    ///
    /// # Errors
    ///
    /// Returns every failed pass once all passes have run.
    pub fn perform_transformations(
        &self,
        arena: &mut BlockArena,
        block: BlockId,
        ctx: &TransformationContext,
        rendering: &mut RenderingContext,
    ) -> Result<(), TransformationFailure> {
        let ctx = self.with_defaults(ctx);
        let names = ctx
            .transformation_names
            .as_deref()
            .unwrap_or(self.config.rendering.transformations.as_slice());
        let transformations = self.resolve(names);
        let total = transformations.len();
        self.observer.on_pipeline_start(total);

        let mut failures = Vec::new();
        for (index, transformation) in transformations.iter().enumerate() {
            let name = transformation.name();
            tracing::debug!(transformation = name, "Running transformation");
            self.observer.on_transformation_start(name, index, total);

            match self.perform_transformation(transformation, arena, block, &ctx, rendering) {
                Ok(()) => self.observer.on_transformation_complete(name, index, total),
                Err(error) => {
                    self.observer.on_transformation_error(name, index, &error);
                    failures.push(PassFailure {
                        transformation: name.to_string(),
                        error,
                    });
                }
            }
        }

        if failures.is_empty() {
            self.observer.on_pipeline_complete();
            Ok(())
        } else {
            let failure = TransformationFailure { failures };
            self.observer.on_pipeline_error(&failure);
            Err(failure)
        }
    }

    /// Run a single transformation in its own rendering frame.
    pub fn perform_transformation(
        &self,
        transformation: &Arc<dyn Transformation>,
        arena: &mut BlockArena,
        block: BlockId,
        ctx: &TransformationContext,
        rendering: &mut RenderingContext,
    ) -> Result<(), TransformationError> {
        rendering.transform_in_context(transformation, arena, block, ctx)
    }

    fn with_defaults(&self, ctx: &TransformationContext) -> TransformationContext {
        let mut ctx = ctx.clone();
        if ctx.syntax.is_none() {
            ctx.syntax = self.config.rendering.default_syntax.clone();
        }
        if ctx.target_syntax.is_none() {
            ctx.target_syntax = self.config.rendering.target_syntax.clone();
        }
        ctx
    }
}
