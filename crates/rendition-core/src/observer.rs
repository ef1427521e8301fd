/*
 * observer.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Observer for transformation pipeline events.
 */

//! Observer abstraction for pipeline execution events.
//!
//! The [`TransformationObserver`] trait lets callers follow a pipeline run
//! (logging, progress reporting, test instrumentation) without the manager
//! depending on a specific implementation.

use crate::error::{TransformationError, TransformationFailure};

/// Observer for pipeline execution events.
///
/// All methods have empty default implementations, allowing observers
/// to implement only the events they care about.
pub trait TransformationObserver: Send + Sync {
    /// Called when a transformation begins.
    ///
    /// # Arguments
    ///
    /// * `name` - Name of the transformation
    /// * `index` - Zero-based position in the sorted pass list
    /// * `total` - Number of passes that will run
    fn on_transformation_start(&self, _name: &str, _index: usize, _total: usize) {}

    /// Called when a transformation completes successfully.
    fn on_transformation_complete(&self, _name: &str, _index: usize, _total: usize) {}

    /// Called when a transformation fails. The pipeline keeps going.
    fn on_transformation_error(&self, _name: &str, _index: usize, _error: &TransformationError) {}

    /// Called for a configured name with no registered transformation.
    fn on_transformation_skipped(&self, _name: &str) {}

    /// Called once the pass list is resolved and sorted.
    fn on_pipeline_start(&self, _total: usize) {}

    /// Called when every pass succeeded.
    fn on_pipeline_complete(&self) {}

    /// Called when at least one pass failed.
    fn on_pipeline_error(&self, _failure: &TransformationFailure) {}
}

/// No-op observer implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl NoopObserver {
    pub fn new() -> Self {
        Self
    }
}

impl TransformationObserver for NoopObserver {
    // All methods use default empty implementations
}

/// Observer that emits `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl TracingObserver {
    pub fn new() -> Self {
        Self
    }
}

impl TransformationObserver for TracingObserver {
    fn on_transformation_start(&self, name: &str, index: usize, total: usize) {
        tracing::info!(
            transformation.name = name,
            transformation.index = index,
            transformation.total = total,
            "Starting transformation"
        );
    }

    fn on_transformation_complete(&self, name: &str, index: usize, total: usize) {
        tracing::info!(
            transformation.name = name,
            transformation.index = index,
            transformation.total = total,
            "Completed transformation"
        );
    }

    fn on_transformation_error(&self, name: &str, index: usize, error: &TransformationError) {
        tracing::error!(
            transformation.name = name,
            transformation.index = index,
            error = %error,
            "Transformation failed"
        );
    }

    fn on_transformation_skipped(&self, name: &str) {
        tracing::warn!(transformation.name = name, "Skipping unknown transformation");
    }

    fn on_pipeline_start(&self, total: usize) {
        tracing::info!(total_transformations = total, "Starting transformations");
    }

    fn on_pipeline_complete(&self) {
        tracing::info!("Transformations completed successfully");
    }

    fn on_pipeline_error(&self, failure: &TransformationFailure) {
        tracing::error!(failed = failure.failures.len(), "Transformations failed");
    }
}
