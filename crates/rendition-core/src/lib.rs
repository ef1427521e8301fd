/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Core transformation infrastructure for Rendition.
 */

//! Core transformation infrastructure for Rendition.
//!
//! This crate runs ordered transformation passes over a block tree from
//! `rendition-blocks`:
//!
//! - [`Transformation`] - The trait implemented by every pass
//! - [`TransformationRegistry`] - Passes available by name
//! - [`TransformationManager`] - Resolves, orders and runs passes, isolating failures
//! - [`RenderingContext`] - Stack of frames describing the pass in progress
//! - [`RenditionConfig`] - TOML configuration of the pipeline

pub mod config;
pub mod context;
pub mod error;
pub mod manager;
pub mod observer;
pub mod registry;
pub mod rendering;
pub mod transformation;
pub mod transforms;

pub use config::{RenderingConfig, RenditionConfig};
pub use context::TransformationContext;
pub use error::{
    PassFailure, RenditionError, Result, TransformationError, TransformationFailure,
};
pub use manager::TransformationManager;
pub use observer::{NoopObserver, TracingObserver, TransformationObserver};
pub use registry::TransformationRegistry;
pub use rendering::{FrameGuard, RenderingContext, RenderingFrame};
pub use transformation::{DEFAULT_PRIORITY, Transformation};
