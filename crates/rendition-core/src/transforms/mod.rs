/*
 * transforms/mod.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Built-in transformations.
 */

//! Built-in transformations.
//!
//! - [`HeaderIdTransform`] - Gives every header a unique anchor id
//! - [`StripMacroMarkersTransform`] - Removes macro markers, keeping their content
//!
//! These implement [`Transformation`](crate::transformation::Transformation) and
//! are registered by
//! [`TransformationRegistry::with_builtins`](crate::TransformationRegistry::with_builtins).

mod header_ids;
mod strip_macro_markers;

pub use header_ids::HeaderIdTransform;
pub use strip_macro_markers::StripMacroMarkersTransform;
