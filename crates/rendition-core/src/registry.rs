/*
 * registry.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Named transformations available to the pipeline.
 */

use std::sync::Arc;

use hashlink::LinkedHashMap;

use crate::transformation::Transformation;
use crate::transforms::{HeaderIdTransform, StripMacroMarkersTransform};

/// Transformations by name, in registration order.
///
/// The pipeline orders passes by priority and then by the order their names
/// were requested; registration order only shows up in [`names`](Self::names).
#[derive(Clone, Default)]
pub struct TransformationRegistry {
    transformations: LinkedHashMap<String, Arc<dyn Transformation>>,
}

impl TransformationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in transformation.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(HeaderIdTransform::new());
        registry.register(StripMacroMarkersTransform::new());
        registry
    }

    pub fn register(
        &mut self,
        transformation: impl Transformation + 'static,
    ) -> Option<Arc<dyn Transformation>> {
        self.register_arc(Arc::new(transformation))
    }

    /// Register a shared transformation under its own name.
    ///
    /// Replacing an existing name keeps its registration position and
    /// returns the previous transformation.
    pub fn register_arc(
        &mut self,
        transformation: Arc<dyn Transformation>,
    ) -> Option<Arc<dyn Transformation>> {
        let name = transformation.name().to_string();
        match self.transformations.get_mut(&name) {
            Some(slot) => Some(std::mem::replace(slot, transformation)),
            None => {
                self.transformations.insert(name, transformation);
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Transformation>> {
        self.transformations.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.transformations.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.transformations.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.transformations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transformations.is_empty()
    }
}

impl std::fmt::Debug for TransformationRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
