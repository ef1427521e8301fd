/*
 * id_generator.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Unique document identifiers.
 */

use std::collections::HashSet;

use crate::error::BlockError;

/// Allocates identifiers that are unique within one document.
///
/// Ids are built from a prefix and free text reduced to the characters that
/// are valid in an identifier (ASCII letters, digits and `-_.:`). An id
/// always starts with a letter. Collisions get a `-N` suffix.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    used: HashSet<String>,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `id` as taken, e.g. for ids already present in a document.
    pub fn reserve(&mut self, id: impl Into<String>) {
        self.used.insert(id.into());
    }

    pub fn contains(&self, id: &str) -> bool {
        self.used.contains(id)
    }

    /// Produce a fresh id from `prefix` and `text`.
    ///
    /// `prefix` must be empty or ASCII letters only.
    pub fn generate_unique_id(&mut self, prefix: &str, text: &str) -> Result<String, BlockError> {
        if !prefix.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(BlockError::InvalidIdPrefix(prefix.to_string()));
        }

        let cleaned: String = text
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ':'))
            .collect();

        let mut base = String::with_capacity(prefix.len() + cleaned.len() + 1);
        base.push_str(prefix);
        if prefix.is_empty() && !cleaned.starts_with(|c: char| c.is_ascii_alphabetic()) {
            base.push('I');
        }
        base.push_str(&cleaned);

        let mut id = base.clone();
        let mut counter = 1;
        while self.used.contains(&id) {
            id = format!("{base}-{counter}");
            counter += 1;
        }
        self.used.insert(id.clone());
        Ok(id)
    }

    /// Forget every allocated id.
    pub fn reset(&mut self) {
        self.used.clear();
    }
}
