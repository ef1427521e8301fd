/*
 * config.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * TOML configuration for the transformation pipeline.
 */

//! Pipeline configuration.
//!
//! ```toml
//! [rendering]
//! transformations = ["header-ids", "strip-macro-markers"]
//! default-syntax = "xwiki/2.1"
//! target-syntax = "xhtml/1.0"
//!
//! [rendering.priorities]
//! header-ids = 50
//! ```
//!
//! Syntax identifiers are validated while parsing, so a loaded config
//! never holds a malformed one.

use std::collections::HashMap;
use std::path::Path;

use rendition_blocks::Syntax;
use serde::{Deserialize, Serialize};

use crate::error::{RenditionError, Result};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct RenditionConfig {
    #[serde(default)]
    pub rendering: RenderingConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct RenderingConfig {
    /// Transformations to run when a request does not name its own
    #[serde(default)]
    pub transformations: Vec<String>,
    /// Source syntax assumed when a request does not give one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_syntax: Option<Syntax>,
    /// Target syntax assumed when a request does not give one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_syntax: Option<Syntax>,
    /// Priority overrides by transformation name
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub priorities: HashMap<String, i32>,
}

impl RenditionConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|err| RenditionError::Config(format!("{}: {err}", path.display())))
    }

    /// Configured priority override for `name`, if any.
    pub fn priority(&self, name: &str) -> Option<i32> {
        self.rendering.priorities.get(name).copied()
    }
}
