//! Command implementations for Rendition CLI
//!
//! Each command module handles the CLI interface and delegates to
//! rendition-core for actual implementation.

pub mod events;
pub mod transform;

use std::io::Read;

use anyhow::{Context, Result};
use rendition_blocks::Fragment;

/// Read a JSON document from `input`, or from stdin when it is `-`.
pub fn read_document(input: &str) -> Result<Fragment> {
    let content = if input == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read document from stdin")?;
        buf
    } else {
        std::fs::read_to_string(input).with_context(|| format!("Failed to read {input}"))?
    };
    serde_json::from_str(&content).with_context(|| format!("Invalid JSON document in {input}"))
}
