/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Error types for the block tree.
 */

//! Error types for rendition-blocks

use thiserror::Error;

use crate::arena::BlockId;

/// Structural errors raised by tree edits and id generation.
///
/// These are raised immediately by the failing operation. The tree is left
/// exactly as it was before the call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BlockError {
    #[error("Block {block} is not a direct child of {parent}")]
    NotAChild { parent: BlockId, block: BlockId },

    #[error("Unknown block handle {0}")]
    UnknownBlock(BlockId),

    #[error("Inserting {child} under {parent} would make it its own ancestor")]
    WouldCreateCycle { parent: BlockId, child: BlockId },

    #[error("Block {0} appears more than once in the inserted sequence")]
    DuplicateBlock(BlockId),

    #[error("Invalid id prefix '{0}': only ASCII letters are allowed")]
    InvalidIdPrefix(String),
}

/// Malformed syntax identifier.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    #[error("Syntax identifier is empty")]
    Empty,

    #[error("Invalid syntax identifier '{0}': expected 'name/version'")]
    Malformed(String),
}
