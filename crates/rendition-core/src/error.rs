//! Error types for rendition-core

use rendition_blocks::{BlockError, SyntaxError};
use thiserror::Error;

/// Error raised by a single transformation pass.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransformationError {
    #[error(transparent)]
    Block(#[from] BlockError),

    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error("{0}")]
    Failed(String),
}

impl TransformationError {
    /// Create an error from any message.
    pub fn failed(msg: impl Into<String>) -> Self {
        Self::Failed(msg.into())
    }
}

/// One failed pass of a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassFailure {
    /// Name of the transformation that failed
    pub transformation: String,
    pub error: TransformationError,
}

/// Every pass that failed during one pipeline run.
///
/// Passes that did not fail still ran, and their changes to the tree are
/// kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformationFailure {
    pub failures: Vec<PassFailure>,
}

impl TransformationFailure {
    pub fn failed_transformations(&self) -> Vec<&str> {
        self.failures
            .iter()
            .map(|f| f.transformation.as_str())
            .collect()
    }
}

impl std::fmt::Display for TransformationFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} transformation(s) failed:", self.failures.len())?;
        for failure in &self.failures {
            write!(f, "\n  {}: {}", failure.transformation, failure.error)?;
        }
        Ok(())
    }
}

impl std::error::Error for TransformationFailure {}

#[derive(Error, Debug)]
pub enum RenditionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error(transparent)]
    Block(#[from] BlockError),

    #[error(transparent)]
    Transformations(#[from] TransformationFailure),

    #[error("{0}")]
    Other(String),
}

impl RenditionError {
    /// Create an error from any message.
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}

impl From<toml::de::Error> for RenditionError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RenditionError>;
