/*
 * context.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Per-call input of the transformation pipeline.
 */

use rendition_blocks::{BlockId, Syntax};

/// Describes one request to transform a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformationContext {
    /// Root of the document being transformed
    pub xdom: Option<BlockId>,
    /// Syntax the document was parsed from
    pub syntax: Option<Syntax>,
    /// Identifier of this execution
    pub id: Option<String>,
    /// Whether passes must avoid unsafe operations
    pub restricted: bool,
    /// Syntax the document will be rendered to
    pub target_syntax: Option<Syntax>,
    /// Explicit pass list, replacing the configured one when set
    pub transformation_names: Option<Vec<String>>,
}

impl TransformationContext {
    pub fn new(xdom: BlockId) -> Self {
        Self {
            xdom: Some(xdom),
            ..Default::default()
        }
    }

    pub fn with_syntax(mut self, syntax: Syntax) -> Self {
        self.syntax = Some(syntax);
        self
    }

    pub fn with_target_syntax(mut self, syntax: Syntax) -> Self {
        self.target_syntax = Some(syntax);
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_restricted(mut self, restricted: bool) -> Self {
        self.restricted = restricted;
        self
    }

    pub fn with_transformation_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.transformation_names = Some(names.into_iter().map(Into::into).collect());
        self
    }
}
