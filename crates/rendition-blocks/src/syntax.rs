/*
 * syntax.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Opaque markup syntax identifiers.
 */

//! Markup syntax identifiers.
//!
//! A [`Syntax`] names a markup dialect and its version, conventionally
//! written `name/version` (for example `xwiki/2.1` or `html/5.0`). The tree
//! only stores and compares syntaxes; resolving them to parsers or
//! renderers happens elsewhere.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SyntaxError;

/// Markup dialect identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Syntax {
    name: String,
    version: String,
}

impl Syntax {
    /// Create a syntax from its parts.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }
}

impl std::fmt::Display for Syntax {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.name, self.version)
    }
}

impl FromStr for Syntax {
    type Err = SyntaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(SyntaxError::Empty);
        }
        match s.split_once('/') {
            Some((name, version)) if !name.is_empty() && !version.is_empty() => {
                Ok(Self::new(name, version))
            }
            _ => Err(SyntaxError::Malformed(s.to_string())),
        }
    }
}

impl TryFrom<String> for Syntax {
    type Error = SyntaxError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Syntax> for String {
    fn from(syntax: Syntax) -> Self {
        syntax.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_name_and_version() {
        let syntax: Syntax = "xwiki/2.1".parse().unwrap();
        assert_eq!(syntax.name(), "xwiki");
        assert_eq!(syntax.version(), "2.1");
        assert_eq!(syntax.to_string(), "xwiki/2.1");
    }

    #[test]
    fn test_version_may_contain_slash() {
        let syntax: Syntax = "plain/1.0/strict".parse().unwrap();
        assert_eq!(syntax.name(), "plain");
        assert_eq!(syntax.version(), "1.0/strict");
    }

    #[test]
    fn test_empty_is_rejected() {
        assert_eq!("".parse::<Syntax>(), Err(SyntaxError::Empty));
        assert_eq!("   ".parse::<Syntax>(), Err(SyntaxError::Empty));
    }

    #[test]
    fn test_malformed_is_rejected() {
        assert!(matches!(
            "xwiki".parse::<Syntax>(),
            Err(SyntaxError::Malformed(_))
        ));
        assert!(matches!(
            "/2.1".parse::<Syntax>(),
            Err(SyntaxError::Malformed(_))
        ));
        assert!(matches!(
            "xwiki/".parse::<Syntax>(),
            Err(SyntaxError::Malformed(_))
        ));
    }

    #[test]
    fn test_serde_as_string() {
        let syntax = Syntax::new("html", "5.0");
        let json = serde_json::to_string(&syntax).unwrap();
        assert_eq!(json, "\"html/5.0\"");

        let back: Syntax = serde_json::from_str(&json).unwrap();
        assert_eq!(back, syntax);

        let err = serde_json::from_str::<Syntax>("\"html\"");
        assert!(err.is_err());
    }
}
