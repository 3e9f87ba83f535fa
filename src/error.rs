//! Error types for xsd-compiler
//!
//! Fatal problems abort a compilation and surface as [`Error`]. Recoverable
//! problems are collected as [`Warning`]s next to the resolved model.

use std::fmt;
use thiserror::Error;

/// Result type alias using the compiler Error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for compilation
#[derive(Error, Debug)]
pub enum Error {
    /// Structurally broken schema document
    #[error("malformed schema: {0}")]
    Malformed(#[from] MalformedSchema),

    /// Schema that parses but cannot be given a consistent meaning
    #[error("schema semantic error: {0}")]
    Semantic(#[from] SemanticError),

    /// Resource loading error
    #[error("resource error: {0}")]
    Resource(String),

    /// Limit exceeded error
    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A schema document that cannot be read into a raw tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedSchema {
    /// Construct (tag) being processed when the problem was found
    pub construct: String,
    /// Error message
    pub message: String,
    /// Source location, `line:column` when known
    pub location: Option<String>,
}

impl MalformedSchema {
    /// Create a new malformed-schema error
    pub fn new(construct: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            construct: construct.into(),
            message: message.into(),
            location: None,
        }
    }

    /// Set the location
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

impl fmt::Display for MalformedSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>: {}", self.construct, self.message)?;

        if let Some(ref loc) = self.location {
            write!(f, " (at {})", loc)?;
        }

        Ok(())
    }
}

impl std::error::Error for MalformedSchema {}

/// A well-formed schema whose definitions are inconsistent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemanticError {
    /// Name of the offending node
    pub node: String,
    /// Why the node was rejected
    pub reason: String,
}

impl SemanticError {
    /// Create a new semantic error
    pub fn new(node: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            node: node.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for SemanticError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}': {}", self.node, self.reason)
    }
}

impl std::error::Error for SemanticError {}

/// Category of a recoverable problem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarningKind {
    /// A group reference that would expand into itself
    CircularGroupReference,
    /// A reference to a group that is never defined
    UndefinedGroup,
    /// A reference to an attribute group that is never defined
    UndefinedAttributeGroup,
    /// An attribute group that includes itself
    CircularAttributeGroup,
    /// An `enumeration`/`minInclusive`/`maxInclusive` without `value`
    MissingFacetValue,
    /// An inclusive bound that is not a number
    InvalidFacetValue,
    /// A facet with no attribute, element or simple type to attach to
    DetachedFacet,
    /// A mixed-content flag that disagrees with its base
    MixedContentMismatch,
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WarningKind::CircularGroupReference => "circular group reference",
            WarningKind::UndefinedGroup => "undefined group",
            WarningKind::UndefinedAttributeGroup => "undefined attribute group",
            WarningKind::CircularAttributeGroup => "circular attribute group",
            WarningKind::MissingFacetValue => "missing facet value",
            WarningKind::InvalidFacetValue => "invalid facet value",
            WarningKind::DetachedFacet => "detached facet",
            WarningKind::MixedContentMismatch => "mixed content mismatch",
        };
        write!(f, "{}", s)
    }
}

/// A recoverable problem recorded during compilation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    /// Warning category
    pub kind: WarningKind,
    /// Human readable detail
    pub detail: String,
}

impl Warning {
    /// Create a new warning
    pub fn new(kind: WarningKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.detail)
    }
}
