//! # xsd-compiler
//!
//! Compiles XML Schema (XSD) documents into a fully resolved semantic model
//! that code generators consume.
//!
//! The input is a single, already flattened schema document (includes
//! expanded). The output is a [`ResolvedModel`]: named elements and types with
//! their resolved simple types, children in document order, attributes,
//! occurrence bounds, enumeration/range restrictions, mixed-content flags and
//! inheritance markers.
//!
//! ## Features
//!
//! - Streaming schema reader with namespace-prefix detection
//! - Group and attribute-group expansion with cycle detection
//! - Element / simple-type alias resolution down to built-in types
//! - Mixed-content consistency checks along inheritance chains
//! - Duplicate attribute/child name fixups
//! - Configurable limits and resolution fallback policy
//!
//! ## Example
//!
//! ```rust
//! use xsd_compiler::compile_str;
//!
//! let model = compile_str(r#"
//!     <xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema">
//!         <xsd:element name="Count" type="xsd:unsignedInt"/>
//!     </xsd:schema>"#).unwrap();
//!
//! let count = model.lookup_element("Count").unwrap();
//! assert_eq!(count.type_name(), Some("xsd:unsignedInt"));
//! assert!(!count.is_complex());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Foundation
pub mod error;
pub mod limits;

// Utilities
pub mod builtins;
pub mod names;
pub mod namespaces;

// Resource loading
pub mod loaders;
pub mod locations;

// Compiler
pub mod compiler;
pub mod dump;

// Re-exports for convenience
pub use compiler::{
    compile_file, compile_str, CompileOptions, Compiler, ElementRef, FallbackPolicy,
    ResolvedModel, Restriction, RestrictionScope,
};
pub use error::{Error, MalformedSchema, Result, SemanticError, Warning, WarningKind};
pub use limits::Limits;
pub use names::NameMap;

/// Version of the xsd-compiler library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// XSD 1.0 namespace
pub const XSD_1_0_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema";

/// XSD 1.1 namespace
pub const XSD_1_1_NAMESPACE: &str = "http://www.w3.org/2009/XMLSchema";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_namespaces() {
        assert_eq!(XSD_1_0_NAMESPACE, "http://www.w3.org/2001/XMLSchema");
        assert_ne!(XSD_1_0_NAMESPACE, XSD_1_1_NAMESPACE);
    }
}
