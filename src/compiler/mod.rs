//! Schema compiler
//!
//! Turns a flattened XSD document into a [`ResolvedModel`]. The
//! [`SchemaReader`](reader::SchemaReader) streams the document into a raw node
//! tree, then the [`Annotator`](annotator::Annotator) runs its passes over it.
//!
//! ```rust,ignore
//! use xsd_compiler::compiler::Compiler;
//!
//! let model = Compiler::new().compile_file("schema.xsd")?;
//! for element in model.all_named_elements() {
//!     println!("{} -> {:?}", element.name(), element.type_name());
//! }
//! ```

pub mod annotator;
pub mod context;
pub mod model;
pub mod nodes;
pub mod reader;

pub use model::{ElementRef, ResolvedModel, RestrictionScope};
pub use nodes::{NodeId, RangeRestriction, Restriction, UNBOUNDED};

use crate::error::Result;
use crate::limits::Limits;
use crate::loaders::Loader;
use crate::locations::Location;
use crate::names::NameMap;
use annotator::Annotator;
use context::CompilationContext;
use reader::SchemaReader;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// What type resolution does when it cannot reach a type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FallbackPolicy {
    /// Substitute the default string type and carry on
    #[default]
    Lenient,
    /// Fail with a semantic error
    Strict,
}

/// Options for one compilation
#[derive(Debug, Clone, Default)]
pub struct CompileOptions {
    /// Resource and recursion limits
    pub limits: Limits,
    /// Resolution fallback policy
    pub fallback: FallbackPolicy,
    /// Reserved-name mapping applied to clean names
    pub name_map: NameMap,
}

impl CompileOptions {
    /// Create default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the limits
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Set the fallback policy
    pub fn with_fallback(mut self, fallback: FallbackPolicy) -> Self {
        self.fallback = fallback;
        self
    }

    /// Set the reserved-name mapping
    pub fn with_name_map(mut self, name_map: NameMap) -> Self {
        self.name_map = name_map;
        self
    }
}

/// Schema compiler
///
/// A `Compiler` holds only options; every call builds a fresh
/// [`CompilationContext`], so one compiler can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct Compiler {
    options: CompileOptions,
}

impl Compiler {
    /// Create a compiler with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a compiler with the given options
    pub fn with_options(options: CompileOptions) -> Self {
        Self { options }
    }

    /// Options in effect
    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    /// Compile a schema held in a string
    pub fn compile_str(&self, xsd: &str) -> Result<ResolvedModel> {
        self.compile_bytes(xsd.as_bytes())
    }

    /// Compile a schema document held in memory
    pub fn compile_bytes(&self, input: &[u8]) -> Result<ResolvedModel> {
        self.options.limits.check_xml_size(input.len())?;

        let mut ctx = CompilationContext::new(self.options.clone());
        let root = SchemaReader::new(&mut ctx).read(input)?;
        debug!(nodes = ctx.arena.len(), "schema read");

        Annotator::new(&mut ctx, root).run()?;
        debug!(
            elements = ctx.element_index.len(),
            simple_types = ctx.simple_types.len(),
            warnings = ctx.warnings.len(),
            "schema annotated"
        );

        Ok(ResolvedModel::new(ctx, root))
    }

    /// Compile a schema file
    pub fn compile_file(&self, path: impl AsRef<Path>) -> Result<ResolvedModel> {
        self.compile_location(&Location::from(path.as_ref()))
    }

    /// Compile a schema read from a stream
    pub fn compile_reader<R: Read>(&self, reader: R) -> Result<ResolvedModel> {
        let content = self.loader().load_reader(reader)?;
        self.compile_bytes(&content)
    }

    /// Compile a schema from any supported location
    pub fn compile_location(&self, location: &Location) -> Result<ResolvedModel> {
        debug!(location = %location.describe(), "compiling schema");
        let content = self.loader().load_bytes(location)?;
        self.compile_bytes(&content)
    }

    fn loader(&self) -> Loader {
        Loader::new().with_limits(self.options.limits.clone())
    }
}

/// Compile a schema string with default options
pub fn compile_str(xsd: &str) -> Result<ResolvedModel> {
    Compiler::new().compile_str(xsd)
}

/// Compile a schema file with default options
pub fn compile_file(path: impl AsRef<Path>) -> Result<ResolvedModel> {
    Compiler::new().compile_file(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    const SCHEMA: &str = r#"<xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema">
        <xsd:element name="Count" type="xsd:unsignedInt"/>
    </xsd:schema>"#;

    #[test]
    fn test_options_builder() {
        let options = CompileOptions::new()
            .with_fallback(FallbackPolicy::Strict)
            .with_limits(Limits::strict())
            .with_name_map(NameMap::empty());

        assert_eq!(options.fallback, FallbackPolicy::Strict);
        assert_eq!(options.limits, Limits::strict());
        assert_eq!(options.name_map, NameMap::empty());
        assert_eq!(FallbackPolicy::default(), FallbackPolicy::Lenient);
    }

    #[test]
    fn test_compile_str() {
        let model = compile_str(SCHEMA).unwrap();
        let count = model.lookup_element("Count").unwrap();
        assert_eq!(count.type_name(), Some("xsd:unsignedInt"));
        assert!(!count.is_complex());
    }

    #[test]
    fn test_compile_reader() {
        let model = Compiler::new().compile_reader(SCHEMA.as_bytes()).unwrap();
        assert!(model.lookup_element("Count").is_some());
    }

    #[test]
    fn test_size_limit_applies() {
        let limits = Limits {
            max_xml_size: 16,
            ..Limits::default()
        };
        let compiler = Compiler::with_options(CompileOptions::new().with_limits(limits));

        assert!(matches!(
            compiler.compile_str(SCHEMA),
            Err(Error::LimitExceeded(_))
        ));
    }

    #[test]
    fn test_compilations_are_independent() {
        let compiler = Compiler::new();
        let first = compiler.compile_str(SCHEMA).unwrap();
        let second = compiler
            .compile_str(
                r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
                    <xs:element name="Other" type="xs:string"/>
                </xs:schema>"#,
            )
            .unwrap();

        assert!(first.lookup_element("Other").is_none());
        assert!(second.lookup_element("Count").is_none());
    }
}
