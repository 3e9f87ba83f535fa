//! Schema source locations
//!
//! A schema is either a file on disk or an in-memory document.

use std::path::PathBuf;

/// Where a schema document comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// File system path
    Path(PathBuf),
    /// In-memory schema text
    String(String),
}

impl Location {
    /// Get a short description usable in diagnostics
    pub fn describe(&self) -> String {
        match self {
            Location::Path(p) => p.to_string_lossy().to_string(),
            Location::String(_) => "<string>".to_string(),
        }
    }

    /// Check if this is a local file
    pub fn is_file(&self) -> bool {
        matches!(self, Location::Path(_))
    }
}

impl From<PathBuf> for Location {
    fn from(path: PathBuf) -> Self {
        Location::Path(path)
    }
}

impl From<&std::path::Path> for Location {
    fn from(path: &std::path::Path) -> Self {
        Location::Path(path.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_from_path() {
        let loc = Location::from(PathBuf::from("/tmp/schema.xsd"));
        assert!(loc.is_file());
        assert_eq!(loc.describe(), "/tmp/schema.xsd");
    }

    #[test]
    fn test_location_describe_string() {
        let loc = Location::String("<xs:schema/>".to_string());
        assert!(!loc.is_file());
        assert_eq!(loc.describe(), "<string>");
    }
}
