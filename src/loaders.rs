//! Resource loading utilities
//!
//! Reads schema documents into memory, enforcing the configured size limit.
//! Include flattening happens before the compiler sees the bytes.

use crate::error::{Error, Result};
use crate::limits::Limits;
use crate::locations::Location;
use std::fs;
use std::io::Read;

/// Resource loader for schema documents
#[derive(Debug, Clone, Default)]
pub struct Loader {
    /// Resource limits
    limits: Limits,
}

impl Loader {
    /// Create a new loader with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the limits
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Load a resource as bytes
    pub fn load_bytes(&self, location: &Location) -> Result<Vec<u8>> {
        match location {
            Location::Path(path) => {
                let content = fs::read(path).map_err(|e| {
                    Error::Resource(format!("Failed to read file '{}': {}", path.display(), e))
                })?;

                self.limits.check_xml_size(content.len())?;

                Ok(content)
            }
            Location::String(s) => {
                self.limits.check_xml_size(s.len())?;
                Ok(s.as_bytes().to_vec())
            }
        }
    }

    /// Drain a stream into memory
    pub fn load_reader<R: Read>(&self, reader: R) -> Result<Vec<u8>> {
        // Read one byte past the limit so oversize input is detected without
        // buffering all of it.
        let cap = self.limits.max_xml_size.saturating_add(1) as u64;
        let mut content = Vec::new();
        reader.take(cap).read_to_end(&mut content)?;

        self.limits.check_xml_size(content.len())?;

        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "<xs:schema/>").unwrap();

        let location = Location::Path(file.path().to_path_buf());
        let content = Loader::new().load_bytes(&location).unwrap();

        assert!(String::from_utf8(content).unwrap().contains("<xs:schema/>"));
    }

    #[test]
    fn test_load_missing_file() {
        let location = Location::Path("/definitely/not/here.xsd".into());
        let result = Loader::new().load_bytes(&location);
        assert!(matches!(result, Err(Error::Resource(_))));
    }

    #[test]
    fn test_load_from_reader() {
        let data = b"<xs:schema/>".to_vec();
        let content = Loader::new().load_reader(&data[..]).unwrap();
        assert_eq!(content, data);
    }

    #[test]
    fn test_size_limit() {
        let limits = Limits {
            max_xml_size: 8,
            ..Limits::default()
        };
        let loader = Loader::new().with_limits(limits);

        let result = loader.load_reader(&b"<xs:schema></xs:schema>"[..]);
        assert!(matches!(result, Err(Error::LimitExceeded(_))));

        let result = loader.load_bytes(&Location::String("<xs:schema></xs:schema>".into()));
        assert!(result.is_err());
    }
}
