//! Limits and constraints for schema compilation
//!
//! Bounds on input size, parse depth and the length of every chain walk the
//! annotator performs, so that cyclic or hostile schemas terminate.

use crate::error::{Error, Result};

/// Compilation limits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limits {
    /// Maximum element nesting in the schema document
    pub max_xml_depth: usize,

    /// Maximum schema document size in bytes
    pub max_xml_size: usize,

    /// Maximum length of an inheritance (`base`) chain
    pub max_base_depth: usize,

    /// Maximum number of hops through the simple-type table while resolving a type
    pub max_simple_type_hops: usize,

    /// Maximum nesting of element-group references
    pub max_group_depth: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_xml_depth: 1000,
            max_xml_size: 100 * 1024 * 1024, // 100 MB
            max_base_depth: 100,
            max_simple_type_hops: 10,
            max_group_depth: 100,
        }
    }
}

impl Limits {
    /// Create a new Limits with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Create strict limits (more restrictive)
    pub fn strict() -> Self {
        Self {
            max_xml_depth: 100,
            max_xml_size: 10 * 1024 * 1024, // 10 MB
            max_base_depth: 20,
            max_simple_type_hops: 10,
            max_group_depth: 20,
        }
    }

    /// Create permissive limits (less restrictive, use with caution)
    pub fn permissive() -> Self {
        Self {
            max_xml_depth: 10000,
            max_xml_size: 1024 * 1024 * 1024, // 1 GB
            max_base_depth: 1000,
            max_simple_type_hops: 100,
            max_group_depth: 1000,
        }
    }

    /// Check if XML depth is within limits
    pub fn check_xml_depth(&self, depth: usize) -> Result<()> {
        if depth > self.max_xml_depth {
            Err(Error::LimitExceeded(format!(
                "XML depth {} exceeds maximum {}",
                depth, self.max_xml_depth
            )))
        } else {
            Ok(())
        }
    }

    /// Check if group-reference nesting is within limits
    pub fn check_group_depth(&self, depth: usize) -> Result<()> {
        if depth > self.max_group_depth {
            Err(Error::LimitExceeded(format!(
                "group nesting {} exceeds maximum {}",
                depth, self.max_group_depth
            )))
        } else {
            Ok(())
        }
    }

    /// Check if XML size is within limits
    pub fn check_xml_size(&self, size: usize) -> Result<()> {
        if size > self.max_xml_size {
            Err(Error::LimitExceeded(format!(
                "XML size {} bytes exceeds maximum {} bytes",
                size, self.max_xml_size
            )))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limits() {
        let limits = Limits::default();
        assert_eq!(limits.max_base_depth, 100);
        assert_eq!(limits.max_simple_type_hops, 10);
        assert!(limits.check_xml_depth(500).is_ok());
        assert!(limits.check_xml_depth(1500).is_err());
    }

    #[test]
    fn test_strict_limits() {
        let limits = Limits::strict();
        assert!(limits.max_xml_depth < Limits::default().max_xml_depth);
        assert!(limits.check_xml_depth(150).is_err());
        assert!(limits.check_group_depth(20).is_ok());
        assert!(limits.check_group_depth(21).is_err());
    }

    #[test]
    fn test_permissive_limits() {
        let limits = Limits::permissive();
        assert!(limits.max_base_depth > Limits::default().max_base_depth);
        assert!(limits.check_xml_depth(5000).is_ok());
    }

    #[test]
    fn test_check_xml_size() {
        let limits = Limits::default();
        assert!(limits.check_xml_size(1024).is_ok());
        assert!(matches!(
            limits.check_xml_size(200 * 1024 * 1024),
            Err(Error::LimitExceeded(_))
        ));
    }
}
