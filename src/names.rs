//! Identifier-safe names
//!
//! Schema names may contain characters that no target language accepts in an
//! identifier. Generators work with the cleaned form produced here.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

static UNSAFE_NAME_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[:\-.]").unwrap());

/// Replace `:`, `-` and `.` with `_`
pub fn cleanup_name(name: &str) -> String {
    UNSAFE_NAME_CHARS.replace_all(name, "_").into_owned()
}

/// Renames for clean names that collide with reserved words
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameMap {
    table: IndexMap<String, String>,
}

impl Default for NameMap {
    fn default() -> Self {
        let mut table = IndexMap::new();
        table.insert("type".to_string(), "type_".to_string());
        table.insert("float".to_string(), "float_".to_string());
        table.insert("build".to_string(), "build_".to_string());
        Self { table }
    }
}

impl NameMap {
    /// Create the default table
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table with no entries
    pub fn empty() -> Self {
        Self {
            table: IndexMap::new(),
        }
    }

    /// Add or replace a mapping
    pub fn insert(&mut self, from: impl Into<String>, to: impl Into<String>) {
        self.table.insert(from.into(), to.into());
    }

    /// Apply the table to an already cleaned name
    pub fn map_name(&self, clean_name: &str) -> String {
        self.table
            .get(clean_name)
            .cloned()
            .unwrap_or_else(|| clean_name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cleanup_name() {
        assert_eq!(cleanup_name("virtual-network"), "virtual_network");
        assert_eq!(cleanup_name("ns:id.ref"), "ns_id_ref");
        assert_eq!(cleanup_name("plain"), "plain");
    }

    #[test]
    fn test_default_map() {
        let map = NameMap::default();
        assert_eq!(map.map_name("type"), "type_");
        assert_eq!(map.map_name("float"), "float_");
        assert_eq!(map.map_name("name"), "name");
    }

    #[test]
    fn test_custom_entries() {
        let mut map = NameMap::empty();
        assert_eq!(map.map_name("type"), "type");
        map.insert("self", "selfxx");
        assert_eq!(map.map_name("self"), "selfxx");
    }
}
