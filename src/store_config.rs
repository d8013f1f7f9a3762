//! Store configuration.
//!
//! A [`StoreConfig`] names the on-device database and the single key the
//! book list lives under. Shells that configure the core over FFI can send it
//! as JSON; every field but `name` has a default.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Key the serialized book list is stored under.
pub const DEFAULT_STORAGE_KEY: &str = "books";

/// 10 MiB is far beyond what a personal listing collection needs.
pub const DEFAULT_MAP_SIZE: usize = 10 * 1024 * 1024;

/// Whether [`crate::book_store::BookStore::append`] checks records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    /// Reject records with empty required fields, or with a university
    /// outside [`StoreConfig::allowed_universities`] when that list is set.
    #[default]
    Strict,
    /// Persist whatever the caller submits.
    Lenient,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Database name; the LMDB environment lives in `<name>.lmdb`.
    pub name: String,
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
    #[serde(default = "default_map_size")]
    pub map_size: usize,
    #[serde(default)]
    pub validation: ValidationMode,
    /// Universities strict validation accepts. Empty accepts any.
    #[serde(default)]
    pub allowed_universities: Vec<String>,
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

fn default_map_size() -> usize {
    DEFAULT_MAP_SIZE
}

impl StoreConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            storage_key: default_storage_key(),
            map_size: DEFAULT_MAP_SIZE,
            validation: ValidationMode::default(),
            allowed_universities: Vec::new(),
        }
    }

    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    pub fn with_map_size(mut self, map_size: usize) -> Self {
        self.map_size = map_size;
        self
    }

    pub fn with_validation(mut self, validation: ValidationMode) -> Self {
        self.validation = validation;
        self
    }

    pub fn with_allowed_universities<I, U>(mut self, universities: I) -> Self
    where
        I: IntoIterator<Item = U>,
        U: Into<String>,
    {
        self.allowed_universities = universities.into_iter().map(Into::into).collect();
        self
    }

    /// Directory holding the LMDB environment.
    pub fn lmdb_dir(&self) -> PathBuf {
        PathBuf::from(format!("{}.lmdb", self.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_minimal_json() {
        let config: StoreConfig = serde_json::from_str(r#"{"name":"shelf"}"#).unwrap();
        assert_eq!(config, StoreConfig::new("shelf"));
        assert_eq!(config.storage_key, "books");
        assert_eq!(config.validation, ValidationMode::Strict);
        assert!(config.allowed_universities.is_empty());
    }

    #[test]
    fn test_allowed_universities_from_json() {
        let config: StoreConfig = serde_json::from_str(
            r#"{"name":"shelf","allowed_universities":["Aarhus Universitet"]}"#,
        )
        .unwrap();
        assert_eq!(config.allowed_universities, vec!["Aarhus Universitet".to_string()]);
    }

    #[test]
    fn test_lenient_mode_from_json() {
        let config: StoreConfig =
            serde_json::from_str(r#"{"name":"shelf","validation":"lenient"}"#).unwrap();
        assert_eq!(config.validation, ValidationMode::Lenient);
    }

    #[test]
    fn test_lmdb_dir_appends_extension() {
        let config = StoreConfig::new("data/shelf");
        assert_eq!(config.lmdb_dir(), PathBuf::from("data/shelf.lmdb"));
    }
}
