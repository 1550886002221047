//! System properties
//!
//! Small key/value flags that other parts of the vehicle publish, such as
//! `reversegear`. Each property lives in its own file under a property
//! directory; the trimmed file contents are the value.

use crate::{HalError, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Default property directory
pub const DEFAULT_PROPERTY_DIR: &str = "/data/vendor/vendorhal/properties";

/// Read access to named properties
pub trait PropertySource {
    /// Get a property value, `None` if it is not set
    fn get(&self, name: &str) -> Result<Option<String>>;
}

/// True only for a property whose value is exactly `"1"`
pub fn is_property_true<P: PropertySource + ?Sized>(source: &P, name: &str) -> Result<bool> {
    Ok(source.get(name)?.as_deref() == Some("1"))
}

/// Directory-backed property store
#[derive(Debug, Clone)]
pub struct FilePropertyStore {
    dir: PathBuf,
}

impl FilePropertyStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Set a property, creating the directory if needed
    pub fn set(&self, name: &str, value: &str) -> Result<()> {
        let path = self.path_for(name)?;
        fs::create_dir_all(&self.dir)?;
        fs::write(&path, value)?;
        tracing::debug!("Property {} set to {:?}", name, value);
        Ok(())
    }

    /// Property names map to single path components
    fn path_for(&self, name: &str) -> Result<PathBuf> {
        if name.is_empty() || name.contains('/') || name == "." || name == ".." {
            return Err(HalError::InvalidPropertyName(name.to_string()));
        }
        Ok(self.dir.join(name))
    }
}

impl Default for FilePropertyStore {
    fn default() -> Self {
        Self::new(DEFAULT_PROPERTY_DIR)
    }
}

impl PropertySource for FilePropertyStore {
    fn get(&self, name: &str) -> Result<Option<String>> {
        let path = self.path_for(name)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents.trim().to_string())),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_property_is_none() {
        let dir = TempDir::new().unwrap();
        let store = FilePropertyStore::new(dir.path());
        assert_eq!(store.get("reversegear").unwrap(), None);
        assert!(!is_property_true(&store, "reversegear").unwrap());
    }

    #[test]
    fn test_set_and_get_trims() {
        let dir = TempDir::new().unwrap();
        let store = FilePropertyStore::new(dir.path().join("props"));

        store.set("reversegear", "1").unwrap();
        assert_eq!(store.get("reversegear").unwrap().as_deref(), Some("1"));

        fs::write(dir.path().join("props/reversegear"), "1\n").unwrap();
        assert!(is_property_true(&store, "reversegear").unwrap());
    }

    #[test]
    fn test_only_exact_one_is_true() {
        let dir = TempDir::new().unwrap();
        let store = FilePropertyStore::new(dir.path());

        for value in ["0", "true", "11", ""] {
            store.set("reversegear", value).unwrap();
            assert!(
                !is_property_true(&store, "reversegear").unwrap(),
                "{value:?} should not be true"
            );
        }
    }

    #[test]
    fn test_rejects_path_like_names() {
        let store = FilePropertyStore::new("/tmp");
        assert!(matches!(
            store.get("../etc/passwd"),
            Err(HalError::InvalidPropertyName(_))
        ));
        assert!(matches!(store.get(""), Err(HalError::InvalidPropertyName(_))));
    }
}
