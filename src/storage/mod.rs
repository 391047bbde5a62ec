//! Flat-file JSON persistence for the in-memory collections
//!
//! Each collection lives in a single JSON document that is read whole at
//! startup and rewritten whole after every mutation. Writes go to a sibling
//! temporary file which is then renamed over the target, so a crash during a
//! write leaves the previous document in place.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

/// Persistence failure for a collection file
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed data in {}: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode {}: {source}", .path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A JSON document on disk
#[derive(Debug, Clone)]
pub struct JsonFile {
    path: PathBuf,
}

impl JsonFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and decode the document.
    ///
    /// Returns `Ok(None)` when the file does not exist or holds nothing but
    /// whitespace. Undecodable content is an error.
    pub fn load<T: DeserializeOwned>(&self) -> Result<Option<T>, StorageError> {
        let data = match fs::read(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StorageError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        if data.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }

        serde_json::from_slice(&data)
            .map(Some)
            .map_err(|source| StorageError::Malformed {
                path: self.path.clone(),
                source,
            })
    }

    /// Encode and atomically replace the document
    pub fn save<T: Serialize>(&self, value: &T) -> Result<(), StorageError> {
        let data = serde_json::to_vec(value).map_err(|source| StorageError::Encode {
            path: self.path.clone(),
            source,
        })?;

        self.write_atomic(&data).map_err(|source| StorageError::Write {
            path: self.path.clone(),
            source,
        })
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn write_atomic(&self, data: &[u8]) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp_path = self.temp_path();
        let mut file = File::create(&tmp_path)?;
        file.write_all(data)?;
        file.sync_all()?;
        drop(file);

        fs::rename(&tmp_path, &self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Doc {
        names: Vec<String>,
        total: usize,
    }

    #[test]
    fn test_missing_file_loads_as_none() {
        let dir = TempDir::new().unwrap();
        let file = JsonFile::new(dir.path().join("absent.json"));
        assert!(file.load::<Doc>().unwrap().is_none());
    }

    #[test]
    fn test_blank_file_loads_as_none() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("blank.json");
        fs::write(&path, "  \n").unwrap();
        assert!(JsonFile::new(path).load::<Doc>().unwrap().is_none());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{\"names\": [").unwrap();
        let err = JsonFile::new(path).load::<Doc>().unwrap_err();
        assert!(matches!(err, StorageError::Malformed { .. }));
    }

    #[test]
    fn test_save_creates_directories_and_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let file = JsonFile::new(dir.path().join("nested").join("doc.json"));
        let doc = Doc {
            names: vec!["a".into(), "b".into()],
            total: 2,
        };

        file.save(&doc).unwrap();

        assert_eq!(file.load::<Doc>().unwrap(), Some(doc));
        assert!(!dir.path().join("nested").join("doc.json.tmp").exists());
    }

    #[test]
    fn test_save_fails_when_parent_is_a_file() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "x").unwrap();
        let file = JsonFile::new(blocker.join("doc.json"));
        let doc = Doc {
            names: vec![],
            total: 0,
        };
        assert!(matches!(file.save(&doc), Err(StorageError::Write { .. })));
    }
}
