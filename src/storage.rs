//! Storage abstraction layer for minidic.
//!
//! Dictionaries are read through the [`Storage`] trait so the cache never
//! touches the filesystem directly. Two backends are provided:
//!
//! - [`file::FileStorage`] reads flat files from a single directory (the
//!   production backend).
//! - [`memory::MemoryStorage`] keeps files in memory and counts every read,
//!   which makes it the backend of choice for tests.
//!
//! Storage is read-only from the library's point of view: dictionaries are
//! curated by an operator and never written by the service.
//!
//! # Example
//!
//! ```
//! use minidic::storage::{StorageConfig, StorageFactory};
//! use minidic::storage::memory::MemoryStorageConfig;
//!
//! # fn main() -> minidic::error::Result<()> {
//! let storage = StorageFactory::create(StorageConfig::Memory(MemoryStorageConfig::default()))?;
//! assert!(storage.list_files()?.is_empty());
//! # Ok(())
//! # }
//! ```

use std::io::Read;
use std::sync::Arc;

use crate::error::{MinidicError, Result};

pub mod file;
pub mod memory;

/// A trait for storage backends that hold dictionary files.
///
/// This provides a pluggable interface for different storage implementations
/// like file system or memory.
pub trait Storage: Send + Sync + std::fmt::Debug {
    /// Open a file for reading.
    ///
    /// The file must exist, or this will return an error.
    fn open_input(&self, name: &str) -> Result<Box<dyn StorageInput>>;

    /// Check if a file exists.
    fn file_exists(&self, name: &str) -> bool;

    /// List all files in the storage, sorted by name.
    fn list_files(&self) -> Result<Vec<String>>;

    /// Get the size of a file in bytes.
    fn file_size(&self, name: &str) -> Result<u64>;

    /// Read a whole file as UTF-8 text.
    fn read_to_string(&self, name: &str) -> Result<String> {
        let mut input = self.open_input(name)?;
        let mut bytes = Vec::with_capacity(input.size().unwrap_or(0) as usize);
        input
            .read_to_end(&mut bytes)
            .map_err(|e| StorageError::IoError(format!("{name}: {e}")))?;

        String::from_utf8(bytes)
            .map_err(|e| StorageError::InvalidData(format!("{name}: {e}")).into())
    }
}

/// A trait for reading data from storage.
pub trait StorageInput: Read + Send + std::fmt::Debug {
    /// Get the size of the input stream.
    fn size(&self) -> Result<u64>;
}

/// Reject names that would escape the storage root.
///
/// Dictionary names arrive straight from client queries, so anything that
/// is not a plain file name is refused before it reaches a backend.
pub fn validate_name(name: &str) -> std::result::Result<(), StorageError> {
    if name.is_empty()
        || name == "."
        || name == ".."
        || name.contains('/')
        || name.contains('\\')
        || name.contains('\0')
    {
        return Err(StorageError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// Configuration for storage backends.
///
/// Each variant carries the configuration specific to that storage type,
/// including the directory for file-based storage.
#[derive(Debug, Clone)]
pub enum StorageConfig {
    /// File-based storage configuration (includes path)
    File(file::FileStorageConfig),

    /// Memory-based storage configuration
    Memory(memory::MemoryStorageConfig),
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig::Memory(memory::MemoryStorageConfig::default())
    }
}

/// A factory for creating storage instances.
pub struct StorageFactory;

impl StorageFactory {
    /// Create a new storage instance with the given configuration.
    ///
    /// # Example
    ///
    /// ```
    /// use minidic::storage::{StorageFactory, StorageConfig};
    /// use minidic::storage::file::FileStorageConfig;
    ///
    /// # fn main() -> minidic::error::Result<()> {
    /// let config = StorageConfig::File(FileStorageConfig::new("recursos"));
    /// let storage = StorageFactory::create(config)?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn create(config: StorageConfig) -> Result<Arc<dyn Storage>> {
        match config {
            StorageConfig::Memory(mem_config) => {
                let storage = memory::MemoryStorage::new(mem_config);
                Ok(Arc::new(storage))
            }
            StorageConfig::File(file_config) => {
                let storage = file::FileStorage::new(file_config)?;
                Ok(Arc::new(storage))
            }
        }
    }
}

/// Error types specific to storage operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// File not found.
    FileNotFound(String),

    /// Permission denied.
    PermissionDenied(String),

    /// Name is not a plain file name.
    InvalidName(String),

    /// File content is not valid UTF-8.
    InvalidData(String),

    /// I/O error.
    IoError(String),
}

impl StorageError {
    /// Classify an I/O error raised while accessing `name`.
    pub fn from_io(name: &str, err: &std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => StorageError::FileNotFound(name.to_string()),
            std::io::ErrorKind::PermissionDenied => {
                StorageError::PermissionDenied(name.to_string())
            }
            _ => StorageError::IoError(format!("{name}: {err}")),
        }
    }
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::FileNotFound(name) => write!(f, "File not found: {name}"),
            StorageError::PermissionDenied(name) => write!(f, "Permission denied: {name}"),
            StorageError::InvalidName(name) => write!(f, "Invalid file name: {name:?}"),
            StorageError::InvalidData(msg) => write!(f, "Invalid data: {msg}"),
            StorageError::IoError(msg) => write!(f, "I/O error: {msg}"),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<StorageError> for MinidicError {
    fn from(err: StorageError) -> Self {
        MinidicError::storage(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory::{MemoryStorage, MemoryStorageConfig};

    #[test]
    fn test_storage_config_default() {
        match StorageConfig::default() {
            StorageConfig::Memory(mem_config) => {
                assert_eq!(mem_config.initial_capacity, 16);
            }
            _ => panic!("Expected Memory config"),
        }
    }

    #[test]
    fn test_storage_error_display() {
        let err = StorageError::FileNotFound("en_pt.csv".to_string());
        assert_eq!(err.to_string(), "File not found: en_pt.csv");

        let err = StorageError::PermissionDenied("en_pt.csv".to_string());
        assert_eq!(err.to_string(), "Permission denied: en_pt.csv");

        let err = StorageError::InvalidName("../etc".to_string());
        assert_eq!(err.to_string(), "Invalid file name: \"../etc\"");

        let err = StorageError::IoError("connection failed".to_string());
        assert_eq!(err.to_string(), "I/O error: connection failed");
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("en_pt.csv").is_ok());
        assert!(validate_name(".hidden").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name("..").is_err());
        assert!(validate_name("../secret").is_err());
        assert!(validate_name("a/b.csv").is_err());
        assert!(validate_name("a\\b.csv").is_err());
    }

    #[test]
    fn test_read_to_string_rejects_invalid_utf8() {
        let storage = MemoryStorage::new(MemoryStorageConfig::default());
        storage.put("bad.csv", vec![0xff, 0xfe, b'\n']);

        let err = storage.read_to_string("bad.csv").unwrap_err();
        assert!(err.to_string().contains("Invalid data"));
    }

    #[test]
    fn test_storage_factory_memory() {
        let config = StorageConfig::Memory(MemoryStorageConfig::default());
        let storage = StorageFactory::create(config).unwrap();

        assert!(!storage.file_exists("en_pt.csv"));
    }

    #[test]
    fn test_storage_factory_file() {
        use crate::storage::file::FileStorageConfig;
        use tempfile::TempDir;

        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("en_pt.csv"), "love\tamor\n").unwrap();

        let config = StorageConfig::File(FileStorageConfig::new(temp_dir.path()));
        let storage = StorageFactory::create(config).unwrap();

        assert!(storage.file_exists("en_pt.csv"));
        assert_eq!(storage.read_to_string("en_pt.csv").unwrap(), "love\tamor\n");
    }
}
