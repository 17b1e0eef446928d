//! File-based storage implementation.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use crate::error::{MinidicError, Result};
use crate::storage::{Storage, StorageError, StorageInput, validate_name};

/// Configuration for [`FileStorage`].
#[derive(Debug, Clone)]
pub struct FileStorageConfig {
    /// Directory holding the dictionary files.
    pub path: PathBuf,

    /// Buffer size for reads.
    pub buffer_size: usize,
}

impl FileStorageConfig {
    /// Create a configuration rooted at `path` with default settings.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        FileStorageConfig {
            path: path.as_ref().to_path_buf(),
            buffer_size: 65536,
        }
    }
}

/// A file-based storage implementation over a flat directory.
#[derive(Debug)]
pub struct FileStorage {
    /// The root directory for storage.
    directory: PathBuf,
    /// Storage configuration.
    config: FileStorageConfig,
}

impl FileStorage {
    /// Create a new file storage over the configured directory.
    ///
    /// A missing directory is accepted: listing it fails later and the
    /// catalog stays empty. A path that exists but is not a directory is a
    /// configuration error.
    pub fn new(config: FileStorageConfig) -> Result<Self> {
        let directory = config.path.clone();

        if directory.exists() && !directory.is_dir() {
            return Err(MinidicError::storage(format!(
                "Path is not a directory: {}",
                directory.display()
            )));
        }

        Ok(FileStorage { directory, config })
    }

    /// The root directory of this storage.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Get the full path for a file name.
    fn file_path(&self, name: &str) -> std::result::Result<PathBuf, StorageError> {
        validate_name(name)?;
        Ok(self.directory.join(name))
    }
}

impl Storage for FileStorage {
    fn open_input(&self, name: &str) -> Result<Box<dyn StorageInput>> {
        let path = self.file_path(name)?;
        let file = File::open(&path).map_err(|e| StorageError::from_io(name, &e))?;

        Ok(Box::new(FileInput::new(file, self.config.buffer_size)?))
    }

    fn file_exists(&self, name: &str) -> bool {
        self.file_path(name).map(|p| p.is_file()).unwrap_or(false)
    }

    fn list_files(&self) -> Result<Vec<String>> {
        let mut files = Vec::new();

        for entry in std::fs::read_dir(&self.directory)
            .map_err(|e| StorageError::from_io(&self.directory.display().to_string(), &e))?
        {
            let entry = entry.map_err(|e| StorageError::IoError(e.to_string()))?;
            let path = entry.path();

            // Only entries open_input can serve: regular files with UTF-8 names.
            if path.is_file()
                && let Some(name) = path.file_name().and_then(|n| n.to_str())
            {
                files.push(name.to_string());
            }
        }

        files.sort();
        Ok(files)
    }

    fn file_size(&self, name: &str) -> Result<u64> {
        let path = self.file_path(name)?;
        let metadata = path
            .metadata()
            .map_err(|e| StorageError::from_io(name, &e))?;

        Ok(metadata.len())
    }
}

/// A buffered file input.
#[derive(Debug)]
pub struct FileInput {
    reader: BufReader<File>,
    size: u64,
}

impl FileInput {
    fn new(file: File, buffer_size: usize) -> Result<Self> {
        let metadata = file
            .metadata()
            .map_err(|e| MinidicError::storage(format!("Failed to get file metadata: {e}")))?;

        let size = metadata.len();
        let reader = BufReader::with_capacity(buffer_size, file);

        Ok(FileInput { reader, size })
    }
}

impl Read for FileInput {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.reader.read(buf)
    }
}

impl StorageInput for FileInput {
    fn size(&self) -> Result<u64> {
        Ok(self.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn storage_with(files: &[(&str, &str)]) -> (TempDir, FileStorage) {
        let temp_dir = TempDir::new().unwrap();
        for (name, content) in files {
            std::fs::write(temp_dir.path().join(name), content).unwrap();
        }
        let storage = FileStorage::new(FileStorageConfig::new(temp_dir.path())).unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_file_storage_read() {
        let (_dir, storage) = storage_with(&[("en_pt.csv", "love\tamor\n")]);

        let mut input = storage.open_input("en_pt.csv").unwrap();
        assert_eq!(input.size().unwrap(), 11);

        let mut buffer = String::new();
        input.read_to_string(&mut buffer).unwrap();
        assert_eq!(buffer, "love\tamor\n");
        assert_eq!(storage.file_size("en_pt.csv").unwrap(), 11);
    }

    #[test]
    fn test_file_storage_list_skips_directories() {
        let (dir, storage) = storage_with(&[("b.csv", ""), ("a.csv", "")]);
        std::fs::create_dir(dir.path().join("nested")).unwrap();

        assert_eq!(storage.list_files().unwrap(), vec!["a.csv", "b.csv"]);
    }

    #[test]
    fn test_file_storage_missing_file() {
        let (_dir, storage) = storage_with(&[]);

        let err = storage.open_input("nope.csv").unwrap_err();
        assert_eq!(err.to_string(), "Storage error: File not found: nope.csv");
        assert!(!storage.file_exists("nope.csv"));
    }

    #[test]
    fn test_file_storage_rejects_traversal() {
        let (_dir, storage) = storage_with(&[]);

        assert!(storage.open_input("../outside.csv").is_err());
        assert!(!storage.file_exists("../outside.csv"));
    }

    #[test]
    fn test_missing_directory_fails_on_listing() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("recursos");

        let storage = FileStorage::new(FileStorageConfig::new(&missing)).unwrap();
        assert!(storage.list_files().is_err());
    }

    #[test]
    fn test_path_to_regular_file_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("plain.txt");
        std::fs::write(&file_path, "x").unwrap();

        assert!(FileStorage::new(FileStorageConfig::new(&file_path)).is_err());
    }
}
