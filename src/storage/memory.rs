//! In-memory storage implementation for testing and embedding.

use std::collections::HashMap;
use std::io::{Cursor, Read};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, RwLock};

use crate::error::Result;
use crate::storage::{Storage, StorageError, StorageInput, validate_name};

/// Configuration for [`MemoryStorage`].
#[derive(Debug, Clone)]
pub struct MemoryStorageConfig {
    /// Initial capacity of the file map.
    pub initial_capacity: usize,

    /// Artificial delay applied to every open, for exercising slow backends.
    pub read_latency: Option<Duration>,
}

impl Default for MemoryStorageConfig {
    fn default() -> Self {
        MemoryStorageConfig {
            initial_capacity: 16,
            read_latency: None,
        }
    }
}

/// An in-memory storage implementation.
///
/// Every successful or failed [`Storage::open_input`] call is counted per
/// name, so callers can assert how many times a file was actually read.
#[derive(Debug)]
pub struct MemoryStorage {
    /// The files stored in memory.
    files: RwLock<HashMap<String, Arc<[u8]>>>,
    /// Number of opens per file name.
    reads: Mutex<HashMap<String, usize>>,
    /// Storage configuration.
    config: MemoryStorageConfig,
}

impl MemoryStorage {
    /// Create a new memory storage.
    pub fn new(config: MemoryStorageConfig) -> Self {
        MemoryStorage {
            files: RwLock::new(HashMap::with_capacity(config.initial_capacity)),
            reads: Mutex::new(HashMap::new()),
            config,
        }
    }

    /// Create a new memory storage with default configuration.
    pub fn new_default() -> Self {
        Self::new(MemoryStorageConfig::default())
    }

    /// Store `data` under `name`, replacing any previous content.
    pub fn put<D: Into<Vec<u8>>>(&self, name: &str, data: D) {
        let data: Vec<u8> = data.into();
        self.files.write().insert(name.to_string(), Arc::from(data));
    }

    /// Remove a file.
    pub fn remove(&self, name: &str) -> bool {
        self.files.write().remove(name).is_some()
    }

    /// Number of times `name` has been opened for reading.
    pub fn read_count(&self, name: &str) -> usize {
        self.reads.lock().get(name).copied().unwrap_or(0)
    }

    /// Total number of opens across all names.
    pub fn total_reads(&self) -> usize {
        self.reads.lock().values().sum()
    }

    /// Get the number of files stored.
    pub fn file_count(&self) -> usize {
        self.files.read().len()
    }
}

impl Storage for MemoryStorage {
    fn open_input(&self, name: &str) -> Result<Box<dyn StorageInput>> {
        validate_name(name)?;
        *self.reads.lock().entry(name.to_string()).or_insert(0) += 1;

        if let Some(latency) = self.config.read_latency {
            std::thread::sleep(latency);
        }

        let data = self
            .files
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| StorageError::FileNotFound(name.to_string()))?;

        Ok(Box::new(MemoryInput::new(data)))
    }

    fn file_exists(&self, name: &str) -> bool {
        self.files.read().contains_key(name)
    }

    fn list_files(&self) -> Result<Vec<String>> {
        let mut file_names: Vec<String> = self.files.read().keys().cloned().collect();
        file_names.sort();
        Ok(file_names)
    }

    fn file_size(&self, name: &str) -> Result<u64> {
        let files = self.files.read();
        let data = files
            .get(name)
            .ok_or_else(|| StorageError::FileNotFound(name.to_string()))?;

        Ok(data.len() as u64)
    }
}

/// A memory-based input implementation.
#[derive(Debug)]
pub struct MemoryInput {
    cursor: Cursor<Arc<[u8]>>,
    size: u64,
}

impl MemoryInput {
    fn new(data: Arc<[u8]>) -> Self {
        let size = data.len() as u64;
        MemoryInput {
            cursor: Cursor::new(data),
            size,
        }
    }
}

impl Read for MemoryInput {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.cursor.read(buf)
    }
}

impl StorageInput for MemoryInput {
    fn size(&self) -> Result<u64> {
        Ok(self.size)
    }
}
