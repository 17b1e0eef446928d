//! Names of the dictionaries available in storage.

use std::sync::Arc;

use log::{error, info};

use crate::storage::Storage;

/// Snapshot of the dictionary names found in storage at startup.
///
/// A listed name is not guaranteed to load: validation happens on the first
/// [`DictionaryStore::load`](crate::dictionary::store::DictionaryStore::load).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    names: Vec<String>,
}

impl Catalog {
    /// List the storage once and keep the result.
    ///
    /// An unreadable storage location is logged and produces an empty
    /// catalog, so the service still starts without dictionaries.
    pub fn scan(storage: &Arc<dyn Storage>) -> Self {
        match storage.list_files() {
            Ok(names) => {
                info!("Dictionaries: {names:?}");
                Catalog { names }
            }
            Err(e) => {
                error!("Failed to list dictionaries: {e}");
                Catalog::default()
            }
        }
    }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Catalog {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::file::{FileStorage, FileStorageConfig};
    use crate::storage::memory::MemoryStorage;

    #[test]
    fn test_scan_memory_storage() {
        let memory = MemoryStorage::new_default();
        memory.put("pt_en.csv", "");
        memory.put("en_pt.csv", "");
        let storage: Arc<dyn Storage> = Arc::new(memory);

        let catalog = Catalog::scan(&storage);
        assert_eq!(catalog.names(), ["en_pt.csv", "pt_en.csv"]);
        assert!(catalog.contains("en_pt.csv"));
        assert!(!catalog.contains("de_pt.csv"));
    }

    #[test]
    fn test_scan_unreadable_location_is_empty() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let missing = temp_dir.path().join("recursos");
        let storage: Arc<dyn Storage> =
            Arc::new(FileStorage::new(FileStorageConfig::new(missing)).unwrap());

        let catalog = Catalog::scan(&storage);
        assert!(catalog.is_empty());
        assert_eq!(catalog.len(), 0);
    }

    #[test]
    fn test_scan_does_not_read_files() {
        let memory = Arc::new(MemoryStorage::new_default());
        memory.put("en_pt.csv", "love\tamor\n");
        let storage: Arc<dyn Storage> = memory.clone();

        Catalog::scan(&storage);
        assert_eq!(memory.total_reads(), 0);
    }
}
