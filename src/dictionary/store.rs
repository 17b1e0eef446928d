//! Process-wide dictionary cache.
//!
//! [`DictionaryStore`] reads each dictionary file at most once and keeps the
//! parsed [`Dictionary`] for the rest of the process. There is no eviction
//! and no refresh: files are assumed static while the service runs, and an
//! operator picks up changes by restarting.
//!
//! Every name owns a slot holding a [`OnceCell`]. Concurrent first loads of
//! the same name all wait on that cell, so only one of them reaches the
//! storage backend and all of them observe the same outcome, success or
//! failure. A failed slot is dropped once its outcome is settled, so a later
//! call reads the file again. Loads of
//! different names proceed independently, and readers of an already cached
//! dictionary only take the map's read lock.

use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, info, warn};
use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::dictionary::entry::{Dictionary, DictionaryInfo};
use crate::error::{MinidicError, Result};
use crate::storage::Storage;

/// How range and nearest queries treat a dictionary that was never loaded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadPolicy {
    /// Only an explicit [`DictionaryStore::load`] reads a file. Queries on
    /// unloaded names get the soft defaults (no entries, position 0).
    #[default]
    Explicit,
    /// Queries on unloaded names load the dictionary first.
    OnDemand,
}

/// Configuration for [`DictionaryStore`].
#[derive(Debug, Clone, Default)]
pub struct StoreConfig {
    /// Policy for queries that reference an unloaded dictionary.
    pub load_policy: LoadPolicy,
}

/// Outcome of one read, shared by every caller that waited on it. The error
/// side keeps only the reason so it can be handed to each caller.
type LoadOutcome = std::result::Result<Arc<Dictionary>, String>;

type Slot = Arc<OnceCell<LoadOutcome>>;

/// Load-once, cache-forever store of dictionaries keyed by file name.
#[derive(Debug)]
pub struct DictionaryStore {
    storage: Arc<dyn Storage>,
    config: StoreConfig,
    slots: RwLock<HashMap<String, Slot>>,
}

impl DictionaryStore {
    /// Create an empty store reading from `storage`.
    pub fn new(storage: Arc<dyn Storage>, config: StoreConfig) -> Self {
        DictionaryStore {
            storage,
            config,
            slots: RwLock::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    /// Load `name` if needed and return its metadata.
    ///
    /// A cached dictionary is returned without any I/O. Otherwise the whole
    /// file is read, split into entries and cached. Read failures surface as
    /// [`MinidicError::ResourceUnavailable`] and leave nothing cached, so a
    /// later call retries the read.
    pub fn load(&self, name: &str) -> Result<DictionaryInfo> {
        Ok(self.load_dictionary(name)?.info())
    }

    /// Like [`DictionaryStore::load`], returning the dictionary itself.
    pub fn load_dictionary(&self, name: &str) -> Result<Arc<Dictionary>> {
        if let Some(dictionary) = self.get(name) {
            debug!("Dictionary '{name}' served from cache");
            return Ok(dictionary);
        }

        let slot = Arc::clone(self.slots.write().entry(name.to_string()).or_default());

        match slot.get_or_init(|| self.read_dictionary(name)) {
            Ok(dictionary) => Ok(Arc::clone(dictionary)),
            Err(reason) => {
                self.discard_failed_slot(name, &slot);
                Err(MinidicError::resource_unavailable(name, reason))
            }
        }
    }

    fn read_dictionary(&self, name: &str) -> LoadOutcome {
        let text = self.storage.read_to_string(name).map_err(|e| {
            warn!("Failed to read dictionary '{name}': {e}");
            e.to_string()
        })?;

        let dictionary = Dictionary::parse(name, &text);
        info!(
            "Loaded dictionary '{}' ({} entries)",
            dictionary.name(),
            dictionary.len()
        );
        Ok(Arc::new(dictionary))
    }

    /// Drop a slot whose load failed so the next call retries the read.
    fn discard_failed_slot(&self, name: &str, slot: &Slot) {
        let mut slots = self.slots.write();
        if slots
            .get(name)
            .is_some_and(|current| Arc::ptr_eq(current, slot))
        {
            slots.remove(name);
        }
    }

    /// The cached dictionary for `name`, if it has been loaded.
    pub fn get(&self, name: &str) -> Option<Arc<Dictionary>> {
        self.slots
            .read()
            .get(name)
            .and_then(|slot| slot.get()?.as_ref().ok().cloned())
    }

    pub fn is_loaded(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Metadata of every loaded dictionary, sorted by name.
    pub fn loaded(&self) -> Vec<DictionaryInfo> {
        let mut infos: Vec<DictionaryInfo> = self
            .slots
            .read()
            .values()
            .filter_map(|slot| match slot.get()? {
                Ok(dictionary) => Some(dictionary.info()),
                Err(_) => None,
            })
            .collect();
        infos.sort_by(|a, b| a.name.cmp(&b.name));
        infos
    }

    /// Resolve `name` according to the configured [`LoadPolicy`].
    ///
    /// Fails with [`MinidicError::UnknownDictionary`] when the dictionary is
    /// not cached and the policy does not allow loading it here.
    pub fn lookup(&self, name: &str) -> Result<Arc<Dictionary>> {
        if let Some(dictionary) = self.get(name) {
            return Ok(dictionary);
        }

        match self.config.load_policy {
            LoadPolicy::Explicit => Err(MinidicError::unknown_dictionary(name)),
            LoadPolicy::OnDemand => self.load_dictionary(name),
        }
    }

    /// Raw entry lines between `start` (inclusive) and `end` (exclusive).
    ///
    /// An unknown dictionary yields no entries. Under
    /// [`LoadPolicy::OnDemand`] a failed load is returned as an error.
    pub fn get_range(&self, name: &str, start: i64, end: i64) -> Result<Vec<String>> {
        match self.lookup(name) {
            Ok(dictionary) => Ok(dictionary.range(start, end).to_vec()),
            Err(MinidicError::UnknownDictionary(_)) => Ok(Vec::new()),
            Err(err) => Err(err),
        }
    }

    /// Position of the nearest entry to `term`, or 0 for an unknown
    /// dictionary.
    pub fn find_nearest(&self, name: &str, term: &str) -> Result<usize> {
        match self.lookup(name) {
            Ok(dictionary) => Ok(dictionary.nearest(term)),
            Err(MinidicError::UnknownDictionary(_)) => Ok(0),
            Err(err) => Err(err),
        }
    }
}
