//! # minidic
//!
//! A small word-lookup service over flat, pre-sorted, tab-delimited
//! dictionary files.
//!
//! ## Features
//!
//! - Load-once, cache-forever dictionary store shared by concurrent requests
//! - Predecessor search for "nearest entry" lookups on misspelled words
//! - Soft-failing range and position queries for simple clients
//! - Pluggable storage backends (filesystem, memory)
//! - Thin HTTP transport for the paging browser client

pub mod cli;
pub mod dictionary;
pub mod error;
pub mod query;
pub mod server;
pub mod storage;

pub mod prelude {
    pub use crate::dictionary::{
        Catalog, Cursor, Dictionary, DictionaryInfo, DictionaryStore, LoadPolicy, StoreConfig,
    };
    pub use crate::error::{MinidicError, Result};
    pub use crate::query::{Query, QueryKind, QueryService};
    pub use crate::storage::{Storage, StorageConfig, StorageFactory};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
