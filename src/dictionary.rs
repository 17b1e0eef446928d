//! Dictionary cache and ordered lookup.
//!
//! A dictionary is a flat text file, one entry per line, fields separated
//! by tabs, first field the lowercase headword, lines sorted by headword in
//! ordinal order. This module loads such files once, keeps them resident
//! and answers positional and nearest-entry lookups against them.
//!
//! - [`search`]: predecessor search over sorted sequences
//! - [`entry`]: the immutable in-memory [`Dictionary`]
//! - [`store`]: the load-once [`DictionaryStore`] shared by all requests
//! - [`catalog`]: names available in storage, listed at startup
//! - [`cursor`]: pagination helper used by readers

pub mod catalog;
pub mod cursor;
pub mod entry;
pub mod search;
pub mod store;

pub use catalog::Catalog;
pub use cursor::Cursor;
pub use entry::{Dictionary, DictionaryInfo, Entry};
pub use store::{DictionaryStore, LoadPolicy, StoreConfig};
