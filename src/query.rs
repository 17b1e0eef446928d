//! Query service answering client requests against the dictionary store.
//!
//! Requests are resolved once, at the transport boundary, into a closed
//! [`Query`] enum. [`QueryService`] then answers each variant with the
//! plain-text body the browser client expects:
//!
//! | Kind | Parameters | Body |
//! |---|---|---|
//! | [`QueryKind::Entries`] | `dic`, `inicio`, `fim` | newline-joined raw entries |
//! | [`QueryKind::Nearest`] | `dic`, `verbete` | decimal position |
//! | [`QueryKind::Open`] | `dicionario` | decimal entry count |
//! | [`QueryKind::Catalog`] | none | newline-joined dictionary names |
//!
//! Malformed bounds and unknown dictionaries are answered softly with an
//! empty body or position `0`. Only a failed dictionary read is an error.

use std::collections::HashMap;
use std::sync::Arc;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::dictionary::{Catalog, DictionaryStore, StoreConfig};
use crate::error::{MinidicError, Result};
use crate::storage::Storage;

/// Parameter naming the dictionary of a range or nearest query.
pub const PARAM_DICTIONARY: &str = "dic";
/// Parameter naming the dictionary of an open query.
pub const PARAM_OPEN_DICTIONARY: &str = "dicionario";
/// First position of a range query.
pub const PARAM_START: &str = "inicio";
/// End position (exclusive) of a range query.
pub const PARAM_END: &str = "fim";
/// Search term of a nearest query.
pub const PARAM_TERM: &str = "verbete";

/// The kinds of query the service answers, keyed by request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryKind {
    Entries,
    Nearest,
    Open,
    Catalog,
}

impl QueryKind {
    pub const ALL: [QueryKind; 4] = [
        QueryKind::Entries,
        QueryKind::Nearest,
        QueryKind::Open,
        QueryKind::Catalog,
    ];

    /// Request path served by this kind.
    pub fn path(&self) -> &'static str {
        match self {
            QueryKind::Entries => "/verbetes",
            QueryKind::Nearest => "/buscar",
            QueryKind::Open => "/carregar",
            QueryKind::Catalog => "/dicionarios",
        }
    }

    pub fn from_path(path: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.path() == path)
    }
}

/// A fully parsed client query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Query {
    /// Entries `start..end` of a dictionary.
    Entries { name: String, start: i64, end: i64 },
    /// Position of the entry nearest to `term`.
    Nearest { name: String, term: String },
    /// Load a dictionary and report its size.
    Open { name: String },
    /// Names of the dictionaries in the catalog.
    Catalog,
}

impl Query {
    /// Build a query of `kind` from request parameters.
    ///
    /// Missing names and terms default to the empty string. Range bounds
    /// that do not start with a number fail with
    /// [`MinidicError::MalformedQuery`].
    pub fn parse(kind: QueryKind, params: &HashMap<String, String>) -> Result<Self> {
        let param = |key: &str| params.get(key).cloned().unwrap_or_default();

        Ok(match kind {
            QueryKind::Entries => {
                let start = parse_bound(PARAM_START, params.get(PARAM_START))?;
                let end = parse_bound(PARAM_END, params.get(PARAM_END))?;
                Query::Entries {
                    name: param(PARAM_DICTIONARY),
                    start,
                    end,
                }
            }
            QueryKind::Nearest => Query::Nearest {
                name: param(PARAM_DICTIONARY),
                term: param(PARAM_TERM),
            },
            QueryKind::Open => Query::Open {
                name: param(PARAM_OPEN_DICTIONARY),
            },
            QueryKind::Catalog => Query::Catalog,
        })
    }

    pub fn kind(&self) -> QueryKind {
        match self {
            Query::Entries { .. } => QueryKind::Entries,
            Query::Nearest { .. } => QueryKind::Nearest,
            Query::Open { .. } => QueryKind::Open,
            Query::Catalog => QueryKind::Catalog,
        }
    }
}

/// Parse an integer the lenient way browsers do: leading whitespace and a
/// sign are accepted, a `0x` prefix switches to hexadecimal, parsing stops at
/// the first non-digit, and at least one digit is required. Values beyond
/// `i64` saturate.
pub fn parse_integer_prefix(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let (negative, rest) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let (radix, digits) = match rest.get(..2) {
        Some("0x" | "0X") => (16, &rest[2..]),
        _ => (10, rest),
    };

    let mut value: i64 = 0;
    let mut seen_digit = false;
    for digit in digits.chars().map_while(|c| c.to_digit(radix)) {
        seen_digit = true;
        value = value
            .saturating_mul(i64::from(radix))
            .saturating_add(i64::from(digit));
    }

    if !seen_digit {
        return None;
    }
    Some(if negative { -value } else { value })
}

fn parse_bound(key: &str, value: Option<&String>) -> Result<i64> {
    let value = value.ok_or_else(|| MinidicError::malformed_query(format!("missing '{key}'")))?;
    parse_integer_prefix(value)
        .ok_or_else(|| MinidicError::malformed_query(format!("'{key}' is not a number: {value:?}")))
}

/// Answers queries by composing the dictionary store and the catalog.
///
/// Calls may block on the first read of a dictionary; async callers should
/// run them on a blocking-capable thread.
#[derive(Debug, Clone)]
pub struct QueryService {
    store: Arc<DictionaryStore>,
    catalog: Arc<Catalog>,
}

impl QueryService {
    pub fn new(store: Arc<DictionaryStore>, catalog: Arc<Catalog>) -> Self {
        QueryService { store, catalog }
    }

    /// Scan `storage` for the catalog and build a service over a fresh store.
    pub fn from_storage(storage: Arc<dyn Storage>, config: StoreConfig) -> Self {
        let catalog = Catalog::scan(&storage);
        let store = DictionaryStore::new(storage, config);
        QueryService::new(Arc::new(store), Arc::new(catalog))
    }

    pub fn store(&self) -> &Arc<DictionaryStore> {
        &self.store
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// Load `name` and return its entry count as text.
    pub fn open_dictionary(&self, name: &str) -> Result<String> {
        let info = self.store.load(name)?;
        Ok(info.size.to_string())
    }

    /// Raw entries `start..end` of `name`, newline-joined.
    pub fn get_entries(&self, name: &str, start: i64, end: i64) -> Result<String> {
        Ok(self.store.get_range(name, start, end)?.join("\n"))
    }

    /// Position of the entry nearest to `term` in `name`, as text.
    pub fn nearest_position(&self, name: &str, term: &str) -> Result<String> {
        Ok(self.store.find_nearest(name, term)?.to_string())
    }

    /// Catalog names, newline-joined.
    pub fn list_dictionaries(&self) -> String {
        self.catalog.names().join("\n")
    }

    /// Answer a parsed query.
    pub fn execute(&self, query: &Query) -> Result<String> {
        debug!("Executing {query:?}");
        match query {
            Query::Entries { name, start, end } => self.get_entries(name, *start, *end),
            Query::Nearest { name, term } => self.nearest_position(name, term),
            Query::Open { name } => self.open_dictionary(name),
            Query::Catalog => Ok(self.list_dictionaries()),
        }
    }

    /// Parse and answer a raw request, absorbing malformed input.
    ///
    /// A query that cannot be parsed is answered with an empty body; errors
    /// from [`QueryService::execute`] are returned unchanged.
    pub fn respond(&self, kind: QueryKind, params: &HashMap<String, String>) -> Result<String> {
        match Query::parse(kind, params) {
            Ok(query) => self.execute(&query),
            Err(MinidicError::MalformedQuery(reason)) => {
                debug!("Malformed {kind:?} query: {reason}");
                Ok(String::new())
            }
            Err(err) => Err(err),
        }
    }
}
