//! Client-side pagination through a dictionary.
//!
//! The service itself is stateless; readers keep a `(dictionary, position)`
//! pair and ask for one page at a time. [`Cursor`] reproduces the browser
//! client's navigation: consecutive pages overlap by two entries so the
//! reader keeps some context when moving forward or back.

use serde::{Deserialize, Serialize};

use crate::error::{MinidicError, Result};

/// Default number of entries shown per page.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Entries shared between consecutive pages.
const PAGE_OVERLAP: usize = 2;

/// Position of a reader inside a dictionary of known size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    position: usize,
    page_size: usize,
    size: usize,
}

impl Cursor {
    /// Create a cursor at the first entry of a dictionary with `size` entries.
    pub fn new(size: usize, page_size: usize) -> Result<Self> {
        if page_size <= PAGE_OVERLAP {
            return Err(MinidicError::invalid_argument(format!(
                "page size must be greater than {PAGE_OVERLAP}, got {page_size}"
            )));
        }
        Ok(Cursor {
            position: 0,
            page_size,
            size,
        })
    }

    /// Move to `position`, e.g. the result of a nearest-entry lookup.
    pub fn at(mut self, position: usize) -> Self {
        self.position = position;
        self
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    fn step(&self) -> usize {
        self.page_size - PAGE_OVERLAP
    }

    /// Jump to the first page.
    pub fn first(&mut self) {
        self.position = 0;
    }

    /// Jump to the last page.
    pub fn last(&mut self) {
        self.position = if self.size + 1 > self.page_size {
            self.size + 1 - self.page_size
        } else {
            0
        };
    }

    /// Move one page back, stopping at the start.
    pub fn previous(&mut self) {
        self.position = self.position.saturating_sub(self.step());
    }

    /// Move one page forward. Returns `false` when already on the last page.
    pub fn next(&mut self) -> bool {
        let candidate = self.position + self.step();
        if candidate < self.size {
            self.position = candidate;
            true
        } else {
            false
        }
    }

    /// `(start, end)` bounds of the current page for a range query.
    pub fn page(&self) -> (i64, i64) {
        let start = self.position as i64;
        (start, start + self.page_size as i64)
    }
}
