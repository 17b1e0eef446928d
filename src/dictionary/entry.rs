//! In-memory dictionary representation.

use serde::{Deserialize, Serialize};

use crate::dictionary::search::predecessor_by;

/// Separator between the fields of an entry.
pub const FIELD_SEPARATOR: char = '\t';

/// Name and entry count of a loaded dictionary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictionaryInfo {
    /// File name the dictionary was loaded from.
    pub name: String,
    /// Number of entries.
    pub size: usize,
}

/// One parsed line of a dictionary file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry<'a> {
    /// The first field, lowercase by file convention.
    pub headword: &'a str,
    /// The remaining fields, in file order.
    pub definitions: Vec<&'a str>,
}

impl<'a> Entry<'a> {
    /// Split a raw line into headword and definition fields.
    pub fn parse(line: &'a str) -> Self {
        let mut fields = line.split(FIELD_SEPARATOR);
        let headword = fields.next().unwrap_or_default();
        Entry {
            headword,
            definitions: fields.collect(),
        }
    }
}

/// Normalise a search term the same way headwords are stored.
///
/// Dictionary files keep headwords in lowercase, so the only transformation
/// is Unicode lowercasing. No trimming or accent folding happens here.
pub fn fold_term(term: &str) -> String {
    term.to_lowercase()
}

/// An immutable, sorted sequence of raw entry lines.
///
/// Entries keep their original text (fields still tab-joined); the headword
/// boundary of each line is computed once at construction.
#[derive(Debug)]
pub struct Dictionary {
    name: String,
    entries: Vec<String>,
    headword_lens: Vec<usize>,
}

impl Dictionary {
    /// Build a dictionary from the full text of its file.
    ///
    /// The text is split on line terminators (`\n` or `\r\n`). A terminator
    /// at the very end of the file does not produce an extra empty entry.
    pub fn parse(name: &str, text: &str) -> Self {
        Self::from_lines(name, text.lines())
    }

    /// Build a dictionary from already split lines.
    pub fn from_lines<I, S>(name: &str, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries: Vec<String> = lines.into_iter().map(Into::into).collect();
        let headword_lens = entries
            .iter()
            .map(|line| line.find(FIELD_SEPARATOR).unwrap_or(line.len()))
            .collect();

        Dictionary {
            name: name.to_string(),
            entries,
            headword_lens,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn info(&self) -> DictionaryInfo {
        DictionaryInfo {
            name: self.name.clone(),
            size: self.len(),
        }
    }

    /// All raw entry lines in order.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Raw line at `index`.
    pub fn entry(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }

    /// Headword of the entry at `index`.
    pub fn headword(&self, index: usize) -> Option<&str> {
        self.entries
            .get(index)
            .map(|line| &line[..self.headword_lens[index]])
    }

    /// Slice of entries between `start` (inclusive) and `end` (exclusive).
    ///
    /// `end` is clamped to the dictionary size. The slice is empty when
    /// `start` is outside `[0, len)` or not below the clamped `end`.
    pub fn range(&self, start: i64, end: i64) -> &[String] {
        let size = self.entries.len() as i64;
        let end = end.min(size);

        if start < 0 || start >= size || start >= end {
            return &[];
        }

        &self.entries[start as usize..end as usize]
    }

    /// Index of the last entry whose headword is `<=` the folded `term`.
    pub fn predecessor(&self, term: &str) -> Option<usize> {
        let key = fold_term(term);
        predecessor_by(self.entries.len(), |i| {
            key.as_str().cmp(&self.entries[i][..self.headword_lens[i]])
        })
    }

    /// Position a reader should be taken to when looking up `term`.
    ///
    /// Same as [`Dictionary::predecessor`], except that a term sorting before
    /// every entry maps to the first position.
    pub fn nearest(&self, term: &str) -> usize {
        self.predecessor(term).unwrap_or(0)
    }
}
