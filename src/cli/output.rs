//! Output formatting for CLI commands.

use serde::{Deserialize, Serialize};

use crate::cli::args::{MinidicArgs, OutputFormat};
use crate::dictionary::Entry;
use crate::error::Result;

/// Human-readable rendering of a command result.
pub trait HumanOutput {
    /// Render the result as lines of text.
    fn human_lines(&self) -> Vec<String>;
}

/// One dictionary known to the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogItem {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytes: Option<u64>,
}

/// Result structure for listing dictionaries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogListing {
    pub directory: String,
    pub dictionaries: Vec<CatalogItem>,
}

/// Result structure for opening a dictionary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenResult {
    pub name: String,
    pub size: usize,
}

/// A single entry split into its fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryView {
    pub position: i64,
    pub headword: String,
    pub definitions: Vec<String>,
}

impl EntryView {
    pub fn new(position: i64, line: &str) -> Self {
        let entry = Entry::parse(line);
        EntryView {
            position,
            headword: entry.headword.to_string(),
            definitions: entry.definitions.into_iter().map(str::to_string).collect(),
        }
    }
}

/// Result structure for a range of entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntriesResult {
    pub name: String,
    pub start: i64,
    pub end: i64,
    pub entries: Vec<EntryView>,
}

/// Result structure for a nearest-entry lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NearestResult {
    pub name: String,
    pub term: String,
    pub position: usize,
    pub entry: Option<EntryView>,
}

/// Result structure for browsing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowseResult {
    pub name: String,
    pub size: usize,
    pub pages: Vec<EntriesResult>,
}

fn entry_line(entry: &EntryView) -> String {
    format!(
        "{:>6}. {}  {}",
        entry.position,
        entry.headword,
        entry.definitions.join(" | ")
    )
}

impl HumanOutput for CatalogListing {
    fn human_lines(&self) -> Vec<String> {
        if self.dictionaries.is_empty() {
            return vec![format!("No dictionaries in {}", self.directory)];
        }
        self.dictionaries
            .iter()
            .map(|item| match item.bytes {
                Some(bytes) => format!("{:>12}  {}", bytes, item.name),
                None => item.name.clone(),
            })
            .collect()
    }
}

impl HumanOutput for OpenResult {
    fn human_lines(&self) -> Vec<String> {
        vec![format!("{}: {} entries", self.name, self.size)]
    }
}

impl HumanOutput for EntriesResult {
    fn human_lines(&self) -> Vec<String> {
        if self.entries.is_empty() {
            return vec![format!("No entries in [{}, {})", self.start, self.end)];
        }
        self.entries.iter().map(entry_line).collect()
    }
}

impl HumanOutput for NearestResult {
    fn human_lines(&self) -> Vec<String> {
        let mut lines = vec![format!("{:?} -> position {}", self.term, self.position)];
        if let Some(entry) = &self.entry {
            lines.push(entry_line(entry));
        }
        lines
    }
}

impl HumanOutput for BrowseResult {
    fn human_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for (i, page) in self.pages.iter().enumerate() {
            if i > 0 {
                lines.push(String::new());
            }
            lines.push(format!(
                "── {} [{}, {}) of {} ──",
                self.name,
                page.start,
                page.end.min(self.size as i64),
                self.size
            ));
            lines.extend(page.human_lines());
        }
        lines
    }
}

/// Output a result in the specified format.
pub fn output_result<T>(message: &str, result: &T, args: &MinidicArgs) -> Result<()>
where
    T: Serialize + HumanOutput,
{
    match args.output_format {
        OutputFormat::Human => output_human(message, result, args),
        OutputFormat::Json => output_json(result, args),
    }
}

/// Output in human-readable format.
fn output_human<T: HumanOutput>(message: &str, result: &T, args: &MinidicArgs) -> Result<()> {
    if args.verbosity() > 1 {
        println!("{message}");
        println!();
    }

    for line in result.human_lines() {
        println!("{line}");
    }
    Ok(())
}

/// Output in JSON format.
fn output_json<T: Serialize>(result: &T, args: &MinidicArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };

    println!("{json}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_view_splits_fields() {
        let view = EntryView::new(4, "love\tamor\tpaixão");

        assert_eq!(view.position, 4);
        assert_eq!(view.headword, "love");
        assert_eq!(view.definitions, vec!["amor", "paixão"]);
        assert_eq!(entry_line(&view), "     4. love  amor | paixão");
    }

    #[test]
    fn test_catalog_listing_lines() {
        let listing = CatalogListing {
            directory: "recursos".into(),
            dictionaries: vec![
                CatalogItem {
                    name: "en_pt.csv".into(),
                    bytes: None,
                },
                CatalogItem {
                    name: "pt_en.csv".into(),
                    bytes: Some(2048),
                },
            ],
        };

        assert_eq!(
            listing.human_lines(),
            vec!["en_pt.csv".to_string(), "        2048  pt_en.csv".to_string()]
        );

        let empty = CatalogListing {
            directory: "recursos".into(),
            dictionaries: Vec::new(),
        };
        assert_eq!(empty.human_lines(), vec!["No dictionaries in recursos"]);
    }

    #[test]
    fn test_entries_json_shape() {
        let result = EntriesResult {
            name: "f.csv".into(),
            start: 0,
            end: 1,
            entries: vec![EntryView::new(0, "apple\tfruit")],
        };

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["entries"][0]["headword"], "apple");
        assert_eq!(value["entries"][0]["definitions"][0], "fruit");
    }

    #[test]
    fn test_nearest_lines() {
        let result = NearestResult {
            name: "f.csv".into(),
            term: "blueberry".into(),
            position: 1,
            entry: Some(EntryView::new(1, "banana\tfruit")),
        };

        assert_eq!(
            result.human_lines(),
            vec![
                "\"blueberry\" -> position 1".to_string(),
                "     1. banana  fruit".to_string()
            ]
        );
    }
}
