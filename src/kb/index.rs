//! The knowledge base index document.
//!
//! A denormalized projection of every entry document, grouped by
//! category, so list/search never have to open individual entries. The
//! index is rebuilt incrementally on every add and rendered as readable
//! markdown: one `* [id](date) - description` line per entry.
//!
//! Robustness contract: a missing or corrupt index is an empty index,
//! never a hard failure — the next successful add writes a fresh one.

use std::path::Path;

use serde::Serialize;

use crate::error::Result;
use crate::model::entry::{CATEGORIES, Category};
use crate::storage;

const INDEX_VERSION: &str = "1.0";

/// Summary record for one entry, as carried by the index.
#[derive(Debug, Clone, Serialize)]
pub struct IndexEntry {
    pub id: String,
    pub description: String,
    pub created: String,
    pub category: Category,
}

/// In-memory form of the index document.
#[derive(Debug, Clone)]
pub struct KbIndex {
    pub version: String,
    pub last_updated: String,
    entries: Vec<IndexEntry>,
}

impl KbIndex {
    /// A fresh, empty index.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            version: INDEX_VERSION.to_string(),
            last_updated: String::new(),
            entries: Vec::new(),
        }
    }

    /// Load the index from disk.
    ///
    /// Missing and unreadable documents both yield an empty index; parse
    /// is line-tolerant, so a partially mangled document yields whatever
    /// lines were still recognizable.
    #[must_use]
    pub fn load(path: &Path) -> Self {
        match storage::read_optional(path) {
            Ok(Some(content)) => Self::parse(&content),
            _ => Self::empty(),
        }
    }

    /// Parse index markdown. Unrecognized lines are skipped.
    #[must_use]
    pub fn parse(content: &str) -> Self {
        let mut index = Self::empty();
        let mut current: Option<Category> = None;

        for line in content.lines() {
            if let Some(heading) = line.strip_prefix("## ") {
                current = CATEGORIES
                    .into_iter()
                    .find(|c| c.heading() == heading.trim());
            } else if let Some(version) = line.strip_prefix("**Version:**") {
                index.version = version.trim().to_string();
            } else if let Some(stamp) = line.strip_prefix("**Last Updated:**") {
                index.last_updated = stamp.trim().to_string();
            } else if let Some(category) = current {
                if let Some(entry) = parse_entry_line(line, category) {
                    index.entries.push(entry);
                }
            }
        }

        index
    }

    /// Render the index document grouped by category in fixed order.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = format!(
            "# Knowledge Base Index\n\n\
             **Version:** {}\n\
             **Last Updated:** {}\n\
             **Total Entries:** {}\n",
            self.version,
            self.last_updated,
            self.entries.len()
        );

        for category in CATEGORIES {
            out.push_str(&format!(
                "\n## {}\n{}\n\n",
                category.heading(),
                category.blurb()
            ));
            for entry in self.by_category(category) {
                out.push_str(&format!(
                    "* [{}]({}) - {}\n",
                    entry.id, entry.created, entry.description
                ));
            }
        }

        out
    }

    /// Restamp and persist the index atomically.
    ///
    /// # Errors
    ///
    /// Propagates write failures.
    pub fn save(&mut self, path: &Path) -> Result<()> {
        self.last_updated = crate::now_iso();
        storage::atomic_write(path, &self.render())
    }

    /// Whether `id` already exists under `category`.
    #[must_use]
    pub fn contains(&self, category: Category, id: &str) -> bool {
        self.entries
            .iter()
            .any(|e| e.category == category && e.id == id)
    }

    /// Append a summary record.
    pub fn insert(&mut self, entry: IndexEntry) {
        self.entries.push(entry);
    }

    /// All records in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    /// Records of one category, in insertion order.
    pub fn by_category(&self, category: Category) -> impl Iterator<Item = &IndexEntry> {
        self.entries.iter().filter(move |e| e.category == category)
    }

    /// Ids of one category, for similarity suggestions.
    #[must_use]
    pub fn ids_in(&self, category: Category) -> Vec<String> {
        self.by_category(category).map(|e| e.id.clone()).collect()
    }
}

/// Parse one `* [id](date) - description` line.
fn parse_entry_line(line: &str, category: Category) -> Option<IndexEntry> {
    let rest = line.trim().strip_prefix("* [")?;
    let (id, rest) = rest.split_once("](")?;
    let (created, rest) = rest.split_once(')')?;
    let description = rest.trim().strip_prefix('-')?.trim();

    Some(IndexEntry {
        id: id.to_string(),
        description: description.to_string(),
        created: created.to_string(),
        category,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_entry(category: Category, id: &str, description: &str) -> IndexEntry {
        IndexEntry {
            id: id.to_string(),
            description: description.to_string(),
            created: "2025-06-01T00:00:00.000Z".to_string(),
            category,
        }
    }

    #[test]
    fn test_render_parse_round_trip() {
        let mut index = KbIndex::empty();
        index.last_updated = "2025-06-01T00:00:00.000Z".to_string();
        index.insert(sample_entry(Category::Pattern, "auth-flow", "JWT based login"));
        index.insert(sample_entry(Category::Failure, "n-plus-one", "ORM query storm"));
        index.insert(sample_entry(Category::Decision, "db-choice", "Why SQLite"));

        let parsed = KbIndex::parse(&index.render());
        assert_eq!(parsed.entries().len(), 3);
        assert!(parsed.contains(Category::Pattern, "auth-flow"));
        assert!(parsed.contains(Category::Failure, "n-plus-one"));
        assert!(parsed.contains(Category::Decision, "db-choice"));
        assert_eq!(parsed.version, "1.0");
    }

    #[test]
    fn test_same_id_in_different_categories() {
        let mut index = KbIndex::empty();
        index.insert(sample_entry(Category::Pattern, "caching", "pattern side"));
        index.insert(sample_entry(Category::Failure, "caching", "failure side"));

        assert!(index.contains(Category::Pattern, "caching"));
        assert!(index.contains(Category::Failure, "caching"));
        assert!(!index.contains(Category::Decision, "caching"));
    }

    #[test]
    fn test_load_missing_is_empty() {
        let dir = TempDir::new().unwrap();
        let index = KbIndex::load(&dir.path().join("index.md"));
        assert!(index.entries().is_empty());
    }

    #[test]
    fn test_parse_garbage_is_empty() {
        let index = KbIndex::parse("\u{0}\u{1} not an index\nat all\n");
        assert!(index.entries().is_empty());
    }

    #[test]
    fn test_parse_skips_mangled_lines() {
        let content = "## Patterns\n\
                       * [good](2025-06-01) - fine entry\n\
                       * [broken-no-paren](2025-06-01 - dropped\n\
                       random prose line\n";
        let index = KbIndex::parse(content);
        assert_eq!(index.entries().len(), 1);
        assert_eq!(index.entries()[0].id, "good");
    }

    #[test]
    fn test_save_restamps_and_writes(){
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("index.md");

        let mut index = KbIndex::empty();
        index.insert(sample_entry(Category::Pattern, "auth-flow", "JWT based login"));
        index.save(&path).unwrap();

        assert!(!index.last_updated.is_empty());
        let reloaded = KbIndex::load(&path);
        assert!(reloaded.contains(Category::Pattern, "auth-flow"));
        assert!(reloaded.render().contains("**Total Entries:** 1"));
    }
}
