//! The knowledge base.
//!
//! A small per-project repository of named entries in three fixed
//! categories (patterns, failures, decisions): one markdown document per
//! entry under the category's directory, plus a rebuilt-on-write index
//! document for cheap list/search. Independent of the checkpoint store.

pub mod entry;
pub mod index;
pub mod search;

use std::path::PathBuf;

use crate::config::Workspace;
use crate::error::{Error, Result};
use crate::model::entry::CATEGORIES;
use crate::model::{Category, KnowledgeEntry};
use crate::storage;
use crate::validate::find_similar_ids;

pub use index::{IndexEntry, KbIndex};
pub use search::SearchHit;

/// Default number of search results.
pub const DEFAULT_SEARCH_LIMIT: usize = 10;

/// Input payload for [`KnowledgeBase::add`]. The id and category travel
/// separately; `created` is assigned by the store.
#[derive(Debug, Clone, Default)]
pub struct EntryData {
    /// Display title; defaults to the id.
    pub title: Option<String>,
    pub description: String,
    pub content: String,
    pub tags: Vec<String>,
    pub author: String,
    pub phase: Option<u8>,
    pub related: Vec<String>,
}

/// Handle on one project's knowledge base tree.
pub struct KnowledgeBase {
    root: PathBuf,
}

impl KnowledgeBase {
    /// Knowledge base rooted at the workspace's `kb/` directory.
    #[must_use]
    pub fn open(workspace: &Workspace) -> Self {
        Self {
            root: workspace.kb_dir(),
        }
    }

    /// Knowledge base rooted at an explicit directory.
    #[must_use]
    pub fn at(root: PathBuf) -> Self {
        Self { root }
    }

    /// Path of the index document.
    #[must_use]
    pub fn index_path(&self) -> PathBuf {
        self.root.join("index.md")
    }

    /// Path of one entry document.
    #[must_use]
    pub fn entry_path(&self, category: Category, id: &str) -> PathBuf {
        self.root.join(category.dir_name()).join(format!("{id}.md"))
    }

    /// Create the category directory tree.
    ///
    /// # Errors
    ///
    /// Propagates directory-creation failures.
    pub fn ensure_structure(&self) -> Result<()> {
        for category in CATEGORIES {
            std::fs::create_dir_all(self.root.join(category.dir_name()))?;
        }
        Ok(())
    }

    /// Add a new entry.
    ///
    /// The duplicate check runs against the index before anything is
    /// written; a duplicate id leaves both the entry files and the index
    /// untouched. On success the entry document is written first, then
    /// the regenerated index.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EntryExists`] for a duplicate id, or I/O errors
    /// from the writes.
    pub fn add(&self, category: Category, id: &str, data: EntryData) -> Result<KnowledgeEntry> {
        let mut kb_index = KbIndex::load(&self.index_path());

        if kb_index.contains(category, id) {
            return Err(Error::EntryExists {
                category: category.dir_name().to_string(),
                id: id.to_string(),
            });
        }

        self.ensure_structure()?;

        let created = crate::now_iso();
        let mut knowledge_entry = KnowledgeEntry::new(category, id, &data.author, &created)
            .with_description(&data.description)
            .with_content(&data.content)
            .with_tags(data.tags)
            .with_related(data.related);
        if let Some(title) = data.title {
            knowledge_entry.title = title;
        }
        knowledge_entry.phase = data.phase;

        storage::atomic_write(
            &self.entry_path(category, id),
            &entry::render(&knowledge_entry),
        )?;

        kb_index.insert(IndexEntry {
            id: knowledge_entry.id.clone(),
            description: knowledge_entry.description.clone(),
            created: knowledge_entry.created.clone(),
            category,
        });
        kb_index.save(&self.index_path())?;

        Ok(knowledge_entry)
    }

    /// Fetch one entry by reading its document directly (the index is
    /// only consulted for did-you-mean suggestions on a miss).
    ///
    /// # Errors
    ///
    /// Returns [`Error::EntryNotFound`] (with similar-id suggestions
    /// when available) or read failures.
    pub fn get(&self, category: Category, id: &str) -> Result<KnowledgeEntry> {
        let path = self.entry_path(category, id);

        match storage::read_optional(&path)? {
            Some(raw) => Ok(entry::parse(&raw, category, id)),
            None => {
                let existing = KbIndex::load(&self.index_path()).ids_in(category);
                let similar = find_similar_ids(id, &existing, 3);
                if similar.is_empty() {
                    Err(Error::EntryNotFound {
                        category: category.dir_name().to_string(),
                        id: id.to_string(),
                    })
                } else {
                    Err(Error::EntryNotFoundSimilar {
                        category: category.dir_name().to_string(),
                        id: id.to_string(),
                        similar,
                    })
                }
            }
        }
    }

    /// Index summaries, optionally filtered by category. A missing or
    /// corrupt index yields an empty list, never an error.
    #[must_use]
    pub fn list(&self, filter: Option<Category>) -> Vec<IndexEntry> {
        KbIndex::load(&self.index_path())
            .entries()
            .iter()
            .filter(|e| filter.is_none_or(|c| e.category == c))
            .cloned()
            .collect()
    }

    /// Ranked search over the index. A missing or corrupt index yields
    /// no results, never an error.
    #[must_use]
    pub fn search(&self, query: &str, limit: usize, filter: Option<Category>) -> Vec<SearchHit> {
        search::search(&KbIndex::load(&self.index_path()), query, limit, filter)
    }
}
