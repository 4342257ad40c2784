//! Knowledge base entry model.
//!
//! Entries live in one of three fixed categories and are stored one
//! markdown document per entry under the category's directory. The id is
//! unique within its category and immutable once created.

use serde::{Deserialize, Serialize};

/// Knowledge entry category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Reusable solutions and best practices.
    Pattern,
    /// Lessons learned from mistakes and issues.
    Failure,
    /// Architectural and design decisions.
    Decision,
}

/// All categories in index order.
pub const CATEGORIES: [Category; 3] = [Category::Pattern, Category::Failure, Category::Decision];

impl Category {
    /// Singular form used on the command line.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pattern => "pattern",
            Self::Failure => "failure",
            Self::Decision => "decision",
        }
    }

    /// Storage directory name (plural).
    #[must_use]
    pub const fn dir_name(&self) -> &'static str {
        match self {
            Self::Pattern => "patterns",
            Self::Failure => "failures",
            Self::Decision => "decisions",
        }
    }

    /// Index section heading.
    #[must_use]
    pub const fn heading(&self) -> &'static str {
        match self {
            Self::Pattern => "Patterns",
            Self::Failure => "Failures",
            Self::Decision => "Decisions",
        }
    }

    /// One-line blurb under the index section heading.
    #[must_use]
    pub const fn blurb(&self) -> &'static str {
        match self {
            Self::Pattern => "Reusable solutions and best practices.",
            Self::Failure => "Lessons learned from mistakes and issues.",
            Self::Decision => "Architectural and design decisions.",
        }
    }
}

/// A knowledge base entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    /// Unique id within the category. Immutable once created.
    pub id: String,

    /// Category this entry belongs to.
    pub category: Category,

    /// Display title (defaults to the id).
    pub title: String,

    /// One-line description, shown in the index and search results.
    pub description: String,

    /// Free-form body content.
    pub content: String,

    /// Tags for browsing.
    pub tags: Vec<String>,

    /// Author name.
    pub author: String,

    /// Creation timestamp (ISO-8601), assigned at add time.
    pub created: String,

    /// Workflow phase this entry was captured in, if any.
    pub phase: Option<u8>,

    /// Ids of related entries.
    pub related: Vec<String>,
}

impl KnowledgeEntry {
    /// Create an entry with the given id; title defaults to the id and
    /// everything else starts empty.
    #[must_use]
    pub fn new(category: Category, id: &str, author: &str, created: &str) -> Self {
        Self {
            id: id.to_string(),
            category,
            title: id.to_string(),
            description: String::new(),
            content: String::new(),
            tags: Vec::new(),
            author: author.to_string(),
            created: created.to_string(),
            phase: None,
            related: Vec::new(),
        }
    }

    /// Set the display title.
    #[must_use]
    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    /// Set the one-line description.
    #[must_use]
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    /// Set the body content.
    #[must_use]
    pub fn with_content(mut self, content: &str) -> Self {
        self.content = content.to_string();
        self
    }

    /// Set the tag list.
    #[must_use]
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    /// Set the capture phase.
    #[must_use]
    pub fn with_phase(mut self, phase: u8) -> Self {
        self.phase = Some(phase);
        self
    }

    /// Set the related entry ids.
    #[must_use]
    pub fn with_related(mut self, related: Vec<String>) -> Self {
        self.related = related;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_names() {
        assert_eq!(Category::Pattern.as_str(), "pattern");
        assert_eq!(Category::Pattern.dir_name(), "patterns");
        assert_eq!(Category::Failure.heading(), "Failures");
        assert_eq!(Category::Decision.dir_name(), "decisions");
    }

    #[test]
    fn test_new_entry_defaults() {
        let entry = KnowledgeEntry::new(
            Category::Pattern,
            "auth-flow",
            "dev",
            "2025-06-01T00:00:00.000Z",
        );

        assert_eq!(entry.title, "auth-flow");
        assert_eq!(entry.category, Category::Pattern);
        assert!(entry.description.is_empty());
        assert!(entry.phase.is_none());
    }

    #[test]
    fn test_builder_chain() {
        let entry = KnowledgeEntry::new(
            Category::Decision,
            "db-choice",
            "dev",
            "2025-06-01T00:00:00.000Z",
        )
        .with_title("Database choice")
        .with_description("Why we picked SQLite")
        .with_tags(vec!["storage".into(), "architecture".into()])
        .with_phase(2);

        assert_eq!(entry.title, "Database choice");
        assert_eq!(entry.tags.len(), 2);
        assert_eq!(entry.phase, Some(2));
    }
}
