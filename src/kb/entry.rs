//! Knowledge entry document rendering and parsing.
//!
//! One markdown document per entry: a `---`-fenced key/value preamble
//! carrying the structured fields, then a human-readable body that
//! restates the description/tags and holds the free-form content. Humans
//! read and occasionally edit these; parsing reconstructs the structured
//! fields from the preamble and falls back to the body's
//! `**Description:**` line when the preamble omits one.

use crate::model::{Category, KnowledgeEntry};

const FOOTER: &str = "*Captured by PhaseTrack*";

/// Render the entry document.
#[must_use]
pub fn render(entry: &KnowledgeEntry) -> String {
    let mut out = format!(
        "---\n\
         id: {}\n\
         title: {}\n\
         description: {}\n\
         created: {}\n\
         author: {}\n\
         tags: {}\n",
        entry.id,
        entry.title,
        entry.description,
        entry.created,
        entry.author,
        entry.tags.join(", "),
    );

    if let Some(phase) = entry.phase {
        out.push_str(&format!("phase: {phase}\n"));
    }
    if !entry.related.is_empty() {
        out.push_str(&format!("related: {}\n", entry.related.join(", ")));
    }

    out.push_str(&format!(
        "---\n\n\
         # {}\n\n\
         **Description:** {}\n\n\
         **Tags:** {}\n\n\
         **Created:** {}\n\n",
        entry.title,
        entry.description,
        entry
            .tags
            .iter()
            .map(|t| format!("`{t}`"))
            .collect::<Vec<_>>()
            .join(", "),
        display_date(&entry.created),
    ));

    if let Some(phase) = entry.phase {
        out.push_str(&format!("**Phase:** {phase}\n\n"));
    }
    if !entry.related.is_empty() {
        let links: Vec<String> = entry
            .related
            .iter()
            .map(|rel| format!("[{rel}]({rel}.md)"))
            .collect();
        out.push_str(&format!("**Related:** {}\n\n", links.join(", ")));
    }

    out.push_str(&format!(
        "## Content\n\n{}\n\n---\n{FOOTER}\n",
        entry.content
    ));

    out
}

/// Parse an entry document back into structured fields.
///
/// Each preamble field is optional and independently defaulted; the
/// description falls back to the body's `**Description:**` line, and the
/// content is taken from the `## Content` section (minus the footer).
#[must_use]
pub fn parse(raw: &str, category: Category, id: &str) -> KnowledgeEntry {
    let mut entry = KnowledgeEntry::new(category, id, "", "");

    let (preamble, body) = split_preamble(raw);

    for line in preamble.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();
        match key.trim() {
            "id" if !value.is_empty() => entry.id = value.to_string(),
            "title" if !value.is_empty() => entry.title = value.to_string(),
            "description" => entry.description = value.to_string(),
            "created" => entry.created = value.to_string(),
            "author" => entry.author = value.to_string(),
            "tags" => entry.tags = split_csv(value),
            "related" => entry.related = split_csv(value),
            "phase" => entry.phase = value.parse().ok(),
            _ => {}
        }
    }

    // Preamble omitted the description: recover it from the body.
    if entry.description.is_empty() {
        if let Some(desc) = body
            .lines()
            .find_map(|line| line.strip_prefix("**Description:**"))
        {
            entry.description = desc.trim().to_string();
        }
    }

    entry.content = extract_content(body);

    entry
}

/// Split off the `---`-fenced preamble; returns (preamble, body).
fn split_preamble(raw: &str) -> (&str, &str) {
    let Some(rest) = raw.strip_prefix("---\n") else {
        return ("", raw);
    };
    match rest.split_once("\n---\n") {
        Some((preamble, body)) => (preamble, body),
        None => ("", raw),
    }
}

/// Free-form content: the `## Content` section without the footer rule.
fn extract_content(body: &str) -> String {
    let section = match body.split_once("## Content\n") {
        Some((_, rest)) => rest,
        None => body,
    };

    let without_footer = section
        .rsplit_once("\n---\n")
        .map_or(section, |(content, tail)| {
            if tail.trim() == FOOTER {
                content
            } else {
                section
            }
        });

    without_footer.trim().to_string()
}

fn split_csv(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Date part of an ISO stamp for display.
fn display_date(created: &str) -> &str {
    created.split('T').next().unwrap_or(created)
}
