//! Knowledge base command implementations.

use crate::cli::{KbAddArgs, KbCommands};
use crate::config::{Workspace, default_actor};
use crate::error::Result;
use crate::kb::{DEFAULT_SEARCH_LIMIT, EntryData, KnowledgeBase};
use crate::model::{Category, KnowledgeEntry};
use crate::validate::{normalize_category, validate_phase_number};
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Serialize)]
struct ListOutput {
    entries: Vec<crate::kb::IndexEntry>,
    count: usize,
}

#[derive(Serialize)]
struct SearchOutput {
    query: String,
    results: Vec<crate::kb::SearchHit>,
    count: usize,
}

/// Execute kb commands.
///
/// # Errors
///
/// Returns [`crate::error::Error::NotInitialized`] without a workspace,
/// plus command-specific failures.
pub fn execute(
    command: &KbCommands,
    dir: Option<&PathBuf>,
    actor: Option<&str>,
    json: bool,
) -> Result<()> {
    let workspace = Workspace::resolve(dir.map(PathBuf::as_path))?;
    let kb = KnowledgeBase::open(&workspace);

    match command {
        KbCommands::Add(args) => add(&kb, args, actor, json),
        KbCommands::Show { category, id } => show(&kb, category, id, json),
        KbCommands::List { category } => list(&kb, category.as_deref(), json),
        KbCommands::Search {
            query,
            limit,
            category,
        } => search(&kb, query, *limit, category.as_deref(), json),
    }
}

fn add(kb: &KnowledgeBase, args: &KbAddArgs, actor: Option<&str>, json: bool) -> Result<()> {
    let category = normalize_category(&args.category)?;
    let phase = args
        .phase
        .as_deref()
        .map(validate_phase_number)
        .transpose()?;
    let author = actor.map_or_else(default_actor, ToString::to_string);

    let data = EntryData {
        title: args.title.clone(),
        description: args.description.clone(),
        content: args.content.clone(),
        tags: args.tags.clone(),
        author,
        phase,
        related: args.related.clone(),
    };

    if crate::is_dry_run() {
        if !crate::is_silent() {
            println!(
                "[dry-run] would add {} entry '{}'",
                category.as_str(),
                args.id
            );
        }
        return Ok(());
    }

    let entry = kb.add(category, &args.id, data)?;
    tracing::debug!("kb entry added: {}/{}", category.dir_name(), entry.id);

    if crate::is_silent() {
        println!("{}", entry.id);
        return Ok(());
    }

    if json {
        println!("{}", serde_json::to_string(&entry)?);
        return Ok(());
    }

    println!(
        "{} {} entry: {}",
        "Added".green().bold(),
        category.as_str(),
        entry.id
    );
    if !entry.description.is_empty() {
        println!("  {}", entry.description);
    }
    println!(
        "  File: {}",
        kb.entry_path(category, &entry.id).display()
    );

    Ok(())
}

fn show(kb: &KnowledgeBase, category: &str, id: &str, json: bool) -> Result<()> {
    let category = normalize_category(category)?;
    let entry = kb.get(category, id)?;

    if json {
        println!("{}", serde_json::to_string(&entry)?);
        return Ok(());
    }

    print_entry(&entry);
    Ok(())
}

fn print_entry(entry: &KnowledgeEntry) {
    println!(
        "{} {} [{}]",
        category_icon(entry.category),
        entry.title.bold(),
        entry.category.as_str().blue()
    );
    if !entry.description.is_empty() {
        println!("  {}", entry.description);
    }
    if !entry.tags.is_empty() {
        println!("  Tags: {}", entry.tags.join(", "));
    }
    if let Some(phase) = entry.phase {
        println!("  Phase: {phase}");
    }
    if !entry.related.is_empty() {
        println!("  Related: {}", entry.related.join(", "));
    }
    if !entry.created.is_empty() {
        println!("  Created: {} by {}", entry.created, entry.author);
    }
    if !entry.content.is_empty() {
        println!();
        println!("{}", entry.content);
    }
}

fn list(kb: &KnowledgeBase, category: Option<&str>, json: bool) -> Result<()> {
    let filter = category.map(normalize_category).transpose()?;
    let entries = kb.list(filter);

    if crate::is_csv() {
        println!("id,category,created,description");
        for e in &entries {
            println!(
                "{},{},{},{}",
                e.id,
                e.category.as_str(),
                e.created,
                crate::csv_escape(&e.description)
            );
        }
        return Ok(());
    }

    if json {
        let output = ListOutput {
            count: entries.len(),
            entries,
        };
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("No knowledge base entries found.");
        return Ok(());
    }

    println!("Knowledge base entries ({} found):", entries.len());
    println!();
    for category in crate::model::entry::CATEGORIES {
        if filter.is_some_and(|f| f != category) {
            continue;
        }
        let group: Vec<_> = entries.iter().filter(|e| e.category == category).collect();
        if group.is_empty() {
            continue;
        }
        println!("{}", category.heading().blue().bold());
        for e in group {
            println!("  {} {} - {}", category_icon(e.category), e.id.bold(), e.description);
        }
        println!();
    }

    Ok(())
}

fn search(
    kb: &KnowledgeBase,
    query: &str,
    limit: usize,
    category: Option<&str>,
    json: bool,
) -> Result<()> {
    let filter = category.map(normalize_category).transpose()?;
    let limit = if limit == 0 { DEFAULT_SEARCH_LIMIT } else { limit };
    let hits = kb.search(query, limit, filter);

    if json {
        let output = SearchOutput {
            query: query.to_string(),
            count: hits.len(),
            results: hits,
        };
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }

    if hits.is_empty() {
        println!("No results found for: \"{query}\"");
        println!();
        println!("Try different keywords, partial matches, or --category to narrow the scope.");
        return Ok(());
    }

    println!(
        "{} \"{}\" ({} matching entries)",
        "Search results for".bold(),
        query,
        hits.len()
    );
    println!();
    for (rank, hit) in hits.iter().enumerate() {
        println!(
            "{}. {} {} {}",
            rank + 1,
            category_icon(hit.entry.category),
            hit.entry.id.bold(),
            format!("({})", hit.relevance).dimmed()
        );
        println!("   {}", hit.entry.description);
        println!(
            "   {} - {}",
            hit.entry.category.as_str().blue(),
            hit.entry.created
        );
        println!();
    }
    if let Some(first) = hits.first() {
        println!(
            "Use `pt kb show {} {}` to view details",
            first.entry.category.as_str(),
            first.entry.id
        );
    }

    Ok(())
}

const fn category_icon(category: Category) -> &'static str {
    match category {
        Category::Pattern => "◆",
        Category::Failure => "✗",
        Category::Decision => "➤",
    }
}
