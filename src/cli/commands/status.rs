//! Status command implementation.

use crate::checkpoint::CheckpointStore;
use crate::config::{Workspace, current_git_branch};
use crate::error::Result;
use crate::kb::KnowledgeBase;
use crate::model::{Category, PhaseProgressRow, PhaseStatus};
use crate::phases;
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;

/// Output for status command.
#[derive(Serialize)]
struct StatusOutput {
    workspace: String,
    git_branch: Option<String>,
    last_updated: Option<String>,
    phase: PhaseInfo,
    task: String,
    context: Option<String>,
    progress: Vec<PhaseProgressRow>,
    blockers: Vec<String>,
    kb: KbCounts,
}

#[derive(Serialize)]
struct PhaseInfo {
    number: u8,
    name: &'static str,
    role: String,
    description: &'static str,
}

#[derive(Serialize)]
struct KbCounts {
    patterns: usize,
    failures: usize,
    decisions: usize,
}

/// Execute status command.
///
/// Reads the checkpoint (defaults apply if the document is missing) and
/// summarizes phase progress, current work, and knowledge base counts.
///
/// # Errors
///
/// Returns [`crate::error::Error::NotInitialized`] without a workspace.
pub fn execute(dir: Option<&PathBuf>, json: bool) -> Result<()> {
    let workspace = Workspace::resolve(dir.map(PathBuf::as_path))?;
    let store = CheckpointStore::new(workspace.checkpoint_path());
    let kb = KnowledgeBase::open(&workspace);

    let state = store.read()?;
    let git_branch = current_git_branch();

    let descriptor = phases::describe(state.phase);
    let (name, description) = descriptor.map_or(("Unknown", ""), |d| (d.name, d.description));

    let counts = KbCounts {
        patterns: kb.list(Some(Category::Pattern)).len(),
        failures: kb.list(Some(Category::Failure)).len(),
        decisions: kb.list(Some(Category::Decision)).len(),
    };

    if json {
        let output = StatusOutput {
            workspace: workspace.dir().display().to_string(),
            git_branch,
            last_updated: (!state.last_updated.is_empty()).then(|| state.last_updated.clone()),
            phase: PhaseInfo {
                number: state.phase,
                name,
                role: state.role.clone(),
                description,
            },
            task: state.task.clone(),
            context: state.context.clone(),
            progress: state.phase_progress(),
            blockers: state.blockers.clone(),
            kb: counts,
        };
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }

    println!("{}", "PhaseTrack Status".bold().underline());
    println!();

    println!("Workspace: {}", workspace.dir().display());
    if let Some(ref branch) = git_branch {
        println!("Branch:    {branch}");
    }
    if !state.last_updated.is_empty() {
        println!("Updated:   {}", state.last_updated);
    }
    println!();

    println!(
        "{} Phase {}: {} ({})",
        "Current:".blue().bold(),
        state.phase,
        name,
        state.role
    );
    println!("  Task: {}", state.task);
    if let Some(ref context) = state.context {
        println!("  Context: {context}");
    }
    println!();

    println!("{}", "Phase Progress:".blue().bold());
    for row in state.phase_progress() {
        let label = match row.status {
            PhaseStatus::Complete => row.status.as_str().green(),
            PhaseStatus::InProgress => row.status.as_str().yellow(),
            PhaseStatus::NotStarted => row.status.as_str().dimmed(),
        };
        let marker = match row.status {
            PhaseStatus::Complete => "[x]",
            PhaseStatus::InProgress => "[>]",
            PhaseStatus::NotStarted => "[ ]",
        };
        println!("  {marker} Phase {}: {:<15} {label}", row.number, row.name);
    }
    println!();

    if !state.blockers.is_empty() {
        println!("{}", "Open Blockers:".red().bold());
        for blocker in &state.blockers {
            println!("  - {blocker}");
        }
        println!();
    }

    println!(
        "Knowledge base: {} patterns, {} failures, {} decisions",
        counts.patterns, counts.failures, counts.decisions
    );

    Ok(())
}
