//! Phase jump command implementation.

use crate::checkpoint::{CheckpointStore, Jump};
use crate::config::Workspace;
use crate::error::Result;
use crate::phases;
use crate::validate::validate_phase_number;
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Serialize)]
struct PhaseOutput {
    phase: u8,
    name: &'static str,
    role: &'static str,
    task: &'static str,
    changed: bool,
    previous: u8,
}

/// Execute the phase jump command.
///
/// The argument is validated before any document is touched; jumping to
/// the current phase is a warning, not an error.
///
/// # Errors
///
/// Returns [`crate::error::Error::InvalidPhase`] for input outside 1-5,
/// [`crate::error::Error::NotInitialized`] without a workspace, and I/O
/// errors from the checkpoint write.
pub fn execute(number: &str, dir: Option<&PathBuf>, json: bool) -> Result<()> {
    let target = validate_phase_number(number)?;
    let workspace = Workspace::resolve(dir.map(PathBuf::as_path))?;
    let store = CheckpointStore::new(workspace.checkpoint_path());

    let descriptor = phases::describe(target).ok_or(crate::error::Error::InvalidPhase {
        input: number.to_string(),
    })?;

    if crate::is_dry_run() {
        let state = store.read()?;
        if !crate::is_silent() {
            println!(
                "[dry-run] would switch Phase {} -> Phase {} ({})",
                state.phase, target, descriptor.name
            );
        }
        return Ok(());
    }

    let outcome = store.jump_to(target)?;
    tracing::debug!(
        "checkpoint updated: {}",
        workspace.checkpoint_path().display()
    );

    if crate::is_silent() {
        println!("{target}");
        return Ok(());
    }

    let (changed, previous) = match outcome {
        Jump::Moved { from, .. } => (true, from),
        Jump::AlreadyThere { phase } => (false, phase),
    };

    if json {
        let output = PhaseOutput {
            phase: target,
            name: descriptor.name,
            role: descriptor.role,
            task: descriptor.first_task(),
            changed,
            previous,
        };
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }

    if changed {
        println!(
            "{} Phase {} ({})",
            "Switched to".green().bold(),
            target,
            descriptor.name
        );
        println!("  Role: {}", descriptor.role);
        println!("  Task: {}", descriptor.first_task());
    } else {
        println!(
            "{} Already in Phase {} ({}) - no changes made",
            "Warning:".yellow().bold(),
            target,
            descriptor.name
        );
    }

    Ok(())
}
