//! Next-step command implementation.
//!
//! Steps task-by-task through the current phase's catalog sequence and
//! falls through to a phase advance when the sequence is exhausted. At
//! the end of the final phase it reports completion without writing.

use crate::checkpoint::{CheckpointStore, NextStep};
use crate::config::Workspace;
use crate::error::Result;
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Serialize)]
#[serde(tag = "step", rename_all = "snake_case")]
enum NextOutput {
    Task { phase: u8, task: String },
    Phase { from: u8, to: u8, role: String, task: String },
    Complete,
}

impl From<NextStep> for NextOutput {
    fn from(step: NextStep) -> Self {
        match step {
            NextStep::Task { phase, task } => Self::Task { phase, task },
            NextStep::Phase {
                from,
                to,
                role,
                task,
            } => Self::Phase {
                from,
                to,
                role,
                task,
            },
            NextStep::Complete => Self::Complete,
        }
    }
}

/// Execute the next command.
///
/// # Errors
///
/// Returns [`crate::error::Error::NotInitialized`] without a workspace
/// and I/O errors from the checkpoint write.
pub fn execute(dir: Option<&PathBuf>, json: bool) -> Result<()> {
    let workspace = Workspace::resolve(dir.map(PathBuf::as_path))?;
    let store = CheckpointStore::new(workspace.checkpoint_path());

    let step = if crate::is_dry_run() {
        let planned = store.plan_next()?;
        if !crate::is_silent() && !json {
            println!("[dry-run] no documents written");
        }
        planned
    } else {
        store.next_step()?
    };

    if json {
        println!("{}", serde_json::to_string(&NextOutput::from(step))?);
        return Ok(());
    }

    match step {
        NextStep::Task { phase, task } => {
            println!("{} (Phase {phase})", "Next task".green().bold());
            println!("  {task}");
        }
        NextStep::Phase {
            from,
            to,
            role,
            task,
        } => {
            println!(
                "{} Phase {from} complete, entering Phase {to}",
                "Phase advanced:".green().bold()
            );
            println!("  Role: {role}");
            println!("  Task: {task}");
        }
        NextStep::Complete => {
            println!(
                "{} All phases are complete. Nothing left to advance.",
                "Project complete.".green().bold()
            );
        }
    }

    Ok(())
}
