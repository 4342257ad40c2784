//! Initialize a PhaseTrack workspace.
//!
//! Creates `.phasetrack/` in the current directory with the checkpoint
//! scaffold (phase 1, Requirements) and the empty knowledge base tree.
//! All state is plain markdown meant to be committed alongside the code.

use crate::checkpoint::CheckpointStore;
use crate::config::{DOT_DIR, Workspace};
use crate::error::{Error, Result};
use crate::kb::KnowledgeBase;
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Serialize)]
struct InitOutput {
    path: PathBuf,
    checkpoint: PathBuf,
    kb_dir: PathBuf,
}

/// Execute the init command.
///
/// # Errors
///
/// Returns [`Error::AlreadyInitialized`] when the workspace exists and
/// `--force` was not given, or I/O errors from scaffold creation.
pub fn execute(force: bool, json: bool) -> Result<()> {
    let base_dir = Path::new(".").join(DOT_DIR);

    // Check if already initialized
    if base_dir.exists() && !force {
        return Err(Error::AlreadyInitialized { path: base_dir });
    }

    std::fs::create_dir_all(&base_dir)?;

    let workspace = Workspace::at(base_dir.clone());
    let store = CheckpointStore::new(workspace.checkpoint_path());
    if !store.exists() || force {
        store.write_initial()?;
    }
    KnowledgeBase::open(&workspace).ensure_structure()?;

    tracing::debug!("workspace initialized at {}", base_dir.display());

    if json {
        let output = InitOutput {
            checkpoint: workspace.checkpoint_path(),
            kb_dir: workspace.kb_dir(),
            path: base_dir,
        };
        let payload = serde_json::to_string(&output)?;
        println!("{payload}");
    } else {
        println!(
            "Initialized PhaseTrack workspace in {}",
            std::env::current_dir()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|_| ".".to_string())
        );
        println!("  Checkpoint: {}", workspace.checkpoint_path().display());
        println!("  Knowledge base: {}", workspace.kb_dir().display());
        println!();
        println!("Phase 1 (Requirements) is in progress. See `pt status`.");
    }

    Ok(())
}
