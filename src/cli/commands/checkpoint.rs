//! Checkpoint command implementations.

use crate::checkpoint::CheckpointStore;
use crate::cli::{CheckpointCommands, CheckpointUpdateArgs};
use crate::config::Workspace;
use crate::error::{Error, Result};
use crate::model::{CheckpointState, CheckpointUpdate};
use colored::Colorize;
use std::path::PathBuf;

/// Execute checkpoint commands.
///
/// # Errors
///
/// Returns [`Error::NotInitialized`] without a workspace, plus
/// command-specific failures.
pub fn execute(command: &CheckpointCommands, dir: Option<&PathBuf>, json: bool) -> Result<()> {
    let workspace = Workspace::resolve(dir.map(PathBuf::as_path))?;
    let store = CheckpointStore::new(workspace.checkpoint_path());

    match command {
        CheckpointCommands::Show => show(&store, json),
        CheckpointCommands::Update(args) => update(&store, args, json),
    }
}

fn show(store: &CheckpointStore, json: bool) -> Result<()> {
    let state = store.read()?;

    if json {
        println!("{}", serde_json::to_string(&state)?);
        return Ok(());
    }

    println!("{}", "Checkpoint".bold().underline());
    println!();
    println!("Phase: {} | Role: {} ", state.phase, state.role);
    println!("Task:  {}", state.task);
    if !state.last_updated.is_empty() {
        println!("Updated: {}", state.last_updated);
    }

    if let Some(ref context) = state.context {
        println!();
        println!("{}", "Active Context:".blue().bold());
        println!("{context}");
    }

    print_list("Completed Milestones:", &state.milestones);
    print_list("Next Actions:", &state.next_actions);
    print_list("Open Blockers:", &state.blockers);

    Ok(())
}

fn print_list(heading: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    println!();
    println!("{}", heading.blue().bold());
    for item in items {
        println!("  - {item}");
    }
}

fn update(store: &CheckpointStore, args: &CheckpointUpdateArgs, json: bool) -> Result<()> {
    let state = store.read()?;
    let update = build_update(&state, args)?;

    if crate::is_dry_run() {
        if !crate::is_silent() {
            println!("[dry-run] no documents written");
        }
        return Ok(());
    }

    store.update(&update)?;
    tracing::debug!("checkpoint updated");

    if json {
        println!("{}", serde_json::to_string(&store.read()?)?);
        return Ok(());
    }

    println!("{}", "Checkpoint updated.".green().bold());
    if let Some(task) = &update.task {
        println!("  Task: {task}");
    }
    if update.context.is_some() {
        println!("  Active context replaced");
    }
    if let Some(milestones) = &update.milestones {
        println!("  Milestones: {}", milestones.len());
    }
    if let Some(actions) = &update.next_actions {
        println!("  Next actions: {}", actions.len());
    }
    if let Some(blockers) = &update.blockers {
        println!("  Open blockers: {}", blockers.len());
    }

    Ok(())
}

/// Translate CLI args into a partial update. Append flags extend the
/// lists already in the document; untouched fields stay `None` so the
/// store leaves their sections alone.
fn build_update(state: &CheckpointState, args: &CheckpointUpdateArgs) -> Result<CheckpointUpdate> {
    let mut update = CheckpointUpdate::default();

    if let Some(task) = &args.task {
        update = update.with_task(task);
    }
    if let Some(context) = &args.context {
        update = update.with_context(context);
    }

    if !args.add_milestones.is_empty() {
        let mut milestones = state.milestones.clone();
        milestones.extend(args.add_milestones.iter().cloned());
        update = update.with_milestones(milestones);
    }
    if !args.add_actions.is_empty() {
        let mut actions = state.next_actions.clone();
        actions.extend(args.add_actions.iter().cloned());
        update = update.with_next_actions(actions);
    }
    if args.clear_blockers {
        update = update.with_blockers(Vec::new());
    } else if !args.add_blockers.is_empty() {
        let mut blockers = state.blockers.clone();
        blockers.extend(args.add_blockers.iter().cloned());
        update = update.with_blockers(blockers);
    }

    if update.is_empty() {
        return Err(Error::InvalidArgument(
            "nothing to update: pass --task, --context, or an --add-* flag".to_string(),
        ));
    }

    Ok(update)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with_lists() -> CheckpointState {
        let mut state = CheckpointState::initial();
        state.milestones = vec!["m1".into()];
        state.blockers = vec!["b1".into()];
        state
    }

    #[test]
    fn test_build_update_appends_to_existing_lists() {
        let args = CheckpointUpdateArgs {
            add_milestones: vec!["m2".into()],
            add_blockers: vec!["b2".into()],
            ..CheckpointUpdateArgs::default()
        };

        let update = build_update(&state_with_lists(), &args).unwrap();
        assert_eq!(
            update.milestones,
            Some(vec!["m1".to_string(), "m2".to_string()])
        );
        assert_eq!(update.blockers, Some(vec!["b1".to_string(), "b2".to_string()]));
        assert!(update.task.is_none());
    }

    #[test]
    fn test_build_update_clear_blockers_wins() {
        let args = CheckpointUpdateArgs {
            clear_blockers: true,
            add_blockers: vec!["ignored".into()],
            ..CheckpointUpdateArgs::default()
        };

        let update = build_update(&state_with_lists(), &args).unwrap();
        assert_eq!(update.blockers, Some(Vec::new()));
    }

    #[test]
    fn test_build_update_rejects_empty() {
        let args = CheckpointUpdateArgs::default();
        assert!(matches!(
            build_update(&state_with_lists(), &args),
            Err(Error::InvalidArgument(_))
        ));
    }
}
