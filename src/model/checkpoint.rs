//! Checkpoint state model.
//!
//! `CheckpointState` is the parsed form of the per-project checkpoint
//! document; `CheckpointUpdate` is the partial-update payload applied by
//! the store. Phase progress is never stored — it is derived from the
//! current phase and the catalog on every read.

use crate::phases;
use serde::Serialize;

/// Progress status of one phase relative to the current phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseStatus {
    Complete,
    InProgress,
    NotStarted,
}

impl PhaseStatus {
    /// Display string used in the checkpoint document.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Complete => "Complete",
            Self::InProgress => "In Progress",
            Self::NotStarted => "Not Started",
        }
    }

    /// Status of phase `number` when the workflow is at `current`.
    #[must_use]
    pub fn for_phase(number: u8, current: u8) -> Self {
        if number < current {
            Self::Complete
        } else if number == current {
            Self::InProgress
        } else {
            Self::NotStarted
        }
    }
}

/// One row of the derived phase progress table.
#[derive(Debug, Clone, Serialize)]
pub struct PhaseProgressRow {
    pub number: u8,
    pub name: &'static str,
    pub status: PhaseStatus,
}

/// The full parsed checkpoint record.
#[derive(Debug, Clone, Serialize)]
pub struct CheckpointState {
    /// ISO-8601 stamp rewritten on every write.
    pub last_updated: String,

    /// Current phase, 1-5.
    pub phase: u8,

    /// Current role, normally mirroring the phase's catalog role.
    pub role: String,

    /// Free text describing the current unit of work.
    pub task: String,

    /// Free-text context block.
    pub context: Option<String>,

    /// Completed milestones, append-oriented.
    pub milestones: Vec<String>,

    /// Upcoming actions.
    pub next_actions: Vec<String>,

    /// Open blockers.
    pub blockers: Vec<String>,
}

impl CheckpointState {
    /// Default state for a project with no checkpoint document yet:
    /// phase 1 with that phase's catalog role and first task.
    #[must_use]
    pub fn initial() -> Self {
        let first = phases::describe(phases::FIRST_PHASE)
            .unwrap_or(&phases::PHASES[0]);
        Self {
            last_updated: String::new(),
            phase: first.number,
            role: first.role.to_string(),
            task: first.first_task().to_string(),
            context: None,
            milestones: Vec::new(),
            next_actions: Vec::new(),
            blockers: Vec::new(),
        }
    }

    /// Derived per-phase progress table, regenerated from the catalog.
    #[must_use]
    pub fn phase_progress(&self) -> Vec<PhaseProgressRow> {
        phases::all()
            .iter()
            .map(|p| PhaseProgressRow {
                number: p.number,
                name: p.name,
                status: PhaseStatus::for_phase(p.number, self.phase),
            })
            .collect()
    }
}

/// A partial checkpoint update. Only present fields are applied;
/// everything else in the document is left untouched.
#[derive(Debug, Clone, Default)]
pub struct CheckpointUpdate {
    pub phase: Option<u8>,
    pub role: Option<String>,
    pub task: Option<String>,
    pub context: Option<String>,
    pub milestones: Option<Vec<String>>,
    pub next_actions: Option<Vec<String>>,
    pub blockers: Option<Vec<String>>,
}

impl CheckpointUpdate {
    /// Update that moves the workflow to `phase`, taking role and task
    /// from the catalog.
    #[must_use]
    pub fn for_phase(phase: &phases::PhaseDescriptor) -> Self {
        Self {
            phase: Some(phase.number),
            role: Some(phase.role.to_string()),
            task: Some(phase.first_task().to_string()),
            ..Self::default()
        }
    }

    /// Set the current task.
    #[must_use]
    pub fn with_task(mut self, task: &str) -> Self {
        self.task = Some(task.to_string());
        self
    }

    /// Set the active context block.
    #[must_use]
    pub fn with_context(mut self, context: &str) -> Self {
        self.context = Some(context.to_string());
        self
    }

    /// Replace the milestone list.
    #[must_use]
    pub fn with_milestones(mut self, milestones: Vec<String>) -> Self {
        self.milestones = Some(milestones);
        self
    }

    /// Replace the next-action list.
    #[must_use]
    pub fn with_next_actions(mut self, actions: Vec<String>) -> Self {
        self.next_actions = Some(actions);
        self
    }

    /// Replace the blocker list.
    #[must_use]
    pub fn with_blockers(mut self, blockers: Vec<String>) -> Self {
        self.blockers = Some(blockers);
        self
    }

    /// True when no field is set (the update would only restamp the
    /// timestamp).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.phase.is_none()
            && self.role.is_none()
            && self.task.is_none()
            && self.context.is_none()
            && self.milestones.is_none()
            && self.next_actions.is_none()
            && self.blockers.is_none()
    }
}
