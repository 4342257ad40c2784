//! The checkpoint store.
//!
//! One markdown document per project records where the workflow stands:
//! current phase, role, task, free-form context, and the milestone /
//! next-action / blocker lists. Every command invocation reloads it from
//! disk, applies at most one partial update, and writes it back
//! atomically — nothing outlives a single run.
//!
//! The store assumes a single writer at a time. Writes are atomic per
//! document, so a lost race between two concurrent invocations drops one
//! update but can never tear the file.

pub mod document;

use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::model::{CheckpointState, CheckpointUpdate, PhaseStatus};
use crate::now_iso;
use crate::phases;
use crate::storage;

use document::Document;

/// Outcome of a phase-level advance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    /// Moved forward one phase.
    Moved { from: u8, to: u8 },
    /// Already at the last phase; nothing was written.
    Terminal,
}

/// Outcome of a phase jump.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Jump {
    /// Moved to a different phase.
    Moved { from: u8, to: u8 },
    /// Already in the requested phase; nothing was written.
    AlreadyThere { phase: u8 },
}

/// Outcome of a task-granular step (the `next` command).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextStep {
    /// Advanced to the next task within the current phase.
    Task { phase: u8, task: String },
    /// Exhausted the phase's tasks and entered the next phase.
    Phase {
        from: u8,
        to: u8,
        role: String,
        task: String,
    },
    /// Final phase, final task: the project is complete. Nothing written.
    Complete,
}

/// Durable source of truth for a project's workflow position.
pub struct CheckpointStore {
    path: PathBuf,
}

impl CheckpointStore {
    /// Store backed by the given document path.
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Whether the backing document exists yet.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Parse the current checkpoint state.
    ///
    /// A missing document yields the default state (phase 1 with its
    /// catalog role and first task) without writing anything. Individual
    /// unparsable fields fall back to their defaults independently — one
    /// mangled line never fails the whole read.
    ///
    /// # Errors
    ///
    /// Returns an error only when the document exists but cannot be read.
    pub fn read(&self) -> Result<CheckpointState> {
        let Some(raw) = storage::read_optional(&self.path)? else {
            return Ok(CheckpointState::initial());
        };

        let doc = Document::parse(&raw);
        let mut state = CheckpointState::initial();

        state.phase = doc
            .key_line(SESSION, "Current Phase")
            .and_then(|v| v.parse::<u8>().ok())
            .filter(|n| phases::describe(*n).is_some())
            .unwrap_or(phases::FIRST_PHASE);

        // Role/task defaults follow the parsed phase, not phase 1.
        if let Some(descriptor) = phases::describe(state.phase) {
            state.role = descriptor.role.to_string();
            state.task = descriptor.first_task().to_string();
        }

        if let Some(v) = doc.key_line(SESSION, "Last Updated") {
            state.last_updated = v.to_string();
        }
        if let Some(v) = doc.key_line(SESSION, "Current Role").filter(|v| !v.is_empty()) {
            state.role = v.to_string();
        }
        if let Some(v) = doc.key_line(SESSION, "Current Task").filter(|v| !v.is_empty()) {
            state.task = v.to_string();
        }

        state.context = doc
            .section("Active Context")
            .map(str::trim)
            .filter(|body| !body.is_empty() && !is_placeholder(body))
            .map(ToString::to_string);

        state.milestones = parse_list(doc.section("Completed Milestones"));
        state.next_actions = parse_list(doc.section("Next Actions"));
        state.blockers = parse_list(doc.section("Open Blockers"));

        Ok(state)
    }

    /// Apply a partial update.
    ///
    /// Only sections whose field is present in `update` are rewritten;
    /// every other byte of the document (including hand-added sections)
    /// survives unchanged. The `Last Updated` stamp is always rewritten,
    /// and a phase change regenerates the whole Phase Progress section
    /// from the catalog. The write is atomic: on I/O failure the prior
    /// document is intact.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPhase`] for a phase outside the catalog
    /// (checked before any file access) and I/O errors from the write.
    pub fn update(&self, update: &CheckpointUpdate) -> Result<()> {
        if let Some(n) = update.phase {
            if phases::describe(n).is_none() {
                return Err(Error::InvalidPhase {
                    input: n.to_string(),
                });
            }
        }

        let raw = match storage::read_optional(&self.path)? {
            Some(raw) => raw,
            None => self.default_scaffold(),
        };
        let mut doc = Document::parse(&raw);

        doc.set_key_line(SESSION, "Last Updated", &now_iso());

        if let Some(n) = update.phase {
            doc.set_key_line(SESSION, "Current Phase", &n.to_string());
            doc.set_section("Phase Progress", &render_progress(n));
        }
        if let Some(role) = &update.role {
            doc.set_key_line(SESSION, "Current Role", role);
        }
        if let Some(task) = &update.task {
            doc.set_key_line(SESSION, "Current Task", task);
        }
        if let Some(context) = &update.context {
            doc.set_section("Active Context", context);
        }
        if let Some(milestones) = &update.milestones {
            doc.set_section("Completed Milestones", &render_list(milestones));
        }
        if let Some(actions) = &update.next_actions {
            doc.set_section("Next Actions", &render_list(actions));
        }
        if let Some(blockers) = &update.blockers {
            doc.set_section("Open Blockers", &render_list(blockers));
        }

        storage::atomic_write(&self.path, &doc.render())
    }

    /// Move forward one phase, saturating at the last.
    ///
    /// At the last phase this reports [`Advance::Terminal`] without
    /// touching the document — completion is a state to report, not an
    /// error.
    ///
    /// # Errors
    ///
    /// Propagates read/write failures.
    pub fn advance(&self) -> Result<Advance> {
        let state = self.read()?;

        if state.phase >= phases::LAST_PHASE {
            return Ok(Advance::Terminal);
        }

        let target = state.phase + 1;
        let descriptor = phases::describe(target).ok_or(Error::InvalidPhase {
            input: target.to_string(),
        })?;
        self.update(&CheckpointUpdate::for_phase(descriptor))?;

        Ok(Advance::Moved {
            from: state.phase,
            to: target,
        })
    }

    /// Jump directly to phase `n`.
    ///
    /// Invalid numbers are rejected before any read or write. Jumping to
    /// the current phase is a flagged no-op. Jumps are re-entrant: moving
    /// backwards from the last phase is allowed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPhase`] for `n` outside 1-5, plus
    /// read/write failures.
    pub fn jump_to(&self, n: u8) -> Result<Jump> {
        let descriptor = phases::describe(n).ok_or(Error::InvalidPhase {
            input: n.to_string(),
        })?;

        let state = self.read()?;
        if state.phase == n {
            return Ok(Jump::AlreadyThere { phase: n });
        }

        self.update(&CheckpointUpdate::for_phase(descriptor))?;

        Ok(Jump::Moved {
            from: state.phase,
            to: n,
        })
    }

    /// What the next task-granular step would be, without writing.
    ///
    /// # Errors
    ///
    /// Propagates read failures.
    pub fn plan_next(&self) -> Result<NextStep> {
        let state = self.read()?;
        plan_step(&state)
    }

    /// Step to the next unit of work, task-first.
    ///
    /// If the current task has a successor in the phase's catalog task
    /// list, only the task moves (the finished task is appended to the
    /// milestone list). Otherwise the step falls through to the
    /// phase-level advance, which saturates at the last phase.
    ///
    /// # Errors
    ///
    /// Propagates read/write failures.
    pub fn next_step(&self) -> Result<NextStep> {
        let state = self.read()?;
        let step = plan_step(&state)?;

        let mut milestones = state.milestones.clone();
        if !state.task.is_empty() {
            milestones.push(state.task.clone());
        }

        match &step {
            NextStep::Task { task, .. } => {
                self.update(
                    &CheckpointUpdate::default()
                        .with_task(task)
                        .with_milestones(milestones),
                )?;
            }
            NextStep::Phase { to, .. } => {
                let target = phases::describe(*to).ok_or(Error::InvalidPhase {
                    input: to.to_string(),
                })?;
                let mut update = CheckpointUpdate::for_phase(target);
                update.milestones = Some(milestones);
                self.update(&update)?;
            }
            NextStep::Complete => {}
        }

        Ok(step)
    }

    /// Write the default scaffold (used by `init`).
    ///
    /// # Errors
    ///
    /// Propagates write failures.
    pub fn write_initial(&self) -> Result<()> {
        storage::atomic_write(&self.path, &self.default_scaffold())
    }

    /// Default document for a project at phase 1.
    fn default_scaffold(&self) -> String {
        let state = CheckpointState::initial();
        format!(
            "# Project Checkpoint\n\n\
             > Updated automatically at phase transitions and task updates.\n\n\
             ## Session Information\n\
             - **Last Updated**: {now}\n\
             - **Current Phase**: {phase}\n\
             - **Current Role**: {role}\n\
             - **Current Task**: {task}\n\n\
             ## Phase Progress\n\
             {progress}\n\n\
             ## Active Context\n\
             [Current module/feature context]\n\n\
             ## Completed Milestones\n\
             [Auto-populated list of completed milestones]\n\n\
             ## Next Actions\n\
             [Auto-populated with next steps]\n\n\
             ## Open Blockers\n\
             [Auto-populated with any blocking issues]\n\n\
             ---\n\
             *This file is managed by PhaseTrack.*\n",
            now = now_iso(),
            phase = state.phase,
            role = state.role,
            task = state.task,
            progress = render_progress(state.phase),
        )
    }
}

const SESSION: &str = "Session Information";

/// Decide the next task-granular step from a parsed state.
fn plan_step(state: &CheckpointState) -> Result<NextStep> {
    let descriptor = phases::describe(state.phase).ok_or(Error::InvalidPhase {
        input: state.phase.to_string(),
    })?;

    if let Some(task) = descriptor.next_task(&state.task) {
        return Ok(NextStep::Task {
            phase: state.phase,
            task: task.to_string(),
        });
    }

    if state.phase >= phases::LAST_PHASE {
        return Ok(NextStep::Complete);
    }

    let target = phases::describe(state.phase + 1).ok_or(Error::InvalidPhase {
        input: (state.phase + 1).to_string(),
    })?;

    Ok(NextStep::Phase {
        from: state.phase,
        to: target.number,
        role: target.role.to_string(),
        task: target.first_task().to_string(),
    })
}

/// `- Phase N: Status` lines for the whole catalog at `current`.
fn render_progress(current: u8) -> String {
    phases::all()
        .iter()
        .map(|p| {
            format!(
                "- Phase {}: {}",
                p.number,
                PhaseStatus::for_phase(p.number, current).as_str()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Bullet list rendering for milestone/action/blocker sections.
fn render_list(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("- {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parse a bullet-list section body, ignoring placeholders.
fn parse_list(body: Option<&str>) -> Vec<String> {
    body.map(|body| {
        body.lines()
            .filter_map(|line| line.trim().strip_prefix("- "))
            .map(ToString::to_string)
            .collect()
    })
    .unwrap_or_default()
}

/// Scaffold placeholder bodies look like `[Auto-populated ...]`.
fn is_placeholder(body: &str) -> bool {
    let trimmed = body.trim();
    trimmed.starts_with('[') && trimmed.ends_with(']') && !trimmed.contains('\n')
}
