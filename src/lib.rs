//! PhaseTrack CLI - plain-text workflow tracking for dev projects
//!
//! This crate provides the core functionality for the `pt` CLI tool: a
//! 5-phase project workflow tracker and a small searchable knowledge
//! base, both persisted as human-editable markdown under a per-project
//! `.phasetrack/` directory.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface using clap
//! - [`phases`] - The immutable 5-phase workflow catalog
//! - [`model`] - Data types (CheckpointState, KnowledgeEntry, Category)
//! - [`checkpoint`] - Checkpoint document store and phase transitions
//! - [`kb`] - Knowledge base: entries, index, relevance search
//! - [`config`] - Workspace discovery and actor resolution
//! - [`storage`] - Atomic plain-text document writes
//! - [`error`] - Error types and handling
//!
//! # Concurrency
//!
//! One invocation, one writer: every command reloads state from disk,
//! applies at most a few writes, and exits. Individual writes are atomic
//! (temp file + rename), but there is no cross-process locking — running
//! two mutating invocations against the same project concurrently is
//! unsupported.

#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod checkpoint;
pub mod cli;
pub mod config;
pub mod error;
pub mod kb;
pub mod model;
pub mod phases;
pub mod storage;
pub mod validate;

pub use error::{Error, Result};

/// Global silent mode flag for `--silent` output.
///
/// When set, create/mutate commands print only the ID or phase number
/// instead of full output. Avoids threading a `silent` bool through
/// every handler signature.
pub static SILENT: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(false);

/// Global dry-run flag for `--dry-run`.
///
/// When set, mutate commands preview what would happen without writing.
pub static DRY_RUN: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(false);

/// Global CSV output flag (set when `--format csv`).
pub static CSV_OUTPUT: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(false);

/// Check if silent mode is active.
#[inline]
pub fn is_silent() -> bool {
    SILENT.load(std::sync::atomic::Ordering::Relaxed)
}

/// Check if dry-run mode is active.
#[inline]
pub fn is_dry_run() -> bool {
    DRY_RUN.load(std::sync::atomic::Ordering::Relaxed)
}

/// Check if CSV output is requested.
#[inline]
pub fn is_csv() -> bool {
    CSV_OUTPUT.load(std::sync::atomic::Ordering::Relaxed)
}

/// Current time as an ISO-8601 UTC stamp with millisecond precision.
///
/// The single timestamp format used across the checkpoint document and
/// the knowledge base index.
#[must_use]
pub fn now_iso() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

/// Escape a value for CSV output (wrap in quotes if it contains commas, quotes, or newlines).
pub fn csv_escape(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
