//! CLI definitions using clap.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for list/query commands.
#[derive(ValueEnum, Clone, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Table,
    /// JSON (same as --json)
    Json,
    /// Comma-separated values
    Csv,
}

pub mod commands;

/// PhaseTrack CLI - workflow phase tracking and knowledge base
#[derive(Parser, Debug)]
#[command(name = "pt", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace directory (default: discovered .phasetrack/)
    #[arg(long, global = true, env = "PT_DIR")]
    pub dir: Option<PathBuf>,

    /// Actor name for authorship stamps
    #[arg(long, global = true, env = "PT_ACTOR")]
    pub actor: Option<String>,

    /// Output as JSON (for agent integration)
    #[arg(long, alias = "robot", global = true)]
    pub json: bool,

    /// Output format (table, json, csv)
    #[arg(long, value_enum, global = true, default_value_t)]
    pub format: OutputFormat,

    /// Output only the ID/phase number (for agent scripting)
    #[arg(long, global = true)]
    pub silent: bool,

    /// Preview changes without writing any document
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (no output except errors)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a PhaseTrack workspace
    Init {
        /// Overwrite an existing workspace
        #[arg(long)]
        force: bool,
    },

    /// Print version information
    Version,

    /// Show project status
    Status,

    /// Jump to a workflow phase (1-5)
    Phase {
        /// Target phase number
        number: String,
    },

    /// Advance to the next task or phase
    Next,

    /// Checkpoint management
    Checkpoint {
        #[command(subcommand)]
        command: CheckpointCommands,
    },

    /// Knowledge base (patterns, failures, decisions)
    Kb {
        #[command(subcommand)]
        command: KbCommands,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completions.
#[derive(clap::ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ============================================================================
// Checkpoint Commands
// ============================================================================

#[derive(Subcommand, Debug)]
pub enum CheckpointCommands {
    /// Show the full checkpoint state
    Show,

    /// Apply a partial checkpoint update
    Update(CheckpointUpdateArgs),
}

#[derive(Args, Debug, Default)]
pub struct CheckpointUpdateArgs {
    /// New current task
    #[arg(short, long)]
    pub task: Option<String>,

    /// New active context block
    #[arg(short, long)]
    pub context: Option<String>,

    /// Append completed milestones (repeatable or comma-separated)
    #[arg(long = "add-milestone", value_delimiter = ',')]
    pub add_milestones: Vec<String>,

    /// Append next actions (repeatable or comma-separated)
    #[arg(long = "add-action", value_delimiter = ',')]
    pub add_actions: Vec<String>,

    /// Append open blockers (repeatable or comma-separated)
    #[arg(long = "add-blocker", value_delimiter = ',')]
    pub add_blockers: Vec<String>,

    /// Clear all open blockers
    #[arg(long)]
    pub clear_blockers: bool,
}

// ============================================================================
// Knowledge Base Commands
// ============================================================================

#[derive(Subcommand, Debug)]
pub enum KbCommands {
    /// Add a new entry
    Add(KbAddArgs),

    /// Show entry details
    Show {
        /// Entry category (pattern, failure, decision)
        category: String,

        /// Entry id
        id: String,
    },

    /// List entries
    List {
        /// Filter by category
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Search entries by relevance
    Search {
        /// Search query
        query: String,

        /// Maximum results to return
        #[arg(short, long, default_value = "10")]
        limit: usize,

        /// Filter by category
        #[arg(short, long)]
        category: Option<String>,
    },
}

#[derive(Args, Debug)]
pub struct KbAddArgs {
    /// Entry category (pattern, failure, decision)
    pub category: String,

    /// Entry id (unique within the category)
    pub id: String,

    /// Display title (defaults to the id)
    #[arg(long)]
    pub title: Option<String>,

    /// One-line description shown in the index and search results
    #[arg(short, long, default_value = "")]
    pub description: String,

    /// Free-form body content
    #[arg(long, default_value = "")]
    pub content: String,

    /// Tags (-t auth -t security or -t auth,security)
    #[arg(short = 't', long, value_delimiter = ',')]
    pub tags: Vec<String>,

    /// Workflow phase this entry was captured in (1-5)
    #[arg(short, long)]
    pub phase: Option<String>,

    /// Related entry ids (comma-separated)
    #[arg(short, long, value_delimiter = ',')]
    pub related: Vec<String>,
}
