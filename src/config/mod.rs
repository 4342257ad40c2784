//! Workspace discovery and configuration.
//!
//! PhaseTrack keeps all project state under a per-project `.phasetrack/`
//! directory: the checkpoint document at `.phasetrack/checkpoint.md` and
//! the knowledge base under `.phasetrack/kb/`. This module finds that
//! directory and resolves the actor identity used for authorship stamps.

use crate::error::{Error, Result};

use std::path::{Path, PathBuf};

/// Name of the per-project state directory.
pub const DOT_DIR: &str = ".phasetrack";

/// Resolved paths for one project workspace.
#[derive(Debug, Clone)]
pub struct Workspace {
    dir: PathBuf,
}

impl Workspace {
    /// Resolve the workspace directory for the current invocation.
    ///
    /// Priority:
    /// 1. Explicit `--dir` flag
    /// 2. `PT_DIR` environment variable
    /// 3. Discovery: git toplevel first, then walking up from CWD
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotInitialized`] when no `.phasetrack/` directory
    /// can be found.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        if let Some(dir) = explicit {
            return Ok(Self {
                dir: dir.to_path_buf(),
            });
        }

        if let Ok(dir) = std::env::var("PT_DIR") {
            if !dir.trim().is_empty() {
                return Ok(Self {
                    dir: PathBuf::from(dir),
                });
            }
        }

        discover_project_dir()
            .map(|dir| Self { dir })
            .ok_or(Error::NotInitialized)
    }

    /// Wrap an already-known workspace directory (used by `init`).
    #[must_use]
    pub fn at(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// The `.phasetrack/` directory itself.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the checkpoint document.
    #[must_use]
    pub fn checkpoint_path(&self) -> PathBuf {
        self.dir.join("checkpoint.md")
    }

    /// Root of the knowledge base tree.
    #[must_use]
    pub fn kb_dir(&self) -> PathBuf {
        self.dir.join("kb")
    }
}

/// Discover the project-level `.phasetrack/` directory.
///
/// Resolution strategy:
/// 1. Check the **git root** first — if the git root has `.phasetrack/`,
///    use it. This prevents subdirectory state dirs from shadowing the
///    real project root.
/// 2. Fall back to walking up from CWD (for non-git projects).
#[must_use]
pub fn discover_project_dir() -> Option<PathBuf> {
    // Strategy 1: Use git root as the anchor (handles monorepos/subdirectories)
    if let Some(git_root) = git_toplevel() {
        let candidate = git_root.join(DOT_DIR);
        if candidate.is_dir() {
            return Some(candidate);
        }
    }

    // Strategy 2: Walk up from CWD (non-git projects)
    if let Ok(cwd) = std::env::current_dir() {
        let mut dir = cwd.as_path();
        loop {
            let candidate = dir.join(DOT_DIR);
            if candidate.is_dir() {
                return Some(candidate);
            }

            match dir.parent() {
                Some(parent) => dir = parent,
                None => break,
            }
        }
    }
    None
}

/// Get the git repository root directory.
fn git_toplevel() -> Option<PathBuf> {
    std::process::Command::new("git")
        .args(["rev-parse", "--show-toplevel"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .map(|o| PathBuf::from(String::from_utf8_lossy(&o.stdout).trim().to_string()))
}

/// Get the current git branch name.
///
/// Returns `None` if not in a git repository or if git command fails.
#[must_use]
pub fn current_git_branch() -> Option<String> {
    std::process::Command::new("git")
        .args(["rev-parse", "--abbrev-ref", "HEAD"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .map(|output| String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Get the default actor name.
///
/// Priority:
/// 1. `PT_ACTOR` environment variable
/// 2. Git user name
/// 3. System username
/// 4. "unknown"
#[must_use]
pub fn default_actor() -> String {
    // Check environment variable
    if let Ok(actor) = std::env::var("PT_ACTOR") {
        if !actor.is_empty() {
            return actor;
        }
    }

    // Try git user name
    if let Ok(output) = std::process::Command::new("git")
        .args(["config", "user.name"])
        .output()
    {
        if output.status.success() {
            let name = String::from_utf8_lossy(&output.stdout).trim().to_string();
            if !name.is_empty() {
                return name;
            }
        }
    }

    // Try system username
    if let Ok(user) = std::env::var("USER") {
        return user;
    }

    "unknown".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_actor() {
        let actor = default_actor();
        assert!(!actor.is_empty());
    }

    #[test]
    fn test_workspace_resolve_with_explicit() {
        let explicit = PathBuf::from("/custom/path/.phasetrack");
        let ws = Workspace::resolve(Some(&explicit)).unwrap();
        assert_eq!(ws.dir(), explicit.as_path());
    }

    #[test]
    fn test_workspace_paths() {
        let ws = Workspace::at(PathBuf::from("/proj/.phasetrack"));
        assert_eq!(
            ws.checkpoint_path(),
            PathBuf::from("/proj/.phasetrack/checkpoint.md")
        );
        assert_eq!(ws.kb_dir(), PathBuf::from("/proj/.phasetrack/kb"));
    }
}
