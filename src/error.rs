//! Error types for PhaseTrack CLI.
//!
//! Provides structured error handling with:
//! - Machine-readable error codes (`ErrorCode`)
//! - Category-based exit codes (2=workspace, 3=not_found, 4=validation, etc.)
//! - Retryability flags for agent self-correction
//! - Context-aware recovery hints
//! - Structured JSON output for piped / non-TTY consumers

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for PhaseTrack operations.
pub type Result<T> = std::result::Result<T, Error>;

// ── Error Code ────────────────────────────────────────────────

/// Machine-readable error codes grouped by category.
///
/// Each code maps to a SCREAMING_SNAKE string and a category-based
/// exit code. Agents match on the string; shell scripts on the exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Workspace (exit 2)
    NotInitialized,
    AlreadyInitialized,

    // Not Found (exit 3)
    EntryNotFound,

    // Validation (exit 4)
    InvalidPhase,
    InvalidCategory,
    InvalidArgument,
    EntryExists,

    // Config (exit 7)
    ConfigError,

    // I/O (exit 8)
    IoError,
    JsonError,

    // Internal (exit 1)
    InternalError,
}

impl ErrorCode {
    /// Machine-readable SCREAMING_SNAKE code string.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        match self {
            Self::NotInitialized => "NOT_INITIALIZED",
            Self::AlreadyInitialized => "ALREADY_INITIALIZED",
            Self::EntryNotFound => "ENTRY_NOT_FOUND",
            Self::InvalidPhase => "INVALID_PHASE",
            Self::InvalidCategory => "INVALID_CATEGORY",
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::EntryExists => "ENTRY_EXISTS",
            Self::ConfigError => "CONFIG_ERROR",
            Self::IoError => "IO_ERROR",
            Self::JsonError => "JSON_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Category-based exit code (1-8).
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::InternalError => 1,
            Self::NotInitialized | Self::AlreadyInitialized => 2,
            Self::EntryNotFound => 3,
            Self::InvalidPhase
            | Self::InvalidCategory
            | Self::InvalidArgument
            | Self::EntryExists => 4,
            Self::ConfigError => 7,
            Self::IoError | Self::JsonError => 8,
        }
    }

    /// Whether an agent should retry with corrected input.
    ///
    /// True for validation errors (bad phase number, unknown category,
    /// duplicate id). False for not-found, I/O, or internal errors.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::InvalidPhase | Self::InvalidCategory | Self::InvalidArgument | Self::EntryExists
        )
    }
}

// ── Error Enum ────────────────────────────────────────────────

/// Errors that can occur in PhaseTrack CLI operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Not a PhaseTrack project: run `pt init` first")]
    NotInitialized,

    #[error("Already initialized at {path}")]
    AlreadyInitialized { path: PathBuf },

    #[error("Phase number must be between 1 and 5 (got {input})")]
    InvalidPhase { input: String },

    #[error("Invalid entry category: {input}")]
    InvalidCategory {
        input: String,
        suggestion: Option<String>,
    },

    #[error("Entry not found: {category}/{id}")]
    EntryNotFound { category: String, id: String },

    #[error("Entry not found: {category}/{id} (did you mean: {}?)", similar.join(", "))]
    EntryNotFoundSimilar {
        category: String,
        id: String,
        similar: Vec<String>,
    },

    #[error("Entry {id} already exists in {category}")]
    EntryExists { category: String, id: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Map this error to its structured `ErrorCode`.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::NotInitialized => ErrorCode::NotInitialized,
            Self::AlreadyInitialized { .. } => ErrorCode::AlreadyInitialized,
            Self::InvalidPhase { .. } => ErrorCode::InvalidPhase,
            Self::InvalidCategory { .. } => ErrorCode::InvalidCategory,
            Self::EntryNotFound { .. } | Self::EntryNotFoundSimilar { .. } => {
                ErrorCode::EntryNotFound
            }
            Self::EntryExists { .. } => ErrorCode::EntryExists,
            Self::InvalidArgument(_) => ErrorCode::InvalidArgument,
            Self::Config(_) => ErrorCode::ConfigError,
            Self::Io(_) => ErrorCode::IoError,
            Self::Json(_) => ErrorCode::JsonError,
            Self::Other(_) => ErrorCode::InternalError,
        }
    }

    /// Category-based exit code, delegating to the `ErrorCode`.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        self.error_code().exit_code()
    }

    /// Context-aware recovery hint for agents and humans.
    ///
    /// Returns `None` if no actionable suggestion exists.
    #[must_use]
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::NotInitialized => {
                Some("Run `pt init` to create the .phasetrack/ workspace".to_string())
            }

            Self::AlreadyInitialized { path } => Some(format!(
                "Workspace already exists at {}. Use `--force` to recreate it.",
                path.display()
            )),

            Self::InvalidPhase { .. } => Some(
                "Valid phases: 1 (Requirements), 2 (Planning), 3 (Implementation), \
                 4 (Verification), 5 (Release)"
                    .to_string(),
            ),

            Self::InvalidCategory { suggestion, .. } => match suggestion {
                Some(s) => Some(format!(
                    "Did you mean '{s}'? Valid categories: pattern, failure, decision"
                )),
                None => Some("Valid categories: pattern, failure, decision".to_string()),
            },

            Self::EntryNotFound { category, .. } => Some(format!(
                "Use `pt kb list --category {category}` to see available entries."
            )),
            Self::EntryNotFoundSimilar { similar, .. } => {
                Some(format!("Did you mean: {}?", similar.join(", ")))
            }

            Self::EntryExists { category, id } => Some(format!(
                "Use a different id, or view the existing entry with \
                 `pt kb show {category} {id}`."
            )),

            Self::InvalidArgument(_)
            | Self::Io(_)
            | Self::Json(_)
            | Self::Config(_)
            | Self::Other(_) => None,
        }
    }

    /// Structured JSON representation for machine consumption.
    ///
    /// Includes error code, message, retryability, exit code, and
    /// optional recovery hint. Agents parse this instead of stderr text.
    #[must_use]
    pub fn to_structured_json(&self) -> serde_json::Value {
        let code = self.error_code();
        let mut obj = serde_json::json!({
            "error": {
                "code": code.as_str(),
                "message": self.to_string(),
                "retryable": code.is_retryable(),
                "exit_code": code.exit_code(),
            }
        });

        if let Some(hint) = self.hint() {
            obj["error"]["hint"] = serde_json::Value::String(hint);
        }

        obj
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_by_category() {
        assert_eq!(Error::NotInitialized.exit_code(), 2);
        assert_eq!(
            Error::EntryNotFound {
                category: "patterns".into(),
                id: "x".into()
            }
            .exit_code(),
            3
        );
        assert_eq!(Error::InvalidPhase { input: "9".into() }.exit_code(), 4);
        assert_eq!(
            Error::EntryExists {
                category: "patterns".into(),
                id: "x".into()
            }
            .exit_code(),
            4
        );
    }

    #[test]
    fn test_structured_json_shape() {
        let err = Error::InvalidPhase { input: "0".into() };
        let json = err.to_structured_json();

        assert_eq!(json["error"]["code"], "INVALID_PHASE");
        assert_eq!(json["error"]["exit_code"], 4);
        assert_eq!(json["error"]["retryable"], true);
        assert!(
            json["error"]["hint"]
                .as_str()
                .unwrap()
                .contains("Requirements")
        );
    }

    #[test]
    fn test_duplicate_entry_is_retryable() {
        let err = Error::EntryExists {
            category: "decisions".into(),
            id: "db-choice".into(),
        };
        assert!(err.error_code().is_retryable());
    }
}
