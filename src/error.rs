//! Error types for makedata
//!
//! Provides structured error types with suggestions for common issues.

use serde::Serialize;
use thiserror::Error;

/// Main error type for Makefile generation and execution
#[derive(Error, Debug)]
pub enum MakeError {
    /// The temporary Makefile could not be created
    #[error("Failed to create temporary Makefile: {0}")]
    TempFile(#[source] std::io::Error),

    /// A standalone recipe was serialized without any target
    #[error("Recipe has no targets")]
    NoTargets,

    /// A recipe inside a MakeData has no target
    #[error("Recipe #{position} has no targets")]
    EmptyRecipe { position: usize },

    /// The make program could not be found on PATH
    #[error("Program not found: {program}")]
    ProgramNotFound { program: String },

    /// Failed to spawn the command
    #[error("Failed to spawn command: {command}")]
    SpawnFailed { command: String, error: String },

    /// make ran but exited unsuccessfully
    #[error("Command failed: {command}")]
    CommandFailed {
        command: String,
        exit_code: Option<i32>,
        suggestion: Option<String>,
    },

    /// Recipe manifest could not be read or parsed
    #[error("Invalid manifest {path}: {message}")]
    Manifest { path: String, message: String },

    /// IO error while writing a Makefile
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Serializable error summary, printed by `--error-format json`
#[derive(Debug, Serialize, Clone)]
pub struct ErrorInfo {
    pub message: String,
    pub error_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
}

impl ErrorInfo {
    fn new(err: &MakeError, error_type: &str, suggestion: Option<String>) -> Self {
        Self {
            message: err.to_string(),
            error_type: error_type.to_string(),
            suggestion,
            exit_code: None,
        }
    }
}

impl ErrorInfo {
    /// Summary of a top-level error chain
    ///
    /// The message is the whole chain. Type, suggestion and exit code come
    /// from the `MakeError` inside it, when there is one.
    pub fn from_chain(err: &anyhow::Error) -> Self {
        let message = format!("{:#}", err);
        match err.downcast_ref::<MakeError>() {
            Some(make_err) => Self {
                message,
                ..Self::from(make_err)
            },
            None => Self {
                message,
                error_type: "error".to_string(),
                suggestion: None,
                exit_code: None,
            },
        }
    }
}

impl From<&MakeError> for ErrorInfo {
    fn from(err: &MakeError) -> Self {
        match err {
            MakeError::TempFile(_) => ErrorInfo::new(
                err,
                "temp_file",
                Some("Check that the temp directory exists and is writable".to_string()),
            ),
            MakeError::NoTargets => ErrorInfo::new(
                err,
                "no_targets",
                Some("Add at least one target before serializing the recipe".to_string()),
            ),
            MakeError::EmptyRecipe { position } => ErrorInfo::new(
                err,
                "empty_recipe",
                Some(format!("Give recipe #{} at least one target", position)),
            ),
            MakeError::ProgramNotFound { program } => ErrorInfo::new(
                err,
                "program_not_found",
                Some(format!(
                    "'{}' is not on PATH. Install make or set [make].command in your config.",
                    program
                )),
            ),
            MakeError::SpawnFailed { error, .. } => ErrorInfo::new(
                err,
                "spawn_failed",
                Some(format!("Check if the command exists: {}", error)),
            ),
            MakeError::CommandFailed {
                exit_code,
                suggestion,
                ..
            } => ErrorInfo {
                exit_code: *exit_code,
                ..ErrorInfo::new(err, "command_failed", suggestion.clone())
            },
            MakeError::Manifest { .. } => ErrorInfo::new(
                err,
                "manifest_error",
                Some("Manifests need a `[[recipes]]` array with `targets` lists".to_string()),
            ),
            MakeError::Io(_) => ErrorInfo::new(err, "io_error", None),
        }
    }
}

/// Suggest fixes for common make failures
///
/// make's stderr is passed straight through to the terminal, so the
/// suggestion is keyed on the command line and exit code alone.
pub fn suggest_fix(command: &str, exit_code: Option<i32>) -> Option<String> {
    match exit_code {
        None => Some("make was terminated by a signal before it finished.".to_string()),
        Some(2) if command.contains("make") => Some(
            "make reported an error. A recipe command failed or a prerequisite has no rule; see the output above."
                .to_string(),
        ),
        Some(127) => Some("Required command not found. Check PATH and dependencies.".to_string()),
        Some(126) => Some(
            "Permission denied. Check file permissions or run with appropriate access.".to_string(),
        ),
        _ => None,
    }
}
