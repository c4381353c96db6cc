//! Errors that end a run, and how each one is reported.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::core::request::Phase;
use crate::util::diagnostic::{suggestions, Diagnostic};

/// Fatal error during an orchestrated build.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("native compiler `{compiler}` is not reachable")]
    CompilerNotFound {
        compiler: String,
        /// Environment-setup helper of a known installation, if one exists.
        env_script: Option<PathBuf>,
    },

    #[error("{tool} not found")]
    ToolMissing { tool: String, reason: String },

    #[error("could not find `CMakeLists.txt` in `{}` or any parent directory", .start.display())]
    ProjectRootNotFound { start: PathBuf },

    #[error("failed to prepare build directory `{}`", .path.display())]
    BuildDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to start `{command}`")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("{phase} step failed with {}", describe_code(.code))]
    ProcessFailed {
        phase: Phase,
        command: String,
        code: Option<i32>,
    },
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("exit code {}", c),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

impl BuildError {
    /// Process exit status for this error.
    ///
    /// Precondition failures exit with 1. A failed tool's own exit code is
    /// passed through.
    pub fn exit_code(&self) -> i32 {
        match self {
            BuildError::ProcessFailed {
                code: Some(code), ..
            } if *code != 0 => *code,
            _ => 1,
        }
    }

    /// Convert to a user-facing diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.to_string());

        match self {
            BuildError::CompilerNotFound { env_script, .. } => match env_script {
                Some(script) => diag
                    .with_suggestion(suggestions::DEVELOPER_PROMPT)
                    .with_suggestion(format!("Run: {}", script.display())),
                None => diag,
            },

            BuildError::ToolMissing { reason, .. } => diag
                .with_context(reason.clone())
                .with_suggestion(suggestions::INSTALL_CMAKE),

            BuildError::ProjectRootNotFound { .. } => {
                diag.with_suggestion(suggestions::PROJECT_ROOT)
            }

            BuildError::BuildDirectory { path, source } => diag
                .with_context(source.to_string())
                .with_location(path.clone()),

            BuildError::Spawn { source, .. } => diag.with_context(source.to_string()),

            BuildError::ProcessFailed { command, .. } => diag.with_context(command.clone()),
        }
    }
}
