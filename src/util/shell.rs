//! Centralized shell output.
//!
//! The Shell owns all user-facing output of a run:
//! - Status lines on stderr with consistent, right-aligned formatting
//! - Diagnostics for fatal errors and warnings
//! - JSON events on stdout for machine-readable output
//!
//! Human and JSON modes are mutually exclusive: in JSON mode nothing but
//! JSON lines is written to stdout.

use std::fmt::Display;
use std::io::{self, IsTerminal, Write};

use crate::util::diagnostic::Diagnostic;

/// Shell output mode - Human and Json are mutually exclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellMode {
    /// Human-readable output with optional colors.
    Human {
        verbosity: Verbosity,
        color: ColorChoice,
    },
    /// Machine-readable JSON output only.
    Json,
}

impl Default for ShellMode {
    fn default() -> Self {
        ShellMode::Human {
            verbosity: Verbosity::Normal,
            color: ColorChoice::Auto,
        }
    }
}

/// Output verbosity level (Human mode only).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// --quiet: errors only
    Quiet,
    #[default]
    Normal,
    /// --verbose: status lines plus the exact commands
    Verbose,
}

/// Color output mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ColorChoice {
    /// Detect TTY and use colors if available.
    #[default]
    Auto,
    /// Always use ANSI colors.
    Always,
    /// Never use ANSI colors.
    Never,
}

/// Status types for output messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    // Success statuses (green)
    Finished,
    Removed,

    // In-progress statuses (cyan)
    Configuring,
    Building,
    Testing,
    Running,
}

impl Status {
    fn as_str(&self) -> &'static str {
        match self {
            Status::Finished => "Finished",
            Status::Removed => "Removed",
            Status::Configuring => "Configuring",
            Status::Building => "Building",
            Status::Testing => "Testing",
            Status::Running => "Running",
        }
    }

    fn color_code(&self) -> &'static str {
        match self {
            Status::Finished | Status::Removed => "\x1b[1;32m",
            Status::Configuring | Status::Building | Status::Testing | Status::Running => {
                "\x1b[1;36m"
            }
        }
    }
}

/// Width status words are right-aligned to.
const STATUS_WIDTH: usize = 12;

/// Central shell for all CLI output.
#[derive(Debug)]
pub struct Shell {
    mode: ShellMode,
    use_color: bool,
}

impl Default for Shell {
    fn default() -> Self {
        Shell::new(ShellMode::default())
    }
}

impl Shell {
    /// Create a new shell with the given mode.
    pub fn new(mode: ShellMode) -> Self {
        let use_color = match &mode {
            ShellMode::Json => false,
            ShellMode::Human { color, .. } => match color {
                ColorChoice::Auto => io::stderr().is_terminal(),
                ColorChoice::Always => true,
                ColorChoice::Never => false,
            },
        };

        Shell { mode, use_color }
    }

    /// Create a shell from CLI flags.
    ///
    /// JSON mode takes precedence over quiet/verbose.
    pub fn from_flags(quiet: bool, verbose: bool, color: ColorChoice, json: bool) -> Self {
        let mode = if json {
            ShellMode::Json
        } else {
            let verbosity = if quiet {
                Verbosity::Quiet
            } else if verbose {
                Verbosity::Verbose
            } else {
                Verbosity::Normal
            };
            ShellMode::Human { verbosity, color }
        };

        Shell::new(mode)
    }

    pub fn is_quiet(&self) -> bool {
        matches!(
            self.mode,
            ShellMode::Human {
                verbosity: Verbosity::Quiet,
                ..
            }
        )
    }

    pub fn is_verbose(&self) -> bool {
        matches!(
            self.mode,
            ShellMode::Human {
                verbosity: Verbosity::Verbose,
                ..
            }
        )
    }

    pub fn is_json(&self) -> bool {
        matches!(self.mode, ShellMode::Json)
    }

    pub fn use_color(&self) -> bool {
        self.use_color
    }

    /// Print a status message.
    ///
    /// Format: `{status:>12} {message}`
    ///
    /// Silent in quiet and JSON mode; fatal errors go through
    /// [`Shell::diagnostic`] instead.
    pub fn status(&self, status: Status, msg: impl Display) {
        if self.is_json() || self.is_quiet() {
            return;
        }

        eprintln!("{} {}", self.format_status(status), msg);
    }

    /// Print a status message only in verbose mode.
    pub fn verbose_status(&self, status: Status, msg: impl Display) {
        if self.is_verbose() {
            self.status(status, msg);
        }
    }

    /// Print a diagnostic.
    ///
    /// Errors are always shown; in JSON mode they become an `error` event.
    /// Warnings are dropped in quiet and JSON mode.
    pub fn diagnostic(&self, diag: &Diagnostic) {
        use crate::util::diagnostic::Severity;

        if self.is_json() {
            if diag.severity == Severity::Error {
                self.json_event(&serde_json::json!({
                    "reason": "error",
                    "message": diag.message,
                    "context": diag.context,
                    "suggestions": diag.suggestions,
                }));
            }
            return;
        }

        if self.is_quiet() && diag.severity != Severity::Error {
            return;
        }

        eprint!("{}", diag.format(self.use_color));
    }

    /// Print a line of primary output to stdout (human mode only).
    pub fn print(&self, msg: impl Display) {
        if self.is_json() || self.is_quiet() {
            return;
        }
        println!("{}", msg);
    }

    /// Print a JSON event to stdout.
    ///
    /// Only works in JSON mode; silently ignored in human mode.
    pub fn json_event(&self, event: &serde_json::Value) {
        if !self.is_json() {
            return;
        }

        let json_str = serde_json::to_string(event).unwrap_or_default();
        println!("{}", json_str);
        let _ = io::stdout().flush();
    }

    /// Format a status prefix with optional color.
    fn format_status(&self, status: Status) -> String {
        let text = status.as_str();

        if self.use_color {
            format!(
                "{}{:>width$}\x1b[0m",
                status.color_code(),
                text,
                width = STATUS_WIDTH
            )
        } else {
            format!("{:>width$}", text, width = STATUS_WIDTH)
        }
    }
}
