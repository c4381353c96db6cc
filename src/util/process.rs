//! Subprocess execution utilities.

use std::ffi::{OsStr, OsString};
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Builder for subprocess execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessBuilder {
    program: PathBuf,
    args: Vec<OsString>,
    cwd: Option<PathBuf>,
}

impl ProcessBuilder {
    /// Create a new process builder for the given program.
    pub fn new(program: impl AsRef<Path>) -> Self {
        ProcessBuilder {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
            cwd: None,
        }
    }

    /// Add a single argument.
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    /// Add multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|s| s.as_ref().to_os_string()));
        self
    }

    /// Set the working directory.
    pub fn cwd(mut self, cwd: impl AsRef<Path>) -> Self {
        self.cwd = Some(cwd.as_ref().to_path_buf());
        self
    }

    /// Get the program path.
    pub fn get_program(&self) -> &Path {
        &self.program
    }

    /// Get the arguments.
    pub fn get_args(&self) -> &[OsString] {
        &self.args
    }

    /// Get the working directory, if one was set.
    pub fn get_cwd(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }

    /// Build the Command.
    fn build_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);

        if let Some(ref cwd) = self.cwd {
            cmd.current_dir(cwd);
        }

        cmd
    }

    /// Display the command for error messages.
    pub fn display_command(&self) -> String {
        let mut parts = vec![self.program.display().to_string()];
        parts.extend(self.args.iter().map(|a| {
            let a = a.to_string_lossy();
            if a.contains(' ') {
                format!("\"{}\"", a)
            } else {
                a.into_owned()
            }
        }));
        parts.join(" ")
    }
}

/// Where a child's output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Collect stdout and stderr.
    Capture,
    /// Share our stdout and stderr.
    Inherit,
    /// Send the child's stdout to our stderr; keeps our stdout clean.
    StdoutToStderr,
    /// Discard everything.
    Null,
}

/// Result of a finished child process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code; `None` when terminated by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs external programs.
///
/// An `Err` from [`Executor::execute`] means the program could not be
/// started at all; a program that ran and failed is an `Ok` with a
/// non-zero code.
pub trait Executor {
    /// Resolve a program name or path to an executable on disk.
    fn locate(&self, program: &Path) -> Option<PathBuf> {
        find_executable(program)
    }

    /// Run the command to completion.
    fn execute(&mut self, cmd: &ProcessBuilder, mode: OutputMode) -> io::Result<ProcessOutput>;
}

/// Executor backed by real child processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemExecutor;

impl Executor for SystemExecutor {
    fn execute(&mut self, cmd: &ProcessBuilder, mode: OutputMode) -> io::Result<ProcessOutput> {
        let mut command = cmd.build_command();

        tracing::debug!("running `{}`", cmd.display_command());

        match mode {
            OutputMode::Capture => {
                let output = command.stdin(Stdio::null()).output()?;
                Ok(ProcessOutput {
                    code: output.status.code(),
                    stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                    stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                })
            }
            OutputMode::Inherit | OutputMode::StdoutToStderr | OutputMode::Null => {
                match mode {
                    OutputMode::Null => {
                        command
                            .stdin(Stdio::null())
                            .stdout(Stdio::null())
                            .stderr(Stdio::null());
                    }
                    OutputMode::StdoutToStderr => {
                        command.stdout(io::stderr());
                    }
                    _ => {}
                }
                let status = command.status()?;
                Ok(ProcessOutput {
                    code: status.code(),
                    ..Default::default()
                })
            }
        }
    }
}

/// Find an executable by name on PATH, or check an explicit path.
pub fn find_executable(program: &Path) -> Option<PathBuf> {
    which::which(program).ok()
}
