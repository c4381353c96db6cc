//! Test utilities and mocks for slipway unit tests.
//!
//! # Example
//!
//! ```rust,ignore
//! use slipway::test_support::{MockExecutor, MockProcessOutput};
//!
//! #[test]
//! fn test_example() {
//!     let mut exec = MockExecutor::new();
//!     exec.missing("cl");
//!     exec.expect("cmake --version", MockProcessOutput::success("cmake version 3.28.1"));
//!
//!     // Run code against `&mut exec`, then inspect `exec.commands()`.
//! }
//! ```

use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

use crate::util::process::{Executor, OutputMode, ProcessBuilder, ProcessOutput};

/// Canned output for a mocked process.
#[derive(Debug, Clone)]
pub struct MockProcessOutput {
    pub status: i32,
    pub stdout: String,
    pub stderr: String,
}

impl MockProcessOutput {
    /// Successful output with the given stdout.
    pub fn success(stdout: impl Into<String>) -> Self {
        MockProcessOutput {
            status: 0,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Failed output with the given status and stderr.
    pub fn failure(status: i32, stderr: impl Into<String>) -> Self {
        MockProcessOutput {
            status,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    fn to_output(&self) -> ProcessOutput {
        ProcessOutput {
            code: Some(self.status),
            stdout: self.stdout.clone(),
            stderr: self.stderr.clone(),
        }
    }
}

impl Default for MockProcessOutput {
    fn default() -> Self {
        MockProcessOutput::success("")
    }
}

/// Pattern for matching commands in MockExecutor.
#[derive(Debug, Clone)]
pub enum CommandPattern {
    /// Exact match of the displayed command line
    Exact(String),
    /// Displayed command line starts with this prefix
    Prefix(String),
}

impl CommandPattern {
    pub fn matches(&self, cmd: &str) -> bool {
        match self {
            CommandPattern::Exact(s) => cmd == s,
            CommandPattern::Prefix(p) => cmd.starts_with(p.as_str()),
        }
    }
}

/// A command actually run through the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub command: String,
    pub cwd: Option<PathBuf>,
    pub mode: OutputMode,
}

/// Mock process executor.
///
/// Commands are matched against expectations in the order they were
/// added; unmatched commands get the default output. Programs marked
/// missing fail to start with `NotFound`.
#[derive(Debug, Default)]
pub struct MockExecutor {
    expectations: Vec<(CommandPattern, MockProcessOutput)>,
    missing: HashSet<PathBuf>,
    default_output: MockProcessOutput,
    calls: Vec<RecordedCall>,
}

impl MockExecutor {
    pub fn new() -> Self {
        MockExecutor::default()
    }

    /// Expect an exact command line.
    pub fn expect(&mut self, cmd: &str, output: MockProcessOutput) -> &mut Self {
        self.expectations
            .push((CommandPattern::Exact(cmd.to_string()), output));
        self
    }

    /// Expect any command line starting with `prefix`.
    pub fn expect_prefix(&mut self, prefix: &str, output: MockProcessOutput) -> &mut Self {
        self.expectations
            .push((CommandPattern::Prefix(prefix.to_string()), output));
        self
    }

    /// Make a program fail to start.
    pub fn missing(&mut self, program: impl AsRef<Path>) -> &mut Self {
        self.missing.insert(program.as_ref().to_path_buf());
        self
    }

    /// Output for commands with no matching expectation.
    pub fn set_default(&mut self, output: MockProcessOutput) -> &mut Self {
        self.default_output = output;
        self
    }

    /// Every call made so far.
    pub fn calls(&self) -> &[RecordedCall] {
        &self.calls
    }

    /// Displayed command lines of every call made so far.
    pub fn commands(&self) -> Vec<&str> {
        self.calls.iter().map(|c| c.command.as_str()).collect()
    }
}

impl Executor for MockExecutor {
    fn locate(&self, program: &Path) -> Option<PathBuf> {
        if self.missing.contains(program) {
            None
        } else {
            Some(program.to_path_buf())
        }
    }

    fn execute(&mut self, cmd: &ProcessBuilder, mode: OutputMode) -> io::Result<ProcessOutput> {
        if self.missing.contains(cmd.get_program()) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("program not found: {}", cmd.get_program().display()),
            ));
        }

        let command = cmd.display_command();
        self.calls.push(RecordedCall {
            command: command.clone(),
            cwd: cmd.get_cwd().map(Path::to_path_buf),
            mode,
        });

        let output = self
            .expectations
            .iter()
            .find(|(pattern, _)| pattern.matches(&command))
            .map(|(_, output)| output)
            .unwrap_or(&self.default_output);

        Ok(output.to_output())
    }
}

/// Create a temporary CMake project with a minimal `CMakeLists.txt`.
pub fn create_cmake_project() -> tempfile::TempDir {
    let tmp = tempfile::TempDir::new().expect("failed to create temp dir");
    std::fs::write(tmp.path().join("CMakeLists.txt"), minimal_cmakelists("demo"))
        .expect("failed to write CMakeLists.txt");
    tmp
}

/// A minimal `CMakeLists.txt` with an optional test target.
pub fn minimal_cmakelists(name: &str) -> String {
    format!(
        r#"cmake_minimum_required(VERSION 3.16)
project({name} C)

add_executable({name} main.c)

option(BUILD_TESTS "Build tests" OFF)
if(BUILD_TESTS)
    enable_testing()
    add_test(NAME {name}_runs COMMAND {name})
endif()
"#,
        name = name
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_executor_matching() {
        let mut exec = MockExecutor::new();
        exec.expect_prefix("cmake --build", MockProcessOutput::failure(2, "link error"))
            .set_default(MockProcessOutput::success("ok"));

        let out = exec
            .execute(&ProcessBuilder::new("cmake").args(["--build", "."]), OutputMode::Inherit)
            .unwrap();
        assert_eq!(out.code, Some(2));

        let out = exec
            .execute(&ProcessBuilder::new("ctest").cwd("/b"), OutputMode::Capture)
            .unwrap();
        assert!(out.success());
        assert_eq!(out.stdout, "ok");

        assert_eq!(exec.commands(), vec!["cmake --build .", "ctest"]);
        assert_eq!(exec.calls()[1].cwd.as_deref(), Some(Path::new("/b")));
    }

    #[test]
    fn test_mock_executor_missing() {
        let mut exec = MockExecutor::new();
        exec.missing("cl");

        assert!(exec.locate(Path::new("cl")).is_none());
        let err = exec
            .execute(&ProcessBuilder::new("cl"), OutputMode::Null)
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert!(exec.calls().is_empty());
    }
}
