//! Implementation of a slipway run: checks, directory setup, then the
//! configure, build and test phases in order.

use std::path::{Path, PathBuf};

use serde_json::json;

use crate::builder::cmake::{CMakeBuilder, DEFAULT_TESTS_OPTION};
use crate::core::layout::BuildLayout;
use crate::core::request::{BuildRequest, Phase};
use crate::toolchain::{check_cmake, check_compiler, ToolchainProfile, Tools};
use crate::util::config::Config;
use crate::util::errors::BuildError;
use crate::util::fs::{ensure_dir, remove_dir_all_if_exists};
use crate::util::process::{Executor, OutputMode};
use crate::util::shell::{Shell, Status};

/// Everything a run needs, resolved from CLI and config.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// What to build and which phases to run
    pub request: BuildRequest,

    /// Directory containing the top-level `CMakeLists.txt`
    pub project_root: PathBuf,

    /// Native toolchain targeted by the configure step
    pub profile: ToolchainProfile,

    /// CMake and CTest locations
    pub tools: Tools,

    /// Cache variable switched ON to compile tests
    pub tests_option: String,

    /// Extra configure arguments
    pub cmake_args: Vec<String>,
}

impl BuildOptions {
    /// Combine a request with the host profile and config overrides.
    pub fn new(request: BuildRequest, project_root: impl Into<PathBuf>, config: &Config) -> Self {
        BuildOptions {
            request,
            project_root: project_root.into(),
            profile: ToolchainProfile::host().with_config(&config.toolchain),
            tools: Tools::from_config(&config.tools),
            tests_option: config
                .build
                .tests_option
                .clone()
                .unwrap_or_else(|| DEFAULT_TESTS_OPTION.to_string()),
            cmake_args: config.build.cmake_args.clone(),
        }
    }

    /// The layout this run builds into.
    pub fn layout(&self) -> BuildLayout {
        BuildLayout::new(
            &self.project_root,
            self.request.build_type,
            &self.profile.platform_tag,
        )
    }
}

/// Result of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildResult {
    /// Build directory the phases ran in
    pub build_dir: PathBuf,

    /// Phases run, in order
    pub phases: Vec<Phase>,

    /// Version reported by CMake, if it could be parsed
    pub cmake_version: Option<String>,
}

/// Run the checks and phases for `opts`.
///
/// Stops at the first failure; nothing done before it is undone.
pub fn build(
    opts: &BuildOptions,
    exec: &mut dyn Executor,
    shell: &Shell,
) -> Result<BuildResult, BuildError> {
    let request = &opts.request;

    check_compiler(&opts.profile, exec)?;
    let cmake = check_cmake(&opts.tools, exec)?;

    let layout = opts.layout();
    prepare_build_dir(layout.build_dir(), request.clean, shell)?;

    // Run CMake from the path that answered --version.
    let tools = Tools {
        cmake: cmake.path,
        ctest: opts.tools.ctest.clone(),
    };
    let builder = CMakeBuilder::new(
        &opts.profile,
        &tools,
        layout.project_root(),
        layout.build_dir(),
    )
    .build_type(request.build_type)
    .jobs(request.jobs)
    .tests_option(opts.tests_option.as_str())
    .args(opts.cmake_args.iter().cloned());

    // Tool stdout must not interleave with JSON events.
    let mode = if shell.is_json() {
        OutputMode::StdoutToStderr
    } else {
        OutputMode::Inherit
    };

    let mut phases = Vec::new();
    for &phase in request.action.phases() {
        announce(phase, opts, shell);
        run_phase(phase, &builder, mode, exec, shell)?;
        phases.push(phase);
    }

    Ok(BuildResult {
        build_dir: layout.build_dir().to_path_buf(),
        phases,
        cmake_version: cmake.version,
    })
}

/// Remove the build directory when cleaning, then make sure it exists.
fn prepare_build_dir(build_dir: &Path, clean: bool, shell: &Shell) -> Result<(), BuildError> {
    let dir_error = |source| BuildError::BuildDirectory {
        path: build_dir.to_path_buf(),
        source,
    };

    if clean && remove_dir_all_if_exists(build_dir).map_err(dir_error)? {
        shell.status(Status::Removed, build_dir.display());
    }

    ensure_dir(build_dir).map_err(dir_error)?;
    tracing::debug!("build directory ready at {}", build_dir.display());

    Ok(())
}

fn announce(phase: Phase, opts: &BuildOptions, shell: &Shell) {
    let request = &opts.request;
    match phase {
        Phase::Configure => shell.status(
            Status::Configuring,
            format!(
                "{} ({}, {})",
                opts.project_root.display(),
                request.build_type,
                opts.profile.generator
            ),
        ),
        Phase::Build => shell.status(
            Status::Building,
            format!("{} with {} job(s)", request.build_type, request.jobs),
        ),
        Phase::Test => shell.status(Status::Testing, request.build_type),
    }
}

fn run_phase(
    phase: Phase,
    builder: &CMakeBuilder<'_>,
    mode: OutputMode,
    exec: &mut dyn Executor,
    shell: &Shell,
) -> Result<(), BuildError> {
    let cmd = builder.command(phase);
    let command = cmd.display_command();
    shell.verbose_status(Status::Running, format!("`{}`", command));

    shell.json_event(&json!({
        "reason": "phase-started",
        "phase": phase,
        "command": command,
        "cwd": builder.build_dir().display().to_string(),
    }));

    let output = exec.execute(&cmd, mode).map_err(|source| BuildError::Spawn {
        command: command.clone(),
        source,
    })?;

    if !output.success() {
        return Err(BuildError::ProcessFailed {
            phase,
            command,
            code: output.code,
        });
    }

    shell.json_event(&json!({
        "reason": "phase-finished",
        "phase": phase,
    }));

    Ok(())
}
