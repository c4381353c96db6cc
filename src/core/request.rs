//! The build request assembled from command-line input and config.

use std::fmt;
use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use crate::util::config::Config;

/// Default number of parallel build jobs.
pub const DEFAULT_JOBS: u32 = 10;

/// CMake build configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[derive(clap::ValueEnum)]
pub enum BuildType {
    #[default]
    #[value(name = "Debug")]
    Debug,
    #[value(name = "Release")]
    Release,
    #[value(name = "RelWithDebInfo")]
    RelWithDebInfo,
    #[value(name = "MinSizeRel")]
    MinSizeRel,
}

impl BuildType {
    /// The name CMake expects for `CMAKE_BUILD_TYPE` and `--config`.
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildType::Debug => "Debug",
            BuildType::Release => "Release",
            BuildType::RelWithDebInfo => "RelWithDebInfo",
            BuildType::MinSizeRel => "MinSizeRel",
        }
    }
}

impl fmt::Display for BuildType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which phases a run goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[derive(clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum Action {
    Configure,
    Build,
    #[default]
    ConfigureAndBuild,
    Test,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Configure => "configure",
            Action::Build => "build",
            Action::ConfigureAndBuild => "configure_and_build",
            Action::Test => "test",
        }
    }

    /// Phases run for this action, in execution order.
    ///
    /// Every action configures first; `build` re-runs configure so a fresh
    /// build directory is always usable.
    pub fn phases(&self) -> &'static [Phase] {
        match self {
            Action::Configure => &[Phase::Configure],
            Action::Build | Action::ConfigureAndBuild => &[Phase::Configure, Phase::Build],
            Action::Test => &[Phase::Configure, Phase::Build, Phase::Test],
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An external tool invocation within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Configure,
    Build,
    Test,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Configure => "configure",
            Phase::Build => "build",
            Phase::Test => "test",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single invocation's worth of build options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRequest {
    pub build_type: BuildType,
    pub action: Action,
    pub jobs: NonZeroU32,
    pub clean: bool,
}

impl Default for BuildRequest {
    fn default() -> Self {
        BuildRequest {
            build_type: BuildType::default(),
            action: Action::default(),
            jobs: default_jobs(),
            clean: false,
        }
    }
}

/// Values given on the command line; `None` defers to config.
#[derive(Debug, Clone, Default)]
pub struct RequestOverrides {
    pub build_type: Option<BuildType>,
    pub action: Option<Action>,
    pub jobs: Option<NonZeroU32>,
    pub clean: bool,
}

impl BuildRequest {
    /// Resolve a request: command line, then config, then defaults.
    pub fn resolve(overrides: RequestOverrides, config: &Config) -> Self {
        BuildRequest {
            build_type: overrides
                .build_type
                .or(config.build.build_type)
                .unwrap_or_default(),
            action: overrides.action.or(config.build.action).unwrap_or_default(),
            jobs: overrides
                .jobs
                .or(config.build.jobs)
                .unwrap_or_else(default_jobs),
            clean: overrides.clean,
        }
    }
}

fn default_jobs() -> NonZeroU32 {
    NonZeroU32::new(DEFAULT_JOBS).unwrap_or(NonZeroU32::MIN)
}
