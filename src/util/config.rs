//! Configuration file support for slipway.
//!
//! slipway reads two configuration files:
//! - Global: `$SLIPWAY_HOME/config.toml` (default `~/.slipway/config.toml`)
//! - Project: `<project root>/.slipway/config.toml`
//!
//! Project config takes precedence over global config, and command-line
//! flags take precedence over both.

use std::num::NonZeroU32;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::request::{Action, BuildType};
use crate::util::diagnostic::Diagnostic;

/// Environment variable that relocates the global slipway directory.
pub const SLIPWAY_HOME_ENV: &str = "SLIPWAY_HOME";

/// slipway configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    /// Build settings
    pub build: BuildConfig,

    /// Native toolchain settings
    pub toolchain: ToolchainConfig,

    /// External tool locations
    pub tools: ToolsConfig,
}

/// Build-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct BuildConfig {
    /// Default build type
    pub build_type: Option<BuildType>,

    /// Default action
    pub action: Option<Action>,

    /// Default number of parallel jobs
    pub jobs: Option<NonZeroU32>,

    /// CMake cache variable switched ON to compile tests (default `BUILD_TESTS`)
    pub tests_option: Option<String>,

    /// Extra arguments passed to the configure step
    pub cmake_args: Vec<String>,
}

/// Overrides for the host toolchain profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ToolchainConfig {
    /// Compiler probed before configuring (e.g. `cl`, `cc`)
    pub compiler: Option<String>,

    /// CMake generator (e.g. `Visual Studio 17 2022`)
    pub generator: Option<String>,

    /// Target architecture passed with `-A` (e.g. `x64`)
    pub architecture: Option<String>,

    /// Last component of the build directory
    pub platform_tag: Option<String>,

    /// Known installation roots, searched in order
    pub install_candidates: Option<Vec<PathBuf>>,

    /// Environment-setup helper, relative to an installation root
    pub env_script: Option<PathBuf>,
}

/// Locations of the external tools.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    /// CMake executable
    pub cmake: Option<PathBuf>,

    /// CTest executable
    pub ctest: Option<PathBuf>,
}

/// Arguments slipway always passes itself; setting them again is a mistake.
const RESERVED_CMAKE_ARGS: &[&str] = &["-G", "-A", "-DCMAKE_BUILD_TYPE"];

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        // Build settings
        if other.build.build_type.is_some() {
            self.build.build_type = other.build.build_type;
        }
        if other.build.action.is_some() {
            self.build.action = other.build.action;
        }
        if other.build.jobs.is_some() {
            self.build.jobs = other.build.jobs;
        }
        if other.build.tests_option.is_some() {
            self.build.tests_option = other.build.tests_option;
        }
        if !other.build.cmake_args.is_empty() {
            self.build.cmake_args = other.build.cmake_args;
        }

        // Toolchain settings
        let tc = other.toolchain;
        if tc.compiler.is_some() {
            self.toolchain.compiler = tc.compiler;
        }
        if tc.generator.is_some() {
            self.toolchain.generator = tc.generator;
        }
        if tc.architecture.is_some() {
            self.toolchain.architecture = tc.architecture;
        }
        if tc.platform_tag.is_some() {
            self.toolchain.platform_tag = tc.platform_tag;
        }
        if tc.install_candidates.is_some() {
            self.toolchain.install_candidates = tc.install_candidates;
        }
        if tc.env_script.is_some() {
            self.toolchain.env_script = tc.env_script;
        }

        // Tool settings
        if other.tools.cmake.is_some() {
            self.tools.cmake = other.tools.cmake;
        }
        if other.tools.ctest.is_some() {
            self.tools.ctest = other.tools.ctest;
        }
    }

    /// Check for settings that will not do what the user expects.
    pub fn lint(&self) -> Vec<Diagnostic> {
        let mut warnings = Vec::new();

        for arg in &self.build.cmake_args {
            if let Some(reserved) = RESERVED_CMAKE_ARGS.iter().find(|r| arg.starts_with(**r)) {
                warnings.push(
                    Diagnostic::warning(format!(
                        "`build.cmake-args` contains `{}`, which slipway already passes",
                        arg
                    ))
                    .with_context(format!("`{}` is derived from the toolchain and build type", reserved)),
                );
            }
        }

        if matches!(self.build.tests_option.as_deref(), Some(s) if s.trim().is_empty()) {
            warnings.push(Diagnostic::warning(
                "`build.tests-option` is empty; tests will not be enabled at configure time",
            ));
        }

        warnings
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (`.slipway/config.toml`)
/// 2. Global config (`~/.slipway/config.toml`)
/// 3. Defaults
///
/// Missing files are skipped; a file that exists but cannot be parsed is an
/// error.
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Result<Config> {
    let mut config = Config::default();

    if let Some(global_path) = global_path.filter(|p| p.exists()) {
        tracing::debug!("loading global config from {}", global_path.display());
        config.merge(Config::load(global_path)?);
    }

    if project_path.exists() {
        tracing::debug!("loading project config from {}", project_path.display());
        config.merge(Config::load(project_path)?);
    }

    Ok(config)
}

/// Get the global slipway directory (`$SLIPWAY_HOME` or `~/.slipway`).
pub fn global_config_dir() -> Option<PathBuf> {
    if let Some(home) = std::env::var_os(SLIPWAY_HOME_ENV).filter(|h| !h.is_empty()) {
        return Some(PathBuf::from(home));
    }
    directories::BaseDirs::new().map(|b| b.home_dir().join(".slipway"))
}

/// Get the global config path.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (`.slipway/config.toml`).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".slipway").join("config.toml")
}
