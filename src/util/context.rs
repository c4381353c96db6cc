//! Global context for a slipway run.
//!
//! Provides centralized access to the working directory, config locations
//! and the project root.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use crate::core::layout::find_project_root;
use crate::util::config::{global_config_path, load_config, project_config_path, Config};

/// Directory above which project root discovery stops.
pub const CEILING_DIR_ENV: &str = "SLIPWAY_CEILING_DIR";

/// Global context containing paths and environment.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Current working directory
    cwd: PathBuf,

    /// Global config file (`~/.slipway/config.toml`), if a home is known
    global_config: Option<PathBuf>,

    /// Upper bound for project root discovery
    ceiling: Option<PathBuf>,
}

impl GlobalContext {
    /// Create a new GlobalContext for the current process.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;

        Ok(GlobalContext {
            cwd,
            global_config: global_config_path(),
            ceiling: std::env::var_os(CEILING_DIR_ENV)
                .filter(|dir| !dir.is_empty())
                .map(PathBuf::from),
        })
    }

    /// Create a GlobalContext with a specific working directory.
    pub fn with_cwd(cwd: PathBuf) -> Result<Self> {
        let mut ctx = Self::new()?;
        ctx.cwd = cwd;
        Ok(ctx)
    }

    /// Use a specific global config file instead of the default.
    pub fn with_global_config(mut self, path: Option<PathBuf>) -> Self {
        self.global_config = path;
        self
    }

    /// Stop project root discovery at `dir`.
    pub fn with_ceiling(mut self, dir: Option<PathBuf>) -> Self {
        self.ceiling = dir;
        self
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    pub fn global_config_path(&self) -> Option<&Path> {
        self.global_config.as_deref()
    }

    /// Resolve the project root.
    ///
    /// An explicit root is taken as given (relative to the working
    /// directory) and must be an existing directory; otherwise the nearest
    /// ancestor with a `CMakeLists.txt`.
    ///
    /// The root is never canonicalized, so on Windows it keeps its plain
    /// drive form rather than the verbatim `\\?\` prefix.
    pub fn project_root(&self, explicit: Option<&Path>) -> Result<PathBuf> {
        match explicit {
            Some(root) => {
                let root = self.cwd.join(root);
                if !root.is_dir() {
                    bail!("project root does not exist: {}", root.display());
                }
                Ok(root)
            }
            None => Ok(find_project_root(&self.cwd, self.ceiling.as_deref())?),
        }
    }

    /// Load merged global and project configuration.
    pub fn load_config(&self, project_root: &Path) -> Result<Config> {
        load_config(
            self.global_config_path(),
            &project_config_path(project_root),
        )
    }
}
