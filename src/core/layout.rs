//! Project root discovery and build directory layout.

use std::path::{Path, PathBuf};

use crate::core::request::BuildType;
use crate::util::errors::BuildError;

/// File that marks a CMake project root.
pub const PROJECT_MARKER: &str = "CMakeLists.txt";

/// Name of the top-level build output directory.
pub const BUILD_DIR_NAME: &str = "build";

/// Paths derived for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildLayout {
    project_root: PathBuf,
    build_dir: PathBuf,
}

impl BuildLayout {
    /// Compute `<root>/build/<build type>/<platform tag>`.
    pub fn new(project_root: impl Into<PathBuf>, build_type: BuildType, platform_tag: &str) -> Self {
        let project_root = project_root.into();
        let build_dir = project_root
            .join(BUILD_DIR_NAME)
            .join(build_type.as_str())
            .join(platform_tag);

        BuildLayout {
            project_root,
            build_dir,
        }
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn build_dir(&self) -> &Path {
        &self.build_dir
    }
}

/// Find the project root by walking up from `start`.
///
/// The walk does not go above `ceiling` when one is given.
pub fn find_project_root(start: &Path, ceiling: Option<&Path>) -> Result<PathBuf, BuildError> {
    let mut current = Some(start);

    while let Some(dir) = current {
        if dir.join(PROJECT_MARKER).is_file() {
            return Ok(dir.to_path_buf());
        }
        if ceiling == Some(dir) {
            break;
        }
        current = dir.parent();
    }

    Err(BuildError::ProjectRootNotFound {
        start: start.to_path_buf(),
    })
}
