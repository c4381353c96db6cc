//! Native toolchain profiles and detection.
//!
//! A [`ToolchainProfile`] describes the environment CMake is asked to
//! target: which compiler must be reachable, which generator and
//! architecture to configure with, and where a known installation of the
//! toolchain might live when the compiler is not on PATH.

mod detect;

pub use detect::{check_cmake, check_compiler, find_installation, CmakeInfo};

use std::path::PathBuf;

use crate::util::config::{ToolchainConfig, ToolsConfig};

/// Visual Studio installation roots, newest and most featured first.
pub const MSVC_INSTALL_CANDIDATES: &[&str] = &[
    r"C:\Program Files\Microsoft Visual Studio\2022\Community",
    r"C:\Program Files\Microsoft Visual Studio\2022\Professional",
    r"C:\Program Files\Microsoft Visual Studio\2022\Enterprise",
    r"C:\Program Files\Microsoft Visual Studio\2019\Community",
];

/// Developer environment script, relative to a Visual Studio root.
pub const MSVC_ENV_SCRIPT: &str = r"Common7\Tools\VsDevCmd.bat";

/// Native environment targeted by the configure step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolchainProfile {
    /// Compiler probed for reachability
    pub compiler: String,
    /// CMake generator (`-G`)
    pub generator: String,
    /// Target architecture (`-A`), for generators that take one
    pub architecture: Option<String>,
    /// Last component of the build directory
    pub platform_tag: String,
    /// Known installation roots, searched in order
    pub install_candidates: Vec<PathBuf>,
    /// Environment-setup helper, relative to an installation root
    pub env_script: Option<PathBuf>,
}

impl ToolchainProfile {
    /// MSVC with the Visual Studio 2022 generator, 64-bit.
    pub fn msvc() -> Self {
        ToolchainProfile {
            compiler: "cl".to_string(),
            generator: "Visual Studio 17 2022".to_string(),
            architecture: Some("x64".to_string()),
            platform_tag: "build-windows-cl".to_string(),
            install_candidates: MSVC_INSTALL_CANDIDATES.iter().map(PathBuf::from).collect(),
            env_script: Some(PathBuf::from(MSVC_ENV_SCRIPT)),
        }
    }

    /// The system `cc` with Makefiles.
    pub fn unix() -> Self {
        ToolchainProfile {
            compiler: "cc".to_string(),
            generator: "Unix Makefiles".to_string(),
            architecture: None,
            platform_tag: format!("build-{}-cc", std::env::consts::OS),
            install_candidates: Vec::new(),
            env_script: None,
        }
    }

    /// Default profile for the host platform.
    pub fn host() -> Self {
        if cfg!(windows) {
            ToolchainProfile::msvc()
        } else {
            ToolchainProfile::unix()
        }
    }

    /// Apply config overrides on top of this profile.
    pub fn with_config(mut self, config: &ToolchainConfig) -> Self {
        if let Some(ref compiler) = config.compiler {
            self.compiler = compiler.clone();
        }
        if let Some(ref generator) = config.generator {
            self.generator = generator.clone();
        }
        if let Some(ref arch) = config.architecture {
            // An empty architecture drops `-A`, e.g. for Ninja on Windows.
            self.architecture = Some(arch.clone()).filter(|a| !a.is_empty());
        }
        if let Some(ref tag) = config.platform_tag {
            self.platform_tag = tag.clone();
        }
        if let Some(ref candidates) = config.install_candidates {
            self.install_candidates = candidates.clone();
        }
        if let Some(ref script) = config.env_script {
            self.env_script = Some(script.clone());
        }
        self
    }
}

/// External programs that drive the build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tools {
    /// Configuration tool and build driver
    pub cmake: PathBuf,
    /// Test runner
    pub ctest: PathBuf,
}

impl Default for Tools {
    fn default() -> Self {
        Tools {
            cmake: PathBuf::from("cmake"),
            ctest: PathBuf::from("ctest"),
        }
    }
}

impl Tools {
    pub fn from_config(config: &ToolsConfig) -> Self {
        let defaults = Tools::default();
        Tools {
            cmake: config.cmake.clone().unwrap_or(defaults.cmake),
            ctest: config.ctest.clone().unwrap_or(defaults.ctest),
        }
    }
}
