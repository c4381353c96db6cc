//! Toolchain detection functions.

use std::path::{Path, PathBuf};

use crate::util::errors::BuildError;
use crate::util::process::{Executor, OutputMode, ProcessBuilder};

use super::{ToolchainProfile, Tools};

/// Return the first installation root that exists on disk.
pub fn find_installation(candidates: &[PathBuf]) -> Option<&Path> {
    candidates
        .iter()
        .map(PathBuf::as_path)
        .find(|p| p.exists())
}

/// Verify that the profile's compiler can be started.
///
/// The compiler is run with no arguments and its output discarded; only a
/// failure to start it counts. When it cannot be started, the error carries
/// the environment-setup helper of the first known installation found.
pub fn check_compiler(
    profile: &ToolchainProfile,
    exec: &mut dyn Executor,
) -> Result<(), BuildError> {
    let probe = ProcessBuilder::new(&profile.compiler);

    match exec.execute(&probe, OutputMode::Null) {
        Ok(_) => {
            tracing::debug!("compiler `{}` is reachable", profile.compiler);
            Ok(())
        }
        Err(e) => {
            tracing::debug!("compiler probe for `{}` failed: {}", profile.compiler, e);

            let env_script = find_installation(&profile.install_candidates).and_then(|root| {
                tracing::debug!("found toolchain installation at {}", root.display());
                match profile.env_script {
                    Some(ref script) => Some(root.join(script)),
                    None => {
                        tracing::warn!(
                            "toolchain installed at {} but no env-script is configured",
                            root.display()
                        );
                        None
                    }
                }
            });

            Err(BuildError::CompilerNotFound {
                compiler: profile.compiler.clone(),
                env_script,
            })
        }
    }
}

/// A CMake that answered `--version`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CmakeInfo {
    pub path: PathBuf,
    pub version: Option<String>,
}

/// Locate CMake and check that it reports a version.
pub fn check_cmake(tools: &Tools, exec: &mut dyn Executor) -> Result<CmakeInfo, BuildError> {
    let missing = |reason: String| BuildError::ToolMissing {
        tool: "CMake".to_string(),
        reason,
    };

    let Some(path) = exec.locate(&tools.cmake) else {
        return Err(missing(format!(
            "`{}` is not an executable on PATH",
            tools.cmake.display()
        )));
    };

    let cmd = ProcessBuilder::new(&path).arg("--version");
    let output = exec
        .execute(&cmd, OutputMode::Capture)
        .map_err(|e| missing(format!("failed to run `{}`: {}", cmd.display_command(), e)))?;

    if !output.success() {
        let mut reason = match output.code {
            Some(code) => format!("`{}` exited with code {}", cmd.display_command(), code),
            None => format!("`{}` was terminated by a signal", cmd.display_command()),
        };
        let stderr = output.stderr.trim();
        if !stderr.is_empty() {
            reason.push_str(&format!(": {}", stderr));
        }
        return Err(missing(reason));
    }

    let version = parse_cmake_version(&output.stdout);
    tracing::debug!(
        "using cmake {} at {}",
        version.as_deref().unwrap_or("(unknown version)"),
        path.display()
    );

    Ok(CmakeInfo { path, version })
}

/// Extract `3.28.1` from `cmake version 3.28.1`.
fn parse_cmake_version(stdout: &str) -> Option<String> {
    stdout
        .lines()
        .next()?
        .trim()
        .strip_prefix("cmake version ")
        .map(|v| v.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{MockExecutor, MockProcessOutput};
    use tempfile::TempDir;

    fn profile_with(candidates: Vec<PathBuf>) -> ToolchainProfile {
        ToolchainProfile {
            install_candidates: candidates,
            env_script: Some(PathBuf::from("Common7/Tools/VsDevCmd.bat")),
            ..ToolchainProfile::msvc()
        }
    }

    #[test]
    fn test_reachable_compiler() {
        let mut exec = MockExecutor::new();
        // The probe's exit status does not matter.
        exec.expect("cl", MockProcessOutput::failure(2, "usage: cl [ option... ]"));

        assert!(check_compiler(&profile_with(vec![]), &mut exec).is_ok());
        assert_eq!(exec.commands(), vec!["cl"]);
    }

    #[test]
    fn test_missing_compiler_without_installation() {
        let tmp = TempDir::new().unwrap();
        let mut exec = MockExecutor::new();
        exec.missing("cl");

        let profile = profile_with(vec![tmp.path().join("absent")]);
        match check_compiler(&profile, &mut exec) {
            Err(BuildError::CompilerNotFound { env_script, .. }) => assert!(env_script.is_none()),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_missing_compiler_with_installation() {
        let tmp = TempDir::new().unwrap();
        let older = tmp.path().join("2019");
        let newer = tmp.path().join("2022");
        std::fs::create_dir_all(&older).unwrap();
        std::fs::create_dir_all(&newer).unwrap();

        let mut exec = MockExecutor::new();
        exec.missing("cl");

        let profile = profile_with(vec![tmp.path().join("absent"), newer.clone(), older]);
        match check_compiler(&profile, &mut exec) {
            Err(BuildError::CompilerNotFound { env_script, .. }) => {
                assert_eq!(env_script, Some(newer.join("Common7/Tools/VsDevCmd.bat")));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_installation_without_env_script() {
        let tmp = TempDir::new().unwrap();
        let mut exec = MockExecutor::new();
        exec.missing("cl");

        let profile = ToolchainProfile {
            env_script: None,
            ..profile_with(vec![tmp.path().to_path_buf()])
        };
        match check_compiler(&profile, &mut exec) {
            Err(BuildError::CompilerNotFound { env_script, .. }) => assert!(env_script.is_none()),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_check_cmake_version() {
        let mut exec = MockExecutor::new();
        exec.expect(
            "cmake --version",
            MockProcessOutput::success("cmake version 3.28.1\n\nCMake suite maintained by Kitware\n"),
        );

        let info = check_cmake(&Tools::default(), &mut exec).unwrap();
        assert_eq!(info.path, PathBuf::from("cmake"));
        assert_eq!(info.version.as_deref(), Some("3.28.1"));
    }

    #[test]
    fn test_check_cmake_not_on_path() {
        let mut exec = MockExecutor::new();
        exec.missing("cmake");

        let err = check_cmake(&Tools::default(), &mut exec).unwrap_err();
        assert_eq!(err.to_string(), "CMake not found");
        assert!(exec.calls().is_empty());
    }

    #[test]
    fn test_check_cmake_version_fails() {
        let mut exec = MockExecutor::new();
        exec.expect("cmake --version", MockProcessOutput::failure(1, "broken install"));

        match check_cmake(&Tools::default(), &mut exec) {
            Err(BuildError::ToolMissing { reason, .. }) => {
                assert!(reason.contains("exited with code 1"));
                assert!(reason.contains("broken install"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_parse_cmake_version() {
        assert_eq!(
            parse_cmake_version("cmake version 3.30.0-rc1\n"),
            Some("3.30.0-rc1".to_string())
        );
        assert_eq!(parse_cmake_version("something else"), None);
        assert_eq!(parse_cmake_version(""), None);
    }
}
