//! CMake command construction for the configure, build and test phases.

use std::num::NonZeroU32;
use std::path::{Path, PathBuf};

use crate::core::request::{BuildType, Phase};
use crate::toolchain::{ToolchainProfile, Tools};
use crate::util::process::ProcessBuilder;

/// Cache variable switched ON to compile a project's tests.
pub const DEFAULT_TESTS_OPTION: &str = "BUILD_TESTS";

/// Builds the command line for each phase of a CMake build.
#[derive(Debug, Clone)]
pub struct CMakeBuilder<'a> {
    profile: &'a ToolchainProfile,
    cmake: PathBuf,
    ctest: PathBuf,
    source_dir: PathBuf,
    build_dir: PathBuf,
    build_type: BuildType,
    jobs: NonZeroU32,
    tests_option: String,
    cmake_args: Vec<String>,
}

impl<'a> CMakeBuilder<'a> {
    /// Create a builder for `source_dir`, configured into `build_dir`.
    pub fn new(
        profile: &'a ToolchainProfile,
        tools: &Tools,
        source_dir: impl Into<PathBuf>,
        build_dir: impl Into<PathBuf>,
    ) -> Self {
        CMakeBuilder {
            profile,
            cmake: tools.cmake.clone(),
            ctest: tools.ctest.clone(),
            source_dir: source_dir.into(),
            build_dir: build_dir.into(),
            build_type: BuildType::default(),
            jobs: NonZeroU32::MIN,
            tests_option: DEFAULT_TESTS_OPTION.to_string(),
            cmake_args: Vec::new(),
        }
    }

    pub fn build_type(mut self, build_type: BuildType) -> Self {
        self.build_type = build_type;
        self
    }

    pub fn jobs(mut self, jobs: NonZeroU32) -> Self {
        self.jobs = jobs;
        self
    }

    /// Set the cache variable that enables tests.
    pub fn tests_option(mut self, option: impl Into<String>) -> Self {
        self.tests_option = option.into();
        self
    }

    /// Add extra configure arguments.
    pub fn args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.cmake_args.extend(args.into_iter().map(|s| s.into()));
        self
    }

    pub fn build_dir(&self) -> &Path {
        &self.build_dir
    }

    /// Command for one phase, run from the build directory.
    pub fn command(&self, phase: Phase) -> ProcessBuilder {
        match phase {
            Phase::Configure => self.configure_command(),
            Phase::Build => self.build_command(),
            Phase::Test => self.test_command(),
        }
    }

    /// `cmake -G <generator> [-A <arch>] -DCMAKE_BUILD_TYPE=<type> -D<tests>=ON [args] <source>`
    pub fn configure_command(&self) -> ProcessBuilder {
        let mut cmd = ProcessBuilder::new(&self.cmake)
            .arg("-G")
            .arg(&self.profile.generator);

        if let Some(ref arch) = self.profile.architecture {
            cmd = cmd.arg("-A").arg(arch);
        }

        cmd = cmd.arg(format!("-DCMAKE_BUILD_TYPE={}", self.build_type));

        if !self.tests_option.trim().is_empty() {
            cmd = cmd.arg(format!("-D{}=ON", self.tests_option.trim()));
        }

        cmd.args(&self.cmake_args)
            .arg(&self.source_dir)
            .cwd(&self.build_dir)
    }

    /// `cmake --build . --config <type> --parallel <jobs>`
    pub fn build_command(&self) -> ProcessBuilder {
        // --config matters for multi-config generators like Visual Studio
        ProcessBuilder::new(&self.cmake)
            .args(["--build", "."])
            .arg("--config")
            .arg(self.build_type.as_str())
            .arg("--parallel")
            .arg(self.jobs.to_string())
            .cwd(&self.build_dir)
    }

    /// `ctest -C <type> --output-on-failure`
    pub fn test_command(&self) -> ProcessBuilder {
        ProcessBuilder::new(&self.ctest)
            .arg("-C")
            .arg(self.build_type.as_str())
            .arg("--output-on-failure")
            .cwd(&self.build_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder(profile: &ToolchainProfile) -> CMakeBuilder<'_> {
        CMakeBuilder::new(profile, &Tools::default(), "/src/proj", "/src/proj/build/Release/tag")
            .build_type(BuildType::Release)
            .jobs(NonZeroU32::new(6).unwrap())
    }

    #[test]
    fn test_configure_command_msvc() {
        let profile = ToolchainProfile::msvc();
        let cmd = builder(&profile).configure_command();

        assert_eq!(
            cmd.get_args(),
            [
                "-G",
                "Visual Studio 17 2022",
                "-A",
                "x64",
                "-DCMAKE_BUILD_TYPE=Release",
                "-DBUILD_TESTS=ON",
                "/src/proj",
            ]
        );
        assert_eq!(cmd.get_program(), Path::new("cmake"));
        assert_eq!(cmd.get_cwd(), Some(Path::new("/src/proj/build/Release/tag")));
    }

    #[test]
    fn test_configure_command_without_architecture() {
        let profile = ToolchainProfile::unix();
        let cmd = builder(&profile)
            .tests_option("ENABLE_TESTS")
            .args(["-DWITH_ZLIB=ON"])
            .configure_command();

        assert_eq!(
            cmd.get_args(),
            [
                "-G",
                "Unix Makefiles",
                "-DCMAKE_BUILD_TYPE=Release",
                "-DENABLE_TESTS=ON",
                "-DWITH_ZLIB=ON",
                "/src/proj",
            ]
        );
    }

    #[test]
    fn test_empty_tests_option_is_skipped() {
        let profile = ToolchainProfile::unix();
        let cmd = builder(&profile).tests_option("").configure_command();
        assert!(!cmd
            .get_args()
            .iter()
            .any(|a| a.to_string_lossy().ends_with("=ON")));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_source_dir_reaches_cmake_unchanged() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let source = Path::new(OsStr::from_bytes(b"/tmp/proj\xff"));
        let profile = ToolchainProfile::unix();
        let cmd = CMakeBuilder::new(&profile, &Tools::default(), source, source.join("build"))
            .configure_command();

        assert_eq!(cmd.get_args().last().map(|a| a.as_os_str()), Some(source.as_os_str()));
        assert_eq!(cmd.get_cwd(), Some(source.join("build").as_path()));
    }

    #[test]
    fn test_build_and_test_commands() {
        let profile = ToolchainProfile::msvc();
        let b = builder(&profile);

        assert_eq!(
            b.build_command().display_command(),
            "cmake --build . --config Release --parallel 6"
        );
        assert_eq!(
            b.test_command().display_command(),
            "ctest -C Release --output-on-failure"
        );
        assert_eq!(b.command(Phase::Test), b.test_command());
    }
}
