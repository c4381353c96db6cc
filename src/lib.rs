//! slipway - a configure/build/test driver for CMake projects
//!
//! This crate provides the library behind the `slipway` binary: the build
//! request model, toolchain detection, CMake command construction, and the
//! orchestration that runs the phases in order.

pub mod builder;
pub mod core;
pub mod ops;
pub mod toolchain;
pub mod util;

/// Test utilities and mocks for slipway unit tests.
///
/// Only compiled for tests. Provides a mock process executor and
/// CMake project fixtures.
#[cfg(test)]
pub mod test_support;

pub use core::{Action, BuildLayout, BuildRequest, BuildType, Phase};
pub use ops::{build, BuildOptions, BuildResult};
pub use toolchain::{ToolchainProfile, Tools};
pub use util::{BuildError, GlobalContext};
