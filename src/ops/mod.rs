//! High-level operations.

pub mod slipway_build;

pub use slipway_build::{build, BuildOptions, BuildResult};
