//! Core types: the build request and the directory layout it maps to.

pub mod layout;
pub mod request;

pub use layout::{find_project_root, BuildLayout};
pub use request::{Action, BuildRequest, BuildType, Phase, RequestOverrides};
