//! Command construction for the external build tools.

pub mod cmake;

pub use cmake::CMakeBuilder;
