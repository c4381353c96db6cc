//! CLI definitions using clap.

use std::num::NonZeroU32;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use slipway::core::{Action, BuildType};
use slipway::util::shell::ColorChoice;

/// slipway - configure, build and test a CMake project
#[derive(Parser, Debug)]
#[command(name = "slipway")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Build configuration [default: Debug]
    #[arg(short = 't', long, value_enum, value_name = "TYPE")]
    pub build_type: Option<BuildType>,

    /// Phases to run [default: configure_and_build]
    #[arg(short, long, value_enum)]
    pub action: Option<Action>,

    /// Number of parallel build jobs [default: 10]
    #[arg(short, long, value_name = "N")]
    pub jobs: Option<NonZeroU32>,

    /// Delete the build directory before configuring
    #[arg(long)]
    pub clean: bool,

    /// Project root (defaults to the nearest directory with a CMakeLists.txt)
    #[arg(long, env = "SLIPWAY_PROJECT_ROOT", value_name = "PATH")]
    pub project_root: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Coloring of status output
    #[arg(long, value_enum, value_name = "WHEN", default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Output format for messages
    #[arg(long, value_enum, value_name = "FMT", default_value_t = MessageFormat::Human)]
    pub message_format: MessageFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MessageFormat {
    Human,
    Json,
}
