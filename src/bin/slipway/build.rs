//! The single slipway command: check, configure, build, test.

use std::time::Instant;

use anyhow::Result;
use serde_json::json;

use crate::cli::Cli;
use slipway::core::{BuildRequest, RequestOverrides};
use slipway::ops::{build, BuildOptions};
use slipway::util::process::SystemExecutor;
use slipway::util::shell::{Shell, Status};
use slipway::util::GlobalContext;

pub fn execute(args: Cli, shell: &Shell) -> Result<()> {
    let start = Instant::now();
    let ctx = GlobalContext::new()?;

    let project_root = ctx.project_root(args.project_root.as_deref())?;
    let config = ctx.load_config(&project_root)?;
    for warning in config.lint() {
        shell.diagnostic(&warning);
    }

    // CLI > project config > global config > defaults
    let request = BuildRequest::resolve(
        RequestOverrides {
            build_type: args.build_type,
            action: args.action,
            jobs: args.jobs,
            clean: args.clean,
        },
        &config,
    );
    tracing::debug!("resolved {:?} for {}", request, project_root.display());

    let opts = BuildOptions::new(request, project_root, &config);
    let result = build(&opts, &mut SystemExecutor, shell)?;

    shell.status(
        Status::Finished,
        format!(
            "`{}` for {} in {:.2}s",
            opts.request.action,
            opts.request.build_type,
            start.elapsed().as_secs_f64()
        ),
    );
    shell.print("=== Build completed ===");
    shell.print(format!("Build directory: {}", result.build_dir.display()));

    shell.json_event(&json!({
        "reason": "build-finished",
        "build_type": opts.request.build_type,
        "action": opts.request.action,
        "phases": result.phases,
        "build_dir": result.build_dir.display().to_string(),
        "cmake_version": result.cmake_version,
    }));

    Ok(())
}
