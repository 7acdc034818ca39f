//! Entry point for the **wsrunner** binary.
//!
//! Loads the two configuration documents, verifies the external tools
//! are installed, and hands off to the
//! [`WorkspaceRunner`](wsrunner::runner::WorkspaceRunner).  Startup
//! problems (bad config, missing tools) abort with exit status 1 before
//! any workspace is touched; per-application problems during the run are
//! logged and skipped, and the process still exits 0.

use log::error;
use std::path::PathBuf;
use std::time::Duration;
use wsrunner::config::RunnerConfig;
use wsrunner::runner::WorkspaceRunner;
use wsrunner::xtools::{self, XTools};

/// Command-line options, all optional.
struct Options {
    layouts: PathBuf,
    workspaces: PathBuf,
    launch_wait: Option<Duration>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            layouts: PathBuf::from("layouts.json"),
            workspaces: PathBuf::from("workspaces.json"),
            launch_wait: None,
        }
    }
}

fn usage() -> ! {
    eprintln!(
        "usage: wsrunner [--layouts <path>] [--workspaces <path>] [--wait-ms <milliseconds>]"
    );
    std::process::exit(1);
}

/// Parse the argument list by hand; the surface is three flags.
fn parse_args() -> Options {
    let mut options = Options::default();
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--layouts" => match args.next() {
                Some(path) => options.layouts = PathBuf::from(path),
                None => usage(),
            },
            "--workspaces" => match args.next() {
                Some(path) => options.workspaces = PathBuf::from(path),
                None => usage(),
            },
            "--wait-ms" => match args.next().and_then(|ms| ms.parse::<u64>().ok()) {
                Some(ms) => options.launch_wait = Some(Duration::from_millis(ms)),
                None => usage(),
            },
            _ => usage(),
        }
    }
    options
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let options = parse_args();

    let config = match RunnerConfig::load(&options.layouts, &options.workspaces) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    if let Some(tool) = xtools::missing_dependency() {
        error!("please install '{}' before running wsrunner", tool);
        std::process::exit(1);
    }

    let mut runner = WorkspaceRunner::new(XTools::new(), config);
    if let Some(wait) = options.launch_wait {
        runner.set_launch_wait(wait);
    }
    runner.run();
}
