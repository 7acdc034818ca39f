//! [`WindowSystem`] implementation backed by the `wmctrl` and `xdotool`
//! command-line tools.
//!
//! Neither tool offers a socket or library API, so every operation is a
//! short-lived child process.  `wmctrl` handles workspace switching and
//! window geometry; `xdotool` handles window search and activation.

use crate::config::Layout;
use crate::traits::{WindowHandle, WindowSystem};
use std::process::{Command, Stdio};

/// The external executables a run cannot start without.
pub const REQUIRED_TOOLS: [&str; 2] = ["wmctrl", "xdotool"];

/// wmctrl/xdotool-backed windowing system.
///
/// No state is held; each method call spawns a short-lived child process.
pub struct XTools;

/// Errors from invoking the external window tools.
#[derive(Debug, thiserror::Error)]
#[error("window tool error: {0}")]
pub struct XToolsError(String);

impl Default for XTools {
    fn default() -> Self {
        Self
    }
}

impl XTools {
    /// Create a new handle.  Nothing is probed eagerly; call
    /// [`missing_dependency`] first to gate on tool availability.
    pub fn new() -> Self {
        Self
    }
}

//  Dependency probing

/// Check whether `tool` is present on the search path by invoking a
/// `which` lookup and inspecting its exit status.
pub fn tool_on_path(tool: &str) -> bool {
    Command::new("which")
        .arg(tool)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

/// Return the first of [`REQUIRED_TOOLS`] missing from the search path,
/// or `None` when all are available.
pub fn missing_dependency() -> Option<&'static str> {
    REQUIRED_TOOLS.iter().copied().find(|tool| !tool_on_path(tool))
}

//  Command helpers

/// Base name of a launch command: the first whitespace-separated token,
/// stripped of any directory path.  This is the window-name search key
/// (`"/usr/bin/foo --flag"` → `"foo"`).
pub fn base_command_name(command: &str) -> &str {
    let first = command.split_whitespace().next().unwrap_or("");
    first.rsplit('/').next().unwrap_or(first)
}

/// Encode a layout as a wmctrl `-e` geometry specification:
/// gravity, x, y, width, height, comma-separated, gravity fixed at 0.
fn geometry_spec(layout: &Layout) -> String {
    format!(
        "0,{},{},{},{}",
        layout.x, layout.y, layout.width, layout.height
    )
}

/// Run a tool to completion, discarding its output.  A spawn failure or
/// non-zero exit is an error.
fn run_tool(tool: &str, args: &[&str]) -> Result<(), XToolsError> {
    let status = Command::new(tool)
        .args(args)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map_err(|e| XToolsError(format!("failed to run {}: {}", tool, e)))?;
    if status.success() {
        Ok(())
    } else {
        Err(XToolsError(format!(
            "{} {} exited with {}",
            tool,
            args.join(" "),
            status
        )))
    }
}

//  WindowSystem implementation

impl WindowSystem for XTools {
    type Error = XToolsError;

    fn switch_workspace(&self, index: u32) -> Result<(), XToolsError> {
        run_tool("wmctrl", &["-s", &index.to_string()])
    }

    fn spawn_command(&self, command: &str) -> Result<(), XToolsError> {
        // Detached: the child is neither tracked nor waited upon.
        Command::new("sh")
            .arg("-c")
            .arg(command)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map(|_| ())
            .map_err(|e| XToolsError(format!("failed to launch {:?}: {}", command, e)))
    }

    fn search_windows(&self, name: &str) -> Result<Vec<WindowHandle>, XToolsError> {
        // xdotool exits non-zero when nothing matches; map that to an
        // empty result rather than an error so the runner can report
        // "no window" instead of "tool failed".
        let output = Command::new("xdotool")
            .args(["search", "--onlyvisible", "--name", name])
            .output()
            .map_err(|e| XToolsError(format!("failed to run xdotool: {}", e)))?;
        if !output.status.success() {
            return Ok(Vec::new());
        }
        let stdout = String::from_utf8(output.stdout)
            .map_err(|e| XToolsError(format!("xdotool output not utf-8: {}", e)))?;
        Ok(stdout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect())
    }

    fn activate_window(&self, window: &str) -> Result<(), XToolsError> {
        run_tool("xdotool", &["windowactivate", window])
    }

    fn place_window(&self, window: &str, layout: &Layout) -> Result<(), XToolsError> {
        run_tool("wmctrl", &["-i", "-r", window, "-e", &geometry_spec(layout)])
    }
}
