//! The capability trait that decouples the runner from any concrete
//! windowing backend.
//!
//! The production backend ([`XTools`](crate::xtools::XTools)) shells out
//! to `wmctrl` and `xdotool`; tests substitute a recording fake.  The
//! [`WorkspaceRunner`](crate::runner::WorkspaceRunner) only depends on
//! this abstraction.

use crate::config::Layout;

/// Opaque identifier for a live on-screen window, assigned by the
/// windowing system.  Valid only for the lifetime of that window; never
/// persisted.
pub type WindowHandle = String;

/// Abstraction over the windowing system operations a run needs.
///
/// Every method returns a `Result` even where a backend cannot reliably
/// detect failure — the runner treats each failure as recoverable for the
/// application at hand, logs it, and continues the run.
pub trait WindowSystem {
    /// The error type produced by this backend.
    type Error: std::error::Error + Send + 'static;

    /// Switch the desktop to the workspace with the given index.
    fn switch_workspace(&self, index: u32) -> Result<(), Self::Error>;

    /// Start `command` through the shell as a detached background
    /// process.
    ///
    /// The spawned process is not tracked or waited upon; success means
    /// the process was started, not that it will create a window.
    fn spawn_command(&self, command: &str) -> Result<(), Self::Error>;

    /// Return the handles of all currently **visible** windows whose name
    /// matches `name`, in the backend's listing order.
    ///
    /// An empty vector is a valid result (no matching window yet).
    fn search_windows(&self, name: &str) -> Result<Vec<WindowHandle>, Self::Error>;

    /// Bring the given window to focus.
    fn activate_window(&self, window: &str) -> Result<(), Self::Error>;

    /// Move and resize the given window to the layout's rectangle.
    fn place_window(&self, window: &str, layout: &Layout) -> Result<(), Self::Error>;
}
