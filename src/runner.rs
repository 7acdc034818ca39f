//! The driver that ties the loaded configuration and the windowing
//! backend together.
//!
//! [`WorkspaceRunner`] walks the workspace assignments in document order
//! and, for each configured application, performs the
//! launch → wait → locate → place sequence against the [`WindowSystem`]
//! trait.  Everything is strictly sequential; the only suspension point
//! is the post-launch wait.

use crate::config::{AppEntry, RunnerConfig, Workspace};
use crate::traits::{WindowHandle, WindowSystem};
use crate::xtools::base_command_name;
use log::{info, warn};
use std::time::Duration;

/// Default pause after launching an application, giving it time to map
/// its window before the search.
pub const DEFAULT_LAUNCH_WAIT: Duration = Duration::from_millis(1000);

/// Strategy for picking the presumed newly created window out of a
/// search result.
pub type WindowSelector = fn(&[WindowHandle]) -> Option<&WindowHandle>;

/// Default selector: the last handle in listing order.
///
/// This assumes the windowing system lists windows in creation order,
/// so the last entry is the most recently created.  xdotool behaves this
/// way in practice, but no windowing system guarantees it; swap the
/// selector if yours does not.
pub fn select_last(handles: &[WindowHandle]) -> Option<&WindowHandle> {
    handles.last()
}

/// Orchestrates workspace switching, application launches, and window
/// placement.
///
/// The runner is generic over any [`WindowSystem`] implementation, making
/// it independent of wmctrl/xdotool and testable without a display.
///
/// Per-application failures (window not found, unknown layout, a tool
/// call failing) are logged and skipped; a run always visits every
/// configured workspace and application.
///
/// # Typical usage
///
/// ```ignore
/// let config = RunnerConfig::load(layouts_path, workspaces_path)?;
/// let runner = WorkspaceRunner::new(XTools::new(), config);
/// runner.run();
/// ```
pub struct WorkspaceRunner<W: WindowSystem> {
    ws: W,
    config: RunnerConfig,
    launch_wait: Duration,
    selector: WindowSelector,
}

impl<W: WindowSystem> WorkspaceRunner<W> {
    /// Create a new runner with the default launch wait
    /// ([`DEFAULT_LAUNCH_WAIT`]) and the default window selector
    /// ([`select_last`]).
    pub fn new(ws: W, config: RunnerConfig) -> Self {
        Self {
            ws,
            config,
            launch_wait: DEFAULT_LAUNCH_WAIT,
            selector: select_last,
        }
    }

    /// Set how long to pause between launching an application and
    /// searching for its window.  The wait is a best-effort heuristic,
    /// not a guarantee; slow-starting applications may need more.
    pub fn set_launch_wait(&mut self, wait: Duration) {
        self.launch_wait = wait;
    }

    /// Replace the window-selection strategy.
    pub fn set_window_selector(&mut self, selector: WindowSelector) {
        self.selector = selector;
    }

    /// Process every configured workspace, in document order.
    ///
    /// Never fails: all errors past this point are local to one
    /// application and reported via the log.
    pub fn run(&self) {
        for workspace in self.config.workspaces.iter() {
            self.process_workspace(workspace);
        }
        info!(
            "run complete: {} workspace(s) processed",
            self.config.workspaces.len()
        );
    }

    /// Switch to `workspace` and process its application list in order.
    fn process_workspace(&self, workspace: &Workspace) {
        info!("workspace {}", workspace.index);
        if let Err(e) = self.ws.switch_workspace(workspace.index) {
            warn!("workspace switch to {} failed: {}", workspace.index, e);
        }
        for app in &workspace.apps {
            self.process_application(app);
        }
    }

    /// Launch one application and place its window.  Each step that
    /// fails is reported and ends processing of this application only.
    fn process_application(&self, app: &AppEntry) {
        info!("launching {:?}", app.command);
        if let Err(e) = self.ws.spawn_command(&app.command) {
            warn!("failed to launch {:?}: {}", app.command, e);
            return;
        }

        // Give the application time to create its window.
        std::thread::sleep(self.launch_wait);

        let Some(window) = self.locate_window(&app.command) else {
            return;
        };
        self.place_window(&window, &app.layout);
    }

    /// Find the window belonging to the application just launched, by
    /// searching visible windows for the command's base name and
    /// applying the selection strategy.
    fn locate_window(&self, command: &str) -> Option<WindowHandle> {
        let name = base_command_name(command);
        let handles = match self.ws.search_windows(name) {
            Ok(handles) => handles,
            Err(e) => {
                warn!("window search for {:?} failed: {}", command, e);
                return None;
            }
        };
        match (self.selector)(&handles) {
            Some(handle) => Some(handle.clone()),
            None => {
                warn!("unable to find a window for the application: {}", command);
                None
            }
        }
    }

    /// Activate `window` and move/resize it to the named layout.
    fn place_window(&self, window: &str, layout_name: &str) {
        if let Err(e) = self.ws.activate_window(window) {
            warn!("failed to activate window {}: {}", window, e);
        }

        let Some(layout) = self.config.layouts.get(layout_name) else {
            warn!("layout {:?} not found", layout_name);
            return;
        };

        match self.ws.place_window(window, layout) {
            Ok(()) => info!(
                "moved and resized window {} to layout {:?}",
                window, layout_name
            ),
            Err(e) => warn!("failed to place window {}: {}", window, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppEntry, Layout, Layouts, Workspace, Workspaces};
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// Everything the runner can ask a backend to do, recorded in call
    /// order.
    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Switch(u32),
        Spawn(String),
        Search(String),
        Activate(String),
        Place(String, Layout),
    }

    /// A test double that records every call and serves canned search
    /// results.
    #[derive(Debug, Default)]
    struct FakeBackend {
        calls: RefCell<Vec<Call>>,
        search_results: Vec<String>,
        fail_search: bool,
        fail_spawn: bool,
        fail_switch: bool,
    }

    #[derive(Debug, thiserror::Error)]
    #[error("fake backend error")]
    struct FakeError;

    impl WindowSystem for FakeBackend {
        type Error = FakeError;

        fn switch_workspace(&self, index: u32) -> Result<(), FakeError> {
            if self.fail_switch {
                return Err(FakeError);
            }
            self.calls.borrow_mut().push(Call::Switch(index));
            Ok(())
        }

        fn spawn_command(&self, command: &str) -> Result<(), FakeError> {
            if self.fail_spawn {
                return Err(FakeError);
            }
            self.calls.borrow_mut().push(Call::Spawn(command.into()));
            Ok(())
        }

        fn search_windows(&self, name: &str) -> Result<Vec<WindowHandle>, FakeError> {
            if self.fail_search {
                return Err(FakeError);
            }
            self.calls.borrow_mut().push(Call::Search(name.into()));
            Ok(self.search_results.clone())
        }

        fn activate_window(&self, window: &str) -> Result<(), FakeError> {
            self.calls.borrow_mut().push(Call::Activate(window.into()));
            Ok(())
        }

        fn place_window(&self, window: &str, layout: &Layout) -> Result<(), FakeError> {
            self.calls
                .borrow_mut()
                .push(Call::Place(window.into(), *layout));
            Ok(())
        }
    }

    fn left_half() -> Layout {
        Layout {
            x: 0,
            y: 0,
            width: 960,
            height: 1080,
        }
    }

    fn config_with(layouts: Layouts, workspaces: Vec<Workspace>) -> RunnerConfig {
        RunnerConfig {
            layouts,
            workspaces: Workspaces(workspaces),
        }
    }

    fn single_app_config(layout_name: &str) -> RunnerConfig {
        let mut layouts = HashMap::new();
        layouts.insert("left-half".to_string(), left_half());
        config_with(
            layouts,
            vec![Workspace {
                index: 1,
                apps: vec![AppEntry {
                    command: "xterm".into(),
                    layout: layout_name.into(),
                }],
            }],
        )
    }

    fn make_runner(backend: FakeBackend, config: RunnerConfig) -> WorkspaceRunner<FakeBackend> {
        let mut runner = WorkspaceRunner::new(backend, config);
        runner.set_launch_wait(Duration::ZERO);
        runner
    }

    #[test]
    fn successful_run_issues_full_sequence() {
        let backend = FakeBackend {
            search_results: vec!["0xa0".into()],
            ..Default::default()
        };
        let runner = make_runner(backend, single_app_config("left-half"));
        runner.run();

        let calls = runner.ws.calls.borrow();
        assert_eq!(
            *calls,
            vec![
                Call::Switch(1),
                Call::Spawn("xterm".into()),
                Call::Search("xterm".into()),
                Call::Activate("0xa0".into()),
                Call::Place("0xa0".into(), left_half()),
            ]
        );
    }

    #[test]
    fn placement_is_one_activate_then_one_place() {
        let backend = FakeBackend {
            search_results: vec!["0xa0".into()],
            ..Default::default()
        };
        let runner = make_runner(backend, single_app_config("left-half"));
        runner.run();

        let calls = runner.ws.calls.borrow();
        let activates = calls
            .iter()
            .filter(|c| matches!(c, Call::Activate(_)))
            .count();
        let places: Vec<_> = calls
            .iter()
            .filter_map(|c| match c {
                Call::Place(w, l) => Some((w.clone(), *l)),
                _ => None,
            })
            .collect();
        assert_eq!(activates, 1);
        assert_eq!(places, vec![("0xa0".to_string(), left_half())]);
        // Activate strictly precedes the move/resize.
        let activate_pos = calls
            .iter()
            .position(|c| matches!(c, Call::Activate(_)))
            .unwrap();
        let place_pos = calls
            .iter()
            .position(|c| matches!(c, Call::Place(..)))
            .unwrap();
        assert!(activate_pos < place_pos);
    }

    #[test]
    fn unknown_layout_skips_move_resize() {
        let backend = FakeBackend {
            search_results: vec!["0xa0".into()],
            ..Default::default()
        };
        let runner = make_runner(backend, single_app_config("no-such-layout"));
        runner.run();

        let calls = runner.ws.calls.borrow();
        assert!(calls.iter().any(|c| matches!(c, Call::Activate(_))));
        assert!(!calls.iter().any(|c| matches!(c, Call::Place(..))));
    }

    #[test]
    fn empty_workspace_only_switches() {
        let backend = FakeBackend::default();
        let config = config_with(
            HashMap::new(),
            vec![Workspace {
                index: 4,
                apps: Vec::new(),
            }],
        );
        let runner = make_runner(backend, config);
        runner.run();

        assert_eq!(*runner.ws.calls.borrow(), vec![Call::Switch(4)]);
    }

    #[test]
    fn workspaces_processed_in_document_order() {
        let backend = FakeBackend::default();
        let config = config_with(
            HashMap::new(),
            vec![
                Workspace {
                    index: 10,
                    apps: Vec::new(),
                },
                Workspace {
                    index: 2,
                    apps: Vec::new(),
                },
            ],
        );
        let runner = make_runner(backend, config);
        runner.run();

        assert_eq!(
            *runner.ws.calls.borrow(),
            vec![Call::Switch(10), Call::Switch(2)]
        );
    }

    #[test]
    fn search_uses_base_command_name() {
        let backend = FakeBackend {
            search_results: vec!["0xa0".into()],
            ..Default::default()
        };
        let mut layouts = HashMap::new();
        layouts.insert("left-half".to_string(), left_half());
        let config = config_with(
            layouts,
            vec![Workspace {
                index: 1,
                apps: vec![AppEntry {
                    command: "/usr/bin/foo --flag".into(),
                    layout: "left-half".into(),
                }],
            }],
        );
        let runner = make_runner(backend, config);
        runner.run();

        let calls = runner.ws.calls.borrow();
        assert!(calls.contains(&Call::Search("foo".into())));
    }

    #[test]
    fn locator_selects_last_of_multiple_matches() {
        let backend = FakeBackend {
            search_results: vec!["100".into(), "101".into(), "102".into()],
            ..Default::default()
        };
        let runner = make_runner(backend, single_app_config("left-half"));
        runner.run();

        let calls = runner.ws.calls.borrow();
        assert!(calls.contains(&Call::Activate("102".into())));
        assert!(calls.contains(&Call::Place("102".into(), left_half())));
    }

    #[test]
    fn window_selector_is_replaceable() {
        let backend = FakeBackend {
            search_results: vec!["100".into(), "101".into(), "102".into()],
            ..Default::default()
        };
        let mut runner = make_runner(backend, single_app_config("left-half"));
        runner.set_window_selector(|handles| handles.first());
        runner.run();

        let calls = runner.ws.calls.borrow();
        assert!(calls.contains(&Call::Activate("100".into())));
    }

    #[test]
    fn no_match_skips_placement_and_continues() {
        let backend = FakeBackend::default(); // empty search results
        let config = config_with(
            HashMap::new(),
            vec![
                Workspace {
                    index: 1,
                    apps: vec![AppEntry {
                        command: "ghost".into(),
                        layout: "l".into(),
                    }],
                },
                Workspace {
                    index: 2,
                    apps: Vec::new(),
                },
            ],
        );
        let runner = make_runner(backend, config);
        runner.run();

        let calls = runner.ws.calls.borrow();
        assert!(!calls.iter().any(|c| matches!(c, Call::Activate(_))));
        assert!(!calls.iter().any(|c| matches!(c, Call::Place(..))));
        // The second workspace is still processed.
        assert!(calls.contains(&Call::Switch(2)));
    }

    #[test]
    fn search_failure_skips_placement_and_continues() {
        let backend = FakeBackend {
            fail_search: true,
            ..Default::default()
        };
        let runner = make_runner(backend, single_app_config("left-half"));
        runner.run();

        let calls = runner.ws.calls.borrow();
        assert!(calls.contains(&Call::Switch(1)));
        assert!(calls.contains(&Call::Spawn("xterm".into())));
        assert!(!calls.iter().any(|c| matches!(c, Call::Activate(_))));
    }

    #[test]
    fn spawn_failure_skips_the_application() {
        let backend = FakeBackend {
            fail_spawn: true,
            search_results: vec!["0xa0".into()],
            ..Default::default()
        };
        let runner = make_runner(backend, single_app_config("left-half"));
        runner.run();

        let calls = runner.ws.calls.borrow();
        assert_eq!(*calls, vec![Call::Switch(1)]);
    }

    #[test]
    fn switch_failure_does_not_abort_the_run() {
        let backend = FakeBackend {
            fail_switch: true,
            search_results: vec!["0xa0".into()],
            ..Default::default()
        };
        let runner = make_runner(backend, single_app_config("left-half"));
        runner.run();

        // Applications are still launched and placed.
        let calls = runner.ws.calls.borrow();
        assert!(calls.contains(&Call::Spawn("xterm".into())));
        assert!(calls.contains(&Call::Place("0xa0".into(), left_half())));
    }
}
