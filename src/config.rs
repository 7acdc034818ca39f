//! Configuration documents.
//!
//! Two JSON documents drive a run, both read once at startup:
//!
//! * the **layout document** maps layout names to screen rectangles,
//! * the **workspace document** maps workspace indices (written as string
//!   keys) to ordered lists of applications to launch there.
//!
//! # Example
//!
//! `layouts.json`:
//!
//! ```json
//! {
//!   "left-half":  { "x": 0,   "y": 0, "width": 960, "height": 1080 },
//!   "right-half": { "x": 960, "y": 0, "width": 960, "height": 1080 }
//! }
//! ```
//!
//! `workspaces.json`:
//!
//! ```json
//! {
//!   "1": [
//!     { "command": "xterm", "layout": "left-half" },
//!     { "command": "firefox", "layout": "right-half" }
//!   ],
//!   "2": [
//!     { "command": "thunderbird", "layout": "left-half" }
//!   ]
//! }
//! ```
//!
//! Workspaces are processed in **document order**, not numeric order of
//! their keys — the order the user wrote is the order the run follows.

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

/// A named screen rectangle: absolute position plus pixel dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Layout {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// Mapping from layout name to rectangle. Immutable after load.
pub type Layouts = HashMap<String, Layout>;

/// One application slot in a workspace: what to launch and where to put it.
///
/// `layout` references a key of the layout document; the reference is only
/// resolved at placement time, and a dangling one skips that placement
/// rather than failing the run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AppEntry {
    /// Shell-invocable command line.
    pub command: String,
    /// Name of the layout to place the window into.
    pub layout: String,
}

/// One workspace assignment: the parsed index and its application list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    /// Workspace index as passed to the window manager.
    pub index: u32,
    /// Applications to launch on this workspace, in list order.
    pub apps: Vec<AppEntry>,
}

/// All workspace assignments, in document order.
///
/// Stored as a sequence rather than a map: JSON object keys like `"10"`
/// and `"2"` must be processed in the order they appear in the document,
/// and a map type would silently re-sort them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Workspaces(pub Vec<Workspace>);

impl Workspaces {
    /// Iterate assignments in document order.
    pub fn iter(&self) -> impl Iterator<Item = &Workspace> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de> Deserialize<'de> for Workspaces {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Visitor;
        struct V;
        impl<'de> Visitor<'de> for V {
            type Value = Workspaces;
            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "object mapping workspace indices to application lists")
            }
            fn visit_map<A>(self, mut map: A) -> Result<Workspaces, A::Error>
            where
                A: serde::de::MapAccess<'de>,
            {
                // MapAccess yields entries in document order; collecting
                // into a Vec is what preserves it.
                let mut workspaces = Vec::new();
                while let Some((key, apps)) = map.next_entry::<String, Vec<AppEntry>>()? {
                    let index: u32 = key.trim().parse().map_err(|_| {
                        DeError::custom(format!(
                            "workspace key must be a non-negative integer, got {:?}",
                            key
                        ))
                    })?;
                    workspaces.push(Workspace { index, apps });
                }
                Ok(Workspaces(workspaces))
            }
        }
        deserializer.deserialize_map(V)
    }
}

/// The fully loaded configuration a run operates on.
///
/// Both mappings are read once and never mutated; the runner borrows them
/// for the duration of the run.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    pub layouts: Layouts,
    pub workspaces: Workspaces,
}

impl RunnerConfig {
    /// Load both documents. Any missing file or malformed content is an
    /// error — there is no partial-config recovery.
    pub fn load(layouts_path: &Path, workspaces_path: &Path) -> Result<Self, ConfigError> {
        Ok(Self {
            layouts: load_json(layouts_path)?,
            workspaces: load_json(workspaces_path)?,
        })
    }
}

/// Read and parse one JSON document at `path`.
fn load_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, ConfigError> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| ConfigError(format!("failed to read {}: {}", path.display(), e)))?;
    serde_json::from_str(&contents)
        .map_err(|e| ConfigError(format!("failed to parse {}: {}", path.display(), e)))
}

/// Error from loading or parsing a configuration document.
#[derive(Debug, thiserror::Error)]
#[error("config error: {0}")]
pub struct ConfigError(String);
