//! **wsrunner** — per-workspace application launcher and window placer.
//!
//! For each configured virtual workspace, wsrunner switches to it,
//! launches the assigned applications, finds each application's window,
//! and moves/resizes it into a named screen-region layout.  The whole
//! run is a single sequential pass; the real work is done by two
//! external tools, `wmctrl` and `xdotool`.
//!
//! # Architecture
//!
//! The crate is organised around one core trait:
//!
//! * [`traits::WindowSystem`] — abstracts workspace switching, process
//!   spawning, window search, activation, and placement so the driver is
//!   not coupled to any concrete tooling and can be tested with a
//!   recording fake.
//!
//! The concrete backend lives in [`xtools`] (wmctrl/xdotool child
//! processes); [`runner`] holds the driver and [`config`] the two JSON
//! documents that describe a run.

pub mod config;
pub mod runner;
pub mod traits;
pub mod xtools;
