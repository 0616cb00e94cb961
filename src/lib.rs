// src/lib.rs

//! Interactive step-through viewer for recorded 2D character grids.
//!
//! A producer appends `Frame`s to a `Viewer` while it runs, then calls
//! `Viewer::run` to open a window and browse them with the keyboard:
//! Left/Right step (Shift for ten at a time), `a`/`l` jump to the first and
//! last frame, Escape or closing the window quits.

pub mod backends;
pub mod clock;
pub mod color;
pub mod config;
pub mod frame;
pub mod history;
pub mod input;
pub mod keys;
pub mod renderer;
pub mod viewer;

pub use config::ViewerConfig;
pub use frame::{Frame, FrameError};
pub use viewer::{Viewer, ViewerState, ViewerStatus};
