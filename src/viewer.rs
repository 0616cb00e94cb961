// src/viewer.rs

//! The viewer: owns the frame history and drives the input → update → render
//! loop against a `Driver`.
//!
//! A `Viewer` holds no platform resources of its own. `run` opens an X11
//! driver for the length of one session and releases it on every exit path;
//! `run_with` runs the same loop on a driver the caller owns.

use anyhow::{Context, Result};
use log::{error, info, trace};

use crate::backends::x11::XDriver;
use crate::backends::Driver;
use crate::clock::FrameClock;
use crate::config::ViewerConfig;
use crate::frame::{Frame, FrameError};
use crate::history::History;
use crate::input::{self, ViewerAction};
use crate::renderer::Renderer;

/// Lifecycle of a viewing session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerState {
    Running,
    /// The user quit. Terminal for the current session.
    Stopped,
}

/// Outcome of one loop iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerStatus {
    Running,
    Shutdown,
}

pub struct Viewer {
    config: ViewerConfig,
    history: History,
    renderer: Renderer,
    clock: FrameClock,
    state: ViewerState,
}

impl Viewer {
    pub fn new(config: ViewerConfig) -> Self {
        let history = History::new(config.keymap.fast_step);
        let renderer = Renderer::new(&config);
        let clock = FrameClock::new(&config.timing);
        Viewer {
            config,
            history,
            renderer,
            clock,
            state: ViewerState::Running,
        }
    }

    /// Records a frame. Malformed frames are rejected and not stored.
    pub fn append(&mut self, frame: Frame) -> Result<(), FrameError> {
        self.history.append(frame).map_err(|e| {
            error!("Viewer: rejected frame: {}", e);
            e
        })
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn state(&self) -> ViewerState {
        self.state
    }

    /// Opens a window, shows the recorded frames until the user quits, then
    /// releases every platform resource.
    pub fn run(&mut self) -> Result<()> {
        info!(
            "Viewer: starting session with {} frame(s).",
            self.history.len()
        );
        let mut driver = XDriver::new(&self.config).context("Failed to initialize X11 driver")?;
        self.run_and_release(&mut driver)
    }

    /// Runs the loop on `driver`, then cleans the driver up exactly once,
    /// whether the loop ended by quitting or with an error. A loop error takes
    /// precedence over a cleanup error.
    fn run_and_release(&mut self, driver: &mut dyn Driver) -> Result<()> {
        let result = self.run_with(driver);
        let cleanup = driver.cleanup().context("Failed to release driver");
        if let Err(e) = &cleanup {
            error!("Viewer: {:#}", e);
        }
        result.and(cleanup)
    }

    /// Runs the loop on a caller-owned driver until the user quits. The driver
    /// is not cleaned up.
    pub fn run_with(&mut self, driver: &mut dyn Driver) -> Result<()> {
        self.state = ViewerState::Running;
        self.clock.reset();
        driver.set_title(&self.config.window.title);
        loop {
            match self.process_event_cycle(driver) {
                Ok(ViewerStatus::Running) => {}
                Ok(ViewerStatus::Shutdown) => break,
                Err(e) => {
                    error!("Viewer: loop aborted: {:#}", e);
                    self.state = ViewerState::Stopped;
                    return Err(e);
                }
            }
        }
        info!("Viewer: session ended.");
        Ok(())
    }

    /// One iteration: handle pending input, wait for the tick, repaint.
    pub fn process_event_cycle(&mut self, driver: &mut dyn Driver) -> Result<ViewerStatus> {
        if self.state == ViewerState::Stopped {
            return Ok(ViewerStatus::Shutdown);
        }

        let events = driver
            .process_events()
            .context("Failed to read input events")?;
        for event in &events {
            match input::translate(event, &self.config.keymap) {
                Some(ViewerAction::Quit) => {
                    info!("Viewer: quit requested ({:?}).", event);
                    self.state = ViewerState::Stopped;
                    return Ok(ViewerStatus::Shutdown);
                }
                Some(ViewerAction::Navigate(nav)) => self.history.navigate(nav),
                None => {}
            }
        }

        let delta = self.clock.wait_for_tick();
        trace!("Viewer: update step, delta {:?}", delta);

        let commands = self.renderer.prepare(&self.history);
        driver
            .execute_render_commands(commands)
            .context("Failed to render frame")?;
        Ok(ViewerStatus::Running)
    }
}
