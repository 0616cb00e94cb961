// src/backends/x11/mod.rs

//! X11 backend driver for the viewer.
//!
//! `XDriver` ties together the submodules that each own one aspect of X11:
//! - `connection`: the display connection and default screen resources.
//! - `window`: the fixed-size top-level window and its WM protocols.
//! - `graphics`: Xft font, colour cache and the double buffer.
//! - `event`: translation of X events into `BackendEvent`s.

use crate::backends::{BackendEvent, Driver, RenderCommand};
use crate::config::ViewerConfig;
use anyhow::{Context, Result};
use log::{debug, error, info};

pub mod connection;
pub mod event;
pub mod graphics;
pub mod window;

use connection::Connection;
use graphics::Graphics;
use window::Window;

/// Implements `Driver` on top of Xlib and Xft.
pub struct XDriver {
    connection: Connection,
    window: Window,
    graphics: Graphics,
}

impl XDriver {
    /// Opens the display, loads the font, creates and maps the window.
    ///
    /// Any failure is logged and returned; whatever was created up to that
    /// point is released before returning.
    pub fn new(config: &ViewerConfig) -> Result<Self> {
        info!("XDriver::new() - initializing X11 driver components.");
        // A zero-sized window or pixmap is a fatal protocol error under
        // Xlib's default handler, so check before touching the server.
        config
            .validate()
            .context("Refusing to open X11 window with invalid configuration")?;

        let connection = Connection::new().map_err(|e| {
            error!("Failed to establish X11 connection: {:#}", e);
            e
        })?;

        // Font and background colour come first: the font is the likeliest
        // failure and the window needs the background pixel.
        let pre_graphics =
            Graphics::load_font_and_colors(&connection, &config.font, config.colors.background)
                .map_err(|e| {
                    error!("Failed to load font and colours: {:#}", e);
                    e
                })?;

        let mut window = Window::new(
            &connection,
            config.window.width_px,
            config.window.height_px,
            pre_graphics.background_pixel,
        )
        .map_err(|e| {
            error!("Failed to create X11 window: {:#}", e);
            e
        })?;

        let graphics = match Graphics::new(&connection, &window, pre_graphics) {
            Ok(graphics) => graphics,
            Err(e) => {
                error!("Failed to set up back buffer: {:#}", e);
                window.cleanup(&connection);
                return Err(e);
            }
        };

        if let Err(e) = window.setup_protocols_and_hints(&connection, &config.window.title) {
            error!("Failed to set up window protocols and hints: {:#}", e);
            drop(graphics);
            window.cleanup(&connection);
            return Err(e);
        }
        window.map_and_flush(&connection);
        info!("X11 driver ready (window ID {}).", window.id());

        Ok(XDriver {
            connection,
            window,
            graphics,
        })
    }
}

impl Driver for XDriver {
    fn process_events(&mut self) -> Result<Vec<BackendEvent>> {
        let events = event::process_pending_events(&self.connection, &self.window)
            .context("Failed to process X11 events")?;
        if !events.is_empty() {
            debug!("XDriver processed {} backend events.", events.len());
        }
        Ok(events)
    }

    fn execute_render_commands(&mut self, commands: Vec<RenderCommand>) -> Result<()> {
        for command in commands {
            match command {
                RenderCommand::ClearAll { bg } => {
                    self.graphics.clear_all(&self.connection, bg)?;
                }
                RenderCommand::FillRect {
                    x,
                    y,
                    width,
                    height,
                    color,
                } => {
                    self.graphics
                        .fill_rect(&self.connection, x, y, width, height, color)?;
                }
                RenderCommand::DrawText { x, y, text, color } => {
                    self.graphics
                        .draw_text(&self.connection, x, y, &text, color)?;
                }
                RenderCommand::PresentFrame => {
                    self.present()?;
                }
            }
        }
        Ok(())
    }

    fn present(&mut self) -> Result<()> {
        self.graphics.present(&self.connection, &self.window)
    }

    fn set_title(&mut self, title: &str) {
        if let Err(e) = self.window.set_title(&self.connection, title) {
            error!("XDriver failed to set window title: {:#}", e);
        }
    }

    /// Releases graphics, then the window, then the connection. Idempotent.
    fn cleanup(&mut self) -> Result<()> {
        if !self.connection.is_open() {
            return Ok(());
        }
        info!("XDriver::cleanup() releasing X11 resources.");
        self.graphics.cleanup();
        self.window.cleanup(&self.connection);
        self.connection.cleanup()
    }
}

impl Drop for XDriver {
    fn drop(&mut self) {
        if let Err(e) = self.cleanup() {
            error!("Error during XDriver cleanup in drop: {:#}", e);
        }
    }
}
