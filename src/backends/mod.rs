// src/backends/mod.rs

//! Defines the `Driver` trait for the windowing backend and the
//! platform-neutral types that flow across it: `BackendEvent` going up to the
//! viewer and `RenderCommand` going down to the driver.

use crate::color::Rgb;
pub use crate::keys::{KeySymbol, Modifiers};
use anyhow::Result;

#[cfg(test)]
pub mod mock;
pub mod x11;

/// Events originating from the backend (window system input).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendEvent {
    /// A keyboard key was pressed.
    Key {
        symbol: KeySymbol,
        modifiers: Modifiers,
        /// Text produced by the key press, if any.
        text: String,
    },
    /// The window manager asked us to close the window.
    CloseRequested,
    /// Part of the window was exposed and needs repainting. The viewer
    /// repaints every tick anyway, so this is informational.
    Expose,
    FocusGained,
    FocusLost,
}

/// Drawing commands produced by the `Renderer`.
///
/// All coordinates are in window pixels with the origin at the top-left.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderCommand {
    /// Fills the whole drawing surface with `bg`.
    ClearAll { bg: Rgb },
    /// Fills a solid rectangle.
    FillRect {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        color: Rgb,
    },
    /// Draws `text` with the top-left of its bounding box at `(x, y)`.
    DrawText {
        x: i32,
        y: i32,
        text: String,
        color: Rgb,
    },
    /// Makes everything drawn since the last present visible.
    PresentFrame,
}

/// Defines the interface between the viewer loop and a windowing system.
///
/// A `Driver` owns every platform resource it creates (display connection,
/// window, drawing surfaces, font, colours) and is responsible for
/// translating native input into `BackendEvent`s and executing
/// `RenderCommand`s.
pub trait Driver {
    /// Drains every pending platform event without blocking.
    fn process_events(&mut self) -> Result<Vec<BackendEvent>>;

    /// Executes a batch of render commands in order.
    fn execute_render_commands(&mut self, commands: Vec<RenderCommand>) -> Result<()>;

    /// Presents the composed frame to the display.
    fn present(&mut self) -> Result<()>;

    fn set_title(&mut self, title: &str);

    /// Releases platform resources. Must be idempotent.
    fn cleanup(&mut self) -> Result<()>;
}
