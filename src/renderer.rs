// src/renderer.rs

//! This module defines the `Renderer`.
//!
//! The `Renderer` turns the frame under the history cursor into a list of
//! `RenderCommand`s for a `Driver` to execute. It holds no platform state and
//! does no dirty tracking: every call repaints the whole window, which keeps
//! it trivially correct for grids of the size this viewer is used with.

use log::trace;

use crate::backends::RenderCommand;
use crate::color::Rgb;
use crate::config::{ColorScheme, ViewerConfig};
use crate::frame::CellKind;
use crate::history::History;

/// Cell geometry in window pixels, derived once from the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct GridGeometry {
    origin_x: i32,
    origin_y: i32,
    cell_px: i32,
    glyph_offset_x: i32,
    glyph_offset_y: i32,
}

impl GridGeometry {
    /// Top-left corner of the cell at `(row, col)`, border included.
    fn cell_origin(&self, row: usize, col: usize) -> (i32, i32) {
        (
            self.origin_x + col as i32 * self.cell_px,
            self.origin_y + row as i32 * self.cell_px,
        )
    }
}

/// Translates `History` state into drawing commands.
#[derive(Debug, Clone)]
pub struct Renderer {
    geometry: GridGeometry,
    status_pos: (i32, i32),
    colors: ColorScheme,
}

impl Renderer {
    pub fn new(config: &ViewerConfig) -> Self {
        let font_px = config.font.size_px as i32;
        let layout = &config.layout;
        Self {
            geometry: GridGeometry {
                origin_x: layout.grid_origin_x,
                origin_y: font_px + layout.grid_top_margin,
                cell_px: font_px + layout.cell_padding,
                glyph_offset_x: layout.glyph_offset_x,
                glyph_offset_y: layout.glyph_offset_y,
            },
            status_pos: (layout.status_x, layout.status_y),
            colors: config.colors.clone(),
        }
    }

    /// Builds the full command list for one repaint.
    ///
    /// The list always starts with `ClearAll` and ends with `PresentFrame`.
    /// With no frames the window shows only the background.
    pub fn prepare(&self, history: &History) -> Vec<RenderCommand> {
        let mut commands = vec![RenderCommand::ClearAll {
            bg: self.colors.background,
        }];

        if let (Some(frame), Some(status)) = (history.current(), history.status_line()) {
            commands.push(RenderCommand::DrawText {
                x: self.status_pos.0,
                y: self.status_pos.1,
                text: status,
                color: self.colors.status_text,
            });
            commands.reserve(frame.height * frame.width * 3 + 1);
            for (row, col, kind) in frame.iter_cells() {
                self.push_cell(&mut commands, row, col, kind);
            }
            trace!(
                "Renderer: prepared {}x{} frame at cursor {}",
                frame.height,
                frame.width,
                history.cursor()
            );
        }

        commands.push(RenderCommand::PresentFrame);
        commands
    }

    fn push_cell(&self, commands: &mut Vec<RenderCommand>, row: usize, col: usize, kind: CellKind) {
        let g = &self.geometry;
        let (x, y) = g.cell_origin(row, col);

        // Border: one pixel wider than the pitch so neighbours share an edge.
        commands.push(fill(x, y, g.cell_px + 1, self.colors.cell_border));

        let inner = match kind {
            CellKind::Empty => self.colors.empty_cell,
            CellKind::Filled(_) => self.colors.filled_cell,
        };
        commands.push(fill(x + 1, y + 1, g.cell_px - 1, inner));

        if let CellKind::Filled(ch) = kind {
            commands.push(RenderCommand::DrawText {
                x: x + g.glyph_offset_x,
                y: y + g.glyph_offset_y,
                text: ch.to_string(),
                color: self.colors.glyph,
            });
        }
    }
}

fn fill(x: i32, y: i32, side: i32, color: Rgb) -> RenderCommand {
    let side = side.max(0) as u32;
    RenderCommand::FillRect {
        x,
        y,
        width: side,
        height: side,
        color,
    }
}

#[cfg(test)]
mod tests;
