// src/config.rs

//! Defines the configuration structures for the grid viewer.
//!
//! Everything that used to be a fixed constant (window size, font, colours,
//! tick rate, key bindings, cell geometry) lives here and is handed to
//! `Viewer::new`. The defaults reproduce the stock look of the viewer, so a
//! caller that does not care can use `ViewerConfig::default()`.
//!
//! The structs derive `Deserialize` with `#[serde(default)]`, so a JSON file
//! only needs to mention the fields it wants to change.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use log::info;
use serde::{Deserialize, Serialize};

use crate::color::Rgb;
use crate::keys::KeySymbol;

// --- Top-Level Configuration Structure ---

/// Complete configuration for a `Viewer`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct ViewerConfig {
    pub window: WindowConfig,
    pub font: FontConfig,
    pub layout: LayoutConfig,
    pub colors: ColorScheme,
    pub timing: TimingConfig,
    pub keymap: KeymapConfig,
}

impl ViewerConfig {
    /// Reads a configuration from a JSON file. Missing fields keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: ViewerConfig = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        info!("Loaded viewer configuration from {}", path.display());
        Ok(config)
    }

    /// Rejects values the X server would refuse with a fatal protocol error.
    pub fn validate(&self) -> Result<()> {
        if self.window.width_px == 0 || self.window.height_px == 0 {
            return Err(anyhow!(
                "Window size must be non-zero, got {}x{}",
                self.window.width_px,
                self.window.height_px
            ));
        }
        if self.font.size_px == 0 {
            return Err(anyhow!("Font size must be non-zero"));
        }
        Ok(())
    }
}

// --- Window ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width_px: u16,
    pub height_px: u16,
}

impl Default for WindowConfig {
    fn default() -> Self {
        WindowConfig {
            title: "Grid Visualizer".to_string(),
            width_px: 800,
            height_px: 800,
        }
    }
}

// --- Font ---

/// Where the glyph font comes from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum FontSource {
    /// A Fontconfig family or pattern name, e.g. `"DejaVu Sans"`.
    Name(String),
    /// A font file on disk, e.g. `"/usr/share/fonts/TTF/DejaVuSans.ttf"`.
    File(PathBuf),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FontConfig {
    pub source: FontSource,
    /// Pixel size of the font. Also drives the cell size.
    pub size_px: u32,
}

impl Default for FontConfig {
    fn default() -> Self {
        FontConfig {
            source: FontSource::Name("Arial".to_string()),
            size_px: 12,
        }
    }
}

// --- Layout ---

/// Pixel geometry of the status line and the cell grid.
///
/// A cell is `font.size_px + cell_padding` pixels square. The grid starts at
/// `(grid_origin_x, font.size_px + grid_top_margin)`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LayoutConfig {
    pub status_x: i32,
    pub status_y: i32,
    pub grid_origin_x: i32,
    pub grid_top_margin: i32,
    pub cell_padding: i32,
    pub glyph_offset_x: i32,
    pub glyph_offset_y: i32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig {
            status_x: 2,
            status_y: 2,
            grid_origin_x: 1,
            grid_top_margin: 10,
            cell_padding: 2,
            glyph_offset_x: 3,
            glyph_offset_y: 1,
        }
    }
}

// --- Colours ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ColorScheme {
    pub background: Rgb,
    pub status_text: Rgb,
    pub cell_border: Rgb,
    /// Inner fill of a cell holding the empty sentinel.
    pub empty_cell: Rgb,
    /// Inner fill of a cell holding any other character.
    pub filled_cell: Rgb,
    pub glyph: Rgb,
}

impl Default for ColorScheme {
    fn default() -> Self {
        ColorScheme {
            background: Rgb::ALICE_BLUE,
            status_text: Rgb::BLACK,
            cell_border: Rgb::BLACK,
            empty_cell: Rgb::WHITE,
            filled_cell: Rgb::LAVENDER,
            glyph: Rgb::BLACK,
        }
    }
}

// --- Timing ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TimingConfig {
    /// Length of one loop iteration (~30 Hz).
    pub tick_ms: u64,
    /// Upper bound on the elapsed time reported per tick.
    pub max_delta_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        TimingConfig {
            tick_ms: 33,
            max_delta_ms: 50,
        }
    }
}

// --- Key bindings ---

/// Keys that are not fixed by convention. Escape always quits and the arrow
/// keys always step; Shift is always the fast modifier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct KeymapConfig {
    pub first: KeySymbol,
    pub last: KeySymbol,
    /// Step size when the fast modifier is held.
    pub fast_step: usize,
}

impl Default for KeymapConfig {
    fn default() -> Self {
        KeymapConfig {
            first: KeySymbol::Char('a'),
            last: KeySymbol::Char('l'),
            fast_step: 10,
        }
    }
}
