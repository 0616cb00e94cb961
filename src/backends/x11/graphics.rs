// src/backends/x11/graphics.rs
#![allow(non_snake_case)] // Allow non-snake case for X11 types

use super::connection::Connection;
use super::window::Window;
use crate::color::Rgb;
use crate::config::{FontConfig, FontSource};

use anyhow::{anyhow, Context, Result};
use log::{debug, info, trace, warn};
use std::collections::HashMap;
use std::ffi::CString;
use std::mem;
use std::os::unix::ffi::OsStrExt;
use std::ptr;

use fontconfig_sys::constants::{FC_FILE, FC_PIXEL_SIZE};
use fontconfig_sys::{
    FcConfigSubstitute, FcDefaultSubstitute, FcMatchPattern, FcPatternAddDouble,
    FcPatternAddString, FcPatternCreate, FcPatternDestroy,
};
use libc::{c_char, c_int, c_uint, c_ulong};
use x11::xrender::XRenderColor;
use x11::{xft, xlib};

// --- RAII Wrappers for X11 Resources ---

/// Wraps an `XftFont` pointer and closes it via `XftFontClose` on drop.
#[derive(Debug)]
struct SafeXftFont {
    ptr: *mut xft::XftFont,
    display: *mut xlib::Display,
}

impl SafeXftFont {
    #[inline]
    fn raw(&self) -> *mut xft::XftFont {
        self.ptr
    }

    fn ascent(&self) -> c_int {
        // SAFETY: ptr is non-null for the whole life of the wrapper (checked at open).
        unsafe { (*self.ptr).ascent }
    }

    fn descent(&self) -> c_int {
        // SAFETY: as above.
        unsafe { (*self.ptr).descent }
    }
}

impl Drop for SafeXftFont {
    fn drop(&mut self) {
        if !self.ptr.is_null() && !self.display.is_null() {
            trace!("Closing XftFont: {:p}", self.ptr);
            // SAFETY: font was opened on this display, which is still open.
            unsafe { xft::XftFontClose(self.display, self.ptr) };
            self.ptr = ptr::null_mut();
        }
    }
}

/// Wraps an `XftDraw` and destroys it via `XftDrawDestroy` on drop.
#[derive(Debug)]
struct SafeXftDraw {
    ptr: *mut xft::XftDraw,
}

impl Drop for SafeXftDraw {
    fn drop(&mut self) {
        if !self.ptr.is_null() {
            trace!("Destroying XftDraw: {:p}", self.ptr);
            // SAFETY: ptr came from XftDrawCreate and is destroyed once.
            unsafe { xft::XftDrawDestroy(self.ptr) };
            self.ptr = ptr::null_mut();
        }
    }
}

/// Off-screen pixmap everything is drawn into before `present` copies it to
/// the window.
#[derive(Debug)]
struct SafePixmap {
    id: xlib::Pixmap,
    display: *mut xlib::Display,
}

impl Drop for SafePixmap {
    fn drop(&mut self) {
        if self.id != 0 && !self.display.is_null() {
            trace!("Freeing back buffer pixmap: {}", self.id);
            // SAFETY: the pixmap was created on this display.
            unsafe { xlib::XFreePixmap(self.display, self.id) };
            self.id = 0;
        }
    }
}

/// Wraps an X11 `GC` and frees it via `XFreeGC` on drop.
#[derive(Debug)]
struct SafeGc {
    gc: xlib::GC,
    display: *mut xlib::Display,
}

impl Drop for SafeGc {
    fn drop(&mut self) {
        if !self.gc.is_null() && !self.display.is_null() {
            trace!("Freeing GC: {:p}", self.gc);
            // SAFETY: the GC was created on this display.
            unsafe { xlib::XFreeGC(self.display, self.gc) };
            self.gc = ptr::null_mut();
        }
    }
}

/// An allocated `XftColor`, released via `XftColorFree` on drop.
#[derive(Debug)]
struct SafeXftColor {
    color: xft::XftColor,
    display: *mut xlib::Display,
    visual: *mut xlib::Visual,
    colormap: xlib::Colormap,
}

impl SafeXftColor {
    fn alloc(connection: &Connection, rgb: Rgb) -> Result<Self> {
        let (red, green, blue) = rgb.to_rgb16();
        let render_color = XRenderColor {
            red,
            green,
            blue,
            alpha: XRENDER_ALPHA_OPAQUE,
        };
        // SAFETY: XftColor is plain data; zeroed is a valid placeholder to be filled in.
        let mut color: xft::XftColor = unsafe { mem::zeroed() };
        // SAFETY: FFI call on an open connection with its own visual/colormap.
        let ok = unsafe {
            xft::XftColorAllocValue(
                connection.display(),
                connection.visual(),
                connection.colormap(),
                &render_color,
                &mut color,
            ) != 0
        };
        if !ok {
            return Err(anyhow!("XftColorAllocValue failed for {:?}", rgb));
        }
        Ok(Self {
            color,
            display: connection.display(),
            visual: connection.visual(),
            colormap: connection.colormap(),
        })
    }
}

impl Drop for SafeXftColor {
    fn drop(&mut self) {
        if self.display.is_null() {
            return;
        }
        trace!("Freeing XftColor, pixel: {}", self.color.pixel);
        // SAFETY: the colour was allocated with exactly these display/visual/colormap.
        unsafe {
            xft::XftColorFree(self.display, self.visual, self.colormap, &mut self.color);
        }
    }
}

// --- Constants ---

/// Alpha value for fully opaque colors in XRender.
const XRENDER_ALPHA_OPAQUE: u16 = 0xffff;

/// Font and colours loaded before the window exists. The background pixel is
/// needed to create the window, and the font is the most likely thing to fail.
pub(super) struct PreGraphicsData {
    xft_font: SafeXftFont,
    color_cache: HashMap<Rgb, SafeXftColor>,
    pub(super) background_pixel: c_ulong,
}

/// Owns the font, colour cache and the double buffer used to draw the grid.
///
/// Drawing goes into a pixmap the size of the window; `present` copies the
/// pixmap onto the window in one request. Resources are released in
/// dependency order by `cleanup`, which `XDriver` calls before closing the
/// connection.
#[derive(Debug)]
pub struct Graphics {
    xft_draw: Option<SafeXftDraw>,      // Xft drawing context bound to `back_buffer`
    back_buffer: Option<SafePixmap>,    // Window-sized pixmap all drawing goes into
    copy_gc: Option<SafeGc>,            // GC used only for the XCopyArea in `present`
    xft_font: Option<SafeXftFont>,      // The single font for status text and glyphs
    color_cache: HashMap<Rgb, SafeXftColor>, // Allocated on first use, freed in `cleanup`
    font_ascent_px: i32,                // Offset from a text box's top to its baseline
    width_px: u32,
    height_px: u32,
}

impl Graphics {
    /// First stage: opens the font and allocates the background colour.
    pub(super) fn load_font_and_colors(
        connection: &Connection,
        font: &FontConfig,
        background: Rgb,
    ) -> Result<PreGraphicsData> {
        let xft_font = open_font(connection, font)?;
        info!(
            "Font loaded: ascent={}, descent={}",
            xft_font.ascent(),
            xft_font.descent()
        );

        let bg = SafeXftColor::alloc(connection, background)
            .context("Failed to allocate background colour")?;
        let background_pixel = bg.color.pixel;
        let mut color_cache = HashMap::new();
        color_cache.insert(background, bg);

        Ok(PreGraphicsData {
            xft_font,
            color_cache,
            background_pixel,
        })
    }

    /// Second stage: creates the back buffer, its `XftDraw` and the GC used to
    /// copy it to `window`.
    ///
    /// # Arguments
    ///
    /// * `connection`: The open X11 connection the window lives on.
    /// * `window`: The created (not necessarily mapped) window. The back buffer
    ///   takes its size and depth from it.
    /// * `pre_data`: Font and colours from `load_font_and_colors`. Ownership
    ///   moves into the returned `Graphics`.
    ///
    /// # Returns
    ///
    /// * `Result<Self>`: The ready-to-draw `Graphics`, or an error if the
    ///   pixmap, `XftDraw` or GC could not be created. Anything created before
    ///   the failure, `pre_data` included, is released on return.
    pub(super) fn new(
        connection: &Connection,
        window: &Window,
        pre_data: PreGraphicsData,
    ) -> Result<Self> {
        let display = connection.display();
        let (width, height) = window.dimensions_pixels();
        let (width_px, height_px) = (width as u32, height as u32);

        // SAFETY: FFI on an open connection and a live window.
        let pixmap_id = unsafe {
            xlib::XCreatePixmap(
                display,
                window.id(),
                width_px as c_uint,
                height_px as c_uint,
                connection.depth() as c_uint,
            )
        };
        if pixmap_id == 0 {
            return Err(anyhow!("XCreatePixmap failed for {}x{} back buffer", width_px, height_px));
        }
        let back_buffer = SafePixmap {
            id: pixmap_id,
            display,
        };

        // SAFETY: FFI; pixmap and connection resources are valid.
        let draw_ptr = unsafe {
            xft::XftDrawCreate(display, pixmap_id, connection.visual(), connection.colormap())
        };
        if draw_ptr.is_null() {
            return Err(anyhow!("Failed to create XftDraw for back buffer {}", pixmap_id));
        }
        let xft_draw = SafeXftDraw { ptr: draw_ptr };

        // SAFETY: zeroed XGCValues with valuemask 0 means "all defaults".
        let gc = unsafe {
            let mut values: xlib::XGCValues = mem::zeroed();
            xlib::XCreateGC(display, window.id(), 0, &mut values)
        };
        if gc.is_null() {
            return Err(anyhow!("XCreateGC failed for window ID {}", window.id()));
        }
        let copy_gc = SafeGc { gc, display };
        debug!(
            "Back buffer {} ({}x{}) with XftDraw {:p} and GC {:p} ready.",
            pixmap_id, width_px, height_px, draw_ptr, gc
        );

        Ok(Self {
            font_ascent_px: pre_data.xft_font.ascent(),
            xft_draw: Some(xft_draw),
            back_buffer: Some(back_buffer),
            copy_gc: Some(copy_gc),
            xft_font: Some(pre_data.xft_font),
            color_cache: pre_data.color_cache,
            width_px,
            height_px,
        })
    }

    /// Returns the allocated `XftColor` for `rgb`, allocating it on first use.
    fn xft_color(&mut self, connection: &Connection, rgb: Rgb) -> Result<xft::XftColor> {
        if let Some(cached) = self.color_cache.get(&rgb) {
            return Ok(cached.color);
        }
        let allocated = SafeXftColor::alloc(connection, rgb)?;
        let color = allocated.color;
        self.color_cache.insert(rgb, allocated);
        Ok(color)
    }

    fn draw_ptr(&self) -> Result<*mut xft::XftDraw> {
        self.xft_draw
            .as_ref()
            .map(|d| d.ptr)
            .ok_or_else(|| anyhow!("Graphics used after cleanup"))
    }

    pub(super) fn clear_all(&mut self, connection: &Connection, bg: Rgb) -> Result<()> {
        let (w, h) = (self.width_px, self.height_px);
        self.fill_rect(connection, 0, 0, w, h, bg)
    }

    pub(super) fn fill_rect(
        &mut self,
        connection: &Connection,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        color: Rgb,
    ) -> Result<()> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        let xft_color = self
            .xft_color(connection, color)
            .context("Failed to resolve color for fill_rect")?;
        let draw = self.draw_ptr()?;
        // SAFETY: draw is live; xft_color is an allocated colour.
        unsafe {
            xft::XftDrawRect(draw, &xft_color, x, y, width, height);
        }
        Ok(())
    }

    /// Draws `text` with the top-left of its line box at `(x, y)`.
    pub(super) fn draw_text(
        &mut self,
        connection: &Connection,
        x: i32,
        y: i32,
        text: &str,
        color: Rgb,
    ) -> Result<()> {
        if text.is_empty() {
            return Ok(());
        }
        let xft_color = self
            .xft_color(connection, color)
            .context("Failed to resolve color for text")?;
        let draw = self.draw_ptr()?;
        let font = self
            .xft_font
            .as_ref()
            .map(SafeXftFont::raw)
            .ok_or_else(|| anyhow!("Graphics used after cleanup"))?;
        let len = utf8_len(text)?;
        // SAFETY: draw, font and colour are live. Xft reads exactly `len`
        // bytes, so the text needs no terminator and may contain NUL.
        unsafe {
            xft::XftDrawStringUtf8(
                draw,
                &xft_color,
                font,
                x,
                y + self.font_ascent_px,
                text.as_ptr(),
                len,
            );
        }
        Ok(())
    }

    /// Copies the back buffer onto `window` and flushes.
    pub(super) fn present(&self, connection: &Connection, window: &Window) -> Result<()> {
        let (Some(pixmap), Some(gc)) = (self.back_buffer.as_ref(), self.copy_gc.as_ref()) else {
            warn!("Graphics::present called after cleanup.");
            return Ok(());
        };
        if window.id() == 0 || !connection.is_open() {
            return Err(anyhow!("Cannot present: window or display already closed"));
        }
        // SAFETY: all handles are live on this connection.
        unsafe {
            xlib::XCopyArea(
                connection.display(),
                pixmap.id,
                window.id(),
                gc.gc,
                0,
                0,
                self.width_px as c_uint,
                self.height_px as c_uint,
                0,
                0,
            );
        }
        connection.flush();
        trace!("Back buffer copied to window {}.", window.id());
        Ok(())
    }

    /// Releases everything in dependency order. Idempotent.
    pub(super) fn cleanup(&mut self) {
        if self.xft_draw.is_none() && self.xft_font.is_none() {
            return;
        }
        info!("Graphics::cleanup releasing draw, back buffer, GC, font and {} colours.", self.color_cache.len());
        // The XftDraw references the pixmap, so it goes first.
        drop(self.xft_draw.take());
        drop(self.back_buffer.take());
        drop(self.copy_gc.take());
        self.color_cache.clear();
        drop(self.xft_font.take());
    }
}

impl Drop for Graphics {
    fn drop(&mut self) {
        self.cleanup();
    }
}

/// Opens the configured font at the configured pixel size.
fn open_font(connection: &Connection, font: &FontConfig) -> Result<SafeXftFont> {
    let display = connection.display();
    let font_ptr = match &font.source {
        FontSource::Name(name) => {
            let pattern_name = format!("{}:pixelsize={}", name, font.size_px);
            debug!("Opening font by name: {}", pattern_name);
            let name_cstr =
                CString::new(pattern_name.as_str()).context("Failed to create CString for font name")?;
            // SAFETY: FFI on an open connection; name_cstr outlives the call.
            unsafe { xft::XftFontOpenName(display, connection.screen(), name_cstr.as_ptr()) }
        }
        FontSource::File(path) => {
            debug!("Opening font file: {} at {}px", path.display(), font.size_px);
            let path_cstr = CString::new(path.as_os_str().as_bytes())
                .context("Failed to create CString for font path")?;
            // SAFETY: Fontconfig pattern building. On success XftFontOpenPattern
            // takes ownership of the pattern; on failure we destroy it.
            unsafe {
                let pattern = FcPatternCreate();
                if pattern.is_null() {
                    return Err(anyhow!("FcPatternCreate failed"));
                }
                let added_file = FcPatternAddString(
                    pattern,
                    FC_FILE.as_ptr() as *const c_char,
                    path_cstr.as_ptr() as *const u8,
                ) != 0;
                let added_size = FcPatternAddDouble(
                    pattern,
                    FC_PIXEL_SIZE.as_ptr() as *const c_char,
                    font.size_px as f64,
                ) != 0;
                if !(added_file && added_size) {
                    FcPatternDestroy(pattern);
                    return Err(anyhow!("Failed to build Fontconfig pattern for {}", path.display()));
                }
                FcConfigSubstitute(ptr::null_mut(), pattern, FcMatchPattern);
                FcDefaultSubstitute(pattern);

                let opened = xft::XftFontOpenPattern(display, pattern as *mut xft::FcPattern);
                if opened.is_null() {
                    FcPatternDestroy(pattern);
                }
                opened
            }
        }
    };

    if font_ptr.is_null() {
        return Err(anyhow!(
            "Failed to load font {:?} at {}px. Ensure the font is installed and accessible.",
            font.source,
            font.size_px
        ));
    }
    Ok(SafeXftFont {
        ptr: font_ptr,
        display,
    })
}

/// Byte length of `text` as the `c_int` Xft's UTF-8 calls take.
fn utf8_len(text: &str) -> Result<c_int> {
    c_int::try_from(text.len())
        .map_err(|_| anyhow!("Text of {} bytes is too long to draw", text.len()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8_len_counts_bytes_including_nul() {
        assert_eq!(utf8_len("x\0").unwrap(), 2);
        assert_eq!(utf8_len("Index 1 / 1: a\0b").unwrap(), 16);
        assert_eq!(utf8_len("é").unwrap(), 2);
        assert_eq!(utf8_len("").unwrap(), 0);
    }
}
