// src/backends/x11/connection.rs
#![allow(non_snake_case)] // Allow non-snake case for X11 types

use anyhow::{anyhow, Result};
use log::{debug, info, warn};
use std::ptr;

use libc::c_int;
use x11::xlib;

/// Owns the raw `*mut xlib::Display` and closes it on drop.
#[derive(Debug)]
struct ManagedDisplay {
    ptr: *mut xlib::Display,
}

impl ManagedDisplay {
    /// Opens the display named by `DISPLAY`.
    fn open() -> Result<Self> {
        // SAFETY: passing NULL asks Xlib to read the DISPLAY environment variable.
        let display_ptr = unsafe { xlib::XOpenDisplay(ptr::null()) };
        if display_ptr.is_null() {
            return Err(anyhow!(
                "Failed to open X display. Check DISPLAY environment variable or X server status."
            ));
        }
        debug!("X display opened: {:p}", display_ptr);
        Ok(Self { ptr: display_ptr })
    }

    #[inline]
    fn raw(&self) -> *mut xlib::Display {
        self.ptr
    }

    /// Closes the display now. Later calls and the eventual drop are no-ops.
    fn close(&mut self) {
        if self.ptr.is_null() {
            return;
        }
        info!("Closing X11 display connection: {:p}", self.ptr);
        // SAFETY: ptr came from XOpenDisplay and is nulled right after, so it is closed once.
        let status = unsafe { xlib::XCloseDisplay(self.ptr) };
        if status != 0 {
            warn!(
                "XCloseDisplay returned non-zero status: {}. Display may not have closed cleanly.",
                status
            );
        }
        self.ptr = ptr::null_mut();
    }
}

impl Drop for ManagedDisplay {
    fn drop(&mut self) {
        self.close();
    }
}

/// The connection to the X server plus the default screen resources every
/// other X11 module needs: screen number, colormap, visual and depth.
#[derive(Debug)]
pub struct Connection {
    managed_display: ManagedDisplay,
    screen: c_int,
    colormap: xlib::Colormap,
    visual: *mut xlib::Visual,
    depth: c_int,
}

impl Connection {
    /// Opens the display named by `DISPLAY` and looks up the default screen's
    /// colormap, visual and depth.
    ///
    /// # Returns
    ///
    /// * `Result<Self>`: The open connection, or an error if the display cannot
    ///   be opened or has no default visual. The display is closed again on
    ///   the error path.
    pub fn new() -> Result<Self> {
        info!("Establishing X11 server connection.");
        // If anything below fails, ManagedDisplay's drop closes the display.
        let managed_display = ManagedDisplay::open()?;
        let display = managed_display.raw();

        // SAFETY: display is a valid, open connection.
        let (screen, colormap, visual, depth) = unsafe {
            let screen = xlib::XDefaultScreen(display);
            (
                screen,
                xlib::XDefaultColormap(display, screen),
                xlib::XDefaultVisual(display, screen),
                xlib::XDefaultDepth(display, screen),
            )
        };
        if visual.is_null() {
            return Err(anyhow!(
                "Failed to get default visual for screen {}.",
                screen
            ));
        }
        debug!(
            "Screen {}: colormap {}, visual {:p}, depth {}",
            screen, colormap, visual, depth
        );

        Ok(Connection {
            managed_display,
            screen,
            colormap,
            visual,
            depth,
        })
    }

    /// Closes the display connection. Idempotent. Every resource created on
    /// this connection must be released before this is called.
    pub fn cleanup(&mut self) -> Result<()> {
        if self.managed_display.raw().is_null() {
            debug!("X11 display connection already closed. Cleanup skipped.");
        } else {
            self.managed_display.close();
        }
        Ok(())
    }

    /// Raw display pointer. Null once `cleanup` has run.
    #[inline]
    pub fn display(&self) -> *mut xlib::Display {
        self.managed_display.raw()
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        !self.managed_display.raw().is_null()
    }

    #[inline]
    pub fn screen(&self) -> c_int {
        self.screen
    }

    #[inline]
    pub fn colormap(&self) -> xlib::Colormap {
        self.colormap
    }

    #[inline]
    pub fn visual(&self) -> *mut xlib::Visual {
        self.visual
    }

    #[inline]
    pub fn depth(&self) -> c_int {
        self.depth
    }

    /// Flushes the request buffer to the server.
    pub fn flush(&self) {
        if self.is_open() {
            // SAFETY: display is open.
            unsafe { xlib::XFlush(self.display()) };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn closed_connection() -> Connection {
        Connection {
            managed_display: ManagedDisplay {
                ptr: ptr::null_mut(),
            },
            screen: 0,
            colormap: 0,
            visual: ptr::null_mut(),
            depth: 24,
        }
    }

    #[test]
    fn cleanup_on_closed_connection_is_idempotent() {
        let mut conn = closed_connection();
        assert!(conn.cleanup().is_ok());
        assert!(conn.cleanup().is_ok());
        assert!(conn.display().is_null());
        assert!(!conn.is_open());
    }

    #[test]
    fn flush_on_closed_connection_is_a_no_op() {
        let conn = closed_connection();
        conn.flush();
    }
}
