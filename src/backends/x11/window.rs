// src/backends/x11/window.rs
#![allow(non_snake_case)] // Allow non-snake case for X11 types

use super::connection::Connection;
use anyhow::{anyhow, Context, Result};
use log::{debug, error, info, trace, warn};
use std::ffi::CString;
use std::mem;

use libc::{c_char, c_int, c_uint};
use x11::xlib;

/// The viewer's top-level X11 window.
///
/// The window has a fixed size: the size hints pin minimum and maximum to
/// the requested dimensions. `cleanup` must be called by the owner before the
/// `Connection` is closed; `Drop` only reports a missed cleanup.
#[derive(Debug)]
pub struct Window {
    id: xlib::Window,              // 0 once destroyed
    wm_delete_window: xlib::Atom,  // WM_DELETE_WINDOW, set by setup_protocols_and_hints
    protocols_atom: xlib::Atom,    // WM_PROTOCOLS, the ClientMessage type to match
    width_px: u16,
    height_px: u16,
}

impl Window {
    /// Creates the window centred on the default screen. The window is not
    /// mapped yet; call `setup_protocols_and_hints` and `map_and_flush`.
    ///
    /// # Arguments
    ///
    /// * `connection`: The open X11 connection.
    /// * `width_px`, `height_px`: Fixed window size in pixels. Both must be
    ///   non-zero; the X server rejects zero-sized windows.
    /// * `bg_pixel`: Pixel value of the background colour, as allocated by
    ///   `Graphics::load_font_and_colors`. Used for the background and border.
    ///
    /// # Returns
    ///
    /// * `Result<Self>`: The new `Window`, or an error if `XCreateWindow`
    ///   returned no ID.
    pub fn new(
        connection: &Connection,
        width_px: u16,
        height_px: u16,
        bg_pixel: libc::c_ulong,
    ) -> Result<Self> {
        info!(
            "Creating X11 window: {}x{}px, bg_pixel: {}",
            width_px, height_px, bg_pixel
        );
        let display = connection.display();
        let screen = connection.screen();

        // SAFETY: Xlib FFI on an open connection; attributes is fully initialised.
        let window_id = unsafe {
            let root_window = xlib::XRootWindow(display, screen);
            let screen_w = xlib::XDisplayWidth(display, screen);
            let screen_h = xlib::XDisplayHeight(display, screen);
            let x = ((screen_w - width_px as c_int) / 2).max(0);
            let y = ((screen_h - height_px as c_int) / 2).max(0);

            let mut attributes: xlib::XSetWindowAttributes = mem::zeroed();
            attributes.colormap = connection.colormap();
            attributes.background_pixel = bg_pixel;
            attributes.border_pixel = bg_pixel;
            attributes.event_mask = xlib::ExposureMask
                | xlib::KeyPressMask
                | xlib::StructureNotifyMask
                | xlib::FocusChangeMask;

            xlib::XCreateWindow(
                display,
                root_window,
                x,
                y,
                width_px as c_uint,
                height_px as c_uint,
                0,
                connection.depth(),
                xlib::InputOutput as c_uint,
                connection.visual(),
                xlib::CWColormap | xlib::CWBackPixel | xlib::CWBorderPixel | xlib::CWEventMask,
                &mut attributes,
            )
        };

        if window_id == 0 {
            return Err(anyhow!("XCreateWindow failed"));
        }
        debug!("X window created (ID: {})", window_id);

        Ok(Self {
            id: window_id,
            wm_delete_window: 0,
            protocols_atom: 0,
            width_px,
            height_px,
        })
    }

    /// Registers for `WM_DELETE_WINDOW`, sets the title and pins the size.
    ///
    /// # Arguments
    ///
    /// * `connection`: The connection the window was created on.
    /// * `title`: Initial window title, set as both `WM_NAME` and `_NET_WM_NAME`.
    ///
    /// # Returns
    ///
    /// * `Result<()>`: An error only if the title cannot be converted for Xlib
    ///   (it contains a NUL byte). A missing protocol atom is logged and
    ///   tolerated; close requests then simply never arrive.
    pub fn setup_protocols_and_hints(&mut self, connection: &Connection, title: &str) -> Result<()> {
        let display = connection.display();
        // SAFETY: Xlib FFI on an open connection and a live window.
        unsafe {
            self.wm_delete_window = xlib::XInternAtom(
                display,
                b"WM_DELETE_WINDOW\0".as_ptr() as *const c_char,
                xlib::False,
            );
            self.protocols_atom = xlib::XInternAtom(
                display,
                b"WM_PROTOCOLS\0".as_ptr() as *const c_char,
                xlib::False,
            );

            if self.wm_delete_window != 0 && self.protocols_atom != 0 {
                xlib::XSetWMProtocols(display, self.id, [self.wm_delete_window].as_mut_ptr(), 1);
                debug!("WM_PROTOCOLS (WM_DELETE_WINDOW) registered.");
            } else {
                warn!("Failed to get WM_DELETE_WINDOW or WM_PROTOCOLS atom. Window close events might not be received.");
            }

            let mut size_hints: xlib::XSizeHints = mem::zeroed();
            size_hints.flags = xlib::PMinSize | xlib::PMaxSize;
            size_hints.min_width = self.width_px as c_int;
            size_hints.max_width = self.width_px as c_int;
            size_hints.min_height = self.height_px as c_int;
            size_hints.max_height = self.height_px as c_int;
            xlib::XSetWMNormalHints(display, self.id, &mut size_hints);
        }
        self.set_title(connection, title)
    }

    pub fn map_and_flush(&self, connection: &Connection) {
        info!("Mapping window ID: {}", self.id);
        // SAFETY: Xlib FFI on an open connection and a live window.
        unsafe {
            xlib::XMapWindow(connection.display(), self.id);
        }
        connection.flush();
    }

    /// Sets both `WM_NAME` and the UTF-8 `_NET_WM_NAME`.
    pub fn set_title(&self, connection: &Connection, title: &str) -> Result<()> {
        if self.id == 0 {
            warn!("set_title called on a destroyed window.");
            return Ok(());
        }
        trace!("Setting window title to '{}'", title);
        let display = connection.display();
        let title_cstr = CString::new(title).context("Failed to create CString for title")?;
        // SAFETY: Xlib FFI on an open connection; title_cstr outlives the calls.
        unsafe {
            xlib::XStoreName(display, self.id, title_cstr.as_ptr() as *mut c_char);

            let net_wm_name_atom = xlib::XInternAtom(
                display,
                b"_NET_WM_NAME\0".as_ptr() as *const c_char,
                xlib::False,
            );
            let utf8_string_atom = xlib::XInternAtom(
                display,
                b"UTF8_STRING\0".as_ptr() as *const c_char,
                xlib::False,
            );
            if net_wm_name_atom != 0 && utf8_string_atom != 0 {
                xlib::XChangeProperty(
                    display,
                    self.id,
                    net_wm_name_atom,
                    utf8_string_atom,
                    8,
                    xlib::PropModeReplace,
                    title_cstr.as_ptr() as *const u8,
                    title_cstr.as_bytes().len() as c_int,
                );
            }
        }
        connection.flush();
        Ok(())
    }

    /// Destroys the window. Idempotent.
    pub fn cleanup(&mut self, connection: &Connection) {
        if self.id != 0 && connection.is_open() {
            info!("Destroying X11 window (ID: {}).", self.id);
            // SAFETY: the window is live and the connection open.
            unsafe {
                xlib::XDestroyWindow(connection.display(), self.id);
            }
            connection.flush();
            self.id = 0;
        }
    }

    #[inline]
    pub fn id(&self) -> xlib::Window {
        self.id
    }

    #[inline]
    pub fn wm_delete_window_atom(&self) -> xlib::Atom {
        self.wm_delete_window
    }

    #[inline]
    pub fn protocols_atom(&self) -> xlib::Atom {
        self.protocols_atom
    }

    #[inline]
    pub fn dimensions_pixels(&self) -> (u16, u16) {
        (self.width_px, self.height_px)
    }
}

impl Drop for Window {
    fn drop(&mut self) {
        if self.id != 0 {
            error!(
                "Window (ID: {}) dropped without explicit cleanup. X server resources may leak.",
                self.id
            );
        }
    }
}
