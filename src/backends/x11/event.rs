// src/backends/x11/event.rs
#![allow(non_snake_case)] // Allow non-snake case for X11 types

use super::connection::Connection;
use super::window::Window;
use crate::backends::BackendEvent;
use crate::keys::{KeySymbol, Modifiers};

use anyhow::Result;
use log::{debug, info, trace, warn};
use std::mem;
use std::ptr;

use libc::{c_char, c_int, c_uint};
use x11::{keysym, xlib};

/// Buffer size for text obtained from `XLookupString`.
const KEY_TEXT_BUFFER_SIZE: usize = 32;

/// Drains every event currently queued on the connection and translates the
/// ones the viewer cares about. Never blocks: `XNextEvent` is only called
/// while `XPending` reports queued events.
pub fn process_pending_events(
    connection: &Connection,
    window: &Window,
) -> Result<Vec<BackendEvent>> {
    let mut backend_events = Vec::new();
    let display = connection.display();
    if display.is_null() {
        warn!("process_pending_events called on a closed display.");
        return Ok(backend_events);
    }

    // SAFETY: display is open for the duration of this loop.
    while unsafe { xlib::XPending(display) } > 0 {
        // SAFETY: XEvent is a plain C union; XNextEvent fills it in.
        let mut xevent: xlib::XEvent = unsafe { mem::zeroed() };
        unsafe { xlib::XNextEvent(display, &mut xevent) };

        // SAFETY: `type_` is the common discriminant of every XEvent variant.
        let event_type = unsafe { xevent.type_ };

        match event_type {
            xlib::Expose => {
                // SAFETY: event_type is Expose.
                let expose_event = unsafe { xevent.expose };
                if expose_event.count == 0 {
                    trace!("XEvent: Expose on window {}", expose_event.window);
                    backend_events.push(BackendEvent::Expose);
                }
            }
            xlib::KeyPress => {
                // SAFETY: event_type is KeyPress; XLookupString wants a mutable pointer.
                let key_event = unsafe { &mut xevent.key };
                let mut x_keysym: xlib::KeySym = 0;
                let mut key_text_buffer = [0u8; KEY_TEXT_BUFFER_SIZE];

                // SAFETY: buffer pointer and length match; no compose status needed.
                let count = unsafe {
                    xlib::XLookupString(
                        key_event,
                        key_text_buffer.as_mut_ptr() as *mut c_char,
                        key_text_buffer.len() as c_int,
                        &mut x_keysym,
                        ptr::null_mut(),
                    )
                };
                let text = if count > 0 {
                    String::from_utf8_lossy(&key_text_buffer[0..count as usize]).to_string()
                } else {
                    String::new()
                };

                let modifiers = modifiers_from_state(key_event.state);
                let symbol = xkeysym_to_keysymbol(x_keysym, &text);
                debug!(
                    "XEvent: KeyPress (symbol: {:?}, keysym: {:X}, modifiers: {:?}, text: {:?})",
                    symbol, x_keysym, modifiers, text
                );
                backend_events.push(BackendEvent::Key {
                    symbol,
                    modifiers,
                    text,
                });
            }
            xlib::ClientMessage => {
                // SAFETY: event_type is ClientMessage.
                let client_message_event = unsafe { xevent.client_message };
                if client_message_event.message_type == window.protocols_atom()
                    && client_message_event.data.as_longs()[0] as xlib::Atom
                        == window.wm_delete_window_atom()
                {
                    info!("XEvent: WM_DELETE_WINDOW received for window {}.", client_message_event.window);
                    backend_events.push(BackendEvent::CloseRequested);
                } else {
                    trace!(
                        "XEvent: Ignored ClientMessage (type: {})",
                        client_message_event.message_type
                    );
                }
            }
            xlib::FocusIn => {
                debug!("XEvent: FocusIn");
                backend_events.push(BackendEvent::FocusGained);
            }
            xlib::FocusOut => {
                debug!("XEvent: FocusOut");
                backend_events.push(BackendEvent::FocusLost);
            }
            _ => {
                trace!("XEvent: Ignored (type: {})", event_type);
            }
        }
    }
    Ok(backend_events)
}

/// Maps an X modifier state mask to `Modifiers`.
pub fn modifiers_from_state(state: c_uint) -> Modifiers {
    let mut modifiers = Modifiers::empty();
    if (state & xlib::ShiftMask) != 0 {
        modifiers.insert(Modifiers::SHIFT);
    }
    if (state & xlib::ControlMask) != 0 {
        modifiers.insert(Modifiers::CONTROL);
    }
    // Mod1 is conventionally Alt, Mod4 Super.
    if (state & xlib::Mod1Mask) != 0 {
        modifiers.insert(Modifiers::ALT);
    }
    if (state & xlib::Mod4Mask) != 0 {
        modifiers.insert(Modifiers::SUPER);
    }
    modifiers
}

/// Translates a keysym plus the text `XLookupString` produced for it.
///
/// Named keys are matched on the keysym first, since several of them
/// (Escape, Tab, Return) also produce control-character text. Anything else
/// with a single printable character of text becomes `KeySymbol::Char`.
pub fn xkeysym_to_keysymbol(keysym_val: xlib::KeySym, text: &str) -> KeySymbol {
    if keysym_val <= u32::MAX as xlib::KeySym {
        let named = match keysym_val as u32 {
            keysym::XK_Escape => Some(KeySymbol::Escape),
            keysym::XK_Left | keysym::XK_KP_Left => Some(KeySymbol::Left),
            keysym::XK_Right | keysym::XK_KP_Right => Some(KeySymbol::Right),
            keysym::XK_Up | keysym::XK_KP_Up => Some(KeySymbol::Up),
            keysym::XK_Down | keysym::XK_KP_Down => Some(KeySymbol::Down),
            keysym::XK_Home | keysym::XK_KP_Home => Some(KeySymbol::Home),
            keysym::XK_End | keysym::XK_KP_End => Some(KeySymbol::End),
            keysym::XK_Page_Up | keysym::XK_KP_Page_Up => Some(KeySymbol::PageUp),
            keysym::XK_Page_Down | keysym::XK_KP_Page_Down => Some(KeySymbol::PageDown),
            keysym::XK_Return | keysym::XK_KP_Enter => Some(KeySymbol::Enter),
            keysym::XK_BackSpace => Some(KeySymbol::Backspace),
            keysym::XK_Tab | keysym::XK_ISO_Left_Tab => Some(KeySymbol::Tab),
            keysym::XK_Shift_L | keysym::XK_Shift_R => Some(KeySymbol::Shift),
            keysym::XK_Control_L | keysym::XK_Control_R => Some(KeySymbol::Control),
            keysym::XK_Alt_L | keysym::XK_Alt_R | keysym::XK_Meta_L | keysym::XK_Meta_R => {
                Some(KeySymbol::Alt)
            }
            keysym::XK_Super_L | keysym::XK_Super_R => Some(KeySymbol::Super),
            _ => None,
        };
        if let Some(symbol) = named {
            return symbol;
        }
    }

    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c != '\u{FFFD}' && !c.is_control() => KeySymbol::Char(c),
        _ => KeySymbol::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_keys_win_over_control_text() {
        assert_eq!(
            xkeysym_to_keysymbol(keysym::XK_Escape as xlib::KeySym, "\u{1b}"),
            KeySymbol::Escape
        );
        assert_eq!(
            xkeysym_to_keysymbol(keysym::XK_Tab as xlib::KeySym, "\t"),
            KeySymbol::Tab
        );
    }

    #[test]
    fn arrows_including_keypad() {
        assert_eq!(xkeysym_to_keysymbol(keysym::XK_Left as xlib::KeySym, ""), KeySymbol::Left);
        assert_eq!(xkeysym_to_keysymbol(keysym::XK_KP_Right as xlib::KeySym, ""), KeySymbol::Right);
    }

    #[test]
    fn printable_text_becomes_char() {
        assert_eq!(xkeysym_to_keysymbol(keysym::XK_a as xlib::KeySym, "a"), KeySymbol::Char('a'));
        assert_eq!(xkeysym_to_keysymbol(keysym::XK_L as xlib::KeySym, "L"), KeySymbol::Char('L'));
    }

    #[test]
    fn unmapped_keys_without_text_are_unknown() {
        assert_eq!(xkeysym_to_keysymbol(keysym::XK_F5 as xlib::KeySym, ""), KeySymbol::Unknown);
        assert_eq!(xkeysym_to_keysymbol(0, "ab"), KeySymbol::Unknown);
        assert_eq!(xkeysym_to_keysymbol(0, "\u{7}"), KeySymbol::Unknown);
    }

    #[test]
    fn modifier_mask_translation() {
        assert_eq!(modifiers_from_state(0), Modifiers::empty());
        assert_eq!(modifiers_from_state(xlib::ShiftMask), Modifiers::SHIFT);
        assert_eq!(
            modifiers_from_state(xlib::ControlMask | xlib::Mod1Mask | xlib::Mod4Mask),
            Modifiers::CONTROL | Modifiers::ALT | Modifiers::SUPER
        );
        // Lock (caps lock) is not a modifier we track.
        assert_eq!(modifiers_from_state(xlib::LockMask), Modifiers::empty());
    }
}
