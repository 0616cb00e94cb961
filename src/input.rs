// src/input.rs

//! Maps backend input to viewer actions.

use log::trace;

use crate::backends::BackendEvent;
use crate::config::KeymapConfig;
use crate::history::Navigation;
use crate::keys::{KeySymbol, Modifiers};

/// What the viewer should do in response to one input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerAction {
    Quit,
    Navigate(Navigation),
}

/// Translates a single event. Returns `None` for input the viewer ignores.
pub fn translate(event: &BackendEvent, keymap: &KeymapConfig) -> Option<ViewerAction> {
    let action = match event {
        BackendEvent::CloseRequested => Some(ViewerAction::Quit),
        BackendEvent::Key {
            symbol, modifiers, ..
        } => translate_key(symbol, *modifiers, keymap),
        BackendEvent::Expose | BackendEvent::FocusGained | BackendEvent::FocusLost => None,
    };
    trace!("Input: {:?} -> {:?}", event, action);
    action
}

fn translate_key(
    symbol: &KeySymbol,
    modifiers: Modifiers,
    keymap: &KeymapConfig,
) -> Option<ViewerAction> {
    // Escape wins over any binding, including a remapped first/last key.
    if *symbol == KeySymbol::Escape {
        return Some(ViewerAction::Quit);
    }
    // A bare Shift press arrives before the arrow it modifies.
    if symbol.is_modifier() {
        return None;
    }
    let fast = modifiers.contains(Modifiers::SHIFT);
    let nav = match symbol {
        KeySymbol::Left => Navigation::StepBack { fast },
        KeySymbol::Right => Navigation::StepForward { fast },
        s if s.matches(&keymap.first) => Navigation::First,
        s if s.matches(&keymap.last) => Navigation::Last,
        _ => return None,
    };
    Some(ViewerAction::Navigate(nav))
}
