// src/history.rs

//! The append-only list of frames and the cursor selecting the one on screen.

use log::{debug, trace};

use crate::frame::{Frame, FrameError};

/// A cursor movement requested by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    StepBack { fast: bool },
    StepForward { fast: bool },
    First,
    Last,
}

/// Frames seen so far plus the index of the displayed one.
///
/// The cursor always lies in `[0, max(len - 1, 0)]`; it is re-clamped after
/// every append and every navigation.
#[derive(Debug, Clone)]
pub struct History {
    frames: Vec<Frame>,
    cursor: usize,
    fast_step: usize,
}

impl History {
    pub fn new(fast_step: usize) -> Self {
        History {
            frames: Vec::new(),
            cursor: 0,
            fast_step: fast_step.max(1),
        }
    }

    /// Adds a frame to the end. Frames that break the row/column invariant
    /// are refused and the history is left unchanged.
    pub fn append(&mut self, frame: Frame) -> Result<(), FrameError> {
        frame.validate()?;
        trace!(
            "History: appending {}x{} frame #{}",
            frame.height,
            frame.width,
            self.frames.len() + 1
        );
        self.frames.push(frame);
        self.clamp_cursor();
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn current(&self) -> Option<&Frame> {
        self.frames.get(self.cursor)
    }

    fn last_index(&self) -> usize {
        self.frames.len().saturating_sub(1)
    }

    fn clamp_cursor(&mut self) {
        self.cursor = self.cursor.min(self.last_index());
    }

    /// Moves the cursor. Steps are clamped at both ends; there is no wraparound.
    pub fn navigate(&mut self, nav: Navigation) {
        let fast_step = self.fast_step;
        let step = |fast: bool| if fast { fast_step } else { 1 };
        let before = self.cursor;
        self.cursor = match nav {
            Navigation::StepBack { fast } => self.cursor.saturating_sub(step(fast)),
            Navigation::StepForward { fast } => self.cursor.saturating_add(step(fast)),
            Navigation::First => 0,
            Navigation::Last => self.last_index(),
        };
        self.clamp_cursor();
        debug!(
            "History: {:?} moved cursor {} -> {} (len {})",
            nav,
            before,
            self.cursor,
            self.frames.len()
        );
    }

    /// The one-line status shown above the grid, or `None` with no frames.
    pub fn status_line(&self) -> Option<String> {
        self.current().map(|frame| {
            format!(
                "Index {} / {}: {}",
                self.cursor + 1,
                self.frames.len(),
                frame.message
            )
        })
    }
}

impl Default for History {
    fn default() -> Self {
        History::new(10)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history_with(n: usize) -> History {
        let mut history = History::default();
        for i in 0..n {
            history
                .append(Frame::blank(1, 1).with_message(format!("f{}", i)))
                .unwrap();
        }
        history
    }

    const ALL_MOVES: [Navigation; 6] = [
        Navigation::StepBack { fast: false },
        Navigation::StepBack { fast: true },
        Navigation::StepForward { fast: false },
        Navigation::StepForward { fast: true },
        Navigation::First,
        Navigation::Last,
    ];

    #[test]
    fn cursor_stays_in_bounds_for_any_sequence() {
        for n in 0..25 {
            let mut history = history_with(n);
            // Deterministic pseudo-random walk over every move kind.
            let mut seed: usize = 7 + n;
            for _ in 0..200 {
                seed = seed.wrapping_mul(1103515245).wrapping_add(12345);
                history.navigate(ALL_MOVES[(seed >> 8) % ALL_MOVES.len()]);
                assert!(history.cursor() <= n.saturating_sub(1));
            }
        }
    }

    #[test]
    fn single_steps_move_by_one_and_clamp() {
        let mut history = history_with(3);
        history.navigate(Navigation::StepBack { fast: false });
        assert_eq!(history.cursor(), 0);
        history.navigate(Navigation::StepForward { fast: false });
        assert_eq!(history.cursor(), 1);
        history.navigate(Navigation::StepForward { fast: false });
        history.navigate(Navigation::StepForward { fast: false });
        assert_eq!(history.cursor(), 2);
        history.navigate(Navigation::StepBack { fast: false });
        assert_eq!(history.cursor(), 1);
    }

    #[test]
    fn fast_steps_move_by_ten_and_clamp() {
        let mut history = history_with(25);
        history.navigate(Navigation::StepForward { fast: true });
        assert_eq!(history.cursor(), 10);
        history.navigate(Navigation::StepForward { fast: true });
        assert_eq!(history.cursor(), 20);
        history.navigate(Navigation::StepForward { fast: true });
        assert_eq!(history.cursor(), 24);
        history.navigate(Navigation::StepBack { fast: true });
        assert_eq!(history.cursor(), 14);
        history.navigate(Navigation::StepBack { fast: true });
        history.navigate(Navigation::StepBack { fast: true });
        assert_eq!(history.cursor(), 0);
    }

    #[test]
    fn first_and_last_jump_to_the_ends() {
        let mut history = history_with(7);
        history.navigate(Navigation::Last);
        assert_eq!(history.cursor(), 6);
        history.navigate(Navigation::First);
        assert_eq!(history.cursor(), 0);
    }

    #[test]
    fn navigation_on_empty_history_keeps_cursor_at_zero() {
        let mut history = History::default();
        for nav in ALL_MOVES {
            history.navigate(nav);
            assert_eq!(history.cursor(), 0);
        }
        assert!(history.current().is_none());
        assert!(history.status_line().is_none());
    }

    #[test]
    fn scenario_three_frames_of_mixed_sizes() {
        let mut history = History::default();
        history.append(Frame::blank(2, 2)).unwrap();
        history.append(Frame::blank(3, 3)).unwrap();
        history.append(Frame::blank(1, 5)).unwrap();
        assert_eq!(history.cursor(), 0);

        history.navigate(Navigation::StepForward { fast: false });
        history.navigate(Navigation::StepForward { fast: false });
        assert_eq!(history.cursor(), 2);
        let current = history.current().unwrap();
        assert_eq!((current.height, current.width), (1, 5));

        history.navigate(Navigation::StepBack { fast: true });
        assert_eq!(history.cursor(), 0);
    }

    #[test]
    fn appending_keeps_cursor_and_extends_last() {
        let mut history = history_with(2);
        history.navigate(Navigation::Last);
        assert_eq!(history.cursor(), 1);
        history.append(Frame::blank(1, 1)).unwrap();
        assert_eq!(history.cursor(), 1);
        history.navigate(Navigation::Last);
        assert_eq!(history.cursor(), 2);
    }

    #[test]
    fn malformed_frame_is_refused() {
        let mut history = history_with(1);
        let mut bad = Frame::blank(2, 2);
        bad.cells[1].push('x');
        assert!(matches!(
            history.append(bad),
            Err(FrameError::RowWidth { row: 1, .. })
        ));
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn status_line_is_one_based() {
        let mut history = history_with(3);
        history.navigate(Navigation::StepForward { fast: false });
        assert_eq!(history.status_line().unwrap(), "Index 2 / 3: f1");
    }

    #[test]
    fn zero_fast_step_is_raised_to_one() {
        let mut history = History::new(0);
        for _ in 0..3 {
            history.append(Frame::blank(1, 1)).unwrap();
        }
        history.navigate(Navigation::StepForward { fast: true });
        assert_eq!(history.cursor(), 1);
    }
}
