// src/frame.rs

//! A single recorded snapshot: a rectangular character grid plus a message.

use thiserror::Error;

/// Grid character that marks a cell as empty. Empty cells get their own fill
/// colour and no glyph.
pub const EMPTY_CELL: char = '-';

/// How a single cell is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Empty,
    Filled(char),
}

impl CellKind {
    pub fn from_char(c: char) -> Self {
        if c == EMPTY_CELL {
            CellKind::Empty
        } else {
            CellKind::Filled(c)
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    #[error("frame declares {expected} rows but has {actual}")]
    RowCount { expected: usize, actual: usize },
    #[error("row {row} has {actual} characters, expected {expected}")]
    RowWidth {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("cell ({row}, {col}) is outside a {height}x{width} frame")]
    OutOfBounds {
        row: usize,
        col: usize,
        height: usize,
        width: usize,
    },
}

/// One snapshot of the grid.
///
/// `cells` must hold exactly `height` rows of exactly `width` characters each;
/// `validate` checks this and `History::append` refuses frames that fail it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Frame {
    pub height: usize,
    pub width: usize,
    pub message: String,
    pub cells: Vec<String>,
}

impl Frame {
    /// A `height` x `width` frame filled with spaces and an empty message.
    pub fn blank(height: usize, width: usize) -> Self {
        Frame {
            height,
            width,
            message: String::new(),
            cells: vec![" ".repeat(width); height],
        }
    }

    /// Builds a frame from its rows, taking the dimensions from the data.
    /// The width is that of the first row; ragged rows are caught by `validate`.
    pub fn from_rows<I, S>(message: impl Into<String>, rows: I) -> Result<Self, FrameError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let cells: Vec<String> = rows.into_iter().map(Into::into).collect();
        let width = cells.first().map_or(0, |r| r.chars().count());
        let frame = Frame {
            height: cells.len(),
            width,
            message: message.into(),
            cells,
        };
        frame.validate()?;
        Ok(frame)
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Checks the row/column invariant.
    pub fn validate(&self) -> Result<(), FrameError> {
        if self.cells.len() != self.height {
            return Err(FrameError::RowCount {
                expected: self.height,
                actual: self.cells.len(),
            });
        }
        for (row, line) in self.cells.iter().enumerate() {
            let actual = line.chars().count();
            if actual != self.width {
                return Err(FrameError::RowWidth {
                    row,
                    expected: self.width,
                    actual,
                });
            }
        }
        Ok(())
    }

    /// Overwrites one cell. Intended for producers filling a `blank` frame.
    pub fn set_cell(&mut self, row: usize, col: usize, ch: char) -> Result<(), FrameError> {
        let out_of_bounds = FrameError::OutOfBounds {
            row,
            col,
            height: self.height,
            width: self.width,
        };
        if col >= self.width {
            return Err(out_of_bounds);
        }
        let line = self.cells.get_mut(row).ok_or(out_of_bounds)?;
        *line = line
            .chars()
            .enumerate()
            .map(|(j, c)| if j == col { ch } else { c })
            .collect();
        Ok(())
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<CellKind> {
        self.cells
            .get(row)
            .and_then(|line| line.chars().nth(col))
            .map(CellKind::from_char)
    }

    /// Iterates over every cell in row-major order as `(row, col, kind)`.
    pub fn iter_cells(&self) -> impl Iterator<Item = (usize, usize, CellKind)> + '_ {
        self.cells.iter().enumerate().flat_map(|(i, line)| {
            line.chars()
                .enumerate()
                .map(move |(j, c)| (i, j, CellKind::from_char(c)))
        })
    }
}
