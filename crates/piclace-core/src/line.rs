//! Row and column identifiers.

use std::fmt::{self, Display};

use crate::Position;

/// A single puzzle line (one row or one column).
///
/// A line is the unit the solver reasons about: each row and each column
/// carries its own hint sequence and is repeatedly re-examined in isolation
/// from the 2-D grid.
///
/// # Examples
///
/// ```
/// use piclace_core::{Line, Position};
///
/// let row = Line::row(2);
/// assert_eq!(row.position_at(4), Position::new(4, 2));
///
/// // The column crossing cell 4 of row 2:
/// assert_eq!(row.perpendicular_at(4), Line::column(4));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Line {
    /// A row identified by its y coordinate.
    Row {
        /// Row index (0-based, top to bottom).
        y: usize,
    },
    /// A column identified by its x coordinate.
    Column {
        /// Column index (0-based, left to right).
        x: usize,
    },
}

impl Line {
    /// Creates a row line.
    #[must_use]
    pub const fn row(y: usize) -> Self {
        Line::Row { y }
    }

    /// Creates a column line.
    #[must_use]
    pub const fn column(x: usize) -> Self {
        Line::Column { x }
    }

    /// Returns `true` for rows.
    #[must_use]
    pub const fn is_row(self) -> bool {
        matches!(self, Line::Row { .. })
    }

    /// Returns the row or column index of this line.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Line::Row { y } => y,
            Line::Column { x } => x,
        }
    }

    /// Returns the number of cells in this line for a `width` × `height` grid.
    #[must_use]
    pub const fn len(self, width: usize, height: usize) -> usize {
        match self {
            Line::Row { .. } => width,
            Line::Column { .. } => height,
        }
    }

    /// Converts a cell index within the line into an absolute [`Position`].
    #[must_use]
    pub const fn position_at(self, i: usize) -> Position {
        match self {
            Line::Row { y } => Position::new(i, y),
            Line::Column { x } => Position::new(x, i),
        }
    }

    /// Returns the perpendicular line crossing cell `i` of this line.
    #[must_use]
    pub const fn perpendicular_at(self, i: usize) -> Self {
        match self {
            Line::Row { .. } => Line::column(i),
            Line::Column { .. } => Line::row(i),
        }
    }

    /// Returns all lines of a `width` × `height` grid, rows first.
    pub fn all(width: usize, height: usize) -> impl Iterator<Item = Self> {
        (0..height).map(Line::row).chain((0..width).map(Line::column))
    }
}

impl Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Line::Row { y } => write!(f, "row {y}"),
            Line::Column { x } => write!(f, "column {x}"),
        }
    }
}
