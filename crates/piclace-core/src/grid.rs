//! The mutable cell matrix a solver works on.

use std::{fmt, str::FromStr};

use derive_more::{Display, Error};

use crate::{Cell, Line, Position, Puzzle};

/// A `width` × `height` matrix of [`Cell`] states.
///
/// All cells start [`Cell::Unknown`]. Cells only ever move from `Unknown` to
/// a decided state; a search branch that needs to undo a decision restores a
/// whole checkpointed grid instead of flipping individual cells back. The
/// grid is owned by exactly one search branch at a time.
///
/// # Examples
///
/// ```
/// use piclace_core::{Cell, Grid, Position};
///
/// let mut grid = Grid::new(2, 2);
/// grid.set(Position::new(0, 0), Cell::Filled);
/// grid.set(Position::new(1, 0), Cell::Empty);
/// assert_eq!(grid.unknown_count(), 2);
/// assert_eq!(grid.to_string(), "#.\n??\n");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
    unknown: usize,
}

impl Grid {
    /// Creates an all-[`Unknown`](Cell::Unknown) grid.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::Unknown; width * height],
            unknown: width * height,
        }
    }

    /// Returns the grid width.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Returns the grid height.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    fn index(&self, pos: Position) -> usize {
        debug_assert!(pos.x() < self.width && pos.y() < self.height);
        pos.y() * self.width + pos.x()
    }

    /// Returns the cell at `pos`.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is outside the grid.
    #[must_use]
    pub fn get(&self, pos: Position) -> Cell {
        self.cells[self.index(pos)]
    }

    /// Decides the cell at `pos`.
    ///
    /// Cells are write-once per branch: a decided cell may only be written
    /// with its current value again.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is outside the grid. In debug builds, panics if the
    /// write would flip an already decided cell.
    pub fn set(&mut self, pos: Position, cell: Cell) {
        let i = self.index(pos);
        let old = self.cells[i];
        debug_assert!(
            old == Cell::Unknown || old == cell,
            "cell {pos} already decided as {old}, refusing {cell}",
        );
        if old == Cell::Unknown && cell.is_decided() {
            self.unknown -= 1;
        }
        self.cells[i] = cell;
    }

    /// Returns the number of still-undecided cells.
    #[must_use]
    pub const fn unknown_count(&self) -> usize {
        self.unknown
    }

    /// Returns `true` once every cell is decided.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.unknown == 0
    }

    /// Returns the number of cells in `line`.
    #[must_use]
    pub const fn line_len(&self, line: Line) -> usize {
        line.len(self.width, self.height)
    }

    /// Copies the cells of `line` into `buf` (cleared first).
    pub fn copy_line_into(&self, line: Line, buf: &mut Vec<Cell>) {
        buf.clear();
        match line {
            Line::Row { y } => {
                buf.extend_from_slice(&self.cells[y * self.width..(y + 1) * self.width]);
            }
            Line::Column { x } => {
                buf.extend((0..self.height).map(|y| self.cells[y * self.width + x]));
            }
        }
    }

    /// Returns the number of undecided cells in `line`.
    #[must_use]
    pub fn line_unknown_count(&self, line: Line) -> usize {
        (0..self.line_len(line))
            .filter(|&i| self.get(line.position_at(i)) == Cell::Unknown)
            .count()
    }

    /// Iterates over all cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.cells.iter().copied()
    }

    /// Iterates over the rows as cell slices, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks_exact(self.width)
    }

    /// Returns the lengths of the maximal `Filled` runs in `line`, in order.
    ///
    /// Undecided cells terminate runs just like `Empty` cells do, so the
    /// result only describes the hints faithfully on a complete grid.
    #[must_use]
    pub fn run_lengths(&self, line: Line) -> Vec<u32> {
        let mut runs = Vec::new();
        let mut current = 0u32;
        for i in 0..self.line_len(line) {
            if self.get(line.position_at(i)) == Cell::Filled {
                current += 1;
            } else if current > 0 {
                runs.push(current);
                current = 0;
            }
        }
        if current > 0 {
            runs.push(current);
        }
        runs
    }

    /// Returns `true` if the grid is complete and every line's filled runs
    /// match the puzzle's hints exactly.
    #[must_use]
    pub fn satisfies(&self, puzzle: &Puzzle) -> bool {
        self.is_complete()
            && Line::all(self.width, self.height)
                .all(|line| self.run_lengths(line) == puzzle.hints(line).blocks())
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            for cell in row {
                write!(f, "{cell}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// An error parsing the textual grid form.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum ParseGridError {
    /// The input contained no rows.
    #[display("grid text is empty")]
    Empty,
    /// A row had a different width than the first row.
    #[display("row {row} has {found} cells, expected {expected}")]
    UnevenRows {
        /// 0-based row index.
        row: usize,
        /// Cells found in that row.
        found: usize,
        /// Cells in the first row.
        expected: usize,
    },
    /// A character was not a valid cell.
    #[display("invalid cell character {c:?} in row {row}")]
    InvalidChar {
        /// 0-based row index.
        row: usize,
        /// The offending character.
        c: char,
    },
}

impl FromStr for Grid {
    type Err = ParseGridError;

    /// Parses the character form produced by [`Display`](fmt::Display):
    /// `#` filled, `.` empty, `?` or `_` unknown, one text line per row.
    /// Blank lines and leading/trailing whitespace are ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut cells = Vec::new();
        let mut width = 0;
        let mut height = 0;
        for raw in s.lines() {
            let text = raw.trim();
            if text.is_empty() {
                continue;
            }
            let row_start = cells.len();
            for c in text.chars() {
                let cell =
                    Cell::from_char(c).ok_or(ParseGridError::InvalidChar { row: height, c })?;
                cells.push(cell);
            }
            let found = cells.len() - row_start;
            if height == 0 {
                width = found;
            } else if found != width {
                return Err(ParseGridError::UnevenRows {
                    row: height,
                    found,
                    expected: width,
                });
            }
            height += 1;
        }
        if height == 0 {
            return Err(ParseGridError::Empty);
        }
        let unknown = cells.iter().filter(|&&c| c == Cell::Unknown).count();
        Ok(Self {
            width,
            height,
            cells,
            unknown,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LineHints;

    #[test]
    fn test_new_grid_is_all_unknown() {
        let grid = Grid::new(3, 2);
        assert_eq!(grid.unknown_count(), 6);
        assert!(!grid.is_complete());
        assert!(grid.cells().all(|cell| cell == Cell::Unknown));
    }

    #[test]
    fn test_set_tracks_unknown_count() {
        let mut grid = Grid::new(2, 2);
        grid.set(Position::new(0, 1), Cell::Filled);
        assert_eq!(grid.unknown_count(), 3);
        // Re-deciding with the same value is a no-op.
        grid.set(Position::new(0, 1), Cell::Filled);
        assert_eq!(grid.unknown_count(), 3);
    }

    #[test]
    #[should_panic(expected = "already decided")]
    #[cfg(debug_assertions)]
    fn test_set_rejects_flips() {
        let mut grid = Grid::new(1, 1);
        grid.set(Position::new(0, 0), Cell::Filled);
        grid.set(Position::new(0, 0), Cell::Empty);
    }

    #[test]
    fn test_line_projection() {
        let grid: Grid = "
            #.?
            .#?
        "
        .parse()
        .unwrap();
        let mut buf = Vec::new();
        grid.copy_line_into(Line::row(1), &mut buf);
        assert_eq!(buf, [Cell::Empty, Cell::Filled, Cell::Unknown]);
        grid.copy_line_into(Line::column(2), &mut buf);
        assert_eq!(buf, [Cell::Unknown, Cell::Unknown]);
        assert_eq!(grid.line_unknown_count(Line::column(0)), 0);
        assert_eq!(grid.line_unknown_count(Line::row(0)), 1);
    }

    #[test]
    fn test_run_lengths() {
        let grid: Grid = "##.#.####".parse().unwrap();
        assert_eq!(grid.run_lengths(Line::row(0)), [2, 1, 4]);
        let grid: Grid = "...".parse().unwrap();
        assert_eq!(grid.run_lengths(Line::row(0)), Vec::<u32>::new());
    }

    #[test]
    fn test_satisfies() {
        let puzzle = Puzzle::new(
            2,
            2,
            vec![LineHints::new(vec![1]), LineHints::new(vec![1])],
            vec![LineHints::new(vec![1]), LineHints::new(vec![1])],
        );
        let diagonal: Grid = "#.\n.#".parse().unwrap();
        let anti_diagonal: Grid = ".#\n#.".parse().unwrap();
        let overfilled: Grid = "##\n.#".parse().unwrap();
        assert!(diagonal.satisfies(&puzzle));
        assert!(anti_diagonal.satisfies(&puzzle));
        assert!(!overfilled.satisfies(&puzzle));

        let incomplete: Grid = "#?\n.#".parse().unwrap();
        assert!(!incomplete.satisfies(&puzzle));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("".parse::<Grid>(), Err(ParseGridError::Empty));
        assert_eq!(
            "##\n#".parse::<Grid>(),
            Err(ParseGridError::UnevenRows {
                row: 1,
                found: 1,
                expected: 2,
            })
        );
        assert_eq!(
            "#x".parse::<Grid>(),
            Err(ParseGridError::InvalidChar { row: 0, c: 'x' })
        );
    }

    #[test]
    fn test_display_matches_parse() {
        let text = "#.\n?#\n";
        let grid: Grid = text.parse().unwrap();
        assert_eq!(grid.to_string(), text);
    }
}
