//! Puzzle descriptions: declared dimensions plus row and column hints.

use std::{fmt, str::FromStr};

use derive_more::{Display, Error};

use crate::{
    Line, LineHints,
    hint::ParseHintsError,
    validation::{self, ValidationError},
};

/// A nonogram puzzle: a declared grid size and one hint sequence per row and
/// per column.
///
/// The declared `height`/`width` are carried separately from the hint vectors
/// so that a mismatch between them (a UI bug, a truncated file) is caught by
/// [`validate`](Self::validate) instead of silently re-shaping the puzzle.
///
/// # Examples
///
/// ```
/// use piclace_core::{LineHints, Puzzle};
///
/// let puzzle = Puzzle::new(
///     1,
///     1,
///     vec![LineHints::new(vec![1])],
///     vec![LineHints::new(vec![1])],
/// );
/// assert!(puzzle.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Puzzle {
    height: usize,
    width: usize,
    row_hints: Vec<LineHints>,
    col_hints: Vec<LineHints>,
}

impl Puzzle {
    /// Creates a puzzle from a declared size and hint sequences.
    ///
    /// No checking happens here; call [`validate`](Self::validate) to obtain
    /// the full list of structural problems, if any.
    #[must_use]
    pub fn new(
        height: usize,
        width: usize,
        row_hints: Vec<LineHints>,
        col_hints: Vec<LineHints>,
    ) -> Self {
        Self {
            height,
            width,
            row_hints,
            col_hints,
        }
    }

    /// Returns the declared grid height.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Returns the declared grid width.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Returns the row hint sequences, top to bottom.
    #[must_use]
    pub fn row_hints(&self) -> &[LineHints] {
        &self.row_hints
    }

    /// Returns the column hint sequences, left to right.
    #[must_use]
    pub fn col_hints(&self) -> &[LineHints] {
        &self.col_hints
    }

    /// Returns the hints for one line.
    ///
    /// # Panics
    ///
    /// Panics if the line index is out of range for this puzzle.
    #[must_use]
    pub fn hints(&self, line: Line) -> &LineHints {
        match line {
            Line::Row { y } => &self.row_hints[y],
            Line::Column { x } => &self.col_hints[x],
        }
    }

    /// Checks every structural invariant and reports **all** violations.
    ///
    /// This is a necessary, not sufficient, condition: a puzzle that
    /// validates can still turn out unsolvable once the solver crosses row
    /// and column constraints.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] listing every violated line, so a caller
    /// can flag all offending rows and columns at once.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validation::validate(self)
    }
}

impl fmt::Display for Puzzle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "rows:")?;
        for hints in &self.row_hints {
            writeln!(f, "{hints}")?;
        }
        writeln!(f, "cols:")?;
        for hints in &self.col_hints {
            writeln!(f, "{hints}")?;
        }
        Ok(())
    }
}

/// An error parsing the two-section puzzle text form.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum ParsePuzzleError {
    /// A required section header never appeared.
    #[display("missing `{section}:` section")]
    MissingSection {
        /// The absent section name (`rows` or `cols`).
        section: &'static str,
    },
    /// A hint line appeared before the first section header.
    #[display("line {line}: hint outside of a `rows:`/`cols:` section")]
    OutsideSection {
        /// 1-based input line number.
        line: usize,
    },
    /// A hint line failed to parse.
    #[display("line {line}: {source}")]
    Hints {
        /// 1-based input line number.
        line: usize,
        /// The underlying hint parse error.
        source: ParseHintsError,
    },
}

impl FromStr for Puzzle {
    type Err = ParsePuzzleError;

    /// Parses the text form used by tests and the demo binary:
    ///
    /// ```text
    /// rows:
    /// 3
    /// 1 1
    /// 3
    /// cols:
    /// 3
    /// 1 1
    /// 3
    /// ```
    ///
    /// One hint line per grid line; numbers separated by whitespace and/or
    /// commas; blank input lines are ignored. The grid dimensions are taken
    /// from the number of entries in each section.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        #[derive(Clone, Copy, PartialEq)]
        enum Section {
            None,
            Rows,
            Cols,
        }

        let mut section = Section::None;
        let mut row_hints = Vec::new();
        let mut col_hints = Vec::new();

        for (i, raw) in s.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }
            match line {
                "rows:" => section = Section::Rows,
                "cols:" => section = Section::Cols,
                _ => {
                    let hints = line
                        .parse()
                        .map_err(|source| ParsePuzzleError::Hints { line: i + 1, source })?;
                    match section {
                        Section::None => {
                            return Err(ParsePuzzleError::OutsideSection { line: i + 1 });
                        }
                        Section::Rows => row_hints.push(hints),
                        Section::Cols => col_hints.push(hints),
                    }
                }
            }
        }

        if row_hints.is_empty() {
            return Err(ParsePuzzleError::MissingSection { section: "rows" });
        }
        if col_hints.is_empty() {
            return Err(ParsePuzzleError::MissingSection { section: "cols" });
        }

        let (height, width) = (row_hints.len(), col_hints.len());
        Ok(Self::new(height, width, row_hints, col_hints))
    }
}
