//! Hint sequences for a single line.

use std::{fmt, str::FromStr};

use derive_more::{Display, Error};

/// The hints for one row or column: the lengths of its contiguous filled
/// blocks, in order.
///
/// A hint sequence describes the line left-to-right (rows) or top-to-bottom
/// (columns). Consecutive blocks are separated by at least one empty cell, so
/// the minimal span a sequence needs is `sum(blocks) + len(blocks) - 1`.
///
/// Construction accepts any block values; semantic checks (no empty
/// sequences, no zero blocks, span fits the line) are performed by
/// [`Puzzle::validate`](crate::Puzzle::validate) so that *all* offending
/// lines can be reported together.
///
/// # Examples
///
/// ```
/// use piclace_core::LineHints;
///
/// let hints: LineHints = "1 2, 3".parse()?;
/// assert_eq!(hints.blocks(), &[1, 2, 3]);
/// assert_eq!(hints.filled_total(), 6);
/// assert_eq!(hints.min_span(), 8); // 1+2+3 blocks plus two gap cells
/// # Ok::<(), piclace_core::hint::ParseHintsError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LineHints {
    blocks: Vec<u32>,
}

impl LineHints {
    /// Creates a hint sequence from block lengths.
    #[must_use]
    pub fn new(blocks: Vec<u32>) -> Self {
        Self { blocks }
    }

    /// Returns the block lengths in line order.
    #[must_use]
    pub fn blocks(&self) -> &[u32] {
        &self.blocks
    }

    /// Returns the number of blocks.
    #[must_use]
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Returns the total number of filled cells this line requires.
    #[must_use]
    pub fn filled_total(&self) -> u32 {
        self.blocks.iter().sum()
    }

    /// Returns the minimal number of cells needed to place every block with
    /// the mandatory single-cell gaps between consecutive blocks.
    ///
    /// An empty sequence needs zero cells.
    #[must_use]
    pub fn min_span(&self) -> usize {
        if self.blocks.is_empty() {
            return 0;
        }
        self.filled_total() as usize + self.blocks.len() - 1
    }
}

impl fmt::Display for LineHints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for block in &self.blocks {
            if !first {
                write!(f, " ")?;
            }
            write!(f, "{block}")?;
            first = false;
        }
        Ok(())
    }
}

/// An error parsing a textual hint line.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum ParseHintsError {
    /// The input contained no numbers at all.
    #[display("hint line is empty")]
    Empty,
    /// A token was not a non-negative integer.
    #[display("invalid hint value: {token:?}")]
    InvalidNumber {
        /// The offending token.
        token: String,
    },
}

impl FromStr for LineHints {
    type Err = ParseHintsError;

    /// Parses numbers separated by whitespace and/or commas, e.g. `"1 2, 3"`.
    ///
    /// An input without any numbers is rejected; a line cannot be declared
    /// "all empty" through hint text.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut blocks = Vec::new();
        for token in s.split(|c: char| c.is_whitespace() || c == ',') {
            if token.is_empty() {
                continue;
            }
            let block = token.parse().map_err(|_| ParseHintsError::InvalidNumber {
                token: token.to_owned(),
            })?;
            blocks.push(block);
        }
        if blocks.is_empty() {
            return Err(ParseHintsError::Empty);
        }
        Ok(Self::new(blocks))
    }
}
