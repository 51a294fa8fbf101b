//! Core data structures for nonogram (picross) puzzles.
//!
//! This crate provides the fundamental types shared by the solver and by any
//! embedding front end: cell states, grid positions, row/column identifiers,
//! hint sequences, puzzles, and grids.
//!
//! # Overview
//!
//! The crate is organized around three concepts:
//!
//! 1. **Cell-level types**
//!    - [`cell`]: the three-valued cell state ([`Cell`])
//!    - [`position`]: grid coordinates ([`Position`])
//!    - [`line`]: row/column identifiers ([`Line`])
//!
//! 2. **Puzzle description**
//!    - [`hint`]: one line's ordered block lengths ([`LineHints`])
//!    - [`puzzle`]: the full hint set with declared dimensions ([`Puzzle`])
//!    - [`validation`]: exhaustive structural validation ([`ValidationError`])
//!
//! 3. **Solution state**
//!    - [`grid`]: the mutable cell matrix worked on by a solver ([`Grid`])
//!
//! # Examples
//!
//! ```
//! use piclace_core::{Cell, Grid, Line, Puzzle};
//!
//! let puzzle: Puzzle = "
//! rows:
//! 3
//! 1 1
//! 3
//! cols:
//! 3
//! 1 1
//! 3
//! "
//! .parse()?;
//! puzzle.validate()?;
//!
//! let mut grid = Grid::new(puzzle.width(), puzzle.height());
//! assert_eq!(grid.unknown_count(), 9);
//! assert_eq!(grid.line_len(Line::row(0)), 3);
//! assert!(grid.cells().all(|cell| cell == Cell::Unknown));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cell;
pub mod grid;
pub mod hint;
pub mod line;
pub mod position;
pub mod puzzle;
pub mod validation;

// Re-export commonly used types
pub use self::{
    cell::Cell,
    grid::Grid,
    hint::LineHints,
    line::Line,
    position::Position,
    puzzle::Puzzle,
    validation::{ValidationError, Violation},
};
