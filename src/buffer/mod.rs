//! Buffer module: Core data structures for the double-buffered display.
//!
//! This module contains:
//! - [`Cell`]: The atomic unit of display
//! - [`Grid`]: A matrix of cells representing the terminal screen
//! - [`Color`], [`Modifiers`], [`Style`]: Cell attributes
//! - [`diff`]: Diffing engine for generating minimal ANSI sequences

mod cell;
mod grid;
pub mod diff;

pub use cell::{Cell, CellFlags, Color, Modifiers, Style};
pub use grid::Grid;
