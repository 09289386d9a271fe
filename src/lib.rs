//! **mazes** carves perfect mazes (spanning trees over a square grid) with a recursive backtracker
//! and drives a regenerate-on-demand session around it.

pub mod cells;
pub mod errors;
pub mod generators;
pub mod grid;
pub mod grid_displays;
pub mod grid_iterators;
pub mod renderers;
pub mod session;
pub mod snapshot;
pub mod units;
