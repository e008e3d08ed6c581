//! Fill a crossword grid with words from a word list.
//!
//! The grid is modelled as a constraint-satisfaction problem: every across or down run of two or
//! more open cells is a variable whose domain is the set of words it could hold. We prune the
//! domains with node consistency (word length) and arc consistency (letters shared with crossing
//! entries), then run a backtracking search guided by the MRV, degree and LCV heuristics.

pub mod arc_consistency;
pub mod backtracking_search;
pub mod domain;
pub mod error;
pub mod grid_config;
pub mod render;
pub mod settings;
pub mod word_list;

#[cfg(test)]
mod test_utils;

pub use backtracking_search::{Assignment, Choice, Crossword, FillFailure, FillSuccess, Statistics};
pub use error::{PuzzleError, Result};
pub use grid_config::{Direction, GridConfig, Overlap, Variable, VariableId};
pub use render::{letter_grid, render_grid};
pub use settings::{FillSettings, Propagation};
pub use word_list::{WordId, WordList};

/// The expected maximum length for a single slot.
pub const MAX_SLOT_LENGTH: usize = 21;

/// The expected maximum number of slots crossing any one slot. Each cell of a slot can be shared
/// with at most one other slot, so this is the same as the maximum slot length.
pub const MAX_CROSSING_COUNT: usize = MAX_SLOT_LENGTH;
