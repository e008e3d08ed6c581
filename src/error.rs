//! Errors raised while building a puzzle, before any solving starts.
//!
//! An unsatisfiable puzzle is not an error; see `FillFailure` for that.

use std::path::PathBuf;

use thiserror::Error;

use crate::grid_config::Variable;

#[derive(Debug, Error)]
pub enum PuzzleError {
    #[error("grid structure has no rows")]
    EmptyGrid,

    #[error("grid row {row} has {found} cells, expected {expected}")]
    IrregularGrid {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("{variable} is shorter than two cells")]
    VariableTooShort { variable: Variable },

    #[error("{variable} runs off the {width}x{height} grid")]
    VariableOffGrid {
        variable: Variable,
        width: usize,
        height: usize,
    },

    #[error("{first} and {second} overlap")]
    VariablesOverlap { first: Variable, second: Variable },

    #[error("word list is empty")]
    EmptyVocabulary,

    #[error("no word of length {length} in word list (needed by {variable})")]
    NoWordsOfLength { variable: Variable, length: usize },

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, PuzzleError>;
