use smallvec::{smallvec, SmallVec};
use std::collections::HashMap;
use std::fmt::{self, Debug, Display, Formatter};
use std::fs;
use std::path::Path;

use crate::error::{PuzzleError, Result};
use crate::MAX_CROSSING_COUNT;

/// An identifier for a given variable, based on its index in the GridConfig's `variables` field.
pub type VariableId = usize;

/// Zero-indexed row and column for a cell in the grid, where row 0 is the top row.
pub type GridCoord = (usize, usize);

/// Direction that a variable is facing. `Across` sorts before `Down`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    Across,
    Down,
}

impl Display for Direction {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Across => write!(f, "ACROSS"),
            Direction::Down => write!(f, "DOWN"),
        }
    }
}

/// One across or down slot in the grid. Two variables are equal iff all four fields match, and the
/// derived ordering (row, then column, then direction, then length) is the order used for every
/// tie-break during search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Variable {
    pub i: usize,
    pub j: usize,
    pub direction: Direction,
    pub length: usize,
}

impl Variable {
    pub fn new(i: usize, j: usize, direction: Direction, length: usize) -> Variable {
        Variable { i, j, direction, length }
    }

    /// The coords of the `k`th cell of this variable.
    pub fn cell(&self, k: usize) -> GridCoord {
        match self.direction {
            Direction::Across => (self.i, self.j + k),
            Direction::Down => (self.i + k, self.j),
        }
    }

    /// The coords of each cell of this variable, in word order.
    pub fn cells(&self) -> impl Iterator<Item = GridCoord> + '_ {
        (0..self.length).map(move |k| self.cell(k))
    }
}

impl Display for Variable {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}) {} : {}", self.i, self.j, self.direction, self.length)
    }
}

/// The shared cell between two crossing variables, given as the character index within the first
/// variable's word and the character index within the second variable's word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Overlap {
    pub first: usize,
    pub second: usize,
}

impl Overlap {
    /// The same cell seen from the other variable's side.
    pub fn swapped(self) -> Overlap {
        Overlap { first: self.second, second: self.first }
    }
}

/// The static description of a grid: its open cells, the variables derived from them, and how the
/// variables cross each other. Nothing here changes while filling.
pub struct GridConfig {
    pub width: usize,
    pub height: usize,
    pub structure: Vec<Vec<bool>>,
    pub variables: Vec<Variable>,
    overlaps: HashMap<(VariableId, VariableId), Overlap>,
    neighbors: Vec<SmallVec<[VariableId; MAX_CROSSING_COUNT]>>,
}

impl Debug for GridConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("GridConfig")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("variables", &self.variables)
            .field("overlaps", &format!("({} crossings)", self.overlaps.len() / 2))
            .finish()
    }
}

impl GridConfig {
    /// Build a grid config from a text template. Each line is a row; whitespace marks a blocked
    /// cell and any other character marks a cell to be filled. Empty lines before and after the
    /// grid are ignored, and every remaining row must be the same width.
    pub fn from_template_string(template: &str) -> Result<GridConfig> {
        let mut rows: Vec<&str> = template
            .lines()
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .skip_while(|row| row.is_empty())
            .collect();
        while rows.last().map_or(false, |row| row.is_empty()) {
            rows.pop();
        }

        let structure: Vec<Vec<bool>> =
            rows.iter().map(|row| row.chars().map(|c| !c.is_whitespace()).collect()).collect();

        GridConfig::from_structure(structure)
    }

    /// Read a template from a file; see `from_template_string`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<GridConfig> {
        let path = path.as_ref();
        let template = fs::read_to_string(path)
            .map_err(|source| PuzzleError::Io { path: path.to_path_buf(), source })?;

        GridConfig::from_template_string(&template)
    }

    /// Build a grid config from a rectangular grid of open (`true`) and blocked (`false`) cells,
    /// deriving one variable for each maximal across or down run of at least two open cells.
    pub fn from_structure(structure: Vec<Vec<bool>>) -> Result<GridConfig> {
        let height = structure.len();
        let width = structure.first().map_or(0, |row| row.len());

        if width == 0 {
            return Err(PuzzleError::EmptyGrid);
        }
        for (row, cells) in structure.iter().enumerate() {
            if cells.len() != width {
                return Err(PuzzleError::IrregularGrid { row, expected: width, found: cells.len() });
            }
        }

        fn collect_runs(
            line_count: usize,
            line_length: usize,
            is_open: impl Fn(usize, usize) -> bool,
            mut push: impl FnMut(usize, usize, usize),
        ) {
            for line in 0..line_count {
                let mut run_start: Option<usize> = None;

                for pos in 0..=line_length {
                    let open = pos < line_length && is_open(line, pos);

                    match (open, run_start) {
                        (true, None) => run_start = Some(pos),
                        (false, Some(start)) => {
                            if pos - start > 1 {
                                push(line, start, pos - start);
                            }
                            run_start = None;
                        }
                        _ => {}
                    }
                }
            }
        }

        let mut variables: Vec<Variable> = vec![];

        collect_runs(height, width, |i, j| structure[i][j], |i, j, length| {
            variables.push(Variable::new(i, j, Direction::Across, length));
        });
        collect_runs(width, height, |j, i| structure[i][j], |j, i, length| {
            variables.push(Variable::new(i, j, Direction::Down, length));
        });

        GridConfig::build(width, height, structure, variables)
    }

    /// Build a grid config from an explicit list of variables. The open cells are exactly the cells
    /// covered by the variables.
    pub fn from_variables(width: usize, height: usize, variables: Vec<Variable>) -> Result<GridConfig> {
        let mut structure = vec![vec![false; width]; height];

        for variable in &variables {
            if variable.length < 2 {
                return Err(PuzzleError::VariableTooShort { variable: *variable });
            }
            for (i, j) in variable.cells() {
                if i >= height || j >= width {
                    return Err(PuzzleError::VariableOffGrid { variable: *variable, width, height });
                }
                structure[i][j] = true;
            }
        }

        GridConfig::build(width, height, structure, variables)
    }

    fn build(
        width: usize,
        height: usize,
        structure: Vec<Vec<bool>>,
        mut variables: Vec<Variable>,
    ) -> Result<GridConfig> {
        variables.sort();
        variables.dedup();

        // Map each cell to the variables passing through it, so that we can read the crossings
        // straight off the cells shared by two variables.
        let mut entries_by_cell: HashMap<GridCoord, SmallVec<[(VariableId, usize); 2]>> =
            HashMap::new();

        for (variable_id, variable) in variables.iter().enumerate() {
            for (cell_idx, loc) in variable.cells().enumerate() {
                entries_by_cell.entry(loc).or_insert_with(|| smallvec![]).push((variable_id, cell_idx));
            }
        }

        let mut overlaps: HashMap<(VariableId, VariableId), Overlap> = HashMap::new();
        let mut neighbors: Vec<SmallVec<[VariableId; MAX_CROSSING_COUNT]>> =
            variables.iter().map(|_| smallvec![]).collect();

        for entries in entries_by_cell.values() {
            // Entries were pushed in id order, so `a < b`.
            let (a, a_cell, b, b_cell) = match entries.as_slice() {
                [] | [_] => continue,
                &[(a, a_cell), (b, b_cell)] => (a, a_cell, b, b_cell),
                &[(a, _), (b, _), ..] => {
                    return Err(PuzzleError::VariablesOverlap { first: variables[a], second: variables[b] });
                }
            };

            // Across and down slots meet in at most one cell; anything else is a clash.
            if variables[a].direction == variables[b].direction {
                return Err(PuzzleError::VariablesOverlap { first: variables[a], second: variables[b] });
            }

            let overlap = Overlap { first: a_cell, second: b_cell };
            overlaps.insert((a, b), overlap);
            overlaps.insert((b, a), overlap.swapped());

            neighbors[a].push(b);
            neighbors[b].push(a);
        }

        for variable_neighbors in &mut neighbors {
            variable_neighbors.sort_unstable();
        }

        Ok(GridConfig { width, height, structure, variables, overlaps, neighbors })
    }

    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    pub fn variable(&self, variable_id: VariableId) -> &Variable {
        &self.variables[variable_id]
    }

    /// Look up the id of a variable, if it belongs to this grid.
    pub fn variable_id(&self, variable: &Variable) -> Option<VariableId> {
        self.variables.binary_search(variable).ok()
    }

    /// The cell shared by `x` and `y`, if any, with indices given as `(index in x, index in y)`.
    pub fn overlap(&self, x: VariableId, y: VariableId) -> Option<Overlap> {
        self.overlaps.get(&(x, y)).copied()
    }

    /// The ids of all variables crossing `variable_id`, in ascending order.
    pub fn neighbors(&self, variable_id: VariableId) -> &[VariableId] {
        &self.neighbors[variable_id]
    }
}
