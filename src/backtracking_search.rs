use bit_set::BitSet;
use instant::{Duration, Instant};
use log::{debug, trace};
use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::fmt::{self, Debug, Formatter};
use thiserror::Error;

use crate::arc_consistency::{self, Arc, ArcConsistencyResult};
use crate::domain::{Domains, LetterCounts};
use crate::error::{PuzzleError, Result};
use crate::grid_config::{GridConfig, Overlap, Variable, VariableId};
use crate::settings::{FillSettings, Propagation};
use crate::word_list::{WordId, WordList};

/// A struct recording a variable assignment made during the filling process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Choice {
    pub variable_id: VariableId,
    pub word_id: WordId,
}

/// A partial assignment of words to variables. Choices are pushed on the way down the search tree
/// and popped on the way back up, so the order of `choices` is the order they were made in.
#[derive(Clone)]
pub struct Assignment {
    choices: Vec<Choice>,
    word_by_variable: Vec<Option<WordId>>,
    assigned: BitSet,
}

impl Debug for Assignment {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Assignment")
            .field("choices", &self.choices)
            .field("variable_count", &self.word_by_variable.len())
            .finish()
    }
}

impl Assignment {
    /// An empty assignment for a grid with `variable_count` variables.
    pub fn new(variable_count: usize) -> Assignment {
        Assignment {
            choices: Vec::with_capacity(variable_count),
            word_by_variable: vec![None; variable_count],
            assigned: BitSet::with_capacity(variable_count),
        }
    }

    pub fn push(&mut self, choice: Choice) {
        assert!(
            self.assigned.insert(choice.variable_id),
            "Variable {} is already assigned",
            choice.variable_id
        );
        self.word_by_variable[choice.variable_id] = Some(choice.word_id);
        self.choices.push(choice);
    }

    pub fn pop(&mut self) -> Option<Choice> {
        let choice = self.choices.pop()?;
        self.assigned.remove(choice.variable_id);
        self.word_by_variable[choice.variable_id] = None;
        Some(choice)
    }

    pub fn get(&self, variable_id: VariableId) -> Option<WordId> {
        self.word_by_variable[variable_id]
    }

    pub fn contains(&self, variable_id: VariableId) -> bool {
        self.assigned.contains(variable_id)
    }

    pub fn len(&self) -> usize {
        self.choices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }

    /// Does every variable have a word?
    pub fn is_complete(&self) -> bool {
        self.choices.len() == self.word_by_variable.len()
    }

    pub fn choices(&self) -> &[Choice] {
        &self.choices
    }
}

/// A struct tracking statistics about the filling process.
#[derive(Debug, Clone, Default)]
pub struct Statistics {
    /// Candidate words tried during search.
    pub states: u64,
    /// Candidates whose whole subtree failed.
    pub backtracks: u64,
    /// Calls to `revise` made while establishing arc consistency.
    pub revisions: u64,
    /// Options removed by node and arc consistency.
    pub pruned: u64,
    pub duration: Duration,
}

/// A struct representing the results of a successful fill.
#[derive(Debug)]
pub struct FillSuccess {
    pub statistics: Statistics,
    pub choices: Vec<Choice>,
}

impl FillSuccess {
    /// The chosen word for each variable.
    pub fn words(&self, grid_config: &GridConfig, word_list: &WordList) -> BTreeMap<Variable, String> {
        self.choices
            .iter()
            .map(|choice| {
                (*grid_config.variable(choice.variable_id), word_list.word(choice.word_id).string.clone())
            })
            .collect()
    }
}

/// Why a fill attempt produced no assignment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FillFailure {
    /// Proven: no assignment satisfies the grid.
    #[error("no solution")]
    Unsatisfiable,

    /// The `max_states` budget ran out before the search finished.
    #[error("search gave up after {states} states")]
    SearchExhausted { states: u64 },
}

/// A puzzle being filled: the grid, the vocabulary and the current domain of each variable.
pub struct Crossword<'a> {
    grid_config: &'a GridConfig,
    word_list: &'a WordList,
    domains: Domains,
}

impl<'a> Debug for Crossword<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Crossword")
            .field("grid_config", &self.grid_config)
            .field("word_list", &self.word_list)
            .field("domains", &self.domains)
            .finish()
    }
}

impl<'a> Crossword<'a> {
    /// Set up a puzzle for filling, with every variable's domain starting as the whole word list.
    /// Fails if the word list is empty or can't possibly fit some variable.
    pub fn new(grid_config: &'a GridConfig, word_list: &'a WordList) -> Result<Crossword<'a>> {
        if word_list.is_empty() {
            return Err(PuzzleError::EmptyVocabulary);
        }

        for variable in &grid_config.variables {
            if !word_list.has_word_of_length(variable.length) {
                return Err(PuzzleError::NoWordsOfLength { variable: *variable, length: variable.length });
            }
        }

        Ok(Crossword { grid_config, word_list, domains: Domains::new(grid_config, word_list) })
    }

    pub fn domains(&self) -> &Domains {
        &self.domains
    }

    /// Remove options with the wrong length. Returns the number removed.
    pub fn enforce_node_consistency(&mut self) -> usize {
        self.domains.enforce_node_consistency(self.grid_config, self.word_list)
    }

    /// Make `x` arc-consistent with `y`; see `arc_consistency::revise`.
    pub fn revise(&mut self, x: VariableId, y: VariableId) -> bool {
        arc_consistency::revise(self.grid_config, self.word_list, &mut self.domains, x, y)
    }

    /// Run AC-3 over the current domains; see `arc_consistency::establish_arc_consistency`.
    pub fn ac3(&mut self, initial_arcs: Option<Vec<Arc>>, propagation: Propagation) -> ArcConsistencyResult {
        arc_consistency::establish_arc_consistency(
            self.grid_config,
            self.word_list,
            &mut self.domains,
            initial_arcs,
            propagation,
        )
    }

    /// How many unassigned variables cross `variable_id`?
    fn unassigned_degree(&self, variable_id: VariableId, assignment: &Assignment) -> usize {
        self.grid_config
            .neighbors(variable_id)
            .iter()
            .filter(|&&neighbor_id| !assignment.contains(neighbor_id))
            .count()
    }

    /// Choose the unassigned variable with the fewest remaining options, preferring the one that
    /// crosses the most unassigned variables, then the earliest in (row, column, direction) order.
    /// Returns `None` once the assignment is complete.
    pub fn select_unassigned_variable(&self, assignment: &Assignment) -> Option<VariableId> {
        (0..self.grid_config.variable_count())
            .filter(|&variable_id| !assignment.contains(variable_id))
            .min_by_key(|&variable_id| {
                (
                    self.domains.option_count(variable_id),
                    Reverse(self.unassigned_degree(variable_id, assignment)),
                    variable_id,
                )
            })
    }

    /// The options for `variable_id`, ordered by how many options each would rule out for the
    /// unassigned variables crossing it (fewest first), then alphabetically.
    pub fn order_domain_values(&self, variable_id: VariableId, assignment: &Assignment) -> Vec<WordId> {
        // For each unassigned crossing, how many options it has and which letters they place in the
        // shared cell. A candidate rules out every option that doesn't share its letter.
        let crossings: Vec<(Overlap, usize, LetterCounts)> = self
            .grid_config
            .neighbors(variable_id)
            .iter()
            .filter(|&&neighbor_id| !assignment.contains(neighbor_id))
            .filter_map(|&neighbor_id| {
                let overlap = self.grid_config.overlap(variable_id, neighbor_id)?;
                Some((
                    overlap,
                    self.domains.option_count(neighbor_id),
                    self.domains.letter_counts(self.word_list, neighbor_id, overlap.second),
                ))
            })
            .collect();

        let mut values: Vec<WordId> = self.domains.options(variable_id).iter().collect();

        values.sort_by_cached_key(|&word_id| {
            let word = self.word_list.word(word_id);
            let ruled_out: usize = crossings
                .iter()
                .map(|(overlap, option_count, letter_counts)| {
                    let agreeing = word
                        .chars
                        .get(overlap.first)
                        .and_then(|letter| letter_counts.get(letter))
                        .copied()
                        .unwrap_or(0);
                    option_count - agreeing
                })
                .sum();

            (ruled_out, word_id)
        });

        values
    }

    /// Would `word_id` fit in `variable_id` alongside everything already in `assignment`? It has to
    /// agree with every crossing entry and must not repeat any word already used.
    fn fits(&self, assignment: &Assignment, variable_id: VariableId, word_id: WordId) -> bool {
        let word = self.word_list.word(word_id);

        assignment.choices().iter().all(|choice| {
            if choice.word_id == word_id {
                return false;
            }

            match self.grid_config.overlap(variable_id, choice.variable_id) {
                Some(overlap) => {
                    let other = self.word_list.word(choice.word_id);
                    word.chars.get(overlap.first) == other.chars.get(overlap.second)
                }
                None => true,
            }
        })
    }

    /// Is every pair of crossing entries in `assignment` in agreement, with no word used twice?
    pub fn consistent(&self, assignment: &Assignment) -> bool {
        let choices = assignment.choices();

        choices.iter().enumerate().all(|(idx, choice)| {
            let word = self.word_list.word(choice.word_id);

            choices[idx + 1..].iter().all(|other_choice| {
                if other_choice.word_id == choice.word_id {
                    return false;
                }

                match self.grid_config.overlap(choice.variable_id, other_choice.variable_id) {
                    Some(overlap) => {
                        let other = self.word_list.word(other_choice.word_id);
                        word.chars.get(overlap.first) == other.chars.get(overlap.second)
                    }
                    None => true,
                }
            })
        })
    }

    /// Extend `assignment` until it's complete. On success the assignment holds the fill; on
    /// failure it's left exactly as it was passed in.
    pub fn backtrack(
        &self,
        assignment: &mut Assignment,
        settings: &FillSettings,
        statistics: &mut Statistics,
    ) -> std::result::Result<(), FillFailure> {
        // Nothing left to choose means every variable has a word.
        let Some(variable_id) = self.select_unassigned_variable(assignment) else {
            return Ok(());
        };

        for word_id in self.order_domain_values(variable_id, assignment) {
            if !self.fits(assignment, variable_id, word_id) {
                continue;
            }

            statistics.states += 1;
            if let Some(max_states) = settings.max_states {
                if statistics.states > max_states {
                    return Err(FillFailure::SearchExhausted { states: max_states });
                }
            }

            trace!(
                target: "backtracking_search",
                "Trying {} for {} at depth {}",
                self.word_list.word(word_id).string,
                self.grid_config.variable(variable_id),
                assignment.len(),
            );

            assignment.push(Choice { variable_id, word_id });
            debug_assert!(self.consistent(assignment));

            match self.backtrack(assignment, settings, statistics) {
                Ok(()) => return Ok(()),
                Err(FillFailure::Unsatisfiable) => {
                    assignment.pop();
                    statistics.backtracks += 1;
                }
                Err(failure) => {
                    assignment.pop();
                    return Err(failure);
                }
            }
        }

        Err(FillFailure::Unsatisfiable)
    }

    /// Enforce node and arc consistency, then search for a fill.
    pub fn solve(&mut self, settings: &FillSettings) -> std::result::Result<FillSuccess, FillFailure> {
        let start = Instant::now();
        let mut statistics = Statistics::default();

        statistics.pruned += self.enforce_node_consistency() as u64;

        match self.ac3(None, settings.propagation) {
            Ok(success) => {
                statistics.revisions += success.revisions as u64;
                statistics.pruned += success.eliminations as u64;
            }
            Err(failure) => {
                debug!(
                    "No fill possible: {} has no options left",
                    self.grid_config.variable(failure.exhausted_variable_id)
                );
                return Err(FillFailure::Unsatisfiable);
            }
        }

        let mut assignment = Assignment::new(self.grid_config.variable_count());
        let result = self.backtrack(&mut assignment, settings, &mut statistics);

        statistics.duration = start.elapsed();
        debug!("Search finished with {:?}: {:?}", result, statistics);

        result.map(|()| FillSuccess { statistics, choices: assignment.choices().to_vec() })
    }
}
