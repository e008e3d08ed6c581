use bit_set::BitSet;
use log::debug;
use std::collections::HashMap;
use std::fmt::{self, Debug, Formatter};

use crate::grid_config::{GridConfig, VariableId};
use crate::word_list::{WordId, WordList};

/// For one cell of a variable, how many of the variable's remaining options place each letter
/// there.
pub type LetterCounts = HashMap<char, usize>;

/// The remaining options for each variable, indexed by `VariableId`. Each domain is a set of
/// `WordId`s, so iterating one visits its words in lexicographic order.
#[derive(Clone, PartialEq, Eq)]
pub struct Domains {
    options: Vec<BitSet>,
}

impl Debug for Domains {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.options.iter().map(|options| options.len())).finish()
    }
}

impl Domains {
    /// Start every variable off with the whole word list.
    pub fn new(grid_config: &GridConfig, word_list: &WordList) -> Domains {
        let mut all_words = BitSet::with_capacity(word_list.len());
        for word_id in 0..word_list.len() {
            all_words.insert(word_id);
        }

        Domains { options: vec![all_words; grid_config.variable_count()] }
    }

    /// Remove every option whose length doesn't match its variable's length. Returns the number of
    /// options removed.
    pub fn enforce_node_consistency(&mut self, grid_config: &GridConfig, word_list: &WordList) -> usize {
        let mut removed = 0;

        for (variable_id, variable) in grid_config.variables.iter().enumerate() {
            removed += self.retain(variable_id, |word_id| word_list.word(word_id).len() == variable.length);
        }

        debug!("Node consistency removed {} options", removed);
        removed
    }

    /// Does every remaining option have the right length for its variable?
    pub fn is_node_consistent(&self, grid_config: &GridConfig, word_list: &WordList) -> bool {
        grid_config.variables.iter().enumerate().all(|(variable_id, variable)| {
            self.options[variable_id].iter().all(|word_id| word_list.word(word_id).len() == variable.length)
        })
    }

    pub fn options(&self, variable_id: VariableId) -> &BitSet {
        &self.options[variable_id]
    }

    pub fn option_count(&self, variable_id: VariableId) -> usize {
        self.options[variable_id].len()
    }

    pub fn is_exhausted(&self, variable_id: VariableId) -> bool {
        self.options[variable_id].is_empty()
    }

    pub fn contains(&self, variable_id: VariableId, word_id: WordId) -> bool {
        self.options[variable_id].contains(word_id)
    }

    /// Keep only the options for which `keep` returns true. Returns the number of options removed.
    pub fn retain<F>(&mut self, variable_id: VariableId, mut keep: F) -> usize
    where
        F: FnMut(WordId) -> bool,
    {
        let doomed: Vec<WordId> =
            self.options[variable_id].iter().filter(|&word_id| !keep(word_id)).collect();

        for &word_id in &doomed {
            self.options[variable_id].remove(word_id);
        }

        doomed.len()
    }

    /// Count the letters the remaining options of `variable_id` place in its `cell_idx`th cell.
    pub fn letter_counts(&self, word_list: &WordList, variable_id: VariableId, cell_idx: usize) -> LetterCounts {
        let mut counts = LetterCounts::new();

        for word_id in &self.options[variable_id] {
            if let Some(&letter) = word_list.word(word_id).chars.get(cell_idx) {
                *counts.entry(letter).or_insert(0) += 1;
            }
        }

        counts
    }

    /// The remaining options of `variable_id` as strings, in lexicographic order.
    pub fn words<'a>(&'a self, word_list: &'a WordList, variable_id: VariableId) -> impl Iterator<Item = &'a str> + 'a {
        self.options[variable_id].iter().map(move |word_id| word_list.word(word_id).string.as_str())
    }
}
