//! Fixtures and a brute-force reference solver shared by the unit tests.

use crate::backtracking_search::Choice;
use crate::grid_config::{Direction, GridConfig, Variable};
use crate::word_list::{WordId, WordList};

/// A word list built the same way the binary builds one from a file.
pub fn words(strings: &[&str]) -> WordList {
    WordList::parse(&strings.join("\n"))
}

/// A 1-row grid holding a single across entry.
pub fn single_slot(length: usize) -> GridConfig {
    GridConfig::from_variables(length, 1, vec![Variable::new(0, 0, Direction::Across, length)])
        .expect("valid slot")
}

/// ###
///  #
///  #
pub fn crossing_pair() -> GridConfig {
    GridConfig::from_template_string("###\n # \n # ").expect("valid template")
}

/// ##
/// ##
pub fn interlocked_block() -> GridConfig {
    GridConfig::from_template_string("##\n##").expect("valid template")
}

/// Every fill of the grid, found by trying every combination of same-length words. Each fill is
/// indexed by variable id.
pub fn all_solutions(grid_config: &GridConfig, word_list: &WordList) -> Vec<Vec<WordId>> {
    fn extend(
        grid_config: &GridConfig,
        word_list: &WordList,
        partial: &mut Vec<WordId>,
        solutions: &mut Vec<Vec<WordId>>,
    ) {
        let variable_id = partial.len();
        if variable_id == grid_config.variable_count() {
            solutions.push(partial.clone());
            return;
        }

        for word_id in 0..word_list.len() {
            if word_list.word(word_id).len() != grid_config.variable(variable_id).length {
                continue;
            }
            partial.push(word_id);
            let choices: Vec<Choice> = partial
                .iter()
                .enumerate()
                .map(|(variable_id, &word_id)| Choice { variable_id, word_id })
                .collect();
            if is_valid_fill(grid_config, word_list, &choices) {
                extend(grid_config, word_list, partial, solutions);
            }
            partial.pop();
        }
    }

    let mut solutions = vec![];
    extend(grid_config, word_list, &mut vec![], &mut solutions);
    solutions
}

/// Do the choices use the right lengths, agree at every crossing, and never repeat a word?
pub fn is_valid_fill(grid_config: &GridConfig, word_list: &WordList, choices: &[Choice]) -> bool {
    choices.iter().all(|choice| {
        let word = word_list.word(choice.word_id);

        word.len() == grid_config.variable(choice.variable_id).length
            && choices.iter().all(|other| {
                if other.variable_id == choice.variable_id {
                    return true;
                }
                if other.word_id == choice.word_id {
                    return false;
                }
                match grid_config.overlap(choice.variable_id, other.variable_id) {
                    Some(overlap) => {
                        word.chars.get(overlap.first)
                            == word_list.word(other.word_id).chars.get(overlap.second)
                    }
                    None => true,
                }
            })
    })
}

/// Check that the choices are a complete, valid fill of the grid.
pub fn assert_valid_fill(grid_config: &GridConfig, word_list: &WordList, choices: &[Choice]) {
    let mut variable_ids: Vec<_> = choices.iter().map(|choice| choice.variable_id).collect();
    variable_ids.sort_unstable();
    assert_eq!(
        variable_ids,
        (0..grid_config.variable_count()).collect::<Vec<_>>(),
        "every variable gets exactly one word"
    );
    assert!(is_valid_fill(grid_config, word_list, choices), "invalid fill: {:?}", choices);
}
