use crate::backtracking_search::Choice;
use crate::grid_config::GridConfig;
use crate::word_list::WordList;

/// Character used for blocked cells in rendered output.
pub const BLOCK: char = '█';

/// Place the letters of each choice onto the grid. Cells that no choice covers are `None`.
pub fn letter_grid(config: &GridConfig, word_list: &WordList, choices: &[Choice]) -> Vec<Vec<Option<char>>> {
    let mut letters: Vec<Vec<Option<char>>> = vec![vec![None; config.width]; config.height];

    for &Choice { variable_id, word_id } in choices {
        let variable = config.variable(variable_id);
        let word = word_list.word(word_id);

        for ((i, j), &letter) in variable.cells().zip(word.chars.iter()) {
            letters[i][j] = Some(letter);
        }
    }

    letters
}

/// Turn the given grid config and fill choices into a rendered string, with blocked cells drawn as
/// `BLOCK` and unfilled open cells as spaces.
pub fn render_grid(config: &GridConfig, word_list: &WordList, choices: &[Choice]) -> String {
    let letters = letter_grid(config, word_list, choices);

    config
        .structure
        .iter()
        .zip(&letters)
        .map(|(open_row, letter_row)| {
            open_row
                .iter()
                .zip(letter_row)
                .map(|(&open, letter)| if open { letter.unwrap_or(' ') } else { BLOCK })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}
