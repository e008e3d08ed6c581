use smallvec::SmallVec;
use std::collections::BTreeSet;
use std::fmt::{self, Debug, Formatter};
use std::fs;
use std::path::Path;

use crate::error::{PuzzleError, Result};
use crate::MAX_SLOT_LENGTH;

/// An identifier for a given word, based on its index in the WordList's `words` field. Words are
/// kept in lexicographic order, so comparing ids is the same as comparing the words themselves.
pub type WordId = usize;

/// A word that can be chosen for a variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    pub string: String,
    pub chars: SmallVec<[char; MAX_SLOT_LENGTH]>,
}

impl Word {
    fn new(string: String) -> Word {
        let chars = string.chars().collect();
        Word { string, chars }
    }

    /// Length in characters, which is what a variable's length is compared against.
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }
}

/// The vocabulary shared by every variable in a puzzle. Words are de-duplicated and sorted.
#[derive(Clone, Default)]
pub struct WordList {
    pub words: Vec<Word>,
}

impl Debug for WordList {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("WordList")
            .field("words", &format!("({} entries)", self.words.len()))
            .finish()
    }
}

impl WordList {
    /// Build a word list from the given words as-is, apart from trimming surrounding whitespace and
    /// skipping blanks.
    pub fn from_words<I, S>(words: I) -> WordList
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let unique: BTreeSet<String> = words
            .into_iter()
            .map(|word| word.as_ref().trim().to_string())
            .filter(|word| !word.is_empty())
            .collect();

        WordList { words: unique.into_iter().map(Word::new).collect() }
    }

    /// Parse a newline-delimited word list. Words are upper-cased.
    pub fn parse(contents: &str) -> WordList {
        WordList::from_words(contents.lines().map(|line| line.trim().to_uppercase()))
    }

    /// Read a newline-delimited word list from a file; see `parse`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<WordList> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|source| PuzzleError::Io { path: path.to_path_buf(), source })?;

        Ok(WordList::parse(&contents))
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn word(&self, word_id: WordId) -> &Word {
        &self.words[word_id]
    }

    pub fn has_word_of_length(&self, length: usize) -> bool {
        self.words.iter().any(|word| word.len() == length)
    }

    /// Look up the id of a word, if it's in the list.
    pub fn word_id(&self, string: &str) -> Option<WordId> {
        self.words.binary_search_by(|word| word.string.as_str().cmp(string)).ok()
    }
}

#[cfg(test)]
mod tests {
    use crate::word_list::WordList;

    #[test]
    fn test_parse_normalizes_and_sorts() {
        let word_list = WordList::parse("dog\n  Cat \n\nDOG\nat\r\n");

        let strings: Vec<&str> = word_list.words.iter().map(|word| word.string.as_str()).collect();
        assert_eq!(strings, vec!["AT", "CAT", "DOG"]);
        assert_eq!(word_list.word_id("CAT"), Some(1));
        assert_eq!(word_list.word_id("cat"), None);
    }

    #[test]
    fn test_length_counts_chars() {
        let word_list = WordList::from_words(["éte", "abc"]);

        assert!(word_list.words.iter().all(|word| word.len() == 3));
        assert!(word_list.has_word_of_length(3));
        assert!(!word_list.has_word_of_length(4));
    }

    #[test]
    fn test_empty_input_gives_empty_list() {
        assert!(WordList::parse("\n  \n").is_empty());
    }
}
