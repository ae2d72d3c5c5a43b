#![warn(missing_debug_implementations)]

mod affix_trie;
pub mod delins;
mod hunspell;
pub mod ngram;

pub use crate::hunspell::{split_contents, SpellerHunspellDict, CONTENTS_SEPARATOR};

pub trait Speller {
    /// Returns true if the word is in the dictionary, otherwise false.
    fn spellcheck(&self, word: &str) -> bool;

    /// Returns a list of possible corrections to a misspelled word,
    /// best candidates first. The list may be empty.
    fn suggestions(&self, word: &str, max: usize) -> Vec<String>;
}
