//! Splitting UTF-16 text into candidate words.
//!
//! A word is a run of letters and numbers, possibly with combining marks
//! after them. Apostrophes and hyphens join two such runs into one word
//! (as in "don't" or "well-known") but are not part of a word on their
//! own. Everything else separates words, including unpaired surrogates.
//!
//! All positions are UTF-16 code unit offsets, so a character outside the
//! basic multilingual plane takes up two positions and is never split.
use std::iter::FusedIterator;
use std::ops::Range;
use unicode_categories::UnicodeCategories;

/// U+2019 is the unicode apostrophe, U+2010 and U+2011 are the unicode
/// hyphen and non-breaking hyphen.
const JOINERS: [char; 5] = ['\'', '\u{2019}', '-', '\u{2010}', '\u{2011}'];

fn starts_word(c: char) -> bool {
    c.is_letter() || c.is_number()
}

fn continues_word(c: char) -> bool {
    starts_word(c) || c.is_mark()
}

/// Decode the character at `pos`. Returns `None` for an unpaired
/// surrogate, along with the number of code units consumed.
fn char_at(text: &[u16], pos: usize) -> (Option<char>, usize) {
    match char::decode_utf16(text[pos..].iter().copied()).next() {
        Some(Ok(c)) => (Some(c), c.len_utf16()),
        _ => (None, 1),
    }
}

/// Iterator over the word spans of a text. Created by [`tokenize`].
#[derive(Clone, Debug)]
pub struct Tokens<'a> {
    text: &'a [u16],
    pos: usize,
}

pub fn tokenize(text: &[u16]) -> Tokens<'_> {
    Tokens { text, pos: 0 }
}

impl<'a> Tokens<'a> {
    fn peek(&self, pos: usize) -> (Option<char>, usize) {
        if pos >= self.text.len() {
            (None, 0)
        } else {
            char_at(self.text, pos)
        }
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Range<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        // Skip separators
        loop {
            if self.pos >= self.text.len() {
                return None;
            }
            let (c, len) = self.peek(self.pos);
            if c.map_or(false, starts_word) {
                break;
            }
            self.pos += len;
        }

        let start = self.pos;
        while self.pos < self.text.len() {
            let (c, len) = self.peek(self.pos);
            let Some(c) = c else {
                break;
            };
            if continues_word(c) {
                self.pos += len;
            } else if JOINERS.contains(&c)
                && self.peek(self.pos + len).0.map_or(false, starts_word)
            {
                self.pos += len;
            } else {
                break;
            }
        }
        Some(start..self.pos)
    }
}

impl<'a> FusedIterator for Tokens<'a> {}
