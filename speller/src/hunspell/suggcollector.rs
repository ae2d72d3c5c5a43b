use unicode_titlecase::StrTitleCase;

use crate::hunspell::{CapStyle, SpellerHunspellDict};

/// No more than this many suggestion attempts from any one source.
const MAX_SUGGESTS_PER_SOURCE: usize = 1000;

#[derive(Clone, Debug)]
pub struct SuggCollector<'a> {
    dict: &'a SpellerHunspellDict,
    word: &'a str,
    caps: CapStyle,
    max: usize,
    suggs: Vec<String>,

    counter: usize,
    done: bool,
}

impl<'a> SuggCollector<'a> {
    pub fn new(dict: &'a SpellerHunspellDict, word: &'a str, max: usize) -> Self {
        SuggCollector {
            dict,
            word,
            caps: CapStyle::from_str(word),
            max,
            suggs: Vec::new(),
            counter: MAX_SUGGESTS_PER_SOURCE,
            done: false,
        }
    }

    /// Start counting attempts for the next suggestion generator.
    pub fn new_source(&mut self) {
        self.counter = MAX_SUGGESTS_PER_SOURCE;
    }

    pub fn has_suggestions(&self) -> bool {
        !self.suggs.is_empty()
    }

    /// Return true iff no more suggestions should be submitted
    pub fn limit(&self) -> bool {
        self.done || self.suggs.len() >= self.max || self.counter == 0
    }

    /// If the suggestion is in the dictionary as a single entry
    /// (so no affix or break checking), then it overrides all other
    /// suggestions.
    pub fn suggest_priority(&mut self, sugg: &str) {
        if self.limit() {
            return;
        }
        if sugg != self.word && self.dict.check_suggestion_priority(sugg) {
            self.suggs.clear();
            self.suggs.push(sugg.to_string());
            self.done = true;
        } else {
            self.suggest(sugg);
        }
    }

    /// Offer a candidate. Returns false once the collector wants no more,
    /// so it can be used directly as a generator callback.
    pub fn suggest(&mut self, sugg: &str) -> bool {
        if self.limit() {
            return false;
        }
        if sugg == self.word || self.suggs.iter().any(|s| s == sugg) {
            return true;
        }
        self.counter -= 1;

        // If the original word was capitalized or uppercase, then prefer
        // capitalized or uppercased suggestions. Do fall back on the
        // unmodified suggestion in case the capitalized forms are rejected.
        let recased = match self.caps {
            CapStyle::Capitalized => Some(sugg.to_titlecase()),
            CapStyle::AllCaps => Some(sugg.to_uppercase()),
            _ => None,
        };
        if let Some(cap) = recased {
            if cap != self.word
                && !self.suggs.contains(&cap)
                && self.dict.check_suggestion(&cap)
            {
                self.suggs.push(cap);
                return !self.limit();
            }
        }

        if self.dict.check_suggestion(sugg) {
            self.suggs.push(sugg.to_string());
        }
        !self.limit()
    }
}

impl<'a> IntoIterator for SuggCollector<'a> {
    type Item = String;
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.suggs.into_iter()
    }
}
