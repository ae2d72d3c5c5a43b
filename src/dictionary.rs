use fnv::FnvHashSet;
use std::path::PathBuf;

use crate::catalog::DictionaryFiles;

/// Where the active dictionary came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DictionarySource {
    /// A `.dic`/`.aff` pair found on the search path.
    NamedPath { dic: PathBuf, aff: PathBuf },
    /// A payload handed over by the caller. It was parsed during loading
    /// and is not kept.
    RawContents,
    /// Opened through a native provider, identified by its name.
    Native { provider: String },
}

impl From<DictionaryFiles> for DictionarySource {
    fn from(files: DictionaryFiles) -> Self {
        DictionarySource::NamedPath {
            dic: files.dic,
            aff: files.aff,
        }
    }
}

/// Description of a loaded dictionary. The word data itself lives in
/// the backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dictionary {
    /// Empty when the dictionary was loaded from contents without a name.
    pub language_code: String,
    pub source: DictionarySource,
}

impl Dictionary {
    pub fn new(language_code: &str, source: DictionarySource) -> Self {
        Dictionary {
            language_code: language_code.to_string(),
            source,
        }
    }
}

/// Words the user added or removed, which override the dictionary.
/// A word is never in both sets.
#[derive(Clone, Debug, Default)]
pub struct CustomWords {
    added: FnvHashSet<String>,
    removed: FnvHashSet<String>,
}

impl CustomWords {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn add(&mut self, word: &str) {
        self.removed.remove(word);
        self.added.insert(word.to_string());
    }

    pub fn remove(&mut self, word: &str) {
        self.added.remove(word);
        self.removed.insert(word.to_string());
    }

    /// `Some(true)` if the word is correct because it was added,
    /// `Some(false)` if it was removed, and `None` if the overlay has
    /// no opinion.
    pub fn lookup(&self, word: &str) -> Option<bool> {
        if self.removed.contains(word) {
            Some(false)
        } else if self.added.contains(word) {
            Some(true)
        } else {
            None
        }
    }

    pub fn is_added(&self, word: &str) -> bool {
        self.added.contains(word)
    }

    pub fn is_removed(&self, word: &str) -> bool {
        self.removed.contains(word)
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }

    pub fn clear(&mut self) {
        self.added.clear();
        self.removed.clear();
    }
}
