use std::env;
use std::path::PathBuf;

/// Directories searched for `<language>.aff` and `<language>.dic`, in order.
/// Entries may start with `$HOME` or `$EXE`, which are expanded to the
/// user's home directory and the directory of the running executable.
pub const DICTIONARY_SEARCH_PATH: [&str; 6] = [
    "./dicts",
    ".",
    "/usr/share/hunspell",
    "/usr/share/myspell",
    "$EXE/dicts",
    "$EXE",
];

/// Extra dictionary directories, in the platform's path list format.
pub const DICTIONARY_PATH_VAR: &str = "SPELLCHECKER_DICTIONARY_PATH";

pub const DEFAULT_MAX_SUGGESTIONS: usize = 10;

/// Which backend to use when a dictionary is selected by language only.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BackendPreference {
    /// Use the native provider if it knows the language, otherwise
    /// fall back on the affix engine.
    #[default]
    PreferNative,
    /// Never use the native provider.
    AffixOnly,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub search_path: Vec<PathBuf>,
    /// Upper bound on the number of corrections returned for a word.
    pub max_suggestions: usize,
    pub backend: BackendPreference,
    /// Keep added and removed words when a new dictionary is selected.
    pub keep_custom_words: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            search_path: DICTIONARY_SEARCH_PATH.iter().map(PathBuf::from).collect(),
            max_suggestions: DEFAULT_MAX_SUGGESTIONS,
            backend: BackendPreference::default(),
            keep_custom_words: false,
        }
    }
}

impl Config {
    /// The default configuration, with the directories listed in
    /// `SPELLCHECKER_DICTIONARY_PATH` searched first.
    pub fn from_env() -> Self {
        let mut config = Config::default();
        if let Some(paths) = env::var_os(DICTIONARY_PATH_VAR) {
            let mut search_path: Vec<PathBuf> =
                env::split_paths(&paths).filter(|p| !p.as_os_str().is_empty()).collect();
            log::debug!(
                "{} adds {} directories to the search path",
                DICTIONARY_PATH_VAR,
                search_path.len()
            );
            search_path.append(&mut config.search_path);
            config.search_path = search_path;
        }
        config
    }

    pub fn with_search_path<I, P>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.search_path = dirs.into_iter().map(Into::into).collect();
        self
    }
}
