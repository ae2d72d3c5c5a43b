use std::path::Path;

use crate::backend::{AffixBackend, Backend, Capabilities, NativeBackend, NativeProvider};
use crate::catalog::{validate_language, DictionaryCatalog};
use crate::config::{BackendPreference, Config};
use crate::dictionary::{CustomWords, Dictionary, DictionarySource};
use crate::error::{Error, Result};
use crate::tokenizer::tokenize;

/// A misspelled word in checked text, as a half-open range of UTF-16
/// code unit offsets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MisspelledRange {
    pub start: usize,
    pub end: usize,
}

/// One spellchecking session: at most one active dictionary, plus the
/// words the user added or removed.
///
/// Sessions share nothing with each other. A session can be moved to
/// another thread, but it does no locking of its own.
#[derive(Debug)]
pub struct Spellchecker {
    config: Config,
    catalog: DictionaryCatalog,
    provider: Option<Box<dyn NativeProvider>>,
    active: Option<(Dictionary, Backend)>,
    custom: CustomWords,
}

impl Default for Spellchecker {
    fn default() -> Self {
        Spellchecker::new(Config::default())
    }
}

impl Spellchecker {
    /// Create a session without a dictionary. When built with the
    /// `enchant` feature, the system Enchant library is used as the
    /// native provider.
    pub fn new(config: Config) -> Self {
        let catalog = DictionaryCatalog::new(config.search_path.clone());
        Spellchecker {
            config,
            catalog,
            provider: default_provider(),
            active: None,
            custom: CustomWords::new(),
        }
    }

    /// Replace the native provider.
    pub fn with_provider(mut self, provider: Box<dyn NativeProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn without_provider(mut self) -> Self {
        self.provider = None;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The active dictionary, if any.
    pub fn dictionary(&self) -> Option<&Dictionary> {
        self.active.as_ref().map(|(dictionary, _)| dictionary)
    }

    pub fn language(&self) -> Option<&str> {
        self.dictionary().map(|d| d.language_code.as_str())
    }

    /// What the active backend can do. `None` when no dictionary is set.
    pub fn capabilities(&self) -> Option<Capabilities> {
        self.backend().map(Backend::capabilities)
    }

    pub fn custom_words(&self) -> &CustomWords {
        &self.custom
    }

    fn backend(&self) -> Option<&Backend> {
        self.active.as_ref().map(|(_, backend)| backend)
    }

    fn install(&mut self, dictionary: Dictionary, backend: Backend) {
        log::info!(
            "Loaded dictionary {:?} with the {} backend",
            dictionary.language_code,
            backend.name()
        );
        self.active = Some((dictionary, backend));
        if !self.config.keep_custom_words {
            self.custom.clear();
        }
    }

    fn open_native(&self, language: &str) -> Option<(Dictionary, Backend)> {
        if self.config.backend == BackendPreference::AffixOnly {
            return None;
        }
        let provider = self.provider.as_ref()?;
        match NativeBackend::open(provider.as_ref(), language) {
            Ok(native) => {
                let source = DictionarySource::Native {
                    provider: provider.name().to_string(),
                };
                Some((Dictionary::new(language, source), Backend::Native(native)))
            }
            Err(err) => {
                log::debug!("Using the affix engine for {}: {}", language, err);
                None
            }
        }
    }

    /// Select the dictionary for `language`. The previous dictionary stays
    /// active if this fails.
    pub fn try_set_dictionary(&mut self, language: &str) -> Result<()> {
        validate_language(language)?;
        let (dictionary, backend) = match self.open_native(language) {
            Some(loaded) => loaded,
            None => {
                let files = self.catalog.find(language)?;
                let affix = AffixBackend::load(&files)?;
                (Dictionary::new(language, files.into()), Backend::Affix(affix))
            }
        };
        self.install(dictionary, backend);
        Ok(())
    }

    /// Load a combined `.aff` + `.dic` payload with the affix engine.
    /// The bytes are only read during this call.
    pub fn try_set_dictionary_to_contents(&mut self, contents: &[u8]) -> Result<()> {
        self.load_contents("", contents)
    }

    fn load_contents(&mut self, language: &str, contents: &[u8]) -> Result<()> {
        if contents.is_empty() {
            return Err(Error::BadArgument("empty dictionary contents".to_string()));
        }
        let affix = AffixBackend::from_contents(contents)?;
        let dictionary = Dictionary::new(language, DictionarySource::RawContents);
        self.install(dictionary, Backend::Affix(affix));
        Ok(())
    }

    /// Select a dictionary by language, or load it from `contents` if
    /// given. With contents, the language is only used as a label.
    pub fn try_set_dictionary_with(
        &mut self,
        language: &str,
        contents: Option<&[u8]>,
    ) -> Result<()> {
        match contents {
            Some(contents) => self.load_contents(language, contents),
            None => self.try_set_dictionary(language),
        }
    }

    pub fn set_dictionary(&mut self, language: &str) -> bool {
        self.set_dictionary_with(language, None)
    }

    pub fn set_dictionary_to_contents(&mut self, contents: &[u8]) -> bool {
        report(self.try_set_dictionary_to_contents(contents))
    }

    pub fn set_dictionary_with(&mut self, language: &str, contents: Option<&[u8]>) -> bool {
        report(self.try_set_dictionary_with(language, contents))
    }

    /// Removed words are always misspelled and added words never are.
    /// Without a dictionary, nothing else is.
    pub fn is_misspelled(&self, word: &str) -> bool {
        if word.is_empty() {
            return false;
        }
        if let Some(correct) = self.custom.lookup(word) {
            return !correct;
        }
        match self.backend() {
            Some(backend) => !backend.check(word),
            None => false,
        }
    }

    /// Find the misspelled words in UTF-16 text. The ranges are in
    /// ascending order and don't overlap.
    pub fn check_spelling(&self, text: &[u16]) -> Vec<MisspelledRange> {
        if text.is_empty() || (self.active.is_none() && self.custom.is_empty()) {
            return Vec::new();
        }
        tokenize(text)
            .filter(|span| {
                let word = String::from_utf16_lossy(&text[span.clone()]);
                self.is_misspelled(&word)
            })
            .map(|span| MisspelledRange {
                start: span.start,
                end: span.end,
            })
            .collect()
    }

    /// Like `check_spelling`, for text that is already a Rust string.
    /// The ranges are still UTF-16 offsets.
    pub fn check_spelling_str(&self, text: &str) -> Vec<MisspelledRange> {
        let text: Vec<u16> = text.encode_utf16().collect();
        self.check_spelling(&text)
    }

    pub fn add(&mut self, word: &str) {
        if word.is_empty() {
            return;
        }
        log::debug!("Adding {:?} to the custom words", word);
        self.custom.add(word);
    }

    pub fn remove(&mut self, word: &str) {
        if word.is_empty() {
            return;
        }
        log::debug!("Removing {:?} from the custom words", word);
        self.custom.remove(word);
    }

    /// List the dictionaries in `dir`, or along the configured search
    /// path if no directory is given.
    pub fn get_available_dictionaries(&self, dir: Option<&Path>) -> Vec<String> {
        self.catalog.list(dir)
    }

    /// Suggested corrections, best first. Empty if the backend can't make
    /// suggestions.
    pub fn get_corrections_for_misspelling(&self, word: &str) -> Vec<String> {
        if word.is_empty() {
            return Vec::new();
        }
        let Some(backend) = self.backend() else {
            return Vec::new();
        };
        match backend.suggest(word, self.config.max_suggestions) {
            Ok(suggestions) => suggestions,
            Err(err) => {
                log::debug!("No corrections for {:?}: {}", word, err);
                Vec::new()
            }
        }
    }
}

fn report(result: Result<()>) -> bool {
    match result {
        Ok(()) => true,
        Err(err) => {
            log::warn!("Could not set dictionary: {}", err);
            false
        }
    }
}

#[cfg(all(unix, feature = "enchant"))]
fn default_provider() -> Option<Box<dyn NativeProvider>> {
    Some(Box::new(crate::backend::EnchantProvider))
}

#[cfg(not(all(unix, feature = "enchant")))]
fn default_provider() -> Option<Box<dyn NativeProvider>> {
    None
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::backend::{MemoryProvider, NativeDictionary};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    const CONTENTS: &str = "SET UTF-8\nTRY oelrdhw\n--- dic ---\n2\nhello\nworld\n";

    fn loaded() -> Spellchecker {
        let mut checker = Spellchecker::new(Config::default()).without_provider();
        assert!(checker.set_dictionary_to_contents(CONTENTS.as_bytes()));
        checker
    }

    #[test]
    fn test_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<Spellchecker>();
    }

    #[test]
    fn test_no_dictionary() {
        let mut checker = Spellchecker::new(Config::default()).without_provider();
        assert!(!checker.is_misspelled("wrold"));
        assert!(checker.check_spelling_str("hello wrold").is_empty());
        assert!(checker.get_corrections_for_misspelling("wrold").is_empty());
        assert_eq!(None, checker.capabilities());
        assert_eq!(None, checker.language());

        checker.remove("wrold");
        assert!(checker.is_misspelled("wrold"));
    }

    #[test]
    fn test_check_spelling() {
        let checker = loaded();
        assert_eq!(
            vec![MisspelledRange { start: 6, end: 11 }],
            checker.check_spelling_str("hello wrold")
        );
        assert!(checker.check_spelling(&[]).is_empty());
        assert!(!checker.is_misspelled(""));
        assert_eq!(Some(""), checker.language());
    }

    #[test]
    fn test_utf16_offsets() {
        let checker = loaded();
        // The emoji takes two code units
        assert_eq!(
            vec![MisspelledRange { start: 9, end: 14 }],
            checker.check_spelling_str("hello \u{1F600} wrold")
        );
    }

    #[test]
    fn test_overlay() {
        let mut checker = loaded();
        checker.add("wrold");
        assert!(!checker.is_misspelled("wrold"));
        checker.remove("hello");
        assert!(checker.is_misspelled("hello"));
        assert_eq!(
            vec![MisspelledRange { start: 0, end: 5 }],
            checker.check_spelling_str("hello wrold")
        );
    }

    #[test]
    fn test_overlay_reset_on_reload() {
        let mut checker = loaded();
        checker.add("wrold");
        assert!(checker.set_dictionary_to_contents(CONTENTS.as_bytes()));
        assert!(checker.is_misspelled("wrold"));

        let config = Config {
            keep_custom_words: true,
            ..Config::default()
        };
        let mut checker = Spellchecker::new(config).without_provider();
        checker.add("wrold");
        assert!(checker.set_dictionary_to_contents(CONTENTS.as_bytes()));
        assert!(!checker.is_misspelled("wrold"));
    }

    #[test]
    fn test_failed_load_keeps_dictionary() {
        let mut checker = loaded();
        checker.add("wrold");
        assert!(!checker.set_dictionary_to_contents(b"not a dictionary"));
        assert!(!checker.set_dictionary_to_contents(b""));
        assert!(!checker.set_dictionary("xx_XX"));
        assert!(!checker.is_misspelled("hello"));
        assert!(checker.is_misspelled("helo"));
        // the overlay is only reset when a load succeeds
        assert!(!checker.is_misspelled("wrold"));
    }

    #[test]
    fn test_errors() {
        let mut checker =
            Spellchecker::new(Config::default().with_search_path(Vec::<&str>::new()))
                .without_provider();
        assert!(matches!(checker.try_set_dictionary(""), Err(Error::BadArgument(_))));
        assert!(matches!(
            checker.try_set_dictionary("../etc/passwd"),
            Err(Error::BadArgument(_))
        ));
        assert!(matches!(
            checker.try_set_dictionary("en_US"),
            Err(Error::DictionaryNotFound(_))
        ));
        assert!(matches!(
            checker.try_set_dictionary_to_contents(b"SET UTF-8\n"),
            Err(Error::MalformedDictionary(_))
        ));
    }

    #[test]
    fn test_corrections() {
        let checker = loaded();
        assert_eq!(vec!["world"], checker.get_corrections_for_misspelling("wrold"));
        assert!(checker.get_corrections_for_misspelling("").is_empty());
    }

    #[test]
    fn test_native_selection() {
        let mut provider = MemoryProvider::new();
        provider.add_language("en_US", &["hello", "world"]);
        let mut checker =
            Spellchecker::new(Config::default().with_search_path(Vec::<&str>::new()))
                .with_provider(Box::new(provider));
        assert!(checker.set_dictionary("en_US"));
        assert_eq!(Some("en_US"), checker.language());
        assert_eq!(
            Some(&DictionarySource::Native {
                provider: "memory".to_string()
            }),
            checker.dictionary().map(|d| &d.source)
        );
        assert!(checker.is_misspelled("wrold"));
        assert!(checker.get_corrections_for_misspelling("wrold").is_empty());
        assert_eq!(Some(false), checker.capabilities().map(|c| c.contents_loading));

        // contents always go to the affix engine
        assert!(checker.set_dictionary_with("en_US", Some(CONTENTS.as_bytes())));
        assert_eq!(
            Some(DictionarySource::RawContents),
            checker.dictionary().map(|d| d.source.clone())
        );
        assert_eq!(vec!["world"], checker.get_corrections_for_misspelling("wrold"));
    }

    #[derive(Debug, Default)]
    struct CountingProvider {
        words: MemoryProvider,
        lookups: AtomicUsize,
        opens: AtomicUsize,
    }

    impl NativeProvider for Arc<CountingProvider> {
        fn name(&self) -> &str {
            "counting"
        }

        fn has_language(&self, language: &str) -> bool {
            self.lookups.fetch_add(1, Ordering::Relaxed);
            self.words.has_language(language)
        }

        fn open(&self, language: &str) -> anyhow::Result<Box<dyn NativeDictionary>> {
            self.opens.fetch_add(1, Ordering::Relaxed);
            self.words.open(language)
        }
    }

    #[test]
    fn test_native_opened_once() {
        let provider = Arc::new(CountingProvider::default());
        let mut checker =
            Spellchecker::new(Config::default().with_search_path(Vec::<&str>::new()))
                .with_provider(Box::new(provider.clone()));
        assert!(!checker.set_dictionary("en_US"));
        assert_eq!(1, provider.opens.load(Ordering::Relaxed));
        assert_eq!(0, provider.lookups.load(Ordering::Relaxed));
    }

    #[test]
    fn test_affix_only() {
        let mut provider = MemoryProvider::new();
        provider.add_language("en_US", &["hello", "world"]);
        let config = Config {
            backend: BackendPreference::AffixOnly,
            ..Config::default().with_search_path(Vec::<&str>::new())
        };
        let mut checker = Spellchecker::new(config).with_provider(Box::new(provider));
        assert!(matches!(
            checker.try_set_dictionary("en_US"),
            Err(Error::DictionaryNotFound(_))
        ));
    }
}
