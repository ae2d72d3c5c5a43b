use fnv::FnvHashMap;
use speller::{Speller, SpellerHunspellDict};
use std::fmt::Debug;

use crate::catalog::DictionaryFiles;
use crate::error::{Error, Result};

/// What a loaded backend can do, so callers don't have to find out
/// through empty results.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Capabilities {
    /// Can load a dictionary from an in-memory payload.
    pub contents_loading: bool,
    pub suggestions: bool,
}

/// A spelling facility provided by the host system, which opens
/// dictionaries by language identifier only.
pub trait NativeProvider: Debug + Send + Sync {
    fn name(&self) -> &str;
    fn has_language(&self, language: &str) -> bool;
    fn open(&self, language: &str) -> anyhow::Result<Box<dyn NativeDictionary>>;
}

/// One dictionary opened by a [`NativeProvider`].
pub trait NativeDictionary: Debug + Send {
    /// Returns true if the word is found in the dictionary.
    fn check(&self, word: &str) -> bool;
    /// Suggest replacements for a misspelled word, best first.
    fn suggest(&self, word: &str) -> Vec<String>;
    fn supports_suggestions(&self) -> bool;
}

/// The hunspell-format affix engine from the `speller` crate.
#[derive(Debug)]
pub struct AffixBackend {
    speller: SpellerHunspellDict,
}

impl AffixBackend {
    pub fn load(files: &DictionaryFiles) -> Result<Self> {
        let speller =
            SpellerHunspellDict::new(&files.dic, &files.aff).map_err(|e| Error::malformed(&e))?;
        Ok(AffixBackend { speller })
    }

    /// Load from a combined payload: the affix text, a `--- dic ---`
    /// line, then the word list. The payload is fully parsed before
    /// this returns; nothing keeps a reference to it.
    pub fn from_contents(contents: &[u8]) -> Result<Self> {
        let speller = SpellerHunspellDict::from_contents(contents).map_err(|e| Error::malformed(&e))?;
        Ok(AffixBackend { speller })
    }
}

#[derive(Debug)]
pub struct NativeBackend {
    provider: String,
    dict: Box<dyn NativeDictionary>,
}

impl NativeBackend {
    /// Ask the provider for its dictionary for `language`. Any failure to
    /// open it counts as the language not being available.
    pub fn open(provider: &dyn NativeProvider, language: &str) -> Result<Self> {
        let dict = provider.open(language).map_err(|e| {
            log::debug!("{} could not open {}: {:#}", provider.name(), language, e);
            Error::DictionaryNotFound(language.to_string())
        })?;
        Ok(NativeBackend {
            provider: provider.name().to_string(),
            dict,
        })
    }
}

/// A loaded spelling engine. Each variant owns exactly one dictionary.
#[derive(Debug)]
pub enum Backend {
    Affix(AffixBackend),
    Native(NativeBackend),
}

impl Backend {
    pub fn name(&self) -> &str {
        match self {
            Backend::Affix(_) => "affix",
            Backend::Native(native) => &native.provider,
        }
    }

    pub fn capabilities(&self) -> Capabilities {
        match self {
            Backend::Affix(_) => Capabilities {
                contents_loading: true,
                suggestions: true,
            },
            Backend::Native(native) => Capabilities {
                contents_loading: false,
                suggestions: native.dict.supports_suggestions(),
            },
        }
    }

    /// Returns true if the word is correctly spelled.
    pub fn check(&self, word: &str) -> bool {
        match self {
            Backend::Affix(affix) => affix.speller.spellcheck(word),
            Backend::Native(native) => native.dict.check(word),
        }
    }

    pub fn suggest(&self, word: &str, max: usize) -> Result<Vec<String>> {
        match self {
            Backend::Affix(affix) => Ok(affix.speller.suggestions(word, max)),
            Backend::Native(native) => {
                if !native.dict.supports_suggestions() {
                    return Err(Error::UnsupportedOperation("suggestions"));
                }
                let mut suggs = native.dict.suggest(word);
                suggs.truncate(max);
                Ok(suggs)
            }
        }
    }
}

/// A native provider that keeps its word lists in memory. Useful for
/// hosts that bring their own vocabulary, and for testing.
#[derive(Clone, Debug, Default)]
pub struct MemoryProvider {
    languages: FnvHashMap<String, MemoryDictionary>,
}

#[derive(Clone, Debug, Default)]
pub struct MemoryDictionary {
    known: Vec<String>,
    suggestions: Option<FnvHashMap<String, Vec<String>>>,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Default::default()
    }

    /// Register a language with the given words. It can't make
    /// suggestions until some are added with `add_suggestions`.
    pub fn add_language(&mut self, language: &str, words: &[&str]) {
        let dict = self.languages.entry(language.to_string()).or_default();
        dict.known.extend(words.iter().map(|w| w.to_string()));
    }

    pub fn add_suggestions(&mut self, language: &str, error: &str, suggestions: &[&str]) {
        let dict = self.languages.entry(language.to_string()).or_default();
        dict.suggestions
            .get_or_insert_with(FnvHashMap::default)
            .insert(error.to_string(), suggestions.iter().map(|s| s.to_string()).collect());
    }
}

impl NativeProvider for MemoryProvider {
    fn name(&self) -> &str {
        "memory"
    }

    fn has_language(&self, language: &str) -> bool {
        self.languages.contains_key(language)
    }

    fn open(&self, language: &str) -> anyhow::Result<Box<dyn NativeDictionary>> {
        match self.languages.get(language) {
            Some(dict) => Ok(Box::new(dict.clone())),
            None => anyhow::bail!("No word list for {}", language),
        }
    }
}

impl NativeDictionary for MemoryDictionary {
    fn check(&self, word: &str) -> bool {
        self.known.iter().any(|w| w == word)
    }

    fn suggest(&self, word: &str) -> Vec<String> {
        self.suggestions
            .as_ref()
            .and_then(|suggs| suggs.get(word))
            .map_or(vec![], |v| v.to_vec())
    }

    fn supports_suggestions(&self) -> bool {
        self.suggestions.is_some()
    }
}

#[cfg(all(unix, feature = "enchant"))]
pub use self::enchant_provider::EnchantProvider;

/// Export a native provider that relies on the Enchant Rust wrapper
#[cfg(all(unix, feature = "enchant"))]
mod enchant_provider {
    use anyhow::anyhow;
    use std::fmt;

    use super::{NativeDictionary, NativeProvider};

    #[derive(Clone, Copy, Debug, Default)]
    pub struct EnchantProvider;

    struct EnchantDictionary {
        dict: enchant::Dict,
        lang: String,
    }

    // SAFETY: the dictionary handle is owned by exactly one backend and
    // is never shared, so moving it to another thread is sound.
    unsafe impl Send for EnchantDictionary {}

    impl fmt::Debug for EnchantDictionary {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.debug_struct("EnchantDictionary").field("lang", &self.lang).finish()
        }
    }

    impl NativeProvider for EnchantProvider {
        fn name(&self) -> &str {
            "enchant"
        }

        fn has_language(&self, language: &str) -> bool {
            enchant::Broker::new().request_dict(language).is_ok()
        }

        fn open(&self, language: &str) -> anyhow::Result<Box<dyn NativeDictionary>> {
            let mut broker = enchant::Broker::new();
            let dict = broker
                .request_dict(language)
                .map_err(|e| anyhow!("Could not request dict for lang '{language}': {e}"))?;
            Ok(Box::new(EnchantDictionary {
                dict,
                lang: language.to_string(),
            }))
        }
    }

    impl NativeDictionary for EnchantDictionary {
        fn check(&self, word: &str) -> bool {
            match self.dict.check(word) {
                Ok(good) => good,
                Err(e) => {
                    log::warn!("Could not check '{}' with enchant: {}", word, e);
                    true
                }
            }
        }

        fn suggest(&self, word: &str) -> Vec<String> {
            self.dict.suggest(word)
        }

        fn supports_suggestions(&self) -> bool {
            true
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const CONTENTS: &str = "SET UTF-8\nTRY oelrdhw\n--- dic ---\n2\nhello\nworld\n";

    #[test]
    fn test_affix_backend() {
        let backend = Backend::Affix(AffixBackend::from_contents(CONTENTS.as_bytes()).unwrap());
        assert!(backend.check("hello"));
        assert!(!backend.check("wrold"));
        assert_eq!(vec!["world".to_string()], backend.suggest("wrold", 1).unwrap());
        assert_eq!(
            Capabilities {
                contents_loading: true,
                suggestions: true
            },
            backend.capabilities()
        );
        assert_eq!("affix", backend.name());
    }

    #[test]
    fn test_malformed_contents() {
        let err = AffixBackend::from_contents(b"hello\nworld\n").unwrap_err();
        assert!(matches!(err, Error::MalformedDictionary(_)));
        let err = AffixBackend::from_contents(b"FLAG sideways\n--- dic ---\n1\nx\n").unwrap_err();
        assert!(matches!(err, Error::MalformedDictionary(_)));
    }

    #[test]
    fn test_native_without_suggestions() {
        let mut provider = MemoryProvider::new();
        provider.add_language("en_US", &["hello", "world"]);
        let backend = Backend::Native(NativeBackend::open(&provider, "en_US").unwrap());
        assert!(backend.check("world"));
        assert!(!backend.check("wrold"));
        assert!(!backend.capabilities().suggestions);
        assert!(!backend.capabilities().contents_loading);
        assert!(matches!(
            backend.suggest("wrold", 5),
            Err(Error::UnsupportedOperation(_))
        ));
        assert_eq!("memory", backend.name());
    }

    #[test]
    fn test_native_with_suggestions() {
        let mut provider = MemoryProvider::new();
        provider.add_language("en_US", &["hello", "world"]);
        provider.add_suggestions("en_US", "wrold", &["world", "would", "wold"]);
        let backend = Backend::Native(NativeBackend::open(&provider, "en_US").unwrap());
        assert!(backend.capabilities().suggestions);
        assert_eq!(vec!["world", "would"], backend.suggest("wrold", 2).unwrap());
        assert!(backend.suggest("asntoehsauh", 2).unwrap().is_empty());
    }

    #[test]
    fn test_native_unknown_language() {
        let provider = MemoryProvider::new();
        assert!(!provider.has_language("xx_XX"));
        assert!(matches!(
            NativeBackend::open(&provider, "xx_XX"),
            Err(Error::DictionaryNotFound(_))
        ));
    }
}
