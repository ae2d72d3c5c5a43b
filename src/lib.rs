//! Spellchecking for text editors and other hosts that work in UTF-16.
//!
//! A [`Spellchecker`] holds one dictionary at a time, loaded either with
//! the hunspell-format affix engine from the `speller` crate or through a
//! [`NativeProvider`] supplied by the host. Users can add and remove words
//! on top of the dictionary without changing it.
#![warn(missing_debug_implementations)]

pub mod backend;
pub mod catalog;
pub mod config;
pub mod dictionary;
mod engine;
mod error;
pub mod tokenizer;

pub use crate::backend::{Backend, Capabilities, MemoryProvider, NativeDictionary, NativeProvider};
pub use crate::catalog::DictionaryCatalog;
pub use crate::config::{BackendPreference, Config};
pub use crate::dictionary::{CustomWords, Dictionary, DictionarySource};
pub use crate::engine::{MisspelledRange, Spellchecker};
pub use crate::error::{Error, Result};
pub use crate::tokenizer::{tokenize, Tokens};
