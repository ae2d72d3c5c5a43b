use home::home_dir;
use std::env::current_exe;
use std::fs::read_dir;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// The two files that make up a hunspell-format dictionary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DictionaryFiles {
    pub dic: PathBuf,
    pub aff: PathBuf,
}

impl DictionaryFiles {
    fn in_dir(dir: &Path, language: &str) -> Self {
        DictionaryFiles {
            dic: dir.join(format!("{}.dic", language)),
            aff: dir.join(format!("{}.aff", language)),
        }
    }

    fn exist(&self) -> bool {
        self.dic.is_file() && self.aff.is_file()
    }
}

/// Finds installed dictionaries along a directory search path.
#[derive(Clone, Debug)]
pub struct DictionaryCatalog {
    search_path: Vec<PathBuf>,
}

/// Expand a leading `$HOME` or `$EXE` in a search path entry.
pub fn expand_dir(dir: &Path) -> Option<PathBuf> {
    if let Ok(path) = dir.strip_prefix("$HOME") {
        Some(home_dir()?.join(path))
    } else if let Ok(path) = dir.strip_prefix("$EXE") {
        match current_exe() {
            Ok(exe) => Some(exe.parent()?.join(path)),
            Err(_) => None,
        }
    } else {
        Some(dir.to_path_buf())
    }
}

/// A language identifier is used as a file name, so it must not be able
/// to point anywhere else.
pub fn validate_language(language: &str) -> Result<()> {
    if language.is_empty() {
        return Err(Error::BadArgument("empty language".to_string()));
    }
    if language.contains(|c| c == '/' || c == '\\' || c == '\0') || language.contains("..") {
        return Err(Error::BadArgument(format!("invalid language {:?}", language)));
    }
    Ok(())
}

/// List the base names of the dictionaries in `dir` that have both an
/// `.aff` and a `.dic` file. A missing or unreadable directory has none.
pub fn list(dir: &Path) -> Vec<String> {
    let entries = match read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            log::debug!("Could not read dictionary directory {}: {}", dir.display(), err);
            return Vec::new();
        }
    };
    let mut names: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| {
            let path = entry.path();
            if path.extension()? != "dic" || !path.is_file() {
                return None;
            }
            let name = path.file_stem()?.to_str()?;
            if dir.join(format!("{}.aff", name)).is_file() {
                Some(name.to_string())
            } else {
                None
            }
        })
        .collect();
    names.sort();
    names.dedup();
    names
}

impl DictionaryCatalog {
    pub fn new(search_path: Vec<PathBuf>) -> Self {
        DictionaryCatalog { search_path }
    }

    fn expanded_dirs(&self) -> impl Iterator<Item = PathBuf> + '_ {
        self.search_path.iter().filter_map(|dir| {
            let expanded = expand_dir(dir);
            if expanded.is_none() {
                log::warn!("Could not expand path {}", dir.display());
            }
            expanded
        })
    }

    /// List the dictionaries in `dir`, or everywhere on the search path
    /// if no directory is given. Sorted and without duplicates.
    pub fn list(&self, dir: Option<&Path>) -> Vec<String> {
        if let Some(dir) = dir {
            return list(dir);
        }
        let mut names: Vec<String> = self.expanded_dirs().flat_map(|dir| list(&dir)).collect();
        names.sort();
        names.dedup();
        names
    }

    /// Look for the dictionary for `language` along the search path.
    /// The first directory that has both files wins.
    pub fn find(&self, language: &str) -> Result<DictionaryFiles> {
        validate_language(language)?;
        for dir in self.expanded_dirs() {
            let files = DictionaryFiles::in_dir(&dir, language);
            if files.exist() {
                log::debug!("Found {} dictionary in {}", language, dir.display());
                return Ok(files);
            }
            log::debug!("No {} dictionary in {}", language, dir.display());
        }
        Err(Error::DictionaryNotFound(language.to_string()))
    }
}
