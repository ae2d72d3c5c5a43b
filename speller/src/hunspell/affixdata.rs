use anyhow::{bail, Result};
use itertools::Itertools;

use crate::affix_trie::{PrefixTrie, SuffixTrie};
use crate::hunspell::compoundrule::CompoundRule;
use crate::hunspell::condition::AffixCondition;
use crate::hunspell::replacements::Replacements;
use crate::hunspell::wordflags::WordFlags;

/// Represents the format of the flags after words in the dictionary file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FlagMode {
    /// Single-character flags
    #[default]
    CharFlags,
    /// Two-character flags
    DoubleCharFlags,
    /// Flags are comma-separated ASCII integers
    NumericFlags,
    /// Flags are Unicode codepoints in UTF-8 format
    Utf8Flags,
}

pub type AffixFlag = u32;

impl FlagMode {
    pub fn parse_flags(self, flags: &str) -> Result<Vec<AffixFlag>> {
        match self {
            FlagMode::CharFlags | FlagMode::Utf8Flags => {
                Ok(flags.chars().map(|c| c as u32).collect())
            }
            FlagMode::DoubleCharFlags => flags
                .chars()
                .chunks(2)
                .into_iter()
                .map(|pair| match pair.collect::<Vec<char>>()[..] {
                    [c1, c2] if (c1 as u32) < 256 && (c2 as u32) < 256 => {
                        Ok(c1 as u32 * 256 + c2 as u32)
                    }
                    [_, _] => bail!("Invalid characters in double flag"),
                    _ => bail!("Odd number of characters in double flags"),
                })
                .collect(),
            FlagMode::NumericFlags => {
                if flags.is_empty() {
                    return Ok(Vec::new());
                }
                flags
                    .split(',')
                    .map(|d| d.trim().parse::<AffixFlag>().map_err(anyhow::Error::from))
                    .collect()
            }
        }
    }
}

/// The flags that were assigned a special meaning by the affix file.
#[derive(Clone, Debug, Default)]
pub struct SpecialFlags {
    pub forbidden: Option<AffixFlag>,
    pub no_suggest: Option<AffixFlag>,
    pub need_affix: Option<AffixFlag>,
    pub only_in_compound: Option<AffixFlag>,
    pub keep_case: Option<AffixFlag>,
    pub circumfix: Option<AffixFlag>,
    pub compound_flag: Option<AffixFlag>,
    pub compound_begin: Option<AffixFlag>,
    pub compound_middle: Option<AffixFlag>,
    pub compound_end: Option<AffixFlag>,
}

impl SpecialFlags {
    pub fn word_flags(&self, affix_flags: &[AffixFlag]) -> WordFlags {
        let table = [
            (self.forbidden, WordFlags::Forbidden),
            (self.no_suggest, WordFlags::NoSuggest),
            (self.need_affix, WordFlags::NeedAffix),
            (self.only_in_compound, WordFlags::OnlyInCompound),
            (self.keep_case, WordFlags::KeepCase),
            (self.compound_flag, WordFlags::CompoundFlag),
            (self.compound_begin, WordFlags::CompoundBegin),
            (self.compound_middle, WordFlags::CompoundMiddle),
            (self.compound_end, WordFlags::CompoundEnd),
        ];
        let mut wf = WordFlags::empty();
        for (flag, bit) in table {
            if flag.map_or(false, |f| affix_flags.contains(&f)) {
                wf |= bit;
            }
        }
        wf
    }

    pub fn has_compounding(&self) -> bool {
        self.compound_flag.is_some() || self.compound_begin.is_some()
    }
}

/// One line of a PFX or SFX table.
#[derive(Clone, Debug)]
pub struct AffixEntry {
    pub flag: AffixFlag,
    pub allow_cross: bool,
    /// Removed from the stem before the affix is added.
    pub strip: String,
    pub affix: String,
    pub condition: AffixCondition,
    /// Continuation flags, such as CIRCUMFIX or a second-level suffix.
    pub contflags: Vec<AffixFlag>,
}

impl AffixEntry {
    pub fn has_contflag(&self, flag: Option<AffixFlag>) -> bool {
        flag.map_or(false, |f| self.contflags.contains(&f))
    }
}

#[derive(Clone, Debug)]
pub struct AffixData {
    /// The valid formats for flags used in this affix file
    pub flag_mode: FlagMode,
    pub special_flags: SpecialFlags,
    /// Affixes that can be applied to the front of a word
    pub prefixes: Vec<AffixEntry>,
    /// Affixes that can be applied to the end of a word
    pub suffixes: Vec<AffixEntry>,
    prefix_index: PrefixTrie<usize>,
    suffix_index: SuffixTrie<usize>,
    /// Replacements to try when suggesting words
    pub replacements: Replacements,
    /// Conversions applied to words before checking them
    pub iconv: Replacements,
    /// Conversions applied to suggestions before returning them
    pub oconv: Replacements,
    /// keyboard layout, used to suggest spelling fixes.
    pub keyboard_string: Option<String>,
    /// letters to try when suggesting fixes, from common to rare.
    pub try_string: Option<String>,
    /// The minimum length of words in compound words.
    pub compound_min: usize,
    pub compound_rules: Vec<CompoundRule>,
    /// Groups of related characters, most likely confusions first.
    pub related_chars: Vec<String>,
    /// Strings at which a word may be broken into separately checked
    /// pieces. `^` and `$` anchor a break to the start or end.
    pub word_breaks: Vec<String>,
    /// Allow affixes to completely remove a root
    pub fullstrip: bool,
}

impl Default for AffixData {
    fn default() -> Self {
        AffixData {
            flag_mode: FlagMode::CharFlags,
            special_flags: SpecialFlags::default(),
            prefixes: Vec::new(),
            suffixes: Vec::new(),
            prefix_index: PrefixTrie::default(),
            suffix_index: SuffixTrie::default(),
            replacements: Replacements::default(),
            iconv: Replacements::default(),
            oconv: Replacements::default(),
            keyboard_string: None,
            try_string: None,
            compound_min: 3,
            compound_rules: Vec::new(),
            related_chars: Vec::new(),
            word_breaks: Vec::new(),
            fullstrip: false,
        }
    }
}

impl AffixData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse_flags(&self, flags: &str) -> Result<Vec<AffixFlag>> {
        self.flag_mode.parse_flags(flags)
    }

    pub fn add_prefix(&mut self, entry: AffixEntry) {
        self.prefix_index.insert(&entry.affix, self.prefixes.len());
        self.prefixes.push(entry);
    }

    pub fn add_suffix(&mut self, entry: AffixEntry) {
        self.suffix_index.insert(&entry.affix, self.suffixes.len());
        self.suffixes.push(entry);
    }

    /// Call `found` with each prefix entry whose affix text starts `word`,
    /// until it returns true.
    pub fn for_each_prefix<'a>(
        &'a self,
        word: &str,
        mut found: impl FnMut(&'a AffixEntry) -> bool,
    ) -> bool {
        self.prefix_index.lookup(word, |i| found(&self.prefixes[i]))
    }

    /// Call `found` with each suffix entry whose affix text ends `word`,
    /// until it returns true.
    pub fn for_each_suffix<'a>(
        &'a self,
        word: &str,
        mut found: impl FnMut(&'a AffixEntry) -> bool,
    ) -> bool {
        self.suffix_index.lookup(word, |i| found(&self.suffixes[i]))
    }

    /// Hunspell breaks words at hyphens when the affix file doesn't
    /// say otherwise.
    pub fn use_default_breaks(&mut self) {
        if self.word_breaks.is_empty() {
            self.word_breaks = vec!["-".to_string(), "^-".to_string(), "-$".to_string()];
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_flag_modes() {
        assert_eq!(vec![65, 66], FlagMode::CharFlags.parse_flags("AB").unwrap());
        assert_eq!(
            vec![65 * 256 + 66, 67 * 256 + 68],
            FlagMode::DoubleCharFlags.parse_flags("ABCD").unwrap()
        );
        assert!(FlagMode::DoubleCharFlags.parse_flags("ABC").is_err());
        assert_eq!(vec![1, 203], FlagMode::NumericFlags.parse_flags("1,203").unwrap());
        assert!(FlagMode::NumericFlags.parse_flags("1,x").is_err());
        assert_eq!(vec![0x00e9], FlagMode::Utf8Flags.parse_flags("é").unwrap());
    }

    #[test]
    fn test_special_word_flags() {
        let special = SpecialFlags {
            forbidden: Some('!' as u32),
            no_suggest: Some('?' as u32),
            ..Default::default()
        };
        let wf = special.word_flags(&['!' as u32, 'A' as u32]);
        assert!(wf.contains(WordFlags::Forbidden));
        assert!(!wf.contains(WordFlags::NoSuggest));
    }
}
