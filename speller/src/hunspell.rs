use anyhow::{bail, Context, Result};
use caseless::default_case_fold_str;
use fnv::FnvHashMap;
use rayon::prelude::*;
use smallvec::SmallVec;
use std::fs::read;
use std::path::Path;
use unicode_casing::CharExt;
use unicode_titlecase::StrTitleCase;

mod affixdata;
mod charset;
mod compoundrule;
mod condition;
mod parse_aff;
mod replacements;
mod suggcollector;
mod suggestions;
mod wordflags;

use crate::delins::delins;
use crate::hunspell::affixdata::{AffixData, AffixEntry, AffixFlag};
use crate::hunspell::parse_aff::parse_affix_data;
use crate::hunspell::suggcollector::SuggCollector;
use crate::hunspell::suggestions::{
    add_char_suggestions, bad_char_suggestions, delete_char_suggestions,
    keyboard_suggestions, related_char_suggestions, split_word_suggestions,
    swap_char_suggestions,
};
use crate::hunspell::wordflags::WordFlags;
use crate::ngram::ngram;
use crate::Speller;

/// A limit on the recursive attempts to break a word at breakpoints such as -
const MAX_WORD_BREAK_ATTEMPTS: u16 = 1000;
/// A limit on the recursive attempts to split a word into compound parts
const MAX_COMPOUND_ATTEMPTS: u16 = 1000;
/// Dictionary words whose length differs more than this from the
/// misspelled word are not considered for n-gram suggestions.
const MAX_NGRAM_LENGTH_DIFFERENCE: usize = 4;

/// The line that separates the affix text from the word list when both
/// are supplied together as one payload.
pub const CONTENTS_SEPARATOR: &str = "--- dic ---";

/// A speller that loads Hunspell dictionaries
#[derive(Clone, Debug)]
pub struct SpellerHunspellDict {
    affix_data: AffixData,
    words: FnvHashMap<String, SmallVec<[WordInfo; 1]>>,
    /// Length in chars of the longest root word. No compound part is longer.
    longest_root: usize,
}

#[derive(Clone, Debug, Default, PartialEq)]
struct WordInfo {
    word_flags: WordFlags,
    affix_flags: Vec<AffixFlag>,
}

impl WordInfo {
    fn new(word_flags: WordFlags, affix_flags: Vec<AffixFlag>) -> Self {
        WordInfo {
            word_flags,
            affix_flags,
        }
    }

    fn has_affix_flag(&self, flag: AffixFlag) -> bool {
        self.affix_flags.contains(&flag)
    }

    /// Can this entry be the root of a word with affixes?
    /// NEEDAFFIX entries are fine here, since an affix is present.
    fn usable_as_root(&self, recased: bool) -> bool {
        !self
            .word_flags
            .intersects(WordFlags::Forbidden | WordFlags::OnlyInCompound)
            && !(recased && self.word_flags.contains(WordFlags::KeepCase))
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CapStyle {
    Lowercase,
    Capitalized,
    AllCaps,
    Mixed,
    Neutral,
}

impl CapStyle {
    fn from_str(word: &str) -> Self {
        let mut iter = word.chars();
        let c1 = match iter.next() {
            Some(c1) => c1,
            None => {
                return CapStyle::Neutral;
            }
        };
        if c1.is_lowercase() {
            for c in iter {
                if c.is_uppercase() || c.is_titlecase() {
                    return CapStyle::Mixed;
                }
            }
            CapStyle::Lowercase
        } else if c1.is_uppercase() {
            let mut seen_ucase = false;
            let mut seen_lcase = false;
            for c in iter {
                if c.is_lowercase() {
                    seen_lcase = true;
                } else if c.is_uppercase() {
                    seen_ucase = true;
                } else if c.is_titlecase() {
                    return CapStyle::Mixed;
                }
            }
            if seen_ucase && seen_lcase {
                CapStyle::Mixed
            } else if seen_lcase {
                CapStyle::Capitalized
            } else {
                CapStyle::AllCaps
            }
        } else if c1.is_titlecase() {
            for c in iter {
                if c.is_uppercase() || c.is_titlecase() {
                    return CapStyle::Mixed;
                }
            }
            CapStyle::Capitalized
        } else {
            CapStyle::from_str(&word[c1.len_utf8()..])
        }
    }
}

/// Split a combined payload into its affix part and its word list part.
/// Returns `None` if the separator line is missing.
pub fn split_contents(contents: &[u8]) -> Option<(&[u8], &[u8])> {
    let mut start = 0;
    while start <= contents.len() {
        let end = contents[start..]
            .iter()
            .position(|b| *b == b'\n')
            .map_or(contents.len(), |p| start + p);
        let line = &contents[start..end];
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        if line == CONTENTS_SEPARATOR.as_bytes() {
            let dic_start = (end + 1).min(contents.len());
            return Some((&contents[..start], &contents[dic_start..]));
        }
        start = end + 1;
    }
    None
}

impl SpellerHunspellDict {
    /// Returns a Speller that uses a Hunspell-format dictionary and affix file.
    pub fn new(dictionary: &Path, affixes: &Path) -> Result<Self> {
        let aff = read(affixes).with_context(|| {
            format!("Could not read affix data from {}", affixes.display())
        })?;
        let dic = read(dictionary).with_context(|| {
            format!("Could not read words from {}", dictionary.display())
        })?;
        Self::from_bytes(&aff, &dic)
            .with_context(|| format!("Could not load {}", dictionary.display()))
    }

    /// Load from a single payload holding the affix text, a separator
    /// line, and the word list. See [`CONTENTS_SEPARATOR`].
    pub fn from_contents(contents: &[u8]) -> Result<Self> {
        match split_contents(contents) {
            Some((aff, dic)) => Self::from_bytes(aff, dic),
            None => bail!("Missing '{}' separator line", CONTENTS_SEPARATOR),
        }
    }

    /// Load from the raw bytes of an affix file and a word list. Both are
    /// decoded with the character set declared by the affix file.
    pub fn from_bytes(aff: &[u8], dic: &[u8]) -> Result<Self> {
        let enc = charset::detect(aff)?;
        let aff_text = charset::decode(enc, aff).context("Could not decode affix data")?;
        let dic_text = charset::decode(enc, dic).context("Could not decode word list")?;
        Self::from_text(&aff_text, &dic_text)
    }

    pub fn from_text(aff: &str, dic: &str) -> Result<Self> {
        let affix_data = parse_affix_data(aff).context("Could not parse affix data")?;
        let mut dict = SpellerHunspellDict {
            affix_data,
            words: FnvHashMap::default(),
            longest_root: 0,
        };

        let mut lines = dic.lines();
        // The first line is just the number of words
        match lines.next().map(str::trim) {
            Some(count) if count.parse::<usize>().is_ok() => (),
            _ => bail!("Word list must start with the number of words"),
        }
        for line in lines {
            if line.starts_with('\t') {
                // comment
                continue;
            }
            let (word, _morphs) = Self::split_morphological_fields(line);
            let (word, flagstr) = word.split_once('/').unwrap_or((word, ""));
            // If parsing the flags fails, just ignore them.
            // Real-world dictionaries have the occasional bad entry.
            let affix_flags = dict.affix_data.parse_flags(flagstr.trim()).unwrap_or_default();
            let word = word.trim();
            if !word.is_empty() {
                let word_flags = dict.affix_data.special_flags.word_flags(&affix_flags);
                let winfo = WordInfo::new(word_flags, affix_flags);
                dict.longest_root = dict.longest_root.max(word.chars().count());
                dict.words.entry(word.to_string()).or_default().push(winfo);
            }
        }
        Ok(dict)
    }

    /// The number of distinct root words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    fn split_morphological_fields(s: &str) -> (&str, Option<&str>) {
        // Parsing these is tricky because they are separated from the
        // word by a space, but the word may itself contain a space.
        // Parse them by recognizing the pattern xx:yyy with a two-char tag.
        let mut since_space: Option<(usize, usize)> = None;
        for (i, c) in s.char_indices() {
            if let Some((spos, n)) = since_space {
                if n == 2 && c == ':' {
                    return (&s[..spos], Some(s[spos + 1..].trim()));
                }
                if n < 2 && c.is_alphanumeric() {
                    since_space = Some((spos, n + 1));
                    continue;
                }
            }
            since_space = if c == ' ' || c == '\t' { Some((i, 0)) } else { None };
        }
        (s, None)
    }

    fn is_numeric(word: &str) -> bool {
        // allow numbers with dots or commas
        // allow -- at the end and - at the front
        let word = word.strip_suffix("--").unwrap_or(word);
        let word = word.strip_prefix('-').unwrap_or(word);
        let mut seen_digit = false;
        for c in word.chars() {
            if c == '.' || c == ',' {
                if !seen_digit {
                    return false;
                }
                seen_digit = false;
            } else if c.is_ascii_digit() {
                seen_digit = true;
            } else {
                return false;
            }
        }
        true
    }

    fn is_forbidden(&self, word: &str) -> bool {
        if let Some(homonyms) = self.words.get(word) {
            return homonyms
                .iter()
                .all(|winfo| winfo.word_flags.contains(WordFlags::Forbidden));
        }
        false
    }

    fn is_forbidden_or_nosuggest(&self, word: &str) -> bool {
        if let Some(homonyms) = self.words.get(word) {
            return homonyms.iter().all(|winfo| {
                winfo
                    .word_flags
                    .intersects(WordFlags::Forbidden | WordFlags::NoSuggest)
            });
        }
        false
    }

    fn has_affix_flag(&self, word: &str, flag: AffixFlag) -> bool {
        self.words
            .get(word)
            .map_or(false, |homonyms| homonyms.iter().any(|w| w.has_affix_flag(flag)))
    }

    /// Is the word in the dictionary as a complete word on its own?
    fn check_root(&self, word: &str, recased: bool) -> bool {
        self.words.get(word).map_or(false, |homonyms| {
            homonyms.iter().any(|winfo| {
                !winfo.word_flags.intersects(WordFlags::not_standalone())
                    && !(recased && winfo.word_flags.contains(WordFlags::KeepCase))
            })
        })
    }

    /// Is there a root `stem` that accepts `sfx`, and `pfx` if given?
    fn check_affixed_root(
        &self,
        stem: &str,
        recased: bool,
        sfx: Option<&AffixEntry>,
        pfx: Option<&AffixEntry>,
    ) -> bool {
        self.words.get(stem).map_or(false, |homonyms| {
            homonyms.iter().any(|winfo| {
                winfo.usable_as_root(recased)
                    && sfx.map_or(true, |s| winfo.has_affix_flag(s.flag))
                    && pfx.map_or(true, |p| {
                        // A suffix may also carry the prefix flag as a
                        // continuation flag.
                        winfo.has_affix_flag(p.flag)
                            || sfx.map_or(false, |s| s.contflags.contains(&p.flag))
                    })
            })
        })
    }

    /// Undo a suffix: returns the stem it would have been added to.
    fn strip_suffix(&self, word: &str, sfx: &AffixEntry) -> Option<String> {
        let base = word.strip_suffix(sfx.affix.as_str())?;
        if base.is_empty() && !self.affix_data.fullstrip {
            return None;
        }
        let stem = format!("{}{}", base, sfx.strip);
        if stem.is_empty() || !sfx.condition.suffix_match(&stem) {
            return None;
        }
        Some(stem)
    }

    /// Undo a prefix: returns the stem it would have been added to.
    fn strip_prefix(&self, word: &str, pfx: &AffixEntry) -> Option<String> {
        let base = word.strip_prefix(pfx.affix.as_str())?;
        if base.is_empty() && !self.affix_data.fullstrip {
            return None;
        }
        let stem = format!("{}{}", pfx.strip, base);
        if stem.is_empty() || !pfx.condition.prefix_match(&stem) {
            return None;
        }
        Some(stem)
    }

    /// Check a word that ends in a suffix, optionally combined with a
    /// prefix that was already removed.
    fn check_suffix(&self, word: &str, recased: bool, pfx: Option<&AffixEntry>) -> bool {
        let special = &self.affix_data.special_flags;
        let pfx_circumfix = pfx.map_or(false, |p| p.has_contflag(special.circumfix));
        let found = self.affix_data.for_each_suffix(word, |sfx| {
            if pfx.is_some() && !sfx.allow_cross {
                return false;
            }
            // A circumfix is only valid with both halves present
            if sfx.has_contflag(special.circumfix) != pfx_circumfix {
                return false;
            }
            if pfx.is_none() && sfx.has_contflag(special.need_affix) {
                return false;
            }
            match self.strip_suffix(word, sfx) {
                Some(stem) => self.check_affixed_root(&stem, recased, Some(sfx), pfx),
                None => false,
            }
        });
        found || (pfx.is_none() && self.check_twofold_suffix(word, recased))
    }

    /// Check a word with two suffixes, where the inner suffix allows the
    /// outer one through its continuation flags.
    fn check_twofold_suffix(&self, word: &str, recased: bool) -> bool {
        let circumfix = self.affix_data.special_flags.circumfix;
        self.affix_data.for_each_suffix(word, |outer| {
            if outer.has_contflag(circumfix) {
                return false;
            }
            let Some(stem) = self.strip_suffix(word, outer) else {
                return false;
            };
            self.affix_data.for_each_suffix(&stem, |inner| {
                if !inner.contflags.contains(&outer.flag) || inner.has_contflag(circumfix) {
                    return false;
                }
                match self.strip_suffix(&stem, inner) {
                    Some(root) => self.check_affixed_root(&root, recased, Some(inner), None),
                    None => false,
                }
            })
        })
    }

    fn check_prefix(&self, word: &str, recased: bool) -> bool {
        let special = &self.affix_data.special_flags;
        self.affix_data.for_each_prefix(word, |pfx| {
            let Some(stem) = self.strip_prefix(word, pfx) else {
                return false;
            };
            let needs_more = pfx.has_contflag(special.circumfix)
                || pfx.has_contflag(special.need_affix);
            if !needs_more && self.check_affixed_root(&stem, recased, None, Some(pfx)) {
                return true;
            }
            pfx.allow_cross && self.check_suffix(&stem, recased, Some(pfx))
        })
    }

    /// Check a word against the dictionary and try affix combinations
    fn check_affixes(&self, word: &str, recased: bool) -> bool {
        self.check_root(word, recased)
            || self.check_prefix(word, recased)
            || self.check_suffix(word, recased, None)
    }

    /// Does `word` have a root entry that may stand at this position
    /// in a compound?
    fn is_compound_part(&self, word: &str, position: WordFlags, recased: bool) -> bool {
        self.words.get(word).map_or(false, |homonyms| {
            homonyms.iter().any(|winfo| {
                !winfo.word_flags.contains(WordFlags::Forbidden)
                    && !(recased && winfo.word_flags.contains(WordFlags::KeepCase))
                    && winfo
                        .word_flags
                        .intersects(WordFlags::CompoundFlag | position)
            })
        })
    }

    /// Compounds made with COMPOUNDFLAG or COMPOUNDBEGIN and friends.
    /// `nchars` is the length of `word` in chars.
    fn check_compound_flags(
        &self,
        word: &str,
        nchars: usize,
        first: bool,
        recased: bool,
        count: &mut u16,
    ) -> bool {
        *count += 1;
        if *count > MAX_COMPOUND_ATTEMPTS {
            return false;
        }
        let min = self.affix_data.compound_min.max(1);
        let position = if first {
            WordFlags::CompoundBegin
        } else {
            WordFlags::CompoundMiddle
        };
        let mut wlen = 0;
        for (i, c) in word.char_indices() {
            wlen += 1;
            if wlen > self.longest_root || nchars - wlen < min {
                break;
            }
            if wlen < min {
                continue;
            }
            let (head, tail) = word.split_at(i + c.len_utf8());
            let tail_len = nchars - wlen;
            if self.is_compound_part(head, position, recased)
                && ((tail_len <= self.longest_root
                    && self.is_compound_part(tail, WordFlags::CompoundEnd, recased))
                    || self.check_compound_flags(tail, tail_len, false, recased, count))
            {
                return true;
            }
        }
        false
    }

    /// Compounds made with COMPOUNDRULE. The word is divided into pieces
    /// that are all directly in the dictionary (no prefix/suffix processing).
    fn check_compound_rule<'a>(
        &self,
        word: &'a str,
        start: usize,
        v: &mut Vec<&'a str>,
        count: &mut u16,
    ) -> bool {
        *count += 1;
        if *count > MAX_COMPOUND_ATTEMPTS {
            return false;
        }
        let rules = &self.affix_data.compound_rules;
        if start == word.len() {
            return v.len() > 1
                && rules
                    .iter()
                    .any(|rule| rule.matches(v, |w, flag| self.has_affix_flag(w, flag)));
        }
        let mut wlen = 0;
        for (i, c) in word[start..].char_indices() {
            wlen += 1;
            if wlen > self.longest_root {
                break;
            }
            if wlen < self.affix_data.compound_min {
                continue;
            }
            let end = start + i + c.len_utf8();
            let piece = &word[start..end];
            if !self.words.contains_key(piece) {
                continue;
            }
            // Found a possible word piece.
            // Only recurse if at least one rule would match these pieces.
            // This avoids a lot of backtracking for words that would never
            // work anyway.
            v.push(piece);
            if rules
                .iter()
                .any(|rule| rule.partial_match(v, |w, flag| self.has_affix_flag(w, flag)))
                && self.check_compound_rule(word, end, v, count)
            {
                return true;
            }
            // Then loop to try not using the piece.
            v.pop();
        }
        false
    }

    fn check_compound(&self, word: &str, recased: bool) -> bool {
        (self.affix_data.special_flags.has_compounding()
            && self.check_compound_flags(word, word.chars().count(), true, recased, &mut 0))
            || (!self.affix_data.compound_rules.is_empty()
                && self.check_compound_rule(word, 0, &mut Vec::new(), &mut 0))
    }

    /// Check a word against the dictionary and try word breaks, affixes
    /// and compounds
    fn check_word(&self, word: &str, recased: bool, count: &mut u16) -> bool {
        if *count > MAX_WORD_BREAK_ATTEMPTS {
            return false;
        }
        *count += 1;

        if word.is_empty() {
            return false;
        }
        if self.check_affixes(word, recased) || self.check_compound(word, recased) {
            return true;
        }

        // break patterns may be anchored with ^ or $
        // Try those first.
        for brk in self.affix_data.word_breaks.iter() {
            if let Some(brk) = brk.strip_prefix('^') {
                if let Some(bword) = word.strip_prefix(brk) {
                    if self.check_word(bword, recased, count) {
                        return true;
                    }
                }
            } else if let Some(brk) = brk.strip_suffix('$') {
                if let Some(bword) = word.strip_suffix(brk) {
                    if self.check_word(bword, recased, count) {
                        return true;
                    }
                }
            }
        }

        // Try breaking words into pieces.
        for brk in self.affix_data.word_breaks.iter() {
            if brk.starts_with('^') || brk.ends_with('$') {
                continue;
            }
            if let Some((worda, wordb)) = word.split_once(brk.as_str()) {
                if self.check_word(worda, recased, count)
                    && self.check_word(wordb, recased, count)
                {
                    return true;
                }
            }
        }
        false
    }

    fn check_recased(&self, word: &str) -> bool {
        let mut count = 0u16;
        !self.is_forbidden(word) && self.check_word(word, true, &mut count)
    }

    /// Check the word as written, then with the case changes that are
    /// normal in running text: sentence starts and all-caps emphasis.
    fn check_cased(&self, word: &str) -> bool {
        let mut count = 0u16;
        if self.check_word(word, false, &mut count) {
            return true;
        }
        match CapStyle::from_str(word) {
            CapStyle::Capitalized => self.check_recased(&word.to_lowercase()),
            CapStyle::AllCaps => {
                self.check_recased(&word.to_lowercase())
                    || self.check_recased(&word.to_titlecase_lower_rest())
            }
            _ => false,
        }
    }

    fn check_suggestion(&self, word: &str) -> bool {
        if !word.chars().any(char::is_alphabetic) {
            return false;
        }
        // If the suggestion is two words, check both
        if let Some((worda, wordb)) = word.split_once(' ') {
            return self.check_suggestion(worda) && self.check_suggestion(wordb);
        }
        !self.is_forbidden_or_nosuggest(word) && self.check_cased(word)
    }

    fn check_suggestion_priority(&self, word: &str) -> bool {
        self.words.get(word).map_or(false, |homonyms| {
            homonyms
                .iter()
                .any(|winfo| !winfo.word_flags.intersects(WordFlags::not_suggestible()))
        })
    }

    /// Last resort: rank all suggestible dictionary roots by n-gram
    /// similarity to the word.
    fn ngram_suggestions(&self, word: &str, max: usize) -> Vec<String> {
        let folded: Vec<char> = default_case_fold_str(word).chars().collect();
        let wlen = folded.len();
        let mut scored: Vec<(usize, usize, &str)> = self
            .words
            .par_iter()
            .filter(|(_, homonyms)| {
                homonyms
                    .iter()
                    .any(|winfo| !winfo.word_flags.intersects(WordFlags::not_suggestible()))
            })
            .filter_map(|(root, _)| {
                let rchars: Vec<char> = default_case_fold_str(root).chars().collect();
                if rchars.len().abs_diff(wlen) > MAX_NGRAM_LENGTH_DIFFERENCE {
                    return None;
                }
                let score = ngram(3, &folded, &rchars);
                if score < wlen {
                    return None;
                }
                let distance = delins(&folded, &rchars, wlen);
                Some((score, distance, root.as_str()))
            })
            .collect();
        scored.sort_unstable_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)).then(a.2.cmp(b.2)));

        let caps = CapStyle::from_str(word);
        scored
            .into_iter()
            .map(|(_, _, root)| match (caps, CapStyle::from_str(root)) {
                (CapStyle::Capitalized, CapStyle::Lowercase) => root.to_titlecase(),
                (CapStyle::AllCaps, _) => root.to_uppercase(),
                _ => root.to_string(),
            })
            .filter(|sugg| sugg != word && !self.is_forbidden(sugg))
            .take(max)
            .collect()
    }
}

impl Speller for SpellerHunspellDict {
    fn spellcheck(&self, word: &str) -> bool {
        let word = self.affix_data.iconv.conv(word.trim());
        if word.is_empty() || Self::is_numeric(&word) {
            return true;
        }
        if self.is_forbidden(&word) {
            return false;
        }
        self.check_cased(&word)
    }

    fn suggestions(&self, word: &str, max: usize) -> Vec<String> {
        let word = self.affix_data.iconv.conv(word.trim());
        if word.is_empty() || max == 0 {
            return Vec::new();
        }
        let mut collector = SuggCollector::new(self, &word, max);

        // Try lowercased, capitalized, or all caps
        collector.suggest_priority(&word.to_lowercase());
        collector.suggest_priority(&word.to_titlecase_lower_rest());
        collector.suggest_priority(&word.to_uppercase());

        if !self.affix_data.replacements.is_empty() {
            collector.new_source();
            self.affix_data
                .replacements
                .suggest(&word, |sugg| collector.suggest(&sugg));
        }

        collector.new_source();
        related_char_suggestions(&self.affix_data.related_chars, &word, |sugg| {
            collector.suggest(&sugg)
        });

        if let Some(keyboard) = &self.affix_data.keyboard_string {
            collector.new_source();
            keyboard_suggestions(keyboard, &word, |sugg| collector.suggest(&sugg));
        }

        collector.new_source();
        delete_char_suggestions(&word, |sugg| collector.suggest(&sugg));

        collector.new_source();
        swap_char_suggestions(&word, |sugg| collector.suggest(&sugg));

        if let Some(try_chars) = &self.affix_data.try_string {
            collector.new_source();
            add_char_suggestions(&word, try_chars, |sugg| collector.suggest(&sugg));
            collector.new_source();
            bad_char_suggestions(&word, try_chars, |sugg| collector.suggest(&sugg));
        }

        collector.new_source();
        split_word_suggestions(&word, |sugg| collector.suggest(&sugg));

        let suggs: Vec<String> = if collector.has_suggestions() {
            collector.into_iter().collect()
        } else {
            self.ngram_suggestions(&word, max)
        };
        suggs
            .into_iter()
            .map(|sugg| self.affix_data.oconv.conv(&sugg))
            .collect()
    }
}
