use anyhow::{bail, Result};

use crate::hunspell::affixdata::{AffixFlag, FlagMode};

/// A COMPOUNDRULE pattern: a sequence of flags, each of which may be
/// marked optional (`?`) or repeatable (`*`).
#[derive(Clone, Debug, PartialEq)]
pub struct CompoundRule {
    v: Vec<CompoundElement>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum CompoundElement {
    Once(AffixFlag),
    Optional(AffixFlag),
    Multi(AffixFlag),
}
use CompoundElement::*;

impl CompoundRule {
    pub fn parse(s: &str, mode: FlagMode) -> Result<Self> {
        let mut v: Vec<CompoundElement> = Vec::new();
        let mut paren_start = None;
        for (i, c) in s.char_indices() {
            if let Some(ppos) = paren_start {
                if c == ')' {
                    let flag = mode.parse_flags(&s[ppos..i])?;
                    if flag.len() != 1 {
                        bail!("COMPOUNDRULE: expected 1 flag in ()");
                    }
                    v.push(Once(flag[0]));
                    paren_start = None;
                }
                continue;
            }
            match c {
                '(' => paren_start = Some(i + 1),
                '*' | '?' => match v.last_mut() {
                    Some(last) => match *last {
                        Once(f) => *last = if c == '*' { Multi(f) } else { Optional(f) },
                        _ => bail!("COMPOUNDRULE: {} must follow a flag", c),
                    },
                    None => bail!("COMPOUNDRULE: {} must follow a flag", c),
                },
                _ => {
                    let flag = mode.parse_flags(&s[i..i + c.len_utf8()])?;
                    v.push(Once(flag[0]));
                }
            }
        }
        if paren_start.is_some() {
            bail!("COMPOUNDRULE: unclosed (");
        }
        Ok(CompoundRule { v })
    }

    /// `partial` means the word pieces so far only need to be a valid
    /// beginning of the rule.
    fn matches_from(
        &self,
        words: &[&str],
        pos: usize,
        partial: bool,
        check: &impl Fn(&str, AffixFlag) -> bool,
    ) -> bool {
        let Some(word) = words.first() else {
            if partial {
                return true;
            }
            return self.v[pos..].iter().all(|e| !matches!(e, Once(_)));
        };
        match self.v.get(pos) {
            None => false,
            Some(Once(f)) => {
                check(word, *f) && self.matches_from(&words[1..], pos + 1, partial, check)
            }
            Some(Optional(f)) => {
                (check(word, *f) && self.matches_from(&words[1..], pos + 1, partial, check))
                    || self.matches_from(words, pos + 1, partial, check)
            }
            Some(Multi(f)) => {
                (check(word, *f) && self.matches_from(&words[1..], pos, partial, check))
                    || self.matches_from(words, pos + 1, partial, check)
            }
        }
    }

    pub fn matches(&self, words: &[&str], check: impl Fn(&str, AffixFlag) -> bool) -> bool {
        self.matches_from(words, 0, false, &check)
    }

    pub fn partial_match(&self, words: &[&str], check: impl Fn(&str, AffixFlag) -> bool) -> bool {
        self.matches_from(words, 0, true, &check)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn check(word: &str, flag: AffixFlag) -> bool {
        // digits carry flag 'n', the "th" ending carries flag 't'
        match flag {
            f if f == 'n' as u32 => word.chars().all(|c| c.is_ascii_digit()),
            f if f == 't' as u32 => word == "th",
            _ => false,
        }
    }

    #[test]
    fn test_ordinal_rule() {
        let rule = CompoundRule::parse("n*t", FlagMode::CharFlags).unwrap();
        assert!(rule.matches(&["1", "0", "th"], check));
        assert!(rule.matches(&["th"], check));
        assert!(!rule.matches(&["1", "0"], check));
        assert!(rule.partial_match(&["1", "0"], check));
        assert!(!rule.partial_match(&["th", "1"], check));
    }

    #[test]
    fn test_bad_rule() {
        assert!(CompoundRule::parse("*n", FlagMode::CharFlags).is_err());
        assert!(CompoundRule::parse("(n", FlagMode::CharFlags).is_err());
    }
}
