/// Candidate generators for suggestions. Each one feeds candidates to
/// the `suggest` callback and stops as soon as the callback returns
/// false, so the caller decides how much effort to spend.
use std::mem::swap;

pub fn related_char_suggestions(
    related: &[String],
    word: &str,
    mut suggest: impl FnMut(String) -> bool,
) {
    // Try all possible combinations of replacements of related characters.
    // This can result in a huge number of candidates for long words.
    let wvec: Vec<char> = word.chars().collect();
    let mut candidates: Vec<Vec<char>> = vec![wvec.clone()];

    // The affix file orders the related classes starting with the most likely.
    for rc in related.iter() {
        for (i, wc) in wvec.iter().enumerate() {
            if !rc.contains(*wc) {
                continue;
            }
            let mut new_candidates: Vec<Vec<char>> = Vec::new();
            for cnd in candidates.drain(..) {
                for newc in rc.chars().filter(|c| c != wc) {
                    let mut newcnd = cnd.clone();
                    newcnd[i] = newc;
                    if !suggest(newcnd.iter().collect()) {
                        return;
                    }
                    new_candidates.push(newcnd);
                }
                new_candidates.push(cnd);
            }
            swap(&mut candidates, &mut new_candidates);
        }
    }
}

/// Replace each char with its neighbours on the keyboard, as described
/// by the KEY directive (rows separated by `|`).
pub fn keyboard_suggestions(
    keyboard: &str,
    word: &str,
    mut suggest: impl FnMut(String) -> bool,
) {
    let rows: Vec<Vec<char>> = keyboard.split('|').map(|r| r.chars().collect()).collect();
    for (i, c) in word.char_indices() {
        for row in rows.iter() {
            let Some(pos) = row.iter().position(|rc| *rc == c) else {
                continue;
            };
            let neighbours = [pos.checked_sub(1), Some(pos + 1)];
            for n in neighbours.into_iter().flatten() {
                if let Some(nc) = row.get(n) {
                    let mut sugg = String::with_capacity(word.len() + 2);
                    sugg.push_str(&word[..i]);
                    sugg.push(*nc);
                    sugg.push_str(&word[i + c.len_utf8()..]);
                    if !suggest(sugg) {
                        return;
                    }
                }
            }
        }
    }
}

pub fn delete_char_suggestions(word: &str, mut suggest: impl FnMut(String) -> bool) {
    for (i, c) in word.char_indices() {
        let mut sugg = String::with_capacity(word.len());
        sugg.push_str(&word[..i]);
        sugg.push_str(&word[i + c.len_utf8()..]);
        if !suggest(sugg) {
            return;
        }
    }
}

pub fn swap_char_suggestions(word: &str, mut suggest: impl FnMut(String) -> bool) {
    let chars: Vec<char> = word.chars().collect();

    // Adjacent swaps are by far the most common typo, so try them first
    for i in 1..chars.len() {
        let mut v = chars.clone();
        v.swap(i - 1, i);
        if !suggest(v.into_iter().collect()) {
            return;
        }
    }

    for i in 0..chars.len() {
        for j in i + 2..chars.len() {
            let mut v = chars.clone();
            v.swap(i, j);
            if !suggest(v.into_iter().collect()) {
                return;
            }
        }
    }
}

/// Insert each of `try_chars` at every position of the word.
pub fn add_char_suggestions(word: &str, try_chars: &str, mut suggest: impl FnMut(String) -> bool) {
    // Try them in order; the affix file put them in order of likelihood
    for tc in try_chars.chars() {
        let positions = word.char_indices().map(|(i, _)| i).chain([word.len()]);
        for i in positions {
            let mut sugg = String::with_capacity(word.len() + tc.len_utf8());
            sugg.push_str(&word[..i]);
            sugg.push(tc);
            sugg.push_str(&word[i..]);
            if !suggest(sugg) {
                return;
            }
        }
    }
}

/// Replace each char of the word with each of `try_chars`.
pub fn bad_char_suggestions(word: &str, try_chars: &str, mut suggest: impl FnMut(String) -> bool) {
    for tc in try_chars.chars() {
        for (i, c) in word.char_indices() {
            if c == tc {
                continue;
            }
            let mut sugg = String::with_capacity(word.len() + tc.len_utf8());
            sugg.push_str(&word[..i]);
            sugg.push(tc);
            sugg.push_str(&word[i + c.len_utf8()..]);
            if !suggest(sugg) {
                return;
            }
        }
    }
}

/// Split the word in two at every position, for missing spaces.
pub fn split_word_suggestions(word: &str, mut suggest: impl FnMut(String) -> bool) {
    for (i, _) in word.char_indices().skip(1) {
        if !suggest(format!("{} {}", &word[..i], &word[i..])) {
            return;
        }
    }
}
