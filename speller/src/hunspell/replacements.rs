//! A table of string replacements, used both for the REP suggestion
//! table and for the ICONV/OCONV input and output conversions.

#[derive(Clone, Debug, Default)]
struct Rep {
    anchor_begin: bool,
    anchor_end: bool,
    from: String,
    to: String,
}

impl Rep {
    fn matches(&self, rest: &str, at_start: bool) -> bool {
        if self.anchor_begin && !at_start {
            false
        } else if self.anchor_end {
            rest == self.from
        } else {
            rest.starts_with(&self.from)
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Replacements {
    reps: Vec<Rep>,
}

impl Replacements {
    pub fn push(&mut self, from: &str, to: &str) {
        let mut rep = Rep::default();
        let mut from = from;
        if let Some(f) = from.strip_prefix('^') {
            from = f;
            rep.anchor_begin = true;
        }
        if let Some(f) = from.strip_suffix('$') {
            from = f;
            rep.anchor_end = true;
        }
        if from.is_empty() {
            return;
        }
        rep.from = from.to_string();
        rep.to = to.to_string();
        self.reps.push(rep);
    }

    pub fn is_empty(&self) -> bool {
        self.reps.is_empty()
    }

    fn longest_match(&self, rest: &str, at_start: bool) -> Option<&Rep> {
        self.reps
            .iter()
            .filter(|rep| rep.matches(rest, at_start))
            .max_by_key(|rep| rep.from.len())
    }

    /// Rewrite `word` left to right, always taking the longest matching
    /// replacement at each position.
    pub fn conv(&self, word: &str) -> String {
        if self.reps.is_empty() {
            return word.to_string();
        }
        let mut output = String::with_capacity(word.len());
        let mut skip_to = 0;
        for (i, c) in word.char_indices() {
            if i < skip_to {
                continue;
            }
            if let Some(rep) = self.longest_match(&word[i..], i == 0) {
                output += &rep.to;
                skip_to = i + rep.from.len();
            } else {
                output.push(c);
            }
        }
        output
    }

    /// Offer every single-replacement variant of `word`.
    /// Stops as soon as `suggest` returns false.
    pub fn suggest(&self, word: &str, mut suggest: impl FnMut(String) -> bool) {
        for (i, _) in word.char_indices() {
            for rep in self.reps.iter() {
                if rep.matches(&word[i..], i == 0) {
                    let mut sugg = word[..i].to_string();
                    sugg += &rep.to;
                    sugg += &word[i + rep.from.len()..];
                    if !suggest(sugg) {
                        return;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_conv_longest_match() {
        let mut reps = Replacements::default();
        reps.push("a", "b");
        reps.push("aa", "c");
        assert_eq!("cb", reps.conv("aaa"));
        assert_eq!("xyz", reps.conv("xyz"));
    }

    #[test]
    fn test_anchored_suggestions() {
        let mut reps = Replacements::default();
        reps.push("^alot$", "a lot");
        reps.push("f", "ph");

        let mut v = Vec::new();
        reps.suggest("alot", |s| {
            v.push(s);
            true
        });
        assert_eq!(vec!["a lot".to_string()], v);

        let mut v = Vec::new();
        reps.suggest("fotograf", |s| {
            v.push(s);
            true
        });
        assert_eq!(vec!["photograf".to_string(), "fotograph".to_string()], v);
    }
}
