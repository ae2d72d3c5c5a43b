/// Affix conditions are rudimentary regexps (supporting [] groups and
/// [^] negated groups and '.' as wildcard). They are matched against
/// the start or end of a stem to decide whether a prefix or suffix rule
/// may be applied to it.

#[derive(Clone, Debug, PartialEq)]
enum CondUnit {
    Any,
    Char(char),
    OneOf(Vec<char>),
    NoneOf(Vec<char>),
}

impl CondUnit {
    fn matches(&self, wc: char) -> bool {
        match self {
            CondUnit::Any => true,
            CondUnit::Char(c) => *c == wc,
            CondUnit::OneOf(v) => v.contains(&wc),
            CondUnit::NoneOf(v) => !v.contains(&wc),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AffixCondition {
    units: Vec<CondUnit>,
}

impl AffixCondition {
    /// Returns `None` if the condition has an unterminated group.
    pub fn parse(condition: &str) -> Option<Self> {
        let mut units = Vec::new();
        let mut chars = condition.chars();
        if condition == "." {
            return Some(AffixCondition { units });
        }
        while let Some(c) = chars.next() {
            match c {
                '.' => units.push(CondUnit::Any),
                '[' => {
                    let mut group = Vec::new();
                    let mut negated = false;
                    let mut closed = false;
                    for (i, gc) in chars.by_ref().enumerate() {
                        if gc == ']' {
                            closed = true;
                            break;
                        } else if gc == '^' && i == 0 {
                            negated = true;
                        } else {
                            group.push(gc);
                        }
                    }
                    if !closed {
                        return None;
                    }
                    units.push(if negated {
                        CondUnit::NoneOf(group)
                    } else {
                        CondUnit::OneOf(group)
                    });
                }
                c => units.push(CondUnit::Char(c)),
            }
        }
        Some(AffixCondition { units })
    }

    /// Check the condition against the start of `word`.
    pub fn prefix_match(&self, word: &str) -> bool {
        let mut wchars = word.chars();
        self.units
            .iter()
            .all(|unit| wchars.next().map_or(false, |c| unit.matches(c)))
    }

    /// Check the condition against the end of `word`.
    pub fn suffix_match(&self, word: &str) -> bool {
        let mut wchars = word.chars().rev();
        self.units
            .iter()
            .rev()
            .all(|unit| wchars.next().map_or(false, |c| unit.matches(c)))
    }
}
