/// Parser for hunspell-format .aff files
use anyhow::{anyhow, bail, Result};
use fnv::FnvHashMap;
use nom::branch::alt;
use nom::bytes::complete::{tag, take_till1};
use nom::character::complete::{char, not_line_ending, space0, space1, u32, u8};
use nom::combinator::{eof, map, opt, rest, value};
use nom::error::{ErrorKind, ParseError};
use nom::multi::separated_list1;
use nom::sequence::{preceded, separated_pair, tuple};
use nom::{Err, Finish, IResult, Parser};
use std::fmt;

use crate::hunspell::affixdata::{AffixData, AffixEntry, FlagMode};
use crate::hunspell::compoundrule::CompoundRule;
use crate::hunspell::condition::AffixCondition;

type Input<'a> = &'a str;

const BYTE_ORDER_MARK: char = '\u{FEFF}';

#[derive(Debug)]
struct AffError {
    message: String,
}

impl AffError {
    fn failure(message: &str) -> Err<Self> {
        Err::Failure(AffError {
            message: message.to_string(),
        })
    }

    fn error(message: &str) -> Err<Self> {
        Err::Error(AffError {
            message: message.to_string(),
        })
    }
}

impl<'a> ParseError<Input<'a>> for AffError {
    fn from_error_kind(input: Input<'a>, kind: ErrorKind) -> Self {
        let message = format!("{:?} at '{}'", kind, input);
        AffError { message }
    }

    fn append(_input: Input<'a>, _kind: ErrorKind, other: Self) -> Self {
        other
    }
}

impl fmt::Display for AffError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

#[derive(Clone, Debug)]
enum AffixLine<'a> {
    /// A directive this parser does not act on.
    Ignored,
    /// The first line of a table, which only holds the entry count.
    TableHeader(&'static str),
    SetEncoding(&'a str),
    SetFlagMode(FlagMode),
    SetKeyboardString(&'a str),
    SetTryString(&'a str),
    SetFlag(&'a str, &'a str),
    SetCompoundMin(u8),
    AddIconv((&'a str, &'a str)),
    AddOconv((&'a str, &'a str)),
    AddReplacement((&'a str, &'a str)),
    AddCompoundRule(&'a str),
    AddRelatedChars(&'a str),
    AddWordBreak(&'a str),
    SetFullstrip,
    AffixHeader {
        prefix: bool,
        flag: &'a str,
        cross: bool,
    },
    Affix {
        prefix: bool,
        flag: &'a str,
        strip: &'a str,
        affix: &'a str,
        condition: &'a str,
    },
}

/// Parse a line starting with a keyword and then a value.
/// Once the keyword has matched, a bad value is a hard failure
/// rather than a reason to try the other line types.
fn keyword<'a, O, F>(
    key: &'static str,
    mut value: F,
) -> impl FnMut(Input<'a>) -> IResult<Input<'a>, O, AffError>
where
    F: Parser<Input<'a>, O, AffError>,
{
    move |s: Input<'a>| {
        let (s, _) = tag(key)(s)?;
        let (s, _) = space1(s)?;
        match value.parse(s) {
            Err(Err::Error(e)) => Err(Err::Failure(e)),
            rest => rest,
        }
    }
}

/// Parse a line that is a table entry. Each line of a table
/// starts with the same keyword. The first line contains the
/// number of entries that follow, which we don't need.
fn table_line<'a, O, F>(
    key: &'static str,
    mut value: F,
    conv: impl Fn(O) -> AffixLine<'a>,
) -> impl FnMut(Input<'a>) -> IResult<Input<'a>, AffixLine<'a>, AffError>
where
    F: Parser<Input<'a>, O, AffError>,
{
    move |s: Input<'a>| {
        let (s, _) = tag(key)(s)?;
        let (s, _) = space1(s)?;
        if let Ok((s, _)) = tuple((u32, ending))(s) {
            return Ok((s, AffixLine::TableHeader(key)));
        }
        match value.parse(s) {
            Err(Err::Error(e)) => Err(Err::Failure(e)),
            Ok((s, v)) => Ok((s, conv(v))),
            Err(other) => Err(other),
        }
    }
}

fn comment(s: Input) -> IResult<Input, (), AffError> {
    value((), preceded(char('#'), not_line_ending))(s)
}

fn ending(s: Input) -> IResult<Input, (), AffError> {
    value((), tuple((space0, opt(comment), eof)))(s)
}

fn value_string(s: Input) -> IResult<Input, Input, AffError> {
    take_till1(|c: char| c.is_whitespace())(s)
}

fn string_pair(s: Input) -> IResult<Input, (Input, Input), AffError> {
    separated_pair(value_string, space1, value_string)(s)
}

const FLAG_NAMES: [&str; 10] = [
    "FORBIDDENWORD",
    "NOSUGGEST",
    "NEEDAFFIX",
    "ONLYINCOMPOUND",
    "KEEPCASE",
    "CIRCUMFIX",
    "COMPOUNDFLAG",
    "COMPOUNDBEGIN",
    "COMPOUNDMIDDLE",
    "COMPOUNDEND",
];

fn assign_flag(s: Input) -> IResult<Input, AffixLine, AffError> {
    let (s, key) = value_string(s)?;
    if !FLAG_NAMES.contains(&key) {
        return Err(AffError::error("Keyword not a known flag"));
    }
    let (s, _) = space1(s)?;
    match value_string(s) {
        Ok((s, v)) => Ok((s, AffixLine::SetFlag(key, v))),
        Err(_) => Err(AffError::failure(&format!("Missing value for {}", key))),
    }
}

fn flag_mode(s: Input) -> IResult<Input, FlagMode, AffError> {
    alt((
        value(FlagMode::DoubleCharFlags, tag("long")),
        value(FlagMode::NumericFlags, tag("num")),
        value(FlagMode::Utf8Flags, tag("UTF-8")),
    ))(s)
}

fn directive(s: Input) -> IResult<Input, AffixLine, AffError> {
    alt((
        map(keyword("SET", value_string), AffixLine::SetEncoding),
        map(keyword("FLAG", flag_mode), AffixLine::SetFlagMode),
        map(keyword("KEY", value_string), AffixLine::SetKeyboardString),
        map(keyword("TRY", value_string), AffixLine::SetTryString),
        map(keyword("COMPOUNDMIN", u8), AffixLine::SetCompoundMin),
        value(AffixLine::SetFullstrip, tuple((tag("FULLSTRIP"), ending))),
        assign_flag,
    ))(s)
}

fn table(s: Input) -> IResult<Input, AffixLine, AffError> {
    alt((
        table_line("ICONV", string_pair, AffixLine::AddIconv),
        table_line("OCONV", string_pair, AffixLine::AddOconv),
        table_line("REP", string_pair, AffixLine::AddReplacement),
        table_line("COMPOUNDRULE", value_string, AffixLine::AddCompoundRule),
        table_line("MAP", value_string, AffixLine::AddRelatedChars),
        table_line("BREAK", value_string, AffixLine::AddWordBreak),
    ))(s)
}

/// PFX and SFX lines come in two shapes:
/// a header `SFX flag Y|N count` and entries `SFX flag strip affix condition [morph...]`.
fn affix_line<'a>(
    key: &'static str,
    prefix: bool,
) -> impl FnMut(Input<'a>) -> IResult<Input<'a>, AffixLine<'a>, AffError> {
    move |s: Input<'a>| {
        let (s, _) = tag(key)(s)?;
        let (s, _) = space1(s)?;
        let (s, fields) = separated_list1(space1, value_string)(s)?;
        let (s, _) = rest(s)?;
        let fields: Vec<&str> = fields
            .into_iter()
            .take_while(|f| !f.starts_with('#'))
            .collect();
        match fields[..] {
            [flag, yn @ ("Y" | "N"), count] if count.parse::<u32>().is_ok() => Ok((
                s,
                AffixLine::AffixHeader {
                    prefix,
                    flag,
                    cross: yn == "Y",
                },
            )),
            [flag, strip, affix] => Ok((
                s,
                AffixLine::Affix {
                    prefix,
                    flag,
                    strip,
                    affix,
                    condition: ".",
                },
            )),
            [flag, strip, affix, condition, ..] => Ok((
                s,
                AffixLine::Affix {
                    prefix,
                    flag,
                    strip,
                    affix,
                    condition,
                },
            )),
            _ => Err(AffError::failure(&format!("Malformed {} line", key))),
        }
    }
}

fn line(s: Input) -> IResult<Input, AffixLine, AffError> {
    alt((
        directive,
        table,
        affix_line("PFX", true),
        affix_line("SFX", false),
        value(AffixLine::Ignored, rest),
    ))(s)
}

/// Convert a `0` placeholder into an empty string.
fn zero_is_empty(s: &str) -> &str {
    if s == "0" {
        ""
    } else {
        s
    }
}

fn apply_line(
    d: &mut AffixData,
    l: AffixLine,
    cross: &mut FnvHashMap<(bool, u32), bool>,
    break_declared: &mut bool,
) -> Result<()> {
    match l {
        AffixLine::Ignored | AffixLine::SetEncoding(_) => (),
        AffixLine::TableHeader(key) => {
            if key == "BREAK" {
                *break_declared = true;
            }
        }
        AffixLine::SetFlagMode(fm) => d.flag_mode = fm,
        AffixLine::SetKeyboardString(k) => d.keyboard_string = Some(k.to_string()),
        AffixLine::SetTryString(t) => d.try_string = Some(t.to_string()),
        AffixLine::SetFlag(name, v) => {
            let fflag = d.parse_flags(v)?;
            if fflag.len() != 1 {
                bail!("Could not parse {}", name);
            }
            let v = Some(fflag[0]);
            let sf = &mut d.special_flags;
            match name {
                "FORBIDDENWORD" => sf.forbidden = v,
                "NOSUGGEST" => sf.no_suggest = v,
                "NEEDAFFIX" => sf.need_affix = v,
                "ONLYINCOMPOUND" => sf.only_in_compound = v,
                "KEEPCASE" => sf.keep_case = v,
                "CIRCUMFIX" => sf.circumfix = v,
                "COMPOUNDFLAG" => sf.compound_flag = v,
                "COMPOUNDBEGIN" => sf.compound_begin = v,
                "COMPOUNDMIDDLE" => sf.compound_middle = v,
                "COMPOUNDEND" => sf.compound_end = v,
                _ => bail!("Unhandled flag {}", name),
            }
        }
        AffixLine::SetCompoundMin(v) => d.compound_min = v.max(1) as usize,
        AffixLine::AddIconv((from, to)) => d.iconv.push(from, to),
        AffixLine::AddOconv((from, to)) => d.oconv.push(from, to),
        AffixLine::AddReplacement((from, to)) => {
            // underscores stand for spaces in REP tables
            d.replacements
                .push(&from.replace('_', " "), &to.replace('_', " "))
        }
        AffixLine::AddCompoundRule(v) => {
            let rule = CompoundRule::parse(v, d.flag_mode)?;
            d.compound_rules.push(rule);
        }
        AffixLine::AddRelatedChars(v) => d.related_chars.push(v.to_string()),
        AffixLine::AddWordBreak(v) => {
            *break_declared = true;
            d.word_breaks.push(v.to_string());
        }
        AffixLine::SetFullstrip => d.fullstrip = true,
        AffixLine::AffixHeader {
            prefix,
            flag,
            cross: yn,
        } => {
            let fflag = d.parse_flags(flag)?;
            if fflag.len() != 1 {
                bail!("Could not parse affix flag {}", flag);
            }
            cross.insert((prefix, fflag[0]), yn);
        }
        AffixLine::Affix {
            prefix,
            flag,
            strip,
            affix,
            condition,
        } => {
            let fflag = d.parse_flags(flag)?;
            if fflag.len() != 1 {
                bail!("Could not parse affix flag {}", flag);
            }
            let (affix, contflags) = match affix.split_once('/') {
                Some((affix, flags)) => (affix, d.parse_flags(flags)?),
                None => (affix, Vec::new()),
            };
            let condition = AffixCondition::parse(condition)
                .ok_or_else(|| anyhow!("Bad affix condition {}", condition))?;
            let entry = AffixEntry {
                flag: fflag[0],
                allow_cross: cross.get(&(prefix, fflag[0])).copied().unwrap_or(false),
                strip: zero_is_empty(strip).to_string(),
                affix: zero_is_empty(affix).to_string(),
                condition,
                contflags,
            };
            if prefix {
                d.add_prefix(entry);
            } else {
                d.add_suffix(entry);
            }
        }
    }
    Ok(())
}

/// Parse the text of an affix file. Directives this engine does not use
/// are skipped, but a known directive with an unusable value is an error.
pub fn parse_affix_data(text: &str) -> Result<AffixData> {
    let text = text.strip_prefix(BYTE_ORDER_MARK).unwrap_or(text);
    let mut d = AffixData::new();
    let mut cross = FnvHashMap::default();
    let mut break_declared = false;

    for (nr, raw) in text.lines().enumerate() {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let (_, l) = tuple((line, ending))
            .map(|(l, _)| l)
            .parse(trimmed)
            .finish()
            .map_err(|e| anyhow!("line {}: {}", nr + 1, e))?;
        apply_line(&mut d, l, &mut cross, &mut break_declared)
            .map_err(|e| anyhow!("line {}: {:#}", nr + 1, e))?;
    }

    if !break_declared {
        d.use_default_breaks();
    }
    Ok(d)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_directives() {
        let d = parse_affix_data(
            "SET UTF-8\nTRY esianrt\nKEY qwerty|asdf\nNOSUGGEST !\nLANG en_US\n\n# comment\nCOMPOUNDMIN 2\n",
        )
        .unwrap();
        assert_eq!(Some("esianrt".to_string()), d.try_string);
        assert_eq!(Some("qwerty|asdf".to_string()), d.keyboard_string);
        assert_eq!(Some('!' as u32), d.special_flags.no_suggest);
        assert_eq!(2, d.compound_min);
        assert_eq!(vec!["-", "^-", "-$"], d.word_breaks);
    }

    #[test]
    fn test_parse_affix_tables() {
        let d = parse_affix_data(
            "PFX A Y 1\nPFX A 0 re .\nSFX D Y 2\nSFX D y ied [^aeiou]y\nSFX D 0 ed [^ey] # comment\n",
        )
        .unwrap();
        assert_eq!(1, d.prefixes.len());
        assert_eq!(2, d.suffixes.len());
        assert!(d.prefixes[0].allow_cross);
        assert_eq!("", d.prefixes[0].strip);
        assert_eq!("re", d.prefixes[0].affix);
        assert_eq!("y", d.suffixes[0].strip);
        assert_eq!("ied", d.suffixes[0].affix);
    }

    #[test]
    fn test_break_zero_disables_breaking() {
        let d = parse_affix_data("BREAK 0\n").unwrap();
        assert!(d.word_breaks.is_empty());
    }

    #[test]
    fn test_rep_underscores() {
        let d = parse_affix_data("REP 1\nREP alot a_lot\n").unwrap();
        let mut v = Vec::new();
        d.replacements.suggest("alot", |s| {
            v.push(s);
            true
        });
        assert_eq!(vec!["a lot".to_string()], v);
    }

    #[test]
    fn test_malformed_lines() {
        assert!(parse_affix_data("FLAG sideways\n").is_err());
        assert!(parse_affix_data("SFX D Y 1\nSFX D ed\n").is_err());
        assert!(parse_affix_data("COMPOUNDMIN lots\n").is_err());
        assert!(parse_affix_data("FLAG long\nNOSUGGEST !\n").is_err());
        assert!(parse_affix_data("PFX A Y 1\nPFX A 0 re [abc\n").is_err());
    }
}
