use std::fs::read;
use std::path::Path;

use speller::{Speller, SpellerHunspellDict, CONTENTS_SEPARATOR};

fn load() -> SpellerHunspellDict {
    let dictpath = Path::new("tests/en_US.dic");
    let affpath = Path::new("tests/en_US.aff");
    SpellerHunspellDict::new(dictpath, affpath).unwrap()
}

#[test]
fn match_root_words() {
    let speller = load();

    assert!(speller.spellcheck("Alberta"));
    assert!(speller.spellcheck("angle"));
    assert!(speller.spellcheck("anglicism"));
    assert!(speller.spellcheck("anoint"));
    assert!(speller.spellcheck("appear"));
    assert!(speller.spellcheck("apply"));

    assert!(!speller.spellcheck("alberta"));
    assert!(!speller.spellcheck("agnle"));
    assert!(!speller.spellcheck("anglisism"));
    assert!(!speller.spellcheck("apear"));
}

#[test]
fn match_prefixes() {
    let speller = load();

    assert!(speller.spellcheck("reappear")); // A
    assert!(speller.spellcheck("disappear")); // E
    assert!(speller.spellcheck("reapply")); // A
    assert!(speller.spellcheck("disappeared")); // E + D

    assert!(!speller.spellcheck("unappear")); // U (flag not present)
}

#[test]
fn match_suffixes() {
    let speller = load();

    assert!(speller.spellcheck("Alberta's")); // M

    assert!(speller.spellcheck("angle's")); // M
    assert!(speller.spellcheck("anglers")); // Z
    assert!(speller.spellcheck("angling")); // G
    assert!(speller.spellcheck("angled")); // D
    assert!(speller.spellcheck("angler")); // R
    assert!(speller.spellcheck("angles")); // S

    assert!(speller.spellcheck("anglicisms")); // S

    assert!(speller.spellcheck("anointing")); // G
    assert!(speller.spellcheck("anointed")); // D
    assert!(speller.spellcheck("anointer")); // R
    assert!(speller.spellcheck("anointment")); // L
    assert!(speller.spellcheck("anoints")); // S

    assert!(speller.spellcheck("appears")); // S
    assert!(speller.spellcheck("appeared")); // D
    assert!(speller.spellcheck("appearing")); // G

    assert!(speller.spellcheck("application")); // N
    assert!(speller.spellcheck("applications")); // X
    assert!(speller.spellcheck("applying")); // G
    assert!(speller.spellcheck("applied")); // D
    assert!(speller.spellcheck("applies")); // S

    assert!(!speller.spellcheck("applyication")); // badly applied N
    assert!(!speller.spellcheck("applyications")); // badly applied X
    assert!(!speller.spellcheck("applyed")); // badly applied D
    assert!(!speller.spellcheck("applyes")); // badly applied S

    assert!(!speller.spellcheck("applion")); // wrong N
    assert!(!speller.spellcheck("appleion")); // badly applied N
    assert!(!speller.spellcheck("applyen")); // wrong N
}

#[test]
fn match_case_variants() {
    let speller = load();

    assert!(speller.spellcheck("ANGLES"));
    assert!(speller.spellcheck("ALBERTA'S"));
    assert!(speller.spellcheck("Hello"));
    assert!(speller.spellcheck("iPod"));
    assert!(!speller.spellcheck("hELLO"));
}

#[test]
fn match_input_conversion() {
    let speller = load();

    // ICONV turns the typographic apostrophe into a plain one
    assert!(speller.spellcheck("Alberta’s"));
    assert!(speller.spellcheck("café"));
}

#[test]
fn match_ordinals() {
    let speller = load();

    assert!(speller.spellcheck("21st"));
    assert!(speller.spellcheck("11th"));
    assert!(speller.spellcheck("100th"));
    assert!(speller.spellcheck("2nd"));
    assert!(!speller.spellcheck("2th"));
}

#[test]
fn match_numbers_and_breaks() {
    let speller = load();

    assert!(speller.spellcheck("1,000.50"));
    assert!(speller.spellcheck("hello-world"));
    assert!(!speller.spellcheck("hello-wrold"));
}

#[test]
fn reject_forbidden() {
    let speller = load();

    assert!(!speller.spellcheck("abominable"));
    assert!(!speller.spellcheck("ABOMINABLE"));
    assert!(!speller
        .suggestions("abominabel", 10)
        .contains(&"abominable".to_string()));
}

#[test]
fn suggest_corrections() {
    let speller = load();

    assert_eq!(Some(&"world".to_string()), speller.suggestions("wrold", 10).first());
    assert!(speller.suggestions("Helo", 10).contains(&"Hello".to_string()));
    assert_eq!(Some(&"café".to_string()), speller.suggestions("cafe", 10).first());
    assert_eq!(Some(&"a lot".to_string()), speller.suggestions("alot", 10).first());
    assert!(speller.suggestions("fone", 10).contains(&"phone".to_string()));
    assert!(speller.suggestions("wrold", 10).len() <= 10);
    assert_eq!(1, speller.suggestions("wrold", 1).len());
}

#[test]
fn load_from_contents() {
    let mut contents = read("tests/en_US.aff").unwrap();
    contents.extend_from_slice(CONTENTS_SEPARATOR.as_bytes());
    contents.push(b'\n');
    contents.extend_from_slice(&read("tests/en_US.dic").unwrap());

    let speller = SpellerHunspellDict::from_contents(&contents).unwrap();
    assert!(speller.spellcheck("anointment"));
    assert!(!speller.spellcheck("apear"));

    let dic_only = read("tests/en_US.dic").unwrap();
    assert!(SpellerHunspellDict::from_contents(&dic_only).is_err());
}

#[test]
fn load_missing_files() {
    let missing = Path::new("tests/xx_XX.dic");
    let affpath = Path::new("tests/en_US.aff");
    assert!(SpellerHunspellDict::new(missing, affpath).is_err());
}
