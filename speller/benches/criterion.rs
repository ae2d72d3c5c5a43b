use criterion::{black_box, criterion_group, criterion_main, Criterion};

use caseless::default_case_fold_str;
use std::fs::{read, read_to_string};
use std::path::PathBuf;

use speller::ngram::ngram as ngram_fn;
use speller::{Speller, SpellerHunspellDict, CONTENTS_SEPARATOR};

fn find_dict(name: &str) -> (PathBuf, PathBuf) {
    // Relative path of the files depends on whether we are called by
    // cargo bench or cargo flamegraph
    for dir in ["tests", "speller/tests"].iter() {
        let dictpath = PathBuf::from(&format!("{}/{}.dic", dir, name));
        let affpath = PathBuf::from(&format!("{}/{}.aff", dir, name));
        if dictpath.exists() && affpath.exists() {
            return (dictpath, affpath);
        }
    }
    panic!("Could not find dictionary for {}", name);
}

fn load_speller(name: &str) -> SpellerHunspellDict {
    let (dictpath, affpath) = find_dict(name);
    match SpellerHunspellDict::new(&dictpath, &affpath) {
        Ok(dict) => dict,
        Err(e) => panic!("{:#}", e),
    }
}

fn load_en(c: &mut Criterion) {
    let (dictpath, affpath) = find_dict("en_US");

    c.bench_function("load_en", |b| {
        b.iter(|| SpellerHunspellDict::new(&dictpath, &affpath))
    });
}

fn load_en_contents(c: &mut Criterion) {
    let (dictpath, affpath) = find_dict("en_US");
    let mut contents = read(affpath).unwrap();
    contents.extend_from_slice(CONTENTS_SEPARATOR.as_bytes());
    contents.push(b'\n');
    contents.extend_from_slice(&read(dictpath).unwrap());

    c.bench_function("load_en_contents", |b| {
        b.iter(|| SpellerHunspellDict::from_contents(black_box(&contents)))
    });
}

fn suggest_en(c: &mut Criterion) {
    let speller = load_speller("en_US");

    dbg!(speller.suggestions("disapearance", 9));

    c.bench_function("suggest_en_disapearance", |b| {
        b.iter(|| speller.suggestions(black_box("disapearance"), 9))
    });
}

fn suggest_en_ngram(c: &mut Criterion) {
    let speller = load_speller("en_US");

    // Pick a word with enough errors to get through to the n-gram scan.
    dbg!(speller.suggestions("anglisizmz", 9));

    c.bench_function("suggest_en_ngram", |b| {
        b.iter(|| speller.suggestions(black_box("anglisizmz"), 9))
    });
}

fn ngram_loop(c: &mut Criterion) {
    let (dictpath, _) = find_dict("en_US");
    let dict = read_to_string(dictpath).unwrap();

    let words: Vec<Vec<char>> = dict
        .lines()
        .skip(1)
        .map(|line| line.split_once('/').map(|(w, _)| w).unwrap_or(line))
        .map(|word| word.chars().collect())
        .collect();

    c.bench_function("ngram_loop", |b| {
        b.iter(|| {
            for w1 in &words {
                for w2 in &words {
                    black_box(ngram_fn(3, w1, w2));
                }
            }
        });
    });
}

fn casefold_loop(c: &mut Criterion) {
    c.bench_function("default_case_fold_str", |b| {
        b.iter(|| {
            black_box(default_case_fold_str(black_box("Daniel")));
            black_box(default_case_fold_str(black_box("LICHTENSTEIN")));
            black_box(default_case_fold_str(black_box("Île-de-France")));
            black_box(default_case_fold_str(black_box("PTOLÉMÉE")));
        });
    });
    // Compare with tolower as a reference point
    c.bench_function("tolower", |b| {
        b.iter(|| {
            black_box(black_box("Daniel").to_lowercase());
            black_box(black_box("LICHTENSTEIN").to_lowercase());
            black_box(black_box("Île-de-France").to_lowercase());
            black_box(black_box("PTOLÉMÉE").to_lowercase());
        });
    });
}

fn spellcheck_en(c: &mut Criterion) {
    let speller = load_speller("en_US");

    // A mix of root words, affixed forms, case variants and misspellings.
    let words = [
        "Alberta", "angles", "ANGLERS", "disappeared", "reapplying", "applications",
        "anointment", "21st", "hello-world", "Alberta’s", "agnle", "apear", "applyed",
        "anglisism", "wrold",
    ];

    c.bench_function("spellcheck_en", |b| {
        b.iter(|| {
            for word in &words {
                black_box(speller.spellcheck(word));
            }
        })
    });
}

criterion_group!(spellcheck, spellcheck_en);
criterion_group!(casefold, casefold_loop);
criterion_group!(ngram, ngram_loop);
criterion_group!(load, load_en, load_en_contents);
criterion_group!(suggest, suggest_en, suggest_en_ngram);
criterion_main!(suggest, load, ngram, casefold, spellcheck);
