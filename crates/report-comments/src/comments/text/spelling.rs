use super::match_case;
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::sync::OnceLock;

/// American spellings rewritten to British ones, matched as whole words in any case.
pub const BRITISH_SPELLINGS: &[(&str, &str)] = &[
    ("organized", "organised"),
    ("realized", "realised"),
    ("color", "colour"),
    ("labor", "labour"),
    ("honor", "honour"),
    ("behavior", "behaviour"),
    ("favorite", "favourite"),
    ("center", "centre"),
    ("meter", "metre"),
    ("analyze", "analyse"),
    ("organize", "organise"),
    ("realize", "realise"),
    ("defense", "defence"),
    ("license", "licence"),
    // Forms that appear in the statement banks.
    ("organizing", "organising"),
    ("organization", "organisation"),
    ("organizes", "organises"),
    ("recognize", "recognise"),
    ("recognized", "recognised"),
    ("recognizing", "recognising"),
    ("utilize", "utilise"),
    ("utilized", "utilised"),
    ("utilizing", "utilising"),
    ("summarize", "summarise"),
    ("summarized", "summarised"),
    ("summarizing", "summarising"),
    ("analyzed", "analysed"),
    ("analyzing", "analysing"),
    ("emphasize", "emphasise"),
    ("emphasized", "emphasised"),
    ("specialized", "specialised"),
    ("practiced", "practised"),
    ("practicing", "practising"),
    ("behaviors", "behaviours"),
    ("colors", "colours"),
    ("favorites", "favourites"),
    ("centers", "centres"),
    ("meters", "metres"),
];

struct SpellingTable {
    pattern: Regex,
    replacements: HashMap<&'static str, &'static str>,
}

static SPELLING_TABLE: OnceLock<SpellingTable> = OnceLock::new();

fn spelling_table() -> &'static SpellingTable {
    SPELLING_TABLE.get_or_init(|| {
        let mut words: Vec<&str> = BRITISH_SPELLINGS.iter().map(|(us, _)| *us).collect();
        words.sort_by_key(|word| std::cmp::Reverse(word.len()));
        let pattern = format!(r"(?i)\b(?:{})\b", words.join("|"));

        SpellingTable {
            pattern: Regex::new(&pattern).expect("spelling pattern is valid"),
            replacements: BRITISH_SPELLINGS.iter().copied().collect(),
        }
    })
}

/// Rewrites American spellings to British ones, keeping the capitalisation of each word.
pub fn british_spelling(text: &str) -> String {
    let table = spelling_table();
    table
        .pattern
        .replace_all(text, |caps: &Captures<'_>| {
            let found = &caps[0];
            match table
                .replacements
                .get(found.to_ascii_lowercase().as_str())
            {
                Some(british) => match_case(found, british),
                None => found.to_string(),
            }
        })
        .into_owned()
}
