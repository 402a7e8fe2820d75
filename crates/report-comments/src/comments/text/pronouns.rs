use super::match_case;
use crate::comments::domain::Pronouns;
use regex::{Captures, Regex};
use std::sync::OnceLock;

static PLACEHOLDER_PRONOUNS: OnceLock<Regex> = OnceLock::new();

fn placeholder_pronouns() -> &'static Regex {
    PLACEHOLDER_PRONOUNS.get_or_init(|| {
        Regex::new(r"(?i)\b(?:he|his|him|himself|herself)\b").expect("pronoun pattern is valid")
    })
}

/// Rewrites the `he`/`his` placeholder convention of the statement banks into `pronouns`.
///
/// Only whole words are touched, so `the`, `this` and `Theodore` pass through unchanged.
/// A capitalised placeholder produces a capitalised replacement.
pub fn apply_pronouns(text: &str, pronouns: Pronouns) -> String {
    if text.is_empty() {
        return String::new();
    }

    placeholder_pronouns()
        .replace_all(text, |caps: &Captures<'_>| {
            let found = &caps[0];
            let replacement = match found.to_ascii_lowercase().as_str() {
                "he" => pronouns.subject,
                "his" => pronouns.possessive,
                "him" => pronouns.object(),
                _ => pronouns.reflexive(),
            };
            match_case(found, replacement)
        })
        .into_owned()
}
