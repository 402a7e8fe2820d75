//! String transforms that turn bank templates into finished sentences.

mod pronouns;
mod punctuation;
mod sanitize;
mod sentence;
mod spelling;

pub use pronouns::apply_pronouns;
pub use punctuation::{finalize_punctuation, truncate_at_sentence};
pub use sanitize::{sanitize_addendum, sanitize_name};
pub use sentence::build_sentence;
pub use spelling::{british_spelling, BRITISH_SPELLINGS};

pub(crate) fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Lowers the first letter unless the word looks like an acronym (`ICT`, `UK`).
pub(crate) fn lowercase_first(text: &str) -> String {
    let mut chars = text.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    if chars.clone().next().is_some_and(char::is_uppercase) {
        return text.to_string();
    }
    first.to_lowercase().chain(chars).collect()
}

/// Applies the capitalisation pattern of `found` to `replacement`.
pub(crate) fn match_case(found: &str, replacement: &str) -> String {
    let letters: Vec<char> = found.chars().filter(|c| c.is_alphabetic()).collect();
    if letters.len() > 1 && letters.iter().all(|c| c.is_uppercase()) {
        replacement.to_uppercase()
    } else if letters.first().is_some_and(|c| c.is_uppercase()) {
        capitalize_first(replacement)
    } else {
        replacement.to_string()
    }
}
