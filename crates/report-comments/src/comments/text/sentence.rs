use super::{capitalize_first, lowercase_first};

/// Joins `prefix` and `template` into one terminated sentence.
///
/// Templates authored as fragments ("understood main ideas") get `pronoun` spliced in front so
/// the sentence has a subject. When a prefix is present the template continues mid-sentence and
/// its first letter is lowered; otherwise the sentence is capitalised. A blank template yields an
/// empty string so absent slots drop out of the comment.
pub fn build_sentence(prefix: &str, template: &str, pronoun: Option<&str>) -> String {
    let body = template.trim();
    if body.is_empty() {
        return String::new();
    }

    let body = match pronoun {
        Some(pronoun) if starts_with_lowercase(body) => format!("{pronoun} {body}"),
        _ => body.to_string(),
    };

    let prefix = prefix.trim();
    let sentence = if prefix.is_empty() {
        capitalize_first(&body)
    } else {
        format!("{} {}", capitalize_first(prefix), lowercase_first(&body))
    };

    terminate(&sentence)
}

fn starts_with_lowercase(text: &str) -> bool {
    text.chars().next().is_some_and(char::is_lowercase)
}

fn terminate(sentence: &str) -> String {
    let trimmed =
        sentence.trim_end_matches(|c: char| c.is_whitespace() || matches!(c, ',' | ';' | ':'));
    if trimmed.ends_with(['.', '!', '?']) {
        trimmed.to_string()
    } else {
        format!("{trimmed}.")
    }
}
