use regex::Regex;
use std::sync::OnceLock;

static PERIOD_RUNS: OnceLock<Regex> = OnceLock::new();

fn period_runs() -> &'static Regex {
    PERIOD_RUNS.get_or_init(|| Regex::new(r"\.{2,}").expect("period pattern is valid"))
}

/// Cuts `text` back to the last full sentence that fits in `budget` characters.
///
/// Returns the text untouched when it already fits. When the cut prefix holds no `.` at all the
/// prefix is returned as cut, possibly mid-word; the caller decides how to report that case.
pub fn truncate_at_sentence(text: &str, budget: usize) -> String {
    let Some((cut, _)) = text.char_indices().nth(budget) else {
        return text.to_string();
    };

    let head = text[..cut]
        .trim_end_matches(|c: char| c.is_whitespace() || matches!(c, ',' | ';' | '.'));
    match head.rfind('.') {
        Some(end) => head[..=end].to_string(),
        None => head.to_string(),
    }
}

/// Ends `text` with exactly one `.` and collapses any run of periods inside it.
pub fn finalize_punctuation(text: &str) -> String {
    let trimmed = text
        .trim()
        .trim_end_matches(|c: char| c.is_whitespace() || matches!(c, ',' | ';' | ':' | '!' | '?'));
    let mut finished = period_runs().replace_all(trimmed, ".").into_owned();
    if !finished.ends_with('.') {
        finished.push('.');
    }
    finished
}
