/// Cleans a student name for display: keeps letters, digits, spaces, apostrophes, hyphens and
/// periods, collapses whitespace, caps the length at `max_chars` and title-cases each word.
/// Words without a letter or digit (a stray `.` or `--`) are dropped.
///
/// Idempotent: sanitising an already sanitised name returns it unchanged.
pub fn sanitize_name(raw: &str, max_chars: usize) -> String {
    let kept: String = raw
        .chars()
        .map(|c| if c.is_whitespace() { ' ' } else { c })
        .filter(|&c| c.is_alphanumeric() || matches!(c, ' ' | '\'' | '-' | '.'))
        .collect();
    let collapsed = kept.split_whitespace().collect::<Vec<_>>().join(" ");
    let capped: String = collapsed.chars().take(max_chars).collect();
    let words: Vec<&str> = capped
        .split_whitespace()
        .filter(|word| word.chars().any(char::is_alphanumeric))
        .collect();
    title_case(&words.join(" "))
}

/// Cleans a free-text "next steps" note: drops control and markup characters, collapses
/// whitespace and caps the length.
pub fn sanitize_addendum(raw: &str, max_chars: usize) -> String {
    let kept: String = raw
        .chars()
        .map(|c| if c.is_whitespace() { ' ' } else { c })
        .filter(|&c| {
            c.is_alphanumeric()
                || matches!(
                    c,
                    ' ' | '\'' | '-' | '.' | ',' | ';' | ':' | '!' | '?' | '(' | ')' | '&'
                )
        })
        .collect();
    let collapsed = kept.split_whitespace().collect::<Vec<_>>().join(" ");
    let capped: String = collapsed.chars().take(max_chars).collect();
    capped.trim_end().to_string()
}

/// Upper-cases a letter that follows a non-letter and lower-cases the rest. Characters whose case
/// mapping is not a single character are left alone so the result keeps its length.
fn title_case(text: &str) -> String {
    let mut previous_is_letter = false;
    text.chars()
        .map(|c| {
            let mapped = if previous_is_letter {
                single_char(c.to_lowercase()).unwrap_or(c)
            } else {
                single_char(c.to_uppercase()).unwrap_or(c)
            };
            previous_is_letter = c.is_alphabetic();
            mapped
        })
        .collect()
}

fn single_char(mut mapping: impl Iterator<Item = char>) -> Option<char> {
    let first = mapping.next()?;
    match mapping.next() {
        Some(_) => None,
        None => Some(first),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_punctuation_and_title_cases() {
        assert_eq!(sanitize_name("O'Brien-Smith123!!", 100), "O'Brien-Smith123");
        assert_eq!(sanitize_name("sarah", 100), "Sarah");
        assert_eq!(sanitize_name("  mary   ANNE  ", 100), "Mary Anne");
        assert_eq!(sanitize_name("<script>alert(1)</script>", 100), "Scriptalert1Script");
        assert_eq!(sanitize_name("j.r. o'neil", 100), "J.R. O'Neil");
    }

    #[test]
    fn punctuation_only_words_are_dropped() {
        assert_eq!(sanitize_name("...", 100), "");
        assert_eq!(sanitize_name("leo .", 100), "Leo");
        assert_eq!(sanitize_name("mary-anne .. -- smith", 100), "Mary-Anne Smith");
        assert_eq!(sanitize_name("leo.", 100), "Leo.");
    }

    #[test]
    fn caps_length_without_trailing_space() {
        let name = sanitize_name("abcde fghij", 6);
        assert_eq!(name, "Abcde");
        assert_eq!(sanitize_name(&"x".repeat(250), 100).chars().count(), 100);
    }

    #[test]
    fn sanitising_twice_changes_nothing() {
        let samples = [
            "O'Brien-Smith123!!",
            "  léa\tdu-pont ",
            "straße",
            "İstanbul kid",
            "ǅemal",
            "\u{200b}zero\u{0}width",
            "a b c d e f g h i j k l m n o p",
            "",
            "...---'''",
            "leo . --",
            "ÆSIR ÞÓR",
        ];
        for max in [3, 10, 100] {
            for sample in samples {
                let once = sanitize_name(sample, max);
                assert_eq!(sanitize_name(&once, max), once, "sample {sample:?} max {max}");
            }
        }
    }

    #[test]
    fn addendum_keeps_sentence_punctuation() {
        assert_eq!(
            sanitize_addendum("continue practising\nmental maths <b>daily</b>!", 300),
            "continue practising mental maths bdailyb!"
        );
        assert_eq!(sanitize_addendum("read more, write more", 10), "read more,");
    }
}
