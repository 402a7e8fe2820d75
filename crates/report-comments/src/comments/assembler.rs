use super::bank::StatementBank;
use super::domain::{Band, BandSlot, CommentError, GeneratedComment, StudentInput};
use super::text::{
    apply_pronouns, british_spelling, build_sentence, finalize_punctuation, sanitize_addendum,
    sanitize_name, truncate_at_sentence,
};
use crate::config::GenerationConfig;
use rand::Rng;
use tracing::{debug, warn};

fn band(slot: BandSlot, value: u32) -> Result<Band, CommentError> {
    Band::new(value).ok_or(CommentError::InvalidBand { slot, value })
}

/// Assembles one comment from `bank` for `input`.
///
/// Sentence order is fixed: attitude, achievement (reading then writing for English), target
/// (plus the writing target for English), closer, and the optional next-steps note. The opener
/// and closer are drawn from `rng`; everything else is deterministic.
pub fn generate<R: Rng + ?Sized>(
    input: &StudentInput,
    bank: &StatementBank,
    settings: &GenerationConfig,
    rng: &mut R,
) -> Result<GeneratedComment, CommentError> {
    let attitude_band = band(BandSlot::Attitude, input.attitude)?;
    let achievement_band = band(BandSlot::Achievement, input.achievement)?;
    let target_band = band(BandSlot::Target, input.target)?;

    let name = sanitize_name(&input.name, settings.name_max_chars);
    let pronouns = input.gender.pronouns();
    let subject = bank.key().subject;

    let opener = bank.openers().choose(rng);
    let closer = bank.closers().choose(rng);

    let normalized = |template: &str| apply_pronouns(template, pronouns);

    let mut sentences = Vec::with_capacity(7);

    let named = if name.is_empty() {
        pronouns.subject
    } else {
        name.as_str()
    };
    sentences.push(build_sentence(
        &format!("{opener} {named}"),
        &normalized(bank.attitude().get(attitude_band)),
        None,
    ));

    sentences.push(build_sentence(
        subject.achievement_prefix().unwrap_or_default(),
        &normalized(bank.achievement().get(achievement_band)),
        Some(pronouns.subject),
    ));
    if let Some(writing) = bank.writing() {
        sentences.push(build_sentence(
            "In writing,",
            &normalized(writing.achievement.get(achievement_band)),
            Some(pronouns.subject),
        ));
    }

    sentences.push(build_sentence(
        &format!("For the next term, {} should", pronouns.subject),
        &normalized(bank.target().get(target_band)),
        None,
    ));
    if let Some(writing) = bank.writing() {
        sentences.push(build_sentence(
            &format!("Additionally, {} should", pronouns.subject),
            &normalized(writing.target.get(target_band)),
            None,
        ));
    }

    sentences.push(build_sentence("", closer, None));

    // A note with no letter or digit left after sanitising counts as absent.
    let addendum = input
        .addendum
        .as_deref()
        .map(|raw| sanitize_addendum(raw, settings.addendum_max_chars))
        .filter(|note| note.chars().any(char::is_alphanumeric));
    if let Some(addendum) = addendum.as_deref() {
        sentences.push(build_sentence("Next steps:", addendum, None));
    }

    let joined = sentences
        .iter()
        .filter(|sentence| !sentence.is_empty())
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ");
    let british = british_spelling(joined.trim());

    let truncated = truncate_at_sentence(&british, settings.char_budget);
    if truncated.len() < british.len() && !truncated.contains('.') {
        warn!(
            budget = settings.char_budget,
            "comment truncated without a sentence boundary"
        );
    }
    if addendum.is_some() && !truncated.contains("Next steps:") {
        warn!(
            budget = settings.char_budget,
            "next-steps note did not fit the character budget"
        );
    }

    let comment = GeneratedComment::new(finalize_punctuation(&truncated));
    debug!(
        subject = %subject,
        year = %bank.key().year,
        variant = %bank.key().variant,
        chars = comment.char_count(),
        "comment generated"
    );
    Ok(comment)
}
