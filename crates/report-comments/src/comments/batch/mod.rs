mod export;
mod parser;

pub use export::{export_file_name, write_comment_csv, CommentRecord, EXPORT_HEADER};
pub use parser::{
    parse_student_csv, RawStudentRow, COLUMN_ACHIEVEMENT, COLUMN_ATTITUDE, COLUMN_GENDER,
    COLUMN_NAME, COLUMN_SUBJECT, COLUMN_TARGET, COLUMN_YEAR,
};

use super::assembler::generate;
use super::bank::BankSource;
use super::domain::{CommentError, GeneratedComment, Subject, Variant, VariantChoice, YearLevel};
use super::text::sanitize_name;
use crate::config::GenerationConfig;
use chrono::NaiveDateTime;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{info, warn};

/// Why one batch row produced no comment.
#[derive(Debug, thiserror::Error)]
pub enum RowFailure {
    #[error("{column} value '{value}' is invalid: {reason}")]
    InvalidField {
        column: &'static str,
        value: String,
        reason: String,
    },
    #[error(transparent)]
    Comment(#[from] CommentError),
}

impl RowFailure {
    pub(crate) fn invalid(column: &'static str, value: &str, reason: String) -> Self {
        Self::InvalidField {
            column,
            value: value.to_string(),
            reason,
        }
    }
}

/// A failed row, numbered from 1 in upload order and carrying the raw cells for diagnostics.
#[derive(Debug, thiserror::Error)]
#[error("row {row}: {failure}")]
pub struct RowError {
    pub row: usize,
    pub raw: RawStudentRow,
    #[source]
    pub failure: RowFailure,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchComment {
    pub row: usize,
    pub name: String,
    pub subject: Subject,
    pub year: YearLevel,
    pub variant: Variant,
    pub comment: GeneratedComment,
}

pub type RowOutcome = Result<BatchComment, RowError>;

#[derive(Debug)]
pub struct BatchReport {
    rows: Vec<RowOutcome>,
    dropped_rows: usize,
}

impl BatchReport {
    /// One outcome per processed row, in upload order.
    pub fn rows(&self) -> &[RowOutcome] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<RowOutcome> {
        self.rows
    }

    /// Rows past the configured cap that were never processed.
    pub fn dropped_rows(&self) -> usize {
        self.dropped_rows
    }

    pub fn comments(&self) -> impl Iterator<Item = &BatchComment> {
        self.rows.iter().filter_map(|outcome| outcome.as_ref().ok())
    }

    pub fn errors(&self) -> impl Iterator<Item = &RowError> {
        self.rows.iter().filter_map(|outcome| outcome.as_ref().err())
    }

    pub fn generated_count(&self) -> usize {
        self.comments().count()
    }

    pub fn failed_count(&self) -> usize {
        self.errors().count()
    }

    /// Export rows for every generated comment, stamped with `generated_at`.
    pub fn records(&self, generated_at: NaiveDateTime) -> Vec<CommentRecord> {
        self.comments()
            .map(|generated| CommentRecord::from_batch(generated, generated_at))
            .collect()
    }
}

/// Generates a comment for each row, at most `settings.batch_row_cap` of them.
///
/// A failing row is recorded in place and never stops the batch. Each row draws its own seed from
/// `rng` before it is processed, so one row's outcome cannot change the phrasing picked for any
/// other row.
pub fn generate_batch<B, R>(
    rows: &[RawStudentRow],
    source: &B,
    choice: VariantChoice,
    settings: &GenerationConfig,
    rng: &mut R,
) -> BatchReport
where
    B: BankSource + ?Sized,
    R: Rng + ?Sized,
{
    let dropped_rows = rows.len().saturating_sub(settings.batch_row_cap);

    let outcomes: Vec<RowOutcome> = rows
        .iter()
        .take(settings.batch_row_cap)
        .enumerate()
        .map(|(index, raw)| {
            let row = index + 1;
            let mut row_rng = StdRng::seed_from_u64(rng.gen());
            generate_row(row, raw, source, choice, settings, &mut row_rng).map_err(|failure| {
                warn!(row, error = %failure, "batch row failed");
                RowError {
                    row,
                    raw: raw.clone(),
                    failure,
                }
            })
        })
        .collect();

    let report = BatchReport {
        rows: outcomes,
        dropped_rows,
    };
    info!(
        generated = report.generated_count(),
        failed = report.failed_count(),
        dropped = report.dropped_rows,
        "batch processed"
    );
    report
}

fn generate_row<B, R>(
    row: usize,
    raw: &RawStudentRow,
    source: &B,
    choice: VariantChoice,
    settings: &GenerationConfig,
    rng: &mut R,
) -> Result<BatchComment, RowFailure>
where
    B: BankSource + ?Sized,
    R: Rng + ?Sized,
{
    let input = raw.to_input()?;
    let variant = choice.resolve(rng);
    let bank = source
        .resolve(input.subject, input.year, variant)
        .map_err(CommentError::from)?;
    let comment = generate(&input, bank, settings, rng)?;

    Ok(BatchComment {
        row,
        name: sanitize_name(&input.name, settings.name_max_chars),
        subject: input.subject,
        year: input.year,
        variant,
        comment,
    })
}
