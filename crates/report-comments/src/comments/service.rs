use std::io::Read;
use std::sync::Arc;

use rand::Rng;

use super::assembler;
use super::bank::BankSource;
use super::batch::{self, parse_student_csv, BatchReport, RawStudentRow};
use super::domain::{CommentError, GeneratedComment, StudentInput, Variant, VariantChoice};
use crate::config::GenerationConfig;

/// A generated comment together with the phrasing variant it was drawn from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftComment {
    pub variant: Variant,
    pub comment: GeneratedComment,
}

/// Service pairing a bank source with the generation limits.
pub struct CommentService<B> {
    banks: Arc<B>,
    settings: GenerationConfig,
}

impl<B> CommentService<B>
where
    B: BankSource + 'static,
{
    pub fn new(banks: Arc<B>, settings: GenerationConfig) -> Self {
        Self { banks, settings }
    }

    pub fn settings(&self) -> &GenerationConfig {
        &self.settings
    }

    pub fn banks(&self) -> &B {
        &self.banks
    }

    /// Generate one comment, resolving the variant through `choice`.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        input: &StudentInput,
        choice: VariantChoice,
        rng: &mut R,
    ) -> Result<DraftComment, CommentError> {
        let variant = choice.resolve(rng);
        let bank = self.banks.resolve(input.subject, input.year, variant)?;
        let comment = assembler::generate(input, bank, &self.settings, rng)?;
        Ok(DraftComment { variant, comment })
    }

    pub fn generate_batch<R: Rng + ?Sized>(
        &self,
        rows: &[RawStudentRow],
        choice: VariantChoice,
        rng: &mut R,
    ) -> BatchReport {
        batch::generate_batch(rows, self.banks.as_ref(), choice, &self.settings, rng)
    }

    /// Parse an uploaded table and generate every row it holds.
    pub fn generate_from_csv<Rd: Read, R: Rng + ?Sized>(
        &self,
        reader: Rd,
        choice: VariantChoice,
        rng: &mut R,
    ) -> Result<BatchReport, csv::Error> {
        let rows = parse_student_csv(reader)?;
        Ok(self.generate_batch(&rows, choice, rng))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comments::bank::{BankRegistry, StatementBank};
    use crate::comments::domain::{ConfigurationError, Gender, Subject, YearLevel};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::io::Cursor;

    fn student() -> StudentInput {
        StudentInput {
            subject: Subject::Science,
            year: YearLevel::Year7,
            name: "amira".to_string(),
            gender: Gender::Female,
            attitude: 90,
            achievement: 85,
            target: 80,
            addendum: None,
        }
    }

    fn service() -> CommentService<BankRegistry> {
        CommentService::new(
            Arc::new(BankRegistry::embedded().expect("banks")),
            GenerationConfig::default(),
        )
    }

    #[test]
    fn fixed_variant_is_reported_back() {
        let draft = service()
            .generate(
                &student(),
                VariantChoice::Fixed(Variant::Second),
                &mut ChaCha8Rng::seed_from_u64(1),
            )
            .expect("generated");
        assert_eq!(draft.variant, Variant::Second);
        assert!(draft.comment.text().contains("Amira"));
    }

    struct EmptySource;

    impl BankSource for EmptySource {
        fn resolve(
            &self,
            subject: Subject,
            year: YearLevel,
            variant: Variant,
        ) -> Result<&StatementBank, ConfigurationError> {
            Err(ConfigurationError::MissingBank {
                subject,
                year,
                variant,
            })
        }
    }

    #[test]
    fn missing_bank_surfaces_as_configuration_error() {
        let service = CommentService::new(Arc::new(EmptySource), GenerationConfig::default());
        let error = service
            .generate(
                &student(),
                VariantChoice::Random,
                &mut ChaCha8Rng::seed_from_u64(1),
            )
            .expect_err("no banks registered");
        assert!(matches!(
            error,
            CommentError::Configuration(ConfigurationError::MissingBank { .. })
        ));
    }

    #[test]
    fn csv_upload_flows_through_the_batch() {
        let report = service()
            .generate_from_csv(
                Cursor::new("Student Name,Subject,Year\nAmira,Science,7\nBen,Maths,5\n"),
                VariantChoice::Random,
                &mut ChaCha8Rng::seed_from_u64(6),
            )
            .expect("parsed");
        assert_eq!(report.generated_count(), 2);
        assert_eq!(report.dropped_rows(), 0);
    }
}
