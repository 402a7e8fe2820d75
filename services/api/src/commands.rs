use crate::infra::{build_service, command_rng, parse_variant};
use chrono::Local;
use clap::Args;
use report_comments::comments::{
    export_file_name, write_comment_csv, Gender, StudentInput, Subject, Variant, YearLevel,
};
use report_comments::config::AppConfig;
use report_comments::error::AppError;
use std::fs::File;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub(crate) struct GenerateArgs {
    /// English, Maths or Science
    #[arg(long)]
    pub(crate) subject: Subject,
    /// Year group: 5, 7 or 8
    #[arg(long)]
    pub(crate) year: YearLevel,
    /// Student name as it should appear in the comment
    #[arg(long)]
    pub(crate) name: String,
    /// Male, Female, or anything else for they/their
    #[arg(long, default_value = "")]
    pub(crate) gender: String,
    /// Attitude band (90, 85, 80, 75, 70, 65, 60, 55 or 40)
    #[arg(long)]
    pub(crate) attitude: u32,
    /// Achievement band
    #[arg(long)]
    pub(crate) achievement: u32,
    /// Target band
    #[arg(long)]
    pub(crate) target: u32,
    /// Optional next-steps note appended as the final sentence
    #[arg(long)]
    pub(crate) addendum: Option<String>,
    /// Phrasing variant (1 or 2); picked at random when omitted
    #[arg(long, value_parser = parse_variant)]
    pub(crate) variant: Option<Variant>,
    /// Seed for repeatable opener, closer and variant picks
    #[arg(long)]
    pub(crate) seed: Option<u64>,
}

#[derive(Args, Debug)]
pub(crate) struct BatchArgs {
    /// Student CSV with Student Name, Gender, Subject, Year, Attitude, Achievement, Target
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Phrasing variant (1 or 2); picked at random per row when omitted
    #[arg(long, value_parser = parse_variant)]
    pub(crate) variant: Option<Variant>,
    /// Seed for repeatable opener, closer and variant picks
    #[arg(long)]
    pub(crate) seed: Option<u64>,
    /// Write generated comments to this CSV file, or into this directory with a timestamped name
    #[arg(long)]
    pub(crate) export: Option<PathBuf>,
}

pub(crate) fn run_generate(args: GenerateArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let service = build_service(&config)?;
    let mut rng = command_rng(args.seed);

    let input = StudentInput {
        subject: args.subject,
        year: args.year,
        name: args.name,
        gender: Gender::from_label(&args.gender),
        attitude: args.attitude,
        achievement: args.achievement,
        target: args.target,
        addendum: args.addendum,
    };

    let draft = service.generate(&input, args.variant.into(), &mut rng)?;
    let budget = service.settings().char_budget;

    println!("{}", draft.comment);
    println!(
        "\n{} characters / {} budget | {} words | variant {} | {}",
        draft.comment.char_count(),
        budget,
        draft.comment.word_count(),
        draft.variant,
        draft.comment.length_status(budget).label()
    );

    Ok(())
}

pub(crate) fn run_batch(args: BatchArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let service = build_service(&config)?;
    let mut rng = command_rng(args.seed);

    let file = File::open(&args.csv)?;
    let report = service.generate_from_csv(file, args.variant.into(), &mut rng)?;

    println!(
        "Batch from {}: {} generated | {} failed | {} dropped over the {}-row cap",
        args.csv.display(),
        report.generated_count(),
        report.failed_count(),
        report.dropped_rows(),
        service.settings().batch_row_cap
    );
    for outcome in report.rows() {
        match outcome {
            Ok(generated) => {
                println!(
                    "\n[{}] {} ({} year {}, variant {})",
                    generated.row,
                    generated.name,
                    generated.subject,
                    generated.year,
                    generated.variant
                );
                println!("  {}", generated.comment);
            }
            Err(error) => println!("\n[{}] skipped: {}", error.row, error.failure),
        }
    }

    if let Some(target) = args.export {
        let now = Local::now().naive_local();
        let path = export_path(&target, now);
        let records = report.records(now);
        write_comment_csv(&records, File::create(&path)?)?;
        println!("\nExported {} comments to {}", records.len(), path.display());
    }

    Ok(())
}

fn export_path(target: &Path, now: chrono::NaiveDateTime) -> PathBuf {
    if target.is_dir() {
        target.join(export_file_name(now))
    } else {
        target.to_path_buf()
    }
}
