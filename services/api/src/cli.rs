use crate::commands::{run_batch, run_generate, BatchArgs, GenerateArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use report_comments::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Report Comment Generator",
    about = "Assemble report-card comments from statement banks, one student or a CSV at a time",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Generate comments from the command line
    Comment {
        #[command(subcommand)]
        command: CommentCommand,
    },
}

#[derive(Subcommand, Debug)]
enum CommentCommand {
    /// Generate a single comment and print it with its length statistics
    Generate(GenerateArgs),
    /// Generate comments for every row of a student CSV
    Batch(BatchArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Comment {
            command: CommentCommand::Generate(args),
        } => run_generate(args),
        Command::Comment {
            command: CommentCommand::Batch(args),
        } => run_batch(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["report-comments-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn generate_arguments_parse_into_domain_types() {
        let cli = Cli::try_parse_from([
            "report-comments-api",
            "comment",
            "generate",
            "--subject",
            "maths",
            "--year",
            "7",
            "--name",
            "leo",
            "--gender",
            "m",
            "--attitude",
            "80",
            "--achievement",
            "75",
            "--target",
            "70",
            "--variant",
            "2",
        ])
        .expect("parses");

        let Some(Command::Comment {
            command: CommentCommand::Generate(args),
        }) = cli.command
        else {
            panic!("expected comment generate");
        };
        assert_eq!(args.subject, report_comments::comments::Subject::Maths);
        assert_eq!(args.year, report_comments::comments::YearLevel::Year7);
        assert_eq!(args.variant, Some(report_comments::comments::Variant::Second));
    }

    #[test]
    fn unsupported_year_is_rejected_by_the_parser() {
        let result = Cli::try_parse_from([
            "report-comments-api",
            "comment",
            "generate",
            "--subject",
            "science",
            "--year",
            "6",
            "--name",
            "leo",
            "--attitude",
            "80",
            "--achievement",
            "75",
            "--target",
            "70",
        ]);
        assert!(result.is_err());
    }
}
