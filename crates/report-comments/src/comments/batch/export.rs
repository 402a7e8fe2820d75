use super::BatchComment;
use crate::comments::domain::{Subject, YearLevel};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::io::Write;

pub const EXPORT_HEADER: [&str; 5] = ["Student Name", "Subject", "Year", "Comment", "Generated"];

const GENERATED_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentRecord {
    pub name: String,
    pub subject: Subject,
    pub year: YearLevel,
    pub comment: String,
    pub generated_at: NaiveDateTime,
}

impl CommentRecord {
    pub fn from_batch(generated: &BatchComment, generated_at: NaiveDateTime) -> Self {
        Self {
            name: generated.name.clone(),
            subject: generated.subject,
            year: generated.year,
            comment: generated.comment.text().to_string(),
            generated_at,
        }
    }
}

pub fn write_comment_csv<W: Write>(records: &[CommentRecord], writer: W) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(EXPORT_HEADER)?;

    for record in records {
        let year = record.year.to_string();
        let generated = record.generated_at.format(GENERATED_FORMAT).to_string();
        csv_writer.write_record([
            record.name.as_str(),
            record.subject.label(),
            year.as_str(),
            record.comment.as_str(),
            generated.as_str(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}

pub fn export_file_name(now: NaiveDateTime) -> String {
    format!("report_comments_{}.csv", now.format("%Y%m%d_%H%M"))
}
