use crate::comments::domain::{Gender, StudentInput, Subject, YearLevel};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Read;

use super::RowFailure;

pub const COLUMN_NAME: &str = "Student Name";
pub const COLUMN_GENDER: &str = "Gender";
pub const COLUMN_SUBJECT: &str = "Subject";
pub const COLUMN_YEAR: &str = "Year";
pub const COLUMN_ATTITUDE: &str = "Attitude";
pub const COLUMN_ACHIEVEMENT: &str = "Achievement";
pub const COLUMN_TARGET: &str = "Target";

const DEFAULT_SUBJECT: Subject = Subject::English;
const DEFAULT_YEAR: YearLevel = YearLevel::Year7;
const DEFAULT_BAND: u32 = 75;

/// One uploaded row as a plain column-to-value mapping. Unknown columns are carried but ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawStudentRow(BTreeMap<String, String>);

impl RawStudentRow {
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(column, value)| (column.into(), value.into()))
                .collect(),
        )
    }

    /// Trimmed cell value; empty cells read as missing.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.0
            .get(column)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    }

    pub fn values(&self) -> &BTreeMap<String, String> {
        &self.0
    }

    /// Applies the column defaults and parses each field. Band values are range-checked later by
    /// the generator, so an out-of-domain score still becomes an input here.
    pub fn to_input(&self) -> Result<StudentInput, RowFailure> {
        let subject = match self.get(COLUMN_SUBJECT) {
            Some(raw) => raw
                .parse::<Subject>()
                .map_err(|reason| RowFailure::invalid(COLUMN_SUBJECT, raw, reason))?,
            None => DEFAULT_SUBJECT,
        };

        let year = match self.get(COLUMN_YEAR) {
            Some(raw) => raw
                .parse::<YearLevel>()
                .map_err(|reason| RowFailure::invalid(COLUMN_YEAR, raw, reason))?,
            None => DEFAULT_YEAR,
        };

        Ok(StudentInput {
            subject,
            year,
            name: self.get(COLUMN_NAME).unwrap_or_default().to_string(),
            gender: self
                .get(COLUMN_GENDER)
                .map(Gender::from_label)
                .unwrap_or_default(),
            attitude: self.band(COLUMN_ATTITUDE)?,
            achievement: self.band(COLUMN_ACHIEVEMENT)?,
            target: self.band(COLUMN_TARGET)?,
            addendum: None,
        })
    }

    fn band(&self, column: &'static str) -> Result<u32, RowFailure> {
        match self.get(column) {
            Some(raw) => raw.parse::<u32>().map_err(|_| {
                RowFailure::invalid(column, raw, "expected a whole-number band score".to_string())
            }),
            None => Ok(DEFAULT_BAND),
        }
    }
}

/// Reads a delimited student table. Header problems or unreadable input fail the whole import;
/// rows themselves are never rejected here.
pub fn parse_student_csv<R: Read>(reader: R) -> Result<Vec<RawStudentRow>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .byte_headers()?
        .iter()
        .map(|header| {
            String::from_utf8_lossy(header)
                .trim_start_matches('\u{feff}')
                .to_string()
        })
        .collect();

    let mut rows = Vec::new();
    for record in csv_reader.byte_records() {
        let record = record?;
        let pairs = headers
            .iter()
            .zip(record.iter())
            .map(|(column, value)| (column.clone(), String::from_utf8_lossy(value).into_owned()));
        rows.push(RawStudentRow::from_pairs(pairs));
    }

    Ok(rows)
}
