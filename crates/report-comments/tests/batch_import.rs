use chrono::NaiveDate;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use report_comments::comments::{
    generate_batch, parse_student_csv, write_comment_csv, BankRegistry, BatchReport,
    RowFailure, Subject, VariantChoice, YearLevel,
};
use report_comments::config::GenerationConfig;
use std::io::Cursor;

const HEADER: &str = "Student Name,Gender,Subject,Year,Attitude,Achievement,Target\n";

fn run(csv: &str, seed: u64) -> BatchReport {
    let registry = BankRegistry::embedded().expect("embedded banks are valid");
    let rows = parse_student_csv(Cursor::new(csv)).expect("csv parses");
    generate_batch(
        &rows,
        &registry,
        VariantChoice::Random,
        &GenerationConfig::default(),
        &mut ChaCha8Rng::seed_from_u64(seed),
    )
}

#[test]
fn bad_year_on_row_two_is_reported_in_place() {
    let csv = format!(
        "{HEADER}Aseel,Female,English,5,75,80,85\n\
Mohamed,Male,Maths,9,80,75,80\n\
Sarah,Female,Science,8,85,90,85\n"
    );
    let report = run(&csv, 3);

    assert_eq!(report.rows().len(), 3);
    let first = report.rows()[0].as_ref().expect("row 1 generates");
    assert_eq!((first.row, first.subject), (1, Subject::English));
    let third = report.rows()[2].as_ref().expect("row 3 generates");
    assert_eq!((third.row, third.year), (3, YearLevel::Year8));

    let failed = report.rows()[1].as_ref().expect_err("row 2 fails");
    assert_eq!(failed.row, 2);
    assert_eq!(failed.raw.get("Student Name"), Some("Mohamed"));
    assert!(matches!(failed.failure, RowFailure::InvalidField { .. }));
    assert!(failed.to_string().starts_with("row 2: Year value '9' is invalid"));
}

#[test]
fn a_failing_row_does_not_change_its_neighbours() {
    let valid = format!(
        "{HEADER}Aseel,Female,English,5,75,80,85\n\
Mohamed,Male,Maths,7,80,75,80\n\
Sarah,Female,Science,8,85,90,85\n"
    );
    let bad_year = valid.replace("Maths,7,", "Maths,6,");
    let bad_band = valid.replace("Maths,7,80,75,80", "Maths,7,80,45,80");

    for seed in 0..10 {
        let baseline = run(&valid, seed);
        assert_eq!(baseline.generated_count(), 3);

        for variant_csv in [&bad_year, &bad_band] {
            let report = run(variant_csv, seed);
            assert!(report.rows()[1].is_err());
            for index in [0, 2] {
                assert_eq!(
                    report.rows()[index].as_ref().expect("neighbour generates"),
                    baseline.rows()[index].as_ref().expect("baseline generates"),
                    "seed {seed} row {}",
                    index + 1
                );
            }
        }
    }
}

#[test]
fn upload_over_the_cap_reports_dropped_rows() {
    let mut csv = String::from(HEADER);
    for index in 0..130 {
        csv.push_str(&format!("Student {index},,Science,5,75,75,75\n"));
    }
    let report = run(&csv, 12);
    assert_eq!(report.rows().len(), 100);
    assert_eq!(report.dropped_rows(), 30);
    assert_eq!(report.failed_count(), 0);
    assert!(report
        .comments()
        .all(|generated| generated.comment.char_count() <= 499));
}

#[test]
fn generated_rows_export_to_csv() {
    let csv = format!(
        "{HEADER}aseel,Female,English,5,75,80,85\n\
Bad,Male,History,7,80,75,80\n"
    );
    let report = run(&csv, 21);
    let stamp = NaiveDate::from_ymd_opt(2025, 11, 3)
        .expect("valid date")
        .and_hms_opt(15, 20, 0)
        .expect("valid time");
    let records = report.records(stamp);
    assert_eq!(records.len(), 1);

    let mut buffer = Vec::new();
    write_comment_csv(&records, &mut buffer).expect("export writes");

    let mut reader = csv::Reader::from_reader(buffer.as_slice());
    let exported: Vec<csv::StringRecord> = reader
        .records()
        .collect::<Result<_, _>>()
        .expect("export reads back");
    assert_eq!(exported.len(), 1);
    assert_eq!(&exported[0][0], "Aseel");
    assert_eq!(&exported[0][1], "English");
    assert_eq!(&exported[0][2], "5");
    assert_eq!(&exported[0][3], records[0].comment);
    assert_eq!(&exported[0][4], "2025-11-03 15:20");
}
