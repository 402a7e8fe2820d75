//! Report-card comment assembly: statement banks, text normalisation, single and batch
//! generation, and the HTTP surface over them.

pub mod assembler;
pub mod bank;
pub mod batch;
pub mod domain;
pub mod router;
pub mod service;
pub mod text;

pub use assembler::generate;
pub use bank::{BankKey, BankRegistry, BankSource, StatementBank};
pub use batch::{
    export_file_name, generate_batch, parse_student_csv, write_comment_csv, BatchComment,
    BatchReport, CommentRecord, RawStudentRow, RowError, RowFailure,
};
pub use domain::{
    Band, BandSlot, CommentError, ConfigurationError, Gender, GeneratedComment, LengthStatus,
    Pronouns, StudentInput, Subject, Variant, VariantChoice, YearLevel,
};
pub use router::comment_router;
pub use service::{CommentService, DraftComment};
