use std::io::Cursor;
use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use chrono::Local;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use super::bank::BankSource;
use super::batch::{export_file_name, write_comment_csv, CommentRecord, RowOutcome};
use super::domain::{LengthStatus, StudentInput, Subject, Variant, YearLevel};
use super::service::{CommentService, DraftComment};
use crate::error::AppError;

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    #[serde(flatten)]
    pub student: StudentInput,
    #[serde(default)]
    pub variant: Option<Variant>,
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct CommentView {
    pub comment: String,
    pub variant: Variant,
    pub char_count: usize,
    pub word_count: usize,
    pub char_budget: usize,
    pub length_status: LengthStatus,
    pub length_label: &'static str,
}

impl CommentView {
    fn from_draft(draft: DraftComment, char_budget: usize) -> Self {
        let status = draft.comment.length_status(char_budget);
        Self {
            char_count: draft.comment.char_count(),
            word_count: draft.comment.word_count(),
            comment: draft.comment.into_text(),
            variant: draft.variant,
            char_budget,
            length_status: status,
            length_label: status.label(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct BatchRequest {
    pub csv: String,
    #[serde(default)]
    pub variant: Option<Variant>,
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BatchRowView {
    Generated {
        row: usize,
        name: String,
        subject: Subject,
        year: YearLevel,
        variant: Variant,
        comment: String,
    },
    Failed {
        row: usize,
        error: String,
        raw: std::collections::BTreeMap<String, String>,
    },
}

impl From<RowOutcome> for BatchRowView {
    fn from(outcome: RowOutcome) -> Self {
        match outcome {
            Ok(generated) => Self::Generated {
                row: generated.row,
                name: generated.name,
                subject: generated.subject,
                year: generated.year,
                variant: generated.variant,
                comment: generated.comment.into_text(),
            },
            Err(error) => Self::Failed {
                row: error.row,
                error: error.failure.to_string(),
                raw: error.raw.values().clone(),
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BatchView {
    pub generated: usize,
    pub failed: usize,
    pub dropped_rows: usize,
    pub rows: Vec<BatchRowView>,
}

#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    pub records: Vec<CommentRecord>,
}

/// Router builder exposing comment generation, batch upload, and CSV export.
pub fn comment_router<B>(service: Arc<CommentService<B>>) -> Router
where
    B: BankSource + 'static,
{
    Router::new()
        .route("/api/v1/comments", post(generate_handler::<B>))
        .route("/api/v1/comments/batch", post(batch_handler::<B>))
        .route("/api/v1/comments/export", post(export_handler))
        .with_state(service)
}

fn request_rng(seed: Option<u64>) -> StdRng {
    seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64)
}

pub(crate) async fn generate_handler<B>(
    State(service): State<Arc<CommentService<B>>>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<CommentView>, AppError>
where
    B: BankSource + 'static,
{
    let mut rng = request_rng(request.seed);
    let draft = service.generate(&request.student, request.variant.into(), &mut rng)?;
    Ok(Json(CommentView::from_draft(
        draft,
        service.settings().char_budget,
    )))
}

pub(crate) async fn batch_handler<B>(
    State(service): State<Arc<CommentService<B>>>,
    Json(request): Json<BatchRequest>,
) -> Result<Json<BatchView>, AppError>
where
    B: BankSource + 'static,
{
    let mut rng = request_rng(request.seed);
    let report = service.generate_from_csv(
        Cursor::new(request.csv.as_bytes()),
        request.variant.into(),
        &mut rng,
    )?;

    let view = BatchView {
        generated: report.generated_count(),
        failed: report.failed_count(),
        dropped_rows: report.dropped_rows(),
        rows: report
            .into_rows()
            .into_iter()
            .map(BatchRowView::from)
            .collect(),
    };
    Ok(Json(view))
}

pub(crate) async fn export_handler(
    Json(request): Json<ExportRequest>,
) -> Result<Response, AppError> {
    let mut buffer = Vec::new();
    write_comment_csv(&request.records, &mut buffer)?;

    let file_name = export_file_name(Local::now().naive_local());
    let disposition = format!("attachment; filename=\"{file_name}\"");
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        buffer,
    )
        .into_response())
}
