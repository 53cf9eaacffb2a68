//! HTTP routes.
//!
//! | Route | Body | Reply |
//! |---|---|---|
//! | `GET /health` | | `{"status":"ok"}` |
//! | `POST /api/gemini` | `{prompt}` | `{response}` |
//! | `POST /api/create-docx` | `{data}` | `.docx` attachment |
//! | `POST /api/process` | `{transcript, profile?}` | processing result |
//! | `POST /api/batch/import` | raw workbook bytes | batch items |
//! | `POST /api/batch/run` | `{items, profile?}` | batch items |
//! | `POST /api/batch/export/xlsx` | `{items}` | `.xlsx` attachment |
//! | `POST /api/batch/export/docx` | `{items}` | `.docx` attachment |
//! | `POST /api/export/txt` | `{outline, firstSections, lastSections}` | `.txt` attachment |
//!
//! Errors are `{"error": "..."}` with status 400 for input problems and 500
//! otherwise.

use crate::{ApiError, AppState, ServerConfig};
use axum::{
    Json, Router,
    body::Bytes,
    extract::{DefaultBodyLimit, State, rejection::JsonRejection},
    http::header,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use castscript_core::{BatchResultItem, ProcessingResult, ScriptSections};
use castscript_error::{ServerErrorKind, ValidationErrorKind};
use castscript_export::{
    BATCH_REPORT_FILENAME, DATA_REPORT_FILENAME, DOCX_CONTENT_TYPE, TEXT_CONTENT_TYPE,
    TextDownload, XLSX_CONTENT_TYPE, XLSX_FILENAME, batch_report_docx, data_report_docx,
    export_items, import_items,
};
use castscript_narrative::{BatchRunner, NoopBatchObserver};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::instrument;

/// Reported by `/api/gemini` for any upstream failure.
pub const GEMINI_FAILURE: &str = "Failed to process with Gemini API";
/// Reported by `/api/create-docx` for any encoding failure.
pub const DOCX_FAILURE: &str = "Failed to create DOCX file";
const PROCESS_FAILURE: &str = "Failed to process transcript";
const IMPORT_FAILURE: &str = "Failed to import spreadsheet";
const EXPORT_FAILURE: &str = "Failed to export results";

/// Body of `POST /api/gemini`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptBody {
    /// Full prompt text
    #[serde(default)]
    pub prompt: Option<String>,
}

/// Reply of `POST /api/gemini`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptReply {
    /// Generated text
    pub response: String,
}

/// Body of `POST /api/create-docx`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DataBody {
    /// Anything; strings are rendered as markup
    #[serde(default)]
    pub data: Value,
}

/// Body of `POST /api/process`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProcessBody {
    /// Transcript to turn into a script
    #[serde(default)]
    pub transcript: Option<String>,
    /// Bundled profile name; the configured default when absent
    #[serde(default)]
    pub profile: Option<String>,
}

/// Body of the batch routes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemsBody {
    /// Items in upload order
    pub items: Vec<BatchResultItem>,
    /// Bundled profile name, used by `/api/batch/run`
    #[serde(default)]
    pub profile: Option<String>,
}

/// Build the application router.
pub fn router(state: AppState, config: &ServerConfig) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/gemini", post(generate))
        .route("/api/create-docx", post(create_docx))
        .route("/api/process", post(process))
        .route("/api/batch/import", post(batch_import))
        .route("/api/batch/run", post(batch_run))
        .route("/api/batch/export/xlsx", post(batch_export_xlsx))
        .route("/api/batch/export/docx", post(batch_export_docx))
        .route("/api/export/txt", post(export_txt))
        .layer(DefaultBodyLimit::max(*config.body_limit_bytes()))
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

#[instrument(skip_all)]
async fn generate(
    State(state): State<AppState>,
    payload: Result<Json<PromptBody>, JsonRejection>,
) -> Result<Json<PromptReply>, ApiError> {
    let prompt = payload
        .map_err(|rejection| tracing::debug!(error = %rejection, "Unreadable prompt body"))
        .ok()
        .and_then(|Json(body)| body.prompt)
        .filter(|prompt| !prompt.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request(ValidationErrorKind::MissingPrompt.to_string()))?;

    let response = state
        .generator()
        .generate_text(&prompt)
        .await
        .map_err(|e| ApiError::from_error(e, GEMINI_FAILURE))?;

    Ok(Json(PromptReply { response }))
}

#[instrument(skip_all)]
async fn create_docx(payload: Result<Json<DataBody>, JsonRejection>) -> Result<Response, ApiError> {
    let data = payload.map(|Json(body)| body.data).unwrap_or(Value::Null);
    let bytes = data_report_docx(&data).map_err(|e| ApiError::from_error(e, DOCX_FAILURE))?;
    Ok(attachment(bytes, DOCX_CONTENT_TYPE, DATA_REPORT_FILENAME))
}

#[instrument(skip_all)]
async fn process(
    State(state): State<AppState>,
    payload: Result<Json<ProcessBody>, JsonRejection>,
) -> Result<Json<ProcessingResult>, ApiError> {
    let Json(body) = payload.map_err(invalid_body)?;
    let transcript = body
        .transcript
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request(ValidationErrorKind::MissingTranscript.to_string()))?;

    let pipeline = state
        .pipeline(body.profile.as_deref())
        .map_err(|e| ApiError::from_error(e, PROCESS_FAILURE))?;

    Ok(Json(pipeline.process(&transcript).await))
}

#[instrument(skip_all, fields(bytes = body.len()))]
async fn batch_import(body: Bytes) -> Result<Json<Vec<BatchResultItem>>, ApiError> {
    import_items(&body)
        .map(Json)
        .map_err(|e| ApiError::from_error(e, IMPORT_FAILURE))
}

#[instrument(skip_all)]
async fn batch_run(
    State(state): State<AppState>,
    payload: Result<Json<ItemsBody>, JsonRejection>,
) -> Result<Json<Vec<BatchResultItem>>, ApiError> {
    let Json(body) = payload.map_err(invalid_body)?;
    let pipeline = state
        .pipeline(body.profile.as_deref())
        .map_err(|e| ApiError::from_error(e, PROCESS_FAILURE))?;

    let items = BatchRunner::new(pipeline)
        .run(body.items, &NoopBatchObserver)
        .await;
    Ok(Json(items))
}

#[instrument(skip_all)]
async fn batch_export_xlsx(
    payload: Result<Json<ItemsBody>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(body) = payload.map_err(invalid_body)?;
    let bytes = export_items(&body.items).map_err(|e| ApiError::from_error(e, EXPORT_FAILURE))?;
    Ok(attachment(bytes, XLSX_CONTENT_TYPE, XLSX_FILENAME))
}

#[instrument(skip_all)]
async fn batch_export_docx(
    payload: Result<Json<ItemsBody>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(body) = payload.map_err(invalid_body)?;
    let bytes =
        batch_report_docx(&body.items).map_err(|e| ApiError::from_error(e, EXPORT_FAILURE))?;
    Ok(attachment(bytes, DOCX_CONTENT_TYPE, BATCH_REPORT_FILENAME))
}

#[instrument(skip_all)]
async fn export_txt(
    payload: Result<Json<ScriptSections>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(sections) = payload.map_err(invalid_body)?;
    let download = TextDownload::for_script_today(&sections);
    Ok(attachment(
        download.content().clone().into_bytes(),
        TEXT_CONTENT_TYPE,
        download.filename(),
    ))
}

fn invalid_body(rejection: JsonRejection) -> ApiError {
    ApiError::bad_request(ServerErrorKind::InvalidBody(rejection.body_text()).to_string())
}

fn attachment(bytes: Vec<u8>, content_type: &str, filename: &str) -> Response {
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        bytes,
    )
        .into_response()
}
