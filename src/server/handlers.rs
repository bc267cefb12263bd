//! API request handlers.

use axum::{
    extract::{multipart::Field, Multipart, State},
    http::{header, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

use crate::convert::{compress_document, convert_documents};
use crate::error::{ProcessError, ValidationError};
use crate::model::{CompressionLevel, CompressionRequest, Deliverable, SourceDocument};

use super::error::ApiError;
use super::AppState;

const X_ORIGINAL_SIZE: HeaderName = HeaderName::from_static("x-original-size");
const X_COMPRESSED_SIZE: HeaderName = HeaderName::from_static("x-compressed-size");
const X_COMPRESSION_RATIO: HeaderName = HeaderName::from_static("x-compression-ratio");

/// GET /api/
pub async fn root_handler() -> Json<Value> {
    Json(json!({ "message": "Hello World" }))
}

/// Word to PDF endpoint handler.
///
/// POST /api/convert/word-to-pdf
///
/// Multipart fields:
/// - `files` (or `files[]`): one or more `.docx` uploads, converted in order
/// - `single_pdf` (optional, default true): merge into one PDF, otherwise ZIP
pub async fn convert_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response, ApiError> {
    let mut documents = Vec::new();
    let mut single_pdf = true;

    while let Some(field) = multipart.next_field().await.map_err(ApiError::multipart)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "files" | "files[]" => {
                if let Some(document) = read_upload(field).await? {
                    documents.push(document);
                }
            }
            "single_pdf" => {
                let value = field.text().await.map_err(ApiError::multipart)?;
                single_pdf = parse_bool(&value).ok_or_else(|| ValidationError::InvalidField {
                    field: "single_pdf".into(),
                    message: format!("expected true or false, got '{}'", value.trim()),
                })?;
            }
            other => log::debug!("Ignoring form field '{}'", other),
        }
    }

    if documents.is_empty() {
        return Err(ValidationError::NoFiles.into());
    }
    log::info!(
        "Converting {} document(s), single_pdf={}",
        documents.len(),
        single_pdf
    );

    let settings = state.config.render_settings();
    let bundle = run_job(&state, "Conversion failed", move || {
        convert_documents(documents, single_pdf, &settings)
    })
    .await?;
    bundle.deliver(|bundle| attachment(bundle.into_deliverable()))
}

/// PDF compression endpoint handler.
///
/// POST /api/compress/pdf
pub async fn compress_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response, ApiError> {
    let mut upload = None;
    let mut level = state.config.default_compression_level;

    while let Some(field) = multipart.next_field().await.map_err(ApiError::multipart)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => upload = read_upload(field).await?,
            "compression_level" => {
                let value = field.text().await.map_err(ApiError::multipart)?;
                level = parse_level(&value)?;
            }
            other => log::debug!("Ignoring form field '{}'", other),
        }
    }

    let upload = upload.ok_or_else(|| ValidationError::MissingField("file".into()))?;
    let request = CompressionRequest::new(upload.filename, upload.bytes, level);

    let compressed =
        run_job(&state, "Compression failed", move || compress_document(request)).await?;

    compressed.deliver(|compressed| {
        let report = compressed.report;
        let ratio = HeaderValue::from_str(&format!("{:.2}", report.ratio()))
            .map_err(ApiError::internal)?;
        let mut response = attachment(compressed.into_deliverable())?;
        let headers = response.headers_mut();
        headers.insert(X_ORIGINAL_SIZE, HeaderValue::from(report.original_size));
        headers.insert(X_COMPRESSED_SIZE, HeaderValue::from(report.compressed_size));
        headers.insert(X_COMPRESSION_RATIO, ratio);
        Ok(response)
    })
}

/// Read one file field. A field with neither a filename nor content is what
/// browsers send for an empty file input and counts as absent.
async fn read_upload(field: Field<'_>) -> Result<Option<SourceDocument>, ApiError> {
    let filename = field.file_name().unwrap_or_default().to_string();
    let data = field.bytes().await.map_err(ApiError::multipart)?;
    if filename.is_empty() && data.is_empty() {
        return Ok(None);
    }
    Ok(Some(SourceDocument::new(filename, data.to_vec())))
}

/// Run CPU-bound work on the blocking pool, bounded by the job semaphore
async fn run_job<T, F>(state: &AppState, failure: &'static str, job: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, ProcessError> + Send + 'static,
    T: Send + 'static,
{
    let permit = state
        .jobs
        .clone()
        .acquire_owned()
        .await
        .map_err(ApiError::internal)?;
    let outcome = tokio::task::spawn_blocking(move || {
        let _permit = permit;
        job()
    })
    .await
    .map_err(ApiError::internal)?;
    outcome.map_err(|e| ApiError::from_process(e, failure))
}

fn attachment(deliverable: Deliverable) -> Result<Response, ApiError> {
    let disposition = format!(
        "attachment; filename=\"{}\"",
        header_safe_filename(&deliverable.filename)
    );
    let disposition = HeaderValue::from_str(&disposition).map_err(ApiError::internal)?;
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(deliverable.mime_type)),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        deliverable.bytes,
    )
        .into_response())
}

/// Visible ASCII only, without quotes or backslashes
fn header_safe_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_ascii_graphic() || c == ' ' => c,
            _ => '_',
        })
        .collect()
}

/// Parse a form boolean (true/false, 1/0, yes/no, on/off; case-insensitive)
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_level(value: &str) -> Result<CompressionLevel, ValidationError> {
    let invalid = |message: String| ValidationError::InvalidField {
        field: "compression_level".into(),
        message,
    };
    let level: i64 = value
        .trim()
        .parse()
        .map_err(|_| invalid(format!("expected an integer, got '{}'", value.trim())))?;
    CompressionLevel::new(level).map_err(|e| invalid(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("true"), Some(true));
        assert_eq!(parse_bool(" FALSE "), Some(false));
        assert_eq!(parse_bool("1"), Some(true));
        assert_eq!(parse_bool("off"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
        assert_eq!(parse_bool(""), None);
    }

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("40").unwrap().value(), 40);
        assert_eq!(parse_level(" 0 ").unwrap().value(), 0);
        assert!(parse_level("101").is_err());
        assert!(parse_level("-5").is_err());
        assert!(parse_level("high").is_err());
        assert!(parse_level("50.5").is_err());
    }

    #[test]
    fn test_header_safe_filename() {
        assert_eq!(header_safe_filename("compressed_scan.pdf"), "compressed_scan.pdf");
        assert_eq!(header_safe_filename("my \"file\".pdf"), "my _file_.pdf");
        assert_eq!(header_safe_filename("résumé.pdf"), "r_sum_.pdf");
    }
}
