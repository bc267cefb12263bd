//! HTTP API tests driven through the router with hand-written multipart bodies.

mod common;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use common::{docx_with_heading, page_count, pdf_text, sample_pdf};
use docpdf::config::ServerConfig;
use docpdf::create_router;

const BOUNDARY: &str = "X-DOCPDF-BOUNDARY";

enum Part<'a> {
    File {
        field: &'a str,
        filename: &'a str,
        content_type: &'a str,
        data: Vec<u8>,
    },
    Text {
        field: &'a str,
        value: &'a str,
    },
}

fn multipart_body(parts: Vec<Part>) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::File {
                field,
                filename,
                content_type,
                data,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{field}\"; \
                         filename=\"{filename}\"\r\n\
                         Content-Type: {content_type}\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(&data);
            }
            Part::Text { field, value } => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{field}\"\r\n\r\n{value}")
                        .as_bytes(),
                );
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn docx_part<'a>(filename: &'a str, heading: &str) -> Part<'a> {
    Part::File {
        field: "files",
        filename,
        content_type: "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        data: docx_with_heading(heading),
    }
}

fn router() -> Router {
    create_router(ServerConfig::default())
}

async fn post(
    router: Router,
    uri: &str,
    parts: Vec<Part<'_>>,
) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
    let body = multipart_body(parts);
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header(header::CONTENT_LENGTH, body.len())
        .body(Body::from(body))
        .expect("Failed to build request");

    let response = router.oneshot(request).await.expect("Request failed");
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), 64 * 1024 * 1024)
        .await
        .expect("Failed to read body");
    (status, headers, bytes.to_vec())
}

fn detail(body: &[u8]) -> String {
    let value: Value = serde_json::from_slice(body).expect("error body should be JSON");
    value["detail"].as_str().unwrap_or_default().to_string()
}

#[tokio::test]
async fn test_root_acknowledges() {
    let response = router()
        .oneshot(Request::get("/api/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), 1024).await.unwrap();
    let value: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(value["message"], "Hello World");
}

#[tokio::test]
async fn test_word_to_single_pdf() {
    let (status, headers, body) = post(
        router(),
        "/api/convert/word-to-pdf",
        vec![
            docx_part("doc1.docx", "Report A"),
            docx_part("doc2.docx", "Report B"),
            Part::Text {
                field: "single_pdf",
                value: "true",
            },
        ],
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CONTENT_TYPE], "application/pdf");
    assert_eq!(
        headers[header::CONTENT_DISPOSITION],
        "attachment; filename=\"converted-documents.pdf\""
    );
    let text = pdf_text(&body);
    assert!(text.find("Report A").unwrap() < text.find("Report B").unwrap());
}

#[tokio::test]
async fn test_word_to_zip_with_bracketed_field_name() {
    let mut second = docx_part("b.docx", "World");
    if let Part::File { field, .. } = &mut second {
        *field = "files[]";
    }
    let (status, headers, body) = post(
        router(),
        "/api/convert/word-to-pdf",
        vec![
            docx_part("a.docx", "Hello"),
            second,
            Part::Text {
                field: "single_pdf",
                value: "false",
            },
        ],
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CONTENT_TYPE], "application/zip");
    let archive = zip::ZipArchive::new(std::io::Cursor::new(body)).unwrap();
    let mut names: Vec<&str> = archive.file_names().collect();
    names.sort();
    assert_eq!(names, vec!["a.pdf", "b.pdf"]);
}

#[tokio::test]
async fn test_text_upload_is_a_bad_request() {
    let (status, _, body) = post(
        router(),
        "/api/convert/word-to-pdf",
        vec![Part::File {
            field: "files",
            filename: "notes.txt",
            content_type: "text/plain",
            data: b"hello".to_vec(),
        }],
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(detail(&body).contains("notes.txt"));

    let (status, _, _) = post(
        router(),
        "/api/compress/pdf",
        vec![Part::File {
            field: "file",
            filename: "notes.txt",
            content_type: "text/plain",
            data: b"hello".to_vec(),
        }],
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_missing_files_are_unprocessable() {
    let (status, _, body) = post(
        router(),
        "/api/convert/word-to-pdf",
        vec![Part::Text {
            field: "single_pdf",
            value: "true",
        }],
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(detail(&body), "No files provided");

    let (status, _, body) = post(
        router(),
        "/api/compress/pdf",
        vec![Part::Text {
            field: "compression_level",
            value: "50",
        }],
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(detail(&body).contains("file"));
}

#[tokio::test]
async fn test_invalid_flag_and_level_are_unprocessable() {
    let (status, _, _) = post(
        router(),
        "/api/convert/word-to-pdf",
        vec![
            docx_part("a.docx", "Hello"),
            Part::Text {
                field: "single_pdf",
                value: "perhaps",
            },
        ],
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    for level in ["150", "-1", "lots"] {
        let (status, _, _) = post(
            router(),
            "/api/compress/pdf",
            vec![
                Part::File {
                    field: "file",
                    filename: "a.pdf",
                    content_type: "application/pdf",
                    data: sample_pdf(1),
                },
                Part::Text {
                    field: "compression_level",
                    value: level,
                },
            ],
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "level {}", level);
    }
}

#[tokio::test]
async fn test_corrupt_docx_is_a_generic_server_error() {
    let (status, _, body) = post(
        router(),
        "/api/convert/word-to-pdf",
        vec![Part::File {
            field: "files",
            filename: "broken.docx",
            content_type: "application/octet-stream",
            data: b"not a zip at all".to_vec(),
        }],
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(detail(&body), "Conversion failed");
}

#[tokio::test]
async fn test_compress_pdf_reports_sizes() {
    let input = sample_pdf(3);
    let (status, headers, body) = post(
        router(),
        "/api/compress/pdf",
        vec![
            Part::File {
                field: "file",
                filename: "scan.pdf",
                content_type: "application/pdf",
                data: input.clone(),
            },
            Part::Text {
                field: "compression_level",
                value: "70",
            },
        ],
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CONTENT_TYPE], "application/pdf");
    assert_eq!(
        headers[header::CONTENT_DISPOSITION],
        "attachment; filename=\"compressed_scan.pdf\""
    );
    assert_eq!(
        headers["x-original-size"].to_str().unwrap(),
        input.len().to_string()
    );
    assert_eq!(
        headers["x-compressed-size"].to_str().unwrap(),
        body.len().to_string()
    );
    assert!(headers.contains_key("x-compression-ratio"));
    assert!(body.len() <= input.len());
    assert_eq!(page_count(&body), 3);
}

#[tokio::test]
async fn test_compress_rejects_fake_pdf() {
    let (status, _, _) = post(
        router(),
        "/api/compress/pdf",
        vec![Part::File {
            field: "file",
            filename: "fake.pdf",
            content_type: "application/pdf",
            data: b"GIF89a not a pdf".to_vec(),
        }],
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let response = router()
        .oneshot(
            Request::get("/api/")
                .header(header::ORIGIN, "https://example.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
}

#[tokio::test]
async fn test_oversized_upload_is_rejected() {
    let config = ServerConfig {
        max_upload_bytes: 1024,
        ..ServerConfig::default()
    };
    let (status, _, _) = post(
        create_router(config),
        "/api/compress/pdf",
        vec![Part::File {
            field: "file",
            filename: "big.pdf",
            content_type: "application/pdf",
            data: sample_pdf(5),
        }],
    )
    .await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
}
