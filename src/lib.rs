pub mod cli;
pub mod config;
pub mod convert;
pub mod error;
pub mod model;
pub mod parser;
pub mod pdf;
pub mod render;
pub mod server;

pub use cli::PageSize;
pub use config::{ServerConfig, Settings};
pub use convert::{compress_document, convert_documents};
pub use error::{DocxError, PdfError, ProcessError, RenderError, ValidationError};
pub use model::{
    CompressedPdf, CompressionLevel, CompressionRequest, DocumentElement, OutputBundle,
    Processed, SourceDocument,
};
pub use parser::parse_docx;
pub use render::DocumentRenderer;
pub use server::create_router;

use parser::ParseOptions;

/// Convert a single `.docx` document to PDF bytes.
///
/// This is the simplest library entry point: it validates the upload, extracts
/// its content and renders it with the given settings. Use
/// [`convert_documents`] to merge or zip several documents.
///
/// # Example
///
/// ```no_run
/// use docpdf::{convert_docx, Settings};
///
/// let bytes = std::fs::read("report.docx").unwrap();
/// let pdf = convert_docx("report.docx", bytes, &Settings::default()).unwrap();
/// std::fs::write("report.pdf", pdf).unwrap();
/// ```
pub fn convert_docx(
    filename: &str,
    bytes: Vec<u8>,
    settings: &Settings,
) -> Result<Vec<u8>, ProcessError> {
    let document = SourceDocument::new(filename, bytes);
    document.validate()?;

    let renderer = DocumentRenderer::new(settings.clone());
    let options = ParseOptions {
        uppercase_as_heading: settings.uppercase_as_heading,
    };
    convert::convert_document(&document, &renderer, &options).map(|artifact| artifact.pdf)
}
