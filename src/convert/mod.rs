//! Request-level pipelines: Word documents to a PDF or ZIP bundle, and PDF compression

mod archive;

pub use archive::{build_archive, entry_names};

use crate::config::Settings;
use crate::error::ProcessError;
use crate::model::{
    CompressedPdf, CompressionRequest, ConvertedArtifact, OutputBundle, Processed,
    RequestLifecycle, SourceDocument, Stage,
};
use crate::parser::{parse_docx, ParseOptions};
use crate::pdf::{merge_pdfs, PdfCompressor};
use crate::render::DocumentRenderer;

/// Convert every document and bundle the results.
///
/// All inputs are validated before any is parsed; the first rejected input
/// or the first failing conversion aborts the whole request. The caller marks
/// the request delivered through [`Processed::deliver`].
pub fn convert_documents(
    documents: Vec<SourceDocument>,
    single_pdf: bool,
    settings: &Settings,
) -> Result<Processed<OutputBundle>, ProcessError> {
    let mut lifecycle = RequestLifecycle::new("convert");

    if let Err(e) = validate_all(&documents) {
        lifecycle.fail();
        return Err(e);
    }
    lifecycle.advance(Stage::Validated);

    match convert_validated(&documents, single_pdf, settings) {
        Ok(bundle) => Ok(lifecycle.processed(bundle)),
        Err(e) => {
            log::error!("Conversion failed: {}", e);
            lifecycle.fail();
            Err(e)
        }
    }
}

fn validate_all(documents: &[SourceDocument]) -> Result<(), ProcessError> {
    if documents.is_empty() {
        return Err(crate::error::ValidationError::NoFiles.into());
    }
    for document in documents {
        document.validate()?;
    }
    Ok(())
}

fn convert_validated(
    documents: &[SourceDocument],
    single_pdf: bool,
    settings: &Settings,
) -> Result<OutputBundle, ProcessError> {
    let renderer = DocumentRenderer::new(settings.clone());
    let options = ParseOptions {
        uppercase_as_heading: settings.uppercase_as_heading,
    };

    let artifacts = documents
        .iter()
        .map(|document| convert_document(document, &renderer, &options))
        .collect::<Result<Vec<_>, _>>()?;

    if single_pdf {
        let pdfs: Vec<Vec<u8>> = artifacts.into_iter().map(|a| a.pdf).collect();
        let merged = merge_pdfs(&pdfs).map_err(ProcessError::Merge)?;
        Ok(OutputBundle::SinglePdf(merged))
    } else {
        Ok(OutputBundle::Archive(build_archive(&artifacts)?))
    }
}

/// Parse and render one already-validated document
pub fn convert_document(
    document: &SourceDocument,
    renderer: &DocumentRenderer,
    options: &ParseOptions,
) -> Result<ConvertedArtifact, ProcessError> {
    let extracted = parse_docx(&document.bytes, options).map_err(|source| ProcessError::Parse {
        filename: document.filename.clone(),
        source,
    })?;
    log::info!(
        "{}: {} headings, {} paragraphs, {} tables, {} images",
        document.filename,
        extracted.count("heading"),
        extracted.count("paragraph"),
        extracted.count("table"),
        extracted.count("image")
    );
    if extracted.skipped > 0 {
        log::debug!("{}: {} unsupported blocks skipped", document.filename, extracted.skipped);
    }

    let pdf = renderer
        .render(&extracted, &document.filename)
        .map_err(|source| ProcessError::Render {
            filename: document.filename.clone(),
            source,
        })?;
    Ok(ConvertedArtifact::new(document.stem(), pdf))
}

/// Validate and compress one PDF
pub fn compress_document(
    request: CompressionRequest,
) -> Result<Processed<CompressedPdf>, ProcessError> {
    let mut lifecycle = RequestLifecycle::new("compress");

    if let Err(e) = request.validate() {
        lifecycle.fail();
        return Err(e.into());
    }
    lifecycle.advance(Stage::Validated);

    log::info!(
        "Compressing {} ({} bytes) at level {}",
        request.filename,
        request.bytes.len(),
        request.level.value()
    );
    match PdfCompressor::new(request.level).compress(&request.bytes) {
        Ok((bytes, report)) => Ok(lifecycle.processed(CompressedPdf {
            bytes,
            filename: request.output_filename(),
            report,
        })),
        Err(source) => {
            log::error!("Compression of {} failed: {}", request.filename, source);
            lifecycle.fail();
            Err(ProcessError::Compression {
                filename: request.filename,
                source,
            })
        }
    }
}
