//! PDF stream compression helper
//!
//! printpdf writes its content streams uncompressed; lopdf deflates them.

use crate::error::PdfError;

/// Compress PDF streams to reduce file size.
///
/// This is a post-processing step for freshly generated documents. We parse
/// the PDF bytes with lopdf, compress all streams, and re-save.
pub fn compress_pdf(uncompressed: &[u8]) -> Result<Vec<u8>, PdfError> {
    let mut doc = lopdf::Document::load_mem(uncompressed)
        .map_err(|e| PdfError::Parse(format!("Failed to parse PDF for compression: {}", e)))?;

    doc.compress();

    let mut output = Vec::with_capacity(uncompressed.len());
    doc.save_to(&mut output)
        .map_err(|e| PdfError::Save(e.to_string()))?;

    Ok(output)
}
