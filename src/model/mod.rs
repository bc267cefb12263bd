pub mod bundle;
pub mod element;
pub mod lifecycle;
pub mod source;

pub use bundle::{
    CompressedPdf, CompressionReport, ConvertedArtifact, Deliverable, OutputBundle,
    ARCHIVE_FILENAME, MERGED_FILENAME, PDF_MIME, ZIP_MIME,
};
pub use element::{
    Alignment, DocumentElement, EmbeddedImage, ExtractedDocument, ParagraphStyle, EMU_PER_MM,
};
pub use lifecycle::{Processed, RequestLifecycle, Stage};
pub use source::{
    file_extension, file_stem, CompressionLevel, CompressionRequest, SourceDocument,
    DEFAULT_COMPRESSION_LEVEL, PDF_SIGNATURE,
};
