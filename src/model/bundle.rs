/// MIME type of a single PDF
pub const PDF_MIME: &str = "application/pdf";
/// MIME type of a ZIP archive
pub const ZIP_MIME: &str = "application/zip";

/// Filename offered for a merged conversion result
pub const MERGED_FILENAME: &str = "converted-documents.pdf";
/// Filename offered for a zipped conversion result
pub const ARCHIVE_FILENAME: &str = "converted-documents.zip";

/// One in-memory PDF produced from one source document
#[derive(Debug, Clone)]
pub struct ConvertedArtifact {
    /// Stem of the source filename, used to name archive entries
    pub stem: String,
    pub pdf: Vec<u8>,
}

impl ConvertedArtifact {
    pub fn new(stem: impl Into<String>, pdf: Vec<u8>) -> Self {
        Self {
            stem: stem.into(),
            pdf,
        }
    }
}

/// The single output of a conversion request
#[derive(Debug, Clone)]
pub enum OutputBundle {
    SinglePdf(Vec<u8>),
    Archive(Vec<u8>),
}

impl OutputBundle {
    pub fn mime_type(&self) -> &'static str {
        match self {
            OutputBundle::SinglePdf(_) => PDF_MIME,
            OutputBundle::Archive(_) => ZIP_MIME,
        }
    }

    pub fn filename(&self) -> &'static str {
        match self {
            OutputBundle::SinglePdf(_) => MERGED_FILENAME,
            OutputBundle::Archive(_) => ARCHIVE_FILENAME,
        }
    }

    pub fn bytes(&self) -> &[u8] {
        match self {
            OutputBundle::SinglePdf(bytes) | OutputBundle::Archive(bytes) => bytes,
        }
    }

    pub fn into_deliverable(self) -> Deliverable {
        let mime_type = self.mime_type();
        let filename = self.filename().to_string();
        let bytes = match self {
            OutputBundle::SinglePdf(bytes) | OutputBundle::Archive(bytes) => bytes,
        };
        Deliverable {
            bytes,
            mime_type,
            filename,
        }
    }
}

/// Bytes plus the metadata a transport needs to hand them to a client
#[derive(Debug, Clone)]
pub struct Deliverable {
    pub bytes: Vec<u8>,
    pub mime_type: &'static str,
    pub filename: String,
}

/// Size accounting for one compression run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompressionReport {
    pub original_size: usize,
    pub compressed_size: usize,
}

impl CompressionReport {
    /// Size reduction in percent; 0 when nothing was saved
    pub fn ratio(&self) -> f64 {
        if self.original_size == 0 || self.compressed_size >= self.original_size {
            return 0.0;
        }
        let saved = (self.original_size - self.compressed_size) as f64;
        saved / self.original_size as f64 * 100.0
    }
}

/// Result of compressing one PDF
#[derive(Debug, Clone)]
pub struct CompressedPdf {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub report: CompressionReport,
}

impl CompressedPdf {
    pub fn into_deliverable(self) -> Deliverable {
        Deliverable {
            bytes: self.bytes,
            mime_type: PDF_MIME,
            filename: self.filename,
        }
    }
}
