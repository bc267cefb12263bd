use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocxError {
    #[error("Not a valid .docx container: {0}")]
    InvalidContainer(String),

    #[error("Missing document part: {0}")]
    MissingPart(String),

    #[error("Malformed XML in {part}: {message}")]
    Xml { part: String, message: String },

    #[error("Failed to read {part}: {message}")]
    Read { part: String, message: String },
}

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to decode image: {0}")]
    ImageDecode(String),

    #[error("PDF generation error: {0}")]
    PdfGeneration(String),
}

#[derive(Error, Debug)]
pub enum PdfError {
    #[error("Failed to parse PDF: {0}")]
    Parse(String),

    #[error("Encrypted PDFs are not supported")]
    Encrypted,

    #[error("PDF structure error: {0}")]
    Structure(String),

    #[error("Failed to save PDF: {0}")]
    Save(String),
}

/// Client-caused problems, detected before any processing starts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("No files provided")]
    NoFiles,

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for field '{field}': {message}")]
    InvalidField { field: String, message: String },

    #[error("Invalid file type: {filename}. Only {expected} files are supported.")]
    InvalidFileType { filename: String, expected: String },

    #[error("Legacy Word format is not supported: {0}. Save it as .docx and retry.")]
    LegacyWordFormat(String),

    #[error("File {0} is not a PDF document")]
    NotPdf(String),

    #[error("File {0} is empty")]
    EmptyFile(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Compression level {0} is out of range (0-100)")]
    CompressionLevel(i64),

    #[error("Invalid server address: {0}")]
    Address(String),

    #[error("Invalid limit: {0}")]
    Limit(String),
}

/// Top-level failure of a conversion or compression request.
#[derive(Error, Debug)]
pub enum ProcessError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Failed to parse {filename}: {source}")]
    Parse {
        filename: String,
        #[source]
        source: DocxError,
    },

    #[error("Failed to render {filename}: {source}")]
    Render {
        filename: String,
        #[source]
        source: RenderError,
    },

    #[error("Failed to merge PDFs: {0}")]
    Merge(#[source] PdfError),

    #[error("Failed to create ZIP archive: {0}")]
    Archive(String),

    #[error("Failed to compress {filename}: {source}")]
    Compression {
        filename: String,
        #[source]
        source: PdfError,
    },
}
