use crate::error::{ConfigError, ValidationError};

/// Default compression level (target ~90% size reduction, best effort)
pub const DEFAULT_COMPRESSION_LEVEL: u8 = 90;

/// Signature every PDF file starts with
pub const PDF_SIGNATURE: &[u8] = b"%PDF";

/// Strip any client-side directory components from an uploaded filename
fn base_name(filename: &str) -> &str {
    filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename)
        .trim()
}

/// Filename without its final extension
pub fn file_stem(filename: &str) -> &str {
    let name = base_name(filename);
    match name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => name,
    }
}

/// Lowercased final extension, without the dot
pub fn file_extension(filename: &str) -> Option<String> {
    let name = base_name(filename);
    name.rsplit_once('.')
        .filter(|(stem, ext)| !stem.is_empty() && !ext.is_empty())
        .map(|(_, ext)| ext.to_ascii_lowercase())
}

/// An uploaded word-processing file, alive for one request
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl SourceDocument {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            bytes,
        }
    }

    pub fn extension(&self) -> Option<String> {
        file_extension(&self.filename)
    }

    pub fn stem(&self) -> &str {
        file_stem(&self.filename)
    }

    /// Only `.docx` is accepted; legacy `.doc` gets its own message
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.extension().as_deref() {
            Some("docx") => {}
            Some("doc") => return Err(ValidationError::LegacyWordFormat(self.filename.clone())),
            _ => {
                return Err(ValidationError::InvalidFileType {
                    filename: self.filename.clone(),
                    expected: ".docx".to_string(),
                })
            }
        }
        if self.bytes.is_empty() {
            return Err(ValidationError::EmptyFile(self.filename.clone()));
        }
        Ok(())
    }
}

/// Compression level in [0, 100]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionLevel(u8);

impl CompressionLevel {
    pub fn new(level: i64) -> Result<Self, ConfigError> {
        if (0..=100).contains(&level) {
            Ok(Self(level as u8))
        } else {
            Err(ConfigError::CompressionLevel(level))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for CompressionLevel {
    fn default() -> Self {
        Self(DEFAULT_COMPRESSION_LEVEL)
    }
}

/// One PDF to compress
#[derive(Debug, Clone)]
pub struct CompressionRequest {
    pub filename: String,
    pub bytes: Vec<u8>,
    pub level: CompressionLevel,
}

impl CompressionRequest {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>, level: CompressionLevel) -> Self {
        Self {
            filename: filename.into(),
            bytes,
            level,
        }
    }

    /// Extension check first, then the content signature
    pub fn validate(&self) -> Result<(), ValidationError> {
        if file_extension(&self.filename).as_deref() != Some("pdf") {
            return Err(ValidationError::InvalidFileType {
                filename: self.filename.clone(),
                expected: ".pdf".to_string(),
            });
        }
        if self.bytes.is_empty() {
            return Err(ValidationError::EmptyFile(self.filename.clone()));
        }
        if !self.bytes.starts_with(PDF_SIGNATURE) {
            return Err(ValidationError::NotPdf(self.filename.clone()));
        }
        Ok(())
    }

    /// `compressed_<original-name>`, always ending in `.pdf`
    pub fn output_filename(&self) -> String {
        format!("compressed_{}.pdf", file_stem(&self.filename))
    }
}
