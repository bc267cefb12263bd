//! ZIP packaging of converted documents

use std::collections::HashSet;
use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::ProcessError;
use crate::model::ConvertedArtifact;

/// Archive entry names, one per artifact and in the same order.
///
/// Each entry is `<stem>.pdf`; a stem seen before gets ` (1)`, ` (2)`, ...
/// appended. Names are compared case-insensitively so the archive unpacks
/// cleanly on any filesystem.
pub fn entry_names(artifacts: &[ConvertedArtifact]) -> Vec<String> {
    let mut taken = HashSet::new();
    artifacts
        .iter()
        .map(|artifact| {
            let stem = match artifact.stem.trim() {
                "" => "document",
                stem => stem,
            };
            let mut name = format!("{}.pdf", stem);
            let mut counter = 1;
            while !taken.insert(name.to_lowercase()) {
                name = format!("{} ({}).pdf", stem, counter);
                counter += 1;
            }
            name
        })
        .collect()
}

/// Write every artifact into a deflated ZIP, in input order
pub fn build_archive(artifacts: &[ConvertedArtifact]) -> Result<Vec<u8>, ProcessError> {
    let names = entry_names(artifacts);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, artifact) in names.iter().zip(artifacts) {
        zip.start_file(name.as_str(), options)
            .map_err(|e| ProcessError::Archive(format!("{}: {}", name, e)))?;
        zip.write_all(&artifact.pdf)
            .map_err(|e| ProcessError::Archive(format!("{}: {}", name, e)))?;
    }
    let cursor = zip
        .finish()
        .map_err(|e| ProcessError::Archive(e.to_string()))?;
    let bytes = cursor.into_inner();

    log::info!("Packaged {} PDFs into a {} byte archive", artifacts.len(), bytes.len());
    Ok(bytes)
}
