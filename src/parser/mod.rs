mod docx;
mod relationships;
mod styles;

#[cfg(test)]
pub(crate) mod fixtures;

pub use docx::{parse_docx, ParseOptions, DOCUMENT_PART};
pub use relationships::Relationships;
pub use styles::{heading_level_from_name, StyleMap};
