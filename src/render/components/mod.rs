//! Rendering components for PDF generation

pub mod inline_image;
pub mod table;
pub mod text_block;

pub use inline_image::ImageRenderer;
pub use table::TableRenderer;
pub use text_block::TextBlockRenderer;
