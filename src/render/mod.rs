//! PDF rendering modules

pub mod components;
pub mod document;
pub mod flow;
pub mod helpers;

// Re-export commonly used items for convenience
pub use document::DocumentRenderer;
pub use flow::PageFlow;
pub use helpers::{compress_pdf, BuiltinFontMeasurer, LayerBuilder};
