//! Helper utilities for PDF rendering

pub mod colors;
pub mod compress;
pub mod fonts;
pub mod layer;
pub mod text_metrics;

pub use colors::rgb;
pub use compress::compress_pdf;
pub use fonts::FontStyle;
pub use layer::LayerBuilder;
pub use text_metrics::{
    get_builtin_measurer, get_helvetica_bold_measurer, get_helvetica_measurer, sanitize_text,
    BuiltinFontMeasurer,
};
