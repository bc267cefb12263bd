use printpdf::{Color, Rgb};

/// Convert an (r, g, b) triple in 0.0-1.0 to a printpdf color
pub fn rgb(color: (f32, f32, f32)) -> Color {
    Color::Rgb(Rgb::new(color.0, color.1, color.2, None))
}
