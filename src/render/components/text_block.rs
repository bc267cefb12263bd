//! Word-wrapped text blocks: paragraphs, headings and the title line

use printpdf::Mm;

use crate::config::PT_TO_MM;
use crate::model::Alignment;
use crate::render::flow::PageFlow;
use crate::render::helpers::{rgb, sanitize_text, FontStyle};

/// Renderer for one block of flowing text
pub struct TextBlockRenderer {
    style: FontStyle,
    font_size: f32,
    alignment: Alignment,
    /// Lines of body text that must fit below the block on the same page
    keep_with_next: usize,
}

impl TextBlockRenderer {
    pub fn new(style: FontStyle, font_size: f32) -> Self {
        Self {
            style,
            font_size,
            alignment: Alignment::Left,
            keep_with_next: 0,
        }
    }

    pub fn alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Avoid leaving the block alone at the bottom of a page
    pub fn keep_with_next(mut self, lines: usize) -> Self {
        self.keep_with_next = lines;
        self
    }

    /// Lay the text out at the cursor, breaking pages between lines.
    /// Returns the number of lines drawn.
    pub fn render(&self, flow: &mut PageFlow, text: &str) -> usize {
        let measurer = self.style.measurer();
        let text = sanitize_text(text);
        let width = flow.width();
        let lines = measurer.wrap_text(&text, self.font_size, width);

        let line_height = flow.settings().line_height(self.font_size);
        let body_line = flow.settings().line_height(flow.settings().body_font_size);
        let text_color = flow.settings().text_color;

        // Short blocks (headings) move to the next page together with what follows
        if lines.len() <= 2 {
            flow.ensure_space(
                line_height * lines.len() as f32 + body_line * self.keep_with_next as f32,
            );
        }

        // Baseline sits one ascent below the top of the line box
        let ascent = self.font_size * PT_TO_MM * 0.8;
        let half_leading = (line_height - self.font_size * PT_TO_MM) / 2.0;

        for line in &lines {
            flow.ensure_space(line_height);

            let line_width = measurer.measure_width_mm(line, self.font_size);
            let x = match self.alignment {
                Alignment::Center => flow.left() + (width - line_width).max(0.0) / 2.0,
                Alignment::Right => flow.left() + (width - line_width).max(0.0),
                Alignment::Left | Alignment::Justify => flow.left(),
            };
            let baseline = flow.cursor() - half_leading - ascent;

            let layer = flow.layer();
            layer.set_fill_color(rgb(text_color));
            layer.use_text(
                line.as_str(),
                self.font_size,
                Mm(x),
                Mm(baseline),
                self.style.builtin(),
            );
            flow.advance(line_height);
        }

        lines.len()
    }
}
