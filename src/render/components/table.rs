//! Bordered table grid with a shaded header row

use printpdf::{Mm, PaintMode};

use crate::config::{Settings, PT_TO_MM};
use crate::render::flow::PageFlow;
use crate::render::helpers::{rgb, sanitize_text, FontStyle};

/// A row laid out for drawing: wrapped lines per cell and total height
struct RowLayout {
    cells: Vec<Vec<String>>,
    height: f32,
}

impl RowLayout {
    fn new(cells: Vec<Vec<String>>, line_height: f32, padding: f32) -> Self {
        let max_lines = cells.iter().map(Vec::len).max().unwrap_or(1).max(1);
        let height = max_lines as f32 * line_height + 2.0 * padding;
        Self { cells, height }
    }

    /// Keep the first `lines` lines of every cell; the rest form a
    /// continuation row
    fn split(self, lines: usize, line_height: f32, padding: f32) -> (RowLayout, RowLayout) {
        let (head, tail): (Vec<_>, Vec<_>) = self
            .cells
            .into_iter()
            .map(|mut cell| {
                let rest = cell.split_off(lines.min(cell.len()));
                (cell, rest)
            })
            .unzip();
        (
            RowLayout::new(head, line_height, padding),
            RowLayout::new(tail, line_height, padding),
        )
    }
}

/// Renderer for a table of plain-text cells
///
/// Columns share the content width equally. The first row is the header;
/// it is repeated when the table continues on a new page.
pub struct TableRenderer<'a> {
    settings: &'a Settings,
}

impl<'a> TableRenderer<'a> {
    pub fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }

    fn cell_style(&self, header: bool) -> (FontStyle, f32) {
        if header {
            (FontStyle::Bold, self.settings.table_header_font_size)
        } else {
            (FontStyle::Regular, self.settings.table_body_font_size)
        }
    }

    fn layout_row(&self, row: &[String], column_width: f32, header: bool) -> RowLayout {
        let (style, font_size) = self.cell_style(header);
        let measurer = style.measurer();
        let padding = self.settings.cell_padding;
        let inner_width = (column_width - 2.0 * padding).max(1.0);

        let cells: Vec<Vec<String>> = row
            .iter()
            .map(|cell| measurer.wrap_text(&sanitize_text(cell), font_size, inner_width))
            .collect();
        RowLayout::new(cells, self.settings.line_height(font_size), padding)
    }

    /// Draw the table at the cursor. Returns the number of rows drawn.
    pub fn render(&self, flow: &mut PageFlow, rows: &[Vec<String>]) -> usize {
        let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
        if columns == 0 {
            return 0;
        }
        let column_width = flow.width() / columns as f32;

        let header = self.layout_row(&rows[0], column_width, true);
        // Rows taller than this are split rather than moved to a new page
        let page_room = flow.settings().content_height() - header.height;

        // Keep the header together with the first body row, or with its
        // first line when that row will be split anyway
        let first_line = self.settings.line_height(self.settings.table_body_font_size)
            + 2.0 * self.settings.cell_padding;
        let first_body = rows
            .get(1)
            .map(|r| self.layout_row(r, column_width, false).height)
            .map(|h| if h > page_room { first_line } else { h })
            .unwrap_or(0.0);
        flow.ensure_space(header.height + first_body);
        self.draw_row(flow, &header, column_width, true);

        for row in rows.iter().skip(1) {
            let layout = self.layout_row(row, column_width, false);
            if layout.height <= page_room && flow.ensure_space(layout.height) {
                self.draw_row(flow, &header, column_width, true);
            }
            self.draw_body_row(flow, layout, &header, column_width);
        }

        rows.len()
    }

    /// Draw a body row, continuing it on following pages when it is taller
    /// than the space left
    fn draw_body_row(
        &self,
        flow: &mut PageFlow,
        mut layout: RowLayout,
        header: &RowLayout,
        column_width: f32,
    ) {
        let padding = self.settings.cell_padding;
        let line_height = self
            .settings
            .line_height(self.settings.table_body_font_size);

        let mut fresh_page = false;
        while layout.height > flow.remaining() {
            let fit = ((flow.remaining() - 2.0 * padding) / line_height).floor().max(0.0) as usize;
            // The header alone fills the page; nothing can be gained by breaking again
            if fit == 0 && fresh_page {
                break;
            }
            if fit > 0 {
                let (head, rest) = layout.split(fit, line_height, padding);
                self.draw_row(flow, &head, column_width, false);
                layout = rest;
            }
            flow.new_page();
            self.draw_row(flow, header, column_width, true);
            fresh_page = true;
        }
        self.draw_row(flow, &layout, column_width, false);
    }

    fn draw_row(&self, flow: &mut PageFlow, row: &RowLayout, column_width: f32, header: bool) {
        let (style, font_size) = self.cell_style(header);
        let measurer = style.measurer();
        let settings = self.settings;
        let padding = settings.cell_padding;
        let line_height = settings.line_height(font_size);
        let ascent = font_size * PT_TO_MM * 0.8;
        let half_leading = (line_height - font_size * PT_TO_MM) / 2.0;

        let top = flow.cursor();
        let bottom = top - row.height;
        let left = flow.left();
        let (background, text_color) = if header {
            (settings.table_header_background, settings.table_header_text)
        } else {
            (settings.table_body_background, settings.text_color)
        };

        let layer = flow.layer();
        layer.save_graphics_state();

        let right = left + column_width * row.cells.len() as f32;
        layer.set_fill_color(rgb(background));
        layer.add_rect(Mm(left), Mm(bottom), Mm(right), Mm(top), PaintMode::Fill);

        layer.set_outline_color(rgb(settings.table_grid_color));
        layer.set_outline_thickness(settings.grid_line_width);
        for column in 0..row.cells.len() {
            let x = left + column_width * column as f32;
            layer.add_rect(
                Mm(x),
                Mm(bottom),
                Mm(x + column_width),
                Mm(top),
                PaintMode::Stroke,
            );
        }

        layer.set_fill_color(rgb(text_color));
        for (column, lines) in row.cells.iter().enumerate() {
            let cell_left = left + column_width * column as f32;
            let mut line_top = top - padding;
            for line in lines {
                // Cell text is centred horizontally
                let line_width = measurer.measure_width_mm(line, font_size);
                let x = cell_left + ((column_width - line_width) / 2.0).max(padding);
                layer.use_text(
                    line.as_str(),
                    font_size,
                    Mm(x),
                    Mm(line_top - half_leading - ascent),
                    style.builtin(),
                );
                line_top -= line_height;
            }
        }

        layer.restore_graphics_state();
        flow.advance(row.height);
    }
}
