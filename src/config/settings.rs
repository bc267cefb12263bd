use crate::cli::PageSize;

use super::defaults::*;

/// Runtime settings for PDF generation
#[derive(Debug, Clone)]
pub struct Settings {
    // Page dimensions (in mm)
    pub page_width: f32,
    pub page_height: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
    pub margin_left: f32,
    pub margin_right: f32,

    // Vertical rhythm
    pub block_spacing: f32,
    pub line_spacing: f32,

    // Typography (in points)
    pub title_font_size: f32,
    pub heading_font_size: f32,
    pub body_font_size: f32,
    pub table_header_font_size: f32,
    pub table_body_font_size: f32,

    // Tables
    pub cell_padding: f32,
    pub grid_line_width: f32,

    // Images
    pub image_dpi: f32,

    /// Print "Document: <name>" above the content
    pub include_title: bool,
    /// Treat short all-caps paragraphs as headings
    pub uppercase_as_heading: bool,
    /// Run the generated PDF through lopdf stream compression
    pub compress_output: bool,

    // Colors (RGB 0.0-1.0)
    pub text_color: (f32, f32, f32),
    pub table_header_background: (f32, f32, f32),
    pub table_header_text: (f32, f32, f32),
    pub table_body_background: (f32, f32, f32),
    pub table_grid_color: (f32, f32, f32),
}

impl Default for Settings {
    fn default() -> Self {
        let (page_width, page_height) = PageSize::A4.dimensions_mm();
        Self {
            page_width,
            page_height,
            margin_top: DEFAULT_PAGE_MARGIN,
            margin_bottom: DEFAULT_PAGE_MARGIN,
            margin_left: DEFAULT_PAGE_MARGIN,
            margin_right: DEFAULT_PAGE_MARGIN,

            block_spacing: DEFAULT_BLOCK_SPACING,
            line_spacing: DEFAULT_LINE_SPACING,

            title_font_size: DEFAULT_TITLE_FONT_SIZE,
            heading_font_size: DEFAULT_HEADING_FONT_SIZE,
            body_font_size: DEFAULT_BODY_FONT_SIZE,
            table_header_font_size: DEFAULT_TABLE_HEADER_FONT_SIZE,
            table_body_font_size: DEFAULT_TABLE_BODY_FONT_SIZE,

            cell_padding: DEFAULT_CELL_PADDING,
            grid_line_width: DEFAULT_GRID_LINE_WIDTH,

            image_dpi: DEFAULT_IMAGE_DPI,

            include_title: false,
            uppercase_as_heading: true,
            compress_output: true,

            text_color: TEXT_COLOR,
            table_header_background: TABLE_HEADER_BACKGROUND,
            table_header_text: TABLE_HEADER_TEXT,
            table_body_background: TABLE_BODY_BACKGROUND,
            table_grid_color: TABLE_GRID_COLOR,
        }
    }
}

impl Settings {
    /// Default settings on the given paper
    pub fn for_page_size(page_size: PageSize) -> Self {
        let (page_width, page_height) = page_size.dimensions_mm();
        Self {
            page_width,
            page_height,
            ..Default::default()
        }
    }

    pub fn with_title(mut self, include_title: bool) -> Self {
        self.include_title = include_title;
        self
    }

    /// Get the usable content area width
    pub fn content_width(&self) -> f32 {
        self.page_width - self.margin_left - self.margin_right
    }

    /// Get the usable content area height
    pub fn content_height(&self) -> f32 {
        self.page_height - self.margin_top - self.margin_bottom
    }

    /// Font size for a heading level (1 is the largest)
    pub fn heading_size(&self, level: u8) -> f32 {
        let step = level.saturating_sub(1) as f32 * 2.0;
        (self.heading_font_size - step).max(self.body_font_size + 1.0)
    }

    /// Line advance in mm for a font size in points
    pub fn line_height(&self, font_size: f32) -> f32 {
        font_size * self.line_spacing * PT_TO_MM
    }
}

/// Points to millimetres
pub const PT_TO_MM: f32 = 0.352_777_8;

/// Millimetres to points
pub const MM_TO_PT: f32 = 2.834_645_7;
