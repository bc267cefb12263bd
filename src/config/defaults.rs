/// Default page margin in mm (50pt)
pub const DEFAULT_PAGE_MARGIN: f32 = 17.64;

/// Gap below each block in mm
pub const DEFAULT_BLOCK_SPACING: f32 = 4.0;

/// Line height as a multiple of the font size
pub const DEFAULT_LINE_SPACING: f32 = 1.25;

/// Default title font size in points
pub const DEFAULT_TITLE_FONT_SIZE: f32 = 16.0;

/// Font size of a level-1 heading in points; deeper levels shrink by 2pt
pub const DEFAULT_HEADING_FONT_SIZE: f32 = 18.0;

/// Default body font size in points
pub const DEFAULT_BODY_FONT_SIZE: f32 = 12.0;

/// Table header row font size in points
pub const DEFAULT_TABLE_HEADER_FONT_SIZE: f32 = 10.0;

/// Table body font size in points
pub const DEFAULT_TABLE_BODY_FONT_SIZE: f32 = 9.0;

/// Inner padding of a table cell in mm
pub const DEFAULT_CELL_PADDING: f32 = 1.5;

/// Table grid line width in points
pub const DEFAULT_GRID_LINE_WIDTH: f32 = 1.0;

/// Paragraphs up to this many characters in all caps are treated as headings
pub const UPPERCASE_HEADING_MAX_CHARS: usize = 100;

/// Resolution assumed for images without a declared extent
pub const DEFAULT_IMAGE_DPI: f32 = 96.0;

/// Text color
pub const TEXT_COLOR: (f32, f32, f32) = (0.0, 0.0, 0.0);

/// Table header background (grey)
pub const TABLE_HEADER_BACKGROUND: (f32, f32, f32) = (0.5, 0.5, 0.5);

/// Table header text (white)
pub const TABLE_HEADER_TEXT: (f32, f32, f32) = (1.0, 1.0, 1.0);

/// Table body background (beige)
pub const TABLE_BODY_BACKGROUND: (f32, f32, f32) = (0.96, 0.96, 0.86);

/// Table grid lines (black)
pub const TABLE_GRID_COLOR: (f32, f32, f32) = (0.0, 0.0, 0.0);

/// Default bind host of the HTTP service
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default port of the HTTP service
pub const DEFAULT_PORT: u16 = 8001;

/// Default request body limit (50 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Default number of conversions allowed to run at once
pub const DEFAULT_MAX_CONCURRENT_JOBS: usize = 4;
