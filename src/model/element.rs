/// English Metric Units per millimetre (Office drawing units)
pub const EMU_PER_MM: f32 = 36_000.0;

/// Horizontal alignment of a paragraph (from `w:jc`)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

impl Alignment {
    /// Parse a `w:jc` value
    pub fn from_word(value: &str) -> Self {
        match value {
            "center" => Alignment::Center,
            "right" | "end" => Alignment::Right,
            "both" | "distribute" => Alignment::Justify,
            _ => Alignment::Left,
        }
    }
}

/// Character-level style shared by every run of a paragraph
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParagraphStyle {
    pub bold: bool,
    pub italic: bool,
    pub alignment: Alignment,
}

/// A raster image embedded in the document
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddedImage {
    /// Raw image bytes as stored in the container (PNG, JPEG, ...)
    pub data: Vec<u8>,
    /// Index of the body block the image was found in
    pub position: usize,
    /// Displayed extent in EMUs, when the drawing declares one
    pub extent: Option<(u64, u64)>,
    /// Part name inside the container, e.g. `word/media/image1.png`
    pub part_name: String,
}

impl EmbeddedImage {
    /// Declared extent in millimetres
    pub fn extent_mm(&self) -> Option<(f32, f32)> {
        self.extent
            .filter(|(cx, cy)| *cx > 0 && *cy > 0)
            .map(|(cx, cy)| (cx as f32 / EMU_PER_MM, cy as f32 / EMU_PER_MM))
    }
}

/// One content block of a Word document, in reading order
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentElement {
    Heading { text: String, level: u8 },
    Paragraph { text: String, style: ParagraphStyle },
    Table { rows: Vec<Vec<String>> },
    Image(EmbeddedImage),
}

impl DocumentElement {
    /// Plain text carried by the element (empty for images)
    pub fn text(&self) -> String {
        match self {
            DocumentElement::Heading { text, .. } | DocumentElement::Paragraph { text, .. } => {
                text.clone()
            }
            DocumentElement::Table { rows } => rows
                .iter()
                .map(|row| row.join(" "))
                .collect::<Vec<_>>()
                .join("\n"),
            DocumentElement::Image(_) => String::new(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            DocumentElement::Heading { .. } => "heading",
            DocumentElement::Paragraph { .. } => "paragraph",
            DocumentElement::Table { .. } => "table",
            DocumentElement::Image(_) => "image",
        }
    }
}

/// Content extracted from one source document
#[derive(Debug, Clone, Default)]
pub struct ExtractedDocument {
    pub elements: Vec<DocumentElement>,
    /// Body blocks that were recognised but not supported (section properties,
    /// bookmarks, content controls without text, ...)
    pub skipped: usize,
}

impl ExtractedDocument {
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn count(&self, kind: &str) -> usize {
        self.elements.iter().filter(|e| e.kind() == kind).count()
    }
}
