//! Text measurement and line breaking for the PDF builtin fonts
//!
//! Widths come from Adobe's AFM files for the Standard 14 fonts, so layout
//! can be computed before anything is drawn.

use std::sync::OnceLock;

use printpdf::BuiltinFont;

use crate::config::PT_TO_MM;

/// Text measurer for the Helvetica family
pub struct BuiltinFontMeasurer {
    font: BuiltinFont,
}

impl BuiltinFontMeasurer {
    pub fn new(font: BuiltinFont) -> Self {
        Self { font }
    }

    /// Get character width in 1000 units per em
    fn char_width(&self, c: char) -> u16 {
        let table = match self.font {
            BuiltinFont::HelveticaBold | BuiltinFont::HelveticaBoldOblique => {
                &HELVETICA_BOLD_WIDTHS
            }
            _ => &HELVETICA_WIDTHS,
        };
        // Unencodable text is replaced before layout; 556 is the common glyph width
        win_ansi_code(c).map_or(556, |code| table[code as usize])
    }

    /// Measure text width in points
    pub fn measure_width_pt(&self, text: &str, font_size: f32) -> f32 {
        let total_width: u32 = text.chars().map(|c| self.char_width(c) as u32).sum();
        (total_width as f32 / 1000.0) * font_size
    }

    /// Measure text width in mm
    pub fn measure_width_mm(&self, text: &str, font_size: f32) -> f32 {
        self.measure_width_pt(text, font_size) * PT_TO_MM
    }

    /// Break `text` into lines no wider than `max_width` mm.
    ///
    /// Explicit newlines always break. Words are packed greedily; a single
    /// word wider than the line is split between characters.
    pub fn wrap_text(&self, text: &str, font_size: f32, max_width: f32) -> Vec<String> {
        let mut lines = Vec::new();

        for paragraph in text.split('\n') {
            let mut current = String::new();

            for word in paragraph.split_whitespace() {
                let candidate = if current.is_empty() {
                    word.to_string()
                } else {
                    format!("{} {}", current, word)
                };

                if self.measure_width_mm(&candidate, font_size) <= max_width {
                    current = candidate;
                    continue;
                }

                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }

                if self.measure_width_mm(word, font_size) <= max_width {
                    current = word.to_string();
                } else {
                    let mut pieces = self.break_word(word, font_size, max_width);
                    current = pieces.pop().unwrap_or_default();
                    lines.extend(pieces);
                }
            }

            lines.push(current);
        }

        // Drop blank lines at the end, keep at least one
        while lines.len() > 1 && lines.last().map(|l| l.is_empty()).unwrap_or(false) {
            lines.pop();
        }
        lines
    }

    fn break_word(&self, word: &str, font_size: f32, max_width: f32) -> Vec<String> {
        let mut pieces = Vec::new();
        let mut current = String::new();
        for c in word.chars() {
            current.push(c);
            if current.chars().count() > 1
                && self.measure_width_mm(&current, font_size) > max_width
            {
                current.pop();
                pieces.push(std::mem::take(&mut current));
                current.push(c);
            }
        }
        if !current.is_empty() {
            pieces.push(current);
        }
        pieces
    }
}

/// Get a builtin font measurer for Helvetica (sans-serif regular)
pub fn get_helvetica_measurer() -> &'static BuiltinFontMeasurer {
    static MEASURER: OnceLock<BuiltinFontMeasurer> = OnceLock::new();
    MEASURER.get_or_init(|| BuiltinFontMeasurer::new(BuiltinFont::Helvetica))
}

/// Get a builtin font measurer for Helvetica-Bold
pub fn get_helvetica_bold_measurer() -> &'static BuiltinFontMeasurer {
    static MEASURER: OnceLock<BuiltinFontMeasurer> = OnceLock::new();
    MEASURER.get_or_init(|| BuiltinFontMeasurer::new(BuiltinFont::HelveticaBold))
}

/// Get the measurer for a builtin font; oblique faces share upright widths
pub fn get_builtin_measurer(font: BuiltinFont) -> &'static BuiltinFontMeasurer {
    match font {
        BuiltinFont::HelveticaBold | BuiltinFont::HelveticaBoldOblique => {
            get_helvetica_bold_measurer()
        }
        _ => get_helvetica_measurer(),
    }
}

/// Position of `c` in WinAnsiEncoding (Windows-1252), the encoding of the
/// builtin fonts
pub fn win_ansi_code(c: char) -> Option<u8> {
    let code = match c {
        '\u{0000}'..='\u{007F}' | '\u{00A0}'..='\u{00FF}' => c as u32 as u8,
        '\u{20AC}' => 0x80,
        '\u{201A}' => 0x82,
        '\u{0192}' => 0x83,
        '\u{201E}' => 0x84,
        '\u{2026}' => 0x85,
        '\u{2020}' => 0x86,
        '\u{2021}' => 0x87,
        '\u{02C6}' => 0x88,
        '\u{2030}' => 0x89,
        '\u{0160}' => 0x8A,
        '\u{2039}' => 0x8B,
        '\u{0152}' => 0x8C,
        '\u{017D}' => 0x8E,
        '\u{2018}' => 0x91,
        '\u{2019}' => 0x92,
        '\u{201C}' => 0x93,
        '\u{201D}' => 0x94,
        '\u{2022}' => 0x95,
        '\u{2013}' => 0x96,
        '\u{2014}' => 0x97,
        '\u{02DC}' => 0x98,
        '\u{2122}' => 0x99,
        '\u{0161}' => 0x9A,
        '\u{203A}' => 0x9B,
        '\u{0153}' => 0x9C,
        '\u{017E}' => 0x9E,
        '\u{0178}' => 0x9F,
        _ => return None,
    };
    Some(code)
}

/// Replace characters the builtin fonts cannot show.
///
/// Everything WinAnsiEncoding covers passes through, accented Latin letters
/// included. Common punctuation outside it maps to the nearest encodable
/// character, invisible formatting characters are dropped, anything else
/// becomes `?`.
pub fn sanitize_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\n' => out.push('\n'),
            '\t' | '\u{00A0}' | '\u{2002}'..='\u{200A}' | '\u{202F}' => out.push(' '),
            // Soft hyphen, zero-width characters and byte order marks
            '\u{00AD}' | '\u{200B}'..='\u{200D}' | '\u{FEFF}' => {}
            c if c.is_control() => {}
            '\u{2010}'..='\u{2012}' | '\u{2212}' => out.push('-'),
            '\u{2015}' => out.push('\u{2014}'),
            '\u{2032}' => out.push('\''),
            '\u{2033}' => out.push('"'),
            c if win_ansi_code(c).is_some() => out.push(c),
            _ => out.push('?'),
        }
    }
    out
}

// =============================================================================
// Adobe AFM Character Width Tables (WinAnsiEncoding, in 1000 units per em)
// =============================================================================

/// Helvetica character widths, indexed by WinAnsiEncoding code
#[rustfmt::skip]
static HELVETICA_WIDTHS: [u16; 256] = [
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, 0,
    556, 0, 222, 556, 333, 1000, 556, 556, 333, 1000, 667, 333, 1000, 0, 611, 0,
    0, 222, 222, 333, 333, 350, 556, 1000, 333, 1000, 500, 333, 944, 0, 500, 667,
    278, 333, 556, 556, 556, 556, 260, 556, 333, 737, 370, 556, 584, 333, 737, 333,
    400, 584, 333, 333, 333, 556, 537, 278, 333, 333, 365, 556, 834, 834, 834, 611,
    667, 667, 667, 667, 667, 667, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
    556, 556, 556, 556, 556, 556, 889, 500, 556, 556, 556, 556, 278, 278, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 584, 611, 556, 556, 556, 556, 500, 556, 500,
];

/// Helvetica-Bold character widths, indexed by WinAnsiEncoding code
#[rustfmt::skip]
static HELVETICA_BOLD_WIDTHS: [u16; 256] = [
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584, 0,
    556, 0, 278, 556, 500, 1000, 556, 556, 333, 1000, 667, 333, 1000, 0, 611, 0,
    0, 278, 278, 500, 500, 350, 556, 1000, 333, 1000, 556, 333, 944, 0, 500, 667,
    278, 333, 556, 556, 556, 556, 280, 556, 333, 737, 370, 556, 584, 333, 737, 333,
    400, 584, 333, 333, 333, 611, 556, 278, 333, 333, 365, 556, 834, 834, 834, 611,
    722, 722, 722, 722, 722, 722, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
    556, 556, 556, 556, 556, 556, 889, 556, 556, 556, 556, 556, 278, 278, 278, 278,
    611, 611, 611, 611, 611, 611, 611, 584, 611, 611, 611, 611, 611, 556, 611, 556,
];
