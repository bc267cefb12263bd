use printpdf::BuiltinFont;

use super::text_metrics::{get_builtin_measurer, BuiltinFontMeasurer};

/// Face of the Helvetica family used for a run of text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontStyle {
    #[default]
    Regular,
    Bold,
    Italic,
    BoldItalic,
}

impl FontStyle {
    pub fn from_flags(bold: bool, italic: bool) -> Self {
        match (bold, italic) {
            (false, false) => FontStyle::Regular,
            (true, false) => FontStyle::Bold,
            (false, true) => FontStyle::Italic,
            (true, true) => FontStyle::BoldItalic,
        }
    }

    pub fn builtin(self) -> BuiltinFont {
        match self {
            FontStyle::Regular => BuiltinFont::Helvetica,
            FontStyle::Bold => BuiltinFont::HelveticaBold,
            FontStyle::Italic => BuiltinFont::HelveticaOblique,
            FontStyle::BoldItalic => BuiltinFont::HelveticaBoldOblique,
        }
    }

    pub fn measurer(self) -> &'static BuiltinFontMeasurer {
        get_builtin_measurer(self.builtin())
    }
}
