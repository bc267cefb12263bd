//! Operation collector for printpdf pages
//!
//! Drawing code pushes into a `LayerBuilder`; the finished `Vec<Op>` becomes
//! the content of one `PdfPage`.

use printpdf::{
    BuiltinFont, Color, LinePoint, Mm, Op, PaintMode, PdfFontHandle, Point, Polygon, PolygonRing,
    Pt, TextItem, WindingOrder, XObjectId, XObjectTransform,
};

fn corner(x: Mm, y: Mm) -> LinePoint {
    LinePoint {
        p: Point {
            x: x.into(),
            y: y.into(),
        },
        bezier: false,
    }
}

/// Content operations of one page, in drawing order
#[derive(Default)]
pub struct LayerBuilder {
    ops: Vec<Op>,
}

impl LayerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_ops(self) -> Vec<Op> {
        self.ops
    }

    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Fill color, which is also the text color
    pub fn set_fill_color(&mut self, color: Color) {
        self.ops.push(Op::SetFillColor { col: color });
    }

    pub fn set_outline_color(&mut self, color: Color) {
        self.ops.push(Op::SetOutlineColor { col: color });
    }

    /// Stroke width in points
    pub fn set_outline_thickness(&mut self, thickness: f32) {
        self.ops.push(Op::SetOutlineThickness { pt: Pt(thickness) });
    }

    /// One line of text in a builtin face, baseline starting at (x, y).
    /// Empty strings emit nothing.
    pub fn use_text<S: Into<String>>(
        &mut self,
        text: S,
        font_size: f32,
        x: Mm,
        y: Mm,
        font: BuiltinFont,
    ) {
        let text = text.into();
        if text.is_empty() {
            return;
        }
        self.ops.extend([
            Op::StartTextSection,
            Op::SetTextCursor {
                pos: Point {
                    x: x.into(),
                    y: y.into(),
                },
            },
            Op::SetFont {
                size: Pt(font_size),
                font: PdfFontHandle::Builtin(font),
            },
            Op::ShowText {
                items: vec![TextItem::Text(text)],
            },
            Op::EndTextSection,
        ]);
    }

    /// Axis-aligned rectangle from its lower-left to its upper-right corner
    pub fn add_rect(&mut self, x1: Mm, y1: Mm, x2: Mm, y2: Mm, mode: PaintMode) {
        let points = vec![
            corner(x1, y1),
            corner(x2, y1),
            corner(x2, y2),
            corner(x1, y2),
        ];
        self.ops.push(Op::DrawPolygon {
            polygon: Polygon {
                rings: vec![PolygonRing { points }],
                mode,
                winding_order: WindingOrder::NonZero,
            },
        });
    }

    pub fn save_graphics_state(&mut self) {
        self.ops.push(Op::SaveGraphicsState);
    }

    pub fn restore_graphics_state(&mut self) {
        self.ops.push(Op::RestoreGraphicsState);
    }

    /// Place an image registered with `PdfDocument::add_image`
    pub fn use_xobject(&mut self, id: XObjectId, transform: XObjectTransform) {
        self.ops.push(Op::UseXobject { id, transform });
    }
}
