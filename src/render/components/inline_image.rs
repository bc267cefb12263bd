//! Inline raster images, scaled to the content box

use std::io::Cursor;

use image::{DynamicImage, GenericImageView, ImageFormat, RgbImage};
use printpdf::{PdfDocument, Pt, RawImage, XObjectTransform};

use crate::config::{Settings, MM_TO_PT};
use crate::error::RenderError;
use crate::model::EmbeddedImage;
use crate::render::flow::PageFlow;

/// Embedded pixels per displayed inch; larger images are downscaled first
const MAX_EMBED_DPI: f32 = 200.0;

const MM_PER_INCH: f32 = 25.4;

/// Renderer for images embedded in a document
pub struct ImageRenderer<'a> {
    settings: &'a Settings,
}

impl<'a> ImageRenderer<'a> {
    pub fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }

    /// Displayed size in mm: the declared extent, or the pixel size at the
    /// configured DPI, shrunk to fit the content box with the aspect ratio kept
    pub fn display_size(&self, image: &EmbeddedImage, pixels: (u32, u32)) -> (f32, f32) {
        let (width, height) = image.extent_mm().unwrap_or_else(|| {
            let per_pixel = MM_PER_INCH / self.settings.image_dpi;
            (pixels.0 as f32 * per_pixel, pixels.1 as f32 * per_pixel)
        });

        let max_width = self.settings.content_width();
        let max_height = self.settings.content_height();
        let scale = (max_width / width).min(max_height / height).min(1.0);
        (width * scale, height * scale)
    }

    /// Decode, embed and place the image at the cursor
    pub fn render(
        &self,
        doc: &mut PdfDocument,
        flow: &mut PageFlow,
        image: &EmbeddedImage,
    ) -> Result<(f32, f32), RenderError> {
        let decoded = image::load_from_memory(&image.data)
            .map_err(|e| RenderError::ImageDecode(format!("{}: {}", image.part_name, e)))?;
        let (px_width, px_height) = decoded.dimensions();
        if px_width == 0 || px_height == 0 {
            return Err(RenderError::ImageDecode(format!(
                "{}: image has no pixels",
                image.part_name
            )));
        }

        let (width_mm, height_mm) = self.display_size(image, (px_width, px_height));
        let pixels = downscale(decoded, width_mm);
        let (px_width, px_height) = pixels.dimensions();

        let raw = to_raw_image(pixels, &image.part_name)?;
        let id = doc.add_image(&raw);

        flow.ensure_space(height_mm);
        let bottom = flow.cursor() - height_mm;
        let left = flow.left() + (flow.width() - width_mm).max(0.0) / 2.0;

        // At 72 dpi one pixel is one point
        let transform = XObjectTransform {
            translate_x: Some(Pt(left * MM_TO_PT)),
            translate_y: Some(Pt(bottom * MM_TO_PT)),
            rotate: None,
            scale_x: Some(width_mm * MM_TO_PT / px_width as f32),
            scale_y: Some(height_mm * MM_TO_PT / px_height as f32),
            dpi: Some(72.0),
        };
        flow.layer().use_xobject(id, transform);
        flow.advance(height_mm);

        Ok((width_mm, height_mm))
    }
}

/// Hand the flattened pixels to printpdf as an opaque PNG
fn to_raw_image(pixels: RgbImage, part_name: &str) -> Result<RawImage, RenderError> {
    let mut png = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(pixels)
        .write_to(&mut png, ImageFormat::Png)
        .map_err(|e| RenderError::ImageDecode(format!("{}: {}", part_name, e)))?;

    let mut warnings = Vec::new();
    RawImage::decode_from_bytes(png.get_ref(), &mut warnings)
        .map_err(|e| RenderError::PdfGeneration(format!("{}: {}", part_name, e)))
}

/// Flatten transparency onto white and cap the resolution
fn downscale(image: DynamicImage, width_mm: f32) -> RgbImage {
    let max_px = ((width_mm / MM_PER_INCH) * MAX_EMBED_DPI).ceil().max(1.0) as u32;
    let image = if image.width() > max_px {
        let ratio = max_px as f32 / image.width() as f32;
        let height = ((image.height() as f32 * ratio).round() as u32).max(1);
        image.resize_exact(max_px, height, image::imageops::FilterType::Triangle)
    } else {
        image
    };

    let rgba = image.to_rgba8();
    let mut rgb = RgbImage::new(rgba.width(), rgba.height());
    for (x, y, pixel) in rgba.enumerate_pixels() {
        let [r, g, b, a] = pixel.0;
        let alpha = a as u32;
        let blend = |c: u8| ((c as u32 * alpha + 255 * (255 - alpha)) / 255) as u8;
        rgb.put_pixel(x, y, image::Rgb([blend(r), blend(g), blend(b)]));
    }
    rgb
}
