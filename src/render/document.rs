use printpdf::{Mm, PdfDocument, PdfPage, PdfSaveOptions};

use crate::config::Settings;
use crate::error::RenderError;
use crate::model::{file_stem, DocumentElement, ExtractedDocument};

use super::components::{ImageRenderer, TableRenderer, TextBlockRenderer};
use super::flow::PageFlow;
use super::helpers::{compress_pdf, FontStyle};

/// Renders extracted document content onto fixed-size pages
pub struct DocumentRenderer {
    settings: Settings,
}

impl DocumentRenderer {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Generate a PDF for one source document
    pub fn render(
        &self,
        document: &ExtractedDocument,
        filename: &str,
    ) -> Result<Vec<u8>, RenderError> {
        let stem = file_stem(filename);
        let mut doc = PdfDocument::new(stem);
        let mut flow = PageFlow::new(&self.settings);

        if self.settings.include_title {
            TextBlockRenderer::new(FontStyle::Bold, self.settings.title_font_size)
                .render(&mut flow, &format!("Document: {}", stem));
            flow.add_spacing(self.settings.block_spacing * 2.0);
        }

        if document.is_empty() {
            log::info!("{} has no renderable content, adding a notice", filename);
            TextBlockRenderer::new(FontStyle::Regular, self.settings.body_font_size).render(
                &mut flow,
                &format!(
                    "The document '{}' appears to be empty or could not be processed properly. \
                     Please ensure the document contains readable text and images.",
                    filename
                ),
            );
        }

        for element in &document.elements {
            self.render_element(&mut doc, &mut flow, element);
        }

        let page_count = flow.page_count();
        let pages: Vec<PdfPage> = flow
            .into_pages()
            .into_iter()
            .map(|layer| {
                PdfPage::new(
                    Mm(self.settings.page_width),
                    Mm(self.settings.page_height),
                    layer.into_ops(),
                )
            })
            .collect();
        doc.with_pages(pages);

        let mut warnings = Vec::new();
        let bytes = doc.save(&PdfSaveOptions::default(), &mut warnings);
        if !warnings.is_empty() {
            log::debug!("printpdf reported {} warnings for {}", warnings.len(), filename);
        }
        if bytes.is_empty() {
            return Err(RenderError::PdfGeneration(format!(
                "no output produced for {}",
                filename
            )));
        }

        log::info!(
            "Rendered {} ({} elements, {} pages, {} bytes)",
            filename,
            document.elements.len(),
            page_count,
            bytes.len()
        );

        if !self.settings.compress_output {
            return Ok(bytes);
        }
        match compress_pdf(&bytes) {
            Ok(compressed) if compressed.len() < bytes.len() => Ok(compressed),
            Ok(_) => Ok(bytes),
            Err(e) => {
                log::warn!("Stream compression failed for {}: {}", filename, e);
                Ok(bytes)
            }
        }
    }

    fn render_element(
        &self,
        doc: &mut PdfDocument,
        flow: &mut PageFlow,
        element: &DocumentElement,
    ) {
        let settings = &self.settings;
        match element {
            DocumentElement::Heading { text, level } => {
                flow.add_spacing(settings.block_spacing);
                TextBlockRenderer::new(FontStyle::Bold, settings.heading_size(*level))
                    .keep_with_next(2)
                    .render(flow, text);
                flow.add_spacing(settings.block_spacing / 2.0);
            }
            DocumentElement::Paragraph { text, style } => {
                TextBlockRenderer::new(
                    FontStyle::from_flags(style.bold, style.italic),
                    settings.body_font_size,
                )
                .alignment(style.alignment)
                .render(flow, text);
                flow.add_spacing(settings.block_spacing);
            }
            DocumentElement::Table { rows } => {
                flow.add_spacing(settings.block_spacing);
                TableRenderer::new(settings).render(flow, rows);
                flow.add_spacing(settings.block_spacing * 2.0);
            }
            DocumentElement::Image(image) => {
                match ImageRenderer::new(settings).render(doc, flow, image) {
                    Ok(_) => flow.add_spacing(settings.block_spacing),
                    // A broken picture should not cost the reader the rest of the text
                    Err(e) => log::warn!("Skipping image {}: {}", image.part_name, e),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EmbeddedImage, ParagraphStyle};

    fn text_of(pdf: &[u8]) -> String {
        let doc = lopdf::Document::load_mem(pdf).unwrap();
        let pages: Vec<u32> = doc.get_pages().keys().copied().collect();
        doc.extract_text(&pages).unwrap()
    }

    fn paragraph(text: &str) -> DocumentElement {
        DocumentElement::Paragraph {
            text: text.to_string(),
            style: ParagraphStyle::default(),
        }
    }

    #[test]
    fn test_renders_headings_and_paragraphs() {
        let document = ExtractedDocument {
            elements: vec![
                DocumentElement::Heading {
                    text: "Quarterly Report".into(),
                    level: 1,
                },
                paragraph("Revenue went up."),
            ],
            skipped: 0,
        };
        let pdf = DocumentRenderer::new(Settings::default())
            .render(&document, "report.docx")
            .unwrap();
        assert!(pdf.starts_with(b"%PDF"));

        let text = text_of(&pdf);
        assert!(text.contains("Quarterly Report"));
        assert!(text.contains("Revenue went up."));
    }

    #[test]
    fn test_empty_document_gets_notice() {
        let pdf = DocumentRenderer::new(Settings::default())
            .render(&ExtractedDocument::default(), "blank.docx")
            .unwrap();
        let text = text_of(&pdf);
        assert!(text.contains("appears to be empty"));
    }

    #[test]
    fn test_optional_title_line() {
        let document = ExtractedDocument {
            elements: vec![paragraph("Body")],
            skipped: 0,
        };
        let with_title = DocumentRenderer::new(Settings::default().with_title(true))
            .render(&document, "minutes.docx")
            .unwrap();
        assert!(text_of(&with_title).contains("Document: minutes"));

        let without = DocumentRenderer::new(Settings::default())
            .render(&document, "minutes.docx")
            .unwrap();
        assert!(!text_of(&without).contains("Document:"));
    }

    #[test]
    fn test_long_content_produces_several_pages() {
        let elements = (0..150)
            .map(|i| paragraph(&format!("Paragraph number {} with some filler text.", i)))
            .collect();
        let pdf = DocumentRenderer::new(Settings::default())
            .render(&ExtractedDocument { elements, skipped: 0 }, "long.docx")
            .unwrap();
        let doc = lopdf::Document::load_mem(&pdf).unwrap();
        assert!(doc.get_pages().len() > 1);
    }

    #[test]
    fn test_broken_image_does_not_fail_document() {
        let document = ExtractedDocument {
            elements: vec![
                DocumentElement::Image(EmbeddedImage {
                    data: b"garbage".to_vec(),
                    position: 0,
                    extent: None,
                    part_name: "word/media/image1.png".into(),
                }),
                paragraph("After the image"),
            ],
            skipped: 0,
        };
        let pdf = DocumentRenderer::new(Settings::default())
            .render(&document, "pics.docx")
            .unwrap();
        assert!(text_of(&pdf).contains("After the image"));
    }

    #[test]
    fn test_table_cells_are_rendered() {
        let document = ExtractedDocument {
            elements: vec![DocumentElement::Table {
                rows: vec![
                    vec!["Fruit".into(), "Count".into()],
                    vec!["Apple".into(), "3".into()],
                ],
            }],
            skipped: 0,
        };
        let pdf = DocumentRenderer::new(Settings::default())
            .render(&document, "table.docx")
            .unwrap();
        let text = text_of(&pdf);
        assert!(text.contains("Fruit"));
        assert!(text.contains("Apple"));
    }
}
