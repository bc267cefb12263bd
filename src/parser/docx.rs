use std::io::{Cursor, Read};

use roxmltree::{Document, Node};
use zip::result::ZipError;
use zip::ZipArchive;

use crate::config::defaults::UPPERCASE_HEADING_MAX_CHARS;
use crate::error::DocxError;
use crate::model::{
    Alignment, DocumentElement, EmbeddedImage, ExtractedDocument, ParagraphStyle,
};

use super::relationships::{Relationships, DOCUMENT_RELS_PART};
use super::styles::{local_attr, StyleMap, STYLES_PART};

pub const DOCUMENT_PART: &str = "word/document.xml";

/// Upper bound for a single decompressed part
const MAX_PART_BYTES: u64 = 64 * 1024 * 1024;

/// Word tables have at most 63 grid columns
const MAX_TABLE_COLUMNS: usize = 63;

/// Options controlling how body blocks are classified
#[derive(Debug, Clone, Copy)]
pub struct ParseOptions {
    /// Treat short paragraphs written entirely in capitals as headings
    pub uppercase_as_heading: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            uppercase_as_heading: true,
        }
    }
}

type Archive<'a> = ZipArchive<Cursor<&'a [u8]>>;

/// Extract headings, paragraphs, tables and images from `.docx` bytes, in reading order.
///
/// Blocks that are not understood are counted in [`ExtractedDocument::skipped`]
/// and never fail the parse. A broken container or a malformed
/// `word/document.xml` does.
pub fn parse_docx(bytes: &[u8], options: &ParseOptions) -> Result<ExtractedDocument, DocxError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| DocxError::InvalidContainer(e.to_string()))?;

    let document_xml = read_text_part(&mut archive, DOCUMENT_PART)?
        .ok_or_else(|| DocxError::MissingPart(DOCUMENT_PART.to_string()))?;

    let styles = match read_text_part(&mut archive, STYLES_PART)? {
        Some(xml) => StyleMap::parse(&xml)?,
        None => StyleMap::default(),
    };
    let relationships = match read_text_part(&mut archive, DOCUMENT_RELS_PART)? {
        Some(xml) => Relationships::parse(&xml)?,
        None => Relationships::default(),
    };

    let doc = Document::parse(&document_xml).map_err(|e| DocxError::Xml {
        part: DOCUMENT_PART.to_string(),
        message: e.to_string(),
    })?;

    let body = doc
        .root_element()
        .children()
        .find(|n| n.tag_name().name() == "body")
        .ok_or_else(|| DocxError::Xml {
            part: DOCUMENT_PART.to_string(),
            message: "document has no body".to_string(),
        })?;

    let mut walker = BodyWalker {
        archive: &mut archive,
        styles: &styles,
        relationships: &relationships,
        options,
        result: ExtractedDocument::default(),
        position: 0,
    };
    walker.walk(body)?;

    let result = walker.result;
    log::debug!(
        "Extracted {} elements ({} headings, {} paragraphs, {} tables, {} images), skipped {}",
        result.elements.len(),
        result.count("heading"),
        result.count("paragraph"),
        result.count("table"),
        result.count("image"),
        result.skipped
    );
    Ok(result)
}

struct BodyWalker<'a, 'b> {
    archive: &'a mut Archive<'b>,
    styles: &'a StyleMap,
    relationships: &'a Relationships,
    options: &'a ParseOptions,
    result: ExtractedDocument,
    position: usize,
}

impl BodyWalker<'_, '_> {
    fn walk(&mut self, parent: Node) -> Result<(), DocxError> {
        for node in parent.children().filter(Node::is_element) {
            match node.tag_name().name() {
                "p" => self.paragraph(node)?,
                "tbl" => self.table(node)?,
                // Content controls wrap ordinary blocks
                "sdt" => {
                    if let Some(content) = child(node, "sdtContent") {
                        self.walk(content)?;
                    }
                }
                "sectPr" => {}
                other => {
                    log::debug!("Skipping unsupported body element <{}>", other);
                    self.result.skipped += 1;
                }
            }
            self.position += 1;
        }
        Ok(())
    }

    fn paragraph(&mut self, node: Node) -> Result<(), DocxError> {
        let text = paragraph_text(node);
        let trimmed = text.trim();

        if !trimmed.is_empty() {
            let element = match self.heading_level(node, trimmed) {
                Some(level) => DocumentElement::Heading {
                    text: trimmed.to_string(),
                    level,
                },
                None => DocumentElement::Paragraph {
                    text: trimmed.to_string(),
                    style: paragraph_style(node),
                },
            };
            self.result.elements.push(element);
        }

        for drawing in drawings(node) {
            self.image(drawing)?;
        }
        Ok(())
    }

    fn heading_level(&self, node: Node, text: &str) -> Option<u8> {
        let properties = child(node, "pPr");

        let from_style = properties
            .and_then(|p| child(p, "pStyle"))
            .and_then(|s| local_attr(s, "val"))
            .and_then(|id| self.styles.heading_level(id));
        if from_style.is_some() {
            return from_style;
        }

        let from_outline = properties
            .and_then(|p| child(p, "outlineLvl"))
            .and_then(|o| local_attr(o, "val"))
            .and_then(|v| v.parse::<u8>().ok())
            .filter(|v| *v < 9)
            .map(|v| v + 1);
        if from_outline.is_some() {
            return from_outline;
        }

        (self.options.uppercase_as_heading && is_uppercase_heading(text)).then_some(1)
    }

    /// Cell text becomes a table element; pictures inside cells follow it
    /// as separate image elements
    fn table(&mut self, node: Node) -> Result<(), DocxError> {
        let mut rows: Vec<Vec<String>> = Vec::new();
        for row in node.children().filter(|n| n.tag_name().name() == "tr") {
            let mut cells = Vec::new();
            for cell in row.children().filter(|n| n.tag_name().name() == "tc") {
                if cells.len() >= MAX_TABLE_COLUMNS {
                    log::warn!("Table row has more than {} columns, truncating", MAX_TABLE_COLUMNS);
                    break;
                }
                let text = cell
                    .descendants()
                    .filter(|n| n.tag_name().name() == "p")
                    .map(paragraph_text)
                    .map(|t| t.trim().to_string())
                    .filter(|t| !t.is_empty())
                    .collect::<Vec<_>>()
                    .join("\n");
                let span = child(cell, "tcPr")
                    .and_then(|p| child(p, "gridSpan"))
                    .and_then(|g| local_attr(g, "val"))
                    .and_then(|v| v.parse::<usize>().ok())
                    .unwrap_or(1)
                    .clamp(1, MAX_TABLE_COLUMNS - cells.len());
                cells.push(text);
                cells.extend(std::iter::repeat(String::new()).take(span - 1));
            }
            rows.push(cells);
        }

        let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
        if columns == 0 {
            log::debug!("Skipping table without cells");
            self.result.skipped += 1;
        } else {
            for row in &mut rows {
                row.resize(columns, String::new());
            }
            self.result.elements.push(DocumentElement::Table { rows });
        }

        for drawing in drawings(node) {
            self.image(drawing)?;
        }
        Ok(())
    }

    fn image(&mut self, drawing: Node) -> Result<(), DocxError> {
        // DrawingML uses a:blip/@r:embed, legacy VML uses v:imagedata/@r:id
        let rel_id = drawing.descendants().find_map(|n| match n.tag_name().name() {
            "blip" => local_attr(n, "embed"),
            "imagedata" => local_attr(n, "id"),
            _ => None,
        });
        let Some(rel_id) = rel_id else {
            return Ok(());
        };

        let relationships = self.relationships;
        let Some(part_name) = relationships.target(rel_id) else {
            log::warn!("Image relationship {} not found, skipping", rel_id);
            self.result.skipped += 1;
            return Ok(());
        };

        let extent = drawing
            .descendants()
            .find(|n| n.tag_name().name() == "extent")
            .and_then(|n| {
                let cx = local_attr(n, "cx")?.parse::<u64>().ok()?;
                let cy = local_attr(n, "cy")?.parse::<u64>().ok()?;
                Some((cx, cy))
            });

        match read_binary_part(self.archive, part_name)? {
            Some(data) => self.result.elements.push(DocumentElement::Image(EmbeddedImage {
                data,
                position: self.position,
                extent,
                part_name: part_name.to_string(),
            })),
            None => {
                log::warn!("Image part {} is missing, skipping", part_name);
                self.result.skipped += 1;
            }
        }
        Ok(())
    }
}

fn child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|c| c.tag_name().name() == name)
}

/// Pictures below `node`, in document order. mc:Fallback repeats the
/// mc:Choice drawing in VML and is ignored.
fn drawings<'a, 'input>(node: Node<'a, 'input>) -> impl Iterator<Item = Node<'a, 'input>> {
    node.descendants().filter(|n| {
        matches!(n.tag_name().name(), "drawing" | "pict")
            && !n.ancestors().any(|a| a.tag_name().name() == "Fallback")
    })
}

/// Concatenate the visible text of every run in a paragraph
fn paragraph_text(node: Node) -> String {
    let mut text = String::new();
    for n in node.descendants() {
        match n.tag_name().name() {
            "t" => {
                if let Some(t) = n.text() {
                    text.push_str(t);
                }
            }
            "tab" if is_run_content(n) => text.push(' '),
            "br" | "cr" => text.push('\n'),
            _ => {}
        }
    }
    text
}

/// `w:tab` also appears in paragraph properties as a tab stop definition
fn is_run_content(node: Node) -> bool {
    node.parent()
        .map(|p| p.tag_name().name() == "r")
        .unwrap_or(false)
}

fn paragraph_style(node: Node) -> ParagraphStyle {
    let alignment = child(node, "pPr")
        .and_then(|p| child(p, "jc"))
        .and_then(|j| local_attr(j, "val"))
        .map(Alignment::from_word)
        .unwrap_or_default();

    let runs: Vec<Node> = node
        .descendants()
        .filter(|n| n.tag_name().name() == "r")
        .filter(|r| {
            r.children()
                .filter(|c| c.tag_name().name() == "t")
                .any(|t| t.text().map(|s| !s.trim().is_empty()).unwrap_or(false))
        })
        .collect();

    let all_runs = |property: &str| {
        !runs.is_empty()
            && runs.iter().all(|r| {
                child(*r, "rPr")
                    .and_then(|p| child(p, property))
                    .map(toggle_enabled)
                    .unwrap_or(false)
            })
    };

    ParagraphStyle {
        bold: all_runs("b"),
        italic: all_runs("i"),
        alignment,
    }
}

/// `<w:b/>` is on; `<w:b w:val="0"/>` / `false` / `off` is off
fn toggle_enabled(node: Node) -> bool {
    !matches!(local_attr(node, "val"), Some("0" | "false" | "off"))
}

/// Short text with at least one letter and no lowercase letters
fn is_uppercase_heading(text: &str) -> bool {
    text.chars().count() <= UPPERCASE_HEADING_MAX_CHARS
        && !text.contains('\n')
        && text.chars().any(char::is_alphabetic)
        && !text.chars().any(char::is_lowercase)
}

fn read_text_part(archive: &mut Archive, name: &str) -> Result<Option<String>, DocxError> {
    match read_binary_part(archive, name)? {
        Some(bytes) => String::from_utf8(bytes)
            .map(Some)
            .map_err(|e| DocxError::Read {
                part: name.to_string(),
                message: e.to_string(),
            }),
        None => Ok(None),
    }
}

fn read_binary_part(archive: &mut Archive, name: &str) -> Result<Option<Vec<u8>>, DocxError> {
    let file = match archive.by_name(name) {
        Ok(file) => file,
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(e) => {
            return Err(DocxError::Read {
                part: name.to_string(),
                message: e.to_string(),
            })
        }
    };

    if file.size() > MAX_PART_BYTES {
        return Err(DocxError::Read {
            part: name.to_string(),
            message: format!("part is larger than {} bytes", MAX_PART_BYTES),
        });
    }

    let mut bytes = Vec::with_capacity(file.size() as usize);
    file.take(MAX_PART_BYTES)
        .read_to_end(&mut bytes)
        .map_err(|e| DocxError::Read {
            part: name.to_string(),
            message: e.to_string(),
        })?;
    Ok(Some(bytes))
}
