use std::collections::HashMap;

use roxmltree::Document;

use crate::error::DocxError;

pub const STYLES_PART: &str = "word/styles.xml";

/// Paragraph style ids mapped to their display names
#[derive(Debug, Default, Clone)]
pub struct StyleMap {
    names: HashMap<String, String>,
}

impl StyleMap {
    pub fn parse(xml: &str) -> Result<Self, DocxError> {
        let doc = Document::parse(xml).map_err(|e| DocxError::Xml {
            part: STYLES_PART.to_string(),
            message: e.to_string(),
        })?;

        let mut names = HashMap::new();
        for style in doc.descendants().filter(|n| n.tag_name().name() == "style") {
            let Some(id) = local_attr(style, "styleId") else {
                continue;
            };
            let name = style
                .children()
                .find(|c| c.tag_name().name() == "name")
                .and_then(|c| local_attr(c, "val"))
                .unwrap_or(id);
            names.insert(id.to_string(), name.to_string());
        }

        Ok(Self { names })
    }

    /// Display name of a style, falling back to the id itself
    pub fn name<'a>(&'a self, style_id: &'a str) -> &'a str {
        self.names
            .get(style_id)
            .map(String::as_str)
            .unwrap_or(style_id)
    }

    /// Heading level implied by a paragraph style, if any
    pub fn heading_level(&self, style_id: &str) -> Option<u8> {
        heading_level_from_name(self.name(style_id))
    }
}

/// "Heading 2" / "heading2" -> 2, "Title" -> 1, "Subtitle" -> 2
pub fn heading_level_from_name(name: &str) -> Option<u8> {
    let normalized: String = name
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_ascii_lowercase();

    match normalized.as_str() {
        "title" => return Some(1),
        "subtitle" => return Some(2),
        _ => {}
    }

    let digits = normalized.strip_prefix("heading")?;
    if digits.is_empty() {
        return Some(1);
    }
    digits.parse::<u8>().ok().filter(|level| (1..=9).contains(level))
}

/// Attribute lookup by local name, ignoring the namespace prefix
pub(crate) fn local_attr<'a>(node: roxmltree::Node<'a, '_>, name: &str) -> Option<&'a str> {
    node.attributes()
        .find(|a| a.name() == name)
        .map(|a| a.value())
}

#[cfg(test)]
mod tests {
    use super::*;

    const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/></w:style>
  <w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="heading 1"/></w:style>
  <w:style w:type="paragraph" w:styleId="berschrift2"><w:name w:val="heading 2"/></w:style>
  <w:style w:type="paragraph" w:styleId="Title"><w:name w:val="Title"/></w:style>
</w:styles>"#;

    #[test]
    fn test_heading_levels_from_styles() {
        let styles = StyleMap::parse(STYLES).unwrap();
        assert_eq!(styles.heading_level("Heading1"), Some(1));
        // Localised style ids still resolve through their name
        assert_eq!(styles.heading_level("berschrift2"), Some(2));
        assert_eq!(styles.heading_level("Title"), Some(1));
        assert_eq!(styles.heading_level("Normal"), None);
        // Unknown ids fall back to the id itself
        assert_eq!(styles.heading_level("Heading3"), Some(3));
    }

    #[test]
    fn test_heading_level_from_name() {
        assert_eq!(heading_level_from_name("Heading 4"), Some(4));
        assert_eq!(heading_level_from_name("heading"), Some(1));
        assert_eq!(heading_level_from_name("Heading 12"), None);
        assert_eq!(heading_level_from_name("Headings list"), None);
        assert_eq!(heading_level_from_name("Body Text"), None);
    }
}
