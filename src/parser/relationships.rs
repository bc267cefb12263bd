use std::collections::HashMap;

use roxmltree::Document;

use crate::error::DocxError;

/// Part holding the main document's relationships
pub const DOCUMENT_RELS_PART: &str = "word/_rels/document.xml.rels";

/// Relationship id -> part name inside the container
#[derive(Debug, Default, Clone)]
pub struct Relationships {
    targets: HashMap<String, String>,
}

impl Relationships {
    pub fn parse(xml: &str) -> Result<Self, DocxError> {
        let doc = Document::parse(xml).map_err(|e| DocxError::Xml {
            part: DOCUMENT_RELS_PART.to_string(),
            message: e.to_string(),
        })?;

        let mut targets = HashMap::new();
        for node in doc
            .descendants()
            .filter(|n| n.tag_name().name() == "Relationship")
        {
            // Hyperlinks and linked images point outside the package
            if node.attribute("TargetMode") == Some("External") {
                continue;
            }
            if let (Some(id), Some(target)) = (node.attribute("Id"), node.attribute("Target")) {
                targets.insert(id.to_string(), resolve_target("word", target));
            }
        }

        Ok(Self { targets })
    }

    pub fn target(&self, id: &str) -> Option<&str> {
        self.targets.get(id).map(String::as_str)
    }
}

/// Resolve a relationship target relative to the directory of its source part
fn resolve_target(base_dir: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }

    let mut segments: Vec<&str> = base_dir.split('/').filter(|s| !s.is_empty()).collect();
    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}
