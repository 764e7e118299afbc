//! Splitting a markdown document into header-delimited sections.

use crate::markup::header_name;

/// One header-delimited section of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Header text without the leading `#`s; `None` for text before the first header.
    pub name: Option<String>,

    /// The raw header line.
    pub header: Option<String>,

    /// Lines between this header and the next.
    pub body: Vec<String>,
}

impl Section {
    fn preamble() -> Self {
        Self {
            name: None,
            header: None,
            body: Vec::new(),
        }
    }

    /// Body lines joined with newlines.
    pub fn body_text(&self) -> String {
        self.body.join("\n")
    }

    /// Header and body lines, in document order.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.header
            .as_deref()
            .into_iter()
            .chain(self.body.iter().map(String::as_str))
    }

    pub fn is_empty(&self) -> bool {
        self.header.is_none() && self.body.is_empty()
    }
}

/// Partition `content` into sections. The preamble is only returned when it
/// has at least one line.
pub fn split_sections(content: &str) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut current = Section::preamble();

    for line in content.lines() {
        if let Some(name) = header_name(line) {
            if !current.is_empty() {
                sections.push(current);
            }
            current = Section {
                name: Some(name),
                header: Some(line.to_string()),
                body: Vec::new(),
            };
        } else {
            current.body.push(line.to_string());
        }
    }
    if !current.is_empty() {
        sections.push(current);
    }

    sections
}
