//! Parsed page view consumed by the extractor.
//!
//! The markup parser is an external collaborator; the extraction logic only
//! ever sees this flattened view: stripped text nodes plus elements that
//! carry a class attribute. Nothing here depends on how the page was parsed.

/// An element with its class attribute and flattened text content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedElement {
    pub name: String,
    pub class_attr: String,
    pub text: String,
}

impl TaggedElement {
    pub fn new(
        name: impl Into<String>,
        class_attr: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            class_attr: class_attr.into(),
            text: text.into(),
        }
    }
}

/// Flattened view of one fetched page
#[derive(Debug, Clone, Default)]
pub struct PageContent {
    /// Whitespace-stripped, non-empty text nodes in document order
    pub text_nodes: Vec<String>,
    /// Elements carrying a class attribute, in document order
    pub elements: Vec<TaggedElement>,
}

impl PageContent {
    pub fn new(text_nodes: Vec<String>, elements: Vec<TaggedElement>) -> Self {
        Self { text_nodes, elements }
    }

    /// Full page text, used for availability-phrase matching
    pub fn full_text(&self) -> String {
        self.text_nodes.join(" ")
    }
}
