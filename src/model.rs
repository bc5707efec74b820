//! Document tree produced by directives — format-agnostic.
//!
//! The node kinds follow the docutils element names a documentation host
//! expects: a container of paragraphs for content, an error element for
//! failures, and plain text leaves.

use serde::Serialize;

/// A single node in the generated document tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "tag", rename_all = "lowercase")]
pub enum Node {
    /// Generic grouping element.
    Container { children: Vec<Node> },
    /// Block of running text.
    Paragraph { children: Vec<Node> },
    /// Inline error report shown in place of the directive output.
    Error { children: Vec<Node> },
    /// Text leaf.
    #[serde(rename = "#text")]
    Text { text: String },
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text { text: text.into() }
    }

    /// Paragraph holding one text leaf.
    pub fn paragraph(text: impl Into<String>) -> Self {
        Node::Paragraph {
            children: vec![Node::text(text)],
        }
    }

    /// Error element holding one text leaf.
    pub fn error(text: impl Into<String>) -> Self {
        Node::Error {
            children: vec![Node::text(text)],
        }
    }

    pub fn container(children: Vec<Node>) -> Self {
        Node::Container { children }
    }

    /// Element name as docutils spells it.
    pub fn tag(&self) -> &'static str {
        match self {
            Node::Container { .. } => "container",
            Node::Paragraph { .. } => "paragraph",
            Node::Error { .. } => "error",
            Node::Text { .. } => "#text",
        }
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::Container { children }
            | Node::Paragraph { children }
            | Node::Error { children } => children,
            Node::Text { .. } => &[],
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Node::Error { .. })
    }

    /// Concatenated text of this node and all its descendants.
    pub fn text_content(&self) -> String {
        match self {
            Node::Text { text } => text.clone(),
            _ => self.children().iter().map(Node::text_content).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paragraph_wraps_text() {
        let para = Node::paragraph("hello");
        assert_eq!(para.tag(), "paragraph");
        assert_eq!(para.children(), &[Node::text("hello")]);
        assert_eq!(para.text_content(), "hello");
    }

    #[test]
    fn text_content_is_recursive() {
        let tree = Node::container(vec![Node::paragraph("a"), Node::paragraph("b")]);
        assert_eq!(tree.text_content(), "ab");
        assert!(!tree.is_error());
        assert!(Node::error("x").is_error());
    }

    #[test]
    fn serializes_with_element_tag() {
        let json = serde_json::to_string(&Node::paragraph("hi")).unwrap();
        assert_eq!(
            json,
            r##"{"tag":"paragraph","children":[{"tag":"#text","text":"hi"}]}"##
        );
    }
}
