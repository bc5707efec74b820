//! HTML renderer — fragment suitable for embedding in a page body.

use crate::model::Node;
use crate::render::Renderer;
use anyhow::Result;

pub struct HtmlRenderer;

impl Renderer for HtmlRenderer {
    fn render(&self, nodes: &[Node]) -> Result<String> {
        let mut out = String::new();
        for node in nodes {
            write_node(&mut out, node);
        }
        Ok(out)
    }

    fn file_extension(&self) -> &str {
        "html"
    }
}

fn write_node(out: &mut String, node: &Node) {
    match node {
        Node::Text { text } => out.push_str(&html_escape(text)),
        Node::Paragraph { children } => {
            out.push_str("<p>");
            for child in children {
                write_node(out, child);
            }
            out.push_str("</p>\n");
        }
        Node::Container { children } => {
            out.push_str("<div class=\"docutils container\">\n");
            for child in children {
                write_node(out, child);
            }
            out.push_str("</div>\n");
        }
        Node::Error { children } => {
            out.push_str("<div class=\"admonition error\">\n<p class=\"admonition-title\">Error</p>\n<p>");
            for child in children {
                write_node(out, child);
            }
            out.push_str("</p>\n</div>\n");
        }
    }
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
