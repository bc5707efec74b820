//! Pseudo-XML renderer — the indented tree dump docutils prints.

use crate::model::Node;
use crate::render::Renderer;
use anyhow::Result;

pub struct PseudoXmlRenderer;

impl Renderer for PseudoXmlRenderer {
    fn render(&self, nodes: &[Node]) -> Result<String> {
        let mut out = String::new();
        for node in nodes {
            write_node(&mut out, node, 0);
        }
        Ok(out)
    }

    fn file_extension(&self) -> &str {
        "xml"
    }
}

fn write_node(out: &mut String, node: &Node, depth: usize) {
    let pad = "    ".repeat(depth);
    match node {
        Node::Text { text } => {
            for line in text.lines() {
                out.push_str(&pad);
                out.push_str(&xml_escape(line));
                out.push('\n');
            }
        }
        _ => {
            out.push_str(&format!("{}<{}>\n", pad, node.tag()));
            for child in node.children() {
                write_node(out, child, depth + 1);
            }
        }
    }
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_indentation() {
        let nodes = vec![Node::container(vec![
            Node::paragraph("**Class Foo**: a <b>"),
            Node::paragraph("two\nlines"),
        ])];
        assert_eq!(
            PseudoXmlRenderer.render(&nodes).unwrap(),
            "<container>\n    <paragraph>\n        **Class Foo**: a &lt;b&gt;\n    <paragraph>\n        two\n        lines\n"
        );
    }

    #[test]
    fn error_node() {
        let out = PseudoXmlRenderer.render(&[Node::error("boom")]).unwrap();
        assert_eq!(out, "<error>\n    boom\n");
    }
}
