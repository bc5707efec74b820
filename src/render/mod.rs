//! Renderer module — trait-based format dispatch.

pub mod html;
pub mod json;
pub mod pseudoxml;

use crate::model::Node;
use anyhow::{anyhow, Result};

/// Trait for rendering a node sequence into a specific output format.
pub trait Renderer {
    fn render(&self, nodes: &[Node]) -> Result<String>;
    fn file_extension(&self) -> &str;
}

/// Create a renderer for the given format name.
pub fn create_renderer(format: &str) -> Result<Box<dyn Renderer>> {
    match format {
        "pseudoxml" | "xml" => Ok(Box::new(pseudoxml::PseudoXmlRenderer)),
        "html" => Ok(Box::new(html::HtmlRenderer)),
        "json" => Ok(Box::new(json::JsonRenderer)),
        _ => Err(anyhow!(
            "unknown format: {}. Use pseudoxml, html, or json",
            format
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_formats() {
        assert_eq!(create_renderer("xml").unwrap().file_extension(), "xml");
        assert_eq!(create_renderer("html").unwrap().file_extension(), "html");
        assert_eq!(create_renderer("json").unwrap().file_extension(), "json");
    }

    #[test]
    fn unknown_format() {
        let err = create_renderer("markdown").err().unwrap();
        assert!(err.to_string().starts_with("unknown format: markdown"));
    }
}
