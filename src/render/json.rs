//! JSON renderer — structured output for tooling integration.
//!
//! Serializes the node sequence directly.

use crate::model::Node;
use crate::render::Renderer;
use anyhow::{Context, Result};

pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, nodes: &[Node]) -> Result<String> {
        let mut out =
            serde_json::to_string_pretty(nodes).context("failed to serialize nodes as JSON")?;
        out.push('\n');
        Ok(out)
    }

    fn file_extension(&self) -> &str {
        "json"
    }
}
