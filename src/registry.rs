//! Directive registration — the contract between directives and the host.
//!
//! A host looks directives up by name and hands them an [`Invocation`]
//! together with the path of the document being rendered. The registry
//! checks the invocation against the directive's declared shape first, so
//! directives only ever see well-formed calls.

use crate::directive::{GdscriptAuto, DIRECTIVE_NAME};
use crate::model::Node;
use std::collections::BTreeMap;
use std::path::Path;

/// A directive as written in a source document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Invocation {
    pub name: String,
    pub arguments: Vec<String>,
    /// Body lines, dedented.
    pub content: Vec<String>,
    /// 1-based line of the directive marker.
    pub line: usize,
}

/// Build-pipeline extension point.
pub trait Directive {
    fn required_arguments(&self) -> usize {
        0
    }

    fn optional_arguments(&self) -> usize {
        0
    }

    fn has_content(&self) -> bool {
        false
    }

    /// Produce the nodes replacing the invocation. Must not be empty.
    fn run(&self, invocation: &Invocation, document: &Path) -> Vec<Node>;
}

/// What an extension reports back from [`setup`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionMetadata {
    pub version: &'static str,
    pub parallel_read_safe: bool,
    pub parallel_write_safe: bool,
}

/// Named directives known to a host.
#[derive(Default)]
pub struct DirectiveRegistry {
    directives: BTreeMap<String, Box<dyn Directive + Send + Sync>>,
}

impl DirectiveRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `directive` under `name`, replacing any previous one.
    pub fn add_directive(
        &mut self,
        name: impl Into<String>,
        directive: Box<dyn Directive + Send + Sync>,
    ) {
        self.directives.insert(name.into(), directive);
    }

    pub fn get(&self, name: &str) -> Option<&(dyn Directive + Send + Sync)> {
        self.directives.get(name).map(|d| d.as_ref())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.directives.keys().map(String::as_str)
    }

    /// Validate and run one invocation. Problems become error nodes.
    pub fn run(&self, invocation: &Invocation, document: &Path) -> Vec<Node> {
        let name = &invocation.name;
        let Some(directive) = self.get(name) else {
            return vec![Node::error(format!("Unknown directive type \"{name}\"."))];
        };

        let required = directive.required_arguments();
        let max = required + directive.optional_arguments();
        let supplied = invocation.arguments.len();
        if supplied < required {
            return vec![Node::error(format!(
                "Error in \"{name}\" directive: {required} argument(s) required, {supplied} supplied."
            ))];
        }
        if supplied > max {
            return vec![Node::error(format!(
                "Error in \"{name}\" directive: maximum {max} argument(s) allowed, {supplied} supplied."
            ))];
        }
        if !directive.has_content() && invocation.content.iter().any(|l| !l.trim().is_empty()) {
            return vec![Node::error(format!(
                "Error in \"{name}\" directive: no content permitted."
            ))];
        }

        directive.run(invocation, document)
    }
}

/// Register the GDScript directive with a host.
pub fn setup(registry: &mut DirectiveRegistry) -> ExtensionMetadata {
    registry.add_directive(DIRECTIVE_NAME, Box::new(GdscriptAuto::new()));
    ExtensionMetadata {
        version: "1.0",
        parallel_read_safe: true,
        parallel_write_safe: true,
    }
}
