//! gddoc — pull class and function docstrings out of GDScript files and
//! turn them into document nodes for a documentation build.
//!
//! The [`gdscript-auto`](DIRECTIVE_NAME) directive is the entry point a
//! host registers through [`setup`]:
//!
//! ```text
//! .. gdscript-auto:: ../scripts/player.gd
//! ```
//!
//! Each invocation yields exactly one node: a container with one paragraph
//! per documented declaration, or an error node when the script is missing
//! or unreadable.

pub mod directive;
pub mod document;
pub mod extract;
pub mod logging;
pub mod model;
pub mod registry;
pub mod render;

pub use directive::{
    normalize_path, render, resolve_path, DirectiveError, FsReader, GdscriptAuto, SourceReader,
    DIRECTIVE_NAME,
};
pub use document::{expand_document, scan_directives, Syntax};
pub use extract::{extract, extract_items, DeclKind, DocItem, NO_DOCUMENTATION};
pub use model::Node;
pub use registry::{setup, Directive, DirectiveRegistry, ExtensionMetadata, Invocation};
