//! The `gdscript-auto` directive.
//!
//! Resolves the script path against the invoking document, reads it,
//! extracts docstrings and wraps the result in document nodes. Every
//! outcome is a node sequence of length one: a container of paragraphs on
//! success, an error node otherwise. Nothing is propagated to the host.

use crate::extract;
use crate::model::Node;
use crate::registry::{Directive, Invocation};
use std::io;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Name the directive is registered under.
pub const DIRECTIVE_NAME: &str = "gdscript-auto";

/// Failures surfaced as inline error nodes.
#[derive(Debug, Error)]
pub enum DirectiveError {
    #[error("GDScript file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Error processing GDScript file: {0}")]
    Processing(#[from] io::Error),
}

/// File access the host provides to the directive.
pub trait SourceReader {
    fn exists(&self, path: &Path) -> bool;
    fn read_to_string(&self, path: &Path) -> io::Result<String>;
}

/// Reads straight from the local file system.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsReader;

impl SourceReader for FsReader {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }
}

/// Resolve a directive argument against the document that invokes it.
///
/// Absolute arguments are returned untouched. Relative ones are joined to the
/// document's directory and normalized lexically.
pub fn resolve_path(argument: &str, invoking_document: &Path) -> PathBuf {
    let arg = Path::new(argument);
    if arg.is_absolute() {
        return arg.to_path_buf();
    }
    let base = invoking_document.parent().unwrap_or_else(|| Path::new(""));
    normalize_path(&base.join(arg))
}

/// Collapse `.` and `..` segments without touching the file system.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut parts: Vec<Component> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                // `..` above the root stays at the root
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            _ => parts.push(component),
        }
    }
    if parts.is_empty() {
        return PathBuf::from(".");
    }
    parts.iter().collect()
}

/// The directive itself. Stateless; one value can serve any number of
/// concurrent invocations.
#[derive(Debug, Default, Clone)]
pub struct GdscriptAuto<R = FsReader> {
    reader: R,
}

impl GdscriptAuto<FsReader> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<R: SourceReader> GdscriptAuto<R> {
    pub fn with_reader(reader: R) -> Self {
        Self { reader }
    }

    /// Resolve, read and extract. Returns the formatted items or the reason
    /// no items could be produced.
    pub fn run_path(
        &self,
        argument: &str,
        invoking_document: &Path,
    ) -> Result<Vec<String>, DirectiveError> {
        let path = resolve_path(argument, invoking_document);
        info!("Processing GDScript file: {}", path.display());

        if !self.reader.exists(&path) {
            return Err(DirectiveError::NotFound(path));
        }

        let source = self.reader.read_to_string(&path)?;
        let items = extract::extract(&source);
        debug!(path = %path.display(), items = items.len(), "extracted docstrings");
        Ok(items)
    }

    /// Run the directive and turn its outcome into document nodes.
    pub fn render(&self, argument: &str, invoking_document: &Path) -> Vec<Node> {
        match self.run_path(argument, invoking_document) {
            Ok(items) => {
                let paragraphs = items.into_iter().map(Node::paragraph).collect();
                vec![Node::container(paragraphs)]
            }
            Err(err) => {
                warn!("{err}");
                vec![Node::error(err.to_string())]
            }
        }
    }
}

impl<R: SourceReader + Send + Sync> Directive for GdscriptAuto<R> {
    fn required_arguments(&self) -> usize {
        1
    }

    fn run(&self, invocation: &Invocation, document: &Path) -> Vec<Node> {
        match invocation.arguments.first() {
            Some(argument) => self.render(argument, document),
            None => vec![Node::error(format!(
                "Error in \"{}\" directive: 1 argument(s) required, 0 supplied.",
                invocation.name
            ))],
        }
    }
}

/// Render `argument` as invoked from `invoking_document`, reading from disk.
pub fn render(argument: &str, invoking_document: &Path) -> Vec<Node> {
    GdscriptAuto::new().render(argument, invoking_document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::collections::HashMap;

    /// In-memory reader that counts reads.
    #[derive(Default)]
    struct MemReader {
        files: HashMap<PathBuf, io::Result<String>>,
        reads: Cell<usize>,
    }

    impl MemReader {
        fn with(path: &str, contents: io::Result<String>) -> Self {
            let mut files = HashMap::new();
            files.insert(PathBuf::from(path), contents);
            Self {
                files,
                reads: Cell::new(0),
            }
        }
    }

    impl SourceReader for MemReader {
        fn exists(&self, path: &Path) -> bool {
            self.files.contains_key(path)
        }

        fn read_to_string(&self, path: &Path) -> io::Result<String> {
            self.reads.set(self.reads.get() + 1);
            match self.files.get(path) {
                Some(Ok(s)) => Ok(s.clone()),
                Some(Err(e)) => Err(io::Error::new(e.kind(), e.to_string())),
                None => Err(io::ErrorKind::NotFound.into()),
            }
        }
    }

    #[test]
    fn resolve_relative_to_document_dir() {
        let path = resolve_path("../scripts/player.gd", Path::new("/docs/source/api.rst"));
        assert_eq!(path, PathBuf::from("/docs/scripts/player.gd"));
    }

    #[test]
    fn resolve_keeps_absolute() {
        let path = resolve_path("/abs/./x.gd", Path::new("/docs/index.rst"));
        assert_eq!(path, PathBuf::from("/abs/./x.gd"));
    }

    #[test]
    fn resolve_matches_manual_join() {
        let doc = Path::new("/a/b/c/index.rst");
        let arg = "./d/../e.gd";
        let manual = normalize_path(&Path::new("/a/b/c").join(arg));
        assert_eq!(resolve_path(arg, doc), manual);
        assert_eq!(manual, PathBuf::from("/a/b/c/e.gd"));
    }

    #[test]
    fn normalize_edge_cases() {
        assert_eq!(normalize_path(Path::new("/../x")), PathBuf::from("/x"));
        assert_eq!(normalize_path(Path::new("../x/./y")), PathBuf::from("../x/y"));
        assert_eq!(normalize_path(Path::new("a/..")), PathBuf::from("."));
        assert_eq!(normalize_path(Path::new("a//b/")), PathBuf::from("a/b"));
    }

    #[test]
    fn missing_file_is_error_without_read() {
        let directive = GdscriptAuto::with_reader(MemReader::default());
        let nodes = directive.render("missing.gd", Path::new("/docs/index.rst"));
        assert_eq!(
            nodes,
            vec![Node::error("GDScript file not found: /docs/missing.gd")]
        );
        assert_eq!(directive.reader.reads.get(), 0);
    }

    #[test]
    fn success_wraps_items_in_container() {
        let reader = MemReader::with(
            "/docs/foo.gd",
            Ok("class_name Foo\n\"\"\"Foo.\"\"\"\n\nfunc f() -> void:\n\t\"\"\"F.\"\"\"\n".into()),
        );
        let nodes = GdscriptAuto::with_reader(reader).render("foo.gd", Path::new("/docs/index.rst"));
        assert_eq!(
            nodes,
            vec![Node::container(vec![
                Node::paragraph("**Class Foo**: Foo."),
                Node::paragraph("**Function f**: F."),
            ])]
        );
    }

    #[test]
    fn placeholder_is_wrapped_like_any_item() {
        let reader = MemReader::with("/docs/empty.gd", Ok(String::new()));
        let nodes = GdscriptAuto::with_reader(reader).render("empty.gd", Path::new("/docs/index.rst"));
        assert_eq!(
            nodes,
            vec![Node::container(vec![Node::paragraph(extract::NO_DOCUMENTATION)])]
        );
    }

    #[test]
    fn read_failure_becomes_processing_error() {
        let reader = MemReader::with(
            "/docs/bad.gd",
            Err(io::Error::new(io::ErrorKind::InvalidData, "invalid utf-8")),
        );
        let nodes = GdscriptAuto::with_reader(reader).render("bad.gd", Path::new("/docs/index.rst"));
        assert_eq!(nodes.len(), 1);
        assert!(nodes[0].is_error());
        assert_eq!(
            nodes[0].text_content(),
            "Error processing GDScript file: invalid utf-8"
        );
    }
}
