//! GDScript docstring extractor.
//!
//! Pattern-based, not a grammar: two independent passes over the source.
//!
//! - `class_name <Name>` starts a class body that runs up to the next line
//!   beginning with `class` or `func` (or the end of the file). The first
//!   `"""..."""` block anywhere in that body describes the class.
//! - `func <name>(...) -> <type>:` followed on the next line by a
//!   `"""..."""` block describes the function.
//!
//! All class items come first, then all function items, each in text order.
//! Declarations that don't fit these shapes are skipped silently.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// Placeholder returned when neither pass finds anything.
pub const NO_DOCUMENTATION: &str = "No documentation found in this file.";

static RE_CLASS_HEAD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"class_name\s+(\w+)").unwrap());

// Start of the next declaration, which closes a class body.
static RE_BODY_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n(?:class|func)").unwrap());

static RE_DOCSTRING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?s)"""\s*(.*?)\s*""""#).unwrap());

static RE_FUNC_DOC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)func\s+(\w+)\s*\([^)]*\)\s*->\s*[^:]+:\s*\n\s*"""(.*?)""""#).unwrap()
});

/// Kind of documented declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind {
    Class,
    Function,
}

impl fmt::Display for DeclKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeclKind::Class => f.write_str("Class"),
            DeclKind::Function => f.write_str("Function"),
        }
    }
}

/// One documented declaration.
///
/// Displays as `**Class Foo**: description`, the form paragraphs carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocItem {
    pub kind: DeclKind,
    pub name: String,
    pub description: String,
}

impl fmt::Display for DocItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "**{} {}**: {}", self.kind, self.name, self.description)
    }
}

/// Extract formatted documentation strings from GDScript source.
///
/// Never returns an empty vector: when nothing is documented the result is
/// `[NO_DOCUMENTATION]`.
pub fn extract(source: &str) -> Vec<String> {
    let items = extract_items(source);
    if items.is_empty() {
        return vec![NO_DOCUMENTATION.to_string()];
    }
    items.iter().map(ToString::to_string).collect()
}

/// Extract documented declarations. Classes first, then functions.
pub fn extract_items(source: &str) -> Vec<DocItem> {
    let mut items = class_items(source);
    items.extend(function_items(source));
    items
}

fn class_items(source: &str) -> Vec<DocItem> {
    let mut items = Vec::new();
    let mut pos = 0;

    while let Some(caps) = RE_CLASS_HEAD.captures_at(source, pos) {
        let head = caps.get(0).map_or(pos, |m| m.end());
        // Body starts on the line after the class name; no newline, no body.
        let Some(newline) = source[head..].find('\n') else {
            break;
        };
        let body_start = head + newline + 1;
        let body_end = body_end(source, body_start);

        let body = &source[body_start..body_end];
        if let Some(doc) = RE_DOCSTRING.captures(body) {
            items.push(DocItem {
                kind: DeclKind::Class,
                name: caps[1].to_string(),
                description: doc[1].trim().to_string(),
            });
        }
        pos = body_end;
    }

    items
}

/// Earliest of: the next `\nclass`/`\nfunc`, a trailing newline, end of input.
fn body_end(source: &str, body_start: usize) -> usize {
    let mut end = source.len();
    if source.ends_with('\n') && source.len() - 1 >= body_start {
        end = source.len() - 1;
    }
    if let Some(m) = RE_BODY_END.find_at(source, body_start) {
        end = end.min(m.start());
    }
    end
}

fn function_items(source: &str) -> Vec<DocItem> {
    RE_FUNC_DOC
        .captures_iter(source)
        .map(|caps| DocItem {
            kind: DeclKind::Function,
            name: caps[1].to_string(),
            description: caps[2].trim().to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_docstring() {
        let out = extract("class_name Foo\n\"\"\"Does foo things.\"\"\"");
        assert_eq!(out, vec!["**Class Foo**: Does foo things."]);
    }

    #[test]
    fn function_docstring() {
        let out = extract("func bar(x: int) -> int:\n    \"\"\"Returns x.\"\"\"\n    return x\n");
        assert_eq!(out, vec!["**Function bar**: Returns x."]);
    }

    #[test]
    fn empty_file_yields_placeholder() {
        assert_eq!(extract(""), vec![NO_DOCUMENTATION]);
        assert!(extract_items("").is_empty());
    }

    #[test]
    fn undocumented_declarations_yield_placeholder() {
        let src = "class_name Foo\nextends Node\n\nfunc bar(x: int) -> int:\n    return x\n";
        assert_eq!(extract(src), vec![NO_DOCUMENTATION]);
    }

    #[test]
    fn classes_come_before_functions() {
        let src = "\
func early() -> void:
    \"\"\"Defined first.\"\"\"
    pass

class_name Player
extends Node
\"\"\"
    The player.
\"\"\"

func jump(height: float) -> void:
    \"\"\"Jumps.\"\"\"
    pass
";
        assert_eq!(
            extract(src),
            vec![
                "**Class Player**: The player.",
                "**Function early**: Defined first.",
                "**Function jump**: Jumps.",
            ]
        );
    }

    #[test]
    fn class_body_stops_at_next_declaration() {
        // The docstring belongs to the function, not to the class.
        let src = "class_name Foo\nextends Node\nfunc bar() -> void:\n    \"\"\"Bar.\"\"\"\n";
        let items = extract_items(src);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].kind, DeclKind::Function);
        assert_eq!(items[0].name, "bar");
    }

    #[test]
    fn function_without_return_type_is_skipped() {
        let src = "func bar(x):\n    \"\"\"Returns x.\"\"\"\n";
        assert_eq!(extract(src), vec![NO_DOCUMENTATION]);
    }

    #[test]
    fn function_docstring_must_follow_signature() {
        let src = "func bar() -> int:\n    var x = 1\n    \"\"\"Late.\"\"\"\n    return x\n";
        assert!(extract_items(src).is_empty());
    }

    #[test]
    fn multiline_description_is_trimmed() {
        let src = "func area(w: float, h: float) -> float:\n    \"\"\"\n    Area of a rectangle.\n    \"\"\"\n";
        assert_eq!(extract(src), vec!["**Function area**: Area of a rectangle."]);
    }

    #[test]
    fn class_head_without_newline_is_ignored() {
        assert!(extract_items("class_name Foo").is_empty());
    }

    #[test]
    fn extraction_is_idempotent() {
        let src = "class_name A\n\"\"\"a\"\"\"\nclass_name B\n\"\"\"b\"\"\"\n";
        let first = extract(src);
        assert_eq!(first, extract(src));
        assert_eq!(first, vec!["**Class A**: a", "**Class B**: b"]);
    }

    #[test]
    fn doc_item_display() {
        let item = DocItem {
            kind: DeclKind::Function,
            name: "go".into(),
            description: "Go.".into(),
        };
        assert_eq!(item.to_string(), "**Function go**: Go.");
    }
}
