//! Locate directive invocations in documentation sources.
//!
//! Two markups are understood:
//!
//! - reStructuredText: `.. name:: arguments` followed by an indented body
//! - MyST Markdown: a ```` ```{name} arguments ```` (or `~~~{name}`,
//!   `:::{name}`) fence
//!
//! Markdown block structure comes from pulldown-cmark, so a directive fence
//! quoted inside another code block stays literal. Only the directive
//! markers are parsed; everything else in the document is ignored.

use crate::model::Node;
use crate::registry::{DirectiveRegistry, Invocation};
use anyhow::{anyhow, Result};
use pulldown_cmark::{CodeBlockKind, Event, Options, Parser as MdParser, Tag, TagEnd};
use regex::Regex;
use std::ops::Range;
use std::path::Path;
use std::sync::LazyLock;
use tracing::debug;

static RE_RST_DIRECTIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([ \t]*)\.\.[ \t]+([A-Za-z0-9][\w:+.-]*)::(?:[ \t]+(.*))?$").unwrap()
});

// Info string of a backtick or tilde fence: `{name} arguments`
static RE_MYST_INFO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\{([A-Za-z0-9][\w:+.-]*)\}[ \t]*(.*)$").unwrap()
});

static RE_COLON_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[ \t]*(:{3,})\{([A-Za-z0-9][\w:+.-]*)\}[ \t]*(.*)$").unwrap()
});

/// Markup a document is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Syntax {
    Rst,
    Myst,
}

impl Syntax {
    /// Pick the markup from the file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("rst") => Ok(Syntax::Rst),
            Some("md") => Ok(Syntax::Myst),
            _ => Err(anyhow!("unsupported document type: {}", path.display())),
        }
    }
}

/// Find every directive invocation in `source`, in document order.
pub fn scan_directives(source: &str, syntax: Syntax) -> Vec<Invocation> {
    match syntax {
        Syntax::Rst => {
            let lines: Vec<&str> = source.lines().collect();
            scan_rst(&lines)
        }
        Syntax::Myst => scan_myst(source),
    }
}

fn scan_rst(lines: &[&str]) -> Vec<Invocation> {
    let mut found = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let Some(caps) = RE_RST_DIRECTIVE.captures(lines[i]) else {
            i += 1;
            continue;
        };
        let indent = indent_width(&caps[1]);
        let arguments: Vec<String> = caps
            .get(3)
            .map(|m| m.as_str().split_whitespace().map(String::from).collect())
            .unwrap_or_default();

        // Body: blank lines and lines indented past the marker
        let mut j = i + 1;
        while j < lines.len() && (lines[j].trim().is_empty() || indent_width(lines[j]) > indent) {
            j += 1;
        }
        let mut body = &lines[i + 1..j];
        while let Some((last, rest)) = body.split_last() {
            if !last.trim().is_empty() {
                break;
            }
            body = rest;
        }

        found.push(Invocation {
            name: caps[2].to_string(),
            arguments,
            content: dedent(body),
            line: i + 1,
        });
        i = j;
    }

    found
}

fn scan_myst(source: &str) -> Vec<Invocation> {
    let mut found = Vec::new();
    // Byte ranges of every code block; colon fences inside them are literal.
    let mut code_blocks: Vec<Range<usize>> = Vec::new();
    let mut current: Option<(Invocation, String)> = None;

    for (event, range) in MdParser::new_ext(source, Options::empty()).into_offset_iter() {
        match event {
            Event::Start(Tag::CodeBlock(kind)) => {
                code_blocks.push(range.clone());
                if let CodeBlockKind::Fenced(info) = kind {
                    if let Some(caps) = RE_MYST_INFO.captures(&info) {
                        let invocation = Invocation {
                            name: caps[1].to_string(),
                            arguments: caps[2].split_whitespace().map(String::from).collect(),
                            content: Vec::new(),
                            line: line_of(source, range.start),
                        };
                        current = Some((invocation, String::new()));
                    }
                }
            }
            Event::Text(text) => {
                if let Some((_, body)) = current.as_mut() {
                    body.push_str(&text);
                }
            }
            Event::End(TagEnd::CodeBlock) => {
                if let Some((mut invocation, body)) = current.take() {
                    invocation.content = body.lines().map(String::from).collect();
                    found.push(invocation);
                }
            }
            _ => {}
        }
    }

    found.extend(scan_colon_fences(source, &code_blocks));
    found.sort_by_key(|inv| inv.line);
    found
}

/// `:::{name}` fences outside code blocks.
fn scan_colon_fences(source: &str, code_blocks: &[Range<usize>]) -> Vec<Invocation> {
    let mut lines: Vec<(usize, &str)> = Vec::new();
    let mut offset = 0;
    for raw in source.split_inclusive('\n') {
        lines.push((offset, raw.trim_end_matches(['\n', '\r'])));
        offset += raw.len();
    }
    let literal = |off: usize| code_blocks.iter().any(|r| r.contains(&off));

    let mut found = Vec::new();
    let mut i = 0;
    while i < lines.len() {
        let (off, line) = lines[i];
        let caps = match RE_COLON_FENCE.captures(line) {
            Some(caps) if !literal(off) => caps,
            _ => {
                i += 1;
                continue;
            }
        };
        let fence_len = caps[1].len();

        let mut j = i + 1;
        while j < lines.len() && !closes_fence(lines[j].1, ':', fence_len) {
            j += 1;
        }

        found.push(Invocation {
            name: caps[2].to_string(),
            arguments: caps[3].split_whitespace().map(String::from).collect(),
            content: lines[i + 1..j].iter().map(|(_, l)| l.to_string()).collect(),
            line: i + 1,
        });
        // Skip the closing fence
        i = j + 1;
    }

    found
}

fn line_of(source: &str, offset: usize) -> usize {
    source[..offset].matches('\n').count() + 1
}

fn closes_fence(line: &str, fence_char: char, min_len: usize) -> bool {
    let trimmed = line.trim();
    trimmed.len() >= min_len && trimmed.chars().all(|c| c == fence_char)
}

fn indent_width(line: &str) -> usize {
    line.chars()
        .take_while(|c| *c == ' ' || *c == '\t')
        .map(|c| if c == '\t' { 8 } else { 1 })
        .sum()
}

fn dedent(lines: &[&str]) -> Vec<String> {
    let min = lines
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.len() - l.trim_start_matches([' ', '\t']).len())
        .min()
        .unwrap_or(0);
    lines
        .iter()
        .map(|l| l.get(min..).unwrap_or("").trim_end().to_string())
        .collect()
}

/// Run every directive found in the document at `path` and concatenate
/// their output.
pub fn expand_document(
    path: &Path,
    source: &str,
    syntax: Syntax,
    registry: &DirectiveRegistry,
) -> Vec<Node> {
    let invocations = scan_directives(source, syntax);
    debug!(document = %path.display(), directives = invocations.len(), "scanned document");
    invocations
        .iter()
        .filter(|inv| {
            // Directives handled by other extensions are left to the host.
            let known = registry.get(&inv.name).is_some();
            if !known {
                debug!(directive = %inv.name, line = inv.line, "not registered, passing through");
            }
            known
        })
        .flat_map(|inv| registry.run(inv, path))
        .collect()
}
