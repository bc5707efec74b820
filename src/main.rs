//! gddoc — render GDScript docstrings the way the `gdscript-auto`
//! directive would inside a documentation build.
//!
//! - `gddoc scripts/player.gd` — run the directive on one script
//! - `gddoc -o build docs/*.rst` — expand every directive in each document

use anyhow::{bail, Context, Result};
use clap::Parser;
use gddoc::registry::{DirectiveRegistry, Invocation};
use gddoc::{document, logging, render, Node, DIRECTIVE_NAME};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Parser)]
#[command(
    name = "gddoc",
    about = "Extract class and function documentation from GDScript files"
)]
struct Cli {
    /// Input files: .gd scripts, .rst or .md documents (glob patterns supported)
    files: Vec<String>,

    /// Output directory. Prints to stdout when omitted.
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Output format: pseudoxml (default), html, json
    #[arg(short = 'f', long, default_value = "pseudoxml")]
    format: String,

    /// Exit with status 1 if any directive produced an error node or an
    /// input had to be skipped
    #[arg(long)]
    fail_on_error: bool,

    /// More log output (repeatable)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short = 'q', long, conflicts_with = "verbose")]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(logging::level_for(cli.verbose, cli.quiet));

    if cli.files.is_empty() {
        bail!("no input files given");
    }

    let mut registry = DirectiveRegistry::new();
    gddoc::setup(&mut registry);
    let renderer = render::create_renderer(&cli.format)?;

    if let Some(dir) = &cli.output {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create output directory: {}", dir.display()))?;
    }

    let inputs = expand_globs(&cli.files)?;
    if inputs.is_empty() {
        bail!("no input files matched");
    }

    let mut saw_error = false;
    for path in &inputs {
        let nodes = match process(path, &registry) {
            Ok(nodes) => nodes,
            Err(e) => {
                warn!("skipping {}: {:#}", path.display(), e);
                saw_error = true;
                continue;
            }
        };
        saw_error |= nodes.iter().any(Node::is_error);

        let rendered = renderer.render(&nodes)?;
        match &cli.output {
            Some(dir) => {
                let out_path = dir.join(format!(
                    "{}.{}",
                    derive_output_name(path),
                    renderer.file_extension()
                ));
                fs::write(&out_path, &rendered)
                    .with_context(|| format!("failed to write {}", out_path.display()))?;
            }
            None => print!("{}", rendered),
        }
    }

    if saw_error && cli.fail_on_error {
        bail!("one or more inputs reported errors");
    }
    Ok(())
}

/// Produce the nodes for one input file.
fn process(path: &Path, registry: &DirectiveRegistry) -> Result<Vec<Node>> {
    if path.extension().and_then(|e| e.to_str()) == Some("gd") {
        // A bare script behaves like a directive in a document at the
        // current directory.
        let Some(argument) = path.to_str() else {
            bail!("script path is not valid UTF-8: {}", path.display());
        };
        let invocation = Invocation {
            name: DIRECTIVE_NAME.to_string(),
            arguments: vec![argument.to_string()],
            content: Vec::new(),
            line: 1,
        };
        return Ok(registry.run(&invocation, Path::new("index")));
    }

    let syntax = document::Syntax::from_path(path)?;
    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    Ok(document::expand_document(path, &source, syntax, registry))
}

/// File extensions recognized as inputs.
const SUPPORTED_EXTENSIONS: &[&str] = &["gd", "rst", "md"];

/// Expand glob patterns into a list of real file paths.
/// Also handles bare directory paths by scanning for supported file types.
fn expand_globs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in patterns {
        let path = Path::new(pattern);
        if path.is_file() {
            files.push(path.to_path_buf());
            continue;
        }
        // If it's a directory, scan for supported extensions (non-recursive)
        if path.is_dir() {
            let entries = fs::read_dir(path)
                .with_context(|| format!("failed to read directory: {}", path.display()))?;
            for entry in entries.flatten() {
                let p = entry.path();
                if p.is_file() {
                    if let Some(ext) = p.extension().and_then(|e| e.to_str()) {
                        if SUPPORTED_EXTENSIONS.contains(&ext) {
                            files.push(p);
                        }
                    }
                }
            }
            continue;
        }
        let matches: Vec<_> = glob::glob(pattern)
            .with_context(|| format!("invalid glob pattern: {}", pattern))?
            .filter_map(|r| r.ok())
            .filter(|p| p.is_file())
            .collect();
        if matches.is_empty() {
            // Scripts that don't exist still go to the directive, which
            // reports them as not found.
            if path.extension().and_then(|e| e.to_str()) == Some("gd") {
                files.push(path.to_path_buf());
            } else {
                warn!("no files matched: {}", pattern);
            }
        }
        files.extend(matches);
    }
    // Sort for deterministic output
    files.sort();
    files.dedup();
    Ok(files)
}

/// Output file name (without extension) for an input path.
/// "scripts/player.gd" → "player", "docs/api.rst" → "api"
fn derive_output_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string())
}
