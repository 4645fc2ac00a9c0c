//! protoc-gen-docs: render JSON descriptor documents to HTML.
//!
//! `protoc-gen-docs -o docs/api descriptors/*.json`

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

use protoc_gen_docs::{loader, Generator, Options, OutputMode};

#[derive(Parser)]
#[command(
    name = "protoc-gen-docs",
    about = "Generate cross-linked HTML documentation from protobuf descriptors"
)]
struct Cli {
    /// Descriptor documents (JSON). Files, directories and glob patterns.
    #[arg(required = true)]
    descriptors: Vec<String>,

    /// Output directory
    #[arg(short = 'o', long)]
    output: PathBuf,

    /// Output mode: page (default), fragment, fragment-with-front-matter
    #[arg(short = 'm', long, default_value = "page")]
    mode: String,

    /// Do not print warnings
    #[arg(long)]
    no_warnings: bool,

    /// Fail when any warning was produced
    #[arg(long)]
    warnings_as_errors: bool,

    /// Leave pass-through front matter lines out of the YAML block
    #[arg(long)]
    no_front_matter_extras: bool,

    /// Display field names in camelCase
    #[arg(long)]
    camel_case_fields: bool,

    /// Link this stylesheet instead of embedding the default style
    #[arg(long, value_name = "URL")]
    stylesheet: Option<String>,

    /// Take the document header from each file rather than the package
    #[arg(long)]
    per_file: bool,

    /// Hunspell .dic file (its .aff must sit next to it) or plain word
    /// list; enables spell checking.
    /// Can be specified multiple times.
    #[arg(long, value_name = "FILE")]
    dictionary: Vec<PathBuf>,

    /// protoc-style parameter string, e.g. 'mode=html_fragment,warnings=false'.
    /// Applied after the flags above.
    #[arg(long, value_name = "STRING")]
    param: Option<String>,

    /// More logging (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let options = options_from(&cli)?;

    let inputs = expand_globs(&cli.descriptors)?;
    if inputs.is_empty() {
        anyhow::bail!("no descriptor files found");
    }

    let mut sets = Vec::with_capacity(inputs.len());
    for path in &inputs {
        let set = loader::read_descriptor_set(path)
            .with_context(|| format!("failed to load {}", path.display()))?;
        sets.push(set);
    }
    let model = loader::build(sets).context("failed to build descriptor model")?;

    let mut generator = Generator::new(&model, options.clone());

    let result = generator.run();
    if options.warnings {
        for warning in generator.diagnostics().warnings() {
            eprintln!("{}", warning);
        }
    }
    let files = result?;

    for file in &files {
        let path = cli.output.join(&file.name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory: {}", parent.display()))?;
        }
        fs::write(&path, &file.content)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), "wrote document");
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn options_from(cli: &Cli) -> Result<Options> {
    let mut options = Options {
        mode: OutputMode::from_name(&cli.mode)?,
        warnings: !cli.no_warnings,
        warnings_as_errors: cli.warnings_as_errors,
        front_matter_extras: !cli.no_front_matter_extras,
        camel_case_fields: cli.camel_case_fields,
        stylesheet: cli.stylesheet.clone(),
        per_file: cli.per_file,
        dictionaries: cli.dictionary.clone(),
    };
    if let Some(param) = &cli.param {
        options
            .apply_parameter(param)
            .with_context(|| format!("invalid --param: {}", param))?;
    }
    Ok(options)
}

/// Expand glob patterns into a list of descriptor files.
/// Bare directories are scanned (non-recursively) for `*.json`.
fn expand_globs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in patterns {
        let path = Path::new(pattern);
        if path.is_file() {
            files.push(path.to_path_buf());
            continue;
        }
        if path.is_dir() {
            let entries = fs::read_dir(path)
                .with_context(|| format!("failed to read directory: {}", path.display()))?;
            for entry in entries.flatten() {
                let p = entry.path();
                if p.is_file() && p.extension().and_then(|e| e.to_str()) == Some("json") {
                    files.push(p);
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
            eprintln!("warning: no files matched: {}", pattern);
        }
        files.extend(matches);
    }
    files.sort();
    files.dedup();
    Ok(files)
}
