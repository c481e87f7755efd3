//! hdrscan: scan documented C headers into a JSON API model.
//!
//! Headers follow a strict convention: every exposed symbol carries a
//! `/** ... */` doc block with `@name`/`@type`/`@param` tags, types are
//! `_t`-suffixed typedefs, and delegates name their parameters. The output
//! is one module per header, consumed by a binding generator.
//!
//! - **scan**: `hdrscan -i 2 include/ta/*.h > api.json`
//! - **self-test**: `hdrscan --run-tests`

mod diagnostics;
mod error;
mod logger;
mod model;
mod parser;
mod render;
mod selftest;

use anyhow::{Context, Result};
use clap::Parser;
use indexmap::IndexSet;
use parser::aggregate::scan_files;
use parser::builder::ScanOptions;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, warn};

#[derive(Parser)]
#[command(
    name = "hdrscan",
    about = "Scan documented C headers into a JSON model for binding generators"
)]
struct Cli {
    /// Header files (glob patterns and directories supported)
    files: Vec<String>,

    /// Output file, defaults to stdout
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Indentation of the JSON output; negative means compact
    #[arg(short = 'i', long, default_value_t = -1, allow_negative_numbers = true)]
    indent: i32,

    /// Run the embedded usage examples instead of scanning
    #[arg(short = 't', long)]
    run_tests: bool,

    /// Library prefix stripped from type keys (e.g. "ta_")
    #[arg(long)]
    lib_prefix: Option<String>,

    /// Debug logging
    #[arg(short = 'v', long)]
    verbose: bool,

    /// Only log errors
    #[arg(short = 'q', long)]
    quiet: bool,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    logger::init_logger(cli.verbose, cli.quiet);

    if cli.run_tests {
        let failed = selftest::run();
        return Ok(if failed == 0 {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        });
    }

    if cli.files.is_empty() {
        anyhow::bail!("no input files given");
    }

    let paths = expand_globs(&cli.files)?;
    let options = ScanOptions {
        lib_prefix: cli.lib_prefix.clone(),
    };

    let batch = scan_files(&paths, &options);
    for item in &batch.diagnostics {
        warn!("{}: {}", item.path.display(), item.diagnostic);
    }
    for (path, e) in &batch.failures {
        error!("skipping {}: {}", path.display(), e);
    }

    let mut json = render::render_json(&batch.modules, cli.indent)?;
    json.push('\n');
    match cli.output {
        Some(ref path) => fs::write(path, &json)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => io::stdout()
            .write_all(json.as_bytes())
            .context("failed to write stdout")?,
    }

    Ok(if batch.failures.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Header extensions picked up when a directory is given.
const SUPPORTED_EXTENSIONS: &[&str] = &["h"];

/// Expand glob patterns into a list of real file paths.
/// Bare directories are scanned (non-recursively) for headers.
fn expand_globs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in patterns {
        let path = Path::new(pattern);
        if path.is_file() {
            files.push(path.to_path_buf());
            continue;
        }
        if path.is_dir() {
            let mut found: Vec<PathBuf> = fs::read_dir(path)
                .with_context(|| format!("failed to read directory: {}", path.display()))?
                .flatten()
                .map(|entry| entry.path())
                .filter(|p| {
                    p.is_file()
                        && p.extension()
                            .and_then(|e| e.to_str())
                            .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext))
                })
                .collect();
            found.sort();
            files.extend(found);
            continue;
        }
        let mut matches: Vec<_> = glob::glob(pattern)
            .with_context(|| format!("invalid glob pattern: {}", pattern))?
            .filter_map(|r| r.ok())
            .filter(|p| p.is_file())
            .collect();
        if matches.is_empty() {
            warn!("no files matched: {}", pattern);
        }
        matches.sort();
        files.extend(matches);
    }
    // Input order decides which module wins a name collision; only exact
    // repeats are dropped.
    let unique: IndexSet<PathBuf> = files.into_iter().collect();
    Ok(unique.into_iter().collect())
}
