// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Command-line interface for cv2md.
//!
//! This binary provides the `cv2md` command for converting CV Records, as
//! JSON files or as resume pages embedding them, to Markdown resumes.

use cv2md::export::{self, MarkdownExport, OutputClaims, PdfOptions, WriteOutcome};
use cv2md::parser;
use lexopt::prelude::*;
use snafu::{ensure, prelude::*};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

/// File extensions picked up when walking input directories.
const INPUT_EXTENSIONS: [&str; 3] = ["json", "html", "htm"];

/// Where to write the rendered output.
#[derive(Clone)]
enum OutputTarget {
    /// Write each resume into the specified directory.
    Directory(PathBuf),
    /// Write to stdout.
    Stdout,
}

struct Cli {
    input: Vec<PathBuf>,
    output: OutputTarget,
    pdf_options: bool,
    quiet: bool,
    dry_run: bool,
    force: bool,
}

#[derive(Debug, Snafu)]
enum Error {
    #[snafu(display("failed to parse arguments: {source}"))]
    ParseArgs { source: lexopt::Error },

    #[snafu(display("at least one input file or directory is required"))]
    NoInputFiles,

    #[snafu(display("cannot output multiple resumes to stdout"))]
    MultipleFilesToStdout,

    #[snafu(display("failed to read {}: {source}", path.display()))]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("failed to export {}: {source}", path.display()))]
    ExportFile {
        path: PathBuf,
        source: export::ExportError,
    },

    #[snafu(display("failed to load {}: {source}", path.display()))]
    LoadFile {
        path: PathBuf,
        source: parser::ParseError,
    },

    #[snafu(display("failed to serialize PDF options: {source}"))]
    SerializeOptions { source: serde_json::Error },

    #[snafu(display("{count} of {total} inputs could not be exported"))]
    ExportsFailed { count: usize, total: usize },
}

fn print_help() {
    println!(
        "\
{name} {version}
Convert resume/CV data to Markdown

Usage: {name} [OPTIONS] <INPUT>...

Arguments:
  <INPUT>...  CV data as JSON files, resume pages embedding it, or directories

Options:
  -o, --output <OUTPUT>  Output directory (default: .), or - for stdout
      --pdf-options      Print PDF renderer options as JSON instead of Markdown

Other options:
  -q, --quiet            Suppress progress messages
  -n, --dry-run          Show what would be written without writing
  -f, --force            Overwrite existing output files
  -h, --help             Print help
  -V, --version          Print version

Set RUST_LOG (e.g. RUST_LOG=debug) for diagnostic logging.",
        name = env!("CARGO_PKG_NAME"),
        version = env!("CARGO_PKG_VERSION"),
    );
}

fn parse_args() -> Result<Cli, lexopt::Error> {
    // Show help if no arguments provided
    if std::env::args().len() == 1 {
        print_help();
        std::process::exit(0);
    }

    let mut input = Vec::new();
    let mut output = OutputTarget::Directory(PathBuf::from("."));
    let mut pdf_options = false;
    let mut quiet = false;
    let mut dry_run = false;
    let mut force = false;

    let mut parser = lexopt::Parser::from_env();
    while let Some(arg) = parser.next()? {
        match arg {
            Short('o') | Long("output") => {
                let val: PathBuf = parser.value()?.parse()?;
                output = if val == Path::new("-") {
                    OutputTarget::Stdout
                } else {
                    OutputTarget::Directory(val)
                };
            }
            Long("pdf-options") => pdf_options = true,
            Short('q') | Long("quiet") => quiet = true,
            Short('n') | Long("dry-run") => dry_run = true,
            Short('f') | Long("force") => force = true,
            Short('h') | Long("help") => {
                print_help();
                std::process::exit(0);
            }
            Short('V') | Long("version") => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            Value(val) => input.push(val.parse()?),
            _ => return Err(arg.unexpected()),
        }
    }

    Ok(Cli {
        input,
        output,
        pdf_options,
        quiet,
        dry_run,
        force,
    })
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<(), Error> {
    init_logging();
    let cli = parse_args().context(ParseArgsSnafu)?;

    ensure!(!cli.input.is_empty(), NoInputFilesSnafu);

    let files = collect_input_files(&cli.input);
    tracing::debug!(count = files.len(), "collected input files");

    if cli.pdf_options {
        return process_all(&files, |file| print_pdf_options(file, &cli));
    }

    match &cli.output {
        OutputTarget::Stdout => {
            ensure!(files.len() == 1, MultipleFilesToStdoutSnafu);
            process_to_stdout(&files[0], &cli)
        }
        OutputTarget::Directory(dir) => {
            let mut claims = OutputClaims::default();
            process_all(&files, |file| process_file(file, dir, &mut claims, &cli))
        }
    }
}

/// Runs `process` on every file. A bad input is logged and does not stop
/// the remaining ones; the run fails at the end if any input failed.
fn process_all(
    files: &[PathBuf],
    mut process: impl FnMut(&Path) -> Result<(), Error>,
) -> Result<(), Error> {
    let mut failed = 0_usize;
    for file in files {
        if let Err(err) = process(file) {
            tracing::error!("{err}");
            failed += 1;
        }
    }
    ensure!(
        failed == 0,
        ExportsFailedSnafu {
            count: failed,
            total: files.len()
        }
    );
    Ok(())
}

/// Collects all CV data files from the given inputs (files and directories).
fn collect_input_files(inputs: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            for entry in WalkDir::new(input)
                .sort_by_file_name()
                .into_iter()
                .filter_map(Result::ok)
                .filter(|e| {
                    e.path()
                        .extension()
                        .and_then(|ext| ext.to_str())
                        .is_some_and(|ext| INPUT_EXTENSIONS.contains(&ext))
                })
            {
                files.push(entry.path().to_path_buf());
            }
        } else {
            files.push(input.clone());
        }
    }
    files
}

/// Reads and renders a single input.
fn load_export(input: &Path) -> Result<MarkdownExport, Error> {
    let source = std::fs::read_to_string(input).context(ReadFileSnafu { path: input })?;
    let rendered = export::export_markdown(&source).context(ExportFileSnafu { path: input })?;
    tracing::debug!(
        input = %input.display(),
        filename = %rendered.filename,
        mime = export::MIME_TYPE,
        bytes = rendered.content.len(),
        "rendered resume"
    );
    Ok(rendered)
}

/// Prints the PDF renderer options for a single input as one JSON line.
fn print_pdf_options(input: &Path, cli: &Cli) -> Result<(), Error> {
    let source = std::fs::read_to_string(input).context(ReadFileSnafu { path: input })?;
    let record = parser::load_record(&source).context(LoadFileSnafu { path: input })?;
    let options = PdfOptions::for_record(&record);

    if cli.dry_run {
        eprintln!("Would print PDF options for {}", input.display());
        return Ok(());
    }

    let json = serde_json::to_string(&options).context(SerializeOptionsSnafu)?;
    println!("{json}");
    Ok(())
}

/// Renders a single input and prints it to stdout.
fn process_to_stdout(input: &Path, cli: &Cli) -> Result<(), Error> {
    if cli.dry_run {
        eprintln!("Would output {}", input.display());
        return Ok(());
    }

    let rendered = load_export(input)?;
    print!("{}", rendered.content);
    Ok(())
}

/// Renders a single input and writes it to the output directory.
fn process_file(
    input: &Path,
    out_dir: &Path,
    claims: &mut OutputClaims,
    cli: &Cli,
) -> Result<(), Error> {
    let rendered = load_export(input)?;
    let target = out_dir.join(&rendered.filename);
    claims
        .claim(&target, input)
        .context(ExportFileSnafu { path: input })?;

    if cli.dry_run {
        eprintln!("Would write {}", target.display());
        return Ok(());
    }

    match export::write_markdown(&rendered, out_dir, cli.force)
        .context(ExportFileSnafu { path: input })?
    {
        WriteOutcome::Written(path) => {
            if !cli.quiet {
                eprintln!("Wrote {}", path.display());
            }
        }
        WriteOutcome::Skipped(path) => {
            tracing::debug!(path = %path.display(), "output exists, skipping");
            if !cli.quiet {
                eprintln!(
                    "Skipping {} (already exists, use --force to overwrite)",
                    path.display()
                );
            }
        }
    }
    Ok(())
}
