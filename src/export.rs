// SPDX-License-Identifier: GPL-3.0-only

//! Export packaging: filenames, Markdown files and PDF job options.
//!
//! The Markdown export is self-contained: [`export_markdown`] loads a record,
//! renders it and names the result, and [`write_markdown`] saves it.
//!
//! PDF output is produced by an external HTML-to-PDF renderer working from
//! the print layout of the resume page. This module only describes that job
//! ([`PdfOptions`]) so the embedding page can hand it to the renderer.

use crate::parser::{self, CvRecord, ParseError};
use crate::renderer;
use crate::text::{normalize_text, raw_text};
use serde::Serialize;
use snafu::prelude::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// MIME type of the Markdown export.
pub const MIME_TYPE: &str = "text/markdown;charset=utf-8";

/// Filename used when the record has no usable name.
pub const DEFAULT_FILENAME: &str = "resume.md";

const MARKDOWN_SUFFIX: &str = "_Resume.md";
const PDF_SUFFIX: &str = "_Resume.pdf";
const DEFAULT_PDF_FILENAME: &str = "resume.pdf";

/// Error type for export failures.
#[derive(Debug, Snafu)]
pub enum ExportError {
    /// The CV data could not be loaded.
    #[snafu(display("no usable CV data: {source}"))]
    Parse {
        /// The underlying loading error.
        source: ParseError,
    },

    /// The output directory could not be created.
    #[snafu(display("failed to create {}: {source}", path.display()))]
    CreateDir {
        /// The directory that could not be created.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The export file could not be written.
    #[snafu(display("failed to write {}: {source}", path.display()))]
    Write {
        /// The file that could not be written.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Another input of the same run already targets this file.
    #[snafu(display(
        "{} was already written from {} in this run",
        path.display(),
        first.display()
    ))]
    DuplicateOutput {
        /// The contested output file.
        path: PathBuf,
        /// The input that claimed the file first.
        first: PathBuf,
    },
}

/// Replaces every run of whitespace with a single `_`.
fn underscore_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join("_")
}

/// Derives the Markdown export filename from a subject's name as stored in
/// the record.
///
/// The name is normalized, then whitespace runs become `_` and any character
/// other than ASCII letters, digits, `_`, `.` and `-` is replaced by `_`.
///
/// # Example
///
/// ```
/// use cv2md::export::markdown_filename;
///
/// assert_eq!(markdown_filename("Jane  O'Brien"), "Jane_O_Brien_Resume.md");
/// assert_eq!(markdown_filename(""), "resume.md");
/// ```
#[must_use]
pub fn markdown_filename(name: &str) -> String {
    let safe: String = underscore_whitespace(&normalize_text(name))
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if safe.is_empty() {
        DEFAULT_FILENAME.to_owned()
    } else {
        format!("{safe}{MARKDOWN_SUFFIX}")
    }
}

/// Derives the PDF export filename from a subject's displayed name.
///
/// `name` is already normalized text. Only whitespace is replaced; other
/// characters are left for the renderer's save dialog to deal with.
#[must_use]
pub fn pdf_filename(name: &str) -> String {
    let safe = underscore_whitespace(name);
    if safe.is_empty() {
        DEFAULT_PDF_FILENAME.to_owned()
    } else {
        format!("{safe}{PDF_SUFFIX}")
    }
}

/// A rendered Markdown resume ready to be saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkdownExport {
    /// Suggested filename, see [`markdown_filename`].
    pub filename: String,
    /// The Markdown document.
    pub content: String,
}

impl MarkdownExport {
    /// Renders `record` and names the result after its subject.
    #[must_use]
    pub fn from_record(record: &CvRecord) -> Self {
        Self {
            filename: markdown_filename(&raw_text(record.get(&["sidebar", "name"]))),
            content: renderer::render_resume(record),
        }
    }
}

/// Loads a CV Record from `source` (JSON or an HTML page) and renders it.
///
/// # Errors
///
/// Returns [`ExportError::Parse`] if no record can be loaded. Nothing is
/// rendered in that case.
pub fn export_markdown(source: &str) -> Result<MarkdownExport, ExportError> {
    let record = parser::load_record(source).context(ParseSnafu)?;
    Ok(MarkdownExport::from_record(&record))
}

/// Result of [`write_markdown`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The file was written to this path.
    Written(PathBuf),
    /// A file already existed at this path and was left untouched.
    Skipped(PathBuf),
}

/// Saves `export` into `dir` under its filename.
///
/// The directory is created if needed. An existing file is only replaced
/// when `overwrite` is set.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or the file cannot
/// be written.
pub fn write_markdown(
    export: &MarkdownExport,
    dir: &Path,
    overwrite: bool,
) -> Result<WriteOutcome, ExportError> {
    let path = dir.join(&export.filename);
    if path.exists() && !overwrite {
        return Ok(WriteOutcome::Skipped(path));
    }

    std::fs::create_dir_all(dir).context(CreateDirSnafu { path: dir })?;
    std::fs::write(&path, &export.content).context(WriteSnafu { path: &path })?;
    Ok(WriteOutcome::Written(path))
}

/// Output files claimed so far in one run, keyed by path.
///
/// Two inputs for the same subject derive the same filename; the second must
/// neither be skipped as "already exists" nor silently replace the first.
#[derive(Debug, Default)]
pub struct OutputClaims {
    claimed: HashMap<PathBuf, PathBuf>,
}

impl OutputClaims {
    /// Records that `input` will be exported to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::DuplicateOutput`] if a different input already
    /// claimed `path`.
    pub fn claim(&mut self, path: &Path, input: &Path) -> Result<(), ExportError> {
        if let Some(first) = self.claimed.get(path) {
            ensure!(
                first == input,
                DuplicateOutputSnafu {
                    path,
                    first: first.clone()
                }
            );
            return Ok(());
        }
        self.claimed.insert(path.to_path_buf(), input.to_path_buf());
        Ok(())
    }
}

/// Options for the external HTML-to-PDF renderer.
///
/// Serializes to the renderer's option object, e.g.
/// `{"margin":10,"filename":"Jane_Resume.pdf","image":{...},"html2canvas":{...},"jsPDF":{...}}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PdfOptions {
    /// Page margin in [`PageOptions::unit`]s.
    pub margin: u32,
    /// Name of the saved PDF.
    pub filename: String,
    /// Encoding of rasterized page images.
    pub image: ImageOptions,
    /// Rasterization settings.
    #[serde(rename = "html2canvas")]
    pub raster: RasterOptions,
    /// Page geometry.
    #[serde(rename = "jsPDF")]
    pub page: PageOptions,
}

/// Encoding of rasterized page images.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageOptions {
    /// Image format.
    #[serde(rename = "type")]
    pub format: ImageFormat,
    /// Lossy compression quality between 0 and 1.
    pub quality: f64,
}

/// Image formats for rasterized pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// Lossy JPEG, sized by [`ImageOptions::quality`].
    Jpeg,
}

/// Rasterization settings.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RasterOptions {
    /// Device pixel ratio used when rasterizing.
    pub scale: f64,
    /// Load cross-origin images with CORS.
    #[serde(rename = "useCORS")]
    pub use_cors: bool,
    /// Render text letter by letter for accurate spacing.
    pub letter_rendering: bool,
}

/// Page geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageOptions {
    /// Length unit for margins.
    pub unit: Unit,
    /// Paper size.
    pub format: PaperFormat,
    /// Page orientation.
    pub orientation: Orientation,
}

/// Length units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    /// Millimetres.
    Mm,
}

/// Paper sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PaperFormat {
    /// ISO A4, 210 x 297 mm.
    A4,
}

/// Page orientations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Taller than wide.
    Portrait,
}

impl Default for PdfOptions {
    fn default() -> Self {
        Self {
            margin: 10,
            filename: DEFAULT_PDF_FILENAME.to_owned(),
            image: ImageOptions {
                format: ImageFormat::Jpeg,
                quality: 0.98,
            },
            raster: RasterOptions {
                scale: 2.0,
                use_cors: true,
                letter_rendering: true,
            },
            page: PageOptions {
                unit: Unit::Mm,
                format: PaperFormat::A4,
                orientation: Orientation::Portrait,
            },
        }
    }
}

impl PdfOptions {
    /// Default options with the filename derived from the record's subject.
    #[must_use]
    pub fn for_record(record: &CvRecord) -> Self {
        Self {
            filename: pdf_filename(&record.name()),
            ..Self::default()
        }
    }
}
