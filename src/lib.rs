// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Convert structured resume/CV data to Markdown.
//!
//! This crate turns a CV Record (the JSON data behind a resume website)
//! into a plain Markdown resume with a fixed, predictable layout.
//!
//! # Overview
//!
//! A CV Record is a loosely-typed JSON tree where every field is optional.
//! This crate:
//!
//! 1. Loads the record from JSON or from a resume page that embeds it
//! 2. Normalizes text and links (character references, profile handles)
//! 3. Renders the sections that have content, in a fixed order
//!
//! # Example
//!
//! ```no_run
//! use cv2md::{export, parser, renderer};
//!
//! let json = std::fs::read_to_string("cv.json").unwrap();
//! let record = parser::parse_record(&json).unwrap();
//!
//! let markdown = renderer::render_resume(&record);
//! let rendered = export::MarkdownExport::from_record(&record);
//! assert_eq!(rendered.content, markdown);
//! std::fs::write(rendered.filename, rendered.content).unwrap();
//! ```
//!
//! # Modules
//!
//! - [`parser`]: loading CV Records from JSON or HTML pages
//! - [`text`]: text normalization of free-text fields
//! - [`url`]: link normalization and profile URL templates
//! - [`renderer`]: Markdown generation
//! - [`export`]: filenames, file output and PDF job options

#![deny(missing_docs)]

pub mod export;
pub mod parser;
pub mod renderer;
pub mod text;
pub mod url;
