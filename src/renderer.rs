// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Markdown rendering for CV Records.
//!
//! This module transforms a [`CvRecord`] into a Markdown resume. The layout
//! is fixed: a title block, a Contact section, the career profile, then one
//! section per itemized block of the record in a fixed order.
//!
//! # Output Format
//!
//! ```text
//! # Jane Doe
//! Staff Engineer
//!
//! ## Contact
//! - jane@example.com
//! - https://github.com/jane
//!
//! ## Experiences
//! - Engineer | Acme | 2020 - 2022
//!   - Shipped the thing
//! ```
//!
//! Sections are only emitted when they have content, and missing titles fall
//! back to a default. The document never contains two consecutive blank
//! lines and always ends with a single newline.
//!
//! # Example
//!
//! ```
//! use cv2md::parser::parse_record;
//! use cv2md::renderer::render_resume;
//!
//! let record = parse_record(r#"{
//!     "sidebar": { "name": "Jane Doe", "github": "jane" },
//!     "skills": { "toolset": [{ "name": "Rust", "level": "90%" }] }
//! }"#).unwrap();
//!
//! let markdown = render_resume(&record);
//! assert!(markdown.starts_with("# Jane Doe\n"));
//! assert!(markdown.contains("- https://github.com/jane"));
//! assert!(markdown.contains("## Skills\n- Rust | 90%\n"));
//! ```

use crate::parser::CvRecord;
use crate::text::{is_truthy, value_lines, value_text};
use crate::url::{contact_urls, value_url};
use serde_json::Value;

/// Title used when the record has no name.
pub const DEFAULT_TITLE: &str = "Resume";

/// Sidebar fields listed verbatim in the Contact section, in order.
const CONTACT_FIELDS: [&str; 4] = ["email", "phone", "timezone", "citizenship"];

/// Describes how one itemized section of the record is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionLayout {
    /// Path from the record root to the section object.
    pub path: &'static [&'static str],
    /// Key of the item array inside the section object.
    pub list_key: &'static str,
    /// Heading used when the section has no `title`.
    pub fallback_title: &'static str,
    /// Item fields joined into the headline, in order.
    pub headline: &'static [&'static str],
    /// Whether items carry a multi-line `details` field.
    pub details: bool,
    /// Item field holding a link, if any.
    pub link: Option<&'static str>,
}

/// The itemized sections, in output order.
pub const SECTIONS: [SectionLayout; 10] = [
    SectionLayout {
        path: &["experiences"],
        list_key: "info",
        fallback_title: "Experiences",
        headline: &["role", "company", "time"],
        details: true,
        link: None,
    },
    SectionLayout {
        path: &["education"],
        list_key: "info",
        fallback_title: "Education",
        headline: &["degree", "university", "time"],
        details: true,
        link: None,
    },
    SectionLayout {
        path: &["certifications"],
        list_key: "list",
        fallback_title: "Certifications",
        headline: &["name", "organization", "start", "end"],
        details: false,
        link: Some("credentialurl"),
    },
    SectionLayout {
        path: &["projects"],
        list_key: "assignments",
        fallback_title: "Projects",
        headline: &["title", "tagline"],
        details: false,
        link: Some("link"),
    },
    SectionLayout {
        path: &["oss"],
        list_key: "contributions",
        fallback_title: "OSS Contributions",
        headline: &["title", "tagline"],
        details: false,
        link: Some("link"),
    },
    SectionLayout {
        path: &["publications"],
        list_key: "papers",
        fallback_title: "Publications",
        headline: &["title", "authors", "conference"],
        details: false,
        link: Some("link"),
    },
    SectionLayout {
        path: &["patents"],
        list_key: "items",
        fallback_title: "Patents",
        headline: &["title", "status", "Patent Number", "Registration Date"],
        details: false,
        link: Some("link"),
    },
    SectionLayout {
        path: &["skills"],
        list_key: "toolset",
        fallback_title: "Skills",
        headline: &["name", "level"],
        details: false,
        link: None,
    },
    SectionLayout {
        path: &["sidebar", "languages"],
        list_key: "info",
        fallback_title: "Languages",
        headline: &["idiom", "level"],
        details: false,
        link: None,
    },
    SectionLayout {
        path: &["sidebar", "interests"],
        list_key: "info",
        fallback_title: "Interests",
        headline: &["item"],
        details: false,
        link: Some("link"),
    },
];

/// Renders a CV Record as a Markdown document.
///
/// This is the main entry point for rendering. The function is total: any
/// field that is missing or has an unexpected type is treated as absent.
#[must_use]
pub fn render_resume(record: &CvRecord) -> String {
    let mut lines = Vec::new();
    let empty = Value::Null;
    let sidebar = record.sidebar().unwrap_or(&empty);

    render_title(&mut lines, sidebar);
    render_contact(&mut lines, sidebar);
    render_career_profile(&mut lines, record.get(&["career-profile"]));

    for layout in &SECTIONS {
        render_section(&mut lines, record.get(layout.path), layout);
    }

    finish(lines)
}

/// Strips trailing blank lines and joins with a single trailing newline.
fn finish(mut lines: Vec<String>) -> String {
    while lines.last().is_some_and(String::is_empty) {
        lines.pop();
    }
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn heading(lines: &mut Vec<String>, title: Option<&Value>, fallback: &str) {
    let title = value_text(title);
    let title = if title.is_empty() { fallback } else { &title };
    lines.push(format!("## {title}"));
}

fn render_title(lines: &mut Vec<String>, sidebar: &Value) {
    let name = value_text(sidebar.get("name"));
    let name = if name.is_empty() { DEFAULT_TITLE } else { &name };
    lines.push(format!("# {name}"));

    let tagline = value_text(sidebar.get("tagline"));
    if !tagline.is_empty() {
        lines.push(tagline);
    }
    lines.push(String::new());
}

fn render_contact(lines: &mut Vec<String>, sidebar: &Value) {
    let items: Vec<String> = CONTACT_FIELDS
        .iter()
        .map(|field| value_text(sidebar.get(*field)))
        .filter(|item| !item.is_empty())
        .collect();
    let urls = contact_urls(sidebar);

    if items.is_empty() && urls.is_empty() {
        return;
    }

    heading(lines, None, "Contact");
    for entry in items.into_iter().chain(urls) {
        lines.push(format!("- {entry}"));
    }
    lines.push(String::new());
}

fn render_career_profile(lines: &mut Vec<String>, profile: Option<&Value>) {
    let Some(profile) = profile else {
        return;
    };
    let title = profile.get("title");
    let summary = profile.get("summary");
    if !is_truthy(title) && !is_truthy(summary) {
        return;
    }

    heading(lines, title, "Career Profile");
    lines.extend(value_lines(summary));
    lines.push(String::new());
}

/// Renders one itemized section, or nothing if it has no items.
fn render_section(lines: &mut Vec<String>, section: Option<&Value>, layout: &SectionLayout) {
    let Some(section) = section else {
        return;
    };
    let items = match section.get(layout.list_key) {
        Some(Value::Array(items)) if !items.is_empty() => items,
        _ => return,
    };

    heading(lines, section.get("title"), layout.fallback_title);
    for item in items {
        render_item(lines, item, layout);
    }
    lines.push(String::new());
}

fn render_item(lines: &mut Vec<String>, item: &Value, layout: &SectionLayout) {
    let headline = headline(item, layout.headline);
    if !headline.is_empty() {
        lines.push(format!("- {headline}"));
    }

    if layout.details {
        for line in value_lines(item.get("details")) {
            lines.push(format!("  - {}", strip_bullet(&line)));
        }
    }

    if let Some(key) = layout.link {
        let url = value_url(item.get(key));
        if !url.is_empty() {
            lines.push(format!("  - {url}"));
        }
    }
}

/// Joins the non-empty normalized `fields` of `item` with `" | "`.
fn headline(item: &Value, fields: &[&str]) -> String {
    fields
        .iter()
        .map(|field| value_text(item.get(*field)))
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Removes a leading Markdown-style bullet (`-`, `--`, `- `) from a line.
fn strip_bullet(line: &str) -> &str {
    let stripped = line.trim_start_matches('-');
    if stripped.len() == line.len() {
        line
    } else {
        stripped.trim_start()
    }
}
