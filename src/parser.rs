// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Loading CV Records from JSON or from a rendered resume page.
//!
//! A CV Record is a loosely-typed tree: every field is optional and may hold
//! the wrong kind of value. Rather than deserializing into rigid structs,
//! the record keeps the parsed [`serde_json::Value`] and exposes
//! path-based accessors that return `None` for anything missing.
//!
//! Records reach the converter in two shapes:
//! - a plain JSON document, as produced by converting `data.yml`
//! - an HTML resume page that embeds the same JSON in an element with
//!   `id="cv-data"` (usually a `<script type="application/json">` block)
//!
//! [`load_record`] accepts either.
//!
//! # Example
//!
//! ```
//! use cv2md::parser::parse_record;
//!
//! let record = parse_record(r#"{ "sidebar": { "name": "Jane Doe" } }"#).unwrap();
//! assert_eq!(record.name(), "Jane Doe");
//! ```

use crate::text::value_text;
use scraper::{Html, Selector};
use serde_json::Value;
use snafu::prelude::*;

/// The `id` of the page element holding the embedded CV Record.
pub const DATA_NODE_ID: &str = "cv-data";

/// Error type for CV Record loading failures.
#[derive(Debug, Snafu)]
pub enum ParseError {
    /// Failed to parse JSON content.
    #[snafu(display("failed to parse CV data: {source}"))]
    Json {
        /// The underlying JSON parsing error.
        source: serde_json::Error,
    },

    /// The JSON document is not an object.
    #[snafu(display("CV data must be a JSON object"))]
    NotAnObject,

    /// The HTML page has no embedded CV data element.
    #[snafu(display("no element with id \"cv-data\" found in page"))]
    MissingDataNode,
}

/// A parsed CV Record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CvRecord {
    root: Value,
}

impl CvRecord {
    /// Wraps an already-parsed JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::NotAnObject`] if `root` is not a JSON object.
    pub fn from_value(root: Value) -> Result<Self, ParseError> {
        ensure!(root.is_object(), NotAnObjectSnafu);
        Ok(Self { root })
    }

    /// Returns the value at `path`, or `None` if any step is missing.
    #[must_use]
    pub fn get(&self, path: &[&str]) -> Option<&Value> {
        get_path(&self.root, path)
    }

    /// Returns the sidebar record, if present.
    #[must_use]
    pub fn sidebar(&self) -> Option<&Value> {
        self.get(&["sidebar"])
    }

    /// Returns the subject's normalized name, or an empty string.
    #[must_use]
    pub fn name(&self) -> String {
        value_text(self.get(&["sidebar", "name"]))
    }
}

/// Navigates a JSON path and returns the value at the end.
///
/// # Arguments
///
/// * `value` - The root JSON value to navigate from
/// * `path` - A sequence of object keys to follow
#[must_use]
pub fn get_path<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut current = value;
    for key in path {
        current = current.get(*key)?;
    }
    Some(current)
}

/// Parses a JSON string into a [`CvRecord`].
///
/// # Errors
///
/// Returns an error if the JSON is malformed or its top level is not an
/// object (`null` included).
pub fn parse_record(json_str: &str) -> Result<CvRecord, ParseError> {
    let root: Value = serde_json::from_str(json_str).context(JsonSnafu)?;
    CvRecord::from_value(root)
}

/// Returns the text content of the element with `id="cv-data"` in `html`.
///
/// The page is parsed as a browser would parse it, so the element may be a
/// `<script>` whose body contains markup, or any other element whose
/// character references are decoded. Returns `None` if no such element
/// exists.
///
/// # Example
///
/// ```
/// use cv2md::parser::extract_embedded;
///
/// let html = r#"<script id="cv-data" type="application/json">{"a":"<b>1</b>"}</script>"#;
/// assert_eq!(extract_embedded(html).as_deref(), Some(r#"{"a":"<b>1</b>"}"#));
/// ```
#[must_use]
pub fn extract_embedded(html: &str) -> Option<String> {
    let selector = Selector::parse(&format!("#{DATA_NODE_ID}")).ok()?;
    let document = Html::parse_document(html);
    let node = document.select(&selector).next()?;
    Some(node.text().collect())
}

/// Returns `true` if `source` looks like an HTML page rather than JSON.
fn looks_like_html(source: &str) -> bool {
    source.trim_start().starts_with('<')
}

/// Loads a CV Record from raw JSON or from an HTML page embedding it.
///
/// # Errors
///
/// Returns [`ParseError::MissingDataNode`] if an HTML page has no embedded
/// CV data, and the errors of [`parse_record`] otherwise.
pub fn load_record(source: &str) -> Result<CvRecord, ParseError> {
    if looks_like_html(source) {
        let embedded = extract_embedded(source).context(MissingDataNodeSnafu)?;
        tracing::debug!(bytes = embedded.len(), "found embedded CV data");
        parse_record(&embedded)
    } else {
        parse_record(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_record() {
        let record = parse_record(r#"{"sidebar": {"name": "  Jane &amp; John "}}"#).unwrap();
        assert_eq!(record.name(), "Jane & John");
    }

    #[test]
    fn name_is_empty_without_sidebar() {
        let record = parse_record("{}").unwrap();
        assert_eq!(record.name(), "");
        assert!(record.sidebar().is_none());
    }

    #[test]
    fn navigates_nested_paths() {
        let record =
            parse_record(r#"{"experiences": {"info": [{"role": "Eng"}]}}"#).unwrap();

        assert!(record.get(&["experiences", "info"]).unwrap().is_array());
        assert!(record.get(&["experiences", "missing"]).is_none());
        assert!(record.get(&["experiences", "info", "role"]).is_none());
    }

    #[test]
    fn rejects_non_object_documents() {
        assert!(matches!(parse_record("null"), Err(ParseError::NotAnObject)));
        assert!(matches!(parse_record("[1, 2]"), Err(ParseError::NotAnObject)));
        assert!(matches!(parse_record("\"cv\""), Err(ParseError::NotAnObject)));
    }

    #[test]
    fn returns_error_for_invalid_json() {
        assert!(matches!(
            parse_record("not valid json"),
            Err(ParseError::Json { .. })
        ));
    }

    #[test]
    fn extracts_embedded_data_with_any_attribute_syntax() {
        let double = r#"<body><script type="application/json" id="cv-data">{"x": 1}</script></body>"#;
        let single = r"<div id='cv-data' hidden>{}</div>";
        let spaced = r"<div id = cv-data>[]</div>";

        assert_eq!(extract_embedded(double).as_deref(), Some(r#"{"x": 1}"#));
        assert_eq!(extract_embedded(single).as_deref(), Some("{}"));
        assert_eq!(extract_embedded(spaced).as_deref(), Some("[]"));
    }

    #[test]
    fn extract_returns_none_without_node() {
        assert_eq!(extract_embedded("<html><body></body></html>"), None);
        assert_eq!(extract_embedded(r#"<div class="cv-data">{}</div>"#), None);
    }

    #[test]
    fn script_body_keeps_markup() {
        let page = r#"<script id="cv-data" type="application/json">{"sidebar":{"name":"Jane","tagline":"<b>Eng</b> &amp; <i>Ops</i>"}}</script>"#;

        let record = load_record(page).unwrap();
        assert_eq!(record.name(), "Jane");
        assert_eq!(
            record.get(&["sidebar", "tagline"]),
            Some(&Value::from("<b>Eng</b> &amp; <i>Ops</i>"))
        );
    }

    #[test]
    fn element_text_is_decoded() {
        let page = r#"<div id="cv-data" hidden>{&quot;sidebar&quot;:{&quot;name&quot;:&quot;Jo&quot;}}</div>"#;
        assert_eq!(load_record(page).unwrap().name(), "Jo");
    }

    #[test]
    fn ignores_other_attributes_mentioning_the_id() {
        let page = r##"<html><body>
            <div data-id="cv-data">x</div>
            <a href="#cv-data">data</a>
            <script id="cv-data" type="application/json">{"sidebar": {"name": "Jane"}}</script>
            </body></html>"##;

        assert_eq!(load_record(page).unwrap().name(), "Jane");
    }

    #[test]
    fn loads_record_from_page() {
        let page = r#"<!DOCTYPE html>
            <html><head>
            <script id="cv-data" type="application/json">
              {"sidebar": {"name": "Jane"}}
            </script>
            </head></html>"#;

        let record = load_record(page).unwrap();
        assert_eq!(record.name(), "Jane");
    }

    #[test]
    fn load_fails_for_page_without_data() {
        let result = load_record("<html><body>No data</body></html>");
        assert!(matches!(result, Err(ParseError::MissingDataNode)));
    }

    #[test]
    fn load_fails_for_malformed_embedded_data() {
        let result = load_record(r#"<script id="cv-data">{oops</script>"#);
        assert!(matches!(result, Err(ParseError::Json { .. })));
    }

    #[test]
    fn loads_plain_json() {
        let record = load_record("  {\"sidebar\": {\"name\": \"Jo\"}}").unwrap();
        assert_eq!(record.name(), "Jo");
    }
}
