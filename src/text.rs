// SPDX-License-Identifier: GPL-3.0-only

//! Text normalization for free-text CV fields.
//!
//! Resume data is typically authored in YAML or HTML templates and often
//! carries escaped markup (`R&amp;D`, `&#8211;`). Every string that ends up
//! in the Markdown output goes through [`normalize_text`] first, which
//! resolves those character references and trims surrounding whitespace.
//!
//! Fields are read from a loosely typed [`serde_json::Value`] tree, so the
//! helpers here also define how a non-string value is turned into text
//! ([`value_text`]) and whether it counts as "present" ([`is_truthy`]).

use quick_xml::escape::{resolve_html5_entity, unescape_with};
use serde_json::{Number, Value};
use std::borrow::Cow;

/// Resolves HTML character references in `text` to the characters they name.
///
/// Both named references from the HTML5 table (`&amp;`, `&eacute;`) and
/// numeric references (`&#38;`, `&#x26;`) are decoded. An `&` that does not
/// begin a known, `;`-terminated reference is kept as-is.
///
/// # Example
///
/// ```
/// use cv2md::text::decode_entities;
///
/// assert_eq!(decode_entities("R&amp;D &#8211; AT&T"), "R&D \u{2013} AT&T");
/// ```
#[must_use]
pub fn decode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];

        let decoded = reference_len(tail)
            .and_then(|len| decode_reference(&tail[..len]).map(|value| (len, value)));
        match decoded {
            Some((len, value)) => {
                out.push_str(&value);
                rest = &tail[len..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

/// Returns the byte length of the `&...;` reference at the start of `tail`.
fn reference_len(tail: &str) -> Option<usize> {
    let body = tail.strip_prefix('&')?;
    let end = body.find(|c: char| !(c.is_ascii_alphanumeric() || c == '#'))?;
    (end > 0 && body[end..].starts_with(';')).then_some(end + 2)
}

fn decode_reference(reference: &str) -> Option<String> {
    unescape_with(reference, resolve_html5_entity)
        .ok()
        .map(Cow::into_owned)
}

/// Decodes character references and trims surrounding whitespace.
#[must_use]
pub fn normalize_text(text: &str) -> String {
    decode_entities(text).trim().to_owned()
}

/// Converts a JSON field into text without decoding or trimming it.
///
/// Strings are used as-is, numbers use their shortest decimal form and
/// `true` becomes `"true"`. Absent fields, `null`, `false`, zero, arrays and
/// objects all become the empty string, so a malformed field behaves like a
/// missing one.
///
/// Callers hand the result to exactly one of [`normalize_text`],
/// [`split_lines`] or [`crate::url::normalize_url`], each of which decodes
/// character references once.
#[must_use]
pub fn raw_text(value: Option<&Value>) -> Cow<'_, str> {
    match value {
        Some(Value::String(s)) => Cow::Borrowed(s),
        Some(Value::Number(n)) if is_truthy(value) => Cow::Owned(number_text(n)),
        Some(Value::Bool(true)) => Cow::Borrowed("true"),
        _ => Cow::Borrowed(""),
    }
}

/// Formats a number the way a browser prints it: integral floats lose their
/// fraction (`2.0` is `2`) and exponents carry a sign (`1e+21`).
#[allow(clippy::float_cmp)]
fn number_text(number: &Number) -> String {
    if let Some(f) = number.as_f64().filter(|_| number.is_f64())
        && f.fract() == 0.0
        && f.abs() < 1e21
    {
        return format!("{f:.0}");
    }

    let text = number.to_string();
    if text.contains("e-") {
        text
    } else {
        text.replacen('e', "e+", 1)
    }
}

/// Converts a JSON field into normalized text.
///
/// See [`raw_text`] for how non-string values are coerced.
#[must_use]
pub fn value_text(value: Option<&Value>) -> String {
    normalize_text(&raw_text(value))
}

/// Splits a multi-line field into trimmed, non-empty lines.
///
/// CRLF line endings are treated the same as LF.
///
/// # Example
///
/// ```
/// use cv2md::text::split_lines;
///
/// let lines = split_lines("- Shipped X\r\n\n   - Led Y  ");
/// assert_eq!(lines, ["- Shipped X", "- Led Y"]);
/// ```
#[must_use]
pub fn split_lines(text: &str) -> Vec<String> {
    normalize_text(text)
        .replace("\r\n", "\n")
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Like [`split_lines`] but reads the text from a JSON field.
#[must_use]
pub fn value_lines(value: Option<&Value>) -> Vec<String> {
    split_lines(&raw_text(value))
}

/// Returns whether a JSON field counts as set.
///
/// Absent fields, `null`, `false`, zero and the empty string are unset;
/// anything else (including empty arrays and objects) is set.
#[must_use]
pub fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        #[allow(clippy::float_cmp)]
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_) | Value::Object(_)) => true,
    }
}
