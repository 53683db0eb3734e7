// SPDX-License-Identifier: GPL-3.0-only

//! URL normalization for links and profile handles.
//!
//! The sidebar of a CV Record stores most social profiles as bare handles
//! (`github: octocat`) and a few as full or partial URLs (`website:
//! example.com`). This module turns both into fully-qualified URLs.
//!
//! Supported services are described by the [`Service`] table. Each entry
//! names the sidebar key it is read from and a [`Template`] describing how
//! the handle becomes a URL.

use crate::text::{is_truthy, normalize_text, raw_text};
use serde_json::Value;

/// Returns `true` if `text` starts with a URI scheme such as `https:` or `mailto:`.
fn has_scheme(text: &str) -> bool {
    let mut chars = text.chars();
    if !chars.next().is_some_and(|c| c.is_ascii_alphabetic()) {
        return false;
    }
    for c in chars {
        match c {
            ':' => return true,
            c if c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.') => {}
            _ => return false,
        }
    }
    false
}

/// Normalizes a link, adding an `https://` scheme when none is present.
///
/// Empty input stays empty. Text that already starts with a scheme is
/// returned unchanged.
///
/// # Example
///
/// ```
/// use cv2md::url::normalize_url;
///
/// assert_eq!(normalize_url("example.com"), "https://example.com");
/// assert_eq!(normalize_url("mailto:me@example.com"), "mailto:me@example.com");
/// assert_eq!(normalize_url("   "), "");
/// ```
#[must_use]
pub fn normalize_url(value: &str) -> String {
    with_scheme(normalize_text(value))
}

/// Adds `https://` to already-normalized text that has no scheme.
fn with_scheme(text: String) -> String {
    if text.is_empty() || has_scheme(&text) {
        text
    } else {
        format!("https://{text}")
    }
}

/// Like [`normalize_url`] but reads the link from a JSON field.
#[must_use]
pub fn value_url(value: Option<&Value>) -> String {
    normalize_url(&raw_text(value))
}

/// How a profile handle becomes a URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Template {
    /// The handle is already a (possibly scheme-less) URL.
    Url,
    /// The handle is placed between a fixed prefix and suffix.
    Path {
        /// Text before the handle.
        prefix: &'static str,
        /// Text after the handle.
        suffix: &'static str,
    },
    /// Like [`Template::Path`], but one leading `@` is dropped from the handle.
    AtHandle {
        /// Text before the handle.
        prefix: &'static str,
    },
}

impl Template {
    const fn path(prefix: &'static str) -> Self {
        Self::Path { prefix, suffix: "" }
    }
}

/// A third-party profile service that can appear in the sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum Service {
    Website,
    LinkedIn,
    Xing,
    GitHub,
    Telegram,
    GitLab,
    Bitbucket,
    Twitter,
    Bluesky,
    Mastodon,
    StackOverflow,
    Codewars,
    HackerRank,
    LeetCode,
    Goodreads,
    Pdf,
}

impl Service {
    /// All services, in the order their links appear in the Contact section.
    pub const ALL: [Self; 16] = [
        Self::Website,
        Self::LinkedIn,
        Self::Xing,
        Self::GitHub,
        Self::Telegram,
        Self::GitLab,
        Self::Bitbucket,
        Self::Twitter,
        Self::Bluesky,
        Self::Mastodon,
        Self::StackOverflow,
        Self::Codewars,
        Self::HackerRank,
        Self::LeetCode,
        Self::Goodreads,
        Self::Pdf,
    ];

    /// The sidebar key holding this service's handle.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Website => "website",
            Self::LinkedIn => "linkedin",
            Self::Xing => "xing",
            Self::GitHub => "github",
            Self::Telegram => "telegram",
            Self::GitLab => "gitlab",
            Self::Bitbucket => "bitbucket",
            Self::Twitter => "twitter",
            Self::Bluesky => "bluesky",
            Self::Mastodon => "mastodon",
            Self::StackOverflow => "stack-overflow",
            Self::Codewars => "codewars",
            Self::HackerRank => "hackerrank",
            Self::LeetCode => "leetcode",
            Self::Goodreads => "goodreads",
            Self::Pdf => "pdf",
        }
    }

    /// The URL template for this service.
    #[must_use]
    pub const fn template(self) -> Template {
        match self {
            Self::Website | Self::Mastodon | Self::Pdf => Template::Url,
            Self::LinkedIn => Template::path("https://linkedin.com/in/"),
            Self::Xing => Template::path("https://www.xing.com/profile/"),
            Self::GitHub => Template::path("https://github.com/"),
            Self::Telegram => Template::path("https://t.me/"),
            Self::GitLab => Template::path("https://gitlab.com/"),
            Self::Bitbucket => Template::path("https://bitbucket.com/"),
            Self::Twitter => Template::path("https://twitter.com/"),
            Self::Bluesky => Template::AtHandle {
                prefix: "https://bsky.app/profile/",
            },
            Self::StackOverflow => Template::path("https://stackoverflow.com/users/"),
            Self::Codewars => Template::Path {
                prefix: "https://www.codewars.com/users/",
                suffix: "/completed_solutions",
            },
            Self::HackerRank => Template::path("https://www.hackerrank.com/profile/"),
            Self::LeetCode => Template::path("https://leetcode.com/u/"),
            Self::Goodreads => Template::path("https://www.goodreads.com/user/show/"),
        }
    }
}

/// Builds the profile URL for `handle` on `service`.
///
/// The handle is normalized first. Templated services always produce a URL,
/// even for an empty handle (`https://github.com/`); [`Template::Url`]
/// services produce an empty string for an empty handle.
///
/// # Example
///
/// ```
/// use cv2md::url::{build_profile_url, Service};
///
/// assert_eq!(
///     build_profile_url(Service::Bluesky, "@alice.bsky.social"),
///     "https://bsky.app/profile/alice.bsky.social",
/// );
/// ```
#[must_use]
pub fn build_profile_url(service: Service, handle: &str) -> String {
    let handle = normalize_text(handle);

    match service.template() {
        Template::Url => with_scheme(handle),
        Template::Path { prefix, suffix } => format!("{prefix}{handle}{suffix}"),
        Template::AtHandle { prefix } => {
            let handle = handle.strip_prefix('@').unwrap_or(&handle);
            format!("{prefix}{handle}")
        }
    }
}

/// Collects the profile URLs present in a sidebar record.
///
/// A service is included when its sidebar field is a set scalar (see
/// [`is_truthy`]), even if the handle normalizes to nothing. Arrays and
/// objects are malformed handles and are skipped. URLs are
/// returned in [`Service::ALL`] order, without duplicates (the first
/// occurrence wins) and without empty entries.
#[must_use]
pub fn contact_urls(sidebar: &Value) -> Vec<String> {
    let mut urls: Vec<String> = Vec::new();

    for service in Service::ALL {
        let field = sidebar.get(service.key());
        if !is_truthy(field) || matches!(field, Some(Value::Array(_) | Value::Object(_))) {
            continue;
        }

        let url = build_profile_url(service, &raw_text(field));
        if !url.is_empty() && !urls.contains(&url) {
            urls.push(url);
        }
    }

    urls
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn prefixes_scheme_less_urls() {
        assert_eq!(normalize_url("example.com"), "https://example.com");
        assert_eq!(normalize_url(" www.example.com/cv "), "https://www.example.com/cv");
        assert_eq!(normalize_url("//cdn.example.com"), "https:////cdn.example.com");
    }

    #[test]
    fn keeps_urls_with_scheme() {
        assert_eq!(normalize_url("http://example.com"), "http://example.com");
        assert_eq!(normalize_url("mailto:a@b.c"), "mailto:a@b.c");
        assert_eq!(normalize_url("git+ssh://host/repo"), "git+ssh://host/repo");
    }

    #[test]
    fn scheme_must_start_with_letter() {
        assert_eq!(normalize_url("1http://x"), "https://1http://x");
        assert_eq!(normalize_url("localhost:8080"), "localhost:8080");
        assert_eq!(normalize_url("my site:80"), "https://my site:80");
    }

    #[test]
    fn empty_url_stays_empty() {
        assert_eq!(normalize_url(""), "");
        assert_eq!(value_url(None), "");
        assert_eq!(value_url(Some(&json!(null))), "");
    }

    #[test]
    fn builds_templated_profile_urls() {
        assert_eq!(
            build_profile_url(Service::GitHub, "octocat"),
            "https://github.com/octocat"
        );
        assert_eq!(
            build_profile_url(Service::LinkedIn, " jane "),
            "https://linkedin.com/in/jane"
        );
        assert_eq!(
            build_profile_url(Service::Codewars, "jdoe"),
            "https://www.codewars.com/users/jdoe/completed_solutions"
        );
    }

    #[test]
    fn strips_single_at_from_bluesky_handle() {
        assert_eq!(
            build_profile_url(Service::Bluesky, "@alice.bsky.social"),
            "https://bsky.app/profile/alice.bsky.social"
        );
        assert_eq!(
            build_profile_url(Service::Bluesky, "@@alice"),
            "https://bsky.app/profile/@alice"
        );
        assert_eq!(
            build_profile_url(Service::Twitter, "@jack"),
            "https://twitter.com/@jack"
        );
    }

    #[test]
    fn url_services_are_normalized_not_templated() {
        assert_eq!(
            build_profile_url(Service::Mastodon, "mastodon.social/@me"),
            "https://mastodon.social/@me"
        );
        assert_eq!(
            build_profile_url(Service::Pdf, "https://example.com/cv.pdf"),
            "https://example.com/cv.pdf"
        );
    }

    #[test]
    fn empty_handle_keeps_template() {
        assert_eq!(build_profile_url(Service::GitHub, "   "), "https://github.com/");
        assert_eq!(build_profile_url(Service::Website, "   "), "");
    }

    #[test]
    fn decodes_links_and_handles_once() {
        assert_eq!(
            normalize_url("example.com/?a=1&amp;amp;b=2"),
            "https://example.com/?a=1&amp;b=2"
        );
        assert_eq!(
            value_url(Some(&json!("example.com/?a=1&amp;amp;b=2"))),
            "https://example.com/?a=1&amp;b=2"
        );
        assert_eq!(
            build_profile_url(Service::Website, "a.dev/?x&amp;amp;y"),
            "https://a.dev/?x&amp;y"
        );

        let sidebar = json!({ "github": "a&amp;amp;b" });
        assert_eq!(contact_urls(&sidebar), ["https://github.com/a&amp;b"]);
    }

    #[test]
    fn set_but_blank_handles_still_link() {
        let sidebar = json!({ "github": "  ", "website": "  ", "gitlab": "" });
        assert_eq!(contact_urls(&sidebar), ["https://github.com/"]);
    }

    #[test]
    fn service_keys_are_unique() {
        for (i, service) in Service::ALL.iter().enumerate() {
            assert!(
                Service::ALL[i + 1..].iter().all(|other| other.key() != service.key()),
                "Duplicate key {}",
                service.key()
            );
        }
    }

    #[test]
    fn collects_contact_urls_in_table_order() {
        let sidebar = json!({
            "pdf": "example.com/cv.pdf",
            "github": "octocat",
            "website": "example.com",
            "bluesky": "@octo.bsky.social",
        });

        assert_eq!(
            contact_urls(&sidebar),
            [
                "https://example.com",
                "https://github.com/octocat",
                "https://bsky.app/profile/octo.bsky.social",
                "https://example.com/cv.pdf",
            ]
        );
    }

    #[test]
    fn deduplicates_contact_urls() {
        let sidebar = json!({
            "website": "https://example.com",
            "mastodon": "example.com",
            "pdf": "",
        });

        assert_eq!(contact_urls(&sidebar), ["https://example.com"]);
    }

    #[test]
    fn ignores_malformed_handles() {
        let sidebar = json!({ "github": ["octocat"], "gitlab": { "user": "x" } });
        assert!(contact_urls(&sidebar).is_empty());
        assert!(contact_urls(&json!("not an object")).is_empty());
    }
}
