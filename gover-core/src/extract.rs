//! HTML extraction for go.dev pages.
//!
//! This is the only module that knows how the scraped pages are structured.
//! When go.dev changes its markup, this is the file to update; the pipeline
//! only sees [`ChangeCategory`] values and `(version, date)` pairs.
//!
//! Parsing is done with the `scraper` crate (html5ever), so malformed markup
//! degrades to fewer matches instead of errors.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

use crate::model::{ChangeCategory, GoVersion};

static H1: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h1").expect("h1 selector is valid"));
static H2: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h2").expect("h2 selector is valid"));

// <h2>go1.24.0 (released 2025-02-11)</h2>
static RELEASE_HEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(go1\.\d+)(?:\.\d+)?\s+\(released\s+(\d{4}-\d{2}-\d{2})\)")
        .expect("release heading regex is valid")
});

/// Heading levels the extractors look at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Heading {
    H1,
    H2,
}

impl Heading {
    fn selector(self) -> &'static Selector {
        match self {
            Heading::H1 => &H1,
            Heading::H2 => &H2,
        }
    }
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Next sibling that is an element, skipping text and comment nodes.
fn next_element_sibling(element: ElementRef<'_>) -> Option<ElementRef<'_>> {
    element.next_siblings().find_map(ElementRef::wrap)
}

/// Text of every heading of the given level, in document order.
pub fn heading_texts(html: &str, heading: Heading) -> Vec<String> {
    let document = Html::parse_document(html);
    document
        .select(heading.selector())
        .map(element_text)
        .collect()
}

/// Matches release history headings such as `go1.24.1 (released 2025-03-04)`.
///
/// Returns the major-minor version (patch level dropped) and the date for each
/// matching heading, in input order. Duplicates are preserved; deduplication
/// is the caller's policy.
pub fn release_heading_dates<I, S>(texts: I) -> Vec<(GoVersion, String)>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    texts
        .into_iter()
        .filter_map(|text| {
            let caps = RELEASE_HEADING_RE.captures(text.as_ref())?;
            let version = caps.get(1)?.as_str().parse::<GoVersion>().ok()?;
            let date = caps.get(2)?.as_str().to_string();
            Some((version, date))
        })
        .collect()
}

/// Extracts the change categories of one release notes page.
///
/// The first entry is a synthetic "Overview" holding the page title (all `h1`
/// text), present only when the page has a non-empty title. Then one entry per
/// `h2`, in document order, described by the paragraph directly after it.
pub fn extract_categories(html: &str) -> Vec<ChangeCategory> {
    let document = Html::parse_document(html);
    let mut categories = Vec::new();

    let title: String = document
        .select(&H1)
        .map(|h| h.text().collect::<String>())
        .collect::<String>()
        .trim()
        .to_string();
    if !title.is_empty() {
        categories.push(ChangeCategory::new(ChangeCategory::OVERVIEW, title));
    }

    for heading in document.select(&H2) {
        let description = next_element_sibling(heading)
            .filter(|sibling| sibling.value().name() == "p")
            .map(element_text)
            .unwrap_or_default();
        categories.push(ChangeCategory::new(element_text(heading), description));
    }

    categories
}

/// Last path segment of a documentation URL when it looks like a version,
/// e.g. `https://go.dev/doc/go1.22` gives `go1.22`.
///
/// URLs ending in `/` have no version segment.
pub fn version_from_url(url: &str) -> Option<&str> {
    if url.len() < 4 || url.ends_with('/') {
        return None;
    }
    let last_slash = url.rfind('/').filter(|&i| i != 0)?;
    let segment = &url[last_slash + 1..];
    (segment.len() >= 3 && segment.starts_with("go")).then_some(segment)
}
