use gover_core::contract::FetchedPage;
use gover_core::extract::{extract_categories, heading_texts, version_from_url, Heading};
use gover_core::model::{ChangeCategory, GoVersion, ReleaseDateIndex};
use gover_core::pages::build_version_data;

const RELEASE_NOTES: &str = r#"<!DOCTYPE html>
<html>
<body>
<main>
  <h1>Go 1.22 Release Notes</h1>
  <h2 id="introduction">Introduction to Go 1.22</h2>
  <p>
    The latest Go release, version 1.22, arrives six months after Go 1.21.
  </p>
  <h2 id="language">Changes to the language</h2>
  <pre>for i := range 10 {}</pre>
  <p>Go 1.22 makes two changes to "for" loops.</p>
  <h2 id="tools">Tools</h2>
  <!-- go command section -->
  <p>Commands in workspaces can now use a vendor directory.</p>
</main>
</body>
</html>"#;

#[test]
fn test_extract_overview_and_two_headings() {
    let html = "<html><body><h1>Title</h1><h2>First</h2><p>Described</p><h2>Second</h2><div>not a paragraph</div></body></html>";
    let categories = extract_categories(html);

    assert_eq!(categories.len(), 3);
    assert_eq!(categories[0], ChangeCategory::new("Overview", "Title"));
    assert_eq!(categories[1].category, "First");
    assert_eq!(categories[1].description, "Described");
    assert_eq!(categories[2].category, "Second");
    assert!(categories[2].description.is_empty());
}

#[test]
fn test_extract_follows_document_order_and_skips_whitespace_and_comments() {
    let categories = extract_categories(RELEASE_NOTES);
    let names: Vec<&str> = categories.iter().map(|c| c.category.as_str()).collect();

    assert_eq!(
        names,
        vec!["Overview", "Introduction to Go 1.22", "Changes to the language", "Tools"]
    );
    assert_eq!(categories[0].description, "Go 1.22 Release Notes");
    assert_eq!(
        categories[1].description,
        "The latest Go release, version 1.22, arrives six months after Go 1.21."
    );
    // A <pre> sits between the heading and the paragraph.
    assert_eq!(categories[2].description, "");
    assert_eq!(
        categories[3].description,
        "Commands in workspaces can now use a vendor directory."
    );
}

#[test]
fn test_extract_without_title_has_no_overview() {
    let categories = extract_categories("<h2>Only section</h2><p>Body</p>");
    assert_eq!(categories, vec![ChangeCategory::new("Only section", "Body")]);
}

#[test]
fn test_extract_empty_page_yields_no_categories() {
    assert!(extract_categories("<html><body></body></html>").is_empty());
}

#[test]
fn test_heading_texts_in_order() {
    assert_eq!(
        heading_texts(RELEASE_NOTES, Heading::H1),
        vec!["Go 1.22 Release Notes"]
    );
    assert_eq!(heading_texts(RELEASE_NOTES, Heading::H2).len(), 3);
}

#[test]
fn test_version_from_url() {
    let cases = vec![
        ("https://example.org/doc/go1.22", Some("go1.22")),
        ("https://go.dev/doc/go1.9", Some("go1.9")),
        ("https://example.org/doc/", None),
        ("https://example.org/doc/devel", None),
        ("abc", None),
        ("", None),
    ];
    for (url, expected) in cases {
        assert_eq!(version_from_url(url), expected, "url: {url}");
    }
}

#[test]
fn test_build_version_data_merges_release_date() {
    let mut dates = ReleaseDateIndex::new();
    dates.insert(GoVersion::new(22), "2024-02-06".to_string());
    let page = FetchedPage::new("https://go.dev/doc/go1.22", RELEASE_NOTES);

    let data = build_version_data(GoVersion::new(22), &page, &dates);

    assert_eq!(data.version, GoVersion::new(22));
    assert_eq!(data.release_date.as_deref(), Some("2024-02-06"));
    assert_eq!(data.changes.len(), 4);
    assert_eq!(data.changes[0].category, "Overview");
}

#[test]
fn test_build_version_data_without_release_date() {
    let page = FetchedPage::new("https://go.dev/doc/go1.3", "<h1>Go 1.3 Release Notes</h1>");

    let data = build_version_data(GoVersion::new(3), &page, &ReleaseDateIndex::new());

    assert_eq!(data.release_date, None);
    assert_eq!(data.changes, vec![ChangeCategory::new("Overview", "Go 1.3 Release Notes")]);
}
