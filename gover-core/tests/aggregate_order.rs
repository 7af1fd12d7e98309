use gover_core::aggregate::aggregate;
use gover_core::model::{ChangeCategory, GoVersion, VersionData};

fn version_data(minor: u32, date: Option<&str>) -> VersionData {
    VersionData {
        version: GoVersion::new(minor),
        release_date: date.map(str::to_string),
        changes: vec![ChangeCategory::new(
            "Overview",
            format!("Go 1.{minor} Release Notes"),
        )],
    }
}

fn minors(items: &[VersionData]) -> Vec<u32> {
    items.iter().map(|v| v.version.minor()).collect()
}

#[test]
fn test_aggregate_sorts_numerically_descending() {
    let input = vec![
        version_data(9, None),
        version_data(10, Some("2018-02-16")),
        version_data(2, None),
        version_data(24, Some("2025-02-11")),
        version_data(1, None),
    ];

    let sorted = aggregate(input);

    assert_eq!(minors(&sorted), vec![24, 10, 9, 2, 1]);
    for pair in sorted.windows(2) {
        assert!(pair[0].version > pair[1].version);
    }
}

#[test]
fn test_aggregate_is_idempotent() {
    let once = aggregate(vec![
        version_data(3, None),
        version_data(11, None),
        version_data(7, None),
    ]);
    let twice = aggregate(once.clone());
    assert_eq!(once, twice);
}

#[test]
fn test_aggregate_does_not_modify_records() {
    let input = vec![version_data(5, Some("2015-08-19")), version_data(6, None)];
    let sorted = aggregate(input.clone());

    assert_eq!(sorted[0], input[1]);
    assert_eq!(sorted[1], input[0]);
}

#[test]
fn test_aggregate_keeps_first_seen_duplicate() {
    let input = vec![
        version_data(4, Some("2014-12-10")),
        version_data(5, None),
        version_data(4, Some("1999-01-01")),
    ];

    let sorted = aggregate(input);

    assert_eq!(minors(&sorted), vec![5, 4]);
    assert_eq!(sorted[1].release_date.as_deref(), Some("2014-12-10"));
}

#[test]
fn test_aggregate_empty() {
    assert!(aggregate(Vec::new()).is_empty());
}

mod properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn aggregate_is_strictly_descending_and_idempotent(
            minors in prop::collection::hash_set(0u32..500, 0..40)
        ) {
            let input: Vec<VersionData> = minors.iter().map(|&m| version_data(m, None)).collect();

            let once = aggregate(input);
            let order = super::minors(&once);
            prop_assert_eq!(order.len(), minors.len());
            prop_assert!(order.windows(2).all(|pair| pair[0] > pair[1]), "not descending: {:?}", order);

            let twice = aggregate(once.clone());
            prop_assert_eq!(twice, once);
        }
    }
}
