//! Tests for dataset loading and defaulting behavior.

use map_common::{parse_color_spec, Dataset, BORDER_ALPHA};

#[test]
fn test_absent_keys_are_empty_lists() {
    let data = Dataset::from_json("{}").unwrap();
    assert!(data.portal_stones.is_empty());
    assert!(data.steddings.is_empty());
    assert!(data.rivers.is_empty());
    assert!(data.nations.is_empty());
}

#[test]
fn test_full_document() {
    let json = r#"{
        "portal_stones": [{"coord": [10.0, 20.0]}],
        "steddings": [{"coord": [100, 100], "label": "Stock"}],
        "rivers": [{"coord": [100, 100], "label": "Brandywine"}],
        "nations": [{
            "border": [[0, 0], [10, 0], [10, 10]],
            "color": "rgb(20,40,60)"
        }]
    }"#;
    let data = Dataset::from_json(json).unwrap();

    assert_eq!(data.portal_stones.len(), 1);
    let p = data.portal_stones[0].point();
    assert_eq!((p.x, p.y), (10.0, 20.0));

    assert_eq!(data.steddings[0].label, "Stock");
    assert_eq!(data.rivers[0].label, "Brandywine");

    let nation = &data.nations[0];
    assert_eq!(nation.border_points().len(), 3);
    assert!(!nation.closed);
    let color = parse_color_spec(&nation.color);
    assert_eq!((color.r, color.g, color.b, color.a), (20, 40, 60, BORDER_ALPHA));
}

#[test]
fn test_label_defaults_to_empty() {
    let data = Dataset::from_json(r#"{"steddings": [{"coord": [1, 2]}]}"#).unwrap();
    assert_eq!(data.steddings[0].label, "");
}

#[test]
fn test_missing_color_renders_as_fallback() {
    let data =
        Dataset::from_json(r#"{"nations": [{"border": [[0, 0], [1, 1]]}]}"#).unwrap();
    // The default spec is deliberately unparseable, so it degrades to red.
    let color = parse_color_spec(&data.nations[0].color);
    assert_eq!((color.r, color.g, color.b), (255, 0, 0));
    assert_eq!(color.a, BORDER_ALPHA);
}

#[test]
fn test_missing_coord_is_fatal() {
    let err = Dataset::from_json(r#"{"steddings": [{"label": "Stock"}]}"#);
    assert!(err.is_err());
}

#[test]
fn test_wrong_coord_type_is_fatal() {
    let err = Dataset::from_json(r#"{"rivers": [{"coord": "north"}]}"#);
    assert!(err.is_err());
}

#[test]
fn test_unknown_keys_are_ignored() {
    let data = Dataset::from_json(r#"{"comment": "wip", "rivers": []}"#).unwrap();
    assert!(data.rivers.is_empty());
}
