//! Value object parsing and geometry properties

use proptest::prelude::*;
use rstest::rstest;
use uxlens_core::domain::{BoundingBox, Color, HeuristicCode, Severity, VersionStatus};

#[rstest]
#[case::short_form("#fff", Some((255, 255, 255)))]
#[case::long_form("#1A2B3C", Some((0x1A, 0x2B, 0x3C)))]
#[case::no_hash("000000", Some((0, 0, 0)))]
#[case::with_alpha("#FF000080", Some((255, 0, 0)))]
#[case::wrong_length("#12345", None)]
#[case::not_hex("#GGGGGG", None)]
#[case::empty("", None)]
fn test_color_from_hex(#[case] input: &str, #[case] expected: Option<(u8, u8, u8)>) {
    let parsed = Color::from_hex(input);
    match expected {
        Some((r, g, b)) => {
            let color = parsed.expect("should parse");
            assert_eq!(color.to_hex(), format!("#{:02X}{:02X}{:02X}", r, g, b));
        }
        None => assert!(parsed.is_none()),
    }
}

#[test]
fn test_hex_alpha_channel() {
    let color = Color::from_hex("#00000000").unwrap();
    assert_eq!(color.a, 0.0);
    assert_eq!(Color::from_hex("#000").unwrap().a, 1.0);
}

#[rstest]
#[case("1", Some("01"))]
#[case("03", Some("03"))]
#[case("H7", Some("07"))]
#[case(" 10 ", Some("10"))]
#[case("0", None)]
#[case("11", None)]
#[case("visibility", None)]
fn test_heuristic_code_parse(#[case] input: &str, #[case] expected: Option<&str>) {
    assert_eq!(
        HeuristicCode::parse(input).as_ref().map(HeuristicCode::as_str),
        expected
    );
}

#[test]
fn test_heuristic_code_rejects_out_of_range_in_json() {
    let result: Result<HeuristicCode, _> = serde_json::from_str("\"12\"");
    assert!(result.is_err());
    let ok: HeuristicCode = serde_json::from_str("\"4\"").unwrap();
    assert_eq!(serde_json::to_string(&ok).unwrap(), "\"04\"");
}

#[test]
fn test_severity_and_status_parse() {
    assert_eq!(Severity::parse("high"), Some(Severity::High));
    assert_eq!(Severity::parse("catastrophic"), None);
    assert_eq!(VersionStatus::parse("done"), Some(VersionStatus::Done));
    assert!(!VersionStatus::Done.can_transition_to(VersionStatus::Error));
    assert!(VersionStatus::Pending.can_transition_to(VersionStatus::Error));
}

proptest! {
    #[test]
    fn prop_clamped_channels_in_unit_range(
        r in proptest::num::f64::ANY,
        g in proptest::num::f64::ANY,
        b in proptest::num::f64::ANY,
        a in proptest::num::f64::ANY,
    ) {
        let c = Color { r, g, b, a }.clamped();
        for v in [c.r, c.g, c.b, c.a] {
            prop_assert!((0.0..=1.0).contains(&v));
        }
    }

    #[test]
    fn prop_box_contains_its_corners(
        x in -1000.0f64..1000.0,
        y in -1000.0f64..1000.0,
        w in 0.0f64..500.0,
        h in 0.0f64..500.0,
    ) {
        let bbox = BoundingBox::new(x, y, w, h);
        prop_assert!(bbox.contains_point(x, y));
        prop_assert!(bbox.contains_point(x + w, y + h));
        prop_assert!(!bbox.contains_point(x - 1.0, y));
    }
}
