//! WCAG contrast math
//!
//! - Relative luminance on linearized sRGB channels (WCAG 2.x definition)
//! - Ratio = (L_lighter + 0.05) / (L_darker + 0.05), range [1, 21]
//! - Compliance tiers: AAA >= 7, AA >= 4.5, AA-Large >= 3 (large text only),
//!   Low-Contrast >= 1.5, otherwise Fail

use uxlens_core::domain::{Color, ComplianceLevel};

/// Large text: at least 18, or at least 14 and bold
pub const LARGE_TEXT_SIZE: f64 = 18.0;
pub const LARGE_BOLD_TEXT_SIZE: f64 = 14.0;

fn linearize(channel: f64) -> f64 {
    if channel <= 0.04045 {
        channel / 12.92
    } else {
        ((channel + 0.055) / 1.055).powf(2.4)
    }
}

/// Relative luminance; alpha is ignored
pub fn relative_luminance(color: Color) -> f64 {
    let c = color.clamped();
    0.2126 * linearize(c.r) + 0.7152 * linearize(c.g) + 0.0722 * linearize(c.b)
}

/// Contrast ratio rounded to two decimals
pub fn contrast_ratio(foreground: Color, background: Color) -> f64 {
    let l1 = relative_luminance(foreground);
    let l2 = relative_luminance(background);
    let (lighter, darker) = if l1 >= l2 { (l1, l2) } else { (l2, l1) };
    let ratio = (lighter + 0.05) / (darker + 0.05);
    (ratio * 100.0).round() / 100.0
}

pub fn is_large_text(font_size: f64, bold: bool) -> bool {
    font_size >= LARGE_TEXT_SIZE || (font_size >= LARGE_BOLD_TEXT_SIZE && bold)
}

/// Map a ratio to its score and level. Boundaries are inclusive.
pub fn compliance(ratio: f64, large_text: bool) -> (u8, ComplianceLevel) {
    if ratio >= 7.0 {
        (100, ComplianceLevel::Aaa)
    } else if ratio >= 4.5 {
        (90, ComplianceLevel::Aa)
    } else if ratio >= 3.0 && large_text {
        (70, ComplianceLevel::AaLarge)
    } else if ratio >= 1.5 {
        (50, ComplianceLevel::LowContrast)
    } else {
        (0, ComplianceLevel::Fail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_black_on_white_is_21() {
        assert_eq!(contrast_ratio(Color::BLACK, Color::WHITE), 21.0);
        assert_eq!(contrast_ratio(Color::WHITE, Color::BLACK), 21.0);
    }

    #[test]
    fn test_identical_colors_are_1() {
        let gray = Color::from_rgb8(0x77, 0x77, 0x77);
        assert_eq!(contrast_ratio(gray, gray), 1.0);
    }

    #[test]
    fn test_luminance_extremes() {
        assert_eq!(relative_luminance(Color::BLACK), 0.0);
        assert!((relative_luminance(Color::WHITE) - 1.0).abs() < 1e-12);
    }

    #[rstest]
    #[case(7.0, false, 100, ComplianceLevel::Aaa)]
    #[case(6.99, false, 90, ComplianceLevel::Aa)]
    #[case(4.5, false, 90, ComplianceLevel::Aa)]
    #[case(4.49, true, 70, ComplianceLevel::AaLarge)]
    #[case(4.49, false, 50, ComplianceLevel::LowContrast)]
    #[case(3.0, true, 70, ComplianceLevel::AaLarge)]
    #[case(3.0, false, 50, ComplianceLevel::LowContrast)]
    #[case(2.99, true, 50, ComplianceLevel::LowContrast)]
    #[case(1.5, false, 50, ComplianceLevel::LowContrast)]
    #[case(1.49, true, 0, ComplianceLevel::Fail)]
    #[case(1.0, false, 0, ComplianceLevel::Fail)]
    fn test_compliance_boundaries(
        #[case] ratio: f64,
        #[case] large: bool,
        #[case] score: u8,
        #[case] level: ComplianceLevel,
    ) {
        assert_eq!(compliance(ratio, large), (score, level));
    }

    #[rstest]
    #[case(18.0, false, true)]
    #[case(17.9, false, false)]
    #[case(14.0, true, true)]
    #[case(13.9, true, false)]
    #[case(14.0, false, false)]
    fn test_large_text_rule(#[case] size: f64, #[case] bold: bool, #[case] expected: bool) {
        assert_eq!(is_large_text(size, bold), expected);
    }
}
