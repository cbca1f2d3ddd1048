use super::*;

#[test]
fn parse_hex_rgb_supports_short_and_long_forms() {
    assert_eq!(parse_hex_rgb("#ABC"), Some((170, 187, 204)));
    assert_eq!(parse_hex_rgb("  #a1B2c3 "), Some((161, 178, 195)));
}

#[test]
fn parse_hex_rgb_rejects_invalid_inputs() {
    assert_eq!(parse_hex_rgb("AABBCC"), None);
    assert_eq!(parse_hex_rgb("#12"), None);
    assert_eq!(parse_hex_rgb("#abcd"), None);
    assert_eq!(parse_hex_rgb("#12GG34"), None);
    assert_eq!(parse_hex_rgb("#é12"), None);
    assert_eq!(parse_hex_rgb("#+fffff"), None);
}

#[test]
fn custom_colors_are_detected_by_marker() {
    assert!(is_custom_color("#ff0000"));
    assert!(is_custom_color("#nonsense"));
    assert!(!is_custom_color("blue"));
    assert!(!is_custom_color(""));
}

#[test]
fn canonical_custom_color_lowercases_and_expands() {
    assert_eq!(canonical_custom_color("#ABC"), "#aabbcc");
    assert_eq!(canonical_custom_color("#A1B2C3"), "#a1b2c3");
}

#[test]
fn canonical_custom_color_keeps_unparseable_values() {
    assert_eq!(canonical_custom_color(" #11223344 "), "#11223344");
}
