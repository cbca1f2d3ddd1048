//! Hex color parsing and canonicalization for custom element colors.

#[cfg(test)]
#[path = "color_test.rs"]
mod color_test;

/// Marker that distinguishes a literal color from a theme color key.
pub const CUSTOM_COLOR_PREFIX: char = '#';

/// Whether `value` is a literal color rather than a symbolic theme key.
#[must_use]
pub fn is_custom_color(value: &str) -> bool {
    value.starts_with(CUSTOM_COLOR_PREFIX)
}

/// Parse `#RGB` or `#RRGGBB` values into RGB channels.
#[must_use]
pub fn parse_hex_rgb(raw: &str) -> Option<(u8, u8, u8)> {
    let hex = raw.trim().strip_prefix(CUSTOM_COLOR_PREFIX)?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match hex.len() {
        3 => {
            let r = u8::from_str_radix(&hex[0..1].repeat(2), 16).ok()?;
            let g = u8::from_str_radix(&hex[1..2].repeat(2), 16).ok()?;
            let b = u8::from_str_radix(&hex[2..3].repeat(2), 16).ok()?;
            Some((r, g, b))
        }
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some((r, g, b))
        }
        _ => None,
    }
}

/// Canonical form of a custom color: lowercase `#rrggbb` when the value
/// parses, otherwise the trimmed input unchanged (e.g. `#rrggbbaa`).
#[must_use]
pub fn canonical_custom_color(value: &str) -> String {
    match parse_hex_rgb(value) {
        Some((r, g, b)) => format!("#{r:02x}{g:02x}{b:02x}"),
        None => value.trim().to_owned(),
    }
}
