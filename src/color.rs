// calview/src/color.rs

// Color helpers for generated view style rules.
// Intentionally free of GUI crate dependencies so the style cache and tests
// can use these directly.

/// Parse a hex color string like "#RRGGBB" or "RRGGBB" into a u8 tuple.
pub fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.trim_start_matches('#');
    if hex.len() < 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((r, g, b))
}

/// Determines if text on top of this color should be black or white.
pub fn is_dark(r: u8, g: u8, b: u8) -> bool {
    // Perceptual luminance approximation
    let brightness =
        0.299 * (r as f32 / 255.0) + 0.587 * (g as f32 / 255.0) + 0.114 * (b as f32 / 255.0);
    brightness < 0.5
}

/// Returns the text color ("#000000" or "#ffffff") that contrasts with the
/// given background color. Unparseable input falls back to black text.
pub fn contrasting_text_color(background: &str) -> &'static str {
    match parse_hex(background) {
        Some((r, g, b)) if is_dark(r, g, b) => "#ffffff",
        _ => "#000000",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_with_and_without_hash() {
        assert_eq!(parse_hex("#A8C2E1"), Some((0xA8, 0xC2, 0xE1)));
        assert_eq!(parse_hex("a8c2e1"), Some((0xA8, 0xC2, 0xE1)));
        assert_eq!(parse_hex("#fff"), None);
        assert_eq!(parse_hex("#zzzzzz"), None);
    }

    #[test]
    fn contrast_flips_with_luminance() {
        assert_eq!(contrasting_text_color("#000000"), "#ffffff");
        assert_eq!(contrasting_text_color("#ffffff"), "#000000");
        // The default calendar color is light enough for black text.
        assert_eq!(contrasting_text_color("#A8C2E1"), "#000000");
        assert_eq!(contrasting_text_color("not-a-color"), "#000000");
    }
}
