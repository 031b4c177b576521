//! Color types and border color spec parsing.

/// Fixed alpha applied to every border stroke, regardless of what the
/// dataset specifies. The dataset's own alpha channel is ignored by design.
/// Value is round(0.75 * 255); see DESIGN.md for the provenance.
pub const BORDER_ALPHA: u8 = 191;

/// Border color used when a color spec fails to parse, so a bad entry is
/// visually obvious instead of silently dropped.
pub const FALLBACK_BORDER_COLOR: Color = Color {
    r: 255,
    g: 0,
    b: 0,
    a: BORDER_ALPHA,
};

/// An RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// Parse a border color spec of the form `rgb(r,g,b)`.
///
/// The keyword is case-insensitive and interior whitespace is tolerated.
/// The resulting alpha is always [`BORDER_ALPHA`]; a spec that fails to
/// parse degrades to [`FALLBACK_BORDER_COLOR`]. Never fails.
pub fn parse_color_spec(spec: &str) -> Color {
    parse_rgb(spec).unwrap_or(FALLBACK_BORDER_COLOR)
}

fn parse_rgb(spec: &str) -> Option<Color> {
    let s = spec.trim();
    let prefix = s.get(..4)?;
    if !prefix.eq_ignore_ascii_case("rgb(") {
        return None;
    }
    let body = s[4..].strip_suffix(')')?;

    let mut channels = body.split(',').map(|part| part.trim().parse::<u8>());
    let r = channels.next()?.ok()?;
    let g = channels.next()?.ok()?;
    let b = channels.next()?.ok()?;
    if channels.next().is_some() {
        return None;
    }

    Some(Color::new(r, g, b, BORDER_ALPHA))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic() {
        let c = parse_color_spec("rgb(12,200,7)");
        assert_eq!(c, Color::new(12, 200, 7, BORDER_ALPHA));
    }

    #[test]
    fn test_parse_whitespace_and_case() {
        let c = parse_color_spec("RGB( 0 , 128 , 255 )");
        assert_eq!(c, Color::new(0, 128, 255, BORDER_ALPHA));
    }

    #[test]
    fn test_alpha_always_overridden() {
        // The spec carries no alpha slot at all; the override is structural.
        assert_eq!(parse_color_spec("rgb(1,2,3)").a, BORDER_ALPHA);
        assert_eq!(parse_color_spec("garbage").a, BORDER_ALPHA);
    }

    #[test]
    fn test_malformed_falls_back_to_red() {
        for bad in [
            "",
            "rgb()",
            "rgb(1,2)",
            "rgb(1,2,3,4)",
            "rgba(1,2,3,0.5)",
            "rgb(300,0,0)",
            "rgb(1,2,three)",
            "#aabbcc",
            "rgé(1,2,3)",
        ] {
            assert_eq!(parse_color_spec(bad), FALLBACK_BORDER_COLOR, "spec: {bad:?}");
        }
    }
}
