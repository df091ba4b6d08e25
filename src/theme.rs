//! Site color palette
//!
//! The village site uses four ten-step palettes (primary, secondary, accent,
//! light). Sections pick one of them as a background gradient and the page
//! derives text and highlight colors from the same tone.

use crate::data::site::SectionTone;
use ratatui::style::Color;

/// Convert hex string to ratatui Color
pub fn parse_hex(hex: &str) -> Option<Color> {
    let hex = hex.trim().trim_start_matches('#');
    if hex.len() != 6 {
        return None;
    }

    let r = u8::from_str_radix(hex.get(0..2)?, 16).ok()?;
    let g = u8::from_str_radix(hex.get(2..4)?, 16).ok()?;
    let b = u8::from_str_radix(hex.get(4..6)?, 16).ok()?;

    Some(Color::Rgb(r, g, b))
}

/// RGB components of a color, if it has fixed ones
pub fn rgb(color: Color) -> Option<(u8, u8, u8)> {
    match color {
        Color::Rgb(r, g, b) => Some((r, g, b)),
        Color::Black => Some((0, 0, 0)),
        Color::White => Some((255, 255, 255)),
        Color::Gray => Some((192, 192, 192)),
        Color::DarkGray => Some((128, 128, 128)),
        _ => None,
    }
}

/// Mix `from` toward `to` by `t` (0 = from, 1 = to).
///
/// Colors without fixed components snap to whichever end is closer.
pub fn blend(from: Color, to: Color, t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);
    match (rgb(from), rgb(to)) {
        (Some((r1, g1, b1)), Some((r2, g2, b2))) => {
            let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
            Color::Rgb(mix(r1, r2), mix(g1, g2), mix(b1, b2))
        }
        _ if t < 0.5 => from,
        _ => to,
    }
}

/// Ten shades, 50 through 900
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette([Color; 10]);

impl Palette {
    fn from_hex(shades: [&str; 10]) -> Self {
        Self(shades.map(|h| parse_hex(h).unwrap_or(Color::Reset)))
    }

    /// Shade by its usual name (50, 100, ..., 900)
    pub fn shade(&self, step: u16) -> Color {
        let index = match step {
            0..=50 => 0,
            s => ((s / 100) as usize).min(9),
        };
        self.0[index]
    }
}

const GRAY_600: Color = Color::Rgb(0x4b, 0x55, 0x63);
const GRAY_700: Color = Color::Rgb(0x37, 0x41, 0x51);
const GRAY_900: Color = Color::Rgb(0x11, 0x18, 0x27);
const WHITE: Color = Color::Rgb(0xff, 0xff, 0xff);

#[derive(Debug, Clone, PartialEq)]
pub struct SiteTheme {
    pub primary: Palette,
    pub secondary: Palette,
    pub accent: Palette,
    pub light: Palette,
    pub page_background: Color,
    pub text: Color,
    pub text_muted: Color,
}

impl Default for SiteTheme {
    fn default() -> Self {
        Self {
            primary: Palette::from_hex([
                "#f0f9fa", "#daf0f3", "#b9e1e7", "#8dbcc7", "#6ba8b7", "#4f8a9a", "#457082",
                "#3e5c6a", "#384d58", "#32414b",
            ]),
            secondary: Palette::from_hex([
                "#f1f8fa", "#dceff3", "#a4ccd9", "#7db8c9", "#5fa4b8", "#4990a7", "#3d7896",
                "#356385", "#2f5273", "#2a4562",
            ]),
            accent: Palette::from_hex([
                "#f5fdf8", "#ebffd8", "#d4ffb8", "#b8ff95", "#9aff71", "#7cff4d", "#5eff29",
                "#52e023", "#46c21d", "#3aa417",
            ]),
            light: Palette::from_hex([
                "#fbfdfe", "#f6fbfc", "#c4e1e6", "#a8d7dd", "#8ccdd4", "#70c3cb", "#54b9c2",
                "#4aa5ae", "#40919a", "#367d86",
            ]),
            page_background: WHITE,
            text: GRAY_900,
            text_muted: GRAY_600,
        }
    }
}

impl SiteTheme {
    /// Left and right end of a section's background gradient
    pub fn section_gradient(&self, tone: SectionTone) -> (Color, Color) {
        match tone {
            SectionTone::Primary => (self.primary.shade(300), self.light.shade(200)),
            SectionTone::Secondary => (self.secondary.shade(300), self.light.shade(200)),
            SectionTone::Accent => (self.accent.shade(50), self.light.shade(50)),
            SectionTone::Light => (self.light.shade(100), self.accent.shade(50)),
            SectionTone::Plain => (self.page_background, self.page_background),
        }
    }

    /// Background at column `x` of a `width` wide section
    pub fn section_background(&self, tone: SectionTone, x: u16, width: u16) -> Color {
        let (from, to) = self.section_gradient(tone);
        if width <= 1 {
            return from;
        }
        blend(from, to, x as f32 / (width - 1) as f32)
    }

    /// Accent color for highlighted words (the second hero line, heading tail)
    pub fn highlight(&self, tone: SectionTone) -> Color {
        match tone {
            SectionTone::Primary | SectionTone::Secondary => WHITE,
            _ => self.primary.shade(500),
        }
    }

    pub fn muted(&self, tone: SectionTone) -> Color {
        match tone {
            SectionTone::Primary | SectionTone::Secondary => GRAY_700,
            _ => self.text_muted,
        }
    }

    /// Navbar (background, foreground): gradient style at the top of the
    /// page, solid white once scrolled
    pub fn navbar(&self, scrolled: bool) -> (Color, Color) {
        if scrolled {
            (self.page_background, self.text)
        } else {
            (self.primary.shade(300), WHITE)
        }
    }

    /// Fill of picture frames and placeholders
    pub fn media_gradient(&self) -> (Color, Color) {
        (self.primary.shade(100), self.secondary.shade(100))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_hex("#8dbcc7"), Some(Color::Rgb(0x8d, 0xbc, 0xc7)));
        assert_eq!(parse_hex("4f8a9a"), Some(Color::Rgb(0x4f, 0x8a, 0x9a)));
        assert_eq!(parse_hex("#fff"), None);
        assert_eq!(parse_hex("#gg0000"), None);
        assert_eq!(parse_hex("#ééé"), None);
    }

    #[test]
    fn test_blend_endpoints() {
        let a = Color::Rgb(0, 100, 200);
        let b = Color::Rgb(200, 100, 0);
        assert_eq!(blend(a, b, 0.0), a);
        assert_eq!(blend(a, b, 1.0), b);
        assert_eq!(blend(a, b, 0.5), Color::Rgb(100, 100, 100));
        assert_eq!(blend(a, b, 7.0), b);

        // No components: snap
        assert_eq!(blend(Color::Reset, b, 0.2), Color::Reset);
        assert_eq!(blend(Color::Reset, b, 0.8), b);
    }

    #[test]
    fn test_palette_shades() {
        let theme = SiteTheme::default();
        assert_eq!(theme.primary.shade(50), Color::Rgb(0xf0, 0xf9, 0xfa));
        assert_eq!(theme.primary.shade(300), Color::Rgb(0x8d, 0xbc, 0xc7));
        assert_eq!(theme.accent.shade(900), Color::Rgb(0x3a, 0xa4, 0x17));
    }

    #[test]
    fn test_section_gradient_spans_width() {
        let theme = SiteTheme::default();
        let (from, to) = theme.section_gradient(SectionTone::Primary);
        assert_eq!(theme.section_background(SectionTone::Primary, 0, 80), from);
        assert_eq!(theme.section_background(SectionTone::Primary, 79, 80), to);
        assert_eq!(
            theme.section_background(SectionTone::Plain, 40, 80),
            theme.page_background
        );
    }
}
