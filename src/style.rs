//! Styling values – colours, text styles and the two document themes.
//!
//! Nothing here is global state: every block and every chrome element is
//! handed the style it draws with, so there is no "current font" or
//! "current colour" that leaks from one drawing call into the next.

use serde::{Deserialize, Serialize};

/// Points per millimetre. Layout constants are written in millimetres and
/// converted once; everything downstream works in PDF points.
pub const MM: f32 = 72.0 / 25.4;

/// RGB colour (0.0 – 1.0).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Self = Self {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };
    pub const WHITE: Self = Self {
        r: 1.0,
        g: 1.0,
        b: 1.0,
    };

    /// Build from 8-bit channels.
    pub fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        }
    }

    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        if hex.len() == 6 {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some(Self::rgb8(r, g, b))
        } else if hex.len() == 3 {
            let r = u8::from_str_radix(&hex[0..1].repeat(2), 16).ok()?;
            let g = u8::from_str_radix(&hex[1..2].repeat(2), 16).ok()?;
            let b = u8::from_str_radix(&hex[2..3].repeat(2), 16).ok()?;
            Some(Self::rgb8(r, g, b))
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Font and colour for a run of text, plus the height of one line box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    /// Font size in points.
    pub size: f32,
    pub bold: bool,
    pub color: Color,
    /// Height of one line box in points.
    pub line_height: f32,
}

impl TextStyle {
    pub fn new(size: f32, bold: bool, color: Color, line_height_mm: f32) -> Self {
        Self {
            size,
            bold,
            color,
            line_height: line_height_mm * MM,
        }
    }
}

/// Stroke used for rules and separators.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RuleStyle {
    pub color: Color,
    /// Stroke width in points.
    pub thickness: f32,
}

impl RuleStyle {
    pub fn new(color: Color, thickness_mm: f32) -> Self {
        Self {
            color,
            thickness: thickness_mm * MM,
        }
    }
}

/// A text role: its text style and the vertical gaps around it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockStyle {
    pub text: TextStyle,
    pub space_before: f32,
    pub space_after: f32,
}

impl BlockStyle {
    pub fn new(text: TextStyle, before_mm: f32, after_mm: f32) -> Self {
        Self {
            text,
            space_before: before_mm * MM,
            space_after: after_mm * MM,
        }
    }
}

/// A horizontal rule with the gaps around it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeparatorStyle {
    pub rule: RuleStyle,
    pub space_before: f32,
    pub space_after: f32,
}

impl SeparatorStyle {
    pub fn new(rule: RuleStyle, before_mm: f32, after_mm: f32) -> Self {
        Self {
            rule,
            space_before: before_mm * MM,
            space_after: after_mm * MM,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableStyle {
    pub header: TextStyle,
    pub cell: TextStyle,
    pub header_fill: Color,
    pub header_border: Color,
    /// Fill for even data rows (index 0, 2, …).
    pub row_fill: Color,
    /// Fill for odd data rows (index 1, 3, …).
    pub alt_fill: Color,
    pub row_border: Color,
    pub border_width: f32,
    pub header_height: f32,
    pub row_height: f32,
    pub space_after: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CoverStyle {
    pub top_gap: f32,
    /// Heavy rule opening and closing the cover, if any.
    pub frame_rule: Option<RuleStyle>,
    pub after_frame: f32,
    pub brand: TextStyle,
    pub after_brand: f32,
    pub accent_rule: RuleStyle,
    pub accent_width: f32,
    pub after_accent: f32,
    pub title: TextStyle,
    pub after_titles: f32,
    pub subtitle: TextStyle,
    pub after_subtitles: f32,
    /// Rule above the metadata list, if any.
    pub meta_rule: Option<RuleStyle>,
    pub after_meta_rule: f32,
    pub meta: TextStyle,
    pub after_meta: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChromeStyle {
    pub header_text: TextStyle,
    pub header_rule: RuleStyle,
    pub banner: TextStyle,
    pub footer_text: TextStyle,
    pub footer_rule: Option<RuleStyle>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignatureStyle {
    pub rule: RuleStyle,
    pub line: RuleStyle,
    pub line_width: f32,
}

/// Which preset a document asset asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeName {
    /// Navy law-firm styling with reference-number chrome.
    #[default]
    Formal,
    /// Orange market-guide styling with minimal chrome.
    Guide,
}

impl ThemeName {
    pub fn theme(self) -> Theme {
        match self {
            ThemeName::Formal => Theme::formal(),
            ThemeName::Guide => Theme::guide(),
        }
    }
}

/// Every role style used by the composer, bundled.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub name: ThemeName,
    pub cover: CoverStyle,
    pub section: BlockStyle,
    pub section_rule: RuleStyle,
    pub section_uppercase: bool,
    pub part: BlockStyle,
    /// Rule drawn above part titles, with the gap between rule and text.
    pub part_rule: Option<(RuleStyle, f32)>,
    pub article: BlockStyle,
    pub subheading: BlockStyle,
    pub body: BlockStyle,
    pub muted: BlockStyle,
    pub note: BlockStyle,
    pub warning: BlockStyle,
    pub fine: BlockStyle,
    pub bullet: BlockStyle,
    pub bullet_prefix: &'static str,
    pub bullet_indent: f32,
    pub numbered: BlockStyle,
    pub numbered_indent: f32,
    pub item_gap: f32,
    pub separator: SeparatorStyle,
    pub heavy_separator: SeparatorStyle,
    pub table: TableStyle,
    pub signature: SignatureStyle,
    pub chrome: ChromeStyle,
}

impl Theme {
    pub fn formal() -> Self {
        let navy = Color::rgb8(26, 42, 74);
        let black = Color::rgb8(30, 30, 30);
        let gray = Color::rgb8(100, 100, 100);
        let light = Color::rgb8(180, 180, 180);
        let table_header = Color::rgb8(42, 60, 90);

        Self {
            name: ThemeName::Formal,
            cover: CoverStyle {
                top_gap: 20.0 * MM,
                frame_rule: Some(RuleStyle::new(navy, 1.2)),
                after_frame: 15.0 * MM,
                brand: TextStyle::new(32.0, true, navy, 16.0),
                after_brand: 3.0 * MM,
                accent_rule: RuleStyle::new(navy, 0.4),
                accent_width: 60.0 * MM,
                after_accent: 10.0 * MM,
                title: TextStyle::new(16.0, true, navy, 10.0),
                after_titles: 3.0 * MM,
                subtitle: TextStyle::new(12.0, false, gray, 8.0),
                after_subtitles: 18.0 * MM,
                meta_rule: Some(RuleStyle::new(navy, 0.4)),
                after_meta_rule: 8.0 * MM,
                meta: TextStyle::new(9.0, false, gray, 6.0),
                after_meta: 20.0 * MM,
            },
            section: BlockStyle::new(TextStyle::new(14.0, true, navy, 9.0), 2.0, 6.0),
            section_rule: RuleStyle::new(navy, 0.8),
            section_uppercase: true,
            part: BlockStyle::new(TextStyle::new(12.0, true, navy, 8.0), 6.0, 3.0),
            part_rule: Some((RuleStyle::new(navy, 0.3), 4.0 * MM)),
            article: BlockStyle::new(TextStyle::new(10.5, true, navy, 7.0), 4.0, 2.0),
            subheading: BlockStyle::new(TextStyle::new(9.5, true, black, 6.0), 2.0, 1.0),
            body: BlockStyle::new(TextStyle::new(9.5, false, black, 5.5), 0.0, 2.0),
            muted: BlockStyle::new(TextStyle::new(9.5, false, gray, 5.5), 0.0, 2.0),
            note: BlockStyle::new(
                TextStyle::new(9.0, true, Color::rgb8(60, 60, 80), 5.5),
                0.0,
                2.0,
            ),
            warning: BlockStyle::new(
                TextStyle::new(9.5, true, Color::rgb8(160, 50, 50), 5.5),
                2.0,
                2.0,
            ),
            fine: BlockStyle::new(TextStyle::new(7.5, false, gray, 4.5), 0.0, 1.0),
            bullet: BlockStyle::new(TextStyle::new(9.5, false, black, 5.5), 0.0, 0.5),
            bullet_prefix: "\u{2014}  ",
            bullet_indent: 8.0 * MM,
            numbered: BlockStyle::new(TextStyle::new(9.5, false, black, 5.5), 0.0, 1.0),
            numbered_indent: 12.0 * MM,
            item_gap: 2.0 * MM,
            separator: SeparatorStyle::new(RuleStyle::new(light, 0.2), 3.0, 5.0),
            heavy_separator: SeparatorStyle::new(RuleStyle::new(navy, 0.5), 4.0, 6.0),
            table: TableStyle {
                header: TextStyle::new(8.5, true, Color::WHITE, 7.0),
                cell: TextStyle::new(8.5, false, black, 6.5),
                header_fill: table_header,
                header_border: table_header,
                row_fill: Color::WHITE,
                alt_fill: Color::rgb8(245, 247, 250),
                row_border: Color::rgb8(200, 200, 200),
                border_width: 0.2 * MM,
                header_height: 7.0 * MM,
                row_height: 6.5 * MM,
                space_after: 3.0 * MM,
            },
            signature: SignatureStyle {
                rule: RuleStyle::new(navy, 0.5),
                line: RuleStyle::new(light, 0.3),
                line_width: 60.0 * MM,
            },
            chrome: ChromeStyle {
                header_text: TextStyle::new(7.0, false, gray, 4.0),
                header_rule: RuleStyle::new(navy, 0.6),
                banner: TextStyle::new(6.0, true, Color::rgb8(160, 50, 50), 4.0),
                footer_text: TextStyle::new(7.0, false, light, 4.0),
                footer_rule: Some(RuleStyle::new(light, 0.3)),
            },
        }
    }

    pub fn guide() -> Self {
        let orange = Color::rgb8(255, 111, 15);
        let dark = Color::rgb8(51, 51, 51);
        let mid = Color::rgb8(110, 110, 110);
        let faint = Color::rgb8(150, 150, 150);
        let light = Color::rgb8(180, 180, 180);
        let red = Color::rgb8(200, 50, 50);
        let row = Color::rgb8(248, 248, 248);

        Self {
            name: ThemeName::Guide,
            cover: CoverStyle {
                top_gap: 35.0 * MM,
                frame_rule: None,
                after_frame: 0.0,
                brand: TextStyle::new(36.0, false, orange, 18.0),
                after_brand: 5.0 * MM,
                accent_rule: RuleStyle::new(orange, 1.0),
                accent_width: 80.0 * MM,
                after_accent: 8.0 * MM,
                title: TextStyle::new(20.0, false, dark, 12.0),
                after_titles: 2.0 * MM,
                subtitle: TextStyle::new(15.0, false, Color::rgb8(100, 100, 100), 10.0),
                after_subtitles: 25.0 * MM,
                meta_rule: None,
                after_meta_rule: 0.0,
                meta: TextStyle::new(11.0, false, faint, 7.0),
                after_meta: 0.0,
            },
            section: BlockStyle::new(TextStyle::new(16.0, false, orange, 9.0), 3.0, 5.0),
            section_rule: RuleStyle::new(orange, 0.3),
            section_uppercase: false,
            part: BlockStyle::new(TextStyle::new(13.0, false, Color::rgb8(60, 60, 60), 8.0), 2.0, 2.0),
            part_rule: None,
            article: BlockStyle::new(TextStyle::new(11.0, false, orange, 7.0), 1.0, 1.0),
            subheading: BlockStyle::new(TextStyle::new(11.0, true, dark, 7.0), 1.0, 1.0),
            body: BlockStyle::new(TextStyle::new(10.0, false, dark, 6.0), 0.0, 1.0),
            muted: BlockStyle::new(TextStyle::new(10.0, false, mid, 6.0), 0.0, 3.0),
            note: BlockStyle::new(TextStyle::new(10.0, true, Color::rgb8(60, 60, 60), 6.0), 0.0, 2.0),
            warning: BlockStyle::new(TextStyle::new(10.0, false, red, 6.0), 2.0, 2.0),
            fine: BlockStyle::new(TextStyle::new(8.0, false, faint, 5.0), 0.0, 1.0),
            bullet: BlockStyle::new(TextStyle::new(9.0, false, Color::rgb8(80, 80, 80), 5.0), 0.0, 2.0),
            bullet_prefix: "  \u{2022}  ",
            bullet_indent: 0.0,
            numbered: BlockStyle::new(TextStyle::new(10.0, false, dark, 6.0), 0.0, 1.0),
            numbered_indent: 12.0 * MM,
            item_gap: 2.0 * MM,
            separator: SeparatorStyle::new(RuleStyle::new(Color::rgb8(200, 200, 200), 0.2), 8.0, 4.0),
            heavy_separator: SeparatorStyle::new(RuleStyle::new(orange, 0.5), 4.0, 6.0),
            table: TableStyle {
                header: TextStyle::new(9.0, false, Color::WHITE, 8.0),
                cell: TextStyle::new(9.0, false, dark, 8.0),
                header_fill: orange,
                header_border: orange,
                row_fill: row,
                alt_fill: row,
                row_border: Color::rgb8(200, 200, 200),
                border_width: 0.2 * MM,
                header_height: 8.0 * MM,
                row_height: 8.0 * MM,
                space_after: 3.0 * MM,
            },
            signature: SignatureStyle {
                rule: RuleStyle::new(orange, 0.5),
                line: RuleStyle::new(light, 0.3),
                line_width: 60.0 * MM,
            },
            chrome: ChromeStyle {
                header_text: TextStyle::new(9.0, false, light, 8.0),
                header_rule: RuleStyle::new(orange, 0.5),
                banner: TextStyle::new(6.0, true, red, 4.0),
                footer_text: TextStyle::new(8.0, false, faint, 10.0),
                footer_rule: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_from_hex() {
        let c = Color::from_hex("#ff8800").unwrap();
        assert!((c.r - 1.0).abs() < 0.01);
        assert!((c.g - 0.533).abs() < 0.01);
        assert_eq!(Color::from_hex("#fff"), Some(Color::WHITE));
        assert_eq!(Color::from_hex("nope"), None);
    }

    #[test]
    fn millimetres_to_points() {
        assert!((210.0 * MM - 595.28).abs() < 0.01);
    }

    #[test]
    fn themes_differ_in_chrome() {
        let formal = ThemeName::Formal.theme();
        let guide = ThemeName::Guide.theme();
        assert!(formal.chrome.footer_rule.is_some());
        assert!(guide.chrome.footer_rule.is_none());
        assert!(formal.section_uppercase);
        assert_ne!(formal.table.row_fill, formal.table.alt_fill);
    }
}
