//! Pagination – page geometry and the cursor that walks down it.
//!
//! The composer only ever asks two questions here: where does the next
//! block start, and does a block of a given height still fit above the
//! bottom break margin.

use crate::style::{ThemeName, MM};

/// Slack for float accumulation when comparing against the bottom margin.
const FIT_EPSILON: f32 = 0.01;

/// A fixed-size page rectangle with margins, in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin_left: f32,
    pub margin_right: f32,
    /// Where body content starts (below the running header).
    pub margin_top: f32,
    /// Automatic page-break margin.
    pub margin_bottom: f32,
}

impl PageGeometry {
    pub const A4_WIDTH: f32 = 595.28;
    pub const A4_HEIGHT: f32 = 841.89;

    /// Law-firm layout: 20 mm sides, 28 mm break margin.
    pub fn a4_formal() -> Self {
        Self {
            width: Self::A4_WIDTH,
            height: Self::A4_HEIGHT,
            margin_left: 20.0 * MM,
            margin_right: 20.0 * MM,
            margin_top: 20.0 * MM,
            margin_bottom: 28.0 * MM,
        }
    }

    /// Guide layout: 10 mm sides, 25 mm break margin.
    pub fn a4_guide() -> Self {
        Self {
            width: Self::A4_WIDTH,
            height: Self::A4_HEIGHT,
            margin_left: 10.0 * MM,
            margin_right: 10.0 * MM,
            margin_top: 22.0 * MM,
            margin_bottom: 25.0 * MM,
        }
    }

    pub fn for_theme(theme: ThemeName) -> Self {
        match theme {
            ThemeName::Formal => Self::a4_formal(),
            ThemeName::Guide => Self::a4_guide(),
        }
    }

    /// Same margins on a page of a different size.
    pub fn with_page_size(self, width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ..self
        }
    }

    pub fn content_width(&self) -> f32 {
        self.width - self.margin_left - self.margin_right
    }

    pub fn content_left(&self) -> f32 {
        self.margin_left
    }

    pub fn content_right(&self) -> f32 {
        self.width - self.margin_right
    }

    pub fn content_top(&self) -> f32 {
        self.margin_top
    }

    /// Lowest y a block may reach before a break is forced.
    pub fn content_bottom(&self) -> f32 {
        self.height - self.margin_bottom
    }

    pub fn content_height(&self) -> f32 {
        self.content_bottom() - self.content_top()
    }
}

/// The composer's drawing position on the current page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cursor {
    pub x: f32,
    pub y: f32,
}

impl Cursor {
    /// Top-left of the content box.
    pub fn home(geometry: &PageGeometry) -> Self {
        Self {
            x: geometry.content_left(),
            y: geometry.content_top(),
        }
    }

    /// Height left between the cursor and the break margin.
    pub fn remaining(&self, geometry: &PageGeometry) -> f32 {
        (geometry.content_bottom() - self.y).max(0.0)
    }

    /// Whether a block of `height` fits without a page break.
    pub fn fits(&self, height: f32, geometry: &PageGeometry) -> bool {
        self.y + height <= geometry.content_bottom() + FIT_EPSILON
    }

    /// True when nothing has been placed on the page yet.
    pub fn at_top(&self, geometry: &PageGeometry) -> bool {
        (self.y - geometry.content_top()).abs() < FIT_EPSILON
    }

    pub fn advance(&mut self, dy: f32) {
        self.y += dy;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formal_content_width_is_170mm() {
        let g = PageGeometry::a4_formal();
        assert!((g.content_width() - 170.0 * MM).abs() < 0.05);
    }

    #[test]
    fn cursor_fit_boundary() {
        let g = PageGeometry {
            width: 600.0,
            height: 800.0,
            margin_left: 50.0,
            margin_right: 50.0,
            margin_top: 100.0,
            margin_bottom: 100.0,
        };
        let mut c = Cursor::home(&g);
        assert!(c.at_top(&g));
        assert_eq!(g.content_height(), 600.0);
        c.advance(550.0);
        assert_eq!(c.remaining(&g), 50.0);
        assert!(c.fits(50.0, &g));
        assert!(!c.fits(50.5, &g));
    }
}
