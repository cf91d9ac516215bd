//! Layout config – the page canvas shared by the composer and the renderer.
//! This is the "frozen" structure that encodes exactly what goes on each
//! page, including the unresolved total-page placeholders while the
//! document is still being drafted.

use serde::{Deserialize, Serialize};

use crate::fonts::FontManager;
use crate::style::{Color, RuleStyle, TextAlign, TextStyle, MM};

/// Placeholder written wherever the final page count belongs.
pub const TOTAL_PAGES_ALIAS: &str = "{nb}";

/// Horizontal inset of text inside its cell, in points.
pub const CELL_PADDING: f32 = 1.0 * MM;

/// Where a document is in its two-phase lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Pages are still being appended; footers carry [`TOTAL_PAGES_ALIAS`].
    #[default]
    Drafting,
    /// The page count has been substituted everywhere. Terminal.
    Finalized,
}

/// A complete document layout ready for rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Document title embedded in the PDF metadata.
    pub title: String,
    /// Width of each page in PDF points (1 pt = 1/72 inch).
    pub page_width_pt: f32,
    /// Height of each page in PDF points.
    pub page_height_pt: f32,
    #[serde(default)]
    pub phase: Phase,
    /// Ordered list of pages.
    pub pages: Vec<PageLayout>,
}

/// One page of content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageLayout {
    pub page_index: usize,
    /// Set on the cover: the running header is not drawn here.
    #[serde(default)]
    pub header_suppressed: bool,
    pub marks: Vec<Mark>,
}

/// What part of the page a mark belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    Header,
    Footer,
    Body,
}

/// One drawn primitive, in page coordinates (origin top-left, points).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Mark {
    Text(TextRun),
    Rule(RuleMark),
    Rect(RectMark),
}

/// A single line of text placed in a cell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextRun {
    pub layer: Layer,
    pub text: String,
    /// Cell left edge.
    pub x: f32,
    /// Cell top edge.
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub style: TextStyle,
    #[serde(default)]
    pub align: TextAlign,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleMark {
    pub layer: Layer,
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    pub rule: RuleStyle,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RectMark {
    pub layer: Layer,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub fill: Option<Color>,
    pub border: Option<RuleStyle>,
}

impl Mark {
    pub fn layer(&self) -> Layer {
        match self {
            Mark::Text(t) => t.layer,
            Mark::Rule(r) => r.layer,
            Mark::Rect(r) => r.layer,
        }
    }
}

impl TextRun {
    /// Left edge of the glyphs once alignment inside the cell is applied.
    /// Computed from the current text, so it is only stable after the
    /// page-count placeholders are resolved.
    pub fn origin_x(&self, fonts: &FontManager) -> f32 {
        let text_width = fonts.measure(&self.text, &self.style);
        match self.align {
            TextAlign::Left => self.x + CELL_PADDING,
            TextAlign::Center => self.x + (self.width - text_width) / 2.0,
            TextAlign::Right => self.x + self.width - CELL_PADDING - text_width,
        }
    }

    /// Baseline measured from the page top, vertically centred in the cell.
    pub fn baseline_y(&self) -> f32 {
        self.y + 0.5 * self.height + 0.3 * self.style.size
    }
}

impl PageLayout {
    pub fn new(page_index: usize) -> Self {
        Self {
            page_index,
            header_suppressed: false,
            marks: Vec::new(),
        }
    }

    /// 1-based page number as printed in the footer.
    pub fn page_no(&self) -> usize {
        self.page_index + 1
    }

    pub fn text_runs(&self) -> impl Iterator<Item = &TextRun> {
        self.marks.iter().filter_map(|m| match m {
            Mark::Text(t) => Some(t),
            _ => None,
        })
    }

    /// Number of marks drawn on `layer`.
    pub fn count_layer(&self, layer: Layer) -> usize {
        self.marks.iter().filter(|m| m.layer() == layer).count()
    }
}

impl LayoutConfig {
    /// Create an empty A4 layout config.
    pub fn a4(title: &str) -> Self {
        Self {
            title: title.to_string(),
            // A4: 210mm × 297mm = 595.28 × 841.89 points
            page_width_pt: 595.28,
            page_height_pt: 841.89,
            phase: Phase::Drafting,
            pages: Vec::new(),
        }
    }

    /// Replace every total-page placeholder with the real page count and
    /// move to [`Phase::Finalized`]. Calling it again is a no-op.
    pub fn resolve_page_aliases(&mut self) {
        if self.phase == Phase::Finalized {
            return;
        }
        let total = self.pages.len().to_string();
        let mut substituted = 0usize;
        for page in &mut self.pages {
            for mark in &mut page.marks {
                if let Mark::Text(run) = mark {
                    if run.text.contains(TOTAL_PAGES_ALIAS) {
                        run.text = run.text.replace(TOTAL_PAGES_ALIAS, &total);
                        substituted += 1;
                    }
                }
            }
        }
        log::debug!("Resolved {substituted} page-count placeholders to {total}");
        self.phase = Phase::Finalized;
    }

    /// Serialise to JSON.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Deserialise from JSON.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn footer_run(text: &str) -> Mark {
        Mark::Text(TextRun {
            layer: Layer::Footer,
            text: text.to_string(),
            x: 0.0,
            y: 0.0,
            width: 100.0,
            height: 10.0,
            style: TextStyle {
                size: 10.0,
                bold: false,
                color: Color::BLACK,
                line_height: 10.0,
            },
            align: TextAlign::Right,
        })
    }

    #[test]
    fn aliases_resolve_once() {
        let mut layout = LayoutConfig::a4("t");
        for i in 0..3 {
            let mut page = PageLayout::new(i);
            page.marks.push(footer_run(&format!("Page {} / {TOTAL_PAGES_ALIAS}", i + 1)));
            layout.pages.push(page);
        }
        layout.resolve_page_aliases();
        assert_eq!(layout.phase, Phase::Finalized);
        let texts: Vec<&str> = layout
            .pages
            .iter()
            .flat_map(|p| p.text_runs().map(|t| t.text.as_str()))
            .collect();
        assert_eq!(texts, vec!["Page 1 / 3", "Page 2 / 3", "Page 3 / 3"]);

        // A page added after finalisation is not touched.
        let mut late = PageLayout::new(3);
        late.marks.push(footer_run(TOTAL_PAGES_ALIAS));
        layout.pages.push(late);
        layout.resolve_page_aliases();
        assert_eq!(layout.pages[3].text_runs().next().unwrap().text, TOTAL_PAGES_ALIAS);
    }

    #[test]
    fn right_alignment_tracks_text_width() {
        let fonts = FontManager::default();
        let Mark::Text(run) = footer_run("12345") else {
            unreachable!()
        };
        // 5 chars × 10 × 0.5 = 25 pt wide.
        let x = run.origin_x(&fonts);
        assert!((x - (100.0 - CELL_PADDING - 25.0)).abs() < 0.01);
    }

    #[test]
    fn json_roundtrip_keeps_phase() {
        let mut layout = LayoutConfig::a4("round");
        layout.pages.push(PageLayout::new(0));
        layout.resolve_page_aliases();
        let parsed = LayoutConfig::from_json(&layout.to_json()).unwrap();
        assert_eq!(parsed.phase, Phase::Finalized);
        assert_eq!(parsed.pages.len(), 1);
    }
}
