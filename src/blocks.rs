//! Blocks – measurable units of content.
//!
//! Every block answers two questions before it is placed: how tall it is
//! at a given width, and how much space trails it. Drawing is always
//! relative to the origin the composer hands in; blocks never pick page
//! coordinates themselves.

use crate::fonts::{wrap_text, FontManager};
use crate::layout_config::{Layer, Mark, PageLayout, RectMark, RuleMark, TextRun, CELL_PADDING};
use crate::pagination::Cursor;
use crate::style::{
    BlockStyle, Color, RuleStyle, SeparatorStyle, TableStyle, TextAlign, TextStyle, MM,
};

/// Gap between a heading's last line and its underline rule.
const UNDERLINE_GAP: f32 = 1.0 * MM;

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// Title, paragraph, bullet or numbered item.
    Text(TextBlock),
    /// Separator or decorative rule.
    Rule(RuleBlock),
    /// Fixed vertical gap.
    Space(f32),
    /// One table row (header or data).
    Row(RowBlock),
    /// Children kept together on one page (signature block, item pairs).
    Group(Vec<Block>),
}

/// Wrapped text with optional gutter label and decorative rules.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub text: String,
    pub style: BlockStyle,
    pub align: TextAlign,
    /// Left inset of the text column.
    pub indent: f32,
    /// Drawn in the gutter left of the text (numbered paragraphs).
    pub label: Option<String>,
    /// Rule above the text and the gap between that rule and the text.
    pub rule_above: Option<(RuleStyle, f32)>,
    /// Underline rule below the last line.
    pub rule_below: Option<RuleStyle>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RuleBlock {
    pub style: SeparatorStyle,
    /// Rule length; full content width when `None`.
    pub length: Option<f32>,
    pub centered: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RowBlock {
    pub cells: Vec<String>,
    pub widths: Vec<f32>,
    pub height: f32,
    pub text: TextStyle,
    pub fill: Color,
    pub border: RuleStyle,
    pub align: TextAlign,
}

/// A table as handed to the composer.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Column widths in points; `None` splits the content width evenly.
    pub widths: Option<Vec<f32>>,
}

impl Block {
    /// Vertical space the block occupies, excluding trailing spacing.
    pub fn height(&self, width: f32, fonts: &FontManager) -> f32 {
        match self {
            Block::Text(t) => t.height(width, fonts),
            Block::Rule(r) => r.style.space_before,
            Block::Space(h) => *h,
            Block::Row(r) => r.height,
            Block::Group(children) => {
                let mut total = 0.0;
                for (i, child) in children.iter().enumerate() {
                    total += child.height(width, fonts);
                    if i + 1 < children.len() {
                        total += child.spacing();
                    }
                }
                total
            }
        }
    }

    /// Space left below the block before the next one starts.
    pub fn spacing(&self) -> f32 {
        match self {
            Block::Text(t) => t.style.space_after,
            Block::Rule(r) => r.style.space_after,
            Block::Space(_) | Block::Row(_) => 0.0,
            Block::Group(children) => children.last().map(Block::spacing).unwrap_or(0.0),
        }
    }

    /// Emit marks for this block with its top-left at `origin`.
    pub fn draw(&self, page: &mut PageLayout, origin: Cursor, width: f32, fonts: &FontManager) {
        match self {
            Block::Text(t) => t.draw(page, origin, width, fonts),
            Block::Rule(r) => r.draw(page, origin, width),
            Block::Space(_) => {}
            Block::Row(r) => r.draw(page, origin),
            Block::Group(children) => {
                let mut at = origin;
                for child in children {
                    child.draw(page, at, width, fonts);
                    at.advance(child.height(width, fonts) + child.spacing());
                }
            }
        }
    }
}

impl TextBlock {
    pub fn new(text: impl Into<String>, style: BlockStyle) -> Self {
        Self {
            text: text.into(),
            style,
            align: TextAlign::Left,
            indent: 0.0,
            label: None,
            rule_above: None,
            rule_below: None,
        }
    }

    pub fn aligned(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }

    pub fn indented(mut self, indent: f32) -> Self {
        self.indent = indent;
        self
    }

    pub fn labelled(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_rule_above(mut self, rule: RuleStyle, gap: f32) -> Self {
        self.rule_above = Some((rule, gap));
        self
    }

    pub fn underlined(mut self, rule: RuleStyle) -> Self {
        self.rule_below = Some(rule);
        self
    }

    fn column_width(&self, width: f32) -> f32 {
        width - self.indent
    }

    /// Wrapped lines at the given block width.
    pub fn lines(&self, width: f32, fonts: &FontManager) -> Vec<String> {
        let max = self.column_width(width) - 2.0 * CELL_PADDING;
        wrap_text(&self.text, &self.style.text, max, fonts)
    }

    pub fn height(&self, width: f32, fonts: &FontManager) -> f32 {
        let lines = self.lines(width, fonts).len() as f32;
        let mut h = self.style.space_before + lines * self.style.text.line_height;
        if let Some((_, gap)) = self.rule_above {
            h += gap;
        }
        if self.rule_below.is_some() {
            h += UNDERLINE_GAP;
        }
        h
    }

    /// Break into one block per wrapped line so an oversize paragraph can
    /// flow across pages. Leading decoration stays on the first piece,
    /// trailing decoration and spacing on the last.
    pub fn split_lines(&self, width: f32, fonts: &FontManager) -> Vec<TextBlock> {
        let lines = self.lines(width, fonts);
        let last = lines.len().saturating_sub(1);
        lines
            .into_iter()
            .enumerate()
            .map(|(i, line)| {
                let mut style = self.style;
                if i > 0 {
                    style.space_before = 0.0;
                }
                if i < last {
                    style.space_after = 0.0;
                }
                TextBlock {
                    text: line,
                    style,
                    align: self.align,
                    indent: self.indent,
                    label: if i == 0 { self.label.clone() } else { None },
                    rule_above: if i == 0 { self.rule_above } else { None },
                    rule_below: if i == last { self.rule_below } else { None },
                }
            })
            .collect()
    }

    fn draw(&self, page: &mut PageLayout, origin: Cursor, width: f32, fonts: &FontManager) {
        let line_height = self.style.text.line_height;
        let mut y = origin.y + self.style.space_before;

        if let Some((rule, gap)) = self.rule_above {
            page.marks.push(rule_mark(origin.x, origin.x + width, y, rule));
            y += gap;
        }

        if let Some(label) = &self.label {
            page.marks.push(Mark::Text(TextRun {
                layer: Layer::Body,
                text: label.clone(),
                x: origin.x,
                y,
                width: self.indent,
                height: line_height,
                style: self.style.text,
                align: TextAlign::Left,
            }));
        }

        let lines = self.lines(width, fonts);
        for line in &lines {
            if !line.is_empty() {
                page.marks.push(Mark::Text(TextRun {
                    layer: Layer::Body,
                    text: line.clone(),
                    x: origin.x + self.indent,
                    y,
                    width: self.column_width(width),
                    height: line_height,
                    style: self.style.text,
                    align: self.align,
                }));
            }
            y += line_height;
        }

        if let Some(rule) = self.rule_below {
            y += UNDERLINE_GAP;
            page.marks.push(rule_mark(origin.x, origin.x + width, y, rule));
        }
    }
}

impl RuleBlock {
    pub fn full(style: SeparatorStyle) -> Self {
        Self {
            style,
            length: None,
            centered: false,
        }
    }

    pub fn short(style: SeparatorStyle, length: f32, centered: bool) -> Self {
        Self {
            style,
            length: Some(length),
            centered,
        }
    }

    fn draw(&self, page: &mut PageLayout, origin: Cursor, width: f32) {
        let length = self.length.unwrap_or(width).min(width);
        let x1 = if self.centered {
            origin.x + (width - length) / 2.0
        } else {
            origin.x
        };
        let y = origin.y + self.style.space_before;
        page.marks.push(rule_mark(x1, x1 + length, y, self.style.rule));
    }
}

impl RowBlock {
    fn draw(&self, page: &mut PageLayout, origin: Cursor) {
        let mut x = origin.x;
        for (cell, width) in self.cells.iter().zip(&self.widths) {
            page.marks.push(Mark::Rect(RectMark {
                layer: Layer::Body,
                x,
                y: origin.y,
                width: *width,
                height: self.height,
                fill: Some(self.fill),
                border: Some(self.border),
            }));
            if !cell.is_empty() {
                page.marks.push(Mark::Text(TextRun {
                    layer: Layer::Body,
                    text: cell.clone(),
                    x,
                    y: origin.y,
                    width: *width,
                    height: self.height,
                    style: self.text,
                    align: self.align,
                }));
            }
            x += width;
        }
    }
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            headers,
            rows,
            widths: None,
        }
    }

    pub fn with_widths(mut self, widths: Vec<f32>) -> Self {
        self.widths = Some(widths);
        self
    }

    /// Explicit widths, or the available width divided evenly.
    pub fn column_widths(&self, available: f32) -> Vec<f32> {
        match &self.widths {
            Some(w) if !w.is_empty() => w.clone(),
            _ => {
                let n = self.headers.len().max(1);
                vec![available / n as f32; n]
            }
        }
    }

    /// Inverted-colour header row.
    pub fn header_row(&self, style: &TableStyle, widths: &[f32]) -> RowBlock {
        RowBlock {
            cells: self.headers.clone(),
            widths: widths.to_vec(),
            height: style.header_height,
            text: style.header,
            fill: style.header_fill,
            border: RuleStyle {
                color: style.header_border,
                thickness: style.border_width,
            },
            align: TextAlign::Center,
        }
    }

    /// Data row `index`, filled with the primary colour on even indices and
    /// the alternate colour on odd ones.
    pub fn data_row(&self, index: usize, style: &TableStyle, widths: &[f32]) -> RowBlock {
        RowBlock {
            cells: self.rows[index].clone(),
            widths: widths.to_vec(),
            height: style.row_height,
            text: style.cell,
            fill: if index % 2 == 1 { style.alt_fill } else { style.row_fill },
            border: RuleStyle {
                color: style.row_border,
                thickness: style.border_width,
            },
            align: TextAlign::Left,
        }
    }
}

fn rule_mark(x1: f32, x2: f32, y: f32, rule: RuleStyle) -> Mark {
    Mark::Rule(RuleMark {
        layer: Layer::Body,
        x1,
        y1: y,
        x2,
        y2: y,
        rule,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::Theme;

    fn body() -> BlockStyle {
        BlockStyle {
            text: TextStyle {
                size: 10.0,
                bold: false,
                color: Color::BLACK,
                line_height: 12.0,
            },
            space_before: 3.0,
            space_after: 4.0,
        }
    }

    #[test]
    fn text_height_counts_lines_and_leading_space() {
        let fonts = FontManager::default();
        let block = Block::Text(TextBlock::new("one two three four five six", body()));
        // Wide enough for one line.
        assert_eq!(block.height(1000.0, &fonts), 3.0 + 12.0);
        assert_eq!(block.spacing(), 4.0);
        // 5 pt per char, ~40 pt usable: forces several lines.
        let narrow = block.height(40.0 + 2.0 * CELL_PADDING, &fonts);
        assert!(narrow > 3.0 + 2.0 * 12.0);
    }

    #[test]
    fn underline_sits_below_last_line() {
        let fonts = FontManager::default();
        let rule = RuleStyle::new(Color::BLACK, 0.8);
        let block = TextBlock::new("Heading", body()).underlined(rule);
        let mut page = PageLayout::new(0);
        block.draw(&mut page, Cursor { x: 10.0, y: 100.0 }, 200.0, &fonts);
        let Some(Mark::Rule(r)) = page.marks.last() else {
            panic!("expected trailing rule");
        };
        assert!((r.y1 - (100.0 + 3.0 + 12.0 + UNDERLINE_GAP)).abs() < 0.01);
        assert_eq!(r.x2 - r.x1, 200.0);
    }

    #[test]
    fn split_lines_keeps_decoration_at_the_ends() {
        let fonts = FontManager::default();
        let block = TextBlock::new("aaaa bbbb cccc dddd", body()).labelled("1.");
        let pieces = block.split_lines(20.0 + 2.0 * CELL_PADDING, &fonts);
        assert_eq!(pieces.len(), 4);
        assert_eq!(pieces[0].label.as_deref(), Some("1."));
        assert_eq!(pieces[0].style.space_after, 0.0);
        assert!(pieces[1].label.is_none());
        assert_eq!(pieces[1].style.space_before, 0.0);
        assert_eq!(pieces[3].style.space_after, 4.0);
    }

    #[test]
    fn group_height_includes_inner_spacing_only() {
        let fonts = FontManager::default();
        let group = Block::Group(vec![
            Block::Space(10.0),
            Block::Text(TextBlock::new("x", body())),
            Block::Text(TextBlock::new("y", body())),
        ]);
        // 10 + (15 + 4) + 15, trailing 4 reported as spacing.
        assert_eq!(group.height(500.0, &fonts), 44.0);
        assert_eq!(group.spacing(), 4.0);
    }

    #[test]
    fn default_widths_split_evenly() {
        let table = Table::new(vec!["A".into(), "B".into(), "C".into()], vec![]);
        assert_eq!(table.column_widths(300.0), vec![100.0, 100.0, 100.0]);
        let fixed = table.clone().with_widths(vec![50.0 * MM, 120.0 * MM]);
        assert_eq!(fixed.column_widths(300.0).len(), 2);
    }

    #[test]
    fn data_rows_alternate_fill() {
        let style = Theme::formal().table;
        let table = Table::new(
            vec!["A".into()],
            vec![vec!["1".into()], vec!["2".into()], vec!["3".into()]],
        );
        let widths = table.column_widths(100.0);
        assert_eq!(table.data_row(0, &style, &widths).fill, style.row_fill);
        assert_eq!(table.data_row(1, &style, &widths).fill, style.alt_fill);
        assert_eq!(table.data_row(2, &style, &widths).fill, style.row_fill);
        assert_eq!(table.header_row(&style, &widths).fill, style.header_fill);
    }
}
