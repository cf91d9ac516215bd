//! Composer – places blocks on pages behind a moving cursor.
//!
//! The composer owns the only mutable drawing state of a document: the
//! page list and the cursor. Each block is measured before it is drawn;
//! when it would cross the bottom break margin a new page is opened first
//! (closing the previous one with its footer). Running chrome is stamped
//! as pages open and close, and [`Composer::finish`] resolves the page
//! count placeholders in one pass once the total is known.

use serde::{Deserialize, Serialize};

use crate::blocks::{Block, RuleBlock, Table, TextBlock};
use crate::chrome::{draw_footer, draw_header, DocumentMeta};
use crate::error::{Error, Result};
use crate::fonts::FontManager;
use crate::layout_config::{LayoutConfig, PageLayout};
use crate::pagination::{Cursor, PageGeometry};
use crate::style::{BlockStyle, SeparatorStyle, TextAlign, TextStyle, Theme, MM};

/// Title page content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cover {
    pub title_lines: Vec<String>,
    #[serde(default)]
    pub subtitle_lines: Vec<String>,
    /// Centred metadata list; empty strings leave a blank line.
    #[serde(default)]
    pub meta_lines: Vec<String>,
}

/// Place and dates of the certification block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signature {
    pub place: String,
    /// French date, e.g. "22 février 2026".
    pub date_fr: String,
    /// English date, e.g. "February 22, 2026".
    pub date_en: String,
}

pub struct Composer<'f> {
    meta: DocumentMeta,
    theme: Theme,
    geometry: PageGeometry,
    fonts: &'f FontManager,
    layout: LayoutConfig,
    cursor: Cursor,
}

impl<'f> Composer<'f> {
    pub fn new(meta: DocumentMeta, theme: Theme, geometry: PageGeometry, fonts: &'f FontManager) -> Self {
        let mut layout = LayoutConfig::a4(&meta.title);
        layout.page_width_pt = geometry.width;
        layout.page_height_pt = geometry.height;
        Self {
            cursor: Cursor::home(&geometry),
            meta,
            theme,
            geometry,
            fonts,
            layout,
        }
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn page_count(&self) -> usize {
        self.layout.pages.len()
    }

    pub fn pages(&self) -> &[PageLayout] {
        &self.layout.pages
    }

    /// Height left on the current page before the break margin.
    pub fn remaining_height(&self) -> f32 {
        self.cursor.remaining(&self.geometry)
    }

    // -----------------------------------------------------------------------
    // Pages
    // -----------------------------------------------------------------------

    /// Close the current page (footer) and open a new one (header).
    pub fn add_page(&mut self) {
        self.open_page(false);
    }

    fn open_page(&mut self, suppress_header: bool) {
        if let Some(page) = self.layout.pages.last_mut() {
            draw_footer(page, &self.meta, &self.theme, &self.geometry);
        }
        let mut page = PageLayout::new(self.layout.pages.len());
        page.header_suppressed = suppress_header;
        if !suppress_header {
            draw_header(&mut page, &self.meta, &self.theme, &self.geometry);
        }
        log::debug!("'{}': opened page {}", self.meta.reference, page.page_no());
        self.layout.pages.push(page);
        self.cursor = Cursor::home(&self.geometry);
    }

    // -----------------------------------------------------------------------
    // Block placement
    // -----------------------------------------------------------------------

    /// Measure, break the page if needed, draw, advance.
    pub fn draw_block(&mut self, block: &Block) {
        if self.layout.pages.is_empty() {
            self.add_page();
        }
        let width = self.geometry.content_width();
        let height = block.height(width, self.fonts);

        if !self.cursor.fits(height, &self.geometry) {
            if let Block::Text(text) = block {
                if height > self.geometry.content_height() {
                    let pieces = text.split_lines(width, self.fonts);
                    if pieces.len() > 1 {
                        for piece in pieces {
                            self.draw_block(&Block::Text(piece));
                        }
                        return;
                    }
                }
            }
            if !self.cursor.at_top(&self.geometry) {
                self.add_page();
            }
        }
        self.place(block, height);
    }

    /// Draw at the cursor without a fit check.
    fn place(&mut self, block: &Block, height: f32) {
        let width = self.geometry.content_width();
        let origin = self.cursor;
        if let Some(page) = self.layout.pages.last_mut() {
            block.draw(page, origin, width, self.fonts);
        }
        self.cursor.advance(height + block.spacing());
    }

    fn place_unchecked(&mut self, block: Block) {
        let height = block.height(self.geometry.content_width(), self.fonts);
        self.place(&block, height);
    }

    /// Move the cursor down without drawing. Never breaks the page; the
    /// next block does if the gap pushed the cursor past the margin.
    pub fn space(&mut self, dy: f32) {
        self.cursor.advance(dy);
    }

    /// Header row, then each data row paginated on its own.
    pub fn draw_table(&mut self, table: &Table) {
        let style = self.theme.table.clone();
        let widths = table.column_widths(self.geometry.content_width());
        self.draw_block(&Block::Row(table.header_row(&style, &widths)));
        for index in 0..table.rows.len() {
            self.draw_block(&Block::Row(table.data_row(index, &style, &widths)));
        }
        self.space(style.space_after);
    }

    // -----------------------------------------------------------------------
    // Composite blocks
    // -----------------------------------------------------------------------

    /// Full-page title block. Must be the first thing drawn; its page
    /// never carries the running header.
    pub fn cover(&mut self, cover: &Cover) -> Result<()> {
        if !self.layout.pages.is_empty() {
            return Err(Error::Composition(format!(
                "cover must open the document, but {} page(s) already exist",
                self.layout.pages.len()
            )));
        }
        self.open_page(true);

        let style = self.theme.cover.clone();
        let centred = |text: &str, text_style: TextStyle| {
            Block::Text(
                TextBlock::new(text, BlockStyle { text: text_style, space_before: 0.0, space_after: 0.0 })
                    .aligned(TextAlign::Center),
            )
        };

        self.space(style.top_gap);
        if let Some(rule) = style.frame_rule {
            let sep = SeparatorStyle { rule, space_before: 0.0, space_after: style.after_frame };
            self.place_unchecked(Block::Rule(RuleBlock::full(sep)));
        }

        let brand = self.meta.brand.to_uppercase();
        self.place_unchecked(centred(&brand, style.brand));
        self.space(style.after_brand);
        let accent = SeparatorStyle {
            rule: style.accent_rule,
            space_before: 0.0,
            space_after: style.after_accent,
        };
        self.place_unchecked(Block::Rule(RuleBlock::short(accent, style.accent_width, true)));

        for line in &cover.title_lines {
            self.place_unchecked(centred(line, style.title));
        }
        self.space(style.after_titles);
        for line in &cover.subtitle_lines {
            self.place_unchecked(centred(line, style.subtitle));
        }
        self.space(style.after_subtitles);

        if let Some(rule) = style.meta_rule {
            let sep = SeparatorStyle { rule, space_before: 0.0, space_after: style.after_meta_rule };
            self.place_unchecked(Block::Rule(RuleBlock::full(sep)));
        }
        for line in &cover.meta_lines {
            self.place_unchecked(centred(line, style.meta));
        }
        self.space(style.after_meta);
        if let Some(rule) = style.frame_rule {
            let sep = SeparatorStyle { rule, space_before: 0.0, space_after: 0.0 };
            self.place_unchecked(Block::Rule(RuleBlock::full(sep)));
        }
        Ok(())
    }

    /// Top-level division: always starts a new page.
    pub fn section_title(&mut self, text: &str) {
        self.add_page();
        let text = if self.theme.section_uppercase {
            text.to_uppercase()
        } else {
            text.to_string()
        };
        let block = TextBlock::new(text, self.theme.section).underlined(self.theme.section_rule);
        self.draw_block(&Block::Text(block));
    }

    /// Rule, bilingual place/date lines, signature line and caption, kept
    /// together on one page.
    pub fn signature_block(&mut self, signature: &Signature) {
        let theme = &self.theme;
        let sig = &theme.signature;
        let body = |text: String| Block::Text(TextBlock::new(text, theme.body));

        let block = Block::Group(vec![
            Block::Space(8.0 * MM),
            Block::Rule(RuleBlock::full(SeparatorStyle {
                rule: sig.rule,
                space_before: 0.0,
                space_after: 6.0 * MM,
            })),
            body(format!("Fait à {}, le {}.", signature.place, signature.date_fr)),
            body(format!("Done at {}, on {}.", signature.place, signature.date_en)),
            Block::Space(4.0 * MM),
            body(format!("Pour / For {}", self.meta.brand.to_uppercase())),
            Block::Space(12.0 * MM),
            Block::Rule(RuleBlock::short(
                SeparatorStyle {
                    rule: sig.line,
                    space_before: 0.0,
                    space_after: 2.0 * MM,
                },
                sig.line_width,
                false,
            )),
            Block::Text(TextBlock::new(
                "Signature autorisée / Authorized Signature",
                theme.fine,
            )),
        ]);
        self.draw_block(&block);
    }

    /// Separator, heading and one body line per contact detail.
    pub fn contact_block(&mut self, heading: &str, lines: &[String]) {
        self.separator();
        self.sub_heading(heading);
        for line in lines {
            self.body(line);
        }
    }

    // -----------------------------------------------------------------------
    // Role helpers
    // -----------------------------------------------------------------------

    /// Part heading inside a section, with a rule above in the formal theme.
    pub fn part_title(&mut self, text: &str) {
        let mut block = TextBlock::new(text, self.theme.part);
        if let Some((rule, gap)) = self.theme.part_rule {
            block = block.with_rule_above(rule, gap);
        }
        self.draw_block(&Block::Text(block));
    }

    pub fn article_title(&mut self, text: &str) {
        self.text(text, self.theme.article);
    }

    pub fn sub_heading(&mut self, text: &str) {
        self.text(text, self.theme.subheading);
    }

    pub fn body(&mut self, text: &str) {
        self.text(text, self.theme.body);
    }

    /// Secondary-language or de-emphasised paragraph.
    pub fn muted(&mut self, text: &str) {
        self.text(text, self.theme.muted);
    }

    pub fn legal_note(&mut self, text: &str) {
        self.text(text, self.theme.note);
    }

    pub fn warning(&mut self, text: &str) {
        self.text(text, self.theme.warning);
    }

    pub fn fine_print(&mut self, text: &str) {
        self.text(text, self.theme.fine);
    }

    pub fn bullet(&mut self, text: &str) {
        let block = TextBlock::new(format!("{}{text}", self.theme.bullet_prefix), self.theme.bullet)
            .indented(self.theme.bullet_indent);
        self.draw_block(&Block::Text(block));
    }

    pub fn numbered(&mut self, number: &str, text: &str) {
        let block = TextBlock::new(text, self.theme.numbered)
            .indented(self.theme.numbered_indent)
            .labelled(format!("  {number}."));
        self.draw_block(&Block::Text(block));
    }

    /// Bulleted primary line with its translation underneath, kept together.
    pub fn item(&mut self, primary: &str, secondary: &str) {
        let mut first = self.theme.body;
        first.space_after = 0.0;
        let mut second = self.theme.muted;
        second.space_after = self.theme.item_gap;
        let block = Block::Group(vec![
            Block::Text(TextBlock::new(format!("{}{primary}", self.theme.bullet_prefix), first)),
            Block::Text(TextBlock::new(format!("     {secondary}"), second)),
        ]);
        self.draw_block(&block);
    }

    pub fn separator(&mut self) {
        self.draw_block(&Block::Rule(RuleBlock::full(self.theme.separator)));
    }

    pub fn heavy_separator(&mut self) {
        self.draw_block(&Block::Rule(RuleBlock::full(self.theme.heavy_separator)));
    }

    fn text(&mut self, text: &str, style: BlockStyle) {
        self.draw_block(&Block::Text(TextBlock::new(text, style)));
    }

    // -----------------------------------------------------------------------
    // Finalisation
    // -----------------------------------------------------------------------

    /// Close the last page, substitute the page count everywhere and hand
    /// back the frozen layout. Consumes the composer: nothing can be drawn
    /// afterwards.
    pub fn finish(mut self) -> LayoutConfig {
        if self.layout.pages.is_empty() {
            self.add_page();
        }
        if let Some(page) = self.layout.pages.last_mut() {
            draw_footer(page, &self.meta, &self.theme, &self.geometry);
        }
        self.layout.resolve_page_aliases();
        log::info!(
            "Composed '{}' ({}): {} page(s)",
            self.meta.title,
            self.meta.reference,
            self.layout.pages.len()
        );
        self.layout
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout_config::{Layer, Mark, Phase};
    use crate::style::Color;

    fn meta() -> DocumentMeta {
        DocumentMeta {
            brand: "Bazary".into(),
            reference: "BZR-UNIT-001".into(),
            title: "Unit".into(),
            site: "www.bazary.mg".into(),
            confidential: false,
        }
    }

    /// 600 pt of content height, top at 100, bottom at 700.
    fn square_geometry() -> PageGeometry {
        PageGeometry {
            width: 600.0,
            height: 800.0,
            margin_left: 50.0,
            margin_right: 50.0,
            margin_top: 100.0,
            margin_bottom: 100.0,
        }
    }

    fn tall_line(height: f32, after: f32) -> Block {
        Block::Text(TextBlock::new(
            "x",
            BlockStyle {
                text: TextStyle {
                    size: 10.0,
                    bold: false,
                    color: Color::BLACK,
                    line_height: height,
                },
                space_before: 0.0,
                space_after: after,
            },
        ))
    }

    #[test]
    fn first_block_opens_a_page() {
        let fonts = FontManager::default();
        let mut c = Composer::new(meta(), Theme::formal(), square_geometry(), &fonts);
        assert_eq!(c.page_count(), 0);
        c.draw_block(&tall_line(20.0, 0.0));
        assert_eq!(c.page_count(), 1);
        assert_eq!(c.cursor().y, 120.0);
    }

    #[test]
    fn fitting_block_advances_by_height_plus_spacing() {
        let fonts = FontManager::default();
        let mut c = Composer::new(meta(), Theme::formal(), square_geometry(), &fonts);
        c.draw_block(&tall_line(550.0, 0.0));
        assert_eq!(c.remaining_height(), 50.0);
        c.draw_block(&tall_line(20.0, 5.0));
        assert_eq!(c.page_count(), 1);
        assert_eq!(c.cursor().y, 100.0 + 550.0 + 20.0 + 5.0);
    }

    #[test]
    fn overflowing_block_breaks_first() {
        let fonts = FontManager::default();
        let mut c = Composer::new(meta(), Theme::formal(), square_geometry(), &fonts);
        c.draw_block(&tall_line(550.0, 0.0));
        c.draw_block(&tall_line(60.0, 0.0));
        assert_eq!(c.page_count(), 2);
        assert_eq!(c.cursor().y, 160.0);
        // The closed page got its footer.
        assert!(c.pages()[0].count_layer(Layer::Footer) > 0);
        assert_eq!(c.pages()[1].count_layer(Layer::Footer), 0);
    }

    #[test]
    fn oversize_paragraph_flows_across_pages() {
        let fonts = FontManager::default();
        let mut c = Composer::new(meta(), Theme::formal(), square_geometry(), &fonts);
        let style = BlockStyle {
            text: TextStyle {
                size: 10.0,
                bold: false,
                color: Color::BLACK,
                line_height: 100.0,
            },
            space_before: 0.0,
            space_after: 0.0,
        };
        // Ten explicit lines of 100 pt: 1000 pt against 600 pt pages.
        let text = vec!["line"; 10].join("\n");
        c.draw_block(&Block::Text(TextBlock::new(text, style)));
        assert_eq!(c.page_count(), 2);
        assert_eq!(c.cursor().y, 100.0 + 400.0);
    }

    #[test]
    fn section_title_always_breaks() {
        let fonts = FontManager::default();
        let mut c = Composer::new(meta(), Theme::formal(), PageGeometry::a4_formal(), &fonts);
        c.body("short");
        assert!(c.remaining_height() > 500.0);
        c.section_title("Article 1");
        assert_eq!(c.page_count(), 2);
        let heading = c.pages()[1]
            .text_runs()
            .find(|t| t.layer == Layer::Body)
            .unwrap();
        assert_eq!(heading.text, "ARTICLE 1");
    }

    #[test]
    fn cover_after_content_is_rejected() {
        let fonts = FontManager::default();
        let mut c = Composer::new(meta(), Theme::formal(), PageGeometry::a4_formal(), &fonts);
        c.body("too early");
        let err = c.cover(&Cover::default()).unwrap_err();
        assert!(matches!(err, Error::Composition(_)));
    }

    #[test]
    fn cover_suppresses_header_but_keeps_footer() {
        let fonts = FontManager::default();
        let mut c = Composer::new(meta(), Theme::formal(), PageGeometry::a4_formal(), &fonts);
        c.cover(&Cover {
            title_lines: vec!["Terms of Use".into()],
            subtitle_lines: vec!["Conditions Générales".into()],
            meta_lines: vec!["Ref".into(), String::new(), "Date".into()],
        })
        .unwrap();
        let layout = c.finish();
        let cover = &layout.pages[0];
        assert!(cover.header_suppressed);
        assert_eq!(cover.count_layer(Layer::Header), 0);
        assert!(cover.count_layer(Layer::Footer) > 0);
        let brand = cover.text_runs().find(|t| t.layer == Layer::Body).unwrap();
        assert_eq!(brand.text, "BAZARY");
        assert_eq!(brand.align, TextAlign::Center);
    }

    #[test]
    fn table_rows_paginate_individually() {
        let fonts = FontManager::default();
        let mut c = Composer::new(meta(), Theme::formal(), square_geometry(), &fonts);
        let row_h = c.theme().table.row_height;
        let header_h = c.theme().table.header_height;
        // Leave room for the header and exactly one data row.
        c.draw_block(&tall_line(600.0 - header_h - row_h, 0.0));
        let table = Table::new(
            vec!["A".into(), "B".into()],
            vec![vec!["1".into(), "2".into()], vec!["3".into(), "4".into()]],
        );
        c.draw_table(&table);
        assert_eq!(c.page_count(), 2);
        let second_page_cells: Vec<&str> = c.pages()[1]
            .text_runs()
            .filter(|t| t.layer == Layer::Body)
            .map(|t| t.text.as_str())
            .collect();
        assert_eq!(second_page_cells, vec!["3", "4"]);
    }

    #[test]
    fn finish_resolves_every_footer() {
        let fonts = FontManager::default();
        let mut c = Composer::new(meta(), Theme::formal(), square_geometry(), &fonts);
        for _ in 0..3 {
            c.draw_block(&tall_line(400.0, 0.0));
        }
        let layout = c.finish();
        assert_eq!(layout.phase, Phase::Finalized);
        assert_eq!(layout.pages.len(), 3);
        for page in &layout.pages {
            let footer = page
                .text_runs()
                .filter(|t| t.layer == Layer::Footer)
                .last()
                .unwrap();
            assert_eq!(footer.text, format!("Page {} / 3", page.page_no()));
        }
    }

    #[test]
    fn uniform_blocks_fill_ceil_pages() {
        let fonts = FontManager::default();
        let mut c = Composer::new(meta(), Theme::formal(), square_geometry(), &fonts);
        // 10 × 150 pt against 600 pt pages: four per page, three pages.
        for _ in 0..10 {
            c.draw_block(&tall_line(150.0, 0.0));
        }
        let layout = c.finish();
        assert_eq!(layout.pages.len(), 3);
        let last = layout.pages[2]
            .text_runs()
            .filter(|t| t.layer == Layer::Footer)
            .last()
            .unwrap();
        assert_eq!(last.text, "Page 3 / 3");
    }

    #[test]
    fn empty_document_still_has_one_page() {
        let fonts = FontManager::default();
        let c = Composer::new(meta(), Theme::guide(), PageGeometry::a4_guide(), &fonts);
        let layout = c.finish();
        assert_eq!(layout.pages.len(), 1);
        let rules = layout.pages[0]
            .marks
            .iter()
            .filter(|m| matches!(m, Mark::Rule(_)))
            .count();
        // Guide header rule only; the guide footer has no rule.
        assert_eq!(rules, 1);
    }
}
