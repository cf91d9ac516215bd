//! Running header and footer.
//!
//! Both are drawn at fixed page positions, outside the cursor flow. The
//! footer writes [`TOTAL_PAGES_ALIAS`] where the page count belongs; the
//! alias is resolved when the document is finalised.

use serde::{Deserialize, Serialize};

use crate::layout_config::{Layer, Mark, PageLayout, RuleMark, TextRun, TOTAL_PAGES_ALIAS};
use crate::pagination::PageGeometry;
use crate::style::{RuleStyle, TextAlign, TextStyle, Theme, ThemeName, MM};

/// Document-level metadata stamped into every header and footer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMeta {
    pub brand: String,
    /// Document reference, e.g. `BZR-CGU-2026-001`.
    pub reference: String,
    pub title: String,
    /// Site identifier shown in the footer.
    #[serde(default)]
    pub site: String,
    #[serde(default)]
    pub confidential: bool,
}

const CONFIDENTIAL_BANNER: &str = "CONFIDENTIEL / CONFIDENTIAL";

/// Draw the running header on `page`.
pub fn draw_header(page: &mut PageLayout, meta: &DocumentMeta, theme: &Theme, geometry: &PageGeometry) {
    let chrome = &theme.chrome;
    let left = geometry.content_left();
    let width = geometry.content_width();

    match theme.name {
        ThemeName::Formal => {
            push_rule(page, Layer::Header, left, left + width, 10.0 * MM, chrome.header_rule);
            let y = 12.0 * MM;
            let half = width / 2.0;
            push_text(
                page,
                Layer::Header,
                format!("{}  |  {}", meta.brand.to_uppercase(), meta.title),
                (left, y, half, 4.0 * MM),
                chrome.header_text,
                TextAlign::Left,
            );
            push_text(
                page,
                Layer::Header,
                format!("Ref: {}", meta.reference),
                (left + half, y, half, 4.0 * MM),
                chrome.header_text,
                TextAlign::Right,
            );
            if meta.confidential {
                push_text(
                    page,
                    Layer::Header,
                    CONFIDENTIAL_BANNER.to_string(),
                    (left, y + 2.0 * MM, width, 4.0 * MM),
                    chrome.banner,
                    TextAlign::Right,
                );
            }
        }
        ThemeName::Guide => {
            push_text(
                page,
                Layer::Header,
                format!("{} - {}", meta.brand, meta.title),
                (left, 10.0 * MM, width, 8.0 * MM),
                chrome.header_text,
                TextAlign::Right,
            );
            push_rule(page, Layer::Header, left, left + width, 14.0 * MM, chrome.header_rule);
            if meta.confidential {
                push_text(
                    page,
                    Layer::Header,
                    CONFIDENTIAL_BANNER.to_string(),
                    (left, 15.0 * MM, width, 4.0 * MM),
                    chrome.banner,
                    TextAlign::Right,
                );
            }
        }
    }
}

/// Draw the running footer on `page`, with the total page count left as a
/// placeholder.
pub fn draw_footer(page: &mut PageLayout, meta: &DocumentMeta, theme: &Theme, geometry: &PageGeometry) {
    let chrome = &theme.chrome;
    let left = geometry.content_left();
    let width = geometry.content_width();
    let top = geometry.height - 20.0 * MM;
    let page_no = page.page_no();

    match theme.name {
        ThemeName::Formal => {
            if let Some(rule) = chrome.footer_rule {
                push_rule(page, Layer::Footer, left, left + width, top, rule);
            }
            let y = top + 3.0 * MM;
            let third = width / 3.0;
            push_text(
                page,
                Layer::Footer,
                format!("Ref: {}", meta.reference),
                (left, y, third, 4.0 * MM),
                chrome.footer_text,
                TextAlign::Left,
            );
            push_text(
                page,
                Layer::Footer,
                meta.site.clone(),
                (left + third, y, third, 4.0 * MM),
                chrome.footer_text,
                TextAlign::Center,
            );
            push_text(
                page,
                Layer::Footer,
                format!("Page {page_no} / {TOTAL_PAGES_ALIAS}"),
                (left + 2.0 * third, y, third, 4.0 * MM),
                chrome.footer_text,
                TextAlign::Right,
            );
        }
        ThemeName::Guide => {
            if let Some(rule) = chrome.footer_rule {
                push_rule(page, Layer::Footer, left, left + width, top, rule);
            }
            push_text(
                page,
                Layer::Footer,
                format!("Page {page_no}/{TOTAL_PAGES_ALIAS}"),
                (left, top, width, 10.0 * MM),
                chrome.footer_text,
                TextAlign::Center,
            );
        }
    }
}

fn push_text(
    page: &mut PageLayout,
    layer: Layer,
    text: String,
    (x, y, width, height): (f32, f32, f32, f32),
    style: TextStyle,
    align: TextAlign,
) {
    if text.is_empty() {
        return;
    }
    page.marks.push(Mark::Text(TextRun {
        layer,
        text,
        x,
        y,
        width,
        height,
        style,
        align,
    }));
}

fn push_rule(page: &mut PageLayout, layer: Layer, x1: f32, x2: f32, y: f32, rule: RuleStyle) {
    page.marks.push(Mark::Rule(RuleMark {
        layer,
        x1,
        y1: y,
        x2,
        y2: y,
        rule,
    }));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(confidential: bool) -> DocumentMeta {
        DocumentMeta {
            brand: "Bazary".into(),
            reference: "BZR-TEST-001".into(),
            title: "Terms of Use".into(),
            site: "www.bazary.mg".into(),
            confidential,
        }
    }

    fn texts(page: &PageLayout, layer: Layer) -> Vec<String> {
        page.text_runs()
            .filter(|t| t.layer == layer)
            .map(|t| t.text.clone())
            .collect()
    }

    #[test]
    fn formal_header_carries_brand_and_reference() {
        let theme = Theme::formal();
        let mut page = PageLayout::new(1);
        draw_header(&mut page, &meta(false), &theme, &PageGeometry::a4_formal());
        assert_eq!(
            texts(&page, Layer::Header),
            vec!["BAZARY  |  Terms of Use", "Ref: BZR-TEST-001"]
        );
    }

    #[test]
    fn confidential_banner_only_when_flagged() {
        let theme = Theme::formal();
        let mut page = PageLayout::new(1);
        draw_header(&mut page, &meta(true), &theme, &PageGeometry::a4_formal());
        assert!(texts(&page, Layer::Header).iter().any(|t| t == CONFIDENTIAL_BANNER));
    }

    #[test]
    fn footer_leaves_page_total_unresolved() {
        let theme = Theme::formal();
        let mut page = PageLayout::new(2);
        draw_footer(&mut page, &meta(false), &theme, &PageGeometry::a4_formal());
        let footer = texts(&page, Layer::Footer);
        assert_eq!(footer.last().unwrap(), "Page 3 / {nb}");
        assert!(footer.contains(&"www.bazary.mg".to_string()));
    }

    #[test]
    fn guide_footer_is_centred_page_number() {
        let theme = Theme::guide();
        let mut page = PageLayout::new(0);
        draw_footer(&mut page, &meta(false), &theme, &PageGeometry::a4_guide());
        let run = page.text_runs().next().unwrap();
        assert_eq!(run.text, "Page 1/{nb}");
        assert_eq!(run.align, TextAlign::Center);
    }
}
