//! PDF renderer – takes a finalised [`LayoutConfig`] and produces PDF bytes
//! using `printpdf` (v0.8 ops-based API).

use printpdf::*;

use crate::error::{Error, Result};
use crate::fonts::FontManager;
use crate::layout_config::{LayoutConfig, Mark, Phase, RectMark, RuleMark, TextRun};
use crate::style;

/// Text face selected once per document.
enum Face {
    /// Embedded TrueType face (full Unicode).
    Embedded(FontId),
    /// Builtin Helvetica (WinAnsi only).
    Builtin,
}

/// Render a finalised layout into PDF bytes.
///
/// A layout still in [`Phase::Drafting`] is refused: its footers carry the
/// unresolved page-count placeholder.
pub fn render_pdf(config: &LayoutConfig, fonts: &FontManager) -> Result<Vec<u8>> {
    if config.phase != Phase::Finalized {
        return Err(Error::Render(format!(
            "layout '{}' is still drafting; finalise it before rendering",
            config.title
        )));
    }

    let page_w = Mm(config.page_width_pt * 0.352778); // pt → mm
    let page_h = Mm(config.page_height_pt * 0.352778);

    let mut doc = PdfDocument::new(&config.title);

    let face = match fonts.font_bytes(false) {
        Some(bytes) => {
            let mut warnings = Vec::new();
            let parsed = ParsedFont::from_bytes(bytes, 0, &mut warnings)
                .ok_or_else(|| Error::Font("font could not be parsed for embedding".to_string()))?;
            for w in &warnings {
                log::debug!("font warning: {w:?}");
            }
            Face::Embedded(doc.add_font(&parsed))
        }
        None => Face::Builtin,
    };

    let mut pages = Vec::with_capacity(config.pages.len());
    for page_layout in &config.pages {
        let mut ops = Vec::new();
        for mark in &page_layout.marks {
            match mark {
                Mark::Rect(rect) => render_rect(&mut ops, rect, config.page_height_pt),
                Mark::Rule(rule) => render_rule(&mut ops, rule, config.page_height_pt),
                Mark::Text(run) => render_text(&mut ops, run, config.page_height_pt, &face, fonts),
            }
        }
        pages.push(PdfPage::new(page_w, page_h, ops));
    }

    // Ensure at least one page.
    if pages.is_empty() {
        pages.push(PdfPage::new(page_w, page_h, Vec::new()));
    }

    doc.with_pages(pages);
    let bytes = doc.save(&PdfSaveOptions::default(), &mut Vec::new());
    log::debug!("Rendered '{}': {} bytes", config.title, bytes.len());
    Ok(bytes)
}

fn pdf_color(c: style::Color) -> Color {
    Color::Rgb(Rgb {
        r: c.r,
        g: c.g,
        b: c.b,
        icc_profile: None,
    })
}

fn point(x: f32, y: f32) -> LinePoint {
    LinePoint {
        p: Point { x: Pt(x), y: Pt(y) },
        bezier: false,
    }
}

/// Filled and/or stroked cell rectangle.
fn render_rect(ops: &mut Vec<Op>, rect: &RectMark, page_height: f32) {
    // PDF coordinate system: origin at bottom-left.
    let x1 = rect.x;
    let x2 = rect.x + rect.width;
    let y_top = page_height - rect.y;
    let y_bottom = y_top - rect.height;

    if let Some(fill) = rect.fill {
        ops.push(Op::SetFillColor { col: pdf_color(fill) });
        ops.push(Op::DrawPolygon {
            polygon: Polygon {
                rings: vec![PolygonRing {
                    points: vec![
                        point(x1, y_bottom),
                        point(x2, y_bottom),
                        point(x2, y_top),
                        point(x1, y_top),
                    ],
                }],
                mode: PaintMode::Fill,
                winding_order: WindingOrder::NonZero,
            },
        });
    }

    if let Some(border) = rect.border {
        ops.push(Op::SetOutlineColor {
            col: pdf_color(border.color),
        });
        ops.push(Op::SetOutlineThickness {
            pt: Pt(border.thickness),
        });
        ops.push(Op::DrawLine {
            line: Line {
                points: vec![
                    point(x1, y_top),
                    point(x2, y_top),
                    point(x2, y_bottom),
                    point(x1, y_bottom),
                ],
                is_closed: true,
            },
        });
    }
}

fn render_rule(ops: &mut Vec<Op>, rule: &RuleMark, page_height: f32) {
    ops.push(Op::SetOutlineColor {
        col: pdf_color(rule.rule.color),
    });
    ops.push(Op::SetOutlineThickness {
        pt: Pt(rule.rule.thickness),
    });
    ops.push(Op::DrawLine {
        line: Line {
            points: vec![
                point(rule.x1, page_height - rule.y1),
                point(rule.x2, page_height - rule.y2),
            ],
            is_closed: false,
        },
    });
}

fn render_text(ops: &mut Vec<Op>, run: &TextRun, page_height: f32, face: &Face, fonts: &FontManager) {
    if run.text.is_empty() {
        return;
    }
    // Alignment is resolved here so substituted page counts line up.
    let x = run.origin_x(fonts);
    let y = page_height - run.baseline_y();
    let size = Pt(run.style.size);

    ops.push(Op::StartTextSection);
    ops.push(Op::SetTextCursor {
        pos: Point { x: Pt(x), y: Pt(y) },
    });
    ops.push(Op::SetFillColor {
        col: pdf_color(run.style.color),
    });
    match face {
        Face::Embedded(font) => {
            ops.push(Op::SetFontSize {
                size,
                font: font.clone(),
            });
            ops.push(Op::WriteText {
                items: vec![TextItem::Text(run.text.clone())],
                font: font.clone(),
            });
        }
        Face::Builtin => {
            let font = if run.style.bold {
                BuiltinFont::HelveticaBold
            } else {
                BuiltinFont::Helvetica
            };
            ops.push(Op::SetFontSizeBuiltinFont { size, font });
            ops.push(Op::WriteTextBuiltinFont {
                items: vec![TextItem::Text(to_winlatin(&run.text))],
                font,
            });
        }
    }
    ops.push(Op::EndTextSection);
}

/// Convert a UTF-8 string to raw Windows-1252 bytes then wrap in a String so
/// printpdf writes the bytes unchanged into the PDF stream (builtin fonts use
/// WinAnsiEncoding, so each glyph is one byte 0x00–0xFF).
fn to_winlatin(s: &str) -> String {
    let bytes: Vec<u8> = s
        .chars()
        .map(|c| match c {
            '\u{20AC}' => 0x80,
            '\u{2026}' => 0x85,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201C}' => 0x93,
            '\u{201D}' => 0x94,
            '\u{2022}' => 0x95,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            '\u{00A0}' => 0x20,
            c if (c as u32) < 256 => c as u8,
            _ => b'?',
        })
        .collect();
    // SAFETY: intentionally non-UTF-8 for the upper half; printpdf passes
    // these bytes straight to the PDF stream, decoded by WinAnsiEncoding.
    #[allow(unsafe_code)]
    unsafe {
        String::from_utf8_unchecked(bytes)
    }
}
