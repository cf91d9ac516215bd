//! Content assets – the document text, kept apart from how it is drawn.
//!
//! An asset is a JSON document describing the cover, the sections and the
//! blocks inside each section by role (`part`, `body`, `bullet`, `table`,
//! ...). [`compose`] walks it against a [`Composer`] and returns the
//! finalised layout.

use serde::{Deserialize, Serialize};

use crate::blocks::Table;
use crate::chrome::DocumentMeta;
use crate::composer::{Composer, Cover, Signature};
use crate::error::{Error, Result};
use crate::fonts::FontManager;
use crate::layout_config::LayoutConfig;
use crate::pagination::PageGeometry;
use crate::style::{ThemeName, MM};

/// One complete document asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentSource {
    /// Output file name, e.g. `Bazary_Terms_of_Use.pdf`.
    pub file_name: String,
    #[serde(default)]
    pub theme: ThemeName,
    pub meta: DocumentMeta,
    #[serde(default)]
    pub cover: Option<Cover>,
    pub sections: Vec<Section>,
}

/// A top-level division; always starts on a new page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    #[serde(default)]
    pub blocks: Vec<ContentBlock>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContentBlock {
    Part { text: String },
    Article { text: String },
    Subheading { text: String },
    Body { text: String },
    Muted { text: String },
    Note { text: String },
    Warning { text: String },
    FinePrint { text: String },
    Bullet { text: String },
    /// Shorthand for a run of bullets.
    Bullets { items: Vec<String> },
    Numbered { number: String, text: String },
    /// Bulleted line with its translation beneath.
    Item { primary: String, secondary: String },
    Separator,
    HeavySeparator,
    Space { mm: f32 },
    Table {
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
        #[serde(default)]
        widths_mm: Option<Vec<f32>>,
    },
    Signature(Signature),
    Contact {
        #[serde(default = "default_contact_heading")]
        heading: String,
        lines: Vec<String>,
    },
}

fn default_contact_heading() -> String {
    "Contact".to_string()
}

impl DocumentSource {
    pub fn from_json(json: &str) -> Result<Self> {
        let source: Self = serde_json::from_str(json)?;
        source.validate()?;
        Ok(source)
    }

    /// Reject tables whose rows or widths disagree with the header count.
    pub fn validate(&self) -> Result<()> {
        for section in &self.sections {
            for block in &section.blocks {
                if let ContentBlock::Table {
                    headers,
                    rows,
                    widths_mm,
                } = block
                {
                    let columns = headers.len();
                    if let Some(widths) = widths_mm {
                        if widths.len() != columns {
                            return Err(Error::Composition(format!(
                                "table in '{}' has {} widths for {} columns",
                                section.title,
                                widths.len(),
                                columns
                            )));
                        }
                    }
                    if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != columns) {
                        return Err(Error::Composition(format!(
                            "table in '{}': row {} has {} cells, expected {}",
                            section.title,
                            i,
                            row.len(),
                            columns
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    /// Geometry for this asset's theme at the given page size.
    pub fn geometry(&self, page_width: f32, page_height: f32) -> PageGeometry {
        PageGeometry::for_theme(self.theme).with_page_size(page_width, page_height)
    }
}

impl ContentBlock {
    fn apply(&self, composer: &mut Composer<'_>) {
        match self {
            ContentBlock::Part { text } => composer.part_title(text),
            ContentBlock::Article { text } => composer.article_title(text),
            ContentBlock::Subheading { text } => composer.sub_heading(text),
            ContentBlock::Body { text } => composer.body(text),
            ContentBlock::Muted { text } => composer.muted(text),
            ContentBlock::Note { text } => composer.legal_note(text),
            ContentBlock::Warning { text } => composer.warning(text),
            ContentBlock::FinePrint { text } => composer.fine_print(text),
            ContentBlock::Bullet { text } => composer.bullet(text),
            ContentBlock::Bullets { items } => {
                for item in items {
                    composer.bullet(item);
                }
            }
            ContentBlock::Numbered { number, text } => composer.numbered(number, text),
            ContentBlock::Item { primary, secondary } => composer.item(primary, secondary),
            ContentBlock::Separator => composer.separator(),
            ContentBlock::HeavySeparator => composer.heavy_separator(),
            ContentBlock::Space { mm } => composer.space(mm * MM),
            ContentBlock::Table {
                headers,
                rows,
                widths_mm,
            } => {
                let mut table = Table::new(headers.clone(), rows.clone());
                if let Some(widths) = widths_mm {
                    table = table.with_widths(widths.iter().map(|w| w * MM).collect());
                }
                composer.draw_table(&table);
            }
            ContentBlock::Signature(signature) => composer.signature_block(signature),
            ContentBlock::Contact { heading, lines } => composer.contact_block(heading, lines),
        }
    }
}

/// Lay out a whole asset: cover, then each section on a fresh page.
pub fn compose(source: &DocumentSource, geometry: PageGeometry, fonts: &FontManager) -> Result<LayoutConfig> {
    let mut composer = Composer::new(source.meta.clone(), source.theme.theme(), geometry, fonts);
    if let Some(cover) = &source.cover {
        composer.cover(cover)?;
    }
    for section in &source.sections {
        composer.section_title(&section.title);
        for block in &section.blocks {
            block.apply(&mut composer);
        }
    }
    Ok(composer.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout_config::{Layer, Phase};

    const MINIMAL: &str = r#"{
        "file_name": "t.pdf",
        "meta": { "brand": "Bazary", "reference": "BZR-T-1", "title": "T" },
        "cover": { "title_lines": ["T"] },
        "sections": [
            { "title": "One", "blocks": [
                { "kind": "body", "text": "Hello" },
                { "kind": "bullets", "items": ["a", "b"] },
                { "kind": "table", "headers": ["K", "V"], "rows": [["k", "v"]], "widths_mm": [40, 130] },
                { "kind": "separator" },
                { "kind": "signature", "place": "Antananarivo", "date_fr": "22 février 2026", "date_en": "February 22, 2026" }
            ]},
            { "title": "Two" }
        ]
    }"#;

    #[test]
    fn parses_tagged_blocks() {
        let source = DocumentSource::from_json(MINIMAL).unwrap();
        assert_eq!(source.theme, ThemeName::Formal);
        assert_eq!(source.sections[0].blocks.len(), 5);
        assert!(matches!(source.sections[0].blocks[3], ContentBlock::Separator));
        assert!(source.sections[1].blocks.is_empty());
    }

    #[test]
    fn compose_places_cover_and_one_page_per_section() {
        let source = DocumentSource::from_json(MINIMAL).unwrap();
        let fonts = FontManager::default();
        let layout = compose(&source, source.geometry(595.28, 841.89), &fonts).unwrap();
        assert_eq!(layout.phase, Phase::Finalized);
        assert_eq!(layout.pages.len(), 3);
        assert!(layout.pages[0].header_suppressed);
        let texts: Vec<&str> = layout.pages[1]
            .text_runs()
            .filter(|t| t.layer == Layer::Body)
            .map(|t| t.text.as_str())
            .collect();
        assert_eq!(texts[0], "ONE");
        assert!(texts.contains(&"Pour / For BAZARY"));
    }

    #[test]
    fn ragged_table_is_rejected() {
        let json = MINIMAL.replace(r#"[["k", "v"]]"#, r#"[["k"]]"#);
        let err = DocumentSource::from_json(&json).unwrap_err();
        assert!(matches!(err, Error::Composition(_)));
    }

    #[test]
    fn unknown_kind_is_an_asset_error() {
        let json = MINIMAL.replace(r#""kind": "separator""#, r#""kind": "marquee""#);
        let err = DocumentSource::from_json(&json).unwrap_err();
        assert!(matches!(err, Error::Asset(_)));
    }
}
