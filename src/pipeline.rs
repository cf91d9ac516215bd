//! Pipeline – ties together asset loading, composition, finalisation and
//! rendering, and writes the results to disk.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::content::{compose, DocumentSource};
use crate::error::Result;
use crate::fonts::FontManager;
use crate::layout_config::LayoutConfig;
use crate::pagination::PageGeometry;
use crate::render::render_pdf;
use crate::templates::builtin_documents;

/// Page orientation for the generated PDF.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PageOrientation {
    /// Portrait mode: height > width (default).
    #[default]
    Portrait,
    /// Landscape mode: width > height.
    Landscape,
}

/// Configuration for one generation run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Page width in points (default: A4 = 595.28).
    pub page_width: f32,
    /// Page height in points (default: A4 = 841.89).
    pub page_height: f32,
    /// Page orientation; swaps effective width/height when `Landscape`.
    pub orientation: PageOrientation,
    /// Directory the PDFs are written to (default: current directory).
    pub output_dir: PathBuf,
    /// Also write the frozen layout as `<name>.layout.json`.
    pub dump_layout: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            page_width: PageGeometry::A4_WIDTH,
            page_height: PageGeometry::A4_HEIGHT,
            orientation: PageOrientation::Portrait,
            output_dir: PathBuf::from("."),
            dump_layout: false,
        }
    }
}

impl PipelineConfig {
    /// Effective page width after applying orientation.
    pub fn effective_width(&self) -> f32 {
        match self.orientation {
            PageOrientation::Portrait => self.page_width,
            PageOrientation::Landscape => self.page_height,
        }
    }

    /// Effective page height after applying orientation.
    pub fn effective_height(&self) -> f32 {
        match self.orientation {
            PageOrientation::Portrait => self.page_height,
            PageOrientation::Landscape => self.page_width,
        }
    }

    /// Create an A4 landscape config.
    pub fn a4_landscape() -> Self {
        Self {
            orientation: PageOrientation::Landscape,
            ..Self::default()
        }
    }
}

/// Compose and finalise an asset without rendering – useful for testing.
pub fn compute_layout_config(
    source: &DocumentSource,
    config: &PipelineConfig,
    fonts: &FontManager,
) -> Result<LayoutConfig> {
    let geometry = source.geometry(config.effective_width(), config.effective_height());
    compose(source, geometry, fonts)
}

/// Full pipeline: asset → PDF bytes.
///
/// Returns the bytes together with the finalised layout they were drawn from.
pub fn generate_pdf(
    source: &DocumentSource,
    config: &PipelineConfig,
    fonts: &FontManager,
) -> Result<(Vec<u8>, LayoutConfig)> {
    let layout = compute_layout_config(source, config, fonts)?;
    let bytes = render_pdf(&layout, fonts)?;
    Ok((bytes, layout))
}

/// Write `bytes` to `path`, creating parent directories as needed.
pub fn write_output(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(bytes)?;
    writer.flush()?;
    Ok(())
}

/// Generate one document into `config.output_dir` and return its path.
pub fn generate_to_file(
    source: &DocumentSource,
    config: &PipelineConfig,
    fonts: &FontManager,
) -> Result<PathBuf> {
    let (bytes, layout) = generate_pdf(source, config, fonts)?;
    let path = config.output_dir.join(&source.file_name);
    write_output(&path, &bytes)?;

    if config.dump_layout {
        let json_path = path.with_extension("layout.json");
        write_output(&json_path, layout.to_json().as_bytes())?;
        log::debug!("Wrote layout to {}", json_path.display());
    }

    log::info!(
        "Wrote '{}' ({} bytes, {} page{})",
        path.display(),
        bytes.len(),
        layout.pages.len(),
        if layout.pages.len() == 1 { "" } else { "s" }
    );
    Ok(path)
}

/// Generate every built-in document. Stops at the first failure; files
/// already written stay on disk.
pub fn generate_all(config: &PipelineConfig, fonts: &FontManager) -> Result<Vec<PathBuf>> {
    builtin_documents()?
        .iter()
        .map(|source| generate_to_file(source, config, fonts))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::terms_of_use_asset;

    #[test]
    fn pipeline_basic() {
        let source = DocumentSource::from_json(terms_of_use_asset()).unwrap();
        let fonts = FontManager::default();
        let (bytes, layout) = generate_pdf(&source, &PipelineConfig::default(), &fonts).unwrap();
        assert!(layout.pages.len() >= 3);
        assert_eq!(&bytes[0..5], b"%PDF-");
    }

    #[test]
    fn landscape_swaps_dimensions() {
        let config = PipelineConfig::a4_landscape();
        assert!(config.effective_width() > config.effective_height());
        let source = DocumentSource::from_json(terms_of_use_asset()).unwrap();
        let layout = compute_layout_config(&source, &config, &FontManager::default()).unwrap();
        assert_eq!(layout.page_width_pt, PageGeometry::A4_HEIGHT);
    }
}
