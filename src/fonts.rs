//! Font loading and text measurement using `ttf-parser`.
//!
//! Documents mix French, English and Korean, so a Unicode TrueType face is
//! preferred. When none can be found we fall back to the builtin Helvetica
//! pair with heuristic metrics; the renderer then transcodes to WinAnsi and
//! non-Latin glyphs degrade to `?`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::style::TextStyle;

/// Environment variable consulted when no explicit font path is given.
pub const FONT_ENV_VAR: &str = "DOC_COMPOSER_FONT";

/// Well-known locations of Unicode-capable fonts, tried in order.
pub const FONT_SEARCH_PATHS: &[&str] = &[
    "/Library/Fonts/Arial Unicode.ttf",
    "/System/Library/Fonts/Supplemental/Arial Unicode.ttf",
    "/usr/share/fonts/truetype/noto/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/truetype/nanum/NanumGothic.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "C:\\Windows\\Fonts\\malgun.ttf",
];

/// A loaded font face with metrics.
#[derive(Clone)]
pub struct FontData {
    /// Raw font bytes (kept alive for ttf-parser's zero-copy API).
    pub bytes: Vec<u8>,
    pub units_per_em: f32,
    pub ascender: f32,
    pub descender: f32,
}

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub struct FontKey {
    pub bold: bool,
}

/// Manages the regular/bold faces used by one generation run.
pub struct FontManager {
    fonts: HashMap<FontKey, FontData>,
    /// Where the loaded face came from, if it is not builtin.
    source: Option<PathBuf>,
}

impl FontManager {
    pub fn new() -> Self {
        Self {
            fonts: HashMap::new(),
            source: None,
        }
    }

    /// Resolve the document font.
    ///
    /// An explicit path must load; otherwise `DOC_COMPOSER_FONT` and then
    /// [`FONT_SEARCH_PATHS`] are tried, and the builtin pair is the last
    /// resort.
    pub fn lookup(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        let from_env = std::env::var_os(FONT_ENV_VAR).map(PathBuf::from);
        let candidates = from_env
            .into_iter()
            .chain(FONT_SEARCH_PATHS.iter().map(PathBuf::from));

        for candidate in candidates {
            if !candidate.is_file() {
                continue;
            }
            match Self::from_file(&candidate) {
                Ok(mgr) => return Ok(mgr),
                Err(e) => log::warn!("Skipping font {}: {e}", candidate.display()),
            }
        }

        log::warn!("No Unicode font found; falling back to builtin Helvetica");
        Ok(Self::default())
    }

    /// Load one face from disk and use it for both regular and bold text.
    pub fn from_file(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .map_err(|e| Error::Font(format!("cannot read {}: {e}", path.display())))?;
        let mut mgr = Self::new();
        mgr.load_font(false, bytes.clone())?;
        mgr.load_font(true, bytes)?;
        mgr.source = Some(path.to_path_buf());
        log::info!("Using font {}", path.display());
        Ok(mgr)
    }

    /// Load a TTF/OTF face from bytes.
    pub fn load_font(&mut self, bold: bool, bytes: Vec<u8>) -> Result<()> {
        let face = ttf_parser::Face::parse(&bytes, 0)
            .map_err(|e| Error::Font(format!("failed to parse font: {e}")))?;

        let data = FontData {
            units_per_em: face.units_per_em() as f32,
            ascender: face.ascender() as f32,
            descender: face.descender() as f32,
            bytes,
        };
        self.fonts.insert(FontKey { bold }, data);
        Ok(())
    }

    /// Register the builtin Helvetica pair with synthetic metrics.
    pub fn ensure_default(&mut self) {
        for bold in [false, true] {
            self.fonts.entry(FontKey { bold }).or_insert(FontData {
                bytes: Vec::new(),
                units_per_em: 1000.0,
                ascender: 750.0,
                descender: -250.0,
            });
        }
    }

    /// Font data for a weight, falling back to the regular face.
    pub fn get(&self, bold: bool) -> Option<&FontData> {
        self.fonts
            .get(&FontKey { bold })
            .or_else(|| self.fonts.get(&FontKey { bold: false }))
    }

    /// Measure the width of a string in points.
    /// With real font bytes we sum glyph advances; otherwise an average
    /// character width of 0.5 × size (0.55 for bold) is assumed.
    pub fn measure_text_width(&self, text: &str, size: f32, bold: bool) -> f32 {
        let heuristic = || {
            let avg = if bold { 0.55 } else { 0.5 };
            text.chars().count() as f32 * size * avg
        };

        let data = match self.get(bold) {
            Some(d) if !d.bytes.is_empty() => d,
            _ => return heuristic(),
        };

        match ttf_parser::Face::parse(&data.bytes, 0) {
            Ok(face) => {
                let scale = size / data.units_per_em;
                text.chars()
                    .map(|ch| match face.glyph_index(ch) {
                        Some(gid) => face.glyph_hor_advance(gid).unwrap_or(0) as f32 * scale,
                        None => size * 0.5,
                    })
                    .sum()
            }
            Err(_) => heuristic(),
        }
    }

    pub fn measure(&self, text: &str, style: &TextStyle) -> f32 {
        self.measure_text_width(text, style.size, style.bold)
    }

    /// True when a real face is loaded (not the builtin fallback).
    pub fn has_real_fonts(&self) -> bool {
        self.get(false).map(|d| !d.bytes.is_empty()).unwrap_or(false)
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Font bytes for embedding, or `None` for the builtin fallback.
    pub fn font_bytes(&self, bold: bool) -> Option<&[u8]> {
        self.get(bold).and_then(|d| {
            if d.bytes.is_empty() {
                None
            } else {
                Some(d.bytes.as_slice())
            }
        })
    }
}

impl Default for FontManager {
    fn default() -> Self {
        let mut mgr = Self::new();
        mgr.ensure_default();
        mgr
    }
}

/// Word-wrap text to fit within `max_width` points. Returns a vec of lines.
///
/// Explicit `\n` starts a new line; a word wider than the line is broken
/// between characters.
pub fn wrap_text(text: &str, style: &TextStyle, max_width: f32, fonts: &FontManager) -> Vec<String> {
    if max_width <= 0.0 || text.is_empty() {
        return vec![text.to_string()];
    }

    let fits = |s: &str| fonts.measure(s, style) <= max_width;
    let mut lines: Vec<String> = Vec::new();

    for paragraph in text.split('\n') {
        // Leading spaces are kept: content uses them for hanging indents.
        let indent: String = paragraph.chars().take_while(|c| *c == ' ').collect();
        let words: Vec<&str> = paragraph.split_whitespace().collect();
        if words.is_empty() {
            lines.push(String::new());
            continue;
        }

        let mut current_line = indent.clone();
        for word in &words {
            let candidate = if current_line.trim().is_empty() {
                format!("{current_line}{word}")
            } else {
                format!("{current_line} {word}")
            };
            if fits(&candidate) {
                current_line = candidate;
                continue;
            }
            if !current_line.trim().is_empty() {
                lines.push(std::mem::take(&mut current_line));
            }
            if fits(word) {
                current_line = word.to_string();
                continue;
            }
            // Hard break an overlong token (URLs, long identifiers).
            for ch in word.chars() {
                let mut probe = current_line.clone();
                probe.push(ch);
                if !fits(&probe) && !current_line.is_empty() {
                    lines.push(std::mem::take(&mut current_line));
                }
                current_line.push(ch);
            }
        }
        if !current_line.trim().is_empty() {
            lines.push(current_line);
        }
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::Color;

    fn style(size: f32) -> TextStyle {
        TextStyle {
            size,
            bold: false,
            color: Color::BLACK,
            line_height: size * 1.4,
        }
    }

    #[test]
    fn heuristic_text_width() {
        let mgr = FontManager::default();
        let w = mgr.measure_text_width("Hello", 16.0, false);
        // 5 chars × 16 × 0.5 = 40
        assert!((w - 40.0).abs() < 0.1);
        let bold = mgr.measure_text_width("Hello", 16.0, true);
        assert!((bold - 44.0).abs() < 0.1);
    }

    #[test]
    fn word_wrap_basic() {
        let mgr = FontManager::default();
        let lines = wrap_text("Hello world foo bar", &style(16.0), 60.0, &mgr);
        assert!(lines.len() >= 2, "Expected wrapping, got {:?}", lines);
    }

    #[test]
    fn wrap_keeps_explicit_newlines() {
        let mgr = FontManager::default();
        let lines = wrap_text("EDBM\n  https://edbm.mg", &style(9.0), 400.0, &mgr);
        assert_eq!(lines, vec!["EDBM".to_string(), "  https://edbm.mg".to_string()]);
    }

    #[test]
    fn overlong_word_is_broken() {
        let mgr = FontManager::default();
        // 10 pt heuristic: 5 pt per char, 50 pt holds 10 chars.
        let lines = wrap_text("abcdefghijklmnopqrstuvwxy", &style(10.0), 50.0, &mgr);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "abcdefghij");
        assert!(lines.iter().all(|l| mgr.measure(l, &style(10.0)) <= 50.0));
    }

    #[test]
    fn explicit_missing_font_is_an_error() {
        let err = FontManager::lookup(Some(Path::new("/nonexistent/font.ttf")));
        assert!(matches!(err, Err(Error::Font(_))));
    }

    #[test]
    fn builtin_has_no_embeddable_bytes() {
        let mgr = FontManager::default();
        assert!(!mgr.has_real_fonts());
        assert!(mgr.font_bytes(true).is_none());
    }
}
