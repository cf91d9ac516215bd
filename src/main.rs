//! compose – generate the Bazary legal document set as PDFs.
//!
//! Usage:
//!   compose [asset.json ...] [--out-dir DIR] [--font FILE.ttf] [--layout-json] [--landscape]
//!
//! With no asset paths every built-in document is generated.

use std::{env, fs, path::PathBuf, process};

use doc_composer::content::DocumentSource;
use doc_composer::fonts::FontManager;
use doc_composer::pipeline::{generate_all, generate_to_file, PageOrientation, PipelineConfig};

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    let mut assets: Vec<PathBuf> = Vec::new();
    let mut font_path: Option<PathBuf> = None;
    let mut config = PipelineConfig::default();

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--landscape" | "-l" => config.orientation = PageOrientation::Landscape,
            "--layout-json" => config.dump_layout = true,
            "--out-dir" | "-o" => match iter.next() {
                Some(v) => config.output_dir = PathBuf::from(v),
                None => fail_usage(&args[0], "--out-dir needs a directory"),
            },
            "--font" | "-f" => match iter.next() {
                Some(v) => font_path = Some(PathBuf::from(v)),
                None => fail_usage(&args[0], "--font needs a file path"),
            },
            "--help" | "-h" => {
                print_usage(&args[0]);
                process::exit(0);
            }
            other if other.starts_with('-') => fail_usage(&args[0], &format!("Unknown flag: {other}")),
            path => assets.push(PathBuf::from(path)),
        }
    }

    let fonts = match FontManager::lookup(font_path.as_deref()) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    let result = if assets.is_empty() {
        generate_all(&config, &fonts)
    } else {
        assets
            .iter()
            .map(|path| -> doc_composer::Result<PathBuf> {
                let json = fs::read_to_string(path)?;
                let source = DocumentSource::from_json(&json)?;
                generate_to_file(&source, &config, &fonts)
            })
            .collect()
    };

    match result {
        Ok(paths) => {
            for path in paths {
                println!("  [OK] {}", path.display());
            }
        }
        Err(e) => {
            eprintln!("Error generating PDF: {e}");
            process::exit(1);
        }
    }
}

fn fail_usage(prog: &str, message: &str) -> ! {
    eprintln!("{message}");
    print_usage(prog);
    process::exit(1);
}

fn print_usage(prog: &str) {
    eprintln!("compose – Bazary legal document generator (doc-composer)");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  {prog} [asset.json ...] [--out-dir DIR] [--font FILE.ttf] [--layout-json] [--landscape]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  [asset.json]   Document asset(s) to compose (default: all built-in documents)");
    eprintln!();
    eprintln!("Flags:");
    eprintln!("  --out-dir, -o  Output directory (default: current directory)");
    eprintln!("  --font, -f     TrueType font to embed (default: $DOC_COMPOSER_FONT, then system search)");
    eprintln!("  --layout-json  Also write each frozen page layout as <name>.layout.json");
    eprintln!("  --landscape    Use landscape page orientation");
    eprintln!("  --help         Print this message");
}
