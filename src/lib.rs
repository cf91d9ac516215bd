//! # doc-composer – paginated legal documents as PDF
//!
//! This crate lays out bilingual legal documents (terms of use, privacy
//! policy, compliance review, market guide) on fixed-size pages and renders
//! them to PDF. The pipeline stages are:
//!
//! 1. **Load** – JSON content asset → [`content::DocumentSource`] ([`templates`], [`content`])
//! 2. **Compose** – place blocks behind a cursor with automatic page breaks
//!    and running header/footer ([`composer`], [`blocks`], [`chrome`], [`pagination`])
//! 3. **Finalise** – resolve the total-page placeholder ([`layout_config`])
//! 4. **Render** – emit PDF bytes via printpdf ([`render`])
//!
//! [`pipeline`] runs all four and writes the files.

pub mod blocks;
pub mod chrome;
pub mod composer;
pub mod content;
pub mod error;
pub mod fonts;
pub mod layout_config;
pub mod pagination;
pub mod pipeline;
pub mod render;
pub mod style;
pub mod templates;

// Re-exports for convenience
pub use error::{Error, Result};
pub use pipeline::{generate_all, generate_pdf, PageOrientation, PipelineConfig};
