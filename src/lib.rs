//! # pdftoc
//!
//! Heading-detection and outline-construction engine for PDF documents.
//!
//! Given per-page text lines annotated with font metrics and position,
//! the engine decides which lines are headings, assigns H1/H2/H3 levels,
//! filters running headers and footers, and reconciles with a PDF's
//! native outline when one exists. The result is a flat, reading-ordered
//! outline plus a title, serialized as JSON for document-indexing and
//! search-preprocessing pipelines.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdftoc::{extract_outline, render, LanguageRegistry};
//!
//! fn main() -> pdftoc::Result<()> {
//!     let registry = LanguageRegistry::builtin();
//!     let result = extract_outline("document.pdf", registry.get("en"))?;
//!
//!     let json = render::to_json(&result, render::JsonFormat::Pretty)?;
//!     println!("{}", json);
//!     Ok(())
//! }
//! ```
//!
//! ## Design
//!
//! - **Trait boundary**: the engine consumes a [`DocumentInput`] through
//!   [`DocumentSource`]; the bundled [`PdfSource`] is one implementation.
//! - **Native outline priority**: a well-formed embedded outline
//!   short-circuits the heuristic path entirely.
//! - **Per-document isolation**: every document is a stateless unit;
//!   failures never leak across documents in a batch.
//! - **Language packs**: numbered-heading patterns per language, loaded
//!   once per run and shared read-only.

pub mod engine;
pub mod error;
pub mod lang;
pub mod model;
pub mod render;
pub mod source;

// Re-export commonly used types
pub use engine::{EngineOptions, HeadingCandidate, OutlineEngine, ScoreWeights};
pub use error::{Error, Result};
pub use lang::{LanguagePattern, LanguageRegistry};
pub use model::{
    BoundingBox, DocumentInput, DocumentResult, EmbeddedTocEntry, HeadingLevel, OutlineNode,
    PageLines, TextLine,
};
pub use render::JsonFormat;
pub use source::{DocumentSource, PdfSource};

use std::path::Path;

/// Extract the outline of a PDF file with default engine options.
///
/// # Example
///
/// ```no_run
/// use pdftoc::{extract_outline, LanguageRegistry};
///
/// let registry = LanguageRegistry::builtin();
/// let result = extract_outline("report.pdf", registry.get("en")).unwrap();
/// println!("{} headings", result.outline.len());
/// ```
pub fn extract_outline<P: AsRef<Path>>(
    path: P,
    pattern: &LanguagePattern,
) -> Result<DocumentResult> {
    extract_outline_with_options(path, pattern, EngineOptions::default())
}

/// Extract the outline of a PDF file with custom engine options.
pub fn extract_outline_with_options<P: AsRef<Path>>(
    path: P,
    pattern: &LanguagePattern,
    options: EngineOptions,
) -> Result<DocumentResult> {
    let source = PdfSource::open(path)?;
    let input = source.read()?;
    let engine = OutlineEngine::with_options(options);
    Ok(engine.extract(&input, pattern))
}

/// Extract the outline of a PDF held in memory.
pub fn extract_outline_from_bytes(
    data: &[u8],
    pattern: &LanguagePattern,
) -> Result<DocumentResult> {
    let source = PdfSource::from_bytes(data)?;
    let input = source.read()?;
    let engine = OutlineEngine::new();
    Ok(engine.extract(&input, pattern))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_from_invalid_bytes_fails() {
        let registry = LanguageRegistry::builtin();
        let result = extract_outline_from_bytes(b"not a pdf", registry.get("en"));
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let registry = LanguageRegistry::builtin();
        let result = extract_outline("/nonexistent/path.pdf", registry.get("en"));
        assert!(result.is_err());
    }
}
