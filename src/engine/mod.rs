//! The outline extraction engine.
//!
//! A strict sequential pipeline per document: boilerplate filtering,
//! heading scoring, level assignment, outline construction. When the
//! document carries a well-formed native outline the heuristic stages are
//! bypassed entirely.

pub mod boilerplate;
pub mod builder;
pub mod level;
pub mod score;

pub use score::{HeadingCandidate, ScoreWeights};

use crate::lang::LanguagePattern;
use crate::model::{DocumentInput, DocumentResult};

/// Tunable parameters of the heuristic pipeline.
///
/// The defaults are calibrated against the scenario suite in
/// `tests/engine_test.rs`; treat them as a starting point, not ground
/// truth.
#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Fraction of page height treated as header/footer margin band
    pub margin_fraction: f32,

    /// Fraction of pages a margin line must recur on to count as
    /// boilerplate
    pub recurrence_threshold: f32,

    /// A line is "isolated" when its gap before exceeds this multiple of
    /// the body font size
    pub isolation_factor: f32,

    /// Token count at or below which a line earns the brevity bonus
    pub short_token_limit: usize,

    /// Token count above which a line takes the paragraph-length penalty
    pub long_token_limit: usize,

    /// Feature weights for the heading scorer
    pub weights: ScoreWeights,

    /// Minimum score for a line to become a heading candidate
    pub accept_threshold: f32,
}

impl EngineOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the margin band fraction.
    pub fn with_margin_fraction(mut self, fraction: f32) -> Self {
        self.margin_fraction = fraction;
        self
    }

    /// Set the boilerplate recurrence threshold.
    pub fn with_recurrence_threshold(mut self, threshold: f32) -> Self {
        self.recurrence_threshold = threshold;
        self
    }

    /// Set the scoring weights.
    pub fn with_weights(mut self, weights: ScoreWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Set the candidate acceptance threshold.
    pub fn with_accept_threshold(mut self, threshold: f32) -> Self {
        self.accept_threshold = threshold;
        self
    }
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            margin_fraction: 0.10,
            recurrence_threshold: 0.5,
            isolation_factor: 1.5,
            short_token_limit: 8,
            long_token_limit: 12,
            weights: ScoreWeights::default(),
            accept_threshold: 40.0,
        }
    }
}

/// Heading-detection and outline-construction engine.
///
/// Stateless across documents: one engine value can process any number of
/// documents, concurrently if desired, sharing only its read-only options.
#[derive(Debug, Clone, Default)]
pub struct OutlineEngine {
    options: EngineOptions,
}

impl OutlineEngine {
    /// Create an engine with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with custom options.
    pub fn with_options(options: EngineOptions) -> Self {
        Self { options }
    }

    /// The engine's options.
    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Extract the outline for one document.
    ///
    /// Never fails: malformed native outlines degrade to the heuristic
    /// path and an empty document yields an empty result.
    pub fn extract(&self, input: &DocumentInput, pattern: &LanguagePattern) -> DocumentResult {
        // An author-provided outline beats any heuristic.
        if !input.toc.is_empty() {
            match builder::from_embedded_toc(input.title.as_deref(), &input.toc) {
                Ok(result) => return result,
                Err(e) => {
                    log::warn!("ignoring native outline: {}", e);
                }
            }
        }

        if input.line_count() == 0 {
            log::debug!("document has no extractable text lines");
            return DocumentResult::new();
        }

        let flags = boilerplate::flag_recurring_lines(input, &self.options);
        let candidates = score::collect_candidates(input, &flags, pattern, &self.options);
        let leveled = level::assign_levels(candidates);
        builder::build(input.title.as_deref(), &leveled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::LanguageRegistry;
    use crate::model::{BoundingBox, PageLines, TextLine};

    fn line(text: &str, page: u32, size: f32, bold: bool, y: f32) -> TextLine {
        TextLine::new(
            text,
            page,
            size,
            bold,
            BoundingBox::new(72.0, y, 400.0, y + size),
        )
    }

    #[test]
    fn test_empty_document_yields_empty_result() {
        let engine = OutlineEngine::new();
        let registry = LanguageRegistry::builtin();

        let mut input = DocumentInput::new();
        input.title = Some("Metadata Title".to_string());
        input.pages.push(PageLines::letter(1));

        let result = engine.extract(&input, registry.get("en"));
        assert!(result.is_empty());
    }

    #[test]
    fn test_extract_is_idempotent() {
        let engine = OutlineEngine::new();
        let registry = LanguageRegistry::builtin();

        let mut page = PageLines::letter(1);
        page.add_line(line("Overview", 1, 24.0, true, 72.0));
        for i in 0..5 {
            page.add_line(line(
                "body text that keeps going and going across the page with many words here",
                1,
                12.0,
                false,
                120.0 + i as f32 * 14.0,
            ));
        }
        let mut input = DocumentInput::new();
        input.pages.push(page);

        let first = engine.extract(&input, registry.get("en"));
        let second = engine.extract(&input, registry.get("en"));
        assert_eq!(first, second);
    }

    #[test]
    fn test_options_builder() {
        let options = EngineOptions::new()
            .with_margin_fraction(0.15)
            .with_accept_threshold(30.0);
        assert_eq!(options.margin_fraction, 0.15);
        assert_eq!(options.accept_threshold, 30.0);
    }
}
