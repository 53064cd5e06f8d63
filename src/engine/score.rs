//! Heading likelihood scoring.
//!
//! Scoring is a pure function of a line's own features plus the
//! document's aggregate statistics (body font size, page geometry), so
//! identical features always produce identical scores and per-line work
//! is freely parallelizable.

use std::collections::HashMap;

use rayon::prelude::*;

use crate::lang::LanguagePattern;
use crate::model::{DocumentInput, TextLine};

use super::EngineOptions;

/// Feature weights for the heading scorer.
///
/// Tuned against the scenario suite; every field is an independent knob.
#[derive(Debug, Clone)]
pub struct ScoreWeights {
    /// Weight of the font-size ratio feature (scaled linearly up to
    /// `font_ratio_cap`)
    pub font_size: f32,

    /// Contribution of a bold line
    pub bold: f32,

    /// Contribution of a line standing apart from surrounding text
    pub isolation: f32,

    /// Contribution of a short line
    pub brevity: f32,

    /// Penalty subtracted from paragraph-length lines
    pub long_penalty: f32,

    /// Contribution of a numbered-heading prefix match
    pub numbered: f32,

    /// Contribution of centered or indented alignment
    pub alignment: f32,

    /// Font-size ratio at which the font feature saturates
    pub font_ratio_cap: f32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            font_size: 25.0,
            bold: 15.0,
            isolation: 20.0,
            brevity: 10.0,
            long_penalty: 20.0,
            numbered: 25.0,
            alignment: 5.0,
            font_ratio_cap: 1.5,
        }
    }
}

/// Per-page geometry the alignment feature needs.
#[derive(Debug, Clone, Copy)]
pub struct PageContext {
    /// Page width in points
    pub width: f32,

    /// Leftmost x0 among the page's content lines
    pub left_margin: f32,
}

/// A line that passed the acceptance threshold.
#[derive(Debug, Clone)]
pub struct HeadingCandidate {
    /// The underlying line
    pub line: TextLine,

    /// Heading likelihood score
    pub score: f32,
}

/// Most frequent font size (rounded to 0.5pt) among the given lines.
///
/// Falls back to 12pt for an empty input. Ties resolve to the smaller
/// size, since body text is the smaller of two equally common sizes in
/// practice.
pub fn body_font_size<'a, I>(lines: I) -> f32
where
    I: IntoIterator<Item = &'a TextLine>,
{
    let mut histogram: HashMap<i32, usize> = HashMap::new();
    for line in lines {
        if line.font_size > 0.0 {
            let key = (line.font_size * 2.0).round() as i32;
            *histogram.entry(key).or_insert(0) += 1;
        }
    }

    histogram
        .into_iter()
        .max_by(|(ka, ca), (kb, cb)| ca.cmp(cb).then(kb.cmp(ka)))
        .map(|(key, _)| key as f32 / 2.0)
        .unwrap_or(12.0)
}

/// Score one line.
///
/// Pure: depends only on the line, the page context, the document body
/// size, the active language pattern, and the configured weights.
pub fn score_line(
    line: &TextLine,
    ctx: &PageContext,
    body_size: f32,
    pattern: &LanguagePattern,
    options: &EngineOptions,
) -> f32 {
    let w = &options.weights;
    let mut score = 0.0;

    // Font-size ratio, linear up to the cap.
    if body_size > 0.0 {
        let ratio = line.font_size / body_size;
        let span = (w.font_ratio_cap - 1.0).max(f32::EPSILON);
        score += w.font_size * ((ratio - 1.0) / span).clamp(0.0, 1.0);
    }

    if line.is_bold {
        score += w.bold;
    }

    // Isolation: whitespace above the line exceeds the document-relative
    // threshold.
    if line.vertical_gap_before > options.isolation_factor * body_size {
        score += w.isolation;
    }

    // Brevity: headings are short by construction.
    let tokens = line.token_count();
    if tokens <= options.short_token_limit {
        score += w.brevity;
    } else if tokens > options.long_token_limit {
        score -= w.long_penalty;
    }

    if pattern.matches_numbered(&line.text) {
        score += w.numbered;
    }

    // Alignment: centered, or flush-left with a clear indent from the
    // page's content margin.
    if ctx.width > 0.0 {
        let centered = (line.bbox.center_x() - ctx.width / 2.0).abs() < ctx.width * 0.1;
        let indented = line.bbox.x0 - ctx.left_margin >= body_size;
        if centered || indented {
            score += w.alignment;
        }
    }

    score
}

/// Score every non-boilerplate line and keep those above the acceptance
/// threshold, in document order.
///
/// `flags` is the boilerplate mask, one `Vec<bool>` per page.
pub fn collect_candidates(
    input: &DocumentInput,
    flags: &[Vec<bool>],
    pattern: &LanguagePattern,
    options: &EngineOptions,
) -> Vec<HeadingCandidate> {
    // Gather content lines (non-boilerplate, non-blank) with their page
    // context; aggregate statistics come from the same set.
    let mut pool: Vec<(&TextLine, PageContext)> = Vec::new();
    for (page_idx, page) in input.pages.iter().enumerate() {
        let left_margin = page
            .lines
            .iter()
            .enumerate()
            .filter(|(i, l)| !flags[page_idx].get(*i).copied().unwrap_or(false) && !l.is_blank())
            .map(|(_, l)| l.bbox.x0)
            .fold(f32::INFINITY, f32::min);
        let ctx = PageContext {
            width: page.width,
            left_margin: if left_margin.is_finite() { left_margin } else { 0.0 },
        };

        for (i, line) in page.lines.iter().enumerate() {
            let is_boilerplate = flags[page_idx].get(i).copied().unwrap_or(false);
            if !is_boilerplate && !line.is_blank() {
                pool.push((line, ctx));
            }
        }
    }

    let body_size = body_font_size(pool.iter().map(|(l, _)| *l));
    log::debug!(
        "scoring {} lines, body size {:.1}pt",
        pool.len(),
        body_size
    );

    pool.par_iter()
        .filter_map(|(line, ctx)| {
            let score = score_line(line, ctx, body_size, pattern, options);
            if score > options.accept_threshold {
                Some(HeadingCandidate {
                    line: (*line).clone(),
                    score,
                })
            } else {
                None
            }
        })
        .collect()
}
