//! Final outline assembly.
//!
//! Produces the flat, reading-ordered [`DocumentResult`] from either the
//! document's native outline or the leveled heuristic candidates.

use crate::error::{Error, Result};
use crate::model::{DocumentResult, EmbeddedTocEntry, HeadingLevel, OutlineNode};

use super::level::LeveledCandidate;

/// Build a result directly from a native outline.
///
/// Native depth maps 1→H1, 2→H2 and clamps deeper levels to H3. Any
/// malformed entry rejects the whole outline, so the caller can fall
/// through to the heuristic path.
pub fn from_embedded_toc(
    metadata_title: Option<&str>,
    toc: &[EmbeddedTocEntry],
) -> Result<DocumentResult> {
    if toc.is_empty() {
        return Err(Error::EmbeddedToc("no entries".to_string()));
    }
    if let Some(bad) = toc.iter().find(|e| !e.is_well_formed()) {
        return Err(Error::EmbeddedToc(format!(
            "malformed entry (title={:?}, level={}, page={})",
            bad.title, bad.level, bad.page
        )));
    }

    let outline = toc
        .iter()
        .map(|entry| {
            OutlineNode::new(
                HeadingLevel::from_depth(entry.level),
                entry.title.trim(),
                entry.page,
            )
        })
        .collect();

    Ok(DocumentResult::with_outline(
        clean_title(metadata_title),
        outline,
    ))
}

/// Build a result from leveled heuristic candidates.
///
/// Candidates arrive and leave in document reading order; levels are not
/// renumbered or re-nested. The title is the metadata title when present,
/// else the highest-scoring H1 on the first page, else empty.
pub fn build(metadata_title: Option<&str>, leveled: &[LeveledCandidate]) -> DocumentResult {
    let mut title = clean_title(metadata_title);
    if title.is_empty() {
        title = leveled
            .iter()
            .filter(|l| l.level == HeadingLevel::H1 && l.candidate.line.page_number == 1)
            .max_by(|a, b| {
                a.candidate
                    .score
                    .partial_cmp(&b.candidate.score)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|l| l.candidate.line.text.clone())
            .unwrap_or_default();
    }

    let outline = leveled
        .iter()
        .map(|l| {
            OutlineNode::new(
                l.level,
                l.candidate.line.text.trim(),
                l.candidate.line.page_number,
            )
        })
        .collect();

    DocumentResult::with_outline(title, outline)
}

fn clean_title(metadata_title: Option<&str>) -> String {
    metadata_title.map(str::trim).unwrap_or("").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::score::HeadingCandidate;
    use crate::model::{BoundingBox, TextLine};

    fn leveled(text: &str, page: u32, level: HeadingLevel, score: f32) -> LeveledCandidate {
        LeveledCandidate {
            candidate: HeadingCandidate {
                line: TextLine::new(
                    text,
                    page,
                    18.0,
                    true,
                    BoundingBox::new(72.0, 100.0, 300.0, 118.0),
                ),
                score,
            },
            level,
        }
    }

    #[test]
    fn test_embedded_toc_maps_and_clamps_levels() {
        let toc = vec![
            EmbeddedTocEntry::new("Part I", 1, 1),
            EmbeddedTocEntry::new("Chapter 1", 2, 2),
            EmbeddedTocEntry::new("Section 1.1", 3, 3),
            EmbeddedTocEntry::new("Deep Section", 5, 4),
        ];

        let result = from_embedded_toc(Some("Book"), &toc).unwrap();
        assert_eq!(result.title, "Book");
        assert_eq!(result.outline.len(), 4);
        assert_eq!(result.outline[0].level, HeadingLevel::H1);
        assert_eq!(result.outline[1].level, HeadingLevel::H2);
        assert_eq!(result.outline[2].level, HeadingLevel::H3);
        assert_eq!(result.outline[3].level, HeadingLevel::H3);
    }

    #[test]
    fn test_embedded_toc_rejects_malformed_entry() {
        let toc = vec![
            EmbeddedTocEntry::new("Good", 1, 1),
            EmbeddedTocEntry::new("", 2, 3),
        ];
        let result = from_embedded_toc(None, &toc);
        assert!(matches!(result, Err(Error::EmbeddedToc(_))));
    }

    #[test]
    fn test_title_prefers_metadata() {
        let candidates = vec![leveled("Heuristic Title", 1, HeadingLevel::H1, 90.0)];
        let result = build(Some("  Metadata Title "), &candidates);
        assert_eq!(result.title, "Metadata Title");
    }

    #[test]
    fn test_title_falls_back_to_best_first_page_h1() {
        let candidates = vec![
            leveled("Weak H1", 1, HeadingLevel::H1, 50.0),
            leveled("Strong H1", 1, HeadingLevel::H1, 80.0),
            leveled("H1 on page two", 2, HeadingLevel::H1, 99.0),
            leveled("Strong H2", 1, HeadingLevel::H2, 95.0),
        ];
        let result = build(None, &candidates);
        assert_eq!(result.title, "Strong H1");
    }

    #[test]
    fn test_title_empty_when_no_first_page_h1() {
        let candidates = vec![leveled("Only H1 later", 3, HeadingLevel::H1, 70.0)];
        let result = build(Some("   "), &candidates);
        assert_eq!(result.title, "");
    }

    #[test]
    fn test_outline_keeps_document_order() {
        let candidates = vec![
            leveled("First", 1, HeadingLevel::H2, 50.0),
            leveled("Second", 2, HeadingLevel::H1, 60.0),
            leveled("Third", 2, HeadingLevel::H3, 45.0),
        ];
        let result = build(None, &candidates);
        let texts: Vec<&str> = result.outline.iter().map(|n| n.text.as_str()).collect();
        assert_eq!(texts, vec!["First", "Second", "Third"]);
    }
}
