//! Running header/footer detection.
//!
//! Text that recurs across pages at a stable margin position (page
//! numbers, document titles in headers, copyright lines) has high
//! recurrence but no structural meaning and must never enter the heading
//! candidate pool.

use std::collections::{HashMap, HashSet};

use unicode_normalization::UnicodeNormalization;

use crate::model::{DocumentInput, PageLines, TextLine};

use super::EngineOptions;

/// Which margin band a line sits in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Band {
    Header,
    Footer,
}

/// Classify a line into a margin band, if it sits in one.
fn band_of(line: &TextLine, page: &PageLines, margin_fraction: f32) -> Option<Band> {
    if page.height <= 0.0 {
        return None;
    }
    if line.bbox.y0 < page.height * margin_fraction {
        Some(Band::Header)
    } else if line.bbox.y1 > page.height * (1.0 - margin_fraction) {
        Some(Band::Footer)
    } else {
        None
    }
}

/// Normalize text for recurrence comparison: NFKC fold, lowercase, digit
/// runs collapsed to `#` so "Page 3 of 10" and "Page 7 of 10" compare
/// equal.
pub fn normalize(text: &str) -> String {
    let folded: String = text.nfkc().collect::<String>().to_lowercase();
    let mut out = String::with_capacity(folded.len());
    let mut in_digits = false;
    for c in folded.trim().chars() {
        if c.is_ascii_digit() {
            if !in_digits {
                out.push('#');
                in_digits = true;
            }
        } else {
            in_digits = false;
            out.push(c);
        }
    }
    out
}

/// Flag lines that recur across pages in a stable margin band.
///
/// Returns one `Vec<bool>` per page, parallel to that page's lines. A
/// single-page document never triggers detection: no cross-page
/// recurrence is observable, so every flag stays unset.
pub fn flag_recurring_lines(input: &DocumentInput, options: &EngineOptions) -> Vec<Vec<bool>> {
    let page_count = input.pages.len();
    if page_count < 2 {
        return input
            .pages
            .iter()
            .map(|p| vec![false; p.lines.len()])
            .collect();
    }

    // Count on how many distinct pages each (normalized text, band) key
    // appears.
    let mut occurrences: HashMap<(String, Band), HashSet<u32>> = HashMap::new();
    for page in &input.pages {
        for line in &page.lines {
            if let Some(band) = band_of(line, page, options.margin_fraction) {
                occurrences
                    .entry((normalize(&line.text), band))
                    .or_default()
                    .insert(page.number);
            }
        }
    }

    let min_pages = options.recurrence_threshold * page_count as f32;
    input
        .pages
        .iter()
        .map(|page| {
            page.lines
                .iter()
                .map(|line| {
                    band_of(line, page, options.margin_fraction)
                        .and_then(|band| occurrences.get(&(normalize(&line.text), band)))
                        .map(|pages| pages.len() as f32 > min_pages)
                        .unwrap_or(false)
                })
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BoundingBox;

    fn footer_line(text: &str, page: u32) -> TextLine {
        // Bottom 10% of a 792pt page starts at 712.8.
        TextLine::new(
            text,
            page,
            9.0,
            false,
            BoundingBox::new(250.0, 760.0, 350.0, 770.0),
        )
    }

    fn body_line(text: &str, page: u32, y: f32) -> TextLine {
        TextLine::new(text, page, 12.0, false, BoundingBox::new(72.0, y, 500.0, y + 12.0))
    }

    fn doc_with_footers(pages: u32) -> DocumentInput {
        let mut input = DocumentInput::new();
        for n in 1..=pages {
            let mut page = PageLines::letter(n);
            page.add_line(body_line("Some body content on this page", n, 300.0));
            page.add_line(footer_line(&format!("Page {} of {}", n, pages), n));
            input.pages.push(page);
        }
        input
    }

    #[test]
    fn test_normalize_collapses_digits() {
        assert_eq!(normalize("Page 3 of 10"), normalize("Page 7 of 10"));
        assert_eq!(normalize("Page 12"), "page #");
    }

    #[test]
    fn test_normalize_case_folds() {
        assert_eq!(normalize("ANNUAL REPORT"), "annual report");
    }

    #[test]
    fn test_recurring_footer_flagged() {
        let input = doc_with_footers(3);
        let flags = flag_recurring_lines(&input, &EngineOptions::default());

        for page_flags in &flags {
            assert!(!page_flags[0], "body line must not be flagged");
            assert!(page_flags[1], "recurring footer must be flagged");
        }
    }

    #[test]
    fn test_single_page_never_flagged() {
        let input = doc_with_footers(1);
        let flags = flag_recurring_lines(&input, &EngineOptions::default());
        assert!(flags[0].iter().all(|&f| !f));
    }

    #[test]
    fn test_non_recurring_footer_not_flagged() {
        let mut input = DocumentInput::new();
        for n in 1..=4 {
            let mut page = PageLines::letter(n);
            page.add_line(body_line("body", n, 300.0));
            // A margin line that appears on a single page only.
            if n == 2 {
                page.add_line(footer_line("Figure credits", n));
            }
            input.pages.push(page);
        }

        let flags = flag_recurring_lines(&input, &EngineOptions::default());
        assert!(flags[1].iter().all(|&f| !f));
    }

    #[test]
    fn test_body_text_outside_bands_ignored() {
        // The same text repeating mid-page is not header/footer boilerplate.
        let mut input = DocumentInput::new();
        for n in 1..=3 {
            let mut page = PageLines::letter(n);
            page.add_line(body_line("repeated mid-page text", n, 400.0));
            input.pages.push(page);
        }

        let flags = flag_recurring_lines(&input, &EngineOptions::default());
        assert!(flags.iter().flatten().all(|&f| !f));
    }
}
