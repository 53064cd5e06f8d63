//! Input-side types: text lines with font metrics, page geometry, and
//! the document metadata delivered by a line extractor.

use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in top-down page coordinates.
///
/// `y0` is the distance from the top edge of the page to the top of the
/// line; `y1` is the bottom. Extractors working in PDF's bottom-up space
/// must convert before constructing a [`TextLine`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Left edge
    pub x0: f32,
    /// Top edge
    pub y0: f32,
    /// Right edge
    pub x1: f32,
    /// Bottom edge
    pub y1: f32,
}

impl BoundingBox {
    /// Create a new bounding box.
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Width of the box.
    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    /// Height of the box.
    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    /// Horizontal center of the box.
    pub fn center_x(&self) -> f32 {
        (self.x0 + self.x1) / 2.0
    }
}

/// One visually coherent line of text on a page.
///
/// Lines within a page are expected in reading order: top to bottom, then
/// left to right for the same baseline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextLine {
    /// Trimmed text content
    pub text: String,

    /// Page number (1-indexed)
    pub page_number: u32,

    /// Dominant font size in points
    pub font_size: f32,

    /// Whether the line is predominantly bold
    pub is_bold: bool,

    /// Position on the page
    pub bbox: BoundingBox,

    /// Whitespace distance from the previous line on the same page.
    /// Zero for the first line of a page.
    pub vertical_gap_before: f32,
}

impl TextLine {
    /// Create a new text line.
    pub fn new(
        text: impl Into<String>,
        page_number: u32,
        font_size: f32,
        is_bold: bool,
        bbox: BoundingBox,
    ) -> Self {
        Self {
            text: text.into(),
            page_number,
            font_size,
            is_bold,
            bbox,
            vertical_gap_before: 0.0,
        }
    }

    /// Set the vertical gap to the previous line.
    pub fn with_gap_before(mut self, gap: f32) -> Self {
        self.vertical_gap_before = gap.max(0.0);
        self
    }

    /// Number of whitespace-separated tokens in the line.
    pub fn token_count(&self) -> usize {
        self.text.split_whitespace().count()
    }

    /// Check if the line holds any non-whitespace content.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// The lines of a single page together with the page geometry the
/// boilerplate filter and alignment feature need.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageLines {
    /// Page number (1-indexed)
    pub number: u32,

    /// Page width in points
    pub width: f32,

    /// Page height in points
    pub height: f32,

    /// Lines in reading order
    pub lines: Vec<TextLine>,
}

impl PageLines {
    /// Create an empty page with the given dimensions.
    pub fn new(number: u32, width: f32, height: f32) -> Self {
        Self {
            number,
            width,
            height,
            lines: Vec::new(),
        }
    }

    /// Create an empty page with standard Letter dimensions.
    pub fn letter(number: u32) -> Self {
        Self::new(number, 612.0, 792.0)
    }

    /// Add a line to the page.
    pub fn add_line(&mut self, line: TextLine) {
        self.lines.push(line);
    }

    /// Check if the page has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// A native outline entry read from a PDF's own bookmark tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddedTocEntry {
    /// Entry title
    pub title: String,

    /// Nesting depth (1 = top level)
    pub level: u32,

    /// Destination page (1-indexed)
    pub page: u32,
}

impl EmbeddedTocEntry {
    /// Create a new entry.
    pub fn new(title: impl Into<String>, level: u32, page: u32) -> Self {
        Self {
            title: title.into(),
            level,
            page,
        }
    }

    /// Check that the entry carries usable data.
    pub fn is_well_formed(&self) -> bool {
        !self.title.trim().is_empty() && self.level >= 1 && self.page >= 1
    }
}

/// Everything the engine consumes for one document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentInput {
    /// Metadata title, if the document declares one
    pub title: Option<String>,

    /// Native outline entries in document order (empty when absent)
    pub toc: Vec<EmbeddedTocEntry>,

    /// Per-page line sequences in page order
    pub pages: Vec<PageLines>,
}

impl DocumentInput {
    /// Create an empty input.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Total number of lines across all pages.
    pub fn line_count(&self) -> usize {
        self.pages.iter().map(|p| p.lines.len()).sum()
    }

    /// Iterate over all lines in document order.
    pub fn lines(&self) -> impl Iterator<Item = &TextLine> {
        self.pages.iter().flat_map(|p| p.lines.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounding_box() {
        let bbox = BoundingBox::new(72.0, 100.0, 172.0, 120.0);
        assert_eq!(bbox.width(), 100.0);
        assert_eq!(bbox.height(), 20.0);
        assert_eq!(bbox.center_x(), 122.0);
    }

    #[test]
    fn test_text_line_tokens() {
        let line = TextLine::new(
            "1. Introduction to the system",
            1,
            12.0,
            false,
            BoundingBox::new(0.0, 0.0, 100.0, 12.0),
        );
        assert_eq!(line.token_count(), 5);
        assert!(!line.is_blank());
    }

    #[test]
    fn test_gap_never_negative() {
        let line = TextLine::new("x", 1, 12.0, false, BoundingBox::new(0.0, 0.0, 10.0, 12.0))
            .with_gap_before(-3.0);
        assert_eq!(line.vertical_gap_before, 0.0);
    }

    #[test]
    fn test_toc_entry_well_formed() {
        assert!(EmbeddedTocEntry::new("Chapter 1", 1, 1).is_well_formed());
        assert!(!EmbeddedTocEntry::new("  ", 1, 1).is_well_formed());
        assert!(!EmbeddedTocEntry::new("Chapter 1", 0, 1).is_well_formed());
        assert!(!EmbeddedTocEntry::new("Chapter 1", 1, 0).is_well_formed());
    }

    #[test]
    fn test_document_input_counts() {
        let mut input = DocumentInput::new();
        let mut page = PageLines::letter(1);
        page.add_line(TextLine::new(
            "Hello",
            1,
            12.0,
            false,
            BoundingBox::new(72.0, 72.0, 120.0, 84.0),
        ));
        input.pages.push(page);
        input.pages.push(PageLines::letter(2));

        assert_eq!(input.page_count(), 2);
        assert_eq!(input.line_count(), 1);
    }
}
