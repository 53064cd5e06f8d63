//! lopdf-backed reference line extractor.
//!
//! Walks each page's content stream tracking the text matrix and current
//! font, groups the resulting spans into baselines, and emits reading
//! ordered [`TextLine`]s in top-down page coordinates. Deliberately
//! single-column: gutter detection is not this crate's concern.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use lopdf::{Document as LopdfDocument, Object, ObjectId};

use crate::error::{Error, Result};
use crate::model::{BoundingBox, DocumentInput, EmbeddedTocEntry, PageLines, TextLine};

use super::DocumentSource;

/// A positioned run of text from a content stream.
#[derive(Debug, Clone)]
struct TextSpan {
    text: String,
    x: f32,
    /// Baseline Y in PDF bottom-up space
    y: f32,
    font_size: f32,
    is_bold: bool,
}

impl TextSpan {
    fn new(text: String, x: f32, y: f32, font_size: f32, font_name: &str) -> Self {
        let lowered = font_name.to_lowercase();
        let is_bold = lowered.contains("bold")
            || lowered.contains("black")
            || lowered.contains("heavy");
        Self {
            text,
            x,
            y,
            font_size,
            is_bold,
        }
    }

    /// Estimated advance width. Content streams carry no glyph metrics at
    /// this level, so half an em per character is used.
    fn width(&self) -> f32 {
        self.text.chars().count() as f32 * self.font_size * 0.5
    }
}

/// PDF document source backed by lopdf.
pub struct PdfSource {
    doc: LopdfDocument,
}

impl PdfSource {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let doc = LopdfDocument::load(path)?;
        Ok(Self { doc })
    }

    /// Load a PDF from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let doc = LopdfDocument::load_mem(data)?;
        Ok(Self { doc })
    }

    /// Extract the document metadata title, if declared.
    fn metadata_title(&self) -> Option<String> {
        let info = self.doc.trailer.get(b"Info").ok()?;
        let info_ref = info.as_reference().ok()?;
        let info_dict = self.doc.get_dictionary(info_ref).ok()?;
        dict_string(info_dict, b"Title").filter(|t| !t.trim().is_empty())
    }

    /// Extract the native outline, flattened to document order.
    ///
    /// Any structural problem degrades to an empty outline; the engine
    /// then takes the heuristic path.
    fn embedded_toc(&self) -> Vec<EmbeddedTocEntry> {
        let mut entries = Vec::new();
        let walked = (|| -> Result<()> {
            let catalog = self.doc.catalog()?;
            if let Ok(outlines) = catalog.get(b"Outlines") {
                let outlines_ref = outlines.as_reference()?;
                let outlines_dict = self.doc.get_dictionary(outlines_ref)?;
                if let Ok(first) = outlines_dict.get(b"First") {
                    self.walk_outline_items(first.as_reference()?, 1, &mut entries)?;
                }
            }
            Ok(())
        })();

        if let Err(e) = walked {
            log::warn!("failed to read native outline: {}", e);
            return Vec::new();
        }
        entries
    }

    fn walk_outline_items(
        &self,
        item_ref: ObjectId,
        depth: u32,
        entries: &mut Vec<EmbeddedTocEntry>,
    ) -> Result<()> {
        if let Ok(item_dict) = self.doc.get_dictionary(item_ref) {
            let title = dict_string(item_dict, b"Title").unwrap_or_default();
            let page = self.outline_destination(item_dict).unwrap_or(0);
            entries.push(EmbeddedTocEntry::new(title, depth, page));

            if let Ok(first) = item_dict.get(b"First") {
                if let Ok(first_ref) = first.as_reference() {
                    self.walk_outline_items(first_ref, depth + 1, entries)?;
                }
            }
            if let Ok(next) = item_dict.get(b"Next") {
                if let Ok(next_ref) = next.as_reference() {
                    self.walk_outline_items(next_ref, depth, entries)?;
                }
            }
        }
        Ok(())
    }

    /// Destination page of an outline item, via Dest or a GoTo action.
    fn outline_destination(&self, item_dict: &lopdf::Dictionary) -> Option<u32> {
        if let Ok(dest) = item_dict.get(b"Dest") {
            return self.resolve_destination(dest);
        }
        if let Ok(action) = item_dict.get(b"A") {
            if let Ok(action_ref) = action.as_reference() {
                if let Ok(action_dict) = self.doc.get_dictionary(action_ref) {
                    if let Ok(dest) = action_dict.get(b"D") {
                        return self.resolve_destination(dest);
                    }
                }
            }
        }
        None
    }

    fn resolve_destination(&self, dest: &Object) -> Option<u32> {
        let pages = self.doc.get_pages();
        let dest_array = dest.as_array().ok()?;
        let page_ref = dest_array.first()?.as_reference().ok()?;
        pages
            .iter()
            .find(|(_, id)| **id == page_ref)
            .map(|(num, _)| *num)
    }

    /// Page dimensions from the MediaBox, defaulting to Letter.
    fn page_dimensions(&self, page_id: ObjectId) -> (f32, f32) {
        if let Ok(page_dict) = self.doc.get_dictionary(page_id) {
            if let Ok(media_box) = page_dict.get(b"MediaBox") {
                if let Ok(array) = media_box.as_array() {
                    if array.len() >= 4 {
                        let width = array[2].as_float().unwrap_or(612.0);
                        let height = array[3].as_float().unwrap_or(792.0);
                        return (width, height);
                    }
                }
            }
        }
        (612.0, 792.0)
    }

    /// Extract positioned text spans from one page's content stream.
    fn page_spans(&self, page_id: ObjectId) -> Result<Vec<TextSpan>> {
        let lopdf_fonts = self
            .doc
            .get_page_fonts(page_id)
            .map_err(|e| Error::Extraction(e.to_string()))?;

        let mut font_names: HashMap<Vec<u8>, String> = HashMap::new();
        for (name, font) in &lopdf_fonts {
            let base_font = font
                .get(b"BaseFont")
                .ok()
                .and_then(|o| o.as_name().ok())
                .map(|n| String::from_utf8_lossy(n).to_string())
                .unwrap_or_else(|| "Unknown".to_string());
            font_names.insert(name.clone(), base_font);
        }

        let content = self.page_content(page_id)?;
        self.parse_content_stream(&content, &font_names, &lopdf_fonts)
    }

    fn page_content(&self, page_id: ObjectId) -> Result<Vec<u8>> {
        let page_dict = self
            .doc
            .get_dictionary(page_id)
            .map_err(|e| Error::Extraction(e.to_string()))?;
        let contents = page_dict
            .get(b"Contents")
            .map_err(|e| Error::Extraction(e.to_string()))?;

        match contents {
            Object::Reference(r) => {
                if let Ok(Object::Stream(s)) = self.doc.get_object(*r) {
                    return s
                        .decompressed_content()
                        .map_err(|e| Error::Extraction(e.to_string()));
                }
                Err(Error::Extraction("invalid content stream".to_string()))
            }
            Object::Array(arr) => {
                let mut content = Vec::new();
                for obj in arr {
                    if let Object::Reference(r) = obj {
                        if let Ok(Object::Stream(s)) = self.doc.get_object(*r) {
                            if let Ok(data) = s.decompressed_content() {
                                content.extend_from_slice(&data);
                                content.push(b' ');
                            }
                        }
                    }
                }
                Ok(content)
            }
            _ => Err(Error::Extraction("invalid content stream".to_string())),
        }
    }

    fn parse_content_stream(
        &self,
        content: &[u8],
        font_names: &HashMap<Vec<u8>, String>,
        lopdf_fonts: &BTreeMap<Vec<u8>, &lopdf::Dictionary>,
    ) -> Result<Vec<TextSpan>> {
        let content = lopdf::content::Content::decode(content)
            .map_err(|e| Error::Extraction(e.to_string()))?;

        let mut spans = Vec::new();
        let mut current_font = String::new();
        let mut current_font_name: Vec<u8> = Vec::new();
        let mut current_font_size: f32 = 12.0;
        let mut matrix = TextMatrix::default();
        let mut in_text_block = false;

        for op in content.operations {
            match op.operator.as_str() {
                "BT" => {
                    in_text_block = true;
                    matrix = TextMatrix::default();
                }
                "ET" => {
                    in_text_block = false;
                }
                "Tf" => {
                    if op.operands.len() >= 2 {
                        if let Object::Name(font_name) = &op.operands[0] {
                            current_font_name = font_name.clone();
                            current_font = font_names
                                .get(font_name.as_slice())
                                .cloned()
                                .unwrap_or_else(|| {
                                    String::from_utf8_lossy(font_name.as_slice()).to_string()
                                });
                        }
                        current_font_size = number_of(&op.operands[1]).unwrap_or(12.0);
                    }
                }
                "Td" | "TD" => {
                    if op.operands.len() >= 2 {
                        let tx = number_of(&op.operands[0]).unwrap_or(0.0);
                        let ty = number_of(&op.operands[1]).unwrap_or(0.0);
                        matrix.translate(tx, ty);
                    }
                }
                "Tm" => {
                    if op.operands.len() >= 6 {
                        matrix.set(
                            number_of(&op.operands[0]).unwrap_or(1.0),
                            number_of(&op.operands[1]).unwrap_or(0.0),
                            number_of(&op.operands[2]).unwrap_or(0.0),
                            number_of(&op.operands[3]).unwrap_or(1.0),
                            number_of(&op.operands[4]).unwrap_or(0.0),
                            number_of(&op.operands[5]).unwrap_or(0.0),
                        );
                    }
                }
                "T*" => {
                    matrix.next_line();
                }
                "Tj" | "TJ" => {
                    if in_text_block {
                        let encoding = lopdf_fonts
                            .get(&current_font_name)
                            .and_then(|f| f.get_font_encoding(&self.doc).ok());
                        let decode = |bytes: &[u8]| match encoding.as_ref() {
                            Some(enc) => LopdfDocument::decode_text(enc, bytes)
                                .unwrap_or_else(|_| decode_text_simple(bytes)),
                            None => decode_text_simple(bytes),
                        };

                        let text = if op.operator == "TJ" {
                            if let Some(Object::Array(arr)) = op.operands.first() {
                                decode_tj_array(arr, decode)
                            } else {
                                String::new()
                            }
                        } else if let Some(Object::String(bytes, _)) = op.operands.first() {
                            decode(bytes)
                        } else {
                            String::new()
                        };

                        if !text.trim().is_empty() {
                            let (x, y) = matrix.position();
                            let size = current_font_size * matrix.scale();
                            spans.push(TextSpan::new(text, x, y, size, &current_font));
                        }
                    }
                }
                "'" | "\"" => {
                    matrix.next_line();
                    if in_text_block {
                        let text_idx = if op.operator == "\"" { 2 } else { 0 };
                        if let Some(Object::String(bytes, _)) = op.operands.get(text_idx) {
                            let encoding = lopdf_fonts
                                .get(&current_font_name)
                                .and_then(|f| f.get_font_encoding(&self.doc).ok());
                            let text = match encoding.as_ref() {
                                Some(enc) => LopdfDocument::decode_text(enc, bytes)
                                    .unwrap_or_else(|_| decode_text_simple(bytes)),
                                None => decode_text_simple(bytes),
                            };
                            if !text.trim().is_empty() {
                                let (x, y) = matrix.position();
                                let size = current_font_size * matrix.scale();
                                spans.push(TextSpan::new(text, x, y, size, &current_font));
                            }
                        }
                    }
                }
                _ => {}
            }
        }

        Ok(spans)
    }
}

impl DocumentSource for PdfSource {
    fn read(&self) -> Result<DocumentInput> {
        let mut input = DocumentInput::new();
        input.title = self.metadata_title();
        input.toc = self.embedded_toc();

        for (page_num, page_id) in self.doc.get_pages() {
            let (width, height) = self.page_dimensions(page_id);
            let mut page = PageLines::new(page_num, width, height);

            match self.page_spans(page_id) {
                Ok(spans) => {
                    page.lines = assemble_lines(spans, page_num, height);
                }
                Err(e) => {
                    // One unreadable page does not fail the document.
                    log::warn!("skipping page {}: {}", page_num, e);
                }
            }
            input.pages.push(page);
        }

        Ok(input)
    }
}

/// Group spans into baselines and convert to reading-ordered text lines
/// in top-down coordinates.
fn assemble_lines(mut spans: Vec<TextSpan>, page_num: u32, page_height: f32) -> Vec<TextLine> {
    if spans.is_empty() {
        return Vec::new();
    }

    // Sort by Y descending (PDF space is bottom-up) then X.
    spans.sort_by(|a, b| {
        b.y.partial_cmp(&a.y)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal))
    });

    let mut grouped: Vec<Vec<TextSpan>> = Vec::new();
    let mut current: Vec<TextSpan> = Vec::new();
    let mut current_y: Option<f32> = None;

    for span in spans {
        let tolerance = span.font_size * 0.3;
        match current_y {
            Some(y) if (span.y - y).abs() <= tolerance => current.push(span),
            _ => {
                if !current.is_empty() {
                    grouped.push(std::mem::take(&mut current));
                }
                current_y = Some(span.y);
                current.push(span);
            }
        }
    }
    if !current.is_empty() {
        grouped.push(current);
    }

    let mut lines: Vec<TextLine> = Vec::with_capacity(grouped.len());
    for mut group in grouped {
        // Within a baseline, left to right.
        group.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal));
        if let Some(line) = line_from_spans(&group, page_num, page_height) {
            lines.push(line);
        }
    }

    // Gaps between consecutive lines, top-down.
    for i in 1..lines.len() {
        let gap = lines[i].bbox.y0 - lines[i - 1].bbox.y1;
        lines[i].vertical_gap_before = gap.max(0.0);
    }

    lines
}

fn line_from_spans(spans: &[TextSpan], page_num: u32, page_height: f32) -> Option<TextLine> {
    let first = spans.first()?;

    // Dominant size weighted by text length, bold when most characters are.
    let total_chars: usize = spans.iter().map(|s| s.text.chars().count()).sum();
    let font_size = if total_chars > 0 {
        spans
            .iter()
            .map(|s| s.font_size * s.text.chars().count() as f32)
            .sum::<f32>()
            / total_chars as f32
    } else {
        first.font_size
    };
    let bold_chars: usize = spans
        .iter()
        .filter(|s| s.is_bold)
        .map(|s| s.text.chars().count())
        .sum();
    let is_bold = total_chars > 0 && bold_chars as f32 / total_chars as f32 > 0.5;

    // Join spans, inserting a space across visible horizontal gaps.
    let mut text = String::new();
    let mut prev_end: Option<f32> = None;
    for span in spans {
        if let Some(end) = prev_end {
            let gap = span.x - end;
            if gap > span.font_size * 0.1 && !text.ends_with(' ') && !span.text.starts_with(' ') {
                text.push(' ');
            }
        }
        text.push_str(&span.text);
        prev_end = Some(span.x + span.width());
    }
    let text = text.trim().to_string();
    if text.is_empty() {
        return None;
    }

    let x0 = spans
        .iter()
        .map(|s| s.x)
        .fold(f32::INFINITY, f32::min);
    let x1 = spans
        .iter()
        .map(|s| s.x + s.width())
        .fold(f32::NEG_INFINITY, f32::max);

    // Baseline to approximate ascender/descender, flipped to top-down.
    let y_top = page_height - (first.y + font_size * 0.8);
    let y_bottom = page_height - (first.y - font_size * 0.2);

    Some(TextLine::new(
        text,
        page_num,
        font_size,
        is_bold,
        BoundingBox::new(x0, y_top, x1, y_bottom),
    ))
}

/// Text matrix state for tracking positions in a content stream.
#[derive(Debug, Clone)]
struct TextMatrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Default for TextMatrix {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
        }
    }
}

impl TextMatrix {
    fn set(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) {
        self.a = a;
        self.b = b;
        self.c = c;
        self.d = d;
        self.e = e;
        self.f = f;
    }

    fn translate(&mut self, tx: f32, ty: f32) {
        self.e += tx * self.a + ty * self.c;
        self.f += tx * self.b + ty * self.d;
    }

    fn next_line(&mut self) {
        self.f -= 12.0 * self.d;
    }

    fn position(&self) -> (f32, f32) {
        (self.e, self.f)
    }

    fn scale(&self) -> f32 {
        (self.a * self.a + self.c * self.c).sqrt()
    }
}

fn number_of(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// TJ operands interleave strings with kerning adjustments; a large
/// negative adjustment usually stands in for a word space.
fn decode_tj_array<F: Fn(&[u8]) -> String>(arr: &[Object], decode: F) -> String {
    let space_threshold = 200.0;
    let mut combined = String::new();
    for item in arr {
        match item {
            Object::String(bytes, _) => combined.push_str(&decode(bytes)),
            Object::Integer(n) => {
                if -(*n as f32) > space_threshold && !combined.is_empty() && !combined.ends_with(' ')
                {
                    combined.push(' ');
                }
            }
            Object::Real(n) => {
                if -n > space_threshold && !combined.is_empty() && !combined.ends_with(' ') {
                    combined.push(' ');
                }
            }
            _ => {}
        }
    }
    combined
}

/// Fallback decoding when the font declares no usable encoding.
fn decode_text_simple(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks(2)
            .filter_map(|c| {
                if c.len() == 2 {
                    Some(u16::from_be_bytes([c[0], c[1]]))
                } else {
                    None
                }
            })
            .collect();
        return String::from_utf16(&utf16).unwrap_or_default();
    }
    if let Ok(s) = String::from_utf8(bytes.to_vec()) {
        return s;
    }
    bytes.iter().map(|&b| b as char).collect()
}

/// PDF info dictionary strings come as raw byte strings.
fn dict_string(dict: &lopdf::Dictionary, key: &[u8]) -> Option<String> {
    match dict.get(key).ok()? {
        Object::String(bytes, _) => Some(decode_text_simple(bytes)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(text: &str, x: f32, y: f32, size: f32, font: &str) -> TextSpan {
        TextSpan::new(text.to_string(), x, y, size, font)
    }

    #[test]
    fn test_bold_detection_from_font_name() {
        assert!(span("x", 0.0, 0.0, 12.0, "Helvetica-Bold").is_bold);
        assert!(span("x", 0.0, 0.0, 12.0, "Arial Black").is_bold);
        assert!(!span("x", 0.0, 0.0, 12.0, "Helvetica-Oblique").is_bold);
    }

    #[test]
    fn test_assemble_lines_reading_order() {
        // Bottom-up PDF coordinates: higher y is closer to the page top.
        let spans = vec![
            span("second", 72.0, 600.0, 12.0, "Helvetica"),
            span("first", 72.0, 700.0, 12.0, "Helvetica"),
        ];
        let lines = assemble_lines(spans, 1, 792.0);

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text, "first");
        assert_eq!(lines[1].text, "second");
        assert!(lines[0].bbox.y0 < lines[1].bbox.y0);
        assert_eq!(lines[0].vertical_gap_before, 0.0);
        assert!(lines[1].vertical_gap_before > 0.0);
    }

    #[test]
    fn test_same_baseline_spans_merge() {
        let spans = vec![
            span("Hello", 72.0, 700.0, 12.0, "Helvetica"),
            span("world", 120.0, 700.5, 12.0, "Helvetica"),
        ];
        let lines = assemble_lines(spans, 1, 792.0);

        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "Hello world");
    }

    #[test]
    fn test_decode_text_simple_utf16() {
        let bytes = [0xFE, 0xFF, 0x00, 0x41, 0x00, 0x42];
        assert_eq!(decode_text_simple(&bytes), "AB");
    }

    #[test]
    fn test_decode_text_simple_utf8() {
        assert_eq!(decode_text_simple("héllo".as_bytes()), "héllo");
    }

    #[test]
    fn test_open_rejects_garbage() {
        let result = PdfSource::from_bytes(b"definitely not a pdf");
        assert!(result.is_err());
    }
}
