//! Line extractor boundary.
//!
//! The engine consumes a [`DocumentInput`](crate::model::DocumentInput)
//! and does not care where it came from. [`DocumentSource`] is the seam:
//! the bundled [`PdfSource`] reads real PDFs through lopdf, and tests
//! build inputs by hand.

mod pdf;

pub use pdf::PdfSource;

use crate::error::Result;
use crate::model::DocumentInput;

/// Anything that can deliver per-page text lines, a metadata title, and
/// native outline entries for one document.
pub trait DocumentSource {
    /// Read the full document input.
    ///
    /// A failure here means the document is skipped; it must not affect
    /// other documents in a batch.
    fn read(&self) -> Result<DocumentInput>;
}

impl DocumentSource for DocumentInput {
    fn read(&self) -> Result<DocumentInput> {
        Ok(self.clone())
    }
}
