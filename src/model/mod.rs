//! Data model for outline extraction.
//!
//! Input types describe what the engine consumes from a line extractor
//! ([`DocumentInput`], [`PageLines`], [`TextLine`]); output types describe
//! what it produces ([`DocumentResult`], [`OutlineNode`]).

mod line;
mod outline;

pub use line::{BoundingBox, DocumentInput, EmbeddedTocEntry, PageLines, TextLine};
pub use outline::{DocumentResult, HeadingLevel, OutlineNode};
