//! Output-side types: the flat outline and the per-document result.

use serde::{Deserialize, Serialize};

/// Hierarchy level of an outline node.
///
/// The engine caps hierarchy depth at three levels; deeper native outline
/// entries clamp to [`HeadingLevel::H3`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
}

impl HeadingLevel {
    /// Map a 1-indexed nesting depth to a level, clamping depth >= 3 to H3.
    pub fn from_depth(depth: u32) -> Self {
        match depth {
            0 | 1 => HeadingLevel::H1,
            2 => HeadingLevel::H2,
            _ => HeadingLevel::H3,
        }
    }
}

impl std::fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HeadingLevel::H1 => write!(f, "H1"),
            HeadingLevel::H2 => write!(f, "H2"),
            HeadingLevel::H3 => write!(f, "H3"),
        }
    }
}

/// A single heading in the final outline.
///
/// Nodes are flat: hierarchy is carried by `level` plus document order,
/// never by a parent/child graph. Nodes are not mutated after the builder
/// returns them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlineNode {
    /// Heading level
    pub level: HeadingLevel,

    /// Heading text
    pub text: String,

    /// Page the heading appears on (1-indexed)
    pub page: u32,
}

impl OutlineNode {
    /// Create a new outline node.
    pub fn new(level: HeadingLevel, text: impl Into<String>, page: u32) -> Self {
        Self {
            level,
            text: text.into(),
            page,
        }
    }
}

/// The result of processing one document.
///
/// Serializes to `{ "title": ..., "outline": [ { "level", "text", "page" } ] }`
/// with outline entries in strict document reading order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentResult {
    /// Document title, empty when none could be determined
    pub title: String,

    /// Headings in reading order
    pub outline: Vec<OutlineNode>,
}

impl DocumentResult {
    /// Create an empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a result with a title and outline.
    pub fn with_outline(title: impl Into<String>, outline: Vec<OutlineNode>) -> Self {
        Self {
            title: title.into(),
            outline,
        }
    }

    /// Check if the result carries neither title nor headings.
    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.outline.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_from_depth_clamps() {
        assert_eq!(HeadingLevel::from_depth(1), HeadingLevel::H1);
        assert_eq!(HeadingLevel::from_depth(2), HeadingLevel::H2);
        assert_eq!(HeadingLevel::from_depth(3), HeadingLevel::H3);
        assert_eq!(HeadingLevel::from_depth(7), HeadingLevel::H3);
    }

    #[test]
    fn test_level_serializes_as_label() {
        let json = serde_json::to_string(&HeadingLevel::H2).unwrap();
        assert_eq!(json, "\"H2\"");
    }

    #[test]
    fn test_result_json_shape() {
        let result = DocumentResult::with_outline(
            "Report",
            vec![OutlineNode::new(HeadingLevel::H1, "Introduction", 1)],
        );
        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(
            json,
            "{\"title\":\"Report\",\"outline\":[{\"level\":\"H1\",\"text\":\"Introduction\",\"page\":1}]}"
        );
    }

    #[test]
    fn test_empty_result() {
        assert!(DocumentResult::new().is_empty());
    }
}
