//! Visual-weight tiering of accepted candidates.
//!
//! Candidates cluster by (font size, boldness) into at most three ordered
//! tiers mapped to H1/H2/H3; anything visually lighter than the third
//! tier is discarded, capping hierarchy depth by design.

use std::collections::BTreeSet;

use crate::model::HeadingLevel;

use super::score::HeadingCandidate;

/// The (font size, boldness) pair used to cluster candidates.
///
/// Size is held in tenths of a point so keys are hashable and ordering is
/// exact. Ordering is descending visual prominence: larger size first,
/// bold preferred at equal size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WeightKey {
    /// Font size in tenths of a point
    pub size_decipoints: i32,
    /// Boldness
    pub bold: bool,
}

impl WeightKey {
    /// Build the key for a candidate's line.
    pub fn of(candidate: &HeadingCandidate) -> Self {
        Self {
            size_decipoints: (candidate.line.font_size * 10.0).round() as i32,
            bold: candidate.line.is_bold,
        }
    }
}

impl Ord for WeightKey {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        other
            .size_decipoints
            .cmp(&self.size_decipoints)
            .then(other.bold.cmp(&self.bold))
    }
}

impl PartialOrd for WeightKey {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// A candidate with its assigned level.
#[derive(Debug, Clone)]
pub struct LeveledCandidate {
    /// The accepted candidate
    pub candidate: HeadingCandidate,
    /// Its hierarchy level
    pub level: HeadingLevel,
}

/// Map candidates to H1/H2/H3 by the top three distinct weight keys.
///
/// Input and output are in document order; candidates whose key falls
/// below the third tier are dropped. Fewer than three distinct keys just
/// leaves the lower tiers unpopulated.
pub fn assign_levels(candidates: Vec<HeadingCandidate>) -> Vec<LeveledCandidate> {
    // BTreeSet orders by descending prominence via WeightKey's Ord.
    let tiers: Vec<WeightKey> = candidates
        .iter()
        .map(WeightKey::of)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .take(3)
        .collect();

    let level_of = |key: WeightKey| -> Option<HeadingLevel> {
        tiers.iter().position(|t| *t == key).map(|i| match i {
            0 => HeadingLevel::H1,
            1 => HeadingLevel::H2,
            _ => HeadingLevel::H3,
        })
    };

    candidates
        .into_iter()
        .filter_map(|candidate| {
            level_of(WeightKey::of(&candidate)).map(|level| LeveledCandidate { candidate, level })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BoundingBox, TextLine};

    fn candidate(text: &str, size: f32, bold: bool) -> HeadingCandidate {
        HeadingCandidate {
            line: TextLine::new(
                text,
                1,
                size,
                bold,
                BoundingBox::new(72.0, 100.0, 300.0, 100.0 + size),
            ),
            score: 50.0,
        }
    }

    #[test]
    fn test_weight_key_ordering() {
        let big = WeightKey { size_decipoints: 240, bold: false };
        let small = WeightKey { size_decipoints: 180, bold: true };
        assert!(big < small, "larger size sorts first");

        let bold = WeightKey { size_decipoints: 180, bold: true };
        let plain = WeightKey { size_decipoints: 180, bold: false };
        assert!(bold < plain, "bold wins ties at equal size");
    }

    #[test]
    fn test_three_tiers_assigned() {
        let leveled = assign_levels(vec![
            candidate("Chapter", 24.0, true),
            candidate("Section", 18.0, true),
            candidate("Subsection", 14.0, false),
            candidate("Another Section", 18.0, true),
        ]);

        assert_eq!(leveled.len(), 4);
        assert_eq!(leveled[0].level, HeadingLevel::H1);
        assert_eq!(leveled[1].level, HeadingLevel::H2);
        assert_eq!(leveled[2].level, HeadingLevel::H3);
        assert_eq!(leveled[3].level, HeadingLevel::H2);
    }

    #[test]
    fn test_fourth_tier_discarded() {
        let leveled = assign_levels(vec![
            candidate("A", 24.0, true),
            candidate("B", 20.0, true),
            candidate("C", 16.0, true),
            candidate("D", 14.0, true),
        ]);

        assert_eq!(leveled.len(), 3);
        assert!(leveled.iter().all(|l| l.candidate.line.text != "D"));
    }

    #[test]
    fn test_single_tier_only_h1() {
        let leveled = assign_levels(vec![
            candidate("One", 18.0, false),
            candidate("Two", 18.0, false),
        ]);

        assert_eq!(leveled.len(), 2);
        assert!(leveled.iter().all(|l| l.level == HeadingLevel::H1));
    }

    #[test]
    fn test_document_order_preserved() {
        let leveled = assign_levels(vec![
            candidate("Later Big", 18.0, false),
            candidate("Earlier Small", 14.0, false),
            candidate("Big Again", 18.0, false),
        ]);

        let texts: Vec<&str> = leveled.iter().map(|l| l.candidate.line.text.as_str()).collect();
        assert_eq!(texts, vec!["Later Big", "Earlier Small", "Big Again"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(assign_levels(Vec::new()).is_empty());
    }
}
