//! Heading level assignment and structural validation.
//!
//! Candidates map to levels by numbering depth when present, otherwise by
//! descending font-tier rank. A single linear scan over an explicit bounded
//! stack then repairs illegal nesting (a heading more than one level deeper
//! than its nearest open ancestor is promoted to the minimum legal level) and
//! collapses consecutive duplicates. Repairs are recorded, never raised.

use unicode_normalization::UnicodeNormalization;

use crate::model::{Heading, HeadingLevel, Repair};
use crate::outline::candidates::HeadingCandidate;

/// Maximum nesting depth of the produced hierarchy.
pub const MAX_DEPTH: u8 = 4;

/// The validator's state: the stack of currently open heading depths,
/// strictly increasing, bounded at [`MAX_DEPTH`].
#[derive(Debug, Default)]
pub struct LevelStack {
    open: Vec<u8>,
}

impl LevelStack {
    /// Create an empty stack (document start).
    pub fn new() -> Self {
        Self::default()
    }

    /// Admit a candidate at the proposed depth, closing any open levels at
    /// the same or deeper depth first. Returns the legal depth the candidate
    /// was admitted at; a return value smaller than the proposal means the
    /// candidate was promoted.
    pub fn admit(&mut self, proposed: u8) -> u8 {
        let proposed = proposed.clamp(1, MAX_DEPTH);
        while self.open.last().is_some_and(|&d| d >= proposed) {
            self.open.pop();
        }
        let legal_max = self.open.last().copied().unwrap_or(0) + 1;
        let admitted = proposed.min(legal_max);
        self.open.push(admitted);
        admitted
    }

    /// Currently open depths, shallowest first.
    pub fn open_levels(&self) -> &[u8] {
        &self.open
    }
}

/// Assigns levels and validates nesting for one document's candidates.
pub struct HierarchyValidator;

impl HierarchyValidator {
    /// Create a validator.
    pub fn new() -> Self {
        Self
    }

    /// Build the validated heading list. Candidates must be in document
    /// order. Returns the headings plus the structural corrections applied.
    pub fn build(&self, candidates: &[HeadingCandidate]) -> (Vec<Heading>, Vec<Repair>) {
        let assigned = assign_levels(candidates);

        let mut headings: Vec<Heading> = Vec::with_capacity(assigned.len());
        let mut repairs = Vec::new();
        let mut stack = LevelStack::new();
        let mut last_key: Option<(String, u32)> = None;

        for (level, candidate) in assigned {
            let key = normalize_heading(&candidate.text);

            // Consecutive duplicates on the same or next page collapse into
            // the first occurrence.
            let is_duplicate = last_key
                .as_ref()
                .is_some_and(|(prev, page)| *prev == key && candidate.page <= page + 1);
            if is_duplicate {
                log::warn!(
                    "collapsed duplicate heading {:?} on page {}",
                    candidate.text,
                    candidate.page
                );
                repairs.push(Repair::DuplicateCollapsed {
                    text: candidate.text.clone(),
                    page: candidate.page,
                });
                // A run of duplicates (e.g. a repeated page header) collapses
                // as a chain.
                last_key = Some((key, candidate.page));
                continue;
            }

            let admitted = stack.admit(level.depth());
            let final_level = HeadingLevel::from_depth(admitted);
            if final_level != level {
                log::warn!(
                    "promoted heading {:?} on page {} from {} to {}",
                    candidate.text,
                    candidate.page,
                    level,
                    final_level
                );
                repairs.push(Repair::Promoted {
                    text: candidate.text.clone(),
                    page: candidate.page,
                    from: level,
                    to: final_level,
                });
            }

            last_key = Some((key, candidate.page));
            headings.push(Heading::new(final_level, candidate.text.clone(), candidate.page));
        }

        (headings, repairs)
    }
}

impl Default for HierarchyValidator {
    fn default() -> Self {
        Self::new()
    }
}

/// Map candidates to levels: numbering depth takes precedence; otherwise the
/// candidate's font tier, re-ranked over the tiers the candidates actually
/// occupy (largest occupied tier becomes H1 even when a bigger title tier
/// exists elsewhere in the document).
fn assign_levels(candidates: &[HeadingCandidate]) -> Vec<(HeadingLevel, &HeadingCandidate)> {
    let mut occupied: Vec<usize> = candidates.iter().filter_map(|c| c.tier).collect();
    occupied.sort_unstable();
    occupied.dedup();

    candidates
        .iter()
        .map(|c| {
            let level = if let Some(depth) = c.numbering_depth {
                HeadingLevel::from_depth(depth)
            } else if let Some(tier) = c.tier {
                let rank = occupied.iter().position(|&t| t == tier).unwrap_or(0);
                HeadingLevel::from_depth(rank as u8 + 1)
            } else {
                // No tier and no numbering: bold/position-only documents
                // produce a flat hierarchy.
                HeadingLevel::H1
            };
            (level, c)
        })
        .collect()
}

/// Normalized form for duplicate comparison: NFKC, lowercased, whitespace
/// collapsed.
pub fn normalize_heading(text: &str) -> String {
    text.nfkc()
        .collect::<String>()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(text: &str, page: u32, tier: Option<usize>, depth: Option<u8>) -> HeadingCandidate {
        HeadingCandidate {
            text: text.into(),
            page,
            font_size: 18.0,
            bold: true,
            score: 8.0,
            numbering_depth: depth,
            y: 700.0,
            tier,
        }
    }

    #[test]
    fn test_level_stack_repairs_skip() {
        let mut stack = LevelStack::new();
        assert_eq!(stack.admit(1), 1);
        // H1 directly followed by H3 is promoted to H2.
        assert_eq!(stack.admit(3), 2);
        assert_eq!(stack.open_levels(), &[1, 2]);
    }

    #[test]
    fn test_level_stack_first_heading_opens_h1() {
        let mut stack = LevelStack::new();
        assert_eq!(stack.admit(2), 1);
    }

    #[test]
    fn test_level_stack_sibling_and_pop() {
        let mut stack = LevelStack::new();
        stack.admit(1);
        stack.admit(2);
        stack.admit(3);
        // A new H2 closes the open H3 and H2.
        assert_eq!(stack.admit(2), 2);
        assert_eq!(stack.open_levels(), &[1, 2]);
    }

    #[test]
    fn test_numbering_depth_takes_precedence() {
        let candidates = vec![
            candidate("1 Introduction", 1, Some(2), Some(1)),
            candidate("1.1 Scope", 1, Some(0), Some(2)),
        ];
        let (headings, repairs) = HierarchyValidator::new().build(&candidates);
        assert_eq!(headings[0].level, HeadingLevel::H1);
        assert_eq!(headings[1].level, HeadingLevel::H2);
        assert!(repairs.is_empty());
    }

    #[test]
    fn test_tier_rank_maps_to_levels() {
        // Tier 1 is the largest occupied tier (tier 0 went to the title), so
        // it maps to H1.
        let candidates = vec![
            candidate("Background", 1, Some(1), None),
            candidate("Details", 2, Some(2), None),
        ];
        let (headings, _) = HierarchyValidator::new().build(&candidates);
        assert_eq!(headings[0].level, HeadingLevel::H1);
        assert_eq!(headings[1].level, HeadingLevel::H2);
    }

    #[test]
    fn test_promotion_is_logged() {
        let candidates = vec![
            candidate("1 Overview", 1, None, Some(1)),
            candidate("1.1.1 Deep dive", 1, None, Some(3)),
        ];
        let (headings, repairs) = HierarchyValidator::new().build(&candidates);
        assert_eq!(headings[1].level, HeadingLevel::H2);
        assert_eq!(repairs.len(), 1);
        assert!(matches!(
            repairs[0],
            Repair::Promoted {
                from: HeadingLevel::H3,
                to: HeadingLevel::H2,
                ..
            }
        ));
    }

    #[test]
    fn test_duplicate_collapse_same_and_next_page() {
        let candidates = vec![
            candidate("Summary", 3, Some(0), None),
            candidate("SUMMARY", 4, Some(0), None),
            candidate("Summary", 9, Some(0), None),
        ];
        let (headings, repairs) = HierarchyValidator::new().build(&candidates);
        // Page 4 collapses into page 3; page 9 is far away and survives.
        assert_eq!(headings.len(), 2);
        assert_eq!(headings[0].page, 3);
        assert_eq!(headings[1].page, 9);
        assert_eq!(repairs.len(), 1);
    }

    #[test]
    fn test_depth_caps_at_h4() {
        let candidates = vec![
            candidate("1 A", 1, None, Some(1)),
            candidate("1.1 B", 1, None, Some(2)),
            candidate("1.1.1 C", 1, None, Some(3)),
            candidate("1.1.1.1 D", 1, None, Some(4)),
            candidate("1.1.1.1.1 E", 1, None, Some(5)),
        ];
        let (headings, _) = HierarchyValidator::new().build(&candidates);
        assert_eq!(headings[3].level, HeadingLevel::H4);
        assert_eq!(headings[4].level, HeadingLevel::H4);
    }

    #[test]
    fn test_validated_outline_is_always_legal() {
        let candidates = vec![
            candidate("Deep", 1, Some(2), None),
            candidate("Deeper", 1, None, Some(4)),
            candidate("Top", 2, Some(0), None),
            candidate("Skip", 2, None, Some(3)),
        ];
        let (headings, _) = HierarchyValidator::new().build(&candidates);
        for pair in headings.windows(2) {
            assert!(pair[1].level.depth() <= pair[0].level.depth() + 1);
        }
    }

    #[test]
    fn test_normalize_heading() {
        assert_eq!(normalize_heading("  Executive\u{00A0}Summary "), "executive summary");
        assert_eq!(normalize_heading("SUMMARY"), normalize_heading("Summary"));
    }
}
