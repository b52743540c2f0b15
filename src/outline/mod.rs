//! Layout-to-outline classification.
//!
//! Four sequential stages per document: font statistics, candidate
//! extraction, title resolution, and hierarchy assignment/validation. The
//! pipeline is total — a document with no detectable structure still yields a
//! title and an empty heading list.

mod candidates;
mod font_stats;
mod hierarchy;
mod title;

pub use candidates::{
    group_lines, CandidateExtractor, DefaultScoringPolicy, HeadingCandidate, Line, ScoreContext,
    ScoringPolicy,
};
pub use font_stats::{FontStatistics, FontTier, TIER_RATIOS};
pub use hierarchy::{normalize_heading, HierarchyValidator, LevelStack, MAX_DEPTH};
pub use title::{filename_label, ResolvedTitle, TitleResolver, TitleSource};

use crate::model::{DocumentLayout, Outline, Repair};

/// An extracted outline plus its audit trail.
#[derive(Debug, Clone)]
pub struct ExtractedOutline {
    /// The validated outline
    pub outline: Outline,
    /// Structural corrections applied during validation
    pub repairs: Vec<Repair>,
    /// Which strategy resolved the title
    pub title_source: TitleSource,
}

/// Runs the outline extraction stages over one document layout.
pub struct OutlineExtractor {
    candidates: CandidateExtractor,
    title: TitleResolver,
    validator: HierarchyValidator,
}

impl OutlineExtractor {
    /// Create an extractor with the default scoring policy.
    pub fn new() -> Self {
        Self {
            candidates: CandidateExtractor::new(),
            title: TitleResolver::new(),
            validator: HierarchyValidator::new(),
        }
    }

    /// Create an extractor with a custom heading scoring policy.
    pub fn with_policy(policy: Box<dyn ScoringPolicy>) -> Self {
        Self {
            candidates: CandidateExtractor::with_policy(policy),
            title: TitleResolver::new(),
            validator: HierarchyValidator::new(),
        }
    }

    /// Extract the outline of one document. Total and deterministic.
    pub fn extract(&self, layout: &DocumentLayout) -> ExtractedOutline {
        let stats = FontStatistics::from_runs(layout.runs());
        log::debug!(
            "{}: body size {:.1}pt, {} tier(s)",
            layout.document,
            stats.body_size,
            stats.tiers.len()
        );

        let candidates = self.candidates.extract(layout, &stats);
        let resolved = self.title.resolve(layout, &candidates, &stats);

        // The chosen title never doubles as a heading: drop its page-1
        // occurrences before validation.
        let title_key = normalize_heading(&resolved.text);
        let remaining: Vec<HeadingCandidate> = candidates
            .into_iter()
            .filter(|c| !(c.page == 1 && normalize_heading(&c.text) == title_key))
            .collect();

        let (headings, repairs) = self.validator.build(&remaining);
        log::debug!(
            "{}: {} heading(s), {} repair(s)",
            layout.document,
            headings.len(),
            repairs.len()
        );

        ExtractedOutline {
            outline: Outline {
                title: resolved.text,
                outline: headings,
            },
            repairs,
            title_source: resolved.source,
        }
    }
}

impl Default for OutlineExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BoundingBox, PageLayout, TextRun};

    fn run_at(text: &str, size: f32, bold: bool, y: f32, page: u32) -> TextRun {
        TextRun::new(text, size, bold, BoundingBox::new(72.0, y, 200.0, size), page)
    }

    fn simple_doc() -> DocumentLayout {
        let mut page1 = PageLayout::new(1);
        page1.height = Some(792.0);
        page1.runs.push(run_at("User Guide", 24.0, true, 740.0, 1));
        page1.runs.push(run_at("1. Introduction", 18.0, true, 680.0, 1));
        for i in 0..8 {
            page1.runs.push(run_at(
                "ordinary body text keeps the baseline at twelve points",
                12.0,
                false,
                640.0 - i as f32 * 14.0,
                1,
            ));
        }

        let mut page2 = PageLayout::new(2);
        page2.height = Some(792.0);
        page2.runs.push(run_at("1.1 Getting Started", 15.0, true, 740.0, 2));
        for i in 0..6 {
            page2.runs.push(run_at(
                "ordinary body text keeps the baseline at twelve points",
                12.0,
                false,
                700.0 - i as f32 * 14.0,
                2,
            ));
        }

        DocumentLayout {
            document: "user_guide.pdf".into(),
            metadata: Default::default(),
            pages: vec![page1, page2],
        }
    }

    #[test]
    fn test_full_extraction() {
        let extracted = OutlineExtractor::new().extract(&simple_doc());
        assert_eq!(extracted.outline.title, "User Guide");
        assert_eq!(extracted.title_source, TitleSource::FirstPage);

        let texts: Vec<&str> = extracted
            .outline
            .outline
            .iter()
            .map(|h| h.text.as_str())
            .collect();
        assert_eq!(texts, vec!["1. Introduction", "1.1 Getting Started"]);
        assert!(extracted.outline.pages_monotonic());
        assert!(extracted.outline.nesting_legal());
    }

    #[test]
    fn test_title_not_repeated_in_outline() {
        let extracted = OutlineExtractor::new().extract(&simple_doc());
        assert!(extracted
            .outline
            .outline
            .iter()
            .all(|h| h.text != extracted.outline.title));
    }

    #[test]
    fn test_empty_document_yields_filename_title() {
        let layout = DocumentLayout::new("quarterly-sales.pdf");
        let extracted = OutlineExtractor::new().extract(&layout);
        assert_eq!(extracted.outline.title, "quarterly sales");
        assert!(extracted.outline.is_empty());
        assert_eq!(extracted.title_source, TitleSource::Filename);
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let doc = simple_doc();
        let extractor = OutlineExtractor::new();
        let a = serde_json::to_string(&extractor.extract(&doc).outline).unwrap();
        let b = serde_json::to_string(&extractor.extract(&doc).outline).unwrap();
        assert_eq!(a, b);
    }
}
