//! Section ranking against the persona vector.
//!
//! Every section across all documents is embedded (batched where the
//! embedder supports it) and scored by cosine similarity. Batch results
//! correlate back to sections by the identity paired before the call, never
//! by call order. The final sort is a single-threaded pure function so ranks
//! and tie-breaks are deterministic.

use crate::model::{RankedSection, Section};
use crate::rank::embed::{check_dimension, cosine_similarity, Embedder};
use crate::rank::persona::PersonaDescriptor;

/// Default character budget for a section's embedding text, respecting the
/// collaborator's input limits.
pub const DEFAULT_EMBED_CHAR_BUDGET: usize = 2000;

/// A section or subsection dropped from ranking because its embedding failed.
/// Reported, never fatal.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Exclusion {
    /// Owning document id
    pub document: String,
    /// Section title (or a paragraph prefix for subsections)
    pub title: String,
    /// Page number
    pub page: u32,
    /// The embedder's error message
    pub reason: String,
}

/// The full ranked list plus the exclusions encountered while scoring.
#[derive(Debug, Clone)]
pub struct RankedSections {
    /// All successfully scored sections, best first
    pub sections: Vec<RankedSection>,
    /// Sections excluded by embedding failures
    pub excluded: Vec<Exclusion>,
}

/// Scores and orders sections by similarity to the persona vector.
pub struct SectionRanker<'a> {
    embedder: &'a dyn Embedder,
    embed_char_budget: usize,
}

impl<'a> SectionRanker<'a> {
    /// Create a ranker over an embedding capability.
    pub fn new(embedder: &'a dyn Embedder) -> Self {
        Self {
            embedder,
            embed_char_budget: DEFAULT_EMBED_CHAR_BUDGET,
        }
    }

    /// Override the embedding-text character budget.
    pub fn with_char_budget(mut self, budget: usize) -> Self {
        self.embed_char_budget = budget.max(1);
        self
    }

    /// Rank sections against the persona. No score is discarded here:
    /// truncation to top-K is the caller's concern.
    pub fn rank(&self, sections: Vec<Section>, persona: &PersonaDescriptor) -> RankedSections {
        let texts: Vec<String> = sections
            .iter()
            .map(|s| s.embedding_text(self.embed_char_budget))
            .collect();
        let text_refs: Vec<&str> = texts.iter().map(String::as_str).collect();
        let embeddings = self.embedder.embed_many(&text_refs);

        let mut scored = Vec::with_capacity(sections.len());
        let mut excluded = Vec::new();

        // Sections were paired with their embedding slot before the call;
        // zipping by that identity keeps batching reorder-safe.
        for (section, embedding) in sections.into_iter().zip(embeddings) {
            let vector =
                embedding.and_then(|v| check_dimension(self.embedder, v));
            match vector {
                Ok(vector) => {
                    let score = cosine_similarity(persona.embedding(), &vector);
                    scored.push((section, score));
                }
                Err(err) => {
                    log::warn!(
                        "excluding section {:?} ({}, page {}): {}",
                        section.title,
                        section.document,
                        section.page,
                        err
                    );
                    excluded.push(Exclusion {
                        document: section.document.clone(),
                        title: section.title.clone(),
                        page: section.page,
                        reason: err.to_string(),
                    });
                }
            }
        }

        let sections = sort_and_rank(scored);
        RankedSections { sections, excluded }
    }
}

/// Descending by score; ties by original document order, then page. Pure and
/// single-threaded by design.
fn sort_and_rank(mut scored: Vec<(Section, f32)>) -> Vec<RankedSection> {
    scored.sort_by(|(a, sa), (b, sb)| {
        sb.partial_cmp(sa)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.document_order.cmp(&b.document_order))
            .then(a.page.cmp(&b.page))
    });

    scored
        .into_iter()
        .enumerate()
        .map(|(i, (section, score))| RankedSection {
            section,
            score,
            importance_rank: i + 1,
        })
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::{Error, Result};
    use crate::model::HeadingLevel;

    /// Deterministic stub: scores are dictated per section title. The first
    /// vector component encodes the desired cosine against the persona query.
    pub(crate) struct ScriptedEmbedder {
        pub scores: Vec<(&'static str, f32)>,
        pub fail_on: Option<&'static str>,
    }

    impl ScriptedEmbedder {
        pub fn new(scores: Vec<(&'static str, f32)>) -> Self {
            Self {
                scores,
                fail_on: None,
            }
        }
    }

    impl Embedder for ScriptedEmbedder {
        fn dimension(&self) -> usize {
            2
        }

        fn embed(&self, text: &str) -> Result<Vec<f32>> {
            if let Some(marker) = self.fail_on {
                if text.contains(marker) {
                    return Err(Error::Embedding(format!("scripted failure for {marker:?}")));
                }
            }
            for (marker, score) in &self.scores {
                if text.contains(marker) {
                    // cos(query, [s, sqrt(1-s^2)]) == s for query [1, 0].
                    return Ok(vec![*score, (1.0 - score * score).max(0.0).sqrt()]);
                }
            }
            // The persona query itself anchors the similarity axis.
            Ok(vec![1.0, 0.0])
        }
    }

    pub(crate) fn section(
        document: &str,
        title: &str,
        page: u32,
        document_order: usize,
        content: &[&str],
    ) -> Section {
        Section {
            document: document.into(),
            title: title.into(),
            level: HeadingLevel::H1,
            page,
            content: content.iter().map(|s| s.to_string()).collect(),
            document_order,
        }
    }

    fn persona(embedder: &dyn Embedder) -> PersonaDescriptor {
        PersonaDescriptor::build(
            "Travel Planner",
            None,
            "Plan a 4-day trip for 10 college friends",
            embedder,
        )
        .unwrap()
    }

    #[test]
    fn test_rank_orders_by_similarity() {
        let embedder = ScriptedEmbedder::new(vec![
            ("Nightlife", 0.62),
            ("Packing", 0.41),
            ("History", 0.15),
        ]);
        let persona = persona(&embedder);

        let sections = vec![
            section("a.pdf", "History", 2, 0, &["old things"]),
            section("a.pdf", "Nightlife", 5, 0, &["bars"]),
            section("b.pdf", "Packing", 1, 1, &["bags"]),
        ];

        let ranked = SectionRanker::new(&embedder).rank(sections, &persona);
        assert!(ranked.excluded.is_empty());

        let order: Vec<(&str, usize)> = ranked
            .sections
            .iter()
            .map(|r| (r.section.title.as_str(), r.importance_rank))
            .collect();
        assert_eq!(
            order,
            vec![("Nightlife", 1), ("Packing", 2), ("History", 3)]
        );
    }

    #[test]
    fn test_scores_stay_bounded() {
        let embedder = ScriptedEmbedder::new(vec![("A", 1.0), ("B", -1.0), ("C", 0.0)]);
        let persona = persona(&embedder);
        let sections = vec![
            section("d.pdf", "A", 1, 0, &[]),
            section("d.pdf", "B", 2, 0, &[]),
            section("d.pdf", "C", 3, 0, &[]),
        ];
        let ranked = SectionRanker::new(&embedder).rank(sections, &persona);
        for r in &ranked.sections {
            assert!((-1.0..=1.0).contains(&r.score), "score {}", r.score);
        }
    }

    #[test]
    fn test_tie_break_by_document_then_page() {
        let embedder = ScriptedEmbedder::new(vec![
            ("First", 0.5),
            ("Second", 0.5),
            ("Third", 0.5),
        ]);
        let persona = persona(&embedder);
        let sections = vec![
            section("b.pdf", "Third", 1, 1, &[]),
            section("a.pdf", "Second", 7, 0, &[]),
            section("a.pdf", "First", 2, 0, &[]),
        ];
        let ranked = SectionRanker::new(&embedder).rank(sections, &persona);
        let order: Vec<&str> = ranked
            .sections
            .iter()
            .map(|r| r.section.title.as_str())
            .collect();
        // Equal scores: document order first, then ascending page.
        assert_eq!(order, vec!["First", "Second", "Third"]);
    }

    #[test]
    fn test_embedding_failure_excludes_not_aborts() {
        let mut embedder = ScriptedEmbedder::new(vec![("Good", 0.9), ("AlsoGood", 0.4)]);
        embedder.fail_on = Some("Broken");
        let persona = persona(&embedder);

        let sections = vec![
            section("a.pdf", "Good", 1, 0, &[]),
            section("a.pdf", "Broken", 2, 0, &[]),
            section("a.pdf", "AlsoGood", 3, 0, &[]),
        ];
        let ranked = SectionRanker::new(&embedder).rank(sections, &persona);

        assert_eq!(ranked.sections.len(), 2);
        assert_eq!(ranked.excluded.len(), 1);
        assert_eq!(ranked.excluded[0].title, "Broken");
        // Ranks are contiguous over the survivors.
        assert_eq!(ranked.sections[0].importance_rank, 1);
        assert_eq!(ranked.sections[1].importance_rank, 2);
    }

    #[test]
    fn test_full_list_retained() {
        let embedder = ScriptedEmbedder::new(vec![("X", 0.01)]);
        let persona = persona(&embedder);
        let sections: Vec<Section> = (0..25)
            .map(|i| section("a.pdf", "X", i + 1, 0, &[]))
            .collect();
        let ranked = SectionRanker::new(&embedder).rank(sections, &persona);
        // No top-K truncation at the ranking layer.
        assert_eq!(ranked.sections.len(), 25);
    }
}
