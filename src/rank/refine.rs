//! Subsection refinement.
//!
//! The top-K ranked sections decompose into paragraph-level units, each
//! re-embedded and scored against the persona exactly like sections. A unit
//! survives only when it clears both the relevance threshold and the minimum
//! length; both are configuration, not constants buried in logic.

use crate::model::{RankedSection, Subsection};
use crate::rank::embed::{check_dimension, cosine_similarity, Embedder};
use crate::rank::persona::PersonaDescriptor;
use crate::rank::ranker::Exclusion;

/// Refinement parameters, normally sourced from the run configuration.
#[derive(Debug, Clone, Copy)]
pub struct RefineParams {
    /// How many top-ranked sections to refine
    pub top_k: usize,
    /// Minimum similarity score for a unit to survive
    pub min_score: f32,
    /// Minimum text length (characters) for a unit to survive
    pub min_length: usize,
}

/// The surviving subsections plus exclusions from per-unit embedding failures.
#[derive(Debug, Clone)]
pub struct RefinedSubsections {
    /// Surviving units, best first
    pub subsections: Vec<Subsection>,
    /// Units excluded by embedding failures
    pub excluded: Vec<Exclusion>,
}

/// Decomposes and re-scores top-ranked sections.
pub struct SubsectionRefiner<'a> {
    embedder: &'a dyn Embedder,
}

impl<'a> SubsectionRefiner<'a> {
    /// Create a refiner over an embedding capability.
    pub fn new(embedder: &'a dyn Embedder) -> Self {
        Self { embedder }
    }

    /// Refine the top-K of an already-ranked section list.
    pub fn refine(
        &self,
        ranked: &[RankedSection],
        persona: &PersonaDescriptor,
        params: &RefineParams,
    ) -> RefinedSubsections {
        // (parent, unit text) pairs: the identity each embedding correlates
        // back to.
        let units: Vec<(&RankedSection, String)> = ranked
            .iter()
            .take(params.top_k)
            .flat_map(|r| {
                paragraph_units(&r.section.content)
                    .into_iter()
                    .map(move |text| (r, text))
            })
            .collect();

        let texts: Vec<&str> = units.iter().map(|(_, t)| t.as_str()).collect();
        let embeddings = self.embedder.embed_many(&texts);
        drop(texts);

        let mut scored = Vec::new();
        let mut excluded = Vec::new();

        for ((parent, text), embedding) in units.into_iter().zip(embeddings) {
            let vector = embedding.and_then(|v| check_dimension(self.embedder, v));
            match vector {
                Ok(vector) => {
                    let score = cosine_similarity(persona.embedding(), &vector);
                    if score >= params.min_score && text.chars().count() >= params.min_length {
                        scored.push((parent, text, score));
                    }
                }
                Err(err) => {
                    log::warn!(
                        "excluding paragraph of {:?} ({}, page {}): {}",
                        parent.section.title,
                        parent.section.document,
                        parent.section.page,
                        err
                    );
                    excluded.push(Exclusion {
                        document: parent.section.document.clone(),
                        title: preview(&text),
                        page: parent.section.page,
                        reason: err.to_string(),
                    });
                }
            }
        }

        // Same deterministic order as section ranking: score descending,
        // then document order, then page.
        scored.sort_by(|(pa, _, sa), (pb, _, sb)| {
            sb.partial_cmp(sa)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(pa.section.document_order.cmp(&pb.section.document_order))
                .then(pa.section.page.cmp(&pb.section.page))
        });

        let subsections = scored
            .into_iter()
            .enumerate()
            .map(|(i, (parent, text, score))| Subsection {
                document: parent.section.document.clone(),
                text,
                page: parent.section.page,
                score,
                rank: i + 1,
                document_order: parent.section.document_order,
            })
            .collect();

        RefinedSubsections {
            subsections,
            excluded,
        }
    }
}

/// Paragraph units of a section: its content spans, further split on blank
/// lines when the layout carried multi-paragraph spans.
fn paragraph_units(content: &[String]) -> Vec<String> {
    content
        .iter()
        .flat_map(|span| span.split("\n\n"))
        .map(|unit| unit.trim().to_string())
        .filter(|unit| !unit.is_empty())
        .collect()
}

/// Short prefix of a unit for exclusion reports.
fn preview(text: &str) -> String {
    const PREVIEW_CHARS: usize = 60;
    if text.chars().count() <= PREVIEW_CHARS {
        text.to_string()
    } else {
        text.chars().take(PREVIEW_CHARS).collect()
    }
}
