//! Multi-document batch processing.
//!
//! Outline extraction is embarrassingly parallel across documents: no shared
//! mutable state, so the batch fans out over a rayon task pool and a single
//! deterministic collector reassembles results in input order. One malformed
//! document never aborts the run; its error is captured per-document and the
//! rest of the batch proceeds.

use std::fs;
use std::path::Path;

use rayon::prelude::*;
use serde::Serialize;

use crate::config::RunConfig;
use crate::error::{Error, Result};
use crate::model::{DocumentLayout, Section};
use crate::outline::{ExtractedOutline, OutlineExtractor};
use crate::rank::{
    Embedder, PersonaDescriptor, RefinedSubsections, SectionRanker, SubsectionRefiner,
};
use crate::render::RankingReport;
use crate::segment::SectionSegmenter;

/// A per-document failure, reported without aborting the batch.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentError {
    /// The document that failed
    pub document: String,
    /// Human-readable error
    pub error: String,
}

/// Outcome of an outline batch: successful outlines in input order, plus the
/// failures encountered along the way.
#[derive(Debug)]
pub struct BatchOutcome {
    /// (document id, extracted outline) pairs, input order preserved
    pub outlines: Vec<(String, ExtractedOutline)>,
    /// Documents that could not be processed
    pub errors: Vec<DocumentError>,
}

impl BatchOutcome {
    /// Whether every document processed cleanly.
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Load one layout document from a JSON file produced by the layout
/// collaborator.
pub fn load_layout<P: AsRef<Path>>(path: P) -> Result<DocumentLayout> {
    let path = path.as_ref();
    let data = fs::read_to_string(path)?;
    let layout: DocumentLayout = serde_json::from_str(&data)
        .map_err(|e| Error::MalformedLayout(format!("{}: {}", path.display(), e)))?;
    Ok(layout)
}

/// Runs the per-document pipeline over many documents.
pub struct BatchProcessor {
    extractor: OutlineExtractor,
    segmenter: SectionSegmenter,
}

impl BatchProcessor {
    /// Create a processor with default stages.
    pub fn new() -> Self {
        Self {
            extractor: OutlineExtractor::new(),
            segmenter: SectionSegmenter::new(),
        }
    }

    /// Extract outlines for a set of already-loaded layouts, in parallel.
    /// Input order is preserved in the output.
    pub fn extract_outlines(&self, layouts: &[DocumentLayout]) -> Vec<ExtractedOutline> {
        layouts
            .par_iter()
            .map(|layout| self.extractor.extract(layout))
            .collect()
    }

    /// Load and extract outlines from layout files. Per-file failures are
    /// collected, not fatal.
    pub fn extract_from_paths<P: AsRef<Path> + Sync>(&self, paths: &[P]) -> BatchOutcome {
        let results: Vec<std::result::Result<(String, ExtractedOutline), DocumentError>> = paths
            .par_iter()
            .map(|path| {
                let name = path.as_ref().display().to_string();
                match load_layout(path) {
                    Ok(layout) => {
                        let document = layout.document.clone();
                        Ok((document, self.extractor.extract(&layout)))
                    }
                    Err(err) => {
                        log::warn!("skipping {}: {}", name, err);
                        Err(DocumentError {
                            document: name,
                            error: err.to_string(),
                        })
                    }
                }
            })
            .collect();

        let mut outlines = Vec::new();
        let mut errors = Vec::new();
        for result in results {
            match result {
                Ok(pair) => outlines.push(pair),
                Err(err) => errors.push(err),
            }
        }
        BatchOutcome { outlines, errors }
    }

    /// Outline and segment every document, flattening sections in document
    /// order with their batch position attached for tie-breaks.
    pub fn segment_all(&self, layouts: &[DocumentLayout]) -> Vec<Section> {
        layouts
            .par_iter()
            .enumerate()
            .map(|(order, layout)| {
                let extracted = self.extractor.extract(layout);
                self.segmenter.segment(layout, &extracted.outline, order)
            })
            .collect::<Vec<Vec<Section>>>()
            .into_iter()
            .flatten()
            .collect()
    }

    /// The full persona-ranking run: validate, build the persona, segment all
    /// documents, rank, refine, and assemble the report.
    pub fn rank(
        &self,
        layouts: &[DocumentLayout],
        config: &RunConfig,
        embedder: &dyn Embedder,
    ) -> Result<RankingReport> {
        // Fail fast: no embedding happens for an invalid run.
        config.validate()?;

        let persona = PersonaDescriptor::build(
            &config.persona.role,
            config.persona.experience.as_deref(),
            &config.job_to_be_done,
            embedder,
        )?;

        let sections = self.segment_all(layouts);
        log::debug!("{} section(s) across {} document(s)", sections.len(), layouts.len());

        let ranked = SectionRanker::new(embedder).rank(sections, &persona);
        let RefinedSubsections {
            subsections,
            excluded: refine_excluded,
        } = SubsectionRefiner::new(embedder).refine(
            &ranked.sections,
            &persona,
            &config.refine_params(),
        );

        let mut excluded = ranked.excluded;
        excluded.extend(refine_excluded);

        let documents = layouts.iter().map(|l| l.document.clone()).collect();
        Ok(RankingReport::new(
            &persona,
            documents,
            &ranked.sections,
            &subsections,
            excluded,
        ))
    }
}

impl Default for BatchProcessor {
    fn default() -> Self {
        Self::new()
    }
}
