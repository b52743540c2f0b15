//! # docrank
//!
//! Document outline extraction and persona-driven section ranking.
//!
//! docrank turns unstructured PDF page layouts into a hierarchical outline
//! (title plus H1–H4 headings, inferred purely from font and position
//! signals) and ranks the extracted sections against a persona's intent
//! vector using embedding similarity.
//!
//! ## Quick Start
//!
//! ```no_run
//! use docrank::{load_layout, OutlineExtractor, render};
//!
//! fn main() -> docrank::Result<()> {
//!     // Load a layout document produced by the layout collaborator
//!     let layout = load_layout("report.layout.json")?;
//!
//!     // Extract the outline
//!     let extracted = OutlineExtractor::new().extract(&layout);
//!     let json = render::to_json(&extracted.outline, render::JsonFormat::Pretty)?;
//!     println!("{}", json);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Model-free outline classification**: font statistics, composite
//!   heading scoring, title resolution, and nesting repair
//! - **Persona ranking**: cosine similarity against a canonical role + job
//!   query, with paragraph-level refinement
//! - **Embedding as a capability**: inject any [`rank::Embedder`]; a
//!   deterministic offline hashing embedder ships as the default
//! - **Parallel batches**: per-document extraction fans out with Rayon and
//!   collects deterministically; one bad document never kills a run

pub mod batch;
pub mod config;
pub mod error;
pub mod model;
pub mod outline;
pub mod rank;
pub mod render;
pub mod segment;

// Re-export commonly used types
pub use batch::{load_layout, BatchOutcome, BatchProcessor, DocumentError};
pub use config::{
    PersonaConfig, RunConfig, DEFAULT_SUBSECTION_MIN_LENGTH, DEFAULT_SUBSECTION_MIN_SCORE,
    DEFAULT_TOP_K,
};
pub use error::{Error, Result};
pub use model::{
    BoundingBox, DocumentLayout, Heading, HeadingLevel, Outline, PageLayout, RankedSection,
    Repair, Section, Subsection, TextRun,
};
pub use outline::{ExtractedOutline, OutlineExtractor, ScoringPolicy, TitleSource};
pub use rank::{cosine_similarity, Embedder, HashingEmbedder, PersonaDescriptor};
pub use render::{JsonFormat, RankingReport};
pub use segment::SectionSegmenter;

/// Extract the outline of one document layout.
///
/// # Example
///
/// ```no_run
/// let layout = docrank::load_layout("report.layout.json").unwrap();
/// let outline = docrank::extract_outline(&layout);
/// println!("{} headings", outline.outline.len());
/// ```
pub fn extract_outline(layout: &DocumentLayout) -> Outline {
    OutlineExtractor::new().extract(layout).outline
}

/// Run the full persona-ranking pipeline over a set of layouts with the
/// default offline embedder.
///
/// # Example
///
/// ```no_run
/// use docrank::{rank_documents, RunConfig};
///
/// let layouts = vec![docrank::load_layout("a.layout.json").unwrap()];
/// let config = RunConfig::from_json(r#"{
///     "documents": ["a.pdf"],
///     "persona": {"role": "Travel Planner"},
///     "job_to_be_done": "Plan a 4-day trip for 10 college friends"
/// }"#).unwrap();
/// let report = rank_documents(&layouts, &config).unwrap();
/// println!("{} ranked sections", report.sections.len());
/// ```
pub fn rank_documents(layouts: &[DocumentLayout], config: &RunConfig) -> Result<RankingReport> {
    let embedder = HashingEmbedder::new();
    BatchProcessor::new().rank(layouts, config, &embedder)
}

/// Builder for configuring the pipeline.
///
/// # Example
///
/// ```no_run
/// use docrank::{Docrank, HashingEmbedder};
///
/// let layout = docrank::load_layout("report.layout.json")?;
/// let outline = Docrank::new()
///     .with_embedder(Box::new(HashingEmbedder::with_dimension(512)))
///     .extract(&layout)
///     .outline;
/// # Ok::<(), docrank::Error>(())
/// ```
pub struct Docrank {
    embedder: Box<dyn Embedder>,
    extractor: OutlineExtractor,
}

impl Docrank {
    /// Create a builder with the default offline embedder and scoring policy.
    pub fn new() -> Self {
        Self {
            embedder: Box::new(HashingEmbedder::new()),
            extractor: OutlineExtractor::new(),
        }
    }

    /// Use a custom embedding backend.
    pub fn with_embedder(mut self, embedder: Box<dyn Embedder>) -> Self {
        self.embedder = embedder;
        self
    }

    /// Use a custom heading scoring policy.
    pub fn with_scoring_policy(mut self, policy: Box<dyn ScoringPolicy>) -> Self {
        self.extractor = OutlineExtractor::with_policy(policy);
        self
    }

    /// Extract one document's outline.
    pub fn extract(&self, layout: &DocumentLayout) -> ExtractedOutline {
        self.extractor.extract(layout)
    }

    /// Run the persona-ranking pipeline.
    pub fn rank(&self, layouts: &[DocumentLayout], config: &RunConfig) -> Result<RankingReport> {
        BatchProcessor::new().rank(layouts, config, self.embedder.as_ref())
    }
}

impl Default for Docrank {
    fn default() -> Self {
        Self::new()
    }
}
