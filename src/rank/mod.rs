//! Persona relevance ranking.
//!
//! Builds the persona descriptor, scores sections across all documents
//! against its intent vector, and refines the top-ranked sections into
//! paragraph-level subsections. The embedding model is an injected
//! capability; everything else is pure and deterministic.

mod embed;
mod persona;
mod ranker;
mod refine;

pub use embed::{cosine_similarity, Embedder, HashingEmbedder};
pub use persona::{PersonaDescriptor, QUERY_SEPARATOR};
pub use ranker::{Exclusion, RankedSections, SectionRanker, DEFAULT_EMBED_CHAR_BUDGET};
pub use refine::{RefineParams, RefinedSubsections, SubsectionRefiner};
