//! Persona descriptor: canonical query text plus its embedding.

use crate::error::{Error, Result};
use crate::rank::embed::{check_dimension, Embedder};

/// Fixed separator joining persona fields into the canonical query.
pub const QUERY_SEPARATOR: &str = ". ";

/// A user's role and goal, canonicalized and embedded exactly once per run.
/// The embedding is owned by the descriptor and reused for every comparison.
#[derive(Debug, Clone)]
pub struct PersonaDescriptor {
    /// Role string, trimmed
    pub role: String,
    /// Job-to-be-done string, trimmed
    pub job_to_be_done: String,
    /// Canonical query string handed to the embedding collaborator
    pub query: String,
    embedding: Vec<f32>,
}

impl PersonaDescriptor {
    /// Build and embed a descriptor. Empty role or job (after trimming) is a
    /// fatal validation error, raised before any embedding call.
    pub fn build(
        role: &str,
        experience: Option<&str>,
        job_to_be_done: &str,
        embedder: &dyn Embedder,
    ) -> Result<Self> {
        let role = role.trim();
        if role.is_empty() {
            return Err(Error::EmptyPersonaField("role"));
        }
        let job = job_to_be_done.trim();
        if job.is_empty() {
            return Err(Error::EmptyPersonaField("job_to_be_done"));
        }

        let mut parts = vec![role];
        if let Some(exp) = experience.map(str::trim).filter(|e| !e.is_empty()) {
            parts.push(exp);
        }
        parts.push(job);
        let query = parts.join(QUERY_SEPARATOR);

        // The single persona embedding request for the whole run.
        let embedding = check_dimension(embedder, embedder.embed(&query)?)?;

        Ok(Self {
            role: role.to_string(),
            job_to_be_done: job.to_string(),
            query,
            embedding,
        })
    }

    /// The persona's intent vector.
    pub fn embedding(&self) -> &[f32] {
        &self.embedding
    }
}
