//! Run configuration for persona ranking.

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::rank::RefineParams;

/// Default number of top-ranked sections handed to the refiner.
pub const DEFAULT_TOP_K: usize = 5;
/// Default minimum similarity for a subsection to survive refinement.
pub const DEFAULT_SUBSECTION_MIN_SCORE: f32 = 0.3;
/// Default minimum character length for a subsection to survive refinement.
pub const DEFAULT_SUBSECTION_MIN_LENGTH: usize = 100;

/// Persona block of the run configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PersonaConfig {
    /// Who the user is (e.g. "Travel Planner")
    pub role: String,
    /// Optional experience qualifier joined into the canonical query
    #[serde(default)]
    pub experience: Option<String>,
}

/// A complete ranking run: which documents, for whom, and the refinement
/// knobs. Deserialized from the caller's JSON; [`RunConfig::validate`] must
/// pass before any embedding work starts.
#[derive(Debug, Clone, Deserialize)]
pub struct RunConfig {
    /// Layout document filenames, in ranking tie-break order
    pub documents: Vec<String>,
    /// The persona
    pub persona: PersonaConfig,
    /// The job to be done
    pub job_to_be_done: String,
    /// How many top sections to refine
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    /// Subsection survival threshold
    #[serde(default = "default_min_score")]
    pub subsection_min_score: f32,
    /// Subsection survival length floor
    #[serde(default = "default_min_length")]
    pub subsection_min_length: usize,
}

fn default_top_k() -> usize {
    DEFAULT_TOP_K
}

fn default_min_score() -> f32 {
    DEFAULT_SUBSECTION_MIN_SCORE
}

fn default_min_length() -> usize {
    DEFAULT_SUBSECTION_MIN_LENGTH
}

impl RunConfig {
    /// Parse a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: RunConfig =
            serde_json::from_str(json).map_err(|e| Error::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Fail-fast validation, run before any embedding call.
    pub fn validate(&self) -> Result<()> {
        if self.documents.is_empty() {
            return Err(Error::InvalidConfig("documents list is empty".into()));
        }
        if self.persona.role.trim().is_empty() {
            return Err(Error::EmptyPersonaField("role"));
        }
        if self.job_to_be_done.trim().is_empty() {
            return Err(Error::EmptyPersonaField("job_to_be_done"));
        }
        if self.top_k == 0 {
            return Err(Error::InvalidConfig("top_k must be at least 1".into()));
        }
        if !(-1.0..=1.0).contains(&self.subsection_min_score) {
            return Err(Error::InvalidConfig(format!(
                "subsection_min_score {} outside [-1, 1]",
                self.subsection_min_score
            )));
        }
        Ok(())
    }

    /// Refinement parameters for this run.
    pub fn refine_params(&self) -> RefineParams {
        RefineParams {
            top_k: self.top_k,
            min_score: self.subsection_min_score,
            min_length: self.subsection_min_length,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"{
        "documents": ["a.json", "b.json"],
        "persona": {"role": "Travel Planner"},
        "job_to_be_done": "Plan a 4-day trip for 10 college friends"
    }"#;

    #[test]
    fn test_defaults_fill_in() {
        let config = RunConfig::from_json(MINIMAL).unwrap();
        assert_eq!(config.top_k, DEFAULT_TOP_K);
        assert_eq!(config.subsection_min_score, DEFAULT_SUBSECTION_MIN_SCORE);
        assert_eq!(config.subsection_min_length, DEFAULT_SUBSECTION_MIN_LENGTH);
        assert!(config.persona.experience.is_none());
    }

    #[test]
    fn test_overrides() {
        let json = r#"{
            "documents": ["a.json"],
            "persona": {"role": "Analyst", "experience": "Senior"},
            "job_to_be_done": "Review",
            "top_k": 3,
            "subsection_min_score": 0.5,
            "subsection_min_length": 40
        }"#;
        let config = RunConfig::from_json(json).unwrap();
        assert_eq!(config.top_k, 3);
        assert_eq!(config.refine_params().min_score, 0.5);
        assert_eq!(config.refine_params().min_length, 40);
    }

    #[test]
    fn test_missing_required_field_is_error() {
        let json = r#"{"documents": ["a.json"], "persona": {"role": "X"}}"#;
        assert!(matches!(
            RunConfig::from_json(json),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_empty_persona_fields_rejected() {
        let json = r#"{
            "documents": ["a.json"],
            "persona": {"role": "  "},
            "job_to_be_done": "Review"
        }"#;
        assert!(matches!(
            RunConfig::from_json(json),
            Err(Error::EmptyPersonaField("role"))
        ));
    }

    #[test]
    fn test_empty_documents_rejected() {
        let json = r#"{
            "documents": [],
            "persona": {"role": "X"},
            "job_to_be_done": "Y"
        }"#;
        assert!(RunConfig::from_json(json).is_err());
    }

    #[test]
    fn test_out_of_range_score_rejected() {
        let json = r#"{
            "documents": ["a.json"],
            "persona": {"role": "X"},
            "job_to_be_done": "Y",
            "subsection_min_score": 1.5
        }"#;
        assert!(RunConfig::from_json(json).is_err());
    }
}
