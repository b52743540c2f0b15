//! Persona-ranking output report.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::model::{RankedSection, Subsection};
use crate::rank::{Exclusion, PersonaDescriptor};

/// Metadata block of the ranking output.
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    /// Persona role
    pub persona: String,
    /// Job-to-be-done string
    pub job_to_be_done: String,
    /// Documents that contributed sections, in input order
    pub documents: Vec<String>,
    /// RFC 3339 processing timestamp
    pub timestamp: String,
}

/// One ranked section row.
#[derive(Debug, Clone, Serialize)]
pub struct SectionRow {
    /// Owning document
    pub document: String,
    /// Section heading text
    pub section_title: String,
    /// Page of the heading
    pub page: u32,
    /// 1-based rank in similarity order
    pub importance_rank: usize,
}

/// One refined subsection row.
#[derive(Debug, Clone, Serialize)]
pub struct SubsectionRow {
    /// Owning document
    pub document: String,
    /// Page of the parent section's heading
    pub page: u32,
    /// Paragraph text
    pub refined_text: String,
    /// Similarity score in [-1, 1]
    pub relevance_score: f32,
}

/// The complete persona-ranking output.
#[derive(Debug, Clone, Serialize)]
pub struct RankingReport {
    /// Run metadata
    pub metadata: ReportMetadata,
    /// Ranked sections, best first
    pub sections: Vec<SectionRow>,
    /// Surviving subsections, best first
    pub subsections: Vec<SubsectionRow>,
    /// Items dropped by embedding failures
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub excluded: Vec<Exclusion>,
}

impl RankingReport {
    /// Assemble a report with an explicit timestamp (tests pass a fixed one).
    pub fn with_timestamp(
        persona: &PersonaDescriptor,
        documents: Vec<String>,
        sections: &[RankedSection],
        subsections: &[Subsection],
        excluded: Vec<Exclusion>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            metadata: ReportMetadata {
                persona: persona.role.clone(),
                job_to_be_done: persona.job_to_be_done.clone(),
                documents,
                timestamp: timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
            },
            sections: sections
                .iter()
                .map(|r| SectionRow {
                    document: r.section.document.clone(),
                    section_title: r.section.title.clone(),
                    page: r.section.page,
                    importance_rank: r.importance_rank,
                })
                .collect(),
            subsections: subsections
                .iter()
                .map(|s| SubsectionRow {
                    document: s.document.clone(),
                    page: s.page,
                    refined_text: s.text.clone(),
                    relevance_score: s.score,
                })
                .collect(),
            excluded,
        }
    }

    /// Assemble a report stamped with the current time.
    pub fn new(
        persona: &PersonaDescriptor,
        documents: Vec<String>,
        sections: &[RankedSection],
        subsections: &[Subsection],
        excluded: Vec<Exclusion>,
    ) -> Self {
        Self::with_timestamp(persona, documents, sections, subsections, excluded, Utc::now())
    }
}
