//! Section and ranking result types.

use serde::Serialize;

use super::outline::HeadingLevel;

/// A section of one document: a heading plus the content it owns, up to the
/// next heading of equal-or-higher level. Immutable after segmentation.
#[derive(Debug, Clone, Serialize)]
pub struct Section {
    /// Owning document id
    pub document: String,
    /// Heading text ("Body" for the synthetic whole-document section)
    pub title: String,
    /// Heading level
    pub level: HeadingLevel,
    /// Page the heading appears on (1-indexed)
    pub page: u32,
    /// Ordered content spans (raw text)
    pub content: Vec<String>,
    /// Position of the owning document in the batch input, for tie-breaks
    pub document_order: usize,
}

impl Section {
    /// Content joined into one text block.
    pub fn content_text(&self) -> String {
        self.content.join("\n")
    }

    /// Text submitted to the embedding collaborator: title plus content,
    /// truncated to a character budget on a char boundary.
    pub fn embedding_text(&self, max_chars: usize) -> String {
        let mut text = self.title.clone();
        for span in &self.content {
            if text.chars().count() >= max_chars {
                break;
            }
            text.push('\n');
            text.push_str(span);
        }
        if text.chars().count() > max_chars {
            text = text.chars().take(max_chars).collect();
        }
        text
    }
}

/// A section paired with its similarity score and rank.
#[derive(Debug, Clone, Serialize)]
pub struct RankedSection {
    /// The scored section
    pub section: Section,
    /// Cosine similarity to the persona vector, in [-1, 1]
    pub score: f32,
    /// 1-based position in the similarity-sorted order
    pub importance_rank: usize,
}

/// A paragraph-level unit extracted from a top-ranked section.
#[derive(Debug, Clone, Serialize)]
pub struct Subsection {
    /// Owning document id
    pub document: String,
    /// Paragraph text
    pub text: String,
    /// Page of the parent section's heading
    pub page: u32,
    /// Cosine similarity to the persona vector, in [-1, 1]
    pub score: f32,
    /// 1-based rank among surviving subsections
    pub rank: usize,
    /// Document order of the parent section, for tie-breaks
    pub document_order: usize,
}
