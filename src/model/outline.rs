//! Outline types: title plus ordered heading list.

use serde::{Deserialize, Serialize};

/// Heading level in the extracted hierarchy. Capped at H4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HeadingLevel {
    /// Top-level heading
    H1,
    /// Second-level heading
    H2,
    /// Third-level heading
    H3,
    /// Fourth-level heading
    H4,
}

impl HeadingLevel {
    /// Numeric depth (H1 = 1 .. H4 = 4).
    pub fn depth(&self) -> u8 {
        match self {
            HeadingLevel::H1 => 1,
            HeadingLevel::H2 => 2,
            HeadingLevel::H3 => 3,
            HeadingLevel::H4 => 4,
        }
    }

    /// Level for a numbering depth, capped at H4 (depth 1 → H1, 5 → H4).
    pub fn from_depth(depth: u8) -> Self {
        match depth {
            0 | 1 => HeadingLevel::H1,
            2 => HeadingLevel::H2,
            3 => HeadingLevel::H3,
            _ => HeadingLevel::H4,
        }
    }

    /// The next deeper level, saturating at H4.
    pub fn deeper(&self) -> Self {
        Self::from_depth(self.depth() + 1)
    }
}

impl std::fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "H{}", self.depth())
    }
}

/// A single heading in a validated outline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heading {
    /// Heading level (H1..H4)
    pub level: HeadingLevel,
    /// Heading text
    pub text: String,
    /// Page the heading appears on (1-indexed)
    pub page: u32,
}

impl Heading {
    /// Create a new heading.
    pub fn new(level: HeadingLevel, text: impl Into<String>, page: u32) -> Self {
        Self {
            level,
            text: text.into(),
            page,
        }
    }
}

/// The extracted structure of one document: a title and an ordered list of
/// headings. Serializes to the outline output shape directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outline {
    /// Resolved document title
    pub title: String,
    /// Validated headings in document order
    pub outline: Vec<Heading>,
}

impl Outline {
    /// Create an outline with no headings.
    pub fn empty(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            outline: Vec::new(),
        }
    }

    /// Check if the outline has any headings.
    pub fn is_empty(&self) -> bool {
        self.outline.is_empty()
    }

    /// Heading page numbers are non-decreasing in outline order.
    pub fn pages_monotonic(&self) -> bool {
        self.outline.windows(2).all(|w| w[0].page <= w[1].page)
    }

    /// No heading is nested more than one level deeper than its predecessor.
    pub fn nesting_legal(&self) -> bool {
        self.outline
            .windows(2)
            .all(|w| w[1].level.depth() <= w[0].level.depth() + 1)
    }
}

/// A structural correction made by the hierarchy validator. Repairs are
/// observable for audit but never surface as errors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Repair {
    /// A heading was promoted to the minimum legal level to fix a nesting skip.
    Promoted {
        /// Heading text
        text: String,
        /// Page the heading appears on
        page: u32,
        /// Level before repair
        from: HeadingLevel,
        /// Level after repair
        to: HeadingLevel,
    },
    /// A consecutive duplicate heading was collapsed into the first occurrence.
    DuplicateCollapsed {
        /// Heading text
        text: String,
        /// Page of the discarded duplicate
        page: u32,
    },
}
