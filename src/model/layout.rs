//! Layout collaborator wire types.
//!
//! The layout collaborator (raw PDF decoding) hands over one `DocumentLayout`
//! per document: ordered pages, each an ordered sequence of text runs with
//! font and position information, plus whatever metadata the source carried.
//! Everything here is immutable input as far as the pipeline is concerned.

use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in page coordinates (origin bottom-left,
/// `y` is the baseline of the run).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// X position (left edge)
    pub x: f32,
    /// Y position (baseline)
    pub y: f32,
    /// Width of the run
    pub width: f32,
    /// Height of the run
    pub height: f32,
}

impl BoundingBox {
    /// Create a new bounding box.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Top edge of the box.
    pub fn top(&self) -> f32 {
        self.y + self.height
    }
}

/// A run of text with uniform font attributes, as produced by the layout
/// collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextRun {
    /// The text content
    pub text: String,
    /// Font size in points
    pub font_size: f32,
    /// Whether the font is bold
    #[serde(default)]
    pub bold: bool,
    /// Position on the page
    pub bbox: BoundingBox,
    /// Page number (1-indexed)
    pub page: u32,
}

impl TextRun {
    /// Create a new text run.
    pub fn new(text: impl Into<String>, font_size: f32, bold: bool, bbox: BoundingBox, page: u32) -> Self {
        Self {
            text: text.into(),
            font_size,
            bold,
            bbox,
            page,
        }
    }

    /// Number of characters in the run, used for weighting font statistics.
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// Check if the run carries any visible text.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// One page of layout output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageLayout {
    /// Page number (1-indexed)
    pub number: u32,
    /// Page height in points, when the source knows it
    #[serde(default)]
    pub height: Option<f32>,
    /// Text runs in reading order
    pub runs: Vec<TextRun>,
}

impl PageLayout {
    /// Create a new page with no runs.
    pub fn new(number: u32) -> Self {
        Self {
            number,
            height: None,
            runs: Vec::new(),
        }
    }

    /// Page height: declared, or derived from the topmost run extent.
    pub fn effective_height(&self) -> f32 {
        self.height.unwrap_or_else(|| {
            self.runs
                .iter()
                .map(|r| r.bbox.top())
                .fold(0.0_f32, f32::max)
        })
    }
}

/// Optional document metadata supplied by the layout collaborator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayoutMetadata {
    /// Embedded title field, when present
    pub title: Option<String>,
}

/// Complete layout of one document: the unit of work for outline extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentLayout {
    /// Source document identifier (usually the filename)
    pub document: String,
    /// Embedded metadata
    #[serde(default)]
    pub metadata: LayoutMetadata,
    /// Pages in document order
    pub pages: Vec<PageLayout>,
}

impl DocumentLayout {
    /// Create a new empty layout for a document.
    pub fn new(document: impl Into<String>) -> Self {
        Self {
            document: document.into(),
            metadata: LayoutMetadata::default(),
            pages: Vec::new(),
        }
    }

    /// Iterate all runs across all pages in document order.
    pub fn runs(&self) -> impl Iterator<Item = &TextRun> {
        self.pages.iter().flat_map(|p| p.runs.iter())
    }

    /// Total number of runs in the document.
    pub fn run_count(&self) -> usize {
        self.pages.iter().map(|p| p.runs.len()).sum()
    }

    /// Check if the document has any text at all.
    pub fn is_empty(&self) -> bool {
        self.runs().all(|r| r.is_empty())
    }

    /// Get a page by its 1-indexed number.
    pub fn page(&self, number: u32) -> Option<&PageLayout> {
        self.pages.iter().find(|p| p.number == number)
    }
}
