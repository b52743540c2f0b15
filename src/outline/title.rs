//! Document title resolution.
//!
//! Priority: embedded metadata title (when it is not a placeholder), then the
//! strongest top-tier candidate in the upper third of page 1, then a label
//! derived from the filename. Resolution is total: every document gets a
//! non-empty title.

use regex::Regex;

use crate::model::DocumentLayout;
use crate::outline::candidates::HeadingCandidate;
use crate::outline::font_stats::FontStatistics;

/// Resolves exactly one title per document.
pub struct TitleResolver {
    placeholder: Regex,
}

/// Where the resolved title came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TitleSource {
    /// Embedded metadata title field
    Metadata,
    /// Top-tier heading candidate on page 1
    FirstPage,
    /// Label derived from the filename
    Filename,
}

/// A resolved title and its provenance.
#[derive(Debug, Clone)]
pub struct ResolvedTitle {
    /// The title text, always non-empty
    pub text: String,
    /// Which strategy produced it
    pub source: TitleSource,
}

impl TitleResolver {
    /// Build a resolver with the standard placeholder filters.
    pub fn new() -> Self {
        Self {
            // Generic or tooling-generated metadata titles that carry no
            // information: "untitled", bare filenames, authoring-software echoes.
            placeholder: Regex::new(
                r"(?i)^(untitled|document\d*|file\d*)$|\.(pdf|docx?|txt|cdr)$|^microsoft\s+word\b",
            )
            .expect("static placeholder pattern"),
        }
    }

    /// Resolve the document title. Candidates should be the pre-validation
    /// heading candidates so the strongest page-1 line is still available.
    pub fn resolve(
        &self,
        layout: &DocumentLayout,
        candidates: &[HeadingCandidate],
        stats: &FontStatistics,
    ) -> ResolvedTitle {
        if let Some(title) = self.metadata_title(layout) {
            return ResolvedTitle {
                text: title,
                source: TitleSource::Metadata,
            };
        }

        if let Some(title) = self.first_page_title(layout, candidates, stats) {
            return ResolvedTitle {
                text: title,
                source: TitleSource::FirstPage,
            };
        }

        ResolvedTitle {
            text: filename_label(&layout.document),
            source: TitleSource::Filename,
        }
    }

    /// The metadata title, unless empty or a placeholder.
    fn metadata_title(&self, layout: &DocumentLayout) -> Option<String> {
        let title = layout.metadata.title.as_deref()?.trim();
        if title.is_empty() || title.len() < 3 {
            return None;
        }
        if self.placeholder.is_match(title) {
            return None;
        }
        // A metadata field that just echoes the filename stem says nothing.
        if title.eq_ignore_ascii_case(filename_label(&layout.document).as_str()) {
            return None;
        }
        Some(title.to_string())
    }

    /// Highest-scoring top-tier candidate in the upper third of page 1.
    fn first_page_title(
        &self,
        layout: &DocumentLayout,
        candidates: &[HeadingCandidate],
        stats: &FontStatistics,
    ) -> Option<String> {
        let page = layout.page(1)?;
        let upper_third = page.effective_height() * (2.0 / 3.0);

        candidates
            .iter()
            .filter(|c| c.page == 1 && c.y >= upper_third)
            .filter(|c| stats.is_top_tier(c.font_size) || (!stats.has_tiers() && c.bold))
            // Numbered lines are section headings, not titles.
            .filter(|c| c.numbering_depth.is_none())
            .max_by(|a, b| {
                a.score
                    .partial_cmp(&b.score)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    // On equal score the higher line on the page wins.
                    .then(
                        a.y.partial_cmp(&b.y)
                            .unwrap_or(std::cmp::Ordering::Equal),
                    )
            })
            .map(|c| c.text.clone())
    }
}

impl Default for TitleResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Derive a label from a source filename: strip the extension and replace
/// separators with spaces. Always non-empty.
pub fn filename_label(filename: &str) -> String {
    let name = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename);
    let stem = name.rsplit_once('.').map(|(s, _)| s).unwrap_or(name);
    let label: String = stem
        .chars()
        .map(|c| if c == '_' || c == '-' { ' ' } else { c })
        .collect();
    let label = label.split_whitespace().collect::<Vec<_>>().join(" ");
    if label.is_empty() {
        "Untitled".to_string()
    } else {
        label
    }
}
