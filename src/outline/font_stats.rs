//! Per-document font statistics for heading detection.
//!
//! The modal font size (weighted by character count) is the body baseline;
//! sizes sufficiently above the baseline form a small ordered set of tiers
//! that drive heading-level assignment. Documents with near-uniform sizing
//! degrade to an empty tier set and bold/position-only discrimination.

use std::collections::BTreeMap;

use crate::model::TextRun;

/// Ratio bands above the body baseline, largest first. A size qualifies for
/// the first band whose threshold it meets.
pub const TIER_RATIOS: [f32; 3] = [1.5, 1.3, 1.15];

/// One font tier: a size band above the body baseline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontTier {
    /// Rank among the tiers present in this document (0 = largest)
    pub rank: usize,
    /// Minimum font size for membership in this tier
    pub min_size: f32,
}

/// Font size statistics for one document.
#[derive(Debug, Clone, Default)]
pub struct FontStatistics {
    /// Observed sizes at 0.1pt precision, weighted by character count
    histogram: BTreeMap<i32, usize>,
    /// Body text font size (modal, char-weighted)
    pub body_size: f32,
    /// Tiers above the baseline that are actually occupied, largest first.
    /// Empty when the document has no distinguishable tiers.
    pub tiers: Vec<FontTier>,
}

impl FontStatistics {
    /// Derive statistics from all runs of one document. Never fails: an empty
    /// document falls back to a 12pt baseline with no tiers.
    pub fn from_runs<'a, I>(runs: I) -> Self
    where
        I: IntoIterator<Item = &'a TextRun>,
    {
        let mut stats = Self::default();
        for run in runs {
            stats.add_run(run);
        }
        stats.analyze();
        stats
    }

    /// Add one run's size observation, weighted by its character count.
    pub fn add_run(&mut self, run: &TextRun) {
        let chars = run.char_count();
        if chars == 0 {
            return;
        }
        let key = (run.font_size * 10.0).round() as i32;
        *self.histogram.entry(key).or_insert(0) += chars;
    }

    /// Compute the body baseline and the occupied tiers.
    pub fn analyze(&mut self) {
        if self.histogram.is_empty() {
            self.body_size = 12.0;
            self.tiers.clear();
            return;
        }

        // Modal size; on equal weight the smaller size wins, so prose beats
        // display text (BTreeMap iteration is ascending, strict > keeps the
        // first maximum).
        let mut best_key = 0;
        let mut best_count = 0usize;
        for (&key, &count) in &self.histogram {
            if count > best_count {
                best_key = key;
                best_count = count;
            }
        }
        self.body_size = best_key as f32 / 10.0;

        // A band is occupied when some observed size lands in it.
        self.tiers.clear();
        for (band, &ratio) in TIER_RATIOS.iter().enumerate() {
            let min_size = self.body_size * ratio;
            let max_size = if band == 0 {
                f32::INFINITY
            } else {
                self.body_size * TIER_RATIOS[band - 1]
            };
            let occupied = self.histogram.keys().any(|&k| {
                let size = k as f32 / 10.0;
                size >= min_size && size < max_size
            });
            if occupied {
                self.tiers.push(FontTier {
                    rank: self.tiers.len(),
                    min_size,
                });
            }
        }
    }

    /// Whether the document has any distinguishable tiers above the baseline.
    pub fn has_tiers(&self) -> bool {
        !self.tiers.is_empty()
    }

    /// Tier rank for a font size (0 = largest present tier), or `None` for
    /// baseline-sized text.
    pub fn tier_of(&self, font_size: f32) -> Option<usize> {
        self.tiers
            .iter()
            .find(|t| font_size >= t.min_size)
            .map(|t| t.rank)
    }

    /// Whether a size belongs to the top tier present in the document.
    pub fn is_top_tier(&self, font_size: f32) -> bool {
        self.tier_of(font_size) == Some(0)
    }

    /// Size ratio of a run to the body baseline.
    pub fn ratio(&self, font_size: f32) -> f32 {
        if self.body_size > 0.0 {
            font_size / self.body_size
        } else {
            1.0
        }
    }
}
