//! Candidate heading extraction.
//!
//! Runs on the same visual line are merged, then each line is scored by an
//! injectable [`ScoringPolicy`]. Lines whose composite score clears the
//! threshold derived from the document's font tiers become heading
//! candidates. Identical run sequences always yield identical candidate sets
//! and scores.

use regex::Regex;

use crate::model::{DocumentLayout, PageLayout, TextRun};
use crate::outline::font_stats::FontStatistics;

/// A merged visual line, the unit of heading scoring.
#[derive(Debug, Clone)]
pub struct Line {
    /// Combined text of the line's runs
    pub text: String,
    /// Page number (1-indexed)
    pub page: u32,
    /// Dominant font size, weighted by character count
    pub font_size: f32,
    /// Whether the line is predominantly bold
    pub bold: bool,
    /// Leftmost X position
    pub x: f32,
    /// Baseline Y position
    pub y: f32,
}

impl Line {
    /// Merge runs that share a baseline into one line. Runs must already be
    /// sorted by X position.
    fn from_runs(runs: &[&TextRun]) -> Self {
        let mut text = String::new();
        for run in runs {
            let piece = run.text.trim_end();
            if !text.is_empty() && !text.ends_with(' ') && !piece.starts_with(' ') {
                text.push(' ');
            }
            text.push_str(piece.trim_start());
        }

        let total_chars: usize = runs.iter().map(|r| r.char_count()).sum();
        let font_size = if total_chars > 0 {
            runs.iter()
                .map(|r| r.font_size * r.char_count() as f32)
                .sum::<f32>()
                / total_chars as f32
        } else {
            runs.first().map(|r| r.font_size).unwrap_or(12.0)
        };
        let bold_chars: usize = runs
            .iter()
            .filter(|r| r.bold)
            .map(|r| r.char_count())
            .sum();

        Self {
            text: text.trim().to_string(),
            page: runs.first().map(|r| r.page).unwrap_or(1),
            font_size,
            bold: total_chars > 0 && bold_chars * 2 > total_chars,
            x: runs.first().map(|r| r.bbox.x).unwrap_or(0.0),
            y: runs.first().map(|r| r.bbox.y).unwrap_or(0.0),
        }
    }

    /// Fraction of alphabetic characters that are uppercase.
    pub fn caps_ratio(&self) -> f32 {
        let letters: Vec<char> = self.text.chars().filter(|c| c.is_alphabetic()).collect();
        if letters.is_empty() {
            return 0.0;
        }
        let upper = letters.iter().filter(|c| c.is_uppercase()).count();
        upper as f32 / letters.len() as f32
    }
}

/// Spacing context around a line, used for vertical-isolation scoring.
#[derive(Debug, Clone, Copy)]
pub struct ScoreContext<'a> {
    /// Document font statistics
    pub stats: &'a FontStatistics,
    /// Blank space above the line (infinite at the top of a page)
    pub space_above: f32,
    /// Blank space below the line (infinite at the bottom of a page)
    pub space_below: f32,
    /// Typical baseline-to-baseline distance of body text on this page
    pub body_line_spacing: f32,
}

/// Composite heading-score function, injectable so alternative heuristics can
/// be swapped without touching the pipeline.
pub trait ScoringPolicy: Send + Sync {
    /// Score a line as a heading candidate. Higher is more heading-like;
    /// zero or below means "certainly not a heading".
    fn score(&self, line: &Line, ctx: &ScoreContext<'_>) -> f32;
}

/// Pattern for leading section numbering ("1", "2.1", "3.4.1)", ...).
fn numbering_pattern() -> Regex {
    Regex::new(r"^(\d+(?:\.\d+)*)[.)]?\s+\S").expect("static numbering pattern")
}

/// Numbering depth of a line ("2.1.3 Title" → 3), when present.
pub fn numbering_depth(pattern: &Regex, text: &str) -> Option<u8> {
    pattern.captures(text).map(|caps| {
        let digits = caps.get(1).map(|m| m.as_str()).unwrap_or("");
        (digits.matches('.').count() + 1).min(u8::MAX as usize) as u8
    })
}

/// The default composite heuristic: font-size ratio, boldness, capitalization,
/// line length, numbering pattern, and vertical isolation, with penalties for
/// prose-like lines.
pub struct DefaultScoringPolicy {
    numbering: Regex,
    dangling: Regex,
}

impl DefaultScoringPolicy {
    /// Build the default policy.
    pub fn new() -> Self {
        Self {
            numbering: numbering_pattern(),
            dangling: Regex::new(r"(?i)\b(and|or|of|in|on|at|to|for|with|by)$")
                .expect("static dangling pattern"),
        }
    }
}

impl Default for DefaultScoringPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoringPolicy for DefaultScoringPolicy {
    fn score(&self, line: &Line, ctx: &ScoreContext<'_>) -> f32 {
        let text = line.text.trim();

        // Hard rejections: fragments and non-text lines can never be headings.
        if text.chars().count() < 3 {
            return 0.0;
        }
        if text.chars().all(|c| !c.is_alphabetic()) {
            return 0.0;
        }

        let mut score = 0.0;

        let ratio = ctx.stats.ratio(line.font_size);
        if ratio >= 1.5 {
            score += 4.0;
        } else if ratio >= 1.3 {
            score += 3.0;
        } else if ratio >= 1.15 {
            score += 2.0;
        }

        if line.bold {
            score += 2.0;
        }

        let char_len = text.chars().count();
        if line.caps_ratio() > 0.8 && char_len > 3 {
            score += 1.0;
        }

        if char_len <= 60 {
            score += 1.0;
        } else if char_len > 120 {
            score -= 2.0;
        }

        if self.numbering.is_match(text) {
            score += 3.0;
        }

        let spacing = ctx.body_line_spacing.max(f32::EPSILON);
        if ctx.space_above > spacing * 1.5 && ctx.space_below > spacing * 1.5 {
            score += 1.5;
        }

        // Prose penalties: sentence punctuation and mid-line sentence breaks.
        if text.ends_with('.') || text.ends_with(';') || text.ends_with(',') {
            score -= 2.0;
        }
        if has_sentence_break(text) {
            score -= 2.0;
        }
        if self.dangling.is_match(text) {
            score -= 2.0;
        }

        score
    }
}

/// A period followed by whitespace and a lowercase continuation marks prose.
fn has_sentence_break(text: &str) -> bool {
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '.' {
            continue;
        }
        let mut saw_space = false;
        while chars.peek().is_some_and(|n| n.is_whitespace()) {
            saw_space = true;
            chars.next();
        }
        if saw_space && chars.peek().is_some_and(|n| n.is_lowercase()) {
            return true;
        }
    }
    false
}

/// A scored line that cleared the candidate threshold.
#[derive(Debug, Clone)]
pub struct HeadingCandidate {
    /// Candidate text
    pub text: String,
    /// Page number (1-indexed)
    pub page: u32,
    /// Dominant font size of the line
    pub font_size: f32,
    /// Whether the line is predominantly bold
    pub bold: bool,
    /// Composite heading score
    pub score: f32,
    /// Depth of a leading numbering pattern ("1.1.1" → 3), when present
    pub numbering_depth: Option<u8>,
    /// Baseline Y position on the page
    pub y: f32,
    /// Font tier rank (0 = largest), when the document has tiers
    pub tier: Option<usize>,
}

/// Extracts heading candidates from a document layout.
pub struct CandidateExtractor {
    policy: Box<dyn ScoringPolicy>,
    numbering: Regex,
}

impl CandidateExtractor {
    /// Create an extractor with the default scoring policy.
    pub fn new() -> Self {
        Self::with_policy(Box::new(DefaultScoringPolicy::new()))
    }

    /// Create an extractor with a custom scoring policy.
    pub fn with_policy(policy: Box<dyn ScoringPolicy>) -> Self {
        Self {
            policy,
            numbering: numbering_pattern(),
        }
    }

    /// Minimum score for candidacy. Documents without distinguishable font
    /// tiers demand stronger bold/position evidence.
    pub fn min_score(&self, stats: &FontStatistics) -> f32 {
        if stats.has_tiers() {
            4.0
        } else {
            4.5
        }
    }

    /// Extract candidates from every page of a document.
    pub fn extract(&self, layout: &DocumentLayout, stats: &FontStatistics) -> Vec<HeadingCandidate> {
        let threshold = self.min_score(stats);
        let mut candidates = Vec::new();

        for page in &layout.pages {
            let lines = group_lines(page);
            let spacing = body_line_spacing(&lines, stats.body_size);

            for (i, line) in lines.iter().enumerate() {
                if line.text.is_empty() {
                    continue;
                }
                let space_above = if i == 0 {
                    f32::INFINITY
                } else {
                    lines[i - 1].y - line.y
                };
                let space_below = if i + 1 == lines.len() {
                    f32::INFINITY
                } else {
                    line.y - lines[i + 1].y
                };
                let ctx = ScoreContext {
                    stats,
                    space_above,
                    space_below,
                    body_line_spacing: spacing,
                };

                let score = self.policy.score(line, &ctx);
                if score < threshold {
                    continue;
                }

                candidates.push(HeadingCandidate {
                    text: line.text.clone(),
                    page: line.page,
                    font_size: line.font_size,
                    bold: line.bold,
                    score,
                    numbering_depth: numbering_depth(&self.numbering, &line.text),
                    y: line.y,
                    tier: stats.tier_of(line.font_size),
                });
            }
        }

        candidates
    }
}

impl Default for CandidateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Group a page's runs into visual lines by baseline proximity, top to
/// bottom. Runs on one line are ordered left to right.
pub fn group_lines(page: &PageLayout) -> Vec<Line> {
    let mut runs: Vec<&TextRun> = page.runs.iter().filter(|r| !r.is_empty()).collect();
    if runs.is_empty() {
        return Vec::new();
    }

    // Y descending (top of page first), then X ascending.
    runs.sort_by(|a, b| {
        b.bbox
            .y
            .partial_cmp(&a.bbox.y)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(
                a.bbox
                    .x
                    .partial_cmp(&b.bbox.x)
                    .unwrap_or(std::cmp::Ordering::Equal),
            )
    });

    let mut lines = Vec::new();
    let mut current: Vec<&TextRun> = Vec::new();
    let mut current_y = f32::NAN;

    for run in runs {
        let tolerance = run.font_size * 0.3;
        if current.is_empty() || (run.bbox.y - current_y).abs() <= tolerance {
            if current.is_empty() {
                current_y = run.bbox.y;
            }
            current.push(run);
        } else {
            current.sort_by(|a, b| {
                a.bbox
                    .x
                    .partial_cmp(&b.bbox.x)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
            lines.push(Line::from_runs(&current));
            current.clear();
            current_y = run.bbox.y;
            current.push(run);
        }
    }
    if !current.is_empty() {
        current.sort_by(|a, b| {
            a.bbox
                .x
                .partial_cmp(&b.bbox.x)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        lines.push(Line::from_runs(&current));
    }

    lines
}

/// Median baseline-to-baseline distance on a page; falls back to 1.2x the
/// body size when the page is too sparse to measure.
fn body_line_spacing(lines: &[Line], body_size: f32) -> f32 {
    let mut gaps: Vec<f32> = lines
        .windows(2)
        .map(|w| w[0].y - w[1].y)
        .filter(|g| *g > 0.0)
        .collect();
    if gaps.is_empty() {
        return body_size * 1.2;
    }
    gaps.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    gaps[gaps.len() / 2]
}
