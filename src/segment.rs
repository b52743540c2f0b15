//! Section segmentation.
//!
//! Cuts a document into sections bounded by its validated outline headings.
//! Content lines group into paragraph spans on structural boundaries (vertical
//! gaps wider than the page's typical line spacing, and page breaks); each
//! span belongs to the nearest preceding heading, so a parent section owns
//! only its direct text and no section's content overlaps another's. A
//! document with no headings becomes a single synthetic "Body" section
//! spanning everything.

use crate::model::{DocumentLayout, Heading, HeadingLevel, Outline, Section};
use crate::outline::{group_lines, normalize_heading, Line};

/// Title of the synthetic section used for headingless documents.
pub const BODY_SECTION_TITLE: &str = "Body";

/// Builds sections from a validated outline plus the document's linear text
/// stream.
pub struct SectionSegmenter;

impl SectionSegmenter {
    /// Create a segmenter.
    pub fn new() -> Self {
        Self
    }

    /// Segment one document. `document_order` is the document's position in
    /// the batch input, carried through for ranking tie-breaks.
    pub fn segment(
        &self,
        layout: &DocumentLayout,
        outline: &Outline,
        document_order: usize,
    ) -> Vec<Section> {
        let mut sections: Vec<Section> = Vec::with_capacity(outline.outline.len().max(1));
        let headingless = outline.is_empty();
        if headingless {
            sections.push(Section {
                document: layout.document.clone(),
                title: BODY_SECTION_TITLE.to_string(),
                level: HeadingLevel::H1,
                page: 1,
                content: Vec::new(),
                document_order,
            });
        }

        let mut next_heading = 0usize;
        let mut paragraph = String::new();

        for page in &layout.pages {
            let lines = group_lines(page);
            let break_gap = paragraph_gap(&lines);
            let mut prev_y: Option<f32> = None;

            for line in &lines {
                if line.text.is_empty() {
                    continue;
                }

                // Sequential match against the outline: heading lines open a
                // new section, everything else is content for the open one.
                if let Some(heading) = outline.outline.get(next_heading) {
                    if heading.page == line.page
                        && normalize_heading(&line.text) == normalize_heading(&heading.text)
                    {
                        flush(&mut paragraph, sections.last_mut());
                        sections.push(section_for(heading, &layout.document, document_order));
                        next_heading += 1;
                        prev_y = None;
                        continue;
                    }
                }

                if let Some(y) = prev_y {
                    if y - line.y > break_gap {
                        flush(&mut paragraph, sections.last_mut());
                    }
                }
                prev_y = Some(line.y);

                // Text before the first heading is title-page preamble and
                // belongs to no section.
                if sections.is_empty() {
                    continue;
                }
                if !paragraph.is_empty() {
                    paragraph.push(' ');
                }
                paragraph.push_str(&line.text);
            }

            // Paragraphs do not continue across page boundaries.
            flush(&mut paragraph, sections.last_mut());
        }

        // Headings the stream never matched (the layout changed under us)
        // still get empty sections so outline and sections stay aligned.
        for heading in &outline.outline[next_heading..] {
            log::debug!(
                "{}: heading {:?} not found in text stream",
                layout.document,
                heading.text
            );
            sections.push(section_for(heading, &layout.document, document_order));
        }

        sections
    }
}

impl Default for SectionSegmenter {
    fn default() -> Self {
        Self::new()
    }
}

/// Close the open paragraph into the open section, if any.
fn flush(paragraph: &mut String, section: Option<&mut Section>) {
    if paragraph.is_empty() {
        return;
    }
    let text = std::mem::take(paragraph);
    if let Some(section) = section {
        section.content.push(text);
    }
}

/// Vertical gap that separates paragraphs on a page: 1.5x the median
/// baseline distance, or effectively infinite on pages too sparse to measure.
fn paragraph_gap(lines: &[Line]) -> f32 {
    let mut gaps: Vec<f32> = lines
        .windows(2)
        .map(|w| w[0].y - w[1].y)
        .filter(|g| *g > 0.0)
        .collect();
    if gaps.is_empty() {
        return f32::INFINITY;
    }
    gaps.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    gaps[gaps.len() / 2] * 1.5
}

fn section_for(heading: &Heading, document: &str, document_order: usize) -> Section {
    Section {
        document: document.to_string(),
        title: heading.text.clone(),
        level: heading.level,
        page: heading.page,
        content: Vec::new(),
        document_order,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BoundingBox, PageLayout, TextRun};

    fn run_at(text: &str, y: f32, page: u32) -> TextRun {
        TextRun::new(text, 12.0, false, BoundingBox::new(72.0, y, 200.0, 12.0), page)
    }

    fn layout() -> DocumentLayout {
        // Page 1: a heading, a two-line paragraph, a second heading, and a
        // paragraph separated from the heading by regular line spacing.
        let mut page1 = PageLayout::new(1);
        page1.runs.push(run_at("Intro heading", 740.0, 1));
        page1.runs.push(run_at("intro text one", 726.0, 1));
        page1.runs.push(run_at("intro text two", 712.0, 1));
        page1.runs.push(run_at("intro afterthought", 670.0, 1)); // wide gap
        page1.runs.push(run_at("Details heading", 656.0, 1));
        page1.runs.push(run_at("details text", 642.0, 1));

        let mut page2 = PageLayout::new(2);
        page2.runs.push(run_at("more details", 740.0, 2));

        DocumentLayout {
            document: "doc.pdf".into(),
            metadata: Default::default(),
            pages: vec![page1, page2],
        }
    }

    fn outline() -> Outline {
        Outline {
            title: "Doc".into(),
            outline: vec![
                Heading::new(HeadingLevel::H1, "Intro heading", 1),
                Heading::new(HeadingLevel::H2, "Details heading", 1),
            ],
        }
    }

    #[test]
    fn test_sections_own_their_content() {
        let sections = SectionSegmenter::new().segment(&layout(), &outline(), 0);
        assert_eq!(sections.len(), 2);

        assert_eq!(sections[0].title, "Intro heading");
        assert_eq!(
            sections[0].content,
            vec!["intro text one intro text two", "intro afterthought"]
        );

        assert_eq!(sections[1].title, "Details heading");
        assert_eq!(sections[1].content, vec!["details text", "more details"]);
    }

    #[test]
    fn test_no_content_overlap() {
        let sections = SectionSegmenter::new().segment(&layout(), &outline(), 0);
        let mut seen = std::collections::HashSet::new();
        for section in &sections {
            for span in &section.content {
                assert!(seen.insert(span.clone()), "span {:?} owned twice", span);
            }
        }
    }

    #[test]
    fn test_headingless_document_gets_body_section() {
        let empty_outline = Outline::empty("Doc");
        let sections = SectionSegmenter::new().segment(&layout(), &empty_outline, 3);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, BODY_SECTION_TITLE);
        assert_eq!(sections[0].page, 1);
        assert_eq!(sections[0].document_order, 3);
        // Spans the whole document, headings included as plain text.
        let all = sections[0].content.join(" ");
        assert!(all.contains("Intro heading"));
        assert!(all.contains("more details"));
    }

    #[test]
    fn test_unmatched_heading_still_gets_section() {
        let mut o = outline();
        o.outline.push(Heading::new(HeadingLevel::H1, "Phantom", 9));
        let sections = SectionSegmenter::new().segment(&layout(), &o, 0);
        assert_eq!(sections.len(), 3);
        assert!(sections[2].content.is_empty());
    }

    #[test]
    fn test_preamble_before_first_heading_is_dropped() {
        let mut page = PageLayout::new(1);
        page.runs.push(run_at("Cover notice text", 760.0, 1));
        page.runs.push(run_at("Only heading", 700.0, 1));
        page.runs.push(run_at("owned content", 686.0, 1));
        let layout = DocumentLayout {
            document: "d.pdf".into(),
            metadata: Default::default(),
            pages: vec![page],
        };
        let o = Outline {
            title: "d".into(),
            outline: vec![Heading::new(HeadingLevel::H1, "Only heading", 1)],
        };

        let sections = SectionSegmenter::new().segment(&layout, &o, 0);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].content, vec!["owned content"]);
    }
}
