//! Data model for outline extraction and persona ranking.
//!
//! This module defines the intermediate representation that bridges the
//! layout collaborator's output and the ranking pipeline: text runs and page
//! layouts on the input side, outlines, sections, and ranked results on the
//! output side.

mod layout;
mod outline;
mod section;

pub use layout::{BoundingBox, DocumentLayout, LayoutMetadata, PageLayout, TextRun};
pub use outline::{Heading, HeadingLevel, Outline, Repair};
pub use section::{RankedSection, Section, Subsection};
