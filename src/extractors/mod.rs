// src/extractors/mod.rs
pub mod locator;
pub mod metadata;
pub mod section;

use scraper::{ElementRef, Html};

// Re-export key extraction types for convenience
pub use locator::{AnchorId, SectionLabel, SectionLocator};
pub use section::SectionExtractor;

/// Extracted sections and metadata for one article page. Absent structure is
/// represented, never an error; the "Not Found" convention is applied later
/// at the persistence boundary.
#[derive(Debug, Clone, Default)]
pub struct ArticleSections {
    pub abstract_text: Option<String>,
    pub results_and_discussion: Option<String>,
    pub conclusions: Option<String>,
    pub authors: Vec<String>,
    pub published_date: Option<String>,
}

/// Runs the full per-document pipeline: parse, locate anchors, extract each
/// located section, pull metadata. Pure with respect to the document: no
/// state crosses calls, and the same input yields the same output.
pub fn extract_article(html: &str) -> ArticleSections {
    let document = Html::parse_document(html);
    let locator = SectionLocator::new();
    let extractor = SectionExtractor::new();

    let anchors = locator.locate(&document, &SectionLabel::ALL);
    // Only located labels reach the extractor.
    let section_text = |label: SectionLabel| {
        anchors
            .get(&label)
            .and_then(|anchor| extractor.extract(&document, anchor))
    };

    ArticleSections {
        abstract_text: section_text(SectionLabel::Abstract),
        results_and_discussion: section_text(SectionLabel::ResultsAndDiscussion),
        conclusions: section_text(SectionLabel::Conclusions),
        authors: metadata::extract_authors(&document),
        published_date: metadata::extract_publication_date(&document),
    }
}

/// Text content of an element with whitespace collapsed to single spaces.
pub(crate) fn element_text(element: ElementRef) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
