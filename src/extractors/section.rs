// src/extractors/section.rs

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

use crate::extractors::element_text;
use crate::extractors::locator::AnchorId;

// --- CSS Selectors (Lazy Static) ---
static ABSTRACT_HEADING_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("h2[data-anchor-id]").expect("Failed to compile ABSTRACT_HEADING_SELECTOR")
});

// Headings and paragraphs in document order, for the forward walk from an
// abstract heading to the next same-level heading.
static HEADING_FLOW_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("h2, p").expect("Failed to compile HEADING_FLOW_SELECTOR"));

static CONTAINER_WITH_ID_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("div[id], section[id]").expect("Failed to compile CONTAINER_WITH_ID_SELECTOR")
});

static ABSTRACT_CLASS_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("div.abstract, section.abstract")
        .expect("Failed to compile ABSTRACT_CLASS_SELECTOR")
});

static SECTION_WITH_ID_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("section[id]").expect("Failed to compile SECTION_WITH_ID_SELECTOR")
});

static SECTION_TITLE_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("h2.pmc_sec_title, h3.pmc_sec_title, h4.pmc_sec_title")
        .expect("Failed to compile SECTION_TITLE_SELECTOR")
});

static PARAGRAPH_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("p").expect("Failed to compile PARAGRAPH_SELECTOR"));

const SECTION_TITLE_CLASS: &str = "pmc_sec_title";

/// Turns an anchor id into the section's concatenated text. A pure read over
/// the document tree: absence of structure yields `None`, never an error.
pub struct SectionExtractor;

impl Default for SectionExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl SectionExtractor {
    pub fn new() -> Self {
        Self {}
    }

    pub fn extract(&self, document: &Html, anchor: &AnchorId) -> Option<String> {
        tracing::debug!("Extracting section '{}'", anchor);
        if anchor.is_abstract() {
            self.extract_abstract(document, anchor)
        } else {
            self.extract_general(document, anchor)
        }
    }

    /// Abstract algorithm: from the heading carrying the anchor id, walk
    /// forward in document order accumulating paragraph text until the next
    /// heading of the same level. Without such a heading, fall back to a
    /// container (by id, then by class) and take every nested paragraph.
    fn extract_abstract(&self, document: &Html, anchor: &AnchorId) -> Option<String> {
        let heading = document
            .select(&ABSTRACT_HEADING_SELECTOR)
            .find(|h| h.value().attr("data-anchor-id") == Some(anchor.as_str()));

        if let Some(heading) = heading {
            let mut texts = Vec::new();
            let mut past_heading = false;
            for element in document.select(&HEADING_FLOW_SELECTOR) {
                if !past_heading {
                    past_heading = element.id() == heading.id();
                    continue;
                }
                match element.value().name() {
                    "h2" => break, // next section header ends the abstract
                    "p" => {
                        let text = element_text(element);
                        if !text.is_empty() {
                            texts.push(text);
                        }
                    }
                    _ => {}
                }
            }
            return join_non_empty(texts);
        }

        let container = document
            .select(&CONTAINER_WITH_ID_SELECTOR)
            .find(|el| el.value().attr("id") == Some(anchor.as_str()))
            .or_else(|| document.select(&ABSTRACT_CLASS_SELECTOR).next())?;

        let texts: Vec<String> = container
            .select(&PARAGRAPH_SELECTOR)
            .map(element_text)
            .filter(|text| !text.is_empty())
            .collect();
        join_non_empty(texts)
    }

    /// General algorithm: the section whose id equals the anchor exactly,
    /// flattened depth-first together with its nested subsections. When no
    /// exact match exists (or it holds no text), collect every section whose
    /// id starts with the anchor as a prefix (subsection ids like "s3a").
    fn extract_general(&self, document: &Html, anchor: &AnchorId) -> Option<String> {
        let main_section = document
            .select(&SECTION_WITH_ID_SELECTOR)
            .find(|sec| sec.value().attr("id") == Some(anchor.as_str()));

        if let Some(main_section) = main_section {
            let blocks = collect_section_blocks(main_section);
            if !blocks.is_empty() {
                tracing::debug!(
                    "Section '{}': {} text blocks (exact id match)",
                    anchor,
                    blocks.len()
                );
                return join_non_empty(blocks);
            }
        }

        let mut blocks = Vec::new();
        let mut matched_sections = 0usize;
        for section in document.select(&SECTION_WITH_ID_SELECTOR) {
            let Some(id) = section.value().attr("id") else {
                continue;
            };
            if !id.starts_with(anchor.as_str()) {
                continue;
            }
            matched_sections += 1;
            if let Some(title) = section.select(&SECTION_TITLE_SELECTOR).next() {
                let text = element_text(title);
                if !text.is_empty() {
                    blocks.push(text);
                }
            }
            for paragraph in section.select(&PARAGRAPH_SELECTOR) {
                let text = element_text(paragraph);
                if !text.is_empty() {
                    blocks.push(text);
                }
            }
        }

        if matched_sections > 0 {
            tracing::debug!(
                "Section '{}': {} text blocks from {} sections (prefix match)",
                anchor,
                blocks.len(),
                matched_sections
            );
        }
        join_non_empty(blocks)
    }
}

/// Depth-first flattening of a section and its nested subsections, via an
/// explicit stack. Per section, in order: the direct-child title element,
/// direct-child paragraphs, then each direct-child subsection.
fn collect_section_blocks(root: ElementRef) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut stack = vec![root];

    while let Some(section) = stack.pop() {
        if let Some(title) = direct_child_title(section) {
            blocks.push(title);
        }

        let mut subsections = Vec::new();
        for child in section.children().filter_map(ElementRef::wrap) {
            match child.value().name() {
                "p" => {
                    let text = element_text(child);
                    if !text.is_empty() {
                        blocks.push(text);
                    }
                }
                "section" => subsections.push(child),
                _ => {}
            }
        }

        // Reversed so the stack pops subsections in document order.
        for subsection in subsections.into_iter().rev() {
            stack.push(subsection);
        }
    }

    blocks
}

/// Title element that is a direct child of the section (nested subsection
/// titles are collected by their own visit).
fn direct_child_title(section: ElementRef) -> Option<String> {
    section
        .children()
        .filter_map(ElementRef::wrap)
        .find(|el| {
            matches!(el.value().name(), "h2" | "h3" | "h4")
                && el.value().classes().any(|class| class == SECTION_TITLE_CLASS)
        })
        .map(element_text)
        .filter(|text| !text.is_empty())
}

fn join_non_empty(blocks: Vec<String>) -> Option<String> {
    if blocks.is_empty() {
        None
    } else {
        Some(blocks.join(" "))
    }
}
