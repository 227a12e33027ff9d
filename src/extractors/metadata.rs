// src/extractors/metadata.rs
//
// Author and publication-date extraction from document metadata tags.
// Trivial compared to the section engine, but kept separate so the
// citation-tag conventions live in one place.

use once_cell::sync::Lazy;
use scraper::{Html, Selector};

use crate::extractors::element_text;

static META_AUTHOR_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#"meta[name="citation_author"]"#)
        .expect("Failed to compile META_AUTHOR_SELECTOR")
});

static META_PUB_DATE_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#"meta[name="citation_publication_date"]"#)
        .expect("Failed to compile META_PUB_DATE_SELECTOR")
});

static EPUB_DATE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".epub-date").expect("Failed to compile EPUB_DATE_SELECTOR"));

/// Author names from `citation_author` meta tags, in document order,
/// skipping empty values.
pub fn extract_authors(document: &Html) -> Vec<String> {
    document
        .select(&META_AUTHOR_SELECTOR)
        .filter_map(|meta| meta.value().attr("content"))
        .map(str::trim)
        .filter(|content| !content.is_empty())
        .map(String::from)
        .collect()
}

/// Publication date from the `citation_publication_date` meta tag, falling
/// back to the text of an epub-date element.
pub fn extract_publication_date(document: &Html) -> Option<String> {
    let meta_date = document
        .select(&META_PUB_DATE_SELECTOR)
        .filter_map(|meta| meta.value().attr("content"))
        .map(str::trim)
        .find(|content| !content.is_empty());
    if meta_date.is_some() {
        return meta_date.map(String::from);
    }

    document
        .select(&EPUB_DATE_SELECTOR)
        .next()
        .map(element_text)
        .filter(|text| !text.is_empty())
}
