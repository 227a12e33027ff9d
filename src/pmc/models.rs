// src/pmc/models.rs
use serde::{Deserialize, Serialize};

use crate::extractors::ArticleSections;

/// Marker stored in place of a section that could not be located or
/// extracted. A store-level convention; the extraction engine itself
/// represents absence as `None`.
pub const NOT_FOUND: &str = "Not Found";

/// One row of the input dataset: an article title and the URL of its page.
#[derive(Debug, Clone, Deserialize)]
pub struct ArticleLink {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Link")]
    pub link: String,
}

/// The persisted article document. Field names follow the store schema the
/// downstream graph pipeline expects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleRecord {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Link")]
    pub link: String,
    #[serde(rename = "Abstract")]
    pub abstract_text: String,
    #[serde(rename = "Results and Discussion")]
    pub results_and_discussion: String,
    #[serde(rename = "Conclusions")]
    pub conclusions: String,
    #[serde(rename = "Authors")]
    pub authors: Vec<String>,
    #[serde(rename = "NumAuthors")]
    pub num_authors: usize,
    #[serde(rename = "PublishedDate")]
    pub published_date: Option<String>,
    /// Reserved for a later keyword pipeline.
    #[serde(rename = "Keywords", default)]
    pub keywords: Vec<String>,
    /// Reserved for a later summarization pipeline.
    #[serde(rename = "AISummary", default)]
    pub ai_summary: String,
    #[serde(rename = "ScrapedAt", default)]
    pub scraped_at: String,
}

impl ArticleRecord {
    /// Assembles the stored document from the input row and the extraction
    /// output, applying the "Not Found" convention for absent sections.
    pub fn assemble(input: &ArticleLink, sections: ArticleSections) -> Self {
        let or_not_found = |text: Option<String>| text.unwrap_or_else(|| NOT_FOUND.to_string());
        let num_authors = sections.authors.len();

        Self {
            title: input.title.clone(),
            link: input.link.clone(),
            abstract_text: or_not_found(sections.abstract_text),
            results_and_discussion: or_not_found(sections.results_and_discussion),
            conclusions: or_not_found(sections.conclusions),
            authors: sections.authors,
            num_authors,
            published_date: sections.published_date,
            keywords: Vec::new(),
            ai_summary: String::new(),
            scraped_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    fn present(text: &str) -> Option<&str> {
        let text = text.trim();
        if text.is_empty() || text == NOT_FOUND {
            None
        } else {
            Some(text)
        }
    }

    pub fn abstract_or_none(&self) -> Option<&str> {
        Self::present(&self.abstract_text)
    }

    /// The conclusion text, or Results and Discussion when the article had
    /// no conclusions section. The graph pipeline weights this as one
    /// "conclusion" section either way.
    pub fn conclusion_or_results(&self) -> Option<&str> {
        Self::present(&self.conclusions).or_else(|| Self::present(&self.results_and_discussion))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::ArticleSections;

    fn input() -> ArticleLink {
        ArticleLink {
            title: "Root growth in microgravity".to_string(),
            link: "https://example.org/articles/PMC123".to_string(),
        }
    }

    #[test]
    fn absent_sections_become_not_found() {
        let record = ArticleRecord::assemble(&input(), ArticleSections::default());
        assert_eq!(record.abstract_text, NOT_FOUND);
        assert_eq!(record.results_and_discussion, NOT_FOUND);
        assert_eq!(record.conclusions, NOT_FOUND);
        assert_eq!(record.num_authors, 0);
        assert!(record.keywords.is_empty());
        assert!(record.ai_summary.is_empty());
    }

    #[test]
    fn author_count_matches_list_length() {
        let sections = ArticleSections {
            authors: vec!["A".into(), "B".into(), "C".into()],
            ..Default::default()
        };
        let record = ArticleRecord::assemble(&input(), sections);
        assert_eq!(record.num_authors, 3);
        assert_eq!(record.authors.len(), 3);
    }

    #[test]
    fn serialized_field_names_follow_store_schema() {
        let record = ArticleRecord::assemble(&input(), ArticleSections::default());
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("Results and Discussion").is_some());
        assert!(json.get("NumAuthors").is_some());
        assert!(json.get("AISummary").is_some());
        assert_eq!(json["Abstract"], NOT_FOUND);
    }

    #[test]
    fn conclusion_falls_back_to_results() {
        let sections = ArticleSections {
            results_and_discussion: Some("Results text.".to_string()),
            ..Default::default()
        };
        let record = ArticleRecord::assemble(&input(), sections);
        assert_eq!(record.conclusion_or_results(), Some("Results text."));
        assert_eq!(record.abstract_or_none(), None);
    }
}
