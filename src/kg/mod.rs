// src/kg/mod.rs
//
// Secondary batch pipeline: mines entities from stored article records and
// accumulates them into an article/entity knowledge graph.

pub mod graph;
pub mod recognizer;

use std::collections::HashSet;

use crate::pmc::models::ArticleRecord;
use self::graph::KnowledgeGraph;
use self::recognizer::{normalize_entity, EntityRecognizer};

// Sections shorter than this (trimmed) carry too little signal to mine.
const MIN_SECTION_CHARS: usize = 10;

// Per-section mention weights: the title is the strongest signal.
const TITLE_WEIGHT: u32 = 3;
const ABSTRACT_WEIGHT: u32 = 2;
const CONCLUSION_WEIGHT: u32 = 2;

/// Builds the knowledge graph from stored records. Each record contributes
/// its title, abstract, and conclusion (falling back to Results and
/// Discussion); per article, an entity is linked at most once per section.
pub fn build_graph(records: &[ArticleRecord], recognizer: &dyn EntityRecognizer) -> KnowledgeGraph {
    let mut kg = KnowledgeGraph::new();
    let mut processed = 0usize;

    for record in records {
        let sections: [(&str, Option<&str>, u32); 3] = [
            ("title", Some(record.title.as_str()), TITLE_WEIGHT),
            ("abstract", record.abstract_or_none(), ABSTRACT_WEIGHT),
            ("conclusion", record.conclusion_or_results(), CONCLUSION_WEIGHT),
        ];

        if sections
            .iter()
            .all(|(_, text, _)| text.map_or(true, |t| t.trim().is_empty()))
        {
            continue;
        }

        kg.merge_article(&record.link, &record.title);

        let mut seen: HashSet<(String, &str)> = HashSet::new();
        for (section_name, text, weight) in sections {
            let Some(text) = text else { continue };
            if text.trim().len() < MIN_SECTION_CHARS {
                continue;
            }

            for span in recognizer.recognize(text) {
                let name = normalize_entity(&span.text);
                if name.is_empty() {
                    continue;
                }
                if !seen.insert((name.clone(), section_name)) {
                    continue;
                }
                kg.merge_entity(&name, &span.label);
                kg.link_article_entity(&record.link, &name, weight, section_name);
            }
        }

        processed += 1;
        if processed % 50 == 0 {
            tracing::info!("Processed {} articles...", processed);
        }
    }

    tracing::info!("Finished processing {} articles.", processed);
    kg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::ArticleSections;
    use crate::pmc::models::ArticleLink;
    use super::recognizer::EntitySpan;

    /// Recognizer that reports every whole word starting with 'Z'.
    struct ZWordRecognizer;

    impl EntityRecognizer for ZWordRecognizer {
        fn recognize(&self, text: &str) -> Vec<EntitySpan> {
            text.split_whitespace()
                .filter(|w| w.starts_with('Z'))
                .map(|w| EntitySpan {
                    text: w.trim_matches('.').to_string(),
                    label: "TEST".to_string(),
                })
                .collect()
        }
    }

    fn record(title: &str, abstract_text: Option<&str>, conclusions: Option<&str>) -> ArticleRecord {
        let input = ArticleLink {
            title: title.to_string(),
            link: format!("https://example.org/{}", title.replace(' ', "-")),
        };
        let sections = ArticleSections {
            abstract_text: abstract_text.map(String::from),
            conclusions: conclusions.map(String::from),
            ..Default::default()
        };
        ArticleRecord::assemble(&input, sections)
    }

    #[test]
    fn section_weights_accumulate_per_entity() {
        let records = vec![record(
            "Zebrafish study of bone loss",
            Some("Zebrafish showed reduced density."),
            Some("Zebrafish adapt to microgravity."),
        )];

        let kg = build_graph(&records, &ZWordRecognizer);
        let edge = kg
            .edge("https://example.org/Zebrafish-study-of-bone-loss", "Zebrafish")
            .unwrap();
        // title 3 + abstract 2 + conclusion 2
        assert_eq!(edge.weight, 7);
        assert_eq!(edge.sections.len(), 3);
    }

    #[test]
    fn duplicate_mentions_within_one_section_counted_once() {
        let records = vec![record(
            "Plain title",
            Some("Zebrafish and Zebrafish again, plus Zinc."),
            None,
        )];

        let kg = build_graph(&records, &ZWordRecognizer);
        let edge = kg
            .edge("https://example.org/Plain-title", "Zebrafish")
            .unwrap();
        assert_eq!(edge.weight, 2);
        assert_eq!(kg.entity_count(), 2); // Zebrafish, Zinc
    }

    #[test]
    fn not_found_sections_are_skipped() {
        // assemble() stores "Not Found" for absent sections; the graph
        // pipeline must not mine that literal.
        let records = vec![record("Ziggurat of data", None, None)];

        let kg = build_graph(&records, &ZWordRecognizer);
        let edge = kg
            .edge("https://example.org/Ziggurat-of-data", "Ziggurat")
            .unwrap();
        assert_eq!(edge.weight, 3); // title only
        assert_eq!(
            edge.sections.iter().map(String::as_str).collect::<Vec<_>>(),
            vec!["title"]
        );
    }

    #[test]
    fn short_sections_are_skipped() {
        let records = vec![record("Zone wide title", Some("Zp."), None)];

        let kg = build_graph(&records, &ZWordRecognizer);
        assert!(kg.edge("https://example.org/Zone-wide-title", "Zp").is_none());
    }

    #[test]
    fn conclusion_weight_applies_to_results_fallback() {
        let input = ArticleLink {
            title: "No conclusions here".to_string(),
            link: "https://example.org/nc".to_string(),
        };
        let sections = ArticleSections {
            results_and_discussion: Some("Zirconium levels increased.".to_string()),
            ..Default::default()
        };
        let records = vec![ArticleRecord::assemble(&input, sections)];

        let kg = build_graph(&records, &ZWordRecognizer);
        let edge = kg.edge("https://example.org/nc", "Zirconium").unwrap();
        assert_eq!(edge.weight, 2);
        assert!(edge.sections.contains("conclusion"));
    }
}
