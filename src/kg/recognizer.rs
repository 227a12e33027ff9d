// src/kg/recognizer.rs

use once_cell::sync::Lazy;
use regex::Regex;

/// A typed entity span returned by a recognizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntitySpan {
    pub text: String,
    pub label: String,
}

/// Boundary to the named-entity model. Implementations may wrap an external
/// NLP service; the pipeline treats them as a black box returning spans.
pub trait EntityRecognizer {
    fn recognize(&self, text: &str) -> Vec<EntitySpan>;
}

/// Normalizes entity text for node matching: trims and collapses internal
/// whitespace so the same entity always maps to the same graph node.
pub fn normalize_entity(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

static CAPITALIZED_PHRASE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Z][A-Za-z0-9-]+(?:\s+[A-Z][A-Za-z0-9-]+)*")
        .expect("Failed to compile CAPITALIZED_PHRASE_RE")
});

// Sentence-starters that a naive capitalization heuristic would otherwise
// report as entities.
const STOPWORDS: &[&str] = &[
    "The", "This", "These", "Those", "Our", "We", "In", "It", "However", "Here", "There",
];

/// Stand-in recognizer used when no external NLP model is wired up: treats
/// capitalized phrases as candidate entities, labelled as noun chunks.
pub struct CapitalizedPhraseRecognizer;

impl EntityRecognizer for CapitalizedPhraseRecognizer {
    fn recognize(&self, text: &str) -> Vec<EntitySpan> {
        CAPITALIZED_PHRASE_RE
            .find_iter(text)
            .map(|m| m.as_str())
            .filter(|phrase| !STOPWORDS.contains(phrase))
            .map(|phrase| EntitySpan {
                text: phrase.to_string(),
                label: "NOUN_CHUNK".to_string(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_collapses_whitespace() {
        assert_eq!(normalize_entity("  Arabidopsis\n thaliana "), "Arabidopsis thaliana");
        assert_eq!(normalize_entity("   "), "");
    }

    #[test]
    fn capitalized_phrases_are_recognized() {
        let spans =
            CapitalizedPhraseRecognizer.recognize("Seedlings of Arabidopsis Thaliana flew on the ISS.");
        let texts: Vec<&str> = spans.iter().map(|s| s.text.as_str()).collect();
        assert!(texts.contains(&"Arabidopsis Thaliana"));
        assert!(texts.contains(&"ISS"));
    }

    #[test]
    fn sentence_starters_filtered() {
        let spans = CapitalizedPhraseRecognizer.recognize("The experiment used NASA hardware.");
        let texts: Vec<&str> = spans.iter().map(|s| s.text.as_str()).collect();
        assert!(!texts.contains(&"The"));
        assert!(texts.contains(&"NASA"));
    }
}
