// src/kg/graph.rs

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::utils::error::StorageError;

/// An article node, keyed by its link (the stable per-article identifier).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleNode {
    pub id: String,
    pub title: String,
}

/// An entity node, keyed by normalized name. The type recorded is the first
/// one seen for that name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityNode {
    pub name: String,
    pub entity_type: String,
}

/// A weighted MENTIONS edge. Repeated mentions accumulate weight and the
/// deduplicated set of contributing section names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MentionEdge {
    pub article_id: String,
    pub entity: String,
    pub weight: u32,
    pub sections: BTreeSet<String>,
}

/// In-memory article/entity graph, materialized to JSON. Plays the role an
/// external graph database would in a full deployment.
#[derive(Debug, Default)]
pub struct KnowledgeGraph {
    articles: BTreeMap<String, ArticleNode>,
    entities: BTreeMap<String, EntityNode>,
    edges: BTreeMap<(String, String), MentionEdge>,
}

#[derive(Serialize)]
struct GraphDump<'a> {
    articles: Vec<&'a ArticleNode>,
    entities: Vec<&'a EntityNode>,
    mentions: Vec<&'a MentionEdge>,
}

impl KnowledgeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates or updates an Article node.
    pub fn merge_article(&mut self, id: &str, title: &str) {
        self.articles
            .entry(id.to_string())
            .and_modify(|node| node.title = title.to_string())
            .or_insert_with(|| ArticleNode {
                id: id.to_string(),
                title: title.to_string(),
            });
    }

    /// Creates an Entity node if absent; an existing node keeps its type.
    pub fn merge_entity(&mut self, name: &str, entity_type: &str) {
        self.entities.entry(name.to_string()).or_insert_with(|| EntityNode {
            name: name.to_string(),
            entity_type: entity_type.to_string(),
        });
    }

    /// Links an article to an entity. An existing edge accumulates the
    /// weight and records the contributing section.
    pub fn link_article_entity(&mut self, article_id: &str, entity: &str, weight: u32, section: &str) {
        let edge = self
            .edges
            .entry((article_id.to_string(), entity.to_string()))
            .or_insert_with(|| MentionEdge {
                article_id: article_id.to_string(),
                entity: entity.to_string(),
                weight: 0,
                sections: BTreeSet::new(),
            });
        edge.weight += weight;
        edge.sections.insert(section.to_string());
    }

    pub fn article_count(&self) -> usize {
        self.articles.len()
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn edge(&self, article_id: &str, entity: &str) -> Option<&MentionEdge> {
        self.edges
            .get(&(article_id.to_string(), entity.to_string()))
    }

    /// Writes the graph as one JSON document with article nodes, entity
    /// nodes, and mention edges.
    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> Result<PathBuf, StorageError> {
        let dump = GraphDump {
            articles: self.articles.values().collect(),
            entities: self.entities.values().collect(),
            mentions: self.edges.values().collect(),
        };

        let json = serde_json::to_string_pretty(&dump)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        fs::write(path.as_ref(), json).map_err(StorageError::Io)?;

        tracing::info!(
            "Wrote knowledge graph to {} ({} articles, {} entities, {} edges)",
            path.as_ref().display(),
            self.articles.len(),
            self.entities.len(),
            self.edges.len()
        );

        Ok(path.as_ref().to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_mentions_accumulate_weight_and_dedupe_sections() {
        let mut graph = KnowledgeGraph::new();
        graph.merge_article("a1", "Paper");
        graph.merge_entity("ISS", "NOUN_CHUNK");

        graph.link_article_entity("a1", "ISS", 3, "title");
        graph.link_article_entity("a1", "ISS", 2, "abstract");
        graph.link_article_entity("a1", "ISS", 2, "abstract");

        let edge = graph.edge("a1", "ISS").unwrap();
        assert_eq!(edge.weight, 7);
        assert_eq!(edge.sections.len(), 2);
        assert!(edge.sections.contains("title"));
        assert!(edge.sections.contains("abstract"));
    }

    #[test]
    fn entity_keeps_first_seen_type() {
        let mut graph = KnowledgeGraph::new();
        graph.merge_entity("NASA", "ORG");
        graph.merge_entity("NASA", "NOUN_CHUNK");
        assert_eq!(graph.entity_count(), 1);
    }

    #[test]
    fn merge_article_is_idempotent() {
        let mut graph = KnowledgeGraph::new();
        graph.merge_article("a1", "Old title");
        graph.merge_article("a1", "New title");
        assert_eq!(graph.article_count(), 1);
    }
}
