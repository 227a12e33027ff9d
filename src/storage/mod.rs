// src/storage/mod.rs
use std::fs;
use std::path::{Path, PathBuf};

use crate::pmc::models::ArticleRecord;
use crate::utils::error::StorageError;

/// Local document store: one pretty-printed JSON file per article record.
pub struct ArticleStore {
    base_dir: PathBuf,
}

impl ArticleStore {
    /// Creates a store rooted at the given directory, creating it if needed.
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self, StorageError> {
        let base_path = base_dir.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(StorageError::Io)?;
        }

        Ok(Self {
            base_dir: base_path,
        })
    }

    /// Saves one article record. The filename is a slug of the title; a
    /// re-scrape of the same title overwrites the previous record.
    pub fn save(&self, record: &ArticleRecord) -> Result<PathBuf, StorageError> {
        let filename = format!("{}.json", slugify(&record.title));
        let file_path = self.base_dir.join(filename);

        let json = serde_json::to_string_pretty(record)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        fs::write(&file_path, json).map_err(StorageError::Io)?;

        tracing::info!("Saved article record to {}", file_path.display());

        Ok(file_path)
    }

    /// Loads every stored record, for the secondary graph pipeline. A file
    /// that fails to parse is logged and skipped, matching the per-document
    /// isolation of the scrape.
    pub fn load_all(&self) -> Result<Vec<ArticleRecord>, StorageError> {
        let mut records = Vec::new();

        let mut paths: Vec<PathBuf> = fs::read_dir(&self.base_dir)
            .map_err(StorageError::Io)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().map(|ext| ext == "json").unwrap_or(false))
            .collect();
        paths.sort();

        for path in paths {
            let json = fs::read_to_string(&path).map_err(StorageError::Io)?;
            match serde_json::from_str::<ArticleRecord>(&json) {
                Ok(record) => records.push(record),
                Err(e) => {
                    tracing::warn!("Skipping unparseable record {}: {}", path.display(), e);
                }
            }
        }

        Ok(records)
    }
}

/// Filesystem-safe slug of an article title.
fn slugify(title: &str) -> String {
    let mut slug = String::new();
    let mut last_dash = true;
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
        if slug.len() >= 80 {
            break;
        }
    }
    let slug = slug.trim_end_matches('-').to_string();
    if slug.is_empty() {
        "article".to_string()
    } else {
        slug
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::ArticleSections;
    use crate::pmc::models::ArticleLink;

    fn temp_store_dir(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("pmc_scraper_test_{}_{}", tag, std::process::id()))
    }

    fn sample_record(title: &str) -> ArticleRecord {
        let input = ArticleLink {
            title: title.to_string(),
            link: "https://example.org/a".to_string(),
        };
        let sections = ArticleSections {
            abstract_text: Some("An abstract.".to_string()),
            ..Default::default()
        };
        ArticleRecord::assemble(&input, sections)
    }

    #[test]
    fn slugify_produces_safe_filenames() {
        assert_eq!(slugify("Root growth: a study!"), "root-growth-a-study");
        assert_eq!(slugify("***"), "article");
    }

    #[test]
    fn save_then_load_round_trip() {
        let dir = temp_store_dir("roundtrip");
        let store = ArticleStore::new(&dir).unwrap();

        store.save(&sample_record("Paper one")).unwrap();
        store.save(&sample_record("Paper two")).unwrap();

        let records = store.load_all().unwrap();
        assert_eq!(records.len(), 2);
        assert!(records.iter().any(|r| r.title == "Paper one"));
        assert_eq!(records[0].abstract_text, "An abstract.");

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn unparseable_files_are_skipped() {
        let dir = temp_store_dir("skip");
        let store = ArticleStore::new(&dir).unwrap();

        store.save(&sample_record("Good paper")).unwrap();
        fs::write(dir.join("broken.json"), "{ not json").unwrap();

        let records = store.load_all().unwrap();
        assert_eq!(records.len(), 1);

        fs::remove_dir_all(&dir).unwrap();
    }
}
