// src/pmc/input.rs
use std::io::Read;
use std::path::Path;

use crate::pmc::models::ArticleLink;
use crate::utils::error::InputError;

/// Loads the (Title, Link) dataset from a CSV file. Read once at startup.
pub fn read_links<P: AsRef<Path>>(path: P) -> Result<Vec<ArticleLink>, InputError> {
    let file = std::fs::File::open(path.as_ref())?;
    let links = parse_links(file)?;
    tracing::info!(
        "Loaded {} article links from {}",
        links.len(),
        path.as_ref().display()
    );
    Ok(links)
}

fn parse_links<R: Read>(reader: R) -> Result<Vec<ArticleLink>, InputError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut links = Vec::new();
    for row in csv_reader.deserialize() {
        let link: ArticleLink = row?;
        links.push(link);
    }
    Ok(links)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_title_link_rows() {
        let csv = "Title,Link\n\
                   First paper,https://example.org/1\n\
                   \"Second, with comma\",https://example.org/2\n";
        let links = parse_links(csv.as_bytes()).unwrap();
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].title, "First paper");
        assert_eq!(links[1].title, "Second, with comma");
        assert_eq!(links[1].link, "https://example.org/2");
    }

    #[test]
    fn empty_file_yields_no_rows() {
        let links = parse_links("Title,Link\n".as_bytes()).unwrap();
        assert!(links.is_empty());
    }

    #[test]
    fn missing_column_is_an_error() {
        let result = parse_links("Title\nOnly title\n".as_bytes());
        assert!(result.is_err());
    }
}
