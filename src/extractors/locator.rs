// src/extractors/locator.rs

use std::collections::BTreeMap;
use std::fmt;

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

use crate::extractors::element_text;

// --- CSS Selectors (Lazy Static) ---
// PMC article pages carry an in-page navigation list whose links map
// human-readable section labels to anchor ids.
static NAV_LIST_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("ul.usa-in-page-nav__list").expect("Failed to compile NAV_LIST_SELECTOR")
});

static NAV_LINK_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("a[data-anchor-id][data-ga-label]")
        .expect("Failed to compile NAV_LINK_SELECTOR")
});

static SECTION_WITH_ID_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("section[id]").expect("Failed to compile SECTION_WITH_ID_SELECTOR")
});

static CONTAINER_WITH_ID_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("div[id], section[id]").expect("Failed to compile CONTAINER_WITH_ID_SELECTOR")
});

static CONTAINER_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div, section").expect("Failed to compile CONTAINER_SELECTOR"));

static SECTION_TITLE_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("h2.pmc_sec_title, h3.pmc_sec_title")
        .expect("Failed to compile SECTION_TITLE_SELECTOR")
});

// --- Constants ---
// Anchor ids commonly used by PMC renderings when the navigation list is
// missing and no section title matches.
const RESULTS_ID_CANDIDATES: &[&str] = &["s3", "sec3", "results", "results-and-discussion"];
const CONCLUSIONS_ID_CANDIDATES: &[&str] =
    &["s5", "s4", "sec5", "sec6", "conclusions", "conclusion"];

/// The semantic section categories we extract from an article page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SectionLabel {
    Abstract,
    ResultsAndDiscussion,
    Conclusions,
}

impl SectionLabel {
    pub const ALL: [SectionLabel; 3] = [
        SectionLabel::Abstract,
        SectionLabel::ResultsAndDiscussion,
        SectionLabel::Conclusions,
    ];

    /// The human-readable label used by the in-page navigation list.
    pub fn nav_label(self) -> &'static str {
        match self {
            SectionLabel::Abstract => "Abstract",
            SectionLabel::ResultsAndDiscussion => "Results and Discussion",
            SectionLabel::Conclusions => "Conclusions",
        }
    }
}

impl fmt::Display for SectionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.nav_label())
    }
}

/// Opaque identifier naming the element that anchors a section's content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorId(String);

impl AnchorId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this anchor denotes an abstract-type section, which selects
    /// the heading-walk extraction algorithm over the nested-section one.
    pub fn is_abstract(&self) -> bool {
        self.0.to_ascii_lowercase().contains("abstract")
    }
}

impl fmt::Display for AnchorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One lookup procedure in the strategy cascade. Strategies are independent
/// per label: a miss for one label does not disqualify the strategy for
/// another.
pub trait LocateStrategy {
    fn name(&self) -> &'static str;
    fn try_locate(&self, document: &Html, label: SectionLabel) -> Option<AnchorId>;
}

/// Strategy 1: read the in-page navigation list and match link labels
/// exactly (case-sensitive, trimmed) against the target label.
pub struct NavListStrategy;

impl LocateStrategy for NavListStrategy {
    fn name(&self) -> &'static str {
        "nav-list"
    }

    fn try_locate(&self, document: &Html, label: SectionLabel) -> Option<AnchorId> {
        let nav = document.select(&NAV_LIST_SELECTOR).next()?;
        for link in nav.select(&NAV_LINK_SELECTOR) {
            let Some(link_label) = link.value().attr("data-ga-label") else {
                continue;
            };
            if link_label.trim() == label.nav_label() {
                return link.value().attr("data-anchor-id").map(AnchorId::new);
            }
        }
        None
    }
}

/// Strategy 2: locate sections directly by known id patterns, class names,
/// and section-title keyword rules, when the navigation list is absent or
/// missed a label.
pub struct DirectLookupStrategy;

impl LocateStrategy for DirectLookupStrategy {
    fn name(&self) -> &'static str {
        "direct-lookup"
    }

    fn try_locate(&self, document: &Html, label: SectionLabel) -> Option<AnchorId> {
        match label {
            SectionLabel::Abstract => locate_abstract(document),
            SectionLabel::ResultsAndDiscussion => locate_results_by_title(document)
                .or_else(|| probe_known_ids(document, RESULTS_ID_CANDIDATES, true)),
            SectionLabel::Conclusions => locate_conclusions_by_title(document)
                .or_else(|| probe_known_ids(document, CONCLUSIONS_ID_CANDIDATES, false)),
        }
    }
}

/// Abstract lookup: a container with id "abstract", then any div/section
/// whose id contains "abstract", then a container with an abstract-like
/// class (using its id, or the literal "abstract" when it carries none).
fn locate_abstract(document: &Html) -> Option<AnchorId> {
    for container in document.select(&CONTAINER_WITH_ID_SELECTOR) {
        if container.value().name() == "div" && container.value().attr("id") == Some("abstract") {
            return Some(AnchorId::new("abstract"));
        }
    }

    for container in document.select(&CONTAINER_WITH_ID_SELECTOR) {
        if let Some(id) = container.value().attr("id") {
            if id.to_ascii_lowercase().contains("abstract") {
                return Some(AnchorId::new(id));
            }
        }
    }

    for container in document.select(&CONTAINER_SELECTOR) {
        let abstract_class = container
            .value()
            .classes()
            .any(|class| class.to_ascii_lowercase().contains("abstract"));
        if abstract_class {
            let id = container.value().attr("id").unwrap_or("abstract");
            return Some(AnchorId::new(id));
        }
    }

    None
}

/// Scan all identified sections for a results-like title. Titles containing
/// both "result" and "discussion" are preferred over plain "result" titles;
/// "material"/"method" titles never qualify (guards against a Methods
/// section reusing a results-like id).
fn locate_results_by_title(document: &Html) -> Option<AnchorId> {
    let mut result_only: Option<AnchorId> = None;

    for section in document.select(&SECTION_WITH_ID_SELECTOR) {
        let Some(title) = section_title_text(section) else {
            continue;
        };
        let title = title.to_lowercase();
        if title.contains("material") || title.contains("method") {
            continue;
        }
        if !title.contains("result") {
            continue;
        }
        let Some(id) = section.value().attr("id") else {
            continue;
        };
        if title.contains("discussion") {
            return Some(AnchorId::new(id));
        }
        if result_only.is_none() {
            result_only = Some(AnchorId::new(id));
        }
    }

    result_only
}

fn locate_conclusions_by_title(document: &Html) -> Option<AnchorId> {
    for section in document.select(&SECTION_WITH_ID_SELECTOR) {
        let Some(title) = section_title_text(section) else {
            continue;
        };
        if title.to_lowercase().contains("conclusion") {
            return section.value().attr("id").map(AnchorId::new);
        }
    }
    None
}

/// Probe a fixed ordered list of id literals. With `guard_methods`, a
/// candidate only qualifies when its title exists and is free of
/// "material"/"method".
fn probe_known_ids(document: &Html, candidates: &[&str], guard_methods: bool) -> Option<AnchorId> {
    for candidate in candidates {
        for section in document.select(&SECTION_WITH_ID_SELECTOR) {
            if section.value().attr("id") != Some(*candidate) {
                continue;
            }
            if guard_methods {
                let Some(title) = section_title_text(section) else {
                    continue;
                };
                let title = title.to_lowercase();
                if title.contains("material") || title.contains("method") {
                    continue;
                }
            }
            return Some(AnchorId::new(*candidate));
        }
    }
    None
}

/// First title element (h2/h3 with the PMC section-title class) found
/// within a section, as normalized text.
fn section_title_text(section: ElementRef) -> Option<String> {
    section
        .select(&SECTION_TITLE_SELECTOR)
        .next()
        .map(element_text)
        .filter(|text| !text.is_empty())
}

/// Applies the strategy cascade in order, per label, first hit wins.
pub struct SectionLocator {
    strategies: Vec<Box<dyn LocateStrategy>>,
}

impl Default for SectionLocator {
    fn default() -> Self {
        Self::new()
    }
}

impl SectionLocator {
    pub fn new() -> Self {
        Self {
            strategies: vec![Box::new(NavListStrategy), Box::new(DirectLookupStrategy)],
        }
    }

    /// Maps each target label to the anchor id of its section. A label with
    /// no match in any strategy is simply absent from the result.
    pub fn locate(
        &self,
        document: &Html,
        targets: &[SectionLabel],
    ) -> BTreeMap<SectionLabel, AnchorId> {
        let mut anchors = BTreeMap::new();

        for &label in targets {
            let located = self.strategies.iter().find_map(|strategy| {
                strategy
                    .try_locate(document, label)
                    .map(|anchor| (strategy.name(), anchor))
            });

            match located {
                Some((strategy_name, anchor)) => {
                    tracing::debug!(
                        "Located '{}' -> '{}' via {} strategy",
                        label,
                        anchor,
                        strategy_name
                    );
                    anchors.insert(label, anchor);
                }
                None => tracing::debug!("No anchor found for '{}'", label),
            }
        }

        anchors
    }
}
