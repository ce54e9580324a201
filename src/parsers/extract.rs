use crate::config::ScraperConfig;
use crate::parsers::html::{Document, Element, find_all};
use crate::parsers::text::{join_non_empty, normalize_whitespace};
use regex::Regex;
use thiserror::Error;

/// No tier produced any text
#[derive(Debug, Error)]
#[error("Could not extract any meaningful text from the page using common patterns.")]
pub struct NoTextFound;

/// Which search produced the extracted text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionTier {
    /// Paragraphs inside a container with a content-like class
    ContainerParagraphs,
    /// Full text of the longest content-like container without paragraphs
    ContainerText,
    /// Every paragraph under `<body>`
    BodyParagraphs,
    /// All text under `<body>`
    BodyText,
}

/// Normalized article text and the tier it came from
#[derive(Debug, Clone)]
pub struct Extraction {
    pub text: String,
    pub tier: ExtractionTier,
}

/// Settings for locating the article container
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    class_pattern: Regex,
    container_tags: Vec<String>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self::from_config(&ScraperConfig::default()).expect("Default keywords should be valid")
    }
}

impl ExtractOptions {
    /// Build options from class keywords (matched case-insensitively as
    /// substrings) and the container tags to search
    pub fn new<S: AsRef<str>>(keywords: &[S], container_tags: &[S]) -> Result<Self, regex::Error> {
        let alternatives = keywords
            .iter()
            .map(|k| k.as_ref().trim())
            .filter(|k| !k.is_empty())
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join("|");
        let class_pattern = Regex::new(&format!("(?i)(?:{})", alternatives))?;

        Ok(Self {
            class_pattern,
            container_tags: container_tags
                .iter()
                .map(|t| t.as_ref().to_lowercase())
                .collect(),
        })
    }

    pub fn from_config(config: &ScraperConfig) -> Result<Self, regex::Error> {
        Self::new(&config.content_keywords, &config.container_tags)
    }

    fn is_content_container(&self, element: &Element) -> bool {
        element
            .attr("class")
            .is_some_and(|class| self.class_pattern.is_match(class))
    }
}

/// Extract the article text from raw page bytes
pub fn extract_article(page: &[u8], options: &ExtractOptions) -> Result<Extraction, NoTextFound> {
    let doc = Document::from_bytes(page);
    extract_from_document(&doc, options)
}

/// Run the tiered search over a parsed document.
///
/// Tiers are tried in order and the first one that yields text wins:
/// content-class containers, body paragraphs, whole body text.
pub fn extract_from_document(
    doc: &Document,
    options: &ExtractOptions,
) -> Result<Extraction, NoTextFound> {
    if let Some(extraction) = search_containers(doc.root(), options) {
        return Ok(extraction);
    }

    let Some(body) = doc.body() else {
        return Err(NoTextFound);
    };

    let text = paragraphs_text(body);
    if !text.is_empty() {
        return Ok(Extraction {
            text,
            tier: ExtractionTier::BodyParagraphs,
        });
    }

    let text = normalize_whitespace(&body.joined_text(" "));
    if !text.is_empty() {
        return Ok(Extraction {
            text,
            tier: ExtractionTier::BodyText,
        });
    }

    Err(NoTextFound)
}

/// Tier 1. The first container with paragraph text wins outright; if none
/// has any, the longest container text wins (earliest on ties).
fn search_containers(root: &Element, options: &ExtractOptions) -> Option<Extraction> {
    let containers = find_all(root, &options.container_tags, |el| {
        options.is_content_container(el)
    });
    ::log::debug!("Found {} content-like containers", containers.len());

    let mut longest = String::new();
    for container in containers {
        let text = paragraphs_text(container);
        if !text.is_empty() {
            return Some(Extraction {
                text,
                tier: ExtractionTier::ContainerParagraphs,
            });
        }

        let text = normalize_whitespace(&container.joined_text(" "));
        if text.chars().count() > longest.chars().count() {
            longest = text;
        }
    }

    if longest.is_empty() {
        None
    } else {
        Some(Extraction {
            text: longest,
            tier: ExtractionTier::ContainerText,
        })
    }
}

/// Text of every `<p>` under `element`, joined with single spaces
fn paragraphs_text(element: &Element) -> String {
    let paragraphs = find_all(element, &["p"], |_| true)
        .into_iter()
        .map(|p| normalize_whitespace(&p.text_content()));
    join_non_empty(paragraphs)
}
